//! Plain-text rendering of the populated views.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use threads_core::{
  page::Page,
  thread::{Comment, FeedPost, Reply, Thread, ThreadDetail},
  user::{User, UserThreads},
};

const INDENT: &str = "    ";

fn stamp(at: &DateTime<Utc>) -> String { at.format("%Y-%m-%d %H:%M").to_string() }

fn header(out: &mut String, depth: usize, name: &str, thread: &Thread) {
  let pad = INDENT.repeat(depth);
  let _ = writeln!(out, "{pad}{name} · {} · {}", stamp(&thread.created_at), thread.thread_id);
  for line in thread.text.lines() {
    let _ = writeln!(out, "{pad}  {line}");
  }
}

fn more(out: &mut String, is_next: bool) {
  if is_next {
    out.push_str("(more on the next page)\n");
  }
}

pub fn user(user: &User) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} (@{})", user.name, user.username);
  if !user.bio.is_empty() {
    let _ = writeln!(out, "{}", user.bio);
  }
  let _ = writeln!(out, "threads:   {}", user.threads.len());
  let _ = writeln!(out, "joined:    {}", stamp(&user.created_at));
  if !user.onboarded {
    out.push_str("not onboarded\n");
  }
  out
}

pub fn users(page: &Page<User>) -> String {
  let mut out = String::new();
  if page.items.is_empty() {
    out.push_str("no users found\n");
  }
  for u in &page.items {
    let _ = writeln!(out, "@{:<20} {}", u.username, u.name);
  }
  more(&mut out, page.is_next);
  out
}

pub fn feed(page: &Page<FeedPost>) -> String {
  let mut out = String::new();
  if page.items.is_empty() {
    out.push_str("nothing here yet\n");
  }
  for post in &page.items {
    header(&mut out, 0, &post.author.name, &post.thread);
    if !post.replies.is_empty() {
      let _ = writeln!(out, "  {} replies", post.replies.len());
    }
    out.push('\n');
  }
  more(&mut out, page.is_next);
  out
}

fn comment(out: &mut String, c: &Comment) {
  header(out, 1, &c.author.name, &c.thread);
  for r in &c.replies {
    header(out, 2, &r.author.name, &r.thread);
  }
}

pub fn thread_detail(detail: &ThreadDetail) -> String {
  let mut out = String::new();
  header(&mut out, 0, &detail.author.name, &detail.thread);
  for c in &detail.comments {
    comment(&mut out, c);
  }
  out
}

pub fn user_threads(result: &UserThreads) -> String {
  let mut out = user(&result.user);
  for owned in &result.threads {
    out.push('\n');
    header(&mut out, 0, &result.user.name, &owned.thread);
    for r in &owned.replies {
      header(&mut out, 1, &r.author.name, &r.thread);
    }
  }
  out
}

pub fn activity(replies: &[Reply]) -> String {
  if replies.is_empty() {
    return "no activity yet\n".to_owned();
  }
  let mut out = String::new();
  for r in replies {
    let parent = r.thread.parent_id.map(|id| id.to_string()).unwrap_or_default();
    let _ = writeln!(
      out,
      "{} replied to {} · {}",
      r.author.name,
      parent,
      stamp(&r.thread.created_at),
    );
    let _ = writeln!(out, "  {}", r.thread.text);
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use threads_core::user::AuthorSummary;
  use uuid::Uuid;

  use super::*;

  fn thread(text: &str, parent_id: Option<Uuid>) -> Thread {
    Thread {
      thread_id: Uuid::new_v4(),
      text: text.into(),
      author_id: Uuid::new_v4(),
      parent_id,
      community_id: None,
      children: Vec::new(),
      created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
    }
  }

  fn author(name: &str) -> AuthorSummary {
    AuthorSummary {
      user_id:     Uuid::new_v4(),
      identity_id: name.to_lowercase(),
      name:        name.into(),
      image:       String::new(),
    }
  }

  #[test]
  fn detail_indents_two_levels() {
    let root = thread("root", None);
    let detail = ThreadDetail {
      author:   author("A"),
      comments: vec![Comment {
        thread:  thread("child", Some(root.thread_id)),
        author:  author("B"),
        replies: vec![Reply { thread: thread("grandchild", None), author: author("C") }],
      }],
      thread:   root,
    };

    let text = thread_detail(&detail);
    assert!(text.contains("A · 2024-05-01 12:30"));
    assert!(text.contains("\n    B · "));
    assert!(text.contains("\n        C · "));
    assert!(text.contains("          grandchild\n"));
  }

  #[test]
  fn empty_pages_say_so() {
    let page: Page<User> = Page { items: Vec::new(), is_next: false };
    assert_eq!(users(&page), "no users found\n");
    assert_eq!(activity(&[]), "no activity yet\n");
  }

  #[test]
  fn activity_names_the_parent() {
    let parent = Uuid::new_v4();
    let text = activity(&[Reply { thread: thread("nice", Some(parent)), author: author("B") }]);
    assert!(text.starts_with(&format!("B replied to {parent}")));
    assert!(text.contains("  nice\n"));
  }
}
