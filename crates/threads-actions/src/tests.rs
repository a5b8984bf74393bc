//! Action-layer tests against an in-memory store.

use std::{
  error::Error as _,
  sync::{Arc, Mutex},
};

use threads_core::{
  page::PageRequest,
  store::UserSearch,
  thread::{NewComment, NewThread},
  user::{ProfileUpdate, User},
};
use uuid::Uuid;

use crate::{
  user::PROFILE_EDIT_PATH, Database, Forum, NoopRevalidator, NotConnected, Revalidate, Settings,
};

/// Collects every revalidated path.
#[derive(Default)]
struct RecordingRevalidator {
  paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
  fn paths(&self) -> Vec<String> { self.paths.lock().unwrap().clone() }
}

impl Revalidate for RecordingRevalidator {
  fn revalidate_path(&self, path: &str) {
    self.paths.lock().unwrap().push(path.to_owned());
  }
}

fn forum_with(url: Option<&str>) -> (Forum, Arc<RecordingRevalidator>) {
  let recorder = Arc::new(RecordingRevalidator::default());
  let forum = Forum::new(
    Database::new(url.map(str::to_owned)),
    recorder.clone(),
  );
  (forum, recorder)
}

fn forum() -> (Forum, Arc<RecordingRevalidator>) { forum_with(Some(":memory:")) }

fn profile(identity_id: &str, name: &str) -> ProfileUpdate {
  ProfileUpdate {
    identity_id: identity_id.into(),
    username:    identity_id.to_uppercase(),
    name:        name.into(),
    bio:         String::new(),
    image:       format!("/avatars/{identity_id}.png"),
  }
}

async fn onboard(forum: &Forum, identity_id: &str, name: &str) -> User {
  forum
    .upsert_user(profile(identity_id, name), "/onboarding")
    .await
    .unwrap()
}

// ─── Connection manager ──────────────────────────────────────────────────────

#[tokio::test]
async fn connect_without_url_is_a_no_op() {
  let db = Database::new(None);
  db.connect().await;
  db.connect().await;
  assert!(!db.is_connected());
  assert!(db.store().is_none());
}

#[tokio::test]
async fn actions_without_connection_fail_as_not_connected() {
  let (forum, _) = forum_with(None);

  let err = forum.get_user("anyone").await.unwrap_err();
  assert_eq!(err.context, "Failed to fetch user data");
  assert!(err.source().unwrap().downcast_ref::<NotConnected>().is_some());
  assert_eq!(err.to_string(), "Failed to fetch user data: database is not connected");
}

#[tokio::test]
async fn failed_connect_is_swallowed_and_retried() {
  let dir = std::env::temp_dir().join(format!("threads-{}", Uuid::new_v4()));
  let url = format!("sqlite://{}", dir.join("db.sqlite").display());
  let db = Database::new(Some(url));

  // The parent directory does not exist yet, so opening fails.
  db.connect().await;
  assert!(!db.is_connected());

  // Nothing was cached: once the path is reachable the next call connects.
  std::fs::create_dir_all(&dir).unwrap();
  db.connect().await;
  let connected = db.is_connected();
  std::fs::remove_dir_all(&dir).ok();
  assert!(connected);
}

#[tokio::test]
async fn connect_is_memoized() {
  let (forum, _) = forum();
  onboard(&forum, "a", "A").await;
  assert!(forum.database().is_connected());

  // A second connect must reuse the same in-memory database, or the user
  // written above would be gone.
  forum.database().connect().await;
  assert!(forum.get_user("a").await.unwrap().is_some());
}

#[test]
fn settings_load_from_file() {
  let path = std::env::temp_dir().join(format!("threads-{}.toml", Uuid::new_v4()));
  std::fs::write(&path, "database_url = \"sqlite::memory:\"\n").unwrap();

  let settings = Settings::load(Some(&path)).unwrap();
  std::fs::remove_file(&path).ok();

  assert_eq!(settings.database_url.as_deref(), Some("sqlite::memory:"));
  assert!(Database::from_settings(&settings).store().is_none());
}

#[test]
fn settings_missing_file_is_not_an_error() {
  let path = std::env::temp_dir().join(format!("threads-{}.toml", Uuid::new_v4()));
  assert!(Settings::load(Some(&path)).is_ok());
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_revalidates_only_profile_edit() {
  let (forum, recorder) = forum();

  onboard(&forum, "a", "A").await;
  assert!(recorder.paths().is_empty());

  let user = forum
    .upsert_user(profile("a", "A edited"), PROFILE_EDIT_PATH)
    .await
    .unwrap();
  assert_eq!(user.name, "A edited");
  assert_eq!(user.username, "a");
  assert_eq!(recorder.paths(), vec![PROFILE_EDIT_PATH.to_owned()]);
}

#[tokio::test]
async fn get_user_missing_is_none() {
  let (forum, _) = forum();
  assert!(forum.get_user("ghost").await.unwrap().is_none());
  assert!(forum.list_threads_for_user("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn search_users_excludes_caller() {
  let (forum, _) = forum();
  onboard(&forum, "me", "Me").await;
  onboard(&forum, "you", "You").await;

  let page = forum.search_users(&UserSearch::new("me")).await.unwrap();
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].identity_id, "you");
  assert!(!page.is_next);
}

// ─── Threads ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_thread_comment_activity() {
  let (forum, recorder) = forum();
  let a = onboard(&forum, "a", "Author").await;
  let b = onboard(&forum, "b", "Replier").await;

  let t = forum
    .create_thread(
      NewThread { text: "hello".into(), author_id: a.user_id, community_id: None },
      "/",
    )
    .await
    .unwrap();

  let detail = forum.get_thread_by_id(t.thread_id).await.unwrap().unwrap();
  assert_eq!(detail.thread.text, "hello");
  assert_eq!(detail.author.user_id, a.user_id);
  assert!(detail.comments.is_empty());

  let thread_path = format!("/thread/{}", t.thread_id);
  forum
    .add_comment(
      NewComment { thread_id: t.thread_id, author_id: b.user_id, text: "hi".into() },
      &thread_path,
    )
    .await
    .unwrap();

  let detail = forum.get_thread_by_id(t.thread_id).await.unwrap().unwrap();
  assert_eq!(detail.comments.len(), 1);
  assert_eq!(detail.comments[0].thread.text, "hi");
  assert_eq!(detail.comments[0].author.user_id, b.user_id);

  let activity = forum.get_activity(a.user_id).await.unwrap();
  assert_eq!(activity.len(), 1);
  assert_eq!(activity[0].thread.text, "hi");
  assert_eq!(activity[0].author.name, "Replier");
  assert!(forum.get_activity(b.user_id).await.unwrap().is_empty());

  assert_eq!(recorder.paths(), vec!["/".to_owned(), thread_path]);

  let profile = forum.list_threads_for_user("a").await.unwrap().unwrap();
  assert_eq!(profile.threads.len(), 1);
  assert_eq!(profile.threads[0].replies.len(), 1);
}

#[tokio::test]
async fn add_comment_to_missing_thread_fails_without_revalidating() {
  let (forum, recorder) = forum();
  let a = onboard(&forum, "a", "A").await;

  let missing = Uuid::new_v4();
  let err = forum
    .add_comment(
      NewComment { thread_id: missing, author_id: a.user_id, text: "orphan".into() },
      "/thread/missing",
    )
    .await
    .unwrap_err();

  assert_eq!(err.context, "Failed to comment in the thread");
  assert!(err.to_string().contains(&format!("thread not found: {missing}")));
  let source = err
    .source()
    .and_then(|e| e.downcast_ref::<threads_store_sqlite::Error>())
    .unwrap();
  assert!(source.is_not_found());
  assert!(recorder.paths().is_empty());

  // Nothing was written: A has no replies to see and the feed is empty.
  assert!(forum.get_activity(a.user_id).await.unwrap().is_empty());
  let feed = forum.list_top_level_threads(PageRequest::new(1, 10)).await.unwrap();
  assert!(feed.items.is_empty());
}

#[tokio::test]
async fn noop_revalidator_still_writes() {
  let forum = Forum::new(Database::new(Some(":memory:".into())), Arc::new(NoopRevalidator));
  let a = onboard(&forum, "a", "A").await;
  let t = forum
    .create_thread(
      NewThread { text: "quiet".into(), author_id: a.user_id, community_id: None },
      "/",
    )
    .await
    .unwrap();

  let user = forum.get_user("a").await.unwrap().unwrap();
  assert_eq!(user.threads, vec![t.thread_id]);
}

#[tokio::test]
async fn get_thread_by_id_missing_is_none() {
  let (forum, _) = forum();
  assert!(forum.get_thread_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn feed_pagination_boundaries() {
  let (forum, _) = forum();
  let a = onboard(&forum, "a", "A").await;
  for i in 0..4 {
    forum
      .create_thread(
        NewThread { text: format!("post {i}"), author_id: a.user_id, community_id: None },
        "/",
      )
      .await
      .unwrap();
  }

  let p1 = forum.list_top_level_threads(PageRequest::new(1, 2)).await.unwrap();
  let p2 = forum.list_top_level_threads(PageRequest::new(2, 2)).await.unwrap();
  assert!(p1.is_next);
  assert!(!p2.is_next);

  let first: Vec<_> = p1.items.iter().map(|p| p.thread.thread_id).collect();
  assert!(p2.items.iter().all(|p| !first.contains(&p.thread.thread_id)));
}
