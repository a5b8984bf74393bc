//! `threads`: command-line front end for the Threads forum.
//!
//! # Usage
//!
//! ```text
//! threads profile --identity idp|alice --username alice --name "Alice"
//! threads post --identity idp|alice "hello world"
//! threads feed --page 2
//! THREADS_DATABASE_URL=sqlite://forum.db threads activity --identity idp|alice
//! ```

mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use threads_actions::{Database, Forum, Settings, TracingRevalidator, user::PROFILE_EDIT_PATH};
use threads_core::{
  page::{PageRequest, SortOrder},
  store::{DEFAULT_FEED_PAGE_SIZE, DEFAULT_USER_PAGE_SIZE, UserSearch},
  thread::{NewComment, NewThread},
  user::{ProfileUpdate, User},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "threads", version, about = "Command-line front end for the Threads forum")]
struct Cli {
  /// Path to a TOML config file (database_url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Print results as JSON instead of text.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create or edit your profile; this onboards a new identity.
  Profile {
    #[arg(long, env = "THREADS_IDENTITY")]
    identity: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    name:     String,
    #[arg(long, default_value = "")]
    bio:      String,
    #[arg(long, default_value = "")]
    image:    String,
  },

  /// Show a user's profile.
  User { identity: String },

  /// Show a user's threads with their replies.
  Threads { identity: String },

  /// Post a new top-level thread.
  Post {
    #[arg(long, env = "THREADS_IDENTITY")]
    identity: String,
    text:     String,
  },

  /// Reply to a thread or comment.
  Comment {
    #[arg(long, env = "THREADS_IDENTITY")]
    identity: String,
    #[arg(long)]
    thread:   Uuid,
    text:     String,
  },

  /// List top-level threads, newest first.
  Feed {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_FEED_PAGE_SIZE)]
    size: u32,
  },

  /// Show one thread with two levels of replies.
  Thread { id: Uuid },

  /// Search other users by username or name.
  Search {
    #[arg(long, env = "THREADS_IDENTITY")]
    identity: String,
    #[arg(long, default_value = "")]
    text:     String,
    #[arg(long, default_value_t = 1)]
    page:     u32,
    #[arg(long, default_value_t = DEFAULT_USER_PAGE_SIZE)]
    size:     u32,
    #[arg(long, default_value = "desc", value_parser = parse_sort)]
    sort:     SortOrder,
  },

  /// Replies other users left on your threads.
  Activity {
    #[arg(long, env = "THREADS_IDENTITY")]
    identity: String,
  },
}

fn parse_sort(s: &str) -> Result<SortOrder, threads_core::Error> { SortOrder::parse(s) }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
  let forum = Forum::new(Database::from_settings(&settings), Arc::new(TracingRevalidator));

  run(&forum, cli.command, cli.json).await
}

async fn run(forum: &Forum, command: Command, json: bool) -> Result<()> {
  match command {
    Command::Profile { identity, username, name, bio, image } => {
      let update = ProfileUpdate { identity_id: identity, username, name, bio, image };
      let user = forum.upsert_user(update, PROFILE_EDIT_PATH).await?;
      emit(json, &user, render::user)
    }

    Command::User { identity } => {
      let user = forum
        .get_user(&identity)
        .await?
        .with_context(|| format!("no user with identity {identity:?}"))?;
      emit(json, &user, render::user)
    }

    Command::Threads { identity } => {
      let result = forum
        .list_threads_for_user(&identity)
        .await?
        .with_context(|| format!("no user with identity {identity:?}"))?;
      emit(json, &result, render::user_threads)
    }

    Command::Post { identity, text } => {
      let me = onboarded(forum, &identity).await?;
      let thread = forum
        .create_thread(
          NewThread { text, author_id: me.user_id, community_id: None },
          "/",
        )
        .await?;
      emit(json, &thread, |t| format!("posted {}\n", t.thread_id))
    }

    Command::Comment { identity, thread, text } => {
      let me = onboarded(forum, &identity).await?;
      let comment = forum
        .add_comment(
          NewComment { thread_id: thread, author_id: me.user_id, text },
          &format!("/thread/{thread}"),
        )
        .await?;
      emit(json, &comment, |c| format!("replied {}\n", c.thread_id))
    }

    Command::Feed { page, size } => {
      let feed = forum.list_top_level_threads(PageRequest::new(page, size)).await?;
      emit(json, &feed, render::feed)
    }

    Command::Thread { id } => {
      let detail = forum
        .get_thread_by_id(id)
        .await?
        .with_context(|| format!("no thread {id}"))?;
      emit(json, &detail, render::thread_detail)
    }

    Command::Search { identity, text, page, size, sort } => {
      onboarded(forum, &identity).await?;
      let query = UserSearch {
        exclude_identity_id: identity,
        text,
        page: PageRequest::new(page, size),
        sort,
      };
      let users = forum.search_users(&query).await?;
      emit(json, &users, render::users)
    }

    Command::Activity { identity } => {
      let me = onboarded(forum, &identity).await?;
      let activity = forum.get_activity(me.user_id).await?;
      emit(json, &activity, |a| render::activity(a))
    }
  }
}

/// Look up the caller, requiring a completed profile.
async fn onboarded(forum: &Forum, identity: &str) -> Result<User> {
  match forum.get_user(identity).await? {
    Some(user) if user.onboarded => Ok(user),
    _ => bail!("identity {identity:?} is not onboarded; run `threads profile` first"),
  }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    print!("{}", text(value));
  }
  Ok(())
}
