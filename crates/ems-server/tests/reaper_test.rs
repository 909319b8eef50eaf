//! Tests for the expired-session reaper.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use ems_core::models::session::CreateSession;
use ems_core::repository::SessionRepository;
use ems_db::repository::SurrealSessionRepository;
use ems_server::reaper::SessionReaper;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> SurrealSessionRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    ems_db::run_migrations(&db).await.unwrap();
    SurrealSessionRepository::new(db)
}

fn session(id_char: char, hours_from_now: i64) -> CreateSession {
    CreateSession {
        session_id: id_char.to_string().repeat(64),
        user_id: Uuid::new_v4(),
        expires_at: Utc::now() + ChronoDuration::hours(hours_from_now),
        user_agent: None,
        ip_address: None,
    }
}

#[tokio::test]
async fn run_once_deletes_only_expired_sessions() {
    let repo = setup().await;

    repo.create(session('1', -2)).await.unwrap();
    repo.create(session('2', -1)).await.unwrap();
    let live = repo.create(session('3', 8)).await.unwrap();

    let reaper = SessionReaper::new(repo.clone());
    reaper.run_once().await;

    assert!(repo.get(&"1".repeat(64)).await.is_err());
    assert!(repo.get(&"2".repeat(64)).await.is_err());
    assert!(repo.get(&live.session_id).await.is_ok());
}

#[tokio::test]
async fn spawned_reaper_runs_immediately_and_stops_on_shutdown() {
    let repo = setup().await;
    repo.create(session('a', -1)).await.unwrap();

    // Long interval: only the immediate first tick can do the work.
    let handle = SessionReaper::new(repo.clone())
        .with_interval(Duration::from_secs(3600))
        .spawn();

    // Give the first tick a moment to run.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(repo.get(&"a".repeat(64)).await.is_err());

    handle.shutdown().await;
}
