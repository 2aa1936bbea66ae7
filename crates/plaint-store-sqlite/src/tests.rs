//! Integration tests for `SqliteStore`, on its own and under a [`Ledger`].

use std::sync::Arc;

use chrono::Utc;
use plaint_core::{
  Error as CoreError,
  complaint::{ComplaintId, NewComplaint},
  geo::{Locator, UNKNOWN_COUNTRY},
  ledger::Ledger,
  store::{ComplaintStore, InsertOutcome},
};

use crate::{SqliteStore, schema::SCHEMA, store::is_unique_violation};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_complaint(product_id: &str, reporter: &str) -> NewComplaint {
  NewComplaint {
    product_id: product_id.into(),
    content:    "Broken screen".into(),
    created_at: Utc::now(),
    reporter:   reporter.into(),
    country:    "France".into(),
  }
}

async fn insert(s: &SqliteStore, product_id: &str, reporter: &str) -> plaint_core::complaint::Complaint {
  match s.insert(new_complaint(product_id, reporter)).await.unwrap() {
    InsertOutcome::Inserted(c) => c,
    InsertOutcome::Conflict => panic!("unexpected conflict for {product_id}/{reporter}"),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_by_both_keys() {
  let s = store().await;
  let c = insert(&s, "P1", "alice").await;
  assert_eq!(c.counter, 1);

  let by_id = s.find_by_id(c.id).await.unwrap().unwrap();
  assert_eq!(by_id, c);

  let by_key = s.find_by_natural_key("P1", "alice").await.unwrap().unwrap();
  assert_eq!(by_key.id, c.id);
}

#[tokio::test]
async fn lookups_of_missing_rows_return_none() {
  let s = store().await;
  assert!(s.find_by_id(ComplaintId(1)).await.unwrap().is_none());
  assert!(s.find_by_natural_key("P1", "alice").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_natural_key_is_a_conflict() {
  let s = store().await;
  insert(&s, "P1", "alice").await;

  let second = s.insert(new_complaint("P1", "alice")).await.unwrap();
  assert!(matches!(second, InsertOutcome::Conflict));
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn natural_key_is_the_pair_not_either_half() {
  let s = store().await;
  insert(&s, "P1", "alice").await;
  insert(&s, "P1", "bob").await;
  insert(&s, "P2", "alice").await;
  assert_eq!(s.count().await.unwrap(), 3);
}

#[tokio::test]
async fn increment_bumps_only_the_counter() {
  let s = store().await;
  let original = insert(&s, "P1", "alice").await;

  let bumped = s.increment("P1", "alice").await.unwrap().unwrap();
  assert_eq!(bumped.id, original.id);
  assert_eq!(bumped.counter, 2);
  assert_eq!(bumped.content, original.content);
  assert_eq!(bumped.country, original.country);
  assert_eq!(bumped.created_at, original.created_at);

  let again = s.increment("P1", "alice").await.unwrap().unwrap();
  assert_eq!(again.counter, 3);
}

#[tokio::test]
async fn increment_of_unknown_key_touches_nothing() {
  let s = store().await;
  insert(&s, "P1", "alice").await;

  assert!(s.increment("P1", "bob").await.unwrap().is_none());
  assert!(s.increment("P2", "alice").await.unwrap().is_none());
  assert_eq!(s.find_by_natural_key("P1", "alice").await.unwrap().unwrap().counter, 1);
}

#[tokio::test]
async fn set_content_keeps_counter_and_write_once_fields() {
  let s = store().await;
  let original = insert(&s, "P1", "alice").await;
  s.increment("P1", "alice").await.unwrap();

  let updated = s.set_content(original.id, "new").await.unwrap().unwrap();
  assert_eq!(updated.content, "new");
  assert_eq!(updated.counter, 2);
  assert_eq!(updated.country, "France");
  assert_eq!(updated.product_id, "P1");
  assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn set_content_of_missing_row_is_none() {
  let s = store().await;
  insert(&s, "P1", "alice").await;
  assert!(s.set_content(ComplaintId(999), "new").await.unwrap().is_none());
}

#[test]
fn only_unique_violations_count_as_conflicts() {
  let conn = rusqlite::Connection::open_in_memory().unwrap();
  conn.execute_batch(SCHEMA).unwrap();
  let insert = |product_id: &str, content: Option<&str>, counter: i64| {
    conn.execute(
      "INSERT INTO complaints (product_id, reporter, content, created_at, country, counter)
       VALUES (?1, 'alice', ?2, '2024-01-01T00:00:00+00:00', 'France', ?3)",
      rusqlite::params![product_id, content, counter],
    )
  };

  insert("P1", Some("x"), 1).unwrap();

  let duplicate = insert("P1", Some("x"), 1).unwrap_err();
  assert!(is_unique_violation(&duplicate), "{duplicate:?}");

  let check = insert("P2", Some("x"), 0).unwrap_err();
  assert!(!is_unique_violation(&check), "{check:?}");

  let not_null = insert("P3", None, 1).unwrap_err();
  assert!(!is_unique_violation(&not_null), "{not_null:?}");
}

#[tokio::test]
async fn list_all_is_in_insertion_order() {
  let s = store().await;
  let a = insert(&s, "P1", "alice").await;
  let b = insert(&s, "P2", "bob").await;
  let c = insert(&s, "P3", "carol").await;

  let ids: Vec<_> = s.list_all().await.unwrap().into_iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![a.id, b.id, c.id]);
}

fn temp_db_path(tag: &str) -> std::path::PathBuf {
  std::env::temp_dir().join(format!(
    "plaint-store-{tag}-{}-{}.sqlite",
    std::process::id(),
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ))
}

fn remove_db(path: &std::path::Path) {
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let path = temp_db_path("reopen");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    insert(&s, "P1", "alice").await.id
  };

  let reopened = SqliteStore::open(&path).await.unwrap();
  let c = reopened.find_by_id(id).await.unwrap().unwrap();
  assert_eq!(c.reporter, "alice");

  drop(reopened);
  remove_db(&path);
}

#[tokio::test]
async fn counter_keeps_counting_past_u32() {
  let path = temp_db_path("wide-counter");
  let s = SqliteStore::open(&path).await.unwrap();
  insert(&s, "P1", "alice").await;

  let start = i64::from(u32::MAX);
  rusqlite::Connection::open(&path)
    .unwrap()
    .execute("UPDATE complaints SET counter = ?1", [start])
    .unwrap();

  let bumped = s.increment("P1", "alice").await.unwrap().unwrap();
  assert_eq!(bumped.counter, u64::from(u32::MAX) + 1);

  drop(s);
  remove_db(&path);
}

// ─── Ledger over SQLite ──────────────────────────────────────────────────────

struct FixedLocator(&'static str);

impl Locator for FixedLocator {
  async fn locate(&self, ip: &str) -> String {
    if ip == "1.2.3.4" { self.0.to_owned() } else { UNKNOWN_COUNTRY.to_owned() }
  }
}

async fn ledger() -> Ledger<SqliteStore, FixedLocator> {
  Ledger::new(store().await, FixedLocator("France"))
}

#[tokio::test]
async fn repeat_submission_scenario() {
  let l = ledger().await;

  let first = l.submit("P1", "Broken screen", "alice", "1.2.3.4").await.unwrap();
  assert_eq!(first.counter, 1);
  assert_eq!(first.country, "France");

  let second = l.submit("P1", "Different text", "alice", "5.6.7.8").await.unwrap();
  assert_eq!(second.id, first.id);
  assert_eq!(second.counter, 2);
  assert_eq!(second.content, "Broken screen");
  assert_eq!(second.country, "France");
}

#[tokio::test]
async fn find_all_after_three_keys_and_one_repeat() {
  let l = ledger().await;
  l.submit("P1", "a", "alice", "1.2.3.4").await.unwrap();
  l.submit("P2", "b", "bob", "1.2.3.4").await.unwrap();
  l.submit("P3", "c", "carol", "1.2.3.4").await.unwrap();
  l.submit("P2", "b again", "bob", "1.2.3.4").await.unwrap();

  let all = l.find_all().await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[1].counter, 2);
}

#[tokio::test]
async fn update_content_round_trip_and_not_found() {
  let l = ledger().await;
  let c = l.submit("P1", "old", "alice", "1.2.3.4").await.unwrap();

  let updated = l.update_content(c.id, "new").await.unwrap();
  assert_eq!(updated.content, "new");
  assert_eq!(updated.counter, 1);
  assert_eq!(l.find_by_id(c.id).await.unwrap().content, "new");

  let err = l.update_content(ComplaintId(404), "x").await.unwrap_err();
  assert!(matches!(err, CoreError::NotFound(ComplaintId(404))));
  assert_eq!(l.store().count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_submissions_for_one_key_yield_one_row() {
  const N: u64 = 200;
  let l = Arc::new(ledger().await);

  let handles: Vec<_> = (0..N)
    .map(|i| {
      let l = l.clone();
      tokio::spawn(async move {
        l.submit("P1", &format!("report {i}"), "alice", "1.2.3.4").await
      })
    })
    .collect();

  let mut errors = Vec::new();
  for h in handles {
    if let Err(e) = h.await.unwrap() {
      errors.push(e.to_string());
    }
  }
  assert!(errors.is_empty(), "{} submissions failed: {:?}", errors.len(), errors.first());

  let all = l.find_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].counter, N);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_submissions_across_keys_count_independently() {
  const KEYS: u64 = 10;
  const PER_KEY: u64 = 30;
  let l = Arc::new(ledger().await);

  let handles: Vec<_> = (0..KEYS * PER_KEY)
    .map(|i| {
      let l = l.clone();
      tokio::spawn(async move {
        let product_id = format!("P{}", i % KEYS);
        l.submit(&product_id, "x", "alice", "1.2.3.4").await
      })
    })
    .collect();
  for h in handles {
    h.await.unwrap().unwrap();
  }

  let all = l.find_all().await.unwrap();
  assert_eq!(all.len() as u64, KEYS);
  assert!(all.iter().all(|c| c.counter == PER_KEY), "{all:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_and_edits_both_land() {
  let l = Arc::new(ledger().await);
  let c = l.submit("P1", "old", "alice", "1.2.3.4").await.unwrap();

  let bumps = {
    let l = l.clone();
    tokio::spawn(async move {
      for _ in 0..50 {
        l.submit("P1", "ignored", "alice", "1.2.3.4").await.unwrap();
      }
    })
  };
  let edit = {
    let l = l.clone();
    tokio::spawn(async move { l.update_content(c.id, "edited").await.unwrap() })
  };
  bumps.await.unwrap();
  edit.await.unwrap();

  let stored = l.find_by_id(c.id).await.unwrap();
  assert_eq!(stored.counter, 51);
  assert_eq!(stored.content, "edited");
}
