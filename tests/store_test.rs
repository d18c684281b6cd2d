use std::time::Duration;

use chrono::NaiveDate;

use taskboard::export;
use taskboard::model::{Importance, Status, TaskInput, View};
use taskboard::ops::ListOrder;
use taskboard::store::Store;
use taskboard::validate::ValidationError;
use taskboard::views::{self, CompletedSort, ViewQuery};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn open_store(ttl: Duration) -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let store = Store::open(path.to_str().unwrap(), ttl).unwrap();
    (dir, store)
}

fn input(title: &str) -> TaskInput {
    TaskInput {
        end_date: day(7),
        people: "lee".into(),
        importance: Importance::ImportantNotUrgent,
        view: View::Weekly,
        notes: "bring receipts".into(),
        attachments: "https://example.com/doc".into(),
        ..TaskInput::new(title, day(3))
    }
}

/// The query for every tab a task can appear in.
fn all_queries() -> Vec<ViewQuery> {
    let mut queries: Vec<ViewQuery> = View::ALL.into_iter().map(ViewQuery::Time).collect();
    queries.extend(Importance::ALL.into_iter().map(ViewQuery::Priority));
    queries.push(ViewQuery::Completed(CompletedSort::EndDateDesc));
    queries.push(ViewQuery::Completed(CompletedSort::Importance));
    queries
}

fn appears_in(store: &Store, id: i64) -> Vec<ViewQuery> {
    let tasks = store.list().unwrap();
    all_queries()
        .into_iter()
        .filter(|q| views::select(&tasks, q).iter().any(|t| t.id == id))
        .collect()
}

#[test]
fn empty_title_is_rejected_and_store_unchanged() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    store.add(&input("keep")).unwrap();

    let err = store.add(&input("   ")).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::EmptyTitle)
    );
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn end_before_start_is_rejected() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    let mut bad = input("backwards");
    bad.start_date = day(9);
    bad.end_date = day(8);
    let err = store.add(&bad).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::EndBeforeStart { .. })
    ));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn inserted_task_is_listed_once_with_same_fields() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    let id = store.add(&input("renew passport")).unwrap();

    let tasks = store.list().unwrap();
    let matching: Vec<_> = tasks.iter().filter(|t| t.id == id).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].to_input(), input("renew passport"));
}

#[test]
fn padded_text_is_stored_as_given() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    let mut padded = input("  padded title ");
    padded.people = " lee, sam ".into();
    padded.notes = "\n  indented notes\n".into();
    let id = store.add(&padded).unwrap();

    let listed = store.list().unwrap();
    let task = listed.iter().find(|t| t.id == id).unwrap();
    assert_eq!(task.title, "  padded title ");
    assert_eq!(task.to_input(), padded);
}

#[test]
fn complete_changes_only_status_and_moves_views() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    let id = store.add(&input("book flights")).unwrap();
    let before = store.get(id).unwrap();
    assert_eq!(
        appears_in(&store, id),
        vec![
            ViewQuery::Time(View::Weekly),
            ViewQuery::Priority(Importance::ImportantNotUrgent)
        ]
    );

    store.complete(id).unwrap();
    let after = store.get(id).unwrap();
    assert_eq!(after.status, Status::Complete);
    assert_eq!(
        taskboard::model::Task {
            status: before.status,
            ..after.clone()
        },
        before
    );
    assert_eq!(
        appears_in(&store, id),
        vec![
            ViewQuery::Completed(CompletedSort::EndDateDesc),
            ViewQuery::Completed(CompletedSort::Importance)
        ]
    );

    let err = store.complete(id).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::AlreadyComplete(id))
    );
    assert_eq!(store.get(id).unwrap(), after);
}

#[test]
fn deleted_task_stays_gone_after_cache_expiry() {
    let (_dir, store) = open_store(Duration::from_millis(20));
    let id = store.add(&input("old chore")).unwrap();
    assert_eq!(appears_in(&store, id).len(), 2);

    store.remove(id).unwrap();
    assert!(appears_in(&store, id).is_empty());
    std::thread::sleep(Duration::from_millis(40));
    assert!(appears_in(&store, id).is_empty());
    assert!(store.get(id).is_err());
}

#[test]
fn update_keeps_id_and_created_at() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    let id = store.add(&input("draft")).unwrap();
    let before = store.get(id).unwrap();

    let mut changed = input("final");
    changed.status = Status::Stuck;
    changed.view = View::Yearly;
    store.update(id, &changed).unwrap();

    let after = store.get(id).unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.to_input(), changed);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    let first = store.add(&input("a")).unwrap();
    store.remove(first).unwrap();
    let second = store.add(&input("b")).unwrap();
    assert!(second > first);
}

#[test]
fn export_row_count_matches_store() {
    let (dir, store) = open_store(Duration::from_secs(60));
    for title in ["a", "b, with comma", "c \"quoted\""] {
        store.add(&input(title)).unwrap();
    }
    let id = store.add(&input("d")).unwrap();
    store.remove(id).unwrap();

    let tasks = store.list_uncached(ListOrder::Id).unwrap();
    let (path, rows) = export::export_to_dir(&tasks, dir.path(), day(31)).unwrap();
    assert_eq!(rows, store.count().unwrap());
    assert!(path.ends_with("tasks_2025-03-31.csv"));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.records().count(), 3);
}

#[test]
fn exported_file_imports_into_fresh_store() {
    let (dir, store) = open_store(Duration::from_secs(60));
    store.add(&input("one")).unwrap();
    let id = store.add(&input("two")).unwrap();
    store.complete(id).unwrap();

    let tasks = store.list_uncached(ListOrder::Id).unwrap();
    let (path, _) = export::export_to_dir(&tasks, dir.path(), day(1)).unwrap();

    let (_other_dir, other) = open_store(Duration::from_secs(60));
    let inputs = export::read_csv(std::fs::File::open(path).unwrap()).unwrap();
    assert_eq!(other.import(&inputs).unwrap(), 2);

    let imported = other.list_uncached(ListOrder::Id).unwrap();
    let originals: Vec<_> = tasks.iter().map(|t| t.to_input()).collect();
    let copies: Vec<_> = imported.iter().map(|t| t.to_input()).collect();
    assert_eq!(copies, originals);
}

#[test]
fn import_with_one_bad_row_inserts_nothing() {
    let (_dir, store) = open_store(Duration::from_secs(60));
    let mut bad = input("bad");
    bad.end_date = day(1);
    let err = store
        .import(&[input("fine"), bad, input("also fine")])
        .unwrap_err();
    assert!(err.downcast_ref::<ValidationError>().is_some());
    assert_eq!(store.count().unwrap(), 0);
}
