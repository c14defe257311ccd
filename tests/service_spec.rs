use std::sync::Arc;
use std::thread;

use chrono::{Duration, TimeZone, Utc};
use todo_list::clock::FixedClock;
use todo_list::db::{Database, TaskStore};
use todo_list::error::TaskError;
use todo_list::models::*;
use todo_list::service::TaskService;
use uuid::Uuid;

fn setup() -> (TaskService<Database>, Arc<FixedClock>) {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2030, 6, 1, 8, 0, 0).unwrap(),
    ));
    (TaskService::with_clock(db, clock.clone()), clock)
}

fn input(title: &str) -> CreateTaskInput {
    CreateTaskInput {
        title: title.to_string(),
        ..Default::default()
    }
}

#[test]
fn create_persists_task() {
    let (service, _) = setup();
    let task = service.create(input("water plants !3")).unwrap();

    let stored = service.store().find_by_id(task.id).unwrap();
    assert_eq!(stored, Some(task));
}

#[test]
fn failed_create_persists_nothing() {
    let (service, _) = setup();
    let err = service.create(input("old !before 01.01.2020")).unwrap_err();
    assert!(matches!(err, TaskError::DeadlineInPast));
    assert!(service.store().find_all().unwrap().is_empty());
}

#[test]
fn unknown_ids_are_not_found() {
    let (service, _) = setup();
    let id = Uuid::new_v4();

    assert!(matches!(service.get(id), Err(TaskError::NotFound(missing)) if missing == id));
    assert!(matches!(
        service.edit(id, UpdateTaskInput::default()),
        Err(TaskError::NotFound(_))
    ));
    assert!(matches!(service.delete(id), Err(TaskError::NotFound(_))));
    assert!(matches!(
        service.change_status(id, true),
        Err(TaskError::NotFound(_))
    ));
}

#[test]
fn failed_edit_keeps_stored_task() {
    let (service, _) = setup();
    let task = service.create(input("keep me !2")).unwrap();

    let err = service
        .edit(
            task.id,
            UpdateTaskInput {
                title: Some("keep me !before 2030/06/10".to_string()),
                description: Some("lost".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, TaskError::InvalidDateFormat));
    assert_eq!(service.get(task.id).unwrap(), task);
}

#[test]
fn deadline_set_earlier_is_not_rechecked_by_edits() {
    let (service, clock) = setup();
    let task = service.create(input("report !before 02.06.2030")).unwrap();

    clock.advance(Duration::days(5));

    let edited = service
        .edit(
            task.id,
            UpdateTaskInput {
                description: Some("still working".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(edited.deadline, task.deadline);
    assert_eq!(edited.status, TaskStatus::Active);
}

#[test]
fn status_change_uses_clock() {
    let (service, clock) = setup();
    let task = service.create(input("report !before 02.06.2030")).unwrap();

    let done = service.change_status(task.id, true).unwrap();
    assert_eq!(done.status, TaskStatus::Completed);

    clock.advance(Duration::days(2));
    let reopened = service.change_status(task.id, false).unwrap();
    assert_eq!(reopened.status, TaskStatus::Overdue);

    let late = service.change_status(task.id, true).unwrap();
    assert_eq!(late.status, TaskStatus::Late);
    assert_eq!(service.get(task.id).unwrap().status, TaskStatus::Late);
}

#[test]
fn corrupt_record_is_an_internal_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tasks.db");
    let db = Database::open(path.clone()).expect("Failed to open");
    db.migrate().expect("Failed to migrate");
    let service = TaskService::new(db);

    let id = Uuid::new_v4();
    rusqlite::Connection::open(&path)
        .expect("Failed to open raw connection")
        .execute(
            "INSERT INTO tasks (id, title, description, priority, status, create_date, update_date)
             VALUES (?1, 'broken task', '', 'urgent', 'active', ?2, ?2)",
            [id.to_string(), "2030-06-01T08:00:00+00:00".to_string()],
        )
        .expect("Failed to insert");

    assert!(matches!(service.get(id), Err(TaskError::Internal(_))));
    assert!(matches!(
        service.list(&ListTasksQuery::default()),
        Err(TaskError::Internal(_))
    ));
}

#[test]
fn concurrent_edits_resolve_to_one_write() {
    let (service, _) = setup();
    let task = service.create(input("shared task")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            thread::spawn(move || {
                service
                    .edit(
                        task.id,
                        UpdateTaskInput {
                            description: Some(format!("writer {i}")),
                            ..Default::default()
                        },
                    )
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stored = service.get(task.id).unwrap();
    assert!(stored.description.starts_with("writer "));
    assert_eq!(service.store().find_all().unwrap().len(), 1);
}
