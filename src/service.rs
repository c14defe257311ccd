//! Task use cases.
//!
//! # Responsibility
//! - Load and persist tasks through a [`TaskStore`].
//! - Apply the rules in [`crate::lifecycle`] with the time from a [`Clock`].
//!
//! # Invariants
//! - A failed rule never reaches the store; the persisted task stays as it
//!   was.
//! - The service holds no per-task state; concurrent calls only meet in the
//!   store.

use std::sync::Arc;

use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::db::TaskStore;
use crate::error::{TaskError, TaskResult};
use crate::lifecycle;
use crate::models::*;

pub struct TaskService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Clone> Clone for TaskService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<S: TaskStore> TaskService<S> {
    /// Creates a service on the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create(&self, input: CreateTaskInput) -> TaskResult<Task> {
        let task = lifecycle::new_task(input, self.clock.now())?;
        self.store.save(&task)?;

        tracing::info!(
            task_id = %task.id,
            priority = task.priority.as_str(),
            deadline = ?task.deadline,
            "Created task"
        );
        Ok(task)
    }

    /// Tasks matching the optional status and priority, ordered by creation
    /// date.
    pub fn list(&self, query: &ListTasksQuery) -> TaskResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .store
            .find_all()?
            .into_iter()
            .filter(|t| query.status.map_or(true, |s| t.status == s))
            .filter(|t| query.priority.map_or(true, |p| t.priority == p))
            .collect();

        match query.sort {
            SortDirection::Asc => tasks.sort_by(|a, b| a.create_date.cmp(&b.create_date)),
            SortDirection::Desc => tasks.sort_by(|a, b| b.create_date.cmp(&a.create_date)),
        }

        Ok(tasks)
    }

    pub fn get(&self, id: Uuid) -> TaskResult<Task> {
        self.store.find_by_id(id)?.ok_or(TaskError::NotFound(id))
    }

    pub fn edit(&self, id: Uuid, input: UpdateTaskInput) -> TaskResult<Task> {
        let task = self.get(id)?;
        let edited = lifecycle::apply_edit(&task, input, self.clock.now())?;
        self.store.save(&edited)?;

        tracing::info!(task_id = %id, "Edited task");
        Ok(edited)
    }

    pub fn delete(&self, id: Uuid) -> TaskResult<()> {
        let task = self.get(id)?;
        if !self.store.delete(&task)? {
            return Err(TaskError::NotFound(id));
        }

        tracing::info!(task_id = %id, "Deleted task");
        Ok(())
    }

    /// Marks a task complete (`true`) or reopens it (`false`), classifying it
    /// against its deadline.
    pub fn change_status(&self, id: Uuid, completed: bool) -> TaskResult<Task> {
        let task = self.get(id)?;
        let changed = lifecycle::change_status(&task, completed, self.clock.now());
        self.store.save(&changed)?;

        tracing::info!(
            task_id = %id,
            from = task.status.as_str(),
            to = changed.status.as_str(),
            "Changed task status"
        );
        Ok(changed)
    }
}
