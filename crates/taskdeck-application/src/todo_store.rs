//! Task collection store.
//!
//! Every operation goes through [`TodoStore::perform`], which raises the
//! loading flag, clears the previous error and records the new one if the
//! request fails.

use std::future::Future;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use taskdeck_core::error::Result;
use taskdeck_core::task::{Task, TaskDraft, TaskId, TaskList, TaskPatch, TaskStatus};
use taskdeck_interaction::ApiClient;

pub const TASKS_PATH: &str = "/api/tasks";

fn task_path(id: &TaskId) -> String {
    format!("{}/{}", TASKS_PATH, id)
}

/// Observable state of the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoState {
    pub todos: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct TodoStore {
    client: ApiClient,
    state: RwLock<TodoState>,
}

/// Clears `loading` when the request finishes or its future is dropped.
struct LoadingGuard<'a> {
    state: &'a RwLock<TodoState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .loading = false;
    }
}

impl TodoStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: RwLock::new(TodoState::default()),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, TodoState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> TodoState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn todos(&self) -> Vec<Task> {
        self.snapshot().todos
    }

    pub fn loading(&self) -> bool {
        self.snapshot().loading
    }

    pub fn error(&self) -> Option<String> {
        self.snapshot().error
    }

    /// Runs `request` and hands its value to `on_success` together with the
    /// task list. On failure the list is left untouched.
    async fn perform<T, R, Fut, F>(&self, request: Fut, on_success: F) -> Result<R>
    where
        Fut: Future<Output = Result<T>>,
        F: FnOnce(&mut Vec<Task>, T) -> R,
    {
        {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
        }
        let _loading = LoadingGuard { state: &self.state };

        match request.await {
            Ok(value) => Ok(on_success(&mut self.write().todos, value)),
            Err(e) => {
                tracing::warn!("Task request failed: {}", e);
                self.write().error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn fetch_todos(&self) -> Result<()> {
        self.perform(self.client.get::<TaskList>(TASKS_PATH), |todos, list| {
            *todos = list.tasks;
        })
        .await
    }

    /// Fetches a single task and inserts or replaces it in the list.
    pub async fn fetch_todo(&self, id: &TaskId) -> Result<Task> {
        let path = task_path(id);
        self.perform(self.client.get::<Task>(&path), |todos, task| {
            upsert(todos, task.clone());
            task
        })
        .await
    }

    pub async fn add_todo(&self, draft: &TaskDraft) -> Result<Task> {
        self.perform(self.client.post::<_, Task>(TASKS_PATH, draft), |todos, task| {
            todos.push(task.clone());
            task
        })
        .await
    }

    /// Sends `patch` and swaps the matching entry for the server's copy.
    pub async fn update_todo(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task> {
        let path = task_path(id);
        self.perform(self.client.patch::<_, Task>(&path, patch), |todos, task| {
            if let Some(slot) = todos.iter_mut().find(|t| &t.id == id) {
                *slot = task.clone();
            }
            task
        })
        .await
    }

    pub async fn delete_todo(&self, id: &TaskId) -> Result<()> {
        let path = task_path(id);
        self.perform(self.client.delete(&path), |todos, ()| {
            todos.retain(|t| &t.id != id);
        })
        .await
    }

    /// Moves a task to `new_status`. Unknown status names are ignored.
    pub async fn toggle_todo_status(&self, id: &TaskId, new_status: &str) -> Result<()> {
        let Ok(status) = TaskStatus::from_str(new_status) else {
            tracing::debug!("Ignoring unknown status {:?} for task {}", new_status, id);
            return Ok(());
        };
        self.update_todo(id, &TaskPatch::status(status)).await?;
        Ok(())
    }
}

fn upsert(todos: &mut Vec<Task>, task: Task) {
    match todos.iter_mut().find(|t| t.id == task.id) {
        Some(slot) => *slot = task,
        None => todos.push(task),
    }
}
