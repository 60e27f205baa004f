use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{Task, TaskCreate, TaskUpdate};

/// In-memory task store with an ownership filter on every operation.
///
/// Every query carries an equality predicate on the owning subject:
/// a lookup that misses and a lookup that hits a row owned by someone
/// else are indistinguishable to callers. Creation stamps the owner from
/// the authenticated subject unconditionally, and no update path touches
/// `user_id` after creation.
#[derive(Clone, Default)]
pub struct TaskStore {
    tasks: Arc<RwLock<HashMap<i64, Task>>>,
    next_id: Arc<AtomicI64>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tasks owned by `owner`, ordered by id.
    pub async fn list(&self, owner: &str) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|t| t.id);
        owned
    }

    /// Create a task owned by `owner`. The payload cannot influence the
    /// owner; `user_id` always comes from the authenticated subject.
    pub async fn create(&self, owner: &str, data: TaskCreate) -> Task {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        let task = Task {
            id,
            user_id: owner.to_string(),
            title: data.title,
            description: data.description,
            completed: data.completed,
            created_at: now,
            updated_at: now,
        };

        self.tasks.write().await.insert(id, task.clone());
        task
    }

    pub async fn get(&self, owner: &str, id: i64) -> Option<Task> {
        self.tasks
            .read()
            .await
            .get(&id)
            .filter(|t| t.user_id == owner)
            .cloned()
    }

    /// Apply the present fields of `changes` to the task, if it exists and
    /// belongs to `owner`. `user_id` is never written.
    pub async fn update(&self, owner: &str, id: i64, changes: TaskUpdate) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).filter(|t| t.user_id == owner)?;

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();

        Some(task.clone())
    }

    /// Returns true if the task existed, belonged to `owner`, and was
    /// removed.
    pub async fn delete(&self, owner: &str, id: i64) -> bool {
        let mut tasks = self.tasks.write().await;
        match tasks.get(&id) {
            Some(t) if t.user_id == owner => {
                tasks.remove(&id);
                true
            }
            _ => false,
        }
    }

    pub async fn toggle_completed(&self, owner: &str, id: i64) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).filter(|t| t.user_id == owner)?;

        task.completed = !task.completed;
        task.updated_at = Utc::now();

        Some(task.clone())
    }
}
