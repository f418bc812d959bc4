use std::collections::HashSet;

use tracing::{debug, error, warn};

use crate::io::store::{DurableStore, StoreError};
use crate::model::task::{Collection, Task, TaskId, normalize_title, now_millis};
use crate::ops::ids::IdGenerator;

/// Error type for task operations. Both variants leave the repository
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("no {collection} task with id {id}")]
    NotFound { id: TaskId, collection: Collection },
}

/// Read-only view of both collections, in display order
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub active: &'a [Task],
    pub archived: &'a [Task],
}

impl<'a> Snapshot<'a> {
    pub fn collection(&self, collection: Collection) -> &'a [Task] {
        match collection {
            Collection::Active => self.active,
            Collection::Archived => self.archived,
        }
    }
}

/// Owner of the active and archived task lists.
///
/// Both lists are most-recent-first. Every successful mutation writes both
/// lists to the store before returning. A failed write does not undo the
/// mutation; it is logged and kept for [`TaskRepository::take_save_failure`].
pub struct TaskRepository<S: DurableStore> {
    active: Vec<Task>,
    archived: Vec<Task>,
    store: S,
    ids: IdGenerator,
    save_failure: Option<StoreError>,
}

impl<S: DurableStore> TaskRepository<S> {
    /// Load both collections from `store`, repairing records that break the
    /// collection invariants.
    pub fn open(store: S) -> Self {
        let (active, archived, repairs) = reconcile(store.load_active(), store.load_archived());
        let ids = IdGenerator::seeded(active.iter().chain(archived.iter()).map(|t| &t.id));

        let mut repo = TaskRepository {
            active,
            archived,
            store,
            ids,
            save_failure: None,
        };

        if repairs.any() {
            warn!(
                trimmed_title = repairs.trimmed_title,
                dropped_blank = repairs.dropped_blank,
                dropped_duplicate = repairs.dropped_duplicate,
                cleared_completed = repairs.cleared_completed,
                stamped_completed = repairs.stamped_completed,
                "repaired stored tasks"
            );
            repo.persist(Collection::Active);
        }
        debug!(
            active = repo.active.len(),
            archived = repo.archived.len(),
            "opened task repository"
        );
        repo
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a task at the top of the active list.
    pub fn add(&mut self, title: &str) -> Result<Task, TaskError> {
        let title = normalize_title(title).ok_or(TaskError::EmptyTitle)?;
        let task = Task::new(self.ids.next_id(), title, now_millis());
        debug!(id = %task.id, "add");
        self.active.insert(0, task.clone());
        self.persist(Collection::Active);
        Ok(task)
    }

    /// Move an active task to the top of the archive.
    pub fn complete(&mut self, id: &TaskId) -> Result<Task, TaskError> {
        let pos = self.require(Collection::Active, id)?;
        let mut task = self.active.remove(pos);
        task.completed_at = Some(now_millis());
        debug!(id = %task.id, "complete");
        self.archived.insert(0, task.clone());
        self.persist(Collection::Archived);
        Ok(task)
    }

    /// Move an archived task back to the top of the active list.
    pub fn restore(&mut self, id: &TaskId) -> Result<Task, TaskError> {
        let pos = self.require(Collection::Archived, id)?;
        let mut task = self.archived.remove(pos);
        task.completed_at = None;
        debug!(id = %task.id, "restore");
        self.active.insert(0, task.clone());
        self.persist(Collection::Active);
        Ok(task)
    }

    /// Replace an active task's title in place. Archived titles are frozen.
    pub fn rename(&mut self, id: &TaskId, title: &str) -> Result<(), TaskError> {
        let pos = self.require(Collection::Active, id)?;
        let title = normalize_title(title).ok_or(TaskError::EmptyTitle)?;
        debug!(id = %id, "rename");
        self.active[pos].title = title;
        self.persist(Collection::Active);
        Ok(())
    }

    /// Delete a task from the named collection only.
    pub fn remove(&mut self, id: &TaskId, collection: Collection) -> Result<Task, TaskError> {
        let pos = self.require(collection, id)?;
        let task = self.list_mut(collection).remove(pos);
        debug!(id = %task.id, %collection, "remove");
        self.persist(collection);
        Ok(task)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            active: &self.active,
            archived: &self.archived,
        }
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    pub fn archived(&self) -> &[Task] {
        &self.archived
    }

    /// Find a task in either collection
    pub fn get(&self, id: &TaskId) -> Option<(Collection, &Task)> {
        self.active
            .iter()
            .find(|t| &t.id == id)
            .map(|t| (Collection::Active, t))
            .or_else(|| {
                self.archived
                    .iter()
                    .find(|t| &t.id == id)
                    .map(|t| (Collection::Archived, t))
            })
    }

    /// Which collection holds `id`, if any
    pub fn find(&self, id: &TaskId) -> Option<Collection> {
        self.get(id).map(|(collection, _)| collection)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn archived_len(&self) -> usize {
        self.archived.len()
    }

    /// Title of an active task
    pub fn active_title(&self, id: &TaskId) -> Option<&str> {
        self.active
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.title.as_str())
    }

    /// The most recent failed write since the last call, if any
    pub fn take_save_failure(&mut self) -> Option<StoreError> {
        self.save_failure.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn list(&self, collection: Collection) -> &[Task] {
        match collection {
            Collection::Active => &self.active,
            Collection::Archived => &self.archived,
        }
    }

    fn list_mut(&mut self, collection: Collection) -> &mut Vec<Task> {
        match collection {
            Collection::Active => &mut self.active,
            Collection::Archived => &mut self.archived,
        }
    }

    fn require(&self, collection: Collection, id: &TaskId) -> Result<usize, TaskError> {
        self.list(collection)
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TaskError::NotFound {
                id: id.clone(),
                collection,
            })
    }

    /// Write both collections, starting with `gaining`, the one a moved task
    /// lands in. An interrupted pair of writes then leaves the task stored
    /// twice, which `reconcile` repairs, rather than not at all. Both writes
    /// are attempted even if the first one fails.
    fn persist(&mut self, gaining: Collection) {
        let results = [gaining, gaining.other()].map(|collection| match collection {
            Collection::Active => self.store.save_active(&self.active),
            Collection::Archived => self.store.save_archived(&self.archived),
        });
        for result in results {
            if let Err(e) = result {
                error!(error = %e, "could not save tasks; changes are kept in memory only");
                self.save_failure = Some(e);
            }
        }
    }
}

/// Counts of records changed while loading
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Repairs {
    pub trimmed_title: usize,
    pub dropped_blank: usize,
    pub dropped_duplicate: usize,
    pub cleared_completed: usize,
    pub stamped_completed: usize,
}

impl Repairs {
    pub fn any(&self) -> bool {
        *self != Repairs::default()
    }
}

/// Bring loaded collections back in line with the invariants: non-blank
/// trimmed titles, each id at most once across both lists (first seen wins,
/// active before archived), `completed_at` only on archived tasks.
pub fn reconcile(active: Vec<Task>, archived: Vec<Task>) -> (Vec<Task>, Vec<Task>, Repairs) {
    let mut repairs = Repairs::default();
    let mut seen: HashSet<TaskId> = HashSet::new();

    let mut keep = |mut task: Task, repairs: &mut Repairs| -> Option<Task> {
        match normalize_title(&task.title) {
            Some(title) => {
                if title != task.title {
                    repairs.trimmed_title += 1;
                    task.title = title;
                }
            }
            None => {
                repairs.dropped_blank += 1;
                return None;
            }
        }
        if !seen.insert(task.id.clone()) {
            repairs.dropped_duplicate += 1;
            return None;
        }
        Some(task)
    };

    let mut fixed_active = Vec::with_capacity(active.len());
    for task in active {
        if let Some(mut task) = keep(task, &mut repairs) {
            if task.completed_at.take().is_some() {
                repairs.cleared_completed += 1;
            }
            fixed_active.push(task);
        }
    }

    let mut fixed_archived = Vec::with_capacity(archived.len());
    for task in archived {
        if let Some(mut task) = keep(task, &mut repairs) {
            if task.completed_at.is_none() {
                task.completed_at = Some(task.created_at);
                repairs.stamped_completed += 1;
            }
            fixed_archived.push(task);
        }
    }

    (fixed_active, fixed_archived, repairs)
}
