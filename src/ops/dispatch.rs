use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::io::store::{DurableStore, StoreError};
use crate::model::task::{Collection, Task, TaskId};
use crate::ops::edit::{CommitOutcome, EditError, EditSession};
use crate::ops::repository::{Snapshot, TaskError, TaskRepository};

/// One user intent, as produced by a key press or a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Complete(TaskId),
    Restore(TaskId),
    Delete(TaskId, Collection),
    BeginEdit(TaskId),
    SaveEdit(TaskId),
    CancelEdit(TaskId),
}

/// The action name half of a `(tag, target)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTag {
    Add,
    Complete,
    Restore,
    Delete,
    DeleteArchived,
    Edit,
    Save,
    Cancel,
}

impl ActionTag {
    pub const ALL: [ActionTag; 8] = [
        ActionTag::Add,
        ActionTag::Complete,
        ActionTag::Restore,
        ActionTag::Delete,
        ActionTag::DeleteArchived,
        ActionTag::Edit,
        ActionTag::Save,
        ActionTag::Cancel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionTag::Add => "add",
            ActionTag::Complete => "complete",
            ActionTag::Restore => "restore",
            ActionTag::Delete => "delete",
            ActionTag::DeleteArchived => "delete-archived",
            ActionTag::Edit => "edit",
            ActionTag::Save => "save",
            ActionTag::Cancel => "cancel",
        }
    }

    /// Pair the tag with its target: a title for `add`, a task id otherwise.
    pub fn with_target(self, target: &str) -> Action {
        let id = || TaskId::new(target);
        match self {
            ActionTag::Add => Action::Add(target.to_string()),
            ActionTag::Complete => Action::Complete(id()),
            ActionTag::Restore => Action::Restore(id()),
            ActionTag::Delete => Action::Delete(id(), Collection::Active),
            ActionTag::DeleteArchived => Action::Delete(id(), Collection::Archived),
            ActionTag::Edit => Action::BeginEdit(id()),
            ActionTag::Save => Action::SaveEdit(id()),
            ActionTag::Cancel => Action::CancelEdit(id()),
        }
    }
}

impl FromStr for ActionTag {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionTag::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| DispatchError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for dispatched actions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error(transparent)]
    Task(TaskError),
    #[error(transparent)]
    Edit(EditError),
}

impl From<TaskError> for DispatchError {
    fn from(e: TaskError) -> Self {
        DispatchError::Task(e)
    }
}

impl From<EditError> for DispatchError {
    fn from(e: EditError) -> Self {
        match e {
            EditError::Task(e) => DispatchError::Task(e),
            other => DispatchError::Edit(other),
        }
    }
}

/// What a successful action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Completed(Task),
    Restored(Task),
    Deleted(Task, Collection),
    EditStarted {
        id: TaskId,
        /// Result of committing the edit that was open on another task
        previous: Option<CommitOutcome>,
    },
    EditSaved {
        id: TaskId,
        result: CommitOutcome,
    },
    EditCancelled {
        id: TaskId,
        title: String,
    },
}

impl Outcome {
    /// Short feedback line for the status bar or terminal
    pub fn message(&self) -> String {
        match self {
            Outcome::Added(task) => format!("Added \"{}\"", task.title),
            Outcome::Completed(task) => format!("Archived \"{}\"", task.title),
            Outcome::Restored(task) => format!("Restored \"{}\"", task.title),
            Outcome::Deleted(task, _) => format!("Deleted \"{}\"", task.title),
            Outcome::EditStarted { previous, .. } => match previous {
                Some(CommitOutcome::Committed { title }) => {
                    format!("Saved \"{}\", editing next task", title)
                }
                _ => "Editing".to_string(),
            },
            Outcome::EditSaved { result, .. } => match result {
                CommitOutcome::Committed { title } => format!("Renamed to \"{}\"", title),
                CommitOutcome::Reverted { .. } => {
                    "Title cannot be empty, kept the original".to_string()
                }
            },
            Outcome::EditCancelled { .. } => "Edit cancelled".to_string(),
        }
    }
}

/// Routes actions to the repository and the edit session. The only path by
/// which the TUI and the command line change tasks.
pub struct Controller<S: DurableStore> {
    repo: TaskRepository<S>,
    edit: EditSession,
}

impl<S: DurableStore> Controller<S> {
    pub fn new(repo: TaskRepository<S>) -> Self {
        Controller {
            repo,
            edit: EditSession::new(),
        }
    }

    pub fn open(store: S) -> Self {
        Self::new(TaskRepository::open(store))
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, DispatchError> {
        debug!(?action, "dispatch");
        let outcome = match action {
            Action::Add(title) => Outcome::Added(self.repo.add(&title)?),
            Action::Complete(id) => Outcome::Completed(self.repo.complete(&id)?),
            Action::Restore(id) => Outcome::Restored(self.repo.restore(&id)?),
            Action::Delete(id, collection) => {
                Outcome::Deleted(self.repo.remove(&id, collection)?, collection)
            }
            Action::BeginEdit(id) => {
                let previous = self.edit.begin(&mut self.repo, &id)?;
                Outcome::EditStarted { id, previous }
            }
            Action::SaveEdit(id) => {
                let result = self.edit.commit(&mut self.repo, &id)?;
                Outcome::EditSaved { id, result }
            }
            Action::CancelEdit(id) => {
                let title = self.edit.cancel(&id)?;
                Outcome::EditCancelled { id, title }
            }
        };
        self.edit.reconcile(&self.repo);
        Ok(outcome)
    }

    /// Parse and run a `(tag, target)` pair
    pub fn dispatch_tag(&mut self, tag: &str, target: &str) -> Result<Outcome, DispatchError> {
        let action = tag.parse::<ActionTag>()?.with_target(target);
        self.dispatch(action)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.repo.snapshot()
    }

    pub fn repo(&self) -> &TaskRepository<S> {
        &self.repo
    }

    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    /// Mutable access to the draft and cursor. Transitions still go
    /// through [`Controller::dispatch`].
    pub fn edit_mut(&mut self) -> &mut EditSession {
        &mut self.edit
    }

    pub fn take_save_failure(&mut self) -> Option<StoreError> {
        self.repo.take_save_failure()
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.repo.store_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn controller() -> Controller<MemoryStore> {
        Controller::open(MemoryStore::new())
    }

    fn added(c: &mut Controller<MemoryStore>, title: &str) -> TaskId {
        match c.dispatch(Action::Add(title.into())).unwrap() {
            Outcome::Added(task) => task.id,
            other => panic!("expected Added, got {:?}", other),
        }
    }

    #[test]
    fn tags_parse_and_round_trip() {
        for tag in ActionTag::ALL {
            assert_eq!(tag.name().parse::<ActionTag>(), Ok(tag));
        }
        assert_eq!(
            "archive".parse::<ActionTag>(),
            Err(DispatchError::UnknownAction("archive".into()))
        );
    }

    #[test]
    fn tag_targets_map_to_actions() {
        assert_eq!(
            ActionTag::DeleteArchived.with_target("42"),
            Action::Delete(TaskId::new("42"), Collection::Archived)
        );
        assert_eq!(
            ActionTag::Add.with_target("buy milk"),
            Action::Add("buy milk".into())
        );
        assert_eq!(
            ActionTag::Save.with_target("7"),
            Action::SaveEdit(TaskId::new("7"))
        );
    }

    #[test]
    fn dispatch_tag_runs_full_lifecycle() {
        let mut c = controller();
        let id = added(&mut c, "x");
        c.dispatch_tag("complete", id.as_str()).unwrap();
        assert_eq!(c.snapshot().archived.len(), 1);
        c.dispatch_tag("restore", id.as_str()).unwrap();
        assert_eq!(c.snapshot().active[0].id, id);
        c.dispatch_tag("delete", id.as_str()).unwrap();
        assert!(c.snapshot().active.is_empty());
    }

    #[test]
    fn errors_are_flattened() {
        let mut c = controller();
        assert_eq!(
            c.dispatch(Action::Add("  ".into())),
            Err(DispatchError::Task(TaskError::EmptyTitle))
        );
        assert!(matches!(
            c.dispatch(Action::BeginEdit(TaskId::new("missing"))),
            Err(DispatchError::Task(TaskError::NotFound { .. }))
        ));
        assert_eq!(
            c.dispatch(Action::CancelEdit(TaskId::new("missing"))),
            Err(DispatchError::Edit(EditError::NoSession))
        );
    }

    #[test]
    fn edit_round_trip_through_dispatch() {
        let mut c = controller();
        let id = added(&mut c, "draft me");
        c.dispatch(Action::BeginEdit(id.clone())).unwrap();
        c.edit_mut().set_draft(&id, "drafted").unwrap();

        let outcome = c.dispatch(Action::SaveEdit(id.clone())).unwrap();
        assert_eq!(outcome.message(), "Renamed to \"drafted\"");
        assert_eq!(c.repo().active_title(&id), Some("drafted"));
        assert!(!c.edit().is_editing());
    }

    #[test]
    fn blank_save_reports_revert() {
        let mut c = controller();
        let id = added(&mut c, "original");
        c.dispatch(Action::BeginEdit(id.clone())).unwrap();
        c.edit_mut().set_draft(&id, "").unwrap();
        let outcome = c.dispatch(Action::SaveEdit(id.clone())).unwrap();
        assert!(matches!(
            outcome,
            Outcome::EditSaved {
                result: CommitOutcome::Reverted { .. },
                ..
            }
        ));
        assert_eq!(c.repo().active_title(&id), Some("original"));
    }

    #[test]
    fn completing_edited_task_ends_session() {
        let mut c = controller();
        let id = added(&mut c, "editing");
        c.dispatch(Action::BeginEdit(id.clone())).unwrap();
        c.dispatch(Action::Complete(id.clone())).unwrap();
        assert!(!c.edit().is_editing());
    }

    #[test]
    fn other_mutations_keep_open_draft() {
        let mut c = controller();
        let editing = added(&mut c, "editing");
        let other = added(&mut c, "other");
        c.dispatch(Action::BeginEdit(editing.clone())).unwrap();
        c.edit_mut().set_draft(&editing, "unsaved").unwrap();

        c.dispatch(Action::Complete(other)).unwrap();
        c.dispatch(Action::Add("third".into())).unwrap();
        assert_eq!(c.edit().draft().map(|d| d.as_str()), Some("unsaved"));
    }

    #[test]
    fn delete_outcome_names_collection() {
        let mut c = controller();
        let id = added(&mut c, "gone");
        c.dispatch(Action::Complete(id.clone())).unwrap();
        let outcome = c.dispatch(Action::Delete(id, Collection::Archived));
        assert!(matches!(outcome, Ok(Outcome::Deleted(_, Collection::Archived))));
        assert_eq!(outcome.unwrap().message(), "Deleted \"gone\"");
    }
}
