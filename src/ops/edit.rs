use tracing::debug;

use crate::io::store::DurableStore;
use crate::model::task::{Collection, TaskId};
use crate::ops::repository::{TaskError, TaskRepository};
use crate::util::text::LineBuffer;

/// Error type for edit session transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no edit in progress")]
    NoSession,
    #[error("task {id} is not being edited")]
    NotEditing { id: TaskId },
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// How a commit ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The draft was written as the new title
    Committed { title: String },
    /// The draft was blank; the original title stands
    Reverted { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Editing {
    id: TaskId,
    original: String,
    draft: LineBuffer,
}

/// Tracks the one task whose title is being edited.
///
/// The session owns the draft text. Nothing reaches the repository until
/// [`EditSession::commit`], so re-rendering the lists while an edit is open
/// never loses keystrokes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    state: Option<Editing>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_some()
    }

    pub fn editing_id(&self) -> Option<&TaskId> {
        self.state.as_ref().map(|e| &e.id)
    }

    pub fn draft(&self) -> Option<&LineBuffer> {
        self.state.as_ref().map(|e| &e.draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut LineBuffer> {
        self.state.as_mut().map(|e| &mut e.draft)
    }

    /// Start editing an active task, seeding the draft with its title.
    ///
    /// Beginning on the task already being edited keeps the current draft.
    /// Beginning on a different task commits the open session first; the
    /// returned outcome describes that commit.
    pub fn begin<S: DurableStore>(
        &mut self,
        repo: &mut TaskRepository<S>,
        id: &TaskId,
    ) -> Result<Option<CommitOutcome>, EditError> {
        self.reconcile(repo);
        if self.editing_id() == Some(id) {
            return Ok(None);
        }
        let title = repo
            .active_title(id)
            .ok_or_else(|| TaskError::NotFound {
                id: id.clone(),
                collection: Collection::Active,
            })?
            .to_string();

        let previous = match self.editing_id().cloned() {
            Some(open) => {
                debug!(id = %open, next = %id, "committing open edit before switching");
                Some(self.commit(repo, &open)?)
            }
            None => None,
        };

        debug!(id = %id, "begin edit");
        self.state = Some(Editing {
            id: id.clone(),
            draft: LineBuffer::with_text(title.clone()),
            original: title,
        });
        Ok(previous)
    }

    /// Replace the whole draft
    pub fn set_draft(&mut self, id: &TaskId, text: &str) -> Result<(), EditError> {
        let editing = self.require_mut(id)?;
        editing.draft.set(text);
        Ok(())
    }

    /// Write the draft through [`TaskRepository::rename`]. A blank draft
    /// reverts to the original title without writing anything. Once the
    /// draft reaches the repository the session is idle, whatever the result.
    pub fn commit<S: DurableStore>(
        &mut self,
        repo: &mut TaskRepository<S>,
        id: &TaskId,
    ) -> Result<CommitOutcome, EditError> {
        self.require_mut(id)?;
        let Some(editing) = self.state.take() else {
            return Err(EditError::NoSession);
        };

        match repo.rename(id, editing.draft.as_str()) {
            Ok(()) => {
                let title = repo
                    .active_title(id)
                    .map(str::to_string)
                    .unwrap_or_default();
                debug!(id = %id, "edit committed");
                Ok(CommitOutcome::Committed { title })
            }
            Err(TaskError::EmptyTitle) => {
                debug!(id = %id, "blank draft, keeping original title");
                Ok(CommitOutcome::Reverted {
                    title: editing.original,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop the draft. The repository is not touched.
    pub fn cancel(&mut self, id: &TaskId) -> Result<String, EditError> {
        self.require_mut(id)?;
        let original = self
            .state
            .take()
            .map(|e| e.original)
            .ok_or(EditError::NoSession)?;
        debug!(id = %id, "edit cancelled");
        Ok(original)
    }

    /// End the session if its task has left the active list (completed or
    /// deleted by another action). Returns true when a session was dropped.
    pub fn reconcile<S: DurableStore>(&mut self, repo: &TaskRepository<S>) -> bool {
        let gone = self
            .editing_id()
            .is_some_and(|id| repo.active_title(id).is_none());
        if gone {
            debug!("edited task left the active list, dropping draft");
            self.state = None;
        }
        gone
    }

    fn require_mut(&mut self, id: &TaskId) -> Result<&mut Editing, EditError> {
        match self.state.as_mut() {
            None => Err(EditError::NoSession),
            Some(editing) if &editing.id == id => Ok(editing),
            Some(_) => Err(EditError::NotEditing { id: id.clone() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn setup(titles: &[&str]) -> (TaskRepository<MemoryStore>, Vec<TaskId>) {
        let mut repo = TaskRepository::open(MemoryStore::new());
        let ids = titles.iter().map(|t| repo.add(t).unwrap().id).collect();
        (repo, ids)
    }

    #[test]
    fn begin_seeds_draft_with_title() {
        let (mut repo, ids) = setup(&["write report"]);
        let mut edit = EditSession::new();
        assert_eq!(edit.begin(&mut repo, &ids[0]), Ok(None));
        assert_eq!(edit.editing_id(), Some(&ids[0]));
        assert_eq!(edit.draft().map(LineBuffer::as_str), Some("write report"));
    }

    #[test]
    fn begin_on_archived_task_is_not_found() {
        let (mut repo, ids) = setup(&["a"]);
        repo.complete(&ids[0]).unwrap();
        let mut edit = EditSession::new();
        assert!(matches!(
            edit.begin(&mut repo, &ids[0]),
            Err(EditError::Task(TaskError::NotFound { .. }))
        ));
        assert!(!edit.is_editing());
    }

    #[test]
    fn commit_renames_and_ends_session() {
        let (mut repo, ids) = setup(&["old"]);
        let mut edit = EditSession::new();
        edit.begin(&mut repo, &ids[0]).unwrap();
        edit.set_draft(&ids[0], "  new  ").unwrap();

        let outcome = edit.commit(&mut repo, &ids[0]).unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { title: "new".into() });
        assert_eq!(repo.active_title(&ids[0]), Some("new"));
        assert!(!edit.is_editing());
    }

    #[test]
    fn commit_blank_draft_reverts_without_writing() {
        let (mut repo, ids) = setup(&["keep me"]);
        let writes = repo.store().write_count();
        let mut edit = EditSession::new();
        edit.begin(&mut repo, &ids[0]).unwrap();
        edit.set_draft(&ids[0], "   ").unwrap();

        let outcome = edit.commit(&mut repo, &ids[0]).unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Reverted {
                title: "keep me".into()
            }
        );
        assert_eq!(repo.active_title(&ids[0]), Some("keep me"));
        assert_eq!(repo.store().write_count(), writes);
        assert!(!edit.is_editing());
    }

    #[test]
    fn cancel_never_touches_repository() {
        let (mut repo, ids) = setup(&["title"]);
        let writes = repo.store().write_count();
        let mut edit = EditSession::new();
        edit.begin(&mut repo, &ids[0]).unwrap();
        edit.draft_mut().unwrap().insert_str(" changed");

        assert_eq!(edit.cancel(&ids[0]), Ok("title".to_string()));
        assert_eq!(repo.active_title(&ids[0]), Some("title"));
        assert_eq!(repo.store().write_count(), writes);
        assert!(!edit.is_editing());
    }

    #[test]
    fn transitions_require_matching_session() {
        let (mut repo, ids) = setup(&["a", "b"]);
        let mut edit = EditSession::new();
        assert_eq!(edit.cancel(&ids[0]), Err(EditError::NoSession));
        assert_eq!(edit.commit(&mut repo, &ids[0]), Err(EditError::NoSession));

        edit.begin(&mut repo, &ids[0]).unwrap();
        assert_eq!(
            edit.cancel(&ids[1]),
            Err(EditError::NotEditing { id: ids[1].clone() })
        );
        assert_eq!(edit.editing_id(), Some(&ids[0]));
    }

    #[test]
    fn begin_on_other_task_commits_open_edit() {
        let (mut repo, ids) = setup(&["first", "second"]);
        let mut edit = EditSession::new();
        edit.begin(&mut repo, &ids[0]).unwrap();
        edit.set_draft(&ids[0], "first, edited").unwrap();

        let previous = edit.begin(&mut repo, &ids[1]).unwrap();
        assert_eq!(
            previous,
            Some(CommitOutcome::Committed {
                title: "first, edited".into()
            })
        );
        assert_eq!(repo.active_title(&ids[0]), Some("first, edited"));
        assert_eq!(edit.editing_id(), Some(&ids[1]));
    }

    #[test]
    fn begin_on_same_task_keeps_draft() {
        let (mut repo, ids) = setup(&["a"]);
        let mut edit = EditSession::new();
        edit.begin(&mut repo, &ids[0]).unwrap();
        edit.set_draft(&ids[0], "half typed").unwrap();
        edit.begin(&mut repo, &ids[0]).unwrap();
        assert_eq!(edit.draft().map(LineBuffer::as_str), Some("half typed"));
    }

    #[test]
    fn draft_survives_other_mutations() {
        let (mut repo, ids) = setup(&["editing", "other"]);
        let mut edit = EditSession::new();
        edit.begin(&mut repo, &ids[0]).unwrap();
        edit.set_draft(&ids[0], "unsaved").unwrap();

        repo.complete(&ids[1]).unwrap();
        repo.add("new").unwrap();
        assert!(!edit.reconcile(&repo));
        assert_eq!(edit.draft().map(LineBuffer::as_str), Some("unsaved"));
    }

    #[test]
    fn reconcile_drops_session_for_vanished_task() {
        let (mut repo, ids) = setup(&["a"]);
        let mut edit = EditSession::new();
        edit.begin(&mut repo, &ids[0]).unwrap();
        repo.remove(&ids[0], Collection::Active).unwrap();
        assert!(edit.reconcile(&repo));
        assert!(!edit.is_editing());
    }
}
