use tracing::{debug, warn};

use crate::io::store::{RemoteStore, Snapshot, StoreError};
use crate::model::comment::{Comment, CommentId, CommentStore};
use crate::ops::comment_ops::{self, CommentError, IdClock};

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Invalid(#[from] CommentError),
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Validation failures the user can fix by changing their input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SessionError::Invalid(CommentError::EmptyText | CommentError::EmptyCategory)
        )
    }

    /// The mapping changed but the write back to the store failed.
    pub fn is_store(&self) -> bool {
        matches!(self, SessionError::Store(_))
    }
}

/// What a submit of the primary action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Added(CommentId),
    Updated(CommentId),
}

/// The single owner of the in-memory comment mapping.
///
/// Every mutating operation writes the whole mapping back to the remote
/// before returning. A failed write is reported but the in-memory change is
/// kept; the next notification from the remote replaces it anyway.
pub struct Session {
    store: CommentStore,
    editing: Option<CommentId>,
    ids: IdClock,
    remote: Box<dyn RemoteStore>,
}

impl Session {
    /// A session over an empty store, waiting for its first snapshot.
    pub fn new(remote: Box<dyn RemoteStore>) -> Self {
        Session {
            store: CommentStore::new(),
            editing: None,
            ids: IdClock::new(),
            remote,
        }
    }

    /// A session hydrated from a one-off read of the remote.
    pub fn load(remote: Box<dyn RemoteStore>) -> Result<Self, StoreError> {
        let snapshot = remote.read()?;
        let mut session = Session::new(remote);
        session.hydrate(snapshot);
        Ok(session)
    }

    pub fn store(&self) -> &CommentStore {
        &self.store
    }

    /// Id of the comment being edited, if any.
    pub fn editing(&self) -> Option<CommentId> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    // -----------------------------------------------------------------------
    // Synchronization
    // -----------------------------------------------------------------------

    /// Replace the whole mapping with a snapshot (empty when absent).
    ///
    /// EditingState is left alone: an edit whose comment vanished remotely
    /// still commits, re-creating the comment under its new category.
    pub fn hydrate(&mut self, snapshot: Snapshot) {
        let store = snapshot.unwrap_or_default();
        if let Some(max) = store.max_id() {
            self.ids.observe(max);
        }
        debug!(
            categories = store.len(),
            comments = store.comment_count(),
            "hydrated"
        );
        self.store = store;
    }

    /// Write the whole mapping to the remote.
    pub fn persist(&self) -> Result<(), StoreError> {
        self.remote.write_all(&self.store).inspect_err(|e| {
            warn!(error = %e, "failed to persist comments");
        })
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Submit the primary action: adds a comment, or commits the edit in progress.
    pub fn submit(&mut self, text: &str, category: &str) -> Result<Submitted, SessionError> {
        if self.editing.is_some() {
            self.commit_edit(text, category).map(Submitted::Updated)
        } else {
            self.add_comment(text, category).map(Submitted::Added)
        }
    }

    /// Append a new comment to `category`, creating the category if needed.
    /// While an edit is in progress this commits the edit instead.
    pub fn add_comment(&mut self, text: &str, category: &str) -> Result<CommentId, SessionError> {
        if self.editing.is_some() {
            return self.commit_edit(text, category);
        }
        let (text, category) = comment_ops::validate(text, category)?;
        let id = self.ids.next_id()?;
        comment_ops::append(&mut self.store, Comment::new(id, text, &category));
        debug!(id, category = %category, "added comment");
        self.persist()?;
        Ok(id)
    }

    /// Start editing the comment `id` in `category`. No-op if it isn't there.
    pub fn begin_edit(&mut self, id: CommentId, category: &str) -> Option<&Comment> {
        let comment = self.store.find(id, category)?;
        self.editing = Some(id);
        Some(comment)
    }

    /// Abandon the edit in progress without touching the mapping.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Apply the edit in progress: new text, possibly a new category.
    pub fn commit_edit(
        &mut self,
        new_text: &str,
        new_category: &str,
    ) -> Result<CommentId, SessionError> {
        let id = self.editing.ok_or(CommentError::NotEditing)?;
        let (text, category) = comment_ops::validate(new_text, new_category)?;

        let old = comment_ops::move_comment(&mut self.store, id, &text, &category);
        debug!(id, from = ?old, to = %category, "updated comment");
        self.editing = None;
        self.persist()?;
        Ok(id)
    }

    /// Delete one comment. Returns false (and writes nothing) if it isn't there.
    pub fn delete_comment(&mut self, id: CommentId, category: &str) -> Result<bool, SessionError> {
        if comment_ops::remove(&mut self.store, id, category).is_none() {
            return Ok(false);
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        debug!(id, category, "deleted comment");
        self.persist()?;
        Ok(true)
    }

    /// Delete a category and all its comments. Always writes.
    pub fn delete_category(&mut self, category: &str) -> Result<usize, SessionError> {
        let removed = comment_ops::delete_category(&mut self.store, category).unwrap_or_default();
        if let Some(id) = self.editing
            && removed.iter().any(|c| c.id == id)
        {
            self.editing = None;
        }
        debug!(category, count = removed.len(), "deleted category");
        self.persist()?;
        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn bug_store() -> CommentStore {
        vec![Comment::new(1, "fix login", "bug")].into_iter().collect()
    }

    fn session_with(store: CommentStore) -> (Session, MemoryStore) {
        let mem = MemoryStore::with_document(store);
        let session = Session::load(Box::new(mem.clone())).unwrap();
        (session, mem)
    }

    #[test]
    fn load_hydrates_from_remote() {
        let (session, mem) = session_with(bug_store());
        assert_eq!(session.store(), &bug_store());
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn hydrate_absent_is_empty() {
        let (mut session, _mem) = session_with(bug_store());
        session.hydrate(None);
        assert!(session.store().is_empty());
    }

    #[test]
    fn add_round_trips_through_remote() {
        let (mut session, mem) = session_with(bug_store());
        let id = session.add_comment("  crash on save ", " bug ").unwrap();

        let mut fresh = Session::new(Box::new(MemoryStore::new()));
        fresh.hydrate(mem.document());
        let list = fresh.store().comments("bug").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.last().unwrap(), &Comment::new(id, "crash on save", "bug"));
        assert_eq!(mem.writes(), 1);
    }

    #[test]
    fn add_ids_are_unique_and_above_existing() {
        let mut far_future = CommentStore::new();
        comment_ops::append(&mut far_future, Comment::new(i64::MAX / 2, "x", "bug"));
        let (mut session, _mem) = session_with(far_future);
        let a = session.add_comment("a", "bug").unwrap();
        let b = session.add_comment("b", "bug").unwrap();
        assert!(a > i64::MAX / 2);
        assert!(b > a);
    }

    #[test]
    fn validation_failure_writes_nothing() {
        let (mut session, mem) = session_with(bug_store());
        let err = session.add_comment("   ", "bug").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please enter a comment!");
        let err = session.add_comment("text", "").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a category name!");
        assert_eq!(session.store(), &bug_store());
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn begin_edit_missing_is_noop() {
        let (mut session, _mem) = session_with(bug_store());
        assert!(session.begin_edit(1, "ui").is_none());
        assert!(session.begin_edit(2, "bug").is_none());
        assert!(!session.is_editing());
    }

    #[test]
    fn begin_edit_returns_current_values() {
        let (mut session, _mem) = session_with(bug_store());
        let comment = session.begin_edit(1, "bug").unwrap().clone();
        assert_eq!(comment.text, "fix login");
        assert_eq!(session.editing(), Some(1));
    }

    #[test]
    fn commit_edit_same_category() {
        let (mut session, mem) = session_with(bug_store());
        session.begin_edit(1, "bug");
        session.commit_edit("fix login page", "bug").unwrap();

        let expected: CommentStore = vec![Comment::new(1, "fix login page", "bug")]
            .into_iter()
            .collect();
        assert_eq!(session.store(), &expected);
        assert_eq!(mem.document(), Some(expected));
        assert!(!session.is_editing());
    }

    #[test]
    fn commit_edit_moves_category() {
        let (mut session, mem) = session_with(bug_store());
        session.begin_edit(1, "bug");
        session.commit_edit("fix login page", "ui").unwrap();

        let expected: CommentStore = vec![Comment::new(1, "fix login page", "ui")]
            .into_iter()
            .collect();
        assert_eq!(session.store(), &expected);
        assert!(!session.store().contains_category("bug"));
        assert_eq!(mem.document(), Some(expected));
    }

    #[test]
    fn commit_edit_without_edit_is_rejected() {
        let (mut session, mem) = session_with(bug_store());
        let err = session.commit_edit("x", "bug").unwrap_err();
        assert!(matches!(err, SessionError::Invalid(CommentError::NotEditing)));
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn commit_edit_invalid_keeps_editing() {
        let (mut session, mem) = session_with(bug_store());
        session.begin_edit(1, "bug");
        assert!(session.commit_edit("", "bug").is_err());
        assert_eq!(session.editing(), Some(1));
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn submit_routes_by_edit_state() {
        let (mut session, _mem) = session_with(bug_store());
        let added = session.submit("new", "ui").unwrap();
        assert!(matches!(added, Submitted::Added(_)));

        session.begin_edit(1, "bug");
        assert_eq!(session.submit("edited", "bug").unwrap(), Submitted::Updated(1));
        assert_eq!(session.store().comment_count(), 2);
    }

    #[test]
    fn add_while_editing_commits_the_edit() {
        let (mut session, _mem) = session_with(bug_store());
        session.begin_edit(1, "bug");
        assert_eq!(session.add_comment("fix login page", "bug").unwrap(), 1);
        assert_eq!(session.store().comment_count(), 1);
        assert!(!session.is_editing());
    }

    #[test]
    fn add_after_max_id_fails_without_writing() {
        let (mut session, mem) = session_with(
            vec![Comment::new(i64::MAX, "x", "bug")].into_iter().collect(),
        );
        let err = session.add_comment("a", "bug").unwrap_err();
        assert!(matches!(err, SessionError::Invalid(CommentError::IdsExhausted)));
        assert!(!err.is_validation());
        assert_eq!(session.store().comment_count(), 1);
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn cancel_edit_clears_state_only() {
        let (mut session, mem) = session_with(bug_store());
        session.begin_edit(1, "bug");
        session.cancel_edit();
        assert!(!session.is_editing());
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn commit_after_remote_removal_recreates() {
        let (mut session, _mem) = session_with(bug_store());
        session.begin_edit(1, "bug");
        session.hydrate(None);
        session.commit_edit("back again", "bug").unwrap();
        assert_eq!(
            session.store().comments("bug").unwrap(),
            &[Comment::new(1, "back again", "bug")]
        );
    }

    #[test]
    fn delete_comment_last_drops_category() {
        let (mut session, mem) = session_with(bug_store());
        assert!(session.delete_comment(1, "bug").unwrap());
        assert!(session.store().is_empty());
        assert_eq!(mem.document(), Some(CommentStore::new()));
    }

    #[test]
    fn delete_comment_missing_writes_nothing() {
        let (mut session, mem) = session_with(bug_store());
        assert!(!session.delete_comment(42, "bug").unwrap());
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn delete_comment_being_edited_ends_edit() {
        let (mut session, _mem) = session_with(bug_store());
        session.begin_edit(1, "bug");
        session.delete_comment(1, "bug").unwrap();
        assert!(!session.is_editing());
    }

    #[test]
    fn delete_category_always_writes() {
        let (mut session, mem) = session_with(bug_store());
        assert_eq!(session.delete_category("bug").unwrap(), 1);
        assert_eq!(session.delete_category("nope").unwrap(), 0);
        assert_eq!(mem.writes(), 2);
    }

    #[test]
    fn failed_write_is_reported_but_change_kept() {
        let (mut session, mem) = session_with(bug_store());
        mem.set_fail_writes(true);
        let err = session.add_comment("a", "ui").unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert!(session.store().contains_category("ui"));
        assert_eq!(mem.document(), Some(bug_store()));
    }
}
