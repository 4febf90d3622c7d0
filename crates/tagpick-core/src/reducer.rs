#![forbid(unsafe_code)]

//! Session state and the selection reducer.
//!
//! [`SessionState`] is the single composite record a tag-selection session
//! owns: the current query text, the ordered selection, and the stored tag
//! history. It is mutated only through [`SessionState::apply`], which handles
//! one [`Action`] at a time.
//!
//! # Invariants
//!
//! 1. No two entries in the selection share an id.
//! 2. The stored set is unique by case-insensitive name and grows
//!    monotonically: selecting a new name appends it, and nothing ever
//!    removes it. Deleting from the selection never touches the store.
//! 3. The query resets to empty exactly when a tag addition lands.
//! 4. Every action is total. There are no failure paths, and the defensive
//!    [`Action::Noop`] arm is an identity transition.

use crate::tag::{Candidate, Tag, TagId};

/// One user-driven transition of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the current query text.
    SetQuery(String),
    /// Select a candidate: append it to the selection, record its name in
    /// the store when unseen, and clear the query.
    AddTag(Candidate),
    /// Remove the selected tag with this id, if present.
    DeleteTag(TagId),
    /// Identity transition. Kept so dispatch stays total as the action set
    /// grows.
    Noop,
}

impl Action {
    #[cfg(feature = "tracing")]
    fn kind(&self) -> &'static str {
        match self {
            Self::SetQuery(_) => "set_query",
            Self::AddTag(_) => "add_tag",
            Self::DeleteTag(_) => "delete_tag",
            Self::Noop => "noop",
        }
    }
}

/// The composite record owned by one tag-selection session.
///
/// Construction seeds the record from host-supplied tags; afterwards the only
/// way in is [`apply`](Self::apply). State is discarded with the widget — the
/// engine has no persistence responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current query text.
    query: String,
    /// Ordered selection. Insertion order is display order.
    selected: Vec<Tag>,
    /// Accumulated tag history, the suggestion corpus.
    stored: Vec<Tag>,
}

impl SessionState {
    /// Seed a session from host-supplied initial tags.
    ///
    /// Seed data is normalized rather than trusted: duplicate ids in
    /// `selected` and duplicate case-insensitive names in `stored` are
    /// dropped, keeping the first occurrence.
    #[must_use]
    pub fn new(selected: Vec<Tag>, stored: Vec<Tag>) -> Self {
        let mut state = Self::default();
        for tag in stored {
            if !state.stored.iter().any(|t| t.matches_name(&tag.name)) {
                state.stored.push(tag);
            }
        }
        for tag in selected {
            if !state.selected.iter().any(|t| t.id == tag.id) {
                state.selected.push(tag);
            }
        }
        state
    }

    /// Current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The ordered selection.
    #[must_use]
    pub fn selected(&self) -> &[Tag] {
        &self.selected
    }

    /// The stored tag history.
    #[must_use]
    pub fn stored(&self) -> &[Tag] {
        &self.stored
    }

    /// The most recently selected tag, if any.
    ///
    /// This is the lookup the focus/removal navigation contract needs: a
    /// deletion intent on an empty query targets this tag.
    #[must_use]
    pub fn last_selected(&self) -> Option<&Tag> {
        self.selected.last()
    }

    /// Whether a selected tag already carries this name (ignoring case).
    #[must_use]
    pub fn is_selected_name(&self, name: &str) -> bool {
        self.selected.iter().any(|t| t.matches_name(name))
    }

    /// Find a stored tag by case-insensitive name.
    #[must_use]
    pub fn find_stored(&self, name: &str) -> Option<&Tag> {
        self.stored.iter().find(|t| t.matches_name(name))
    }

    /// Apply one action.
    ///
    /// Total: every action produces a valid next state, and [`Action::Noop`]
    /// leaves the state bit-for-bit unchanged.
    pub fn apply(&mut self, action: Action) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("apply_action", kind = action.kind()).entered();

        match action {
            Action::SetQuery(text) => self.query = text,
            Action::AddTag(candidate) => self.add_tag(candidate),
            Action::DeleteTag(id) => self.selected.retain(|t| t.id != id),
            Action::Noop => {}
        }
    }

    fn add_tag(&mut self, candidate: Candidate) {
        let tag = candidate.into_tag();

        // Selection is unique by id. Re-selecting an already-selected tag is
        // still a selection gesture, so the query reset applies either way.
        if self.selected.iter().any(|t| t.id == tag.id) {
            self.query.clear();
            return;
        }

        let is_new = !self.stored.iter().any(|t| t.matches_name(&tag.name));
        if is_new {
            self.stored.push(tag.clone());
        }
        self.selected.push(tag);
        self.query.clear();
    }
}
