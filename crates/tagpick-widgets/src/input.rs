#![forbid(unsafe_code)]

//! Tag input widget controller.
//!
//! [`TagInput`] drives one tag-selection session: it owns the
//! [`SessionState`], recomputes ranked suggestions after every applied
//! action, and implements the keyboard/focus navigation contract on top of
//! abstract intents. The presentation layer translates real input (key
//! events, clicks) into [`Intent`] values, renders from the accessors, and
//! mirrors the returned [`Effect`]s onto real focus.
//!
//! # Invariants
//!
//! 1. `cursor` is always `< suggestions.len()` (or 0 when the list is empty).
//! 2. `Focus::Chip(i)` always indexes a live selected tag.
//! 3. Suggestions are recomputed synchronously after every applied action, so
//!    reads never observe a stale list (read-after-write consistency).
//!
//! # Focus walk
//!
//! A deletion intent on an empty query moves focus to the last selected chip;
//! a deletion intent while a chip is focused removes that chip and returns
//! focus to the input. This mirrors the familiar chip-input gesture: two
//! backspaces on an empty field remove the most recent tag.

use unicode_segmentation::UnicodeSegmentation;

use tagpick_core::{Action, Candidate, IdSource, RandomIds, SessionState, Tag, TagId};

use crate::suggest::{Ranker, Scorer, Suggestion};

// ---------------------------------------------------------------------------
// Intents & effects
// ---------------------------------------------------------------------------

/// An abstract user gesture, supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A character was typed into the input.
    Type(char),
    /// The query text was replaced wholesale (paste, IME commit).
    SetQuery(String),
    /// Backspace-equivalent: edit the query, or walk into the chips when the
    /// query is already empty.
    DeleteBack,
    /// Move the suggestion cursor up.
    CursorUp,
    /// Move the suggestion cursor down.
    CursorDown,
    /// Commit the suggestion under the cursor.
    Accept,
    /// Commit a suggestion by name (click, combobox selection).
    Select(String),
    /// Remove a selected chip directly (its close button).
    RemoveChip(TagId),
}

/// What the presentation layer must do after an intent was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move real focus to the selected-tag chip at this index.
    FocusChip(usize),
    /// A tag was appended to the selection; the query was reset. Real focus
    /// belongs on the input.
    TagAdded(Tag),
    /// The chip with this id was removed. Real focus belongs on the input.
    TagRemoved(TagId),
}

/// Where the widget's logical focus sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The text input.
    #[default]
    Input,
    /// The selected-tag chip at this index.
    Chip(usize),
}

// ---------------------------------------------------------------------------
// TagInput
// ---------------------------------------------------------------------------

/// Widget-level controller for a tag-selection session.
#[derive(Debug, Clone)]
pub struct TagInput<I: IdSource = RandomIds> {
    /// Session state (query, selection, store).
    state: SessionState,
    /// Id source for freshly created tags.
    ids: I,
    /// Suggestion ranking pipeline.
    ranker: Ranker,
    /// Current ranked suggestions.
    suggestions: Vec<Suggestion>,
    /// Highlighted suggestion index.
    cursor: usize,
    /// Logical focus.
    focus: Focus,
    /// Placeholder text for the empty input.
    placeholder: String,
}

impl Default for TagInput<RandomIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl TagInput<RandomIds> {
    /// Create an empty controller with random tag ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_source(RandomIds::new())
    }
}

impl<I: IdSource> TagInput<I> {
    /// Create an empty controller with a custom id source.
    #[must_use]
    pub fn with_id_source(ids: I) -> Self {
        let mut input = Self {
            state: SessionState::default(),
            ids,
            ranker: Ranker::new(),
            suggestions: Vec::new(),
            cursor: 0,
            focus: Focus::Input,
            placeholder: "Add a tag...".to_string(),
        };
        input.refresh_suggestions();
        input
    }

    // --- Builder methods ---

    /// Seed the initial selection (builder).
    #[must_use]
    pub fn with_selected(mut self, tags: Vec<Tag>) -> Self {
        self.state = SessionState::new(tags, self.state.stored().to_vec());
        self.refresh_suggestions();
        self
    }

    /// Seed the stored tag history (builder).
    #[must_use]
    pub fn with_stored(mut self, tags: Vec<Tag>) -> Self {
        self.state = SessionState::new(self.state.selected().to_vec(), tags);
        self.refresh_suggestions();
        self
    }

    /// Set the placeholder text (builder).
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the scorer configuration (builder).
    #[must_use]
    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.ranker = Ranker::with_scorer(scorer);
        self.refresh_suggestions();
        self
    }

    // --- Accessors ---

    /// Current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        self.state.query()
    }

    /// The ordered selection.
    #[must_use]
    pub fn selected(&self) -> &[Tag] {
        self.state.selected()
    }

    /// The stored tag history.
    #[must_use]
    pub fn stored(&self) -> &[Tag] {
        self.state.stored()
    }

    /// The full session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current ranked suggestions.
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Highlighted suggestion index.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The suggestion under the cursor, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<&Suggestion> {
        self.suggestions.get(self.cursor)
    }

    /// Logical focus.
    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Placeholder text for the empty input.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    // --- Event handling ---

    /// Handle one intent.
    ///
    /// Returns the effect the presentation layer must mirror, or `None` when
    /// the intent only changed internal state (or changed nothing).
    pub fn handle(&mut self, intent: Intent) -> Option<Effect> {
        match intent {
            Intent::Type(c) => self.type_char(c),
            Intent::SetQuery(text) => {
                self.focus = Focus::Input;
                self.dispatch(Action::SetQuery(text));
                None
            }
            Intent::DeleteBack => self.delete_back(),
            Intent::CursorUp => {
                if self.focus == Focus::Input && self.cursor > 0 {
                    self.cursor -= 1;
                }
                None
            }
            Intent::CursorDown => {
                if self.focus == Focus::Input
                    && !self.suggestions.is_empty()
                    && self.cursor < self.suggestions.len() - 1
                {
                    self.cursor += 1;
                }
                None
            }
            Intent::Accept => self.accept(),
            Intent::Select(name) => self.select_name(&name),
            Intent::RemoveChip(id) => self.remove_chip(id),
        }
    }

    fn type_char(&mut self, c: char) -> Option<Effect> {
        // Chips only understand deletion; other keys are ignored while one
        // is focused.
        if self.focus != Focus::Input {
            return None;
        }
        let mut text = self.state.query().to_string();
        text.push(c);
        self.dispatch(Action::SetQuery(text));
        None
    }

    fn delete_back(&mut self) -> Option<Effect> {
        match self.focus {
            Focus::Input => {
                if self.state.query().is_empty() {
                    // Walk into the chips: focus the most recent one.
                    if self.state.selected().is_empty() {
                        return None;
                    }
                    let index = self.state.selected().len() - 1;
                    self.focus = Focus::Chip(index);
                    return Some(Effect::FocusChip(index));
                }
                self.pop_grapheme();
                None
            }
            Focus::Chip(index) => {
                let id = self.state.selected()[index].id;
                self.focus = Focus::Input;
                self.dispatch(Action::DeleteTag(id));
                Some(Effect::TagRemoved(id))
            }
        }
    }

    /// Remove the last grapheme cluster of the query, not just the last code
    /// point.
    fn pop_grapheme(&mut self) {
        let query = self.state.query();
        if let Some((offset, _)) = query.grapheme_indices(true).last() {
            let mut text = query.to_string();
            text.truncate(offset);
            self.dispatch(Action::SetQuery(text));
        }
    }

    fn accept(&mut self) -> Option<Effect> {
        if self.focus != Focus::Input {
            return None;
        }
        let suggestion = self.highlighted()?.clone();
        let candidate = match suggestion {
            Suggestion::Existing(existing) => Candidate::Existing(existing.tag),
            Suggestion::Create(name) => Candidate::New {
                id: self.ids.next_id(),
                name,
            },
        };
        Some(self.add(candidate))
    }

    /// Resolve a name against the stored set and select it.
    ///
    /// An existing stored tag (matched case-insensitively) is re-selected
    /// as-is, preserving its id and use count; an unknown name becomes a
    /// brand-new tag with a freshly generated id.
    fn select_name(&mut self, name: &str) -> Option<Effect> {
        if name.is_empty() {
            return None;
        }
        let candidate = match self.state.find_stored(name) {
            Some(stored) => Candidate::Existing(stored.clone()),
            None => Candidate::New {
                id: self.ids.next_id(),
                name: name.to_string(),
            },
        };
        Some(self.add(candidate))
    }

    fn add(&mut self, candidate: Candidate) -> Effect {
        let tag = candidate.clone().into_tag();
        self.focus = Focus::Input;
        self.dispatch(Action::AddTag(candidate));
        Effect::TagAdded(tag)
    }

    fn remove_chip(&mut self, id: TagId) -> Option<Effect> {
        if !self.state.selected().iter().any(|t| t.id == id) {
            return None;
        }
        self.focus = Focus::Input;
        self.dispatch(Action::DeleteTag(id));
        Some(Effect::TagRemoved(id))
    }

    /// Apply an action and bring the suggestion list back in sync.
    fn dispatch(&mut self, action: Action) {
        let query_changed = matches!(
            &action,
            Action::SetQuery(text) if text != self.state.query()
        ) || matches!(action, Action::AddTag(_));
        self.state.apply(action);
        self.refresh_suggestions();
        if query_changed {
            self.cursor = 0;
        }
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = self.ranker.rank(
            self.state.stored(),
            self.state.query(),
            self.state.selected(),
        );
        // Clamp the cursor to the new list.
        if self.suggestions.is_empty() {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(self.suggestions.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagpick_core::SequentialIds;

    fn id(n: u128) -> TagId {
        TagId::from_u128(n)
    }

    /// Cats and Dogs stored, Dogs pre-selected.
    fn seeded() -> TagInput<SequentialIds> {
        TagInput::with_id_source(SequentialIds::starting_at(100))
            .with_selected(vec![Tag::new(id(1), "Dogs")])
            .with_stored(vec![
                Tag::new(id(0), "Cats").with_uses(1),
                Tag::new(id(1), "Dogs").with_uses(101),
            ])
    }

    fn type_str(input: &mut TagInput<SequentialIds>, text: &str) {
        for c in text.chars() {
            input.handle(Intent::Type(c));
        }
    }

    // ── Query editing ───────────────────────────────────────────────

    #[test]
    fn typing_builds_the_query() {
        let mut input = seeded();
        type_str(&mut input, "ca");
        assert_eq!(input.query(), "ca");
    }

    #[test]
    fn set_query_replaces_wholesale() {
        let mut input = seeded();
        type_str(&mut input, "zz");
        input.handle(Intent::SetQuery("ca".into()));
        assert_eq!(input.query(), "ca");
    }

    #[test]
    fn delete_back_edits_a_non_empty_query() {
        let mut input = seeded();
        type_str(&mut input, "cat");
        input.handle(Intent::DeleteBack);
        assert_eq!(input.query(), "ca");
    }

    #[test]
    fn delete_back_removes_a_full_grapheme_cluster() {
        let mut input = seeded();
        input.handle(Intent::SetQuery("ne\u{301}".into()));
        input.handle(Intent::DeleteBack);
        assert_eq!(input.query(), "n");
    }

    #[test]
    fn typing_resets_the_suggestion_cursor() {
        let mut input = seeded();
        input.handle(Intent::SetQuery("s".into()));
        input.handle(Intent::CursorDown);
        input.handle(Intent::Type('s'));
        assert_eq!(input.cursor(), 0);
    }

    // ── Suggestions ─────────────────────────────────────────────────

    #[test]
    fn typed_prefix_suggests_cats_then_create() {
        let mut input = seeded();
        type_str(&mut input, "ca");

        let names: Vec<&str> = input.suggestions().iter().map(Suggestion::name).collect();
        assert_eq!(names, vec!["Cats", "ca"]);
        assert!(input.suggestions()[1].is_create());
    }

    #[test]
    fn empty_query_lists_unselected_stored_tags() {
        let input = seeded();
        let names: Vec<&str> = input.suggestions().iter().map(Suggestion::name).collect();
        assert_eq!(names, vec!["Cats"]);
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let mut input = seeded();
        type_str(&mut input, "ca");
        assert_eq!(input.cursor(), 0);

        input.handle(Intent::CursorDown);
        assert_eq!(input.cursor(), 1);
        input.handle(Intent::CursorDown);
        assert_eq!(input.cursor(), 1);

        input.handle(Intent::CursorUp);
        assert_eq!(input.cursor(), 0);
        input.handle(Intent::CursorUp);
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn highlighted_follows_the_cursor() {
        let mut input = seeded();
        type_str(&mut input, "ca");
        input.handle(Intent::CursorDown);
        assert!(input.highlighted().unwrap().is_create());
    }

    // ── Accept ──────────────────────────────────────────────────────

    #[test]
    fn accept_selects_the_highlighted_existing_tag() {
        let mut input = seeded();
        type_str(&mut input, "ca");
        let effect = input.handle(Intent::Accept);

        match effect {
            Some(Effect::TagAdded(tag)) => {
                assert_eq!(tag.name, "Cats");
                assert_eq!(tag.uses, 1);
            }
            other => panic!("expected TagAdded, got {other:?}"),
        }
        assert_eq!(input.query(), "");
        let names: Vec<&str> = input.selected().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Dogs", "Cats"]);
        assert_eq!(input.stored().len(), 2);
    }

    #[test]
    fn accept_on_the_create_entry_mints_a_new_tag() {
        let mut input = seeded();
        type_str(&mut input, "Birds");
        // No stored tag matches, so the create entry is the sole suggestion.
        assert!(input.highlighted().unwrap().is_create());
        let effect = input.handle(Intent::Accept);

        match effect {
            Some(Effect::TagAdded(tag)) => {
                assert_eq!(tag.name, "Birds");
                assert_eq!(tag.id, id(100));
                assert_eq!(tag.uses, 0);
            }
            other => panic!("expected TagAdded, got {other:?}"),
        }
        assert_eq!(input.stored().len(), 3);
    }

    #[test]
    fn accept_with_no_suggestions_is_a_noop() {
        let mut input = TagInput::with_id_source(SequentialIds::new());
        assert_eq!(input.handle(Intent::Accept), None);
        assert!(input.selected().is_empty());
    }

    // ── Select by name ──────────────────────────────────────────────

    #[test]
    fn select_resolves_existing_names_case_insensitively() {
        let mut input = seeded();
        type_str(&mut input, "cAtS");
        let effect = input.handle(Intent::Select("cAtS".into()));

        match effect {
            Some(Effect::TagAdded(tag)) => {
                // The stored tag wins: id, casing, and use count survive.
                assert_eq!(tag.id, id(0));
                assert_eq!(tag.name, "Cats");
                assert_eq!(tag.uses, 1);
            }
            other => panic!("expected TagAdded, got {other:?}"),
        }
        assert_eq!(input.stored().len(), 2);
    }

    #[test]
    fn select_mints_an_id_for_unknown_names() {
        let mut input = seeded();
        let effect = input.handle(Intent::Select("Ferrets".into()));

        match effect {
            Some(Effect::TagAdded(tag)) => {
                assert_eq!(tag.id, id(100));
                assert_eq!(tag.uses, 0);
            }
            other => panic!("expected TagAdded, got {other:?}"),
        }
        assert_eq!(input.stored().len(), 3);
    }

    #[test]
    fn select_empty_name_is_a_noop() {
        let mut input = seeded();
        assert_eq!(input.handle(Intent::Select(String::new())), None);
        assert_eq!(input.selected().len(), 1);
    }

    #[test]
    fn selected_tag_disappears_from_suggestions() {
        let mut input = seeded();
        input.handle(Intent::Select("Cats".into()));
        type_str(&mut input, "cat");
        let names: Vec<&str> = input.suggestions().iter().map(Suggestion::name).collect();
        assert_eq!(names, vec!["cat"]);
        assert!(input.suggestions()[0].is_create());
    }

    // ── Focus walk ──────────────────────────────────────────────────

    #[test]
    fn delete_back_on_empty_query_focuses_the_last_chip() {
        let mut input = seeded();
        let effect = input.handle(Intent::DeleteBack);
        assert_eq!(effect, Some(Effect::FocusChip(0)));
        assert_eq!(input.focus(), Focus::Chip(0));
        // Nothing was deleted yet.
        assert_eq!(input.selected().len(), 1);
    }

    #[test]
    fn second_delete_back_removes_the_focused_chip() {
        let mut input = seeded();
        input.handle(Intent::DeleteBack);
        let effect = input.handle(Intent::DeleteBack);

        assert_eq!(effect, Some(Effect::TagRemoved(id(1))));
        assert_eq!(input.focus(), Focus::Input);
        assert!(input.selected().is_empty());
        // Deletion never touches the store.
        assert_eq!(input.stored().len(), 2);
    }

    #[test]
    fn delete_back_with_no_chips_is_a_noop() {
        let mut input = TagInput::with_id_source(SequentialIds::new());
        assert_eq!(input.handle(Intent::DeleteBack), None);
        assert_eq!(input.focus(), Focus::Input);
    }

    #[test]
    fn typing_while_a_chip_is_focused_is_ignored() {
        let mut input = seeded();
        input.handle(Intent::DeleteBack);
        input.handle(Intent::Type('x'));
        assert_eq!(input.query(), "");
        assert_eq!(input.focus(), Focus::Chip(0));
    }

    #[test]
    fn cursor_moves_are_ignored_while_a_chip_is_focused() {
        let mut input = seeded();
        input.handle(Intent::DeleteBack);
        input.handle(Intent::CursorDown);
        assert_eq!(input.cursor(), 0);
    }

    // ── RemoveChip ──────────────────────────────────────────────────

    #[test]
    fn remove_chip_deletes_by_id() {
        let mut input = seeded();
        let effect = input.handle(Intent::RemoveChip(id(1)));
        assert_eq!(effect, Some(Effect::TagRemoved(id(1))));
        assert!(input.selected().is_empty());
        assert_eq!(input.stored().len(), 2);
    }

    #[test]
    fn remove_chip_with_unknown_id_is_a_noop() {
        let mut input = seeded();
        assert_eq!(input.handle(Intent::RemoveChip(id(999))), None);
        assert_eq!(input.selected().len(), 1);
    }

    #[test]
    fn remove_chip_while_focused_returns_focus_to_the_input() {
        let mut input = seeded();
        input.handle(Intent::DeleteBack);
        input.handle(Intent::RemoveChip(id(1)));
        assert_eq!(input.focus(), Focus::Input);
    }

    // ── End-to-end ──────────────────────────────────────────────────

    #[test]
    fn full_session_walkthrough() {
        let mut input = seeded();

        // Type "ca": Cats ranks first, then the create entry.
        input.handle(Intent::SetQuery("ca".into()));
        let names: Vec<&str> = input.suggestions().iter().map(Suggestion::name).collect();
        assert_eq!(names, vec!["Cats", "ca"]);

        // Select Cats: resolved as the existing stored tag.
        input.handle(Intent::Select("Cats".into()));
        let selected: Vec<(&str, u64)> = input
            .selected()
            .iter()
            .map(|t| (t.name.as_str(), t.uses))
            .collect();
        assert_eq!(selected, vec![("Dogs", 0), ("Cats", 1)]);
        assert_eq!(input.query(), "");
        assert_eq!(input.stored().len(), 2);

        // Create a new tag and then backspace it away again.
        input.handle(Intent::Select("Birds".into()));
        assert_eq!(input.selected().len(), 3);
        input.handle(Intent::DeleteBack);
        input.handle(Intent::DeleteBack);
        assert_eq!(input.selected().len(), 2);
        // "Birds" survives in the store for next time.
        assert!(input.stored().iter().any(|t| t.name == "Birds"));
    }

    // ── Configuration ───────────────────────────────────────────────

    #[test]
    fn placeholder_defaults_and_overrides() {
        let input = TagInput::new();
        assert_eq!(input.placeholder(), "Add a tag...");

        let input = TagInput::new().with_placeholder("Tag this event");
        assert_eq!(input.placeholder(), "Tag this event");
    }

    #[test]
    fn default_controller_is_empty() {
        let input = TagInput::default();
        assert_eq!(input.query(), "");
        assert!(input.selected().is_empty());
        assert!(input.stored().is_empty());
        assert!(input.suggestions().is_empty());
    }
}
