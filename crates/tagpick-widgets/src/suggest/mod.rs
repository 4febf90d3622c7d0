#![forbid(unsafe_code)]

//! Candidate ranking for tag suggestions.
//!
//! Given the stored tag history, the typed query, and the current selection,
//! [`Ranker::rank`] produces the ordered suggestion list the presentation
//! layer renders:
//!
//! 1. Stored tags are fuzzy-filtered and sorted against the query by name
//!    (see [`scorer`] for the tier policy); non-matching tags are excluded.
//!    Ties keep the stored set's relative order.
//! 2. Tags whose name case-insensitively matches an already-selected tag are
//!    removed — nothing is suggested twice.
//! 3. A synthetic create-new entry carrying the exact typed text is appended
//!    when the query is non-empty and no stored tag exactly matches it
//!    (case-insensitive).
//!
//! An empty query lists every unselected stored tag in stored order and never
//! synthesizes a create entry: nothing was typed, so there is no name to
//! create.
//!
//! Ranking is a pure function recomputed on every state change; it holds no
//! state of its own.
//!
//! # Submodules
//!
//! - [`scorer`]: tiered fuzzy matcher with position tracking

pub mod scorer;

pub use scorer::{MatchResult, Rank, Scorer};

use std::cmp::Ordering;

use memchr::memmem;
use tagpick_core::{Tag, eq_ignore_case};

use scorer::PreparedQuery;

// ---------------------------------------------------------------------------
// Suggestion
// ---------------------------------------------------------------------------

/// A stored tag admitted into the suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingSuggestion {
    /// The stored tag, use count included for display.
    pub tag: Tag,
    /// Byte offset of each matched character in the prepared name, for
    /// highlighting.
    pub positions: Vec<usize>,
}

/// One entry of the ranked suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    /// An existing stored tag.
    Existing(ExistingSuggestion),
    /// Synthetic "create new tag" entry carrying the exact typed text.
    Create(String),
}

impl Suggestion {
    /// The name this suggestion would select.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(existing) => &existing.tag.name,
            Self::Create(name) => name,
        }
    }

    /// Whether this is the create-new entry.
    #[must_use]
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }
}

// ---------------------------------------------------------------------------
// Ranker
// ---------------------------------------------------------------------------

/// The suggestion ranking pipeline.
///
/// Carries scorer configuration only; every [`rank`](Self::rank) call is
/// independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    scorer: Scorer,
}

impl Ranker {
    /// Create a ranker with default scoring (diacritics folded).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ranker with custom scoring.
    #[must_use]
    pub fn with_scorer(scorer: Scorer) -> Self {
        Self { scorer }
    }

    /// Compute the ordered suggestion list.
    #[must_use]
    pub fn rank(&self, stored: &[Tag], query: &str, selected: &[Tag]) -> Vec<Suggestion> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "rank_suggestions",
            stored = stored.len(),
            selected = selected.len(),
            query_len = query.len()
        )
        .entered();

        let not_selected =
            |tag: &Tag| !selected.iter().any(|s| eq_ignore_case(&s.name, &tag.name));

        if query.is_empty() {
            return stored
                .iter()
                .filter(|tag| not_selected(tag))
                .map(|tag| {
                    Suggestion::Existing(ExistingSuggestion {
                        tag: tag.clone(),
                        positions: Vec::new(),
                    })
                })
                .collect();
        }

        let pq = PreparedQuery::new(query, self.scorer.keep_diacritics);
        let finder = (!pq.lower.is_empty()).then(|| memmem::Finder::new(pq.lower.as_bytes()));
        let mut buf = String::new();

        let mut matched: Vec<(&Tag, MatchResult)> = stored
            .iter()
            .filter_map(|tag| {
                let result = self
                    .scorer
                    .score_prepared(&tag.name, &pq, finder.as_ref(), &mut buf);
                result.rank.is_match().then_some((tag, result))
            })
            .collect();

        // Stable sort: equal tiers keep the stored set's relative order.
        matched.sort_by(|a, b| b.1.rank.partial_cmp(&a.1.rank).unwrap_or(Ordering::Equal));

        let mut suggestions: Vec<Suggestion> = matched
            .into_iter()
            .filter(|(tag, _)| not_selected(tag))
            .map(|(tag, result)| {
                Suggestion::Existing(ExistingSuggestion {
                    tag: tag.clone(),
                    positions: result.positions,
                })
            })
            .collect();

        // The create entry keys off the full store, not the filtered list: an
        // exact name that is merely already selected must not be re-creatable.
        if !stored.iter().any(|tag| tag.matches_name(query)) {
            suggestions.push(Suggestion::Create(query.to_string()));
        }

        suggestions
    }
}

/// Rank with default configuration.
///
/// Convenience wrapper over [`Ranker::rank`].
#[must_use]
pub fn rank(stored: &[Tag], query: &str, selected: &[Tag]) -> Vec<Suggestion> {
    Ranker::new().rank(stored, query, selected)
}
