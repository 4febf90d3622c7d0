#![forbid(unsafe_code)]

//! tagpick public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.
//!
//! # Quick start
//!
//! ```
//! use tagpick::prelude::*;
//!
//! let mut input = TagInput::with_id_source(SequentialIds::starting_at(100))
//!     .with_selected(vec![Tag::new(TagId::from_u128(1), "Dogs")])
//!     .with_stored(vec![
//!         Tag::new(TagId::from_u128(0), "Cats").with_uses(1),
//!         Tag::new(TagId::from_u128(1), "Dogs").with_uses(101),
//!     ]);
//!
//! input.handle(Intent::SetQuery("ca".into()));
//! assert_eq!(input.suggestions().len(), 2); // Cats, then the create entry
//!
//! input.handle(Intent::Select("Cats".into()));
//! assert_eq!(input.selected().len(), 2);
//! assert_eq!(input.query(), "");
//! ```

// --- Core re-exports -------------------------------------------------------

pub use tagpick_core::{
    Action, Candidate, IdSource, RandomIds, SequentialIds, SessionState, Tag, TagId,
    eq_ignore_case,
};

// --- Widget re-exports -----------------------------------------------------

pub use tagpick_widgets::{
    Effect, ExistingSuggestion, Focus, Intent, MatchResult, Rank, Ranker, Scorer, Suggestion,
    TagInput, rank,
};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use tagpick_core::{
        Action, Candidate, IdSource, RandomIds, SequentialIds, SessionState, Tag, TagId,
    };
    pub use tagpick_widgets::{Effect, Focus, Intent, Ranker, Suggestion, TagInput, rank};
}
