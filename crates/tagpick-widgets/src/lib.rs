#![forbid(unsafe_code)]

//! Widget-level controller and suggestion ranking for tag selection.
//!
//! Two cooperating pieces live here:
//!
//! - [`input::TagInput`]: drives one session — query editing, suggestion
//!   navigation, the focus/removal walk over selected chips — against the
//!   state machine in `tagpick-core`.
//! - [`suggest`]: the pure candidate ranker turning the stored tag history,
//!   the typed query, and the current selection into an ordered suggestion
//!   list.
//!
//! Rendering is deliberately absent: a presentation layer feeds
//! [`Intent`](input::Intent)s in, renders from the accessors, and mirrors
//! [`Effect`](input::Effect)s onto real focus.

pub mod input;
pub mod suggest;

pub use input::{Effect, Focus, Intent, TagInput};
pub use suggest::{ExistingSuggestion, MatchResult, Rank, Ranker, Scorer, Suggestion, rank};
