#![forbid(unsafe_code)]

//! Core state machine for tag selection.
//!
//! This crate owns the three pieces of session state — the query text, the
//! ordered selection, and the stored tag history — and the total, pure
//! transition function over them. It knows nothing about rendering, focus
//! wiring, or suggestion ranking; those live upstack.
//!
//! # Example
//!
//! ```
//! use tagpick_core::{Action, Candidate, SessionState, Tag, TagId};
//!
//! let mut state = SessionState::new(
//!     vec![Tag::new(TagId::from_u128(1), "Dogs")],
//!     vec![
//!         Tag::new(TagId::from_u128(0), "Cats").with_uses(1),
//!         Tag::new(TagId::from_u128(1), "Dogs").with_uses(101),
//!     ],
//! );
//!
//! state.apply(Action::SetQuery("ca".into()));
//! let cats = state.find_stored("cats").unwrap().clone();
//! state.apply(Action::AddTag(Candidate::Existing(cats)));
//!
//! assert_eq!(state.query(), "");
//! assert_eq!(state.selected().len(), 2);
//! ```

pub mod id;
pub mod reducer;
pub mod tag;

pub use id::{IdSource, RandomIds, SequentialIds};
pub use reducer::{Action, SessionState};
pub use tag::{Candidate, Tag, TagId, eq_ignore_case};
