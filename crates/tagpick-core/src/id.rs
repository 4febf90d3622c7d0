#![forbid(unsafe_code)]

//! Identifier generation for freshly created tags.
//!
//! The engine needs a unique id whenever the user selects a name that does not
//! exist in the stored set yet. Generation is an injectable seam so hosts can
//! pick their collision-resistance strategy and tests can supply deterministic
//! ids.
//!
//! Two sources are provided:
//!
//! - [`RandomIds`]: random 128-bit ids (UUID v4). Collision probability is
//!   negligible for any realistic session length. This is the default.
//! - [`SequentialIds`]: a session-scoped monotonic counter. Deterministic,
//!   intended for tests and single-session hosts that persist nothing.

use uuid::Uuid;

use crate::tag::TagId;

/// A source of unique tag ids.
///
/// Implementations must never hand out the same id twice within a session.
pub trait IdSource {
    /// Produce the next unique id.
    fn next_id(&mut self) -> TagId;
}

/// Random 128-bit ids backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl RandomIds {
    /// Create a random id source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> TagId {
        TagId::from_u128(Uuid::new_v4().as_u128())
    }
}

/// Session-scoped monotonic counter.
///
/// Ids are unique within one source instance only; two instances started at
/// the same value will collide. Fine for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Create a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter starting at `first`.
    ///
    /// Useful when seed data already occupies low id values.
    #[must_use]
    pub fn starting_at(first: u128) -> Self {
        Self { next: first }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> TagId {
        let id = TagId::from_u128(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
