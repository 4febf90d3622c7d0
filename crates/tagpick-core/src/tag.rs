#![forbid(unsafe_code)]

//! Tag data model.
//!
//! A [`Tag`] is a named label with a use count, identified uniquely within the
//! stored set by its [`TagId`]. Names are the match key: case is preserved for
//! display, but every comparison the engine performs (equality, dedup,
//! exact-match detection) is case-insensitive via [`eq_ignore_case`].

use core::fmt;

/// Unique identifier for a tag.
///
/// Ids are opaque 128-bit values. Freshly created tags receive ids from an
/// [`IdSource`](crate::id::IdSource); tests typically construct small literal
/// ids with [`TagId::from_u128`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u128);

impl TagId {
    /// Construct an id from a raw 128-bit value.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    /// The raw 128-bit value of this id.
    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A named label attached to a record.
///
/// `uses` is an informational counter owned by the host; this engine displays
/// it but never increments or resets it once a tag exists. Only brand-new tags
/// start at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Unique identity within the stored set.
    pub id: TagId,
    /// Display name and case-insensitive match key.
    pub name: String,
    /// How many times the host has seen this tag used. Display-only.
    pub uses: u64,
}

impl Tag {
    /// Create a tag with a use count of zero.
    #[must_use]
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            uses: 0,
        }
    }

    /// Set the use count (builder).
    #[must_use]
    pub fn with_uses(mut self, uses: u64) -> Self {
        self.uses = uses;
        self
    }

    /// Whether this tag's name matches `name`, ignoring case.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        eq_ignore_case(&self.name, name)
    }
}

/// A tag about to be selected.
///
/// The two variants encode the asymmetry of the selection contract: a
/// candidate resolved from the stored set keeps its real use count, while a
/// freshly typed name always enters the session with `uses == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A tag that already exists in the stored set, re-selected as-is.
    Existing(Tag),
    /// A freshly typed name paired with a newly generated id.
    New {
        /// Generated id for the new tag.
        id: TagId,
        /// The exact text the user typed.
        name: String,
    },
}

impl Candidate {
    /// The display name this candidate will select.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(tag) => &tag.name,
            Self::New { name, .. } => name,
        }
    }

    /// The id this candidate will occupy in the selection.
    #[must_use]
    pub fn id(&self) -> TagId {
        match self {
            Self::Existing(tag) => tag.id,
            Self::New { id, .. } => *id,
        }
    }

    /// Convert into the tag that enters the session.
    ///
    /// `Existing` passes the stored tag through untouched (its `uses` count
    /// survives re-selection); `New` mints a tag with `uses == 0`.
    #[must_use]
    pub fn into_tag(self) -> Tag {
        match self {
            Self::Existing(tag) => tag,
            Self::New { id, name } => Tag::new(id, name),
        }
    }
}

/// Case-insensitive string equality.
///
/// ASCII inputs take a byte-level fast path. Non-ASCII inputs are compared
/// through `char::to_lowercase`, which is the same folding the rest of the
/// engine applies when matching names.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    let mut ac = a.chars().flat_map(char::to_lowercase);
    let mut bc = b.chars().flat_map(char::to_lowercase);
    loop {
        match (ac.next(), bc.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x == y => {}
            _ => return false,
        }
    }
}
