#![forbid(unsafe_code)]

//! Tiered match scoring for tag suggestions.
//!
//! Classifies how well a stored tag name matches the typed query into one of
//! eight ordered tiers, from exact case-sensitive equality down to an
//! in-order character ("closeness") match. The tier order is the one popular
//! fuzzy-match libraries use, so suggestion ranking behaves the way users of
//! those pickers expect:
//!
//! | Tier                 | Value | Description                                   |
//! |----------------------|-------|-----------------------------------------------|
//! | `CaseSensitiveEqual` | 7     | Exact byte-for-byte match                     |
//! | `Equal`              | 6     | Case-insensitive full match                   |
//! | `StartsWith`         | 5     | Candidate starts with query                   |
//! | `WordStartsWith`     | 4     | A word in the candidate starts with the query |
//! | `Contains`           | 3     | Query is a contiguous substring               |
//! | `Acronym`            | 2     | Query matches the candidate's acronym         |
//! | `Closeness(f64)`     | 1..2  | Query chars found in order, scored by spread  |
//! | `NoMatch`            | 0     | Excluded from suggestions                     |
//!
//! Matched character positions are tracked alongside the tier so a
//! presentation layer can highlight them.
//!
//! # Invariants
//!
//! 1. Determinism: same inputs, same rank.
//! 2. `Closeness` sub-scores fall in `(1.0, 2.0]`, strictly between the
//!    `NoMatch` and `Acronym` tiers.
//! 3. Position lists hold the byte offset of each matched character in the
//!    candidate as prepared for comparison (lowercased, diacritics stripped
//!    unless kept).

use std::borrow::Cow;
use std::cmp::Ordering;

use memchr::memmem;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// How well a candidate matches the query.
///
/// Higher-quality matches compare as greater. Two `Closeness` ranks compare
/// by sub-score; a `Closeness` rank against a fixed tier compares by tier
/// value, so `Acronym` outranks `Closeness` even at its maximum sub-score.
#[derive(Debug, Clone, Copy)]
pub enum Rank {
    /// Exact byte-for-byte match.
    CaseSensitiveEqual,
    /// Case-insensitive full match.
    Equal,
    /// Candidate starts with the query.
    StartsWith,
    /// A word boundary within the candidate starts with the query.
    WordStartsWith,
    /// Candidate contains the query as a substring.
    Contains,
    /// Query matches the candidate's word-initial acronym.
    Acronym,
    /// Query characters found in order; sub-score is `1.0 + 1.0 / spread`
    /// where `spread` is the char distance between the first and last match
    /// (2.0 when the spread is zero).
    Closeness(f64),
    /// No match found.
    NoMatch,
}

impl Rank {
    fn tier_value(&self) -> u8 {
        match self {
            Rank::CaseSensitiveEqual => 7,
            Rank::Equal => 6,
            Rank::StartsWith => 5,
            Rank::WordStartsWith => 4,
            Rank::Contains => 3,
            Rank::Acronym => 2,
            Rank::Closeness(_) => 1,
            Rank::NoMatch => 0,
        }
    }

    /// Whether this rank admits the candidate into the suggestion list.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.tier_value() > 0
    }
}

// Manual impls: `f64` rules out deriving `Eq`, and the ordering must treat
// the `Closeness` sub-score as a fractional tier.
impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rank::Closeness(a), Rank::Closeness(b)) => a == b,
            _ => self.tier_value() == other.tier_value(),
        }
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Rank::Closeness(a), Rank::Closeness(b)) => a.partial_cmp(b),
            _ => self.tier_value().partial_cmp(&other.tier_value()),
        }
    }
}

// ---------------------------------------------------------------------------
// Match result
// ---------------------------------------------------------------------------

/// Result of scoring a candidate against a query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Match tier.
    pub rank: Rank,
    /// Byte offset of each matched character in the prepared candidate.
    pub positions: Vec<usize>,
}

impl MatchResult {
    /// A no-match result.
    #[must_use]
    pub fn no_match() -> Self {
        Self {
            rank: Rank::NoMatch,
            positions: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Preparation helpers
// ---------------------------------------------------------------------------

/// Strip diacritics via NFD decomposition unless the caller keeps them.
///
/// Allocates only when combining marks are actually removed.
fn prepare(s: &str, keep_diacritics: bool) -> Cow<'_, str> {
    if keep_diacritics || s.is_ascii() {
        return Cow::Borrowed(s);
    }
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    if stripped == s {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(stripped)
    }
}

/// Lowercase `s` into `buf`, reusing the buffer's allocation.
fn lowercase_into(s: &str, buf: &mut String) {
    buf.clear();
    buf.reserve(s.len());
    if s.is_ascii() {
        buf.extend(s.as_bytes().iter().map(|&b| b.to_ascii_lowercase() as char));
    } else {
        for c in s.chars() {
            buf.extend(c.to_lowercase());
        }
    }
}

fn is_acronym_delimiter(c: char) -> bool {
    c == ' ' || c == '-'
}

/// Collect the word-initial characters of `s` plus their byte offsets.
///
/// Word boundaries are spaces and hyphens. Delimiter runs contribute a
/// single boundary; leading delimiters contribute none.
fn acronym_with_positions(s: &str) -> (String, Vec<usize>) {
    let mut acronym = String::new();
    let mut positions = Vec::new();
    let mut prev = ' ';
    for (i, c) in s.char_indices() {
        if is_acronym_delimiter(prev) && !is_acronym_delimiter(c) {
            acronym.push(c);
            positions.push(i);
        }
        prev = c;
    }
    (acronym, positions)
}

/// Greedy in-order character match.
///
/// Returns the closeness rank and the byte offset of each matched character,
/// or `None` when some query character cannot be found in order.
fn closeness_match(candidate: &str, query: &str) -> Option<(Rank, Vec<usize>)> {
    let mut chars = candidate.char_indices().enumerate();
    let mut positions = Vec::new();
    let mut first_char_idx: Option<usize> = None;
    let mut last_char_idx = 0usize;

    for qc in query.chars() {
        let (char_idx, (byte_idx, _)) = chars.find(|&(_, (_, c))| c == qc)?;
        if first_char_idx.is_none() {
            first_char_idx = Some(char_idx);
        }
        last_char_idx = char_idx;
        positions.push(byte_idx);
    }

    let spread = last_char_idx - first_char_idx.unwrap_or(0);
    let rank = if spread == 0 {
        Rank::Closeness(2.0)
    } else {
        Rank::Closeness(1.0 + 1.0 / spread as f64)
    };
    Some((rank, positions))
}

/// Pre-computed query data, built once per ranking pass.
pub(crate) struct PreparedQuery {
    /// The query after optional diacritics stripping.
    prepared: String,
    /// Lowercased form of `prepared`.
    pub(crate) lower: String,
    /// Character count of `lower`.
    char_count: usize,
}

impl PreparedQuery {
    pub(crate) fn new(query: &str, keep_diacritics: bool) -> Self {
        let prepared = prepare(query, keep_diacritics).into_owned();
        let lower = prepared.to_lowercase();
        let char_count = if lower.is_ascii() {
            lower.len()
        } else {
            lower.chars().count()
        };
        Self {
            prepared,
            lower,
            char_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Tiered fuzzy matcher.
///
/// Pure and stateless; a `Scorer` only carries configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    /// Keep diacritics instead of folding them away before comparison.
    pub keep_diacritics: bool,
}

impl Scorer {
    /// Create a scorer that folds diacritics (the default).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer that compares diacritics literally.
    #[must_use]
    pub fn keeping_diacritics() -> Self {
        Self {
            keep_diacritics: true,
        }
    }

    /// Score one candidate against a query.
    ///
    /// One-off entry point; ranking loops go through the prepared-query path
    /// to avoid re-normalizing the query per candidate.
    #[must_use]
    pub fn score(&self, candidate: &str, query: &str) -> MatchResult {
        let pq = PreparedQuery::new(query, self.keep_diacritics);
        let finder = (!pq.lower.is_empty()).then(|| memmem::Finder::new(pq.lower.as_bytes()));
        let mut buf = String::new();
        self.score_prepared(candidate, &pq, finder.as_ref(), &mut buf)
    }

    /// Hot-path scoring with pre-prepared query data and a reusable
    /// lowercase buffer.
    ///
    /// `finder` is the substring searcher for the lowercased query, or `None`
    /// when the query is empty.
    pub(crate) fn score_prepared(
        &self,
        candidate: &str,
        pq: &PreparedQuery,
        finder: Option<&memmem::Finder<'_>>,
        buf: &mut String,
    ) -> MatchResult {
        let prepared = prepare(candidate, self.keep_diacritics);

        // A query with more characters than the candidate cannot match.
        let candidate_chars = if prepared.is_ascii() {
            prepared.len()
        } else {
            prepared.chars().count()
        };
        if pq.char_count > candidate_chars {
            return MatchResult::no_match();
        }

        if *prepared == *pq.prepared {
            return MatchResult {
                rank: Rank::CaseSensitiveEqual,
                positions: char_positions(&prepared, 0, prepared.len()),
            };
        }

        lowercase_into(&prepared, buf);

        if let Some(finder) = finder {
            let bytes = buf.as_bytes();
            let query_len = pq.lower.len();
            let mut occurrences = finder.find_iter(bytes);

            if let Some(first) = occurrences.next() {
                if first == 0 {
                    if buf.len() == query_len {
                        return MatchResult {
                            rank: Rank::Equal,
                            positions: char_positions(buf, 0, query_len),
                        };
                    }
                    return MatchResult {
                        rank: Rank::StartsWith,
                        positions: char_positions(buf, 0, query_len),
                    };
                }

                // Prefer an occurrence sitting at a word boundary.
                if bytes[first - 1] == b' ' {
                    return MatchResult {
                        rank: Rank::WordStartsWith,
                        positions: char_positions(buf, first, first + query_len),
                    };
                }
                for pos in occurrences {
                    if bytes[pos - 1] == b' ' {
                        return MatchResult {
                            rank: Rank::WordStartsWith,
                            positions: char_positions(buf, pos, pos + query_len),
                        };
                    }
                }

                return MatchResult {
                    rank: Rank::Contains,
                    positions: char_positions(buf, first, first + query_len),
                };
            }
        } else {
            // Empty query: trivially a prefix of anything, full match of
            // nothing but the empty candidate.
            let rank = if buf.is_empty() {
                Rank::Equal
            } else {
                Rank::StartsWith
            };
            return MatchResult {
                rank,
                positions: Vec::new(),
            };
        }

        // A single-character query that was not found as a substring cannot
        // match via acronym or closeness either.
        if pq.char_count == 1 {
            return MatchResult::no_match();
        }

        let (acronym, word_positions) = acronym_with_positions(buf);
        if let Some(offset) = acronym.find(&pq.lower) {
            let start = acronym[..offset].chars().count();
            return MatchResult {
                rank: Rank::Acronym,
                positions: word_positions[start..start + pq.char_count].to_vec(),
            };
        }

        match closeness_match(buf, &pq.lower) {
            Some((rank, positions)) => MatchResult { rank, positions },
            None => MatchResult::no_match(),
        }
    }
}

/// Byte offsets of each character in `s[start..end]`.
fn char_positions(s: &str, start: usize, end: usize) -> Vec<usize> {
    s[start..end].char_indices().map(|(i, _)| start + i).collect()
}
