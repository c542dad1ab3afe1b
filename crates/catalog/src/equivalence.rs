//! Two-mode comparison for catalog values.
//!
//! Carriers are re-described by the network itself once tuned (a cable
//! carrier's spectral inversion and bandwidth are only known after a lock),
//! so the same physical carrier can show up under several representations.
//! Catalog types therefore never rely on structural equality; they compare
//! through [`Equivalence`] and the caller picks how strict to be.

/// How strictly two values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Match {
    /// Every field must agree, including correction fields.
    Exact,
    /// Only the core tunable parameters must agree; volatile or corrected
    /// fields are ignored.
    Loose,
}

/// Comparison of two values of the same catalog type under a [`Match`] mode.
///
/// Implementations must guarantee that an [`Exact`](Match::Exact) match
/// implies a [`Loose`](Match::Loose) match.
pub trait Equivalence {
    fn matches(&self, other: &Self, mode: Match) -> bool;

    fn exactly(&self, other: &Self) -> bool {
        self.matches(other, Match::Exact)
    }

    fn loosely(&self, other: &Self) -> bool {
        self.matches(other, Match::Loose)
    }
}

/// Returns the first item in `items` matching `needle` under `mode`.
pub fn find<'a, T: Equivalence>(items: impl IntoIterator<Item = &'a T>, needle: &T, mode: Match) -> Option<&'a T>
where
    T: 'a,
{
    items.into_iter().find(|item| item.matches(needle, mode))
}

/// Returns `true` if any item in `items` matches `needle` under `mode`.
pub fn contains<'a, T: Equivalence>(items: impl IntoIterator<Item = &'a T>, needle: &T, mode: Match) -> bool
where
    T: 'a,
{
    find(items, needle, mode).is_some()
}
