//! Injective mapping from query nodes to target nodes.

use std::fmt;

use contracts::*;
use itertools::Itertools;

/// An injective assignment `query index -> target index`.
///
/// Entry `i` of the underlying vector is the image of query node `i`, so the
/// mapping is always total over a prefix `0..len()` of the query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mapping {
    images: Vec<usize>,
}

impl Mapping {
    /// Builds a mapping, returning `None` if two query nodes share an image.
    #[must_use]
    pub fn new(images: Vec<usize>) -> Option<Self> {
        let mapping = Self { images };
        mapping.is_injective().then_some(mapping)
    }

    /// Builds a mapping the caller already knows to be injective.
    #[debug_requires(images.iter().all_unique())]
    pub(crate) fn from_injective(images: Vec<usize>) -> Self {
        Self { images }
    }

    /// The empty mapping (embedding of the empty query).
    #[must_use]
    pub const fn empty() -> Self {
        Self { images: Vec::new() }
    }

    /// Checks that no two query nodes map to the same target node.
    #[must_use]
    pub fn is_injective(&self) -> bool {
        self.images.iter().all_unique()
    }

    /// Resolves a query node to its target image.
    #[must_use]
    pub fn get(&self, query: usize) -> Option<usize> {
        self.images.get(query).copied()
    }

    /// Number of mapped query nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if nothing is mapped.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Images in query order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.images
    }

    /// `(query, target)` pairs in query order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.images.iter().copied().enumerate()
    }

    /// Sorted target indices covered by this mapping.
    #[must_use]
    pub fn signature(&self) -> Vec<usize> {
        let mut sig = self.images.clone();
        sig.sort_unstable();
        sig
    }

    /// Returns true if the images form a run of consecutive target indices in
    /// query order, i.e. `{0 -> k, 1 -> k+1, ...}`.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.images.iter().tuple_windows().all(|(a, b)| *b == a + 1)
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter().map(|(q, t)| format!("{q}->{t}")).join(", ")
        )
    }
}
