//! Chemical additive records and count-bounded additive lists.

use smallvec::SmallVec;

/// Largest additive list that can be encoded (the count is a `u16` on the wire).
pub const MAX_ADDITIVES: usize = u16::MAX as usize;

/// A substance identifier with its concentration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Additive {
    /// Substance identifier.
    pub code: u32,
    /// Concentration of the substance.
    pub concentration: f32,
}

impl Additive {
    /// Create an additive record.
    pub const fn new(code: u32, concentration: f32) -> Self {
        Self {
            code,
            concentration,
        }
    }
}

/// An ordered list of additives applied to soil or atmosphere.
///
/// Most episodes carry a handful of additives, so up to four are stored
/// inline. The list itself is unbounded; the `u16` count limit is enforced
/// when the list is validated or encoded.
///
/// # Examples
///
/// ```
/// use adf_core::{Additive, AdditiveList};
///
/// let list: AdditiveList = vec![Additive::new(1, 2.5)].into();
/// assert_eq!(list.len(), 1);
/// assert!(list.fits_wire());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AdditiveList {
    items: SmallVec<[Additive; 4]>,
}

impl AdditiveList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: SmallVec::with_capacity(capacity),
        }
    }

    /// Append an additive.
    pub fn push(&mut self, additive: Additive) {
        self.items.push(additive);
    }

    /// Number of additives. O(1).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the list holds no additives.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the list count fits the `u16` wire prefix.
    pub fn fits_wire(&self) -> bool {
        self.items.len() <= MAX_ADDITIVES
    }

    /// The additives in insertion order.
    pub fn as_slice(&self) -> &[Additive] {
        &self.items
    }

    /// Iterate over the additives in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Additive> {
        self.items.iter()
    }

    /// Iterate over the substance codes in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.items.iter().map(|a| a.code)
    }
}

impl From<Vec<Additive>> for AdditiveList {
    fn from(v: Vec<Additive>) -> Self {
        Self {
            items: SmallVec::from_vec(v),
        }
    }
}

impl FromIterator<Additive> for AdditiveList {
    fn from_iter<I: IntoIterator<Item = Additive>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AdditiveList {
    type Item = &'a Additive;
    type IntoIter = std::slice::Iter<'a, Additive>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
