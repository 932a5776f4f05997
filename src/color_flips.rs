use core::ops::{Add, AddAssign};

/// Number of red/black toggles performed while rebalancing.
///
/// Only actual toggles count: repainting a node with the color it already
/// has leaves the tally unchanged.
///
/// # Examples
///
/// ```
/// use shelfmark::{ColorFlips, RbTreeMap};
///
/// let mut map = RbTreeMap::new();
/// let flips = map.insert(1, "a").unwrap();
/// // The new red root is repainted black.
/// assert_eq!(flips, ColorFlips(1));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ColorFlips(pub u64);

impl ColorFlips {
    #[inline]
    pub(crate) fn record(&mut self) {
        self.0 += 1;
    }

    /// Returns the raw count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Add for ColorFlips {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for ColorFlips {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

