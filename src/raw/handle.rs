use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Stable index of a node in the tree arena.
///
/// The highest representable index is never handed out by the arena and is
/// reserved for the shared sentinel (`NIL`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest index the arena may allocate.
    pub(crate) const MAX: usize = (RawHandle::MAX - 2) as usize;

    /// The sentinel: every absent child and the parent of the root.
    pub(crate) const NIL: Self = Self::from_raw_index(Self::MAX + 1);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        Self::from_raw_index(index)
    }

    #[inline]
    const fn from_raw_index(index: usize) -> Self {
        // `index + 1` cannot be zero and fits because `index <= MAX + 1`.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_nil(self) -> bool {
        self.0.get() == Self::NIL.0.get()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Verify our assumptions about `Handle` and the niche optimization.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn invalid_handle() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    #[test]
    fn nil_is_outside_allocatable_range() {
        assert!(Handle::NIL.is_nil());
        assert_eq!(Handle::NIL.to_index(), Handle::MAX + 1);
        assert!(!Handle::from_index(Handle::MAX).is_nil());
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            let handle = Handle::from_index(index);
            prop_assert_eq!(handle.to_index(), index);
            prop_assert!(!handle.is_nil());
        }
    }
}
