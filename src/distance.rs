/// Absolute distance between two keys, used by nearest-key probes.
///
/// # Examples
///
/// ```
/// use shelfmark::Distance;
///
/// assert_eq!(90_i64.distance(&80), 10);
/// assert_eq!((-5_i32).distance(&5), 10);
/// ```
pub trait Distance {
    /// Returns `|self - other|`.
    fn distance(&self, other: &Self) -> u64;
}

macro_rules! impl_distance {
    ($($t:ty),* $(,)?) => {
        $(
            impl Distance for $t {
                #[inline]
                #[allow(clippy::cast_lossless, trivial_numeric_casts)]
                fn distance(&self, other: &Self) -> u64 {
                    self.abs_diff(*other) as u64
                }
            }
        )*
    };
}

impl_distance!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
