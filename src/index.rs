//! Node identifier types.

use std::fmt;
use std::hash::Hash;

/// The default integer type for node and path identifiers.
///
/// `u64` is the default so that identifiers of the packed representation,
/// which double as offsets into its backing vector, cover genome-scale
/// graphs. Use a narrower type to reduce the size of the graph's data when
/// the scale permits it.
pub type DefaultIx = u64;

/// Trait for the unsigned integer type used for node and path identifiers.
///
/// Zero is reserved as the "no such node" sentinel in every implementation,
/// so valid identifiers are strictly positive.
///
/// # Safety
///
/// Marked `unsafe` because: the trait must faithfully preserve
/// and convert index values.
pub unsafe trait IdType: Copy + Default + Hash + Ord + fmt::Debug + 'static {
    /// Bit width of the type; the topmost bit carries the orientation flag
    /// in packed path steps.
    const BITS: u32;

    fn new(x: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

unsafe impl IdType for usize {
    const BITS: u32 = usize::BITS;

    #[inline(always)]
    fn new(x: usize) -> Self {
        x
    }
    #[inline(always)]
    fn index(&self) -> Self {
        *self
    }
    #[inline(always)]
    fn max() -> Self {
        usize::MAX
    }
}

unsafe impl IdType for u64 {
    const BITS: u32 = u64::BITS;

    #[inline(always)]
    fn new(x: usize) -> Self {
        x as u64
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
    #[inline(always)]
    fn max() -> Self {
        u64::MAX
    }
}

unsafe impl IdType for u32 {
    const BITS: u32 = u32::BITS;

    #[inline(always)]
    fn new(x: usize) -> Self {
        x as u32
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
    #[inline(always)]
    fn max() -> Self {
        u32::MAX
    }
}

/// Shorthand for the zero sentinel of an identifier type.
#[inline]
pub(crate) fn zero<Ix: IdType>() -> Ix {
    Ix::new(0)
}

/// `true` if `id` is the "no such node" sentinel.
#[inline]
pub(crate) fn is_sentinel<Ix: IdType>(id: Ix) -> bool {
    id.index() == 0
}
