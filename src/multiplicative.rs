//! A capability trait for types with an in-place, checked multiplication
//! and a distinguished identity of a given degree.
//!
//! [`crate::pbr::PBR`] is the motivating implementor (binary relations under
//! composition); the trait exists independently of it so other element
//! types (inverse-monoid or transformation representations, say) can share
//! the same `one`/`product_inplace` vocabulary without depending on PBRs.

use crate::error::Result;

/// Elements of a monoid whose multiplication can be computed in place.
///
/// `self` is never passed as `a` or `b` to its own [`Multiplicative::product_inplace`]
/// call in this crate; in safe Rust that aliasing is already ruled out by the
/// borrow checker (`&mut self` cannot coexist with a `&Self` borrow of the
/// same binding), so implementors need not guard against it explicitly the
/// way the C++ original does.
pub trait Multiplicative: Sized {
    /// The identity element for the given `degree`.
    fn one(degree: usize) -> Self;

    /// Overwrites `self` with the product `a * b`.
    ///
    /// # Errors
    /// Implementors return [`crate::error::Error::Mismatch`] if `a` and `b`
    /// have different degrees.
    fn product_inplace(&mut self, a: &Self, b: &Self) -> Result<()>;

    /// The degree (half the number of points, for a binary relation; the
    /// size of the underlying set, for a transformation).
    fn degree(&self) -> usize;
}
