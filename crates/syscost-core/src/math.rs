//! Math functions for no_std compatibility.
//!
//! `f64::sqrt` lives in `std`; libm provides the correctly rounded equivalent.

/// Square root.
#[inline]
pub fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}
