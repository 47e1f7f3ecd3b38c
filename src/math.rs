//! Math function wrappers for std/no_std compatibility
//!
//! Uses standard library math when available, falls back to libm for no_std.

#[cfg(feature = "std")]
#[inline]
pub fn ceil(x: f64) -> f64 {
    x.ceil()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn ceil(x: f64) -> f64 {
    libm::ceil(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn abs(x: f64) -> f64 {
    x.abs()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn abs(x: f64) -> f64 {
    libm::fabs(x)
}
