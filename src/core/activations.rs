#[allow(unused)]
use crate::prelude::*;

/// Logistic function `1 / (1 + e^-x)`.
///
/// The result lies strictly between 0 and 1 for `x` in roughly
/// `[-709.7, 36.7]`. Past those edges it rounds to exactly `1.0` (from
/// about 37, where `e^-x` drops below half an ulp of 1) or to `0.0` (below
/// about -709.8, where `e^-x` overflows to infinity).
#[inline]
pub fn activate(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of [`activate`] at `x`.
///
/// `x` is a raw (pre-activation) value: the function is applied again here,
/// so passing an already activated value gives the derivative at that value.
#[inline]
pub fn activation_derivative(x: f64) -> f64 {
    let s = activate(x);
    s * (1.0 - s)
}

pub fn activate_all(z: &Array1<f64>) -> Array1<f64> {
    z.mapv(activate)
}
