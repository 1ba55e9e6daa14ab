use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// Absolute tolerance used when checking solved plans against their constraints
pub const TOLERANCE: f64 = 1e-6;

/// Allowed deviation for a quantity of the given magnitude: [`TOLERANCE`] absolute up to 1.0, relative above.
pub fn tolerance_for(magnitude: f64) -> f64 {
    TOLERANCE * magnitude.abs().max(1.0)
}

///Wrapper around the [`float_cmp::approx_eq!()`] macro for comparing quantities with an absolute tolerance of [`TOLERANCE`].
///Two FPAs are considered equal if they are within the tolerance of each other.
#[derive(Debug, Clone, Copy)]
pub struct FPA(pub f64);

impl<T> From<T> for FPA
where
    T: Into<f64>,
{
    fn from(n: T) -> Self {
        FPA(n.into())
    }
}

impl PartialEq<Self> for FPA {
    fn eq(&self, other: &Self) -> bool {
        float_cmp::approx_eq!(f64, self.0, other.0, epsilon = TOLERANCE)
    }
}

impl PartialOrd<Self> for FPA {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.eq(other) {
            true => Some(Ordering::Equal),
            false => self.0.partial_cmp(&other.0),
        }
    }
}

impl Display for FPA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
