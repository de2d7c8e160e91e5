//! Type definitions and aliases for unconstrained optimization.
//!
//! This module provides the numeric trait shared by every algorithm in the
//! crate together with the dense vector and matrix aliases used for points,
//! gradients and Hessians.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in optimization (f32 or f64).
///
/// This trait combines all the necessary numeric traits required
/// by the line search and the direction strategies.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default tolerance on the absolute change of the objective value.
    const DEFAULT_OBJECTIVE_TOLERANCE: Self;

    /// Default tolerance on the Euclidean norm of an accepted step.
    const DEFAULT_PARAMETER_TOLERANCE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Convert to f64 (for logging/display).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("Failed to convert to f64")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_OBJECTIVE_TOLERANCE: Self = 1e-7;
    const DEFAULT_PARAMETER_TOLERANCE: Self = 1e-5;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_OBJECTIVE_TOLERANCE: Self = 1e-12;
    const DEFAULT_PARAMETER_TOLERANCE: Self = 1e-8;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

/// Returns true when every entry of the vector is finite.
pub fn all_finite<T: Scalar>(v: &DVector<T>) -> bool {
    v.iter().all(|x| <T as Float>::is_finite(*x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_trait_f32() {
        assert_eq!(<f32 as Scalar>::EPSILON, f32::EPSILON);
        assert!(f32::DEFAULT_OBJECTIVE_TOLERANCE > 0.0);
        assert!(f32::DEFAULT_PARAMETER_TOLERANCE > f32::DEFAULT_OBJECTIVE_TOLERANCE);
    }

    #[test]
    fn test_scalar_trait_f64() {
        assert_eq!(<f64 as Scalar>::EPSILON, f64::EPSILON);
        assert_eq!(f64::DEFAULT_OBJECTIVE_TOLERANCE, 1e-12);
        assert_eq!(f64::DEFAULT_PARAMETER_TOLERANCE, 1e-8);
    }

    #[test]
    fn test_scalar_conversions() {
        let val_f64 = 3.14159;
        let val_f32 = <f32 as Scalar>::from_f64(val_f64);
        assert_relative_eq!(val_f32 as f64, val_f64, epsilon = 1e-6);

        let back_f64 = val_f32.to_f64();
        assert_relative_eq!(back_f64, val_f32 as f64);
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&DVector::from_vec(vec![1.0, -2.0, 0.0])));
        assert!(!all_finite(&DVector::from_vec(vec![1.0, f64::NAN])));
        assert!(!all_finite(&DVector::from_vec(vec![f64::INFINITY])));
        assert!(all_finite(&DVector::<f64>::zeros(0)));
    }
}
