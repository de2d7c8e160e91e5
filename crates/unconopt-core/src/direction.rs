//! Descent direction strategies.
//!
//! The iteration loop is shared by every method; the only thing that
//! distinguishes gradient descent from Newton's method is how the search
//! direction is obtained from the current derivatives, and whether those
//! derivatives include a Hessian.

use crate::{
    error::{OptimizerError, Result},
    types::{all_finite, DMatrix, DVector, Scalar},
};
use std::fmt::Debug;

/// Computes a search direction from the derivatives at the current point.
pub trait DirectionStrategy<T: Scalar>: Debug + Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether [`direction`](Self::direction) consumes a Hessian.
    ///
    /// Drives the `hessian_needed` flag of every evaluation the loop makes
    /// at accepted points.
    fn needs_hessian(&self) -> bool;

    /// Computes the search direction.
    ///
    /// # Errors
    ///
    /// `SingularHessian` when no direction can be formed from the Hessian,
    /// `MissingHessian` when one is required but absent.
    fn direction(&self, gradient: &DVector<T>, hessian: Option<&DMatrix<T>>) -> Result<DVector<T>>;
}

/// Steepest descent: p = −∇f(x).
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientDescentDirection;

impl<T: Scalar> DirectionStrategy<T> for GradientDescentDirection {
    fn name(&self) -> &str {
        "gradient_descent"
    }

    fn needs_hessian(&self) -> bool {
        false
    }

    fn direction(
        &self,
        gradient: &DVector<T>,
        _hessian: Option<&DMatrix<T>>,
    ) -> Result<DVector<T>> {
        Ok(-gradient)
    }
}

/// Newton step: p solves ∇²f(x) p = −∇f(x).
///
/// The system is solved by LU decomposition with partial pivoting, never by
/// forming the inverse.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonDirection;

impl<T: Scalar> DirectionStrategy<T> for NewtonDirection {
    fn name(&self) -> &str {
        "newton_method"
    }

    fn needs_hessian(&self) -> bool {
        true
    }

    fn direction(&self, gradient: &DVector<T>, hessian: Option<&DMatrix<T>>) -> Result<DVector<T>> {
        let hessian = hessian.ok_or_else(|| OptimizerError::missing_hessian("newton direction"))?;

        let rhs = -gradient;
        let p = hessian
            .clone()
            .lu()
            .solve(&rhs)
            .ok_or_else(|| OptimizerError::singular_hessian("LU factorization has a zero pivot"))?;

        // Near-singular systems can slip past the pivot check and blow up.
        if !all_finite(&p) {
            return Err(OptimizerError::singular_hessian(
                "Newton system produced a non-finite direction",
            ));
        }

        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gradient_descent_negates_gradient() {
        let g = DVector::from_vec(vec![3.0, -4.0]);
        let p = GradientDescentDirection.direction(&g, None).unwrap();
        assert_eq!(p, DVector::from_vec(vec![-3.0, 4.0]));
        assert!(!DirectionStrategy::<f64>::needs_hessian(&GradientDescentDirection));
    }

    #[test]
    fn test_newton_solves_system() {
        let h = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let g = DVector::from_vec(vec![1.0, 2.0]);

        let p = NewtonDirection.direction(&g, Some(&h)).unwrap();
        let residual = &h * &p + &g;
        assert_relative_eq!(residual.norm(), 0.0, epsilon = 1e-12);
        assert!(DirectionStrategy::<f64>::needs_hessian(&NewtonDirection));
    }

    #[test]
    fn test_newton_zero_hessian_is_singular() {
        let h = DMatrix::<f64>::zeros(2, 2);
        let g = DVector::from_vec(vec![1.0, -2.0]);

        let err = NewtonDirection.direction(&g, Some(&h)).unwrap_err();
        assert!(matches!(err, OptimizerError::SingularHessian { .. }));
    }

    #[test]
    fn test_newton_rank_deficient_hessian_is_singular() {
        let h = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let g = DVector::from_vec(vec![1.0, 1.0]);

        let err = NewtonDirection.direction(&g, Some(&h)).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_newton_overflowing_solve_is_singular() {
        // Pivots are nonzero, but -g₁ / 1e-300 overflows to -inf
        let h = DMatrix::from_row_slice(2, 2, &[1e-300, 0.0, 0.0, 1.0]);
        let g = DVector::from_vec(vec![1e100, 1.0]);

        let err = NewtonDirection.direction(&g, Some(&h)).unwrap_err();
        assert_eq!(
            err,
            OptimizerError::singular_hessian("Newton system produced a non-finite direction")
        );
    }

    #[test]
    fn test_newton_without_hessian() {
        let g = DVector::from_vec(vec![1.0_f64]);
        let err = NewtonDirection.direction(&g, None).unwrap_err();
        assert!(matches!(err, OptimizerError::MissingHessian { .. }));
    }

    #[test]
    fn test_newton_on_identity_quadratic() {
        // f = xᵀx at (1, 1): g = 2x, H = 2I, so p = -x
        let h = DMatrix::identity(2, 2) * 2.0;
        let g = DVector::from_vec(vec![2.0, 2.0]);

        let p = NewtonDirection.direction(&g, Some(&h)).unwrap();
        assert_relative_eq!(p, DVector::from_vec(vec![-1.0, -1.0]), epsilon = 1e-15);
    }
}
