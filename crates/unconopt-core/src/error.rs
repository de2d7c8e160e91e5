//! Error types for unconstrained minimization.
//!
//! Three of the variants, [`OptimizerError::SingularHessian`],
//! [`OptimizerError::InvalidSearchDirection`] and
//! [`OptimizerError::LineSearchStalled`], never reach the caller of
//! [`Optimizer::minimize`](crate::optimizer::Optimizer::minimize): the
//! iteration loop recovers from them and reports a non-converged result.

use thiserror::Error;

/// Errors that can occur during optimization.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OptimizerError {
    /// The requested method is not implemented.
    ///
    /// Raised before the objective is evaluated even once.
    #[error("Unsupported method: {name}")]
    UnsupportedMethod {
        /// The method name that was requested
        name: String,
    },

    /// Invalid optimizer configuration.
    ///
    /// This error occurs when the optimizer is configured with invalid
    /// parameters (e.g., a negative tolerance or a shrink factor above one).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// The Newton system `H p = -g` could not be solved.
    #[error("Singular Hessian: {reason}")]
    SingularHessian {
        /// Description of why the solve failed
        reason: String,
    },

    /// Backtracking shrank the step the maximum number of times without
    /// satisfying the Armijo condition.
    #[error("Line search stalled after {backtracks} backtracks (last step {last_step_size:e})")]
    LineSearchStalled {
        /// Number of rejected trial steps
        backtracks: usize,
        /// Last step size tried
        last_step_size: f64,
        /// Function value at the starting point
        initial_value: f64,
    },

    /// The search direction does not point downhill: ⟨g, p⟩ ≥ 0 with p ≠ 0.
    #[error("Invalid search direction: not a descent direction (slope {slope:e})")]
    InvalidSearchDirection {
        /// Directional derivative ⟨g, p⟩
        slope: f64,
    },

    /// Objective output does not match the dimension of the input point.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A Hessian was requested but the objective did not supply one.
    #[error("Objective '{objective}' did not return a Hessian although one was requested")]
    MissingHessian {
        /// Name of the offending objective
        objective: String,
    },

    /// The objective reported a failure of its own.
    #[error("Objective evaluation failed: {reason}")]
    Objective {
        /// Description supplied by the objective
        reason: String,
    },
}

impl OptimizerError {
    /// Create an UnsupportedMethod error.
    pub fn unsupported_method<S: Into<String>>(name: S) -> Self {
        Self::UnsupportedMethod { name: name.into() }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a SingularHessian error with a custom reason.
    pub fn singular_hessian<S: Into<String>>(reason: S) -> Self {
        Self::SingularHessian {
            reason: reason.into(),
        }
    }

    /// Create a LineSearchStalled error with detailed context.
    pub fn line_search_stalled(backtracks: usize, last_step_size: f64, initial_value: f64) -> Self {
        Self::LineSearchStalled {
            backtracks,
            last_step_size,
            initial_value,
        }
    }

    /// Create an InvalidSearchDirection error.
    pub fn invalid_search_direction(slope: f64) -> Self {
        Self::InvalidSearchDirection { slope }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a MissingHessian error for the named objective.
    pub fn missing_hessian<S: Into<String>>(objective: S) -> Self {
        Self::MissingHessian {
            objective: objective.into(),
        }
    }

    /// Create an Objective error with a custom reason.
    pub fn objective<S: Into<String>>(reason: S) -> Self {
        Self::Objective {
            reason: reason.into(),
        }
    }

    /// Returns true for the conditions the iteration loop turns into a
    /// non-converged result instead of propagating.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SingularHessian { .. }
                | Self::LineSearchStalled { .. }
                | Self::InvalidSearchDirection { .. }
        )
    }
}

/// Result type alias for optimizer operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = OptimizerError::unsupported_method("nonexistent");
        assert!(matches!(err, OptimizerError::UnsupportedMethod { .. }));
        assert_eq!(err.to_string(), "Unsupported method: nonexistent");

        let err = OptimizerError::dimension_mismatch("gradient of length 2", "length 3");
        assert!(matches!(err, OptimizerError::DimensionMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected gradient of length 2, got length 3"
        );
    }

    #[test]
    fn test_optimizer_error_context() {
        let err = OptimizerError::line_search_stalled(100, 7.9e-31, 42.0);

        if let OptimizerError::LineSearchStalled {
            backtracks,
            last_step_size,
            initial_value,
        } = err
        {
            assert_eq!(backtracks, 100);
            assert_eq!(last_step_size, 7.9e-31);
            assert_eq!(initial_value, 42.0);
        } else {
            panic!("Expected LineSearchStalled variant");
        }

        let err =
            OptimizerError::invalid_configuration("must be positive", "objective_tolerance", "-1");
        assert!(err.to_string().contains("Invalid optimizer configuration"));
    }

    #[test]
    fn test_recoverable_variants() {
        assert!(OptimizerError::singular_hessian("zero pivot").is_recoverable());
        assert!(OptimizerError::line_search_stalled(1, 0.5, 1.0).is_recoverable());
        assert!(OptimizerError::invalid_search_direction(8.0).is_recoverable());
        assert!(!OptimizerError::unsupported_method("bfgs").is_recoverable());
        assert!(!OptimizerError::missing_hessian("f").is_recoverable());
        assert!(!OptimizerError::objective("domain error").is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            OptimizerError::unsupported_method("bfgs"),
            OptimizerError::invalid_configuration("negative value", "rho", "-0.5"),
            OptimizerError::singular_hessian("LU decomposition failed"),
            OptimizerError::line_search_stalled(50, 1e-16, 10.0),
            OptimizerError::invalid_search_direction(0.5),
            OptimizerError::dimension_mismatch("2x2", "3x3"),
            OptimizerError::missing_hessian("rosenbrock"),
            OptimizerError::objective("log of negative number"),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
