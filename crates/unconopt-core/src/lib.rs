//! Core types and algorithms for unconstrained minimization.
//!
//! This crate minimizes smooth functions f: ℝⁿ → ℝ with two line-search
//! methods sharing one iteration loop:
//!
//! - **Gradient descent**: search direction −∇f(x)
//! - **Newton's method**: search direction solving ∇²f(x) p = −∇f(x)
//!
//! Step sizes come from a backtracking line search enforcing the Armijo
//! sufficient-decrease condition. Every run returns its final point together
//! with the full trajectory of visited points and objective values.
//!
//! # Modules
//!
//! - [`direction`]: Search direction strategies
//! - [`error`]: Error types
//! - [`line_search`]: Armijo backtracking line search
//! - [`objective`]: Objective function interface
//! - [`observer`]: Progress notifications and logging
//! - [`optimizer`]: The iteration loop, configuration and results
//! - [`trajectory`]: Trajectory records and plot windows
//! - [`types`]: Scalar trait and type aliases

pub mod direction;
pub mod error;
pub mod line_search;
pub mod objective;
pub mod observer;
pub mod optimizer;
pub mod trajectory;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_functions;

// Re-export commonly used items at the crate root
pub use error::{OptimizerError, Result};
pub use optimizer::{minimize, Method, OptimizationConfig, OptimizationResult, Optimizer};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use unconopt_core::prelude::*;
///
/// let config = OptimizationConfig::<f64>::new().with_method(Method::Newton);
/// assert!(config.validate().is_ok());
/// ```
pub mod prelude {
    pub use crate::direction::{DirectionStrategy, GradientDescentDirection, NewtonDirection};
    pub use crate::error::{OptimizerError, Result};
    pub use crate::line_search::{BacktrackingLineSearch, LineSearchParams, LineSearchResult};
    pub use crate::objective::{CountingObjective, Evaluation, FnObjective, ObjectiveFunction};
    pub use crate::observer::{IterationInfo, LogObserver, NoOpObserver, OptimizationObserver};
    pub use crate::optimizer::{
        minimize, Method, OptimizationConfig, OptimizationResult, Optimizer, TerminationReason,
    };
    pub use crate::trajectory::{PlotWindow, Trajectory};
    pub use crate::types::{DMatrix, DVector, Scalar};
}
