//! # unconopt
//!
//! Unconstrained minimization of smooth functions f: ℝⁿ → ℝ by gradient
//! descent and Newton's method, both globalized with an Armijo backtracking
//! line search.
//!
//! ## Quick Start
//!
//! ```rust
//! use unconopt::prelude::*;
//!
//! // f(x) = (x₁ − 3)² + 10 x₂²
//! let bowl = FnObjective::new("bowl", |x: &DVector<f64>, hessian_needed: bool| {
//!     let value = (x[0] - 3.0).powi(2) + 10.0 * x[1] * x[1];
//!     let gradient = DVector::from_vec(vec![2.0 * (x[0] - 3.0), 20.0 * x[1]]);
//!     let eval = Evaluation::new(value, gradient);
//!     if hessian_needed {
//!         eval.with_hessian(DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 20.0]))
//!     } else {
//!         eval
//!     }
//! });
//!
//! let optimizer = Optimizer::with_method_name("newton_method", OptimizationConfig::new())?;
//! let result = optimizer.minimize(&bowl, &DVector::from_vec(vec![0.0, 1.0]))?;
//!
//! assert!(result.converged);
//! assert!((result.point[0] - 3.0).abs() < 1e-8);
//! println!("{}", result.summary());
//! # Ok::<(), unconopt::OptimizerError>(())
//! ```
//!
//! ## Crates
//!
//! - `unconopt-core`: objectives, line search, direction strategies and the
//!   iteration loop
//!
//! Logging goes through the `log` facade; install any logger to see the
//! per-iteration `debug!` records and the run summaries of
//! [`LogObserver`](prelude::LogObserver).

pub use unconopt_core::*;

/// Re-export of nalgebra for vector and matrix construction.
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use unconopt_core::prelude::*;
}
