//! Gradient descent and Newton's method for unconstrained minimization.
//!
//! Both methods run the same iteration:
//!
//! 1. **Initialization**: evaluate f at x₀ and record (x₀, f(x₀))
//! 2. **Search direction**: pₖ from the method's [`DirectionStrategy`]
//! 3. **Line search**: αₖ from Armijo backtracking
//! 4. **Update**: x̃ = xₖ + αₖ pₖ, evaluate f(x̃)
//! 5. **Convergence**: stop if |f(x̃) − f(xₖ)| < ε_f or ‖x̃ − xₖ‖ < ε_x
//!
//! The convergence test is the only way a run ends successfully. A run also
//! ends when the iteration budget is spent, when no descent direction is
//! available, or when the line search stalls; those outcomes are reported
//! through [`OptimizationResult::termination_reason`] with `converged = false`
//! rather than as errors.
//!
//! # Example
//!
//! ```rust
//! use unconopt_core::prelude::*;
//!
//! let sphere = FnObjective::new("sphere", |x: &DVector<f64>, hessian_needed: bool| {
//!     let eval = Evaluation::new(x.dot(x), x * 2.0);
//!     if hessian_needed {
//!         eval.with_hessian(DMatrix::identity(x.len(), x.len()) * 2.0)
//!     } else {
//!         eval
//!     }
//! });
//!
//! let config = OptimizationConfig::new().with_method(Method::Newton);
//! let result = minimize(&sphere, &DVector::from_vec(vec![1.0, 1.0]), &config)?;
//!
//! assert!(result.converged);
//! assert_eq!(result.path().len(), result.iterations + 1);
//! # Ok::<(), unconopt_core::error::OptimizerError>(())
//! ```

use crate::{
    direction::{DirectionStrategy, GradientDescentDirection, NewtonDirection},
    error::{OptimizerError, Result},
    line_search::{BacktrackingLineSearch, LineSearchParams},
    objective::{evaluate_checked, ObjectiveFunction},
    observer::{format_point, IterationInfo, NoOpObserver, OptimizationObserver},
    trajectory::Trajectory,
    types::{DVector, Scalar},
};
use log::debug;
use num_traits::Float;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Minimization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// Steepest descent, first-order
    GradientDescent,
    /// Newton's method, requires Hessians
    #[cfg_attr(feature = "serde", serde(rename = "newton_method"))]
    Newton,
}

impl Method {
    /// Canonical name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GradientDescent => "gradient_descent",
            Method::Newton => "newton_method",
        }
    }

    fn strategy<T: Scalar>(&self) -> Box<dyn DirectionStrategy<T>> {
        match self {
            Method::GradientDescent => Box::new(GradientDescentDirection),
            Method::Newton => Box::new(NewtonDirection),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gradient_descent" | "gd" => Ok(Method::GradientDescent),
            "newton_method" | "newton" => Ok(Method::Newton),
            other => Err(OptimizerError::unsupported_method(other)),
        }
    }
}

/// Configuration of a minimization run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationConfig<T: Scalar> {
    /// Tolerance on the absolute change of the objective value: |f(xₖ₊₁) − f(xₖ)| < ε_f
    pub objective_tolerance: T,

    /// Tolerance on the Euclidean step length: ‖xₖ₊₁ − xₖ‖ < ε_x
    pub parameter_tolerance: T,

    /// Maximum number of iterations
    pub max_iterations: usize,

    /// Minimization method
    pub method: Method,

    /// Backtracking line search parameters
    pub line_search: LineSearchParams<T>,
}

impl<T: Scalar> Default for OptimizationConfig<T> {
    fn default() -> Self {
        Self {
            objective_tolerance: T::DEFAULT_OBJECTIVE_TOLERANCE,
            parameter_tolerance: T::DEFAULT_PARAMETER_TOLERANCE,
            max_iterations: 100,
            method: Method::GradientDescent,
            line_search: LineSearchParams::default(),
        }
    }
}

impl<T: Scalar> OptimizationConfig<T> {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the objective change tolerance.
    pub fn with_objective_tolerance(mut self, tol: T) -> Self {
        self.objective_tolerance = tol;
        self
    }

    /// Sets the step length tolerance.
    pub fn with_parameter_tolerance(mut self, tol: T) -> Self {
        self.parameter_tolerance = tol;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Sets the method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the method by name.
    ///
    /// # Errors
    ///
    /// `UnsupportedMethod` if the name is not recognized.
    pub fn with_method_name(self, name: &str) -> Result<Self> {
        Ok(self.with_method(name.parse()?))
    }

    /// Sets the line search parameters.
    pub fn with_line_search(mut self, params: LineSearchParams<T>) -> Self {
        self.line_search = params;
        self
    }

    /// Validates the configuration.
    ///
    /// Both tolerances must be positive and finite; the line search
    /// parameters must pass [`LineSearchParams::validate`].
    pub fn validate(&self) -> Result<()> {
        for (name, tol) in [
            ("objective_tolerance", self.objective_tolerance),
            ("parameter_tolerance", self.parameter_tolerance),
        ] {
            if !(tol > T::zero()) || !Float::is_finite(tol) {
                return Err(OptimizerError::invalid_configuration(
                    "Tolerance must be positive and finite",
                    name,
                    tol.to_string(),
                ));
            }
        }

        self.line_search.validate()
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// Objective change or step length fell below its tolerance
    Converged,
    /// Iteration budget exhausted without convergence
    MaxIterations,
    /// No usable search direction: singular Hessian, or a direction along
    /// which f does not decrease
    DirectionFailure,
    /// The line search hit its backtracking cap
    LineSearchStalled,
}

/// Outcome of one minimization run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptimizationResult<T: Scalar> {
    /// The final point
    pub point: DVector<T>,

    /// The objective value at the final point
    pub value: T,

    /// True iff the run ended through the convergence test
    pub converged: bool,

    /// Number of loop iterations consumed
    pub iterations: usize,

    /// Reason the run stopped
    pub termination_reason: TerminationReason,

    /// Method that produced this result
    pub method: Method,

    /// Name of the minimized objective
    pub objective: String,

    /// Total number of objective evaluations, line search trial points included
    pub function_evaluations: usize,

    /// Wall-clock time elapsed during the run
    pub duration: Duration,

    trajectory: Trajectory<T>,
}

impl<T: Scalar> OptimizationResult<T> {
    /// The full trajectory record.
    pub fn trajectory(&self) -> &Trajectory<T> {
        &self.trajectory
    }

    /// Visited points, starting with the initial point.
    pub fn path(&self) -> &[DVector<T>] {
        self.trajectory.path()
    }

    /// Objective values along [`path`](Self::path).
    pub fn f_values(&self) -> &[T] {
        self.trajectory.f_values()
    }

    /// One-line human-readable summary of the run.
    pub fn summary(&self) -> String {
        format!(
            "function: {}, method: {}, iterations: {}: x = {}, f(x) = {}, success = {}",
            self.objective,
            self.method,
            self.iterations,
            format_point(&self.point),
            self.value,
            if self.converged { "True" } else { "False" }
        )
    }
}

/// Mutable state of one run. Lives on the stack of `minimize`.
struct RunState<T: Scalar> {
    point: DVector<T>,
    value: T,
    gradient: DVector<T>,
    hessian: Option<crate::types::DMatrix<T>>,
    trajectory: Trajectory<T>,
    function_evaluations: usize,
}

/// Unconstrained minimizer.
///
/// The direction strategy is selected once, when the optimizer is built.
/// `minimize` takes `&self` and keeps all run state local, so an optimizer
/// can be shared between threads.
pub struct Optimizer<T: Scalar> {
    config: OptimizationConfig<T>,
    strategy: Box<dyn DirectionStrategy<T>>,
    line_search: BacktrackingLineSearch<T>,
    observer: Box<dyn OptimizationObserver<T>>,
}

impl<T: Scalar> fmt::Debug for Optimizer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optimizer")
            .field("config", &self.config)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> Optimizer<T> {
    /// Builds an optimizer from a validated configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if [`OptimizationConfig::validate`] fails.
    pub fn new(config: OptimizationConfig<T>) -> Result<Self> {
        config.validate()?;
        let strategy = config.method.strategy();
        Ok(Self::assemble(config, strategy))
    }

    /// Builds an optimizer for the method named `name`.
    ///
    /// # Errors
    ///
    /// `UnsupportedMethod` for unknown names, `InvalidConfiguration` for
    /// invalid settings.
    pub fn with_method_name(name: &str, config: OptimizationConfig<T>) -> Result<Self> {
        Self::new(config.with_method_name(name)?)
    }

    /// Builds an optimizer around a custom direction strategy.
    ///
    /// `config.method` is kept for reporting only.
    pub fn with_strategy(
        config: OptimizationConfig<T>,
        strategy: Box<dyn DirectionStrategy<T>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, strategy))
    }

    fn assemble(config: OptimizationConfig<T>, strategy: Box<dyn DirectionStrategy<T>>) -> Self {
        let line_search = BacktrackingLineSearch::new(config.line_search.clone());
        Self {
            config,
            strategy,
            line_search,
            observer: Box::new(NoOpObserver),
        }
    }

    /// Installs an observer notified during every run.
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: OptimizationObserver<T> + 'static,
    {
        self.observer = Box::new(observer);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OptimizationConfig<T> {
        &self.config
    }

    /// Returns the direction strategy's name.
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Minimizes `objective` starting from `start`.
    ///
    /// # Errors
    ///
    /// Only collaborator failures propagate: errors returned by the
    /// objective, `DimensionMismatch` and `MissingHessian`. Non-convergence is
    /// reported through the result.
    pub fn minimize<O>(&self, objective: &O, start: &DVector<T>) -> Result<OptimizationResult<T>>
    where
        O: ObjectiveFunction<T> + ?Sized,
    {
        let started = Instant::now();
        let needs_hessian = self.strategy.needs_hessian();

        let initial = evaluate_checked(objective, start, needs_hessian)?;
        let mut state = RunState {
            point: start.clone(),
            value: initial.value,
            gradient: initial.gradient,
            hessian: initial.hessian,
            trajectory: Trajectory::new(start.clone(), initial.value),
            function_evaluations: 1,
        };
        self.observer
            .on_start(objective.name(), self.config.method, start, initial.value);

        for i in 0..self.config.max_iterations {
            let direction = match self.strategy.direction(&state.gradient, state.hessian.as_ref()) {
                Ok(p) => p,
                Err(err @ OptimizerError::SingularHessian { .. }) => {
                    debug!("{}: iteration {}: {}", self.strategy.name(), i, err);
                    let reason = TerminationReason::DirectionFailure;
                    return Ok(self.finish(objective, state, i, reason, started));
                }
                Err(err) => return Err(err),
            };

            let step = match self.line_search.search(
                objective,
                &state.point,
                state.value,
                &direction,
                &state.gradient,
            ) {
                Ok(step) => step,
                Err(err @ OptimizerError::InvalidSearchDirection { .. }) => {
                    debug!("{}: iteration {}: {}", self.strategy.name(), i, err);
                    let reason = TerminationReason::DirectionFailure;
                    return Ok(self.finish(objective, state, i, reason, started));
                }
                Err(err @ OptimizerError::LineSearchStalled { .. }) => {
                    debug!("{}: iteration {}: {}", self.strategy.name(), i, err);
                    if let OptimizerError::LineSearchStalled { backtracks, .. } = err {
                        state.function_evaluations += backtracks + 1;
                    }
                    let reason = TerminationReason::LineSearchStalled;
                    return Ok(self.finish(objective, state, i, reason, started));
                }
                Err(err) => return Err(err),
            };
            state.function_evaluations += step.function_evals;

            let candidate = &state.point + &direction * step.step_size;
            let eval = evaluate_checked(objective, &candidate, needs_hessian)?;
            state.function_evaluations += 1;

            let value_change = Float::abs(eval.value - state.trajectory.last_value());
            let step_length = (&candidate - &state.point).norm();
            let converged = value_change < self.config.objective_tolerance
                || step_length < self.config.parameter_tolerance;

            debug!(
                "{}: iteration {}: alpha = {}, f = {}, |df| = {:e}, |dx| = {:e}",
                self.strategy.name(),
                i,
                step.step_size,
                eval.value,
                <T as Scalar>::to_f64(value_change),
                <T as Scalar>::to_f64(step_length)
            );

            state.trajectory.push(candidate.clone(), eval.value);
            state.point = candidate;
            state.value = eval.value;
            state.gradient = eval.gradient;
            state.hessian = eval.hessian;

            self.observer.on_iteration(&IterationInfo {
                iteration: i,
                point: &state.point,
                value: state.value,
                step_size: step.step_size,
            });

            if converged {
                let reason = TerminationReason::Converged;
                return Ok(self.finish(objective, state, i + 1, reason, started));
            }
        }

        let max_iterations = self.config.max_iterations;
        let reason = TerminationReason::MaxIterations;
        Ok(self.finish(objective, state, max_iterations, reason, started))
    }

    fn finish<O>(
        &self,
        objective: &O,
        state: RunState<T>,
        iterations: usize,
        reason: TerminationReason,
        started: Instant,
    ) -> OptimizationResult<T>
    where
        O: ObjectiveFunction<T> + ?Sized,
    {
        debug!(
            "{}: stopped after {} iterations ({:?})",
            self.strategy.name(),
            iterations,
            reason
        );

        let result = OptimizationResult {
            point: state.point,
            value: state.value,
            converged: reason == TerminationReason::Converged,
            iterations,
            termination_reason: reason,
            method: self.config.method,
            objective: objective.name().to_string(),
            function_evaluations: state.function_evaluations,
            duration: started.elapsed(),
            trajectory: state.trajectory,
        };
        self.observer.on_finish(&result);
        result
    }
}

/// Minimizes `objective` from `start` with a one-off optimizer.
///
/// Equivalent to `Optimizer::new(config.clone())?.minimize(objective, start)`.
pub fn minimize<T, O>(
    objective: &O,
    start: &DVector<T>,
    config: &OptimizationConfig<T>,
) -> Result<OptimizationResult<T>>
where
    T: Scalar,
    O: ObjectiveFunction<T> + ?Sized,
{
    Optimizer::new(config.clone())?.minimize(objective, start)
}
