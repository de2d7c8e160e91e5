//! Backtracking line search with the Armijo sufficient-decrease condition.
//!
//! Given a point x, a search direction p and the gradient g at x, the search
//! looks for a step size α > 0 satisfying
//!
//! f(x + α p) ≤ f(x) + c α ⟨g, p⟩
//!
//! starting from α₀ and shrinking α ← ρ α after every rejected trial.
//!
//! For a true descent direction (⟨g, p⟩ < 0) and a continuously
//! differentiable f the condition holds for all sufficiently small α, so the
//! search terminates. A nonzero direction with ⟨g, p⟩ ≥ 0 is rejected up
//! front with [`OptimizerError::InvalidSearchDirection`]; the zero direction
//! at a stationary point is accepted with α₀. Trial values that never satisfy
//! the condition (NaN, for instance) are bounded by
//! [`LineSearchParams::max_backtracks`] and end in
//! [`OptimizerError::LineSearchStalled`].
//!
//! Trial points are evaluated with `hessian_needed = false`.

use crate::{
    error::{OptimizerError, Result},
    objective::{evaluate_checked, ObjectiveFunction},
    types::{DVector, Scalar},
};
use log::trace;

/// Parameters of the backtracking line search.
///
/// ```rust
/// # use unconopt_core::line_search::LineSearchParams;
/// let params = LineSearchParams::<f64>::new()
///     .with_rho(0.8)
///     .with_max_backtracks(None);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSearchParams<T: Scalar> {
    /// Initial step size α₀
    pub initial_step_size: T,

    /// Backtracking reduction factor ρ ∈ (0,1)
    pub rho: T,

    /// Armijo constant c ∈ (0,1)
    pub c: T,

    /// Maximum number of shrinks before giving up; `None` means unbounded
    pub max_backtracks: Option<usize>,
}

impl<T: Scalar> Default for LineSearchParams<T> {
    fn default() -> Self {
        Self {
            initial_step_size: T::one(),
            rho: <T as Scalar>::from_f64(0.5),
            c: <T as Scalar>::from_f64(0.01),
            max_backtracks: Some(100),
        }
    }
}

impl<T: Scalar> LineSearchParams<T> {
    /// Creates parameters with α₀ = 1, ρ = 0.5, c = 0.01 and a cap of 100 shrinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial step size.
    pub fn with_initial_step_size(mut self, alpha: T) -> Self {
        self.initial_step_size = alpha;
        self
    }

    /// Sets the shrink factor.
    pub fn with_rho(mut self, rho: T) -> Self {
        self.rho = rho;
        self
    }

    /// Sets the Armijo constant.
    pub fn with_c(mut self, c: T) -> Self {
        self.c = c;
        self
    }

    /// Sets the shrink cap.
    pub fn with_max_backtracks(mut self, max_backtracks: Option<usize>) -> Self {
        self.max_backtracks = max_backtracks;
        self
    }

    /// Checks that the parameters define a terminating search.
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::InvalidConfiguration` if:
    /// - α₀ is not positive and finite
    /// - ρ ∉ (0, 1)
    /// - c ∉ (0, 1)
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_step_size > T::zero())
            || !num_traits::Float::is_finite(self.initial_step_size)
        {
            return Err(OptimizerError::invalid_configuration(
                "Initial step size must be positive and finite",
                "initial_step_size",
                self.initial_step_size.to_string(),
            ));
        }

        if !(self.rho > T::zero() && self.rho < T::one()) {
            return Err(OptimizerError::invalid_configuration(
                "Backtracking factor rho must be in (0, 1)",
                "rho",
                self.rho.to_string(),
            ));
        }

        if !(self.c > T::zero() && self.c < T::one()) {
            return Err(OptimizerError::invalid_configuration(
                "Armijo constant c must be in (0, 1)",
                "c",
                self.c.to_string(),
            ));
        }

        Ok(())
    }
}

/// Outcome of a successful line search.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearchResult<T: Scalar> {
    /// The accepted step size α
    pub step_size: T,

    /// Objective value f(x + α p) at the accepted step
    pub new_value: T,

    /// Number of objective evaluations performed
    pub function_evals: usize,
}

/// Backtracking line search.
#[derive(Debug, Clone, Default)]
pub struct BacktrackingLineSearch<T: Scalar> {
    params: LineSearchParams<T>,
}

impl<T: Scalar> BacktrackingLineSearch<T> {
    /// Creates a line search with the given parameters.
    pub fn new(params: LineSearchParams<T>) -> Self {
        Self { params }
    }

    /// Finds a step size satisfying the Armijo condition.
    ///
    /// # Arguments
    ///
    /// * `objective` - The function being minimized
    /// * `point` - Current point x
    /// * `value` - f(x), already known to the caller
    /// * `direction` - Search direction p
    /// * `gradient` - Gradient at x
    ///
    /// # Errors
    ///
    /// `InvalidSearchDirection` for a nonzero direction that is not a descent
    /// direction, `LineSearchStalled` once `max_backtracks` trials have been
    /// rejected, and any error raised by the objective itself.
    pub fn search<O>(
        &self,
        objective: &O,
        point: &DVector<T>,
        value: T,
        direction: &DVector<T>,
        gradient: &DVector<T>,
    ) -> Result<LineSearchResult<T>>
    where
        O: ObjectiveFunction<T> + ?Sized,
    {
        let slope = gradient.dot(direction);
        if slope >= T::zero() && direction.iter().any(|d| *d != T::zero()) {
            return Err(OptimizerError::invalid_search_direction(
                <T as Scalar>::to_f64(slope),
            ));
        }

        let mut alpha = self.params.initial_step_size;
        let mut backtracks = 0;

        loop {
            let trial = point + direction * alpha;
            let trial_value = evaluate_checked(objective, &trial, false)?.value;
            trace!(
                "backtracking: alpha = {:e}, f(x + alpha p) = {}, f(x) = {}, slope = {}",
                <T as Scalar>::to_f64(alpha),
                trial_value,
                value,
                slope
            );

            // NaN trial values fail the comparison and are backtracked over.
            if trial_value <= value + self.params.c * alpha * slope {
                return Ok(LineSearchResult {
                    step_size: alpha,
                    new_value: trial_value,
                    function_evals: backtracks + 1,
                });
            }

            if let Some(max) = self.params.max_backtracks {
                if backtracks >= max {
                    return Err(OptimizerError::line_search_stalled(
                        backtracks,
                        <T as Scalar>::to_f64(alpha),
                        <T as Scalar>::to_f64(value),
                    ));
                }
            }

            alpha *= self.params.rho;
            backtracks += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{CountingObjective, Evaluation, FnObjective};
    use approx::assert_relative_eq;

    fn parabola() -> FnObjective<impl Fn(&DVector<f64>, bool) -> Evaluation<f64>> {
        // f(x) = x², minimum at 0
        FnObjective::new("parabola", |x: &DVector<f64>, _h: bool| {
            Evaluation::new(x[0] * x[0], DVector::from_element(1, 2.0 * x[0]))
        })
    }

    #[test]
    fn test_default_params() {
        let params = LineSearchParams::<f64>::default();
        assert_eq!(params.initial_step_size, 1.0);
        assert_eq!(params.rho, 0.5);
        assert_eq!(params.c, 0.01);
        assert_eq!(params.max_backtracks, Some(100));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_param_validation() {
        assert!(LineSearchParams::<f64>::new().with_rho(1.0).validate().is_err());
        assert!(LineSearchParams::<f64>::new().with_rho(0.0).validate().is_err());
        assert!(LineSearchParams::<f64>::new().with_c(1.5).validate().is_err());
        assert!(LineSearchParams::<f64>::new().with_c(f64::NAN).validate().is_err());
        assert!(LineSearchParams::<f64>::new()
            .with_initial_step_size(-1.0)
            .validate()
            .is_err());
        assert!(LineSearchParams::<f64>::new()
            .with_initial_step_size(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_full_step_accepted() {
        // From x = 1 along p = -1: f(0) = 0 <= 1 + 0.01 * 1 * (-2)
        let ls = BacktrackingLineSearch::new(LineSearchParams::new());
        let x = DVector::from_element(1, 1.0);
        let p = DVector::from_element(1, -1.0);
        let g = DVector::from_element(1, 2.0);

        let result = ls.search(&parabola(), &x, 1.0, &p, &g).unwrap();
        assert_eq!(result.step_size, 1.0);
        assert_eq!(result.function_evals, 1);
        assert_relative_eq!(result.new_value, 0.0);
    }

    #[test]
    fn test_backtracks_on_overshoot() {
        // Steepest descent from x = 1: p = -2, full step lands on x = -1 with f = 1
        let ls = BacktrackingLineSearch::new(LineSearchParams::new());
        let x = DVector::from_element(1, 1.0);
        let g = DVector::from_element(1, 2.0);
        let p = -&g;

        let result = ls.search(&parabola(), &x, 1.0, &p, &g).unwrap();
        assert_eq!(result.step_size, 0.5);
        assert_eq!(result.function_evals, 2);
        assert_relative_eq!(result.new_value, 0.0);
    }

    #[test]
    fn test_armijo_condition_holds() {
        let ls = BacktrackingLineSearch::new(LineSearchParams::new().with_rho(0.3).with_c(0.4));
        let x = DVector::from_element(1, 3.0);
        let g = DVector::from_element(1, 6.0);
        let p = -&g * 10.0;

        let result = ls.search(&parabola(), &x, 9.0, &p, &g).unwrap();
        let bound = 9.0 + 0.4 * result.step_size * g.dot(&p);
        assert!(result.new_value <= bound);
    }

    #[test]
    fn test_trial_points_never_request_hessian() {
        let counted = CountingObjective::new(parabola());
        let ls = BacktrackingLineSearch::new(LineSearchParams::new());
        let x = DVector::from_element(1, 4.0);
        let g = DVector::from_element(1, 8.0);
        let p = -&g * 100.0;

        let result = ls.search(&counted, &x, 16.0, &p, &g).unwrap();
        assert_eq!(counted.evaluations(), result.function_evals);
        assert_eq!(counted.hessian_evaluations(), 0);
    }

    #[test]
    fn test_ascent_direction_rejected() {
        let counted = CountingObjective::new(parabola());
        let ls = BacktrackingLineSearch::new(LineSearchParams::default());
        let x = DVector::from_element(1, 1.0);
        let g = DVector::from_element(1, 2.0);
        let p = g.clone();

        let err = ls.search(&counted, &x, 1.0, &p, &g).unwrap_err();
        assert_eq!(err, OptimizerError::invalid_search_direction(4.0));
        assert!(err.is_recoverable());
        assert_eq!(counted.evaluations(), 0);
    }

    #[test]
    fn test_orthogonal_direction_rejected() {
        // f = x₁² + x₂² at (1, 0): p = (0, 1) is orthogonal to g = (2, 0)
        let sphere = FnObjective::new("sphere", |x: &DVector<f64>, _h: bool| {
            Evaluation::new(x.dot(x), x * 2.0)
        });
        let ls = BacktrackingLineSearch::new(LineSearchParams::default());
        let x = DVector::from_vec(vec![1.0, 0.0]);
        let g = DVector::from_vec(vec![2.0, 0.0]);
        let p = DVector::from_vec(vec![0.0, 1.0]);

        let err = ls.search(&sphere, &x, 1.0, &p, &g).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidSearchDirection { .. }));
    }

    #[test]
    fn test_unacceptable_trials_stall() {
        // Every point other than the start evaluates to NaN
        let cliff = FnObjective::new("cliff", |x: &DVector<f64>, _h: bool| {
            let value = if x[0] == 1.0 { 1.0 } else { f64::NAN };
            Evaluation::new(value, DVector::from_element(1, 2.0))
        });
        let ls = BacktrackingLineSearch::new(LineSearchParams::new().with_max_backtracks(Some(20)));
        let x = DVector::from_element(1, 1.0);
        let g = DVector::from_element(1, 2.0);
        let p = -&g;

        let err = ls.search(&cliff, &x, 1.0, &p, &g).unwrap_err();
        match err {
            OptimizerError::LineSearchStalled {
                backtracks,
                initial_value,
                ..
            } => {
                assert_eq!(backtracks, 20);
                assert_eq!(initial_value, 1.0);
            }
            other => panic!("Expected LineSearchStalled, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_direction_accepts_initial_step() {
        let ls = BacktrackingLineSearch::new(LineSearchParams::new());
        let x = DVector::from_element(1, 0.0);
        let g = DVector::from_element(1, 0.0);
        let p = DVector::from_element(1, 0.0);

        let result = ls.search(&parabola(), &x, 0.0, &p, &g).unwrap();
        assert_eq!(result.step_size, 1.0);
    }
}
