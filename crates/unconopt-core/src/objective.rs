//! Objective function interface for the optimizers.
//!
//! An objective maps a point to its value, its gradient and, when asked for,
//! its Hessian. The optimizers never differentiate anything themselves: the
//! derivatives are the objective's responsibility.
//!
//! Implementations must be pure. Evaluating twice at the same point with the
//! same `hessian_needed` flag has to produce identical outputs, which is what
//! lets a single [`Optimizer`](crate::optimizer::Optimizer) be shared between
//! threads.

use crate::{
    error::{OptimizerError, Result},
    types::{DMatrix, DVector, Scalar},
};
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Output of a single objective evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<T: Scalar> {
    /// Objective value f(x)
    pub value: T,
    /// Gradient ∇f(x), same length as x
    pub gradient: DVector<T>,
    /// Hessian ∇²f(x), present iff it was requested
    pub hessian: Option<DMatrix<T>>,
}

impl<T: Scalar> Evaluation<T> {
    /// Creates a first-order evaluation (no Hessian).
    pub fn new(value: T, gradient: DVector<T>) -> Self {
        Self {
            value,
            gradient,
            hessian: None,
        }
    }

    /// Attaches a Hessian to the evaluation.
    pub fn with_hessian(mut self, hessian: DMatrix<T>) -> Self {
        self.hessian = Some(hessian);
        self
    }
}

/// Trait for objective functions.
///
/// This is the only capability the optimizers require from their
/// collaborators.
pub trait ObjectiveFunction<T: Scalar>: Debug {
    /// Human-readable name, used in diagnostics.
    fn name(&self) -> &str {
        "objective"
    }

    /// Evaluates the objective at `point`.
    ///
    /// # Arguments
    ///
    /// * `point` - The point to evaluate at
    /// * `hessian_needed` - Whether the Hessian must be computed
    ///
    /// # Returns
    ///
    /// The value and gradient at `point`, plus the Hessian when
    /// `hessian_needed` is true.
    fn evaluate(&self, point: &DVector<T>, hessian_needed: bool) -> Result<Evaluation<T>>;
}

/// Evaluates `objective` and checks its output against the contract.
///
/// The gradient must have the point's length and, when requested, the
/// Hessian must be present and square of the same size. A Hessian that was
/// not requested is discarded.
pub(crate) fn evaluate_checked<T, O>(
    objective: &O,
    point: &DVector<T>,
    hessian_needed: bool,
) -> Result<Evaluation<T>>
where
    T: Scalar,
    O: ObjectiveFunction<T> + ?Sized,
{
    let mut eval = objective.evaluate(point, hessian_needed)?;
    let n = point.len();

    if eval.gradient.len() != n {
        return Err(OptimizerError::dimension_mismatch(
            format!("gradient of length {}", n),
            format!("length {}", eval.gradient.len()),
        ));
    }

    if hessian_needed {
        match &eval.hessian {
            None => return Err(OptimizerError::missing_hessian(objective.name())),
            Some(h) if h.shape() != (n, n) => {
                return Err(OptimizerError::dimension_mismatch(
                    format!("Hessian of shape ({}, {})", n, n),
                    format!("{:?}", h.shape()),
                ));
            }
            Some(_) => {}
        }
    } else {
        eval.hessian = None;
    }

    Ok(eval)
}

/// Adapter turning a named closure into an [`ObjectiveFunction`].
///
/// ```
/// use unconopt_core::objective::{Evaluation, FnObjective, ObjectiveFunction};
/// use unconopt_core::types::{DMatrix, DVector};
///
/// let sphere = FnObjective::new("sphere", |x: &DVector<f64>, hessian_needed: bool| {
///     let eval = Evaluation::new(x.dot(x), x * 2.0);
///     if hessian_needed {
///         eval.with_hessian(DMatrix::identity(x.len(), x.len()) * 2.0)
///     } else {
///         eval
///     }
/// });
///
/// let eval = sphere.evaluate(&DVector::from_vec(vec![1.0, 2.0]), false).unwrap();
/// assert_eq!(eval.value, 5.0);
/// ```
pub struct FnObjective<F> {
    name: String,
    f: F,
}

impl<F> FnObjective<F> {
    /// Wraps `f` under the given name.
    pub fn new<S: Into<String>>(name: S, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Debug for FnObjective<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjective")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T, F> ObjectiveFunction<T> for FnObjective<F>
where
    T: Scalar,
    F: Fn(&DVector<T>, bool) -> Evaluation<T>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, point: &DVector<T>, hessian_needed: bool) -> Result<Evaluation<T>> {
        Ok((self.f)(point, hessian_needed))
    }
}

/// Wrapper that counts evaluations of the inner objective.
///
/// Counters are atomic so the wrapper can be shared between threads.
#[derive(Debug)]
pub struct CountingObjective<O> {
    /// The underlying objective
    pub inner: O,
    evaluations: AtomicUsize,
    hessian_evaluations: AtomicUsize,
}

impl<O> CountingObjective<O> {
    /// Creates a new counting wrapper around an objective.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            evaluations: AtomicUsize::new(0),
            hessian_evaluations: AtomicUsize::new(0),
        }
    }

    /// Resets all counters to zero.
    pub fn reset_counts(&self) {
        self.evaluations.store(0, Ordering::Relaxed);
        self.hessian_evaluations.store(0, Ordering::Relaxed);
    }

    /// Total number of evaluations.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Number of evaluations that requested a Hessian.
    pub fn hessian_evaluations(&self) -> usize {
        self.hessian_evaluations.load(Ordering::Relaxed)
    }
}

impl<T, O> ObjectiveFunction<T> for CountingObjective<O>
where
    T: Scalar,
    O: ObjectiveFunction<T>,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn evaluate(&self, point: &DVector<T>, hessian_needed: bool) -> Result<Evaluation<T>> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        if hessian_needed {
            self.hessian_evaluations.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.evaluate(point, hessian_needed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> FnObjective<impl Fn(&DVector<f64>, bool) -> Evaluation<f64>> {
        FnObjective::new("sphere", |x: &DVector<f64>, hessian_needed: bool| {
            let eval = Evaluation::new(x.dot(x), x * 2.0);
            if hessian_needed {
                eval.with_hessian(DMatrix::identity(x.len(), x.len()) * 2.0)
            } else {
                eval
            }
        })
    }

    #[test]
    fn test_fn_objective_evaluates() {
        let f = sphere();
        let x = DVector::from_vec(vec![1.0, -3.0]);

        let eval = f.evaluate(&x, true).unwrap();
        assert_eq!(eval.value, 10.0);
        assert_eq!(eval.gradient, DVector::from_vec(vec![2.0, -6.0]));
        assert_eq!(eval.hessian, Some(DMatrix::identity(2, 2) * 2.0));
        assert_eq!(ObjectiveFunction::<f64>::name(&f), "sphere");
    }

    #[test]
    fn test_checked_evaluation_rejects_bad_gradient() {
        let bad = FnObjective::new("bad", |_x: &DVector<f64>, _h: bool| {
            Evaluation::new(0.0, DVector::zeros(3))
        });
        let err = evaluate_checked(&bad, &DVector::zeros(2), false).unwrap_err();
        assert!(matches!(err, OptimizerError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_checked_evaluation_requires_hessian() {
        let no_hessian = FnObjective::new("first-order", |x: &DVector<f64>, _h: bool| {
            Evaluation::new(x.sum(), DVector::from_element(x.len(), 1.0))
        });
        let err = evaluate_checked(&no_hessian, &DVector::zeros(2), true).unwrap_err();
        assert_eq!(err, OptimizerError::missing_hessian("first-order"));
    }

    #[test]
    fn test_checked_evaluation_rejects_non_square_hessian() {
        let bad = FnObjective::new("bad", |x: &DVector<f64>, _h: bool| {
            Evaluation::new(0.0, x.clone()).with_hessian(DMatrix::zeros(2, 3))
        });
        let err = evaluate_checked(&bad, &DVector::zeros(2), true).unwrap_err();
        assert!(matches!(err, OptimizerError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_checked_evaluation_drops_unrequested_hessian() {
        let eval = evaluate_checked(&sphere(), &DVector::from_vec(vec![1.0, 1.0]), false).unwrap();
        assert!(eval.hessian.is_none());
    }

    #[test]
    fn test_counting_objective() {
        let counted = CountingObjective::new(sphere());
        let x = DVector::from_vec(vec![0.5, 0.5]);

        counted.evaluate(&x, false).unwrap();
        counted.evaluate(&x, true).unwrap();
        counted.evaluate(&x, false).unwrap();
        assert_eq!(counted.evaluations(), 3);
        assert_eq!(counted.hessian_evaluations(), 1);

        counted.reset_counts();
        assert_eq!(counted.evaluations(), 0);
        assert_eq!(counted.hessian_evaluations(), 0);
    }

    #[test]
    fn test_evaluation_is_pure() {
        let f = sphere();
        let x = DVector::from_vec(vec![0.25, -1.75]);
        assert_eq!(f.evaluate(&x, true).unwrap(), f.evaluate(&x, true).unwrap());
        assert_eq!(f.evaluate(&x, false).unwrap(), f.evaluate(&x, false).unwrap());
    }
}
