//! Reference objective functions for tests, benchmarks and demos.
//!
//! All functions are two-dimensional and supply exact gradients and
//! Hessians.

use crate::{
    error::{OptimizerError, Result},
    objective::{Evaluation, ObjectiveFunction},
    types::{DMatrix, DVector},
};

fn check_planar(name: &str, point: &DVector<f64>) -> Result<()> {
    if point.len() != 2 {
        return Err(OptimizerError::dimension_mismatch(
            format!("2-dimensional point for {}", name),
            format!("dimension {}", point.len()),
        ));
    }
    Ok(())
}

/// Quadratic form f(x) = xᵀ Q x with gradient 2Qx and Hessian 2Q.
#[derive(Debug, Clone)]
pub struct QuadraticForm {
    name: String,
    q: DMatrix<f64>,
}

impl QuadraticForm {
    /// Creates the form for a symmetric matrix `q`.
    pub fn new<S: Into<String>>(name: S, q: DMatrix<f64>) -> Self {
        Self {
            name: name.into(),
            q,
        }
    }

    /// Q = I: circular contour lines.
    pub fn identity() -> Self {
        Self::new("quadratic_identity", DMatrix::identity(2, 2))
    }

    /// Q = diag(1, 100): elongated ellipses aligned with the axes.
    pub fn ellipse() -> Self {
        Self::new(
            "quadratic_ellipse",
            DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 100.0]),
        )
    }

    /// Q = Rᵀ diag(100, 1) R with R a rotation by 30°.
    pub fn rotated() -> Self {
        let theta = std::f64::consts::PI / 6.0;
        let (s, c) = theta.sin_cos();
        let r = DMatrix::from_row_slice(2, 2, &[c, -s, s, c]);
        let d = DMatrix::from_row_slice(2, 2, &[100.0, 0.0, 0.0, 1.0]);
        Self::new("quadratic_rotated", r.transpose() * d * r)
    }

    /// The matrix Q.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.q
    }
}

impl ObjectiveFunction<f64> for QuadraticForm {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, point: &DVector<f64>, hessian_needed: bool) -> Result<Evaluation<f64>> {
        if point.len() != self.q.nrows() {
            return Err(OptimizerError::dimension_mismatch(
                format!("dimension {}", self.q.nrows()),
                format!("dimension {}", point.len()),
            ));
        }
        let qx = &self.q * point;
        let eval = Evaluation::new(point.dot(&qx), qx * 2.0);
        Ok(if hessian_needed {
            eval.with_hessian(&self.q * 2.0)
        } else {
            eval
        })
    }
}

/// Rosenbrock's banana function f(x) = 100 (x₂ − x₁²)² + (1 − x₁)².
///
/// Minimum 0 at (1, 1); the Hessian is indefinite in parts of the plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rosenbrock;

impl ObjectiveFunction<f64> for Rosenbrock {
    fn name(&self) -> &str {
        "rosenbrock"
    }

    fn evaluate(&self, point: &DVector<f64>, hessian_needed: bool) -> Result<Evaluation<f64>> {
        check_planar(self.name(), point)?;
        let (x1, x2) = (point[0], point[1]);
        let r = x2 - x1 * x1;

        let value = 100.0 * r * r + (1.0 - x1) * (1.0 - x1);
        let gradient = DVector::from_vec(vec![-400.0 * x1 * r - 2.0 * (1.0 - x1), 200.0 * r]);
        let eval = Evaluation::new(value, gradient);

        Ok(if hessian_needed {
            eval.with_hessian(DMatrix::from_row_slice(
                2,
                2,
                &[
                    1200.0 * x1 * x1 - 400.0 * x2 + 2.0,
                    -400.0 * x1,
                    -400.0 * x1,
                    200.0,
                ],
            ))
        } else {
            eval
        })
    }
}

/// Linear function f(x) = aᵀx, unbounded below for any a ≠ 0.
///
/// Its Hessian is the zero matrix.
#[derive(Debug, Clone)]
pub struct LinearFunction {
    a: DVector<f64>,
}

impl LinearFunction {
    /// f(x) = aᵀx.
    pub fn new(a: DVector<f64>) -> Self {
        Self { a }
    }
}

impl Default for LinearFunction {
    /// a = (1, −2).
    fn default() -> Self {
        Self::new(DVector::from_vec(vec![1.0, -2.0]))
    }
}

impl ObjectiveFunction<f64> for LinearFunction {
    fn name(&self) -> &str {
        "linear_function"
    }

    fn evaluate(&self, point: &DVector<f64>, hessian_needed: bool) -> Result<Evaluation<f64>> {
        if point.len() != self.a.len() {
            return Err(OptimizerError::dimension_mismatch(
                format!("dimension {}", self.a.len()),
                format!("dimension {}", point.len()),
            ));
        }
        let n = self.a.len();
        let eval = Evaluation::new(self.a.dot(point), self.a.clone());
        Ok(if hessian_needed {
            eval.with_hessian(DMatrix::zeros(n, n))
        } else {
            eval
        })
    }
}

/// f(x) = e^{x₁+3x₂−0.1} + e^{x₁−3x₂−0.1} + e^{−x₁−0.1}.
///
/// Smooth and strictly convex, with rounded-triangle contour lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialTriangle;

impl ObjectiveFunction<f64> for ExponentialTriangle {
    fn name(&self) -> &str {
        "exponential_triangle"
    }

    fn evaluate(&self, point: &DVector<f64>, hessian_needed: bool) -> Result<Evaluation<f64>> {
        check_planar(self.name(), point)?;
        let (x1, x2) = (point[0], point[1]);
        let t1 = (x1 + 3.0 * x2 - 0.1).exp();
        let t2 = (x1 - 3.0 * x2 - 0.1).exp();
        let t3 = (-x1 - 0.1).exp();

        let gradient = DVector::from_vec(vec![t1 + t2 - t3, 3.0 * t1 - 3.0 * t2]);
        let eval = Evaluation::new(t1 + t2 + t3, gradient);

        Ok(if hessian_needed {
            let h12 = 3.0 * t1 - 3.0 * t2;
            eval.with_hessian(DMatrix::from_row_slice(
                2,
                2,
                &[t1 + t2 + t3, h12, h12, 9.0 * t1 + 9.0 * t2],
            ))
        } else {
            eval
        })
    }
}

/// Central-difference check of an objective's gradient at `point`.
///
/// Returns the largest absolute deviation between the supplied gradient and
/// the finite-difference estimate.
pub fn gradient_error<O>(objective: &O, point: &DVector<f64>) -> Result<f64>
where
    O: ObjectiveFunction<f64> + ?Sized,
{
    let h = f64::EPSILON.sqrt();
    let analytic = objective.evaluate(point, false)?.gradient;
    let mut max_err: f64 = 0.0;

    for i in 0..point.len() {
        let mut plus = point.clone();
        let mut minus = point.clone();
        plus[i] += h;
        minus[i] -= h;
        let forward = objective.evaluate(&plus, false)?.value;
        let backward = objective.evaluate(&minus, false)?.value;
        let fd = (forward - backward) / (2.0 * h);
        max_err = max_err.max((fd - analytic[i]).abs());
    }

    Ok(max_err)
}

/// Central-difference check of an objective's Hessian at `point`.
///
/// Returns the largest absolute deviation between the supplied Hessian and
/// the finite-difference Jacobian of the gradient.
pub fn hessian_error<O>(objective: &O, point: &DVector<f64>) -> Result<f64>
where
    O: ObjectiveFunction<f64> + ?Sized,
{
    let h = f64::EPSILON.cbrt();
    let analytic = objective
        .evaluate(point, true)?
        .hessian
        .ok_or_else(|| OptimizerError::missing_hessian(objective.name()))?;
    let mut max_err: f64 = 0.0;

    for j in 0..point.len() {
        let mut plus = point.clone();
        let mut minus = point.clone();
        plus[j] += h;
        minus[j] -= h;
        let column = (objective.evaluate(&plus, false)?.gradient
            - objective.evaluate(&minus, false)?.gradient)
            / (2.0 * h);
        for i in 0..point.len() {
            max_err = max_err.max((column[i] - analytic[(i, j)]).abs());
        }
    }

    Ok(max_err)
}
