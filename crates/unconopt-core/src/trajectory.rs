//! Trajectory record of an optimization run.
//!
//! A [`Trajectory`] holds every accepted iterate and its objective value, in
//! order, starting with the initial point. Entries are appended by the
//! optimizer only; once a run returns, the record is read-only.

use crate::types::{DVector, Scalar};
use num_traits::Float;

/// Ordered record of the points visited during one run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trajectory<T: Scalar> {
    points: Vec<DVector<T>>,
    values: Vec<T>,
}

impl<T: Scalar> Trajectory<T> {
    /// Starts a record at the initial point.
    pub(crate) fn new(start: DVector<T>, value: T) -> Self {
        Self {
            points: vec![start],
            values: vec![value],
        }
    }

    /// Appends an accepted iterate.
    pub(crate) fn push(&mut self, point: DVector<T>, value: T) {
        self.points.push(point);
        self.values.push(value);
    }

    /// Visited points, starting with the initial point.
    pub fn path(&self) -> &[DVector<T>] {
        &self.points
    }

    /// Objective values, parallel to [`path`](Self::path).
    pub fn f_values(&self) -> &[T] {
        &self.values
    }

    /// Number of recorded entries (iterations + 1).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a trajectory holds at least its start point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> (&DVector<T>, T) {
        let n = self.points.len() - 1;
        (&self.points[n], self.values[n])
    }

    /// The most recently recorded objective value.
    pub fn last_value(&self) -> T {
        self.values[self.values.len() - 1]
    }

    /// Iterates over `(point, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&DVector<T>, T)> + '_ {
        self.points.iter().zip(self.values.iter().copied())
    }

    /// Returns true when consecutive values never increase by more than `slack`.
    pub fn is_monotone(&self, slack: T) -> bool {
        self.values.windows(2).all(|w| w[1] <= w[0] + slack)
    }
}

/// Axis-aligned region of the plane enclosing one or more 2-D trajectories.
///
/// This is the window a contour renderer should sample: the bounding box of
/// all points, padded outward by 20 % of its extent on each axis, with each
/// axis at least 0.1 wide around its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlotWindow<T: Scalar> {
    /// Lower bound of the first coordinate
    pub x_min: T,
    /// Upper bound of the first coordinate
    pub x_max: T,
    /// Lower bound of the second coordinate
    pub y_min: T,
    /// Upper bound of the second coordinate
    pub y_max: T,
}

impl<T: Scalar> PlotWindow<T> {
    /// Fraction of the data extent added on each side.
    pub const PADDING: f64 = 0.2;

    /// Minimum width of each axis.
    pub const MIN_RANGE: f64 = 0.1;

    /// Computes the window around every point of `trajectories`.
    ///
    /// Returns `None` if there are no points, if any point is not
    /// two-dimensional, or if any coordinate is not finite.
    pub fn enclosing(trajectories: &[&Trajectory<T>]) -> Option<Self> {
        let mut bounds: Option<(T, T, T, T)> = None;

        for point in trajectories.iter().flat_map(|t| t.path()) {
            if point.len() != 2 || !crate::types::all_finite(point) {
                return None;
            }
            let (x, y) = (point[0], point[1]);
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (
                    Float::min(x0, x),
                    Float::max(x1, x),
                    Float::min(y0, y),
                    Float::max(y1, y),
                ),
            });
        }

        let (x_min, x_max, y_min, y_max) = bounds?;
        let (x_min, x_max) = Self::pad(x_min, x_max);
        let (y_min, y_max) = Self::pad(y_min, y_max);

        Some(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    fn pad(lo: T, hi: T) -> (T, T) {
        let padding = <T as Scalar>::from_f64(Self::PADDING);
        let min_range = <T as Scalar>::from_f64(Self::MIN_RANGE);
        let two = <T as Scalar>::from_f64(2.0);

        let range = hi - lo;
        let (lo, hi) = (lo - padding * range, hi + padding * range);
        if hi - lo < min_range {
            let center = (hi + lo) / two;
            (center - min_range / two, center + min_range / two)
        } else {
            (lo, hi)
        }
    }

    /// Returns true if the 2-D point lies inside the window (bounds included).
    pub fn contains(&self, point: &DVector<T>) -> bool {
        point.len() == 2
            && point[0] >= self.x_min
            && point[0] <= self.x_max
            && point[1] >= self.y_min
            && point[1] <= self.y_max
    }

    /// `n` evenly spaced samples along each axis, endpoints included.
    pub fn axis_samples(&self, n: usize) -> (Vec<T>, Vec<T>) {
        (
            linspace(self.x_min, self.x_max, n),
            linspace(self.y_min, self.y_max, n),
        )
    }
}

fn linspace<T: Scalar>(lo: T, hi: T, n: usize) -> Vec<T> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / <T as Scalar>::from_f64((n - 1) as f64);
            (0..n)
                .map(|i| lo + step * <T as Scalar>::from_f64(i as f64))
                .collect()
        }
    }
}
