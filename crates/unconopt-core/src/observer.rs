//! Observer support for optimization runs.
//!
//! Observers receive read-only notifications from the iteration loop. They
//! replace console output: the optimizers themselves never print.

use crate::{
    optimizer::{Method, OptimizationResult},
    types::{DVector, Scalar},
};
use log::{debug, info};

/// Snapshot of an accepted iterate, passed to observers.
#[derive(Debug, Clone, Copy)]
pub struct IterationInfo<'a, T: Scalar> {
    /// Zero-based loop index that produced this iterate
    pub iteration: usize,
    /// The accepted point
    pub point: &'a DVector<T>,
    /// Objective value at the accepted point
    pub value: T,
    /// Step size chosen by the line search
    pub step_size: T,
}

/// Trait for optimization observers.
///
/// All methods have empty default implementations.
pub trait OptimizationObserver<T: Scalar>: Send + Sync {
    /// Called once, after the start point has been evaluated.
    fn on_start(&self, objective: &str, method: Method, start: &DVector<T>, value: T) {
        let _ = (objective, method, start, value);
    }

    /// Called for every accepted iterate, including the converged one.
    fn on_iteration(&self, info: &IterationInfo<'_, T>) {
        let _ = info;
    }

    /// Called once with the final result.
    fn on_finish(&self, result: &OptimizationResult<T>) {
        let _ = result;
    }
}

/// An observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl<T: Scalar> OptimizationObserver<T> for NoOpObserver {}

/// An observer that reports through the `log` facade.
///
/// Emits the one-line run summary at `info` level and, every
/// `log_every` iterations, a progress line at `debug` level.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    log_every: usize,
}

impl LogObserver {
    /// Create an observer that only reports the run summary.
    pub fn new() -> Self {
        Self { log_every: 0 }
    }

    /// Also report progress every `n` iterations (0 disables it).
    pub fn with_progress_every(mut self, n: usize) -> Self {
        self.log_every = n;
        self
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> OptimizationObserver<T> for LogObserver {
    fn on_iteration(&self, info: &IterationInfo<'_, T>) {
        if self.log_every > 0 && info.iteration % self.log_every == 0 {
            debug!(
                "Iter {}: x = {}, f(x) = {}, alpha = {}",
                info.iteration,
                format_point(info.point),
                info.value,
                info.step_size
            );
        }
    }

    fn on_finish(&self, result: &OptimizationResult<T>) {
        info!("{}", result.summary());
    }
}

/// Formats a point as `[x1, x2, ...]`.
pub(crate) fn format_point<T: Scalar>(point: &DVector<T>) -> String {
    let entries: Vec<String> = point.iter().map(|x| x.to_string()).collect();
    format!("[{}]", entries.join(", "))
}
