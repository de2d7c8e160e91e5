//! Runs gradient descent and Newton's method on every reference function.
//!
//! Prints the run summaries, the plot window enclosing both trajectories and,
//! when a directory is given on the command line, writes each pair of
//! results as JSON for an external plotting tool.
//!
//! Run with: cargo run --example compare_methods [-- <output-dir>]

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use unconopt::prelude::*;
use unconopt_core::test_functions::{
    ExponentialTriangle, LinearFunction, QuadraticForm, Rosenbrock,
};

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let output_dir = std::env::args().nth(1).map(PathBuf::from);
    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)?;
    }

    let cases: Vec<(Box<dyn ObjectiveFunction<f64>>, DVector<f64>, usize)> = vec![
        (Box::new(QuadraticForm::identity()), DVector::from_vec(vec![1.0, 1.0]), 100),
        (Box::new(QuadraticForm::ellipse()), DVector::from_vec(vec![1.0, 1.0]), 100),
        (Box::new(QuadraticForm::rotated()), DVector::from_vec(vec![1.0, 1.0]), 100),
        (Box::new(Rosenbrock), DVector::from_vec(vec![-1.0, 2.0]), 10_000),
        (Box::new(LinearFunction::default()), DVector::from_vec(vec![1.0, 1.0]), 100),
        (Box::new(ExponentialTriangle), DVector::from_vec(vec![1.0, 1.0]), 100),
    ];

    for (objective, start, max_iter) in &cases {
        println!("{}", objective.name());
        println!("{}", "-".repeat(objective.name().len()));

        let mut results = Vec::new();
        for method in [Method::GradientDescent, Method::Newton] {
            let config = OptimizationConfig::new()
                .with_method(method)
                .with_max_iterations(*max_iter);
            let result = Optimizer::new(config)?.minimize(objective.as_ref(), start)?;

            println!("  {}", result.summary());
            println!(
                "    {:?} after {} evaluations in {:?}",
                result.termination_reason, result.function_evaluations, result.duration
            );
            results.push(result);
        }

        let trajectories: Vec<&Trajectory<f64>> = results.iter().map(|r| r.trajectory()).collect();
        if let Some(window) = PlotWindow::enclosing(&trajectories) {
            println!(
                "  plot window: x ∈ [{:.3}, {:.3}], y ∈ [{:.3}, {:.3}]",
                window.x_min, window.x_max, window.y_min, window.y_max
            );
        }

        if let Some(dir) = &output_dir {
            let path = dir.join(format!("{}.json", objective.name()));
            fs::write(&path, serde_json::to_string_pretty(&results)?)?;
            println!("  wrote {}", path.display());
        }
        println!();
    }

    Ok(())
}
