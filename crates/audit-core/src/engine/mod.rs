//! Runner de evaluación y su builder.

pub mod builder;
pub mod runner;

pub use builder::RunnerBuilder;
pub use runner::{EvaluationRun, EvaluationRunner};
