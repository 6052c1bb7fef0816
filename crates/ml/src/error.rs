use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MlError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("network needs at least one input and one output (got {inputs} -> {outputs})")]
    EmptyShape { inputs: usize, outputs: usize },
    #[error("hidden layer {index} has zero width")]
    ZeroWidth { index: usize },
}
