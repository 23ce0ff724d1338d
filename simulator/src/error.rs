use thiserror::Error;

/// Errors raised by the spacetime simulator.
#[derive(Error, Debug)]
pub enum SimError {
    /// Non-positive grid size or scale at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Bad argument to an operation on a constructed simulator.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Interactive input that could not be parsed as the expected type.
    #[error("could not parse {field} from input {value:?}")]
    InputParse { field: &'static str, value: String },

    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
