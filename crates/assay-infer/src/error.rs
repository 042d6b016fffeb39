use std::fmt;

#[derive(Debug)]
pub enum InferError {
    Io(String),
    Decode(String),
    Shape(String),
    Tokenizer(String),
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, InferError>;

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Decode(msg) => write!(f, "decode error: {msg}"),
            InferError::Shape(msg) => write!(f, "shape error: {msg}"),
            InferError::Tokenizer(msg) => write!(f, "tokenizer error: {msg}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<ort::Error> for InferError {
    fn from(err: ort::Error) -> Self {
        InferError::Runtime(err.to_string())
    }
}

impl From<assay_base::TensorError> for InferError {
    fn from(err: assay_base::TensorError) -> Self {
        InferError::Shape(err.to_string())
    }
}
