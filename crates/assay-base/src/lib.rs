pub mod logging;
pub mod tensor;

pub use logging::{StdoutLogger, init_stdout_logger};
pub use tensor::{Tensor, TensorError};

// Re-export log so downstream crates can use assay_base::log::*
pub use log;
