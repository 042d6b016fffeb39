pub mod dataset;
pub mod device;
pub mod encoder;
pub mod error;
pub mod inference;
pub mod postprocess;
pub mod session;

pub use dataset::MnistDataset;
pub use device::Device;
pub use encoder::{BertEncoder, EncodedInput};
pub use error::{InferError, Result};
pub use inference::Inference;
pub use postprocess::{Accuracy, argmax, softmax};
pub use session::{BoundInput, BoundSession};
