use crate::session::{BoundInput, BoundSession};
use crate::{Device, InferError, Result};
use assay_base::log;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::Session as OrtSession;
use std::path::Path;
use std::sync::OnceLock;

static ORT_INIT: OnceLock<()> = OnceLock::new();

fn ensure_ort_init() {
    ORT_INIT.get_or_init(|| {
        let _ = ort::init().commit();
    });
}

/// Process-wide handle to the native inference runtime.
///
/// Exactly one runtime environment exists per process; constructing an
/// `Inference` initializes it. Sessions are only created through this handle,
/// which keeps the runtime dependency visible at every call site.
#[derive(Debug)]
pub struct Inference {
    device: Device,
}

impl Inference {
    pub fn cpu() -> Self {
        ensure_ort_init();
        let device = Device::Cpu;
        log::info!("inference device: {device}");
        Self { device }
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(device_id: i32) -> Self {
        ensure_ort_init();
        let device = Device::Cuda { device_id };
        log::info!("inference device: {device}");
        Self { device }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn onnx_session(&self, model_path: &Path) -> Result<OrtSession> {
        let session = match &self.device {
            Device::Cpu => OrtSession::builder()?
                .with_execution_providers([CPUExecutionProvider::default().build()])?
                .commit_from_file(model_path)?,
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => OrtSession::builder()?
                .with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(*device_id)
                        .build(),
                    CPUExecutionProvider::default().build(),
                ])?
                .commit_from_file(model_path)?,
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(InferError::Runtime("CUDA feature not enabled".to_string()));
            }
        };
        Ok(session)
    }

    /// Load a model and bind fixed-shape input/output buffers to it.
    ///
    /// The declared input names and the output name are validated against the
    /// model's reported metadata; a mismatch fails here, before any inference.
    pub fn bind_session(
        &self,
        model_path: impl AsRef<Path>,
        inputs: Vec<BoundInput>,
        output_name: &str,
        output_len: usize,
    ) -> Result<BoundSession> {
        let session = self.onnx_session(model_path.as_ref())?;
        BoundSession::new(session, inputs, output_name, output_len)
    }
}
