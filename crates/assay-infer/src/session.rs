use crate::{InferError, Result};
use assay_base::Tensor;
use ndarray::{ArrayViewD, IxDyn};
use ort::{
    inputs,
    session::{Session as OrtSession, SessionInputValue},
    value::TensorRef,
};

enum Buffer {
    I64(Tensor<i64>),
    F32(Tensor<f32>),
}

/// A named fixed-shape input buffer, created once and overwritten in place
/// between runs. Shape and dtype never change after creation.
pub struct BoundInput {
    name: String,
    buffer: Buffer,
}

impl BoundInput {
    pub fn i64(name: &str, shape: &[usize]) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            buffer: Buffer::I64(Tensor::zeros(shape.to_vec())?),
        })
    }

    pub fn f32(name: &str, shape: &[usize]) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            buffer: Buffer::F32(Tensor::zeros(shape.to_vec())?),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A loaded model graph with its input and output buffers bound for the
/// session's whole lifetime.
///
/// `run()` reads the current contents of every bound input, executes the
/// graph, and overwrites the output buffer in place. Calls are strictly
/// sequential; buffers are only ever touched between runs.
pub struct BoundSession {
    session: OrtSession,
    inputs: Vec<BoundInput>,
    output_name: String,
    output: Vec<f32>,
}

impl BoundSession {
    pub(crate) fn new(
        session: OrtSession,
        inputs: Vec<BoundInput>,
        output_name: &str,
        output_len: usize,
    ) -> Result<Self> {
        if inputs.is_empty() || inputs.len() > 2 {
            return Err(InferError::Shape(format!(
                "expected 1 or 2 bound inputs, got {}",
                inputs.len()
            )));
        }

        let model_inputs: Vec<String> = session
            .inputs
            .iter()
            .map(|input| input.name.to_string())
            .collect();
        for input in &inputs {
            if !model_inputs.contains(&input.name) {
                return Err(InferError::Shape(format!(
                    "input '{}' not found in model (model inputs: {:?})",
                    input.name, model_inputs
                )));
            }
        }

        let model_outputs: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.to_string())
            .collect();
        if !model_outputs.iter().any(|name| name == output_name) {
            return Err(InferError::Shape(format!(
                "output '{}' not found in model (model outputs: {:?})",
                output_name, model_outputs
            )));
        }

        Ok(Self {
            session,
            inputs,
            output_name: output_name.to_string(),
            output: vec![0.0; output_len],
        })
    }

    /// Overwrite the named i64 input buffer with one sample's data.
    pub fn write_i64(&mut self, name: &str, data: &[i64]) -> Result<()> {
        match &mut self.input_mut(name)?.buffer {
            Buffer::I64(tensor) => write_into(name, tensor, data),
            Buffer::F32(_) => Err(InferError::Shape(format!(
                "input '{name}' is bound as f32, not i64"
            ))),
        }
    }

    /// Overwrite the named f32 input buffer with one sample's data.
    pub fn write_f32(&mut self, name: &str, data: &[f32]) -> Result<()> {
        match &mut self.input_mut(name)?.buffer {
            Buffer::F32(tensor) => write_into(name, tensor, data),
            Buffer::I64(_) => Err(InferError::Shape(format!(
                "input '{name}' is bound as i64, not f32"
            ))),
        }
    }

    /// Execute the graph over the current input buffer contents.
    ///
    /// Overwrites the output buffer in place; the previous contents are only
    /// replaced if the run succeeds and the output element count matches.
    pub fn run(&mut self) -> Result<()> {
        let outputs = match self.inputs.as_slice() {
            [a] => {
                let value = bind_value(&a.buffer)?;
                self.session.run(inputs![a.name.as_str() => value])?
            }
            [a, b] => {
                let first = bind_value(&a.buffer)?;
                let second = bind_value(&b.buffer)?;
                self.session
                    .run(inputs![a.name.as_str() => first, b.name.as_str() => second])?
            }
            _ => {
                return Err(InferError::Shape(format!(
                    "expected 1 or 2 bound inputs, got {}",
                    self.inputs.len()
                )));
            }
        };

        let value = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            InferError::Runtime(format!("output '{}' missing from run", self.output_name))
        })?;
        let array = value.try_extract_array::<f32>().map_err(|e| {
            InferError::Runtime(format!("output '{}' is not f32: {e}", self.output_name))
        })?;

        if array.len() != self.output.len() {
            return Err(InferError::Shape(format!(
                "unexpected '{}' length: got {}, want {}",
                self.output_name,
                array.len(),
                self.output.len()
            )));
        }

        for (dst, src) in self.output.iter_mut().zip(array.iter()) {
            *dst = *src;
        }

        Ok(())
    }

    /// The output buffer. Valid to read after a successful `run()`.
    pub fn output(&self) -> &[f32] {
        &self.output
    }

    fn input_mut(&mut self, name: &str) -> Result<&mut BoundInput> {
        self.inputs
            .iter_mut()
            .find(|input| input.name == name)
            .ok_or_else(|| InferError::Shape(format!("no input bound as '{name}'")))
    }
}

fn bind_value<'a>(buffer: &'a Buffer) -> Result<SessionInputValue<'a>> {
    Ok(match buffer {
        Buffer::I64(tensor) => TensorRef::from_array_view(tensor_view(tensor)?)?.into(),
        Buffer::F32(tensor) => TensorRef::from_array_view(tensor_view(tensor)?)?.into(),
    })
}

fn tensor_view<T>(tensor: &Tensor<T>) -> Result<ArrayViewD<'_, T>> {
    ArrayViewD::from_shape(IxDyn(&tensor.shape), tensor.data.as_slice())
        .map_err(|e| InferError::Shape(format!("bound buffer view failed: {e}")))
}

fn write_into<T: Copy>(name: &str, tensor: &mut Tensor<T>, data: &[T]) -> Result<()> {
    if data.len() != tensor.data.len() {
        return Err(InferError::Shape(format!(
            "input '{}': expected {} elements, got {}",
            name,
            tensor.data.len(),
            data.len()
        )));
    }
    tensor.data.copy_from_slice(data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_input_starts_zeroed() {
        let input = BoundInput::i64("input_ids", &[1, 128]).unwrap();
        assert_eq!(input.name(), "input_ids");
        match &input.buffer {
            Buffer::I64(tensor) => {
                assert_eq!(tensor.shape, vec![1, 128]);
                assert!(tensor.data.iter().all(|&v| v == 0));
            }
            Buffer::F32(_) => panic!("expected i64 buffer"),
        }
    }

    #[test]
    fn test_write_into_rejects_length_mismatch() {
        let mut tensor = Tensor::<f32>::zeros(vec![1, 4]).unwrap();
        let result = write_into("input", &mut tensor, &[1.0, 2.0]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("expected 4"));
    }

    #[test]
    fn test_write_into_overwrites_in_place() {
        let mut tensor = Tensor::<i64>::zeros(vec![1, 3]).unwrap();
        write_into("input", &mut tensor, &[7, 8, 9]).unwrap();
        assert_eq!(tensor.data, vec![7, 8, 9]);
        write_into("input", &mut tensor, &[1, 2, 3]).unwrap();
        assert_eq!(tensor.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_tensor_view_preserves_shape() {
        let tensor = Tensor::new(vec![2, 3], vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let view = tensor_view(&tensor).unwrap();
        assert_eq!(view.shape(), &[2, 3]);
        assert_eq!(view[[0, 0]], 1.0);
        assert_eq!(view[[1, 2]], 6.0);
    }
}
