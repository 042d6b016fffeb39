use crate::{InferError, Result};
use ndarray::ArrayD;
use ndarray_npy::NpzReader;
use std::fs::File;
use std::path::Path;

/// Labeled evaluation set loaded from a packaged numpy archive.
///
/// The archive holds two members: `x.npy`, a flat f32 feature array of
/// `N * image_size` elements, and `y.npy`, an i64 label array of `N`
/// elements. Everything is read into memory once at startup and is read-only
/// afterwards.
#[derive(Debug)]
pub struct MnistDataset {
    images: Vec<f32>,
    labels: Vec<i64>,
    image_size: usize,
}

impl MnistDataset {
    pub fn load(path: impl AsRef<Path>, image_size: usize) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut npz = NpzReader::new(file)
            .map_err(|e| InferError::Decode(format!("failed to open npz: {e}")))?;

        let x: ArrayD<f32> = npz
            .by_name("x.npy")
            .map_err(|e| InferError::Decode(format!("failed to read x from npz: {e}")))?;
        let y: ArrayD<i64> = npz
            .by_name("y.npy")
            .map_err(|e| InferError::Decode(format!("failed to read y from npz: {e}")))?;

        let images: Vec<f32> = x.iter().copied().collect();
        let labels: Vec<i64> = y.iter().copied().collect();

        if labels.is_empty() {
            return Err(InferError::Decode("empty test set".to_string()));
        }
        if images.len() != labels.len() * image_size {
            return Err(InferError::Shape(format!(
                "unexpected x size: got {}, want {} (= {} * {})",
                images.len(),
                labels.len() * image_size,
                labels.len(),
                image_size
            )));
        }

        Ok(Self {
            images,
            labels,
            image_size,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// One sample's pixel buffer. `index` must be below `len()`.
    pub fn image(&self, index: usize) -> &[f32] {
        let start = index * self.image_size;
        &self.images[start..start + self.image_size]
    }

    pub fn label(&self, index: usize) -> i64 {
        self.labels[index]
    }
}
