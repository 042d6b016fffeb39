use assay_base::log;
use assay_infer::{Accuracy, BoundInput, InferError, Inference, MnistDataset, argmax};

const NPZ_PATH: &str = "data/mnist_test_normalized.npz";
const MODEL_PATH: &str = "data/mnist_cnn.onnx";

const CHANNELS: usize = 1;
const HEIGHT: usize = 28;
const WIDTH: usize = 28;
const NUM_CLASSES: usize = 10;

fn main() -> Result<(), InferError> {
    assay_base::init_stdout_logger();

    let image_size = CHANNELS * HEIGHT * WIDTH;
    let dataset = MnistDataset::load(NPZ_PATH, image_size)?;
    log::info!(
        "loaded test set: N={}, x={}, y={}",
        dataset.len(),
        dataset.len() * image_size,
        dataset.len()
    );

    let inference = Inference::cpu();

    // One [1, 1, 28, 28] row, overwritten per sample
    let mut session = inference.bind_session(
        MODEL_PATH,
        vec![BoundInput::f32("input", &[1, CHANNELS, HEIGHT, WIDTH])?],
        "logits",
        NUM_CLASSES,
    )?;

    let mut accuracy = Accuracy::new();
    for i in 0..dataset.len() {
        session.write_f32("input", dataset.image(i))?;
        session.run()?;

        let pred = argmax(session.output());
        accuracy.record(pred as i64, dataset.label(i));
    }

    println!("Test accuracy (from npz): {:.4}", accuracy.value());

    Ok(())
}
