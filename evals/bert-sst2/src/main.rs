use assay_base::log;
use assay_infer::{BertEncoder, BoundInput, InferError, Inference, argmax, softmax};

const MODEL_PATH: &str = "data/bert-sst2.onnx";
const TOKENIZER_PATH: &str = "data/bert-sst2/tokenizer.json";

const MAX_LEN: usize = 128;
const NUM_CLASSES: usize = 2;
const LABEL_NAMES: [&str; NUM_CLASSES] = ["negative", "positive"];

const TEXTS: [&str; 5] = [
    "This movie is great!",
    "This movie is terrible.",
    "I really loved this film.",
    "I really hated this film.",
    "The plot was boring and slow.",
];

fn main() -> Result<(), InferError> {
    assay_base::init_stdout_logger();

    let encoder = BertEncoder::from_file(TOKENIZER_PATH, MAX_LEN)?;
    let inference = Inference::cpu();

    // One [1, 128] row per stream, reused for every text
    let mut session = inference.bind_session(
        MODEL_PATH,
        vec![
            BoundInput::i64("input_ids", &[1, MAX_LEN])?,
            BoundInput::i64("attention_mask", &[1, MAX_LEN])?,
        ],
        "logits",
        NUM_CLASSES,
    )?;

    log::info!("evaluating {} texts", TEXTS.len());

    for text in TEXTS {
        let encoded = encoder.encode(text)?;
        session.write_i64("input_ids", &encoded.input_ids)?;
        session.write_i64("attention_mask", &encoded.attention_mask)?;
        session.run()?;

        let logits = session.output();
        let probs = softmax(logits);
        let pred = argmax(logits);

        println!("text: {text}");
        println!("  logits: {logits:?}");
        println!("  probs : {probs:?}");
        println!("  pred  : {pred} -> {}", LABEL_NAMES[pred]);
        println!("----------------------------------------");
    }

    println!("DONE");

    Ok(())
}
