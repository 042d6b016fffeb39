use crate::{InferError, Result};
use std::path::Path;
use tokenizers::Tokenizer;

/// One text sample encoded to the model's fixed input length.
///
/// `input_ids[i]` is real token content iff `attention_mask[i] == 1`; every
/// position past the real content holds the pad id with mask 0.
#[derive(Debug)]
pub struct EncodedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

/// WordPiece encoder producing BERT-convention id/mask sequences.
///
/// The tokenizer itself adds no special tokens; the `[CLS]`/`[SEP]` framing
/// and `[PAD]` fill are applied here.
pub struct BertEncoder {
    tokenizer: Tokenizer,
    max_len: usize,
    cls_id: i64,
    sep_id: i64,
    pad_id: i64,
}

impl BertEncoder {
    pub fn from_file(path: impl AsRef<Path>, max_len: usize) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| InferError::Tokenizer(format!("failed to load tokenizer: {e}")))?;
        Self::from_tokenizer(tokenizer, max_len)
    }

    /// Wrap a prepared tokenizer.
    ///
    /// The `[CLS]`, `[SEP]` and `[PAD]` ids are resolved here so that a
    /// vocabulary missing them fails at construction, not per sample.
    pub fn from_tokenizer(tokenizer: Tokenizer, max_len: usize) -> Result<Self> {
        let cls_id = special_id(&tokenizer, "[CLS]")?;
        let sep_id = special_id(&tokenizer, "[SEP]")?;
        let pad_id = special_id(&tokenizer, "[PAD]")?;
        Ok(Self {
            tokenizer,
            max_len,
            cls_id,
            sep_id,
            pad_id,
        })
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Encode one text into fixed-length id and mask sequences.
    ///
    /// Builds `[CLS] + tokens + [SEP]` and truncates to `max_len`. If
    /// truncation cuts the trailing `[SEP]` it stays cut; no slot is reserved
    /// for it.
    pub fn encode(&self, text: &str) -> Result<EncodedInput> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| InferError::Tokenizer(format!("failed to encode text: {e}")))?;
        let ids = encoding.get_ids();

        let mut full = Vec::with_capacity(ids.len() + 2);
        full.push(self.cls_id);
        full.extend(ids.iter().map(|&id| i64::from(id)));
        full.push(self.sep_id);
        full.truncate(self.max_len);

        let mut input_ids = vec![self.pad_id; self.max_len];
        let mut attention_mask = vec![0i64; self.max_len];
        for (i, &id) in full.iter().enumerate() {
            input_ids[i] = id;
            attention_mask[i] = 1;
        }

        Ok(EncodedInput {
            input_ids,
            attention_mask,
        })
    }
}

fn special_id(tokenizer: &Tokenizer, token: &str) -> Result<i64> {
    tokenizer
        .token_to_id(token)
        .map(i64::from)
        .ok_or_else(|| InferError::Tokenizer(format!("{token} not found in vocab")))
}
