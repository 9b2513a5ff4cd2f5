//! Jina-BERT model construction for the query encoder.
//!
//! Weights and tokenizer are loaded from local files
//! (`jina-embeddings-v2-small-en` layout: `model.safetensors` next to
//! `tokenizer.json`).

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::jina_bert::{BertModel, Config, PositionEmbeddingType};
use tokenizers::Tokenizer;

use super::EmbedderConfig;
use super::error::EmbeddingError;

/// Loads the BERT weights and tokenizer named by `config`.
pub fn build_model_and_tokenizer(
    config: &EmbedderConfig,
    device: &Device,
) -> Result<(BertModel, Tokenizer), EmbeddingError> {
    let tokenizer = Tokenizer::from_file(&config.tokenizer_path).map_err(|e| {
        EmbeddingError::TokenizationFailed {
            reason: format!("failed to load tokenizer: {e}"),
        }
    })?;

    // jina-embeddings-v2-small-en dimensions.
    let model_config = Config::new(
        tokenizer.get_vocab_size(true),
        config.embedding_dim, // hidden size
        4,                    // layers
        8,                    // attention heads
        2048,                 // intermediate size
        candle_nn::Activation::Gelu,
        config.max_seq_len,
        2,
        0.02,
        1e-12,
        0,
        PositionEmbeddingType::Alibi,
    );

    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[config.model_path.clone()], DType::F32, device)
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to map safetensors: {e}"),
            })?
    };

    let model = BertModel::new(vb, &model_config).map_err(|e| EmbeddingError::ModelLoadFailed {
        reason: format!("failed to build BERT model: {e}"),
    })?;

    Ok((model, tokenizer))
}
