//! Query/synopsis encoder.
//!
//! Maps free text into the catalog's embedding space with a local Jina-BERT
//! model. Use [`EmbedderConfig::stub`] for tests and offline runs without
//! model files; the stub is hash-seeded and fully deterministic.

pub mod device;
mod error;
pub mod model;


pub use error::EmbeddingError;

use std::path::PathBuf;
use std::sync::Arc;

use candle_core::{Device, Module, Tensor};
use candle_transformers::models::jina_bert::BertModel;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};

use device::select_device;
use model::build_model_and_tokenizer;

/// Configuration for [`Embedder`].
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Path to `model.safetensors`.
    pub model_path: PathBuf,
    /// Path to `tokenizer.json`.
    pub tokenizer_path: PathBuf,
    /// Output embedding dimension (also the model hidden size).
    pub embedding_dim: usize,
    /// Max tokens to consider per text.
    pub max_seq_len: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            tokenizer_path: PathBuf::new(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            testing_stub: false,
        }
    }
}

impl EmbedderConfig {
    /// Creates a config for a weights file, inferring `tokenizer.json` from
    /// its directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        let model_path = model_path.into();
        let tokenizer_path = model_path
            .parent()
            .map(|p| p.join("tokenizer.json"))
            .unwrap_or_default();

        Self {
            model_path,
            tokenizer_path,
            ..Default::default()
        }
    }

    /// Overrides the tokenizer location.
    pub fn tokenizer_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.tokenizer_path = path.into();
        self
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            return Ok(());
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_path is required (stubbing is disabled)".to_string(),
            });
        }
        if !self.model_path.exists() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_path.clone(),
            });
        }
        if !self.tokenizer_path.exists() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.tokenizer_path.clone(),
            });
        }

        Ok(())
    }
}

enum EncoderBackend {
    Model {
        model: Arc<BertModel>,
        tokenizer: Arc<Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Text encoder shared by the pipeline and the snapshot builder.
///
/// Deterministic for identical input under a fixed encoder version; both the
/// model and stub backends are pure functions of the input text.
pub struct Embedder {
    backend: EncoderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Embedder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({device:?})"),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl Embedder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Encoder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for encoder");

        let (model, tokenizer) = build_model_and_tokenizer(&config, &device)?;

        info!(
            model_path = %config.model_path.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Encoder model loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model: Arc::new(model),
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    /// Encodes a single text into an L2-normalized vector.
    ///
    /// Fails with [`EmbeddingError::EmptyInput`] when the trimmed text is
    /// empty; callers are expected to guard this but the encoder checks too.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EncoderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    /// Encodes a batch of texts.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &Arc<BertModel>,
        tokenizer: &Arc<Tokenizer>,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let mut tokens: Vec<u32> = encoding.get_ids().to_vec();
        if tokens.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        if tokens.len() > self.config.max_seq_len {
            tokens.truncate(self.config.max_seq_len);
        }

        debug!(
            text_len = text.len(),
            token_count = tokens.len(),
            "Encoding text"
        );

        let token_ids = Tensor::new(&tokens[..], device)?.unsqueeze(0)?;
        let hidden = model.forward(&token_ids)?;
        let (_, n_tokens, _) = hidden.dims3()?;

        // Mean-pool over tokens, then L2-normalize.
        let pooled = (hidden.sum(1)? / (n_tokens as f64))?;
        let normalized = pooled.broadcast_div(&pooled.sqr()?.sum_keepdim(1)?.sqrt()?)?;

        let embedding: Vec<f32> = normalized.squeeze(0)?.to_vec1()?;

        if embedding.len() != self.config.embedding_dim {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "model produced dimension {}, expected {}",
                    embedding.len(),
                    self.config.embedding_dim
                ),
            });
        }

        Ok(embedding)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }
}
