use chandra_common::FileSource;

/// The model loaded when no other source is configured.
pub const DEFAULT_MODEL_ID: &str = "microsoft/trocr-base-printed";

const TOKENIZER_ID: &str = "ToluClassics/candle-trocr-tokenizer";

/// The source of an [`crate::Ocr`] model.
#[derive(Clone, Debug, PartialEq)]
pub struct OcrSource {
    pub(crate) model: FileSource,
    pub(crate) config: FileSource,
    pub(crate) tokenizer: FileSource,
}

impl OcrSource {
    /// Creates a new [`OcrSource`] from a Hugging Face repository and revision
    /// that contain `model.safetensors` and `config.json`.
    pub fn new(model_id: impl ToString, revision: impl ToString) -> Self {
        let model_id = model_id.to_string();
        let revision = revision.to_string();
        Self {
            model: FileSource::huggingface(&model_id, &revision, "model.safetensors"),
            config: FileSource::huggingface(&model_id, &revision, "config.json"),
            tokenizer: FileSource::huggingface(TOKENIZER_ID, "main", "tokenizer.json"),
        }
    }

    /// Set the weights to use
    pub fn with_model(mut self, model: FileSource) -> Self {
        self.model = model;
        self
    }

    /// Set the encoder/decoder config to use
    pub fn with_config(mut self, config: FileSource) -> Self {
        self.config = config;
        self
    }

    /// Set the tokenizer to use
    pub fn with_tokenizer(mut self, tokenizer: FileSource) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// The weights this source loads
    pub fn model(&self) -> &FileSource {
        &self.model
    }

    /// The base model trained on printed text
    pub fn base_printed() -> Self {
        Self::new(DEFAULT_MODEL_ID, "refs/pr/7")
    }

    /// The base model trained on handwriting
    pub fn base_handwritten() -> Self {
        Self::new("microsoft/trocr-base-handwritten", "refs/pr/3")
    }

    /// The large model trained on handwriting
    pub fn large_handwritten() -> Self {
        Self::new("microsoft/trocr-large-handwritten", "refs/pr/6")
    }
}

impl Default for OcrSource {
    fn default() -> Self {
        Self::base_printed()
    }
}

#[test]
fn default_source_uses_fixed_model() {
    let source = OcrSource::default();
    assert_eq!(source.model().model_id(), Some(DEFAULT_MODEL_ID));
    assert_eq!(source.config.model_id(), Some(DEFAULT_MODEL_ID));
    assert_eq!(source.tokenizer.model_id(), Some(TOKENIZER_ID));
}
