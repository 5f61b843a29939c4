use crate::{image_processor, OcrSource};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::{
    generation::LogitsProcessor,
    models::{trocr, vit},
};
use chandra_common::{cpu_device, Cache, CacheError, ModelLoadingProgress};
use image::RgbImage;
use std::{fs::File, io::BufReader, path::PathBuf};
use tokenizers::Tokenizer;

/// The precision every parameter is loaded in.
pub const DTYPE: DType = DType::F32;

/// The longest token sequence generation may produce, counting the decoder start token.
pub const MAX_LENGTH: usize = 512;

// Sampling is greedy, the seed only has to be fixed.
const SEED: u64 = 1337;

/// An error that can occur when loading an [`Ocr`] model.
#[derive(Debug, thiserror::Error)]
pub enum OcrLoadingError {
    /// An error that can occur when trying to load a model file from huggingface or a local file.
    #[error("Failed to load model from huggingface or local file: {0}")]
    Download(#[from] CacheError),
    /// An error that can occur when trying to read the model config.
    #[error("Failed to read config {0}: {1}")]
    ReadConfig(PathBuf, #[source] std::io::Error),
    /// An error that can occur when trying to parse the model config.
    #[error("Failed to load config: {0}")]
    LoadConfig(serde_json::Error),
    /// An error that can occur when trying to load the tokenizer.
    #[error("Failed to load tokenizer: {0}")]
    LoadTokenizer(tokenizers::Error),
    /// An error that can occur when the weights do not fit the architecture or cannot be placed on the device.
    #[error("Failed to load model into device: {0}")]
    LoadModel(#[from] candle_core::Error),
}

/// An error that can occur when running an [`Ocr`] model.
#[derive(Debug, thiserror::Error)]
pub enum OcrInferenceError {
    /// An error that can occur while building the input tensor or generating tokens.
    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),
    /// An error that can occur when decoding the generated tokens.
    #[error("Tokenizer error: {0}")]
    Tokenizer(tokenizers::Error),
}

#[derive(Debug, Clone, serde::Deserialize)]
struct VisionEncoderDecoderConfig {
    encoder: vit::Config,
    decoder: trocr::TrOCRConfig,
}

/// A builder for [`Ocr`].
#[derive(Default)]
pub struct OcrBuilder {
    source: OcrSource,
    cache: Cache,
}

impl OcrBuilder {
    /// Sets the source of the model.
    pub fn with_source(mut self, source: OcrSource) -> Self {
        self.source = source;
        self
    }

    /// Sets the cache model files are downloaded into.
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = cache;
        self
    }

    /// Builds the [`Ocr`] model, logging loading progress.
    pub fn build(self) -> Result<Ocr, OcrLoadingError> {
        self.build_with_loading_handler(ModelLoadingProgress::log)
    }

    /// Builds the [`Ocr`] model, reporting loading progress to `handler`.
    pub fn build_with_loading_handler(
        self,
        handler: impl FnMut(ModelLoadingProgress),
    ) -> Result<Ocr, OcrLoadingError> {
        Ocr::new(self, handler)
    }
}

/// A vision-to-text model bound to the CPU in F32, ready for inference.
pub struct Ocr {
    device: Device,
    model: trocr::TrOCRModel,
    decoder_config: trocr::TrOCRConfig,
    processor: image_processor::ViTImageProcessor,
    tokenizer: Tokenizer,
    source: OcrSource,
}

impl Ocr {
    /// Creates a new [`OcrBuilder`].
    pub fn builder() -> OcrBuilder {
        OcrBuilder::default()
    }

    fn new(
        settings: OcrBuilder,
        mut handler: impl FnMut(ModelLoadingProgress),
    ) -> Result<Self, OcrLoadingError> {
        let OcrBuilder { source, cache } = settings;
        tracing::info!(model = %source.model, "Loading OCR model on the CPU");

        let tokenizer = {
            let path = cache.get(&source.tokenizer, &mut handler)?;
            Tokenizer::from_file(&path).map_err(OcrLoadingError::LoadTokenizer)?
        };
        tracing::debug!("Tokenizer loaded");

        let config: VisionEncoderDecoderConfig = {
            let path = cache.get(&source.config, &mut handler)?;
            let file =
                File::open(&path).map_err(|err| OcrLoadingError::ReadConfig(path.clone(), err))?;
            serde_json::from_reader(BufReader::new(file)).map_err(OcrLoadingError::LoadConfig)?
        };

        let weights = cache.get(&source.model, &mut handler)?;
        handler(ModelLoadingProgress::loading(0.));
        let device = cpu_device();
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DTYPE, &device)? };
        let model = trocr::TrOCRModel::new(&config.encoder, &config.decoder, vb)?;
        handler(ModelLoadingProgress::loading(1.));

        let processor =
            image_processor::ViTImageProcessor::new(&image_processor::ProcessorConfig::default());

        tracing::info!(device = ?device, dtype = ?DTYPE, "Model loaded");

        Ok(Self {
            device,
            model,
            decoder_config: config.decoder,
            processor,
            tokenizer,
            source,
        })
    }

    /// The device every parameter lives on. Always the CPU.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The precision of every parameter.
    pub fn dtype(&self) -> DType {
        DTYPE
    }

    /// The source this model was loaded from.
    pub fn source(&self) -> &OcrSource {
        &self.source
    }

    /// Recognize the text in an image.
    ///
    /// Generation is greedy and bounded by [`MAX_LENGTH`]; special tokens are
    /// stripped from the result.
    pub fn recognize_text(&mut self, image: &RgbImage) -> Result<String, OcrInferenceError> {
        // Each call starts from an empty kv cache.
        self.model.reset_kv_cache();

        let pixel_values = self.processor.preprocess(&[image], &self.device)?;
        let encoder_xs = self.model.encoder().forward(&pixel_values)?;

        let mut logits_processor = LogitsProcessor::new(SEED, None, None);

        let mut token_ids: Vec<u32> = vec![self.decoder_config.decoder_start_token_id];
        while token_ids.len() < MAX_LENGTH {
            let context_size = if token_ids.len() > 1 { 1 } else { token_ids.len() };
            let start_pos = token_ids.len() - context_size;
            let input_ids = Tensor::new(&token_ids[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = self.model.decode(&input_ids, &encoder_xs, start_pos)?;

            let logits = logits.squeeze(0)?;
            let logits = logits.get(logits.dim(0)? - 1)?;
            let token = logits_processor.sample(&logits)?;
            token_ids.push(token);

            if token == self.decoder_config.eos_token_id {
                break;
            }
        }
        tracing::debug!(tokens = token_ids.len(), "Generation finished");

        self.tokenizer
            .decode(&token_ids, true)
            .map_err(OcrInferenceError::Tokenizer)
    }
}
