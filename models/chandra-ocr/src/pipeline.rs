use crate::{Ocr, OcrInferenceError, OcrLoadingError};
use candle_core::Device;
use image::RgbImage;

/// Something that turns an RGB image into text.
///
/// [`Ocr`] is the real implementation. [`crate::process_file`] only depends on
/// this trait, so it can be driven by any recognizer.
pub trait OcrPipeline {
    /// The device the pipeline runs on.
    fn device(&self) -> &Device;

    /// Recognize the text in an image.
    fn recognize_text(&mut self, image: &RgbImage) -> Result<String, OcrInferenceError>;
}

impl OcrPipeline for Ocr {
    fn device(&self) -> &Device {
        Ocr::device(self)
    }

    fn recognize_text(&mut self, image: &RgbImage) -> Result<String, OcrInferenceError> {
        Ocr::recognize_text(self, image)
    }
}

impl<P: OcrPipeline + ?Sized> OcrPipeline for &mut P {
    fn device(&self) -> &Device {
        (**self).device()
    }

    fn recognize_text(&mut self, image: &RgbImage) -> Result<String, OcrInferenceError> {
        (**self).recognize_text(image)
    }
}

/// Load the default model onto the CPU.
///
/// Shorthand for `Ocr::builder().build()`.
pub fn load() -> Result<Ocr, OcrLoadingError> {
    Ocr::builder().build().inspect_err(|err| {
        tracing::error!("Error loading model: {err}");
    })
}
