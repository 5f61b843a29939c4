//! # Chandra OCR
//!
//! Load a pretrained vision-to-text model ([TrOCR](https://huggingface.co/docs/transformers/model_doc/trocr))
//! onto the CPU, run it on one image and save the recognized text as Markdown.
//!
//! ## Usage
//!
//! ```rust, no_run
//! use chandra_ocr::*;
//!
//! let mut model = load().unwrap();
//! let text = process_file("scans/receipt.png", "output", &mut model).unwrap();
//!
//! println!("{}", text);
//! ```

#![warn(missing_docs)]
#[cfg(feature = "mkl")]
extern crate intel_mkl_src;

#[cfg(feature = "accelerate")]
extern crate accelerate_src;

mod image_processor;
mod input;
mod model;
mod pipeline;
mod process;
mod source;

pub use chandra_common::{Cache, CacheError, FileSource, ModelLoadingProgress};
pub use image_processor::{ProcessorConfig, ViTImageProcessor};
pub use input::{ImageFormat, InputImage};
pub use model::{Ocr, OcrBuilder, OcrInferenceError, OcrLoadingError, DTYPE, MAX_LENGTH};
pub use pipeline::{load, OcrPipeline};
pub use process::{output_path, process_file, ProcessError};
pub use source::{OcrSource, DEFAULT_MODEL_ID};
