use crate::{InputImage, OcrInferenceError, OcrPipeline};
use std::path::{Path, PathBuf};

/// An error that can occur when processing a file with [`process_file`].
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The input extension is not one of the supported raster formats.
    #[error("Unsupported file type: {}", display_extension(.extension))]
    UnsupportedFormat {
        /// The offending extension without the dot, empty if the file has none
        extension: String,
    },
    /// The input could not be read or decoded as an image.
    #[error("Failed to read image: {0}")]
    Image(#[from] image::ImageError),
    /// The model failed while recognizing the text.
    #[error(transparent)]
    Inference(#[from] OcrInferenceError),
    /// The output directory or file could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Filesystem {
        /// The directory or file that could not be written
        path: PathBuf,
        /// The underlying io error
        #[source]
        source: std::io::Error,
    },
}

fn display_extension(extension: &str) -> String {
    if extension.is_empty() {
        "(none)".to_string()
    } else {
        format!(".{extension}")
    }
}

/// Where the Markdown output for `input_path` is written: `<output_dir>/<stem>.md`.
pub fn output_path(input_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let mut file_name = stem.to_os_string();
    file_name.push(".md");
    output_dir.join(file_name)
}

/// Run OCR on one image and save the text to `<output_dir>/<stem>.md`.
///
/// The extension is checked before anything else happens. `output_dir` is
/// created if it does not exist and an existing output file is overwritten.
/// Returns the text that was written.
pub fn process_file(
    input_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    mut pipeline: impl OcrPipeline,
) -> Result<String, ProcessError> {
    let input = InputImage::new(input_path.as_ref())?;
    let output_dir = output_dir.as_ref();

    std::fs::create_dir_all(output_dir).map_err(|source| ProcessError::Filesystem {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let image = input.open()?;
    let file_name = input.path().file_name().unwrap_or_default().to_string_lossy();
    tracing::info!("Processing: {file_name}");

    let text = pipeline.recognize_text(&image)?;

    let output = output_path(input.path(), output_dir);
    std::fs::write(&output, &text).map_err(|source| ProcessError::Filesystem {
        path: output.clone(),
        source,
    })?;
    tracing::info!("Output saved to: {}", output.display());

    Ok(text)
}
