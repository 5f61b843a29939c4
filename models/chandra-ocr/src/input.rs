use crate::ProcessError;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// A raster image format the processor accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// `.png`
    Png,
    /// `.jpg`
    Jpg,
    /// `.jpeg`
    Jpeg,
    /// `.gif`
    Gif,
    /// `.bmp`
    Bmp,
}

impl ImageFormat {
    /// Every supported format.
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Png,
        ImageFormat::Jpg,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Bmp,
    ];

    /// The lowercase extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        }
    }

    /// Match an extension (without the dot) case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }
}

/// An input file whose extension has been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputImage {
    path: PathBuf,
    format: ImageFormat,
}

impl InputImage {
    /// Check that `path` names a supported image type. Nothing is read from disk.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ProcessError> {
        let path = path.into();
        match ImageFormat::from_path(&path) {
            Some(format) => Ok(Self { path, format }),
            None => Err(ProcessError::UnsupportedFormat {
                extension: path
                    .extension()
                    .map(|extension| extension.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }),
        }
    }

    /// The path of the input file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The format inferred from the extension
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Decode the file and drop any alpha or palette information.
    pub fn open(&self) -> Result<RgbImage, image::ImageError> {
        let image = image::io::Reader::open(&self.path)?
            .with_guessed_format()?
            .decode()?;
        Ok(image.to_rgb8())
    }
}
