use std::{fmt::Display, path::PathBuf};

/// The progress of loading a model
#[derive(Clone, Debug, PartialEq)]
pub enum ModelLoadingProgress {
    /// A model file is being fetched
    Downloading {
        /// The source of the download. This is not a path or URL, but a description of the source
        source: String,
    },
    /// A model file is available locally
    Downloaded {
        /// The source of the download
        source: String,
        /// Where the file ended up on disk
        path: PathBuf,
    },
    /// The weights are being placed on the device
    Loading {
        /// The progress of the loading, from 0 to 1
        progress: f32,
    },
}

impl ModelLoadingProgress {
    /// Create a new downloading progress
    pub fn downloading(source: impl Into<String>) -> Self {
        Self::Downloading {
            source: source.into(),
        }
    }

    /// Create a new finished download progress
    pub fn downloaded(source: impl Into<String>, path: PathBuf) -> Self {
        Self::Downloaded {
            source: source.into(),
            path,
        }
    }

    /// Create a new loading progress
    pub fn loading(progress: f32) -> Self {
        Self::Loading {
            progress: progress.clamp(0., 1.),
        }
    }

    /// Log the progress event at info level
    pub fn log(self) {
        tracing::info!("{self}");
    }
}

impl Display for ModelLoadingProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Downloading { source } => write!(f, "Fetching {source}"),
            Self::Downloaded { source, path } => {
                write!(f, "Fetched {source} into {}", path.display())
            }
            Self::Loading { progress } => write!(f, "Loading {:.2}%", progress * 100.),
        }
    }
}

#[test]
fn loading_progress_is_clamped() {
    assert_eq!(
        ModelLoadingProgress::loading(1.5),
        ModelLoadingProgress::Loading { progress: 1. }
    );
    assert_eq!(ModelLoadingProgress::loading(0.5).to_string(), "Loading 50.00%");
}
