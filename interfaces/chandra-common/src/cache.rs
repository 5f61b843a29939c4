use crate::{FileSource, ModelLoadingProgress};
use hf_hub::{api::sync::ApiBuilder, Repo, RepoType};
use std::path::{Path, PathBuf};

/// The environment variable that overrides the default cache location
pub const CACHE_DIR_ENV: &str = "CHANDRA_CACHE_DIR";

/// An error that can occur when resolving a [`FileSource`] to a local file
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The hub could not be reached or does not have the file
    #[error("Hugging Face API error: {0}")]
    HuggingFaceApi(#[from] hf_hub::api::sync::ApiError),
    /// A local source points at a file that does not exist
    #[error("Local model file {0} does not exist")]
    MissingLocalFile(PathBuf),
}

/// A local cache of model files fetched from the Hugging Face hub
#[derive(Debug, Clone)]
pub struct Cache {
    location: PathBuf,
    /// The huggingface token to use (defaults to the token set with `huggingface-cli login`)
    huggingface_token: Option<String>,
    progress_bar: bool,
}

impl Cache {
    /// Create a new cache with a specific location
    pub fn new(location: PathBuf) -> Self {
        Self {
            location,
            huggingface_token: None,
            progress_bar: false,
        }
    }

    /// Set the Hugging Face token to use for downloading (defaults to the token set with `huggingface-cli login`, and then the environment variable `HF_TOKEN`)
    pub fn with_huggingface_token(mut self, token: Option<String>) -> Self {
        self.huggingface_token = token;
        self
    }

    /// Show a terminal progress bar while downloading
    pub fn with_progress_bar(mut self, progress_bar: bool) -> Self {
        self.progress_bar = progress_bar;
        self
    }

    /// The directory files are cached in
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Check if the file exists locally (if it is a local file or if it has been downloaded)
    pub fn exists(&self, source: &FileSource) -> bool {
        match source {
            FileSource::HuggingFace {
                model_id,
                revision,
                file,
            } => hf_hub::Cache::new(self.location.clone())
                .repo(repo(model_id, revision))
                .get(file)
                .is_some(),
            FileSource::Local(path) => path.exists(),
        }
    }

    /// Get the file from the cache, downloading it if necessary
    pub fn get(
        &self,
        source: &FileSource,
        mut progress: impl FnMut(ModelLoadingProgress),
    ) -> Result<PathBuf, CacheError> {
        match source {
            FileSource::HuggingFace {
                model_id,
                revision,
                file,
            } => {
                progress(ModelLoadingProgress::downloading(source.to_string()));
                let token = self.huggingface_token.clone().or_else(huggingface_token);
                let api = ApiBuilder::new()
                    .with_cache_dir(self.location.clone())
                    .with_token(token)
                    .with_progress(self.progress_bar)
                    .build()?;
                tracing::trace!("Fetching {source} into {}", self.location.display());
                let path = api.repo(repo(model_id, revision)).get(file)?;
                progress(ModelLoadingProgress::downloaded(
                    source.to_string(),
                    path.clone(),
                ));
                Ok(path)
            }
            FileSource::Local(path) => {
                if path.exists() {
                    Ok(path.clone())
                } else {
                    Err(CacheError::MissingLocalFile(path.clone()))
                }
            }
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        let location = std::env::var_os(CACHE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| hf_hub::Cache::default().path().clone());
        Self::new(location)
    }
}

fn repo(model_id: &str, revision: &str) -> Repo {
    Repo::with_revision(model_id.to_string(), RepoType::Model, revision.to_string())
}

fn huggingface_token() -> Option<String> {
    let cache = hf_hub::Cache::default();
    cache.token().or_else(|| std::env::var("HF_TOKEN").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_files_resolve_without_progress() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("model.safetensors");
        std::fs::write(&weights, b"weights").unwrap();

        let cache = Cache::new(dir.path().join("cache"));
        let source = FileSource::local(weights.clone());
        assert!(cache.exists(&source));

        let mut events = Vec::new();
        let path = cache.get(&source, |p| events.push(p)).unwrap();
        assert_eq!(path, weights);
        assert!(events.is_empty());
    }

    #[test]
    fn missing_local_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path().to_path_buf());
        let source = FileSource::local(dir.path().join("missing.safetensors"));
        assert!(!cache.exists(&source));
        assert!(matches!(
            cache.get(&source, |_| {}),
            Err(CacheError::MissingLocalFile(_))
        ));
    }

    #[test]
    fn empty_cache_has_no_hub_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path().to_path_buf());
        let source = FileSource::huggingface("microsoft/trocr-base-printed", "main", "config.json");
        assert!(!cache.exists(&source));
    }
}
