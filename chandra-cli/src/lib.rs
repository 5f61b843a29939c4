//! Pieces shared by the chandra command line tools.

use anyhow::Context;
use chandra_ocr::{Cache, Ocr};
use std::{fs::File, path::Path, path::PathBuf, sync::Arc};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Options for loading the model.
#[derive(clap::Args, Debug)]
pub struct ModelArgs {
    /// Directory model files are downloaded into
    #[arg(long, env = "CHANDRA_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ModelArgs {
    /// Load the model onto the CPU, logging progress.
    pub fn load(&self) -> anyhow::Result<Ocr> {
        let mut builder = Ocr::builder();
        if let Some(cache_dir) = &self.cache_dir {
            builder = builder.with_cache(Cache::new(cache_dir.clone()));
        }
        builder
            .build_with_loading_handler(|progress| tracing::info!("{progress}"))
            .inspect_err(|err| tracing::error!("Error loading model: {err}"))
            .context("failed to load the OCR model")
    }
}

/// Parse the command line, exiting with status 1 and a usage message if it is invalid.
///
/// `--help` and `--version` still exit with status 0.
pub fn parse_or_exit<P: clap::Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

/// Install the global subscriber: logs go to stderr, and also to `log_file` if one is given.
///
/// The level defaults to INFO and can be changed with `RUST_LOG`.
pub fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}
