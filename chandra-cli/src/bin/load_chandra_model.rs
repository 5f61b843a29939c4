use chandra_cli::{init_logging, parse_or_exit, ModelArgs};
use clap::Parser;

/// Load the OCR model onto the CPU and report where it ended up.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    model: ModelArgs,
}

fn main() -> anyhow::Result<()> {
    let cli: Cli = parse_or_exit();
    init_logging(cli.model.log_file.as_deref())?;

    let model = cli.model.load()?;
    tracing::info!(
        model = %model.source().model(),
        device = ?model.device(),
        dtype = ?model.dtype(),
        "Model successfully loaded and ready for inference"
    );
    Ok(())
}
