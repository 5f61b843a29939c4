use chandra_cli::{init_logging, parse_or_exit, ModelArgs};
use chandra_ocr::process_file;
use clap::Parser;
use std::path::PathBuf;

/// Run OCR on an image and save the text as Markdown.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image to read (png, jpg, jpeg, gif or bmp)
    input_file: PathBuf,

    /// Directory `<input stem>.md` is written to
    output_dir: PathBuf,

    #[command(flatten)]
    model: ModelArgs,
}

fn main() -> anyhow::Result<()> {
    let cli: Cli = parse_or_exit();
    init_logging(cli.model.log_file.as_deref())?;

    let mut model = cli.model.load()?;
    process_file(&cli.input_file, &cli.output_dir, &mut model)?;

    tracing::info!("Processing complete!");
    Ok(())
}
