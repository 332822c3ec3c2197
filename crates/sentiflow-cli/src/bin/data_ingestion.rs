use std::path::PathBuf;

use clap::Parser;
use sentiflow_cli::{exit_codes, logging, runtime};
use sentiflow_ingest::config::DEFAULT_PARAMS_PATH;
use sentiflow_ingest::run_from_params;

/// Fetch the review dataset, encode labels and write a stratified
/// train/test split to `<data-path>/raw/`.
#[derive(Debug, Parser)]
#[command(name = "data-ingestion", version, about)]
struct Args {
    /// Parameters file with a `data_ingestion` section.
    #[arg(long, env = "SENTIFLOW_PARAMS", default_value = DEFAULT_PARAMS_PATH)]
    params: PathBuf,

    /// Output root; overrides `data_ingestion.data_path`.
    #[arg(long)]
    data_path: Option<PathBuf>,
}

fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = logging::init() {
        eprintln!("fatal: {e:?}");
        std::process::exit(exit_codes::INTERNAL_ERROR);
    }

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            std::process::exit(exit_codes::INTERNAL_ERROR);
        }
    };

    let code = match rt.block_on(run_from_params(&args.params, args.data_path)) {
        Ok(report) => {
            println!(
                "wrote {} train rows to {} and {} test rows to {}",
                report.train,
                report.paths.train.display(),
                report.test,
                report.paths.test.display()
            );
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}
