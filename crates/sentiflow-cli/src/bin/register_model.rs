use std::path::PathBuf;

use clap::Parser;
use sentiflow_cli::{exit_codes, logging, runtime};
use sentiflow_registry::{
    load_model_info, register_model, MlflowClient, RegistryResult, DEFAULT_MODEL_INFO_PATH,
    DEFAULT_MODEL_NAME,
};

/// Register the evaluated model and move the new version to Staging.
#[derive(Debug, Parser)]
#[command(name = "register-model", version, about)]
struct Args {
    /// JSON file with `run_id` and `model_path`.
    #[arg(long, default_value = DEFAULT_MODEL_INFO_PATH)]
    model_info: PathBuf,

    /// Registered model name.
    #[arg(long, env = "SENTIFLOW_MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    model_name: String,
}

async fn run(args: &Args) -> RegistryResult<String> {
    let info = load_model_info(&args.model_info)?;
    let client = MlflowClient::from_env()?;
    register_model(&client, &args.model_name, &info).await
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

    let code = match rt.block_on(run(&args)) {
        Ok(version) => {
            println!("{} version {}", args.model_name, version);
            exit_codes::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "model registration failed");
            eprintln!("error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}
