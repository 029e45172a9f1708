use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gservices_codegen::{Cli, GServicesError, GenerateOutcome, GoogleServices, load_settings};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            if let GServicesError::UnknownSettings(errors) = &err {
                for e in errors {
                    eprintln!("  {e}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<GenerateOutcome, GServicesError> {
    let (action, args) = cli.into_parts();
    let settings = load_settings(&args.root_dir, args.overrides(), std::env::vars().collect())?;
    tracing::debug!(?settings, "resolved settings");

    GoogleServices::builder()
        .root_dir(&args.root_dir)
        .settings(settings)
        .handle(action)
}
