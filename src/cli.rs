//! Clap adapter for the generator.
//!
//! Compiled only with the `cli` Cargo feature (on by default). The parsed
//! arguments are converted into an [`Action`] plus dotted-key overrides for
//! [`load_settings`](crate::load_settings); all logic then flows through the
//! clap-free [`GoogleServicesBuilder`](crate::GoogleServicesBuilder).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use toml::Value;

use crate::types::Action;

/// Generate `googleServicesOptionsBuilder()` for an Android library module.
#[derive(Debug, Parser)]
#[command(name = "gservices", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Locate google-services.json and write the options builder source.
    Generate(VariantArgs),
    /// List the locations searched for google-services.json, in order.
    /// Existing files are marked with `*`.
    Candidates(VariantArgs),
}

/// Inputs for one build variant. Unset flags fall back to the environment,
/// then to `gservices.toml` in the root directory.
#[derive(Debug, Args)]
pub struct VariantArgs {
    /// Module root directory.
    #[arg(long, default_value = ".")]
    pub root_dir: PathBuf,

    /// Package name selecting the client entry in google-services.json.
    #[arg(long)]
    pub application_id: Option<String>,

    /// Package of the generated file (default: the application id).
    #[arg(long)]
    pub output_package: Option<String>,

    /// Build type of the variant (e.g. debug, release).
    #[arg(long)]
    pub build_type: Option<String>,

    /// Product flavor of the variant. Repeat in flavor dimension order.
    #[arg(long = "flavor", value_delimiter = ',')]
    pub flavors: Vec<String>,

    /// Output directory, cleared on every run.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file name to search for.
    #[arg(long)]
    pub file_name: Option<String>,

    /// Which candidate wins when several exist.
    #[arg(long, value_parser = ["shallowest-first", "deepest-first"])]
    pub search_order: Option<String>,
}

impl Cli {
    /// Split into the framework-agnostic [`Action`] and the variant inputs.
    pub fn into_parts(self) -> (Action, VariantArgs) {
        match self.command {
            Command::Generate(args) => (Action::Generate, args),
            Command::Candidates(args) => (Action::Candidates, args),
        }
    }
}

impl VariantArgs {
    /// Flags the user actually passed, as dotted settings keys.
    pub fn overrides(&self) -> Vec<(String, Value)> {
        let mut overrides = Vec::new();
        let mut push = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                overrides.push((key.to_string(), v));
            }
        };

        push("application_id", self.application_id.clone().map(Value::String));
        push("output_package", self.output_package.clone().map(Value::String));
        push("build_type", self.build_type.clone().map(Value::String));
        push(
            "flavors",
            (!self.flavors.is_empty()).then(|| {
                Value::Array(self.flavors.iter().cloned().map(Value::String).collect())
            }),
        );
        push(
            "output_dir",
            self.output_dir
                .as_ref()
                .map(|dir| Value::String(dir.display().to_string())),
        );
        push("search.file_name", self.file_name.clone().map(Value::String));
        push("search.order", self.search_order.clone().map(Value::String));
        overrides
    }
}
