//! # Validate Subcommand
//!
//! Validates a data-set file against a schema file and prints the report.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;

use covenant_core::Contract;
use covenant_validate::{DataSet, SetValidator, ValidatorConfig};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the schema file: a JSON array of contract AST nodes.
    #[arg(long)]
    pub schema: PathBuf,

    /// Path to the data-set file: a JSON object mapping contract names
    /// to record arrays.
    #[arg(long)]
    pub data: PathBuf,

    /// Tolerate record and object fields the schema does not declare.
    #[arg(long)]
    pub lax: bool,

    /// Name of the record identifier field.
    #[arg(long, default_value = "id")]
    pub identifier_field: String,
}

/// Run the validate subcommand.
pub fn run(args: &ValidateArgs) -> anyhow::Result<()> {
    let schema: Vec<Contract> = load_json(&args.schema)
        .with_context(|| format!("cannot load schema from {}", args.schema.display()))?;
    let data: DataSet = load_json(&args.data)
        .with_context(|| format!("cannot load data set from {}", args.data.display()))?;

    let config = ValidatorConfig {
        strict: !args.lax,
        identifier_field: args.identifier_field.clone(),
    };

    tracing::debug!(
        contracts = schema.len(),
        data_contracts = data.len(),
        "starting validation"
    );

    match SetValidator::new(&schema, config).validate(&data) {
        Ok(()) => {
            let records: usize = data.values().map(Vec::len).sum();
            println!(
                "ok: {records} records across {} contracts validated",
                data.len()
            );
            Ok(())
        }
        Err(report) => {
            eprintln!("{report}");
            bail!("validation failed with {} violations", report.total_violations());
        }
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
