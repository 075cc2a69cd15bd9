use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use docport_core::pipeline::import::Importer;
use docport_core::pipeline::{IssueCode, ValidationResult};

use crate::args::ImportArgs;
use crate::io::input::read_document_file;
use crate::output;

pub async fn run(file: &Path, args: &ImportArgs) -> Result<ExitCode> {
    let opts = args.to_options()?;
    let catalog = super::catalog_for(args).await?;

    let validation = match read_document_file(file).await {
        Ok(bytes) => Importer::new(opts).validate(bytes, catalog.as_ref()),
        Err(e) => ValidationResult::fatal(
            IssueCode::FileReadError,
            file.display().to_string(),
            e.to_string(),
        ),
    };

    output::print_validation(&validation)?;
    Ok(super::exit_for(validation.valid))
}
