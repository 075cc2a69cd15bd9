use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use docport_core::config::ImportOptions;
use docport_core::pipeline::import::Importer;
use docport_core::pipeline::{IssueCode, ValidationResult};

use crate::io::export::write_json;
use crate::io::input::read_document_file;
use crate::output;

pub async fn run(file: &Path, out: Option<&Path>) -> Result<ExitCode> {
    let outcome = match read_document_file(file).await {
        Ok(bytes) => Importer::new(ImportOptions::default()).migrate(bytes),
        Err(e) => Err(ValidationResult::fatal(
            IssueCode::FileReadError,
            file.display().to_string(),
            e.to_string(),
        )),
    };

    match outcome {
        Ok(doc) => {
            write_json(&doc, out).await?;
            if let Some(path) = out {
                output::eprintln_line(&format!("wrote {} (version {})", path.display(), doc.version));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(validation) => {
            output::print_validation(&validation)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
