use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use docport_core::pipeline::import::{ImportResult, Importer};
use docport_core::pipeline::{IssueCode, ValidationResult};
use docport_core::state::{EditorContent, EditorState};

use crate::args::ImportArgs;
use crate::io::export::write_json;
use crate::io::input::read_document_file;
use crate::io::session::Session;
use crate::output;

pub async fn run(
    file: &Path,
    args: &ImportArgs,
    rollback: bool,
    state_out: Option<&Path>,
) -> Result<ExitCode> {
    let mut opts = args.to_options()?;
    opts.rollback_on_content_error = rollback;
    let catalog = super::catalog_for(args).await?;

    let result = match read_document_file(file).await {
        Ok(bytes) => {
            let mut content = EditorContent::default();
            let mut state = EditorState::default();
            let r = Importer::new(opts).import(bytes, &mut content, &mut state, catalog.as_ref());
            if let (Some(path), Some(doc)) = (state_out, r.document().filter(|_| r.is_success())) {
                let session = Session {
                    meta: doc.meta.clone(),
                    state,
                    content: content.content().clone(),
                };
                write_json(&session, Some(path)).await?;
            }
            r
        }
        Err(e) => ImportResult::failure(
            ValidationResult::fatal(IssueCode::FileReadError, file.display().to_string(), e.to_string()),
            None,
        ),
    };

    output::print_import(&result)?;
    Ok(super::exit_for(result.is_success()))
}
