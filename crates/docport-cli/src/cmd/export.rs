use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use docport_core::config::ExportOptions;
use docport_core::pipeline::export::export_document;

use crate::io::export::write_json;
use crate::io::input::read_json_file;
use crate::io::session::Session;
use crate::output;

pub async fn run(
    session: &Path,
    checksum: bool,
    exported_by: Option<String>,
    out: Option<&Path>,
) -> Result<ExitCode> {
    let v = read_json_file(session).await?;
    let session: Session =
        serde_json::from_value(v).with_context(|| format!("decode session {}", session.display()))?;

    let opts = ExportOptions {
        include_checksum: checksum,
        exported_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
        exported_by,
        source_app: format!("docport-cli/{}", env!("CARGO_PKG_VERSION")),
    };

    let doc = export_document(&session.content, &session.state, session.meta, &opts)?;
    write_json(&doc, out).await?;
    if let Some(path) = out {
        output::eprintln_line(&format!("exported {}", path.display()));
    }
    Ok(ExitCode::SUCCESS)
}
