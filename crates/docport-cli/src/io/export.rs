use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write pretty JSON to `out`, or stdout when no path is given.
pub async fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            tokio::fs::write(path, format!("{s}\n"))
                .await
                .with_context(|| format!("write {}", path.display()))?;
        }
        None => println!("{s}"),
    }
    Ok(())
}
