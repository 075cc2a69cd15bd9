use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use docport_core::catalog::VariableCatalog;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("expected a .json file, got {0}")]
    NotJson(PathBuf),

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a document file as raw bytes. Parsing is left to the importer so
/// that malformed JSON surfaces as a PARSE_ERROR, not an I/O failure.
pub async fn read_document_file(path: &Path) -> Result<Vec<u8>, InputError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(InputError::NotJson(path.to_path_buf()));
    }
    tokio::fs::read(path).await.map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn read_json_file(path: &Path) -> Result<Value> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    let v: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse JSON {}", path.display()))?;
    Ok(v)
}

/// Load a variable catalog from a file path or an http(s) URL.
pub async fn load_catalog(source: &str) -> Result<VariableCatalog> {
    let v = if looks_like_url(source) {
        fetch_url_json(source).await?
    } else {
        read_json_file(Path::new(source)).await?
    };
    let catalog = VariableCatalog::from_json(v).with_context(|| format!("catalog {source}"))?;
    tracing::debug!(records = catalog.len(), "catalog loaded");
    Ok(catalog)
}

async fn fetch_url_json(url: &str) -> Result<Value> {
    let resp = reqwest::get(url)
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url}"))?;
    let v = resp
        .json::<Value>()
        .await
        .with_context(|| format!("decode JSON from {url}"))?;
    Ok(v)
}

fn looks_like_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
