use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use docport_core::pipeline::import::ImportResult;
use docport_core::pipeline::{ValidationIssue, ValidationResult};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Logs go to stderr. Filter with `DOCPORT_LOG` (default `warn`).
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("DOCPORT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

pub fn eprintln_line(msg: &str) {
    let _ = writeln!(io::stderr(), "{msg}");
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}

pub fn print_validation(v: &ValidationResult) -> anyhow::Result<()> {
    if is_json() {
        return print(v);
    }
    let mut out = stdout();
    if v.valid {
        status_line(&mut out, Color::Green, "valid", "")?;
    } else {
        status_line(&mut out, Color::Red, "invalid", "")?;
    }
    write_issues(&mut out, v)?;
    Ok(())
}

pub fn print_import(r: &ImportResult) -> anyhow::Result<()> {
    if is_json() {
        return print(r);
    }
    let mut out = stdout();
    match r.document() {
        Some(doc) if r.is_success() => {
            let detail = format!("{} (version {})", doc.meta.title, doc.version);
            status_line(&mut out, Color::Green, "imported", &detail)?;
        }
        _ => status_line(&mut out, Color::Red, "import failed", "")?,
    }
    write_issues(&mut out, r.validation())?;
    if let Some(orphaned) = r.orphaned_variables() {
        if !orphaned.is_empty() {
            writeln!(out, "orphaned variables: {}", orphaned.join(", "))?;
        }
    }
    Ok(())
}

fn status_line(out: &mut StandardStream, color: Color, label: &str, detail: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label}")?;
    out.reset()?;
    if detail.is_empty() {
        writeln!(out)
    } else {
        writeln!(out, ": {detail}")
    }
}

fn write_issues(out: &mut StandardStream, v: &ValidationResult) -> io::Result<()> {
    for e in &v.errors {
        write_issue(out, Color::Red, "error", e)?;
    }
    for w in &v.warnings {
        write_issue(out, Color::Yellow, "warning", w)?;
    }
    Ok(())
}

fn write_issue(out: &mut StandardStream, color: Color, level: &str, issue: &ValidationIssue) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(out, "{level}[{}]", issue.code)?;
    out.reset()?;
    if issue.path.is_empty() {
        writeln!(out, " {}", issue.message)?;
    } else {
        writeln!(out, " {}: {}", issue.path, issue.message)?;
    }
    if let Some(s) = &issue.suggestion {
        writeln!(out, "  hint: {s}")?;
    }
    Ok(())
}
