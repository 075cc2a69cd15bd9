use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use docport_core::config::{validate_config, ImportOptions};

#[derive(Parser, Debug, Clone)]
#[command(name = "docport", version, about = "Portable contract-document tool")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import a document into fresh editor stores and report the result.
    Import {
        /// Document file (.json).
        file: PathBuf,

        #[command(flatten)]
        opts: ImportArgs,

        /// Undo the state restore if the content cannot be loaded.
        #[arg(long)]
        rollback: bool,

        /// Write the restored editor session (content, meta, state) here.
        #[arg(long)]
        state_out: Option<PathBuf>,
    },

    /// Run schema, version and semantic checks without importing.
    Validate {
        /// Document file (.json).
        file: PathBuf,

        #[command(flatten)]
        opts: ImportArgs,
    },

    /// Migrate a document to the current format version.
    Migrate {
        /// Document file (.json).
        file: PathBuf,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export an editor session file as a portable document.
    Export {
        /// Session file written by `import --state-out`.
        session: PathBuf,

        /// Attach an integrity checksum.
        #[arg(long)]
        checksum: bool,

        /// Recorded as exportInfo.exportedBy.
        #[arg(long)]
        exported_by: Option<String>,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// Variable catalog: a .json file path or an http(s) URL.
    #[arg(long)]
    pub catalog: Option<String>,

    /// Migrate older documents instead of rejecting them.
    #[arg(long)]
    pub auto_migrate: bool,

    /// Skip cross-reference and image checks.
    #[arg(long)]
    pub skip_semantics: bool,

    /// Decoded byte ceiling for inline images.
    #[arg(long)]
    pub max_image_size: Option<u64>,

    /// Recompute exportInfo.checksum and warn on mismatch.
    #[arg(long)]
    pub verify_checksum: bool,
}

impl ImportArgs {
    pub fn to_options(&self) -> anyhow::Result<ImportOptions> {
        let mut opts = ImportOptions::default()
            .with_auto_migrate(self.auto_migrate)
            .with_semantics(!self.skip_semantics);
        if let Some(max) = self.max_image_size {
            opts = opts.with_max_image_size(max);
        }
        opts.verify_checksum = self.verify_checksum;
        validate_config(&opts)?;
        Ok(opts)
    }
}
