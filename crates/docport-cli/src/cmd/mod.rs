use std::process::ExitCode;

use anyhow::Result;

use crate::args::{Cli, Command, ImportArgs};
use crate::io::input::load_catalog;
use docport_core::catalog::VariableCatalog;

mod export;
mod import;
mod migrate;
mod validate;

pub async fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Import {
            file,
            opts,
            rollback,
            state_out,
        } => import::run(&file, &opts, rollback, state_out.as_deref()).await,
        Command::Validate { file, opts } => validate::run(&file, &opts).await,
        Command::Migrate { file, out } => migrate::run(&file, out.as_deref()).await,
        Command::Export {
            session,
            checksum,
            exported_by,
            out,
        } => export::run(&session, checksum, exported_by, out.as_deref()).await,
    }
}

async fn catalog_for(opts: &ImportArgs) -> Result<Option<VariableCatalog>> {
    match &opts.catalog {
        Some(src) => Ok(Some(load_catalog(src).await?)),
        None => Ok(None),
    }
}

fn exit_for(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
