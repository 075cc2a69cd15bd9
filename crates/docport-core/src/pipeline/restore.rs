//! Restoring a validated document into the state stores.
//!
//! Each restore replaces its slice entirely. The three calls are independent;
//! the importer runs them in page / roles / workflow order.

use tracing::debug;

use crate::model::page::{find_page_format, DEFAULT_PAGE_GAP, DEFAULT_SHOW_PAGE_NUMBERS};
use crate::model::{PageConfig, PageFormat, PortableDocument, SignerRoleDefinition, SigningWorkflowConfig};
use crate::state::{PageLayoutState, StateSink};

/// Resolve the stored page config to a page format.
///
/// A known `formatId` whose stored width and height match the table exactly
/// restores the named format with the document's margins. Anything else
/// becomes a custom format built from the raw dimensions.
pub fn resolve_page_format(cfg: &PageConfig) -> PageFormat {
    match find_page_format(&cfg.format_id) {
        Some((id, name, w, h)) if *w == cfg.width && *h == cfg.height => PageFormat {
            id: id.to_string(),
            name: name.to_string(),
            width: *w,
            height: *h,
            margins: cfg.margins,
        },
        _ => PageFormat::custom(cfg.width, cfg.height, cfg.margins),
    }
}

/// The page layout slice for a stored page config.
pub fn page_layout_from_config(cfg: &PageConfig) -> PageLayoutState {
    PageLayoutState {
        format: resolve_page_format(cfg),
        show_page_numbers: cfg.show_page_numbers.unwrap_or(DEFAULT_SHOW_PAGE_NUMBERS),
        page_gap: cfg.page_gap.unwrap_or(DEFAULT_PAGE_GAP),
    }
}

pub fn restore_page_config<S: StateSink + ?Sized>(sink: &mut S, cfg: &PageConfig) {
    let layout = page_layout_from_config(cfg);
    debug!(format = %layout.format.id, "restoring page config");
    sink.restore_page_config(layout);
}

pub fn restore_signer_roles<S: StateSink + ?Sized>(sink: &mut S, roles: &[SignerRoleDefinition]) {
    debug!(roles = roles.len(), "restoring signer roles");
    sink.restore_signer_roles(roles.to_vec());
}

pub fn restore_workflow_config<S: StateSink + ?Sized>(sink: &mut S, config: &SigningWorkflowConfig) {
    debug!(order_mode = ?config.order_mode, "restoring workflow config");
    sink.restore_workflow_config(config.clone());
}

/// Restore all three slices from a document.
pub fn restore_state<S: StateSink + ?Sized>(sink: &mut S, doc: &PortableDocument) {
    restore_page_config(sink, &doc.page_config);
    restore_signer_roles(sink, &doc.signer_roles);
    restore_workflow_config(sink, &doc.workflow_or_default());
}
