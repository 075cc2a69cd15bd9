//! Page layout data.

use serde::{Deserialize, Serialize};

/// Page layout as persisted in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub format_id: String,
    pub width: f64,
    pub height: f64,
    pub margins: Margins,

    /// Introduced in 1.0.1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_page_numbers: Option<bool>,

    /// Introduced in 1.0.1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_gap: Option<f64>,
}

pub const DEFAULT_SHOW_PAGE_NUMBERS: bool = true;
pub const DEFAULT_PAGE_GAP: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            bottom: v,
            left: v,
            right: v,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 96.0,
            bottom: 96.0,
            left: 72.0,
            right: 72.0,
        }
    }
}

/// A page format as held by the page layout store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFormat {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl PageFormat {
    pub const CUSTOM_ID: &'static str = "CUSTOM";

    /// A synthetic format built from raw dimensions.
    pub fn custom(width: f64, height: f64, margins: Margins) -> Self {
        Self {
            id: Self::CUSTOM_ID.to_string(),
            name: "Custom".to_string(),
            width,
            height,
            margins,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.id == Self::CUSTOM_ID
    }
}

/// A named format entry: (id, display name, width, height), in px at 96 dpi.
pub type KnownFormat = (&'static str, &'static str, f64, f64);

pub const KNOWN_PAGE_FORMATS: &[KnownFormat] = &[
    ("A4", "A4", 794.0, 1123.0),
    ("LETTER", "Letter", 816.0, 1056.0),
    ("LEGAL", "Legal", 816.0, 1344.0),
];

/// Look up a named format by id.
pub fn find_page_format(id: &str) -> Option<&'static KnownFormat> {
    KNOWN_PAGE_FORMATS.iter().find(|(fid, ..)| *fid == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_lookup() {
        let (_, name, w, h) = find_page_format("LETTER").unwrap();
        assert_eq!(*name, "Letter");
        assert_eq!((*w, *h), (816.0, 1056.0));
        assert!(find_page_format("A5").is_none());
    }

    #[test]
    fn custom_format_flags_itself() {
        let f = PageFormat::custom(500.0, 700.0, Margins::uniform(10.0));
        assert!(f.is_custom());
        assert_eq!(f.margins.left, 10.0);
    }
}
