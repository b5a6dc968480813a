//! Sample Employee Profiles
//!
//! Ten fully populated example employees used to pre-fill the form and to
//! exercise the pipeline end to end.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::value::RawAttributes;

const PRESETS_JSON: &str = include_str!("../../../data/presets.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub attributes: RawAttributes,
}

static PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| match serde_json::from_str(PRESETS_JSON) {
    Ok(presets) => presets,
    Err(e) => {
        log::error!("Embedded presets are invalid: {}", e);
        Vec::new()
    }
});

/// All bundled profiles, in display order
pub fn presets() -> &'static [Preset] {
    &PRESETS
}

/// Look a profile up by name (case-insensitive)
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name.as_str()).collect()
}
