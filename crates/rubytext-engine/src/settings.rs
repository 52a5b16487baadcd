use serde::{Deserialize, Serialize};

use crate::notation::NotationStyle;

/// Engine settings, as consumed from the host's settings storage.
///
/// Behavior changes immediately on any field change: compiled notation
/// patterns are invalidated when `notation_style` changes, so holders of a
/// `Patterns` value recompile instead of caching across changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which bracket pair denotes manual overrides.
    pub notation_style: NotationStyle,
    /// Annotate read-only (static) renders.
    pub reading_mode: bool,
    /// Annotate the live editing surface.
    pub editing_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notation_style: NotationStyle::Curly,
            reading_mode: true,
            editing_mode: true,
        }
    }
}
