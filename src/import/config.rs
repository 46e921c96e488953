//! Import configuration.

use serde::{Deserialize, Serialize};

/// Tunable limits and defaults for CSV imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Maximum number of data rows kept from one upload.
    pub max_rows: usize,
    /// Whether invalid rows are skipped at commit instead of blocking it.
    pub skip_invalid_rows: bool,
    /// Name of the phase collecting rows without a phase name.
    pub default_phase_name: String,
    /// Name of the fallback status for unresolved status names.
    pub unspecified_status_name: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_rows: 1000,
            skip_invalid_rows: false,
            default_phase_name: "General".to_owned(),
            unspecified_status_name: "Unspecified".to_owned(),
        }
    }
}

impl ImportConfig {
    /// Creates a configuration that skips invalid rows at commit.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            skip_invalid_rows: true,
            ..Self::default()
        }
    }

    /// Overrides the row ceiling.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}
