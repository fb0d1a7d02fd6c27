//! Engine configuration.

use crate::error::ConfigError;

/// Top-level engine configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate (with the
/// `serde` feature) and handed to `pf_finder::FinderBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FinderConfig {
    /// Edge length of one grid cell in degrees.  Pick it close to the median
    /// query radius so a typical query touches a 3×3 block of cells.
    /// Default: 0.1° (≈ 11 km of latitude).
    pub cell_size_deg: f64,

    /// Largest page a caller may request; bigger requests are clamped.
    /// Default: 100.
    pub max_page_size: usize,

    /// Page size used when the caller does not ask for one.  Default: 20.
    pub default_page_size: usize,
}

impl FinderConfig {
    pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.1;

    /// Smallest accepted cell edge (≈ 11 cm of latitude).  Finer grids would
    /// push cell coordinates past `i32`.
    pub const MIN_CELL_SIZE_DEG: f64 = 1e-6;

    /// Reject values the grid or the pager cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_CELL_SIZE_DEG..=180.0).contains(&self.cell_size_deg) {
            return Err(ConfigError(format!(
                "cell_size_deg must be in [{}, 180], got {}",
                Self::MIN_CELL_SIZE_DEG,
                self.cell_size_deg
            )));
        }
        if self.max_page_size == 0 {
            return Err(ConfigError("max_page_size must be > 0".into()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError(format!(
                "default_page_size must be in [1, {}], got {}",
                self.max_page_size, self.default_page_size
            )));
        }
        Ok(())
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            cell_size_deg:     Self::DEFAULT_CELL_SIZE_DEG,
            max_page_size:     100,
            default_page_size: 20,
        }
    }
}
