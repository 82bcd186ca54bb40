//! Detection options

/// Tuning constants for structure detection
///
/// Every heuristic window and threshold lives here so a deployment can adapt
/// the detector to its own document conventions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectionOptions {
    /// Rows scanned upward when looking for a section header (default: 20)
    pub header_scan_up: u32,
    /// Columns scanned for horizontal merges on each row (default: 30)
    pub header_scan_cols: u32,
    /// Columns probed for vertical category blocks (default: 7)
    pub vertical_scan_cols: u32,
    /// Fraction of the table width a header merge must cover (default: 0.5)
    pub header_threshold_ratio: f64,
    /// Minimum width of a header merge, in columns (default: 5)
    pub header_min_width: u32,
    /// Rows probed in each direction for a data template row (default: 25)
    pub data_scan_distance: u32,
    /// Upper bound on the effective table width (default: 50)
    pub width_hard_cap: u32,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            header_scan_up: 20,
            header_scan_cols: 30,
            vertical_scan_cols: 7,
            header_threshold_ratio: 0.5,
            header_min_width: 5,
            data_scan_distance: 25,
            width_hard_cap: 50,
        }
    }
}

impl DetectionOptions {
    /// Set the header width threshold
    pub fn with_header_threshold(mut self, ratio: f64, min_width: u32) -> Self {
        self.header_threshold_ratio = ratio;
        self.header_min_width = min_width;
        self
    }

    /// Set the data row scan distance
    pub fn with_data_scan_distance(mut self, rows: u32) -> Self {
        self.data_scan_distance = rows;
        self
    }

    /// Set the effective width cap
    pub fn with_width_hard_cap(mut self, cols: u32) -> Self {
        self.width_hard_cap = cols;
        self
    }

    /// Minimum header width for a table `used_cols` wide
    ///
    /// The ratio product is truncated toward zero before comparison.
    pub fn header_width_threshold(&self, used_cols: u32) -> u32 {
        let scaled = (f64::from(used_cols) * self.header_threshold_ratio).max(0.0) as u32;
        self.header_min_width.max(scaled)
    }
}
