//! Upload progress tracking

/// Converts transferred byte counts into a 0 to 100 percentage
///
/// Reports only when the rounded percentage changes, so callers see a
/// non-decreasing sequence that ends at exactly 100 once every byte is
/// sent. With an unknown (or zero) total nothing is ever reported.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    total: Option<u64>,
    loaded: u64,
    last_reported: Option<u8>,
}

impl UploadProgress {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            loaded: 0,
            last_reported: None,
        }
    }

    /// Bytes transferred so far
    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Current percentage, rounded half up
    pub fn percent(&self) -> Option<u8> {
        let total = self.total? as u128;
        let loaded = self.loaded.min(self.total?) as u128;
        Some(((loaded * 200 + total) / (total * 2)) as u8)
    }

    /// Record `bytes` more transferred; returns the new percentage if it moved
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.loaded = self.loaded.saturating_add(bytes);
        let percent = self.percent()?;
        if self.last_reported == Some(percent) {
            return None;
        }
        self.last_reported = Some(percent);
        Some(percent)
    }
}
