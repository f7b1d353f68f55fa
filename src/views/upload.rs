//! Upload control

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Upload flag and progress, shared with the transport's progress callback
#[derive(Debug, Clone, Default)]
pub struct UploadView {
    uploading: Arc<AtomicBool>,
    progress: Arc<AtomicU8>,
}

impl UploadView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Last reported percentage, 0 to 100
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    /// Start an upload; false if one is already running
    pub fn begin(&self) -> bool {
        if self.uploading.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.progress.store(0, Ordering::Release);
        true
    }

    /// Callback to hand to the upload service
    pub fn progress_sink(&self) -> impl FnMut(u8) + Send + Sync + 'static {
        let progress = Arc::clone(&self.progress);
        move |percent| progress.store(percent.min(100), Ordering::Release)
    }

    /// Upload finished, successfully or not
    pub fn finish(&self) {
        self.uploading.store(false, Ordering::Release);
        self.progress.store(0, Ordering::Release);
    }

    pub fn show_progress_bar(&self) -> bool {
        self.is_uploading() && self.progress() > 0
    }

    pub fn button_label(&self) -> String {
        if self.is_uploading() {
            format!("Uploading... ({}%)", self.progress())
        } else {
            "Upload PDF".to_string()
        }
    }
}
