//! Platform seams: clipboard, downloads and transient notifications
//!
//! The application never talks to the OS directly. Each side effect goes
//! through a narrow trait so it can be exercised without a desktop session.

pub mod clipboard;
pub mod download;
pub mod notify;

pub use clipboard::{Clipboard, MemoryClipboard, UnavailableClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use download::{DirectorySink, DownloadSink, MemorySink};
pub use notify::{Notifier, Toast, ToastKind};

/// The side-effect surfaces used by the dispatcher
pub struct Platform {
    pub clipboard: Box<dyn Clipboard + Send>,
    pub downloads: Box<dyn DownloadSink + Send>,
    pub notifier: Notifier,
}

impl Platform {
    pub fn new(
        clipboard: Box<dyn Clipboard + Send>,
        downloads: Box<dyn DownloadSink + Send>,
        notifier: Notifier,
    ) -> Self {
        Self {
            clipboard,
            downloads,
            notifier,
        }
    }

    /// In-memory clipboard and downloads; useful for tests and dry runs.
    pub fn in_memory(notifier: Notifier) -> Self {
        Self::new(
            Box::new(MemoryClipboard::new()),
            Box::new(MemorySink::new()),
            notifier,
        )
    }
}
