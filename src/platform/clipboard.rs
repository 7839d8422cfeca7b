//! Clipboard access

use crate::{Error, Result};
use std::sync::{Arc, Mutex};

pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Records writes; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|g| g.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut g = self
            .contents
            .lock()
            .map_err(|_| Error::ClipboardDenied("clipboard lock poisoned".into()))?;
        *g = Some(text.to_string());
        Ok(())
    }
}

/// Always refuses, as a platform without clipboard access would
#[derive(Debug, Clone, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn write_text(&mut self, _text: &str) -> Result<()> {
        Err(Error::ClipboardDenied("no clipboard available".into()))
    }
}

/// The desktop clipboard via `arboard`
///
/// On X11/Wayland the selection is served by the owning process. A
/// short-lived process should call [`SystemClipboard::hold_until_replaced`]
/// so the text survives after it exits.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
    hold: bool,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| Error::ClipboardDenied(e.to_string()))?;
        Ok(Self { inner, hold: false })
    }

    /// Block in `write_text` until another application takes the clipboard
    /// over. Only has an effect on Linux and the BSDs.
    pub fn hold_until_replaced(mut self, hold: bool) -> Self {
        self.hold = hold;
        self
    }

    #[cfg(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))))]
    fn set(&mut self, text: &str) -> std::result::Result<(), arboard::Error> {
        use arboard::SetExtLinux;
        if self.hold {
            log::info!("serving clipboard until another application replaces it");
            self.inner.set().wait().text(text.to_string())
        } else {
            self.inner.set_text(text.to_string())
        }
    }

    #[cfg(not(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten")))))]
    fn set(&mut self, text: &str) -> std::result::Result<(), arboard::Error> {
        self.inner.set_text(text.to_string())
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.set(text).map_err(|e| Error::ClipboardDenied(e.to_string()))
    }
}
