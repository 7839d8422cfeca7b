//! Badgesmith
//!
//! Compose shields-style badge URLs from a label, message, color and optional
//! logo, copy them as URL/Markdown/HTML snippets, export them to PNG and keep
//! a bounded history of the badges you built.
//!
//! # Features
//!
//! - **Locator builder**: pure, deterministic URL construction ([`badge`])
//! - **Raster export**: fetch the provider's SVG and rasterize it to PNG ([`rendering`])
//! - **Persistent state**: form fields, theme, locale and history survive between runs ([`app`], [`storage`])
//! - **Platform seams**: clipboard, downloads and toasts behind small traits ([`platform`])
//!
//! # Example
//!
//! ```
//! use badgesmith::badge::{build, BadgeSpec, Snippet};
//! use badgesmith::logos::LogoRegistry;
//!
//! let spec = BadgeSpec::new("build", "passing", "#4c1");
//! let locator = build(&spec, &LogoRegistry::bundled());
//! assert_eq!(locator.as_str(), "https://img.shields.io/badge/build-passing-4c1.svg");
//! assert!(locator.snippet(Snippet::Markdown).starts_with("![Badge]("));
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod app;
pub mod badge;
pub mod history;
pub mod i18n;
pub mod logos;
pub mod platform;
pub mod rendering;
pub mod storage;

pub use app::{Action, AppState, Dispatcher, Effect, Session, Theme};
pub use badge::{build, BadgeSpec, Locator, LocatorBuilder, Snippet};
pub use history::{History, HistoryEntry};
pub use logos::{LogoPreset, LogoRegistry};
pub use rendering::{RasterBlob, RasterExporter};

use std::time::Duration;

/// Configuration for building and exporting badges
///
/// The defaults talk to the public shields.io endpoint:
/// - exports keep the badge's natural size (`scale` 1.0)
/// - sources without an intrinsic size are drawn on a 300x80 canvas
/// - history keeps the 50 most recent entries
///
/// # Examples
///
/// ```
/// let cfg = badgesmith::BadgeConfig::default();
/// assert!(cfg.provider_root.starts_with("https://"));
/// assert_eq!(cfg.history_limit, 50);
/// ```
#[derive(Debug, Clone)]
pub struct BadgeConfig {
    /// Base URL the badge path is appended to
    pub provider_root: String,
    /// User agent sent when fetching badges
    pub user_agent: String,
    /// Timeout for badge fetches in milliseconds
    pub timeout_ms: u64,
    /// Scale applied to the natural size on export
    pub scale: f32,
    /// Canvas size used when a badge has no intrinsic size.
    /// The 300x80 default is an arbitrary constant, not a derived value.
    pub fallback_size: CanvasSize,
    /// Maximum number of history entries
    pub history_limit: usize,
    /// How long a toast stays visible, in milliseconds
    pub toast_ms: u64,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            provider_root: badge::DEFAULT_PROVIDER_ROOT.to_string(),
            user_agent: format!("badgesmith/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30000,
            scale: 1.0,
            fallback_size: CanvasSize::FALLBACK,
            history_limit: history::HISTORY_LIMIT,
            toast_ms: 3000,
        }
    }
}

impl BadgeConfig {
    /// Check values that would make exports or history meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.provider_root.starts_with("http://") || self.provider_root.starts_with("https://")) {
            return Err(Error::ConfigError(format!(
                "provider root must be an http(s) URL: {}",
                self.provider_root
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::ConfigError(format!("scale must be positive: {}", self.scale)));
        }
        if self.fallback_size.width == 0 || self.fallback_size.height == 0 {
            return Err(Error::ConfigError("fallback size must be non-zero".into()));
        }
        if self.history_limit == 0 {
            return Err(Error::ConfigError("history limit must be at least 1".into()));
        }
        Ok(())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }
}

/// Pixel dimensions of a raster canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// 300x80, used when the source has no intrinsic size
    pub const FALLBACK: CanvasSize = CanvasSize {
        width: 300,
        height: 80,
    };
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BadgeConfig::default();
        assert_eq!(config.fallback_size, CanvasSize { width: 300, height: 80 });
        assert_eq!(config.scale, 1.0);
        assert!(config.user_agent.starts_with("badgesmith/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_root = BadgeConfig { provider_root: "ftp://x".into(), ..Default::default() };
        assert!(matches!(bad_root.validate(), Err(Error::ConfigError(_))));

        let bad_scale = BadgeConfig { scale: 0.0, ..Default::default() };
        assert!(bad_scale.validate().is_err());

        let bad_limit = BadgeConfig { history_limit: 0, ..Default::default() };
        assert!(bad_limit.validate().is_err());
    }
}
