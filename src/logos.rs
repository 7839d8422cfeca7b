//! Logo presets that can be embedded into a badge.
//!
//! The registry is built once at startup from the bundled SVG assets and,
//! optionally, from SVG files supplied by the user. After that it is only
//! read: `resolve` maps an id to the inline SVG text, and `data_uri`
//! produces the `data:` URI the badge provider expects in its `logo`
//! query parameter.

use crate::{Error, Result};
use base64::Engine as _;
use std::path::Path;

const FLAG_SVG: &str = include_str!("../assets/logos/flag.svg");
const WATERMELON_SVG: &str = include_str!("../assets/logos/watermelon.svg");
const OLIVE_SVG: &str = include_str!("../assets/logos/olive.svg");

/// A named inline SVG that can be attached to a badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoPreset {
    /// Unique identifier, stored in the badge spec and history
    pub id: String,
    /// Human readable name shown in listings
    pub display_name: String,
    /// Inline SVG markup
    pub vector_source: String,
}

impl LogoPreset {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, vector_source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            vector_source: vector_source.into(),
        }
    }

    /// Read a preset from an SVG file; the id is the file stem.
    pub fn from_svg_file(path: &Path) -> Result<Self> {
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::ConfigError(format!("Logo file has no usable name: {}", path.display())))?
            .to_string();
        let vector_source = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read logo {}: {}", path.display(), e)))?;
        if !vector_source.contains("<svg") {
            return Err(Error::ConfigError(format!("{} does not look like an SVG document", path.display())));
        }
        Ok(Self::new(id.clone(), id, vector_source))
    }

    pub fn data_uri(&self) -> String {
        svg_data_uri(&self.vector_source)
    }
}

/// Encode SVG markup as a base64 `data:image/svg+xml` URI.
pub fn svg_data_uri(svg: &str) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
    format!("data:image/svg+xml;base64,{}", b64)
}

/// Read-only id -> SVG lookup table
#[derive(Debug, Clone, Default)]
pub struct LogoRegistry {
    presets: Vec<LogoPreset>,
}

impl LogoRegistry {
    /// An empty registry; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The presets shipped with the crate.
    pub fn bundled() -> Self {
        Self {
            presets: vec![
                LogoPreset::new("flag", "Flag", FLAG_SVG),
                LogoPreset::new("watermelon", "Watermelon", WATERMELON_SVG),
                LogoPreset::new("olive", "Olive branch", OLIVE_SVG),
            ],
        }
    }

    /// Add a preset while the registry is being assembled. Ids must be unique.
    pub fn with_preset(mut self, preset: LogoPreset) -> Result<Self> {
        if self.presets.iter().any(|p| p.id == preset.id) {
            return Err(Error::ConfigError(format!("Duplicate logo id: {}", preset.id)));
        }
        self.presets.push(preset);
        Ok(self)
    }

    pub fn presets(&self) -> &[LogoPreset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&LogoPreset> {
        if id.is_empty() {
            return None;
        }
        self.presets.iter().find(|p| p.id == id)
    }

    /// SVG source for `id`, or `None` when the id is empty or unknown.
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.get(id).map(|p| p.vector_source.as_str())
    }

    pub fn data_uri(&self, id: &str) -> Option<String> {
        self.get(id).map(LogoPreset::data_uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_ids_are_unique() {
        let reg = LogoRegistry::bundled();
        let mut ids: Vec<_> = reg.presets().iter().map(|p| p.id.as_str()).collect();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
        assert!(n >= 3);
    }

    #[test]
    fn resolve_misses_on_empty_and_unknown() {
        let reg = LogoRegistry::bundled();
        assert!(reg.resolve("").is_none());
        assert!(reg.resolve("nope").is_none());
        assert!(reg.resolve("flag").unwrap().contains("<svg"));
    }

    #[test]
    fn data_uri_is_base64_svg() {
        assert_eq!(svg_data_uri("<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let res = LogoRegistry::bundled().with_preset(LogoPreset::new("flag", "Again", "<svg/>"));
        assert!(matches!(res, Err(Error::ConfigError(_))));
    }

    #[test]
    fn preset_from_file_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.svg");
        std::fs::write(&path, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
        let p = LogoPreset::from_svg_file(&path).unwrap();
        assert_eq!(p.id, "mine");

        let bad = dir.path().join("notes.svg");
        std::fs::write(&bad, "hello").unwrap();
        assert!(LogoPreset::from_svg_file(&bad).is_err());
    }
}
