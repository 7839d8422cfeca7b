//! SVG -> PNG rasterization with resvg

use crate::rendering::RasterBlob;
use crate::{CanvasSize, Error, Result};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, roxmltree};
use std::ops::Range;
use std::sync::{Arc, OnceLock};

/// Options for a single rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Multiplier applied to the natural size
    pub scale: f32,
    /// Used per axis when the natural size is unavailable
    pub fallback: CanvasSize,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            fallback: CanvasSize::FALLBACK,
        }
    }
}

/// Width and height declared on the root `<svg>` element, in pixels.
///
/// `None` marks an axis as unavailable: absent, zero, relative (`%`, `em`)
/// or unparsable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntrinsicSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl IntrinsicSize {
    pub fn is_complete(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// A parsed SVG together with the size it declares
#[derive(Debug)]
pub struct DecodedSvg {
    pub tree: usvg::Tree,
    pub intrinsic: IntrinsicSize,
}

fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Parse a length attribute into pixels (96 dpi).
fn parse_length(value: &str) -> Option<f32> {
    const UNITS: [(&str, f32); 6] = [
        ("px", 1.0),
        ("pt", 4.0 / 3.0),
        ("pc", 16.0),
        ("mm", 96.0 / 25.4),
        ("cm", 96.0 / 2.54),
        ("in", 96.0),
    ];

    let value = value.trim();
    let (number, factor) = UNITS
        .iter()
        .find_map(|(unit, f)| value.strip_suffix(unit).map(|n| (n, *f)))
        .unwrap_or((value, 1.0));
    let px = number.trim_end().parse::<f32>().ok()? * factor;
    (px.is_finite() && px > 0.0).then_some(px)
}

fn parse_document(text: &str) -> Result<roxmltree::Document<'_>> {
    let xml_opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, xml_opts)
        .map_err(|e| Error::DecodeFailed(e.to_string()))?;
    if doc.root_element().tag_name().name() != "svg" {
        return Err(Error::DecodeFailed(format!(
            "root element is <{}>, not <svg>",
            doc.root_element().tag_name().name()
        )));
    }
    Ok(doc)
}

/// Parse SVG bytes and read their intrinsic size.
///
/// When an axis is unavailable the root `width`/`height` attributes are
/// dropped before the tree is built, so zero or relative sizes still
/// decode. The tree is then sized by its `viewBox`, or by its content when
/// there is none.
pub fn decode_svg(data: &[u8], opts: &RasterOptions) -> Result<DecodedSvg> {
    let text = std::str::from_utf8(data).map_err(|e| Error::DecodeFailed(e.to_string()))?;
    let doc = parse_document(text)?;
    let root = doc.root_element();
    let intrinsic = IntrinsicSize {
        width: root.attribute("width").and_then(parse_length),
        height: root.attribute("height").and_then(parse_length),
    };

    let mut usvg_opts = usvg::Options::default();
    usvg_opts.fontdb = font_database();
    if let Some(size) = usvg::Size::from_wh(opts.fallback.width as f32, opts.fallback.height as f32) {
        usvg_opts.default_size = size;
    }

    let parsed = if intrinsic.is_complete() {
        usvg::Tree::from_xmltree(&doc, &usvg_opts)
    } else {
        let mut sized: Vec<Range<usize>> = root
            .attributes()
            .filter(|a| a.namespace().is_none() && matches!(a.name(), "width" | "height"))
            .map(|a| a.range())
            .collect();
        sized.sort_by_key(|r| std::cmp::Reverse(r.start));

        let mut stripped = text.to_string();
        for range in sized {
            stripped.replace_range(range, "");
        }
        log::debug!("svg has no usable intrinsic size ({:?})", intrinsic);
        usvg::Tree::from_str(&stripped, &usvg_opts)
    };
    let tree = parsed.map_err(|e| Error::DecodeFailed(e.to_string()))?;

    Ok(DecodedSvg { tree, intrinsic })
}

/// Output size for an intrinsic size, falling back per axis when it is
/// unavailable or rounds to zero.
pub fn target_size(intrinsic: IntrinsicSize, opts: &RasterOptions) -> CanvasSize {
    fn axis(natural: Option<f32>, scale: f32, fallback: u32) -> u32 {
        match natural.map(|n| (n * scale).round()) {
            Some(v) if v.is_finite() && v >= 1.0 => v as u32,
            _ => fallback,
        }
    }
    CanvasSize {
        width: axis(intrinsic.width, opts.scale, opts.fallback.width),
        height: axis(intrinsic.height, opts.scale, opts.fallback.height),
    }
}

/// Draw a decoded SVG onto a fresh pixmap and encode it.
///
/// The tree's view size is stretched to fill the target canvas.
pub fn rasterize(svg: &DecodedSvg, opts: &RasterOptions) -> Result<RasterBlob> {
    let size = target_size(svg.intrinsic, opts);
    let view = svg.tree.size();

    let mut pixmap = Pixmap::new(size.width, size.height).ok_or_else(|| {
        Error::EncodeFailed(format!("cannot allocate {}x{} canvas", size.width, size.height))
    })?;
    let transform = Transform::from_scale(
        size.width as f32 / view.width(),
        size.height as f32 / view.height(),
    );
    resvg::render(&svg.tree, transform, &mut pixmap.as_mut());

    let png_data = pixmap
        .encode_png()
        .map_err(|e| Error::EncodeFailed(e.to_string()))?;
    Ok(RasterBlob {
        width: size.width,
        height: size.height,
        png_data,
    })
}

/// Decode and rasterize in one go.
pub fn rasterize_svg(data: &[u8], opts: &RasterOptions) -> Result<RasterBlob> {
    let svg = decode_svg(data, opts)?;
    rasterize(&svg, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="90" height="20"><rect width="90" height="20" fill="#4c1"/></svg>"##;
    const UNSIZED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect x="0" y="0" width="10" height="10" fill="#e05d44"/></svg>"##;
    const ZERO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0"><rect width="10" height="10" fill="#e05d44"/></svg>"##;

    #[test]
    fn natural_size_is_kept() {
        let b = rasterize_svg(SIZED.as_bytes(), &RasterOptions::default()).unwrap();
        assert_eq!((b.width, b.height), (90, 20));
        assert_eq!(&b.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn missing_size_uses_fallback() {
        let b = rasterize_svg(UNSIZED.as_bytes(), &RasterOptions::default()).unwrap();
        assert_eq!((b.width, b.height), (300, 80));
    }

    #[test]
    fn zero_size_uses_fallback() {
        let b = rasterize_svg(ZERO.as_bytes(), &RasterOptions::default()).unwrap();
        assert_eq!((b.width, b.height), (300, 80));
        assert!(!b.is_empty());
    }

    #[test]
    fn zero_width_with_viewbox_falls_back_on_that_axis() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="20" viewBox="0 0 90 20"><rect width="90" height="20" fill="#4c1"/></svg>"##;
        let b = rasterize_svg(svg.as_bytes(), &RasterOptions::default()).unwrap();
        assert_eq!((b.width, b.height), (300, 20));
    }

    #[test]
    fn relative_size_is_unavailable() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="2em" viewBox="0 0 90 20"/>"##;
        let decoded = decode_svg(svg.as_bytes(), &RasterOptions::default()).unwrap();
        assert_eq!(decoded.intrinsic, IntrinsicSize::default());
    }

    #[test]
    fn scale_multiplies() {
        let opts = RasterOptions { scale: 2.0, ..Default::default() };
        let b = rasterize_svg(SIZED.as_bytes(), &opts).unwrap();
        assert_eq!((b.width, b.height), (180, 40));
    }

    #[test]
    fn zero_axis_falls_back_independently() {
        let opts = RasterOptions::default();
        let s = target_size(IntrinsicSize { width: None, height: Some(20.0) }, &opts);
        assert_eq!(s, CanvasSize { width: 300, height: 20 });
        let s = target_size(IntrinsicSize { width: Some(42.4), height: Some(0.2) }, &opts);
        assert_eq!(s, CanvasSize { width: 42, height: 80 });
    }

    #[test]
    fn lengths_convert_to_pixels() {
        assert_eq!(parse_length("90"), Some(90.0));
        assert_eq!(parse_length(" 20px "), Some(20.0));
        assert_eq!(parse_length("1in"), Some(96.0));
        assert_eq!(parse_length("0"), None);
        assert_eq!(parse_length("50%"), None);
        assert_eq!(parse_length("auto"), None);
    }

    #[test]
    fn garbage_is_decode_failure() {
        let err = rasterize_svg(b"this is not svg", &RasterOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DecodeFailed(_)));
        let err = rasterize_svg(b"<html><body/></html>", &RasterOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DecodeFailed(_)));
    }
}
