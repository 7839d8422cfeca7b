//! Rendering: scratch blobs, SVG decoding and PNG rasterization

pub mod blob;
pub mod export;
pub mod raster;

pub use blob::{BlobStore, BlobUrl};
pub use export::{ExportReport, ExportStage, RasterExporter};
pub use raster::{rasterize_svg, DecodedSvg, IntrinsicSize, RasterOptions};

use base64::Engine as _;

/// File name used when a raster is offered for download
pub const DOWNLOAD_FILENAME: &str = "badge.png";

/// A rasterized badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBlob {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl RasterBlob {
    pub fn is_empty(&self) -> bool {
        self.png_data.is_empty()
    }

    /// `data:image/png;base64,...`, suitable for embedding.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }
}
