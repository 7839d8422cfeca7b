//! Fetch a badge and turn it into a PNG.
//!
//! One export is a linear pipeline:
//!
//! ```text
//! Idle -> Fetching -> Decoding -> Drawing -> Encoded
//!            \___________\___________\______> Failed(reason)
//! ```
//!
//! There is no retry and no partial result. Each call is independent; two
//! overlapping exports of the same locator both run to completion.

use crate::badge::Locator;
use crate::rendering::blob::{BlobStore, SVG_CONTENT_TYPE};
use crate::rendering::raster::{decode_svg, rasterize, RasterOptions};
use crate::rendering::RasterBlob;
use crate::{BadgeConfig, Error, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Pipeline position of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Fetching,
    Decoding,
    Drawing,
    Encoded,
    Failed(String),
}

/// The stages an export went through together with its outcome
#[derive(Debug)]
pub struct ExportReport {
    pub stages: Vec<ExportStage>,
    pub outcome: Result<RasterBlob>,
}

#[derive(Debug, Default)]
struct StageLog {
    stages: Vec<ExportStage>,
}

impl StageLog {
    fn enter(&mut self, stage: ExportStage) {
        log::debug!("export stage: {:?}", stage);
        self.stages.push(stage);
    }

    fn finish(mut self, outcome: Result<RasterBlob>) -> ExportReport {
        match &outcome {
            Ok(_) => self.enter(ExportStage::Encoded),
            Err(e) => self.enter(ExportStage::Failed(e.to_string())),
        }
        ExportReport {
            stages: self.stages,
            outcome,
        }
    }
}

/// Exports badges through the provider over HTTP
#[derive(Debug, Clone)]
pub struct RasterExporter {
    client: Client,
    blobs: Arc<BlobStore>,
    options: RasterOptions,
}

impl RasterExporter {
    pub fn new(config: &BadgeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            blobs: Arc::new(BlobStore::new()?),
            options: RasterOptions {
                scale: config.scale,
                fallback: config.fallback_size,
            },
        })
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// Scratch store backing the temporary references.
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub async fn export(&self, locator: &Locator) -> Result<RasterBlob> {
        self.export_url(locator.as_str()).await
    }

    pub async fn export_url(&self, url: &str) -> Result<RasterBlob> {
        self.export_traced(url).await.outcome
    }

    /// Run the pipeline and report every stage it entered.
    pub async fn export_traced(&self, url: &str) -> ExportReport {
        let mut log = StageLog::default();
        log.enter(ExportStage::Idle);
        log.enter(ExportStage::Fetching);

        let svg_text = match self.fetch_text(url).await {
            Ok(t) => t,
            Err(e) => return log.finish(Err(e)),
        };

        log.enter(ExportStage::Decoding);
        let blob = match self.blobs.create(svg_text.as_bytes(), SVG_CONTENT_TYPE) {
            Ok(b) => b,
            Err(e) => return log.finish(Err(e)),
        };

        // Decode, draw and encode off the async workers. The blob moves into
        // the closure and is released there on every path.
        let options = self.options;
        let joined = tokio::task::spawn_blocking(move || {
            let mut stages = Vec::new();
            let res = blob.read().and_then(|data| decode_svg(&data, &options)).and_then(|svg| {
                stages.push(ExportStage::Drawing);
                rasterize(&svg, &options)
            });
            drop(blob);
            (stages, res)
        })
        .await;

        let outcome = match joined {
            Ok((stages, res)) => {
                for s in stages {
                    log.enter(s);
                }
                res
            }
            Err(e) => Err(Error::Other(format!("Rasterizer task failed: {}", e))),
        };

        if let Ok(blob) = &outcome {
            log::info!("exported {} as {}x{} PNG ({} bytes)", url, blob.width, blob.height, blob.png_data.len());
        }
        log.finish(outcome)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::FetchFailed(format!("HTTP GET failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::FetchFailed(format!("HTTP {} for {}", status, url)));
        }

        res.text()
            .await
            .map_err(|e| Error::FetchFailed(format!("Failed to read response body: {}", e)))
    }
}
