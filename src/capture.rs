//! Chart bitmap capture.
//!
//! Charts are drawn by an external charting layer; the report only sees the
//! rasterized result. A [`ChartCapture`] turns a chart container id into a
//! [`Bitmap`]. Captures may hang, so [`TimedCapture`] bounds each one with a
//! deadline and reports [`CaptureError::Timeout`] instead of blocking the
//! export.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use serde::Serialize;
use thiserror::Error;

/// Default deadline for a single capture.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while capturing a chart.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No chart container with this id.
    #[error("Chart container not found: {0}")]
    NotFound(String),

    /// Reading the captured image failed.
    #[error("I/O error capturing {id}: {source}")]
    Io {
        /// Chart container id
        id: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The captured data is not a usable image.
    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    /// The capture did not finish before the deadline.
    #[error("Capture timed out after {0:?}")]
    Timeout(Duration),

    /// The capture worker stopped without producing a result.
    #[error("Capture worker exited without a result")]
    Disconnected,
}

/// Encoding of bitmap data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageEncoding {
    /// Baseline or progressive JPEG
    Jpeg,
}

/// A rasterized chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bitmap {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Encoded image bytes
    #[serde(skip_serializing)]
    pub data: Vec<u8>,

    /// Encoding of `data`
    pub encoding: ImageEncoding,
}

impl Bitmap {
    /// Wrap JPEG bytes, reading the pixel size from the frame header.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, CaptureError> {
        let (width, height) = jpeg_dimensions(&data)
            .ok_or_else(|| CaptureError::InvalidImage("no JPEG frame header".to_string()))?;
        if width == 0 || height == 0 {
            return Err(CaptureError::InvalidImage(format!(
                "zero-sized image {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            encoding: ImageEncoding::Jpeg,
        })
    }

    /// Height over width.
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

/// Read `(width, height)` from the first SOF marker of a JPEG stream.
pub fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        if marker == 0xFF {
            // fill byte
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
            pos += 2;
            continue;
        }

        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let is_sof = (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let seg = data.get(pos + 4..pos + 9)?;
            let height = u16::from_be_bytes([seg[1], seg[2]]) as u32;
            let width = u16::from_be_bytes([seg[3], seg[4]]) as u32;
            return Some((width, height));
        }
        if len < 2 {
            return None;
        }
        pos += 2 + len;
    }
    None
}

/// Source of chart bitmaps.
pub trait ChartCapture {
    /// Rasterize the chart container with the given id.
    fn capture(&self, id: &str) -> Result<Bitmap, CaptureError>;
}

impl<C: ChartCapture + ?Sized> ChartCapture for Box<C> {
    fn capture(&self, id: &str) -> Result<Bitmap, CaptureError> {
        (**self).capture(id)
    }
}

impl<C: ChartCapture + ?Sized> ChartCapture for Arc<C> {
    fn capture(&self, id: &str) -> Result<Bitmap, CaptureError> {
        (**self).capture(id)
    }
}

/// Capture that has no charts; every chart becomes a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl ChartCapture for NoCapture {
    fn capture(&self, id: &str) -> Result<Bitmap, CaptureError> {
        Err(CaptureError::NotFound(id.to_string()))
    }
}

/// Loads pre-rendered charts from `<dir>/<id>.jpg`.
#[derive(Debug, Clone)]
pub struct DirectoryCapture {
    dir: PathBuf,
}

impl DirectoryCapture {
    /// Create a capture reading from the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory charts are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", id))
    }
}

impl ChartCapture for DirectoryCapture {
    fn capture(&self, id: &str) -> Result<Bitmap, CaptureError> {
        let path = self.path_for(id);
        let data = fs::read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                CaptureError::NotFound(id.to_string())
            } else {
                CaptureError::Io {
                    id: id.to_string(),
                    source,
                }
            }
        })?;
        log::debug!("Loaded {} ({} bytes)", path.display(), data.len());
        Bitmap::from_jpeg(data)
    }
}

/// Runs another capture on a worker thread with a deadline.
///
/// A capture that misses the deadline is abandoned; its worker thread is
/// detached and its eventual result discarded.
#[derive(Debug)]
pub struct TimedCapture<C> {
    inner: Arc<C>,
    timeout: Duration,
}

impl<C> TimedCapture<C>
where
    C: ChartCapture + Send + Sync + 'static,
{
    /// Wrap a capture with the given deadline.
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    /// Wrap a capture with [`DEFAULT_CAPTURE_TIMEOUT`].
    pub fn with_default_timeout(inner: C) -> Self {
        Self::new(inner, DEFAULT_CAPTURE_TIMEOUT)
    }

    /// Deadline applied to each capture.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<C> ChartCapture for TimedCapture<C>
where
    C: ChartCapture + Send + Sync + 'static,
{
    fn capture(&self, id: &str) -> Result<Bitmap, CaptureError> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inner = Arc::clone(&self.inner);
        let worker_id = id.to_string();

        thread::Builder::new()
            .name(format!("capture-{}", id))
            .spawn(move || {
                // The receiver is gone if the deadline already passed.
                let _ = tx.send(inner.capture(&worker_id));
            })
            .map_err(|source| CaptureError::Io {
                id: id.to_string(),
                source,
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Capture of {} timed out after {:?}", id, self.timeout);
                Err(CaptureError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(CaptureError::Disconnected),
        }
    }
}
