//! Decoding input images and encoding iteration snapshots as PNG.

use anyhow::Context;
use l0_gradient::{Image, SmoothError, Snapshot};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("Cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported image {}: {source}", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: SmoothError,
    },
}

/// File name of the snapshot for a 1-based iteration number.
pub fn snapshot_file_name(iteration: usize) -> String {
    format!("result_iteration_{iteration}.png")
}

/// Decode an image file into normalized channels.
///
/// Grayscale sources (with or without alpha) give one channel, everything
/// else is converted to three RGB channels. Alpha is dropped.
pub fn load_image(path: &Path) -> Result<Image, ImageIoError> {
    let decoded = image::open(path).map_err(|source| ImageIoError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let (channel_count, width, height, samples) = if decoded.color().has_color() {
        let rgb = decoded.into_rgb8();
        let (width, height) = rgb.dimensions();
        (3, width, height, rgb.into_raw())
    } else {
        let luma = decoded.into_luma8();
        let (width, height) = luma.dimensions();
        (1, width, height, luma.into_raw())
    };

    Image::from_interleaved_u8(height as usize, width as usize, channel_count, &samples).map_err(
        |source| ImageIoError::Layout {
            path: path.to_path_buf(),
            source,
        },
    )
}

/// Encode a snapshot as an 8-bit grayscale or RGB PNG.
pub fn encode_png(snapshot: &Snapshot) -> anyhow::Result<Vec<u8>> {
    let color = match snapshot.channel_count() {
        1 => png::ColorType::Grayscale,
        3 => png::ColorType::Rgb,
        n => anyhow::bail!("Cannot encode {n}-channel snapshot as PNG"),
    };
    let width = u32::try_from(snapshot.cols()).context("Image too wide for PNG")?;
    let height = u32::try_from(snapshot.rows()).context("Image too tall for PNG")?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header().context("PNG header")?;
        writer
            .write_image_data(snapshot.pixels())
            .context("PNG image data")?;
        writer.finish().context("PNG trailer")?;
    }
    Ok(buf.into_inner())
}

/// Write `result_iteration_<k>.png` into `dir`, returning its path.
pub fn write_snapshot(dir: &Path, snapshot: &Snapshot) -> anyhow::Result<PathBuf> {
    let path = dir.join(snapshot_file_name(snapshot.iteration()));
    let bytes = encode_png(snapshot)
        .with_context(|| format!("Failed to encode iteration {}", snapshot.iteration()))?;
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
