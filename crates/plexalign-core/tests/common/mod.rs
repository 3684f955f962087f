use std::path::{Path, PathBuf};

use ndarray::Array2;

use plexalign_core::frame::Frame;
use plexalign_core::io::image_io::save_frame;

/// Deterministic 8-bit texture inside `[top..top+size_h, left..left+size_w]`,
/// zero elsewhere. Every value is an exact multiple of 1/255.
pub fn patch_plane(
    height: usize,
    width: usize,
    top: usize,
    left: usize,
    size_h: usize,
    size_w: usize,
) -> Array2<f32> {
    let mut data = Array2::<f32>::zeros((height, width));
    for r in 0..size_h {
        for c in 0..size_w {
            let level = 40 + (r * 37 + c * 91 + r * c * 7) % 215;
            data[[top + r, left + c]] = level as f32 / 255.0;
        }
    }
    data
}

/// Solid square of value 1.0 on a zero background.
pub fn square_plane(height: usize, width: usize, top: usize, left: usize, size: usize) -> Array2<f32> {
    let mut data = Array2::<f32>::zeros((height, width));
    for r in top..top + size {
        for c in left..left + size {
            data[[r, c]] = 1.0;
        }
    }
    data
}

/// Write a plane as an 8-bit grayscale TIFF.
pub fn write_gray_tiff(dir: &Path, name: &str, plane: &Array2<f32>) -> PathBuf {
    let path = dir.join(name);
    let frame = Frame::from_plane(plane.clone(), 8);
    save_frame(&frame, &path).expect("write test frame");
    path
}

pub fn write_manifest(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("manifest.json");
    std::fs::write(&path, json).expect("write manifest");
    path
}

/// Isotropic Gaussian blob of peak 1.0 centred on `(center_row, center_col)`.
pub fn gaussian_plane(
    height: usize,
    width: usize,
    center_row: i64,
    center_col: i64,
    sigma: f32,
) -> Array2<f32> {
    let denom = 2.0 * sigma * sigma;
    Array2::from_shape_fn((height, width), |(r, c)| {
        let dr = (r as i64 - center_row) as f32;
        let dc = (c as i64 - center_col) as f32;
        (-(dr * dr + dc * dc) / denom).exp()
    })
}
