use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use image::{
    DynamicImage, EncodableLayout, ImageBuffer, ImageFormat, Luma, LumaA, Pixel,
    PixelWithColorType, Rgb, Rgba,
};
use ndarray::{s, Array3};
use num_traits::{NumCast, ToPrimitive};
use tracing::warn;

use crate::error::{RegistrationError, Result};
use crate::frame::{Frame, FrameSize};

/// Read only the header of an image file to get its dimensions.
pub fn read_dimensions(path: &Path) -> Result<FrameSize> {
    let (w, h) = image::image_dimensions(path).map_err(|source| RegistrationError::ReadFrame {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FrameSize::new(h as usize, w as usize))
}

/// Load an image file into a planar Frame, keeping its channel count.
///
/// 8- and 16-bit layouts are kept as-is. Other layouts (float TIFFs) are
/// converted to 16-bit gray or RGB.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path).map_err(|source| RegistrationError::ReadFrame {
        path: path.to_path_buf(),
        source,
    })?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    if w == 0 || h == 0 {
        return Err(RegistrationError::InvalidDimensions {
            width: w as u32,
            height: h as u32,
        });
    }

    let frame = match img {
        DynamicImage::ImageLuma8(buf) => planes_from_interleaved(buf.as_raw(), h, w, 1, 8),
        DynamicImage::ImageLumaA8(buf) => planes_from_interleaved(buf.as_raw(), h, w, 2, 8),
        DynamicImage::ImageRgb8(buf) => planes_from_interleaved(buf.as_raw(), h, w, 3, 8),
        DynamicImage::ImageRgba8(buf) => planes_from_interleaved(buf.as_raw(), h, w, 4, 8),
        DynamicImage::ImageLuma16(buf) => planes_from_interleaved(buf.as_raw(), h, w, 1, 16),
        DynamicImage::ImageLumaA16(buf) => planes_from_interleaved(buf.as_raw(), h, w, 2, 16),
        DynamicImage::ImageRgb16(buf) => planes_from_interleaved(buf.as_raw(), h, w, 3, 16),
        DynamicImage::ImageRgba16(buf) => planes_from_interleaved(buf.as_raw(), h, w, 4, 16),
        other if other.color().has_color() => {
            let buf = other.to_rgb16();
            planes_from_interleaved(buf.as_raw(), h, w, 3, 16)
        }
        other => {
            let buf = other.to_luma16();
            planes_from_interleaved(buf.as_raw(), h, w, 1, 16)
        }
    };

    Ok(frame)
}

/// Save a frame with its original channel count and bit depth.
/// The container format is chosen from the file extension.
///
/// TIFF has no gray+alpha layout: a 2-channel frame saved as TIFF keeps only
/// its gray plane.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<()> {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let data = encodable_planes(frame, path);
    let channels = data.dim().0;
    if frame.original_bit_depth <= 8 {
        let samples = interleave::<u8>(&data, 255.0);
        match channels {
            1 => write_buffer::<Luma<u8>>(path, w, h, samples),
            2 => write_buffer::<LumaA<u8>>(path, w, h, samples),
            3 => write_buffer::<Rgb<u8>>(path, w, h, samples),
            4 => write_buffer::<Rgba<u8>>(path, w, h, samples),
            n => Err(unsupported_channels(n)),
        }
    } else {
        let samples = interleave::<u16>(&data, 65535.0);
        match channels {
            1 => write_buffer::<Luma<u16>>(path, w, h, samples),
            2 => write_buffer::<LumaA<u16>>(path, w, h, samples),
            3 => write_buffer::<Rgb<u16>>(path, w, h, samples),
            4 => write_buffer::<Rgba<u16>>(path, w, h, samples),
            n => Err(unsupported_channels(n)),
        }
    }
}

fn encodable_planes<'a>(frame: &'a Frame, path: &Path) -> Cow<'a, Array3<f32>> {
    let is_tiff = ImageFormat::from_path(path).is_ok_and(|f| f == ImageFormat::Tiff);
    if frame.channels() == 2 && is_tiff {
        warn!(
            path = %path.display(),
            "TIFF cannot store gray+alpha, writing the gray plane only"
        );
        Cow::Owned(frame.data.slice(s![0..1, .., ..]).to_owned())
    } else {
        Cow::Borrowed(&frame.data)
    }
}

/// List files in `dir` whose extension matches one of `extensions`
/// (case-insensitive), sorted by path.
pub fn list_frame_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn planes_from_interleaved<T: ToPrimitive + Copy>(
    raw: &[T],
    height: usize,
    width: usize,
    channels: usize,
    bit_depth: u8,
) -> Frame {
    let scale = if bit_depth <= 8 { 255.0 } else { 65535.0 };
    let mut data = Array3::<f32>::zeros((channels, height, width));

    for (i, pixel) in raw.chunks_exact(channels).enumerate() {
        let (row, col) = (i / width, i % width);
        for (c, v) in pixel.iter().enumerate() {
            data[[c, row, col]] = v.to_f32().unwrap_or(0.0) / scale;
        }
    }

    Frame::new(data, bit_depth)
}

fn interleave<T: NumCast + Default>(data: &Array3<f32>, scale: f32) -> Vec<T> {
    let (channels, h, w) = data.dim();
    let mut samples = Vec::with_capacity(channels * h * w);
    for row in 0..h {
        for col in 0..w {
            for c in 0..channels {
                let v = (data[[c, row, col]].clamp(0.0, 1.0) * scale).round();
                samples.push(T::from(v).unwrap_or_default());
            }
        }
    }
    samples
}

fn write_buffer<P>(path: &Path, width: u32, height: u32, samples: Vec<P::Subpixel>) -> Result<()>
where
    P: Pixel + PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    let img = ImageBuffer::<P, Vec<P::Subpixel>>::from_raw(width, height, samples)
        .ok_or(RegistrationError::InvalidDimensions { width, height })?;
    img.save(path).map_err(|source| RegistrationError::WriteFrame {
        path: path.to_path_buf(),
        source,
    })
}

fn unsupported_channels(channels: usize) -> RegistrationError {
    RegistrationError::UnsupportedLayout(format!("{channels} channels"))
}
