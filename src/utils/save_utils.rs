use crate::core::frame_buffer::FrameBuffer;
use image::ColorType;
use log::{debug, info, warn};
use std::path::Path;

/// Writes RGBA8 pixels, rows top to bottom, to an image file whose format
/// follows the extension of `path`.
pub fn save_image<P: AsRef<Path>>(
    path: P,
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<(), String> {
    save_buffer(path.as_ref(), data, width, height, ColorType::Rgba8)
}

/// Writes the frame buffer as an upright RGBA PNG.
pub fn save_frame_buffer<P: AsRef<Path>>(path: P, frame_buffer: &FrameBuffer) -> Result<(), String> {
    save_image(
        path,
        &frame_buffer.to_rgba_bytes(),
        frame_buffer.width(),
        frame_buffer.height(),
    )
}

/// Writes the depth of every cell as 8-bit grayscale: near is white, far
/// and uncovered cells are black.
pub fn save_depth_map<P: AsRef<Path>>(path: P, frame_buffer: &FrameBuffer) -> Result<(), String> {
    let normalized = normalize_depth(&frame_buffer.depth_values(), 1.0, 99.0);
    let gray: Vec<u8> = normalized
        .iter()
        .map(|&d| ((1.0 - d) * 255.0).round() as u8)
        .collect();
    save_buffer(
        path.as_ref(),
        &gray,
        frame_buffer.width(),
        frame_buffer.height(),
        ColorType::L8,
    )
}

fn save_buffer(
    path: &Path,
    data: &[u8],
    width: usize,
    height: usize,
    color_type: ColorType,
) -> Result<(), String> {
    let (w, h) = (
        u32::try_from(width).map_err(|_| format!("image width {} is too large", width))?,
        u32::try_from(height).map_err(|_| format!("image height {} is too large", height))?,
    );
    image::save_buffer(path, data, w, h, color_type)
        .map_err(|e| format!("failed to save image to {}: {}", path.display(), e))?;
    info!("Image saved to {}", path.display());
    Ok(())
}

/// Maps depths to `[0, 1]` over the given percentile range of the finite
/// values, so a few outliers do not flatten the picture. Non-finite depths
/// map to 1 (far).
pub fn normalize_depth(depth_buffer: &[f32], min_percentile: f32, max_percentile: f32) -> Vec<f32> {
    let mut finite_depths: Vec<f32> = depth_buffer
        .iter()
        .copied()
        .filter(|d| d.is_finite())
        .collect();

    let (min_clip, max_clip) = match finite_depths.len() {
        0 => {
            warn!("depth buffer is empty, nothing was drawn");
            return vec![1.0; depth_buffer.len()];
        }
        1 => (finite_depths[0], finite_depths[0]),
        n => {
            finite_depths.sort_unstable_by(f32::total_cmp);
            let at = |percentile: f32| {
                let index = (percentile / 100.0 * (n - 1) as f32).round() as usize;
                finite_depths[index.min(n - 1)]
            };
            let (lo, hi) = (at(min_percentile), at(max_percentile));
            if hi - lo < 1e-6 {
                (finite_depths[0], finite_depths[n - 1])
            } else {
                (lo, hi)
            }
        }
    };
    debug!("normalizing depth over [{:.3}, {:.3}]", min_clip, max_clip);

    let range = max_clip - min_clip;
    let inv_range = if range > 1e-6 { 1.0 / range } else { 0.0 };

    depth_buffer
        .iter()
        .map(|&depth| {
            if depth.is_finite() {
                ((depth.clamp(min_clip, max_clip) - min_clip) * inv_range).clamp(0.0, 1.0)
            } else {
                1.0
            }
        })
        .collect()
}
