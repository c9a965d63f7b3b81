//! Frame decoding and transformation helpers.

use nokhwa::pixel_format::RgbFormat;

use super::types::Frame;

/// Decode a nokhwa buffer (MJPEG, YUYV, NV12, ...) into an RGB [`Frame`].
///
/// Returns `None` if the camera's native format cannot be decoded.
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();
    Some(Frame::rgb(
        decoded.into_raw(),
        resolution.width(),
        resolution.height(),
    ))
}

/// Flip a frame left-right in place (selfie view).
pub fn mirror_horizontal(frame: &mut Frame) {
    let bpp = frame.bytes_per_pixel();
    let stride = frame.width as usize * bpp;
    if stride == 0 {
        return;
    }

    for row in frame.data.chunks_exact_mut(stride) {
        let width = row.len() / bpp;
        for x in 0..width / 2 {
            let (left, right) = (x * bpp, (width - 1 - x) * bpp);
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}
