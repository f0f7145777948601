use base64::Engine as _;
use dockyard_protocol::{AppError, AppResult, ResultExt};
use icns::{IconFamily, IconType, PixelFormat};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

const DECODE_FAILED_CODE: &str = "icon_decode_failed";
const DECODE_FAILED_MESSAGE: &str = "decode icon container failed";
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

fn decode_error(reason: &str) -> AppError {
    AppError::new(DECODE_FAILED_CODE, DECODE_FAILED_MESSAGE).with_context("reason", reason)
}

/// Decodes the largest image of an `.icns` container into a PNG data URL.
pub fn decode_icon_container(bytes: &[u8]) -> AppResult<String> {
    if bytes.is_empty() {
        return Err(decode_error("empty_container"));
    }

    let family = IconFamily::read(Cursor::new(bytes))
        .with_code(DECODE_FAILED_CODE, DECODE_FAILED_MESSAGE)
        .with_ctx("reason", "invalid_container")?;
    let available = family.available_icons();
    let largest = select_largest(&available).ok_or_else(|| decode_error("no_images"))?;

    let decoded = family
        .get_icon_with_type(largest)
        .with_code(DECODE_FAILED_CODE, DECODE_FAILED_MESSAGE)
        .with_ctx("iconType", format!("{largest:?}"))?;
    let rgba = decoded.convert_to(PixelFormat::RGBA);
    if rgba.data().is_empty() || rgba.width() == 0 || rgba.height() == 0 {
        return Err(decode_error("empty_payload"));
    }

    let png = encode_png(rgba.width(), rgba.height(), rgba.data().to_vec())?;
    Ok(format!(
        "{PNG_DATA_URL_PREFIX}{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

/// Largest `width * height`; on ties the earliest entry wins.
pub(crate) fn select_largest(available: &[IconType]) -> Option<IconType> {
    let mut best: Option<(u64, IconType)> = None;
    for icon_type in available {
        let area = u64::from(icon_type.pixel_width()) * u64::from(icon_type.pixel_height());
        if best.is_none_or(|(best_area, _)| area > best_area) {
            best = Some((area, *icon_type));
        }
    }
    best.map(|(_, icon_type)| icon_type)
}

fn encode_png(width: u32, height: u32, pixels: Vec<u8>) -> AppResult<Vec<u8>> {
    let image = RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| decode_error("pixel_buffer_mismatch"))?;
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, ImageFormat::Png)
        .with_code("icon_encode_failed", "encode icon png failed")?;
    Ok(encoded.into_inner())
}

#[cfg(test)]
#[path = "../tests/container/container_tests.rs"]
mod tests;
