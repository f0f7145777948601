use super::*;
use base64::Engine as _;
use icns::Image;

fn solid_image(size: u32, rgba: [u8; 4]) -> Image {
    let pixels = rgba
        .iter()
        .copied()
        .cycle()
        .take((size * size * 4) as usize)
        .collect::<Vec<_>>();
    Image::from_data(PixelFormat::RGBA, size, size, pixels).expect("build icon image")
}

fn container_bytes(entries: &[(IconType, u32, [u8; 4])]) -> Vec<u8> {
    let mut family = IconFamily::new();
    for (icon_type, size, color) in entries {
        family
            .add_icon_with_type(&solid_image(*size, *color), *icon_type)
            .expect("add icon");
    }
    let mut bytes = Vec::new();
    family.write(&mut bytes).expect("write family");
    bytes
}

fn decode_data_url(data_url: &str) -> image::RgbaImage {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .expect("png data url prefix");
    let png = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .expect("base64 payload");
    image::load_from_memory(&png).expect("decode png").to_rgba8()
}

#[test]
fn decode_icon_container_should_pick_largest_image() {
    let bytes = container_bytes(&[
        (IconType::RGBA32_16x16, 16, [255, 0, 0, 255]),
        (IconType::RGBA32_64x64, 64, [0, 0, 255, 255]),
        (IconType::RGBA32_32x32, 32, [0, 255, 0, 255]),
    ]);
    let data_url = decode_icon_container(&bytes).expect("decode container");
    let image = decode_data_url(&data_url);
    assert_eq!(image.dimensions(), (64, 64));
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255, 255]);
}

#[test]
fn select_largest_should_keep_first_on_ties() {
    let available = [
        IconType::RGBA32_16x16,
        IconType::RGBA32_16x16_2x,
        IconType::RGBA32_32x32,
    ];
    assert_eq!(select_largest(&available), Some(IconType::RGBA32_16x16_2x));
    assert_eq!(select_largest(&[]), None);
}

#[test]
fn decode_icon_container_should_reject_empty_input() {
    let error = decode_icon_container(&[]).expect_err("empty input");
    assert_eq!(error.code, "icon_decode_failed");
    assert_eq!(error.context_value("reason"), Some("empty_container"));
}

#[test]
fn decode_icon_container_should_reject_truncated_input() {
    let bytes = container_bytes(&[(IconType::RGBA32_32x32, 32, [1, 2, 3, 255])]);
    let truncated = &bytes[..bytes.len() / 2];
    let error = decode_icon_container(truncated).expect_err("truncated input");
    assert_eq!(error.code, "icon_decode_failed");
}

#[test]
fn decode_icon_container_should_reject_zero_image_family() {
    let bytes = container_bytes(&[]);
    let error = decode_icon_container(&bytes).expect_err("zero images");
    assert_eq!(error.context_value("reason"), Some("no_images"));
}

#[test]
fn decode_icon_container_should_reject_garbage() {
    let error = decode_icon_container(b"not an icon container").expect_err("garbage");
    assert_eq!(error.code, "icon_decode_failed");
}
