use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const THUMBNAIL_SIZE: u32 = 256;

const BACKGROUND: Rgba<u8> = Rgba([24, 26, 36, 255]);
const FACE_TOP: Rgba<u8> = Rgba([94, 114, 235, 255]);
const FACE_BOTTOM: Rgba<u8> = Rgba([56, 70, 160, 255]);
const EDGE: Rgba<u8> = Rgba([208, 214, 255, 255]);

// Placeholder shown until a real render exists: a two-tone diamond on a
// dark card. Deterministic, so reruns upload byte-identical thumbnails.
pub fn render_placeholder(size: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, BACKGROUND);
    let center = size as i32 / 2;
    let radius = (size as i32 * 3) / 8;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = (x as i32 - center).abs();
        let dy = (y as i32 - center).abs();
        let d = dx + dy;
        if d > radius {
            continue;
        }
        *pixel = if d >= radius - 2 {
            EDGE
        } else if (y as i32) < center {
            FACE_TOP
        } else {
            FACE_BOTTOM
        };
    }

    img
}

pub fn encode_png(img: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_the_fixed_size() {
        let img = render_placeholder(THUMBNAIL_SIZE);
        assert_eq!(img.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE));
    }

    #[test]
    fn glyph_is_drawn_over_the_background() {
        let img = render_placeholder(THUMBNAIL_SIZE);
        let center = THUMBNAIL_SIZE / 2;
        assert_ne!(*img.get_pixel(center, center - 4), BACKGROUND);
        assert_eq!(*img.get_pixel(2, 2), BACKGROUND);
    }

    #[test]
    fn encodes_to_png() -> anyhow::Result<()> {
        let png = encode_png(&render_placeholder(64))?;
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        Ok(())
    }
}
