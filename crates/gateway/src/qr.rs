//! QR code rendering for the pairing endpoint.

use anyhow::Context;
use image::Luma;
use qrcode::QrCode;

/// Render pairing data as a PNG.
pub fn render_png(data: &str) -> anyhow::Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes()).context("encode QR code")?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(320, 320)
        .build();
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .context("render QR PNG")?;
    Ok(png)
}
