//! QR credential rendering
//!
//! Each token is handed out as a QR code of its ballot URL. A batch is
//! delivered as one ZIP archive with a PNG per token, named by serial.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::db::models::Token;
use crate::{BallotError, Result};

/// Minimum edge length of rendered QR images, in pixels
const QR_MIN_DIMENSION: u32 = 300;

/// Ballot URL for a token
pub fn vote_url(base_url: &str, token: &str) -> String {
    format!("{}/vote?token={}", base_url.trim_end_matches('/'), token)
}

/// Archive entry name for a token
pub fn file_name(token: &Token) -> String {
    format!("token_{}.png", token.label())
}

/// Render `data` as a QR code PNG
pub fn render_qr_png(data: &str) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| BallotError::Encoding(e.to_string()))?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .build();

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| BallotError::Encoding(e.to_string()))?;
    Ok(png.into_inner())
}

/// ZIP archive with one QR PNG per token
pub fn encode_batch(base_url: &str, tokens: &[Token]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for token in tokens {
        let png = render_qr_png(&vote_url(base_url, &token.token))?;
        zip.start_file(file_name(token), options)
            .map_err(|e| BallotError::Encoding(e.to_string()))?;
        zip.write_all(&png)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| BallotError::Encoding(e.to_string()))?;
    Ok(cursor.into_inner())
}
