//! Image Upload Handler
//!
//! Accepts PNG, JPEG and WebP, re-encodes everything to JPEG and names the
//! file after the SHA-256 of the encoded bytes, so identical uploads share
//! one file.

use std::io::Cursor;
use std::path::{Path as FsPath, PathBuf};

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use shared::error::{AppError, AppResult, ErrorCode};

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub url: String,
    /// False when an identical image was already stored
    pub created: bool,
}

fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn validate_image(data: &[u8], ext: &str, max_bytes: usize) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }
    if data.len() > max_bytes {
        return Err(AppError::new(ErrorCode::FileTooLarge)
            .with_detail("maxBytes", max_bytes as u64));
    }
    let ext = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat)
            .with_detail("format", ext)
            .with_detail("supported", SUPPORTED_FORMATS.join(", ")));
    }
    Ok(())
}

fn reencode_jpeg(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::new(ErrorCode::InvalidImageFile).with_detail("reason", e.to_string()))?;

    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("Failed to encode image: {e}")))?;
    Ok(buffer)
}

/// Stored names are `<64 hex>.jpg`; anything else never touches the disk
fn is_stored_name(filename: &str) -> bool {
    filename
        .strip_suffix(".jpg")
        .is_some_and(|stem| stem.len() == 64 && stem.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn file_path(uploads_dir: &FsPath, filename: &str) -> PathBuf {
    uploads_dir.join(filename)
}

/// POST /upload
pub async fn upload(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("No filename provided in file field"))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
        file = Some((name, data));
        break;
    }

    let (original_name, data) =
        file.ok_or_else(|| AppError::validation("No 'file' field found"))?;

    let ext = FsPath::new(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    validate_image(&data, &ext, state.config.max_upload_bytes)?;

    let encoded = tokio::task::spawn_blocking(move || reencode_jpeg(&data))
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {e}")))??;

    let filename = format!("{}.jpg", content_hash(&encoded));
    let uploads_dir = state.config.uploads_dir();
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {e}")))?;

    let path = file_path(&uploads_dir, &filename);
    let created = !tokio::fs::try_exists(&path).await.unwrap_or(false);
    if created {
        tokio::fs::write(&path, &encoded)
            .await
            .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;
    }

    tracing::info!(
        user = %current_user.id,
        original_name = %original_name,
        filename = %filename,
        size = encoded.len(),
        created,
        "Image uploaded"
    );

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    let url = format!("{}/upload/{}", state.config.public_base_url, filename);
    Ok((
        status,
        Json(UploadResponse {
            filename,
            original_name,
            size: encoded.len(),
            url,
            created,
        }),
    ))
}

/// GET /upload/{filename}
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !is_stored_name(&filename) {
        return Err(AppError::not_found("File", &filename));
    }

    let path = file_path(&state.config.uploads_dir(), &filename);
    let content = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found("File", &filename))?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 10, 10]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_stored_name_rejects_traversal() {
        let good = format!("{}.jpg", "a".repeat(64));
        assert!(is_stored_name(&good));
        assert!(!is_stored_name("../bookstore.redb"));
        assert!(!is_stored_name("..%2Fetc.jpg"));
        assert!(!is_stored_name(&format!("{}.png", "a".repeat(64))));
        assert!(!is_stored_name(&format!("{}.jpg", "g".repeat(64))));
    }

    #[test]
    fn test_validate_image_limits() {
        let png = tiny_png();
        assert!(validate_image(&png, "PNG", 1024 * 1024).is_ok());

        let err = validate_image(&png, "gif", 1024 * 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = validate_image(&png, "png", 8).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);

        let err = validate_image(&[], "png", 8).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_reencode_is_deterministic_jpeg() {
        let png = tiny_png();
        let a = reencode_jpeg(&png).unwrap();
        let b = reencode_jpeg(&png).unwrap();
        assert_eq!(&a[..2], &[0xFF, 0xD8]);
        assert_eq!(content_hash(&a), content_hash(&b));

        let err = reencode_jpeg(b"not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }
}
