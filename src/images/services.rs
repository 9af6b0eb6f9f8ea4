//! Multipart intake for image uploads: count/size/MIME enforcement and
//! collision-free, traversal-safe filename derivation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::Multipart;
use bytes::Bytes;

use crate::config::UploadConfig;
use crate::error::UploadError;

/// File field name the client must use; any other file part is rejected.
const FILE_FIELD: &str = "images";

/// A validated file waiting to be staged.
#[derive(Debug)]
pub struct PendingImage {
    pub filename: String,
    pub body: Bytes,
}

/// Drain a multipart request into text fields and validated image files.
///
/// Constraints are enforced while draining, so an oversized sixth file fails
/// the whole request before any field validation runs. Text fields may
/// repeat (`tags` as a list); values are collected in arrival order.
pub async fn collect_multipart(
    mut mp: Multipart,
    limits: &UploadConfig,
) -> Result<(HashMap<String, Vec<String>>, Vec<PendingImage>), UploadError> {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    let mut files: Vec<PendingImage> = Vec::new();

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| UploadError::Other(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(original) = field.file_name().map(str::to_string) {
            if name != FILE_FIELD {
                return Err(UploadError::UnexpectedField);
            }
            if files.len() >= limits.max_files {
                return Err(UploadError::TooManyFiles);
            }
            let content_type = field.content_type().unwrap_or_default().to_string();
            let ext = ext_from_mime(&content_type).ok_or(UploadError::UnsupportedType)?;

            let body = field
                .bytes()
                .await
                .map_err(|e| UploadError::Other(e.to_string()))?;
            if body.len() > limits.max_file_bytes {
                return Err(UploadError::FileTooLarge);
            }

            files.push(PendingImage {
                filename: unique_name(&original, ext),
                body,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| UploadError::Other(e.to_string()))?;
            fields.entry(name).or_default().push(value);
        }
    }

    Ok((fields, files))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Stored name: `{unix_millis}_{seq}_{base}.{ext}`. The base keeps only
/// `[A-Za-z0-9_-]`, which rules out path traversal; the time+sequence prefix
/// rules out collisions within and across requests.
fn unique_name(original: &str, ext: &str) -> String {
    static SEQ: AtomicU64 = AtomicU64::new(0);

    let base = original
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original);
    let mut base: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if base.is_empty() {
        base.push_str("image");
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);

    format!("{}_{}_{}.{}", millis, seq, base, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const BOUNDARY: &str = "----testboundary";

    fn file_part(name: &str, filename: &str, content_type: &str, body: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{body}\r\n"
        )
    }

    fn text_part(name: &str, value: &str) -> String {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    }

    fn close() -> String {
        format!("--{BOUNDARY}--\r\n")
    }

    async fn multipart(body: String) -> Multipart {
        let request = Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn small_limits() -> UploadConfig {
        UploadConfig {
            dir: "uploads".into(),
            max_file_bytes: 64,
            max_files: 5,
        }
    }

    #[tokio::test]
    async fn collects_text_fields_and_files() {
        let mut body = text_part("title", "Masala Dosa");
        body.push_str(&text_part("tags", "south-indian"));
        body.push_str(&text_part("tags", "breakfast"));
        body.push_str(&file_part("images", "dosa.jpg", "image/jpeg", "jpegdata"));
        body.push_str(&close());

        let (fields, files) = collect_multipart(multipart(body).await, &small_limits())
            .await
            .unwrap();
        assert_eq!(fields["title"], vec!["Masala Dosa".to_string()]);
        assert_eq!(
            fields["tags"],
            vec!["south-indian".to_string(), "breakfast".to_string()]
        );
        assert_eq!(files.len(), 1);
        assert!(files[0].filename.ends_with(".jpg"));
        assert_eq!(files[0].body.as_ref(), b"jpegdata");
    }

    #[tokio::test]
    async fn sixth_file_is_rejected() {
        let mut body = String::new();
        for i in 0..6 {
            body.push_str(&file_part(
                "images",
                &format!("photo{i}.png"),
                "image/png",
                "png",
            ));
        }
        body.push_str(&close());

        let err = collect_multipart(multipart(body).await, &small_limits())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TooManyFiles));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let body = file_part("images", "big.png", "image/png", &"x".repeat(65)) + &close();

        let err = collect_multipart(multipart(body).await, &small_limits())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge));
    }

    #[tokio::test]
    async fn file_under_another_field_name_is_rejected() {
        let body = file_part("photo", "dosa.png", "image/png", "png") + &close();

        let err = collect_multipart(multipart(body).await, &small_limits())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::UnexpectedField));
    }

    #[tokio::test]
    async fn non_image_content_type_is_rejected() {
        let body = file_part("images", "menu.pdf", "application/pdf", "pdf") + &close();

        let err = collect_multipart(multipart(body).await, &small_limits())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType));
    }

    #[test]
    fn ext_follows_validated_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), None);
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime(""), None);
    }

    #[test]
    fn filenames_cannot_traverse() {
        let name = unique_name("../../etc/passwd", "png");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn filenames_keep_a_recognizable_base() {
        let name = unique_name("masala dosa (2).jpg", "jpg");
        assert!(name.contains("masala_dosa__2_"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn empty_base_falls_back() {
        let name = unique_name(".jpg", "jpg");
        assert!(name.contains("_image."));
    }

    #[test]
    fn names_are_unique_even_in_the_same_millisecond() {
        let a = unique_name("photo.jpg", "jpg");
        let b = unique_name("photo.jpg", "jpg");
        assert_ne!(a, b);
    }
}
