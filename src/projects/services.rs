use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::warn;

use crate::state::AppState;

/// Fallback reference used when no image is supplied or upload fails.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/800x600?text=No+Image";

pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Strips path components and unsafe characters so the name can be embedded
/// in a storage key. Falls back to "upload" when nothing usable remains.
pub fn sanitize_filename(name: &str) -> String {
    let basename = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Keys are timestamped to avoid collisions between uploads of the same name.
pub fn upload_key(unix_ts: i64, filename: &str) -> String {
    format!("projects/{}_{}", unix_ts, sanitize_filename(filename))
}

/// Create policy: no image or failed upload degrades to the placeholder.
pub async fn image_url_for_create(state: &AppState, image: Option<ImageUpload>) -> String {
    let Some(image) = image else {
        return PLACEHOLDER_IMAGE_URL.to_string();
    };
    match upload_image(state, image).await {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "image upload failed; using placeholder");
            PLACEHOLDER_IMAGE_URL.to_string()
        }
    }
}

/// Update policy: a failed upload keeps the previous reference rather than
/// destroying a working one.
pub async fn image_url_for_update(
    state: &AppState,
    current: &str,
    image: Option<ImageUpload>,
) -> String {
    let Some(image) = image else {
        return current.to_string();
    };
    match upload_image(state, image).await {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "image upload failed; keeping previous image");
            current.to_string()
        }
    }
}

async fn upload_image(state: &AppState, image: ImageUpload) -> anyhow::Result<String> {
    let key = upload_key(OffsetDateTime::now_utc().unix_timestamp(), &image.filename);
    state
        .storage
        .upload(&key, image.body, &image.content_type)
        .await
        .with_context(|| format!("upload {}", key))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::storage::StorageClient;

    struct FailStorage;
    #[async_trait]
    impl StorageClient for FailStorage {
        async fn upload(&self, _k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<String> {
            anyhow::bail!("storage unavailable")
        }
    }

    fn failing_state() -> AppState {
        let mut state = AppState::fake();
        state.storage = Arc::new(FailStorage) as Arc<dyn StorageClient>;
        state
    }

    fn sample_image() -> ImageUpload {
        ImageUpload {
            filename: "shot.png".into(),
            content_type: "image/png".into(),
            body: Bytes::from_static(b"png-bytes"),
        }
    }

    #[test]
    fn sanitize_drops_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("c:\\temp\\shot.png"), "shot.png");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
    }

    #[test]
    fn sanitize_falls_back_when_nothing_remains() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
    }

    #[test]
    fn upload_key_shape() {
        assert_eq!(upload_key(1700000000, "shot.png"), "projects/1700000000_shot.png");
    }

    #[tokio::test]
    async fn create_without_image_uses_placeholder() {
        let state = AppState::fake();
        assert_eq!(
            image_url_for_create(&state, None).await,
            PLACEHOLDER_IMAGE_URL
        );
    }

    #[tokio::test]
    async fn create_upload_returns_public_url() {
        let state = AppState::fake();
        let url = image_url_for_create(&state, Some(sample_image())).await;
        assert!(url.starts_with("https://blob.test/projects/"));
        assert!(url.ends_with("_shot.png"));
    }

    #[tokio::test]
    async fn create_upload_failure_degrades_to_placeholder() {
        let state = failing_state();
        assert_eq!(
            image_url_for_create(&state, Some(sample_image())).await,
            PLACEHOLDER_IMAGE_URL
        );
    }

    #[tokio::test]
    async fn update_without_image_keeps_current() {
        let state = AppState::fake();
        let current = "https://blob.test/projects/1_old.png";
        assert_eq!(image_url_for_update(&state, current, None).await, current);
    }

    #[tokio::test]
    async fn update_upload_failure_keeps_current() {
        let state = failing_state();
        let current = "https://blob.test/projects/1_old.png";
        assert_eq!(
            image_url_for_update(&state, current, Some(sample_image())).await,
            current
        );
    }
}
