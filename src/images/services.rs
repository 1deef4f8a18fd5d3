use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A file received from a client, not yet uploaded.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Uploads one image into the configured media folder and returns its public URL.
/// Upstream failures are passed through as-is.
pub async fn upload_image(st: &AppState, item: UploadItem) -> AppResult<String> {
    let ext = ext_from_mime(&item.content_type).unwrap_or("bin");
    let key = format!("{}/{}.{}", st.config.media.folder, Uuid::new_v4(), ext);
    let size = item.body.len();
    st.storage
        .put_object(&key, item.body, &item.content_type)
        .await
        .map_err(AppError::Upload)?;
    let url = st.storage.public_url(&key);
    info!(%key, size, "image uploaded");
    Ok(url)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
