//! Multipart post form used by the admin create/edit endpoints.
//!
//! Text fields: `title`, `tags`, `body`, `status`. File field: `cover`.

use actix_multipart::{Field, Multipart};
use futures::StreamExt;

use crate::middleware::error::{AppError, AppResult};

const MAX_COVER_BYTES: usize = 5 * 1024 * 1024;
const MAX_TEXT_BYTES: usize = 1024 * 1024;

/// An uploaded cover file, not yet stored.
#[derive(Debug)]
pub struct CoverUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct PostForm {
    pub title: Option<String>,
    pub tags: Option<String>,
    pub body: Option<String>,
    pub status: Option<String>,
    pub cover: Option<CoverUpload>,
}

impl PostForm {
    pub async fn read(mut payload: Multipart) -> AppResult<Self> {
        let mut form = PostForm::default();

        while let Some(item) = payload.next().await {
            let mut field = item?;
            let Some(name) = field
                .content_disposition()
                .and_then(|cd| cd.get_name())
                .map(str::to_owned)
            else {
                continue;
            };

            if name == "cover" {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_owned();
                let content_type = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_owned())
                    .unwrap_or_default();
                let bytes = read_field(&mut field, MAX_COVER_BYTES).await?;

                // Browsers send an empty part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.cover = Some(CoverUpload {
                    file_name,
                    content_type,
                    bytes,
                });
                continue;
            }

            let bytes = read_field(&mut field, MAX_TEXT_BYTES).await?;
            let value = String::from_utf8(bytes)
                .map_err(|_| AppError::BadRequest(format!("Field '{name}' is not valid UTF-8")))?;

            match name.as_str() {
                "title" => form.title = Some(value),
                "tags" => form.tags = Some(value),
                "body" => form.body = Some(value),
                "status" => form.status = Some(value),
                other => tracing::debug!(field = %other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Field exceeds the {limit} byte limit"
            )));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}
