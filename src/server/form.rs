use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

use crate::{
    error::{Result, ThumbnailError},
    models::{Photo, PromptFields, ThumbnailRequest},
};

const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;
const DEFAULT_PHOTO_MIME: &str = "application/octet-stream";

/// Fields of an `/upload` or `/refine` multipart body.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub photo: Option<Photo>,
    pub fields: PromptFields,
    pub output_format: Option<String>,
}

impl UploadForm {
    /// Reads the whole body. The photo is buffered in memory and rejected as
    /// soon as it grows past `max_photo_bytes`.
    pub async fn read(mut payload: Multipart, max_photo_bytes: usize) -> Result<Self> {
        let mut form = UploadForm::default();

        while let Some(mut field) = payload.try_next().await.map_err(invalid)? {
            let name = field
                .content_disposition()
                .get_name()
                .unwrap_or_default()
                .to_string();

            match name.as_str() {
                "photo" => {
                    let mime_type = field
                        .content_type()
                        .map(|m| m.essence_str().to_string())
                        .unwrap_or_else(|| DEFAULT_PHOTO_MIME.to_string());
                    let bytes = read_limited(&mut field, max_photo_bytes)
                        .await?
                        .ok_or(ThumbnailError::PhotoTooLarge {
                            limit: max_photo_bytes,
                        })?;
                    form.photo = Some(Photo::new(bytes, mime_type));
                }
                "videoType" => form.fields.video_type = Some(read_text(&mut field, &name).await?),
                "mood" => form.fields.mood = Some(read_text(&mut field, &name).await?),
                "style" => form.fields.style = Some(read_text(&mut field, &name).await?),
                "placement" => form.fields.placement = Some(read_text(&mut field, &name).await?),
                "customPrompt" => {
                    form.fields.custom_prompt = Some(read_text(&mut field, &name).await?)
                }
                "outputFormat" => form.output_format = Some(read_text(&mut field, &name).await?),
                other => {
                    log::debug!("Ignoring unknown form field '{}'", other);
                    while field.try_next().await.map_err(invalid)?.is_some() {}
                }
            }
        }

        Ok(form)
    }

    pub fn into_request(self) -> ThumbnailRequest {
        ThumbnailRequest {
            photo: self.photo,
            fields: self.fields,
            output_format_tag: self.output_format,
        }
    }
}

/// `None` when the field is larger than `limit`.
async fn read_limited(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(invalid)? {
        if buf.len() + chunk.len() > limit {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Some(buf))
}

async fn read_text(field: &mut Field, name: &str) -> Result<String> {
    let bytes = read_limited(field, MAX_TEXT_FIELD_BYTES)
        .await?
        .ok_or_else(|| ThumbnailError::InvalidForm(format!("{} is too long", name)))?;

    String::from_utf8(bytes)
        .map_err(|_| ThumbnailError::InvalidForm(format!("{} is not valid UTF-8", name)))
}

fn invalid(err: actix_multipart::MultipartError) -> ThumbnailError {
    ThumbnailError::InvalidForm(format!("Multipart error: {}", err))
}
