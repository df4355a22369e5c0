use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use super::{form::UploadForm, AppState};
use crate::{error::Result, models::UploadResponse};

/// `POST /upload`: photo plus form answers in, generated thumbnails out.
pub async fn upload(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4();
    let form = UploadForm::read(payload, state.max_photo_bytes)
        .await
        .map_err(|e| {
            log::warn!("[req:{}] Rejected /upload: {}", request_id, e);
            e
        })?;

    log::info!(
        "[req:{}] /upload photo={} bytes outputFormat={:?}",
        request_id,
        form.photo.as_ref().map_or(0, |p| p.len()),
        form.output_format
    );

    let result = state
        .orchestrator
        .orchestrate(&form.into_request())
        .await
        .map_err(|e| {
            log::error!("[req:{}] Error in /upload: {}", request_id, e);
            e
        })?;

    log::info!("[req:{}] Returning {} image(s)", request_id, result.images.len());
    Ok(HttpResponse::Ok().json(UploadResponse::from(result)))
}

/// `POST /refine`: same photo, new free-text instruction, structured answers ignored.
pub async fn refine(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4();
    let form = UploadForm::read(payload, state.max_photo_bytes)
        .await
        .map_err(|e| {
            log::warn!("[req:{}] Rejected /refine: {}", request_id, e);
            e
        })?;

    let instruction = form.fields.custom_prompt.unwrap_or_default();
    log::info!("[req:{}] /refine instruction={:?}", request_id, instruction);

    let result = state
        .orchestrator
        .refine(form.photo, &instruction, form.output_format)
        .await
        .map_err(|e| {
            log::error!("[req:{}] Error in /refine: {}", request_id, e);
            e
        })?;

    Ok(HttpResponse::Ok().json(UploadResponse::from(result)))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
