pub mod form;
pub mod handlers;

use actix_cors::Cors;
use actix_web::{http::StatusCode, middleware, web, App, HttpResponse, HttpServer, ResponseError};

use crate::{
    config::Config,
    error::ThumbnailError,
    models::ErrorResponse,
    orchestrator::ThumbnailOrchestrator,
    providers::GenAiClient,
};

/// Shared by every worker. Holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ThumbnailOrchestrator,
    pub max_photo_bytes: usize,
}

impl AppState {
    pub fn new(orchestrator: ThumbnailOrchestrator, max_photo_bytes: usize) -> Self {
        Self {
            orchestrator,
            max_photo_bytes,
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/upload", web::post().to(handlers::upload))
        .route("/refine", web::post().to(handlers::refine))
        .route("/health", web::get().to(handlers::health));
}

impl ResponseError for ThumbnailError {
    fn status_code(&self) -> StatusCode {
        match self {
            ThumbnailError::MissingPhoto | ThumbnailError::InvalidForm(_) => {
                StatusCode::BAD_REQUEST
            }
            ThumbnailError::PhotoTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::from_error(self))
    }
}

pub async fn run(config: Config, clients: GenAiClient) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(
        clients.orchestrator(),
        config.server.max_photo_bytes(),
    ));
    let bind = (config.server.host().to_string(), config.server.port());

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::new("%r %s %Dms"))
            .app_data(state.clone())
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await
}
