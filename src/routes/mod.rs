// Route exports
pub mod filter;

use actix_web::{error, web, HttpRequest};
use crate::models::ErrorResponse;

pub use filter::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(filter::configure);
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}
