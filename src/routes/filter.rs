use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, FilterQuery, HealthResponse, Retailer, ShoeRecord};
use crate::services::{AnnsClient, CacheError, CacheKey, CacheManager, DafClient, ScrapeError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub anns: AnnsClient,
    pub daf: DafClient,
    pub cache: Arc<CacheManager>,
}

impl AppState {
    async fn scrape(&self, retailer: Retailer, query: &FilterQuery) -> Result<Vec<ShoeRecord>, ScrapeError> {
        match retailer {
            Retailer::Anns => self.anns.search(query).await,
            Retailer::Daf => self.daf.search(query).await,
        }
    }
}

/// Configure the search routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .service(
            web::resource("/filter")
                .route(web::get().to(filter))
                .default_service(web::route().to(method_not_allowed)),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let cache_healthy = state.cache.health_check().await;
    let status = if cache_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(ErrorResponse {
        error: "Method not allowed".to_string(),
        message: "Only GET is supported".to_string(),
        status_code: 405,
    })
}

/// Filter one retailer's catalog
///
/// GET /filter?orderby=&searchSize=23&searchColor=&searchHeel=&searchCat=148&store=daf
///
/// Responds with a JSON array of shoe records; an empty match is `[]`.
async fn filter(state: web::Data<AppState>, query: web::Query<FilterQuery>) -> impl Responder {
    let query = query.into_inner();

    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for filter request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let retailer: Retailer = match query.store.parse() {
        Ok(retailer) => retailer,
        Err(e) => {
            tracing::info!("Rejected filter request: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid store".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let cache_key = CacheKey::filter(&query);
    match state.cache.get::<Vec<ShoeRecord>>(&cache_key).await {
        Ok(shoes) => {
            tracing::debug!("Cache hit for {}", cache_key);
            return HttpResponse::Ok().json(shoes);
        }
        Err(CacheError::CacheMiss(_)) => {}
        Err(CacheError::SerializationError(e)) => {
            tracing::warn!("Evicting unreadable cache entry {}: {}", cache_key, e);
            if let Err(e) = state.cache.delete(&cache_key).await {
                tracing::warn!("Failed to evict {}: {}", cache_key, e);
            }
        }
        Err(e) => tracing::warn!("Cache read failed for {}: {}", cache_key, e),
    }

    tracing::info!("Filtering {} with {}", retailer.display_name(), query.filter_string());

    match state.scrape(retailer, &query).await {
        Ok(shoes) => {
            tracing::info!("{} returned {} shoes", retailer.display_name(), shoes.len());
            if let Err(e) = state.cache.set(&cache_key, &shoes).await {
                tracing::warn!("Failed to cache results for {}: {}", cache_key, e);
            }
            HttpResponse::Ok().json(shoes)
        }
        Err(e) if e.is_bad_request() => {
            tracing::info!("Bad filter for {}: {}", retailer.display_name(), e);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid filter".to_string(),
                message: e.to_string(),
                status_code: 400,
            })
        }
        Err(e) => {
            tracing::error!("Failed to scrape {}: {}", retailer.display_name(), e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch products".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
