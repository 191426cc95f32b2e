use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use shoe_scout::config::Settings;
use shoe_scout::routes::{self, AppState};
use shoe_scout::services::{build_http_client, AnnsClient, CacheManager, DafClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_tracing(&log_level, &log_format);

    info!("Starting Shoe Scout search service...");

    let http = build_http_client(&settings.scrape).map_err(|e| {
        error!("Failed to build HTTP client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let max_concurrency = settings.scrape.max_concurrency;
    let anns = AnnsClient::new(http.clone(), settings.anns.clone(), max_concurrency);
    let daf = DafClient::new(http, settings.daf.clone(), max_concurrency);

    info!("Retailer clients initialized (max {} concurrent requests each)", max_concurrency);

    // Redis is optional; fall back to the in-process cache
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(256);

    let cache = match CacheManager::new(settings.cache.redis_url.as_deref(), l1_cache_size, cache_ttl).await {
        Ok(c) => {
            info!(
                "Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
                l1_cache_size,
                cache_ttl,
                c.has_l2()
            );
            Arc::new(c)
        }
        Err(e) => {
            error!("Failed to connect to Redis ({}), caching in-process only", e);
            Arc::new(CacheManager::local(l1_cache_size, cache_ttl))
        }
    };

    let app_state = AppState { anns, daf, cache };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
