use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub scrape: ScrapeSettings,
    #[serde(default)]
    pub anns: AnnsSettings,
    #[serde(default)]
    pub daf: DafSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Settings for the search client pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_success_dismiss_ms")]
    pub success_dismiss_ms: u64,
    /// Discard responses superseded by a newer submission
    #[serde(default)]
    pub guard_stale_responses: bool,
    pub timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            success_dismiss_ms: default_success_dismiss_ms(),
            guard_stale_responses: false,
            timeout_secs: None,
        }
    }
}

fn default_endpoint() -> String { "http://localhost:8080/filter".to_string() }
fn default_success_dismiss_ms() -> u64 { 1500 }

/// Outbound scraping settings shared by all retailers
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeSettings {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Extra PEM root certificate for outbound TLS
    pub ca_cert_path: Option<String>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            ca_cert_path: None,
        }
    }
}

fn default_max_concurrency() -> usize { 30 }
fn default_request_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct AnnsSettings {
    #[serde(default = "default_anns_graphql_url")]
    pub graphql_url: String,
    #[serde(default = "default_anns_detail_url")]
    pub detail_url: String,
    #[serde(default = "default_anns_salepage_url")]
    pub salepage_url: String,
    #[serde(default = "default_anns_stock_url")]
    pub stock_url: String,
    #[serde(default = "default_anns_shop_id")]
    pub shop_id: u32,
    #[serde(default = "default_anns_page_size")]
    pub page_size: u32,
}

impl Default for AnnsSettings {
    fn default() -> Self {
        Self {
            graphql_url: default_anns_graphql_url(),
            detail_url: default_anns_detail_url(),
            salepage_url: default_anns_salepage_url(),
            stock_url: default_anns_stock_url(),
            shop_id: default_anns_shop_id(),
            page_size: default_anns_page_size(),
        }
    }
}

fn default_anns_graphql_url() -> String { "https://fts-api.91app.com/pythia-cdn/graphql".to_string() }
fn default_anns_detail_url() -> String { "https://www.anns.tw/webapi/SalePageV2/GetSalePageV2Info/123/".to_string() }
fn default_anns_salepage_url() -> String { "https://www.anns.tw/SalePage/Index/".to_string() }
fn default_anns_stock_url() -> String {
    "https://www.anns.tw/webapi/ProductStock/GetSellingQtyListNew?v=0&shopId=123&lang=zh-TW".to_string()
}
fn default_anns_shop_id() -> u32 { 123 }
fn default_anns_page_size() -> u32 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct DafSettings {
    #[serde(default = "default_daf_root_url")]
    pub root_url: String,
}

impl Default for DafSettings {
    fn default() -> Self {
        Self { root_url: default_daf_root_url() }
    }
}

fn default_daf_root_url() -> String { "https://www.daf-shoes.com/".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// L2 cache; results are only kept in-process when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_secs: Some(300),
            l1_cache_size: Some(256),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SHOES__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SHOES__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SHOES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_legacy_env(settings)?;

        settings.try_deserialize()
    }
}

/// Honour the plain `PORT` variable used by container platforms
fn apply_legacy_env(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(port) = std::env::var("PORT") {
        if !port.is_empty() {
            builder = builder.set_override("server.port", port)?;
        }
    }

    builder.build()
}
