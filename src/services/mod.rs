// Service exports
pub mod anns;
pub mod cache;
pub mod daf;
pub mod scrape;

pub use anns::AnnsClient;
pub use cache::{CacheError, CacheKey, CacheManager};
pub use daf::DafClient;
pub use scrape::{build_http_client, fan_out, ScrapeError};
