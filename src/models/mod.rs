// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Price, Retailer, ShoeRecord, UnknownRetailer};
pub use requests::FilterQuery;
pub use responses::{ErrorResponse, HealthResponse};
