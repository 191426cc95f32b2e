//! Shoe Scout - shoe search aggregator
//!
//! The library holds both halves of the system: the client pipeline that
//! validates a filter form, queries the search service and renders the
//! results, and the search service that scrapes each retailer's catalog.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{build_query, FilterForm, Notifier, ResultTable, RetailerPanel, SearchClient, SearchOutcome};
pub use models::{FilterQuery, Retailer, ShoeRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let outcome = SearchOutcome::from_body(br#"[{"name":"A","price":10,"image":"i.png","url":"u"}]"#).unwrap();
        let records: Vec<ShoeRecord> = match outcome {
            SearchOutcome::Results(records) => records,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert!(records[0].sizes().is_empty());

        let panel = RetailerPanel::new("daf".parse::<Retailer>().unwrap(), FilterForm::new());
        assert_eq!(panel.query(), "store=daf");
    }
}
