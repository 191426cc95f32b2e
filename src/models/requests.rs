use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters accepted by `GET /filter`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FilterQuery {
    #[serde(default)]
    #[validate(length(max = 64))]
    pub orderby: String,
    #[serde(rename = "searchSize", default)]
    #[validate(length(max = 64))]
    pub search_size: String,
    #[serde(rename = "searchColor", default)]
    #[validate(length(max = 64))]
    pub search_color: String,
    #[serde(rename = "searchHeel", default)]
    #[validate(length(max = 64))]
    pub search_heel: String,
    #[serde(rename = "searchCat", default)]
    #[validate(length(max = 64))]
    pub search_cat: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub store: String,
}

impl FilterQuery {
    /// Query string forwarded to retailers that accept the same filter keys
    pub fn filter_string(&self) -> String {
        format!(
            "orderby={}&searchSize={}&searchColor={}&searchHeel={}&searchCat={}",
            urlencoding::encode(&self.orderby),
            urlencoding::encode(&self.search_size),
            urlencoding::encode(&self.search_color),
            urlencoding::encode(&self.search_heel),
            urlencoding::encode(&self.search_cat),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_string_keeps_key_order() {
        let query = FilterQuery {
            orderby: "Newest".to_string(),
            search_size: "23".to_string(),
            search_cat: "148".to_string(),
            store: "daf".to_string(),
            ..Default::default()
        };
        assert_eq!(
            query.filter_string(),
            "orderby=Newest&searchSize=23&searchColor=&searchHeel=&searchCat=148"
        );
    }

    #[test]
    fn test_store_required() {
        let query = FilterQuery::default();
        assert!(query.validate().is_err());
    }
}
