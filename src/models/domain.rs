use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retailer whose catalog is being searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Anns,
    Daf,
}

impl Retailer {
    pub const ALL: [Retailer; 2] = [Retailer::Anns, Retailer::Daf];

    /// Identifier sent as the `store` query key
    pub fn id(&self) -> &'static str {
        match self {
            Retailer::Anns => "anns",
            Retailer::Daf => "daf",
        }
    }

    /// Name shown in the retailer column and the shop-name display
    pub fn display_name(&self) -> &'static str {
        match self {
            Retailer::Anns => "Ann's",
            Retailer::Daf => "D+AF",
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown store: {0}")]
pub struct UnknownRetailer(pub String);

impl FromStr for Retailer {
    type Err = UnknownRetailer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anns" => Ok(Retailer::Anns),
            "daf" => Ok(Retailer::Daf),
            other => Err(UnknownRetailer(other.to_string())),
        }
    }
}

/// Price as sent by the backend: either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(n) => write!(f, "{}", n),
            Price::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Price::Number(value.into())
    }
}

impl From<String> for Price {
    fn from(value: String) -> Self {
        Price::Text(value)
    }
}

/// One catalog item returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoeRecord {
    #[serde(rename = "listID", default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub url: String,
    #[serde(default)]
    pub size: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<Vec<String>>,
}

impl ShoeRecord {
    /// Sizes currently offered, empty when unknown
    pub fn sizes(&self) -> &[String] {
        self.size.as_deref().unwrap_or(&[])
    }

    /// Colors currently offered, empty when unknown
    pub fn colors(&self) -> &[String] {
        self.color.as_deref().unwrap_or(&[])
    }

    /// Exact match against one of the offered sizes
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes().iter().any(|s| s == size)
    }
}
