//! Value types embedded in crawled documents.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offer {
    pub price: String,
    pub currency: String,
    pub availability: String,
}

impl Offer {
    pub fn new(price: &str, currency: &str, availability: &str) -> Self {
        Offer {
            price: price.to_string(),
            currency: currency.to_string(),
            availability: availability.to_string(),
        }
    }
}

/// One label of a navigation trail, root first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breadcrumb {
    pub name: String,
    pub link: String,
}

impl Breadcrumb {
    pub fn new(name: &str, link: &str) -> Self {
        Breadcrumb {
            name: name.to_string(),
            link: link.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalProperty {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregateRating {
    pub rating_value: f64,
    pub best_rating: f64,
    pub review_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gtin {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}
