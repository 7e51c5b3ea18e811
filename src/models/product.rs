use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::company::extract_company_name;
use super::shared::{AdditionalProperty, AggregateRating, Breadcrumb, Gtin, Offer};
use crate::document::{DocumentId, ExtractionError, Schema};
use crate::hierarchy::Categorizable;
use crate::store::Filter;
use crate::{Diff, Document};

/// A crawled product page.
///
/// Identified logically by canonical URL plus description: a re-crawl of the
/// same page updates the stored product instead of inserting a duplicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Document, Diff)]
#[document(collection = "products")]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    #[diff(skip)]
    pub id: DocumentId,
    pub url: String,
    pub canonical_url: String,
    /// Derived from `canonical_url` on first insert.
    #[diff(skip)]
    pub company_name: String,
    pub probability: f64,
    pub name: String,
    pub offers: Vec<Offer>,
    pub sku: String,
    pub mpn: String,
    pub brand: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub main_image: String,
    pub images: Vec<String>,
    pub description: String,
    pub description_html: String,
    #[serde(rename = "additionalProperty")]
    pub additional_properties: Vec<AdditionalProperty>,
    pub aggregate_rating: AggregateRating,
    pub gtins: Vec<Gtin>,
    pub color: String,
    pub style: String,
    #[diff(skip)]
    pub is_categorized: bool,
    #[diff(skip)]
    pub primary_category: Option<DocumentId>,
    #[diff(skip)]
    pub date_created: Option<DateTime<Utc>>,
    #[diff(skip)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Schema for Product {
    fn natural_key(&self) -> Filter {
        Filter::new()
            .eq("canonicalUrl", self.canonical_url.as_str())
            .eq("description", self.description.as_str())
    }

    fn before_insert(&mut self) -> Result<(), ExtractionError> {
        self.company_name = extract_company_name(&self.canonical_url)?;
        self.is_categorized = false;
        Ok(())
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.date_created = Some(at);
    }

    fn stamp_modified(&mut self, at: DateTime<Utc>) {
        self.date_modified = Some(at);
    }

    fn adopt(&mut self, existing: &Self) {
        self.id = existing.id;
        self.company_name = existing.company_name.clone();
        self.is_categorized = existing.is_categorized;
        self.primary_category = existing.primary_category;
        self.date_created = existing.date_created;
        self.date_modified = existing.date_modified;
    }
}

impl Categorizable for Product {
    fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    fn is_categorized(&self) -> bool {
        self.is_categorized
    }

    fn mark_categorized(&mut self, primary: Option<DocumentId>) {
        self.is_categorized = true;
        self.primary_category = primary;
    }
}
