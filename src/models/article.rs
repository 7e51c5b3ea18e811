use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::company::extract_company_name;
use super::shared::Breadcrumb;
use crate::document::{DocumentId, ExtractionError, Schema};
use crate::hierarchy::Categorizable;
use crate::store::Filter;
use crate::{Diff, Document};

/// A crawled article page, identified logically by its canonical URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Document, Diff)]
#[document(collection = "articles")]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    #[diff(skip)]
    pub id: DocumentId,
    pub url: String,
    #[diff(skip)]
    pub company_name: String,
    pub probability: f64,
    pub headline: String,
    pub date_published: Option<DateTime<Utc>>,
    pub date_published_raw: String,
    pub date_modified_raw: String,
    pub author: String,
    pub authors_list: Vec<String>,
    pub in_language: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub main_image: String,
    pub images: Vec<String>,
    pub description: String,
    pub article_body: String,
    #[serde(rename = "articleBodyHtml")]
    pub article_body_html: String,
    pub canonical_url: String,
    #[diff(skip)]
    pub is_categorized: bool,
    #[diff(skip)]
    pub primary_category: Option<DocumentId>,
    #[diff(skip)]
    pub date_created: Option<DateTime<Utc>>,
    #[diff(skip)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Schema for Article {
    fn natural_key(&self) -> Filter {
        Filter::new().eq("canonicalUrl", self.canonical_url.as_str())
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

impl Categorizable for Article {
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
