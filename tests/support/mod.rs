//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod recording_store;

use docstate::{Breadcrumb, ModelConfig, ModelContext, Product};

pub use recording_store::{Op, RecordingStore};

pub fn context() -> ModelContext<RecordingStore> {
    ModelContext::new(RecordingStore::new(), ModelConfig::default())
}

pub fn context_with(config: ModelConfig) -> ModelContext<RecordingStore> {
    ModelContext::new(RecordingStore::new(), config)
}

pub fn product(canonical_url: &str, description: &str) -> Product {
    Product {
        url: canonical_url.to_string(),
        canonical_url: canonical_url.to_string(),
        description: description.to_string(),
        ..Product::default()
    }
}

pub fn product_with_breadcrumbs(canonical_url: &str, crumbs: &[&str]) -> Product {
    Product {
        breadcrumbs: crumbs
            .iter()
            .map(|name| Breadcrumb::new(name, canonical_url))
            .collect(),
        ..product(canonical_url, "")
    }
}
