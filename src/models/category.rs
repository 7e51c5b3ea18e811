use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{DocumentId, InsertMode, Schema};
use crate::store::Filter;
use crate::{Diff, Document};

/// One node of a category chain materialized from breadcrumbs.
///
/// Categories are shared by name: names are stored lower-cased, and saving a
/// category whose name already exists updates that record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Document, Diff)]
#[document(collection = "categories")]
#[serde(default)]
pub struct Category {
    #[serde(rename = "_id")]
    #[diff(skip)]
    pub id: DocumentId,
    /// Source document the chain was built from.
    pub product_id: DocumentId,
    pub name: String,
    /// Position within the source's breadcrumb trail.
    pub index: u32,
    /// Previous category in the chain. A root stores either nothing or its own id.
    pub parent_id: Option<DocumentId>,
    #[serde(rename = "dateCreated")]
    #[diff(skip)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(rename = "dateModified")]
    #[diff(skip)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Category {
    /// A category with a case-normalized name.
    pub fn named(name: &str, index: u32) -> Self {
        Category {
            name: name.to_lowercase(),
            index,
            ..Category::default()
        }
    }

    /// The parent category; `None` for a root, whichever way the root is stored.
    pub fn parent(&self) -> Option<DocumentId> {
        self.parent_id.filter(|parent| *parent != self.id)
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

impl Schema for Category {
    fn natural_key(&self) -> Filter {
        Filter::new().eq("name", self.name.to_lowercase())
    }

    fn normalize(&mut self) {
        self.name = self.name.to_lowercase();
    }

    fn insert_mode() -> InsertMode {
        InsertMode::Upsert
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.date_created = Some(at);
    }

    fn stamp_modified(&mut self, at: DateTime<Utc>) {
        self.date_modified = Some(at);
    }

    fn adopt(&mut self, existing: &Self) {
        self.id = existing.id;
        self.date_created = existing.date_created;
        self.date_modified = existing.date_modified;
    }
}
