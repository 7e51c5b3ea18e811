//! Hierarchy Materializer - turns breadcrumb trails into linked categories.
//!
//! Every uncategorized source document (product or article) is walked in
//! two passes:
//!
//! 1. each breadcrumb becomes a saved `Category` (name lower-cased, `index`
//!    its position in the trail) so that it owns a real identifier;
//! 2. each category is re-saved with its parent: the previous category in
//!    the trail, or for the root either its own identifier or nothing,
//!    depending on `CategoryConfig::root_parent`.
//!
//! The source is then marked categorized with the root as its primary
//! category.
//!
//! Processing is sequential and not transactional. A failure stops the batch;
//! categories already saved for the failing source stay in the store, and a
//! rerun picks the source up again because it is still uncategorized.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::RootParent;
use crate::document::{DocumentId, Schema};
use crate::error::ModelError;
use crate::models::{Breadcrumb, Category};
use crate::store::{DocumentStore, Filter};
use crate::tracked::{ModelContext, Tracked};

/// A document whose breadcrumbs can be materialized into categories.
pub trait Categorizable: Schema {
    fn breadcrumbs(&self) -> &[Breadcrumb];

    fn is_categorized(&self) -> bool;

    /// Flag as processed and link the primary (root) category.
    fn mark_categorized(&mut self, primary: Option<DocumentId>);

    /// Selects the documents still waiting for materialization.
    fn uncategorized() -> Filter {
        Filter::new().eq("isCategorized", false)
    }
}

/// Categories created for one source document, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedSource {
    pub source_id: DocumentId,
    pub categories: Vec<DocumentId>,
}

/// Sources fully processed by a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub sources: Vec<MaterializedSource>,
}

impl MaterializeReport {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.sources.iter().map(|source| source.categories.len()).sum()
    }
}

/// A run stopped part way.
///
/// `completed` lists the sources finished before the failure. `created`
/// lists categories already saved for the failing source; they are not
/// rolled back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("categorization stopped: {cause}")]
pub struct MaterializeError {
    /// The failing source; `None` when selecting the batch failed.
    pub source_id: Option<DocumentId>,
    pub created: Vec<DocumentId>,
    pub completed: MaterializeReport,
    #[source]
    pub cause: ModelError,
}

/// Batch job linking uncategorized sources to category chains.
pub struct CategoryMaterializer<S> {
    ctx: ModelContext<S>,
    root_parent: RootParent,
}

impl<S: DocumentStore> CategoryMaterializer<S> {
    /// Uses the root linkage configured on the context.
    pub fn new(ctx: ModelContext<S>) -> Self {
        let root_parent = ctx.config().categories.root_parent;
        CategoryMaterializer { ctx, root_parent }
    }

    pub fn with_root_parent(mut self, root_parent: RootParent) -> Self {
        self.root_parent = root_parent;
        self
    }

    /// Materialize every uncategorized `P`.
    pub fn run<P: Categorizable>(&self) -> Result<MaterializeReport, MaterializeError> {
        let mut report = MaterializeReport::default();

        let sources: Vec<Tracked<P, S>> =
            self.ctx
                .query(&P::uncategorized())
                .map_err(|cause| MaterializeError {
                    source_id: None,
                    created: Vec::new(),
                    completed: MaterializeReport::default(),
                    cause,
                })?;
        debug!(collection = P::COLLECTION, count = sources.len(), "selected uncategorized documents");

        for mut source in sources {
            let source_id = source.id();
            let mut created = Vec::new();
            if let Err(cause) = self.materialize(&mut source, &mut created) {
                return Err(MaterializeError {
                    source_id: Some(source_id),
                    created,
                    completed: report,
                    cause,
                });
            }
            info!(
                collection = P::COLLECTION,
                id = %source_id,
                categories = created.len(),
                "categorized document"
            );
            report.sources.push(MaterializedSource {
                source_id,
                categories: created,
            });
        }

        Ok(report)
    }

    /// Materialize a single source, whatever its categorized flag.
    ///
    /// Ids of saved categories are pushed to `created` as they are saved. A
    /// label repeated within the trail (case-insensitively) is only linked at
    /// its first position.
    pub fn materialize<P: Categorizable>(
        &self,
        source: &mut Tracked<P, S>,
        created: &mut Vec<DocumentId>,
    ) -> Result<(), ModelError> {
        let source_id = source.id();

        let mut chain: Vec<Tracked<Category, S>> = Vec::with_capacity(source.breadcrumbs().len());
        let mut seen = HashSet::new();
        for (index, crumb) in source.breadcrumbs().iter().enumerate() {
            // A repeated label would resolve to the same record and loop the chain.
            if !seen.insert(crumb.name.to_lowercase()) {
                debug!(id = %source_id, name = %crumb.name, index, "skipping repeated breadcrumb");
                continue;
            }
            let mut category = self.ctx.track(Category {
                product_id: source_id,
                ..Category::named(&crumb.name, index as u32)
            });
            category.save()?;
            created.push(category.id());
            chain.push(category);
        }

        let mut previous: Option<DocumentId> = None;
        for category in chain.iter_mut() {
            let id = category.id();
            category.parent_id = match previous {
                Some(parent) => Some(parent),
                None => match self.root_parent {
                    RootParent::SelfReference => Some(id),
                    RootParent::Detached => None,
                },
            };
            category.save()?;
            previous = Some(id);
        }

        source.mark_categorized(chain.first().map(|root| root.id()));
        source.save()?;
        Ok(())
    }
}

/// Materialize every uncategorized `P` with the context's configuration.
pub fn materialize_categories<P: Categorizable, S: DocumentStore>(
    ctx: &ModelContext<S>,
) -> Result<MaterializeReport, MaterializeError> {
    CategoryMaterializer::new(ctx.clone()).run::<P>()
}
