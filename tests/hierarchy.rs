//! Integration tests for materializing breadcrumbs into category chains.

mod support;

use docstate::{
    materialize_categories, Article, Breadcrumb, Category, CategoryConfig, CategoryMaterializer,
    DocumentId, ModelConfig, ModelError, Product, RootParent,
};
use support::{context, context_with, product_with_breadcrumbs, Op};

fn load_chain(
    ctx: &docstate::ModelContext<support::RecordingStore>,
    ids: &[DocumentId],
) -> Vec<Category> {
    ids.iter()
        .map(|id| ctx.load::<Category>(*id).unwrap().into_inner())
        .collect()
}

#[test]
fn breadcrumbs_become_a_linked_chain() {
    let ctx = context();
    let mut source = ctx.track(product_with_breadcrumbs(
        "https://shop.example.com/g",
        &["Electronics", "Laptops", "Gaming"],
    ));
    source.save().unwrap();

    let report = materialize_categories::<Product, _>(&ctx).unwrap();
    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.sources[0].source_id, source.id());
    assert_eq!(report.category_count(), 3);

    let ids = &report.sources[0].categories;
    let chain = load_chain(&ctx, ids);
    assert_eq!(
        chain.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["electronics", "laptops", "gaming"]
    );
    assert_eq!(chain.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!(chain.iter().all(|c| c.product_id == source.id()));

    assert_eq!(chain[0].parent_id, Some(chain[0].id));
    assert_eq!(chain[1].parent_id, Some(chain[0].id));
    assert_eq!(chain[2].parent_id, Some(chain[1].id));
    assert!(chain[0].is_root());

    let source = ctx.load::<Product>(source.id()).unwrap();
    assert!(source.is_categorized);
    assert_eq!(source.primary_category, Some(chain[0].id));
}

#[test]
fn detached_root_has_no_parent() {
    let config = ModelConfig {
        categories: CategoryConfig {
            root_parent: RootParent::Detached,
        },
        ..ModelConfig::default()
    };
    let ctx = context_with(config);
    let mut source = ctx.track(product_with_breadcrumbs(
        "https://shop.example.com/g",
        &["Electronics", "Laptops"],
    ));
    source.save().unwrap();

    let report = materialize_categories::<Product, _>(&ctx).unwrap();
    let chain = load_chain(&ctx, &report.sources[0].categories);
    assert_eq!(chain[0].parent_id, None);
    assert_eq!(chain[1].parent_id, Some(chain[0].id));
}

#[test]
fn builder_overrides_configured_root_linkage() {
    let ctx = context();
    let mut source = ctx.track(product_with_breadcrumbs("https://shop.example.com/g", &["Tools"]));
    source.save().unwrap();

    let report = CategoryMaterializer::new(ctx.clone())
        .with_root_parent(RootParent::Detached)
        .run::<Product>()
        .unwrap();
    let chain = load_chain(&ctx, &report.sources[0].categories);
    assert_eq!(chain[0].parent_id, None);
}

#[test]
fn categorized_sources_are_skipped_on_rerun() {
    let ctx = context();
    let mut source = ctx.track(product_with_breadcrumbs(
        "https://shop.example.com/g",
        &["Electronics", "Laptops"],
    ));
    source.save().unwrap();

    materialize_categories::<Product, _>(&ctx).unwrap();
    ctx.store().reset_calls();

    let report = materialize_categories::<Product, _>(&ctx).unwrap();
    assert!(report.is_empty());
    assert_eq!(ctx.store().writes::<Category>(), 0);
    assert_eq!(ctx.store().writes::<Product>(), 0);
}

#[test]
fn shared_names_reuse_one_category() {
    let ctx = context();
    for url in ["https://shop.example.com/a", "https://shop.example.com/b"] {
        let mut source = ctx.track(product_with_breadcrumbs(url, &["Electronics", "Phones"]));
        source.save().unwrap();
    }

    let report = materialize_categories::<Product, _>(&ctx).unwrap();
    assert_eq!(report.sources.len(), 2);
    assert_eq!(ctx.store().count::<Category>(), 2);
    assert_eq!(
        report.sources[0].categories,
        report.sources[1].categories
    );

    // The last source to touch a shared category owns it.
    let chain = load_chain(&ctx, &report.sources[1].categories);
    assert_eq!(chain[0].product_id, report.sources[1].source_id);
}

#[test]
fn repeated_labels_do_not_loop_the_chain() {
    let ctx = context();
    let mut source = ctx.track(product_with_breadcrumbs(
        "https://shop.example.com/g",
        &["Home", "Decor", "home"],
    ));
    source.save().unwrap();

    let report = materialize_categories::<Product, _>(&ctx).unwrap();
    let ids = &report.sources[0].categories;
    assert_eq!(ids.len(), 2);
    assert_eq!(ctx.store().count::<Category>(), 2);

    let chain = load_chain(&ctx, ids);
    assert_eq!(chain[0].name, "home");
    assert_eq!(chain[0].index, 0);
    assert!(chain[0].is_root());
    assert_eq!(chain[1].name, "decor");
    assert_eq!(chain[1].parent(), Some(chain[0].id));
}

#[test]
fn articles_are_materialized_too() {
    let ctx = context();
    let mut article = ctx.track(Article {
        canonical_url: "https://news.example.com/story".into(),
        breadcrumbs: vec![
            Breadcrumb::new("News", "https://news.example.com/"),
            Breadcrumb::new("World", "https://news.example.com/world"),
        ],
        ..Article::default()
    });
    article.save().unwrap();

    let report = materialize_categories::<Article, _>(&ctx).unwrap();
    assert_eq!(report.category_count(), 2);

    let article = ctx.load::<Article>(article.id()).unwrap();
    assert!(article.is_categorized);
    assert_eq!(article.primary_category, Some(report.sources[0].categories[0]));
}

#[test]
fn failure_stops_the_batch_and_keeps_partial_progress() {
    let ctx = context();
    let mut first = ctx.track(product_with_breadcrumbs("https://shop.example.com/a", &["A1", "A2"]));
    first.save().unwrap();
    let mut second =
        ctx.track(product_with_breadcrumbs("https://shop.example.com/b", &["B1", "B2"]));
    second.save().unwrap();

    // A1, A2 and B1 are inserted; B2 fails.
    ctx.store().fail_after::<Category>(Op::Upsert, 3);

    let err = materialize_categories::<Product, _>(&ctx).unwrap_err();
    assert_eq!(err.source_id, Some(second.id()));
    assert_eq!(err.created.len(), 1);
    assert_eq!(err.completed.sources.len(), 1);
    assert_eq!(err.completed.sources[0].source_id, first.id());
    assert!(matches!(
        err.cause,
        ModelError::StoreWriteFailed {
            operation: "upsert",
            schema: "categories",
            ..
        }
    ));

    // B1 stays behind, unlinked, and the source is still pending.
    assert_eq!(ctx.store().count::<Category>(), 3);
    let b1 = ctx.load::<Category>(err.created[0]).unwrap();
    assert_eq!(b1.parent_id, None);
    assert!(!ctx.load::<Product>(second.id()).unwrap().is_categorized);

    ctx.store().clear_failures();
    let report = materialize_categories::<Product, _>(&ctx).unwrap();
    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.sources[0].source_id, second.id());
    assert_eq!(report.sources[0].categories[0], err.created[0]);
    assert_eq!(ctx.store().count::<Category>(), 4);
}

#[test]
fn selection_failure_reports_no_source() {
    let ctx = context();
    ctx.store().fail_after::<Product>(Op::Query, 0);

    let err = materialize_categories::<Product, _>(&ctx).unwrap_err();
    assert_eq!(err.source_id, None);
    assert!(err.created.is_empty());
    assert!(err.completed.is_empty());
}
