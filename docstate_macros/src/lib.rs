mod diff;
mod document;

use proc_macro::TokenStream;

/// Derive macro that implements `docstate::Document` for a struct.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Default, Serialize, Deserialize, Document)]
/// #[document(collection = "products")]
/// struct Product {
///     #[serde(rename = "_id")]
///     pub id: DocumentId,
///     pub name: String,
/// }
/// ```
///
/// The identifier field is the one marked `#[document(id)]`, falling back to a
/// field named `id`. Without `collection = "..."` the collection name is the
/// snake_case struct name plus `s`.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}

/// Derive macro that implements `docstate::Diff` with an explicit
/// field-by-field comparison.
///
/// Every named field participates unless it is marked `#[diff(skip)]` or
/// `#[serde(skip)]`. Field types must implement `PartialEq` and `Serialize`.
///
/// ```ignore
/// #[derive(Clone, PartialEq, Serialize, Diff)]
/// struct Category {
///     #[diff(skip)]
///     pub id: DocumentId,
///     pub name: String,
///     pub index: u32,
/// }
/// ```
#[proc_macro_derive(Diff, attributes(diff))]
pub fn derive_diff(input: TokenStream) -> TokenStream {
    diff::derive_diff(input)
}
