use serde_json::Value;

/// Equality filter over serialized field names.
///
/// Field names are the names a document has in the store (after serde
/// renames), e.g. `canonicalUrl` rather than `canonical_url`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// A filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate against a serialized document. Missing fields never match.
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| doc.get(field.as_str()) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_anything() {
        assert!(Filter::new().matches(&json!({"a": 1})));
    }

    #[test]
    fn all_clauses_must_match() {
        let filter = Filter::new().eq("name", "laptops").eq("index", 1);
        assert!(filter.matches(&json!({"name": "laptops", "index": 1})));
        assert!(!filter.matches(&json!({"name": "laptops", "index": 2})));
    }

    #[test]
    fn missing_field_does_not_match() {
        let filter = Filter::new().eq("isCategorized", false);
        assert!(!filter.matches(&json!({"name": "x"})));
    }
}
