//! Convenience builder for HTTP query parameters.

use std::fmt::Display;

/// Builder for assembling query parameter pairs, skipping absent values.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a key/value pair only when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("page", Option::<u32>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_and_push_opt_collect_in_order() {
        let mut params = QueryParams::new();
        params.push("page", 2u32);
        params.push_opt("per_page", Some(25u32));
        assert_eq!(
            params.into_pairs(),
            vec![("page", "2".to_string()), ("per_page", "25".to_string())]
        );
    }
}
