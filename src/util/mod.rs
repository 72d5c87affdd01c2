//! Utility types shared across the crate.

mod secret;

pub use secret::SecretString;

use std::fmt::Display;

/// Builder for URL query strings.
///
/// Keys and values are percent-encoded as they are added.
///
/// # Example
/// ```ignore
/// let query = QueryBuilder::new()
///     .param("page", 1)
///     .optional("state", Some("open"))
///     .optional("labels", None::<&str>)
///     .build();
/// // Returns "?page=1&state=open"
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a new empty query builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((
            urlencoding::encode(key).into_owned(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    /// Add a parameter only if a value is present.
    pub fn optional<T: Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// True if no parameters were added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Build the query string.
    ///
    /// Returns an empty string if no parameters were added,
    /// otherwise "?key1=value1&key2=value2...".
    pub fn build(self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert_eq!(QueryBuilder::new().build(), "");
        assert!(QueryBuilder::new().is_empty());
    }

    #[test]
    fn test_params_and_optionals() {
        let query = QueryBuilder::new()
            .param("page", 2)
            .optional("state", Some("open"))
            .optional("labels", None::<&str>)
            .build();
        assert_eq!(query, "?page=2&state=open");
    }

    #[test]
    fn test_encoding() {
        let query = QueryBuilder::new()
            .param("q", "a b&c")
            .param("tag name", "x/y")
            .build();
        assert_eq!(query, "?q=a%20b%26c&tag%20name=x%2Fy");
    }
}
