//! Query string construction for API requests.
//!
//! The API renders list filters as comma-joined values (`levels=1,2,3`) and
//! booleans as lowercase `true`/`false`. Keys are sorted before encoding so a
//! request always produces the same query string.

use std::fmt;

use url::Url;

/// An ordered set of query parameters.
///
/// # Examples
///
/// ```
/// use wanikani_api::Query;
///
/// let mut query = Query::new();
/// query.push("hidden", true);
/// query.push_list("levels", &[1, 2, 3]);
/// assert_eq!(query.encode(), "hidden=true&levels=1%2C2%2C3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no parameters have been added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Adds a single parameter. Booleans render as `true`/`false`.
    pub fn push(&mut self, key: &str, value: impl fmt::Display) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    /// Adds a parameter if the value is present. An absent value leaves the
    /// query untouched, which keeps it distinguishable from an explicit
    /// `false` or `0`.
    pub fn push_opt(&mut self, key: &str, value: Option<impl fmt::Display>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Adds a comma-joined list parameter. An empty slice adds nothing.
    pub fn push_list<T: fmt::Display>(&mut self, key: &str, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let joined = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((key.to_string(), joined));
    }

    /// Adds a comma-joined list parameter if the list is present.
    pub fn push_opt_list<T: fmt::Display>(&mut self, key: &str, values: Option<&[T]>) {
        if let Some(values) = values {
            self.push_list(key, values);
        }
    }

    /// Sets this query on `url`, sorted by key and percent-encoded.
    ///
    /// An empty query leaves the URL without a `?`.
    pub(crate) fn apply(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        let mut pairs = self.pairs.clone();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        url.query_pairs_mut().extend_pairs(pairs);
    }

    /// Renders the query as an encoded string, sorted by key.
    pub fn encode(&self) -> String {
        let mut pairs = self.pairs.clone();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(pairs);
        serializer.finish()
    }
}
