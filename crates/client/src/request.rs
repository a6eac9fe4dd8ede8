//! Request descriptors.
//!
//! A request travels through the client as an owned descriptor rather than a
//! mutable reqwest builder, so the recovery path can produce an explicit
//! replay copy instead of stamping hidden state onto a caller-owned object.

use reqwest::Method;

/// Free-form per-call options accepted by every verb method.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers appended after the `Authorization` header.
    pub headers: Vec<(String, String)>,

    /// Query string pairs.
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append a query pair.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// An outgoing request plus its retry marker.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the client's base URL.
    pub path: String,
    /// JSON body, if the verb carries one.
    pub body: Option<serde_json::Value>,
    /// Per-call headers and query pairs.
    pub options: RequestOptions,
    retried: bool,
}

impl RequestDescriptor {
    /// Describe a request with no body and default options.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
            retried: false,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach per-call options.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether this descriptor has already been replayed after a refresh.
    #[must_use]
    pub fn retried(&self) -> bool {
        self.retried
    }

    /// Produce the replay descriptor. Consumes the original so a request can
    /// never be resubmitted twice.
    #[must_use]
    pub fn mark_retried(mut self) -> Self {
        self.retried = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_is_not_retried() {
        let descriptor = RequestDescriptor::new(Method::GET, "/listings");
        assert!(!descriptor.retried());
        assert!(descriptor.body.is_none());
    }

    #[test]
    fn mark_retried_sets_the_marker() {
        let descriptor = RequestDescriptor::new(Method::GET, "/listings").mark_retried();
        assert!(descriptor.retried());
    }

    #[test]
    fn options_builder_accumulates() {
        let options = RequestOptions::new()
            .header("X-Request-Id", "abc")
            .query("page", "2")
            .query("per_page", "50");

        assert_eq!(options.headers.len(), 1);
        assert_eq!(options.query.len(), 2);
    }
}
