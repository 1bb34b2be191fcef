//
//  churchtools-cli
//  api/common/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Replayable request descriptions.
//!
//! A `reqwest::RequestBuilder` is consumed when sent and cannot always be
//! cloned (multipart bodies are streams). The transport therefore keeps an
//! [`ApiRequest`] and builds a fresh `RequestBuilder` for every attempt, which
//! is what lets a rate-limited request be retried verbatim and a paginated
//! request be re-issued with the same parameters and headers.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

/// Header carrying the session's CSRF token.
pub const CSRF_HEADER: &str = "CSRF-Token";

/// Module path of the legacy AJAX surface.
pub const AJAX_MODULE: &str = "churchservice/ajax";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Form(Vec<(String, String)>),
    Json(Value),
    File(FilePart),
}

/// A single file sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    /// Creates a request. `path` is either relative to the base URL
    /// (`/api/songs`) or an absolute `http(s)://` URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// A legacy action request: `POST /?q=churchservice/ajax&func=<func>`
    /// with a form-encoded body.
    pub fn ajax(func: &str, fields: Vec<(String, String)>) -> Self {
        Self::post("/")
            .query("q", AJAX_MODULE)
            .query("func", func)
            .form(fields)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Repeats `key` once per value, e.g. `ids[]=1&ids[]=2`.
    pub fn query_list<V: ToString>(mut self, key: &str, values: &[V]) -> Self {
        for value in values {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.body = RequestBody::File(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            bytes,
        });
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    pub fn url(&self, base_url: &str) -> String {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else if self.path.starts_with('/') {
            format!("{}{}", base_url, self.path)
        } else {
            format!("{}/{}", base_url, self.path)
        }
    }

    /// Whether the request targets the session's site rather than a
    /// foreign absolute URL.
    pub fn is_on_site(&self, base_url: &str) -> bool {
        let url = self.url(base_url);
        match url.strip_prefix(base_url) {
            Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
            None => false,
        }
    }

    /// Builds a sendable request. Session headers are applied first so
    /// that per-call headers override them. The CSRF token only goes to
    /// the session's site.
    pub(crate) fn build(&self, http: &Client, base_url: &str, csrf_token: Option<&str>) -> RequestBuilder {
        let mut builder = http.request(self.method.clone(), self.url(base_url));

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }

        if let Some(token) = csrf_token.filter(|_| self.is_on_site(base_url)) {
            if !self.has_header(CSRF_HEADER) {
                builder = builder.header(CSRF_HEADER, token);
            }
        }

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Json(body) => builder.json(body),
            RequestBody::File(part) => {
                let file = Part::bytes(part.bytes.clone()).file_name(part.file_name.clone());
                builder.multipart(Form::new().part(part.field.clone(), file))
            }
        }
    }
}

/// Builds a form body from `(name, value)` pairs.
pub fn form_fields<I, K, V>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base() {
        let request = ApiRequest::get("/api/songs");
        assert_eq!(request.url("https://church.example"), "https://church.example/api/songs");

        let absolute = ApiRequest::get("https://files.example/download/1");
        assert_eq!(absolute.url("https://church.example"), "https://files.example/download/1");
    }

    #[test]
    fn test_ajax_request_shape() {
        let request = ApiRequest::ajax("getAllSongs", Vec::new());
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/");
        assert_eq!(
            request.query_pairs(),
            &[
                ("q".to_string(), "churchservice/ajax".to_string()),
                ("func".to_string(), "getAllSongs".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_list_repeats_key() {
        let request = ApiRequest::get("/api/persons").query_list("ids[]", &[1, 2]);
        assert_eq!(request.query_pairs().len(), 2);
        assert!(request.query_pairs().iter().all(|(k, _)| k == "ids[]"));
    }

    #[test]
    fn test_has_header_is_case_insensitive() {
        let request = ApiRequest::get("/api/whoami").header("csrf-token", "X");
        assert!(request.has_header(CSRF_HEADER));
    }

    #[test]
    fn test_is_on_site() {
        let base = "https://church.example";
        assert!(ApiRequest::get("/api/files/1").is_on_site(base));
        assert!(ApiRequest::get("https://church.example/exports/1.zip").is_on_site(base));
        assert!(!ApiRequest::get("https://church.example.evil/x").is_on_site(base));
        assert!(!ApiRequest::get("https://files.example/download/1").is_on_site(base));
    }

    #[test]
    fn test_form_fields() {
        let fields = form_fields([("id", 3), ("count", 2)]);
        assert_eq!(fields[0], ("id".to_string(), "3".to_string()));
    }
}
