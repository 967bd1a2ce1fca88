// Request description shared by every service operation.
//
// An operation fills in a `RequestBuilder` (verb, path template, parameters,
// optional JSON body); the base service resolves it against the service URL
// and sends it.

use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::error::Error;

/// A fully described, not yet resolved API request.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    template: &'static str,
    operation_id: &'static str,
    path_params: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    accept_json: bool,
}

impl RequestBuilder {
    /// `template` uses `{name}` placeholders, e.g. `/v1/zones/{zone_id}`.
    pub fn new(method: Method, template: &'static str, operation_id: &'static str) -> Self {
        Self {
            method,
            template,
            operation_id,
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            accept_json: false,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn operation_id(&self) -> &'static str {
        self.operation_id
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn accepts_json(&self) -> bool {
        self.accept_json
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn path_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path_params.push((name, value.into()));
        self
    }

    pub fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present.
    pub fn query_opt<T: ToString>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.header(name, value),
            None => self,
        }
    }

    /// Caller-supplied headers; applied after the operation's own headers.
    pub fn custom_headers(mut self, headers: &HashMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Expect a JSON response body (`Accept: application/json`).
    pub fn accept_json(mut self) -> Self {
        self.accept_json = true;
        self
    }

    /// Attach a JSON body. Fields left as `None` are skipped by the models.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        let value = serde_json::to_value(body).map_err(|e| Error::Validation {
            field: "body".into(),
            reason: e.to_string(),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Resolve the path template and query parameters against `base`.
    ///
    /// Path parameter values are percent-encoded as single segments; an
    /// empty value is rejected since it would address a different resource.
    pub fn resolve_url(&self, base: &Url) -> Result<Url, Error> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::Validation {
                field: "service_url".into(),
                reason: format!("{base} cannot be used as a base URL"),
            })?;
            segments.pop_if_empty();

            for raw in self.template.split('/').filter(|s| !s.is_empty()) {
                match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = self
                            .path_params
                            .iter()
                            .find(|(param, _)| *param == name)
                            .map(|(_, value)| value.as_str())
                            .unwrap_or_default();
                        if value.is_empty() {
                            return Err(Error::required(name));
                        }
                        segments.push(value);
                    }
                    None => {
                        segments.push(raw);
                    }
                }
            }

            if self.template.ends_with('/') {
                segments.push("");
            }
        }

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }
}
