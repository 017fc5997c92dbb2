//! HTTP request representation.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::headers::{find_header, Headers};
use crate::parser::method::Method;
use crate::parser::query::parse_query_string;
use crate::parser::request_line::RequestLine;
use crate::parser::version::HttpVersion;

/// A decoded request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// No body was read, either because the route does not ask for one or
    /// because `Content-Length` was zero.
    #[default]
    Empty,
    /// Bytes with a content type the decoder does not interpret.
    Raw(Vec<u8>),
    /// An `application/json` body.
    Json(serde_json::Value),
    /// An `application/x-www-form-urlencoded` body.
    Form(HashMap<String, String>),
}

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path, without the query string
    pub path: String,
    /// The raw query string
    pub query_string: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The headers the route asked to save
    pub headers: Headers,
    /// Query parameters decoded from the query string
    pub query_params: HashMap<String, String>,
    /// Named path captures, in pattern order
    pub path_params: Vec<(String, String)>,
    /// The request body, if the route declares a body contract
    pub body: Body,
}

impl HttpRequest {
    /// Build a request from its parsed request line and saved headers.
    pub fn new(line: RequestLine, headers: Headers) -> Self {
        let query_params = parse_query_string(&line.query_string);
        Self {
            method: line.method,
            path: line.path,
            query_string: line.query_string,
            version: line.version,
            headers,
            query_params,
            path_params: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Get a header value, ignoring case.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        find_header(&self.headers, name)
    }

    /// Check if a header was saved.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Get a path capture by name.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter value.
    pub fn get_query_param(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Check if a query parameter exists.
    pub fn has_query_param(&self, name: &str) -> bool {
        self.query_params.contains_key(name)
    }

    /// Check if the request carried a decoded JSON body.
    pub fn is_json(&self) -> bool {
        matches!(self.body, Body::Json(_))
    }

    /// Deserialize the decoded JSON body.
    ///
    /// A raw body is parsed as JSON too, so handlers can opt into JSON for
    /// clients that send a different content type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match &self.body {
            Body::Json(value) => Ok(T::deserialize(value)?),
            Body::Raw(bytes) => Ok(serde_json::from_slice(bytes)?),
            _ => Err(Error::InvalidBody("request has no JSON body".to_string())),
        }
    }

    /// The decoded form fields, if the body was urlencoded.
    pub fn form(&self) -> Option<&HashMap<String, String>> {
        match &self.body {
            Body::Form(fields) => Some(fields),
            _ => None,
        }
    }
}
