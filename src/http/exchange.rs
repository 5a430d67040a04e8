//! Request/response handle passed through the router to handlers.
//!
//! # Responsibilities
//! - Carry the buffered request (method, URI, headers, body) to handlers
//! - Accumulate the response (status, headers, body) written by
//!   interceptors and handlers
//! - Convert into an axum response once routing is done
//!
//! # Design Decisions
//! - Matching uses the URI path only; the query string stays available to
//!   handlers through [`Exchange::uri`]
//! - Writes append, so an interceptor banner and the handler output combine

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{request, HeaderMap, Method, Response, StatusCode, Uri};

use crate::routing::RouteRequest;

const X_REQUEST_ID: &str = "x-request-id";

/// One in-flight HTTP request and the response being built for it.
#[derive(Debug)]
pub struct Exchange {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Vec<u8>,
}

impl Exchange {
    /// Wrap buffered request parts. The response starts as an empty 200.
    pub fn new(parts: request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Vec::new(),
        }
    }

    pub fn http_method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Request ID assigned by the server middleware, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.insert(name, value);
    }

    /// Append to the response body.
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) {
        self.response_body.extend_from_slice(chunk.as_ref());
    }

    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.response_body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.response_headers;
        response
    }
}

impl RouteRequest for Exchange {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path(&self) -> &str {
        self.uri.path()
    }
}

/// Default not-found responder: 404 with no body requirement.
pub fn not_found(exchange: &mut Exchange) {
    exchange.set_status(StatusCode::NOT_FOUND);
}
