use std::collections::BTreeMap;

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::error;

const FALLBACK_BODY: &str =
    "{\n\t\"error\": \"the server encountered a problem and could not process your request\"\n}\n";

/// A JSON response whose body is `{ key: data }`, tab-indented and
/// newline-terminated.
pub struct Envelope<T> {
    status: StatusCode,
    key: &'static str,
    data: T,
    headers: HeaderMap,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(status: StatusCode, key: &'static str, data: T) -> Self {
        Self {
            status,
            key,
            data,
            headers: HeaderMap::new(),
        }
    }

    pub fn ok(key: &'static str, data: T) -> Self {
        Self::new(StatusCode::OK, key, data)
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let wrapped: BTreeMap<&str, &T> = BTreeMap::from([(self.key, &self.data)]);

        match to_pretty_json(&wrapped) {
            Ok(body) => (
                self.status,
                self.headers,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                error!("failed to encode response: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "application/json")],
                    FALLBACK_BODY,
                )
                    .into_response()
            }
        }
    }
}

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
