use axum::http::HeaderMap;
use derive_more::Display;
use serde::Serialize;
use serde_json::Value;

pub const SECRET_FIELD: &str = "secret";
pub const SECRET_HEADER: &str = "x-secret";
pub const SECRET_PARAM: &str = "secret";

/// A token offered by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateToken {
    Text(String),
    /// A truthy body field that is not a string, e.g. `{"secret": 123}`.
    /// It wins over the header and query but can never match.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenSource {
    #[display("json body")]
    Body,
    #[display("header")]
    Header,
    #[display("query")]
    Query,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub ok: bool,
}

impl CandidateToken {
    /// Picks the candidate from the first source that yields one:
    /// the JSON body, then the `X-Secret` header, then the query string.
    pub fn resolve(
        body: Option<&Value>,
        headers: &HeaderMap,
        query: &[(String, String)],
    ) -> Option<(TokenSource, CandidateToken)> {
        body.and_then(Self::from_body)
            .map(|token| (TokenSource::Body, token))
            .or_else(|| Self::from_header(headers).map(|token| (TokenSource::Header, token)))
            .or_else(|| Self::from_query(query).map(|token| (TokenSource::Query, token)))
    }

    /// Falsy field values (`null`, `false`, `0`, `""`, `[]`, `{}`) and
    /// non-object bodies count as absent.
    pub fn from_body(body: &Value) -> Option<CandidateToken> {
        let field = body.as_object()?.get(SECRET_FIELD)?;

        match field {
            Value::String(s) if !s.is_empty() => Some(CandidateToken::Text(s.clone())),
            Value::String(_) | Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Array(items) if items.is_empty() => None,
            Value::Object(map) if map.is_empty() => None,
            _ => Some(CandidateToken::Opaque),
        }
    }

    /// Header bytes are decoded as latin-1, so obs-text (0x80-0xFF) maps
    /// to U+0080-U+00FF. An empty value counts as absent.
    pub fn from_header(headers: &HeaderMap) -> Option<CandidateToken> {
        headers
            .get(SECRET_HEADER)
            .map(|value| value.as_bytes())
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| CandidateToken::Text(bytes.iter().map(|&b| char::from(b)).collect()))
    }

    /// The first `secret` parameter is taken as-is, even when empty.
    pub fn from_query(query: &[(String, String)]) -> Option<CandidateToken> {
        query
            .iter()
            .find(|(key, _)| key == SECRET_PARAM)
            .map(|(_, value)| CandidateToken::Text(value.clone()))
    }
}
