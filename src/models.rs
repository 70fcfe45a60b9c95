use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query parameter {0:?} is not valid UTF-8 once decoded")]
    InvalidUtf8(String),
}

// form decoding: '+' is a space, then percent escapes
fn decode_component(raw: &str) -> Result<String, QueryError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| QueryError::InvalidUtf8(raw.to_string()))
}

// Query parameters of one request, in the order the caller sent them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    // Repeated names collapse: last value wins, first position is kept
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (name, value) in pairs {
            params.insert(name, value);
        }
        params
    }

    // Parses a raw query string. Escapes that don't decode to UTF-8 are rejected
    // rather than replaced, so distinct byte strings never share a cache key.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let mut params = Self::default();
        for segment in raw.split('&').filter(|s| !s.is_empty()) {
            let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
            params.insert(decode_component(name)?, decode_component(value)?);
        }
        Ok(params)
    }

    pub fn insert(&mut self, name: String, value: String) {
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

// Body returned when the currency API can't be reached
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub code: u16,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                code,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn keeps_caller_order() {
        let params = QueryParams::from_pairs(vec![pair("source", "USD"), pair("currencies", "EUR")]);
        assert_eq!(params.pairs(), &[pair("source", "USD"), pair("currencies", "EUR")]);
    }

    #[test]
    fn repeated_name_takes_last_value() {
        let params = QueryParams::from_pairs(vec![
            pair("source", "USD"),
            pair("currencies", "EUR"),
            pair("source", "GBP"),
        ]);
        assert_eq!(params.pairs(), &[pair("source", "GBP"), pair("currencies", "EUR")]);
    }

    #[test]
    fn parse_decodes_form_encoding() {
        let params = QueryParams::parse("source=USD&currencies=GBP%2CEUR&note=a+b&flag").unwrap();
        assert_eq!(
            params.pairs(),
            &[
                pair("source", "USD"),
                pair("currencies", "GBP,EUR"),
                pair("note", "a b"),
                pair("flag", ""),
            ]
        );
    }

    #[test]
    fn parse_keeps_literal_plus_and_empty_query() {
        let params = QueryParams::parse("amount=%2B10").unwrap();
        assert_eq!(params.pairs(), &[pair("amount", "+10")]);
        assert_eq!(QueryParams::parse("").unwrap(), QueryParams::default());
        assert_eq!(QueryParams::parse("&&").unwrap(), QueryParams::default());
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        assert_eq!(
            QueryParams::parse("source=%FF"),
            Err(QueryError::InvalidUtf8("%FF".to_string()))
        );
        assert!(QueryParams::parse("%FE=USD").is_err());
        // valid multi-byte escapes still decode
        assert_eq!(
            QueryParams::parse("symbol=%E2%82%AC").unwrap().pairs(),
            &[pair("symbol", "€")]
        );
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(ErrorBody::new("Currency API is not available", 502)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": {"message": "Currency API is not available", "code": 502}})
        );
    }
}
