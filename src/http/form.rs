//! URL-encoded form parsing.
//!
//! Values from an `application/x-www-form-urlencoded` body come first,
//! followed by values from the query string. Keys may repeat.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while parsing form data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Body is not valid UTF-8.
    #[error("Form body is not valid UTF-8")]
    InvalidBody,

    /// A key or value decodes to invalid UTF-8.
    #[error("Invalid percent-encoding in `{0}`")]
    InvalidEncoding(String),
}

/// Parsed form values, multi-valued per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    values: BTreeMap<String, Vec<String>>,
}

impl Form {
    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate keys in sorted order with all their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append all pairs of an encoded string (`a=1&b=2`).
    pub fn extend_encoded(&mut self, encoded: &str) -> Result<(), FormError> {
        for pair in encoded.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key)?;
            let value = decode_component(value)?;
            self.values.entry(key).or_default().push(value);
        }
        Ok(())
    }
}

/// Parse a single encoded string into a form.
pub fn parse_urlencoded(encoded: &str) -> Result<Form, FormError> {
    let mut form = Form::default();
    form.extend_encoded(encoded)?;
    Ok(form)
}

fn decode_component(raw: &str) -> Result<String, FormError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| FormError::InvalidEncoding(raw.to_string()))
}
