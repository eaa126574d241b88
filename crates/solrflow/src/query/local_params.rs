//! Solr local-params rendering and parsing.
//!
//! Local params are Solr's inline `{!parser key=value …}payload`
//! syntax, embedded inside a single query parameter value. The dense
//! and terms parsers use it to carry their arguments. Argument values
//! must not contain whitespace or braces; the models that render local
//! params only emit values that satisfy this.

use crate::error::{Error, Result};

/// An inline `{!parser k=v …}payload` expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalParams {
    parser: String,
    args: Vec<(String, String)>,
    payload: String,
}

impl LocalParams {
    /// Start a local-params expression for the named query parser.
    #[must_use]
    pub fn new(parser: impl Into<String>) -> Self {
        Self {
            parser: parser.into(),
            args: Vec::new(),
            payload: String::new(),
        }
    }

    /// Append one `key=value` argument; order is preserved and keys
    /// may repeat.
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push((key.into(), value.into()));
        self
    }

    /// Set the payload that follows the closing brace.
    #[must_use]
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Parser name.
    #[must_use]
    pub fn parser_name(&self) -> &str {
        &self.parser
    }

    /// First value for an argument key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for an argument key, in order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.args
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Payload text.
    #[must_use]
    pub fn payload_str(&self) -> &str {
        &self.payload
    }

    /// Render to wire form: `{!parser k=v …}payload`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("{!");
        out.push_str(&self.parser);
        for (key, value) in &self.args {
            out.push(' ');
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out.push('}');
        out.push_str(&self.payload);
        out
    }

    /// Parse a wire-form local-params expression back into its parts.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the input does not start with
    /// `{!`, has no closing brace, or contains a malformed argument
    /// token.
    pub fn parse(input: &str) -> Result<Self> {
        let body = input
            .strip_prefix("{!")
            .ok_or_else(|| Error::decode("local params must start with `{!`", None))?;
        let close = body
            .find('}')
            .ok_or_else(|| Error::decode("local params missing closing `}`", None))?;
        let (header, payload) = body.split_at(close);
        let payload = &payload[1..];

        let mut tokens = header.split_whitespace();
        let parser = tokens
            .next()
            .ok_or_else(|| Error::decode("local params missing parser name", None))?;
        if parser.contains('=') {
            return Err(Error::decode(
                "local params parser name cannot contain `=`",
                None,
            ));
        }

        let mut args = Vec::new();
        for token in tokens {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                Error::decode(format!("malformed local params token `{token}`"), None)
            })?;
            args.push((key.to_string(), value.to_string()));
        }

        Ok(Self {
            parser: parser.to_string(),
            args,
            payload: payload.to_string(),
        })
    }
}

/// Render a vector as Solr's `[v1,v2,...]` literal.
#[must_use]
pub(crate) fn render_vector(vector: &[f32]) -> String {
    let mut out = String::from("[");
    for (i, v) in vector.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out.push(']');
    out
}

/// Parse a `[v1,v2,...]` vector literal.
#[cfg(test)]
pub(crate) fn parse_vector(input: &str) -> Result<Vec<f32>> {
    let inner = input
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| Error::decode("vector literal must be bracketed", None))?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|tok| {
            tok.trim()
                .parse::<f32>()
                .map_err(|e| Error::decode(format!("bad vector component `{tok}`: {e}"), None))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic() {
        let lp = LocalParams::new("knn")
            .arg("f", "film_vector")
            .arg("topK", "10")
            .payload("[0.1,0.2]");
        assert_eq!(lp.render(), "{!knn f=film_vector topK=10}[0.1,0.2]");
    }

    #[test]
    fn test_render_without_args_or_payload() {
        assert_eq!(LocalParams::new("geofilt").render(), "{!geofilt}");
    }

    #[test]
    fn test_parse_recovers_parts() {
        let lp = LocalParams::parse("{!knn f=vec topK=5 preFilter=a:1 preFilter=b:2}[1,2]")
            .unwrap();
        assert_eq!(lp.parser_name(), "knn");
        assert_eq!(lp.get("f"), Some("vec"));
        assert_eq!(lp.get("topK"), Some("5"));
        assert_eq!(lp.get_all("preFilter"), vec!["a:1", "b:2"]);
        assert_eq!(lp.payload_str(), "[1,2]");
    }

    #[test]
    fn test_round_trip() {
        let lp = LocalParams::new("terms")
            .arg("f", "tags")
            .arg("separator", ",")
            .payload("rust,search");
        assert_eq!(LocalParams::parse(&lp.render()).unwrap(), lp);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(LocalParams::parse("knn f=vec").is_err());
        assert!(LocalParams::parse("{!knn f=vec").is_err());
        assert!(LocalParams::parse("{!knn junk}payload").is_err());
    }

    #[test]
    fn test_vector_literal_round_trip() {
        let vector = vec![0.5, -1.25, 3.0];
        let rendered = render_vector(&vector);
        assert_eq!(rendered, "[0.5,-1.25,3]");
        assert_eq!(parse_vector(&rendered).unwrap(), vector);
    }

    #[test]
    fn test_empty_vector_literal() {
        assert_eq!(render_vector(&[]), "[]");
        assert!(parse_vector("[]").unwrap().is_empty());
    }
}
