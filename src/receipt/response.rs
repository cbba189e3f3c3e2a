//! Endpoint envelope and fence stripping

use serde::Deserialize;

use crate::error::{JayloyError, JayloyResult};

use super::parsed::ParsedReceipt;

/// Body returned by the receipt endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointResponse {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Remove a surrounding markdown code fence (with or without a language tag)
///
/// ```
/// use jayloy::receipt::strip_code_fences;
/// assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the first newline
        body = match rest.find('\n') {
            Some(newline) if rest[..newline].chars().all(|c| c.is_ascii_alphanumeric()) => {
                &rest[newline + 1..]
            }
            _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Decode one endpoint body into a parsed receipt
pub fn decode_response(body: &str) -> JayloyResult<ParsedReceipt> {
    let response: EndpointResponse = serde_json::from_str(body)
        .map_err(|e| JayloyError::Receipt(format!("invalid endpoint response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(JayloyError::Receipt(error));
    }

    let description = response
        .description
        .ok_or_else(|| JayloyError::Receipt("response has no description".into()))?;

    serde_json::from_str(strip_code_fences(&description))
        .map_err(|e| JayloyError::Receipt(format!("description is not valid JSON: {}", e)))
}

/// Decode several bodies independently; one failure never affects the others
pub fn decode_batch<I, S>(bodies: I) -> Vec<JayloyResult<ParsedReceipt>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    bodies
        .into_iter()
        .map(|body| decode_response(body.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(description: &str) -> String {
        serde_json::json!({ "description": description }).to_string()
    }

    #[test]
    fn test_strip_plain_and_tagged_fences() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```json\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("```json{}```"), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }

    #[test]
    fn test_fenced_payload_parses() {
        let body = envelope(
            "```json\n{\"vendor\": \"Brown Coffee\", \"type\": \"EXPENSE\", \"date\": \"2025-02-03\", \"total_amount\": 4.5, \"items\": []}\n```",
        );

        let receipt = decode_response(&body).unwrap();
        assert_eq!(receipt.vendor.as_deref(), Some("Brown Coffee"));
        assert_eq!(receipt.total_amount, Some(4.5));
    }

    #[test]
    fn test_error_envelope() {
        let err = decode_response(r#"{"error": "No image provided"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse receipt: No image provided");
    }

    #[test]
    fn test_unparseable_description() {
        let err = decode_response(&envelope("Sorry, I cannot read this receipt")).unwrap_err();
        assert!(matches!(err, JayloyError::Receipt(_)));
    }

    #[test]
    fn test_non_json_body() {
        assert!(decode_response("<html>502 Bad Gateway</html>").is_err());
    }

    #[test]
    fn test_batch_failures_are_isolated() {
        let bodies = vec![
            envelope(r#"{"vendor": "A", "total_amount": 1}"#),
            r#"{"error": "timeout"}"#.to_string(),
            envelope(r#"{"vendor": "C", "total_amount": 3}"#),
        ];

        let results = decode_batch(&bodies);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(
            results[2].as_ref().unwrap().vendor.as_deref(),
            Some("C")
        );
    }
}
