//! HTTP-backed categorizer client.
//!
//! Talks to an external categorization endpoint over JSON. The wire format
//! uses camelCase keys; the mapping structs below are private to this
//! module so the rest of the crate only sees the domain types.

use std::str::FromStr;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::{StatementType, TransactionType};

use super::{CategorizationRequest, Categorizer, CategorySuggestion};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestRequest<'a> {
    description: &'a str,
    amount: String,
    existing_categories: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    business_context: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestResponse {
    category: String,
    confidence: f64,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    statement_type: Option<String>,
    #[serde(default)]
    vendor: Option<String>,
}

/// Categorizer backed by a remote suggestion endpoint.
#[derive(Debug, Clone)]
pub struct HttpCategorizer {
    client: Client,
    endpoint: String,
}

impl HttpCategorizer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl Categorizer for HttpCategorizer {
    async fn suggest(&self, request: &CategorizationRequest) -> Result<CategorySuggestion> {
        let body = SuggestRequest {
            description: &request.description,
            amount: request.amount.to_string(),
            existing_categories: &request.existing_categories,
            business_context: request.business_context.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("categorizer request failed")?
            .error_for_status()
            .context("categorizer returned an error status")?
            .json::<SuggestResponse>()
            .await
            .context("categorizer returned malformed JSON")?;

        // Unrecognized type strings are dropped rather than failing the
        // suggestion; the category alone is still useful.
        Ok(CategorySuggestion {
            category: response.category,
            confidence: response.confidence.clamp(0.0, 1.0),
            kind: response
                .kind
                .as_deref()
                .and_then(|value| TransactionType::from_str(value).ok()),
            statement_type: response
                .statement_type
                .as_deref()
                .and_then(|value| StatementType::from_str(value).ok()),
            vendor: response.vendor.filter(|name| !name.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "category": "Meals & Entertainment",
        "confidence": 0.92,
        "type": "expense",
        "statementType": "profit_loss",
        "vendor": "Starbucks"
    }"#;

    #[test]
    fn parses_a_full_response() {
        let response: SuggestResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        assert_eq!(response.category, "Meals & Entertainment");
        assert_eq!(response.kind.as_deref(), Some("expense"));
        assert_eq!(response.statement_type.as_deref(), Some("profit_loss"));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let response: SuggestResponse =
            serde_json::from_str(r#"{"category": "Rent", "confidence": 0.5}"#).unwrap();
        assert_eq!(response.category, "Rent");
        assert!(response.kind.is_none());
        assert!(response.vendor.is_none());
    }

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let categories = vec!["Rent".to_string()];
        let body = SuggestRequest {
            description: "Coffee Shop",
            amount: "-4.50".to_string(),
            existing_categories: &categories,
            business_context: Some("small cafe supplier"),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"existingCategories\""));
        assert!(json.contains("\"businessContext\""));
    }
}
