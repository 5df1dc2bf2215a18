//! Request/response contract of the Gemini `generateContent` endpoint, limited
//! to what the attraction query needs: a text prompt, a structured-output
//! schema, and the decoding of the returned JSON document.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::QueryError;
use crate::model::{Attraction, AttractionId, Category, Coordinate, RouteRequest};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_HEADER: &str = "x-goog-api-key";

const MAX_RATING: f64 = 5.0;

#[derive(Clone)]
pub struct GeminiConfig {
    api_key: String,
    model: String,
    api_root: String,
}

impl GeminiConfig {
    /// Resolves the configuration from optional raw values. A missing or
    /// blank key is rejected here, before any request is built.
    pub fn from_values(
        api_key: Option<&str>,
        model: Option<&str>,
        api_root: Option<&str>,
    ) -> Result<Self, QueryError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(QueryError::MissingApiKey)?;
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL);
        let api_root = api_root
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_API_ROOT)
            .trim_end_matches('/');

        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            api_root: api_root.to_string(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_root, self.model)
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_root", &self.api_root)
            .finish()
    }
}

pub fn build_prompt(request: &RouteRequest) -> String {
    format!(
        "I am planning a road trip from {start} to {end}.\n\
         Please identify 6 to 10 major tourist attractions, scenic viewpoints, historical sites, \
         or hidden gems that are located geographically ALONG the driving route between these two places.\n\
         Do not list places that are far off the direct route.\n\
         For each place, provide precise coordinates (latitude and longitude).\n\
         Ensure the result includes a mix of nature, history, and culture if possible.",
        start = request.start,
        end = request.end,
    )
}

/// Structured-output schema (OpenAPI subset, upper-case type names) the
/// response must follow.
pub fn response_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "attractions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Name of the attraction" },
                        "description": {
                            "type": "STRING",
                            "description": "Short, exciting description (max 2 sentences)"
                        },
                        "latitude": { "type": "NUMBER", "description": "Latitude" },
                        "longitude": { "type": "NUMBER", "description": "Longitude" },
                        "category": {
                            "type": "STRING",
                            "enum": categories,
                            "description": "Category of the place"
                        },
                        "rating": {
                            "type": "NUMBER",
                            "description": "Estimated rating out of 5 (e.g., 4.5)"
                        }
                    },
                    "required": ["name", "description", "latitude", "longitude", "category"]
                }
            }
        }
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn for_route(request: &RouteRequest) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: Some(build_prompt(request)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: response_schema(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, `None` when there is
    /// nothing to parse.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

/// Suffix shared by every attraction id of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchId(String);

impl BatchId {
    /// `now_millis` is the wall-clock time; a random component keeps two
    /// batches created within the same millisecond apart.
    pub fn new(now_millis: u64) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{now_millis}-{}", &random[..8]))
    }

    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct AttractionsPayload {
    attractions: Vec<RawAttraction>,
}

#[derive(Debug, Deserialize)]
struct RawAttraction {
    name: String,
    description: String,
    latitude: f64,
    longitude: f64,
    category: Category,
    #[serde(default)]
    rating: Option<f64>,
}

/// Parses the structured JSON text and assigns `attr-{index}-{batch}` ids.
pub fn parse_attractions(text: &str, batch: &BatchId) -> Result<Vec<Attraction>, QueryError> {
    let payload: AttractionsPayload = serde_json::from_str(text)?;

    payload
        .attractions
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let coordinate = Coordinate::new(raw.latitude, raw.longitude);
            if !coordinate.is_valid() {
                return Err(QueryError::InvalidAttraction {
                    index,
                    reason: format!(
                        "coordinates out of range ({}, {})",
                        raw.latitude, raw.longitude
                    ),
                });
            }
            if raw.name.trim().is_empty() {
                return Err(QueryError::InvalidAttraction {
                    index,
                    reason: "empty name".into(),
                });
            }
            let rating = raw
                .rating
                .filter(|r| r.is_finite() && (0.0..=MAX_RATING).contains(r));

            Ok(Attraction {
                id: AttractionId::new(format!("attr-{index}-{}", batch.as_str())),
                name: raw.name,
                description: raw.description,
                latitude: raw.latitude,
                longitude: raw.longitude,
                category: raw.category,
                rating,
            })
        })
        .collect()
}

/// Turns a decoded API response into attractions. No text means no results;
/// a blocked prompt is a failure.
pub fn attractions_from_response(
    response: &GenerateContentResponse,
    batch: &BatchId,
) -> Result<Vec<Attraction>, QueryError> {
    if let Some(reason) = response.block_reason() {
        return Err(QueryError::Blocked(reason.to_string()));
    }
    match response.text() {
        Some(text) => parse_attractions(&text, batch),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> RouteRequest {
        RouteRequest::new("Los Angeles", "Grand Canyon").unwrap()
    }

    fn batch() -> BatchId {
        BatchId::from_raw("1700000000000-abcd1234")
    }

    const PAYLOAD: &str = r#"{
        "attractions": [
            {"name": "Joshua Tree", "description": "Desert park.", "latitude": 33.87, "longitude": -115.9, "category": "Nature", "rating": 4.8},
            {"name": "Route 66 Museum", "description": "Roadside history.", "latitude": 34.89, "longitude": -117.02, "category": "History"}
        ]
    }"#;

    #[test]
    fn test_config_requires_api_key() {
        assert!(matches!(
            GeminiConfig::from_values(None, None, None),
            Err(QueryError::MissingApiKey)
        ));
        assert!(matches!(
            GeminiConfig::from_values(Some("  "), None, None),
            Err(QueryError::MissingApiKey)
        ));
    }

    #[test]
    fn test_config_defaults_and_endpoint() {
        let config = GeminiConfig::from_values(Some("secret"), None, None).unwrap();
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_config_overrides_trim_trailing_slash() {
        let config =
            GeminiConfig::from_values(Some("k"), Some("gemini-2.0-pro"), Some("http://localhost:9000/v1/"))
                .unwrap();
        assert_eq!(
            config.endpoint(),
            "http://localhost:9000/v1/models/gemini-2.0-pro:generateContent"
        );
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = GeminiConfig::from_values(Some("super-secret"), None, None).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_prompt_embeds_both_endpoints() {
        let prompt = build_prompt(&route());
        assert!(prompt.contains("from Los Angeles to Grand Canyon"));
        assert!(prompt.contains("6 to 10"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::for_route(&route())).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(
            body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Grand Canyon")
        );
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        let item = &config["responseSchema"]["properties"]["attractions"]["items"];
        assert_eq!(item["properties"]["category"]["enum"].as_array().unwrap().len(), 6);
        let required: Vec<&str> = item["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            required,
            ["name", "description", "latitude", "longitude", "category"]
        );
        assert!(!required.contains(&"rating"));
    }

    #[test]
    fn test_parse_assigns_positional_ids() {
        let attractions = parse_attractions(PAYLOAD, &batch()).unwrap();
        assert_eq!(attractions.len(), 2);
        assert_eq!(attractions[0].id.as_str(), "attr-0-1700000000000-abcd1234");
        assert_eq!(attractions[1].id.as_str(), "attr-1-1700000000000-abcd1234");
        assert_eq!(attractions[0].category, Category::Nature);
        assert_eq!(attractions[0].rating, Some(4.8));
        assert_eq!(attractions[1].rating, None);
    }

    #[test]
    fn test_parse_rejects_missing_required_field() {
        let text = r#"{"attractions": [{"name": "X", "latitude": 1.0, "longitude": 2.0, "category": "Food"}]}"#;
        assert!(matches!(
            parse_attractions(text, &batch()),
            Err(QueryError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let text = r#"{"attractions": [{"name": "X", "description": "d", "latitude": 1.0, "longitude": 2.0, "category": "Shopping"}]}"#;
        assert!(matches!(
            parse_attractions(text, &batch()),
            Err(QueryError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range_coordinates() {
        let text = r#"{"attractions": [{"name": "X", "description": "d", "latitude": 123.0, "longitude": 2.0, "category": "Food"}]}"#;
        assert!(matches!(
            parse_attractions(text, &batch()),
            Err(QueryError::InvalidAttraction { index: 0, .. })
        ));
    }

    #[test]
    fn test_parse_drops_out_of_range_rating() {
        let text = r#"{"attractions": [{"name": "X", "description": "d", "latitude": 1.0, "longitude": 2.0, "category": "Food", "rating": 7.5}]}"#;
        let attractions = parse_attractions(text, &batch()).unwrap();
        assert_eq!(attractions[0].rating, None);
    }

    #[test]
    fn test_parse_requires_attractions_array() {
        assert!(parse_attractions("{}", &batch()).is_err());
        assert!(parse_attractions("not json", &batch()).is_err());
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"attr"}, {"text": "actions\": []}"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"attractions\": []}"));
    }

    #[test]
    fn test_empty_response_yields_no_attractions() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());
        let attractions = attractions_from_response(&response, &batch()).unwrap();
        assert!(attractions.is_empty());

        let blank: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]}))
                .unwrap();
        assert!(attractions_from_response(&blank, &batch()).unwrap().is_empty());
    }

    #[test]
    fn test_blocked_prompt_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(
            attractions_from_response(&response, &batch()),
            Err(QueryError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_batch_ids_differ_within_same_millisecond() {
        let a = BatchId::new(1_700_000_000_000);
        let b = BatchId::new(1_700_000_000_000);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("1700000000000-"));
    }
}
