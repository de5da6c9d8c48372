use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Normalized recommendation request, as forwarded to the upstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub mood: String,
    #[serde(default)]
    pub constraints: Constraints,
}

/// Hard filters. An absent `constraints` object is `{ "genres": [] }`.
///
/// The numeric fields are integral JSON numbers with no range limit, so a
/// value the caller sent is forwarded without being clamped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_runtime: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<Number>,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// One element of the upstream response. Responses are relayed untouched,
/// this type only documents their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub genres: Vec<String>,
    pub runtime: u32,
    pub explanation: String,
}
