//! Wire types of the redaction service protocol.

use serde::{Deserialize, Serialize};

/// Geometry as it travels to the redaction service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<(f64, f64)>> },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestFeature {
    pub id: String,
    pub geometry: Geometry,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RedactionRequest {
    pub features: Vec<RequestFeature>,
    pub k_threshold: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RedactionResponse {
    pub ids_to_hide: Vec<String>,
}
