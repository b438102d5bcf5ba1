use serde::{Deserialize, Serialize};

/// What the `payload` field holds: component source text, or the URL of an
/// externally hosted screenshot of the UI to mimic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Code,
    Image,
}

// Every field defaults so that a missing payload surfaces as the documented
// 400, not as a deserialization rejection.
#[derive(Debug, Deserialize, Clone)]
pub struct CompileRequest {
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompileResponse {
    pub html: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}
