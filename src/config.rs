use std::env;

/// Process-wide configuration, read once at startup and handed to the
/// router state. Nothing below this layer touches the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub completion_base_url: String,
    pub completion_model: String,
    pub max_output_tokens: u32,
    pub esbuild_bin: String,
    pub blob_base_url: String,
    pub blob_token: String,
    /// Used only when a request carries no `apiKey` field.
    pub fallback_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080),
            completion_base_url: env::var("COMPLETION_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            completion_model: env::var("COMPLETION_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            max_output_tokens: env::var("MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2048),
            esbuild_bin: env::var("ESBUILD_BIN").unwrap_or_else(|_| "esbuild".to_string()),
            blob_base_url: env::var("BLOB_STORE_URL")
                .unwrap_or_else(|_| "https://blob.vercel-storage.com".to_string()),
            blob_token: env::var("BLOB_STORE_TOKEN").unwrap_or_default(),
            fallback_api_key: env::var("COMPLETION_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}
