use log::warn;

/// Runtime configuration, read once from the environment. A `.env` file is
/// honored when present so local runs match deployed ones.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        if gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set - AI generation will be unavailable");
        }

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());

        Self {
            gemini_api_key,
            gemini_model,
        }
    }
}
