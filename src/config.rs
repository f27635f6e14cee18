use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Meal estimation strategy. `use_external` is read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    pub use_external: bool,
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            use_external: false,
            api_key: String::new(),
            api_url: "https://api.openai.com".into(),
            model: "gpt-3.5-turbo".into(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodLookupConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for FoodLookupConfig {
    fn default() -> Self {
        Self {
            api_key: "DEMO_KEY".into(),
            api_url: "https://api.nal.usda.gov/fdc/v1".into(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub estimator: EstimatorConfig,
    pub food_lookup: FoodLookupConfig,
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "nutritrack".into()),
            audience: env_or("JWT_AUDIENCE", "nutritrack-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };

        let defaults = EstimatorConfig::default();
        let estimator = EstimatorConfig {
            use_external: env_flag("USE_OPENAI"),
            api_key: env_or("OPENAI_API_KEY", defaults.api_key),
            api_url: env_or("OPENAI_API_URL", defaults.api_url),
            model: env_or("OPENAI_MODEL", defaults.model),
            timeout_secs: env_parse("OPENAI_TIMEOUT_SECS", defaults.timeout_secs),
        };

        let defaults = FoodLookupConfig::default();
        let food_lookup = FoodLookupConfig {
            api_key: env_or("USDA_API_KEY", defaults.api_key),
            api_url: env_or("USDA_API_URL", defaults.api_url),
            timeout_secs: env_parse("USDA_TIMEOUT_SECS", defaults.timeout_secs),
        };

        Ok(Self {
            database_url,
            jwt,
            estimator,
            food_lookup,
        })
    }
}
