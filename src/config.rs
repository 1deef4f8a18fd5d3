use anyhow::Context;
use serde::Deserialize;

/// How sessions are represented on the wire.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    /// Short-lived access token plus a stored, rotating refresh token.
    Dual,
    /// A single access token; no refresh flow.
    Single,
}

impl std::str::FromStr for TokenMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dual" => Ok(TokenMode::Dual),
            "single" => Ok(TokenMode::Single),
            other => anyhow::bail!("unknown JWT_MODE {other:?} (expected dual or single)"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub mode: TokenMode,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
    pub rotate_refresh: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub endpoint: Option<String>,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_url: String,
    pub folder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
    pub products_require_auth: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing required keys fail here,
    /// so a half-configured process never starts serving.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let parsed = |key: &str| lookup(key).and_then(|v| v.parse::<i64>().ok());
        let flag = |key: &str| {
            lookup(key)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        let mode = match lookup("JWT_MODE") {
            Some(v) => v.parse::<TokenMode>()?,
            None => TokenMode::Dual,
        };
        let default_ttl = match mode {
            TokenMode::Dual => 15,
            TokenMode::Single => 60,
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: or("JWT_ISSUER", "storefront"),
            audience: or("JWT_AUDIENCE", "storefront-users"),
            mode,
            ttl_minutes: parsed("JWT_ACCESS_TTL_MINUTES").unwrap_or(default_ttl),
            refresh_ttl_minutes: parsed("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 7),
            rotate_refresh: flag("JWT_ROTATE_REFRESH"),
        };

        let endpoint = lookup("MEDIA_ENDPOINT").filter(|v| !v.is_empty());
        let bucket = required("MEDIA_BUCKET")?;
        let region = or("MEDIA_REGION", "us-east-1");
        let public_url = lookup("MEDIA_PUBLIC_URL").unwrap_or_else(|| match &endpoint {
            Some(e) => format!("{}/{}", e.trim_end_matches('/'), bucket),
            None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
        });
        let media = MediaConfig {
            endpoint,
            access_key: required("MEDIA_ACCESS_KEY")?,
            secret_key: required("MEDIA_SECRET_KEY")?,
            public_url: public_url.trim_end_matches('/').to_string(),
            folder: or("MEDIA_FOLDER", "product"),
            bucket,
            region,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => 10,
        };

        Ok(Self {
            host: or("APP_HOST", "0.0.0.0"),
            port: or("APP_PORT", "8080").parse().context("APP_PORT must be a port number")?,
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            jwt,
            media,
            products_require_auth: flag("PRODUCTS_REQUIRE_AUTH"),
        })
    }
}
