/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - Token Validator の鍵ソース (static PEM / JWKS URL) を決定する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where token signing keys come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySourceConfig {
    /// A single verification key, selected by `kid`.
    Static { key_id: String, key_material: String },
    /// A JSON Web Key Set fetched over HTTP.
    Jwks { url: Url, cache_ttl: Duration },
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub algorithm: Algorithm,
    pub leeway_seconds: u64,
    pub key_source: KeySourceConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth = AuthConfig::from_vars(&lookup)?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth,
        })
    }
}

impl AuthConfig {
    fn from_vars<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // AUTH0_DOMAIN=example.eu.auth0.com gives the tenant defaults
        let auth0_domain = lookup("AUTH0_DOMAIN")
            .map(|d| d.trim().trim_end_matches('/').to_string())
            .filter(|d| !d.is_empty());

        let issuer = lookup("AUTH_ISSUER")
            .or_else(|| auth0_domain.as_ref().map(|d| format!("https://{}/", d)))
            .ok_or(ConfigError::Missing("AUTH_ISSUER"))?;

        let audience = lookup("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let algorithm = match lookup("AUTH_ALGORITHM") {
            Some(name) => Algorithm::from_str(name.trim())
                .map_err(|_| ConfigError::Invalid("AUTH_ALGORITHM"))?,
            None => Algorithm::RS256,
        };

        let leeway_seconds = lookup("ACCESS_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let cache_ttl = Duration::from_secs(
            lookup("AUTH_JWKS_CACHE_TTL_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(300),
        );

        let jwks_url = lookup("AUTH_JWKS_URL").or_else(|| {
            auth0_domain
                .as_ref()
                .map(|d| format!("https://{}/.well-known/jwks.json", d))
        });

        let key_source = match (jwks_url, lookup("AUTH_PUBLIC_KEY_PEM")) {
            (Some(url), _) => KeySourceConfig::Jwks {
                url: Url::parse(&url).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?,
                cache_ttl,
            },
            (None, Some(pem)) => KeySourceConfig::Static {
                key_id: lookup("AUTH_KEY_ID").ok_or(ConfigError::Missing("AUTH_KEY_ID"))?,
                key_material: pem.replace("\\n", "\n"),
            },
            (None, None) => return Err(ConfigError::Missing("AUTH_JWKS_URL")),
        };

        Ok(Self {
            issuer,
            audience,
            algorithm,
            leeway_seconds,
            key_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn auth0_domain_fills_issuer_and_jwks_url() {
        let config = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/drinks"),
            ("AUTH0_DOMAIN", "coffee.eu.auth0.com"),
            ("AUTH_AUDIENCE", "drinks"),
        ]))
        .unwrap();

        assert_eq!(config.auth.issuer, "https://coffee.eu.auth0.com/");
        assert_eq!(config.auth.algorithm, Algorithm::RS256);
        assert_eq!(config.addr.port(), 3000);
        match config.auth.key_source {
            KeySourceConfig::Jwks { url, cache_ttl } => {
                assert_eq!(
                    url.as_str(),
                    "https://coffee.eu.auth0.com/.well-known/jwks.json"
                );
                assert_eq!(cache_ttl, Duration::from_secs(300));
            }
            other => panic!("unexpected key source: {other:?}"),
        }
    }

    #[test]
    fn static_key_requires_key_id() {
        let err = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/drinks"),
            ("AUTH_ISSUER", "https://issuer.test/"),
            ("AUTH_AUDIENCE", "drinks"),
            ("AUTH_ALGORITHM", "EdDSA"),
            ("AUTH_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----"),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::Missing("AUTH_KEY_ID"));
    }

    #[test]
    fn static_key_unescapes_newlines() {
        let config = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/drinks"),
            ("AUTH_ISSUER", "https://issuer.test/"),
            ("AUTH_AUDIENCE", "drinks"),
            ("AUTH_ALGORITHM", "EdDSA"),
            ("AUTH_KEY_ID", "k1"),
            ("AUTH_PUBLIC_KEY_PEM", "line1\\nline2"),
        ]))
        .unwrap();

        assert_eq!(config.auth.algorithm, Algorithm::EdDSA);
        assert_eq!(
            config.auth.key_source,
            KeySourceConfig::Static {
                key_id: "k1".to_string(),
                key_material: "line1\nline2".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unknown_algorithm_and_missing_key_source() {
        let err = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/drinks"),
            ("AUTH_ISSUER", "https://issuer.test/"),
            ("AUTH_AUDIENCE", "drinks"),
            ("AUTH_ALGORITHM", "none"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_ALGORITHM"));

        let err = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/drinks"),
            ("AUTH_ISSUER", "https://issuer.test/"),
            ("AUTH_AUDIENCE", "drinks"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("AUTH_JWKS_URL"));
    }
}
