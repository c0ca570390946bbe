/// Factory: build `TokenValidator` from application `Config`.
use std::sync::Arc;

use anyhow::Context;

use crate::config::AuthConfig;
use crate::services::auth::{TokenValidator, keys::KeySource};

pub fn build_token_validator(config: &AuthConfig) -> anyhow::Result<Arc<TokenValidator>> {
    let keys = KeySource::from_config(&config.key_source, config.algorithm)
        .context("failed to build the token key source")?;

    tracing::info!(
        issuer = %config.issuer,
        audience = %config.audience,
        algorithm = ?config.algorithm,
        keys = ?keys,
        "token validator ready"
    );

    Ok(Arc::new(TokenValidator::new(config, keys)))
}
