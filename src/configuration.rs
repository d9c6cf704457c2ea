use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// bcrypt work factor for stored passwords
    pub password_hash_cost: u32,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    /// Serve from the process-local store instead of Postgres
    #[serde(default)]
    pub in_memory: bool,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// JWT and cookie settings
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_expiry: i64,   // seconds (900 for 15 minutes)
    pub refresh_token_expiry: i64,  // seconds (604800 for 7 days)
    pub issuer: String,
    /// Sets the `Secure` attribute on auth cookies. Off for local http.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl JwtSettings {
    /// Reject settings that would let one key forge the other token kind
    /// or produce an access token outliving its refresh token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret.is_empty() {
            return Err(ConfigError::MissingRequired("jwt.access_token_secret".to_string()));
        }
        if self.refresh_token_secret.is_empty() {
            return Err(ConfigError::MissingRequired("jwt.refresh_token_secret".to_string()));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::InvalidValue(
                "access and refresh token secrets must differ".to_string(),
            ));
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.access_token_expiry must be positive".to_string(),
            ));
        }
        if self.access_token_expiry >= self.refresh_token_expiry {
            return Err(ConfigError::InvalidValue(
                "access token lifetime must be shorter than refresh token lifetime".to_string(),
            ));
        }
        Ok(())
    }
}

/// Work factor range accepted by bcrypt
const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.application.password_hash_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "application.password_hash_cost must be between {} and {}",
                MIN_HASH_COST,
                MAX_HASH_COST
            )));
        }
        Ok(())
    }
}

/// Loads `configuration.{yaml,toml,json}` from the working directory, then
/// applies `APP__SECTION__KEY` environment overrides
/// (e.g. `APP__JWT__ACCESS_TOKEN_SECRET`).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let settings = settings
        .try_deserialize::<Settings>()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            access_token_secret: "access-secret-at-least-32-characters".to_string(),
            refresh_token_secret: "refresh-secret-at-least-32-characters".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "storefront".to_string(),
            secure_cookies: false,
        }
    }

    #[test]
    fn test_valid_jwt_settings() {
        assert!(jwt_settings().validate().is_ok());
    }

    #[test]
    fn test_shared_secret_rejected() {
        let mut settings = jwt_settings();
        settings.refresh_token_secret = settings.access_token_secret.clone();
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut settings = jwt_settings();
        settings.access_token_secret.clear();
        assert!(matches!(settings.validate(), Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_access_must_expire_before_refresh() {
        let mut settings = jwt_settings();
        settings.access_token_expiry = settings.refresh_token_expiry;
        assert!(settings.validate().is_err());
    }
}
