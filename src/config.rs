use crate::error::AppError;

const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub session_secret: String,
    pub cors_origin: Option<String>,
    pub host: String,
    pub port: u16,
    pub production: bool,
}

impl Config {
    pub fn init() -> Result<Config, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("MONGODB_URI")
            .ok_or_else(|| AppError::ConfigError("MONGODB_URI must be set".to_string()))?;
        let session_secret = lookup("SESSION_SECRET")
            .ok_or_else(|| AppError::ConfigError("SESSION_SECRET must be set".to_string()))?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::ConfigError(format!(
                "SESSION_SECRET must be at least {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| AppError::ConfigError(format!("Invalid PORT value: {}", e)))?,
            None => 4000,
        };

        let cors_origin = lookup("CORS_ORIGIN")
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty() && origin != "*");

        Ok(Config {
            database_url,
            database_name: lookup("MONGODB_DB").unwrap_or_else(|| "tuiter".to_string()),
            session_secret,
            cors_origin,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            production: lookup("ENVIRONMENT")
                .map(|env| env.eq_ignore_ascii_case("PRODUCTION"))
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "an-adequately-long-session-secret-value";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("SESSION_SECRET", SECRET),
        ]))
        .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_name, "tuiter");
        assert!(config.cors_origin.is_none());
        assert!(!config.production);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DB", "tuiter_dev"),
            ("SESSION_SECRET", SECRET),
            ("CORS_ORIGIN", "http://localhost:3000"),
            ("PORT", "8080"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "tuiter_dev");
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));
        assert!(config.production);
    }

    #[test]
    fn test_wildcard_origin_means_any() {
        let config = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("SESSION_SECRET", SECRET),
            ("CORS_ORIGIN", "*"),
        ]))
        .unwrap();
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_missing_or_invalid_values() {
        let err = Config::from_lookup(lookup(&[("SESSION_SECRET", SECRET)])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("SESSION_SECRET", "short"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("SESSION_SECRET", SECRET),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
