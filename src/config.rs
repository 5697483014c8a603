use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
    pub environment: String,
    pub max_connections: u32,
    pub query_timeout: Duration,
}

impl Config {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://courses.db?mode=rwc".to_string());
        let environment =
            env::var("COURSE_API_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            addr: parse_var("COURSE_API_ADDR", SocketAddr::from(([127, 0, 0, 1], 4000)))?,
            environment,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            query_timeout: Duration::from_secs(parse_var("DB_QUERY_TIMEOUT_SECS", 3)?),
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_var_falls_back_to_default() {
        let timeout: u64 = parse_var("COURSE_API_TEST_UNSET_TIMEOUT", 3).unwrap();
        assert_eq!(timeout, 3);
    }

    #[test]
    fn set_value_is_parsed() {
        let timeout: u64 =
            parse_value("DB_QUERY_TIMEOUT_SECS", Some(" 10 ".to_string()), 3).unwrap();
        assert_eq!(timeout, 10);
    }

    #[test]
    fn bad_value_names_the_key() {
        let err = parse_value::<u32>("DB_MAX_CONNECTIONS", Some("many".to_string()), 5)
            .unwrap_err();

        match &err {
            ConfigError::Invalid { key, value } => {
                assert_eq!(*key, "DB_MAX_CONNECTIONS");
                assert_eq!(value, "many");
            }
        }
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }
}
