use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name} url {value:?}: {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{name} url must be http or https, got {value:?}")]
    UnsupportedScheme { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub endpoint: Url,
    pub covers: Url,
}

impl Config {
    pub fn new(endpoint: &str, covers: &str) -> Result<Config, ConfigError> {
        Ok(Config {
            endpoint: parse_url("search", endpoint)?,
            covers: parse_url("covers", covers)?,
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.to_owned(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme {
            name,
            value: value.to_owned(),
        }),
    }
}
