use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use rs_lm_core::corpus::DEFAULT_DELIMITER;
use rs_lm_core::io::normalize_folder;

const ENV_HOST: &str = "RS_LM_HOST";
const ENV_PORT: &str = "RS_LM_PORT";
const ENV_DATA_DIR: &str = "RS_LM_DATA_DIR";
const ENV_DELIMITER: &str = "RS_LM_DELIMITER";

/// An environment variable was set but unusable.
#[derive(Debug, Clone, Error)]
#[error("env var {key}={value:?}: {message}")]
pub struct ConfigError {
	key: &'static str,
	value: String,
	message: String,
}

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Folder holding `<name>.txt` corpora.
	pub data_dir: PathBuf,
	/// Sentence delimiter used when loading corpora.
	pub delimiter: char,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self { host: "127.0.0.1".to_owned(), port: 5000, data_dir: PathBuf::from("./data"), delimiter: DEFAULT_DELIMITER }
	}
}

/// Reads and parses `key`; `Ok(None)` when unset.
fn env_parsed<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
	T: std::str::FromStr,
	T::Err: fmt::Display,
{
	let value = match std::env::var(key) {
		Ok(value) => value,
		Err(std::env::VarError::NotPresent) => return Ok(None),
		Err(e) => return Err(ConfigError { key, value: String::new(), message: e.to_string() }),
	};
	match value.parse() {
		Ok(parsed) => Ok(Some(parsed)),
		Err(e) => {
			let message = e.to_string();
			Err(ConfigError { key, value, message })
		}
	}
}

impl ServerConfig {
	/// Builds the configuration from `RS_LM_*` variables, defaulting unset ones.
	pub fn from_env() -> Result<Self, ConfigError> {
		let default = Self::default();
		Ok(Self {
			host: env_parsed::<String>(ENV_HOST)?.unwrap_or(default.host),
			port: env_parsed::<u16>(ENV_PORT)?.unwrap_or(default.port),
			data_dir: env_parsed::<String>(ENV_DATA_DIR)?
				.map(|dir| normalize_folder(&dir))
				.unwrap_or(default.data_dir),
			delimiter: env_parsed::<char>(ENV_DELIMITER)?.unwrap_or(default.delimiter),
		})
	}
}
