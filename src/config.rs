//! Client configuration loaded from an `appsettings.json`-shaped file.
//!
//! Only the `AWS.ApiGateway`, `RateLimit`, and `DemoMode` keys are read; sibling sections such as
//! `AWS.S3` are ignored. Absent or empty values fall back to the defaults below. A missing file
//! yields [`ClientConfig::default`]; a file that exists but cannot be read or parsed is an error.

// std
use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{AppId, SharedSecret},
	client::common,
	error::ConfigError,
	http::DEFAULT_TIMEOUT,
	obs,
	throttle::{DEFAULT_LIMIT, DEFAULT_WINDOW},
};

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "appsettings.json";
/// Placeholder service root used until a real deployment is configured.
pub const DEFAULT_BASE_URL: &str = "https://your-api-id.execute-api.us-east-1.amazonaws.com/prod";
/// Application identifier shipped with the client.
pub const DEFAULT_APP_ID: &str = "ppmt-amp-ios-v1";

/// Fully validated client settings.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Service root; endpoint paths are appended to it.
	pub base_url: Url,
	/// Application identifier bound into signatures.
	pub app_id: AppId,
	/// Shared secret; `None` signs with the placeholder secret.
	pub app_secret: Option<SharedSecret>,
	/// Per-request timeout applied by the transport.
	pub request_timeout: Duration,
	/// Client-side throttle settings.
	pub rate_limit: RateLimitConfig,
	/// Serve queries from the offline catalog.
	pub demo_mode: bool,
}
impl ClientConfig {
	/// Loads settings from `path`, falling back to defaults when the file does not exist.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let raw = match std::fs::read_to_string(path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				obs::warn_config_missing(&path.display().to_string());

				return Ok(Self::default());
			},
			Err(source) => return Err(ConfigError::Read { path: path.display().to_string(), source }),
		};

		Self::from_json(&raw, path)
	}

	/// Parses settings from JSON text; `origin` only labels errors.
	pub fn from_json(raw: &str, origin: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		let origin = origin.into();
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let file: SettingsFile = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { path: origin.display().to_string(), source })?;

		Self::try_from(file)
	}

	/// Whether requests will be signed with the placeholder secret.
	pub fn uses_placeholder_secret(&self) -> bool {
		self.app_secret.as_ref().is_none_or(SharedSecret::is_placeholder)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self::try_from(SettingsFile::default())
			.expect("Built-in defaults are valid client settings.")
	}
}
impl TryFrom<SettingsFile> for ClientConfig {
	type Error = ConfigError;

	fn try_from(file: SettingsFile) -> Result<Self, Self::Error> {
		let SettingsFile { aws: AwsSection { api_gateway }, rate_limit, demo_mode } = file;
		let base_url = non_empty(api_gateway.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.into());
		let base_url = Url::parse(&base_url)
			.map_err(|source| ConfigError::InvalidBaseUrl { source })
			.and_then(common::validate_base_url)?;
		let app_id = AppId::new(non_empty(api_gateway.app_id).as_deref().unwrap_or(DEFAULT_APP_ID))?;
		let app_secret = non_empty(api_gateway.app_secret).map(SharedSecret::new);
		let request_timeout = seconds(api_gateway.request_timeout_secs, "RequestTimeoutSecs")?
			.unwrap_or(DEFAULT_TIMEOUT);
		let window = seconds(rate_limit.window_secs, "WindowSecs")?.unwrap_or(DEFAULT_WINDOW);
		let max_requests = match rate_limit.max_requests {
			Some(0) => return Err(ConfigError::NonPositive { field: "MaxRequests" }),
			Some(limit) => limit,
			None => DEFAULT_LIMIT,
		};

		Ok(Self {
			base_url,
			app_id,
			app_secret,
			request_timeout,
			rate_limit: RateLimitConfig { max_requests, window },
			demo_mode: demo_mode.unwrap_or(false),
		})
	}
}

/// Client-side throttle settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
	/// Calls admitted per window.
	pub max_requests: u32,
	/// Window length.
	pub window: Duration,
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { max_requests: DEFAULT_LIMIT, window: DEFAULT_WINDOW }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsFile {
	#[serde(default, rename = "AWS")]
	aws: AwsSection,
	#[serde(default)]
	rate_limit: RateLimitSection,
	#[serde(default)]
	demo_mode: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsSection {
	#[serde(default)]
	api_gateway: ApiGatewaySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiGatewaySection {
	#[serde(default)]
	base_url: Option<String>,
	#[serde(default)]
	app_secret: Option<String>,
	#[serde(default)]
	app_id: Option<String>,
	#[serde(default)]
	request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RateLimitSection {
	#[serde(default)]
	max_requests: Option<u32>,
	#[serde(default)]
	window_secs: Option<u64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

// Clamped to `u32::MAX` seconds so window arithmetic stays within the representable date range.
fn seconds(value: Option<u64>, field: &'static str) -> Result<Option<Duration>, ConfigError> {
	match value {
		Some(0) => Err(ConfigError::NonPositive { field }),
		Some(secs) => Ok(Some(Duration::seconds(secs.min(u64::from(u32::MAX)) as i64))),
		None => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_shipped_client() {
		let config = ClientConfig::default();

		assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
		assert_eq!(config.app_id.as_ref(), DEFAULT_APP_ID);
		assert!(config.uses_placeholder_secret());
		assert_eq!(config.request_timeout, Duration::seconds(30));
		assert_eq!(config.rate_limit, RateLimitConfig::default());
		assert!(!config.demo_mode);
	}

	#[test]
	fn file_values_override_defaults() {
		let raw = r#"{
			"AWS": {
				"Region": "us-east-1",
				"S3": { "BucketName": "ppmt-amp-data-bucket" },
				"ApiGateway": {
					"BaseUrl": "https://abc123.execute-api.us-east-1.amazonaws.com/prod",
					"AppSecret": "s3cr3t",
					"RequestTimeoutSecs": 5
				}
			},
			"RateLimit": { "MaxRequests": 3, "WindowSecs": 60 },
			"DemoMode": true
		}"#;
		let config =
			ClientConfig::from_json(raw, CONFIG_FILE_NAME).expect("Settings should parse.");

		assert_eq!(config.base_url.host_str(), Some("abc123.execute-api.us-east-1.amazonaws.com"));
		assert_eq!(config.app_id.as_ref(), DEFAULT_APP_ID);
		assert!(!config.uses_placeholder_secret());
		assert_eq!(config.request_timeout, Duration::seconds(5));
		assert_eq!(
			config.rate_limit,
			RateLimitConfig { max_requests: 3, window: Duration::minutes(1) }
		);
		assert!(config.demo_mode);
	}

	#[test]
	fn empty_strings_fall_back() {
		let config = ClientConfig::from_json(
			r#"{"AWS":{"ApiGateway":{"BaseUrl":"","AppSecret":"  "}}}"#,
			CONFIG_FILE_NAME,
		)
		.expect("Settings should parse.");

		assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
		assert!(config.app_secret.is_none());
	}

	#[test]
	fn malformed_settings_are_rejected() {
		let err = ClientConfig::from_json(r#"{"RateLimit":{"MaxRequests":"lots"}}"#, "bad.json")
			.expect_err("Wrong value type should fail.");

		match err {
			ConfigError::Parse { path, source } => {
				assert_eq!(path, "bad.json");
				assert_eq!(source.path().to_string(), "RateLimit.MaxRequests");
			},
			other => panic!("Unexpected error: {other:?}."),
		}

		assert!(matches!(
			ClientConfig::from_json(r#"{"RateLimit":{"WindowSecs":0}}"#, "zero.json"),
			Err(ConfigError::NonPositive { field: "WindowSecs" })
		));
		assert!(matches!(
			ClientConfig::from_json(
				r#"{"AWS":{"ApiGateway":{"BaseUrl":"not a url"}}}"#,
				"url.json"
			),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
		assert!(matches!(
			ClientConfig::from_json(r#"{"AWS":{"ApiGateway":{"AppId":"a:b"}}}"#, "id.json"),
			Err(ConfigError::InvalidIdentifier(_))
		));
	}

	#[test]
	fn missing_file_yields_defaults() {
		let path = std::env::temp_dir()
			.join(format!("amp-client-missing-{}.json", std::process::id()));
		let config = ClientConfig::load(&path).expect("Missing file should fall back to defaults.");

		assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
	}
}
