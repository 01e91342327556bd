//! Client configuration: base URL, per-profile credentials, and transport knobs.
//!
//! Values usually come from the environment (optionally seeded from a `.env` file):
//!
//! | variable | meaning |
//! | --- | --- |
//! | `DRUPAL_URL` | API base URL |
//! | `DRUPAL_PREVIEW_CLIENT_ID` / `DRUPAL_PREVIEW_CLIENT_SECRET` | `previewer` credentials |
//! | `DRUPAL_VIEWER_CLIENT_ID` / `DRUPAL_VIEWER_CLIENT_SECRET` | `viewer` credentials |
//! | `DRUPAL_PROFILES` | comma-separated extra profiles, read from `DRUPAL_<PROFILE>_CLIENT_ID/SECRET` |
//! | `DRUPAL_HTTP_TIMEOUT_SECS` | transport timeout in seconds |
//! | `DRUPAL_ACCEPT_INVALID_CERTS` | accept self-signed certificates (`1`/`true`) |

// std
use std::{io, path::PathBuf};
// self
use crate::{
	_prelude::*,
	auth::{ProfileCredentials, ProfileId},
	error::ConfigError,
	http::TransportConfig,
	oauth::TOKEN_PATH,
};

/// Base URL used when `DRUPAL_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://recipe-apax-decoupled.lndo.site";

/// Variable listing additional profiles (comma-separated) to load from the environment.
pub const ENV_PROFILES: &str = "DRUPAL_PROFILES";

const ENV_BASE_URL: &str = "DRUPAL_URL";
const ENV_TIMEOUT_SECS: &str = "DRUPAL_HTTP_TIMEOUT_SECS";
const ENV_ACCEPT_INVALID_CERTS: &str = "DRUPAL_ACCEPT_INVALID_CERTS";
const ENV_PREFIXES: &[(&str, &str)] =
	&[(ProfileId::PREVIEWER, "DRUPAL_PREVIEW"), (ProfileId::VIEWER, "DRUPAL_VIEWER")];

/// Returns the environment variable prefix holding a profile's credentials.
///
/// Well-known profiles keep their historical prefixes; any other profile maps to
/// `DRUPAL_<PROFILE>` with non-alphanumeric characters replaced by `_`.
pub fn env_prefix(profile: &ProfileId) -> String {
	if let Some(prefix) = builtin_prefix(profile) {
		return prefix.to_owned();
	}

	let upper: String = profile
		.chars()
		.map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_uppercase() } else { '_' })
		.collect();

	format!("DRUPAL_{upper}")
}

/// Whether `profile` is loaded from the environment without being listed in [`ENV_PROFILES`].
pub fn is_builtin_profile(profile: &ProfileId) -> bool {
	builtin_prefix(profile).is_some()
}

fn builtin_prefix(profile: &ProfileId) -> Option<&'static str> {
	ENV_PREFIXES.iter().find(|(name, _)| *name == profile.as_ref()).map(|(_, prefix)| *prefix)
}

/// Configuration consumed by [`AuthenticatedClient`](crate::client::AuthenticatedClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL every endpoint path is appended to.
	pub base_url: Url,
	/// Profile used by requests that do not select one.
	pub default_profile: ProfileId,
	/// Credentials keyed by profile.
	pub profiles: HashMap<ProfileId, ProfileCredentials>,
	/// Transport settings for the default reqwest transport.
	pub transport: TransportConfig,
}
impl ClientConfig {
	/// Creates a configuration without any profile credentials.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			default_profile: ProfileId::previewer(),
			profiles: HashMap::new(),
			transport: TransportConfig::default(),
		}
	}

	/// Loads `.env` (when present) and reads the process environment.
	///
	/// A missing `.env` file is skipped; an unreadable or malformed one is an error.
	pub fn from_env() -> Result<Self> {
		accept_dotenv(dotenvy::dotenv())?;

		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds a configuration from an arbitrary variable lookup.
	///
	/// Both well-known profiles are always registered, even when their variables are missing,
	/// so that authenticating them reports missing credentials instead of an unknown profile.
	/// Profiles named in [`ENV_PROFILES`] are registered the same way.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let raw_base = lookup(ENV_BASE_URL)
			.filter(|value| !value.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
		let base_url = Url::parse(raw_base.trim())
			.map_err(|source| ConfigError::InvalidBaseUrl { value: raw_base.clone(), source })?;
		let mut config = Self::new(base_url);
		let extra = lookup(ENV_PROFILES).unwrap_or_default();
		let names = ENV_PREFIXES
			.iter()
			.map(|(name, _)| *name)
			.chain(extra.split(',').map(str::trim).filter(|name| !name.is_empty()));

		for name in names {
			let profile = ProfileId::new(name).map_err(ConfigError::from)?;
			let prefix = env_prefix(&profile);
			let credentials = ProfileCredentials::from_parts(
				lookup(&format!("{prefix}_CLIENT_ID")),
				lookup(&format!("{prefix}_CLIENT_SECRET")),
			);

			config.profiles.insert(profile, credentials);
		}

		if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
			let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvValue {
				key: ENV_TIMEOUT_SECS.into(),
				value: raw.clone(),
			})?;

			config.transport.timeout = Some(std::time::Duration::from_secs(secs));
		}
		if let Some(raw) = lookup(ENV_ACCEPT_INVALID_CERTS) {
			config.transport.accept_invalid_certs = parse_flag(ENV_ACCEPT_INVALID_CERTS, &raw)?;
		}

		Ok(config)
	}

	/// Registers or replaces a profile's credentials.
	pub fn with_profile(
		mut self,
		profile: ProfileId,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		self.profiles.insert(profile, ProfileCredentials::new(client_id, client_secret));

		self
	}

	/// Registers credentials built elsewhere (possibly incomplete).
	pub fn with_credentials(mut self, profile: ProfileId, credentials: ProfileCredentials) -> Self {
		self.profiles.insert(profile, credentials);

		self
	}

	/// Overrides the profile used when requests do not select one.
	pub fn with_default_profile(mut self, profile: ProfileId) -> Self {
		self.default_profile = profile;

		self
	}

	/// Overrides transport settings.
	pub fn with_transport(mut self, transport: TransportConfig) -> Self {
		self.transport = transport;

		self
	}

	/// Returns the credentials configured for `profile`, if any.
	pub fn credentials(&self, profile: &ProfileId) -> Option<&ProfileCredentials> {
		self.profiles.get(profile)
	}

	/// Appends `endpoint` to the base URL (`{base}{endpoint}`), inserting a `/` when missing.
	pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if endpoint.is_empty() || endpoint.starts_with('/') {
			format!("{base}{endpoint}")
		} else {
			format!("{base}/{endpoint}")
		};

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.to_owned(), source }.into())
	}

	/// Returns the token endpoint URL.
	pub fn token_endpoint(&self) -> Result<Url> {
		self.endpoint_url(TOKEN_PATH)
	}
}

fn accept_dotenv(outcome: Result<PathBuf, dotenvy::Error>) -> Result<(), ConfigError> {
	match outcome {
		Ok(_) => Ok(()),
		Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
		Err(source) => Err(ConfigError::EnvFile { source }),
	}
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" | "" => Ok(false),
		_ => Err(ConfigError::InvalidEnvValue { key: key.to_owned(), value: raw.to_owned() }.into()),
	}
}
