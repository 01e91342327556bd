//! OAuth 2.0 client-credentials sessions for bearer-protected GraphQL and REST APIs: per-profile
//! token reuse, 401-driven re-authentication, and the provisioning helpers that mint the
//! credentials those sessions consume.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provision;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests and demos that talk to
	//! `httpmock` servers.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ProfileId,
		client::{AuthenticatedClient, ReqwestAuthenticatedClient},
		config::ClientConfig,
		http::{ReqwestHttpClient, TransportConfig},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::from_config(&TransportConfig {
			accept_invalid_certs: true,
			..Default::default()
		})
		.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Builds a [`ClientConfig`] pointing at `base_url` with a single `previewer` profile.
	pub fn test_config(base_url: &str, client_id: &str, client_secret: &str) -> ClientConfig {
		let base_url = Url::parse(base_url).expect("Failed to parse test base URL.");

		ClientConfig::new(base_url).with_profile(ProfileId::previewer(), client_id, client_secret)
	}

	/// Constructs an [`AuthenticatedClient`] backed by the reqwest transport used across
	/// integration tests.
	pub fn build_reqwest_test_client(config: ClientConfig) -> ReqwestAuthenticatedClient {
		AuthenticatedClient::with_http_client(config, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use oauth2::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
