//! Credential provisioning helpers: mint client id/secret pairs for API consumers and render them
//! as the `.env` block [`ClientConfig::from_env`](crate::config::ClientConfig::from_env) reads.
//!
//! Registering the consumers with the API platform is out of scope; these helpers produce the
//! values and the operator-facing output only.

mod secret;
mod sink;

pub use secret::*;
pub use sink::*;

// std
use std::{fmt::Write as _, io};
// self
use crate::{
	auth::{ProfileId, TokenSecret},
	config,
};

const BANNER: &[&str] = &[
	"╔══════════════════════════════════════════════════════════════╗",
	"║                    SAVE THESE CREDENTIALS                    ║",
	"║                    to your .env file                         ║",
	"╚══════════════════════════════════════════════════════════════╝",
];

/// Freshly generated credentials for one API consumer.
#[derive(Clone, Debug)]
pub struct ConsumerCredentials {
	/// Human-readable label (for example `Previewer`).
	pub label: String,
	/// Profile the consumer authenticates as; selects the env variable prefix.
	pub role: ProfileId,
	/// Generated client identifier.
	pub client_id: String,
	/// Generated client secret.
	pub client_secret: TokenSecret,
}
impl ConsumerCredentials {
	/// Generates a new identifier and secret for `role`.
	pub fn generate(label: impl Into<String>, role: ProfileId, format: SecretFormat) -> Self {
		Self {
			label: label.into(),
			role,
			client_id: generate_client_id(),
			client_secret: TokenSecret::new(generate_secret(format)),
		}
	}
}

/// Renders the `.env` block for `consumers`, one commented section per consumer.
///
/// ```text
/// # Previewer credentials:
/// DRUPAL_PREVIEW_CLIENT_ID='…'
/// DRUPAL_PREVIEW_CLIENT_SECRET='…'
/// ```
///
/// Roles other than `previewer` and `viewer` are also listed in
/// [`ENV_PROFILES`](config::ENV_PROFILES) so the loader picks them up.
pub fn render_env(consumers: &[ConsumerCredentials]) -> String {
	let mut block = String::new();
	let mut extra: Vec<&str> = Vec::new();

	for consumer in consumers {
		let prefix = config::env_prefix(&consumer.role);

		// Writing into a `String` cannot fail.
		let _ = writeln!(block, "# {} credentials:", consumer.label);
		let _ = writeln!(block, "{prefix}_CLIENT_ID='{}'", consumer.client_id);
		let _ = writeln!(block, "{prefix}_CLIENT_SECRET='{}'", consumer.client_secret.expose());

		if !config::is_builtin_profile(&consumer.role) && !extra.contains(&consumer.role.as_ref()) {
			extra.push(consumer.role.as_ref());
		}
	}

	if !extra.is_empty() {
		let _ = writeln!(block, "{}='{}'", config::ENV_PROFILES, extra.join(","));
	}

	block
}

/// Announces the credentials on `sink`: a success notice, the save banner, then the env block.
pub fn publish_credentials<S>(sink: &mut S, consumers: &[ConsumerCredentials]) -> io::Result<()>
where
	S: ?Sized + OutputSink,
{
	sink.notice("Created OAuth consumers successfully")?;
	sink.notice("")?;

	for line in BANNER {
		sink.notice(line)?;
	}

	sink.env_block(&render_env(consumers))?;
	sink.notice("")
}
