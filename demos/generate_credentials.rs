//! Generates previewer and viewer credentials and prints them as a `.env` block.
//!
//! Run `cargo run --example generate_credentials >> .env` to append the block while still seeing
//! it on the terminal; pass `--alphanumeric` for short secrets.

// std
use std::io::IsTerminal;
// crates.io
use color_eyre::Result;
// self
use oauth2_bearer_client::{
	auth::ProfileId,
	provision::{self, ConsumerCredentials, SecretFormat, SinkMode, StdioSink},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let format = if std::env::args().any(|arg| arg == "--alphanumeric") {
		SecretFormat::Alphanumeric
	} else {
		SecretFormat::UrlSafeBase64
	};
	let mode = if std::io::stdout().is_terminal() { SinkMode::Terminal } else { SinkMode::Piped };
	let consumers = [
		ConsumerCredentials::generate("Previewer", ProfileId::previewer(), format),
		ConsumerCredentials::generate("Viewer", ProfileId::viewer(), format),
	];
	let mut sink = StdioSink::new(mode);

	provision::publish_credentials(&mut sink, &consumers)?;

	Ok(())
}
