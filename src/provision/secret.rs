// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, RngCore, distr::Alphanumeric};

const RANDOM_BYTES: usize = 32;
const ALPHANUMERIC_LEN: usize = 12;
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Shape of generated client secrets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecretFormat {
	/// 32 random bytes, URL-safe base64 without padding (43 characters).
	#[default]
	UrlSafeBase64,
	/// 12 alphanumeric characters starting with an ASCII letter.
	///
	/// Shorter and free of `-`/`_`, for environments that mangle punctuation in `.env` values.
	Alphanumeric,
}

/// Generates a client identifier: 32 random bytes, URL-safe base64 without padding.
pub fn generate_client_id() -> String {
	random_url_safe()
}

/// Generates a client secret in the requested format.
pub fn generate_secret(format: SecretFormat) -> String {
	match format {
		SecretFormat::UrlSafeBase64 => random_url_safe(),
		SecretFormat::Alphanumeric => random_alphanumeric(),
	}
}

fn random_url_safe() -> String {
	let mut bytes = [0_u8; RANDOM_BYTES];

	rand::rng().fill_bytes(&mut bytes);

	URL_SAFE_NO_PAD.encode(bytes)
}

fn random_alphanumeric() -> String {
	let mut rng = rand::rng();
	let first = char::from(LETTERS[rng.random_range(0..LETTERS.len())]);

	std::iter::once(first)
		.chain(rng.sample_iter(Alphanumeric).take(ALPHANUMERIC_LEN - 1).map(char::from))
		.collect()
}
