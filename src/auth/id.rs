//! Profile identifiers used to key credentials and sessions.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Profile identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Profile identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Profile identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Named credential/session pairing representing a distinct permission scope
/// (for example `previewer` or `viewer`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(String);
impl ProfileId {
	/// Name of the baseline profile used when a request does not select one.
	pub const PREVIEWER: &'static str = "previewer";
	/// Name of the read-only viewer profile.
	pub const VIEWER: &'static str = "viewer";

	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// The baseline `previewer` profile.
	pub fn previewer() -> Self {
		Self(Self::PREVIEWER.to_owned())
	}

	/// The `viewer` profile.
	pub fn viewer() -> Self {
		Self(Self::VIEWER.to_owned())
	}
}
impl Deref for ProfileId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProfileId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ProfileId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ProfileId> for String {
	fn from(value: ProfileId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProfileId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ProfileId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Profile({})", self.0)
	}
}
impl Display for ProfileId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProfileId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert_eq!(ProfileId::new(" previewer"), Err(IdentifierError::ContainsWhitespace));
		assert_eq!(ProfileId::new(""), Err(IdentifierError::Empty));
		assert_eq!(
			ProfileId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN })
		);

		let profile = ProfileId::new("editor").expect("Profile fixture should be valid.");

		assert_eq!(profile.as_ref(), "editor");
		assert_eq!(ProfileId::previewer().as_ref(), ProfileId::PREVIEWER);
	}

	#[test]
	fn serde_enforces_validation() {
		let profile: ProfileId =
			serde_json::from_str("\"viewer\"").expect("Profile should deserialize successfully.");

		assert_eq!(profile, ProfileId::viewer());
		assert!(serde_json::from_str::<ProfileId>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_lookup_by_str() {
		let map: HashMap<ProfileId, u8> = HashMap::from_iter([(ProfileId::viewer(), 7_u8)]);

		assert_eq!(map.get("viewer"), Some(&7));
	}
}
