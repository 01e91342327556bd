//! Auth-domain identifiers, credentials, secrets, and sessions.

pub mod credential;
pub mod id;
pub mod secret;
pub mod session;

pub use credential::*;
pub use id::*;
pub use secret::*;
pub use session::*;
