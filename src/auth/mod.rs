//! Authentication module
//!
//! The upstream service authenticates with HTTP Basic: the API key is the
//! username and the password is empty. The `Credential` holds the key and
//! derives the header for every request.

mod credential;

pub(crate) use credential::API_KEY_VAR;
pub use credential::Credential;
