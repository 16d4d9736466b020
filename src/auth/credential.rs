//! API key credential
//!
//! Wraps the opaque secret so it can never leak through `Debug`, `Display`
//! or error messages.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::RequestBuilder;

/// Environment variable the command line reads the key from
pub(crate) const API_KEY_VAR: &str = "CURSOR_API_KEY";

/// Opaque API key, fixed for the lifetime of the client
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
}

impl Credential {
    /// Wrap an API key. Blank keys are rejected.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(Error::missing_field(API_KEY_VAR));
        }
        Ok(Self { secret })
    }

    /// `Basic base64("<key>:")`
    pub fn authorization_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:", self.secret));
        format!("Basic {encoded}")
    }

    /// Apply the Authorization header to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(reqwest::header::AUTHORIZATION, self.authorization_header())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}
