//! PAT-based credential for Azure DevOps Basic authentication.
//!
//! Azure DevOps accepts a Personal Access Token as the password of an HTTP
//! Basic credential with an empty user name, so the header value is
//! `Basic base64(":" + pat)`.

use base64::Engine;
use reqwest::header::{HeaderValue, InvalidHeaderValue};
use secrecy::{ExposeSecret, SecretString};

/// PAT-based credential for Azure DevOps authentication.
///
/// The PAT is stored using `SecretString` and only exposed while the
/// `Authorization` header is built.
///
/// # Example
///
/// ```rust
/// use ado_workitems::api::PatCredential;
///
/// let credential = PatCredential::from_string("my-token".to_string());
/// assert_eq!(credential.basic_auth_value(), "Basic Om15LXRva2Vu");
/// ```
#[derive(Clone)]
pub struct PatCredential {
    pat: SecretString,
}

impl PatCredential {
    /// Creates a new PAT credential from a SecretString.
    pub fn new(pat: SecretString) -> Self {
        Self { pat }
    }

    /// Creates a new PAT credential from a plain string.
    ///
    /// The string will be wrapped in a SecretString for secure handling.
    pub fn from_string(pat: String) -> Self {
        Self {
            pat: SecretString::from(pat),
        }
    }

    /// Returns the full `Authorization` header value.
    pub fn basic_auth_value(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!(":{}", self.pat.expose_secret()));
        format!("Basic {}", encoded)
    }

    /// Returns the `Authorization` header value, flagged as sensitive so it is
    /// left out of reqwest's debug output.
    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&self.basic_auth_value())?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for PatCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatCredential")
            .field("pat", &"[REDACTED]")
            .finish()
    }
}
