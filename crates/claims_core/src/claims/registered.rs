//! RFC 7519 registered claims
//!
//! Ref: [RFC 7519 4.1](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1>)

use std::time::SystemTime;

use super::ClaimMap;
use crate::error::ClaimError;

/// Registered claim names
pub mod names {
    /// `iss` (Issuer)
    pub const ISSUER: &str = "iss";
    /// `sub` (Subject)
    pub const SUBJECT: &str = "sub";
    /// `aud` (Audience)
    pub const AUDIENCE: &str = "aud";
    /// `exp` (Expiration Time)
    pub const EXPIRATION: &str = "exp";
    /// `nbf` (Not Before)
    pub const NOT_BEFORE: &str = "nbf";
    /// `iat` (Issued At)
    pub const ISSUED_AT: &str = "iat";
    /// `jti` (JWT ID)
    pub const ID: &str = "jti";
}

impl ClaimMap {
    pub fn issuer(&self) -> Option<String> {
        self.get_string(names::ISSUER)
    }

    pub fn set_issuer(&mut self, issuer: Option<&str>) -> &mut Self {
        self.put(names::ISSUER, issuer);
        self
    }

    pub fn subject(&self) -> Option<String> {
        self.get_string(names::SUBJECT)
    }

    pub fn set_subject(&mut self, subject: Option<&str>) -> &mut Self {
        self.put(names::SUBJECT, subject);
        self
    }

    /// Returns the audience claim
    ///
    /// A single-valued audience is rendered as-is; an array audience is
    /// rendered in its list form.
    pub fn audience(&self) -> Option<String> {
        self.get_string(names::AUDIENCE)
    }

    pub fn set_audience(&mut self, audience: Option<&str>) -> &mut Self {
        self.put(names::AUDIENCE, audience);
        self
    }

    pub fn id(&self) -> Option<String> {
        self.get_string(names::ID)
    }

    pub fn set_id(&mut self, id: Option<&str>) -> &mut Self {
        self.put(names::ID, id);
        self
    }

    /// Returns the `exp` claim as a `SystemTime`
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::MalformedClaim`] if the stored value is neither
    /// NumericDate seconds nor an ISO-8601 timestamp.
    pub fn expiration(&self) -> Result<Option<SystemTime>, ClaimError> {
        self.spec_date(names::EXPIRATION)
    }

    pub fn set_expiration(&mut self, expiration: Option<SystemTime>) -> &mut Self {
        self.set_date_as_seconds(names::EXPIRATION, expiration);
        self
    }

    /// Returns the `nbf` claim as a `SystemTime`
    ///
    /// # Errors
    ///
    /// See [`ClaimMap::expiration`].
    pub fn not_before(&self) -> Result<Option<SystemTime>, ClaimError> {
        self.spec_date(names::NOT_BEFORE)
    }

    pub fn set_not_before(&mut self, not_before: Option<SystemTime>) -> &mut Self {
        self.set_date_as_seconds(names::NOT_BEFORE, not_before);
        self
    }

    /// Returns the `iat` claim as a `SystemTime`
    ///
    /// # Errors
    ///
    /// See [`ClaimMap::expiration`].
    pub fn issued_at(&self) -> Result<Option<SystemTime>, ClaimError> {
        self.spec_date(names::ISSUED_AT)
    }

    pub fn set_issued_at(&mut self, issued_at: Option<SystemTime>) -> &mut Self {
        self.set_date_as_seconds(names::ISSUED_AT, issued_at);
        self
    }

    fn spec_date(&self, name: &str) -> Result<Option<SystemTime>, ClaimError> {
        ClaimMap::to_spec_date(self.get(name), name)
    }
}
