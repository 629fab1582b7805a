//! Key-management boundary
//!
//! Contracts consumed by the token-encryption layer. Nothing in this crate
//! encrypts; these types only describe how a key is requested for a given
//! encryption algorithm. Key material never travels through a [`ClaimMap`].

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroize;

use crate::claims::ClaimMap;
use crate::error::KeyManagementError;

/// Anything identified by a registered name (e.g. `A256GCM`)
pub trait Named {
    fn name(&self) -> &str;
}

/// A content-encryption algorithm as seen from the key-management side
pub trait EncryptionAlgorithm: Named + fmt::Debug + Send + Sync {}

/// Symmetric key bytes, zeroized on drop
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    algorithm: String,
    bytes: Vec<u8>,
}

impl SecretKey {
    pub fn new(algorithm: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: algorithm.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the algorithm label the key was created for
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bit_length(&self) -> usize {
        self.bytes.len() * 8
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("algorithm", &self.algorithm)
            .field("bits", &self.bit_length())
            .finish_non_exhaustive()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Request for the key to use with a given encryption algorithm
///
/// A [`KeyManagementMode`] can inspect the algorithm to return or generate a
/// key of matching length.
pub trait GetKeyRequest {
    fn encryption_algorithm(&self) -> &dyn EncryptionAlgorithm;
}

/// Request carrying an already-resolved key
pub trait EncryptKeyRequest {
    fn key(&self) -> &SecretKey;
}

/// Default [`GetKeyRequest`] implementation
#[derive(Debug, Clone)]
pub struct KeyRequest {
    algorithm: Arc<dyn EncryptionAlgorithm>,
}

impl KeyRequest {
    pub fn new(algorithm: Arc<dyn EncryptionAlgorithm>) -> Self {
        Self { algorithm }
    }
}

impl GetKeyRequest for KeyRequest {
    fn encryption_algorithm(&self) -> &dyn EncryptionAlgorithm {
        self.algorithm.as_ref()
    }
}

/// Resolves the content-encryption key for a request
pub trait KeyManagementMode: fmt::Debug + Send + Sync {
    /// Returns the key to encrypt with
    ///
    /// # Errors
    ///
    /// Returns [`KeyManagementError::KeyUnavailable`] if no suitable key can
    /// be produced for the requested algorithm.
    fn get_key(&self, request: &dyn GetKeyRequest) -> Result<SecretKey, KeyManagementError>;
}

/// Direct encryption: the supplied key is used as-is for every request
#[derive(Debug, Clone)]
pub struct DirectEncryptionMode {
    key: SecretKey,
}

impl DirectEncryptionMode {
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }
}

impl KeyManagementMode for DirectEncryptionMode {
    fn get_key(&self, _request: &dyn GetKeyRequest) -> Result<SecretKey, KeyManagementError> {
        Ok(self.key.clone())
    }
}

/// Factory for the available key-management modes
pub struct KeyManagementModes;

impl KeyManagementModes {
    pub fn direct(key: SecretKey) -> DirectEncryptionMode {
        DirectEncryptionMode::new(key)
    }
}

/// Picks the encryption algorithm named by a protected header
pub trait EncryptionAlgorithmLocator {
    fn locate(&self, header: &ClaimMap) -> Option<Arc<dyn EncryptionAlgorithm>>;
}

/// Per-recipient header parameters of a multi-recipient encrypted token
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipient {
    header: ClaimMap,
}

impl Recipient {
    pub fn new(header: ClaimMap) -> Self {
        Self { header }
    }

    pub fn header(&self) -> &ClaimMap {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut ClaimMap {
        &mut self.header
    }
}
