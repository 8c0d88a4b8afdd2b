//! Account records and credential material.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Responding authority
    Admin,
    /// Reporting citizen
    Citizen,
}

impl Role {
    /// Whether this role may validate, dismiss and acknowledge incidents.
    pub fn is_authority(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Citizen => f.write_str("citizen"),
        }
    }
}

/// Caller-supplied secret. Wiped from memory on drop and never printed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Optional profile fields collected at signup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Contact detail (phone number, radio call sign, ...)
    pub contact: Option<String>,
}

/// Salted BLAKE3 digest of a secret.
#[derive(Clone)]
pub(crate) struct Credential {
    salt: [u8; 16],
    digest: blake3::Hash,
}

impl Credential {
    pub(crate) fn derive(secret: &Secret) -> Self {
        let salt: [u8; 16] = rand::random();
        let digest = Self::hash(&salt, secret);
        Self { salt, digest }
    }

    /// Constant-time comparison against a candidate secret.
    pub(crate) fn matches(&self, candidate: &Secret) -> bool {
        Self::hash(&self.salt, candidate) == self.digest
    }

    fn hash(salt: &[u8; 16], secret: &Secret) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(salt);
        hasher.update(secret.as_bytes());
        hasher.finalize()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Directory account.
#[derive(Debug, Clone)]
pub struct Account {
    identity: String,
    role: Role,
    profile: Profile,
    /// Unix epoch milliseconds
    created_at: u64,
    credential: Credential,
}

impl Account {
    pub(crate) fn new(
        identity: String,
        secret: &Secret,
        role: Role,
        profile: Profile,
        created_at: u64,
    ) -> Self {
        Self {
            identity,
            role,
            profile,
            created_at,
            credential: Credential::derive(secret),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub(crate) fn verify(&self, secret: &Secret) -> bool {
        self.credential.matches(secret)
    }

    /// The principal this account authenticates as.
    pub fn principal(&self) -> Principal {
        Principal {
            identity: self.identity.clone(),
            role: self.role,
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub identity: String,
    pub role: Role,
}

impl Principal {
    pub fn is_authority(&self) -> bool {
        self.role.is_authority()
    }
}
