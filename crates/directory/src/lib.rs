//! Account directory for SOSNet.
//!
//! Holds the accounts of reporting citizens and responding authorities and
//! resolves credentials to a [`Principal`]. Secrets are kept as salted
//! BLAKE3 digests and never leave this crate.
//!
//! # Roles
//!
//! - **Admin**: authority actor, may validate, dismiss and acknowledge incidents
//! - **Citizen**: reporting actor, the default for every signup

pub mod account;
pub mod directory;
pub mod error;

pub use account::{Account, Principal, Profile, Role, Secret};
pub use directory::Directory;
pub use error::{DirectoryError, DirectoryResult};
