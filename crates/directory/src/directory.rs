//! In-memory account directory.

use crate::account::{Account, Principal, Profile, Role, Secret};
use crate::error::{DirectoryError, DirectoryResult};
use sosnet_core::now_ms;
use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct DirectoryState {
    accounts: HashMap<String, Account>,
    /// Identities, most recently registered first.
    order: VecDeque<String>,
}

/// Account directory shared by every session.
#[derive(Debug, Default)]
pub struct Directory {
    state: RwLock<DirectoryState>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a citizen account.
    pub fn register(
        &self,
        identity: &str,
        secret: Secret,
        profile: Profile,
    ) -> DirectoryResult<Principal> {
        self.insert(identity, secret, Role::Citizen, profile)
    }

    /// Register an admin account. Used for bootstrap only; signup always
    /// yields citizens.
    pub fn register_admin(&self, identity: &str, secret: Secret) -> DirectoryResult<Principal> {
        self.insert(identity, secret, Role::Admin, Profile::default())
    }

    fn insert(
        &self,
        identity: &str,
        secret: Secret,
        role: Role,
        profile: Profile,
    ) -> DirectoryResult<Principal> {
        if identity.is_empty() {
            return Err(DirectoryError::ValidationFailed(
                "identity must not be empty".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(DirectoryError::ValidationFailed(
                "secret must not be empty".to_string(),
            ));
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.accounts.contains_key(identity) {
            warn!(identity, "Signup rejected: identity already exists");
            return Err(DirectoryError::DuplicateIdentity {
                identity: identity.to_string(),
            });
        }

        let account = Account::new(identity.to_string(), &secret, role, profile, now_ms());
        let principal = account.principal();
        state.accounts.insert(identity.to_string(), account);
        state.order.push_front(identity.to_string());

        info!(identity, role = %role, "Account registered");
        Ok(principal)
    }

    /// Resolve credentials to a principal.
    pub fn authenticate(&self, identity: &str, secret: &Secret) -> DirectoryResult<Principal> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match state.accounts.get(identity) {
            Some(account) if account.verify(secret) => Ok(account.principal()),
            _ => {
                warn!(identity, "Authentication failed");
                Err(DirectoryError::InvalidCredentials)
            }
        }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .accounts
            .contains_key(identity)
    }

    pub fn get(&self, identity: &str) -> Option<Account> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .accounts
            .get(identity)
            .cloned()
    }

    /// All accounts, most recently registered first.
    pub fn accounts(&self) -> Vec<Account> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .order
            .iter()
            .filter_map(|id| state.accounts.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .accounts
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
