use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::info;

/// Hash checked when the username is unknown, so a miss costs the same
/// Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"murmur-dummy-password", &salt)
        .ok()
        .map(|h| h.to_string())
});

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("username already taken")]
    DuplicateUsername,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// A registered user. Accounts are never updated or removed.
#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    /// Argon2id PHC string, salt included.
    pub password_hash: String,
}

/// Username -> password hash. Usernames are compared case-sensitively.
#[derive(Default)]
pub struct AccountStore {
    accounts: Mutex<HashMap<String, String>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Every write is a single insert, so a poisoned map is still consistent.
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an account. Hashing happens outside the lock; the final
    /// check-then-insert is atomic, so only one of several concurrent
    /// registrations for the same name succeeds.
    pub fn register(&self, username: &str, password: &str) -> Result<(), AccountError> {
        if self.accounts().contains_key(username) {
            return Err(AccountError::DuplicateUsername);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AccountError::Hash(e.to_string()))?
            .to_string();

        match self.accounts().entry(username.to_string()) {
            Entry::Occupied(_) => Err(AccountError::DuplicateUsername),
            Entry::Vacant(slot) => {
                slot.insert(password_hash);
                info!("Registered account {}", username);
                Ok(())
            }
        }
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// produce the same error.
    pub fn verify(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        let stored = self.accounts().get(username).cloned();
        let Some(password_hash) = stored else {
            burn_dummy_verification(password);
            return Err(AccountError::InvalidCredentials);
        };

        let parsed =
            PasswordHash::new(&password_hash).map_err(|e| AccountError::Hash(e.to_string()))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AccountError::InvalidCredentials)?;

        Ok(Account {
            username: username.to_string(),
            password_hash,
        })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.accounts().len()
    }
}

fn burn_dummy_verification(password: &str) {
    if let Some(parsed) = DUMMY_HASH.as_deref().and_then(|h| PasswordHash::new(h).ok()) {
        let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn register_then_verify() {
        let store = AccountStore::new();
        store.register("alice", "pw1").unwrap();

        let account = store.verify("alice", "pw1").unwrap();
        assert_eq!(account.username, "alice");
        assert!(account.password_hash.starts_with("$argon2"));
        assert!(!account.password_hash.contains("pw1"));
    }

    #[test]
    fn duplicate_username_rejected() {
        let store = AccountStore::new();
        store.register("alice", "pw1").unwrap();

        let err = store.register("alice", "pw2").unwrap_err();
        assert!(matches!(err, AccountError::DuplicateUsername));

        // The first password still works
        store.verify("alice", "pw1").unwrap();
        assert!(store.verify("alice", "pw2").is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let store = AccountStore::new();
        store.register("alice", "pw").unwrap();
        store.register("Alice", "pw").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let store = AccountStore::new();
        store.register("alice", "pw1").unwrap();

        let wrong = store.verify("alice", "wrongpw").unwrap_err();
        let unknown = store.verify("mallory", "pw1").unwrap_err();
        assert!(matches!(wrong, AccountError::InvalidCredentials));
        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn unknown_user_is_checked_against_a_full_cost_hash() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        let parsed = PasswordHash::new(dummy).unwrap();
        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());

        // Same parameters as real account hashes
        let store = AccountStore::new();
        store.register("alice", "pw").unwrap();
        let real = store.verify("alice", "pw").unwrap().password_hash;
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(parsed.params, real.params);

        let err = store.verify("nobody", "murmur-dummy-password").unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[test]
    fn concurrent_registrations_of_one_name_admit_exactly_one() {
        let store = Arc::new(AccountStore::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.register("bob", &format!("pw{}", i)).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }
}
