//! The account registry.
//!
//! Owns every user record plus the signed-in session id, and serializes as
//! the persisted auth record. Implements the marketplace's [`CreditLedger`]
//! port so escrow settlement moves credits straight through the registry,
//! whichever account they belong to.

use std::collections::HashMap;

use marketplace::CreditLedger;
use serde::{Deserialize, Serialize};

use crate::types::{ProfilePatch, UserAccount};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Sign-up without email or password
    #[error("Email and password are required")]
    MissingCredentials,

    /// Sign-up with an email that already has an account
    #[error("That email is already registered")]
    EmailTaken,

    /// Sign-in with a wrong email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account not found
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User records and the current session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountRegistry {
    #[serde(default)]
    users: HashMap<String, UserAccount>,
    #[serde(default)]
    current_user_id: Option<String>,
}

impl AccountRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully formed account (seeding, imports).
    pub fn insert(&mut self, account: UserAccount) {
        self.users.insert(account.id.clone(), account);
    }

    /// The signed-in account, if any.
    pub fn current_user(&self) -> Option<&UserAccount> {
        self.current_user_id
            .as_deref()
            .and_then(|id| self.users.get(id))
    }

    /// The signed-in account's id, if any.
    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    /// Every account (dev account switcher).
    pub fn all(&self) -> impl Iterator<Item = &UserAccount> {
        self.users.values()
    }

    /// Look up an account by id.
    pub fn get(&self, id: &str) -> Option<&UserAccount> {
        self.users.get(id)
    }

    fn find_by_email(&self, email: &str) -> Option<&UserAccount> {
        let needle = email.trim().to_lowercase();
        self.users
            .values()
            .find(|u| u.email.as_deref().is_some_and(|e| e.to_lowercase() == needle))
    }

    // -------- Auth --------

    /// Create an account and sign it in.
    ///
    /// New accounts start at zero credits; they earn by providing or top up
    /// explicitly.
    pub fn sign_up(&mut self, input: SignUp) -> Result<&UserAccount, AuthError> {
        let email = input.email.trim().to_lowercase();
        let name = input.name.trim().to_string();

        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if self.find_by_email(&email).is_some() {
            return Err(AuthError::EmailTaken);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let account = UserAccount {
            id: id.clone(),
            name: if name.is_empty() { email.clone() } else { name },
            email: Some(email),
            // Demo only: plaintext. A real deployment hashes server-side.
            password: Some(input.password),
            credits: 0,
            bio: String::new(),
            location: String::new(),
            avatar: None,
        };

        self.users.insert(id.clone(), account);
        self.current_user_id = Some(id.clone());
        Ok(&self.users[&id])
    }

    /// Sign in with email and password.
    ///
    /// Seed accounts carry no password and can only be entered with
    /// [`AccountRegistry::sign_in_as`].
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<&UserAccount, AuthError> {
        let id = self
            .find_by_email(email)
            .filter(|u| u.password.as_deref() == Some(password))
            .map(|u| u.id.clone())
            .ok_or(AuthError::InvalidCredentials)?;

        self.current_user_id = Some(id.clone());
        Ok(&self.users[&id])
    }

    /// Switch straight into an existing account (dev helper).
    pub fn sign_in_as(&mut self, id: &str) -> Result<(), AuthError> {
        if !self.users.contains_key(id) {
            return Err(AuthError::UnknownAccount(id.to_string()));
        }
        self.current_user_id = Some(id.to_string());
        Ok(())
    }

    /// End the session.
    pub fn sign_out(&mut self) {
        self.current_user_id = None;
    }

    // -------- Wallet --------

    /// Add credits to the signed-in account (top-up / earn simulation).
    ///
    /// These explicit calls are the only credit sources outside escrow
    /// settlement. No-op while signed out.
    pub fn add_credits(&mut self, amount: u32) {
        if let Some(id) = self.current_user_id.clone() {
            self.credit_by_id(&id, amount);
        }
    }

    /// Remove credits from the signed-in account. No-op while signed out.
    pub fn spend_credits(&mut self, amount: u32) {
        if let Some(id) = self.current_user_id.clone() {
            self.debit_by_id(&id, amount);
        }
    }

    /// Add credits to any account, materializing a stub for unknown ids.
    pub fn credit_by_id(&mut self, id: &str, amount: u32) {
        let account = self
            .users
            .entry(id.to_string())
            .or_insert_with(|| UserAccount::stub(id));
        account.credits += amount;
    }

    /// Remove credits from any account, flooring at zero.
    pub fn debit_by_id(&mut self, id: &str, amount: u32) {
        let account = self
            .users
            .entry(id.to_string())
            .or_insert_with(|| UserAccount::stub(id));
        if amount > account.credits {
            tracing::warn!(
                user_id = %id,
                balance = account.credits,
                amount,
                "debit exceeds balance, clamping to zero"
            );
        }
        account.credits = account.credits.saturating_sub(amount);
    }

    /// Current balance for an account (zero for unknown ids).
    pub fn balance_of(&self, id: &str) -> u32 {
        self.users.get(id).map(|u| u.credits).unwrap_or(0)
    }

    // -------- Profile --------

    /// Display name for an id, falling back to the id itself.
    pub fn name_of(&self, id: &str) -> String {
        self.users
            .get(id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Avatar data URL for an id.
    pub fn avatar_of(&self, id: &str) -> Option<&str> {
        self.users.get(id).and_then(|u| u.avatar.as_deref())
    }

    /// Apply a profile edit, materializing a stub for unknown ids.
    pub fn update_profile(&mut self, id: &str, patch: ProfilePatch) {
        let account = self
            .users
            .entry(id.to_string())
            .or_insert_with(|| UserAccount::stub(id));

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if !name.is_empty() {
                account.name = name;
            }
        }
        if let Some(bio) = patch.bio {
            account.bio = bio;
        }
        if let Some(location) = patch.location {
            account.location = location;
        }
    }

    /// Set or clear an avatar.
    pub fn set_avatar(&mut self, id: &str, data_url: Option<String>) {
        let account = self
            .users
            .entry(id.to_string())
            .or_insert_with(|| UserAccount::stub(id));
        account.avatar = data_url.filter(|d| !d.is_empty());
    }

    /// Clear an avatar; unknown ids are left alone.
    pub fn remove_avatar(&mut self, id: &str) {
        if let Some(account) = self.users.get_mut(id) {
            account.avatar = None;
        }
    }
}

impl CreditLedger for AccountRegistry {
    fn credit(&mut self, user_id: &str, amount: u32) {
        self.credit_by_id(user_id, amount);
    }

    fn debit(&mut self, user_id: &str, amount: u32) {
        self.debit_by_id(user_id, amount);
    }

    fn balance(&self, user_id: &str) -> u32 {
        self.balance_of(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(registry: &mut AccountRegistry, email: &str) -> String {
        registry
            .sign_up(SignUp {
                name: "Sam".to_string(),
                email: email.to_string(),
                password: "hunter2".to_string(),
            })
            .unwrap()
            .id
            .clone()
    }

    #[test]
    fn test_sign_up_and_in() {
        let mut registry = AccountRegistry::new();
        let id = sign_up(&mut registry, "sam@example.com");
        assert_eq!(registry.current_user_id(), Some(id.as_str()));

        registry.sign_out();
        assert!(registry.current_user().is_none());

        let user = registry.sign_in("  SAM@Example.com ", "hunter2").unwrap();
        assert_eq!(user.id, id);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let mut registry = AccountRegistry::new();
        sign_up(&mut registry, "sam@example.com");
        let err = registry.sign_up(SignUp {
            name: "Other".to_string(),
            email: "Sam@Example.COM".to_string(),
            password: "pw".to_string(),
        });
        assert!(matches!(err, Err(AuthError::EmailTaken)));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let mut registry = AccountRegistry::new();
        sign_up(&mut registry, "sam@example.com");
        assert!(matches!(
            registry.sign_in("sam@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_passwordless_seed_account_needs_switcher() {
        let mut registry = AccountRegistry::new();
        let mut seed = UserAccount::stub("u_seed");
        seed.email = Some("seed@seed.dev".to_string());
        registry.insert(seed);

        assert!(matches!(
            registry.sign_in("seed@seed.dev", ""),
            Err(AuthError::InvalidCredentials)
        ));
        registry.sign_in_as("u_seed").unwrap();
        assert_eq!(registry.current_user_id(), Some("u_seed"));
    }

    #[test]
    fn test_wallet_floors_at_zero() {
        let mut registry = AccountRegistry::new();
        let id = sign_up(&mut registry, "sam@example.com");

        registry.add_credits(5);
        registry.spend_credits(8);
        assert_eq!(registry.balance_of(&id), 0);
    }

    #[test]
    fn test_credit_unknown_id_materializes_stub() {
        let mut registry = AccountRegistry::new();
        registry.credit_by_id("ghost", 4);
        assert_eq!(registry.balance_of("ghost"), 4);
        assert_eq!(registry.name_of("ghost"), "ghost");
    }

    #[test]
    fn test_ledger_port_routes_through_registry() {
        let mut registry = AccountRegistry::new();
        let ledger: &mut dyn CreditLedger = &mut registry;
        ledger.credit("u1", 10);
        ledger.debit("u1", 3);
        assert_eq!(ledger.balance("u1"), 7);
    }

    #[test]
    fn test_profile_patch_keeps_name_on_empty() {
        let mut registry = AccountRegistry::new();
        let id = sign_up(&mut registry, "sam@example.com");

        registry.update_profile(
            &id,
            ProfilePatch {
                name: Some("   ".to_string()),
                bio: Some("Fixes bikes.".to_string()),
                location: None,
            },
        );

        let user = registry.get(&id).unwrap();
        assert_eq!(user.name, "Sam");
        assert_eq!(user.bio, "Fixes bikes.");
    }
}
