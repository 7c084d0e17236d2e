//! Account types.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A user account with its credit wallet and profile metadata.
///
/// Passwords are illustrative plaintext for the demo flows; seed accounts
/// carry none and can only be entered through the dev account switcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UserAccount {
    /// Unique identifier
    pub id: String,
    /// Sign-in email, lowercased; absent on stub records
    #[serde(default)]
    pub email: Option<String>,
    /// Demo password; absent on seed and stub records
    #[serde(default)]
    pub password: Option<String>,
    /// Display name
    pub name: String,
    /// Credit balance, floored at zero
    #[serde(default)]
    pub credits: u32,
    /// Short bio
    #[serde(default)]
    pub bio: String,
    /// Free-text location
    #[serde(default)]
    pub location: String,
    /// Avatar as an opaque data URL; resizing happens upstream
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserAccount {
    /// Minimal record for an id we have never seen a sign-up for.
    ///
    /// Crediting an unknown account (an escrow payout to a seed provider,
    /// for instance) materializes one of these instead of dropping credits.
    pub fn stub(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            email: None,
            password: None,
            credits: 0,
            bio: String::new(),
            location: String::new(),
            avatar: None,
        }
    }
}

/// Patch for profile edits.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    /// New display name; empty strings keep the old name
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}
