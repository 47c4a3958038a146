//! Bearer credentials.
//!
//! A token is an owned value with its own lifecycle rather than embedded
//! account state; the 1:1 binding to an account is a store-level
//! constraint, so a future multi-token scheme needs no type changes here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque bearer credential bound to one account.
///
/// Get-or-create semantics: repeat logins reuse the existing token, it is
/// never regenerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
  /// Forty lowercase hex characters.
  pub token:      String,
  pub account_id: Uuid,
  pub created_at: DateTime<Utc>,
}
