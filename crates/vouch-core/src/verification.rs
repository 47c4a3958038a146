//! Verification records — the append-only log of issued SMS codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One issued code for one phone number.
///
/// The only write after creation is the single `is_verified` flip; records
/// are never deleted (audit trail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
  pub verification_id: Uuid,
  /// Not unique — a number may hold many outstanding codes.
  pub phone_number:    String,
  /// Four decimal digits; leading zeros allowed. Codes carry no
  /// uniqueness constraint since matching is scoped to
  /// (phone, code, unverified, most recent).
  pub code:            String,
  pub created_at:      DateTime<Utc>,
  /// False at creation; set true exactly once on a successful match.
  pub is_verified:     bool,
}

/// Input to [`crate::store::AuthStore::record_verification`].
/// `verification_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewVerification {
  pub phone_number: String,
  pub code:         String,
}
