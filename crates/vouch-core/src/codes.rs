//! Injectable randomness for verification codes, invite codes, and bearer
//! tokens.
//!
//! The engine never reaches for a global RNG directly; it draws from a
//! [`CodeGenerator`] so test suites can supply deterministic sequences and
//! assert exact generated values.

use rand::Rng as _;

/// Alphabet for invite codes.
pub const INVITE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Invite codes are exactly this long.
pub const INVITE_CODE_LEN: usize = 6;

/// Verification codes are exactly this long.
pub const VERIFICATION_CODE_LEN: usize = 4;

/// Source of the random strings the engine needs.
///
/// Implementations must be cheap to call from concurrent requests.
pub trait CodeGenerator: Send + Sync {
  /// A fresh 4-digit verification code; leading zeros allowed.
  fn verification_code(&self) -> String;

  /// A candidate 6-character invite code drawn from [`INVITE_ALPHABET`].
  /// Uniqueness is the store's concern, not the generator's.
  fn invite_code(&self) -> String;

  /// A fresh opaque bearer token: 40 lowercase hex characters.
  fn bearer_token(&self) -> String;
}

/// The production generator, backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeGenerator for RandomCodes {
  fn verification_code(&self) -> String {
    format!("{:04}", rand::thread_rng().gen_range(0..10_000))
  }

  fn invite_code(&self) -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
      .map(|_| INVITE_ALPHABET[rng.gen_range(0..INVITE_ALPHABET.len())] as char)
      .collect()
  }

  fn bearer_token(&self) -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
  }
}
