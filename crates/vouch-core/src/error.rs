//! Error taxonomy for `vouch-core`.
//!
//! Every failure names the specific precondition it violated; the API layer
//! maps each variant to a status code without ever inspecting messages.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("phone number is required")]
  MissingPhoneNumber,

  #[error("verification code is required")]
  MissingVerificationCode,

  #[error("invite code is required")]
  MissingInviteCode,

  #[error("no matching verification code for this phone number")]
  InvalidCode,

  #[error("an invite code was already activated: {0}")]
  AlreadyActivated(String),

  #[error("cannot activate your own invite code")]
  SelfActivation,

  #[error("invite code does not exist: {0}")]
  InviteNotFound(String),

  #[error("account not found: {0}")]
  AccountNotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a storage-backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
