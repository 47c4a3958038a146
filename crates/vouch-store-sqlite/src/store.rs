//! [`SqliteStore`] — the SQLite implementation of [`AuthStore`].
//!
//! Each check-then-write operation runs inside a single
//! `tokio_rusqlite::Connection::call` closure. The connection executes
//! closures one at a time, so the checks and the write they guard cannot
//! interleave with another request; the UNIQUE indexes in the schema
//! back-stop the checks.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vouch_core::{
  account::{Account, NewAccount},
  store::{AuthStore, CreateAccountOutcome},
  token::AccessToken,
  verification::{NewVerification, VerificationRecord},
};

use crate::{
  Error, Result,
  encode::{RawAccount, RawToken, RawVerification, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const ACCOUNT_COLUMNS: &str =
  "account_id, phone_number, invite_code, activated_invite_code, created_at";

fn account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAccount> {
  Ok(RawAccount {
    account_id:            row.get(0)?,
    phone_number:          row.get(1)?,
    invite_code:           row.get(2)?,
    activated_invite_code: row.get(3)?,
    created_at:            row.get(4)?,
  })
}

fn verification_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawVerification> {
  Ok(RawVerification {
    verification_id: row.get(0)?,
    phone_number:    row.get(1)?,
    code:            row.get(2)?,
    created_at:      row.get(3)?,
    is_verified:     row.get(4)?,
  })
}

fn token_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawToken> {
  Ok(RawToken {
    token:      row.get(0)?,
    account_id: row.get(1)?,
    created_at: row.get(2)?,
  })
}

/// Raw outcome of the account insert-if-absent closure.
enum CreateRaw {
  Created,
  PhoneExists(RawAccount),
  InviteCodeTaken,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vouch auth store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row account SELECT with one text parameter.
  async fn account_where(
    &self,
    condition: &'static str,
    param: String,
  ) -> Result<Option<Account>> {
    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {condition}"
              ),
              rusqlite::params![param],
              account_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }
}

// ─── AuthStore impl ──────────────────────────────────────────────────────────

impl AuthStore for SqliteStore {
  type Error = Error;

  // ── Verification codes ────────────────────────────────────────────────

  async fn record_verification(
    &self,
    input: NewVerification,
  ) -> Result<VerificationRecord> {
    let record = VerificationRecord {
      verification_id: Uuid::new_v4(),
      phone_number:    input.phone_number,
      code:            input.code,
      created_at:      Utc::now(),
      is_verified:     false,
    };

    let id_str = encode_uuid(record.verification_id);
    let at_str = encode_dt(record.created_at);
    let phone  = record.phone_number.clone();
    let code   = record.code.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO verifications
             (verification_id, phone_number, code, created_at, is_verified)
           VALUES (?1, ?2, ?3, ?4, 0)",
          rusqlite::params![id_str, phone, code, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn consume_latest(
    &self,
    phone_number: &str,
    code: &str,
  ) -> Result<Option<VerificationRecord>> {
    let phone = phone_number.to_owned();
    let code  = code.to_owned();

    let raw: Option<RawVerification> = self
      .conn
      .call(move |conn| {
        // Select-then-flip runs unbroken on the connection thread, so two
        // requests can never consume the same record.
        let found = conn
          .query_row(
            "SELECT verification_id, phone_number, code, created_at, is_verified
               FROM verifications
              WHERE phone_number = ?1 AND code = ?2 AND is_verified = 0
              ORDER BY created_at DESC, rowid DESC
              LIMIT 1",
            rusqlite::params![phone, code],
            verification_row,
          )
          .optional()?;

        let Some(mut raw) = found else {
          return Ok(None);
        };

        conn.execute(
          "UPDATE verifications SET is_verified = 1 WHERE verification_id = ?1",
          rusqlite::params![raw.verification_id],
        )?;
        raw.is_verified = true;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawVerification::into_record).transpose()
  }

  // ── Accounts ──────────────────────────────────────────────────────────

  async fn create_account(
    &self,
    input: NewAccount,
  ) -> Result<CreateAccountOutcome> {
    let account = Account {
      account_id:            Uuid::new_v4(),
      phone_number:          input.phone_number,
      invite_code:           input.invite_code,
      activated_invite_code: None,
      created_at:            Utc::now(),
    };

    let id_str = encode_uuid(account.account_id);
    let at_str = encode_dt(account.created_at);
    let phone  = account.phone_number.clone();
    let invite = account.invite_code.clone();

    let raw = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!(
              "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone_number = ?1"
            ),
            rusqlite::params![phone],
            account_row,
          )
          .optional()?;
        if let Some(raw) = existing {
          return Ok(CreateRaw::PhoneExists(raw));
        }

        let invite_taken: bool = conn
          .query_row(
            "SELECT 1 FROM accounts WHERE invite_code = ?1",
            rusqlite::params![invite],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if invite_taken {
          return Ok(CreateRaw::InviteCodeTaken);
        }

        conn.execute(
          "INSERT INTO accounts (account_id, phone_number, invite_code, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, phone, invite, at_str],
        )?;
        Ok(CreateRaw::Created)
      })
      .await?;

    Ok(match raw {
      CreateRaw::Created => CreateAccountOutcome::Created(account),
      CreateRaw::PhoneExists(raw) => {
        CreateAccountOutcome::PhoneExists(raw.into_account()?)
      }
      CreateRaw::InviteCodeTaken => CreateAccountOutcome::InviteCodeTaken,
    })
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    self
      .account_where("account_id = ?1", encode_uuid(id))
      .await
  }

  async fn account_by_invite_code(
    &self,
    invite_code: &str,
  ) -> Result<Option<Account>> {
    self
      .account_where("invite_code = ?1", invite_code.to_owned())
      .await
  }

  async fn set_activated_code(
    &self,
    account_id: Uuid,
    invite_code: &str,
  ) -> Result<bool> {
    let id_str = encode_uuid(account_id);
    let code   = invite_code.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET activated_invite_code = ?2
            WHERE account_id = ?1 AND activated_invite_code IS NULL",
          rusqlite::params![id_str, code],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn referrals(&self, invite_code: &str) -> Result<Vec<Account>> {
    let code = invite_code.to_owned();

    let raws: Vec<RawAccount> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACCOUNT_COLUMNS} FROM accounts
            WHERE activated_invite_code = ?1
            ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![code], account_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccount::into_account).collect()
  }

  // ── Tokens ────────────────────────────────────────────────────────────

  async fn get_or_create_token(
    &self,
    account_id: Uuid,
    candidate: String,
  ) -> Result<AccessToken> {
    let id_str = encode_uuid(account_id);
    let at_str = encode_dt(Utc::now());

    let raw: RawToken = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            "SELECT token, account_id, created_at
               FROM access_tokens WHERE account_id = ?1",
            rusqlite::params![id_str],
            token_row,
          )
          .optional()?;
        if let Some(raw) = existing {
          return Ok(raw);
        }

        conn.execute(
          "INSERT INTO access_tokens (token, account_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![candidate, id_str, at_str],
        )?;
        Ok(RawToken {
          token:      candidate,
          account_id: id_str,
          created_at: at_str,
        })
      })
      .await?;

    raw.into_token()
  }

  async fn account_by_token(&self, token: &str) -> Result<Option<Account>> {
    let token = token.to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT a.account_id, a.phone_number, a.invite_code,
                      a.activated_invite_code, a.created_at
                 FROM accounts a
                 JOIN access_tokens t ON t.account_id = a.account_id
                WHERE t.token = ?1",
              rusqlite::params![token],
              account_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }
}
