//! SQL schema for the Vouch SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id            TEXT PRIMARY KEY,
    phone_number          TEXT NOT NULL UNIQUE,
    invite_code           TEXT NOT NULL UNIQUE,
    activated_invite_code TEXT,             -- NULL until redeemed; set once
    created_at            TEXT NOT NULL     -- ISO 8601 UTC; server-assigned
);

-- Verification codes are append-only: the only write after INSERT is the
-- single is_verified flip. Rows are never deleted (audit trail).
CREATE TABLE IF NOT EXISTS verifications (
    verification_id TEXT PRIMARY KEY,
    phone_number    TEXT NOT NULL,
    code            TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    is_verified     INTEGER NOT NULL DEFAULT 0
);

-- One bearer token per account for now; the UNIQUE constraint is the only
-- thing standing between this schema and multi-token support.
CREATE TABLE IF NOT EXISTS access_tokens (
    token      TEXT PRIMARY KEY,
    account_id TEXT NOT NULL UNIQUE REFERENCES accounts(account_id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS verifications_lookup_idx
    ON verifications(phone_number, code, is_verified);
CREATE INDEX IF NOT EXISTS accounts_activated_idx
    ON accounts(activated_invite_code);

PRAGMA user_version = 1;
";
