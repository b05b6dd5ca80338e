//! SQL DDL for the account store.
//! Additive only: every statement is create-if-absent.

pub const ACCOUNTS_TABLE: &str = "gemini_accounts";

/// Table and index for account rows.
/// - `id` uses AUTOINCREMENT so deleted ids are never handed out again
/// - `is_active` stored as INTEGER 0/1
/// - timestamps stored as text, written by the store in UTC
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS gemini_accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NULL,
    secure_c_ses TEXT NOT NULL,
    host_c_oses TEXT NULL,
    csesidx TEXT NOT NULL,
    config_id TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    request_count INTEGER NOT NULL DEFAULT 0,
    last_used_at TIMESTAMP NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_accounts_active ON gemini_accounts(is_active);
"#;

/// Columns that older tables may lack, with the DDL that adds them.
pub const ADDED_COLUMNS: &[(&str, &str)] = &[(
    "request_count",
    "ALTER TABLE gemini_accounts ADD COLUMN request_count INTEGER NOT NULL DEFAULT 0",
)];
