use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    helpers::{parse_datetime, parse_optional_datetime},
    Database,
};

/// Locally registered account used by the built-in identity provider.
#[derive(Debug, Clone)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub disabled: bool,
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Failure counter after a wrong password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedSignIns {
    pub attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

const ACCOUNT_COLUMNS: &str = "uid, email, display_name, password_hash, disabled, failed_attempts, locked_until, created_at, updated_at";

fn row_to_account(row: &Row) -> Result<Account> {
    let locked_until: Option<String> = row.get("locked_until")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let failed_attempts: i64 = row.get("failed_attempts")?;

    Ok(Account {
        uid: row.get("uid")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        password_hash: row.get("password_hash")?,
        disabled: row.get::<_, i64>("disabled")? != 0,
        failed_attempts: u32::try_from(failed_attempts.max(0)).unwrap_or(u32::MAX),
        locked_until: parse_optional_datetime(locked_until, "locked_until")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_account(&self, account: &Account) -> Result<()> {
        let record = account.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO accounts (uid, email, display_name, password_hash, disabled, failed_attempts, locked_until, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.uid,
                    record.email,
                    record.display_name,
                    record.password_hash,
                    record.disabled as i64,
                    record.failed_attempts as i64,
                    record.locked_until.map(|dt| dt.to_rfc3339()),
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let email = email.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1"
            ))?;
            let mut rows = stmt.query(params![email])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_account(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn set_account_disabled(&self, uid: &str, disabled: bool) -> Result<()> {
        let uid = uid.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE accounts SET disabled = ?1, updated_at = ?2 WHERE uid = ?3",
                params![disabled as i64, Utc::now().to_rfc3339(), uid],
            )?;
            Ok(())
        })
        .await
    }

    /// Stores the new failure count and, once the caller decided to throttle,
    /// the instant until which sign-in attempts are refused.
    pub async fn record_failed_sign_in(
        &self,
        uid: &str,
        failed_attempts: u32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let uid = uid.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE accounts
                 SET failed_attempts = ?1,
                     locked_until = ?2,
                     updated_at = ?3
                 WHERE uid = ?4",
                params![
                    failed_attempts as i64,
                    locked_until.map(|dt| dt.to_rfc3339()),
                    Utc::now().to_rfc3339(),
                    uid,
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Counts one more failed sign-in in a single transaction and locks the
    /// account once `max_attempts` is reached. A lock that expired before
    /// `now` restarts the count from zero.
    pub async fn bump_failed_sign_ins(
        &self,
        uid: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
        lock_for: Duration,
    ) -> Result<FailedSignIns> {
        let uid = uid.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let locked_until: Option<String> = tx.query_row(
                "SELECT locked_until FROM accounts WHERE uid = ?1",
                params![uid],
                |row| row.get(0),
            )?;
            let lock_expired = parse_optional_datetime(locked_until, "locked_until")?
                .is_some_and(|until| until <= now);

            let attempts: i64 = tx.query_row(
                "UPDATE accounts
                 SET failed_attempts = CASE WHEN ?1 THEN 1 ELSE failed_attempts + 1 END,
                     locked_until = CASE WHEN ?1 THEN NULL ELSE locked_until END,
                     updated_at = ?2
                 WHERE uid = ?3
                 RETURNING failed_attempts",
                params![lock_expired, now.to_rfc3339(), uid],
                |row| row.get(0),
            )?;
            let attempts = u32::try_from(attempts.max(0)).unwrap_or(u32::MAX);

            let locked_until = (attempts >= max_attempts).then(|| now + lock_for);
            if let Some(until) = locked_until {
                tx.execute(
                    "UPDATE accounts SET locked_until = ?1 WHERE uid = ?2",
                    params![until.to_rfc3339(), uid],
                )?;
            }

            tx.commit()?;
            Ok(FailedSignIns {
                attempts,
                locked_until,
            })
        })
        .await
    }

    pub async fn clear_failed_sign_ins(&self, uid: &str) -> Result<()> {
        self.record_failed_sign_in(uid, 0, None).await
    }

    pub async fn insert_password_reset(&self, uid: &str) -> Result<String> {
        let uid = uid.to_string();
        self.execute(move |conn| {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO password_resets (id, account_uid, requested_at) VALUES (?1, ?2, ?3)",
                params![id, uid, Utc::now().to_rfc3339()],
            )?;
            Ok(id)
        })
        .await
    }

    pub async fn save_active_session(&self, uid: &str, signed_in_at: DateTime<Utc>) -> Result<()> {
        let uid = uid.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO active_session (slot, account_uid, signed_in_at)
                 VALUES (0, ?1, ?2)
                 ON CONFLICT(slot) DO UPDATE SET
                     account_uid = excluded.account_uid,
                     signed_in_at = excluded.signed_in_at",
                params![uid, signed_in_at.to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }

    /// Returns the signed-in account and when it signed in, if any.
    pub async fn load_active_session(&self) -> Result<Option<(Account, DateTime<Utc>)>> {
        self.execute(|conn| {
            let found = conn
                .query_row(
                    "SELECT account_uid, signed_in_at FROM active_session WHERE slot = 0",
                    [],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;

            let Some((uid, signed_in_at)) = found else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE uid = ?1"
            ))?;
            let mut rows = stmt.query(params![uid])?;
            match rows.next()? {
                Some(row) => Ok(Some((
                    row_to_account(row)?,
                    parse_datetime(&signed_in_at, "signed_in_at")?,
                ))),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn clear_active_session(&self) -> Result<()> {
        self.execute(|conn| {
            conn.execute("DELETE FROM active_session", [])?;
            Ok(())
        })
        .await
    }
}
