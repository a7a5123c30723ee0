//! Guest repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the narrow guest store contract: keyed lookup, save, delete,
//!   listing and confirmation counters.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Guest::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - The unconfirmed -> confirmed transition is a single conditional
//!   `UPDATE`, so concurrent confirmation attempts serialize in SQLite and
//!   exactly one of them observes the transition.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::guest::{Guest, GuestId, GuestValidationError};
use crate::model::name::NameKey;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const GUEST_SELECT_SQL: &str = "SELECT
    uuid,
    last_name,
    first_name,
    confirmed,
    confirmed_at
FROM guests";

/// Store iteration order: insertion order, tie-broken by id.
const GUEST_ORDER_SQL: &str = " ORDER BY created_at ASC, uuid ASC";

const REQUIRED_GUEST_COLUMNS: &[&str] = &[
    "uuid",
    "last_name",
    "first_name",
    "confirmed",
    "confirmed_at",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for guest persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(GuestValidationError),
    Db(DbError),
    NotFound(GuestId),
    /// The normalized (last, first) pair is already taken by another guest.
    DuplicateName {
        last_name: String,
        first_name: String,
    },
    InvalidData(String),
    /// The connection has not been migrated to the expected schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "guest not found: {id}"),
            Self::DuplicateName {
                last_name,
                first_name,
            } => write!(
                f,
                "a guest named `{first_name} {last_name}` already exists"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted guest data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version is {actual_version}, expected {expected_version}; \
                 open connections via db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GuestValidationError> for RepoError {
    fn from(value: GuestValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Narrow guest store contract consumed by the service layer.
///
/// `create_guest`/`update_guest` together cover insert-or-update saving;
/// splitting them keeps `NotFound` explicit on the update path.
pub trait GuestRepository {
    fn create_guest(&self, guest: &Guest) -> RepoResult<GuestId>;
    fn update_guest(&self, guest: &Guest) -> RepoResult<()>;
    fn find_by_id(&self, id: GuestId) -> RepoResult<Option<Guest>>;
    fn find_by_normalized_name(&self, key: &NameKey) -> RepoResult<Option<Guest>>;
    /// Applies the unconfirmed -> confirmed transition atomically.
    ///
    /// Returns `true` when this call performed the transition, `false`
    /// when the guest was already confirmed or does not exist.
    fn confirm_if_unconfirmed(&self, id: GuestId, confirmed_at_ms: i64) -> RepoResult<bool>;
    fn delete_guest(&self, id: GuestId) -> RepoResult<()>;
    fn list_all(&self) -> RepoResult<Vec<Guest>>;
    fn list_by_status(&self, confirmed: bool) -> RepoResult<Vec<Guest>>;
    fn count_all(&self) -> RepoResult<u64>;
    fn count_confirmed(&self) -> RepoResult<u64>;
}

/// SQLite-backed guest repository.
pub struct SqliteGuestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGuestRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl GuestRepository for SqliteGuestRepository<'_> {
    fn create_guest(&self, guest: &Guest) -> RepoResult<GuestId> {
        guest.validate()?;

        self.conn
            .execute(
                "INSERT INTO guests (
                    uuid,
                    last_name,
                    first_name,
                    confirmed,
                    confirmed_at
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    guest.id.to_string(),
                    guest.last_name.as_str(),
                    guest.first_name.as_str(),
                    bool_to_int(guest.confirmed),
                    guest.confirmed_at,
                ],
            )
            .map_err(|err| map_name_conflict(err, guest))?;

        Ok(guest.id)
    }

    fn update_guest(&self, guest: &Guest) -> RepoResult<()> {
        guest.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE guests
                 SET
                    last_name = ?1,
                    first_name = ?2,
                    confirmed = ?3,
                    confirmed_at = ?4,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?5;",
                params![
                    guest.last_name.as_str(),
                    guest.first_name.as_str(),
                    bool_to_int(guest.confirmed),
                    guest.confirmed_at,
                    guest.id.to_string(),
                ],
            )
            .map_err(|err| map_name_conflict(err, guest))?;

        if changed == 0 {
            return Err(RepoError::NotFound(guest.id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: GuestId) -> RepoResult<Option<Guest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GUEST_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_guest_row(row)?));
        }

        Ok(None)
    }

    fn find_by_normalized_name(&self, key: &NameKey) -> RepoResult<Option<Guest>> {
        // Names are stored trimmed; TRIM matches the uniqueness index
        // expression so the lookup and the constraint agree.
        let mut stmt = self.conn.prepare(&format!(
            "{GUEST_SELECT_SQL}
             WHERE LOWER(TRIM(last_name)) = ?1
               AND LOWER(TRIM(first_name)) = ?2;"
        ))?;

        let mut rows = stmt.query(params![key.last(), key.first()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_guest_row(row)?));
        }

        Ok(None)
    }

    fn confirm_if_unconfirmed(&self, id: GuestId, confirmed_at_ms: i64) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE guests
             SET
                confirmed = 1,
                confirmed_at = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND confirmed = 0;",
            params![id.to_string(), confirmed_at_ms],
        )?;

        Ok(changed == 1)
    }

    fn delete_guest(&self, id: GuestId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM guests WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<Guest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GUEST_SELECT_SQL}{GUEST_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        collect_guests(&mut rows)
    }

    fn list_by_status(&self, confirmed: bool) -> RepoResult<Vec<Guest>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GUEST_SELECT_SQL} WHERE confirmed = ?1{GUEST_ORDER_SQL};"
        ))?;
        let mut rows = stmt.query([bool_to_int(confirmed)])?;
        collect_guests(&mut rows)
    }

    fn count_all(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM guests;", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_confirmed(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM guests WHERE confirmed = 1;",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

pub(crate) fn parse_guest_row(row: &Row<'_>) -> RepoResult<Guest> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in guests.uuid"))
    })?;

    let confirmed = match row.get::<_, i64>("confirmed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid confirmed value `{other}` in guests.confirmed"
            )));
        }
    };

    let guest = Guest {
        id,
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        confirmed,
        confirmed_at: row.get("confirmed_at")?,
    };
    guest.validate()?;
    Ok(guest)
}

fn collect_guests(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Guest>> {
    let mut guests = Vec::new();
    while let Some(row) = rows.next()? {
        guests.push(parse_guest_row(row)?);
    }
    Ok(guests)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn map_name_conflict(err: rusqlite::Error, guest: &Guest) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation
            && message.contains("idx_guests_name_key")
        {
            return RepoError::DuplicateName {
                last_name: guest.last_name.clone(),
                first_name: guest.first_name.clone(),
            };
        }
    }

    RepoError::Db(DbError::Sqlite(err))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "guests")? {
        return Err(RepoError::MissingRequiredTable("guests"));
    }

    for column in REQUIRED_GUEST_COLUMNS.iter().copied() {
        if !table_has_column(conn, "guests", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "guests",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
