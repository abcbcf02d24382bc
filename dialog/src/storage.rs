//! # Statement Storage
//!
//! File: dialog/src/storage.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `SqlStorage` persists learned statements in a SQLite database so the bot
//! remembers what it was taught between runs. The schema lives in
//! `dialog/schema/statements.sql` and is embedded at compile time; it is
//! applied with `CREATE ... IF NOT EXISTS` every time a store is opened.
//!
//! ## Deduplication
//!
//! A unique index on `(text, in_response_to, conversation)` means inserting a
//! pair that is already known is silently ignored. Training the same corpus
//! twice therefore leaves the store unchanged.
//!
//! ## Examples
//!
//! ```rust
//! use termbot_dialog::{SqlStorage, Statement};
//!
//! # fn run() -> termbot_dialog::Result<()> {
//! let mut storage = SqlStorage::open_in_memory()?;
//! storage.create(&Statement::new("Hi there!").in_response_to(Some("Hello")))?;
//! let replies = storage.responses_to("hello")?;
//! assert_eq!(replies[0].text, "Hi there!");
//! # Ok(())
//! # }
//! ```
//!
use crate::error::Result;
use crate::statement::{Statement, BOT_PERSONA_PREFIX};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../schema/statements.sql");

const STATEMENT_COLUMNS: &str = "id, text, search_text, conversation, persona, \
                                 in_response_to, search_in_response_to, created_at";

/// SQLite-backed statement store.
pub struct SqlStorage {
    conn: Connection,
}

impl SqlStorage {
    /// Opens (creating if needed) the datastore file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening statement store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory store. Nothing is persisted.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of stored statements.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM statement", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Stores `statement` and its tags. Returns `false` if the same pair was
    /// already known.
    pub fn create(&mut self, statement: &Statement) -> Result<bool> {
        insert(&self.conn, statement)
    }

    /// Stores many statements in one transaction. Returns how many were new.
    pub fn create_many(&mut self, statements: &[Statement]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut added = 0;
        for statement in statements {
            if insert(&tx, statement)? {
                added += 1;
            }
        }
        tx.commit()?;
        debug!(
            "Stored {} new statements ({} submitted)",
            added,
            statements.len()
        );
        Ok(added)
    }

    /// Statements stored as responses to a statement with this search text,
    /// oldest first.
    pub fn responses_to(&self, search_text: &str) -> Result<Vec<Statement>> {
        let sql = format!(
            "SELECT {STATEMENT_COLUMNS} FROM statement \
             WHERE search_in_response_to = ?1 ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([search_text], statement_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Statements a best-match search can compare against: not said by a bot,
    /// and answered by at least one stored statement.
    pub fn response_candidates(&self) -> Result<Vec<Statement>> {
        let sql = format!(
            "SELECT {STATEMENT_COLUMNS} FROM statement s \
             WHERE s.persona NOT LIKE ?1 \
               AND s.search_text != '' \
               AND EXISTS (SELECT 1 FROM statement r \
                           WHERE r.search_in_response_to = s.search_text) \
             ORDER BY s.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([format!("{BOT_PERSONA_PREFIX}%")], statement_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Statements of one conversation in the order they were stored.
    pub fn filter_by_conversation(&self, conversation: &str) -> Result<Vec<Statement>> {
        let sql = format!(
            "SELECT {STATEMENT_COLUMNS} FROM statement WHERE conversation = ?1 ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([conversation], statement_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Any stored statement, or `None` when the store is empty.
    pub fn get_random(&self) -> Result<Option<Statement>> {
        let sql = format!("SELECT {STATEMENT_COLUMNS} FROM statement ORDER BY RANDOM() LIMIT 1");
        Ok(self
            .conn
            .query_row(&sql, [], statement_from_row)
            .optional()?)
    }

    /// Tag names attached to a stored statement, sorted.
    pub fn tags_for(&self, statement_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name FROM tag t \
             JOIN tag_association a ON a.tag_id = t.id \
             WHERE a.statement_id = ?1 ORDER BY t.name",
        )?;
        let names = stmt
            .query_map([statement_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Removes every statement and tag.
    pub fn drop_all(&mut self) -> Result<()> {
        info!("Dropping all stored statements");
        self.conn.execute_batch(
            "DELETE FROM tag_association; DELETE FROM statement; DELETE FROM tag;",
        )?;
        Ok(())
    }
}

fn insert(conn: &Connection, statement: &Statement) -> Result<bool> {
    let in_response_to = statement.in_response_to.as_deref().unwrap_or("");
    let added = conn.execute(
        "INSERT OR IGNORE INTO statement \
         (text, search_text, conversation, persona, in_response_to, search_in_response_to, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            statement.text,
            statement.search_text,
            statement.conversation,
            statement.persona,
            in_response_to,
            statement.search_in_response_to,
            statement.created_at,
        ],
    )? > 0;

    if !statement.tags.is_empty() {
        let statement_id: i64 = conn.query_row(
            "SELECT id FROM statement WHERE text = ?1 AND in_response_to = ?2 AND conversation = ?3",
            params![statement.text, in_response_to, statement.conversation],
            |row| row.get(0),
        )?;
        for tag in &statement.tags {
            conn.execute("INSERT OR IGNORE INTO tag (name) VALUES (?1)", [tag])?;
            conn.execute(
                "INSERT OR IGNORE INTO tag_association (tag_id, statement_id) \
                 SELECT id, ?2 FROM tag WHERE name = ?1",
                params![tag, statement_id],
            )?;
        }
    }
    Ok(added)
}

fn statement_from_row(row: &Row<'_>) -> rusqlite::Result<Statement> {
    let in_response_to: String = row.get(5)?;
    Ok(Statement {
        id: Some(row.get(0)?),
        text: row.get(1)?,
        search_text: row.get(2)?,
        conversation: row.get(3)?,
        persona: row.get(4)?,
        in_response_to: (!in_response_to.is_empty()).then_some(in_response_to),
        search_in_response_to: row.get(6)?,
        created_at: row.get(7)?,
        tags: Vec::new(),
        confidence: 0.0,
    })
}
