use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{ExtractedResult, NewQueryLog, Profile, QueryLog};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("time parse error: {0}")]
    Chrono(#[from] chrono::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),
}

/// Document store over the two collections: profiles and query logs.
///
/// Listings are newest first. Log operations are scoped by profile id.
#[async_trait]
pub trait QueryStore: Send + Sync {
    async fn init(&self) -> StorageResult<()>;

    /// Fails with [`StorageError::Duplicate`] when the name is taken.
    async fn create_profile(&self, name: &str) -> StorageResult<Profile>;
    async fn find_profile(&self, name: &str) -> StorageResult<Option<Profile>>;
    async fn list_profiles(&self) -> StorageResult<Vec<Profile>>;

    async fn insert_log(&self, log: NewQueryLog) -> StorageResult<QueryLog>;
    async fn list_logs(&self, profile_id: &str) -> StorageResult<Vec<QueryLog>>;
    /// Returns false when no log with that id belongs to the profile.
    async fn delete_log(&self, profile_id: &str, log_id: &str) -> StorageResult<bool>;
    async fn delete_logs_for_profile(&self, profile_id: &str) -> StorageResult<u64>;
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<T, F>(&self, func: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| StorageError::Task(error.to_string()))?
    }
}

#[async_trait]
impl QueryStore for SqliteStore {
    async fn init(&self) -> StorageResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS profiles (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS query_logs (
                    id TEXT PRIMARY KEY,
                    profile_id TEXT,
                    instruction TEXT NOT NULL,
                    examples TEXT NOT NULL DEFAULT '[]',
                    language TEXT NOT NULL DEFAULT 'javascript',
                    model TEXT NOT NULL,
                    raw_response TEXT NOT NULL,
                    extracted TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_profiles_created_at ON profiles(created_at);
                CREATE INDEX IF NOT EXISTS idx_query_logs_profile ON query_logs(profile_id);
                "#,
            )?;
            Ok(())
        })
        .await
    }

    async fn create_profile(&self, name: &str) -> StorageResult<Profile> {
        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now(),
        };

        self.with_connection(move |connection| {
            let inserted = connection.execute(
                "INSERT INTO profiles (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![
                    profile.id,
                    profile.name,
                    format_timestamp(profile.created_at)
                ],
            );

            match inserted {
                Ok(_) => Ok(profile),
                Err(rusqlite::Error::SqliteFailure(error, _))
                    if error.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StorageError::Duplicate(format!("profile '{}'", profile.name)))
                }
                Err(error) => Err(error.into()),
            }
        })
        .await
    }

    async fn find_profile(&self, name: &str) -> StorageResult<Option<Profile>> {
        let name = name.to_string();

        self.with_connection(move |connection| {
            let raw = connection
                .query_row(
                    "SELECT id, name, created_at FROM profiles WHERE name = ?1",
                    params![name],
                    raw_profile,
                )
                .optional()?;
            raw.map(RawProfile::into_profile).transpose()
        })
        .await
    }

    async fn list_profiles(&self) -> StorageResult<Vec<Profile>> {
        self.with_connection(|connection| {
            let mut statement = connection.prepare(
                "SELECT id, name, created_at FROM profiles ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = statement.query_map([], raw_profile)?;

            let mut profiles = Vec::new();
            for row in rows {
                profiles.push(row?.into_profile()?);
            }
            Ok(profiles)
        })
        .await
    }

    async fn insert_log(&self, log: NewQueryLog) -> StorageResult<QueryLog> {
        let log = QueryLog {
            id: Uuid::new_v4().to_string(),
            instruction: log.instruction,
            examples: log.examples,
            language: log.language,
            model: log.model,
            raw_response: log.raw_response,
            extracted: log.extracted,
            profile_id: log.profile_id,
            created_at: now(),
        };

        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO query_logs (
                    id, profile_id, instruction, examples, language,
                    model, raw_response, extracted, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    log.id,
                    log.profile_id,
                    log.instruction,
                    serde_json::to_string(&log.examples)?,
                    log.language,
                    log.model,
                    log.raw_response,
                    serde_json::to_string(&log.extracted)?,
                    format_timestamp(log.created_at),
                ],
            )?;
            Ok(log)
        })
        .await
    }

    async fn list_logs(&self, profile_id: &str) -> StorageResult<Vec<QueryLog>> {
        let profile_id = profile_id.to_string();

        self.with_connection(move |connection| {
            let mut statement = connection.prepare(
                r#"
                SELECT id, profile_id, instruction, examples, language,
                       model, raw_response, extracted, created_at
                FROM query_logs
                WHERE profile_id = ?1
                ORDER BY created_at DESC, rowid DESC
                "#,
            )?;
            let rows = statement.query_map(params![profile_id], raw_log)?;

            let mut logs = Vec::new();
            for row in rows {
                logs.push(row?.into_log()?);
            }
            Ok(logs)
        })
        .await
    }

    async fn delete_log(&self, profile_id: &str, log_id: &str) -> StorageResult<bool> {
        let profile_id = profile_id.to_string();
        let log_id = log_id.to_string();

        self.with_connection(move |connection| {
            let deleted = connection.execute(
                "DELETE FROM query_logs WHERE id = ?1 AND profile_id = ?2",
                params![log_id, profile_id],
            )?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn delete_logs_for_profile(&self, profile_id: &str) -> StorageResult<u64> {
        let profile_id = profile_id.to_string();

        self.with_connection(move |connection| {
            let deleted = connection.execute(
                "DELETE FROM query_logs WHERE profile_id = ?1",
                params![profile_id],
            )?;
            Ok(deleted as u64)
        })
        .await
    }
}

struct RawProfile {
    id: String,
    name: String,
    created_at: String,
}

impl RawProfile {
    fn into_profile(self) -> StorageResult<Profile> {
        Ok(Profile {
            id: self.id,
            name: self.name,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn raw_profile(row: &Row<'_>) -> rusqlite::Result<RawProfile> {
    Ok(RawProfile {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

struct RawLog {
    id: String,
    profile_id: Option<String>,
    instruction: String,
    examples: String,
    language: String,
    model: String,
    raw_response: String,
    extracted: String,
    created_at: String,
}

impl RawLog {
    fn into_log(self) -> StorageResult<QueryLog> {
        let examples: Vec<String> = serde_json::from_str(&self.examples)?;
        let extracted: ExtractedResult = serde_json::from_str(&self.extracted)?;

        Ok(QueryLog {
            id: self.id,
            instruction: self.instruction,
            examples,
            language: self.language,
            model: self.model,
            raw_response: self.raw_response,
            extracted,
            profile_id: self.profile_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn raw_log(row: &Row<'_>) -> rusqlite::Result<RawLog> {
    Ok(RawLog {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        instruction: row.get(2)?,
        examples: row.get(3)?,
        language: row.get(4)?,
        model: row.get(5)?,
        raw_response: row.get(6)?,
        extracted: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn open_connection(path: &Path) -> StorageResult<Connection> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let connection = Connection::open(path)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// Fixed precision keeps lexical order equal to chronological order.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use tempfile::{tempdir, TempDir};

    use super::{QueryStore, SqliteStore, StorageError};
    use crate::types::{ExtractedResult, NewQueryLog};

    async fn temp_store() -> (SqliteStore, TempDir) {
        let dir = tempdir().expect("temp dir");
        let store = SqliteStore::new(dir.path().join("rxgen.db"));
        store.init().await.expect("init store");
        (store, dir)
    }

    fn new_log(instruction: &str, profile_id: Option<&str>) -> NewQueryLog {
        NewQueryLog {
            instruction: instruction.to_string(),
            examples: vec!["example".to_string()],
            language: "javascript".to_string(),
            model: "gemini-1.5-pro".to_string(),
            raw_response: "```json\n{}\n```".to_string(),
            extracted: ExtractedResult::default(),
            profile_id: profile_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn profile_names_are_unique() {
        let (store, _dir) = temp_store().await;

        let created = store.create_profile("alice").await.expect("first create");
        assert_eq!(created.name, "alice");

        let duplicate = store.create_profile("alice").await;
        assert!(matches!(duplicate, Err(StorageError::Duplicate(_))));

        let found = store.find_profile("alice").await.expect("find").expect("exists");
        assert_eq!(found, created);
        assert!(store.find_profile("bob").await.expect("find").is_none());
    }

    #[tokio::test]
    async fn profiles_are_listed_newest_first() {
        let (store, _dir) = temp_store().await;

        store.create_profile("first").await.expect("create");
        store.create_profile("second").await.expect("create");
        store.create_profile("third").await.expect("create");

        let names: Vec<_> = store
            .list_profiles()
            .await
            .expect("list")
            .into_iter()
            .map(|profile| profile.name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn logs_round_trip_through_storage() {
        let (store, _dir) = temp_store().await;
        let profile = store.create_profile("alice").await.expect("create");

        let mut log = new_log("digits", Some(&profile.id));
        log.extracted = ExtractedResult {
            regex: Some(r"\d+".to_string()),
            sample_matches: vec!["42".to_string()],
            ..Default::default()
        };
        let inserted = store.insert_log(log).await.expect("insert");

        let logs = store.list_logs(&profile.id).await.expect("list");
        assert_eq!(logs, vec![inserted]);
        assert_eq!(logs[0].extracted.regex.as_deref(), Some(r"\d+"));
        assert_eq!(logs[0].examples, vec!["example"]);
    }

    #[tokio::test]
    async fn logs_are_scoped_by_profile_and_listed_newest_first() {
        let (store, _dir) = temp_store().await;
        let alice = store.create_profile("alice").await.expect("create");
        let bob = store.create_profile("bob").await.expect("create");

        store.insert_log(new_log("one", Some(&alice.id))).await.expect("insert");
        store.insert_log(new_log("two", Some(&alice.id))).await.expect("insert");
        store.insert_log(new_log("other", Some(&bob.id))).await.expect("insert");
        store.insert_log(new_log("orphan", None)).await.expect("insert");

        let instructions: Vec<_> = store
            .list_logs(&alice.id)
            .await
            .expect("list")
            .into_iter()
            .map(|log| log.instruction)
            .collect();
        assert_eq!(instructions, vec!["two", "one"]);
    }

    #[tokio::test]
    async fn delete_log_requires_matching_profile() {
        let (store, _dir) = temp_store().await;
        let alice = store.create_profile("alice").await.expect("create");
        let bob = store.create_profile("bob").await.expect("create");
        let log = store.insert_log(new_log("one", Some(&alice.id))).await.expect("insert");

        assert!(!store.delete_log(&bob.id, &log.id).await.expect("delete"));
        assert!(!store.delete_log(&alice.id, "not-a-log").await.expect("delete"));
        assert!(store.delete_log(&alice.id, &log.id).await.expect("delete"));
        assert!(store.list_logs(&alice.id).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn delete_logs_for_profile_reports_count() {
        let (store, _dir) = temp_store().await;
        let alice = store.create_profile("alice").await.expect("create");
        let bob = store.create_profile("bob").await.expect("create");

        for instruction in ["a", "b", "c"] {
            store
                .insert_log(new_log(instruction, Some(&alice.id)))
                .await
                .expect("insert");
        }
        store.insert_log(new_log("keep", Some(&bob.id))).await.expect("insert");

        assert_eq!(store.delete_logs_for_profile(&alice.id).await.expect("delete"), 3);
        assert!(store.list_logs(&alice.id).await.expect("list").is_empty());
        assert_eq!(store.list_logs(&bob.id).await.expect("list").len(), 1);
    }
}
