//! Lexguard Storage Layer
//!
//! Implements the document store gateway and the audit sink on SQLite.
//!
//! # Architecture
//!
//! - `legal_documents` holds the provisions the pipeline retrieves
//! - `query_log` keeps the history of completed analyses
//! - `compliance_audit_log` keeps bias and high-conflict records
//!
//! # Examples
//!
//! ```no_run
//! use lexguard_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! assert_eq!(store.count().unwrap(), 0);
//! ```

#![warn(missing_docs)]

use lexguard_domain::traits::{AuditSink, ProvisionStore, RetrievalRequest};
use lexguard_domain::{
    AuditEvent, AuditRecord, BiasFlag, Category, DocumentType, LegalProvision, Outcome, QueryId,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A row of the query history
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLogEntry {
    /// Invocation id
    pub query_id: QueryId,
    /// The user's question
    pub query: String,
    /// Primary jurisdiction hint
    pub primary_jurisdiction: Option<String>,
    /// Final outcome
    pub outcome: Outcome,
    /// Conflict score
    pub conflict_score: u8,
    /// Number of top citations
    pub citation_count: usize,
    /// Bias flag
    pub bias_flag: BiasFlag,
    /// When the analysis ran (seconds since Unix epoch)
    pub recorded_at: u64,
}

/// A row of the compliance audit log
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    /// Invocation id
    pub query_id: QueryId,
    /// Event kind (`bias_detection` or `high_conflict`)
    pub event_type: String,
    /// Event details
    pub payload: serde_json::Value,
    /// When the event was recorded (seconds since Unix epoch)
    pub recorded_at: u64,
}

/// SQLite-based provision store and audit sink
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

const PROVISION_COLUMNS: &str = "id, document_type, title, section_id, citation_text, \
     category, jurisdiction, effective_date, metadata";

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Insert or replace a single provision
    pub fn insert_provision(&self, provision: &LegalProvision) -> Result<(), StoreError> {
        insert_provision(&self.conn, provision)
    }

    /// Insert or replace provisions in one transaction
    pub fn insert_provisions(&mut self, provisions: &[LegalProvision]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        for provision in provisions {
            insert_provision(&tx, provision)?;
        }
        tx.commit()?;
        tracing::debug!(count = provisions.len(), "Inserted provisions");
        Ok(provisions.len())
    }

    /// Number of stored provisions
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM legal_documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Candidate provisions for a retrieval request
    ///
    /// Provisions in the primary jurisdiction, if given, sort first so they
    /// survive the limit; otherwise rows come back in insertion order.
    pub fn query_provisions(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<LegalProvision>, StoreError> {
        let mut sql = format!("SELECT {} FROM legal_documents", PROVISION_COLUMNS);
        let mut values: Vec<Value> = Vec::new();

        if !request.categories.is_empty() {
            let placeholders = vec!["?"; request.categories.len()].join(", ");
            sql.push_str(&format!(" WHERE category IN ({})", placeholders));
            values.extend(
                request
                    .categories
                    .iter()
                    .map(|category| Value::Text(category.as_str().to_string())),
            );
        }

        match &request.primary_jurisdiction {
            Some(jurisdiction) => {
                sql.push_str(
                    " ORDER BY CASE WHEN lower(trim(jurisdiction)) = lower(trim(?)) \
                     THEN 0 ELSE 1 END, rowid",
                );
                values.push(Value::Text(jurisdiction.clone()));
            }
            None => sql.push_str(" ORDER BY rowid"),
        }

        sql.push_str(" LIMIT ?");
        values.push(Value::Integer(i64::try_from(request.limit).unwrap_or(i64::MAX)));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), RawProvision::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawProvision::into_provision).collect()
    }

    /// Most recent query history rows, newest first
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<QueryLogEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT query_id, query, primary_jurisdiction, outcome, conflict_score, \
             citation_count, bias_flag, recorded_at \
             FROM query_log ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, i64>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(query_id, query, primary_jurisdiction, outcome, score, count, bias, at)| {
                    Ok(QueryLogEntry {
                        query_id: parse_query_id(&query_id)?,
                        query,
                        primary_jurisdiction,
                        outcome: Outcome::parse(&outcome).ok_or_else(|| {
                            StoreError::InvalidData(format!("Unknown outcome: {}", outcome))
                        })?,
                        conflict_score: score.clamp(0, u8::MAX as i64) as u8,
                        citation_count: count.max(0) as usize,
                        bias_flag: BiasFlag::from(bias.eq_ignore_ascii_case("yes")),
                        recorded_at: at.max(0) as u64,
                    })
                },
            )
            .collect()
    }

    /// Most recent compliance audit rows, newest first
    pub fn recent_audit_records(&self, limit: usize) -> Result<Vec<AuditLogEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT query_id, event_type, payload, recorded_at \
             FROM compliance_audit_log ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(query_id, event_type, payload, recorded_at)| {
                Ok(AuditLogEntry {
                    query_id: parse_query_id(&query_id)?,
                    event_type,
                    payload: serde_json::from_str(&payload)?,
                    recorded_at: recorded_at.max(0) as u64,
                })
            })
            .collect()
    }

    fn write_audit_record(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let query_id = record.query_id.to_string();
        let recorded_at = to_sql_integer(record.recorded_at, "recorded_at")?;

        match &record.event {
            AuditEvent::QueryCompleted {
                query,
                primary_jurisdiction,
                outcome,
                conflict_score,
                citation_count,
                bias_flag,
            } => {
                self.conn.execute(
                    "INSERT INTO query_log (query_id, query, primary_jurisdiction, outcome, \
                     conflict_score, citation_count, bias_flag, recorded_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        query_id,
                        query,
                        primary_jurisdiction,
                        outcome.as_str(),
                        *conflict_score as i64,
                        *citation_count as i64,
                        bias_flag.as_str(),
                        recorded_at,
                    ],
                )?;
            }
            AuditEvent::BiasDetected { query, rationale } => {
                let payload = serde_json::json!({
                    "query": query,
                    "rationale": rationale,
                });
                self.insert_audit_row(&query_id, record.event.kind(), &payload, recorded_at)?;
            }
            AuditEvent::HighConflict {
                conflict_score,
                citation_count,
            } => {
                let payload = serde_json::json!({
                    "conflict_score": conflict_score,
                    "citation_count": citation_count,
                });
                self.insert_audit_row(&query_id, record.event.kind(), &payload, recorded_at)?;
            }
        }
        Ok(())
    }

    fn insert_audit_row(
        &self,
        query_id: &str,
        event_type: &str,
        payload: &serde_json::Value,
        recorded_at: i64,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO compliance_audit_log (query_id, event_type, payload, recorded_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![query_id, event_type, serde_json::to_string(payload)?, recorded_at],
        )?;
        Ok(())
    }
}

impl ProvisionStore for SqliteStore {
    type Error = StoreError;

    async fn fetch_candidates(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<LegalProvision>, Self::Error> {
        self.query_provisions(request)
    }
}

impl AuditSink for SqliteStore {
    type Error = StoreError;

    fn record(&self, record: &AuditRecord) -> Result<(), Self::Error> {
        self.write_audit_record(record)
    }
}

fn insert_provision(conn: &Connection, provision: &LegalProvision) -> Result<(), StoreError> {
    let effective_date = provision
        .effective_date
        .map(|date| {
            i64::try_from(date).map_err(|_| {
                StoreError::InvalidData(format!(
                    "effective_date {} is out of range for provision {}",
                    date, provision.id
                ))
            })
        })
        .transpose()?;

    conn.execute(
        "INSERT OR REPLACE INTO legal_documents (id, document_type, title, section_id, \
         citation_text, category, jurisdiction, effective_date, metadata) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            provision.id,
            provision.document_type.as_str(),
            provision.title,
            provision.section_id,
            provision.citation_text,
            provision.category.as_str(),
            provision.jurisdiction,
            effective_date,
            serde_json::to_string(&provision.metadata)?,
        ],
    )?;
    Ok(())
}

// SQLite integers are signed 64-bit
fn to_sql_integer(value: u64, field: &str) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("{} {} is out of range", field, value)))
}

fn parse_query_id(s: &str) -> Result<QueryId, StoreError> {
    QueryId::from_string(s).map_err(StoreError::InvalidData)
}

/// Column values of a `legal_documents` row before validation
struct RawProvision {
    id: String,
    document_type: String,
    title: String,
    section_id: String,
    citation_text: String,
    category: String,
    jurisdiction: String,
    effective_date: Option<i64>,
    metadata: String,
}

impl RawProvision {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            document_type: row.get(1)?,
            title: row.get(2)?,
            section_id: row.get(3)?,
            citation_text: row.get(4)?,
            category: row.get(5)?,
            jurisdiction: row.get(6)?,
            effective_date: row.get(7)?,
            metadata: row.get(8)?,
        })
    }

    fn into_provision(self) -> Result<LegalProvision, StoreError> {
        let document_type = DocumentType::parse(&self.document_type).ok_or_else(|| {
            StoreError::InvalidData(format!(
                "Unknown document type '{}' for provision {}",
                self.document_type, self.id
            ))
        })?;
        let metadata: BTreeMap<String, String> = serde_json::from_str(&self.metadata)?;
        let effective_date = self
            .effective_date
            .map(|date| {
                u64::try_from(date).map_err(|_| {
                    StoreError::InvalidData(format!(
                        "Negative effective_date {} for provision {}",
                        date, self.id
                    ))
                })
            })
            .transpose()?;

        Ok(LegalProvision {
            id: self.id,
            document_type,
            title: self.title,
            section_id: self.section_id,
            citation_text: self.citation_text,
            category: Category::parse(&self.category),
            jurisdiction: self.jurisdiction,
            effective_date,
            metadata,
        })
    }
}
