//! Change log of every committed write.

use chrono::Local;
use rusqlite::{params, params_from_iter, types::Value, Connection, Transaction};
use tracing::debug;

use crate::{error::Result, value::SqlValue};

/// Records the statements executed in one write transaction.
///
/// On [`commit`](Self::commit) one `change_log` row with all recorded statements
/// is written in the same transaction. Dropping the recorder without committing
/// rolls everything back.
pub struct ChangeRecorder<'c> {
    tx: Transaction<'c>,
    statements: Vec<String>,
}

impl<'c> ChangeRecorder<'c> {
    pub fn begin(conn: &'c mut Connection) -> Result<Self> {
        Ok(Self {
            tx: conn.transaction()?,
            statements: Vec::new(),
        })
    }

    /// Executes a write and records it. Returns the number of changed rows.
    pub fn execute(&mut self, sql: &str, params: &[Value]) -> Result<usize> {
        let changed = self.tx.execute(sql, params_from_iter(params.iter()))?;
        self.record(sql, params)?;
        Ok(changed)
    }

    /// Executes an INSERT and returns the new row id.
    pub fn insert(&mut self, sql: &str, params: &[Value]) -> Result<i64> {
        self.execute(sql, params)?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn commit(self) -> Result<()> {
        if !self.statements.is_empty() {
            self.tx.execute(
                "INSERT INTO change_log (timestamp, command) VALUES (?1, ?2)",
                params![Local::now().to_rfc3339(), self.statements.join("; ")],
            )?;
        }
        self.tx.commit()?;
        Ok(())
    }

    fn record(&mut self, sql: &str, params: &[Value]) -> Result<()> {
        let statement = single_line(sql);
        let entry = if params.is_empty() {
            statement
        } else {
            let values: Vec<SqlValue> = params.iter().map(SqlValue::from).collect();
            let values = serde_json::to_string(&values)?;
            format!("{statement} -- {values}")
        };
        debug!("{entry}");
        self.statements.push(entry);
        Ok(())
    }
}

fn single_line(sql: &str) -> String {
    sql.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
