//! Query execution

use crate::catalog::QueryDef;
use crate::error::{QueryError, QueryResult};
use crate::results::ResultSet;
use iot_core::FieldMap;
use iot_db::Gateway;

/// Execute `queries` in order and collect their rows by query name.
///
/// Each row is zipped positionally with the query's column list. The first
/// failing query aborts the run.
pub fn run_queries(gateway: &dyn Gateway, queries: &[QueryDef]) -> QueryResult<ResultSet> {
    let mut results = ResultSet::new();

    for query in queries {
        let rows = gateway
            .fetch_all(query.sql, &[])
            .map_err(|source| QueryError::Execution {
                query: query.name.to_string(),
                source,
            })?;

        if let Some(row) = rows.first() {
            if row.len() != query.columns.len() {
                log::warn!(
                    "Query {} returned {} columns but declares {}",
                    query.name,
                    row.len(),
                    query.columns.len()
                );
            }
        }

        log::info!("Query {} returned {} rows", query.name, rows.len());
        let rows = rows
            .into_iter()
            .map(|row| FieldMap::zip(query.columns, row))
            .collect();
        results.insert(query.name, rows);
    }

    Ok(results)
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
