//! Span constructors used when the `tracing` feature is enabled.

use tracing::{info_span, Span};

/// Longest SQL prefix recorded on a query span
const MAX_STATEMENT_LEN: usize = 120;

fn truncate(sql: &str) -> &str {
    match sql.char_indices().nth(MAX_STATEMENT_LEN) {
        Some((idx, _)) => &sql[..idx],
        None => sql,
    }
}

/// Span around a single SQL statement
pub fn execute_query_span(sql: &str) -> Span {
    info_span!("mav.query", db.system = "postgresql", db.statement = truncate(sql.trim()))
}

/// Span around a connection attempt
pub fn acquire_connection_span() -> Span {
    info_span!("mav.connect", db.system = "postgresql")
}

/// Span around a store operation, e.g. `set_value` on `product_attr`
pub fn store_op_span(op: &'static str, table: &str) -> Span {
    info_span!("mav.store", op, table)
}

/// Span around synthesizing an attribute-value type
pub fn synthesize_span(host: &str) -> Span {
    info_span!("mav.synthesize", host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_statements() {
        assert_eq!(truncate("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_truncate_long_statements() {
        let sql = "x".repeat(500);
        assert_eq!(truncate(&sql).len(), MAX_STATEMENT_LEN);
    }
}
