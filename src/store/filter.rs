//! Filter-expression evaluation for the local backends.
//!
//! The application treats filter expressions as opaque strings; this
//! module is the "server side" that actually interprets them for the
//! memory and file backends. The grammar is a small subset of the usual
//! table-store query language: `field eq 'literal'` clauses joined by
//! `and`. Anything else is reported as a syntax error, which the UI
//! surfaces as a quoting hint.

use serde_json::Value;

use crate::classify::stringify;
use crate::error::{Result, TabgazeError};
use crate::model::TableRow;

/// One `field eq 'literal'` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    field: String,
    literal: String,
}

/// Parse a filter expression into its clauses.
pub fn parse_filter(expression: &str) -> Result<Vec<Clause>> {
    let mut clauses = Vec::new();
    let mut tokens = tokenize(expression)?.into_iter().peekable();

    loop {
        let field = match tokens.next() {
            Some(Token::Ident(name)) => name,
            other => return Err(syntax_error(expression, other.as_ref())),
        };
        match tokens.next() {
            Some(Token::Ident(op)) if op.eq_ignore_ascii_case("eq") => {}
            other => return Err(syntax_error(expression, other.as_ref())),
        }
        let literal = match tokens.next() {
            Some(Token::Literal(value)) => value,
            other => return Err(syntax_error(expression, other.as_ref())),
        };
        clauses.push(Clause { field, literal });

        match tokens.next() {
            None => break,
            Some(Token::Ident(conn)) if conn.eq_ignore_ascii_case("and") => {}
            other => return Err(syntax_error(expression, other.as_ref())),
        }
    }

    Ok(clauses)
}

/// Whether a row satisfies every clause.
#[must_use]
pub fn row_matches(row: &TableRow, clauses: &[Clause]) -> bool {
    clauses.iter().all(|clause| {
        row.get(&clause.field)
            .filter(|v| !v.is_null())
            .is_some_and(|v| cell_text(v) == clause.literal)
    })
}

fn cell_text(value: &Value) -> String {
    stringify(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Literal(String),
}

fn tokenize(expression: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c == '\'' {
            let mut literal = String::new();
            loop {
                match chars.next() {
                    // Doubled quote is an escaped quote inside the literal.
                    Some('\'') if chars.peek() == Some(&'\'') => {
                        literal.push('\'');
                        chars.next();
                    }
                    Some('\'') => break,
                    Some(other) => literal.push(other),
                    None => {
                        return Err(TabgazeError::query(format!(
                            "filter syntax error: unterminated string literal in \"{expression}\""
                        )))
                    }
                }
            }
            tokens.push(Token::Literal(literal));
        } else if c.is_alphanumeric() || c == '_' {
            let mut ident = String::from(c);
            while chars
                .peek()
                .is_some_and(|n| n.is_alphanumeric() || *n == '_')
            {
                ident.push(chars.next().expect("peeked"));
            }
            tokens.push(Token::Ident(ident));
        } else {
            return Err(TabgazeError::query(format!(
                "filter syntax error: unexpected character '{c}' in \"{expression}\""
            )));
        }
    }

    Ok(tokens)
}

fn syntax_error(expression: &str, token: Option<&Token>) -> TabgazeError {
    match token {
        Some(t) => TabgazeError::query(format!(
            "filter syntax error: unexpected token {t:?} in \"{expression}\""
        )),
        None => TabgazeError::query(format!(
            "filter syntax error: expression ended early in \"{expression}\""
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> TableRow {
        let mut row = TableRow::new("users", "alice");
        row.set("city", json!("berlin"));
        row.set("age", json!(30));
        row
    }

    #[test]
    fn test_single_clause() {
        let clauses = parse_filter("city eq 'berlin'").unwrap();
        assert!(row_matches(&sample_row(), &clauses));

        let clauses = parse_filter("city eq 'paris'").unwrap();
        assert!(!row_matches(&sample_row(), &clauses));
    }

    #[test]
    fn test_and_conjunction() {
        let clauses = parse_filter("city eq 'berlin' and age eq '30'").unwrap();
        assert!(row_matches(&sample_row(), &clauses));

        let clauses = parse_filter("city eq 'berlin' and age eq '31'").unwrap();
        assert!(!row_matches(&sample_row(), &clauses));
    }

    #[test]
    fn test_identity_fields_filterable() {
        let clauses = parse_filter("partitionKey eq 'users'").unwrap();
        assert!(row_matches(&sample_row(), &clauses));
    }

    #[test]
    fn test_unquoted_literal_is_syntax_error() {
        let err = parse_filter("city eq berlin extra").unwrap_err();
        assert!(err.is_filter_syntax());
    }

    #[test]
    fn test_unterminated_literal_is_syntax_error() {
        let err = parse_filter("city eq 'berlin").unwrap_err();
        assert!(err.is_filter_syntax());
    }

    #[test]
    fn test_escaped_quote_in_literal() {
        let clauses = parse_filter("note eq 'it''s fine'").unwrap();
        let mut row = TableRow::new("p", "r");
        row.set("note", json!("it's fine"));
        assert!(row_matches(&row, &clauses));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let clauses = parse_filter("ghost eq 'x'").unwrap();
        assert!(!row_matches(&sample_row(), &clauses));
    }
}
