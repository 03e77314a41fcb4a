//! Run SQL scripts statement by statement.

use std::path::Path;

use rusqlite::Connection;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Location, Token, Tokenizer};

use super::DbResult;

/// Split a script into statements on top-level semicolons.
///
/// Each statement is the trimmed source text between separators, so quoting
/// and escapes come through untouched. Segments holding nothing but
/// whitespace and comments are dropped. The semicolons inside a
/// `CREATE TRIGGER ... BEGIN ... END` body do not split.
pub fn split_statements(sql: &str) -> DbResult<Vec<String>> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql).tokenize_with_location()?;
    let lines = LineIndex::new(sql);

    let mut statements = Vec::new();
    let mut segment = Segment::default();
    let mut start = 0;
    for item in tokens {
        if item.token == Token::SemiColon && segment.depth == 0 {
            let end = lines.offset(sql, item.span.start).max(start);
            segment.finish(&sql[start..end], &mut statements);
            // `;` is a single byte.
            start = (end + 1).min(sql.len());
            continue;
        }
        segment.observe(&item.token);
    }
    segment.finish(&sql[start..], &mut statements);
    Ok(statements)
}

/// Byte offsets of line starts, for mapping tokenizer locations back to text.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(sql: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(sql.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// Locations are 1-based and columns count characters.
    fn offset(&self, sql: &str, location: Location) -> usize {
        let line = (location.line as usize).saturating_sub(1);
        let Some(&line_start) = self.starts.get(line) else {
            return sql.len();
        };
        let column = (location.column as usize).saturating_sub(1);
        sql[line_start..]
            .char_indices()
            .nth(column)
            .map_or(sql.len(), |(i, _)| line_start + i)
    }
}

#[derive(Default)]
struct Segment {
    words: Vec<Keyword>,
    has_code: bool,
    depth: usize,
}

impl Segment {
    fn observe(&mut self, token: &Token) {
        match token {
            Token::Whitespace(_) => {}
            Token::Word(word) => {
                self.has_code = true;
                if self.words.len() < 4 {
                    self.words.push(word.keyword);
                }
                if self.is_trigger() {
                    match word.keyword {
                        Keyword::BEGIN | Keyword::CASE => self.depth += 1,
                        Keyword::END => self.depth = self.depth.saturating_sub(1),
                        _ => {}
                    }
                }
            }
            _ => self.has_code = true,
        }
    }

    fn is_trigger(&self) -> bool {
        self.words.first() == Some(&Keyword::CREATE) && self.words.contains(&Keyword::TRIGGER)
    }

    fn finish(&mut self, text: &str, statements: &mut Vec<String>) {
        let segment = std::mem::take(self);
        if segment.has_code {
            statements.push(text.trim().to_string());
        }
    }
}

/// Execute every statement in the file at `path`. Returns how many ran.
pub fn exec_sql(conn: &Connection, path: impl AsRef<Path>) -> DbResult<usize> {
    let path = path.as_ref();
    let sql = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "executing SQL script");
    exec_sql_str(conn, &sql)
}

/// Execute every statement in `sql`. Returns how many ran.
pub fn exec_sql_str(conn: &Connection, sql: &str) -> DbResult<usize> {
    let statements = split_statements(sql.trim())?;
    for (i, statement) in statements.iter().enumerate() {
        tracing::debug!(index = i, statement = %statement, "executing statement");
        conn.execute_batch(statement)?;
    }
    Ok(statements.len())
}
