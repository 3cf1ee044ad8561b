//! Byte offset to line/column resolution

/// Convert a byte offset into a 1-based (line, column) pair.
///
/// Columns count bytes since the last newline. Negative or past-the-end
/// offsets resolve to (1, 1).
pub fn line_column(sql: &str, offset: i32) -> (usize, usize) {
    let Ok(offset) = usize::try_from(offset) else {
        return (1, 1);
    };
    if offset > sql.len() {
        return (1, 1);
    }

    let mut line = 1;
    let mut column = 1;
    for &byte in &sql.as_bytes()[..offset] {
        if byte == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

/// Advance an offset past whitespace and SQL comments.
///
/// The parser reports later statements as starting right after the
/// previous semicolon; this moves the offset onto the first real token.
pub fn skip_trivia(sql: &str, offset: i32) -> i32 {
    let Ok(start) = usize::try_from(offset) else {
        return offset;
    };
    let bytes = sql.as_bytes();
    if start > bytes.len() {
        return offset;
    }

    let mut i = start;
    loop {
        match &bytes[i..] {
            [b, ..] if b.is_ascii_whitespace() => i += 1,
            [b'-', b'-', ..] => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            [b'/', b'*', rest @ ..] => match rest.windows(2).position(|w| w == b"*/") {
                Some(end) => i += 2 + end + 2,
                // unterminated comment; leave the offset on it
                None => break,
            },
            _ => break,
        }
    }

    i32::try_from(i).unwrap_or(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_of_input() {
        assert_eq!(line_column("CREATE TABLE a ();", 0), (1, 1));
    }

    #[test]
    fn counts_lines_and_columns() {
        let sql = "CREATE TABLE a ();\n\n  CREATE TABLE b ();";
        let offset = sql.find("CREATE TABLE b").unwrap() as i32;
        assert_eq!(line_column(sql, offset), (3, 3));
    }

    #[test]
    fn end_of_input_is_valid() {
        let sql = "ab\ncd";
        assert_eq!(line_column(sql, sql.len() as i32), (2, 3));
    }

    #[test]
    fn out_of_range_degrades() {
        assert_eq!(line_column("abc", -1), (1, 1));
        assert_eq!(line_column("abc", 42), (1, 1));
        assert_eq!(line_column("", 0), (1, 1));
    }

    #[test]
    fn skips_whitespace_and_comments() {
        let sql = "SELECT 1;\n  -- users\n  /* main table */\n  CREATE TABLE users ();";
        let after_semicolon = (sql.find(';').unwrap() + 1) as i32;

        let start = skip_trivia(sql, after_semicolon);
        assert_eq!(start as usize, sql.find("CREATE").unwrap());
        assert_eq!(line_column(sql, start), (4, 3));
    }

    #[test]
    fn skip_trivia_stops_at_unterminated_comment() {
        let sql = "  /* never closed";
        assert_eq!(skip_trivia(sql, 0), 2);
    }

    #[test]
    fn skip_trivia_keeps_invalid_offsets() {
        assert_eq!(skip_trivia("abc", -1), -1);
        assert_eq!(skip_trivia("abc", 10), 10);
        assert_eq!(skip_trivia("abc  ", 3), 5);
    }
}
