/// Line-oriented cursor over TINY source text.
///
/// The cursor buffers one physical line at a time and exposes the raw
/// character-level operations the scanner is built on: whitespace skipping,
/// marker search for comment skipping, and manual advancement by token
/// length. Positions map back to byte offsets in the whole source so tokens
/// can carry exact spans. There is no lookback past the current line.
pub struct SourceCursor<'a> {
    source: &'a str,
    /// Byte offset where the next unread line begins.
    next_line_start: usize,
    /// Current line buffer, without its trailing newline.
    line: &'a str,
    /// Byte offset of the current line within the source.
    line_start: usize,
    /// Byte column within the current line.
    col: usize,
    /// 1-based line counter, 0 before the first line is read.
    line_num: usize,
}

impl<'a> SourceCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            next_line_start: 0,
            line: "",
            line_start: 0,
            col: 0,
            line_num: 0,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_num
    }

    /// Byte offset of the current position within the whole source.
    pub fn offset(&self) -> usize {
        self.line_start + self.col
    }

    fn next_line(&mut self) -> bool {
        if self.next_line_start >= self.source.len() {
            return false;
        }
        let rest = &self.source[self.next_line_start..];
        let (line, consumed) = match rest.find('\n') {
            Some(newline) => (&rest[..newline], newline + 1),
            None => (rest, rest.len()),
        };
        self.line_start = self.next_line_start;
        self.next_line_start += consumed;
        self.line = line;
        self.col = 0;
        self.line_num += 1;
        true
    }

    /// Skips spaces, tabs, and carriage returns within the current line.
    pub fn skip_whitespace(&mut self) {
        let bytes = self.line.as_bytes();
        while self.col < bytes.len() && matches!(bytes[self.col], b' ' | b'\t' | b'\r') {
            self.col += 1;
        }
    }

    /// Positions the cursor at the start of the next token, fetching new
    /// lines as the current one runs out, and returns the remainder of the
    /// current line. Returns `None` at end of input. Nothing beyond leading
    /// whitespace is consumed.
    pub fn next_token_start(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        while self.col >= self.line.len() {
            if !self.next_line() {
                return None;
            }
            self.skip_whitespace();
        }
        Some(&self.line[self.col..])
    }

    /// Consumes text up to and including `marker`, crossing line boundaries.
    /// Returns `false` when end of input is reached first; that is not an
    /// error, the cursor simply stands at end of input afterwards.
    pub fn skip_until(&mut self, marker: &str) -> bool {
        loop {
            self.skip_whitespace();
            while self.col >= self.line.len() {
                if !self.next_line() {
                    return false;
                }
                self.skip_whitespace();
            }
            if self.line[self.col..].starts_with(marker) {
                self.col += marker.len();
                return true;
            }
            self.advance_char();
        }
    }

    /// Advances by `len` bytes within the current line, the length of a
    /// token just recognized.
    pub fn advance(&mut self, len: usize) {
        self.col += len;
    }

    fn advance_char(&mut self) {
        let step = self.line[self.col..].chars().next().map_or(1, char::len_utf8);
        self.col += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines_and_offsets() {
        let mut cursor = SourceCursor::new("ab\n  cd");
        let rest = cursor.next_token_start().unwrap();
        assert_eq!(rest, "ab");
        assert_eq!(cursor.line_number(), 1);
        assert_eq!(cursor.offset(), 0);
        cursor.advance(2);

        let rest = cursor.next_token_start().unwrap();
        assert_eq!(rest, "cd");
        assert_eq!(cursor.line_number(), 2);
        assert_eq!(cursor.offset(), 5);
        cursor.advance(2);

        assert!(cursor.next_token_start().is_none());
    }

    #[test]
    fn skip_until_crosses_lines() {
        let mut cursor = SourceCursor::new("one\ntwo three} x");
        assert!(cursor.skip_until("}"));
        assert_eq!(cursor.next_token_start(), Some("x"));
    }

    #[test]
    fn skip_until_missing_marker_is_end_of_input() {
        let mut cursor = SourceCursor::new("never closed");
        assert!(!cursor.skip_until("}"));
        assert!(cursor.next_token_start().is_none());
    }

    #[test]
    fn empty_source_is_end_of_input() {
        let mut cursor = SourceCursor::new("");
        assert!(cursor.next_token_start().is_none());
        assert_eq!(cursor.line_number(), 0);
    }
}
