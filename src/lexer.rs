use crate::error::{Span, TinyError};
use crate::source::SourceCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Keywords
    If,
    Then,
    Else,
    End,
    Repeat,
    Until,
    Read,
    Write,

    // Operators
    Assign,
    Equal,
    LessThan,
    Plus,
    Minus,
    Times,
    Divide,
    Power,

    // Punctuation
    SemiColon,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    // Literals
    Identifier,
    Num,

    // Special
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            span,
        }
    }
}

// Symbolic tokens are matched by prefix, in table order. A token that is a
// textual extension of a shorter one must come before it, and the comment
// closer must directly follow the opener.
const SYMBOLIC_TOKENS: &[(TokenType, &str)] = &[
    (TokenType::Assign, ":="),
    (TokenType::Equal, "="),
    (TokenType::LessThan, "<"),
    (TokenType::Plus, "+"),
    (TokenType::Minus, "-"),
    (TokenType::Times, "*"),
    (TokenType::Divide, "/"),
    (TokenType::Power, "^"),
    (TokenType::SemiColon, ";"),
    (TokenType::LeftParen, "("),
    (TokenType::RightParen, ")"),
    (TokenType::LeftBrace, "{"),
    (TokenType::RightBrace, "}"),
];

const RESERVED_WORDS: &[(TokenType, &str)] = &[
    (TokenType::If, "if"),
    (TokenType::Then, "then"),
    (TokenType::Else, "else"),
    (TokenType::End, "end"),
    (TokenType::Repeat, "repeat"),
    (TokenType::Until, "until"),
    (TokenType::Read, "read"),
    (TokenType::Write, "write"),
];

// Identifiers are runs of letters and underscores; digits end them.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Pull-based scanner over a source cursor: each call to `next_token`
/// produces one token.
pub struct Lexer<'a> {
    cursor: SourceCursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: SourceCursor::new(source),
        }
    }

    /// Produces the next token, skipping whitespace and comments. Lexical
    /// failures are positioned errors, never tokens.
    pub fn next_token(&mut self) -> Result<Token, TinyError> {
        let Some(rest) = self.cursor.next_token_start() else {
            let line = self.cursor.line_number().max(1);
            let span = Span::single(self.cursor.offset(), line);
            return Ok(Token::new(TokenType::Eof, String::new(), span));
        };
        let start = self.cursor.offset();
        let line = self.cursor.line_number();

        for (index, (token_type, text)) in SYMBOLIC_TOKENS.iter().enumerate() {
            if rest.starts_with(text) {
                self.cursor.advance(text.len());
                if *token_type == TokenType::LeftBrace {
                    // Comment: consume everything through the closing brace,
                    // the entry right after the opener. Running off the end
                    // of the input reads as end of file.
                    let (_, closer) = SYMBOLIC_TOKENS[index + 1];
                    self.cursor.skip_until(closer);
                    return self.next_token();
                }
                let span = Span::new(start, start + text.len(), line);
                return Ok(Token::new(*token_type, (*text).to_string(), span));
            }
        }

        let first = rest.chars().next().unwrap_or('\0');
        if first.is_ascii_digit() {
            let len = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            self.cursor.advance(len);
            let span = Span::new(start, start + len, line);
            return Ok(Token::new(TokenType::Num, rest[..len].to_string(), span));
        }
        if is_identifier_char(first) {
            let len = rest
                .find(|c: char| !is_identifier_char(c))
                .unwrap_or(rest.len());
            let lexeme = &rest[..len];
            let token_type = RESERVED_WORDS
                .iter()
                .find(|(_, word)| *word == lexeme)
                .map_or(TokenType::Identifier, |(token_type, _)| *token_type);
            self.cursor.advance(len);
            let span = Span::new(start, start + len, line);
            return Ok(Token::new(token_type, lexeme.to_string(), span));
        }

        Err(TinyError::lex_error(
            Span::new(start, start + first.len_utf8(), line),
            format!("Unexpected character: '{}'", first),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(source: &str) -> Vec<TokenType> {
        let mut lexer = Lexer::new(source);
        let mut types = Vec::new();
        loop {
            let token = lexer.next_token().expect("lexical error");
            let done = token.token_type == TokenType::Eof;
            types.push(token.token_type);
            if done {
                break;
            }
        }
        types
    }

    #[test]
    fn scans_keywords_and_identifiers() {
        assert_eq!(
            token_types("if x then read y end"),
            vec![
                TokenType::If,
                TokenType::Identifier,
                TokenType::Then,
                TokenType::Read,
                TokenType::Identifier,
                TokenType::End,
                TokenType::Eof,
            ]
        );
        // Reclassification is by exact match only.
        assert_eq!(
            token_types("reads IF"),
            vec![TokenType::Identifier, TokenType::Identifier, TokenType::Eof]
        );
    }

    #[test]
    fn assign_wins_over_shorter_operators() {
        assert_eq!(
            token_types("x := 1"),
            vec![
                TokenType::Identifier,
                TokenType::Assign,
                TokenType::Num,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn digits_terminate_identifiers() {
        let mut lexer = Lexer::new("x1");
        let first = lexer.next_token().unwrap();
        let second = lexer.next_token().unwrap();
        assert_eq!(first.token_type, TokenType::Identifier);
        assert_eq!(first.lexeme, "x");
        assert_eq!(second.token_type, TokenType::Num);
        assert_eq!(second.lexeme, "1");
    }

    #[test]
    fn comments_are_transparent() {
        assert_eq!(
            token_types("{ note } write 1"),
            vec![TokenType::Write, TokenType::Num, TokenType::Eof]
        );
        assert_eq!(
            token_types("write { spans\nseveral\nlines } 2"),
            vec![TokenType::Write, TokenType::Num, TokenType::Eof]
        );
    }

    #[test]
    fn unterminated_comment_reads_as_end_of_file() {
        assert_eq!(
            token_types("write 1 { trailing"),
            vec![TokenType::Write, TokenType::Num, TokenType::Eof]
        );
    }

    #[test]
    fn tracks_line_numbers() {
        let mut lexer = Lexer::new("read x\nwrite x");
        let read = lexer.next_token().unwrap();
        assert_eq!(read.span.line, 1);
        lexer.next_token().unwrap();
        let write = lexer.next_token().unwrap();
        assert_eq!(write.span.line, 2);
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let mut lexer = Lexer::new("write $");
        lexer.next_token().unwrap();
        let error = lexer.next_token().unwrap_err();
        assert!(error.message.contains("Unexpected character"));
    }
}
