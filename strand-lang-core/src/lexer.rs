use std::rc::Rc;

use thiserror::Error;

/// Longest token the tokenizer will accept.
pub const MAX_TOKEN: usize = 1023;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Ident(Rc<str>),
    /// Raw text of an integer token.  A lone `-` lexes as `Int("-")`; it
    /// doubles as the subtraction operator in infix position and fails
    /// integer parsing everywhere else.
    Int(Rc<str>),
    /// Double-quoted string with escape sequences already decoded.
    Str(Rc<str>),
    /// Single-quoted character literal.
    Char(char),

    // Operators
    Plus,
    Asterisk,
    Slash,
    LessThan,
    Equal,
    And,
    Or,
    Assign,

    Comma,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Print,
    If,
    While,
    Push,
    Len,

    /// A character no lexical rule covers.  It is not a lexical error: the
    /// parser rejects it with a syntax error wherever it shows up.
    Unknown(char),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based source line the token started on, for diagnostics.
    pub line: u32,
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("line {0}: token too long")]
    TokenTooLong(u32),
    #[error("line {0}: invalid string literal.")]
    InvalidStringLiteral(u32),
    #[error("line {line}: Invalid escape sequence \"\\{escape}\"")]
    InvalidEscapeSequence { line: u32, escape: char },
    #[error("line {0}: Invalid single-quoted string")]
    InvalidSingleQuoteLiteral(u32),
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "print" => Some(TokenKind::Print),
        "if" => Some(TokenKind::If),
        "while" => Some(TokenKind::While),
        "push" => Some(TokenKind::Push),
        "len" => Some(TokenKind::Len),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: u32,
    max_token: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            line: 1,
            max_token: MAX_TOKEN,
        }
    }

    /// Same tokenizer with a different token-length bound.
    pub fn with_max_token_len(mut self, max_token: usize) -> Self {
        self.max_token = max_token;
        self
    }

    /// Line the tokenizer is currently on.
    pub fn line(&self) -> u32 {
        self.line
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn skip_blanks(&mut self) {
        while let Some(&(_, ch)) = self.iter.peek() {
            if ch == '\n' {
                self.line += 1;
                self.iter.next();
            } else if ch.is_whitespace() {
                self.iter.next();
            } else if ch == '#' {
                // Comment runs to the end of the line; the newline itself is
                // consumed on the next pass so the line count stays right.
                while self.iter.next_if(|&(_, c)| c != '\n').is_some() {}
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self, start: usize) -> Result<TokenKind, LexError> {
        while self
            .iter
            .next_if(|&(_, ch)| ch.is_ascii_alphanumeric() || ch == '_')
            .is_some()
        {}

        let ident = &self.input[start..self.next_idx()];
        if ident.len() > self.max_token {
            return Err(LexError::TokenTooLong(self.line));
        }
        Ok(keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into())))
    }

    fn read_number(&mut self, start: usize) -> Result<TokenKind, LexError> {
        // Digits after the initial sign or digit.  A lone `-` is a complete
        // (one-character) integer token.
        while self.iter.next_if(|&(_, ch)| ch.is_ascii_digit()).is_some() {}

        let text = &self.input[start..self.next_idx()];
        if text.len() > self.max_token {
            return Err(LexError::TokenTooLong(self.line));
        }
        Ok(TokenKind::Int(text.into()))
    }

    /// Scan a quoted literal, decoding escape sequences, until the matching
    /// close quote.  The literal must not contain a raw newline or run into
    /// the end of input.
    fn read_quoted(&mut self, quote: char) -> Result<String, LexError> {
        let mut payload = String::new();
        loop {
            let Some((_, ch)) = self.iter.next() else {
                return Err(LexError::InvalidStringLiteral(self.line));
            };
            match ch {
                c if c == quote => return Ok(payload),
                '\n' => return Err(LexError::InvalidStringLiteral(self.line)),
                '\\' => {
                    let Some((_, escape)) = self.iter.next() else {
                        return Err(LexError::InvalidStringLiteral(self.line));
                    };
                    match escape {
                        'n' => payload.push('\n'),
                        't' => payload.push('\t'),
                        '"' => payload.push('"'),
                        '\\' => payload.push('\\'),
                        '\n' => return Err(LexError::InvalidStringLiteral(self.line)),
                        _ => {
                            return Err(LexError::InvalidEscapeSequence {
                                line: self.line,
                                escape,
                            })
                        }
                    }
                }
                c => payload.push(c),
            }
            // Both quotes count against the bound, like the raw token would.
            if payload.len() + 2 > self.max_token {
                return Err(LexError::TokenTooLong(self.line));
            }
        }
    }

    fn read_string(&mut self) -> Result<TokenKind, LexError> {
        let payload = self.read_quoted('"')?;
        Ok(TokenKind::Str(payload.into()))
    }

    fn read_char(&mut self) -> Result<TokenKind, LexError> {
        let payload = self.read_quoted('\'')?;
        let mut chars = payload.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(TokenKind::Char(ch)),
            _ => Err(LexError::InvalidSingleQuoteLiteral(self.line)),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_blanks();
        let line = self.line;
        let (idx, ch) = self.iter.next()?;

        let kind = match ch {
            c if Self::is_letter(c) => self.read_identifier(idx),
            c if c == '-' || c.is_ascii_digit() => self.read_number(idx),
            '"' => self.read_string(),
            '\'' => self.read_char(),
            '=' => Ok(if self.iter.next_if(|&(_, c)| c == '=').is_some() {
                TokenKind::Equal
            } else {
                TokenKind::Assign
            }),
            '&' => Ok(if self.iter.next_if(|&(_, c)| c == '&').is_some() {
                TokenKind::And
            } else {
                TokenKind::Unknown('&')
            }),
            '|' => Ok(if self.iter.next_if(|&(_, c)| c == '|').is_some() {
                TokenKind::Or
            } else {
                TokenKind::Unknown('|')
            }),
            '+' => Ok(TokenKind::Plus),
            '*' => Ok(TokenKind::Asterisk),
            '/' => Ok(TokenKind::Slash),
            '<' => Ok(TokenKind::LessThan),
            ',' => Ok(TokenKind::Comma),
            ';' => Ok(TokenKind::SemiColon),
            '(' => Ok(TokenKind::LParen),
            ')' => Ok(TokenKind::RParen),
            '{' => Ok(TokenKind::LBrace),
            '}' => Ok(TokenKind::RBrace),
            '[' => Ok(TokenKind::LBracket),
            ']' => Ok(TokenKind::RBracket),
            _ => Ok(TokenKind::Unknown(ch)),
        };

        Some(kind.map(|kind| Token { kind, line }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .map(|token| token.expect("no lexical errors").kind)
            .collect()
    }

    #[test]
    fn test_punctuation() {
        let input = "=+(){}[],;*/<";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::SemiColon,
                TokenKind::Asterisk,
                TokenKind::Slash,
                TokenKind::LessThan,
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(
            kinds("== && || = & |"),
            vec![
                TokenKind::Equal,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Assign,
                TokenKind::Unknown('&'),
                TokenKind::Unknown('|'),
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("print if while push len lenx _tmp v2"),
            vec![
                TokenKind::Print,
                TokenKind::If,
                TokenKind::While,
                TokenKind::Push,
                TokenKind::Len,
                TokenKind::Ident("lenx".into()),
                TokenKind::Ident("_tmp".into()),
                TokenKind::Ident("v2".into()),
            ]
        );
    }

    #[test]
    fn test_integers_take_the_sign() {
        // The minus sign starts an integer token, so `x-1` is *not* a
        // subtraction: it lexes as an identifier followed by `-1`.
        assert_eq!(
            kinds("12 -34 - x-1"),
            vec![
                TokenKind::Int("12".into()),
                TokenKind::Int("-34".into()),
                TokenKind::Int("-".into()),
                TokenKind::Ident("x".into()),
                TokenKind::Int("-1".into()),
            ]
        );
    }

    #[test]
    fn test_statement_stream() {
        let input = "while (i < len x) { push x, i; i = i + 1; }";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::While,
                TokenKind::LParen,
                TokenKind::Ident("i".into()),
                TokenKind::LessThan,
                TokenKind::Len,
                TokenKind::Ident("x".into()),
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Push,
                TokenKind::Ident("x".into()),
                TokenKind::Comma,
                TokenKind::Ident("i".into()),
                TokenKind::SemiColon,
                TokenKind::Ident("i".into()),
                TokenKind::Assign,
                TokenKind::Ident("i".into()),
                TokenKind::Plus,
                TokenKind::Int("1".into()),
                TokenKind::SemiColon,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""ab" "a\tb" "a\nb" "a\"b" "a\\b" """#),
            vec![
                TokenKind::Str("ab".into()),
                TokenKind::Str("a\tb".into()),
                TokenKind::Str("a\nb".into()),
                TokenKind::Str("a\"b".into()),
                TokenKind::Str("a\\b".into()),
                TokenKind::Str("".into()),
            ]
        );
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(
            kinds(r"'A' '\n'"),
            vec![TokenKind::Char('A'), TokenKind::Char('\n')]
        );
    }

    #[test]
    fn test_invalid_char_literals() {
        let mut tokens = Tokenizer::new("'ab'");
        assert_eq!(
            tokens.next(),
            Some(Err(LexError::InvalidSingleQuoteLiteral(1)))
        );

        let mut tokens = Tokenizer::new("''");
        assert_eq!(
            tokens.next(),
            Some(Err(LexError::InvalidSingleQuoteLiteral(1)))
        );
    }

    #[test]
    fn test_invalid_escape() {
        let mut tokens = Tokenizer::new(r#""a\qb""#);
        assert_eq!(
            tokens.next(),
            Some(Err(LexError::InvalidEscapeSequence {
                line: 1,
                escape: 'q'
            }))
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokens = Tokenizer::new("\"abc");
        assert_eq!(tokens.next(), Some(Err(LexError::InvalidStringLiteral(1))));

        // A literal may not cross a newline either.
        let mut tokens = Tokenizer::new("\"ab\ncd\"");
        assert_eq!(tokens.next(), Some(Err(LexError::InvalidStringLiteral(1))));
    }

    #[test]
    fn test_token_too_long() {
        let input = "a".repeat(9);
        let mut tokens = Tokenizer::new(&input).with_max_token_len(8);
        assert_eq!(tokens.next(), Some(Err(LexError::TokenTooLong(1))));

        let input = "a".repeat(8);
        let mut tokens = Tokenizer::new(&input).with_max_token_len(8);
        assert_eq!(
            tokens.next(),
            Some(Ok(Token {
                kind: TokenKind::Ident(input.as_str().into()),
                line: 1
            }))
        );
    }

    #[test]
    fn test_comments_and_line_numbers() {
        let input = "a\n# whole-line comment\nb # trailing\nc";
        let tokens = Tokenizer::new(input)
            .collect::<Result<Vec<_>, _>>()
            .expect("no lexical errors");
        assert_eq!(
            tokens,
            vec![
                Token {
                    kind: TokenKind::Ident("a".into()),
                    line: 1
                },
                Token {
                    kind: TokenKind::Ident("b".into()),
                    line: 3
                },
                Token {
                    kind: TokenKind::Ident("c".into()),
                    line: 4
                },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Tokenizer::new("").next(), None);
        assert_eq!(Tokenizer::new("  \n# only a comment\n").next(), None);
    }
}
