pub mod error;
pub mod expressions;
pub mod statements;

use std::rc::Rc;

use crate::ast::{Identifier, MAX_VAR_NAME};
use crate::lexer::{Token, TokenKind, Tokenizer};
pub use error::ParseError;
pub use statements::parse_statement;

/// Recursive-descent parser with a single token of lookahead.
pub struct Parser<'a> {
    lexer: Tokenizer<'a>,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Tokenizer<'a>) -> Self {
        Self {
            lexer,
            peeked: None,
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        if let Some(token) = self.peeked.take() {
            return Ok(Some(token));
        }
        Ok(self.lexer.next().transpose()?)
    }

    pub(crate) fn peek_token(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next().transpose()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Next token, when running out of input is a syntax error.
    pub(crate) fn require_token(&mut self) -> Result<Token, ParseError> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.syntax_error()),
        }
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let token = self.require_token()?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(self.syntax_error())
        }
    }

    /// Identifier tokens have a legal character set by construction, but the
    /// name must also fit the variable-name bound.
    pub(crate) fn identifier(&self, name: Rc<str>) -> Result<Identifier, ParseError> {
        if name.len() > MAX_VAR_NAME {
            return Err(self.syntax_error());
        }
        Ok(Identifier { name })
    }

    pub(crate) fn syntax_error(&self) -> ParseError {
        ParseError::Syntax(self.lexer.line())
    }
}
