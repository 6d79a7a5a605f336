use thiserror::Error;

use crate::lexer::LexError;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Any grammar violation, reported with the 1-based line it was
    /// discovered on.  There is no recovery; parsing is all-or-nothing.
    #[error("line {0}: syntax error")]
    Syntax(u32),
}
