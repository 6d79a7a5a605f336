use std::io::Write;

use thiserror::Error;

use strand_lang_core::lexer::Tokenizer;
use strand_lang_core::parser::{self, Parser};
use strand_lang_interpreter::environment::Environment;
use strand_lang_interpreter::evaluator;
use strand_lang_interpreter::value::RuntimeError;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Parse(#[from] parser::ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Parse and run a script against a fresh environment.  Each statement runs
/// as soon as it parses, so output produced before a failure is kept.
pub fn execute(source: &str) -> Result<(), ExecuteError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut parser = Parser::new(Tokenizer::new(source));
    let mut environment = Environment::new();
    while let Some(statement) = parser::parse_statement(&mut parser)? {
        evaluator::execute_statement(&statement, &mut environment, &mut out)?;
    }
    out.flush().map_err(RuntimeError::from)?;
    Ok(())
}
