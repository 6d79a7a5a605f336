use std::io::Write;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use strand_lang_core::lexer::Tokenizer;
use strand_lang_core::parser::{self, Parser};
use strand_lang_interpreter::environment::Environment;
use strand_lang_interpreter::evaluator;
use strand_lang_interpreter::value::RuntimeError;

use crate::runner::ExecuteError;

const PROMPT: &str = ">> ";

pub fn start() -> Result<(), ReadlineError> {
    let mut environment = Environment::new();
    let mut rl = DefaultEditor::new()?;

    loop {
        let line = match rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                continue; // Clear line
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
            Ok(line) => line,
        };
        rl.add_history_entry(line.as_str())?;

        // Variables persist across lines.  A failed line is reported and
        // abandoned; whatever it assigned before failing stays assigned.
        if let Err(err) = run_line(&line, &mut environment) {
            eprintln!("{err}");
        }
    }
    Ok(())
}

fn run_line(line: &str, environment: &mut Environment) -> Result<(), ExecuteError> {
    let mut out = Vec::new();
    let mut parser = Parser::new(Tokenizer::new(line));

    let result = run_statements(&mut parser, environment, &mut out);

    // Show whatever printed before a failure.  `print` emits no newline of
    // its own, so add one to keep the next prompt on a fresh line.
    if !out.is_empty() {
        out.push(b'\n');
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        stdout.write_all(&out).map_err(RuntimeError::from)?;
        stdout.flush().map_err(RuntimeError::from)?;
    }
    result
}

fn run_statements(
    parser: &mut Parser<'_>,
    environment: &mut Environment,
    out: &mut Vec<u8>,
) -> Result<(), ExecuteError> {
    while let Some(statement) = parser::parse_statement(parser)? {
        evaluator::execute_statement(&statement, environment, out)?;
    }
    Ok(())
}
