use std::rc::Rc;

use crate::ast::{Expression, Statement};
use crate::lexer::{Token, TokenKind};
use crate::parser::expressions::parse_expression;
use crate::parser::{ParseError, Parser};

/// Parse the next top-level statement, or `None` at end of input.
pub fn parse_statement(parser: &mut Parser) -> Result<Option<Statement>, ParseError> {
    match parser.next_token()? {
        None => Ok(None),
        Some(token) => parse_statement_from(token, parser).map(Some),
    }
}

/// Parse one statement whose leading token has already been read.
fn parse_statement_from(token: Token, parser: &mut Parser) -> Result<Statement, ParseError> {
    match token.kind {
        TokenKind::LBrace => parse_compound(parser),
        TokenKind::Print => {
            let expression = parse_expression(parser)?;
            parser.expect_token(TokenKind::SemiColon)?;
            Ok(Statement::Print(expression))
        }
        TokenKind::If => {
            let (condition, body) = parse_conditional(parser)?;
            Ok(Statement::If { condition, body })
        }
        TokenKind::While => {
            let (condition, body) = parse_conditional(parser)?;
            Ok(Statement::While { condition, body })
        }
        TokenKind::Push => {
            let target = parse_expression(parser)?;
            parser.expect_token(TokenKind::Comma)?;
            let value = parse_expression(parser)?;
            parser.expect_token(TokenKind::SemiColon)?;
            Ok(Statement::Push { target, value })
        }
        TokenKind::Ident(name) => parse_assignment(name, parser),
        _ => Err(parser.syntax_error()),
    }
}

fn parse_compound(parser: &mut Parser) -> Result<Statement, ParseError> {
    let mut statements = Vec::new();
    loop {
        let token = parser.require_token()?;
        if token.kind == TokenKind::RBrace {
            break;
        }
        statements.push(parse_statement_from(token, parser)?);
    }
    Ok(Statement::Compound(statements))
}

/// Shared shape of `if` and `while`: a parenthesized condition and a body
/// statement.
fn parse_conditional(parser: &mut Parser) -> Result<(Expression, Box<Statement>), ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;
    let token = parser.require_token()?;
    let body = parse_statement_from(token, parser)?;
    Ok((condition, Box::new(body)))
}

/// An identifier opens either a plain assignment or an indexed one; the
/// next token decides which.
fn parse_assignment(name: Rc<str>, parser: &mut Parser) -> Result<Statement, ParseError> {
    let target = parser.identifier(name)?;
    match parser.require_token()?.kind {
        TokenKind::Assign => {
            let value = parse_expression(parser)?;
            parser.expect_token(TokenKind::SemiColon)?;
            Ok(Statement::Assign {
                target,
                index: None,
                value,
            })
        }
        TokenKind::LBracket => {
            let index = parse_expression(parser)?;
            parser.expect_token(TokenKind::RBracket)?;
            parser.expect_token(TokenKind::Assign)?;
            let value = parse_expression(parser)?;
            parser.expect_token(TokenKind::SemiColon)?;
            Ok(Statement::Assign {
                target,
                index: Some(index),
                value,
            })
        }
        _ => Err(parser.syntax_error()),
    }
}
