use crate::ast::{Expression, InfixKind};
use crate::lexer::{Token, TokenKind};
use crate::parser::{ParseError, Parser};

/// Parse a full expression: a term followed by any number of
/// `(operator, term)` pairs, folded strictly left to right.  There is no
/// operator precedence; `a + b * c` means `(a + b) * c`.
///
/// The expression ends at `;`, `)`, `]` or `,`, which is left in the token
/// stream for the caller.  Anything else there is a syntax error.
pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let token = parser.require_token()?;
    let mut left = parse_term(token, parser)?;

    loop {
        let Some(next) = parser.peek_token()? else {
            return Err(parser.syntax_error());
        };
        if next.kind == TokenKind::LBracket {
            // Indexing takes a single term, then the closing bracket.
            parser.next_token()?;
            let token = parser.require_token()?;
            let index = parse_term(token, parser)?;
            parser.expect_token(TokenKind::RBracket)?;
            left = Expression::Index(Box::new(left), Box::new(index));
        } else if let Some(kind) = infix_kind(&next.kind) {
            parser.next_token()?;
            let token = parser.require_token()?;
            let right = parse_term(token, parser)?;
            left = Expression::Infix(kind, Box::new(left), Box::new(right));
        } else if is_terminator(&next.kind) {
            break;
        } else {
            return Err(parser.syntax_error());
        }
    }

    Ok(left)
}

fn is_terminator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::SemiColon | TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma
    )
}

fn infix_kind(kind: &TokenKind) -> Option<InfixKind> {
    match kind {
        TokenKind::Plus => Some(InfixKind::Plus),
        // A lone `-` lexes as an integer token; in operator position it is
        // the subtraction operator.
        TokenKind::Int(text) if &**text == "-" => Some(InfixKind::Minus),
        TokenKind::Asterisk => Some(InfixKind::Multiply),
        TokenKind::Slash => Some(InfixKind::Divide),
        TokenKind::LessThan => Some(InfixKind::LessThan),
        TokenKind::Equal => Some(InfixKind::Equal),
        TokenKind::And => Some(InfixKind::And),
        TokenKind::Or => Some(InfixKind::Or),
        _ => None,
    }
}

/// Parse a single operator-free unit of an expression.
fn parse_term(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::LParen => {
            let expression = parse_expression(parser)?;
            parser.expect_token(TokenKind::RParen)?;
            Ok(expression)
        }
        TokenKind::Int(text) => text
            .parse()
            .map(Expression::Literal)
            .map_err(|_| parser.syntax_error()),
        TokenKind::Char(ch) => Ok(Expression::Literal(ch as i32)),
        // A string is sugar for a sequence of its character codes; the
        // conversion happens on the decoded token text directly.
        TokenKind::Str(text) => Ok(Expression::SequenceLiteral(
            text.chars()
                .map(|ch| Expression::Literal(ch as i32))
                .collect(),
        )),
        TokenKind::Ident(name) => parser.identifier(name).map(Expression::Variable),
        TokenKind::LBracket => parse_sequence_literal(parser),
        // `len` applies to everything up to the expression terminator.
        TokenKind::Len => Ok(Expression::Len(Box::new(parse_expression(parser)?))),
        _ => Err(parser.syntax_error()),
    }
}

fn parse_sequence_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut elements = Vec::new();
    loop {
        match parser.peek_token()? {
            None => return Err(parser.syntax_error()),
            Some(token) if token.kind == TokenKind::RBracket => {
                parser.next_token()?;
                break;
            }
            Some(_) => {}
        }
        elements.push(parse_expression(parser)?);
        match parser.require_token()?.kind {
            // A trailing comma before the bracket is accepted.
            TokenKind::Comma => continue,
            TokenKind::RBracket => break,
            _ => return Err(parser.syntax_error()),
        }
    }
    Ok(Expression::SequenceLiteral(elements))
}
