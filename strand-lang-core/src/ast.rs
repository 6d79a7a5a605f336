use std::fmt::Display;
use std::rc::Rc;

/// Longest legal variable name.
pub const MAX_VAR_NAME: usize = 20;

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub name: Rc<str>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Literal(i32),
    Variable(Identifier),
    Infix(InfixKind, Box<Expression>, Box<Expression>),
    /// `seq[index]` where the index is a single term.
    Index(Box<Expression>, Box<Expression>),
    SequenceLiteral(Vec<Expression>),
    Len(Box<Expression>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixKind {
    Plus,
    Minus,
    Multiply,
    Divide,
    LessThan,
    Equal,
    And,
    Or,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Print(Expression),
    Compound(Vec<Statement>),
    If {
        condition: Expression,
        body: Box<Statement>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    Push {
        target: Expression,
        value: Expression,
    },
    Assign {
        target: Identifier,
        index: Option<Expression>,
        value: Expression,
    },
}

impl InfixKind {
    fn to_str(self) -> &'static str {
        use InfixKind::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            LessThan => "<",
            Equal => "==",
            And => "&&",
            Or => "||",
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Literal(val) => write!(f, "{}", val),
            Variable(ident) => write!(f, "{}", ident.name),
            Infix(kind, left, right) => write!(f, "({} {} {})", left, kind.to_str(), right),
            Index(seq, index) => write!(f, "({}[{}])", seq, index),
            SequenceLiteral(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Len(expr) => write!(f, "(len {})", expr),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Print(expr) => write!(f, "print {};", expr),
            Compound(statements) => {
                write!(f, "{{")?;
                for statement in statements {
                    write!(f, " {}", statement)?;
                }
                write!(f, " }}")
            }
            If { condition, body } => write!(f, "if ({}) {}", condition, body),
            While { condition, body } => write!(f, "while ({}) {}", condition, body),
            Push { target, value } => write!(f, "push {}, {};", target, value),
            Assign {
                target,
                index: None,
                value,
            } => write!(f, "{} = {};", target.name, value),
            Assign {
                target,
                index: Some(index),
                value,
            } => write!(f, "{}[{}] = {};", target.name, index, value),
        }
    }
}
