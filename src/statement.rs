//! Restricted conditional statements
//!
//! Parses filter statements such as `"x > 25 and x % 5 == 0"` into a small
//! expression tree over the single free variable `x` and evaluates them
//! against sample values.
//!
//! # Supported Syntax
//!
//! ```text
//! x > 25
//! x >= 10 and x < 20
//! not (x == 0 or x == 999)
//! x % 5 == 0
//! (x - 32) * 5 / 9 > 20
//! x ** 2 <= 100
//! ```
//!
//! The grammar admits numeric literals, `x`, parentheses, `+ - * / % **`,
//! unary minus, the six comparisons, and `and`/`or`/`not` (case
//! insensitive). Nothing else parses — in particular no other identifier
//! and no statement separator — so a statement is safe to compile from
//! untrusted text: compilation fails fast, before any sample is evaluated.
//!
//! # Example
//!
//! ```rust
//! use zephyr_ts::Statement;
//!
//! let statement = Statement::parse("x > 25 and x % 5 == 0").unwrap();
//! assert!(statement.eval(30.0));
//! assert!(!statement.eval(27.0));
//!
//! // Anything outside the grammar is rejected up front
//! assert!(Statement::parse("x; import(os)").is_err());
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{opt, recognize, value},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Why a statement failed to compile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// The statement is empty or all whitespace
    #[error("statement is empty")]
    Empty,

    /// The statement parsed, but text remained (e.g. a second statement)
    #[error("unexpected input after statement: '{0}'")]
    TrailingInput(String),

    /// The statement does not match the grammar; the variable must be
    /// named `x` and only arithmetic, comparison, and boolean operators
    /// are allowed
    #[error("syntax error at: '{0}'")]
    Syntax(String),
}

// ============================================================================
// Expression tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Expr {
    Number(f64),
    Variable,
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

/// Evaluation result: a number or a boolean
///
/// Booleans coerce to 1/0 in arithmetic and numbers are truthy when
/// non-zero, so mixed expressions behave the way the statement author
/// expects from scripting languages.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    fn truthy(self) -> bool {
        match self {
            Value::Bool(b) => b,
            Value::Number(n) => n != 0.0,
        }
    }

    fn as_number(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
        }
    }
}

impl Expr {
    fn eval(&self, x: f64) -> Value {
        match self {
            Expr::Number(n) => Value::Number(*n),
            Expr::Variable => Value::Number(x),
            Expr::Unary(UnaryOp::Neg, operand) => Value::Number(-operand.eval(x).as_number()),
            Expr::Unary(UnaryOp::Not, operand) => Value::Bool(!operand.eval(x).truthy()),
            Expr::Binary(op, lhs, rhs) => {
                match op {
                    BinaryOp::Or => Value::Bool(lhs.eval(x).truthy() || rhs.eval(x).truthy()),
                    BinaryOp::And => Value::Bool(lhs.eval(x).truthy() && rhs.eval(x).truthy()),
                    _ => {
                        let a = lhs.eval(x).as_number();
                        let b = rhs.eval(x).as_number();
                        match op {
                            BinaryOp::Eq => Value::Bool(a == b),
                            BinaryOp::Ne => Value::Bool(a != b),
                            BinaryOp::Lt => Value::Bool(a < b),
                            BinaryOp::Le => Value::Bool(a <= b),
                            BinaryOp::Gt => Value::Bool(a > b),
                            BinaryOp::Ge => Value::Bool(a >= b),
                            BinaryOp::Add => Value::Number(a + b),
                            BinaryOp::Sub => Value::Number(a - b),
                            BinaryOp::Mul => Value::Number(a * b),
                            BinaryOp::Div => Value::Number(a / b),
                            BinaryOp::Mod => Value::Number(a % b),
                            BinaryOp::Pow => Value::Number(a.powf(b)),
                            BinaryOp::Or | BinaryOp::And => unreachable!("handled above"),
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Statement
// ============================================================================

/// A compiled conditional statement over the single free variable `x`
///
/// Compile once with [`Statement::parse`], then test any number of values
/// with [`Statement::eval`]. Construction never executes anything: the
/// statement is an explicit expression tree, not evaluated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    root: Expr,
    source: String,
}

impl Statement {
    /// Compile a statement, rejecting anything outside the grammar
    ///
    /// Fails fast on empty input, foreign identifiers, unsupported
    /// operators, and trailing text, so a bad statement is reported before
    /// any sample is evaluated.
    pub fn parse(input: &str) -> Result<Self, StatementError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(StatementError::Empty);
        }
        match or_expr(trimmed) {
            Ok((rest, root)) => {
                if rest.trim().is_empty() {
                    Ok(Self {
                        root,
                        source: trimmed.to_string(),
                    })
                } else {
                    Err(StatementError::TrailingInput(rest.trim().to_string()))
                }
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err(StatementError::Syntax(e.input.to_string()))
            }
            Err(nom::Err::Incomplete(_)) => Err(StatementError::Syntax(trimmed.to_string())),
        }
    }

    /// Evaluate the statement with `x` bound to a value
    ///
    /// The result is the truthiness of the root expression: booleans as
    /// themselves, numbers truthy when non-zero.
    pub fn eval(&self, x: f64) -> bool {
        self.root.eval(x).truthy()
    }

    /// The statement text as supplied to [`Statement::parse`], trimmed
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl FromStr for Statement {
    type Err = StatementError;

    fn from_str(input: &str) -> Result<Self, StatementError> {
        Statement::parse(input)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

// ============================================================================
// Grammar
//
// or_expr    := and_expr ( "or" and_expr )*
// and_expr   := not_expr ( "and" not_expr )*
// not_expr   := "not" not_expr | comparison
// comparison := additive ( cmp_op additive )?
// additive   := multiplicative ( ("+" | "-") multiplicative )*
// multiplicative := unary ( ("*" | "/" | "%") unary )*
// unary      := "-" unary | power
// power      := atom ( "**" unary )?
// atom       := number | "x" | "(" or_expr ")"
// ============================================================================

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Case-insensitive keyword that must not run into a longer identifier
fn kw(word: &'static str) -> impl Fn(&str) -> IResult<&str, ()> {
    move |input: &str| {
        let matched: IResult<&str, &str> = tag_no_case(word).parse(input);
        let (rest, _) = matched?;
        match rest.chars().next() {
            Some(c) if is_ident_char(c) => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Tag,
            ))),
            _ => Ok((rest, ())),
        }
    }
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut lhs) = and_expr(input)?;
    loop {
        let (spaced, _) = multispace0(input)?;
        match kw("or")(spaced) {
            Ok((after_kw, _)) => {
                let (after_rhs, rhs) = and_expr(after_kw)?;
                lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
                input = after_rhs;
            }
            Err(_) => return Ok((input, lhs)),
        }
    }
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut lhs) = not_expr(input)?;
    loop {
        let (spaced, _) = multispace0(input)?;
        match kw("and")(spaced) {
            Ok((after_kw, _)) => {
                let (after_rhs, rhs) = not_expr(after_kw)?;
                lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
                input = after_rhs;
            }
            Err(_) => return Ok((input, lhs)),
        }
    }
}

fn not_expr(input: &str) -> IResult<&str, Expr> {
    let (spaced, _) = multispace0(input)?;
    if let Ok((after_kw, _)) = kw("not")(spaced) {
        let (rest, operand) = not_expr(after_kw)?;
        return Ok((rest, Expr::Unary(UnaryOp::Not, Box::new(operand))));
    }
    comparison(spaced)
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((
        value(BinaryOp::Eq, tag("==")),
        value(BinaryOp::Ne, tag("!=")),
        value(BinaryOp::Le, tag("<=")),
        value(BinaryOp::Ge, tag(">=")),
        value(BinaryOp::Lt, tag("<")),
        value(BinaryOp::Gt, tag(">")),
    ))
    .parse(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (after_lhs, lhs) = additive(input)?;
    let (spaced, _) = multispace0(after_lhs)?;
    match comparison_op(spaced) {
        Ok((after_op, op)) => {
            let (rest, rhs) = additive(after_op)?;
            Ok((rest, Expr::Binary(op, Box::new(lhs), Box::new(rhs))))
        }
        Err(_) => Ok((after_lhs, lhs)),
    }
}

fn additive(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut lhs) = multiplicative(input)?;
    loop {
        let (spaced, _) = multispace0(input)?;
        let op: IResult<&str, BinaryOp> = alt((
            value(BinaryOp::Add, char('+')),
            value(BinaryOp::Sub, char('-')),
        ))
        .parse(spaced);
        match op {
            Ok((after_op, op)) => {
                let (rest, rhs) = multiplicative(after_op)?;
                lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
                input = rest;
            }
            Err(_) => return Ok((input, lhs)),
        }
    }
}

/// `*` that is not the first half of `**`
fn mul_op(input: &str) -> IResult<&str, BinaryOp> {
    let (rest, _) = char('*')(input)?;
    if rest.starts_with('*') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    Ok((rest, BinaryOp::Mul))
}

fn multiplicative(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut lhs) = unary(input)?;
    loop {
        let (spaced, _) = multispace0(input)?;
        let op: IResult<&str, BinaryOp> = alt((
            mul_op,
            value(BinaryOp::Div, char('/')),
            value(BinaryOp::Mod, char('%')),
        ))
        .parse(spaced);
        match op {
            Ok((after_op, op)) => {
                let (rest, rhs) = unary(after_op)?;
                lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
                input = rest;
            }
            Err(_) => return Ok((input, lhs)),
        }
    }
}

fn unary(input: &str) -> IResult<&str, Expr> {
    let (spaced, _) = multispace0(input)?;
    let minus: IResult<&str, char> = char('-')(spaced);
    if let Ok((after_minus, _)) = minus {
        let (rest, operand) = unary(after_minus)?;
        return Ok((rest, Expr::Unary(UnaryOp::Neg, Box::new(operand))));
    }
    power(spaced)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (after_base, base) = atom(input)?;
    let (spaced, _) = multispace0(after_base)?;
    let starred: IResult<&str, &str> = tag("**").parse(spaced);
    match starred {
        Ok((after_op, _)) => {
            // Right-associative: 2 ** 3 ** 2 is 2 ** (3 ** 2)
            let (rest, exponent) = unary(after_op)?;
            Ok((
                rest,
                Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)),
            ))
        }
        Err(_) => Ok((after_base, base)),
    }
}

fn atom(input: &str) -> IResult<&str, Expr> {
    let (spaced, _) = multispace0(input)?;
    alt((paren_expr, variable, number)).parse(spaced)
}

fn paren_expr(input: &str) -> IResult<&str, Expr> {
    let (input, _) = char('(')(input)?;
    let (input, inner) = or_expr(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, inner))
}

/// The single free variable, always written `x`
fn variable(input: &str) -> IResult<&str, Expr> {
    let (rest, _) = char('x')(input)?;
    match rest.chars().next() {
        // `xy`, `x2` etc. are foreign identifiers, not the variable
        Some(c) if is_ident_char(c) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        ))),
        _ => Ok((rest, Expr::Variable)),
    }
}

/// Numeric literal: digits with optional fraction and exponent
///
/// Deliberately narrower than a general float parser: words such as `nan`
/// and `inf` stay foreign identifiers.
fn number(input: &str) -> IResult<&str, Expr> {
    let (rest, text) = recognize((
        digit1,
        // `opt(digit1)` rather than `digit0`: nom 8.0.0's `recognize` drops
        // the digits when `digit0` consumes them right at end of input
        opt((char('.'), opt(digit1))),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;
    let parsed: f64 = text.parse().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;
    Ok((rest, Expr::Number(parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_comparison() {
        let statement = Statement::parse("x > 25").unwrap();
        assert!(statement.eval(26.0));
        assert!(!statement.eval(25.0));
        assert!(!statement.eval(-5.0));
    }

    #[test]
    fn test_modulo_and_conjunction() {
        let statement = Statement::parse("x > 25 and x % 5 == 0").unwrap();
        assert!(!statement.eval(20.0));
        assert!(!statement.eval(25.0));
        assert!(statement.eval(30.0));
        assert!(statement.eval(35.0));
        assert!(!statement.eval(31.0));
    }

    #[test]
    fn test_boolean_combinators() {
        let statement = Statement::parse("x < 0 or x > 100").unwrap();
        assert!(statement.eval(-1.0));
        assert!(statement.eval(101.0));
        assert!(!statement.eval(50.0));

        let statement = Statement::parse("not (x == 0 or x == 1)").unwrap();
        assert!(statement.eval(2.0));
        assert!(!statement.eval(1.0));

        // Keywords are case-insensitive
        let statement = Statement::parse("x > 1 AND x < 3").unwrap();
        assert!(statement.eval(2.0));
    }

    #[test]
    fn test_arithmetic_precedence() {
        let statement = Statement::parse("x + 2 * 3 == 10").unwrap();
        assert!(statement.eval(4.0));

        let statement = Statement::parse("(x + 2) * 3 == 18").unwrap();
        assert!(statement.eval(4.0));

        let statement = Statement::parse("x ** 2 <= 100").unwrap();
        assert!(statement.eval(10.0));
        assert!(!statement.eval(11.0));

        // Right-associative power
        let statement = Statement::parse("2 ** 3 ** 2 == x").unwrap();
        assert!(statement.eval(512.0));

        let statement = Statement::parse("-x == 3").unwrap();
        assert!(statement.eval(-3.0));
    }

    #[test]
    fn test_bare_value_truthiness() {
        let statement = Statement::parse("x").unwrap();
        assert!(statement.eval(1.0));
        assert!(statement.eval(-0.5));
        assert!(!statement.eval(0.0));
    }

    #[test]
    fn test_rejects_injection() {
        assert!(matches!(
            Statement::parse("x; import(os)"),
            Err(StatementError::TrailingInput(_))
        ));
        assert!(Statement::parse("__builtins__").is_err());
        assert!(Statement::parse("x > 0; x < 0").is_err());
    }

    #[test]
    fn test_rejects_foreign_identifiers() {
        assert!(matches!(
            Statement::parse("y > 25"),
            Err(StatementError::Syntax(_))
        ));
        assert!(Statement::parse("x2 > 25").is_err());
        assert!(Statement::parse("xor 1").is_err());
        assert!(Statement::parse("abs(x) > 1").is_err());
        assert!(Statement::parse("nan > 1").is_err());
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(Statement::parse(""), Err(StatementError::Empty)));
        assert!(matches!(Statement::parse("   "), Err(StatementError::Empty)));
        assert!(Statement::parse("x >").is_err());
        assert!(Statement::parse("(x > 1").is_err());
        assert!(Statement::parse("x = 5").is_err());
        assert!(Statement::parse("x and").is_err());
    }

    #[test]
    fn test_numeric_literals() {
        assert!(Statement::parse("x == 2.5").unwrap().eval(2.5));
        assert!(Statement::parse("x == 1e3").unwrap().eval(1000.0));
        assert!(Statement::parse("x == 2.5e-1").unwrap().eval(0.25));
        assert!(Statement::parse("x > 1.").unwrap().eval(2.0));
    }

    #[test]
    fn test_source_round_trip() {
        let statement = Statement::parse("  x > 25  ").unwrap();
        assert_eq!(statement.source(), "x > 25");
        assert_eq!(statement.to_string(), "x > 25");
        let reparsed: Statement = statement.source().parse().unwrap();
        assert_eq!(reparsed, statement);
    }
}
