//! Sanitization and safe arithmetic evaluation for the math handler.
//!
//! Input is first reduced to the character set
//! `{0-9, '.', '+', '-', '*', '/', '(', ')', whitespace}`; everything else
//! is silently dropped. The surviving text is evaluated by a dedicated
//! tokenizer and recursive-descent parser over the four binary operators,
//! unary sign, and parentheses, with conventional precedence and
//! left-to-right associativity. The evaluator binds to arithmetic only:
//! there are no names, no calls, and no way to reach host code.
//!
//! Note that sanitization can turn salvageable text into a malformed
//! expression ("2 + two" becomes "2 +"); that is the documented behavior,
//! and the resulting parse error is reported rather than papered over.
//!
//! # Numeric Semantics
//!
//! [`Value`] mirrors the observable behavior of the original host runtime:
//! integer chains over `+ - *` stay integral (`"4 + 5 * 2"` evaluates to
//! `14`), division always produces a float (`"10/2"` is `5.0`), any float
//! operand makes the result a float, and integer overflow promotes to
//! float instead of wrapping.
//!
//! # Examples
//!
//! ```rust
//! use mathchat::expr::{evaluate, ExpressionError};
//!
//! assert_eq!(evaluate("4 + 5 * 2").unwrap().to_string(), "14");
//! assert_eq!(evaluate("10 / 4").unwrap().to_string(), "2.5");
//! assert!(matches!(evaluate("2/0"), Err(ExpressionError::DivisionByZero)));
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Retain only the characters the evaluator understands.
///
/// Kept: ASCII digits, `.`, `+`, `-`, `*`, `/`, `(`, `)`, and whitespace.
/// All other characters (letters, punctuation, shell metacharacters, ...)
/// are removed before the expression is ever parsed.
///
/// # Examples
///
/// ```rust
/// use mathchat::expr::sanitize;
///
/// assert_eq!(sanitize("what's 2-2 cats?"), " 2-2 ");
/// assert_eq!(sanitize("2+3; rm -rf"), "2+3  -");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')') || c.is_whitespace()
        })
        .collect()
}

/// A numeric result: integral while the arithmetic allows it, float
/// otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    #[must_use]
    fn as_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(b)
                .map(Value::Int)
                .unwrap_or(Value::Float(a as f64 + b as f64)),
            _ => Value::Float(self.as_f64() + rhs.as_f64()),
        }
    }

    fn sub(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_sub(b)
                .map(Value::Int)
                .unwrap_or(Value::Float(a as f64 - b as f64)),
            _ => Value::Float(self.as_f64() - rhs.as_f64()),
        }
    }

    fn mul(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_mul(b)
                .map(Value::Int)
                .unwrap_or(Value::Float(a as f64 * b as f64)),
            _ => Value::Float(self.as_f64() * rhs.as_f64()),
        }
    }

    /// Division always yields a float; a zero divisor is an error.
    fn div(self, rhs: Value) -> Result<Value, ExpressionError> {
        if rhs.as_f64() == 0.0 {
            return Err(ExpressionError::DivisionByZero);
        }
        Ok(Value::Float(self.as_f64() / rhs.as_f64()))
    }

    fn neg(self) -> Value {
        match self {
            Value::Int(i) => i
                .checked_neg()
                .map(Value::Int)
                .unwrap_or(Value::Float(-(i as f64))),
            Value::Float(f) => Value::Float(-f),
        }
    }
}

impl std::fmt::Display for Value {
    /// Integers print bare ("14"); floats keep a fractional part even when
    /// integral ("5.0"), matching the stringification of the original
    /// host runtime.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// Ways an expression can fail to evaluate.
///
/// All variants render through `Display` into the diagnostic the math
/// handler embeds after its `"Error in expression: "` prefix. Offsets are
/// relative to the sanitized text, not the raw input.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ExpressionError {
    /// Nothing evaluable survived sanitization.
    #[error("empty expression")]
    #[diagnostic(
        code(mathchat::expr::empty),
        help("Only digits, '.', '+', '-', '*', '/', parentheses, and whitespace survive sanitization.")
    )]
    Empty,

    /// A numeric literal with too many dots or no digits, e.g. `1.2.3`.
    #[error("malformed number `{lexeme}`")]
    #[diagnostic(code(mathchat::expr::malformed_number))]
    MalformedNumber { lexeme: String },

    /// A token that cannot appear at this position, e.g. `2 3` or `)`.
    #[error("unexpected `{found}` at offset {offset}")]
    #[diagnostic(code(mathchat::expr::unexpected_token))]
    UnexpectedToken { found: String, offset: usize },

    /// The expression ends where an operand was expected, e.g. `2 +`.
    #[error("unexpected end of expression")]
    #[diagnostic(code(mathchat::expr::unexpected_end))]
    UnexpectedEnd,

    /// An opening parenthesis was never closed.
    #[error("missing closing parenthesis")]
    #[diagnostic(code(mathchat::expr::unbalanced_parens))]
    MissingClosingParen,

    /// A division whose divisor evaluated to zero.
    #[error("division by zero")]
    #[diagnostic(code(mathchat::expr::division_by_zero))]
    DivisionByZero,
}

/// Sanitize and evaluate a raw input string.
///
/// This is the math handler's entry point: sanitization and evaluation are
/// a single pure function over the raw string, so repeated evaluation of
/// the same input always yields the same result.
pub fn evaluate(raw: &str) -> Result<Value, ExpressionError> {
    let sanitized = sanitize(raw);
    let tokens = lex(&sanitized)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }
    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let value = parser.expression()?;
    if let Some(extra) = parser.peek() {
        return Err(ExpressionError::UnexpectedToken {
            found: extra.token.describe(),
            offset: extra.offset,
        });
    }
    Ok(value)
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(Value),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(v) => v.to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
struct Spanned {
    token: Token,
    offset: usize,
}

fn lex(sanitized: &str) -> Result<Vec<Spanned>, ExpressionError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = sanitized.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ if c.is_ascii_digit() || c == '.' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                let lexeme: String = chars[start..pos].iter().collect();
                tokens.push(Spanned {
                    token: Token::Number(parse_number(&lexeme)?),
                    offset: start,
                });
                continue;
            }
            // Sanitization removes everything else; if a stray character
            // shows up anyway, report it instead of panicking.
            other => {
                return Err(ExpressionError::UnexpectedToken {
                    found: other.to_string(),
                    offset: pos,
                });
            }
        };
        tokens.push(Spanned { token, offset: pos });
        pos += 1;
    }

    Ok(tokens)
}

fn parse_number(lexeme: &str) -> Result<Value, ExpressionError> {
    if lexeme.contains('.') {
        // At most one dot, and at least one digit somewhere.
        let valid = lexeme.matches('.').count() == 1 && lexeme.chars().any(|c| c.is_ascii_digit());
        if !valid {
            return Err(ExpressionError::MalformedNumber {
                lexeme: lexeme.to_string(),
            });
        }
        lexeme
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ExpressionError::MalformedNumber {
                lexeme: lexeme.to_string(),
            })
    } else {
        // Integer literal; values beyond i64 promote to float rather than
        // failing, since the original host had unbounded integers.
        lexeme
            .parse::<i64>()
            .map(Value::Int)
            .or_else(|_| lexeme.parse::<f64>().map(Value::Float))
            .map_err(|_| ExpressionError::MalformedNumber {
                lexeme: lexeme.to_string(),
            })
    }
}

/// Recursive-descent parser/evaluator.
///
/// Grammar:
/// ```text
/// expression := term  (('+' | '-') term)*
/// term       := factor (('*' | '/') factor)*
/// factor     := ('+' | '-') factor | primary
/// primary    := NUMBER | '(' expression ')'
/// ```
struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    // Lookahead borrows the token slice, not the parser, so match arms can
    // advance and recurse while holding a peeked token.
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn expression(&mut self) -> Result<Value, ExpressionError> {
        let mut lhs = self.term()?;
        while let Some(spanned) = self.peek() {
            match spanned.token {
                Token::Plus => {
                    self.pos += 1;
                    lhs = lhs.add(self.term()?);
                }
                Token::Minus => {
                    self.pos += 1;
                    lhs = lhs.sub(self.term()?);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Value, ExpressionError> {
        let mut lhs = self.factor()?;
        while let Some(spanned) = self.peek() {
            match spanned.token {
                Token::Star => {
                    self.pos += 1;
                    lhs = lhs.mul(self.factor()?);
                }
                Token::Slash => {
                    self.pos += 1;
                    lhs = lhs.div(self.factor()?)?;
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Value, ExpressionError> {
        match self.peek().map(|s| &s.token) {
            Some(Token::Plus) => {
                self.pos += 1;
                self.factor()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(self.factor()?.neg())
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Value, ExpressionError> {
        let Some(spanned) = self.advance() else {
            return Err(ExpressionError::UnexpectedEnd);
        };
        match &spanned.token {
            Token::Number(value) => Ok(*value),
            Token::LParen => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(value),
                    Some(other) => Err(ExpressionError::UnexpectedToken {
                        found: other.token.describe(),
                        offset: other.offset,
                    }),
                    None => Err(ExpressionError::MissingClosingParen),
                }
            }
            other => Err(ExpressionError::UnexpectedToken {
                found: other.describe(),
                offset: spanned.offset,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_only_the_allowed_set() {
        assert_eq!(sanitize("2 + two"), "2 + ");
        assert_eq!(sanitize("abc"), "");
        assert_eq!(sanitize("(1.5)*2"), "(1.5)*2");
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        assert_eq!(evaluate("4 + 5 * 2").unwrap(), Value::Int(14));
        assert_eq!(evaluate("(2+3)*4").unwrap(), Value::Int(20));
        assert_eq!(evaluate("-3 + 5").unwrap(), Value::Int(2));
    }

    #[test]
    fn division_always_floats() {
        assert_eq!(evaluate("10/2").unwrap().to_string(), "5.0");
        assert_eq!(evaluate("10 / 4").unwrap().to_string(), "2.5");
    }

    #[test]
    fn malformed_inputs_error() {
        assert_eq!(evaluate("abc"), Err(ExpressionError::Empty));
        assert_eq!(evaluate("2 +"), Err(ExpressionError::UnexpectedEnd));
        assert_eq!(evaluate("2/0"), Err(ExpressionError::DivisionByZero));
        assert_eq!(evaluate("(2+3"), Err(ExpressionError::MissingClosingParen));
        assert!(matches!(
            evaluate("1.2.3"),
            Err(ExpressionError::MalformedNumber { .. })
        ));
        assert!(matches!(
            evaluate("2 3"),
            Err(ExpressionError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn overflow_promotes_to_float() {
        let huge = i64::MAX.to_string();
        let result = evaluate(&format!("{huge} + 1")).unwrap();
        assert!(matches!(result, Value::Float(_)));
    }
}
