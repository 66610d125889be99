use log::debug;

use crate::ast::{CompareOp, Condition, Expr, Program, Statement};
use crate::error::{ParseError, SyntaxError};

/// How parse failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Skip unparsable lines silently; undefined variables evaluate to zero.
    #[default]
    Lenient,
    /// Surface every parse failure as a [`SyntaxError`] and undefined
    /// variables as runtime errors.
    Strict,
}

/// Statements nested deeper than this on a single line are rejected instead
/// of risking a stack overflow while parsing or evaluating them.
pub const MAX_NESTING_DEPTH: usize = 64;

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    mode: Mode,
}

impl Parser {
    pub fn new() -> Parser {
        Parser::with_mode(Mode::Lenient)
    }

    pub fn with_mode(mode: Mode) -> Parser {
        Parser { mode }
    }

    /// Parse a whole program, one statement per line.
    ///
    /// In lenient mode lines that fail to parse are dropped (logged at debug
    /// level) and the result is always `Ok`. In strict mode all failures are
    /// collected and reported together.
    pub fn parse_program(&self, source: &str) -> Result<Program, Vec<SyntaxError>> {
        let mut program = Program::new();
        let mut errors: Vec<SyntaxError> = Vec::new();

        for (index, line) in source.lines().enumerate() {
            match self.parse_line(line) {
                Ok(Some(statement)) => program.statements.push(statement),
                Ok(None) => {}
                Err(kind) => match self.mode {
                    Mode::Lenient => {
                        debug!("skipping line {}: {}", index + 1, kind);
                    }
                    Mode::Strict => errors.push(SyntaxError {
                        line: index + 1,
                        snippet: line.trim().to_owned(),
                        kind,
                    }),
                },
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(program)
    }

    /// Parse a single line of source. Blank lines are `Ok(None)`.
    pub fn parse_line(&self, line: &str) -> ParseResult<Option<Statement>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        self.parse_statement(line, 0).map(Some)
    }

    fn parse_statement(&self, text: &str, depth: usize) -> ParseResult<Statement> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep(MAX_NESTING_DEPTH));
        }

        // Keyword prefixes are checked in priority order; first match wins.
        if let Some(rest) = text.strip_prefix("print ") {
            self.parse_print(rest.trim())
        } else if let Some(rest) = text.strip_prefix("let ") {
            self.parse_let(rest.trim())
        } else if let Some(rest) = text.strip_prefix("if ") {
            self.parse_if(rest, depth)
        } else if let Some(rest) = text.strip_prefix("for ") {
            self.parse_for(rest.trim(), depth)
        } else {
            Err(ParseError::UnrecognizedStatement(text.to_owned()))
        }
    }

    fn parse_print(&self, arg: &str) -> ParseResult<Statement> {
        if arg.len() >= 2 && arg.starts_with('"') && arg.ends_with('"') {
            let inner = &arg[1..arg.len() - 1];
            return Ok(Statement::Print(Expr::String(inner.to_owned())));
        }

        if arg.starts_with('"') {
            return Err(ParseError::StringNotClosed(arg.to_owned()));
        }

        Ok(Statement::Print(Expr::Variable(parse_identifier(arg)?)))
    }

    fn parse_let(&self, rest: &str) -> ParseResult<Statement> {
        let (name, value) = rest
            .split_once('=')
            .ok_or_else(|| ParseError::MalformedLet(rest.to_owned()))?;

        let name = parse_identifier(name.trim())?;
        let value = parse_value(value.trim())?;

        Ok(Statement::Let { name, value })
    }

    fn parse_if(&self, rest: &str, depth: usize) -> ParseResult<Statement> {
        // The first ` then ` splits condition from consequence; a nested `if`
        // in the consequence keeps its own delimiter.
        let (clause, consequence) = rest.split_once(" then ").ok_or(ParseError::MissingThen)?;

        let tokens: Vec<&str> = clause.split_whitespace().collect();
        let (var, op, literal) = match tokens.as_slice() {
            [var, op, literal] => (*var, *op, *literal),
            _ => return Err(ParseError::MalformedCondition(clause.trim().to_owned())),
        };

        let condition = Condition {
            var: parse_identifier(var)?,
            op: CompareOp::lookup(op).ok_or_else(|| ParseError::UnknownOperator(op.to_owned()))?,
            literal: parse_integer(literal)?,
        };

        let consequence = self.parse_statement(consequence.trim(), depth + 1)?;

        Ok(Statement::If {
            condition,
            consequence: Box::new(consequence),
        })
    }

    /// Parse `<var> = <start> to <end>` followed by either a braced body or
    /// the rest of the line as an unbraced body statement.
    fn parse_for(&self, rest: &str, depth: usize) -> ParseResult<Statement> {
        let header_err = || ParseError::MalformedForHeader(rest.to_owned());

        let (var, text) = take_identifier(rest);
        if var.is_empty() {
            return Err(header_err());
        }
        let var = parse_identifier(var)?;

        let text = text.trim_start();
        let text = text.strip_prefix('=').ok_or_else(header_err)?;

        let (start, text) = take_number(text.trim_start());
        if start.is_empty() {
            return Err(header_err());
        }
        let start = parse_integer(start)?;

        // `to` must be a standalone word between the bounds
        if !starts_with_whitespace(text) {
            return Err(header_err());
        }
        let text = text.trim_start().strip_prefix("to").ok_or_else(header_err)?;
        if !starts_with_whitespace(text) {
            return Err(header_err());
        }

        let (end, tail) = take_number(text.trim_start());
        if end.is_empty() {
            return Err(header_err());
        }
        let end = parse_integer(end)?;

        let body = self.parse_for_body(tail, depth)?;

        Ok(Statement::For {
            var,
            start,
            end,
            body,
        })
    }

    fn parse_for_body(&self, tail: &str, depth: usize) -> ParseResult<Option<Box<Statement>>> {
        let trimmed = tail.trim();

        if let Some(after_brace) = trimmed.strip_prefix('{') {
            // Body is everything strictly between the first `{` and the last
            // `}`; nested braces stay verbatim for the recursive parse and
            // anything after the last `}` is ignored.
            let close = after_brace
                .rfind('}')
                .ok_or(ParseError::BodyNotClosed)?;

            let body = after_brace[..close].trim();
            if body.is_empty() {
                // The loop still runs and assigns its induction variable.
                return Ok(None);
            }

            return Ok(Some(Box::new(self.parse_statement(body, depth + 1)?)));
        }

        if trimmed.is_empty() {
            return Err(ParseError::MissingLoopBody);
        }
        if !starts_with_whitespace(tail) {
            return Err(ParseError::MalformedForHeader(tail.trim().to_owned()));
        }

        Ok(Some(Box::new(self.parse_statement(trimmed, depth + 1)?)))
    }
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

/// Validate a whole token as an identifier: leading alphabetic or `_`,
/// alphanumeric or `_` after that.
fn parse_identifier(token: &str) -> ParseResult<String> {
    let mut chars = token.chars();

    let valid = match chars.next() {
        Some(c) => {
            (c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(token.to_owned())
    } else {
        Err(ParseError::InvalidIdentifier(token.to_owned()))
    }
}

fn parse_integer(token: &str) -> ParseResult<i64> {
    token
        .parse()
        .map_err(|_| ParseError::InvalidInteger(token.to_owned()))
}

/// An integer literal or a variable reference, e.g. the right side of a
/// `let`. Anything that starts like a number must be a number.
fn parse_value(token: &str) -> ParseResult<Expr> {
    if token.starts_with(|c: char| c == '+' || c == '-' || c.is_ascii_digit()) {
        return Ok(Expr::Integer(parse_integer(token)?));
    }

    Ok(Expr::Variable(parse_identifier(token)?))
}

/// Split a leading identifier run off the front of `text`.
fn take_identifier(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    text.split_at(end)
}

/// Split a leading `[+-]?digits` run off the front of `text`.
fn take_number(text: &str) -> (&str, &str) {
    let mut end = 0;
    for (i, c) in text.char_indices() {
        let is_sign = (c == '+' || c == '-') && i == 0;
        if is_sign || c.is_ascii_digit() {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    text.split_at(end)
}

fn starts_with_whitespace(text: &str) -> bool {
    text.starts_with(|c: char| c.is_whitespace())
}
