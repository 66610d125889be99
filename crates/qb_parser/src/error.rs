use thiserror::Error;

/// Ways a single statement can fail to parse.
///
/// In lenient mode these are swallowed by [`Parser::parse_program`] and the
/// offending line is skipped; in strict mode they surface wrapped in a
/// [`SyntaxError`].
///
/// [`Parser::parse_program`]: crate::Parser::parse_program
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// The line matches none of the four statement keywords
    #[error("unrecognized statement `{0}`")]
    UnrecognizedStatement(String),
    /// A name where an identifier was expected but is not one (e.g. `let 2x = 1`)
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
    /// A token where a base-10 integer was expected but is not one
    #[error("invalid integer literal `{0}`")]
    InvalidInteger(String),
    /// A `print` argument opened with `"` but never closed it
    #[error("unterminated string literal `{0}`")]
    StringNotClosed(String),
    /// A `let` statement with no `=` sign
    #[error("malformed let statement `{0}`")]
    MalformedLet(String),
    /// An `if` statement with no ` then ` delimiter
    #[error("`if` statement has no ` then ` delimiter")]
    MissingThen,
    /// An `if` condition clause that is not exactly `<var> <op> <literal>`
    #[error("malformed condition `{0}`")]
    MalformedCondition(String),
    /// A comparison operator other than `>`, `<` or `==`
    #[error("unknown comparison operator `{0}`")]
    UnknownOperator(String),
    /// A `for` header that is not `<var> = <start> to <end>`
    #[error("malformed for header `{0}`")]
    MalformedForHeader(String),
    /// A braced `for` body with no closing `}`
    #[error("`for` body has no closing brace")]
    BodyNotClosed,
    /// An unbraced `for` with nothing after the bounds
    #[error("`for` statement has no body")]
    MissingLoopBody,
    /// Statements nested past the limit, e.g. a pathological `then` chain
    #[error("statement nesting is too deep (limit {0})")]
    NestingTooDeep(usize),
}

/// A [`ParseError`] tied to its place in the program source.
#[derive(Debug, Error, PartialEq)]
#[error("syntax error on line {line}: {kind} in `{snippet}`")]
pub struct SyntaxError {
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub snippet: String,
    pub kind: ParseError,
}
