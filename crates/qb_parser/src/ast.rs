use std::fmt::Display;

#[derive(Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Program {
        Program {
            statements: Vec::new(),
        }
    }
}

impl Default for Program {
    fn default() -> Program {
        Program::new()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = (&self.statements)
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<String>>()
            .join("\n");

        write!(f, "{}", s)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub enum Statement {
    Print(Expr),
    Let {
        /// The name/identifier of the variable
        name: String,
        /// The value being assigned; a variable reference here is read
        /// fresh every time the statement executes
        value: Expr,
    },
    If {
        condition: Condition,
        /// Statement executed when the condition holds; any statement form,
        /// including another `if` or `for`
        consequence: Box<Statement>,
    },
    For {
        /// The induction variable, assigned in the environment every iteration
        var: String,
        start: i64,
        /// Inclusive upper bound; `start > end` means zero iterations
        end: i64,
        /// `None` for a braced loop with an empty body. The loop still runs
        /// and assigns the induction variable each iteration.
        body: Option<Box<Statement>>,
    },
}

impl Display for Statement {
    /// Canonical source form. `for` always renders in its braced syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;

        match self {
            Print(arg) => write!(f, "print {}", arg),
            Let { name, value } => write!(f, "let {} = {}", name, value),
            If {
                condition,
                consequence,
            } => write!(f, "if {} then {}", condition, consequence),
            For {
                var,
                start,
                end,
                body,
            } => match body {
                Some(body) => write!(f, "for {} = {} to {} {{ {} }}", var, start, end, body),
                None => write!(f, "for {} = {} to {} {{ }}", var, start, end),
            },
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Expr {
    /// Integer literal
    Integer(i64),
    /// Double-quoted string literal; inner contents kept verbatim.
    /// Only a `print` argument can hold one.
    String(String),
    /// Variable reference, resolved against the environment when executed
    Variable(String),
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expr::*;

        match self {
            Integer(value) => write!(f, "{}", value),
            String(value) => write!(f, "\"{}\"", value),
            Variable(name) => write!(f, "{}", name),
        }
    }
}

/// The `<var> <op> <literal>` clause of an `if` statement
#[derive(Debug, PartialEq)]
pub struct Condition {
    pub var: String,
    pub op: CompareOp,
    pub literal: i64,
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.var, self.op, self.literal)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CompareOp {
    Greater,
    Less,
    Equal,
}

impl CompareOp {
    /// Get the CompareOp for the given operator token, if valid.
    pub fn lookup(s: &str) -> Option<CompareOp> {
        use CompareOp::*;

        match s {
            ">" => Some(Greater),
            "<" => Some(Less),
            "==" => Some(Equal),
            _ => None,
        }
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CompareOp::*;

        match self {
            Greater => write!(f, ">"),
            Less => write!(f, "<"),
            Equal => write!(f, "=="),
        }
    }
}
