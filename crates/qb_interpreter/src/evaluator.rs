use std::io::Write;

use qb_parser::ast::{CompareOp, Condition, Expr, Program, Statement};
use qb_parser::Mode;

use crate::environment::Environment;
use crate::error::{RuntimeError, RuntimeResult};

/// Walks parsed statements against a mutable variable environment, writing
/// `print` output to the sink it owns.
///
/// Each run owns its own environment; to interpret several programs in
/// isolation, use one evaluator per program.
pub struct Evaluator<W: Write> {
    env: Environment,
    mode: Mode,
    out: W,
}

impl<W: Write> Evaluator<W> {
    pub fn new(out: W) -> Self {
        Self::with_mode(out, Mode::Lenient)
    }

    pub fn with_mode(out: W, mode: Mode) -> Self {
        Evaluator {
            env: Environment::new(),
            mode,
            out,
        }
    }

    /// The variable environment as left by the statements evaluated so far.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn eval(&mut self, program: &Program) -> RuntimeResult<()> {
        for statement in &program.statements {
            self.eval_statement(statement)?;
        }

        Ok(())
    }

    pub fn eval_statement(&mut self, statement: &Statement) -> RuntimeResult<()> {
        match statement {
            Statement::Print(arg) => self.eval_print(arg),
            Statement::Let { name, value } => {
                let value = self.eval_expr(value)?;
                self.env.set(name, value);
                Ok(())
            }
            Statement::If {
                condition,
                consequence,
            } => {
                if self.eval_condition(condition)? {
                    self.eval_statement(consequence)?;
                }
                Ok(())
            }
            Statement::For {
                var,
                start,
                end,
                body,
            } => {
                // The induction variable lives in the shared environment, so
                // a body reading it observes the current iteration's value
                // rather than one captured at parse time.
                for i in *start..=*end {
                    self.env.set(var, i);
                    if let Some(body) = body {
                        self.eval_statement(body)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn eval_print(&mut self, arg: &Expr) -> RuntimeResult<()> {
        match arg {
            Expr::String(text) => writeln!(self.out, "{}", text)?,
            expr => {
                let value = self.eval_expr(expr)?;
                writeln!(self.out, "{}", value)?;
            }
        }

        Ok(())
    }

    fn eval_expr(&mut self, expr: &Expr) -> RuntimeResult<i64> {
        match expr {
            Expr::Integer(value) => Ok(*value),
            Expr::Variable(name) => self.lookup(name),
            Expr::String(text) => Err(RuntimeError::NotAnInteger(text.clone())),
        }
    }

    fn eval_condition(&mut self, condition: &Condition) -> RuntimeResult<bool> {
        let value = self.lookup(&condition.var)?;

        let holds = match condition.op {
            CompareOp::Greater => value > condition.literal,
            CompareOp::Less => value < condition.literal,
            CompareOp::Equal => value == condition.literal,
        };

        Ok(holds)
    }

    /// Resolve a variable read. A name with no binding reads as zero in
    /// lenient mode and is an error in strict mode; either way the miss has
    /// no side effects.
    fn lookup(&self, name: &str) -> RuntimeResult<i64> {
        match self.env.get(name) {
            Some(value) => Ok(value),
            None => match self.mode {
                Mode::Lenient => Ok(0),
                Mode::Strict => Err(RuntimeError::UndefinedVariable(name.trim().to_owned())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use qb_parser::{Mode, Parser};

    use crate::environment::Environment;
    use crate::error::RuntimeError;
    use crate::evaluator::Evaluator;

    fn run(input: &str) -> String {
        let (output, _) = run_with_env(input);
        output
    }

    fn run_with_env(input: &str) -> (String, Environment) {
        let program = Parser::new()
            .parse_program(input)
            .expect("lenient parsing never fails");

        let mut out = Vec::new();
        let mut evaluator = Evaluator::new(&mut out);
        if let Err(error) = evaluator.eval(&program) {
            panic!("evaluation of {} failed: {}", input, error)
        }
        let env = evaluator.env().clone();

        (String::from_utf8(out).expect("output is utf-8"), env)
    }

    #[test]
    fn eval_let_then_print() {
        let tests = vec![
            ("let x = 5\nprint x", "5\n"),
            ("let x = -12\nprint x", "-12\n"),
            ("let x = 0\nprint x", "0\n"),
            ("let a = 1\nlet b = 2\nprint a\nprint b", "1\n2\n"),
        ];

        for (input, expected) in tests {
            assert_eq!(run(input), expected);
        }
    }

    #[test]
    fn eval_print_string_literal() {
        let tests = vec![
            ("print \"hello world\"", "hello world\n"),
            ("print \"\"", "\n"),
            ("print \"  inner  spaces  \"", "  inner  spaces  \n"),
        ];

        for (input, expected) in tests {
            assert_eq!(run(input), expected);
        }
    }

    #[test]
    fn eval_let_copies_from_variable() {
        let (output, env) = run_with_env("let a = 5\nlet b = a\nlet a = 9\nprint b");

        // b holds the value a had at assignment time, not a live alias
        assert_eq!(output, "5\n");
        assert_eq!(env.get("b"), Some(5));
        assert_eq!(env.get("a"), Some(9));
    }

    #[test]
    fn eval_reassignment_overwrites() {
        let (output, env) = run_with_env("let x = 1\nlet x = 2\nprint x");

        assert_eq!(output, "2\n");
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn eval_if_comparisons() {
        let tests = vec![
            ("let v = 5\nif v > 4 then print v", "5\n"),
            ("let v = 5\nif v > 5 then print v", ""),
            ("let v = 5\nif v < 6 then print v", "5\n"),
            ("let v = 5\nif v < 5 then print v", ""),
            ("let v = 5\nif v == 5 then print v", "5\n"),
            ("let v = 5\nif v == 4 then print v", ""),
        ];

        for (input, expected) in tests {
            assert_eq!(run(input), expected);
        }
    }

    #[test]
    fn eval_unknown_operator_never_fires() {
        // Lenient mode drops the whole if, so the consequence never runs
        assert_eq!(run("let v = 5\nif v <> 5 then print v"), "");
        assert_eq!(run("let v = 5\nif v >= 5 then print v"), "");
    }

    #[test]
    fn eval_for_counts_inclusive() {
        let tests = vec![
            ("for i = 1 to 3 { print i }", "1\n2\n3\n"),
            ("for i = 1 to 2 print i", "1\n2\n"),
            ("for i = -1 to 1 { print i }", "-1\n0\n1\n"),
            ("for i = 3 to 3 { print i }", "3\n"),
            // Empty range: the body never runs
            ("for i = 5 to 3 { print i }", ""),
        ];

        for (input, expected) in tests {
            assert_eq!(run(input), expected);
        }
    }

    #[test]
    fn eval_nested_control() {
        let tests = vec![
            ("for i = 1 to 2 { if i == 2 then print i }", "2\n"),
            (
                "for i = 1 to 2 { for j = 1 to 2 { print j } }",
                "1\n2\n1\n2\n",
            ),
            // The inner body reads the outer induction variable live
            ("for i = 1 to 2 for j = 3 to 3 { print i }", "1\n2\n"),
        ];

        for (input, expected) in tests {
            assert_eq!(run(input), expected);
        }
    }

    #[test]
    fn eval_loop_variable_is_reread_each_iteration() {
        let (output, env) = run_with_env("for i = 1 to 3 { let x = i }\nprint x");

        // Wrong if the body captured i once at parse time
        assert_eq!(env.get("x"), Some(3));
        assert_eq!(output, "3\n");
    }

    #[test]
    fn eval_empty_body_still_assigns_induction_variable() {
        let (output, env) = run_with_env("for i = 1 to 3 { }\nprint i");

        assert_eq!(env.get("i"), Some(3));
        assert_eq!(output, "3\n");
    }

    #[test]
    fn eval_malformed_let_changes_nothing() {
        let (output, env) = run_with_env("let x 5");

        assert_eq!(output, "");
        assert!(env.is_empty());
    }

    #[test]
    fn eval_undefined_variable_is_zero_when_lenient() {
        assert_eq!(run("print ghost"), "0\n");
        assert_eq!(run("if ghost == 0 then print \"yes\""), "yes\n");
        assert_eq!(run("let x = ghost\nprint x"), "0\n");
    }

    #[test]
    fn eval_undefined_variable_errors_when_strict() {
        let program = Parser::with_mode(Mode::Strict)
            .parse_program("print ghost")
            .expect("statement parses fine");

        let mut out = Vec::new();
        let mut evaluator = Evaluator::with_mode(&mut out, Mode::Strict);
        let error = evaluator.eval(&program).expect_err("expected an error");

        match error {
            RuntimeError::UndefinedVariable(name) => assert_eq!(name, "ghost"),
            other => panic!("expected UndefinedVariable but got {:?}", other),
        }
    }

    #[test]
    fn eval_variables_are_case_sensitive() {
        let (output, env) = run_with_env("let x = 1\nlet X = 2\nprint x\nprint X");

        assert_eq!(output, "1\n2\n");
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn eval_output_is_in_execution_order() {
        let input = "\
print \"start\"
for i = 1 to 2 { if i == 2 then print \"last\" }
print \"done\"";

        assert_eq!(run(input), "start\nlast\ndone\n");
    }

    #[test]
    fn eval_body_may_reassign_induction_variable() {
        // The range is fixed up front, so reassigning i never changes the
        // iteration count; the last body write wins afterwards
        let (output, env) = run_with_env("for i = 1 to 3 { let i = 10 }\nprint i");

        assert_eq!(env.get("i"), Some(10));
        assert_eq!(output, "10\n");
    }
}
