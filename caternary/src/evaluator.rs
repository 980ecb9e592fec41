//! Stack-based evaluator for caternary programs.
//!
//! The evaluator is generic over the stack element type `T`. Values (non-operator tokens)
//! are pushed onto the stack. Operators are functions that manipulate the stack.
//! Different evaluator instances can define different operators for the same program.

use std::collections::HashMap;

use crate::Token;

/// An error that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Operator returned an error.
    OperatorError(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::OperatorError(msg) => write!(f, "operator error: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

/// An operator function that manipulates the stack.
pub type Operator<T> = fn(&mut Vec<T>) -> Result<(), EvalError>;

/// A stack-based evaluator for caternary programs.
///
/// The evaluator is generic over the stack element type `T`. Operators are registered
/// by name and invoked when the corresponding word is encountered. Non-operator tokens
/// are converted to `T` via `From<Token>` and pushed onto the stack.
pub struct Evaluator<T> {
    operators: HashMap<String, Operator<T>>,
}

impl<T> Default for Evaluator<T>
where
    T: From<Token>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Evaluator<T>
where
    T: From<Token>,
{
    /// Creates a new evaluator with no operators defined.
    pub fn new() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Defines an operator by name.
    pub fn define(&mut self, name: &str, op: Operator<T>) {
        self.operators.insert(name.to_string(), op);
    }

    /// Evaluates a program, returning the final stack.
    pub fn eval(&self, tokens: &[Token]) -> Result<Vec<T>, EvalError> {
        let mut stack = Vec::new();
        self.eval_with_stack(tokens, &mut stack)?;
        Ok(stack)
    }

    /// Evaluates tokens using an existing stack.
    pub fn eval_with_stack(&self, tokens: &[Token], stack: &mut Vec<T>) -> Result<(), EvalError> {
        for token in tokens {
            match token {
                Token::Word(name) if self.operators.contains_key(name) => {
                    let op = self.operators.get(name).unwrap();
                    op(stack)?;
                }
                _ => {
                    stack.push(T::from(token.clone()));
                }
            }
        }
        Ok(())
    }
}
