use std::fmt::Display;

use crate::lexer::tokens::Token;

/// A type annotation as written in source.
///
/// `int` and `Point` are `Named`, `[int]` is `List` and `map[string, int]`
/// is `Generic`. Resolution into a structural type happens in the checker.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named { token: Token },
    List { token: Token, inner: Box<TypeExpr> },
    Generic { token: Token, args: Vec<TypeExpr> },
}

impl TypeExpr {
    pub fn token(&self) -> &Token {
        match self {
            TypeExpr::Named { token } => token,
            TypeExpr::List { token, .. } => token,
            TypeExpr::Generic { token, .. } => token,
        }
    }

    /// Base name: the identifier for named and generic types, `list` for `[T]`.
    pub fn name(&self) -> &str {
        match self {
            TypeExpr::Named { token } | TypeExpr::Generic { token, .. } => &token.value,
            TypeExpr::List { .. } => "list",
        }
    }
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Named { token } => write!(f, "{}", token.value),
            TypeExpr::List { inner, .. } => write!(f, "[{}]", inner),
            TypeExpr::Generic { token, args } => {
                let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
                write!(f, "{}[{}]", token.value, args.join(", "))
            }
        }
    }
}
