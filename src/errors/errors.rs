use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// Line of the token the error is anchored on.
    pub fn get_line(&self) -> u32 {
        self.position.line
    }

    pub fn get_phase(&self) -> ErrorPhase {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::ExpectedStatement { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::SymbolAlreadyDeclared { .. }
            | ErrorImpl::InvalidAssignmentTarget => ErrorPhase::Syntax,
            _ => ErrorPhase::Semantic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ExpectedStatement { .. } => "ExpectedStatement",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SymbolAlreadyDeclared { .. } => "SymbolAlreadyDeclared",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::MismatchedTypes { .. } => "MismatchedTypes",
            ErrorImpl::UndeclaredSymbol { .. } => "UndeclaredSymbol",
            ErrorImpl::UseBeforeDeclaration { .. } => "UseBeforeDeclaration",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::NonBooleanCondition { .. } => "NonBooleanCondition",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::IllegalCast { .. } => "IllegalCast",
            ErrorImpl::ReturnTypeMatchError { .. } => "ReturnTypeMatchError",
            ErrorImpl::NotIterable { .. } => "NotIterable",
            ErrorImpl::InvalidOperation { .. } => "InvalidOperation",
            ErrorImpl::UnknownMember { .. } => "UnknownMember",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::NotIndexable { .. } => "NotIndexable",
            ErrorImpl::InvalidIndex { .. } => "InvalidIndex",
            ErrorImpl::SelfOutsideClass => "SelfOutsideClass",
            ErrorImpl::JumpOutsideLoop { .. } => "JumpOutsideLoop",
            ErrorImpl::UnexpectedJumpValues { .. } => "UnexpectedJumpValues",
            ErrorImpl::NotAValue { .. } => "NotAValue",
            ErrorImpl::VoidDeclaration { .. } => "VoidDeclaration",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Expected {}, found `{}`",
                expected, found
            )),
            ErrorImpl::ExpectedStatement { found } => ErrorTip::Suggestion(format!(
                "Expected a statement, found `{}`, did you miss a semicolon?",
                found
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::SymbolAlreadyDeclared { symbol } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope or an enclosing one", symbol))
            }
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables, indexed elements and members can be assigned",
            )),
            ErrorImpl::MismatchedTypes { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::UndeclaredSymbol { symbol } => {
                ErrorTip::Suggestion(format!("`{}` is not declared", symbol))
            }
            ErrorImpl::UseBeforeDeclaration { symbol } => {
                ErrorTip::Suggestion(format!("`{}` is used before its declaration", symbol))
            }
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::NonBooleanCondition { received } => ErrorTip::Suggestion(format!(
                "Conditions must be `bool`, received `{}`",
                received
            )),
            ErrorImpl::ArgumentCountMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::IllegalCast { from, to } => ErrorTip::Suggestion(format!(
                "Cannot cast `{}` to `{}`, only primitives can be cast",
                from, to
            )),
            ErrorImpl::ReturnTypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Function returns `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::NotIterable { received } => ErrorTip::Suggestion(format!(
                "Only lists and maps can be iterated, received `{}`",
                received
            )),
            ErrorImpl::InvalidOperation { operator, operand } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}`",
                operator, operand
            )),
            ErrorImpl::UnknownMember { owner, member } => {
                ErrorTip::Suggestion(format!("`{}` has no member `{}`", owner, member))
            }
            ErrorImpl::NotCallable { received } => {
                ErrorTip::Suggestion(format!("`{}` cannot be called", received))
            }
            ErrorImpl::NotIndexable { received } => ErrorTip::Suggestion(format!(
                "Only lists and maps can be indexed, received `{}`",
                received
            )),
            ErrorImpl::InvalidIndex { expected, received } => ErrorTip::Suggestion(format!(
                "Expected index of type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::SelfOutsideClass => {
                ErrorTip::Suggestion(String::from("`self` can only be used inside a class"))
            }
            ErrorImpl::JumpOutsideLoop { keyword } => {
                ErrorTip::Suggestion(format!("`{}` can only be used inside a loop", keyword))
            }
            ErrorImpl::UnexpectedJumpValues { keyword } => {
                ErrorTip::Suggestion(format!("`{}` does not take values", keyword))
            }
            ErrorImpl::NotAValue { symbol } => {
                ErrorTip::Suggestion(format!("`{}` names a type, not a value", symbol))
            }
            ErrorImpl::VoidDeclaration { symbol } => {
                ErrorTip::Suggestion(format!("`{}` cannot hold a value of type `void`", symbol))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.position.line, self.internal_error)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    Syntax,
    Semantic,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("expected {expected}, got {found:?} instead")]
    UnexpectedToken { expected: String, found: String },
    #[error("expected statement, got {found:?} instead")]
    ExpectedStatement { found: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("symbol {symbol:?} already declared")]
    SymbolAlreadyDeclared { symbol: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("mismatched types: expected {expected}, received {received}")]
    MismatchedTypes { expected: String, received: String },
    #[error("symbol {symbol:?} not declared")]
    UndeclaredSymbol { symbol: String },
    #[error("symbol {symbol:?} used before declaration")]
    UseBeforeDeclaration { symbol: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("condition must be bool, received {received}")]
    NonBooleanCondition { received: String },
    #[error("wrong number of arguments: expected {expected}, received {received}")]
    ArgumentCountMismatch { expected: usize, received: usize },
    #[error("argument types do not match: expected {expected}, received {received}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("illegal cast from {from} to {to}")]
    IllegalCast { from: String, to: String },
    #[error("return types do not match: expected {expected}, received {received}")]
    ReturnTypeMatchError { expected: String, received: String },
    #[error("cannot iterate over {received}")]
    NotIterable { received: String },
    #[error("invalid operation: {operator} on {operand}")]
    InvalidOperation { operator: String, operand: String },
    #[error("{owner} has no member {member:?}")]
    UnknownMember { owner: String, member: String },
    #[error("{received} is not callable")]
    NotCallable { received: String },
    #[error("{received} is not indexable")]
    NotIndexable { received: String },
    #[error("invalid index: expected {expected}, received {received}")]
    InvalidIndex { expected: String, received: String },
    #[error("self used outside of a class")]
    SelfOutsideClass,
    #[error("{keyword} outside of a loop")]
    JumpOutsideLoop { keyword: String },
    #[error("{keyword} does not take values")]
    UnexpectedJumpValues { keyword: String },
    #[error("{symbol:?} is not a value")]
    NotAValue { symbol: String },
    #[error("{symbol:?} declared with type void")]
    VoidDeclaration { symbol: String },
}
