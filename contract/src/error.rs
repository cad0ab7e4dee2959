use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractError {
    /// The contract was already resigned, relinquished, unsubscribed or invalidated by its provider
    #[error("can't {operation} an invalid contract")]
    InvalidContract { operation: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A key was first used with one payload type and later with another
    #[error("event payload mismatch: registered as {expected}, used as {found}")]
    SignatureMismatch { expected: &'static str, found: &'static str },
}
