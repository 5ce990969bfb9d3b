use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("A slider needs at least one divider")]
    NoDividers,
    #[error("Total must be at least 1, got {0}")]
    InvalidTotal(i64),
}
