use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("an entry with id {0} already exists")]
    DuplicateEntry(String),
}
