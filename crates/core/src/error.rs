use thiserror::Error;

use crate::model::NodeId;

/// A create/update/delete call that did not succeed on the server side.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: NodeId },
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("invalid date input {0:?}, expected YYYY-MM-DD")]
    Date(String),
    #[error("invalid time input {0:?}, expected HH:MM")]
    Time(String),
    #[error("date and time {date} {time} do not exist in the configured offset")]
    Unrepresentable { date: String, time: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("no {0} selected")]
    NothingSelected(&'static str),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArenaError {
    #[error("id {0} appears more than once in the tree")]
    DuplicateId(NodeId),
    #[error("parent {0} is not in the tree")]
    UnknownParent(NodeId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("utc offset of {0} minutes is out of range")]
    Offset(i32),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Tree(#[from] ArenaError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
