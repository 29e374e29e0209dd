//! The remote course/session/forum/file services, as seen from the details screen.

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::model::{Comment, Course, CourseDetails, Entry, FileGroup, Forum, Millis, NodeId, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub title: String,
    pub first_comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub message: String,
    pub reply_to: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub title: String,
    pub description: String,
    pub date: Millis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileGroup {
    pub title: String,
    pub parent: Option<NodeId>,
}

/// Used both for uploads and renames; `id` is set only for the latter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub id: Option<NodeId>,
    #[serde(rename = "type")]
    pub file_type: i32,
    pub name: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileGroupEdit {
    pub id: NodeId,
    pub title: String,
}

/// One blocking call per remote operation. Every call is made at most once per user action;
/// retry is not this layer's job either.
pub trait CourseBackend: Send + Sync {
    fn get_course(&self, course_id: NodeId) -> Result<Course, RemoteError>;

    /// Returns the whole forum with the new entry in it.
    fn new_entry(&self, entry: NewEntry, details_id: NodeId) -> Result<Forum, RemoteError>;

    /// Returns the entry the comment was added to.
    fn new_comment(
        &self,
        comment: NewComment,
        entry_id: NodeId,
        details_id: NodeId,
    ) -> Result<Entry, RemoteError>;

    /// Returns the full course with the new session in it.
    fn new_session(&self, session: NewSession, course_id: NodeId) -> Result<Course, RemoteError>;

    fn new_file_group(
        &self,
        group: NewFileGroup,
        details_id: NodeId,
    ) -> Result<CourseDetails, RemoteError>;

    /// Returns the root file group that now holds the file.
    fn new_file(
        &self,
        file: FileUpload,
        file_group_id: NodeId,
        details_id: NodeId,
    ) -> Result<FileGroup, RemoteError>;

    fn edit_session(&self, session: Session) -> Result<Session, RemoteError>;

    /// Returns the new activation flag.
    fn edit_forum(&self, activated: bool, details_id: NodeId) -> Result<bool, RemoteError>;

    /// Returns the root file group containing the renamed group.
    fn edit_file_group(&self, group: FileGroupEdit, course_id: NodeId) -> Result<FileGroup, RemoteError>;

    /// Returns the root file group containing the renamed file.
    fn edit_file(
        &self,
        file: FileUpload,
        file_group_id: NodeId,
        course_id: NodeId,
    ) -> Result<FileGroup, RemoteError>;

    /// Returns the deleted session.
    fn delete_session(&self, session_id: NodeId) -> Result<Session, RemoteError>;
}

impl NewComment {
    pub fn replying_to(message: impl Into<String>, parent: Option<&Comment>) -> Self {
        Self { message: message.into(), reply_to: parent.map(|c| c.id) }
    }
}
