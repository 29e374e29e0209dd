use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl Default for NodeId {
    fn default() -> Self {
        NodeId(0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Epoch milliseconds, as exchanged with the course service.
pub type Millis = i64;

/// Child sequences may arrive missing or as `null`; both mean "no children".
fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: Millis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: NodeId,
    #[serde(default)]
    pub message: String,
    pub date: Millis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub date: Millis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub id: NodeId,
    pub activated: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub file_type: i32,
    pub name: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileGroup {
    pub id: NodeId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<File>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub file_groups: Vec<FileGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    pub id: NodeId,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub forum: Forum,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<FileGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: NodeId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<User>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sessions: Vec<Session>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attenders: Vec<User>,
    #[serde(default)]
    pub course_details: CourseDetails,
}
