use crate::model::{Comment, FileGroup};

/// What the create dialog is currently set up to do, with the context each mode needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PostModal {
    NewEntry,
    /// `reply_to` is the comment being answered; `None` starts a new thread.
    NewComment { reply_to: Option<Comment> },
    NewSession,
    AddAttenders,
    /// `parent` is `None` for a root file group.
    AddFileGroup { parent: Option<FileGroup> },
    AddFile { file_group: FileGroup },
}

impl PostModal {
    pub fn default_title(&self) -> &'static str {
        match self {
            PostModal::NewEntry => "New entry",
            PostModal::NewComment { reply_to: None } => "New comment",
            PostModal::NewComment { reply_to: Some(_) } => "Reply",
            PostModal::NewSession => "New session",
            PostModal::AddAttenders => "Add attenders",
            PostModal::AddFileGroup { .. } => "New file group",
            PostModal::AddFile { .. } => "New file",
        }
    }

    pub fn kind(&self) -> PostModalKind {
        match self {
            PostModal::NewEntry => PostModalKind::NewEntry,
            PostModal::NewComment { .. } => PostModalKind::NewComment,
            PostModal::NewSession => PostModalKind::NewSession,
            PostModal::AddAttenders => PostModalKind::AddAttenders,
            PostModal::AddFileGroup { .. } => PostModalKind::AddFileGroup,
            PostModal::AddFile { .. } => PostModalKind::AddFile,
        }
    }

    pub fn is_any_of(&self, kinds: &[PostModalKind]) -> bool {
        kinds.contains(&self.kind())
    }
}

/// Payload-free tag of a [`PostModal`], for "which form fields are visible" checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostModalKind {
    NewEntry,
    NewComment,
    NewSession,
    AddAttenders,
    AddFileGroup,
    AddFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PutDeleteModal {
    #[default]
    ModifySession,
    ModifyForum,
    ModifyFileGroup,
    ModifyFile,
}

impl PutDeleteModal {
    pub fn default_title(&self) -> &'static str {
        match self {
            PutDeleteModal::ModifySession => "Modify session",
            PutDeleteModal::ModifyForum => "Modify forum",
            PutDeleteModal::ModifyFileGroup => "Modify file group",
            PutDeleteModal::ModifyFile => "Modify file",
        }
    }

    pub fn is_any_of(&self, modes: &[PutDeleteModal]) -> bool {
        modes.contains(self)
    }
}
