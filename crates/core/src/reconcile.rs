//! Folding server-confirmed results into the locally held course.
//!
//! Only what the server sent back is applied, never the request that produced it. A target
//! id that is no longer present is a silent no-op; failed requests never get here.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{Course, CourseDetails, Entry, FileGroup, Forum, NodeId, Session};
use crate::sessions::sort_sessions_by_date;
use crate::tree_sync::{find_and_replace, remove_by_id, remove_flat, DeleteOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Confirmed {
    /// New entry posted: the server returns the whole forum.
    ForumReplaced(Forum),
    /// New comment posted: the server returns the owning entry.
    EntryUpdated(Entry),
    /// New session, or a fresh copy of the course.
    CourseReplaced(Course),
    /// New file group: the server returns the course details.
    CourseDetailsReplaced(CourseDetails),
    /// New file, renamed file or renamed group: the server returns the owning root group.
    RootFileGroupUpdated(FileGroup),
    SessionUpdated(Session),
    SessionDeleted(Session),
    ForumActivation(bool),
    FileGroupDeleted(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    /// The target id is not (or no longer) held locally.
    NotFound,
}

impl Applied {
    pub fn is_changed(self) -> bool {
        self == Applied::Changed
    }

    fn from_found(found: bool) -> Self {
        if found {
            Applied::Changed
        } else {
            Applied::NotFound
        }
    }
}

pub fn apply(course: &mut Course, confirmed: Confirmed) -> Applied {
    let applied = match confirmed {
        Confirmed::ForumReplaced(forum) => {
            course.course_details.forum = forum;
            Applied::Changed
        }
        Confirmed::EntryUpdated(entry) => {
            let id = entry.id;
            Applied::from_found(find_and_replace(&mut course.course_details.forum.entries, id, entry))
        }
        Confirmed::CourseReplaced(mut fresh) => {
            sort_sessions_by_date(&mut fresh.sessions);
            *course = fresh;
            Applied::Changed
        }
        Confirmed::CourseDetailsReplaced(details) => {
            course.course_details = details;
            Applied::Changed
        }
        Confirmed::RootFileGroupUpdated(group) => {
            let id = group.id;
            Applied::from_found(find_and_replace(&mut course.course_details.files, id, group))
        }
        Confirmed::SessionUpdated(session) => {
            let id = session.id;
            Applied::from_found(find_and_replace(&mut course.sessions, id, session))
        }
        Confirmed::SessionDeleted(session) => {
            Applied::from_found(remove_flat(&mut course.sessions, session.id).is_some())
        }
        Confirmed::ForumActivation(active) => {
            course.course_details.forum.activated = active;
            Applied::Changed
        }
        Confirmed::FileGroupDeleted(id) => match remove_by_id(&mut course.course_details.files, id) {
            DeleteOutcome::Removed(group) => {
                debug!(%id, title = %group.title, "file group removed locally");
                Applied::Changed
            }
            DeleteOutcome::NotFound => Applied::NotFound,
            DeleteOutcome::EmptyInput => {
                debug!(%id, "no file groups held, nothing to delete");
                Applied::NotFound
            }
        },
    };
    match applied {
        Applied::Changed => info!(course = %course.id, "applied confirmed change"),
        Applied::NotFound => warn!(course = %course.id, "confirmed change targets an id not held locally"),
    }
    applied
}
