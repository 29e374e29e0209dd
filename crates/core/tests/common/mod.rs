#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use coursesync_core::backend::{
    CourseBackend, FileGroupEdit, FileUpload, NewComment, NewEntry, NewFileGroup, NewSession,
};
use coursesync_core::{
    find_and_replace, find_by_id, find_by_id_mut, remove_flat, Comment, Course, CourseDetails, Entry,
    File, FileGroup, Forum, NodeId, RemoteError, Session,
};
use parking_lot::Mutex;

pub fn session(id: i64, date: i64) -> Session {
    Session { id: NodeId(id), title: format!("session {id}"), description: String::new(), date }
}

pub fn comment(id: i64, date: i64, replies: Vec<Comment>) -> Comment {
    Comment { id: NodeId(id), message: format!("c{id}"), date, user: None, replies }
}

pub fn group(id: i64, children: Vec<FileGroup>) -> FileGroup {
    FileGroup { id: NodeId(id), title: format!("group {id}"), files: Vec::new(), file_groups: children }
}

pub fn sample_course() -> Course {
    Course {
        id: NodeId(1),
        title: "Systems programming".into(),
        sessions: vec![session(10, 3_000), session(11, 1_000), session(12, 2_000)],
        course_details: CourseDetails {
            id: NodeId(2),
            info: String::new(),
            forum: Forum {
                id: NodeId(3),
                activated: true,
                entries: vec![
                    Entry {
                        id: NodeId(30),
                        title: "Welcome".into(),
                        date: 0,
                        user: None,
                        comments: vec![comment(31, 100, vec![comment(32, 400, vec![])])],
                    },
                    Entry { id: NodeId(33), title: "Exams".into(), date: 0, user: None, comments: Vec::new() },
                ],
            },
            files: vec![group(40, vec![group(41, vec![group(42, vec![])])]), group(43, vec![])],
        },
        ..Course::default()
    }
}

/// In-memory stand-in for the course services; answers the way the real API does.
pub struct FakeCourseService {
    pub course: Mutex<Course>,
    next_id: AtomicI64,
    failing: AtomicBool,
    panicking: AtomicBool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeCourseService {
    pub fn new(course: Course) -> Self {
        Self {
            course: Mutex::new(course),
            next_id: AtomicI64::new(1000),
            failing: AtomicBool::new(false),
            panicking: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_requests(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    pub fn panic_on_requests(&self, panic: bool) {
        self.panicking.store(panic, Ordering::SeqCst);
    }

    fn begin(&self, call: &'static str) -> Result<NodeId, RemoteError> {
        self.calls.lock().push(call);
        if self.panicking.load(Ordering::SeqCst) {
            panic!("fake service crashed in {call}");
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("fake outage".into()));
        }
        Ok(NodeId(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

fn root_holding(files: &[FileGroup], id: NodeId) -> Option<FileGroup> {
    files.iter().find(|root| find_by_id(std::slice::from_ref(*root), id).is_some()).cloned()
}

fn not_found(resource: &'static str, id: NodeId) -> RemoteError {
    RemoteError::NotFound { resource, id }
}

impl CourseBackend for FakeCourseService {
    fn get_course(&self, course_id: NodeId) -> Result<Course, RemoteError> {
        self.begin("get_course")?;
        let course = self.course.lock();
        if course.id == course_id {
            Ok(course.clone())
        } else {
            Err(not_found("course", course_id))
        }
    }

    fn new_entry(&self, entry: NewEntry, _details_id: NodeId) -> Result<Forum, RemoteError> {
        let id = self.begin("new_entry")?;
        let comment_id = NodeId(id.0 + 500);
        let mut course = self.course.lock();
        let forum = &mut course.course_details.forum;
        forum.entries.push(Entry {
            id,
            title: entry.title,
            date: id.0,
            user: None,
            comments: vec![Comment { id: comment_id, message: entry.first_comment, date: id.0, user: None, replies: Vec::new() }],
        });
        Ok(forum.clone())
    }

    fn new_comment(&self, comment: NewComment, entry_id: NodeId, _details_id: NodeId) -> Result<Entry, RemoteError> {
        let id = self.begin("new_comment")?;
        let mut course = self.course.lock();
        let entry = course
            .course_details
            .forum
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| not_found("entry", entry_id))?;
        let created = Comment { id, message: comment.message, date: id.0 * 10, user: None, replies: Vec::new() };
        match comment.reply_to {
            Some(parent) => find_by_id_mut(&mut entry.comments, parent)
                .ok_or_else(|| not_found("comment", parent))?
                .replies
                .push(created),
            None => entry.comments.push(created),
        }
        Ok(entry.clone())
    }

    fn new_session(&self, session: NewSession, course_id: NodeId) -> Result<Course, RemoteError> {
        let id = self.begin("new_session")?;
        let mut course = self.course.lock();
        if course.id != course_id {
            return Err(not_found("course", course_id));
        }
        course.sessions.push(Session { id, title: session.title, description: session.description, date: session.date });
        Ok(course.clone())
    }

    fn new_file_group(&self, group: NewFileGroup, _details_id: NodeId) -> Result<CourseDetails, RemoteError> {
        let id = self.begin("new_file_group")?;
        let mut course = self.course.lock();
        let created = FileGroup { id, title: group.title, files: Vec::new(), file_groups: Vec::new() };
        match group.parent {
            Some(parent) => find_by_id_mut(&mut course.course_details.files, parent)
                .ok_or_else(|| not_found("file group", parent))?
                .file_groups
                .push(created),
            None => course.course_details.files.push(created),
        }
        Ok(course.course_details.clone())
    }

    fn new_file(&self, file: FileUpload, file_group_id: NodeId, _details_id: NodeId) -> Result<FileGroup, RemoteError> {
        let id = self.begin("new_file")?;
        let mut course = self.course.lock();
        let files = &mut course.course_details.files;
        find_by_id_mut(files, file_group_id)
            .ok_or_else(|| not_found("file group", file_group_id))?
            .files
            .push(File { id, file_type: file.file_type, name: file.name, link: file.link });
        root_holding(files, file_group_id).ok_or_else(|| not_found("file group", file_group_id))
    }

    fn edit_session(&self, session: Session) -> Result<Session, RemoteError> {
        self.begin("edit_session")?;
        let mut course = self.course.lock();
        if find_and_replace(&mut course.sessions, session.id, session.clone()) {
            Ok(session)
        } else {
            Err(not_found("session", session.id))
        }
    }

    fn edit_forum(&self, activated: bool, _details_id: NodeId) -> Result<bool, RemoteError> {
        self.begin("edit_forum")?;
        self.course.lock().course_details.forum.activated = activated;
        Ok(activated)
    }

    fn edit_file_group(&self, group: FileGroupEdit, _course_id: NodeId) -> Result<FileGroup, RemoteError> {
        self.begin("edit_file_group")?;
        let mut course = self.course.lock();
        let files = &mut course.course_details.files;
        find_by_id_mut(files, group.id).ok_or_else(|| not_found("file group", group.id))?.title = group.title;
        root_holding(files, group.id).ok_or_else(|| not_found("file group", group.id))
    }

    fn edit_file(&self, file: FileUpload, file_group_id: NodeId, _course_id: NodeId) -> Result<FileGroup, RemoteError> {
        self.begin("edit_file")?;
        let file_id = file.id.ok_or_else(|| RemoteError::Rejected { status: 400, message: "file id missing".into() })?;
        let mut course = self.course.lock();
        let files = &mut course.course_details.files;
        let holder = find_by_id_mut(files, file_group_id).ok_or_else(|| not_found("file group", file_group_id))?;
        let target = holder.files.iter_mut().find(|f| f.id == file_id).ok_or_else(|| not_found("file", file_id))?;
        target.name = file.name;
        root_holding(files, file_group_id).ok_or_else(|| not_found("file group", file_group_id))
    }

    fn delete_session(&self, session_id: NodeId) -> Result<Session, RemoteError> {
        self.begin("delete_session")?;
        remove_flat(&mut self.course.lock().sessions, session_id).ok_or_else(|| not_found("session", session_id))
    }
}
