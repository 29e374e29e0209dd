//! Headless state of the course-details screen.
//!
//! Remote calls run on their own thread and report back over a channel; nothing touches the
//! course until [`CourseDetailsController::poll`] (or `wait_pending`) picks the result up on
//! the caller's thread. There is no request fencing: a late answer is applied even when the
//! user has moved on.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::FixedOffset;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::backend::{CourseBackend, FileGroupEdit, FileUpload, NewComment, NewEntry, NewFileGroup, NewSession};
use crate::bus::{CourseEvent, NotificationBus, Subscription};
use crate::config::Config;
use crate::datetime::{date_input, from_inputs, time_input};
use crate::error::{ConfigError, InputError, RemoteError};
use crate::modal::{PostModal, PutDeleteModal};
use crate::model::{Comment, Course, Entry, File, FileGroup, NodeId, Session};
use crate::reconcile::{apply, Applied, Confirmed};
use crate::sessions::sort_sessions_by_date;
use crate::tree_sync::latest_entry_comment;

pub const EDIT_ICON: &str = "mode_edit";
pub const CLOSE_EDIT_ICON: &str = "keyboard_arrow_left";

/// Remote operations the screen can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    NewEntry,
    NewComment,
    NewSession,
    NewFileGroup,
    NewFile,
    EditSession,
    EditForum,
    EditFileGroup,
    EditFile,
    DeleteSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Post,
    PutDelete,
}

impl Action {
    /// The dialog a successful answer closes.
    pub fn modal(self) -> Option<Modal> {
        match self {
            Action::Load => None,
            Action::NewEntry
            | Action::NewComment
            | Action::NewSession
            | Action::NewFileGroup
            | Action::NewFile => Some(Modal::Post),
            Action::EditSession
            | Action::EditForum
            | Action::EditFileGroup
            | Action::EditFile
            | Action::DeleteSession => Some(Modal::PutDelete),
        }
    }
}

#[derive(Debug)]
struct Completed {
    action: Action,
    result: Result<Confirmed, RemoteError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostForm {
    pub title: String,
    pub comment: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

pub fn forum_toggle_label(activated: bool) -> &'static str {
    if activated {
        "DEACTIVATION"
    } else {
        "ACTIVATION"
    }
}

pub struct CourseDetailsController {
    backend: Arc<dyn CourseBackend>,
    bus: NotificationBus<CourseEvent>,
    events: Subscription<CourseEvent>,
    config: Config,
    tz: FixedOffset,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    in_flight: usize,

    pub course: Option<Course>,
    pub selected_entry: Option<NodeId>,

    pub post_modal: PostModal,
    pub post_modal_title: String,
    pub post_modal_open: bool,
    pub post_form: PostForm,

    pub put_delete_modal: PutDeleteModal,
    pub put_delete_title: String,
    pub put_delete_modal_open: bool,
    pub session_form: SessionForm,
    pub updated_session: Option<Session>,
    pub allow_session_deletion: bool,
    pub allow_forum_edition: bool,
    pub forum_toggle: &'static str,

    pub file_title_input: String,
    pub updated_file_group: Option<FileGroup>,
    pub updated_file: Option<File>,
    pub allow_files_edition: bool,
    pub files_edition_icon: &'static str,

    pub last_error: Option<RemoteError>,
}

impl CourseDetailsController {
    pub fn new(
        backend: Arc<dyn CourseBackend>,
        bus: NotificationBus<CourseEvent>,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let tz = config.offset()?;
        let events = bus.subscribe();
        let (tx, rx) = unbounded();
        let post_modal = PostModal::AddAttenders;
        let put_delete_modal = PutDeleteModal::ModifySession;
        Ok(Self {
            backend,
            events,
            bus,
            config,
            tz,
            tx,
            rx,
            in_flight: 0,
            course: None,
            selected_entry: None,
            post_modal_title: post_modal.default_title().to_string(),
            post_modal,
            post_modal_open: false,
            post_form: PostForm::default(),
            put_delete_title: put_delete_modal.default_title().to_string(),
            put_delete_modal,
            put_delete_modal_open: false,
            session_form: SessionForm::default(),
            updated_session: None,
            allow_session_deletion: false,
            allow_forum_edition: false,
            forum_toggle: forum_toggle_label(false),
            file_title_input: String::new(),
            updated_file_group: None,
            updated_file: None,
            allow_files_edition: false,
            files_edition_icon: EDIT_ICON,
            last_error: None,
        })
    }

    pub fn bus(&self) -> &NotificationBus<CourseEvent> {
        &self.bus
    }

    /// Requests still waiting for an answer.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn dispatch<F>(&mut self, action: Action, job: F)
    where
        F: FnOnce(&dyn CourseBackend) -> Result<Confirmed, RemoteError> + Send + 'static,
    {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        debug!(?action, "request issued");
        std::thread::spawn(move || {
            // A panicking backend still has to answer, or `wait_pending` would never return.
            let result = panic::catch_unwind(AssertUnwindSafe(|| job(backend.as_ref())))
                .unwrap_or_else(|cause| Err(RemoteError::Unavailable(panic_message(cause.as_ref()))));
            let _ = tx.send(Completed { action, result });
        });
    }

    /// Applies every answer and bus event that has arrived, without blocking.
    /// Returns how many answers were applied.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(done) = self.rx.try_recv() {
            self.in_flight -= 1;
            self.complete(done);
            handled += 1;
        }
        self.handle_events();
        handled
    }

    /// Blocks until every issued request has been answered and applied.
    pub fn wait_pending(&mut self) {
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(done) => {
                    self.in_flight -= 1;
                    self.complete(done);
                }
                Err(_) => break,
            }
        }
        self.handle_events();
    }

    pub fn load(&mut self, course_id: NodeId) {
        self.dispatch(Action::Load, move |b| b.get_course(course_id).map(Confirmed::CourseReplaced));
    }

    fn complete(&mut self, done: Completed) {
        let Completed { action, result } = done;
        let confirmed = match result {
            Ok(c) => {
                self.last_error = None;
                c
            }
            Err(err) => {
                error!(?action, %err, "request failed, local state left as is");
                self.last_error = Some(err);
                return;
            }
        };
        if action == Action::Load {
            if let Confirmed::CourseReplaced(course) = confirmed {
                self.on_course_loaded(course);
            }
            return;
        }
        let Some(course) = self.course.as_mut() else {
            warn!(?action, "answer arrived before the course was loaded, dropped");
            return;
        };

        let follow_up = FollowUp::of(&confirmed);
        let applied = apply(course, confirmed);
        self.follow_up(follow_up, applied);

        match action.modal() {
            Some(Modal::Post) => self.post_modal_open = false,
            Some(Modal::PutDelete) => self.put_delete_modal_open = false,
            None => {}
        }
    }

    fn on_course_loaded(&mut self, mut course: Course) {
        info!(course = %course.id, title = %course.title, "course loaded");
        sort_sessions_by_date(&mut course.sessions);
        self.selected_entry = course.course_details.forum.entries.first().map(|e| e.id);
        self.forum_toggle = forum_toggle_label(course.course_details.forum.activated);
        let first_session = course.sessions.first().cloned();
        self.course = Some(course);
        if let Some(s) = first_session {
            self.change_updated_session(s);
        }
    }

    fn follow_up(&mut self, follow_up: FollowUp, applied: Applied) {
        match follow_up {
            FollowUp::SelectEntry(id) if applied.is_changed() => self.selected_entry = Some(id),
            FollowUp::RefreshUpdatedSession(id) if applied.is_changed() => {
                let fresh = self.sessions().iter().find(|s| s.id == id).cloned();
                if let Some(s) = fresh {
                    self.change_updated_session(s);
                }
            }
            FollowUp::FirstSession if applied.is_changed() => {
                let first = self.sessions().first().cloned();
                match first {
                    Some(s) => self.change_updated_session(s),
                    None => {
                        self.updated_session = None;
                        self.session_form = SessionForm::default();
                    }
                }
            }
            FollowUp::Forum(active) => {
                self.allow_forum_edition = false;
                self.forum_toggle = forum_toggle_label(active);
            }
            FollowUp::KeepSelection => {
                let entries = self.entries();
                let still_there = entries.iter().any(|e| Some(e.id) == self.selected_entry);
                let first = entries.first().map(|e| e.id);
                if !still_there {
                    self.selected_entry = first;
                }
            }
            _ => {}
        }
    }

    fn sessions(&self) -> &[Session] {
        self.course.as_ref().map(|c| c.sessions.as_slice()).unwrap_or(&[])
    }

    fn entries(&self) -> &[Entry] {
        self.course
            .as_ref()
            .map(|c| c.course_details.forum.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        let id = self.selected_entry?;
        self.entries().iter().find(|e| e.id == id)
    }

    pub fn select_entry(&mut self, id: NodeId) -> bool {
        if self.entries().iter().any(|e| e.id == id) {
            self.selected_entry = Some(id);
            true
        } else {
            false
        }
    }

    /// Most recent comment or reply of an entry, shown in the entry list.
    pub fn last_entry_comment<'a>(&self, entry: &'a Entry) -> Option<&'a Comment> {
        latest_entry_comment(entry)
    }

    pub fn change_updated_session(&mut self, session: Session) {
        self.session_form = SessionForm {
            title: session.title.clone(),
            description: session.description.clone(),
            date: date_input(session.date, &self.tz).unwrap_or_default(),
            time: time_input(session.date, &self.tz).unwrap_or_default(),
        };
        self.updated_session = Some(session);
    }

    pub fn toggle_files_edition(&mut self) {
        self.allow_files_edition = !self.allow_files_edition;
        self.files_edition_icon = if self.allow_files_edition { CLOSE_EDIT_ICON } else { EDIT_ICON };
        self.bus.publish(CourseEvent::FilesEditionChanged(self.allow_files_edition));
    }

    pub fn update_post_modal_mode(&self, mode: PostModal) {
        self.bus.publish(CourseEvent::PostModeChanged(mode));
    }

    /// An empty `title` keeps the current one.
    pub fn update_put_delete_modal_mode(&self, mode: PutDeleteModal, title: impl Into<String>) {
        self.bus.publish(CourseEvent::PutDeleteModeChanged { mode, title: title.into() });
    }

    pub fn open_post_modal(&mut self) {
        self.post_modal_open = true;
    }

    pub fn open_put_delete_modal(&mut self) {
        self.put_delete_modal_open = true;
    }

    fn handle_events(&mut self) {
        while let Some(event) = self.events.try_next() {
            match event {
                CourseEvent::PostModeChanged(mode) => {
                    self.post_modal_title = mode.default_title().to_string();
                    self.post_modal = mode;
                }
                CourseEvent::PutDeleteModeChanged { mode, title } => {
                    self.put_delete_modal = mode;
                    if !title.is_empty() {
                        self.put_delete_title = title;
                    }
                }
                CourseEvent::FileGroupDeleted(id) => self.on_file_group_deleted(id),
                CourseEvent::FileUpdateTargeted { file_group, file } => {
                    if let Some(group) = file_group {
                        self.file_title_input = group.title.clone();
                        self.updated_file_group = Some(group);
                    }
                    if let Some(file) = file {
                        self.file_title_input = file.name.clone();
                        self.updated_file = Some(file);
                    }
                }
                // Our own announcement, consumed by the file-group views.
                CourseEvent::FilesEditionChanged(_) => {}
            }
        }
    }

    fn on_file_group_deleted(&mut self, id: NodeId) {
        let Some(course) = self.course.as_mut() else { return };
        if apply(course, Confirmed::FileGroupDeleted(id)).is_changed() {
            info!(%id, "file group deleted locally");
            if course.course_details.files.is_empty() && self.allow_files_edition {
                self.toggle_files_edition();
            }
        }
    }

    fn loaded(&self) -> Result<&Course, InputError> {
        self.course.as_ref().ok_or(InputError::NothingSelected("course"))
    }

    /// Sends whatever the create dialog is set up for. Validation problems come back
    /// immediately; the server's answer arrives through `poll`.
    pub fn submit_post(&mut self) -> Result<(), InputError> {
        let course = self.loaded()?;
        let course_id = course.id;
        let details_id = course.course_details.id;
        let form = self.post_form.clone();

        match self.post_modal.clone() {
            PostModal::NewEntry => {
                require(&form.title, "entry title")?;
                info!(title = %form.title, "posting new entry");
                let entry = NewEntry { title: form.title, first_comment: form.comment };
                self.dispatch(Action::NewEntry, move |b| {
                    b.new_entry(entry, details_id).map(Confirmed::ForumReplaced)
                });
            }
            PostModal::NewSession => {
                require(&form.title, "session title")?;
                let date = from_inputs(&form.date, &form.time, &self.tz)?;
                let session = NewSession { title: form.title, description: form.comment, date };
                self.dispatch(Action::NewSession, move |b| {
                    b.new_session(session, course_id).map(Confirmed::CourseReplaced)
                });
            }
            PostModal::NewComment { reply_to } => {
                require(&form.comment, "comment")?;
                let entry_id = self.selected_entry.ok_or(InputError::NothingSelected("entry"))?;
                let comment = NewComment::replying_to(form.comment, reply_to.as_ref());
                self.dispatch(Action::NewComment, move |b| {
                    b.new_comment(comment, entry_id, details_id).map(Confirmed::EntryUpdated)
                });
            }
            PostModal::AddFileGroup { parent } => {
                require(&form.title, "file group title")?;
                let group = NewFileGroup { title: form.title, parent: parent.map(|p| p.id) };
                self.dispatch(Action::NewFileGroup, move |b| {
                    b.new_file_group(group, details_id).map(Confirmed::CourseDetailsReplaced)
                });
            }
            PostModal::AddFile { file_group } => {
                require(&form.title, "file name")?;
                let file = FileUpload {
                    id: None,
                    file_type: self.config.new_file_type,
                    name: form.title,
                    link: self.config.new_file_link.clone(),
                };
                let group_id = file_group.id;
                self.dispatch(Action::NewFile, move |b| {
                    b.new_file(file, group_id, details_id).map(Confirmed::RootFileGroupUpdated)
                });
            }
            PostModal::AddAttenders => {
                debug!("attenders are added from the attenders panel, nothing to send");
            }
        }
        Ok(())
    }

    pub fn submit_put_delete(&mut self) -> Result<(), InputError> {
        let course = self.loaded()?;
        let course_id = course.id;
        let details_id = course.course_details.id;
        let forum_active = course.course_details.forum.activated;

        match self.put_delete_modal {
            PutDeleteModal::ModifySession => {
                let current = self.updated_session.as_ref().ok_or(InputError::NothingSelected("session"))?;
                let form = &self.session_form;
                require(&form.title, "session title")?;
                let session = Session {
                    id: current.id,
                    title: form.title.clone(),
                    description: form.description.clone(),
                    date: from_inputs(&form.date, &form.time, &self.tz)?,
                };
                self.dispatch(Action::EditSession, move |b| {
                    b.edit_session(session).map(Confirmed::SessionUpdated)
                });
            }
            PutDeleteModal::ModifyForum => {
                self.dispatch(Action::EditForum, move |b| {
                    b.edit_forum(!forum_active, details_id).map(Confirmed::ForumActivation)
                });
            }
            PutDeleteModal::ModifyFileGroup => {
                let group = self
                    .updated_file_group
                    .as_ref()
                    .ok_or(InputError::NothingSelected("file group"))?;
                require(&self.file_title_input, "file group title")?;
                let edit = FileGroupEdit { id: group.id, title: self.file_title_input.clone() };
                self.dispatch(Action::EditFileGroup, move |b| {
                    b.edit_file_group(edit, course_id).map(Confirmed::RootFileGroupUpdated)
                });
            }
            PutDeleteModal::ModifyFile => {
                let group_id = self
                    .updated_file_group
                    .as_ref()
                    .map(|g| g.id)
                    .ok_or(InputError::NothingSelected("file group"))?;
                let file = self.updated_file.as_ref().ok_or(InputError::NothingSelected("file"))?;
                require(&self.file_title_input, "file name")?;
                let upload = FileUpload {
                    id: Some(file.id),
                    file_type: self.config.new_file_type,
                    name: self.file_title_input.clone(),
                    link: self.config.new_file_link.clone(),
                };
                self.dispatch(Action::EditFile, move |b| {
                    b.edit_file(upload, group_id, course_id).map(Confirmed::RootFileGroupUpdated)
                });
            }
        }
        Ok(())
    }

    pub fn delete_session(&mut self) -> Result<(), InputError> {
        self.loaded()?;
        let id = self
            .updated_session
            .as_ref()
            .map(|s| s.id)
            .ok_or(InputError::NothingSelected("session"))?;
        self.dispatch(Action::DeleteSession, move |b| {
            b.delete_session(id).map(Confirmed::SessionDeleted)
        });
        Ok(())
    }

    /// Drops the bus registration. Answers still in flight are discarded with the controller.
    pub fn teardown(self) {
        self.bus.unsubscribe(self.events.id());
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    let detail = cause
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| cause.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("backend panicked: {detail}")
}

fn require(value: &str, what: &'static str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        Err(InputError::Empty(what))
    } else {
        Ok(())
    }
}

/// Screen bookkeeping that depends on which kind of answer was applied.
enum FollowUp {
    SelectEntry(NodeId),
    RefreshUpdatedSession(NodeId),
    FirstSession,
    Forum(bool),
    KeepSelection,
    Nothing,
}

impl FollowUp {
    fn of(confirmed: &Confirmed) -> Self {
        match confirmed {
            Confirmed::EntryUpdated(e) => FollowUp::SelectEntry(e.id),
            Confirmed::SessionUpdated(s) => FollowUp::RefreshUpdatedSession(s.id),
            Confirmed::SessionDeleted(_) => FollowUp::FirstSession,
            Confirmed::ForumActivation(active) => FollowUp::Forum(*active),
            Confirmed::ForumReplaced(_) | Confirmed::CourseReplaced(_) => FollowUp::KeepSelection,
            Confirmed::CourseDetailsReplaced(_)
            | Confirmed::RootFileGroupUpdated(_)
            | Confirmed::FileGroupDeleted(_) => FollowUp::Nothing,
        }
    }
}
