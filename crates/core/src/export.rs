use crate::arena::Arena;
use crate::datetime::{date_input, time_input};
use crate::error::ExportError;
use crate::model::*;
use crate::tree_sync::{latest_entry_comment, node_count};

/// One row per file group, pre-order, with the parent id and depth taken from the arena.
pub fn file_groups_to_csv(groups: &[FileGroup], mut w: impl std::io::Write) -> Result<(), ExportError> {
    let arena = Arena::from_nested(groups.to_vec())?;
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["id", "parent", "depth", "title", "files"])?;
    for n in arena.depth_first() {
        writer.write_record([
            n.id.to_string(),
            n.parent.map(|p| p.to_string()).unwrap_or_default(),
            n.depth.to_string(),
            n.payload.title.clone(),
            n.payload.files.len().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn sessions_to_csv(
    sessions: &[Session],
    tz: &chrono::FixedOffset,
    mut w: impl std::io::Write,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["id", "title", "date", "time", "description"])?;
    for s in sessions {
        writer.write_record([
            s.id.to_string(),
            s.title.clone(),
            date_input(s.date, tz).unwrap_or_default(),
            time_input(s.date, tz).unwrap_or_default(),
            s.description.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(course: &Course) -> Result<serde_json::Value, ExportError> {
    let arena = Arena::from_nested(course.course_details.files.clone())?;
    let forum = &course.course_details.forum;
    Ok(serde_json::json!({
        "id": course.id.0,
        "title": course.title,
        "sessions": course.sessions.iter().map(|s| serde_json::json!({
            "id": s.id.0,
            "title": s.title,
            "date": s.date,
        })).collect::<Vec<_>>(),
        "forum": {
            "activated": forum.activated,
            "entries": forum.entries.iter().map(|e| serde_json::json!({
                "id": e.id.0,
                "title": e.title,
                "comments": node_count(&e.comments),
                "lastComment": latest_entry_comment(e).map(|c| c.id.0),
            })).collect::<Vec<_>>(),
        },
        "fileGroups": arena.depth_first().map(|n| serde_json::json!({
            "id": n.id.0,
            "parent": n.parent.map(|p| p.0),
            "depth": n.depth,
            "title": n.payload.title,
            "files": n.payload.files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            "children": n.children.iter().map(|c| c.0).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    }))
}
