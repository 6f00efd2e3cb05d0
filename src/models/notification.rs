use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Comment,
    Assignment,
    StatusChange,
    Deadline,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Comment => "comment",
            NotificationKind::Assignment => "assignment",
            NotificationKind::StatusChange => "status_change",
            NotificationKind::Deadline => "deadline",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationKind> {
        match s {
            "comment" => Some(NotificationKind::Comment),
            "assignment" => Some(NotificationKind::Assignment),
            "status_change" => Some(NotificationKind::StatusChange),
            "deadline" => Some(NotificationKind::Deadline),
            _ => None,
        }
    }
}

/// Immutable notification record. Only the read flag ever changes after
/// creation, via the mark-read endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub notification_id: i64,
    pub recipient_id: i64,
    pub kind: NotificationKind,
    pub text: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub recipient_id: i64,
    pub kind: String,
    pub text: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = crate::error::AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&row.kind).ok_or_else(|| {
            crate::error::AppError::Validation(format!(
                "notification {} has unknown kind '{}'",
                row.notification_id, row.kind
            ))
        })?;
        Ok(Notification {
            notification_id: row.notification_id,
            recipient_id: row.recipient_id,
            kind,
            text: row.text,
            link: row.link,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}
