//! Notification fan-out.
//!
//! Planning is pure: a change event becomes a list of per-recipient drafts.
//! Dispatch persists each draft to `Notifications_` (the durable side
//! effect) and then offers it to a best-effort real-time channel. A failed
//! push never fails the parent mutation; a failed insert is logged, the
//! remaining recipients are still processed, and the first insert error
//! propagates to the caller.

use std::collections::HashSet;

use chrono::Utc;
use log::{debug, error};
use sqlx::MySqlPool;

use crate::error::{AppError, Result};
use crate::models::notification::{Notification, NotificationKind};
use crate::models::task::TaskStatus;

/// A notification that has been planned but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub recipient_id: i64,
    pub kind: NotificationKind,
    pub text: String,
    pub link: Option<String>,
}

/// Best-effort live push keyed by recipient id. Implementations must not
/// block; returning false means the channel is unavailable for that
/// recipient.
pub trait RealtimeChannel: Send + Sync {
    fn push(&self, recipient_id: i64, notification: &Notification) -> bool;
}

/// Degraded mode: notifications are persisted but nothing is pushed live.
pub struct NoopChannel;

impl RealtimeChannel for NoopChannel {
    fn push(&self, _recipient_id: i64, _notification: &Notification) -> bool {
        false
    }
}

/// Recipient set for status changes and comments: assignees and project
/// leads, minus the actor, deduplicated, in stable order.
pub fn event_recipients(
    assignees: &HashSet<i64>,
    leads: &HashSet<i64>,
    actor_id: i64,
) -> Vec<i64> {
    let mut recipients: Vec<i64> = assignees
        .union(leads)
        .copied()
        .filter(|id| *id != actor_id)
        .collect();
    recipients.sort_unstable();
    recipients
}

/// One assignment notification per added/removed user. Recipients are
/// exactly the affected users, not the whole team.
pub fn plan_assignment_changes(
    task_title: &str,
    project_title: &str,
    link: &str,
    added: &[i64],
    removed: &[i64],
) -> Vec<NotificationDraft> {
    let mut drafts = Vec::with_capacity(added.len() + removed.len());
    for id in added {
        drafts.push(NotificationDraft {
            recipient_id: *id,
            kind: NotificationKind::Assignment,
            text: format!(
                "You were assigned to task '{}' in project '{}'",
                task_title, project_title
            ),
            link: Some(link.to_string()),
        });
    }
    for id in removed {
        drafts.push(NotificationDraft {
            recipient_id: *id,
            kind: NotificationKind::Assignment,
            text: format!("You were unassigned from task '{}'", task_title),
            link: None,
        });
    }
    drafts
}

pub fn plan_status_change(
    task_title: &str,
    old_status: TaskStatus,
    new_status: TaskStatus,
    assignees: &HashSet<i64>,
    leads: &HashSet<i64>,
    actor_id: i64,
    link: &str,
) -> Vec<NotificationDraft> {
    event_recipients(assignees, leads, actor_id)
        .into_iter()
        .map(|recipient_id| NotificationDraft {
            recipient_id,
            kind: NotificationKind::StatusChange,
            text: format!(
                "Status of task '{}' changed from {} to {}",
                task_title,
                old_status.as_str(),
                new_status.as_str()
            ),
            link: Some(link.to_string()),
        })
        .collect()
}

pub fn plan_comment(
    task_title: &str,
    assignees: &HashSet<i64>,
    leads: &HashSet<i64>,
    author_id: i64,
    link: &str,
) -> Vec<NotificationDraft> {
    event_recipients(assignees, leads, author_id)
        .into_iter()
        .map(|recipient_id| NotificationDraft {
            recipient_id,
            kind: NotificationKind::Comment,
            text: format!("New comment on task '{}'", task_title),
            link: Some(link.to_string()),
        })
        .collect()
}

pub fn task_link(project_id: i64, task_id: i64) -> String {
    format!("/projects/{}/tasks/{}", project_id, task_id)
}

/// Persists and delivers the planned notifications. Each recipient is
/// independent; one failed insert does not stop the others.
pub async fn dispatch(
    pool: &MySqlPool,
    channel: &dyn RealtimeChannel,
    drafts: Vec<NotificationDraft>,
) -> Result<()> {
    let mut first_err: Option<AppError> = None;

    for draft in drafts {
        let insert_result = sqlx::query(
            "INSERT INTO Notifications_ (recipient_id, kind, text, link, is_read)
             VALUES (?, ?, ?, ?, FALSE)",
        )
        .bind(draft.recipient_id)
        .bind(draft.kind.as_str())
        .bind(&draft.text)
        .bind(&draft.link)
        .execute(pool)
        .await;

        match insert_result {
            Ok(outcome) => {
                let notification = Notification {
                    notification_id: outcome.last_insert_id() as i64,
                    recipient_id: draft.recipient_id,
                    kind: draft.kind,
                    text: draft.text,
                    link: draft.link,
                    is_read: false,
                    created_at: Utc::now().naive_utc(),
                };
                if !channel.push(draft.recipient_id, &notification) {
                    debug!(
                        "no live channel for recipient {}, notification persisted only",
                        draft.recipient_id
                    );
                }
            }
            Err(e) => {
                error!(
                    "failed to persist notification for recipient {}: {}",
                    draft.recipient_id, e
                );
                if first_err.is_none() {
                    first_err = Some(e.into());
                }
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[i64]) -> HashSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn assignment_plan_targets_only_affected_users() {
        let drafts = plan_assignment_changes("Ship it", "Q3", "/projects/1/tasks/2", &[3], &[1]);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].recipient_id, 3);
        assert_eq!(drafts[0].kind, NotificationKind::Assignment);
        assert!(drafts[0].text.contains("assigned to task 'Ship it'"));
        assert_eq!(drafts[1].recipient_id, 1);
        assert!(drafts[1].text.contains("unassigned from task 'Ship it'"));
    }

    #[test]
    fn status_change_excludes_the_actor() {
        // Actor 5 is both assignee and lead; they hear nothing about their
        // own change.
        let drafts = plan_status_change(
            "Ship it",
            TaskStatus::InProgress,
            TaskStatus::Completed,
            &ids(&[5, 7]),
            &ids(&[5, 9]),
            5,
            "/projects/1/tasks/2",
        );
        let recipients: Vec<i64> = drafts.iter().map(|d| d.recipient_id).collect();
        assert_eq!(recipients, vec![7, 9]);
        for draft in &drafts {
            assert_eq!(draft.kind, NotificationKind::StatusChange);
            assert!(draft.text.contains("from in_progress to completed"));
        }
    }

    #[test]
    fn overlapping_assignee_and_lead_gets_one_notification() {
        let drafts = plan_status_change(
            "T",
            TaskStatus::Planned,
            TaskStatus::Stuck,
            &ids(&[2, 3]),
            &ids(&[3]),
            1,
            "/projects/1/tasks/2",
        );
        let recipients: Vec<i64> = drafts.iter().map(|d| d.recipient_id).collect();
        assert_eq!(recipients, vec![2, 3]);
    }

    #[test]
    fn comment_plan_excludes_author() {
        let drafts = plan_comment("T", &ids(&[1, 2]), &ids(&[3]), 2, "/projects/1/tasks/2");
        let recipients: Vec<i64> = drafts.iter().map(|d| d.recipient_id).collect();
        assert_eq!(recipients, vec![1, 3]);
        assert!(drafts.iter().all(|d| d.kind == NotificationKind::Comment));
    }

    #[test]
    fn no_recipients_means_no_drafts() {
        let drafts = plan_status_change(
            "T",
            TaskStatus::Planned,
            TaskStatus::InProgress,
            &ids(&[4]),
            &ids(&[]),
            4,
            "/x",
        );
        assert!(drafts.is_empty());
    }
}
