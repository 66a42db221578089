//! Guardian notification
//!
//! `Notifier` is the seam to the outbound message channel. The sender
//! identity is injected configuration, not process-global state, so a
//! test double can stand in for delivery. Dispatch is a detached task:
//! admission never waits on it, and a failed delivery only ever shows up
//! in the log.

use async_trait::async_trait;
use biopass_core::Student;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Sender identity for outbound notifications
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub sender_name: String,
    pub sender_email: String,
}

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outbound message channel.
///
/// Fire-and-forget from the caller's perspective; the return value is
/// only ever consulted by the detached dispatch task for logging.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that writes the formatted message to the log.
///
/// Stands in for a real delivery channel; swap in an SMTP- or
/// webhook-backed implementation behind the same trait.
pub struct LogNotifier {
    config: NotifierConfig,
}

impl LogNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(
            from = %format!("{} <{}>", self.config.sender_name, self.config.sender_email),
            %to,
            %subject,
            %body,
            "notification dispatched"
        );
        Ok(())
    }
}

/// Format the attendance message for a guardian.
pub fn attendance_message(student: &Student, at: DateTime<Utc>) -> (String, String) {
    let subject = "Student Attendance Notification".to_string();
    let body = format!(
        "Dear {},\n\n\
         This is to inform you that your child, {}, has marked their attendance.\n\n\
         Student Details:\n\
         - Name: {}\n\
         - Roll No: {}\n\
         - Time: {}\n\n\
         If you have any questions or concerns, please feel free to contact us.",
        student.parent_name,
        student.name,
        student.name,
        student.roll_number,
        at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    (subject, body)
}

/// Dispatch an attendance notification on a detached task.
///
/// Errors are logged and dropped; they must never reach the admission
/// caller.
pub fn spawn_attendance_notification(
    notifier: Arc<dyn Notifier>,
    student: Student,
    at: DateTime<Utc>,
) {
    tokio::spawn(async move {
        let (subject, body) = attendance_message(&student, at);
        if let Err(err) = notifier.send(&student.parent_email, &subject, &body).await {
            tracing::warn!(
                fingerprint_id = %student.fingerprint_id,
                to = %student.parent_email,
                error = %err,
                "attendance notification failed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use biopass_core::{FingerprintId, NewStudent};

    fn sample_student() -> Student {
        NewStudent {
            fingerprint_id: FingerprintId::new(5).unwrap(),
            name: "Alice".to_string(),
            roll_number: "R1".to_string(),
            email: "alice@example.com".to_string(),
            mobile: "555-0100".to_string(),
            parent_name: "Bob".to_string(),
            parent_email: "bob@example.com".to_string(),
            address: "1 Main St".to_string(),
        }
        .into_student()
    }

    #[test]
    fn test_message_names_guardian_and_student() {
        let student = sample_student();
        let (subject, body) = attendance_message(&student, Utc::now());
        assert_eq!(subject, "Student Attendance Notification");
        assert!(body.starts_with("Dear Bob,"));
        assert!(body.contains("Alice"));
        assert!(body.contains("Roll No: R1"));
    }
}
