use crate::error::{AppError, AppResult};
use crate::tasks::dto::TaskPayload;
use crate::tasks::repo_types::TaskStatus;

/// Task input after boundary validation; the only form the repository
/// accepts for writes.
#[derive(Debug)]
pub struct ValidatedTask {
    pub title: String,
    pub content: String,
    pub status: TaskStatus,
}

/// Validates a create/update payload, reporting the first violated field.
pub fn validate_payload(payload: TaskPayload) -> AppResult<ValidatedTask> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation("title", "Title is required"));
    }

    let status = match payload.status {
        None => TaskStatus::default(),
        Some(s) => s
            .parse()
            .map_err(|_| AppError::validation("status", format!("Invalid status: {s}")))?,
    };

    Ok(ValidatedTask {
        title,
        content: payload.content.unwrap_or_default(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str, content: Option<&str>, status: Option<&str>) -> TaskPayload {
        TaskPayload {
            title: title.to_string(),
            content: content.map(String::from),
            status: status.map(String::from),
        }
    }

    #[test]
    fn empty_title_fails_naming_the_field() {
        for title in ["", "   ", "\t\n"] {
            let err = validate_payload(payload(title, None, None)).unwrap_err();
            match err {
                AppError::Validation { field, ref message } => {
                    assert_eq!(field, "title");
                    assert_eq!(message, "Title is required");
                }
                _ => panic!("expected validation error"),
            }
        }
    }

    #[test]
    fn missing_content_defaults_to_empty_string() {
        let task = validate_payload(payload("Buy milk", None, None)).expect("valid");
        assert_eq!(task.content, "");
    }

    #[test]
    fn missing_status_defaults_to_new() {
        let task = validate_payload(payload("Buy milk", Some("<p>2l</p>"), None)).expect("valid");
        assert_eq!(task.status, TaskStatus::New);
        assert_eq!(task.content, "<p>2l</p>");
    }

    #[test]
    fn unknown_status_fails_naming_the_field() {
        let err = validate_payload(payload("Buy milk", None, Some("DONE"))).unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "status", .. }));
    }

    #[test]
    fn explicit_status_is_kept() {
        let task =
            validate_payload(payload("Buy milk", None, Some("IN_PROGRESS"))).expect("valid");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn title_is_trimmed_on_write() {
        let task = validate_payload(payload("  Buy milk  ", None, None)).expect("valid");
        assert_eq!(task.title, "Buy milk");
    }
}
