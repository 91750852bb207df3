//! Operator-facing notifications emitted by the screens.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// A toast-style message. Presentation is left to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}
