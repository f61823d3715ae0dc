use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::ser::SerializeSeq;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use tracing::warn;

/// One recorded interval of tracked time. `id` and `tags` belong to Watson
/// and are carried along untouched so that rewriting the frames file does
/// not lose them.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Frame {
    pub project: Arc<str>,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub message: Option<Arc<str>>,
    pub updated_at: DateTime<Utc>,
    pub id: String,
    pub tags: Vec<String>,
}

impl Frame {
    pub fn duration(&self) -> Duration {
        self.stop - self.start
    }

    /// Restores the start <= stop invariant on a row that violates it. The
    /// repair is lossless enough to tolerate, unlike dropping the row.
    pub(crate) fn normalized(mut self) -> Self {
        if self.start > self.stop {
            warn!(
                "frame {} stops before it starts, clamping stop to {}",
                self.id, self.start
            );
            self.stop = self.start;
        }
        self
    }

    pub fn with_start(self, start: DateTime<Utc>) -> Self {
        Self { start, ..self }
    }

    pub fn with_stop(self, stop: DateTime<Utc>) -> Self {
        Self { stop, ..self }
    }
}

/// Wire row of the frames file: `[start, stop, project, id, tags,
/// updated_at]`, with an optional trailing `message` element on files
/// written by QWatson. Timestamps are Unix seconds.
#[derive(Deserialize)]
pub(crate) struct FrameRow(
    #[serde(with = "chrono::serde::ts_seconds")] pub DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")] pub DateTime<Utc>,
    pub Arc<str>,
    pub String,
    pub Vec<String>,
    #[serde(with = "chrono::serde::ts_seconds")] pub DateTime<Utc>,
    #[serde(default)] pub Option<Arc<str>>,
);

// Rows without a message are written 6 elements wide, the width a plain
// Watson understands. serde cannot express a skippable tuple element, hence
// the manual impl.
impl Serialize for FrameRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.6.is_some() { 7 } else { 6 };
        let mut row = serializer.serialize_seq(Some(len))?;
        row.serialize_element(&self.0.timestamp())?;
        row.serialize_element(&self.1.timestamp())?;
        row.serialize_element(&self.2)?;
        row.serialize_element(&self.3)?;
        row.serialize_element(&self.4)?;
        row.serialize_element(&self.5.timestamp())?;
        if let Some(message) = &self.6 {
            row.serialize_element(message)?;
        }
        row.end()
    }
}

impl From<FrameRow> for Frame {
    fn from(FrameRow(start, stop, project, id, tags, updated_at, message): FrameRow) -> Self {
        Frame {
            project,
            start,
            stop,
            message,
            updated_at,
            id,
            tags,
        }
    }
}

impl From<&Frame> for FrameRow {
    fn from(frame: &Frame) -> Self {
        FrameRow(
            frame.start,
            frame.stop,
            frame.project.clone(),
            frame.id.clone(),
            frame.tags.clone(),
            frame.updated_at,
            frame.message.clone(),
        )
    }
}
