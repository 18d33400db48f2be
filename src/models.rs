use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque backend identifier of an uploaded PDF.
/// The backend may send it as a JSON string or a number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => DocumentId(s),
            Raw::Int(n) => DocumentId(n.to_string()),
            Raw::Float(n) => DocumentId(n.to_string()),
        })
    }
}

/// Size of a stored PDF: a raw byte count or a label the backend already formatted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileSize {
    Bytes(u64),
    Label(String),
}

impl FileSize {
    /// Human-readable size, e.g. `"1.5 MB"`.
    pub fn label(&self) -> String {
        const UNITS: [&str; 3] = ["KB", "MB", "GB"];
        match self {
            FileSize::Label(label) => label.clone(),
            FileSize::Bytes(bytes) if *bytes < 1024 => format!("{bytes} B"),
            FileSize::Bytes(bytes) => {
                let mut value = *bytes as f64 / 1024.0;
                let mut unit = 0;
                while value >= 1024.0 && unit < UNITS.len() - 1 {
                    value /= 1024.0;
                    unit += 1;
                }
                format!("{value:.1} {}", UNITS[unit])
            }
        }
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Matches the backend PDF record returned by `GET /pdfs` and `POST /upload-pdf`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    /// The upload response carries no date; such documents are stamped on receipt.
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    pub upload_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<FileSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
}

/// One question/answer exchange in a document's transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Client-side key; never sent to or received from the backend.
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    /// Set while the answer is still being generated.
    #[serde(skip)]
    pub pending: bool,
}

impl Message {
    /// Optimistic transcript entry shown while the backend answers `question`.
    pub fn placeholder(question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: String::new(),
            timestamp: Utc::now(),
            pending: true,
        }
    }

    /// A settled entry that did not come from the backend, such as an error notice.
    pub fn local(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
            pending: false,
        }
    }

    /// `HH:MM` on the reader's clock, `utc_offset_minutes` east of UTC.
    /// An offset beyond a day is ignored and UTC is shown.
    pub fn clock_label(&self, utc_offset_minutes: i32) -> String {
        match FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)) {
            Some(offset) => self.timestamp.with_timezone(&offset).format("%H:%M").to_string(),
            None => self.timestamp.format("%H:%M").to_string(),
        }
    }
}

/// Request body for `POST /ask-question`.
#[derive(Clone, Debug, Serialize)]
pub struct AskRequest<'a> {
    pub pdf_id: &'a DocumentId,
    pub question: &'a str,
}

/// Timestamps as the backend writes them: ISO-8601, usually without an offset.
/// Offset-less values are taken to be UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
