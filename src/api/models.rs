use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Author of a chat message. Serialized as the backend's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub mymsg: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Only the name and size of an attachment leave the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct SaveMessageRequest<'a> {
    #[serde(rename = "type")]
    pub kind: Sender,
    pub content: &'a str,
    pub files: Vec<FileSummary>,
    pub timestamp: DateTime<Utc>,
}

/// A signed-in session as returned by `/callsignin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub message: Option<String>,
}

/// Body of a successful `/callsignup`. Backends may or may not log the new
/// account in straight away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpReply {
    pub token: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub kind: Sender,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Lenient conversion of one `/getchathistory` item. Mongo-style `_id`
    /// and numeric ids are both accepted.
    pub fn from_value(item: &Value) -> Option<Self> {
        let id = item.get("id").or_else(|| item.get("_id")).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })?;
        let kind = match item.get("type").and_then(Value::as_str) {
            Some("user") => Sender::User,
            _ => Sender::Assistant,
        };
        let content = item.get("content").and_then(Value::as_str).unwrap_or_default().to_string();
        let timestamp = item
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        Some(Self { id, kind, content, timestamp })
    }
}

pub(crate) fn token_from(body: &Value) -> Option<String> {
    body.get("token")
        .or_else(|| body.get("accessToken"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub(crate) fn message_from(body: &Value) -> Option<String> {
    body.get("msg")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .or_else(|| body.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

pub(crate) const NO_REPLY: &str = "No response from backend.";

pub(crate) fn reply_from(body: &Value) -> String {
    body.get("reply")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("response"))
        .and_then(Value::as_str)
        .or_else(|| body.as_str())
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(NO_REPLY)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn history_entry_accepts_mongo_ids() {
        let entry = HistoryEntry::from_value(&json!({
            "_id": "65f0c0ffee",
            "type": "user",
            "content": "hi",
            "timestamp": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(entry.id, "65f0c0ffee");
        assert_eq!(entry.kind, Sender::User);
        assert!(entry.timestamp.is_some());
    }

    #[test]
    fn history_entry_without_id_is_skipped() {
        assert!(HistoryEntry::from_value(&json!({"type": "user", "content": "x"})).is_none());
    }

    #[test]
    fn numeric_id_and_bad_timestamp() {
        let entry = HistoryEntry::from_value(&json!({"id": 7, "type": "bot", "timestamp": "yesterday"})).unwrap();
        assert_eq!(entry.id, "7");
        assert_eq!(entry.kind, Sender::Assistant);
        assert_eq!(entry.content, "");
        assert!(entry.timestamp.is_none());
    }

    #[test]
    fn reply_prefers_reply_field() {
        assert_eq!(reply_from(&json!({"reply": "hey", "message": "ignored"})), "hey");
        assert_eq!(reply_from(&json!("plain")), "plain");
        assert_eq!(reply_from(&json!({})), NO_REPLY);
    }

    #[test]
    fn save_request_uses_type_key() {
        let req = SaveMessageRequest {
            kind: Sender::Assistant,
            content: "ok",
            files: vec![FileSummary { name: "a.txt".into(), size: 3 }],
            timestamp: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["type"], "assistant");
        assert_eq!(v["files"][0]["name"], "a.txt");
        assert_eq!(v["timestamp"], "2024-01-01T00:00:00Z");
    }
}
