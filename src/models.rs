//! Records mirrored from the backend.
//!
//! The backend is loose about types: ids arrive as strings or numbers and
//! status codes as strings or numbers. The deserializers here normalise both
//! so the rest of the crate works with one representation.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Account state derived from the backend's numeric status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountStatus {
    Blocked,
    Active,
    #[default]
    Pending,
}

impl AccountStatus {
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Blocked,
            1 => Self::Active,
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Blocked => "Blocked",
            Self::Active => "Active",
            Self::Pending => "Pending",
        }
    }
}

impl From<Code> for AccountStatus {
    fn from(code: Code) -> Self {
        code.as_int().map_or(Self::Pending, Self::from_code)
    }
}

/// Moderation state of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStatus {
    Rejected,
    Approved,
    Pending,
    /// A code this dashboard does not know; kept verbatim.
    Other(String),
}

impl PostStatus {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => Self::Rejected,
            "1" => Self::Approved,
            "3" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Rejected => "0",
            Self::Approved => "1",
            Self::Pending => "3",
            Self::Other(code) => code,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Rejected => "Rejected",
            Self::Approved => "Approved",
            Self::Pending => "Pending",
            Self::Other(code) => code,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl Default for PostStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<Code> for PostStatus {
    fn from(code: Code) -> Self {
        match code {
            Code::Text(text) => Self::from_code(&text),
            Code::Number(n) => Self::from_code(&n.to_string()),
        }
    }
}

/// Triage state of an abuse report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ReportStatus {
    Pending,
    /// `WARNING_1` through `WARNING_3`.
    Warning(u8),
    Blocked,
    Dismissed,
    Resolved,
    Other(String),
}

impl ReportStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "BLOCKED" => Self::Blocked,
            "DISMISSED" => Self::Dismissed,
            "RESOLVED" => Self::Resolved,
            upper => upper
                .strip_prefix("WARNING_")
                .and_then(|n| n.parse().ok())
                .map_or_else(|| Self::Other(raw.to_string()), Self::Warning),
        }
    }

    /// Display label: first letter upper case, the rest lower case.
    #[must_use]
    pub fn label(&self) -> String {
        let raw = match self {
            Self::Pending => "PENDING".to_string(),
            Self::Warning(n) => format!("WARNING_{n}"),
            Self::Blocked => "BLOCKED".to_string(),
            Self::Dismissed => "DISMISSED".to_string(),
            Self::Resolved => "RESOLVED".to_string(),
            Self::Other(raw) => raw.clone(),
        };
        capitalize(&raw)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<String> for ReportStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// What a report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Post,
    User,
}

impl TargetType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Post => "Post",
            Self::User => "User",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl From<String> for MediaKind {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("video") {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// Status code as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Code {
    Text(String),
    Number(i64),
}

impl Code {
    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Text(text) => text.trim().parse().ok(),
            Self::Number(n) => Some(*n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub username: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub email: String,
    #[serde(default, deserialize_with = "account_status")]
    pub status: AccountStatus,
    #[serde(default, alias = "reportCount")]
    pub reports: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(default, deserialize_with = "string_or_null")]
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "profilePicture")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub content: String,
    #[serde(default, deserialize_with = "post_status")]
    pub status: PostStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<PostAuthor>,
}

impl Post {
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    #[must_use]
    pub fn author_email(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .filter(|e| !e.is_empty())
    }

    #[must_use]
    pub fn author_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMedia {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub media_url: String,
    #[serde(default, deserialize_with = "media_kind")]
    pub media_type: MediaKind,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub post_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(alias = "id", deserialize_with = "id_string")]
    pub report_id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub reported_user_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub reporter_user_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub reported_post_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub reason: String,
    #[serde(default)]
    pub report_status: Option<ReportStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Report {
    /// Post when a non-empty post reference is present, user otherwise.
    #[must_use]
    pub fn target_type(&self) -> TargetType {
        if self.reported_post_id.is_some() {
            TargetType::Post
        } else {
            TargetType::User
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.report_status
            .as_ref()
            .is_some_and(ReportStatus::is_pending)
    }

    #[must_use]
    pub fn status_label(&self) -> String {
        self.report_status
            .as_ref()
            .map_or_else(|| "No status".to_string(), ReportStatus::label)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub sender: String,
    #[serde(default)]
    pub sender_pic: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub post_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Body of `POST admins`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAdminRecord {
    pub aname: String,
    pub aemail: String,
    pub apass: String,
    pub aprofilepic: String,
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and zone-less ISO-8601 date-times; the latter are read
/// as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn capitalize(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric id, got {other}"
        ))),
    }
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    id_string(deserializer).map(|id| Some(id).filter(|id| !id.is_empty()))
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn account_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AccountStatus, D::Error> {
    Option::<Code>::deserialize(deserializer)
        .map(|code| code.map(AccountStatus::from).unwrap_or_default())
}

fn post_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PostStatus, D::Error> {
    Option::<Code>::deserialize(deserializer)
        .map(|code| code.map(PostStatus::from).unwrap_or_default())
}

fn media_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MediaKind, D::Error> {
    Option::<String>::deserialize(deserializer)
        .map(|kind| kind.map(MediaKind::from).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_status_codes() {
        let user: User =
            serde_json::from_value(json!({"id": 7, "username": "ana", "status": 1})).unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.status, AccountStatus::Active);

        let blocked: User =
            serde_json::from_value(json!({"id": "8", "username": "bo", "status": "0"})).unwrap();
        assert_eq!(blocked.status, AccountStatus::Blocked);

        for code in [json!(2), json!(-1), json!(42), json!(null), json!("weird")] {
            let user: User =
                serde_json::from_value(json!({"id": 1, "status": code})).unwrap();
            assert_eq!(user.status.label(), "Pending");
        }
    }

    #[test]
    fn test_user_report_count_alias() {
        let user: User =
            serde_json::from_value(json!({"id": 1, "reportCount": 4})).unwrap();
        assert_eq!(user.reports, Some(4));
    }

    #[test]
    fn test_post_status_string_or_number() {
        let post: Post = serde_json::from_value(json!({"id": 1, "status": 3})).unwrap();
        assert_eq!(post.status, PostStatus::Pending);

        let post: Post = serde_json::from_value(json!({"id": 1, "status": "1"})).unwrap();
        assert_eq!(post.status, PostStatus::Approved);

        let post: Post = serde_json::from_value(json!({"id": 1, "status": "7"})).unwrap();
        assert_eq!(post.status, PostStatus::Other("7".to_string()));
        assert_eq!(post.status.code(), "7");
    }

    #[test]
    fn test_report_target_type() {
        let on_post: Report = serde_json::from_value(json!({
            "reportId": 1, "reportedUserId": 2, "reporterUserId": 3,
            "reportedPostId": 9, "reason": "spam", "reportStatus": "PENDING"
        }))
        .unwrap();
        assert_eq!(on_post.target_type(), TargetType::Post);
        assert!(on_post.is_pending());

        let on_user: Report = serde_json::from_value(json!({
            "reportId": 2, "reportedUserId": 2, "reporterUserId": 3,
            "reportedPostId": null, "reason": "abuse"
        }))
        .unwrap();
        assert_eq!(on_user.target_type(), TargetType::User);

        let empty_ref: Report = serde_json::from_value(json!({
            "reportId": 3, "reportedPostId": "", "reason": "x"
        }))
        .unwrap();
        assert_eq!(empty_ref.target_type(), TargetType::User);
    }

    #[test]
    fn test_report_status_labels() {
        assert_eq!(ReportStatus::parse("PENDING").label(), "Pending");
        assert_eq!(ReportStatus::parse("WARNING_2"), ReportStatus::Warning(2));
        assert_eq!(ReportStatus::parse("WARNING_2").label(), "Warning_2");
        assert_eq!(ReportStatus::parse("ESCALATED").label(), "Escalated");

        let report: Report = serde_json::from_value(json!({"reportId": 1})).unwrap();
        assert_eq!(report.status_label(), "No status");
        assert!(!report.is_pending());
    }

    #[test]
    fn test_media_kind() {
        let media: PostMedia = serde_json::from_value(json!({
            "id": 1, "mediaUrl": "a.mp4", "mediaType": "VIDEO", "postId": 4
        }))
        .unwrap();
        assert_eq!(media.media_type, MediaKind::Video);
        assert_eq!(media.post_id.as_deref(), Some("4"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-03-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2025-03-01T10:00:00.123456").is_some());
        assert!(parse_timestamp("2025-03-01T10:00:00+02:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_post_author_email() {
        let post: Post = serde_json::from_value(json!({
            "id": 1, "content": "hi",
            "user": {"username": "ana", "profilePicture": "pic.png", "email": "ana@x.io"}
        }))
        .unwrap();
        assert_eq!(post.author_email(), Some("ana@x.io"));
        assert_eq!(post.author_name(), Some("ana"));
        assert_eq!(
            post.user.and_then(|u| u.avatar).as_deref(),
            Some("pic.png")
        );
    }
}
