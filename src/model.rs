//! Prompt record model.
//!
//! [`Metadata`] is the title/tags/categories/owner subset of a prompt and is
//! validated on its own before anything else is built. [`PromptRecord`] adds
//! the prompt body plus `created_at` / `updated_at` bookkeeping.
//!
//! Record fields are private. Every mutation goes through
//! [`PromptRecord::apply`] (or one of the `set_*` shorthands), which sets the
//! field and refreshes `updated_at` as a single step.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Owner identifier used when neither the metadata nor the configuration
/// names one.
pub const DEFAULT_OWNER_ID: i64 = 1;

/// Placeholder title for formats that carry no discoverable title.
pub const NO_TITLE: &str = "No Title";

/// Placeholder content for documents that are empty after cleanup.
pub const NO_CONTENT: &str = "No Content";

/// Wire format of `created_at` / `updated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while validating metadata or record fields.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Metadata was not a JSON object
    #[error("Metadata must be a JSON object")]
    NotAnObject,

    /// The `title` field is absent (or null)
    #[error("Missing required metadata field: title")]
    MissingTitle,

    /// The `title` field is empty or whitespace only
    #[error("Metadata field 'title' must not be empty")]
    EmptyTitle,

    /// A field has the wrong shape (tags not a list of strings, owner not an integer, ...)
    #[error("Malformed metadata: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ============================================================================
// Metadata
// ============================================================================

/// Validated descriptive fields of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Prompt title, never empty
    pub title: String,

    /// Free-form tags, in source order
    #[serde(default)]
    pub tags: Vec<String>,

    /// Categories, in source order
    #[serde(default)]
    pub categories: Vec<String>,

    /// Owner identifier
    pub user_id: i64,
}

impl Metadata {
    /// Creates metadata with the given title, no tags or categories, and the
    /// given owner.
    pub fn new(title: impl Into<String>, user_id: i64) -> Result<Self, ValidationError> {
        let metadata = Self {
            title: title.into(),
            tags: Vec::new(),
            categories: Vec::new(),
            user_id,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Validates an arbitrary JSON value as metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAnObject`] for anything but an object,
    /// otherwise the same errors as [`Metadata::from_map`].
    pub fn from_value(value: Value, default_owner: i64) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Self::from_map(map, default_owner),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    /// Validates a JSON object as metadata.
    ///
    /// `user_id` falls back to `default_owner` when absent. Unknown keys are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the title is missing or empty, or if a
    /// field has the wrong type.
    pub fn from_map(
        mut map: Map<String, Value>,
        default_owner: i64,
    ) -> Result<Self, ValidationError> {
        match map.get("title") {
            None | Some(Value::Null) => return Err(ValidationError::MissingTitle),
            Some(_) => {}
        }

        map.entry("user_id")
            .or_insert_with(|| Value::from(default_owner));

        let metadata: Metadata = serde_json::from_value(Value::Object(map))?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Checks the invariants that the type system cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

// ============================================================================
// Prompt Record
// ============================================================================

/// A single field change applied to a [`PromptRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// New title; must not be empty
    Title(String),
    /// New tag list
    Tags(Vec<String>),
    /// New category list
    Categories(Vec<String>),
    /// New owner identifier
    UserId(i64),
    /// New prompt body
    Content(String),
}

/// A validated prompt with its content and timestamps.
///
/// Serializes to the canonical mapping
/// `{title, tags, categories, user_id, content, created_at, updated_at}`
/// with timestamps formatted as `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    #[serde(flatten)]
    metadata: Metadata,

    content: String,

    #[serde(with = "timestamp")]
    created_at: NaiveDateTime,

    #[serde(with = "timestamp")]
    updated_at: NaiveDateTime,
}

impl PromptRecord {
    /// Builds a record stamped with the current local time.
    pub fn new(metadata: Metadata, content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new_at(metadata, content, now())
    }

    /// Builds a record with both timestamps set to `at`.
    pub fn new_at(
        metadata: Metadata,
        content: impl Into<String>,
        at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        metadata.validate()?;
        Ok(Self {
            metadata,
            content: content.into(),
            created_at: at,
            updated_at: at,
        })
    }

    /// Restores a record from its canonical JSON form, keeping the stored
    /// timestamps as they are.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let record: PromptRecord = serde_json::from_str(json)?;
        record.metadata.validate()?;
        Ok(record)
    }

    /// Serializes the canonical field mapping.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Applies `update` and refreshes `updated_at` to the current time.
    pub fn apply(&mut self, update: FieldUpdate) -> Result<(), ValidationError> {
        self.apply_at(update, now())
    }

    /// Applies `update` and refreshes `updated_at` to `at`.
    ///
    /// `updated_at` never moves backwards: if `at` is earlier than the
    /// current value it is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] for an empty title, leaving the
    /// record untouched.
    pub fn apply_at(&mut self, update: FieldUpdate, at: NaiveDateTime) -> Result<(), ValidationError> {
        match update {
            FieldUpdate::Title(title) => {
                if title.trim().is_empty() {
                    return Err(ValidationError::EmptyTitle);
                }
                self.metadata.title = title;
            }
            FieldUpdate::Tags(tags) => self.metadata.tags = tags,
            FieldUpdate::Categories(categories) => self.metadata.categories = categories,
            FieldUpdate::UserId(user_id) => self.metadata.user_id = user_id,
            FieldUpdate::Content(content) => self.content = content,
        }
        self.touch(at);
        Ok(())
    }

    /// Replaces the title and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] for an empty title.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        self.apply(FieldUpdate::Title(title.into()))
    }

    /// Replaces the tags and refreshes `updated_at`.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.metadata.tags = tags;
        self.touch(now());
    }

    /// Replaces the categories and refreshes `updated_at`.
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.metadata.categories = categories;
        self.touch(now());
    }

    /// Replaces the owner and refreshes `updated_at`.
    pub fn set_user_id(&mut self, user_id: i64) {
        self.metadata.user_id = user_id;
        self.touch(now());
    }

    /// Replaces the prompt body and refreshes `updated_at`.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch(now());
    }

    /// Sets `updated_at` verbatim, without refreshing it.
    pub fn set_updated_at(&mut self, at: NaiveDateTime) {
        self.updated_at = at;
    }

    /// Validated descriptive fields.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Prompt title, never empty.
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Tags in source order.
    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }

    /// Categories in source order.
    pub fn categories(&self) -> &[String] {
        &self.metadata.categories
    }

    /// Owner identifier.
    pub fn user_id(&self) -> i64 {
        self.metadata.user_id
    }

    /// Prompt body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Construction time; never changes.
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Time of the last field change.
    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    fn touch(&mut self, at: NaiveDateTime) {
        self.updated_at = at.max(self.updated_at);
    }
}

/// Formats a timestamp the way records store it.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&at.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use serde_json::json;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata = Metadata::from_map(map(json!({"title": "Greeting"})), 7).unwrap();
        assert_eq!(metadata.title, "Greeting");
        assert!(metadata.tags.is_empty());
        assert!(metadata.categories.is_empty());
        assert_eq!(metadata.user_id, 7);
    }

    #[test]
    fn test_metadata_explicit_owner_wins() {
        let metadata =
            Metadata::from_map(map(json!({"title": "Greeting", "user_id": 42})), 7).unwrap();
        assert_eq!(metadata.user_id, 42);
    }

    #[test]
    fn test_metadata_missing_title() {
        let err = Metadata::from_map(map(json!({"tags": ["a"]})), 1).unwrap_err();
        assert!(matches!(err, ValidationError::MissingTitle));

        let err = Metadata::from_map(map(json!({"title": null})), 1).unwrap_err();
        assert!(matches!(err, ValidationError::MissingTitle));
    }

    #[test]
    fn test_metadata_empty_title() {
        let err = Metadata::from_map(map(json!({"title": "  "})), 1).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyTitle));
        assert!(Metadata::new("", 1).is_err());
    }

    #[test]
    fn test_metadata_wrong_shapes() {
        let cases = [
            json!({"title": "t", "tags": "not-a-list"}),
            json!({"title": "t", "categories": [1, 2]}),
            json!({"title": "t", "user_id": "one"}),
            json!({"title": 5}),
        ];
        for case in cases {
            let err = Metadata::from_map(map(case.clone()), 1).unwrap_err();
            assert!(
                matches!(err, ValidationError::Malformed(_)),
                "expected malformed for {case}"
            );
        }
    }

    #[test]
    fn test_metadata_not_an_object() {
        let err = Metadata::from_value(json!(["title"]), 1).unwrap_err();
        assert!(matches!(err, ValidationError::NotAnObject));
    }

    #[test]
    fn test_record_serialized_shape() {
        let metadata = Metadata {
            title: "Greeting".to_string(),
            tags: vec!["hello".to_string()],
            categories: vec!["misc".to_string()],
            user_id: 3,
        };
        let record = PromptRecord::new_at(metadata, "Say hi", at(3, 4, 5)).unwrap();

        let value: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Greeting",
                "tags": ["hello"],
                "categories": ["misc"],
                "user_id": 3,
                "content": "Say hi",
                "created_at": "2024-01-02 03:04:05",
                "updated_at": "2024-01-02 03:04:05",
            })
        );

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "title",
                "tags",
                "categories",
                "user_id",
                "content",
                "created_at",
                "updated_at"
            ]
        );
    }

    #[test]
    fn test_record_round_trip() {
        let metadata = Metadata {
            title: "Round".to_string(),
            tags: vec!["b".to_string(), "a".to_string()],
            categories: vec!["z".to_string()],
            user_id: -4,
        };
        let mut record = PromptRecord::new_at(metadata.clone(), "body", at(1, 0, 0)).unwrap();
        record
            .apply_at(FieldUpdate::Content("new body".to_string()), at(2, 0, 0))
            .unwrap();

        let restored = PromptRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(restored.metadata(), &metadata);
        assert_eq!(restored.content(), "new body");
        assert_eq!(restored.created_at(), at(1, 0, 0));
        assert_eq!(restored.updated_at(), at(2, 0, 0));
    }

    #[test]
    fn test_from_json_rejects_empty_title() {
        let json = r#"{"title":"","tags":[],"categories":[],"user_id":1,"content":"c",
            "created_at":"2024-01-02 00:00:00","updated_at":"2024-01-02 00:00:00"}"#;
        assert!(PromptRecord::from_json(json).is_err());
    }

    #[test]
    fn test_every_update_touches_updated_at() {
        let metadata = Metadata::new("Start", 1).unwrap();
        let mut record = PromptRecord::new_at(metadata, "body", at(0, 0, 0)).unwrap();

        let updates = vec![
            FieldUpdate::Title("Renamed".to_string()),
            FieldUpdate::Tags(vec!["t".to_string()]),
            FieldUpdate::Categories(vec!["c".to_string()]),
            FieldUpdate::UserId(9),
            FieldUpdate::Content("other".to_string()),
        ];
        for (i, update) in updates.into_iter().enumerate() {
            let when = at(0, 0, 0) + Duration::seconds(i as i64 + 1);
            record.apply_at(update, when).unwrap();
            assert_eq!(record.updated_at(), when);
            assert_eq!(record.created_at(), at(0, 0, 0));
        }
        assert_eq!(record.title(), "Renamed");
        assert_eq!(record.tags(), ["t"]);
        assert_eq!(record.categories(), ["c"]);
        assert_eq!(record.user_id(), 9);
        assert_eq!(record.content(), "other");
    }

    #[test]
    fn test_updated_at_never_moves_backwards() {
        let metadata = Metadata::new("Start", 1).unwrap();
        let mut record = PromptRecord::new_at(metadata, "body", at(5, 0, 0)).unwrap();

        record
            .apply_at(FieldUpdate::Content("x".to_string()), at(4, 0, 0))
            .unwrap();
        assert_eq!(record.updated_at(), at(5, 0, 0));
    }

    #[test]
    fn test_setters_use_wall_clock() {
        let metadata = Metadata::new("Start", 1).unwrap();
        let mut record = PromptRecord::new_at(metadata, "body", at(0, 0, 0)).unwrap();

        record.set_content("fresh");
        assert!(record.updated_at() > at(0, 0, 0));
        assert!(record.updated_at() >= record.created_at());
    }

    #[test]
    fn test_infallible_setters_touch_updated_at() {
        let metadata = Metadata::new("Start", 1).unwrap();
        let mut record = PromptRecord::new_at(metadata, "body", at(0, 0, 0)).unwrap();

        record.set_tags(vec!["a".to_string()]);
        let after_tags = record.updated_at();
        assert!(after_tags > at(0, 0, 0));

        record.set_categories(vec!["b".to_string()]);
        assert!(record.updated_at() >= after_tags);
        record.set_user_id(3);
        record.set_content("changed");

        assert_eq!(record.tags(), ["a"]);
        assert_eq!(record.categories(), ["b"]);
        assert_eq!(record.user_id(), 3);
        assert_eq!(record.content(), "changed");
        assert_eq!(record.created_at(), at(0, 0, 0));
        assert!(record.updated_at() >= after_tags);
    }

    #[test]
    fn test_empty_title_update_is_rejected() {
        let metadata = Metadata::new("Start", 1).unwrap();
        let mut record = PromptRecord::new_at(metadata, "body", at(0, 0, 0)).unwrap();

        assert!(record.set_title("").is_err());
        assert_eq!(record.title(), "Start");
        assert_eq!(record.updated_at(), at(0, 0, 0));
    }

    #[test]
    fn test_set_updated_at_is_verbatim() {
        let metadata = Metadata::new("Start", 1).unwrap();
        let mut record = PromptRecord::new_at(metadata, "body", at(1, 0, 0)).unwrap();

        record.set_updated_at(at(8, 30, 0));
        assert_eq!(record.updated_at(), at(8, 30, 0));
        assert_eq!(format_timestamp(&record.updated_at()), "2024-01-02 08:30:00");
    }
}
