//! Domain event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable event type vocabulary. The string forms are a wire contract.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
pub enum EventKind {
    #[strum(serialize = "game.started")]
    GameStarted,
    #[strum(serialize = "game.ended")]
    GameEnded,
    #[strum(serialize = "score.changed")]
    ScoreChanged,
    #[strum(serialize = "player.health.changed")]
    PlayerHealthChanged,
    #[strum(serialize = "player.damaged")]
    PlayerDamaged,
    #[strum(serialize = "player.moved")]
    PlayerMoved,
    #[strum(serialize = "game.save.created")]
    SaveCreated,
    #[strum(serialize = "game.save.loaded")]
    SaveLoaded,
    #[strum(serialize = "game.save.deleted")]
    SaveDeleted,
    #[strum(serialize = "game.state.manager.updated")]
    StateManagerUpdated,
    #[strum(serialize = "game.autosave.enabled")]
    AutoSaveEnabled,
    #[strum(serialize = "game.autosave.disabled")]
    AutoSaveDisabled,
    #[strum(serialize = "game.autosave.completed")]
    AutoSaveCompleted,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("invalid event type {0:?}: expected a non-empty dot-namespaced name")]
    InvalidType(String),
}

/// Immutable event record.
///
/// Field names follow the CloudEvents envelope (`type`, `source`, `specversion`
/// style) so persisted audit data stays readable by external tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    #[serde(rename = "type")]
    event_type: String,
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    timestamp: DateTime<Utc>,
    id: String,
    spec_version: String,
    data_content_type: String,
}

impl DomainEvent {
    pub const SPEC_VERSION: &'static str = "1.0";
    pub const DATA_CONTENT_TYPE: &'static str = "application/json";

    /// Builds an event of a well-known kind with a fresh random id.
    pub fn new(kind: EventKind, source: impl Into<String>) -> Self {
        Self::with_type(kind.as_str().to_owned(), source.into())
    }

    /// Builds an event with a caller-chosen type, validating that it is a
    /// dot-namespaced name such as `"quest.completed"`.
    pub fn custom(event_type: impl Into<String>, source: impl Into<String>) -> Result<Self, EventError> {
        let event_type = event_type.into();
        if !is_namespaced(&event_type) {
            return Err(EventError::InvalidType(event_type));
        }
        Ok(Self::with_type(event_type, source.into()))
    }

    fn with_type(event_type: String, source: String) -> Self {
        Self {
            event_type,
            source,
            data: None,
            timestamp: Utc::now(),
            id: Uuid::new_v4().to_string(),
            spec_version: Self::SPEC_VERSION.to_owned(),
            data_content_type: Self::DATA_CONTENT_TYPE.to_owned(),
        }
    }

    /// Attaches a payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Replaces the generated id with a caller-supplied one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Well-known kind of this event, if its type is part of the vocabulary.
    pub fn kind(&self) -> Option<EventKind> {
        self.event_type.parse().ok()
    }

    pub fn is(&self, kind: EventKind) -> bool {
        self.event_type == kind.as_str()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn data_content_type(&self) -> &str {
        &self.data_content_type
    }
}

fn is_namespaced(event_type: &str) -> bool {
    event_type.contains('.')
        && event_type.split('.').all(|segment| {
            !segment.is_empty() && !segment.chars().any(char::is_whitespace)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_vocabulary_is_namespaced_and_parses_back() {
        for kind in EventKind::iter() {
            assert!(is_namespaced(kind.as_str()), "{kind} is not namespaced");
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
        assert_eq!(EventKind::SaveCreated.as_str(), "game.save.created");
        assert_eq!(
            EventKind::StateManagerUpdated.to_string(),
            "game.state.manager.updated"
        );
    }

    #[test]
    fn test_new_event_defaults() {
        let event = DomainEvent::new(EventKind::PlayerMoved, "test");

        assert_eq!(event.event_type(), "player.moved");
        assert_eq!(event.kind(), Some(EventKind::PlayerMoved));
        assert_eq!(event.spec_version(), "1.0");
        assert_eq!(event.data_content_type(), "application/json");
        assert!(event.data().is_none());
        assert!(!event.id().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = DomainEvent::new(EventKind::GameStarted, "test");
        let b = DomainEvent::new(EventKind::GameStarted, "test");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_custom_type_validation() {
        assert!(DomainEvent::custom("quest.completed", "test").is_ok());
        assert!(DomainEvent::custom("quest.completed", "test").unwrap().kind().is_none());

        for bad in ["", "quest", "quest.", ".quest", "quest..done", "quest. done"] {
            assert_eq!(
                DomainEvent::custom(bad, "test").unwrap_err(),
                EventError::InvalidType(bad.to_owned())
            );
        }
    }

    #[test]
    fn test_envelope_field_names() {
        let event = DomainEvent::new(EventKind::SaveLoaded, "test")
            .with_id("evt-1")
            .with_data(serde_json::json!({ "id": "save-1" }));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "game.save.loaded");
        assert_eq!(value["id"], "evt-1");
        assert_eq!(value["specVersion"], "1.0");
        assert_eq!(value["dataContentType"], "application/json");
        assert_eq!(value["data"]["id"], "save-1");

        let parsed: DomainEvent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, event);
    }
}
