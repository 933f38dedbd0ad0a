//! Engagement counter that warms up the assistant's greeting over time.

use super::{keys, load_or_default, save, KvStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RelationshipLevel {
    Stranger = 1,
    Acquaintance = 2,
    Friend = 3,
    BestFriend = 4,
    Jarvis = 5,
}

impl RelationshipLevel {
    /// Level reached after `count` interactions.
    pub fn from_count(count: u64) -> Self {
        match count {
            50.. => Self::Jarvis,
            20.. => Self::BestFriend,
            10.. => Self::Friend,
            3.. => Self::Acquaintance,
            _ => Self::Stranger,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Stranger => "Stranger",
            Self::Acquaintance => "Acquaintance",
            Self::Friend => "Friend",
            Self::BestFriend => "Best Friend",
            Self::Jarvis => "JARVIS Mode",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Stranger => "\u{1f44b}",
            Self::Acquaintance => "\u{1f91d}",
            Self::Friend => "\u{1f60a}",
            Self::BestFriend => "\u{1f525}",
            Self::Jarvis => "\u{1f916}",
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            Self::Stranger => "Hello! Main JARVIS hoon. Kya karna hai?",
            Self::Acquaintance => "Wapas aaye! Kya karna hai aaj?",
            Self::Friend => "Aye! Kya scene hai aaj?",
            Self::BestFriend => "AAYO! Aaj kya banaoge?",
            Self::Jarvis => "...",
        }
    }
}

impl From<RelationshipLevel> for u8 {
    fn from(level: RelationshipLevel) -> Self {
        level.number()
    }
}

impl TryFrom<u8> for RelationshipLevel {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Stranger),
            2 => Ok(Self::Acquaintance),
            3 => Ok(Self::Friend),
            4 => Ok(Self::BestFriend),
            5 => Ok(Self::Jarvis),
            other => Err(format!("relationship level out of range: {other}")),
        }
    }
}

/// Missing fields read as [`Relationship::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Relationship {
    pub total_interactions: u64,
    pub level: RelationshipLevel,
    pub first_met: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Default for Relationship {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            total_interactions: 0,
            level: RelationshipLevel::Stranger,
            first_met: now,
            last_seen: now,
        }
    }
}

/// Result of [`RelationshipRepository::record_interaction`].
#[derive(Debug, Clone)]
pub struct Interaction {
    pub data: Relationship,
    pub leveled_up: bool,
}

#[derive(Clone)]
pub struct RelationshipRepository {
    store: Arc<dyn KvStore>,
}

impl RelationshipRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Relationship {
        load_or_default(self.store.as_ref(), keys::RELATIONSHIP)
    }

    pub fn record_interaction(&self) -> Interaction {
        let mut data = self.get();
        let old_level = data.level;
        data.total_interactions = data.total_interactions.saturating_add(1);
        data.last_seen = Utc::now();
        data.level = RelationshipLevel::from_count(data.total_interactions);
        save(self.store.as_ref(), keys::RELATIONSHIP, &data);
        Interaction {
            leveled_up: data.level > old_level,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;

    #[test]
    fn level_thresholds() {
        assert_eq!(RelationshipLevel::from_count(0), RelationshipLevel::Stranger);
        assert_eq!(RelationshipLevel::from_count(2), RelationshipLevel::Stranger);
        assert_eq!(RelationshipLevel::from_count(3), RelationshipLevel::Acquaintance);
        assert_eq!(RelationshipLevel::from_count(10), RelationshipLevel::Friend);
        assert_eq!(RelationshipLevel::from_count(20), RelationshipLevel::BestFriend);
        assert_eq!(RelationshipLevel::from_count(50), RelationshipLevel::Jarvis);
        assert_eq!(RelationshipLevel::from_count(u64::MAX), RelationshipLevel::Jarvis);
    }

    #[test]
    fn record_interaction_reports_level_up() {
        let repo = RelationshipRepository::new(Arc::new(MemoryKvStore::new()));
        assert!(!repo.record_interaction().leveled_up);
        assert!(!repo.record_interaction().leveled_up);
        let third = repo.record_interaction();
        assert!(third.leveled_up);
        assert_eq!(third.data.level, RelationshipLevel::Acquaintance);
        assert_eq!(repo.get().level.greeting(), "Wapas aaye! Kya karna hai aaj?");
    }

    #[test]
    fn level_serializes_as_number() {
        let json = serde_json::to_value(Relationship::default()).unwrap();
        assert_eq!(json["level"], 1);
    }

    #[test]
    fn out_of_range_level_reads_default() {
        let store = Arc::new(MemoryKvStore::new());
        store
            .set(
                keys::RELATIONSHIP,
                r#"{"totalInteractions":4,"level":9,"firstMet":"2024-01-01T00:00:00Z","lastSeen":"2024-01-01T00:00:00Z"}"#,
            )
            .unwrap();
        let repo = RelationshipRepository::new(store);
        assert_eq!(repo.get().total_interactions, 0);
    }

    #[test]
    fn partial_record_keeps_stored_fields() {
        let store = Arc::new(MemoryKvStore::new());
        store
            .set(keys::RELATIONSHIP, r#"{"totalInteractions":4,"level":2}"#)
            .unwrap();
        let repo = RelationshipRepository::new(store);
        let data = repo.get();
        assert_eq!(data.total_interactions, 4);
        assert_eq!(data.level, RelationshipLevel::Acquaintance);

        assert_eq!(repo.record_interaction().data.total_interactions, 5);
    }
}
