use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single entry in the list.
///
/// `id` is the identity and never changes. `order` mirrors the rank the
/// store keeps for the item and `selected` mirrors the selection set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub label: String,
    pub value: Value,
    pub order: i64,
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
}

impl Item {
    /// Create an unselected item without metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: Value, order: i64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            order,
            selected: false,
            metadata: None,
        }
    }

    /// The seed item at 1-based position `n`: `item-n`, labelled `Item n`.
    #[must_use]
    pub fn seeded(n: usize) -> Self {
        Self::new(
            format!("item-{n}"),
            format!("Item {n}"),
            Value::from(n),
            rank_at(n.saturating_sub(1)),
        )
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: BTreeMap<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Rank for a 0-based position in the canonical sequence.
#[must_use]
pub fn rank_at(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}
