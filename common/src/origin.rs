use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginId(Uuid);

impl OriginId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OriginId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OriginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOrigin {
    pub id: OriginId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<OriginId>,
}

impl EventOrigin {
    pub fn root(id: OriginId) -> Self {
        Self {
            id,
            parent_id: None,
        }
    }

    pub fn descends_from(&self, origin: OriginId) -> bool {
        self.id == origin || self.parent_id == Some(origin)
    }
}

/// Origin of the last command of any kind, and the last target value sent.
/// A new command overwrites the origin; only target commands set the value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IssuedTarget {
    origin: Option<OriginId>,
    value: Option<f32>,
}

impl IssuedTarget {
    pub fn record_command(&mut self, origin: OriginId) {
        self.origin = Some(origin);
    }

    pub fn record_target(&mut self, origin: OriginId, value: f32) {
        self.origin = Some(origin);
        self.value = Some(value);
    }

    pub fn origin(&self) -> Option<OriginId> {
        self.origin
    }

    pub fn value(&self) -> Option<f32> {
        self.value
    }

    pub fn correlates(&self, origin: Option<&EventOrigin>) -> bool {
        match (self.origin, origin) {
            (Some(issued), Some(event)) => event.descends_from(issued),
            _ => false,
        }
    }

    pub fn is_issued_value(&self, value: f32) -> bool {
        self.value
            .map(|issued| (issued - value).abs() <= f32::EPSILON)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_origin_correlates_with_parent() {
        let issued = OriginId::new();
        let child = EventOrigin {
            id: OriginId::new(),
            parent_id: Some(issued),
        };

        let mut last = IssuedTarget::default();
        last.record_target(issued, 19.0);

        assert!(last.correlates(Some(&child)));
        assert!(last.correlates(Some(&EventOrigin::root(issued))));
        assert!(!last.correlates(Some(&EventOrigin::root(OriginId::new()))));
        assert!(!last.correlates(None));
    }

    #[test]
    fn new_command_overwrites_previous_origin() {
        let first = OriginId::new();
        let second = OriginId::new();
        let mut last = IssuedTarget::default();
        last.record_target(first, 19.0);
        last.record_target(second, 17.0);

        assert!(!last.correlates(Some(&EventOrigin::root(first))));
        assert_eq!(last.value(), Some(17.0));
        assert!(!last.is_issued_value(19.0));
    }

    #[test]
    fn mode_command_takes_over_origin_but_keeps_value() {
        let target = OriginId::new();
        let mode = OriginId::new();
        let mut last = IssuedTarget::default();
        last.record_target(target, 19.0);
        last.record_command(mode);

        assert_eq!(last.origin(), Some(mode));
        assert!(last.correlates(Some(&EventOrigin {
            id: OriginId::new(),
            parent_id: Some(mode),
        })));
        assert!(!last.correlates(Some(&EventOrigin::root(target))));
        assert!(last.is_issued_value(19.0));
    }
}
