//! Actor state consumed by action preparation and mutated by outcomes.

use super::{EntityId, Position};

/// Integer resource meter (e.g., health, action points) tracked per actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Removes `amount`, clamping at zero. Returns the amount actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds `amount`, clamping at the maximum. Returns the amount actually added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.maximum.saturating_sub(self.current));
        self.current += added;
        added
    }
}

/// An entity that can perform actions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    pub position: Position,
    pub hp: ResourceMeter,
    /// Action points spent by queued actions; restored at the start of each turn.
    pub action_points: ResourceMeter,
    /// Names of carried items. Duplicates represent stacked copies.
    pub inventory: Vec<String>,
}

impl ActorState {
    pub fn new(id: EntityId, position: Position, hp: u32, action_points: u32) -> Self {
        Self {
            id,
            position,
            hp: ResourceMeter::full(hp),
            action_points: ResourceMeter::full(action_points),
            inventory: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.inventory.push(item.into());
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|carried| carried == item)
    }

    /// Removes one copy of `item`. Returns false if none was carried.
    pub fn take_item(&mut self, item: &str) -> bool {
        match self.inventory.iter().position(|carried| carried == item) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deducts `cost` action points, or leaves the meter untouched if the actor
    /// cannot afford it.
    pub fn spend_action_points(&mut self, cost: u32) -> bool {
        if self.action_points.current < cost {
            return false;
        }
        self.action_points.current -= cost;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_refuses_when_short() {
        let mut actor = ActorState::new(EntityId(1), Position::ORIGIN, 10, 3);
        assert!(actor.spend_action_points(2));
        assert!(!actor.spend_action_points(2));
        assert_eq!(actor.action_points.current, 1);
    }

    #[test]
    fn take_item_removes_one_copy() {
        let mut actor = ActorState::new(EntityId(1), Position::ORIGIN, 10, 3)
            .with_item("potion")
            .with_item("potion");
        assert!(actor.take_item("potion"));
        assert!(actor.has_item("potion"));
        assert!(actor.take_item("potion"));
        assert!(!actor.take_item("potion"));
    }

    #[test]
    fn meter_clamps() {
        let mut hp = ResourceMeter::new(3, 10);
        assert_eq!(hp.drain(5), 3);
        assert!(hp.is_empty());
        assert_eq!(hp.restore(15), 10);
        assert_eq!(hp.current, 10);
    }
}
