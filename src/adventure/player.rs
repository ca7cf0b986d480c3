use crate::adventure::types::Item;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub inventory: Vec<Item>,
    pub victory: bool,
    /// Pickup eligibility per item name. Items without an entry are eligible.
    pub special_item_conditions: HashMap<String, bool>,
    pub current_moves: u32,
    pub score: i32,
}

impl Player {
    /// Create a player at `(x, y)`. Special items start ineligible, food starts eligible.
    pub fn new(x: usize, y: usize, special_items: &[String], food: &[String]) -> Self {
        let mut special_item_conditions = HashMap::new();
        for name in special_items {
            special_item_conditions.insert(name.clone(), false);
        }
        for name in food {
            special_item_conditions.insert(name.clone(), true);
        }
        Player {
            x,
            y,
            inventory: Vec::new(),
            victory: false,
            special_item_conditions,
            current_moves: 0,
            score: 0,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Whether the named item may be picked up at all (location rules aside).
    pub fn is_eligible(&self, name: &str) -> bool {
        self.special_item_conditions
            .get(name)
            .copied()
            .unwrap_or(true)
    }

    /// Make a special item eligible for pickup.
    pub fn grant_special(&mut self, name: &str) {
        self.special_item_conditions.insert(name.to_string(), true);
    }

    pub fn holds(&self, name: &str) -> bool {
        self.inventory.iter().any(|i| i.matches(name))
    }

    /// Remove the named item from the inventory, returning it.
    pub fn take_from_inventory(&mut self, name: &str) -> Option<Item> {
        let idx = self.inventory.iter().position(|i| i.matches(name))?;
        Some(self.inventory.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn eligibility_defaults() {
        let mut p = Player::new(0, 0, &names(&["T-card"]), &names(&["Greek salad"]));
        assert!(!p.is_eligible("T-card"));
        assert!(p.is_eligible("Greek salad"));
        assert!(p.is_eligible("Anything else"));
        p.grant_special("T-card");
        assert!(p.is_eligible("T-card"));
    }

    #[test]
    fn inventory_lookup_is_case_insensitive() {
        let mut p = Player::new(0, 0, &[], &[]);
        p.inventory.push(Item::new("Lucky Pen", 2, 5, 3));
        assert!(p.holds("lucky pen"));
        assert_eq!(p.take_from_inventory("LUCKY PEN").map(|i| i.start), Some(2));
        assert!(p.inventory.is_empty());
    }
}
