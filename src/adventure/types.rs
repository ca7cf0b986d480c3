use serde::{Deserialize, Serialize};
use std::fmt;

/// Map cell value for an inaccessible / off-map square.
pub const NOWHERE: i32 = -1;

/// Item target value meaning "cannot be used anywhere".
pub const NO_TARGET: i32 = -1;

/// Location number whose record carries the time-dependent alternate states.
pub const SEQUENTIAL_BASE: i32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Parse a direction word or its first letter, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "s" | "south" => Some(Direction::South),
            "e" | "east" => Some(Direction::East),
            "w" | "west" => Some(Direction::West),
            _ => None,
        }
    }

    /// Grid offset `(dx, dy)`; north is up (row - 1).
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        };
        f.write_str(name)
    }
}

/// Ordered alternate states of a sequential location.
///
/// `cursor` is `None` before the first visit and advances by one on every
/// visit. While it points inside `states` the referenced location is the
/// active one; before or past the list the base location is active.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateSequence {
    pub states: Vec<i32>,
    #[serde(default)]
    pub cursor: Option<usize>,
}

impl StateSequence {
    pub fn advance(&mut self) {
        self.cursor = Some(self.cursor.map_or(0, |c| c.saturating_add(1)));
    }

    pub fn active(&self) -> Option<i32> {
        self.cursor.and_then(|c| self.states.get(c).copied())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub number: i32,
    pub name: String,
    /// Points awarded on the first visit.
    pub points: i32,
    pub brief_description: String,
    pub long_description: String,
    /// Position on the world map, filled in while the world is built.
    #[serde(default)]
    pub position: Option<(usize, usize)>,
    #[serde(default)]
    visits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<StateSequence>,
}

impl Location {
    pub fn new(number: i32, name: &str, points: i32, brief: &str, long: &str) -> Self {
        Location {
            number,
            name: name.to_string(),
            points,
            brief_description: brief.to_string(),
            long_description: long.to_string(),
            position: None,
            visits: 0,
            sequence: None,
        }
    }

    /// Builder helper turning this location into a sequential one.
    pub fn sequential(mut self) -> Self {
        self.sequence = Some(StateSequence::default());
        self
    }

    pub fn is_sequential(&self) -> bool {
        self.sequence.is_some()
    }

    /// Append an alternate state (only meaningful on sequential locations).
    pub fn push_state(&mut self, number: i32) {
        if let Some(seq) = self.sequence.as_mut() {
            seq.states.push(number);
        }
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn register_visit(&mut self) {
        self.visits = self.visits.saturating_add(1);
        if let Some(seq) = self.sequence.as_mut() {
            seq.advance();
        }
    }

    /// Number of the currently active state, or `None` when the base is active.
    pub fn active_state(&self) -> Option<i32> {
        self.sequence.as_ref().and_then(StateSequence::active)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sequential() {
            f.write_str("Sequential")?;
        }
        write!(
            f,
            "Location({}, {}, {}, {})",
            self.number, self.name, self.points, self.brief_description
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    /// Location where the item can be picked up.
    pub start: i32,
    /// Location where the item can be used, or [`NO_TARGET`].
    pub target: i32,
    /// Score change applied on pickup.
    pub points: i32,
}

impl Item {
    pub fn new(name: &str, start: i32, target: i32, points: i32) -> Self {
        Item {
            name: name.to_string(),
            start,
            target,
            points,
        }
    }

    pub fn has_target(&self) -> bool {
        self.target != NO_TARGET
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parse_accepts_letters_and_words() {
        assert_eq!(Direction::parse("N"), Some(Direction::North));
        assert_eq!(Direction::parse("west"), Some(Direction::West));
        assert_eq!(Direction::parse(" East "), Some(Direction::East));
        assert_eq!(Direction::parse("up"), None);
    }

    #[test]
    fn sequential_cursor_walks_states_then_falls_back() {
        let mut loc = Location::new(100, "Hall", 0, "b", "l").sequential();
        loc.push_state(101);
        loc.push_state(102);
        assert_eq!(loc.active_state(), None);
        loc.register_visit();
        assert_eq!(loc.active_state(), Some(101));
        loc.register_visit();
        assert_eq!(loc.active_state(), Some(102));
        loc.register_visit();
        assert_eq!(loc.active_state(), None);
        assert_eq!(loc.visits(), 3);
    }

    #[test]
    fn plain_location_ignores_push_state() {
        let mut loc = Location::new(3, "Lost and Found", 10, "Short", "Long");
        loc.push_state(101);
        loc.register_visit();
        assert_eq!(loc.active_state(), None);
        assert_eq!(loc.to_string(), "Location(3, Lost and Found, 10, Short)");
    }
}
