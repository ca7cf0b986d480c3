use crate::adventure::errors::AdventureError;
use crate::adventure::loader;
use crate::adventure::player::Player;
use crate::adventure::types::{Item, Location, NOWHERE, NO_TARGET};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Location id the player starts on.
pub const DEFAULT_ORIGIN: i32 = 1;

/// World-level rules that are not part of the data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldRules {
    pub origin: i32,
    /// Items whose pickup is gated by a player flag rather than by location.
    pub special_items: Vec<String>,
}

impl Default for WorldRules {
    fn default() -> Self {
        WorldRules {
            origin: DEFAULT_ORIGIN,
            special_items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct World {
    /// Row-major grid of location ids; `map[y][x]`.
    pub map: Vec<Vec<i32>>,
    pub locations: HashMap<i32, Location>,
    pub items: Vec<Item>,
    /// Visit counts parallel to `map`.
    pub visited: Vec<Vec<u32>>,
    pub origin_id: i32,
    #[serde(default)]
    pub special_items: Vec<String>,
    /// Names of items already used at their target.
    #[serde(default)]
    pub delivered: Vec<String>,
}

impl World {
    /// Build a world from parsed data and register the first visit at the origin.
    pub fn new(
        map: Vec<Vec<i32>>,
        mut locations: HashMap<i32, Location>,
        items: Vec<Item>,
        rules: &WorldRules,
    ) -> Result<Self, AdventureError> {
        loader::validate_grid(&map)?;
        for (y, row) in map.iter().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                match locations.get_mut(&id) {
                    Some(loc) => {
                        if loc.position.is_none() {
                            loc.position = Some((x, y));
                        }
                    }
                    None if id == NOWHERE => {}
                    None => return Err(AdventureError::UnknownLocation(id)),
                }
            }
        }
        for item in &items {
            for id in [item.start, item.target] {
                if id != NO_TARGET && !locations.contains_key(&id) {
                    return Err(AdventureError::UnknownLocation(id));
                }
            }
        }
        let visited = map.iter().map(|row| vec![0; row.len()]).collect();
        let mut world = World {
            map,
            locations,
            items,
            visited,
            origin_id: rules.origin,
            special_items: rules.special_items.clone(),
            delivered: Vec::new(),
        };
        let (ox, oy) = world.origin()?;
        world.register_visit(ox, oy);
        debug!(
            "world built: {}x{} grid, {} locations, {} items",
            world.width(),
            world.height(),
            world.locations.len(),
            world.items.len()
        );
        Ok(world)
    }

    /// Load the three data files and build the world.
    pub fn from_files<P: AsRef<Path>>(
        map_path: P,
        locations_path: P,
        items_path: P,
        rules: &WorldRules,
    ) -> Result<Self, AdventureError> {
        let map = loader::load_map_from_file(map_path)?;
        let locations = loader::load_locations_from_file(locations_path)?;
        let items = loader::load_items_from_file(items_path)?;
        World::new(map, locations, items, rules)
    }

    pub fn width(&self) -> usize {
        self.map.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.map.len()
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// Location id stored at `(x, y)`.
    pub fn cell(&self, x: usize, y: usize) -> Option<i32> {
        self.map.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn location(&self, number: i32) -> Option<&Location> {
        self.locations.get(&number)
    }

    /// Location record at `(x, y)`; `None` out of bounds or on an undefined cell.
    pub fn get_location(&self, x: usize, y: usize) -> Option<&Location> {
        self.cell(x, y).and_then(|id| self.locations.get(&id))
    }

    /// Like [`World::get_location`] but resolves sequential locations to their active state.
    pub fn active_location(&self, x: usize, y: usize) -> Option<&Location> {
        let base = self.get_location(x, y)?;
        match base.active_state() {
            Some(state) => self.locations.get(&state).or(Some(base)),
            None => Some(base),
        }
    }

    /// Coordinates `(x, y)` of the first origin cell in row-major order.
    pub fn origin(&self) -> Result<(usize, usize), AdventureError> {
        self.map
            .iter()
            .enumerate()
            .find_map(|(y, row)| row.iter().position(|&id| id == self.origin_id).map(|x| (x, y)))
            .ok_or(AdventureError::OriginNotFound(self.origin_id))
    }

    /// Record one visit at `(x, y)`. Returns the new cell count, or `None` out of bounds.
    pub fn register_visit(&mut self, x: usize, y: usize) -> Option<u32> {
        let id = self.cell(x, y)?;
        let count = &mut self.visited[y][x];
        *count = count.saturating_add(1);
        let count = *count;
        if let Some(loc) = self.locations.get_mut(&id) {
            loc.register_visit();
        }
        Some(count)
    }

    pub fn visit_count(&self, x: usize, y: usize) -> u32 {
        self.visited
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0)
    }

    /// True iff `(x, y)` was visited more than once. Sequential locations always report false.
    pub fn visited_again(&self, x: usize, y: usize) -> bool {
        match self.get_location(x, y) {
            Some(loc) if loc.is_sequential() => false,
            _ => self.visit_count(x, y) > 1,
        }
    }

    pub fn search_item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.matches(name))
    }

    pub fn is_special(&self, name: &str) -> bool {
        self.special_items.iter().any(|s| s == name)
    }

    /// Items the player may pick up at their current position.
    pub fn pickable_items(&self, player: &Player) -> Vec<&Item> {
        let here = self.cell(player.x, player.y);
        self.items
            .iter()
            .filter(|item| player.is_eligible(&item.name))
            .filter(|item| self.is_special(&item.name) || Some(item.start) == here)
            .collect()
    }

    /// Items that can be used at the player's current position.
    pub fn usable_items(&self, player: &Player) -> Vec<&Item> {
        let here = self.cell(player.x, player.y);
        self.items
            .iter()
            .filter(|item| item.has_target() && Some(item.target) == here)
            .collect()
    }

    pub fn is_delivered(&self, name: &str) -> bool {
        self.delivered.iter().any(|d| d.eq_ignore_ascii_case(name))
    }

    pub fn mark_delivered(&mut self, name: &str) {
        if !self.is_delivered(name) {
            self.delivered.push(name.to_string());
        }
    }

    /// True once every item with a target has been used there.
    pub fn all_delivered(&self) -> bool {
        self.items
            .iter()
            .filter(|i| i.has_target())
            .all(|i| self.is_delivered(&i.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::loader::{parse_items, parse_locations, parse_map};

    const LOCATIONS: &str = "LOCATION -1\nNowhere\n0\nnothing\nnothing at all\nEND\n\
        LOCATION 1\nGate\n0\nthe gate\nA tall gate.\nEND\n\
        LOCATION 2\nLibrary\n5\nthe library\nRows of books.\nEND\n\
        LOCATION 100\nClock Tower\n1\nthe tower\nA clock ticks.\nEND\n\
        LOCATION 101\nClock Tower (noon)\n4\nnoon bells\nBells ring.\nEND\n";

    fn world() -> World {
        let map = parse_map("1 2\n100 -1\n").unwrap();
        let locations = parse_locations(LOCATIONS).unwrap();
        let items = parse_items("2 100 3 Old Map\n1 -1 1 Greek salad\n100 2 7 T-card\n").unwrap();
        let rules = WorldRules {
            origin: 1,
            special_items: vec!["T-card".into()],
        };
        World::new(map, locations, items, &rules).unwrap()
    }

    #[test]
    fn construction_visits_origin_and_sets_positions() {
        let w = world();
        assert_eq!(w.origin().unwrap(), (0, 0));
        assert_eq!(w.visit_count(0, 0), 1);
        assert_eq!(w.location(1).unwrap().visits(), 1);
        assert_eq!(w.location(2).unwrap().position, Some((1, 0)));
        assert_eq!(w.location(101).unwrap().position, None);
    }

    #[test]
    fn unknown_cell_id_is_rejected() {
        let map = parse_map("1 7\n").unwrap();
        let locations = parse_locations(LOCATIONS).unwrap();
        let err = World::new(map, locations, vec![], &WorldRules::default()).unwrap_err();
        assert!(matches!(err, AdventureError::UnknownLocation(7)));
    }

    #[test]
    fn item_with_unknown_start_or_target_is_rejected() {
        let locations = parse_locations(LOCATIONS).unwrap();
        let items = parse_items("42 -1 3 Ghost\n").unwrap();
        let err = World::new(parse_map("1 2\n").unwrap(), locations, items, &WorldRules::default())
            .unwrap_err();
        assert!(matches!(err, AdventureError::UnknownLocation(42)));

        let locations = parse_locations(LOCATIONS).unwrap();
        let items = parse_items("2 77 3 Ghost\n").unwrap();
        let err = World::new(parse_map("1 2\n").unwrap(), locations, items, &WorldRules::default())
            .unwrap_err();
        assert!(matches!(err, AdventureError::UnknownLocation(77)));

        // Off-grid sequential states are valid ids.
        let locations = parse_locations(LOCATIONS).unwrap();
        let items = parse_items("101 -1 3 Bell Rope\n").unwrap();
        assert!(World::new(parse_map("1 2\n").unwrap(), locations, items, &WorldRules::default()).is_ok());
    }

    #[test]
    fn missing_origin_is_rejected() {
        let map = parse_map("2 2\n").unwrap();
        let locations = parse_locations(LOCATIONS).unwrap();
        let err = World::new(map, locations, vec![], &WorldRules::default()).unwrap_err();
        assert!(matches!(err, AdventureError::OriginNotFound(1)));
    }

    #[test]
    fn register_visit_bumps_grid_and_location_once() {
        let mut w = world();
        assert_eq!(w.register_visit(1, 0), Some(1));
        assert_eq!(w.visit_count(1, 0), 1);
        assert_eq!(w.location(2).unwrap().visits(), 1);
        assert!(!w.visited_again(1, 0));
        w.register_visit(1, 0);
        assert!(w.visited_again(1, 0));
        assert_eq!(w.register_visit(5, 5), None);
    }

    #[test]
    fn sequential_location_is_never_visited_again() {
        let mut w = world();
        w.register_visit(0, 1);
        assert_eq!(w.active_location(0, 1).unwrap().number, 101);
        w.register_visit(0, 1);
        assert!(!w.visited_again(0, 1));
        assert_eq!(w.active_location(0, 1).unwrap().number, 100);
    }

    #[test]
    fn get_location_handles_bounds_and_nowhere() {
        let w = world();
        assert!(w.get_location(9, 0).is_none());
        assert_eq!(w.get_location(1, 1).unwrap().number, -1);
    }

    #[test]
    fn pickable_items_respect_location_and_flags() {
        let w = world();
        let mut p = Player::new(0, 0, &w.special_items, &["Greek salad".to_string()]);
        let names: Vec<_> = w.pickable_items(&p).iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["Greek salad"]);

        p.x = 1;
        let names: Vec<_> = w.pickable_items(&p).iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["Old Map"]);

        p.grant_special("T-card");
        let names: Vec<_> = w.pickable_items(&p).iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["Old Map", "T-card"]);
        assert_eq!(w.usable_items(&p).len(), 1);
    }
}
