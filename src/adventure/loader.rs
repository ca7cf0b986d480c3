//! Line-oriented text loaders for the adventure world data.
//!
//! Three formats are supported:
//!
//! ```text
//! map.txt          locations.txt        items.txt
//! 1 2 5            LOCATION 3           3 103 5 Friend's Textbook
//! 3 -1 4           Lost and Found       4 6 -1 Some Sort Of Food
//!                  10
//!                  Short description
//!                  Long line 1
//!                  Long line 2
//!                  END
//! ```
//!
//! Location `100` is the sequential base; every location numbered above it is
//! attached to the base as an alternate state, in file order.

use crate::adventure::errors::AdventureError;
use crate::adventure::types::{Item, Location, SEQUENTIAL_BASE};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn malformed(kind: &'static str, line: usize, reason: impl Into<String>) -> AdventureError {
    AdventureError::Malformed {
        kind,
        line,
        reason: reason.into(),
    }
}

/// Parse a space-separated integer grid. Blank lines are skipped.
pub fn parse_map(text: &str) -> Result<Vec<Vec<i32>>, AdventureError> {
    let mut grid = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i32>()
                    .map_err(|_| malformed("map", idx + 1, format!("not an integer: {tok}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        grid.push(row);
    }
    validate_grid(&grid)?;
    Ok(grid)
}

/// Check the grid is non-empty and rectangular.
pub fn validate_grid(grid: &[Vec<i32>]) -> Result<(), AdventureError> {
    let width = match grid.first() {
        Some(row) if !row.is_empty() => row.len(),
        Some(_) => return Err(AdventureError::InvalidGrid("first row is empty".into())),
        None => return Err(AdventureError::InvalidGrid("map has no rows".into())),
    };
    if let Some((y, row)) = grid.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(AdventureError::InvalidGrid(format!(
            "row {} has {} cells, expected {}",
            y + 1,
            row.len(),
            width
        )));
    }
    Ok(())
}

/// Parse `LOCATION n ... END` blocks into a table keyed by location number.
pub fn parse_locations(text: &str) -> Result<HashMap<i32, Location>, AdventureError> {
    let mut locations: HashMap<i32, Location> = HashMap::new();
    let mut variants: Vec<(usize, i32)> = Vec::new();
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r')).enumerate();

    while let Some((idx, line)) = lines.next() {
        let header = line.trim();
        if header.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let number = header
            .strip_prefix("LOCATION")
            .map(str::trim)
            .ok_or_else(|| malformed("location", line_no, "expected LOCATION header"))?
            .parse::<i32>()
            .map_err(|_| malformed("location", line_no, "location number is not an integer"))?;

        let mut field = |what: &str| {
            lines
                .next()
                .map(|(_, l)| l.to_string())
                .ok_or_else(|| malformed("location", line_no, format!("missing {what}")))
        };
        let name = field("name")?;
        let points_raw = field("points")?;
        let points = points_raw
            .trim()
            .parse::<i32>()
            .map_err(|_| malformed("location", line_no, format!("bad points: {points_raw}")))?;
        let brief = field("brief description")?;

        let mut long = Vec::new();
        let mut closed = false;
        for (_, body) in lines.by_ref() {
            if body.trim() == "END" {
                closed = true;
                break;
            }
            long.push(body);
        }
        if !closed {
            return Err(malformed("location", line_no, "block is missing END"));
        }

        let mut location = Location::new(number, &name, points, &brief, &long.join("\n"));
        if number == SEQUENTIAL_BASE {
            location = location.sequential();
        } else if number > SEQUENTIAL_BASE {
            variants.push((line_no, number));
        }
        if locations.insert(number, location).is_some() {
            return Err(malformed("location", line_no, format!("duplicate location {number}")));
        }
    }

    if !variants.is_empty() {
        let base = locations
            .get_mut(&SEQUENTIAL_BASE)
            .ok_or(AdventureError::UnknownLocation(SEQUENTIAL_BASE))?;
        for (_, number) in variants {
            base.push_state(number);
        }
    }
    Ok(locations)
}

/// Parse `start target points name...` item records, one per line.
pub fn parse_items(text: &str) -> Result<Vec<Item>, AdventureError> {
    let mut items = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let mut number = |what: &str| -> Result<i32, AdventureError> {
            let tok = parts
                .next()
                .ok_or_else(|| malformed("item", idx + 1, format!("missing {what}")))?;
            tok.parse::<i32>()
                .map_err(|_| malformed("item", idx + 1, format!("bad {what}: {tok}")))
        };
        let start = number("start")?;
        let target = number("target")?;
        let points = number("points")?;
        let name = parts.collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Err(malformed("item", idx + 1, "missing name"));
        }
        items.push(Item::new(&name, start, target, points));
    }
    Ok(items)
}

pub fn load_map_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<i32>>, AdventureError> {
    parse_map(&fs::read_to_string(path.as_ref())?)
}

pub fn load_locations_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<i32, Location>, AdventureError> {
    parse_locations(&fs::read_to_string(path.as_ref())?)
}

pub fn load_items_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Item>, AdventureError> {
    parse_items(&fs::read_to_string(path.as_ref())?)
}
