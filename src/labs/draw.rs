//! Group draw for a debate-style round.
//!
//! Teams are shuffled (three passes), numbered from 1, and alternately given
//! the affirmative (odd numbers) and negative (even numbers) side. Each
//! affirmative group `a` then meets groups `a - 1` and `a + 1`, so every team
//! plays one or two matches against neighbours of the opposite side.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

const SHUFFLE_PASSES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("roster is empty")]
    EmptyRoster,
    #[error("roster needs an even number of teams, got {0}")]
    OddTeamCount(usize),
    #[error("team '{0}' appears more than once")]
    DuplicateTeam(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Team {
    pub fn new(name: &str, members: &[&str]) -> Self {
        Team {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Affirmative,
    Negative,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Affirmative => "affirmative",
            Side::Negative => "negative",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawnGroup {
    pub number: usize,
    pub team: Team,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matchup {
    /// Group number on the affirmative side.
    pub affirmative: usize,
    /// Group number on the negative side.
    pub negative: usize,
    pub slot: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    pub groups: Vec<DrawnGroup>,
    pub matches: Vec<Matchup>,
}

impl Draw {
    pub fn group(&self, number: usize) -> Option<&DrawnGroup> {
        number.checked_sub(1).and_then(|i| self.groups.get(i))
    }

    /// Matches a group takes part in, on either side.
    pub fn matches_for(&self, number: usize) -> Vec<&Matchup> {
        self.matches
            .iter()
            .filter(|m| m.affirmative == number || m.negative == number)
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for g in &self.groups {
            out.push_str(&format!("Group {}: {} ({})\n", g.number, g.team.name, g.side));
            if !g.team.members.is_empty() {
                out.push_str(&format!("  Members: {}\n", g.team.members.join(", ")));
            }
        }
        out.push_str("\nMatches:\n");
        for m in &self.matches {
            let name = |n: usize| self.group(n).map_or("?", |g| g.team.name.as_str());
            out.push_str(&format!(
                "  Group {} ({}) vs Group {} ({})",
                m.affirmative,
                name(m.affirmative),
                m.negative,
                name(m.negative)
            ));
            if let Some(slot) = &m.slot {
                out.push_str(&format!(" @ {slot}"));
            }
            out.push('\n');
        }
        out
    }
}

fn validate_roster(teams: &[Team]) -> Result<(), DrawError> {
    if teams.is_empty() {
        return Err(DrawError::EmptyRoster);
    }
    if teams.len() % 2 != 0 {
        return Err(DrawError::OddTeamCount(teams.len()));
    }
    let mut seen = HashSet::new();
    for t in teams {
        if !seen.insert(t.name.as_str()) {
            return Err(DrawError::DuplicateTeam(t.name.clone()));
        }
    }
    Ok(())
}

/// Shuffle `teams` into numbered groups and pair neighbours.
///
/// Matches are assigned to `slots` round-robin in match order; with no slots
/// every match is left unscheduled.
pub fn draw(teams: &[Team], slots: &[String], seed: Option<u64>) -> Result<Draw, DrawError> {
    validate_roster(teams)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<Team> = teams.to_vec();
    for _ in 0..SHUFFLE_PASSES {
        order.shuffle(&mut rng);
    }

    let groups: Vec<DrawnGroup> = order
        .into_iter()
        .enumerate()
        .map(|(i, team)| DrawnGroup {
            number: i + 1,
            team,
            side: if i % 2 == 0 {
                Side::Affirmative
            } else {
                Side::Negative
            },
        })
        .collect();

    let count = groups.len();
    let mut matches = Vec::new();
    for a in (1..=count).step_by(2) {
        for neg in [a.checked_sub(1), Some(a + 1)].into_iter().flatten() {
            if neg >= 1 && neg <= count {
                matches.push(Matchup {
                    affirmative: a,
                    negative: neg,
                    slot: None,
                });
            }
        }
    }
    if !slots.is_empty() {
        for (i, m) in matches.iter_mut().enumerate() {
            m.slot = Some(slots[i % slots.len()].clone());
        }
    }
    debug!("draw: {} groups, {} matches", count, matches.len());
    Ok(Draw { groups, matches })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<Team> {
        (1..=n)
            .map(|i| Team::new(&format!("Team {i}"), &["a", "b"]))
            .collect()
    }

    #[test]
    fn sides_alternate_and_every_team_is_drawn_once() {
        let teams = roster(6);
        let d = draw(&teams, &[], Some(1)).unwrap();
        assert_eq!(d.groups.len(), 6);
        for g in &d.groups {
            let expected = if g.number % 2 == 1 {
                Side::Affirmative
            } else {
                Side::Negative
            };
            assert_eq!(g.side, expected);
        }
        let mut names: Vec<_> = d.groups.iter().map(|g| g.team.name.clone()).collect();
        names.sort();
        let mut original: Vec<_> = teams.iter().map(|t| t.name.clone()).collect();
        original.sort();
        assert_eq!(names, original);
    }

    #[test]
    fn neighbours_are_matched() {
        let d = draw(&roster(6), &[], Some(2)).unwrap();
        let pairs: Vec<(usize, usize)> = d.matches.iter().map(|m| (m.affirmative, m.negative)).collect();
        assert_eq!(pairs, vec![(1, 2), (3, 2), (3, 4), (5, 4), (5, 6)]);
        assert_eq!(d.matches_for(3).len(), 2);
        assert_eq!(d.matches_for(6).len(), 1);
    }

    #[test]
    fn slots_are_assigned_round_robin() {
        let slots = vec!["Fri 21:00".to_string(), "Sat 20:00".to_string()];
        let d = draw(&roster(4), &slots, Some(3)).unwrap();
        let assigned: Vec<_> = d.matches.iter().map(|m| m.slot.clone().unwrap()).collect();
        assert_eq!(assigned, vec!["Fri 21:00", "Sat 20:00", "Fri 21:00"]);
        assert!(d.render().contains("@ Sat 20:00"));
    }

    #[test]
    fn seeded_draws_repeat() {
        let a = draw(&roster(8), &[], Some(42)).unwrap();
        let b = draw(&roster(8), &[], Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_rosters() {
        assert_eq!(draw(&[], &[], None), Err(DrawError::EmptyRoster));
        assert_eq!(draw(&roster(3), &[], None), Err(DrawError::OddTeamCount(3)));
        let dup = vec![Team::new("X", &[]), Team::new("X", &[])];
        assert_eq!(draw(&dup, &[], None), Err(DrawError::DuplicateTeam("X".into())));
    }
}
