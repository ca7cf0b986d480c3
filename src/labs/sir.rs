//! Discrete-time SIR epidemic model with deaths, births and re-infection.
//!
//! Each day, with `N` the initial population, `β = contacts × γ`:
//!
//! ```text
//! dS = -β S I / N + growth × N / 365
//! dI =  β S I / N - γ I + reinfection × R × contacts
//! dR =  γ I (1 - death) - reinfection × R × contacts
//! dD =  γ I × death
//! ```
//!
//! The series records the values at the start of each day.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SirError {
    #[error("population must be positive")]
    EmptyPopulation,
    #[error("simulation must cover at least one day")]
    NoDays,
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SirParams {
    pub susceptible: f64,
    pub infected: f64,
    pub removed: f64,
    /// Fraction of infected people leaving the infected pool each day (γ).
    pub recovery_rate: f64,
    pub average_contacts: f64,
    /// Yearly births as a fraction of the population.
    pub growth_rate: f64,
    /// Fraction of people leaving the infected pool who die.
    pub death_rate: f64,
    pub reinfection_rate: f64,
    pub days: usize,
}

impl Default for SirParams {
    fn default() -> Self {
        SirParams {
            susceptible: 50_000.0,
            infected: 1_000.0,
            removed: 0.0,
            recovery_rate: 1.0 / 14.0,
            average_contacts: 1.0,
            growth_rate: 0.0,
            death_rate: 0.1,
            reinfection_rate: 0.01,
            days: 200,
        }
    }
}

impl SirParams {
    pub fn validate(&self) -> Result<(), SirError> {
        if self.susceptible + self.infected + self.removed <= 0.0 {
            return Err(SirError::EmptyPopulation);
        }
        if self.days == 0 {
            return Err(SirError::NoDays);
        }
        for (name, value) in [
            ("recovery_rate", self.recovery_rate),
            ("death_rate", self.death_rate),
            ("reinfection_rate", self.reinfection_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SirError::RateOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SirSeries {
    pub day: Vec<usize>,
    pub susceptible: Vec<f64>,
    pub infected: Vec<f64>,
    pub removed: Vec<f64>,
    pub dead: Vec<f64>,
}

impl SirSeries {
    pub fn len(&self) -> usize {
        self.day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }

    /// `(day, infected)` at the infection peak.
    pub fn peak_infected(&self) -> Option<(usize, f64)> {
        self.infected
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, v)| (self.day[i], *v))
    }

    /// Fixed-width table, one row every `every` days (plus the final day).
    pub fn render_table(&self, every: usize) -> String {
        let every = every.max(1);
        let mut out = format!(
            "{:>5} {:>12} {:>12} {:>12} {:>12}\n",
            "day", "susceptible", "infected", "removed", "dead"
        );
        let last = self.len().saturating_sub(1);
        for i in (0..self.len()).filter(|i| i % every == 0 || *i == last) {
            out.push_str(&format!(
                "{:>5} {:>12.1} {:>12.1} {:>12.1} {:>12.1}\n",
                self.day[i], self.susceptible[i], self.infected[i], self.removed[i], self.dead[i]
            ));
        }
        out
    }
}

pub fn simulate(params: &SirParams) -> Result<SirSeries, SirError> {
    params.validate()?;
    let population = params.susceptible + params.infected + params.removed;
    let infection_rate = params.average_contacts * params.recovery_rate;
    let gamma = params.recovery_rate;
    let reinfect = params.reinfection_rate * params.average_contacts;

    let (mut s, mut i, mut r, mut d) = (params.susceptible, params.infected, params.removed, 0.0);
    let mut series = SirSeries::default();
    for day in 0..params.days {
        series.day.push(day);
        series.susceptible.push(s);
        series.infected.push(i);
        series.removed.push(r);
        series.dead.push(d);

        let new_infections = infection_rate * s * i / population;
        let leaving = gamma * i;
        let ds = -new_infections + params.growth_rate * population / 365.0;
        let di = new_infections - leaving + reinfect * r;
        let dr = leaving * (1.0 - params.death_rate) - reinfect * r;
        let dd = leaving * params.death_rate;

        s += ds;
        i += di;
        r += dr;
        d += dd;
    }
    if let Some((day, peak)) = series.peak_infected() {
        debug!("sir: {} days simulated, infection peak {:.1} on day {}", params.days, peak, day);
    }
    Ok(series)
}
