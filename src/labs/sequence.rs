//! Recursive sequence iteration `x_{k+1} = f(x_k)` with a console dot plot.

use serde::{Deserialize, Serialize};

/// `[start, f(start), f(f(start)), ...]`, `iterations + 1` values in total.
pub fn iterate_sequence<F>(f: F, start: f64, iterations: usize) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let mut out = Vec::with_capacity(iterations + 1);
    let mut x = start;
    for _ in 0..=iterations {
        out.push(x);
        x = f(x);
    }
    out
}

/// Built-in recurrences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SequenceMap {
    /// `r (x - x²)`
    Logistic { rate: f64 },
    /// `|x² - 1|`
    AbsSquareMinusOne,
}

impl Default for SequenceMap {
    fn default() -> Self {
        SequenceMap::Logistic { rate: 2.2 }
    }
}

impl SequenceMap {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            SequenceMap::Logistic { rate } => rate * (x - x * x),
            SequenceMap::AbsSquareMinusOne => (x * x - 1.0).abs(),
        }
    }

    pub fn iterate(self, start: f64, iterations: usize) -> Vec<f64> {
        iterate_sequence(|x| self.apply(x), start, iterations)
    }
}

/// One line per value: iteration number, value, and a `*` placed
/// proportionally between the series minimum and maximum.
pub fn render_dot_plot(values: &[f64], width: usize) -> String {
    let width = width.max(2);
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    let mut out = String::new();
    for (i, &v) in values.iter().enumerate() {
        let col = if span > 0.0 && span.is_finite() {
            (((v - lo) / span) * (width - 1) as f64).round() as usize
        } else {
            0
        };
        let mut bar = vec![' '; width];
        bar[col.min(width - 1)] = '*';
        let bar: String = bar.into_iter().collect();
        out.push_str(&format!("iter {:>3}: {:<12.6} |{}|\n", i, v, bar.trim_end()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_square_minus_one_reference_values() {
        let seq = SequenceMap::AbsSquareMinusOne.iterate(0.5, 3);
        assert_eq!(seq, vec![0.5, 0.75, 0.4375, 0.80859375]);
    }

    #[test]
    fn logistic_settles_on_fixed_point() {
        let seq = SequenceMap::default().iterate(0.4, 60);
        assert_eq!(seq.len(), 61);
        let fixed = 1.0 - 1.0 / 2.2;
        assert!((seq[60] - fixed).abs() < 1e-6);
    }

    #[test]
    fn zero_iterations_is_just_the_start() {
        assert_eq!(iterate_sequence(|x| x + 1.0, 3.0, 0), vec![3.0]);
    }

    #[test]
    fn dot_plot_places_extremes_at_edges() {
        let plot = render_dot_plot(&[0.0, 1.0, 0.5], 11);
        let lines: Vec<&str> = plot.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("|*|"));
        assert!(lines[1].ends_with("|          *|"));
        assert!(lines[2].ends_with("|     *|"));
    }

    #[test]
    fn dot_plot_handles_constant_series() {
        let plot = render_dot_plot(&[2.0, 2.0], 5);
        assert!(plot.lines().all(|l| l.ends_with("|*|")));
    }
}
