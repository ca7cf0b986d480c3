//! Newton's method: an iteration table for inspection and a converging root finder.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NewtonError {
    #[error("derivative vanished at x = {x}")]
    ZeroDerivative { x: f64 },
    #[error("iteration diverged at step {step}")]
    Diverged { step: usize },
    #[error("no convergence after {iterations} iterations (last x = {last})")]
    NoConvergence { iterations: usize, last: f64 },
}

/// One row of the iteration table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonStep {
    /// 1-based iteration number.
    pub n: usize,
    pub x: f64,
    pub fx: f64,
    pub dfx: f64,
}

impl fmt::Display for NewtonStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n = {}: x_n = {}, g(x_n) = {}, g' = {}", self.n, self.x, self.fx, self.dfx)
    }
}

/// First `iterations` Newton iterates starting at `x0`.
///
/// The table stops early if the derivative vanishes, since the next iterate
/// would be undefined.
pub fn newton_table<F, D>(f: F, df: D, x0: f64, iterations: usize) -> Vec<NewtonStep>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut steps = Vec::with_capacity(iterations);
    let mut x = x0;
    for n in 1..=iterations {
        let fx = f(x);
        let dfx = df(x);
        steps.push(NewtonStep { n, x, fx, dfx });
        if dfx == 0.0 {
            break;
        }
        x = (x * dfx - fx) / dfx;
    }
    steps
}

/// Iterate until successive iterates differ by less than `tolerance`.
pub fn find_root<F, D>(
    f: F,
    df: D,
    x0: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<f64, NewtonError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;
    for step in 1..=max_iterations {
        let dfx = df(x);
        if dfx == 0.0 {
            return Err(NewtonError::ZeroDerivative { x });
        }
        let next = x - f(x) / dfx;
        if !next.is_finite() {
            return Err(NewtonError::Diverged { step });
        }
        if (next - x).abs() < tolerance {
            return Ok(next);
        }
        x = next;
    }
    Err(NewtonError::NoConvergence {
        iterations: max_iterations,
        last: x,
    })
}

/// Polynomial with real coefficients, highest degree first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Polynomial { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn derivative(&self) -> Polynomial {
        let deg = self.degree();
        let coefficients = self
            .coefficients
            .iter()
            .take(deg)
            .enumerate()
            .map(|(i, c)| c * (deg - i) as f64)
            .collect();
        Polynomial { coefficients }
    }
}

impl Default for Polynomial {
    /// `x^3 + x - 1`
    fn default() -> Self {
        Polynomial::new(vec![1.0, 0.0, 1.0, -1.0])
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deg = self.degree();
        let mut wrote = false;
        for (i, &c) in self.coefficients.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let power = deg - i;
            let sign = if c < 0.0 { "-" } else { "+" };
            if wrote {
                write!(f, " {sign} ")?;
            } else if c < 0.0 {
                f.write_str("-")?;
            }
            let mag = c.abs();
            if mag != 1.0 || power == 0 {
                write!(f, "{mag}")?;
            }
            match power {
                0 => {}
                1 => f.write_str("x")?,
                p => write!(f, "x^{p}")?,
            }
            wrote = true;
        }
        if !wrote {
            f.write_str("0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_follows_reference_iteration() {
        let p = Polynomial::default();
        let dp = p.derivative();
        let table = newton_table(|x| p.eval(x), |x| dp.eval(x), 1.0, 5);
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].x, 1.0);
        assert_eq!(table[0].fx, 1.0);
        assert_eq!(table[0].dfx, 4.0);
        assert_eq!(table[1].x, 0.75);
        assert!((table[4].x - 0.682_327_803_8).abs() < 1e-9);
    }

    #[test]
    fn root_finder_converges() {
        let root = find_root(|x| x * x - 2.0, |x| 2.0 * x, 1.0, 1e-12, 50).unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn root_finder_reports_flat_derivative() {
        assert_eq!(
            find_root(|x| x * x + 1.0, |x| 2.0 * x, 0.0, 1e-9, 10),
            Err(NewtonError::ZeroDerivative { x: 0.0 })
        );
        assert!(matches!(
            find_root(|x| x * x + 1.0, |x| 2.0 * x, 0.5, 1e-12, 5),
            Err(NewtonError::NoConvergence { iterations: 5, .. })
        ));
    }

    #[test]
    fn polynomial_basics() {
        let p = Polynomial::default();
        assert_eq!(p.to_string(), "x^3 + x - 1");
        assert_eq!(p.derivative().to_string(), "3x^2 + 1");
        assert_eq!(p.eval(2.0), 9.0);
        assert_eq!(Polynomial::new(vec![-2.0, 0.0]).to_string(), "-2x");
        assert_eq!(Polynomial::new(vec![]).to_string(), "0");
    }
}
