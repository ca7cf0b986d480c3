//! 3-D vector helpers and a tiny expression type.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    #[error("vectors have different lengths ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("a 3-D vector needs exactly 3 components, got {0}")]
    WrongDimension(usize),
    #[error("unsupported special constant '{0}'")]
    UnknownConstant(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const I: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const J: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const K: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub const fn zero() -> Self {
        Vec3::new(0.0, 0.0, 0.0)
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.x, self.y, self.z)
    }
}

/// Build a [`Vec3`] from exactly three components.
pub fn vector(components: &[f64]) -> Result<Vec3, AlgebraError> {
    match components {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        other => Err(AlgebraError::WrongDimension(other.len())),
    }
}

/// Dot product of two equal-length slices.
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64, AlgebraError> {
    if a.len() != b.len() {
        return Err(AlgebraError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// `(a × b) × c - a × (b × c)`; zero only when the cross product happens to associate.
pub fn triple_product_gap(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    a.cross(b).cross(c) - a.cross(b.cross(c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    E,
    Pi,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::E => std::f64::consts::E,
            Constant::Pi => std::f64::consts::PI,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Constant(Constant),
    Symbol(String),
}

impl Expr {
    /// Parse `raw` as a number, falling back to a symbol.
    pub fn parse(raw: &str) -> Expr {
        match raw.trim().parse::<f64>() {
            Ok(n) => Expr::Number(n),
            Err(_) => Expr::Symbol(raw.trim().to_string()),
        }
    }

    /// Parse `raw` as a special constant (`e` or `pi`, any case).
    pub fn constant(raw: &str) -> Result<Expr, AlgebraError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "e" => Ok(Expr::Constant(Constant::E)),
            "pi" => Ok(Expr::Constant(Constant::Pi)),
            _ => Err(AlgebraError::UnknownConstant(raw.to_string())),
        }
    }

    pub fn is_num(&self) -> bool {
        !matches!(self, Expr::Symbol(_))
    }

    /// Numeric value; symbols have none.
    pub fn value(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            Expr::Constant(c) => Some(c.value()),
            Expr::Symbol(_) => None,
        }
    }

    /// Sum of two numeric expressions.
    pub fn checked_add(&self, other: &Expr) -> Option<Expr> {
        Some(Expr::Number(self.value()? + other.value()?))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(s) => f.write_str(s),
            other => write!(f, "{}", other.value().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_vectors_cross_cyclically() {
        assert_eq!(Vec3::I.cross(Vec3::J), Vec3::K);
        assert_eq!(Vec3::J.cross(Vec3::K), Vec3::I);
        assert_eq!(Vec3::K.cross(Vec3::I), Vec3::J);
        assert_eq!(Vec3::J.cross(Vec3::I), -Vec3::K);
    }

    #[test]
    fn slice_dot_product() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), Ok(32.0));
        assert_eq!(
            dot(&[1.0], &[1.0, 2.0]),
            Err(AlgebraError::LengthMismatch { left: 1, right: 2 })
        );
    }

    #[test]
    fn cross_product_is_not_associative() {
        let a = Vec3::new(-2.0, 3.0, 4.0);
        let b = Vec3::new(4.0, 5.0, -2.0);
        let c = Vec3::new(2.0, 0.0, 1.0);
        // gap = (a·b)c - (b·c)a
        let gap = triple_product_gap(a, b, c);
        let by_identity = Vec3::new(
            a.dot(b) * c.x - b.dot(c) * a.x,
            a.dot(b) * c.y - b.dot(c) * a.y,
            a.dot(b) * c.z - b.dot(c) * a.z,
        );
        assert_eq!(gap, by_identity);
        assert_eq!(gap, Vec3::new(10.0, -18.0, -25.0));
    }

    #[test]
    fn vector_requires_three_components() {
        assert_eq!(vector(&[1.0, 2.0, 3.0]), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(vector(&[1.0]), Err(AlgebraError::WrongDimension(1)));
    }

    #[test]
    fn expressions() {
        let e = Expr::constant("E").unwrap();
        assert!(e.is_num());
        assert_eq!(e.value(), Some(std::f64::consts::E));
        assert!(Expr::constant("tau").is_err());

        let x = Expr::parse("x");
        assert!(!x.is_num());
        assert_eq!(x.checked_add(&e), None);
        assert_eq!(Expr::parse("2").checked_add(&Expr::parse("0.5")), Some(Expr::Number(2.5)));
    }
}
