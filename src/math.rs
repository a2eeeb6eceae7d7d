// Impl's organized in order:
// -struct declaration
// -impl
// -conversions
// -indexing
// -add, addassign
// -sub, subassign
// -mul, mulassign
// -div, divassign

use crate::error::SimError;

pub const X: usize = 0;
pub const Y: usize = 1;

/// Double precision 2D vector. X is horizontal, Y is altitude.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    pub const fn zero() -> Vec2 {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Builds a vector from a slice, rejecting anything that isn't exactly two components
    pub fn from_slice(components: &[f64]) -> Result<Vec2, SimError> {
        match components {
            [x, y] => Ok(Vec2::new(*x, *y)),
            _ => Err(SimError::DimensionMismatch { expected: 2, got: components.len() }),
        }
    }

    pub fn dot(&self, rhs: &Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::convert::From<(f64, f64)> for Vec2 {
    fn from(tuple: (f64, f64)) -> Vec2 {
        Vec2 { x: tuple.0, y: tuple.1 }
    }
}

impl std::ops::Index<usize> for Vec2 {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            X => &self.x,
            Y => &self.y,
            _ => panic!("Vec2::index out of bounds")
        }
    }
}

impl std::ops::IndexMut<usize> for Vec2 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            X => &mut self.x,
            Y => &mut self.y,
            _ => panic!("Vec2::index_mut out of bounds")
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::Output { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Mul<Vec2> for f64 {
    type Output = Vec2;
    fn mul(self, rhs: Vec2) -> Self::Output {
        Vec2 { x: self * rhs.x, y: self * rhs.y }
    }
}

impl std::ops::Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self { x: self.x / rhs, y: self.y / rhs }
    }
}
