//! Small fixed-size geometry primitives used by the motion math.
//!
//! Conventions:
//! - Angles are radians unless a field name says `_deg`.
//! - Matrices are row-major (`m[row][col]`) and act on column vectors.
//! - `Mat3` is a 2D homogeneous transform: linear part in the upper-left 2x2,
//!   translation in the last column, `[0, 0, 1]` as the bottom row.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    /// Euclidean length.
    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rotate counter-clockwise by `theta` radians.
    #[inline]
    pub fn rotate(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Component-wise product.
    #[inline]
    pub fn hadamard(self, other: Vec2) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    #[inline]
    pub fn recip(self) -> Self {
        Self::new(self.x.recip(), self.y.recip())
    }

    #[inline]
    pub fn powf(self, exp: f64) -> Self {
        Self::new(self.x.powf(exp), self.y.powf(exp))
    }

    #[inline]
    pub fn max(self, other: Vec2) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[inline]
    pub fn max_scalar(self, floor: f64) -> Self {
        Self::new(self.x.max(floor), self.y.max(floor))
    }

    #[inline]
    pub fn ceil(self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(a: [f64; 2]) -> Self {
        Vec2::new(a[0], a[1])
    }
}

/// 2x2 matrix, row-major.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat2 {
    pub m: [[f64; 2]; 2],
}

impl Default for Mat2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat2 {
    pub const IDENTITY: Mat2 = Mat2 {
        m: [[1.0, 0.0], [0.0, 1.0]],
    };

    #[inline]
    pub const fn from_rows(r0: [f64; 2], r1: [f64; 2]) -> Self {
        Self { m: [r0, r1] }
    }

    /// Counter-clockwise rotation by `theta` radians.
    #[inline]
    pub fn rotation(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows([c, -s], [s, c])
    }

    #[inline]
    pub const fn diagonal(d: Vec2) -> Self {
        Self::from_rows([d.x, 0.0], [0.0, d.y])
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    /// Inverse, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Mat2> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = det.recip();
        Some(Self::from_rows(
            [self.m[1][1] * inv, -self.m[0][1] * inv],
            [-self.m[1][0] * inv, self.m[0][0] * inv],
        ))
    }

    /// Element-wise absolute value; used to size axis-aligned bounds.
    #[inline]
    pub fn abs(&self) -> Self {
        Self::from_rows(
            [self.m[0][0].abs(), self.m[0][1].abs()],
            [self.m[1][0].abs(), self.m[1][1].abs()],
        )
    }

    #[inline]
    pub fn mul_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y,
            self.m[1][0] * v.x + self.m[1][1] * v.y,
        )
    }
}

impl Mul for Mat2 {
    type Output = Mat2;
    fn mul(self, rhs: Mat2) -> Mat2 {
        let mut out = [[0.0f64; 2]; 2];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.m[r][0] * rhs.m[0][c] + self.m[r][1] * rhs.m[1][c];
            }
        }
        Mat2 { m: out }
    }
}

impl Mul<Vec2> for Mat2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        self.mul_vec(rhs)
    }
}

/// 3x3 homogeneous 2D transform, row-major.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    pub m: [[f64; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Compose a linear part and a translation column.
    pub fn from_parts(linear: Mat2, translation: Vec2) -> Self {
        Self {
            m: [
                [linear.m[0][0], linear.m[0][1], translation.x],
                [linear.m[1][0], linear.m[1][1], translation.y],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    #[inline]
    pub fn linear(&self) -> Mat2 {
        Mat2::from_rows(
            [self.m[0][0], self.m[0][1]],
            [self.m[1][0], self.m[1][1]],
        )
    }

    #[inline]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.m[0][2], self.m[1][2])
    }

    /// Apply to a point (implicit `w = 1`).
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        self.linear().mul_vec(p) + self.translation()
    }

    pub fn to_row_major(&self) -> [f64; 9] {
        let mut out = [0.0f64; 9];
        for (r, row) in self.m.iter().enumerate() {
            out[r * 3..r * 3 + 3].copy_from_slice(row);
        }
        out
    }

    /// Largest absolute element difference against `other`.
    pub fn max_abs_diff(&self, other: &Mat3) -> f64 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Mul for Mat3 {
    type Output = Mat3;
    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut out = [[0.0f64; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Mat3 { m: out }
    }
}

#[inline]
pub fn to_rad(deg: f64) -> f64 {
    deg.to_radians()
}
