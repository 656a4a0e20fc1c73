use itertools::izip;

use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Neg, Sub, SubAssign};

/// Tolerance used by [near_zero](Vec3::near_zero).
pub const ZERO_TOLERANCE: f32 = 1e-4;

#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Vec3 {
    pub coords: [f32; 3],
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { coords: [x, y, z] }
    }

    pub fn zeros() -> Self {
        Vec3 { coords: [0.0; 3] }
    }

    /// Vector with the same value in all three components.
    pub fn broadcast(value: f32) -> Self {
        Vec3 { coords: [value; 3] }
    }

    pub fn unit_x() -> Self {
        Vec3::new(1.0, 0.0, 0.0)
    }

    pub fn unit_y() -> Self {
        Vec3::new(0.0, 1.0, 0.0)
    }

    pub fn unit_z() -> Self {
        Vec3::new(0.0, 0.0, 1.0)
    }

    pub fn x(&self) -> f32 {
        self.coords[0]
    }

    pub fn y(&self) -> f32 {
        self.coords[1]
    }

    pub fn z(&self) -> f32 {
        self.coords[2]
    }

    pub fn dot(&self, rhs: &Vec3) -> f32 {
        self.coords
            .iter()
            .zip(rhs.coords.iter())
            .map(|(a_elem, b_elem)| a_elem * b_elem)
            .sum()
    }

    pub fn norm_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn norm(&self) -> f32 {
        self.norm_squared().sqrt()
    }

    pub fn normalize(&self) -> Vec3 {
        *self * (1.0 / self.norm())
    }

    /// Componentwise (Hadamard) product.
    pub fn component_mul(&self, rhs: &Vec3) -> Vec3 {
        let mut coords = [0.0; 3];
        for (r, a, b) in izip!(coords.iter_mut(), self.coords.iter(), rhs.coords.iter()) {
            *r = a * b;
        }
        Vec3 { coords }
    }

    /// Componentwise maximum.
    pub fn component_max(&self, rhs: &Vec3) -> Vec3 {
        let mut coords = [0.0; 3];
        for (r, a, b) in izip!(coords.iter_mut(), self.coords.iter(), rhs.coords.iter()) {
            *r = a.max(*b);
        }
        Vec3 { coords }
    }

    /// Each component clamped to [0, 1].
    pub fn clamp01(&self) -> Vec3 {
        let mut coords = [0.0; 3];
        for (r, a) in coords.iter_mut().zip(self.coords.iter()) {
            *r = a.max(0.0).min(1.0);
        }
        Vec3 { coords }
    }

    /// Arithmetic mean of the three components.
    pub fn average(&self) -> f32 {
        self.coords.iter().sum::<f32>() / 3.0
    }

    /// Linear combination `self * (1 - t) + rhs * t`, componentwise.
    pub fn lerp(&self, rhs: &Vec3, t: f32) -> Vec3 {
        *self * (1.0 - t) + *rhs * t
    }

    /// Mirror reflection of `self` about the surface normal `n`.
    pub fn reflect(&self, n: &Vec3) -> Vec3 {
        *self - *n * (2.0 * self.dot(n))
    }

    /// True when every component is within [ZERO_TOLERANCE](ZERO_TOLERANCE) of zero.
    pub fn near_zero(&self) -> bool {
        self.coords.iter().all(|a| a.abs() < ZERO_TOLERANCE)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut coords = [0.0; 3];
        for (r, a, b) in izip!(coords.iter_mut(), self.coords.iter(), rhs.coords.iter()) {
            *r = a + b;
        }
        Vec3 { coords }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.coords.iter_mut().zip(rhs.coords.iter()) {
            *a += b;
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut coords = [0.0; 3];
        for (r, a, b) in izip!(coords.iter_mut(), self.coords.iter(), rhs.coords.iter()) {
            *r = a - b;
        }
        Vec3 { coords }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.coords.iter_mut().zip(rhs.coords.iter()) {
            *a -= b;
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Vec3 {
        let mut coords = [0.0; 3];
        for (r, a) in coords.iter_mut().zip(self.coords.iter()) {
            *r = a * rhs;
        }
        Vec3 { coords }
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        for a in self.coords.iter_mut() {
            *a *= rhs;
        }
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Vec3 {
        let mut coords = [0.0; 3];
        for (r, a) in coords.iter_mut().zip(self.coords.iter()) {
            *r = a / rhs;
        }
        Vec3 { coords }
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Vec3 {
        self * -1.0
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.coords[index]
    }
}
