// crates/gf_geo/src/geometry.rs

//! 几何类型定义
//!
//! 格点插补在 (经度, 纬度) 平面上使用欧几里得距离，
//! 不涉及投影或大地测量距离。

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 2D点 - 用于经纬度平面计算
///
/// # 示例
///
/// ```
/// use gf_geo::geometry::Point2D;
///
/// let p1 = Point2D::from_lonlat(-20.0, 25.0);
/// let p2 = Point2D::from_lonlat(-17.0, 29.0);
/// assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X坐标（经度）
    pub x: f64,
    /// Y坐标（纬度）
    pub y: f64,
}

impl Point2D {
    /// 零点常量
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// 创建新的2D点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 从经纬度创建（lon, lat）
    #[inline]
    #[must_use]
    pub const fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self { x: lon, y: lat }
    }

    /// 计算到另一个点的欧几里得距离
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// 计算到另一个点的距离的平方
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// 点积
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 二维叉积（z 分量）
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// 坐标是否均为有限值
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-10);
        assert!((p1.distance_squared_to(&p2) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_from_lonlat() {
        let p = Point2D::from_lonlat(-15.5, 28.1);
        assert_eq!(p.x, -15.5);
        assert_eq!(p.y, 28.1);
    }

    #[test]
    fn test_operators() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(3.0, 5.0);
        assert_eq!(b - a, Point2D::new(2.0, 3.0));
        assert_eq!(a + b, Point2D::new(4.0, 7.0));
        assert_eq!(a * 2.0, Point2D::new(2.0, 4.0));
        assert!((a.cross(&b) - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_point_from() {
        let p1: Point2D = (1.0, 2.0).into();
        let p2: Point2D = [1.0, 2.0].into();
        assert_eq!(p1, p2);
        assert!(!Point2D::new(f64::NAN, 0.0).is_finite());
    }
}
