// crates/gf_fill/src/interpolation/cubic.rs

//! 三次 Bézier 三角曲面片
//!
//! 在 Delaunay 三角剖分的每个三角形上构造三次 Bézier 曲面片。
//!
//! # 算法
//!
//! 1. 顶点梯度：对每个顶点，用其邻接顶点做最小二乘平面拟合
//!    `f_j - f_i ≈ g_i · (p_j - p_i)`
//! 2. 边控制点：`b_ij = f_i + g_i · (p_j - p_i) / 3`
//! 3. 中心控制点：`b111 = E/4 - V/6`，E 为六个边控制点之和，V 为三个顶点值之和
//! 4. 以重心坐标求三次 Bernstein 多项式
//!
//! 曲面片在顶点处插值数据并与梯度一致，线性场被精确复现。
//! 凸包外的点返回 `None`。

use gf_geo::{Point2D, Triangulation};

/// 梯度最小二乘法方程的奇异判定阈值（相对）
const GRADIENT_SINGULAR_TOLERANCE: f64 = 1e-12;

/// 三角剖分上的三次曲面片集合
pub struct CubicPatches<'a> {
    tri: &'a Triangulation,
    values: &'a [f64],
    gradients: Vec<Point2D>,
}

impl<'a> CubicPatches<'a> {
    /// 估计顶点梯度并构建曲面片
    ///
    /// `values` 与三角剖分的输入点一一对应。
    pub fn new(tri: &'a Triangulation, values: &'a [f64]) -> Self {
        let gradients = (0..tri.points().len())
            .map(|i| estimate_gradient(tri, values, i))
            .collect();
        Self {
            tri,
            values,
            gradients,
        }
    }

    /// 顶点梯度
    pub fn gradient(&self, vertex: usize) -> Point2D {
        self.gradients[vertex]
    }

    /// 在查询点求值，凸包外返回 `None`
    pub fn evaluate(&self, p: &Point2D) -> Option<f64> {
        let loc = self.tri.locate(p)?;
        let [i0, i1, i2] = loc.vertices;
        let [l0, l1, l2] = loc.weights;
        let pts = self.tri.points();
        let (p0, p1, p2) = (pts[i0], pts[i1], pts[i2]);
        let (f0, f1, f2) = (self.values[i0], self.values[i1], self.values[i2]);
        let (g0, g1, g2) = (self.gradients[i0], self.gradients[i1], self.gradients[i2]);

        let edge = |f: f64, g: Point2D, from: Point2D, to: Point2D| f + g.dot(&(to - from)) / 3.0;
        let b210 = edge(f0, g0, p0, p1);
        let b201 = edge(f0, g0, p0, p2);
        let b120 = edge(f1, g1, p1, p0);
        let b021 = edge(f1, g1, p1, p2);
        let b102 = edge(f2, g2, p2, p0);
        let b012 = edge(f2, g2, p2, p1);

        let e = b210 + b201 + b120 + b021 + b102 + b012;
        let v = f0 + f1 + f2;
        let b111 = e / 4.0 - v / 6.0;

        let value = f0 * l0 * l0 * l0
            + f1 * l1 * l1 * l1
            + f2 * l2 * l2 * l2
            + 3.0 * b210 * l0 * l0 * l1
            + 3.0 * b201 * l0 * l0 * l2
            + 3.0 * b120 * l0 * l1 * l1
            + 3.0 * b021 * l1 * l1 * l2
            + 3.0 * b102 * l0 * l2 * l2
            + 3.0 * b012 * l1 * l2 * l2
            + 6.0 * b111 * l0 * l1 * l2;

        Some(value)
    }
}

/// 最小二乘估计顶点梯度
///
/// 邻接点不足或共线时返回零梯度。
fn estimate_gradient(tri: &Triangulation, values: &[f64], vertex: usize) -> Point2D {
    let pts = tri.points();
    let origin = pts[vertex];
    let f = values[vertex];

    let (mut sxx, mut sxy, mut syy, mut sxf, mut syf) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &n in tri.neighbors(vertex) {
        let d = pts[n] - origin;
        let df = values[n] - f;
        sxx += d.x * d.x;
        sxy += d.x * d.y;
        syy += d.y * d.y;
        sxf += d.x * df;
        syf += d.y * df;
    }

    let det = sxx * syy - sxy * sxy;
    if det.abs() <= GRADIENT_SINGULAR_TOLERANCE * (sxx * syy).max(f64::MIN_POSITIVE) {
        return Point2D::ZERO;
    }

    Point2D::new((syy * sxf - sxy * syf) / det, (sxx * syf - sxy * sxf) / det)
}
