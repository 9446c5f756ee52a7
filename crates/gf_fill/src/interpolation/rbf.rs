// crates/gf_fill/src/interpolation/rbf.rs

//! 径向基函数插补
//!
//! # 算法原理
//!
//! 插值曲面为核函数加权和加低次多项式：
//!
//! $$
//! s(x) = \sum_j w_j \phi(\varepsilon \lVert x - x_j \rVert) + \sum_k c_k p_k(x)
//! $$
//!
//! 系数由如下对称系统求出（λ 为平滑参数）：
//!
//! $$
//! \begin{bmatrix} \Phi + \lambda I & P \\ P^T & 0 \end{bmatrix}
//! \begin{bmatrix} w \\ c \end{bmatrix} =
//! \begin{bmatrix} f \\ 0 \end{bmatrix}
//! $$
//!
//! 多项式基在平移缩放到 [-1, 1] 的坐标上计算，改善条件数。
//!
//! # 抽样
//!
//! 有效点超过 `max_points` 时无放回均匀抽取 `max_points` 个点拟合。
//! 设置 `seed` 时每个时间片使用 `seed ^ slice_index` 作为独立种子，
//! 否则使用系统熵，结果不可复现。

use gf_config::{RbfConfig, RbfKernel};
use gf_foundation::{GfError, GfResult};
use gf_geo::Point2D;
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::nearest::NearestLookup;
use super::{FilledValues, GapFiller};
use crate::mask::ResolvedSlice;

// ============================================================================
// 多项式基
// ============================================================================

/// 二维单项式基（总次数不超过 degree）
#[derive(Debug, Clone)]
struct PolynomialBasis {
    /// (x 次数, y 次数)
    powers: Vec<(i32, i32)>,
    shift: Point2D,
    scale: Point2D,
}

impl PolynomialBasis {
    fn new(degree: Option<usize>, points: &[Point2D]) -> Self {
        let mut powers = Vec::new();
        if let Some(d) = degree {
            for total in 0..=d as i32 {
                for py in 0..=total {
                    powers.push((total - py, py));
                }
            }
        }

        let (mut min, mut max) = (
            Point2D::new(f64::INFINITY, f64::INFINITY),
            Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        );
        for p in points {
            min = Point2D::new(min.x.min(p.x), min.y.min(p.y));
            max = Point2D::new(max.x.max(p.x), max.y.max(p.y));
        }
        let half = |lo: f64, hi: f64| {
            let s = (hi - lo) / 2.0;
            if s > 0.0 && s.is_finite() { s } else { 1.0 }
        };

        Self {
            powers,
            shift: Point2D::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0),
            scale: Point2D::new(half(min.x, max.x), half(min.y, max.y)),
        }
    }

    fn len(&self) -> usize {
        self.powers.len()
    }

    fn evaluate(&self, p: &Point2D, out: &mut [f64]) {
        let x = (p.x - self.shift.x) / self.scale.x;
        let y = (p.y - self.shift.y) / self.scale.y;
        for (o, &(px, py)) in out.iter_mut().zip(&self.powers) {
            *o = x.powi(px) * y.powi(py);
        }
    }
}

// ============================================================================
// RBF 曲面
// ============================================================================

/// 拟合完成的 RBF 曲面
#[derive(Debug, Clone)]
pub struct RbfSurface {
    centers: Vec<Point2D>,
    kernel: RbfKernel,
    epsilon: f64,
    weights: DVector<f64>,
    coeffs: DVector<f64>,
    basis: PolynomialBasis,
}

impl RbfSurface {
    /// 拟合曲面
    ///
    /// # 错误
    ///
    /// 点数少于多项式项数、系统奇异或解含非有限值时返回 `GfError::Numerical`。
    pub fn fit(
        points: &[Point2D],
        values: &[f64],
        kernel: RbfKernel,
        epsilon: f64,
        smoothing: f64,
        degree: Option<usize>,
    ) -> GfResult<Self> {
        GfError::check_size("values", points.len(), values.len())?;

        let n = points.len();
        let basis = PolynomialBasis::new(degree, points);
        let m = basis.len();
        if n == 0 || n < m {
            return Err(GfError::numerical(format!(
                "{} 个点不足以确定 {} 项多项式",
                n, m
            )));
        }

        let size = n + m;
        let mut lhs = DMatrix::<f64>::zeros(size, size);
        for i in 0..n {
            for j in i..n {
                let r = points[i].distance_to(&points[j]);
                let k = kernel.evaluate(epsilon * r);
                lhs[(i, j)] = k;
                lhs[(j, i)] = k;
            }
            lhs[(i, i)] += smoothing;
        }

        let mut poly = vec![0.0; m];
        for (i, p) in points.iter().enumerate() {
            basis.evaluate(p, &mut poly);
            for (k, &v) in poly.iter().enumerate() {
                lhs[(i, n + k)] = v;
                lhs[(n + k, i)] = v;
            }
        }

        let mut rhs = DVector::<f64>::zeros(size);
        for (i, &v) in values.iter().enumerate() {
            rhs[i] = v;
        }

        let solution = lhs
            .lu()
            .solve(&rhs)
            .ok_or_else(|| GfError::numerical("RBF 系统矩阵奇异"))?;
        if solution.iter().any(|v| !v.is_finite()) {
            return Err(GfError::numerical("RBF 系数含非有限值"));
        }

        Ok(Self {
            centers: points.to_vec(),
            kernel,
            epsilon,
            weights: solution.rows(0, n).into_owned(),
            coeffs: solution.rows(n, m).into_owned(),
            basis,
        })
    }

    /// 中心点数量
    pub fn n_centers(&self) -> usize {
        self.centers.len()
    }

    /// 在单点求值
    pub fn evaluate(&self, p: &Point2D) -> f64 {
        let mut poly = vec![0.0; self.basis.len()];
        self.evaluate_with(p, &mut poly)
    }

    /// 批量求值
    pub fn evaluate_many(&self, points: &[Point2D]) -> Vec<f64> {
        let mut poly = vec![0.0; self.basis.len()];
        points.iter().map(|p| self.evaluate_with(p, &mut poly)).collect()
    }

    fn evaluate_with(&self, p: &Point2D, poly: &mut [f64]) -> f64 {
        let radial: f64 = self
            .centers
            .iter()
            .zip(self.weights.iter())
            .map(|(c, w)| w * self.kernel.evaluate(self.epsilon * p.distance_to(c)))
            .sum();

        self.basis.evaluate(p, poly);
        let trend: f64 = poly.iter().zip(self.coeffs.iter()).map(|(b, c)| b * c).sum();

        radial + trend
    }
}

// ============================================================================
// RBF 插补器
// ============================================================================

/// RBF 插补器
#[derive(Debug, Clone)]
pub struct RbfFiller {
    config: RbfConfig,
}

impl RbfFiller {
    /// 创建插补器
    pub fn new(config: RbfConfig) -> Self {
        Self { config }
    }

    /// 配置
    pub fn config(&self) -> &RbfConfig {
        &self.config
    }

    /// 选择参与拟合的有效点索引（升序）
    ///
    /// 有效点不超过 `max_points` 时返回全部。
    pub fn select_points(&self, n_valid: usize, slice_index: usize) -> Vec<usize> {
        let cap = self.config.max_points;
        if n_valid <= cap {
            return (0..n_valid).collect();
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ slice_index as u64),
            None => StdRng::from_entropy(),
        };
        let mut picked = index::sample(&mut rng, n_valid, cap).into_vec();
        picked.sort_unstable();
        picked
    }
}

impl GapFiller for RbfFiller {
    fn name(&self) -> &'static str {
        "rbf"
    }

    fn min_valid_points(&self) -> usize {
        self.config.min_points
    }

    fn fill(&self, slice: &ResolvedSlice, slice_index: usize) -> GfResult<FilledValues> {
        let picked = self.select_points(slice.n_valid(), slice_index);
        if picked.len() < slice.n_valid() {
            log::debug!(
                "时间片 {}: 有效点 {} 个，抽样 {} 个用于拟合",
                slice_index,
                slice.n_valid(),
                picked.len()
            );
        }

        let points: Vec<Point2D> = picked.iter().map(|&i| slice.valid_points[i]).collect();
        let values: Vec<f64> = picked.iter().map(|&i| slice.valid_values[i]).collect();

        let surface = RbfSurface::fit(
            &points,
            &values,
            self.config.kernel,
            self.config.epsilon,
            self.config.smoothing,
            self.config.effective_degree(),
        )?;

        let mut out = surface.evaluate_many(&slice.missing_points);
        let non_finite = out.iter().filter(|v| !v.is_finite()).count();

        let fallback_points = if non_finite == 0 {
            0
        } else if self.config.fallback_to_nearest {
            for v in out.iter_mut().filter(|v| !v.is_finite()) {
                *v = f64::NAN;
            }
            NearestLookup::new(&slice.valid_points, &slice.valid_values)
                .backfill(&slice.missing_points, &mut out)
        } else {
            return Err(GfError::numerical(format!(
                "RBF 曲面在 {} 个缺测点求值为非有限值",
                non_finite
            )));
        };

        Ok(FilledValues {
            values: out,
            fallback_points,
            fit_points: points.len(),
        })
    }
}
