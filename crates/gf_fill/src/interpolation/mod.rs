// crates/gf_fill/src/interpolation/mod.rs

//! 插补器模块
//!
//! 所有插补器实现 [`GapFiller`]，时间片迭代器只依赖该 trait。
//!
//! # 插补方法
//!
//! - [`nearest`]: R-tree 最近邻，也是其他方法的回填手段
//! - [`scattered`]: 最近邻 / 线性 / 三次散点插值
//! - [`cubic`]: Delaunay 三角形上的三次 Bézier 曲面片
//! - [`rbf`]: 径向基函数曲面拟合
//!
//! # 选择指南
//!
//! | 方法 | 计算复杂度 | 光滑性 | 凸包外 |
//! |------|----------|--------|--------|
//! | Nearest | O(n log n) | 阶梯 | 可用 |
//! | Linear | O(n log n) | C0 | 回填 |
//! | Cubic | O(n log n) | 顶点 C1 | 回填 |
//! | RBF | O(n³) | 光滑 | 外推 |

pub mod cubic;
pub mod nearest;
pub mod rbf;
pub mod scattered;

use gf_foundation::GfResult;

use crate::mask::ResolvedSlice;

pub use cubic::CubicPatches;
pub use nearest::NearestLookup;
pub use rbf::{RbfFiller, RbfSurface};
pub use scattered::ScatteredFiller;

/// 插补器对缺测点给出的值
#[derive(Debug, Clone, PartialEq)]
pub struct FilledValues {
    /// 与 `ResolvedSlice::missing_points` 一一对应
    pub values: Vec<f64>,
    /// 由最近邻回填的点数
    pub fallback_points: usize,
    /// 实际参与拟合/插值的有效点数
    pub fit_points: usize,
}

/// 缺测插补器
pub trait GapFiller: Send + Sync {
    /// 方法名
    fn name(&self) -> &'static str;

    /// 执行插补所需的最少有效点数
    fn min_valid_points(&self) -> usize {
        1
    }

    /// 计算缺测点的值
    ///
    /// `slice_index` 仅用于派生每个时间片独立的随机流。
    /// 返回 `Err` 表示该时间片拟合失败，不影响其他时间片。
    fn fill(&self, slice: &ResolvedSlice, slice_index: usize) -> GfResult<FilledValues>;
}
