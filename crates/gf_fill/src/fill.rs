// crates/gf_fill/src/fill.rs

//! 插补入口
//!
//! 两个入口函数分别对应散点插值和 RBF 插值，共享同一套时间片迭代流程。
//! 配置与形状在处理任何时间片之前校验，失败时不返回部分结果。
//!
//! # 示例
//!
//! ```
//! use gf_config::{ScatteredConfig, ScatteredMethod};
//! use gf_fill::fill_nearest_like;
//! use ndarray::{Array1, Array2};
//!
//! let mut grid = Array2::from_elem((3, 3), 2.0);
//! grid[[1, 1]] = f64::NAN;
//! let lat = Array1::from(vec![0.0, 1.0, 2.0]);
//! let lon = Array1::from(vec![10.0, 11.0, 12.0]);
//!
//! let output = fill_nearest_like(
//!     grid.view().into_dyn(),
//!     None,
//!     lat.view(),
//!     lon.view(),
//!     &ScatteredConfig::new(ScatteredMethod::Linear),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(output.grid[[1, 1]], 2.0);
//! assert!(output.report.is_complete());
//! ```

use gf_config::{FillStrategy, RbfConfig, ScatteredConfig};
use gf_foundation::GfResult;
use ndarray::{ArrayView1, ArrayView2, ArrayViewD};

use crate::grid::GridView;
use crate::interpolation::{GapFiller, RbfFiller, ScatteredFiller};
use crate::slicer::{FillOutput, SliceIterator};

/// 最近邻 / 线性 / 三次插补
///
/// # 参数
/// - `grid`: 二维 (lat, lon) 或三维数据，NaN 表示缺测
/// - `mask`: 可选掩膜，`false` 的格点在输出中一律为 NaN
/// - `lat`, `lon`: 一维坐标
/// - `config`: 插值方法与回填选项
/// - `time_axis`: 三维数据的时间轴位置
pub fn fill_nearest_like<'a>(
    grid: ArrayViewD<'a, f64>,
    mask: Option<ArrayView2<'a, bool>>,
    lat: ArrayView1<'a, f64>,
    lon: ArrayView1<'a, f64>,
    config: &ScatteredConfig,
    time_axis: Option<usize>,
) -> GfResult<FillOutput> {
    let view = GridView::new(grid, mask, lat, lon, time_axis)?;
    fill_view(&view, &FillStrategy::Scattered(config.clone()), false)
}

/// RBF 插补
///
/// 参数同 [`fill_nearest_like`]。有效点少于 `config.min_points` 的时间片被跳过，
/// 拟合失败的时间片保持缺测，其余时间片照常处理。
pub fn fill_rbf<'a>(
    grid: ArrayViewD<'a, f64>,
    mask: Option<ArrayView2<'a, bool>>,
    lat: ArrayView1<'a, f64>,
    lon: ArrayView1<'a, f64>,
    config: &RbfConfig,
    time_axis: Option<usize>,
) -> GfResult<FillOutput> {
    let view = GridView::new(grid, mask, lat, lon, time_axis)?;
    fill_view(&view, &FillStrategy::Rbf(config.clone()), false)
}

/// 按策略插补已校验的视图
pub fn fill_view(view: &GridView<'_>, strategy: &FillStrategy, parallel: bool) -> GfResult<FillOutput> {
    strategy.validate()?;
    let filler = build_filler(strategy);
    log::debug!(
        "{} 插补: {} 个时间片, 空间形状 {:?}, 并行={}",
        filler.name(),
        view.n_slices(),
        view.layout().spatial_shape(),
        parallel
    );
    SliceIterator::new(filler.as_ref()).parallel(parallel).run(view)
}

/// 根据策略构建插补器
pub fn build_filler(strategy: &FillStrategy) -> Box<dyn GapFiller> {
    match strategy {
        FillStrategy::Scattered(cfg) => Box::new(ScatteredFiller::new(cfg.clone())),
        FillStrategy::Rbf(cfg) => Box::new(RbfFiller::new(cfg.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_config::RbfKernel;
    use ndarray::{Array1, Array2};

    #[test]
    fn test_invalid_rbf_config_fails_fast() {
        let grid = Array2::from_elem((3, 3), 1.0);
        let coords = Array1::from(vec![0.0, 1.0, 2.0]);
        let config = RbfConfig::new(RbfKernel::Gaussian).with_epsilon(-1.0);
        let err = fill_rbf(grid.view().into_dyn(), None, coords.view(), coords.view(), &config, None)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_build_filler_names() {
        assert_eq!(build_filler(&FillStrategy::default()).name(), "nearest");
        assert_eq!(build_filler(&FillStrategy::Rbf(RbfConfig::default())).name(), "rbf");
    }
}
