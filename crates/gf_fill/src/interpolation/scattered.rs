// crates/gf_fill/src/interpolation/scattered.rs

//! 散点插补器
//!
//! 在 (经度, 纬度) 欧氏平面上对有效点做最近邻、线性或三次插值。
//! 线性和三次方法在有效点凸包外没有定义，这些点（以及退化输入下
//! 任何残留的 NaN）由最近邻回填。

use gf_config::{ScatteredConfig, ScatteredMethod};
use gf_foundation::GfResult;
use gf_geo::Triangulation;

use super::cubic::CubicPatches;
use super::nearest::NearestLookup;
use super::{FilledValues, GapFiller};
use crate::mask::ResolvedSlice;

/// 最近邻 / 线性 / 三次插补器
#[derive(Debug, Clone)]
pub struct ScatteredFiller {
    config: ScatteredConfig,
}

impl ScatteredFiller {
    /// 创建插补器
    pub fn new(config: ScatteredConfig) -> Self {
        Self { config }
    }

    /// 配置
    pub fn config(&self) -> &ScatteredConfig {
        &self.config
    }

    /// 线性插值，凸包外为 NaN
    fn linear(tri: &Triangulation, slice: &ResolvedSlice) -> Vec<f64> {
        let values = &slice.valid_values;
        slice
            .missing_points
            .iter()
            .map(|p| match tri.locate(p) {
                Some(loc) => {
                    let [i0, i1, i2] = loc.vertices;
                    let [_, w1, w2] = loc.weights;
                    // 以顶点 0 为基准展开，常数场结果精确
                    values[i0] + w1 * (values[i1] - values[i0]) + w2 * (values[i2] - values[i0])
                }
                None => f64::NAN,
            })
            .collect()
    }

    /// 三次插值，凸包外为 NaN
    fn cubic(tri: &Triangulation, slice: &ResolvedSlice) -> Vec<f64> {
        let patches = CubicPatches::new(tri, &slice.valid_values);
        slice
            .missing_points
            .iter()
            .map(|p| patches.evaluate(p).unwrap_or(f64::NAN))
            .collect()
    }
}

impl GapFiller for ScatteredFiller {
    fn name(&self) -> &'static str {
        self.config.method.name()
    }

    fn fill(&self, slice: &ResolvedSlice, _slice_index: usize) -> GfResult<FilledValues> {
        let lookup = NearestLookup::new(&slice.valid_points, &slice.valid_values);

        let method = self.config.method;
        let mut values = if method.needs_triangulation() {
            let tri = Triangulation::new(&slice.valid_points);
            if tri.is_empty() {
                log::debug!(
                    "{} 个有效点无法构成三角剖分，全部使用最近邻",
                    slice.n_valid()
                );
            }
            match method {
                ScatteredMethod::Cubic => Self::cubic(&tri, slice),
                _ => Self::linear(&tri, slice),
            }
        } else {
            slice
                .missing_points
                .iter()
                .map(|p| lookup.value_at(p))
                .collect()
        };

        let fallback_points = if self.config.fallback_to_nearest {
            lookup.backfill(&slice.missing_points, &mut values)
        } else {
            0
        };

        Ok(FilledValues {
            values,
            fallback_points,
            fit_points: slice.n_valid(),
        })
    }
}
