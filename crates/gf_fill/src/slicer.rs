// crates/gf_fill/src/slicer.rs

//! 时间片迭代器
//!
//! 每个时间片是独立的纯函数：读取只读视图，返回新的输出时间片和报告。
//! 串行或并行（rayon）执行，最终按索引顺序拼回完整数组。
//!
//! # 单个时间片的状态
//!
//! ```text
//! 掩膜解析 ─┬─ 无缺测 ──────────────────────────┐
//!           ├─ 无有效点 ────────────────────────┤
//!           ├─ 点数不足 ────────────────────────┼─> 重新施加掩膜 ─> 完成
//!           └─ 插补 ─┬─ [最近邻回填] ───────────┤
//!                    └─ 拟合失败 ───────────────┘
//! ```

use ndarray::{Array2, ArrayD};
use rayon::prelude::*;

use gf_foundation::GfResult;

use crate::compositor::compose;
use crate::grid::GridView;
use crate::interpolation::GapFiller;
use crate::mask::{resolve_slice, SliceResolution};
use crate::report::{FillReport, SliceOutcome, SliceReport};

/// 插补结果
#[derive(Debug, Clone)]
pub struct FillOutput {
    /// 与输入同形状的新数组
    pub grid: ArrayD<f64>,
    /// 逐时间片报告
    pub report: FillReport,
}

/// 时间片迭代器
pub struct SliceIterator<'f> {
    filler: &'f dyn GapFiller,
    parallel: bool,
}

impl<'f> SliceIterator<'f> {
    /// 创建串行迭代器
    pub fn new(filler: &'f dyn GapFiller) -> Self {
        Self {
            filler,
            parallel: false,
        }
    }

    /// 设置是否并行处理时间片
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 处理所有时间片
    pub fn run(&self, grid: &GridView<'_>) -> GfResult<FillOutput> {
        let n = grid.n_slices();
        let results: Vec<(Array2<f64>, SliceReport)> = if self.parallel {
            (0..n)
                .into_par_iter()
                .map(|t| self.process(grid, t))
                .collect()
        } else {
            (0..n).map(|t| self.process(grid, t)).collect()
        };

        let (slices, reports): (Vec<_>, Vec<_>) = results.into_iter().unzip();
        let report = FillReport {
            method: self.filler.name(),
            slices: reports,
        };

        log::info!(
            "{} 插补完成: {} 个时间片, 插补 {}, 跳过 {} (拟合失败 {})",
            report.method,
            report.len(),
            report.filled_count(),
            report.skipped_count(),
            report.failed_count()
        );

        Ok(FillOutput {
            grid: grid.layout().reassemble(slices)?,
            report,
        })
    }

    /// 处理单个时间片
    fn process(&self, grid: &GridView<'_>, t: usize) -> (Array2<f64>, SliceReport) {
        log::debug!("时间片 {}/{}", t + 1, grid.n_slices());
        let slice = grid.slice(t);
        let mask = grid.mask();

        let resolved = match resolve_slice(grid, t) {
            SliceResolution::NoMissing => {
                let (out, _) = compose(slice, None, mask);
                return (out, SliceReport::unfilled(t, SliceOutcome::NoMissing, 0));
            }
            SliceResolution::NoValid { missing } => {
                log::warn!("时间片 {}: 没有有效点，{} 个缺测保持为 NaN", t, missing);
                let (out, _) = compose(slice, None, mask);
                return (out, SliceReport::unfilled(t, SliceOutcome::NoValidData, missing));
            }
            SliceResolution::Ready(resolved) => resolved,
        };

        let missing = resolved.n_missing();
        let required = self.filler.min_valid_points();
        if resolved.n_valid() < required {
            log::warn!(
                "时间片 {}: 有效点 {} 个，少于 {} 所需的 {} 个，跳过",
                t,
                resolved.n_valid(),
                self.filler.name(),
                required
            );
            let outcome = SliceOutcome::InsufficientData {
                valid: resolved.n_valid(),
                required,
            };
            let (out, _) = compose(slice, None, mask);
            return (out, SliceReport::unfilled(t, outcome, missing));
        }

        match self.filler.fill(&resolved, t) {
            Ok(filled) => {
                let (out, written) = compose(
                    slice,
                    Some((resolved.missing_cells.as_slice(), filled.values.as_slice())),
                    mask,
                );
                let report = SliceReport {
                    index: t,
                    outcome: SliceOutcome::Filled,
                    missing_cells: missing,
                    filled_cells: written,
                    fallback_cells: filled.fallback_points,
                    fit_points: filled.fit_points,
                };
                (out, report)
            }
            Err(e) => {
                log::warn!("时间片 {}: {} 拟合失败: {}", t, self.filler.name(), e);
                let outcome = SliceOutcome::FitFailed {
                    reason: e.to_string(),
                };
                let (out, _) = compose(slice, None, mask);
                (out, SliceReport::unfilled(t, outcome, missing))
            }
        }
    }
}
