// crates/gf_fill/src/report.rs

//! 填补报告
//!
//! 每个时间片产生一条 [`SliceReport`]，调用方据此判断整体完整性，
//! 而不必解析日志。

use std::fmt;

/// 时间片处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum SliceOutcome {
    /// 已插补
    Filled,
    /// 掩膜内没有缺测，原样输出
    NoMissing,
    /// 没有有效点，缺测保持 NaN
    NoValidData,
    /// 有效点数低于插补器阈值，缺测保持 NaN
    InsufficientData {
        /// 有效点数
        valid: usize,
        /// 所需最少点数
        required: usize,
    },
    /// 拟合失败，缺测保持 NaN
    FitFailed {
        /// 失败原因
        reason: String,
    },
}

impl SliceOutcome {
    /// 是否执行了插补
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled)
    }

    /// 是否留下了未插补的缺测
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::NoValidData | Self::InsufficientData { .. } | Self::FitFailed { .. }
        )
    }
}

impl fmt::Display for SliceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filled => write!(f, "已插补"),
            Self::NoMissing => write!(f, "无缺测"),
            Self::NoValidData => write!(f, "无有效点"),
            Self::InsufficientData { valid, required } => {
                write!(f, "有效点不足 ({} < {})", valid, required)
            }
            Self::FitFailed { reason } => write!(f, "拟合失败: {}", reason),
        }
    }
}

/// 单个时间片的报告
#[derive(Debug, Clone, PartialEq)]
pub struct SliceReport {
    /// 时间片索引
    pub index: usize,
    /// 处理结果
    pub outcome: SliceOutcome,
    /// 掩膜内缺测格点数
    pub missing_cells: usize,
    /// 写入有限值的缺测格点数
    pub filled_cells: usize,
    /// 由最近邻回填的格点数
    pub fallback_cells: usize,
    /// 参与拟合的有效点数（RBF 抽样后）
    pub fit_points: usize,
}

impl SliceReport {
    /// 创建未插补时间片的报告
    pub fn unfilled(index: usize, outcome: SliceOutcome, missing_cells: usize) -> Self {
        Self {
            index,
            outcome,
            missing_cells,
            filled_cells: 0,
            fallback_cells: 0,
            fit_points: 0,
        }
    }

    /// 输出中仍为 NaN 的掩膜内缺测格点数
    pub fn remaining_gaps(&self) -> usize {
        self.missing_cells.saturating_sub(self.filled_cells)
    }
}

/// 整个数组的填补报告
#[derive(Debug, Clone, PartialEq)]
pub struct FillReport {
    /// 插补方法名
    pub method: &'static str,
    /// 按索引排列的时间片报告
    pub slices: Vec<SliceReport>,
}

impl FillReport {
    /// 时间片数量
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// 是否没有时间片
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// 已插补的时间片数
    pub fn filled_count(&self) -> usize {
        self.slices.iter().filter(|s| s.outcome.is_filled()).count()
    }

    /// 留下缺测的时间片数（无有效点、点数不足、拟合失败）
    pub fn skipped_count(&self) -> usize {
        self.slices.iter().filter(|s| s.outcome.is_skipped()).count()
    }

    /// 拟合失败的时间片数
    pub fn failed_count(&self) -> usize {
        self.slices
            .iter()
            .filter(|s| matches!(s.outcome, SliceOutcome::FitFailed { .. }))
            .count()
    }

    /// 掩膜内缺测全部被填补：没有时间片被跳过，
    /// 已插补的时间片也没有留下 NaN（关闭最近邻回填时可能发生）
    pub fn is_complete(&self) -> bool {
        self.skipped_count() == 0 && self.slices.iter().all(|s| s.remaining_gaps() == 0)
    }

    /// 所有时间片中仍为 NaN 的掩膜内缺测格点总数
    pub fn remaining_gaps(&self) -> usize {
        self.slices.iter().map(SliceReport::remaining_gaps).sum()
    }

    /// 最近邻回填的格点总数
    pub fn fallback_cells(&self) -> usize {
        self.slices.iter().map(|s| s.fallback_cells).sum()
    }

    /// 获取指定时间片的报告
    pub fn slice(&self, index: usize) -> Option<&SliceReport> {
        self.slices.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<SliceOutcome>) -> FillReport {
        FillReport {
            method: "linear",
            slices: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, o)| match o {
                    SliceOutcome::Filled => SliceReport {
                        filled_cells: 3,
                        ..SliceReport::unfilled(i, o, 3)
                    },
                    SliceOutcome::NoMissing => SliceReport::unfilled(i, o, 0),
                    _ => SliceReport::unfilled(i, o, 3),
                })
                .collect(),
        }
    }

    #[test]
    fn test_counts() {
        let r = report(vec![
            SliceOutcome::Filled,
            SliceOutcome::NoMissing,
            SliceOutcome::NoValidData,
            SliceOutcome::FitFailed { reason: "奇异矩阵".into() },
        ]);
        assert_eq!(r.len(), 4);
        assert_eq!(r.filled_count(), 1);
        assert_eq!(r.skipped_count(), 2);
        assert_eq!(r.failed_count(), 1);
        assert!(!r.is_complete());
    }

    #[test]
    fn test_complete() {
        let r = report(vec![SliceOutcome::Filled, SliceOutcome::NoMissing]);
        assert!(r.is_complete());
        assert_eq!(r.slice(1).unwrap().outcome, SliceOutcome::NoMissing);
    }

    #[test]
    fn test_filled_slice_with_gaps_is_incomplete() {
        let mut r = report(vec![SliceOutcome::Filled, SliceOutcome::NoMissing]);
        r.slices[0].filled_cells = 1;
        assert_eq!(r.skipped_count(), 0);
        assert_eq!(r.slices[0].remaining_gaps(), 2);
        assert_eq!(r.remaining_gaps(), 2);
        assert!(!r.is_complete());
    }

    #[test]
    fn test_outcome_display() {
        let o = SliceOutcome::InsufficientData { valid: 9, required: 10 };
        assert!(o.to_string().contains("9 < 10"));
    }
}
