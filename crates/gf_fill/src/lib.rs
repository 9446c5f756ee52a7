// crates/gf_fill/src/lib.rs

//! GapFill 核心
//!
//! 对格点时空数据（叶绿素、海表温度、初级生产力等）在掩膜内的缺测值
//! 做空间插补。数组可以是二维 (lat, lon) 或带时间轴的三维数据，
//! 每个时间片独立处理。
//!
//! # 处理流程
//!
//! ```text
//! 完整数组 ─> 时间片迭代器 ─> (每个时间片) 掩膜解析 ─> 插补器 ─> 结果合成 ─> 完整数组
//! ```
//!
//! # 模块
//!
//! - [`grid`]: 形状校验与轴序统一
//! - [`mask`]: 有效集/缺测集划分
//! - [`interpolation`]: 最近邻、线性、三次、RBF 插补器
//! - [`compositor`]: 写回插补值并重新施加掩膜
//! - [`slicer`]: 串行或并行的时间片迭代
//! - [`report`]: 逐时间片填补报告
//! - [`fill`]: 入口函数
//! - [`dataset`]: 按变量名/维度名选择数据的内存数据集
//!
//! # 错误
//!
//! 配置错误与形状错误在处理任何时间片之前返回；数据不足和拟合失败
//! 只影响对应时间片，记录在 [`FillReport`] 中。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compositor;
pub mod dataset;
pub mod fill;
pub mod grid;
pub mod interpolation;
pub mod mask;
pub mod report;
pub mod slicer;

pub use dataset::{fill_with_config, DataArray, Dataset};
pub use fill::{fill_nearest_like, fill_rbf, fill_view};
pub use grid::{GridLayout, GridView};
pub use interpolation::{FilledValues, GapFiller, RbfFiller, ScatteredFiller};
pub use mask::{ResolvedSlice, SliceResolution};
pub use report::{FillReport, SliceOutcome, SliceReport};
pub use slicer::{FillOutput, SliceIterator};

// 重导出配置类型，调用方无需直接依赖 gf_config
pub use gf_config::{
    FillConfig, FillStrategy, RbfConfig, RbfKernel, ScatteredConfig, ScatteredMethod,
    VariableSelection,
};
pub use gf_foundation::{GfError, GfResult};
