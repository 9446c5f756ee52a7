// crates/gf_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `GfError` 枚举和 `GfResult` 类型别名，用于整个工作区的错误处理。
//!
//! # 错误分类
//!
//! | 类别 | 变体 | 是否致命 |
//! |------|------|---------|
//! | 配置错误 | `Config`, `InvalidConfig`, `UnknownVariable`, `UnknownDimension` | 是，在处理任何时间片之前失败 |
//! | 形状不匹配 | `ShapeMismatch`, `SizeMismatch` | 是，不返回部分结果 |
//! | 数值失败 | `Numerical` | 否，由时间片迭代器转换为跳过记录 |
//!
//! 数据不足（无有效点、有效点少于阈值）不是错误，而是写入
//! 填补报告的时间片结果。
//!
//! # 示例
//!
//! ```
//! use gf_foundation::error::{GfError, GfResult};
//!
//! fn pick_variable(name: &str) -> GfResult<()> {
//!     Err(GfError::unknown_variable(name))
//! }
//!
//! assert!(pick_variable("chl").is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type GfResult<T> = Result<T, GfError>;

/// GapFill 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GfError {
    // ========================================================================
    // 配置错误
    // ========================================================================
    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 变量不存在
    #[error("变量 '{name}' 在数据集中不存在")]
    UnknownVariable {
        /// 请求的变量名
        name: String,
    },

    /// 维度不存在
    #[error("维度 '{name}' 不存在于变量 '{variable}' 中")]
    UnknownDimension {
        /// 请求的维度名
        name: String,
        /// 所属变量
        variable: String,
    },

    // ========================================================================
    // 形状错误
    // ========================================================================
    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 数组形状不一致
    #[error("数组形状不一致: {name} 期望{expected:?}, 实际{actual:?}")]
    ShapeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望形状
        expected: Vec<usize>,
        /// 实际形状
        actual: Vec<usize>,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    // ========================================================================
    // 数值错误
    // ========================================================================
    /// 数值计算失败（病态矩阵、退化点集等）
    #[error("数值计算失败: {message}")]
    Numerical {
        /// 失败原因
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl GfError {
    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 变量不存在
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Self::UnknownVariable { name: name.into() }
    }

    /// 维度不存在
    pub fn unknown_dimension(name: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::UnknownDimension {
            name: name.into(),
            variable: variable.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 数组形状不一致
    pub fn shape_mismatch(name: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            name,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数值计算失败
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    /// 是否属于配置类错误
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::InvalidConfig { .. }
                | Self::UnknownVariable { .. }
                | Self::UnknownDimension { .. }
        )
    }

    /// 是否属于形状类错误
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. } | Self::SizeMismatch { .. })
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl GfError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> GfResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查数组形状是否一致
    #[inline]
    pub fn check_shape(name: &'static str, expected: &[usize], actual: &[usize]) -> GfResult<()> {
        if expected != actual {
            Err(Self::shape_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }
}
