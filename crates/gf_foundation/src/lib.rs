// crates/gf_foundation/src/lib.rs

//! GapFill Foundation Layer
//!
//! 基础层，提供整个工作区共享的错误类型。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 4: gf_fill        ─> 掩膜解析、插补器、时间片编排
//! Layer 3: gf_config      ─> 方法枚举、配置加载
//! Layer 2: gf_geo         ─> 点、空间索引、三角剖分
//! Layer 1: gf_foundation  ─> 错误类型 (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

// 重导出常用类型
pub use error::{GfError, GfResult};
