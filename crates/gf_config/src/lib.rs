// crates/gf_config/src/lib.rs

//! GapFill 配置层
//!
//! 提供插值方法枚举、RBF 核函数和缺测插补配置。
//!
//! # 模块
//!
//! - `method`: 散点插值方法与 RBF 核函数
//! - `fill_config`: 变量选择、插补策略、JSON 读写
//! - `error`: 配置错误
//!
//! # 示例
//!
//! ```
//! use gf_config::{FillConfig, FillStrategy, RbfConfig, VariableSelection};
//!
//! let config = FillConfig::new(
//!     VariableSelection::new("CHL"),
//!     FillStrategy::Rbf(RbfConfig::default().with_seed(42)),
//! );
//! assert!(config.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fill_config;
pub mod method;

pub use error::ConfigError;
pub use fill_config::{FillConfig, FillStrategy, RbfConfig, ScatteredConfig, VariableSelection};
pub use method::{RbfKernel, ScatteredMethod};
