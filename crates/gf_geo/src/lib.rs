// crates/gf_geo/src/lib.rs

//! GapFill 几何层
//!
//! 为散点插值提供几何基础设施。
//!
//! # 模块
//!
//! - `geometry`: 2D点类型（x = 经度, y = 纬度）
//! - `spatial_index`: 基于 R-tree 的点索引（最近邻查询）
//! - `triangulation`: Bowyer-Watson Delaunay 三角剖分与点定位
//!
//! # 示例
//!
//! ```
//! use gf_geo::prelude::*;
//!
//! let points = vec![
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(1.0, 0.0),
//!     Point2D::new(0.0, 1.0),
//! ];
//! let tri = Triangulation::new(&points);
//! assert_eq!(tri.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod geometry;
pub mod spatial_index;
pub mod triangulation;

/// 预导入模块
pub mod prelude {
    pub use crate::geometry::Point2D;
    pub use crate::spatial_index::SpatialIndex;
    pub use crate::triangulation::{Location, Triangulation};
}

// 重导出常用类型
pub use geometry::Point2D;
pub use spatial_index::SpatialIndex;
pub use triangulation::{Location, Triangulation};
