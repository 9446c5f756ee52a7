// crates/gf_geo/src/spatial_index.rs

//! 空间索引实现
//!
//! 基于 R-tree 的点索引，用于最近邻回退查询。
//!
//! # 示例
//!
//! ```
//! use gf_geo::spatial_index::SpatialIndex;
//! use gf_geo::geometry::Point2D;
//!
//! let index = SpatialIndex::bulk_load(vec![
//!     (Point2D::new(10.0, 20.0), 1u32),
//!     (Point2D::new(15.0, 25.0), 2u32),
//! ]);
//!
//! let (_, id) = index.nearest(&Point2D::new(11.0, 21.0)).unwrap();
//! assert_eq!(*id, 1);
//! ```

use crate::geometry::Point2D;
use rstar::{RTree, RTreeObject, AABB};

/// 空间索引条目
#[derive(Debug, Clone)]
struct SpatialEntry<T> {
    point: Point2D,
    data: T,
}

impl<T> RTreeObject for SpatialEntry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x, self.point.y])
    }
}

impl<T> rstar::PointDistance for SpatialEntry<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point.x - point[0];
        let dy = self.point.y - point[1];
        dx * dx + dy * dy
    }
}

/// 空间索引
///
/// 批量构建后只读，相同输入得到相同的树结构，因此最近邻查询的
/// 并列结果在多次运行间保持稳定。
pub struct SpatialIndex<T> {
    tree: RTree<SpatialEntry<T>>,
}

impl<T> SpatialIndex<T> {
    /// 从点集批量构建
    #[must_use]
    pub fn bulk_load(points: Vec<(Point2D, T)>) -> Self {
        let entries: Vec<SpatialEntry<T>> = points
            .into_iter()
            .map(|(point, data)| SpatialEntry { point, data })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// 查询最近的点
    #[must_use]
    pub fn nearest(&self, point: &Point2D) -> Option<(&Point2D, &T)> {
        self.tree
            .nearest_neighbor(&[point.x, point.y])
            .map(|entry| (&entry.point, &entry.data))
    }

    /// 返回索引中的点数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// 检查索引是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
