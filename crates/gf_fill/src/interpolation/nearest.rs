// crates/gf_fill/src/interpolation/nearest.rs

//! 最近邻查询
//!
//! 有效点值取自最近的有效点。R-tree 由相同输入批量构建，
//! 距离相等时的选择在多次运行间保持一致。

use gf_geo::{Point2D, SpatialIndex};

/// 有效点的最近邻查找表
pub struct NearestLookup<'a> {
    index: SpatialIndex<usize>,
    values: &'a [f64],
}

impl<'a> NearestLookup<'a> {
    /// 从有效点构建
    pub fn new(points: &[Point2D], values: &'a [f64]) -> Self {
        let entries = points.iter().copied().zip(0..values.len()).collect();
        Self {
            index: SpatialIndex::bulk_load(entries),
            values,
        }
    }

    /// 查询点的最近邻值，没有有效点时为 NaN
    pub fn value_at(&self, p: &Point2D) -> f64 {
        self.index
            .nearest(p)
            .map_or(f64::NAN, |(_, &idx)| self.values[idx])
    }

    /// 用最近邻值替换 `values` 中的 NaN，返回替换个数
    pub fn backfill(&self, targets: &[Point2D], values: &mut [f64]) -> usize {
        let mut count = 0;
        for (p, v) in targets.iter().zip(values.iter_mut()) {
            if v.is_nan() {
                *v = self.value_at(p);
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_at() {
        let points = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)];
        let values = vec![1.0, 2.0];
        let lookup = NearestLookup::new(&points, &values);
        assert_eq!(lookup.value_at(&Point2D::new(2.0, 5.0)), 1.0);
        assert_eq!(lookup.value_at(&Point2D::new(8.0, -3.0)), 2.0);
    }

    #[test]
    fn test_backfill_only_nan() {
        let points = vec![Point2D::new(0.0, 0.0)];
        let values = vec![7.0];
        let lookup = NearestLookup::new(&points, &values);

        let targets = vec![Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0)];
        let mut out = vec![3.0, f64::NAN];
        assert_eq!(lookup.backfill(&targets, &mut out), 1);
        assert_eq!(out, vec![3.0, 7.0]);
    }

    #[test]
    fn test_empty_lookup() {
        let lookup = NearestLookup::new(&[], &[]);
        assert!(lookup.value_at(&Point2D::ZERO).is_nan());
    }
}
