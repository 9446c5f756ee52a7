// crates/gf_fill/src/mask.rs

//! 掩膜解析
//!
//! 把一个时间片划分为有效集（掩膜内且非 NaN）与缺测集（掩膜内且为 NaN），
//! 掩膜外的格点两者都不属于。两集合均按行优先顺序排列。

use gf_geo::Point2D;
use ndarray::ArrayView2;

use crate::grid::GridView;

/// 已划分的时间片
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSlice {
    /// 有效点坐标
    pub valid_points: Vec<Point2D>,
    /// 有效点值
    pub valid_values: Vec<f64>,
    /// 缺测点坐标
    pub missing_points: Vec<Point2D>,
    /// 缺测点在时间片中的 (lat, lon) 索引
    pub missing_cells: Vec<(usize, usize)>,
}

impl ResolvedSlice {
    /// 有效点数量
    pub fn n_valid(&self) -> usize {
        self.valid_points.len()
    }

    /// 缺测点数量
    pub fn n_missing(&self) -> usize {
        self.missing_points.len()
    }
}

/// 掩膜解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum SliceResolution {
    /// 掩膜内没有缺测，无需插补
    NoMissing,
    /// 掩膜内没有有效点，无法插补
    NoValid {
        /// 缺测格点数
        missing: usize,
    },
    /// 可以交给插补器
    Ready(ResolvedSlice),
}

/// 解析第 `t` 个时间片
pub fn resolve_slice(grid: &GridView<'_>, t: usize) -> SliceResolution {
    resolve(grid.slice(t), grid.mask(), |i, j| grid.point(i, j))
}

/// 按掩膜划分时间片
///
/// `mask` 为 `None` 时所有格点都在域内。
pub fn resolve<F>(slice: ArrayView2<'_, f64>, mask: Option<ArrayView2<'_, bool>>, point: F) -> SliceResolution
where
    F: Fn(usize, usize) -> Point2D,
{
    let mut resolved = ResolvedSlice::default();

    for ((i, j), &value) in slice.indexed_iter() {
        if let Some(m) = &mask {
            if !m[[i, j]] {
                continue;
            }
        }
        if value.is_nan() {
            resolved.missing_points.push(point(i, j));
            resolved.missing_cells.push((i, j));
        } else {
            resolved.valid_points.push(point(i, j));
            resolved.valid_values.push(value);
        }
    }

    if resolved.missing_cells.is_empty() {
        SliceResolution::NoMissing
    } else if resolved.valid_points.is_empty() {
        SliceResolution::NoValid {
            missing: resolved.missing_cells.len(),
        }
    } else {
        SliceResolution::Ready(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn point(i: usize, j: usize) -> Point2D {
        Point2D::new(j as f64, i as f64)
    }

    #[test]
    fn test_resolve_without_mask() {
        let slice = array![[1.0, f64::NAN], [3.0, 4.0]];
        match resolve(slice.view(), None, point) {
            SliceResolution::Ready(r) => {
                assert_eq!(r.n_valid(), 3);
                assert_eq!(r.n_missing(), 1);
                assert_eq!(r.missing_cells, vec![(0, 1)]);
                assert_eq!(r.missing_points, vec![Point2D::new(1.0, 0.0)]);
                assert_eq!(r.valid_values, vec![1.0, 3.0, 4.0]);
            }
            other => panic!("期望 Ready, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_resolve_with_mask() {
        let slice = array![[1.0, f64::NAN], [f64::NAN, 4.0]];
        let mask = array![[true, true], [false, false]];
        match resolve(slice.view(), Some(mask.view()), point) {
            SliceResolution::Ready(r) => {
                // (1,0) 与 (1,1) 在掩膜外，既不是有效点也不是缺测
                assert_eq!(r.valid_values, vec![1.0]);
                assert_eq!(r.missing_cells, vec![(0, 1)]);
            }
            other => panic!("期望 Ready, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_no_missing() {
        let slice = array![[1.0, f64::NAN], [3.0, 4.0]];
        let mask = array![[true, false], [true, true]];
        assert_eq!(resolve(slice.view(), Some(mask.view()), point), SliceResolution::NoMissing);
    }

    #[test]
    fn test_no_valid() {
        let slice = Array2::from_elem((2, 3), f64::NAN);
        assert_eq!(
            resolve(slice.view(), None, point),
            SliceResolution::NoValid { missing: 6 }
        );
    }

    #[test]
    fn test_all_masked_out() {
        let slice = Array2::from_elem((2, 2), f64::NAN);
        let mask = Array2::from_elem((2, 2), false);
        assert_eq!(resolve(slice.view(), Some(mask.view()), point), SliceResolution::NoMissing);
    }
}
