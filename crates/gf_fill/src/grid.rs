// crates/gf_fill/src/grid.rs

//! 格点数组视图
//!
//! 校验数据、掩膜与坐标的形状一致性，并把任意轴序的输入
//! 统一看作 (time, lat, lon) 的三维视图。
//!
//! # 形状规则
//!
//! - 二维数组 (lat, lon)：不能指定时间轴，整体视为一个时间片
//! - 三维数组：必须指定时间轴，可以是任意一个轴，
//!   其余两个轴按原顺序依次为纬度、经度
//! - 掩膜形状必须为 (lat, lon)，坐标长度必须与对应轴一致
//!
//! 任何不一致都返回形状错误，不产生部分结果。

use gf_foundation::{GfError, GfResult};
use gf_geo::Point2D;
use ndarray::{Array2, Array3, ArrayD, ArrayView1, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix3, IxDyn};

/// 时间/空间轴布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// 输入数组形状
    shape: Vec<usize>,
    /// 时间轴位置（二维输入为 `None`）
    time_axis: Option<usize>,
    /// 输入轴到 (time, lat, lon) 的排列
    order: [usize; 3],
}

impl GridLayout {
    /// 根据输入形状和时间轴构建布局
    pub fn new(shape: &[usize], time_axis: Option<usize>) -> GfResult<Self> {
        let order = match (shape.len(), time_axis) {
            (2, None) => [0, 0, 1],
            (3, Some(t)) if t < 3 => {
                let mut spatial = (0..3).filter(|&a| a != t);
                match (spatial.next(), spatial.next()) {
                    (Some(lat), Some(lon)) => [t, lat, lon],
                    _ => return Err(GfError::invalid_input("无法确定空间轴")),
                }
            }
            (3, Some(t)) => {
                return Err(GfError::invalid_input(format!(
                    "时间轴 {} 超出三维数组范围",
                    t
                )))
            }
            (2, Some(_)) => return Err(GfError::size_mismatch("grid.ndim", 3, 2)),
            (ndim, _) => {
                let expected = if time_axis.is_some() { 3 } else { 2 };
                return Err(GfError::size_mismatch("grid.ndim", expected, ndim));
            }
        };

        Ok(Self {
            shape: shape.to_vec(),
            time_axis,
            order,
        })
    }

    /// 输入数组形状
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// 时间轴位置
    pub fn time_axis(&self) -> Option<usize> {
        self.time_axis
    }

    /// 时间片数量
    pub fn n_slices(&self) -> usize {
        self.time_axis.map_or(1, |t| self.shape[t])
    }

    /// 空间形状 (lat, lon)
    pub fn spatial_shape(&self) -> (usize, usize) {
        match self.time_axis {
            Some(_) => (self.shape[self.order[1]], self.shape[self.order[2]]),
            None => (self.shape[0], self.shape[1]),
        }
    }

    /// 把处理后的时间片按索引顺序拼回输入轴序
    pub fn reassemble(&self, slices: Vec<Array2<f64>>) -> GfResult<ArrayD<f64>> {
        GfError::check_size("slices", self.n_slices(), slices.len())?;
        let (n_lat, n_lon) = self.spatial_shape();

        let mut stacked = Array3::from_elem((slices.len(), n_lat, n_lon), f64::NAN);
        for (t, slice) in slices.iter().enumerate() {
            GfError::check_shape("slice", &[n_lat, n_lon], slice.shape())?;
            stacked.index_axis_mut(Axis(0), t).assign(slice);
        }

        let output = match self.time_axis {
            None => stacked.index_axis_move(Axis(0), 0).into_dyn(),
            Some(_) => {
                let mut inverse = [0usize; 3];
                for (k, &axis) in self.order.iter().enumerate() {
                    inverse[axis] = k;
                }
                stacked
                    .into_dyn()
                    .permuted_axes(IxDyn(&inverse))
                    .as_standard_layout()
                    .into_owned()
            }
        };
        Ok(output)
    }
}

/// 经过形状校验的只读格点视图
#[derive(Debug, Clone)]
pub struct GridView<'a> {
    data: ArrayView3<'a, f64>,
    mask: Option<ArrayView2<'a, bool>>,
    lat: ArrayView1<'a, f64>,
    lon: ArrayView1<'a, f64>,
    layout: GridLayout,
}

impl<'a> GridView<'a> {
    /// 校验并构建视图
    ///
    /// # 参数
    /// - `grid`: 二维 (lat, lon) 或三维数据
    /// - `mask`: 可选掩膜，`true` 表示域内格点
    /// - `lat`, `lon`: 一维坐标
    /// - `time_axis`: 三维数据的时间轴位置
    pub fn new(
        grid: ArrayViewD<'a, f64>,
        mask: Option<ArrayView2<'a, bool>>,
        lat: ArrayView1<'a, f64>,
        lon: ArrayView1<'a, f64>,
        time_axis: Option<usize>,
    ) -> GfResult<Self> {
        let layout = GridLayout::new(grid.shape(), time_axis)?;
        let (n_lat, n_lon) = layout.spatial_shape();

        GfError::check_size("lat", n_lat, lat.len())?;
        GfError::check_size("lon", n_lon, lon.len())?;
        if let Some(m) = &mask {
            GfError::check_shape("mask", &[n_lat, n_lon], m.shape())?;
        }
        for (name, axis) in [("lat", &lat), ("lon", &lon)] {
            if let Some(k) = axis.iter().position(|v| !v.is_finite()) {
                return Err(GfError::invalid_input(format!(
                    "{} 坐标第 {} 个值不是有限数: {}",
                    name, k, axis[k]
                )));
            }
        }

        let canonical = match time_axis {
            Some(_) => grid.permuted_axes(IxDyn(&layout.order)),
            None => grid.insert_axis(Axis(0)),
        };
        let data = canonical
            .into_dimensionality::<Ix3>()
            .map_err(|e| GfError::invalid_input(e.to_string()))?;

        Ok(Self {
            data,
            mask,
            lat,
            lon,
            layout,
        })
    }

    /// 轴布局
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// 时间片数量
    pub fn n_slices(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// 第 `t` 个时间片 (lat, lon)
    pub fn slice(&self, t: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(0), t)
    }

    /// 掩膜
    pub fn mask(&self) -> Option<ArrayView2<'_, bool>> {
        self.mask.as_ref().map(|m| m.view())
    }

    /// 格点坐标（x = 经度, y = 纬度）
    #[inline]
    pub fn point(&self, i: usize, j: usize) -> Point2D {
        Point2D::from_lonlat(self.lon[j], self.lat[i])
    }
}
