// crates/gf_fill/src/dataset.rs

//! 内存数据集
//!
//! 按名称保存多维变量，通过 [`VariableSelection`] 选出待插补变量、
//! 坐标和掩膜。文件读写由外部负责，本模块只处理已载入内存的数组。
//!
//! # 查找规则
//!
//! - 变量不存在 → `UnknownVariable`
//! - 变量不含纬度/经度维度 → `UnknownDimension`
//! - 坐标变量以维度名命名，必须是一维的
//! - 变量不含时间维度时作为单个时间片处理
//! - 掩膜变量缺失时不使用掩膜；存在时，有限且非零的格点在域内
//!
//! # 示例
//!
//! ```
//! use gf_config::{FillStrategy, VariableSelection};
//! use gf_fill::dataset::{DataArray, Dataset};
//! use ndarray::{Array1, Array2};
//!
//! let mut ds = Dataset::new();
//! ds.insert("latitude", DataArray::coordinate("latitude", Array1::from(vec![0.0, 1.0]))).unwrap();
//! ds.insert("longitude", DataArray::coordinate("longitude", Array1::from(vec![0.0, 1.0]))).unwrap();
//!
//! let mut chl = Array2::from_elem((2, 2), 0.5);
//! chl[[0, 1]] = f64::NAN;
//! ds.insert("CHL", DataArray::new(vec!["latitude", "longitude"], chl.into_dyn()).unwrap()).unwrap();
//!
//! let (filled, report) = ds
//!     .fill_variable(&VariableSelection::new("CHL"), &FillStrategy::default(), false)
//!     .unwrap();
//! assert_eq!(filled.get("CHL").unwrap().values()[[0, 1]], 0.5);
//! assert!(report.is_complete());
//! ```

use std::collections::BTreeMap;

use gf_config::{FillConfig, FillStrategy, VariableSelection};
use gf_foundation::{GfError, GfResult};
use ndarray::{Array1, Array2, ArrayD, ArrayView1, Axis, IxDyn};

use crate::fill::fill_view;
use crate::grid::GridView;
use crate::report::FillReport;

/// 带维度名的数组
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    dims: Vec<String>,
    values: ArrayD<f64>,
}

impl DataArray {
    /// 创建数组，维度名数量必须与数组维数一致
    pub fn new<S: Into<String>>(dims: Vec<S>, values: ArrayD<f64>) -> GfResult<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        GfError::check_size("dims", values.ndim(), dims.len())?;
        Ok(Self { dims, values })
    }

    /// 创建一维坐标变量
    pub fn coordinate(dim: impl Into<String>, values: Array1<f64>) -> Self {
        Self {
            dims: vec![dim.into()],
            values: values.into_dyn(),
        }
    }

    /// 维度名
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// 数据
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// 维度名对应的轴
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }
}

/// 内存数据集
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    variables: BTreeMap<String, DataArray>,
}

impl Dataset {
    /// 创建空数据集
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入变量，同名变量被替换
    ///
    /// 与已有变量共享的维度长度必须一致。
    pub fn insert(&mut self, name: impl Into<String>, array: DataArray) -> GfResult<()> {
        let name = name.into();
        for (dim, &len) in array.dims.iter().zip(array.values.shape()) {
            if let Some(expected) = self.dim_len(dim, &name) {
                if expected != len {
                    return Err(GfError::invalid_input(format!(
                        "变量 '{}' 的维度 '{}' 长度为 {}，数据集中为 {}",
                        name, dim, len, expected
                    )));
                }
            }
        }
        self.variables.insert(name, array);
        Ok(())
    }

    /// 获取变量
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.variables.get(name)
    }

    /// 是否包含变量
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// 变量数量
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// 其他变量中该维度的长度
    fn dim_len(&self, dim: &str, skip: &str) -> Option<usize> {
        self.variables
            .iter()
            .filter(|(name, _)| name.as_str() != skip)
            .find_map(|(_, a)| a.axis_of(dim).map(|ax| a.values.shape()[ax]))
    }

    /// 以维度名查找一维坐标
    fn coordinate(&self, dim: &str) -> GfResult<ArrayView1<'_, f64>> {
        let coord = self
            .get(dim)
            .ok_or_else(|| GfError::unknown_variable(dim))?;
        if coord.dims.len() != 1 || coord.dims[0] != dim {
            return Err(GfError::config(format!(
                "坐标变量 '{}' 必须是以自身为维度的一维数组，实际维度 {:?}",
                dim, coord.dims
            )));
        }
        coord
            .values
            .view()
            .into_dimensionality()
            .map_err(|e| GfError::invalid_input(e.to_string()))
    }

    /// 读取掩膜，返回 (lat, lon) 布尔数组
    fn mask(&self, selection: &VariableSelection) -> GfResult<Option<Array2<bool>>> {
        let Some(mask) = self.get(&selection.mask_var) else {
            log::debug!("数据集没有掩膜变量 '{}'，所有格点视为域内", selection.mask_var);
            return Ok(None);
        };

        let lat = mask
            .axis_of(&selection.lat_dim)
            .ok_or_else(|| GfError::unknown_dimension(&selection.lat_dim, &selection.mask_var))?;
        let lon = mask
            .axis_of(&selection.lon_dim)
            .ok_or_else(|| GfError::unknown_dimension(&selection.lon_dim, &selection.mask_var))?;
        if mask.dims.len() != 2 {
            return Err(GfError::config(format!(
                "掩膜变量 '{}' 必须只含纬度和经度维度，实际维度 {:?}",
                selection.mask_var, mask.dims
            )));
        }

        let oriented = mask
            .values
            .view()
            .permuted_axes(IxDyn(&[lat, lon]))
            .into_dimensionality::<ndarray::Ix2>()
            .map_err(|e| GfError::invalid_input(e.to_string()))?;
        Ok(Some(oriented.mapv(|v| v.is_finite() && v != 0.0)))
    }

    /// 插补选定变量
    ///
    /// 返回新的数据集（输入不变）和填补报告。
    pub fn fill_variable(
        &self,
        selection: &VariableSelection,
        strategy: &FillStrategy,
        parallel: bool,
    ) -> GfResult<(Dataset, FillReport)> {
        selection.validate()?;
        strategy.validate()?;

        let var = self
            .get(&selection.variable)
            .ok_or_else(|| GfError::unknown_variable(&selection.variable))?;
        let axis = |dim: &str| {
            var.axis_of(dim)
                .ok_or_else(|| GfError::unknown_dimension(dim, &selection.variable))
        };
        let lat_axis = axis(&selection.lat_dim)?;
        let lon_axis = axis(&selection.lon_dim)?;
        let time_axis = var.axis_of(&selection.time_dim);

        let mut order: Vec<usize> = time_axis.into_iter().collect();
        order.extend([lat_axis, lon_axis]);
        if order.len() != var.dims.len() {
            return Err(GfError::config(format!(
                "变量 '{}' 的维度 {:?} 无法识别为 (时间, 纬度, 经度)",
                selection.variable, var.dims
            )));
        }

        let lat = self.coordinate(&selection.lat_dim)?;
        let lon = self.coordinate(&selection.lon_dim)?;
        let mask = self.mask(selection)?;

        let canonical = var.values.view().permuted_axes(IxDyn(&order));
        let view = GridView::new(
            canonical,
            mask.as_ref().map(|m| m.view()),
            lat,
            lon,
            time_axis.map(|_| 0),
        )?;

        log::info!(
            "插补变量 '{}' ({}), 维度 {:?}",
            selection.variable,
            strategy.name(),
            var.dims
        );
        let output = fill_view(&view, strategy, parallel)?;

        let mut inverse = vec![0usize; order.len()];
        for (k, &ax) in order.iter().enumerate() {
            inverse[ax] = k;
        }
        let values = output
            .grid
            .permuted_axes(IxDyn(&inverse))
            .as_standard_layout()
            .into_owned();

        let mut filled = self.clone();
        filled.variables.insert(
            selection.variable.clone(),
            DataArray {
                dims: var.dims.clone(),
                values,
            },
        );
        Ok((filled, output.report))
    }

    /// 按完整配置插补
    pub fn fill_with_config(&self, config: &FillConfig) -> GfResult<(Dataset, FillReport)> {
        self.fill_variable(&config.selection, &config.strategy, config.parallel)
    }

    /// 沿某个维度取子集（用于检查单个时间片）
    pub fn select_index(&self, name: &str, dim: &str, index: usize) -> GfResult<ArrayD<f64>> {
        let var = self.get(name).ok_or_else(|| GfError::unknown_variable(name))?;
        let axis = var
            .axis_of(dim)
            .ok_or_else(|| GfError::unknown_dimension(dim, name))?;
        let len = var.values.len_of(Axis(axis));
        if index >= len {
            return Err(GfError::invalid_input(format!(
                "索引 {} 超出维度 '{}' 的长度 {}",
                index, dim, len
            )));
        }
        Ok(var.values.index_axis(Axis(axis), index).to_owned())
    }
}

/// 按完整配置插补数据集
pub fn fill_with_config(dataset: &Dataset, config: &FillConfig) -> GfResult<(Dataset, FillReport)> {
    dataset.fill_with_config(config)
}
