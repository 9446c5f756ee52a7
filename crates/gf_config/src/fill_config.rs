// crates/gf_config/src/fill_config.rs

//! FillConfig - 缺测插补配置
//!
//! 定义变量选择、插补策略和执行选项，支持 JSON 读写。
//!
//! # JSON 示例
//!
//! ```json
//! {
//!   "selection": { "variable": "CHL", "mask_var": "is_ocean" },
//!   "strategy": { "kind": "rbf", "kernel": "thin_plate_spline", "max_points": 5000 },
//!   "parallel": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::method::{RbfKernel, ScatteredMethod};

// ============================================================================
// 散点插值配置
// ============================================================================

/// 最近邻/线性/三次散点插值配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatteredConfig {
    /// 主插值方法
    #[serde(default)]
    pub method: ScatteredMethod,

    /// 主方法无法解析的点（凸包外）是否用最近邻回填
    #[serde(default = "default_true")]
    pub fallback_to_nearest: bool,
}

fn default_true() -> bool { true }

impl Default for ScatteredConfig {
    fn default() -> Self {
        Self {
            method: ScatteredMethod::default(),
            fallback_to_nearest: true,
        }
    }
}

impl ScatteredConfig {
    /// 使用指定方法创建（默认启用最近邻回填）
    pub fn new(method: ScatteredMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// 设置最近邻回填
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_nearest = enabled;
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

// ============================================================================
// RBF 配置
// ============================================================================

/// 径向基函数插值配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RbfConfig {
    /// 核函数
    #[serde(default)]
    pub kernel: RbfKernel,

    /// 平滑参数（加到核矩阵对角线）
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// 形状参数，核函数作用于 `epsilon * r`
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// 拟合使用的最大有效点数，超出时随机抽样
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// 拟合所需的最少有效点数，不足时跳过该时间片
    #[serde(default = "default_min_points")]
    pub min_points: usize,

    /// 附加多项式次数，`None` 使用核函数的最低次数
    #[serde(default)]
    pub degree: Option<usize>,

    /// 抽样随机种子，`None` 表示每次运行使用系统熵（不可复现）
    #[serde(default)]
    pub seed: Option<u64>,

    /// 曲面在某些点求值为非有限值时是否用最近邻回填
    #[serde(default)]
    pub fallback_to_nearest: bool,
}

fn default_smoothing() -> f64 { 1e-2 }
fn default_epsilon() -> f64 { 1.0 }
fn default_max_points() -> usize { 5000 }
fn default_min_points() -> usize { 10 }

impl Default for RbfConfig {
    fn default() -> Self {
        Self {
            kernel: RbfKernel::default(),
            smoothing: default_smoothing(),
            epsilon: default_epsilon(),
            max_points: default_max_points(),
            min_points: default_min_points(),
            degree: None,
            seed: None,
            fallback_to_nearest: false,
        }
    }
}

impl RbfConfig {
    /// 使用指定核函数创建
    pub fn new(kernel: RbfKernel) -> Self {
        Self {
            kernel,
            ..Default::default()
        }
    }

    /// 设置平滑参数
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// 设置形状参数
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// 设置最大拟合点数
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// 设置随机种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 设置多项式次数
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = Some(degree);
        self
    }

    /// 设置最近邻回填
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_nearest = enabled;
        self
    }

    /// 实际使用的多项式次数
    pub fn effective_degree(&self) -> Option<usize> {
        self.degree.or_else(|| self.kernel.min_degree())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.smoothing.is_finite() || self.smoothing < 0.0 {
            return Err(ConfigError::invalid("rbf.smoothing", self.smoothing, "平滑参数必须为非负有限值"));
        }

        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ConfigError::invalid("rbf.epsilon", self.epsilon, "形状参数必须为正"));
        }

        if self.min_points == 0 {
            return Err(ConfigError::invalid("rbf.min_points", self.min_points, "至少需要 1 个点"));
        }

        if self.max_points < self.min_points {
            return Err(ConfigError::invalid(
                "rbf.max_points",
                self.max_points,
                format!("不能小于 min_points ({})", self.min_points),
            ));
        }

        if let (Some(degree), Some(min)) = (self.degree, self.kernel.min_degree()) {
            if degree < min {
                return Err(ConfigError::invalid(
                    "rbf.degree",
                    degree,
                    format!("核函数 {} 至少需要 {} 次多项式", self.kernel, min),
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// 变量选择
// ============================================================================

/// 数据集中的变量与维度名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSelection {
    /// 待插补变量名
    pub variable: String,

    /// 纬度维度名
    #[serde(default = "default_lat_dim")]
    pub lat_dim: String,

    /// 经度维度名
    #[serde(default = "default_lon_dim")]
    pub lon_dim: String,

    /// 时间维度名（变量不含该维度时按单个时间片处理）
    #[serde(default = "default_time_dim")]
    pub time_dim: String,

    /// 掩膜变量名（数据集不含该变量时视为无掩膜）
    #[serde(default = "default_mask_var")]
    pub mask_var: String,
}

fn default_lat_dim() -> String { "latitude".to_string() }
fn default_lon_dim() -> String { "longitude".to_string() }
fn default_time_dim() -> String { "time".to_string() }
fn default_mask_var() -> String { "is_ocean".to_string() }

impl VariableSelection {
    /// 使用默认维度名创建
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            lat_dim: default_lat_dim(),
            lon_dim: default_lon_dim(),
            time_dim: default_time_dim(),
            mask_var: default_mask_var(),
        }
    }

    /// 设置空间维度名
    pub fn with_spatial_dims(mut self, lat_dim: impl Into<String>, lon_dim: impl Into<String>) -> Self {
        self.lat_dim = lat_dim.into();
        self.lon_dim = lon_dim.into();
        self
    }

    /// 设置时间维度名
    pub fn with_time_dim(mut self, time_dim: impl Into<String>) -> Self {
        self.time_dim = time_dim.into();
        self
    }

    /// 设置掩膜变量名
    pub fn with_mask_var(mut self, mask_var: impl Into<String>) -> Self {
        self.mask_var = mask_var.into();
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.variable.trim().is_empty() {
            return Err(ConfigError::invalid("selection.variable", "", "变量名不能为空"));
        }

        let dims = [
            ("selection.lat_dim", &self.lat_dim),
            ("selection.lon_dim", &self.lon_dim),
            ("selection.time_dim", &self.time_dim),
        ];
        for (i, (key, name)) in dims.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid(key, "", "维度名不能为空"));
            }
            if dims[..i].iter().any(|(_, other)| other == name) {
                return Err(ConfigError::invalid(key, name, "维度名重复"));
            }
        }

        Ok(())
    }
}

// ============================================================================
// 顶层配置
// ============================================================================

/// 插补策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FillStrategy {
    /// 最近邻/线性/三次散点插值
    Scattered(ScatteredConfig),
    /// 径向基函数插值
    Rbf(RbfConfig),
}

impl Default for FillStrategy {
    fn default() -> Self {
        Self::Scattered(ScatteredConfig::default())
    }
}

impl FillStrategy {
    /// 策略名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scattered(cfg) => cfg.method.name(),
            Self::Rbf(_) => "rbf",
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Scattered(cfg) => cfg.validate(),
            Self::Rbf(cfg) => cfg.validate(),
        }
    }
}

/// 缺测插补配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillConfig {
    /// 变量选择
    pub selection: VariableSelection,

    /// 插补策略
    #[serde(default)]
    pub strategy: FillStrategy,

    /// 是否并行处理时间片
    #[serde(default)]
    pub parallel: bool,
}

impl FillConfig {
    /// 创建配置
    pub fn new(selection: VariableSelection, strategy: FillStrategy) -> Self {
        Self {
            selection,
            strategy,
            parallel: false,
        }
    }

    /// 设置并行
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 从 JSON 字符串解析并验证
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: FillConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.selection.validate()?;
        self.strategy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        assert!(ScatteredConfig::default().validate().is_ok());
        assert!(ScatteredConfig::default().fallback_to_nearest);

        let rbf = RbfConfig::default();
        assert!(rbf.validate().is_ok());
        assert_eq!(rbf.max_points, 5000);
        assert_eq!(rbf.min_points, 10);
        assert_eq!(rbf.kernel, RbfKernel::ThinPlateSpline);
        assert!((rbf.smoothing - 1e-2).abs() < 1e-15);
        assert_eq!(rbf.effective_degree(), Some(1));
    }

    #[test]
    fn test_invalid_rbf() {
        assert!(RbfConfig::default().with_smoothing(-1.0).validate().is_err());
        assert!(RbfConfig::default().with_smoothing(f64::NAN).validate().is_err());
        assert!(RbfConfig::default().with_epsilon(0.0).validate().is_err());
        assert!(RbfConfig::default().with_max_points(5).validate().is_err());
        assert!(RbfConfig::new(RbfKernel::Quintic).with_degree(1).validate().is_err());
        assert!(RbfConfig::new(RbfKernel::Gaussian).with_degree(0).validate().is_ok());
    }

    #[test]
    fn test_selection_validation() {
        assert!(VariableSelection::new("CHL").validate().is_ok());
        assert!(VariableSelection::new("").validate().is_err());
        assert!(VariableSelection::new("CHL")
            .with_spatial_dims("lat", "lat")
            .validate()
            .is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "selection": { "variable": "CHL" },
            "strategy": { "kind": "rbf", "kernel": "gaussian", "epsilon": 2.0, "seed": 7 },
            "parallel": true
        }"#;
        let config = FillConfig::from_json_str(json).unwrap();
        assert_eq!(config.selection.mask_var, "is_ocean");
        assert_eq!(config.selection.time_dim, "time");
        assert!(config.parallel);
        match config.strategy {
            FillStrategy::Rbf(rbf) => {
                assert_eq!(rbf.kernel, RbfKernel::Gaussian);
                assert_eq!(rbf.seed, Some(7));
                assert_eq!(rbf.max_points, 5000);
            }
            other => panic!("期望 RBF 策略, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_rejects_unknown_method() {
        let json = r#"{
            "selection": { "variable": "sst" },
            "strategy": { "kind": "scattered", "method": "quadratic" }
        }"#;
        assert!(matches!(FillConfig::from_json_str(json), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_json_rejects_invalid_value() {
        let json = r#"{
            "selection": { "variable": "sst" },
            "strategy": { "kind": "rbf", "smoothing": -0.5 }
        }"#;
        assert!(matches!(
            FillConfig::from_json_str(json),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = FillConfig::new(
            VariableSelection::new("npp").with_mask_var("land_sea"),
            FillStrategy::Scattered(ScatteredConfig::new(ScatteredMethod::Cubic).with_fallback(false)),
        );
        let json = serde_json::to_string(&config).unwrap();
        let parsed: FillConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
