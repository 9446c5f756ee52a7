// crates/gf_config/src/method.rs

//! 插值方法与 RBF 核函数枚举
//!
//! 方法名在构造时（字符串解析或 JSON 反序列化）即被校验，
//! 未知名称在进入任何数值计算之前以配置错误返回。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 散点插值方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScatteredMethod {
    /// 最近邻
    #[default]
    Nearest,
    /// Delaunay 三角形上的重心坐标线性插值
    Linear,
    /// Delaunay 三角形上的三次 Bézier 曲面片
    Cubic,
}

impl ScatteredMethod {
    /// 所有方法
    pub const ALL: [Self; 3] = [Self::Nearest, Self::Linear, Self::Cubic];

    /// 获取方法名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
        }
    }

    /// 是否需要三角剖分
    pub fn needs_triangulation(&self) -> bool {
        !matches!(self, Self::Nearest)
    }
}

impl fmt::Display for ScatteredMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScatteredMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ConfigError::invalid("method", s, "支持的方法: nearest, linear, cubic"))
    }
}

/// RBF 核函数
///
/// 核函数作用于 `epsilon * r`，符号约定使条件正定核在附加多项式后
/// 得到对称正定系统（线性、五次、多二次取负号）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RbfKernel {
    /// -r
    Linear,
    /// r² ln(r)
    #[default]
    ThinPlateSpline,
    /// r³
    Cubic,
    /// -r⁵
    Quintic,
    /// -sqrt(1 + r²)
    Multiquadric,
    /// 1 / sqrt(1 + r²)
    InverseMultiquadric,
    /// 1 / (1 + r²)
    InverseQuadratic,
    /// exp(-r²)
    Gaussian,
}

impl RbfKernel {
    /// 所有核函数
    pub const ALL: [Self; 8] = [
        Self::Linear,
        Self::ThinPlateSpline,
        Self::Cubic,
        Self::Quintic,
        Self::Multiquadric,
        Self::InverseMultiquadric,
        Self::InverseQuadratic,
        Self::Gaussian,
    ];

    /// 获取核函数名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::ThinPlateSpline => "thin_plate_spline",
            Self::Cubic => "cubic",
            Self::Quintic => "quintic",
            Self::Multiquadric => "multiquadric",
            Self::InverseMultiquadric => "inverse_multiquadric",
            Self::InverseQuadratic => "inverse_quadratic",
            Self::Gaussian => "gaussian",
        }
    }

    /// 保证系统适定所需的最低多项式次数
    ///
    /// 正定核（高斯、逆多二次、逆二次）不需要多项式，返回 `None`。
    pub fn min_degree(&self) -> Option<usize> {
        match self {
            Self::Linear | Self::Multiquadric => Some(0),
            Self::ThinPlateSpline | Self::Cubic => Some(1),
            Self::Quintic => Some(2),
            Self::InverseMultiquadric | Self::InverseQuadratic | Self::Gaussian => None,
        }
    }

    /// 计算核函数值
    #[inline]
    pub fn evaluate(&self, r: f64) -> f64 {
        match self {
            Self::Linear => -r,
            Self::ThinPlateSpline => {
                if r == 0.0 {
                    0.0
                } else {
                    r * r * r.ln()
                }
            }
            Self::Cubic => r * r * r,
            Self::Quintic => -r.powi(5),
            Self::Multiquadric => -(1.0 + r * r).sqrt(),
            Self::InverseMultiquadric => 1.0 / (1.0 + r * r).sqrt(),
            Self::InverseQuadratic => 1.0 / (1.0 + r * r),
            Self::Gaussian => (-r * r).exp(),
        }
    }
}

impl fmt::Display for RbfKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RbfKernel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(RbfKernel::name).collect();
                ConfigError::invalid("kernel", s, format!("支持的核函数: {}", names.join(", ")))
            })
    }
}
