// crates/gf_fill/src/compositor.rs

//! 结果合成
//!
//! 把插补值写回时间片副本的缺测位置，再无条件重新施加掩膜。
//! 所有处理路径（包括跳过）都经过 [`compose`]，输出形状与掩膜因此总是正确。

use ndarray::{Array2, ArrayView2, Zip};

/// 生成输出时间片
///
/// `filled` 为 `(缺测格点, 插补值)`，跳过的时间片传 `None`。
/// 返回输出时间片和写入的有限值个数。
pub fn compose(
    slice: ArrayView2<'_, f64>,
    filled: Option<(&[(usize, usize)], &[f64])>,
    mask: Option<ArrayView2<'_, bool>>,
) -> (Array2<f64>, usize) {
    let mut out = slice.to_owned();
    let written = match filled {
        Some((cells, values)) => write_missing(&mut out, cells, values),
        None => 0,
    };
    if let Some(m) = mask {
        apply_mask(&mut out, m);
    }
    (out, written)
}

/// 在缺测格点写入插补值，返回其中有限值的个数
pub fn write_missing(out: &mut Array2<f64>, cells: &[(usize, usize)], values: &[f64]) -> usize {
    let mut written = 0;
    for (&(i, j), &v) in cells.iter().zip(values) {
        out[[i, j]] = v;
        if v.is_finite() {
            written += 1;
        }
    }
    written
}

/// 掩膜外的格点置为 NaN
pub fn apply_mask(out: &mut Array2<f64>, mask: ArrayView2<'_, bool>) {
    Zip::from(out).and(&mask).for_each(|v, &inside| {
        if !inside {
            *v = f64::NAN;
        }
    });
}
