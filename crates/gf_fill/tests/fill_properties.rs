// crates/gf_fill/tests/fill_properties.rs

//! 插补性质测试
//!
//! 掩膜不变量、无缺测时原样输出、最近邻回填完整性、RBF 抽样上限与点数阈值。

use gf_fill::{fill_nearest_like, fill_rbf, RbfConfig, ScatteredConfig, ScatteredMethod, SliceOutcome};
use ndarray::{Array1, Array2, Array3};

fn coords(n: usize, start: f64, step: f64) -> Array1<f64> {
    Array1::from_iter((0..n).map(|i| start + step * i as f64))
}

/// 平滑场，掩膜外为 NaN，部分掩膜内格点缺测
fn masked_field(n_lat: usize, n_lon: usize) -> (Array2<f64>, Array2<bool>) {
    let mask = Array2::from_shape_fn((n_lat, n_lon), |(i, j)| !(j < 2 && i > n_lat / 2));
    let grid = Array2::from_shape_fn((n_lat, n_lon), |(i, j)| {
        if !mask[[i, j]] || (i + 2 * j) % 5 == 0 {
            f64::NAN
        } else {
            (i as f64 * 0.3).sin() + (j as f64 * 0.2).cos()
        }
    });
    (grid, mask)
}

// ============================================================
// 掩膜不变量
// ============================================================

#[test]
fn test_masking_invariant_all_methods() {
    let (grid, mask) = masked_field(8, 10);
    let lat = coords(8, -20.0, 0.25);
    let lon = coords(10, 110.0, 0.25);

    let mut outputs = Vec::new();
    for method in ScatteredMethod::ALL {
        let out = fill_nearest_like(
            grid.view().into_dyn(),
            Some(mask.view()),
            lat.view(),
            lon.view(),
            &ScatteredConfig::new(method),
            None,
        )
        .unwrap();
        outputs.push(out.grid);
    }
    let rbf = fill_rbf(
        grid.view().into_dyn(),
        Some(mask.view()),
        lat.view(),
        lon.view(),
        &RbfConfig::default().with_seed(5),
        None,
    )
    .unwrap();
    outputs.push(rbf.grid);

    for out in &outputs {
        assert_eq!(out.shape(), grid.shape());
        for ((i, j), &inside) in mask.indexed_iter() {
            let v = out[[i, j]];
            if !inside {
                assert!(v.is_nan(), "掩膜外 ({}, {}) 应为 NaN", i, j);
            } else if !grid[[i, j]].is_nan() {
                assert_eq!(v, grid[[i, j]], "已有值 ({}, {}) 被改动", i, j);
            } else {
                assert!(v.is_finite(), "缺测 ({}, {}) 未填补", i, j);
            }
        }
    }
}

#[test]
fn test_masking_clears_original_values_outside() {
    // 掩膜外原本有值，输出中也必须是 NaN
    let grid = Array2::from_elem((4, 4), 1.0);
    let mut mask = Array2::from_elem((4, 4), true);
    mask[[0, 3]] = false;
    let c = coords(4, 0.0, 1.0);

    let out = fill_nearest_like(
        grid.view().into_dyn(),
        Some(mask.view()),
        c.view(),
        c.view(),
        &ScatteredConfig::default(),
        None,
    )
    .unwrap();
    assert!(out.grid[[0, 3]].is_nan());
    assert_eq!(out.report.slices[0].outcome, SliceOutcome::NoMissing);
}

// ============================================================
// 无缺测时原样输出
// ============================================================

#[test]
fn test_no_missing_is_identity() {
    let grid = Array2::from_shape_fn((5, 6), |(i, j)| i as f64 * 10.0 + j as f64);
    let lat = coords(5, 0.0, 1.0);
    let lon = coords(6, 0.0, 1.0);

    let out = fill_rbf(
        grid.view().into_dyn(),
        None,
        lat.view(),
        lon.view(),
        &RbfConfig::default(),
        None,
    )
    .unwrap();
    assert_eq!(out.grid, grid.into_dyn());
    assert_eq!(out.report.slices[0].outcome, SliceOutcome::NoMissing);
    assert!(out.report.is_complete());
}

// ============================================================
// 最近邻回填完整性
// ============================================================

#[test]
fn test_fallback_covers_outside_hull() {
    // 有效点只在中心块，四周缺测都在凸包外
    let mut grid = Array2::from_elem((7, 7), f64::NAN);
    for i in 2..5 {
        for j in 2..5 {
            grid[[i, j]] = (i * j) as f64;
        }
    }
    let c = coords(7, 0.0, 1.0);

    for method in [ScatteredMethod::Linear, ScatteredMethod::Cubic] {
        let out = fill_nearest_like(
            grid.view().into_dyn(),
            None,
            c.view(),
            c.view(),
            &ScatteredConfig::new(method),
            None,
        )
        .unwrap();
        assert!(out.grid.iter().all(|v| v.is_finite()), "{} 留下了 NaN", method);
        let slice = &out.report.slices[0];
        assert_eq!(slice.missing_cells, 40);
        assert_eq!(slice.filled_cells, 40);
        assert_eq!(slice.fallback_cells, 40);
        // 角点的最近有效点是中心块的对应角点
        assert_eq!(out.grid[[0, 0]], 4.0);
        assert_eq!(out.grid[[6, 6]], 16.0);
    }
}

#[test]
fn test_fallback_disabled_leaves_nan() {
    let mut grid = Array2::from_elem((5, 5), 1.0);
    grid[[0, 0]] = f64::NAN;
    grid[[0, 1]] = f64::NAN;
    grid[[1, 0]] = f64::NAN;
    let c = coords(5, 0.0, 1.0);

    let config = ScatteredConfig::new(ScatteredMethod::Linear).with_fallback(false);
    let out = fill_nearest_like(grid.view().into_dyn(), None, c.view(), c.view(), &config, None).unwrap();
    assert!(out.grid[[0, 0]].is_nan());
    assert_eq!(out.report.fallback_cells(), 0);

    // 时间片算作已插补，但仍留有缺测
    let slice = &out.report.slices[0];
    assert_eq!(slice.outcome, SliceOutcome::Filled);
    assert!(slice.filled_cells < slice.missing_cells);
    assert!(out.report.remaining_gaps() > 0);
    assert!(!out.report.is_complete());
}

// ============================================================
// RBF 抽样上限
// ============================================================

#[test]
fn test_rbf_subsample_bound() {
    let n = 12;
    let mut grid = Array3::from_shape_fn((2, n, n), |(t, i, j)| t as f64 + 0.1 * i as f64 - 0.05 * j as f64);
    grid[[0, 5, 5]] = f64::NAN;
    grid[[1, 3, 8]] = f64::NAN;
    let c = coords(n, 0.0, 0.5);

    let config = RbfConfig::default().with_max_points(40);
    let out = fill_rbf(grid.view().into_dyn(), None, c.view(), c.view(), &config, Some(0)).unwrap();

    for slice in &out.report.slices {
        assert_eq!(slice.outcome, SliceOutcome::Filled);
        assert_eq!(slice.fit_points, 40);
        assert!(slice.fit_points <= config.max_points);
    }
    // 线性场：无论抽到哪些点，结果都应落在数据范围内
    let v = out.grid[[0, 5, 5]];
    assert!(v > -1.0 && v < 2.0, "v = {}", v);
}

#[test]
fn test_rbf_seeded_is_reproducible() {
    let n = 10;
    let mut grid = Array2::from_shape_fn((n, n), |(i, j)| ((i * 7 + j * 3) % 11) as f64);
    grid[[4, 4]] = f64::NAN;
    grid[[9, 0]] = f64::NAN;
    let c = coords(n, 0.0, 1.0);
    let config = RbfConfig::default().with_max_points(25).with_seed(2024);

    let a = fill_rbf(grid.view().into_dyn(), None, c.view(), c.view(), &config, None).unwrap();
    let b = fill_rbf(grid.view().into_dyn(), None, c.view(), c.view(), &config, None).unwrap();
    assert_eq!(a.grid, b.grid);
}

// ============================================================
// RBF 点数阈值
// ============================================================

fn grid_with_valid(n_valid: usize) -> Array2<f64> {
    let mut grid = Array2::from_elem((4, 5), f64::NAN);
    for (k, v) in grid.iter_mut().enumerate() {
        if k < n_valid {
            *v = 1.0 + 0.1 * k as f64;
        }
    }
    grid
}

#[test]
fn test_rbf_threshold_nine_points() {
    let grid = grid_with_valid(9);
    let lat = coords(4, 0.0, 1.0);
    let lon = coords(5, 0.0, 1.0);

    let out = fill_rbf(grid.view().into_dyn(), None, lat.view(), lon.view(), &RbfConfig::default(), None)
        .unwrap();
    assert_eq!(
        out.report.slices[0].outcome,
        SliceOutcome::InsufficientData { valid: 9, required: 10 }
    );
    assert_eq!(out.report.skipped_count(), 1);
    for (a, b) in out.grid.iter().zip(grid.iter()) {
        assert!(a == b || (a.is_nan() && b.is_nan()));
    }
}

#[test]
fn test_rbf_threshold_ten_points() {
    let grid = grid_with_valid(10);
    let lat = coords(4, 0.0, 1.0);
    let lon = coords(5, 0.0, 1.0);

    let out = fill_rbf(grid.view().into_dyn(), None, lat.view(), lon.view(), &RbfConfig::default(), None)
        .unwrap();
    assert_eq!(out.report.slices[0].outcome, SliceOutcome::Filled);
    assert_eq!(out.report.slices[0].filled_cells, 10);
    assert!(out.grid.iter().all(|v| v.is_finite()));
}
