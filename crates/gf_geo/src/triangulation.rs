// crates/gf_geo/src/triangulation.rs

//! Delaunay 三角剖分
//!
//! 使用 Bowyer-Watson 增量算法对散点进行 Delaunay 三角剖分，
//! 为线性（重心坐标）和三次插值提供三角形网格。
//!
//! # 算法
//!
//! 1. 坐标归一化到单位包围盒，构造包含所有点的超级三角形
//! 2. 逐点插入：从最近创建的三角形中找到外接圆包含新点的种子三角形，
//!    沿边邻接关系广度搜索得到"空腔"，删除空腔并以新点为顶点重新连接边界
//! 3. 删除与超级三角形顶点相连的三角形
//!
//! 按行优先顺序插入格点时，新点几乎总落在最近创建的三角形附近，
//! 种子搜索只需检查少数三角形。
//!
//! # 退化输入
//!
//! - 完全重复的点只保留第一次出现的索引
//! - 少于 3 个不重复点或所有点共线时，三角剖分为空，所有查询返回 `None`
//!
//! # 示例
//!
//! ```
//! use gf_geo::geometry::Point2D;
//! use gf_geo::triangulation::Triangulation;
//!
//! let points = vec![
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(1.0, 0.0),
//!     Point2D::new(1.0, 1.0),
//!     Point2D::new(0.0, 1.0),
//! ];
//! let tri = Triangulation::new(&points);
//! assert_eq!(tri.len(), 2);
//!
//! let loc = tri.locate(&Point2D::new(0.25, 0.5)).unwrap();
//! let sum: f64 = loc.weights.iter().sum();
//! assert!((sum - 1.0).abs() < 1e-12);
//! ```

use crate::geometry::Point2D;
use rstar::{RTree, RTreeObject, AABB};
use std::collections::{HashMap, HashSet};

/// 外接圆内判定的相对容差（点在圆上视为不在圆内）
const IN_CIRCLE_TOLERANCE: f64 = 1e-10;

/// 重心坐标容差（允许落在边上的点）
const BARYCENTRIC_TOLERANCE: f64 = 1e-10;

/// 超级三角形相对归一化包围盒的尺度
const SUPER_TRIANGLE_SCALE: f64 = 100.0;

/// 点定位结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// 三角形顶点索引（逆时针，指向输入点集）
    pub vertices: [usize; 3],
    /// 重心坐标，和为 1
    pub weights: [f64; 3],
}

/// Delaunay 三角剖分
pub struct Triangulation {
    /// 输入点（保留原始索引）
    points: Vec<Point2D>,
    /// 三角形（逆时针顶点索引）
    triangles: Vec<[usize; 3]>,
    /// 每个顶点的邻接顶点（升序）
    neighbors: Vec<Vec<usize>>,
    /// 三角形包围盒索引
    locator: RTree<TriangleEnvelope>,
}

impl Triangulation {
    /// 对点集进行三角剖分
    pub fn new(points: &[Point2D]) -> Self {
        let triangles = match Normalized::from_points(points) {
            Some(normalized) => BowyerWatson::run(&normalized),
            None => Vec::new(),
        };

        let mut neighbors = vec![Vec::new(); points.len()];
        for tri in &triangles {
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        let envelopes = triangles
            .iter()
            .enumerate()
            .map(|(id, tri)| TriangleEnvelope::new(id, tri.map(|v| points[v])))
            .collect();

        Self {
            points: points.to_vec(),
            triangles,
            neighbors,
            locator: RTree::bulk_load(envelopes),
        }
    }

    /// 输入点集
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// 三角形列表
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// 三角形数量
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// 三角剖分是否为空（退化输入）
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// 顶点的邻接顶点
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        self.neighbors.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// 定位包含查询点的三角形
    ///
    /// 点在凸包外时返回 `None`。多个三角形都包含该点（落在公共边上）时，
    /// 选择最小重心坐标最大的三角形，结果对相同输入稳定。
    pub fn locate(&self, p: &Point2D) -> Option<Location> {
        let mut best: Option<(f64, Location)> = None;

        for entry in self.locator.locate_all_at_point(&[p.x, p.y]) {
            let vertices = self.triangles[entry.id];
            let Some(weights) = barycentric(vertices.map(|v| self.points[v]), p) else {
                continue;
            };
            let min_weight = weights.iter().copied().fold(f64::INFINITY, f64::min);
            if min_weight < -BARYCENTRIC_TOLERANCE {
                continue;
            }
            let better = match &best {
                Some((score, loc)) => {
                    min_weight > *score || (min_weight == *score && vertices < loc.vertices)
                }
                None => true,
            };
            if better {
                best = Some((min_weight, Location { vertices, weights }));
            }
        }

        best.map(|(_, loc)| loc)
    }
}

/// 计算重心坐标，退化三角形返回 `None`
fn barycentric(tri: [Point2D; 3], p: &Point2D) -> Option<[f64; 3]> {
    let [a, b, c] = tri;
    let ab = b - a;
    let ac = c - a;
    let det = ab.cross(&ac);
    if det.abs() <= f64::EPSILON * (ab.dot(&ab) + ac.dot(&ac)) {
        return None;
    }
    let ap = *p - a;
    let w1 = ap.cross(&ac) / det;
    let w2 = ab.cross(&ap) / det;
    Some([1.0 - w1 - w2, w1, w2])
}

/// 有向面积的两倍（逆时针为正）
#[inline]
fn orient(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    (b - a).cross(&(c - a))
}

// ============================================================================
// 归一化点集
// ============================================================================

/// 去重并归一化后的点集
struct Normalized {
    /// 归一化坐标
    coords: Vec<Point2D>,
    /// 归一化点对应的输入索引
    original: Vec<usize>,
}

impl Normalized {
    /// 去重、检查共线并归一化；退化时返回 `None`
    fn from_points(points: &[Point2D]) -> Option<Self> {
        let mut seen: HashMap<(u64, u64), usize> = HashMap::with_capacity(points.len());
        let mut original = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if !p.is_finite() {
                continue;
            }
            // +0.0 统一 -0.0 的位模式
            let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
            if seen.insert(key, i).is_none() {
                original.push(i);
            }
        }
        if original.len() < 3 {
            return None;
        }

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &i in &original {
            let p = points[i];
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let scale = (max_x - min_x).max(max_y - min_y);
        if scale <= 0.0 {
            return None;
        }
        let center = Point2D::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
        let coords: Vec<Point2D> = original
            .iter()
            .map(|&i| (points[i] - center) * (1.0 / scale))
            .collect();

        // 共线检查：以首点和离它最远的点为基线
        let a = coords[0];
        let far = coords
            .iter()
            .copied()
            .max_by(|p, q| a.distance_squared_to(p).total_cmp(&a.distance_squared_to(q)))?;
        let spread = coords
            .iter()
            .map(|&c| orient(a, far, c).abs())
            .fold(0.0, f64::max);
        if spread <= 1e-12 {
            return None;
        }

        Some(Self { coords, original })
    }
}

// ============================================================================
// Bowyer-Watson 增量算法
// ============================================================================

/// 工作三角形
struct WorkTriangle {
    vertices: [usize; 3],
    center: Point2D,
    radius2: f64,
    alive: bool,
}

impl WorkTriangle {
    fn contains_in_circle(&self, p: &Point2D) -> bool {
        self.alive && self.center.distance_squared_to(p) < self.radius2 * (1.0 - IN_CIRCLE_TOLERANCE)
    }
}

/// 增量构建状态
struct BowyerWatson {
    verts: Vec<Point2D>,
    triangles: Vec<WorkTriangle>,
    /// 边 -> 共享该边的三角形
    edges: HashMap<(usize, usize), [Option<usize>; 2]>,
}

impl BowyerWatson {
    /// 返回以输入索引表示的三角形
    fn run(normalized: &Normalized) -> Vec<[usize; 3]> {
        let m = normalized.coords.len();
        let mut verts = normalized.coords.clone();
        let s = SUPER_TRIANGLE_SCALE;
        verts.push(Point2D::new(-s, -s));
        verts.push(Point2D::new(s, -s));
        verts.push(Point2D::new(0.0, s));

        let mut state = Self {
            verts,
            triangles: Vec::with_capacity(2 * m + 1),
            edges: HashMap::with_capacity(3 * m + 3),
        };
        state.add_triangle(m, m + 1, m + 2);

        let mut skipped = 0usize;
        for i in 0..m {
            if !state.insert(i) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::debug!("三角剖分: {} 个点因数值退化未能插入", skipped);
        }

        state
            .triangles
            .iter()
            .filter(|t| t.alive && t.vertices.iter().all(|&v| v < m))
            .map(|t| t.vertices.map(|v| normalized.original[v]))
            .collect()
    }

    /// 插入一个点，失败时返回 false
    fn insert(&mut self, i: usize) -> bool {
        let p = self.verts[i];

        let Some(seed) = (0..self.triangles.len())
            .rev()
            .find(|&t| self.triangles[t].contains_in_circle(&p))
        else {
            return false;
        };

        // 广度搜索空腔
        let mut bad = vec![seed];
        let mut in_cavity = HashSet::from([seed]);
        let mut cursor = 0;
        while cursor < bad.len() {
            let t = bad[cursor];
            cursor += 1;
            let v = self.triangles[t].vertices;
            for k in 0..3 {
                if let Some(n) = self.across(t, v[k], v[(k + 1) % 3]) {
                    if !in_cavity.contains(&n) && self.triangles[n].contains_in_circle(&p) {
                        in_cavity.insert(n);
                        bad.push(n);
                    }
                }
            }
        }

        // 空腔边界（保持原三角形的逆时针方向）
        let mut boundary = Vec::new();
        for &t in &bad {
            let v = self.triangles[t].vertices;
            for k in 0..3 {
                let (a, b) = (v[k], v[(k + 1) % 3]);
                let outside = self
                    .across(t, a, b)
                    .map_or(true, |n| !in_cavity.contains(&n));
                if outside {
                    boundary.push((a, b));
                }
            }
        }

        for &t in &bad {
            self.remove_triangle(t);
        }
        for (a, b) in boundary {
            if orient(self.verts[a], self.verts[b], p) > 0.0 {
                self.add_triangle(a, b, i);
            }
        }
        true
    }

    /// 边 (a, b) 另一侧的三角形
    fn across(&self, t: usize, a: usize, b: usize) -> Option<usize> {
        let slot = self.edges.get(&edge_key(a, b))?;
        slot.iter().flatten().copied().find(|&n| n != t)
    }

    fn add_triangle(&mut self, a: usize, b: usize, c: usize) {
        let (pa, pb, pc) = (self.verts[a], self.verts[b], self.verts[c]);
        let vertices = if orient(pa, pb, pc) >= 0.0 { [a, b, c] } else { [a, c, b] };
        let (center, radius2) = circumcircle(pa, pb, pc);

        let id = self.triangles.len();
        self.triangles.push(WorkTriangle {
            vertices,
            center,
            radius2,
            alive: true,
        });
        for k in 0..3 {
            let slot = self
                .edges
                .entry(edge_key(vertices[k], vertices[(k + 1) % 3]))
                .or_insert([None, None]);
            if slot[0].is_none() {
                slot[0] = Some(id);
            } else {
                slot[1] = Some(id);
            }
        }
    }

    fn remove_triangle(&mut self, id: usize) {
        let vertices = self.triangles[id].vertices;
        self.triangles[id].alive = false;
        for k in 0..3 {
            let key = edge_key(vertices[k], vertices[(k + 1) % 3]);
            if let Some(slot) = self.edges.get_mut(&key) {
                for entry in slot.iter_mut() {
                    if *entry == Some(id) {
                        *entry = None;
                    }
                }
                if slot.iter().all(Option::is_none) {
                    self.edges.remove(&key);
                }
            }
        }
    }
}

#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// 外接圆（圆心、半径平方）；退化三角形半径为无穷大
fn circumcircle(a: Point2D, b: Point2D, c: Point2D) -> (Point2D, f64) {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.cross(&ac);
    if d.abs() < 1e-300 {
        let centroid = (a + b + c) * (1.0 / 3.0);
        return (centroid, f64::INFINITY);
    }
    let ab2 = ab.dot(&ab);
    let ac2 = ac.dot(&ac);
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    (a + Point2D::new(ux, uy), ux * ux + uy * uy)
}

// ============================================================================
// R-tree 定位条目
// ============================================================================

/// 三角形包围盒
struct TriangleEnvelope {
    id: usize,
    envelope: AABB<[f64; 2]>,
}

impl TriangleEnvelope {
    fn new(id: usize, tri: [Point2D; 3]) -> Self {
        let min_x = tri.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = tri.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = tri.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = tri.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let pad = 1e-9 * (max_x - min_x).max(max_y - min_y).max(1.0);
        Self {
            id,
            envelope: AABB::from_corners([min_x - pad, min_y - pad], [max_x + pad, max_y + pad]),
        }
    }
}

impl RTreeObject for TriangleEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl rstar::PointDistance for TriangleEnvelope {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let lower = self.envelope.lower();
        let upper = self.envelope.upper();
        let dx = (lower[0] - point[0]).max(0.0).max(point[0] - upper[0]);
        let dy = (lower[1] - point[1]).max(0.0).max(point[1] - upper[1]);
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        let lower = self.envelope.lower();
        let upper = self.envelope.upper();
        point[0] >= lower[0] && point[0] <= upper[0] && point[1] >= lower[1] && point[1] <= upper[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(nx: usize, ny: usize) -> Vec<Point2D> {
        let mut points = Vec::new();
        for j in 0..ny {
            for i in 0..nx {
                points.push(Point2D::new(i as f64, j as f64));
            }
        }
        points
    }

    fn total_area(tri: &Triangulation) -> f64 {
        tri.triangles()
            .iter()
            .map(|t| orient(tri.points()[t[0]], tri.points()[t[1]], tri.points()[t[2]]) / 2.0)
            .sum()
    }

    #[test]
    fn test_square() {
        let tri = Triangulation::new(&grid(2, 2));
        assert_eq!(tri.len(), 2);
        assert!((total_area(&tri) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_regular_grid_covers_hull() {
        // 5x4 规则网格: 2 * 4 * 3 = 24 个三角形
        let tri = Triangulation::new(&grid(5, 4));
        assert_eq!(tri.len(), 24);
        assert!((total_area(&tri) - 12.0).abs() < 1e-9);
        for t in tri.triangles() {
            let area = orient(tri.points()[t[0]], tri.points()[t[1]], tri.points()[t[2]]);
            assert!(area > 0.0, "三角形必须逆时针");
        }
    }

    #[test]
    fn test_delaunay_property() {
        let points: Vec<Point2D> = (0..40)
            .map(|k| {
                let t = k as f64;
                Point2D::new((t * 0.618_033_988_7).fract() * 10.0, (t * 0.414_213_562_3).fract() * 7.0)
            })
            .collect();
        let tri = Triangulation::new(&points);
        assert!(!tri.is_empty());

        for t in tri.triangles() {
            let (center, r2) = circumcircle(points[t[0]], points[t[1]], points[t[2]]);
            for (k, p) in points.iter().enumerate() {
                if t.contains(&k) {
                    continue;
                }
                assert!(center.distance_squared_to(p) >= r2 * (1.0 - 1e-6));
            }
        }
    }

    #[test]
    fn test_locate_inside_and_outside() {
        let tri = Triangulation::new(&grid(3, 3));

        let loc = tri.locate(&Point2D::new(0.3, 1.6)).unwrap();
        let sum: f64 = loc.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(loc.weights.iter().all(|&w| w >= -1e-12));

        // 凸包外
        assert!(tri.locate(&Point2D::new(-0.5, 1.0)).is_none());
        assert!(tri.locate(&Point2D::new(3.0, 3.0)).is_none());
    }

    #[test]
    fn test_locate_on_hull_edge_and_vertex() {
        let tri = Triangulation::new(&grid(3, 3));
        assert!(tri.locate(&Point2D::new(0.0, 0.5)).is_some());
        let loc = tri.locate(&Point2D::new(2.0, 2.0)).unwrap();
        let max_weight = loc.weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!((max_weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collinear_is_empty() {
        let points: Vec<Point2D> = (0..6).map(|i| Point2D::new(i as f64, 2.0 * i as f64)).collect();
        let tri = Triangulation::new(&points);
        assert!(tri.is_empty());
        assert!(tri.locate(&Point2D::new(1.0, 2.0)).is_none());
    }

    #[test]
    fn test_duplicates_ignored() {
        let mut points = grid(2, 2);
        points.push(Point2D::new(1.0, 1.0));
        points.push(Point2D::new(0.0, 0.0));
        let tri = Triangulation::new(&points);
        assert_eq!(tri.len(), 2);
        // 重复点没有邻接顶点
        assert!(tri.neighbors(4).is_empty());
        assert!(tri.neighbors(5).is_empty());
        let unique: HashSet<_> = tri.neighbors(0).iter().collect();
        assert_eq!(tri.neighbors(0).len(), unique.len());
    }

    #[test]
    fn test_too_few_points() {
        assert!(Triangulation::new(&[]).is_empty());
        assert!(Triangulation::new(&grid(2, 1)).is_empty());
    }
}
