//! Discrete spaces: the raw grids underlying curves, surfaces and cubes.
//!
//! Coordinates are kept strictly ascending in every dimension so bracketing
//! points can be found by binary search.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::point::{Point1D, Point2D, Point3D};
use crate::error::{CurveError, CurveResult};

/// Position of a query coordinate relative to a grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// The query matches the node at this index.
    Exact(usize),
    /// The query lies between these two nodes, clamped to the first or last
    /// pair when it falls outside the axis.
    Between(usize, usize),
}

impl Bracket {
    /// Locates `x` on an ascending, non-empty axis.
    pub fn locate(axis: &[f64], x: f64) -> Self {
        let last = axis.len().saturating_sub(1);
        match axis.binary_search_by(|probe| {
            probe
                .partial_cmp(&x)
                .unwrap_or(std::cmp::Ordering::Less)
        }) {
            Ok(i) => Bracket::Exact(i),
            Err(0) => Bracket::Between(0, 1.min(last)),
            Err(i) if i > last => Bracket::Between(last.saturating_sub(1), last),
            Err(i) => Bracket::Between(i - 1, i),
        }
    }

    fn indices(self) -> Vec<usize> {
        match self {
            Bracket::Exact(i) => vec![i],
            Bracket::Between(lo, hi) if lo == hi => vec![lo],
            Bracket::Between(lo, hi) => vec![lo, hi],
        }
    }
}

pub(crate) fn validate_axis(axis: &[f64], name: &str) -> CurveResult<()> {
    if axis.is_empty() {
        return Err(CurveError::insufficient_points(1, 0));
    }
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(CurveError::invalid_grid(format!("{name} coordinates must be finite")));
    }
    if let Some(i) = axis.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(CurveError::invalid_grid(format!(
            "{name} coordinates must be strictly ascending (index {})",
            i + 1
        )));
    }
    Ok(())
}

/// The grid of a curve: ascending coordinates with one value each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteCurve {
    xs: Vec<f64>,
    values: Vec<f64>,
}

impl DiscreteCurve {
    /// Creates a curve grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ, the grid is empty or the
    /// coordinates are not strictly ascending.
    pub fn new(xs: Vec<f64>, values: Vec<f64>) -> CurveResult<Self> {
        if xs.len() != values.len() {
            return Err(CurveError::invalid_grid(format!(
                "coordinates ({}) and values ({}) must have same length",
                xs.len(),
                values.len()
            )));
        }
        validate_axis(&xs, "curve")?;
        Ok(Self { xs, values })
    }

    /// Builds a grid from points, sorting them by coordinate.
    pub fn from_points(points: &[Point1D]) -> CurveResult<Self> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        Self::new(
            sorted.iter().map(|p| p.x).collect(),
            sorted.iter().map(|p| p.value).collect(),
        )
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false: a grid holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// The coordinates.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// The values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The points in ascending order.
    pub fn points(&self) -> Vec<Point1D> {
        self.xs
            .iter()
            .zip(&self.values)
            .map(|(&x, &value)| Point1D::new(x, value))
            .collect()
    }

    /// The value stored at `x`, if `x` is a node.
    pub fn value_at_node(&self, x: f64) -> Option<f64> {
        match Bracket::locate(&self.xs, x) {
            Bracket::Exact(i) => Some(self.values[i]),
            Bracket::Between(..) => None,
        }
    }

    /// The two grid points bracketing `x`, or `None` when `x` is a node.
    ///
    /// Queries outside the grid return the first or last pair.
    pub fn closest_values(&self, x: f64) -> Option<(Point1D, Point1D)> {
        match Bracket::locate(&self.xs, x) {
            Bracket::Exact(_) => None,
            Bracket::Between(lo, hi) => Some((
                Point1D::new(self.xs[lo], self.values[lo]),
                Point1D::new(self.xs[hi], self.values[hi]),
            )),
        }
    }

    /// A new grid with `delta` added to the value at each listed index.
    pub fn perturbed(&self, deltas: &[(usize, f64)]) -> CurveResult<Self> {
        let mut values = self.values.clone();
        for &(index, delta) in deltas {
            let slot = values
                .get_mut(index)
                .ok_or_else(|| CurveError::index_out_of_range(index, self.xs.len()))?;
            *slot += delta;
        }
        Ok(Self {
            xs: self.xs.clone(),
            values,
        })
    }

    /// A new grid with every value shifted by `delta`.
    #[must_use]
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            xs: self.xs.clone(),
            values: self.values.iter().map(|v| v + delta).collect(),
        }
    }
}

/// The grid of a surface: a rows × columns matrix of values.
///
/// Rows are indexed by the first coordinate (e.g. expiry), columns by the
/// second (e.g. strike).
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteSurface {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: DMatrix<f64>,
}

impl DiscreteSurface {
    /// Creates a surface grid from row-major values.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, rows: Vec<Vec<f64>>) -> CurveResult<Self> {
        validate_axis(&xs, "row")?;
        validate_axis(&ys, "column")?;
        if rows.len() != xs.len() {
            return Err(CurveError::invalid_grid(format!(
                "expected {} rows, got {}",
                xs.len(),
                rows.len()
            )));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != ys.len()) {
            return Err(CurveError::invalid_grid(format!(
                "row {bad} has {} values, expected {}",
                rows[bad].len(),
                ys.len()
            )));
        }
        let values = DMatrix::from_fn(xs.len(), ys.len(), |i, j| rows[i][j]);
        Ok(Self { xs, ys, values })
    }

    /// Creates a surface grid from a matrix whose shape matches the axes.
    pub fn from_matrix(xs: Vec<f64>, ys: Vec<f64>, values: DMatrix<f64>) -> CurveResult<Self> {
        validate_axis(&xs, "row")?;
        validate_axis(&ys, "column")?;
        if values.nrows() != xs.len() || values.ncols() != ys.len() {
            return Err(CurveError::invalid_grid(format!(
                "matrix is {}x{}, axes are {}x{}",
                values.nrows(),
                values.ncols(),
                xs.len(),
                ys.len()
            )));
        }
        Ok(Self { xs, ys, values })
    }

    /// Row coordinates.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Column coordinates.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// The value matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Value at row `i`, column `j`.
    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    /// Values of column `j` down the rows.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values.column(j).iter().copied().collect()
    }

    /// Values of row `i` across the columns.
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.values.row(i).iter().copied().collect()
    }

    /// All grid points, row by row.
    pub fn points(&self) -> Vec<Point2D> {
        let mut points = Vec::with_capacity(self.xs.len() * self.ys.len());
        for (i, &x) in self.xs.iter().enumerate() {
            for (j, &y) in self.ys.iter().enumerate() {
                points.push(Point2D::new(x, y, self.values[(i, j)]));
            }
        }
        points
    }

    /// The grid corners around `(x, y)`, or `None` when the query is a node.
    ///
    /// A query on a row or column line returns the two neighbours along the
    /// other axis.
    pub fn closest_values(&self, x: f64, y: f64) -> Option<Vec<Point2D>> {
        let rows = Bracket::locate(&self.xs, x);
        let cols = Bracket::locate(&self.ys, y);
        if matches!((rows, cols), (Bracket::Exact(_), Bracket::Exact(_))) {
            return None;
        }
        let mut corners = Vec::with_capacity(4);
        for i in rows.indices() {
            for j in cols.indices() {
                corners.push(Point2D::new(self.xs[i], self.ys[j], self.values[(i, j)]));
            }
        }
        Some(corners)
    }

    /// A new grid with `delta` added at each listed `(row, column)`.
    pub fn perturbed(&self, deltas: &[(usize, usize, f64)]) -> CurveResult<Self> {
        let mut values = self.values.clone();
        let len = values.len();
        for &(i, j, delta) in deltas {
            let slot = values
                .get_mut((i, j))
                .ok_or_else(|| CurveError::index_out_of_range(i * self.ys.len() + j, len))?;
            *slot += delta;
        }
        Ok(Self {
            xs: self.xs.clone(),
            ys: self.ys.clone(),
            values,
        })
    }
}

/// The grid of a cube: values over three ascending axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteCube {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
    values: Vec<f64>,
}

impl DiscreteCube {
    /// Creates a cube from values laid out with `z` fastest, then `y`, then `x`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, zs: Vec<f64>, values: Vec<f64>) -> CurveResult<Self> {
        validate_axis(&xs, "x")?;
        validate_axis(&ys, "y")?;
        validate_axis(&zs, "z")?;
        let expected = xs.len() * ys.len() * zs.len();
        if values.len() != expected {
            return Err(CurveError::invalid_grid(format!(
                "expected {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self { xs, ys, zs, values })
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.ys.len() + j) * self.zs.len() + k
    }

    /// First axis.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Second axis.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Third axis.
    pub fn zs(&self) -> &[f64] {
        &self.zs
    }

    /// Value at `(i, j, k)`.
    pub fn value(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        if i >= self.xs.len() || j >= self.ys.len() || k >= self.zs.len() {
            return None;
        }
        self.values.get(self.offset(i, j, k)).copied()
    }

    /// The `(y, z)` surface at the `i`th `x` coordinate.
    pub fn surface_at(&self, i: usize) -> CurveResult<DiscreteSurface> {
        if i >= self.xs.len() {
            return Err(CurveError::index_out_of_range(i, self.xs.len()));
        }
        let rows = (0..self.ys.len())
            .map(|j| {
                (0..self.zs.len())
                    .map(|k| self.values[self.offset(i, j, k)])
                    .collect()
            })
            .collect();
        DiscreteSurface::new(self.ys.clone(), self.zs.clone(), rows)
    }

    /// All grid points.
    pub fn points(&self) -> Vec<Point3D> {
        let mut points = Vec::with_capacity(self.values.len());
        for (i, &x) in self.xs.iter().enumerate() {
            for (j, &y) in self.ys.iter().enumerate() {
                for (k, &z) in self.zs.iter().enumerate() {
                    points.push(Point3D::new(x, y, z, self.values[self.offset(i, j, k)]));
                }
            }
        }
        points
    }

    /// The grid corners around `(x, y, z)`, or `None` when the query is a node.
    pub fn closest_values(&self, x: f64, y: f64, z: f64) -> Option<Vec<Point3D>> {
        let bx = Bracket::locate(&self.xs, x);
        let by = Bracket::locate(&self.ys, y);
        let bz = Bracket::locate(&self.zs, z);
        if matches!(
            (bx, by, bz),
            (Bracket::Exact(_), Bracket::Exact(_), Bracket::Exact(_))
        ) {
            return None;
        }
        let mut corners = Vec::with_capacity(8);
        for i in bx.indices() {
            for j in by.indices() {
                for k in bz.indices() {
                    corners.push(Point3D::new(
                        self.xs[i],
                        self.ys[j],
                        self.zs[k],
                        self.values[self.offset(i, j, k)],
                    ));
                }
            }
        }
        Some(corners)
    }
}
