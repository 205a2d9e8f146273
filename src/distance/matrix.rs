//! Dense all-pairs distance matrix with shortest-path predecessors.

/// A dense n×n distance matrix stored in row-major order, together with the
/// predecessor of every target on its shortest path from each source.
///
/// Unreachable pairs hold `f64::INFINITY` and no predecessor. Indices are
/// graph node indices (ascending node id).
///
/// # Examples
///
/// ```
/// use u_facility::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     (vec![0.0, 10.0], vec![None, Some(0)]),
///     (vec![10.0, 0.0], vec![Some(1), None]),
/// ])
/// .unwrap();
/// assert_eq!(dm.get(0, 1), 10.0);
/// assert_eq!(dm.path(0, 1), vec![0, 1]);
/// assert_eq!(dm.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size where every distinct pair is
    /// unreachable and every diagonal entry is zero.
    pub fn new(size: usize) -> Self {
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self {
            data,
            predecessors: vec![None; size * size],
            size,
        }
    }

    /// Assembles a matrix from one `(distances, predecessors)` row per source.
    ///
    /// Returns `None` if any row length differs from the number of rows.
    pub fn from_rows(rows: Vec<(Vec<f64>, Vec<Option<usize>>)>) -> Option<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        let mut predecessors = Vec::with_capacity(size * size);
        for (dist, pred) in rows {
            if dist.len() != size || pred.len() != size {
                return None;
            }
            data.extend(dist);
            predecessors.extend(pred);
        }
        Some(Self {
            data,
            predecessors,
            size,
        })
    }

    /// Returns the distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance and predecessor for one pair.
    pub fn set(&mut self, from: usize, to: usize, distance: f64, predecessor: Option<usize>) {
        self.data[from * self.size + to] = distance;
        self.predecessors[from * self.size + to] = predecessor;
    }

    /// The node preceding `to` on the shortest path from `from`.
    pub fn predecessor(&self, from: usize, to: usize) -> Option<usize> {
        self.predecessors[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reconstructs the shortest path `from → to` by following predecessors.
    ///
    /// Returns `[from]` when `from == to` and an empty path when `to` is
    /// unreachable.
    pub fn path(&self, from: usize, to: usize) -> Vec<usize> {
        if from == to {
            return vec![from];
        }
        if self.get(from, to).is_infinite() {
            return Vec::new();
        }
        let mut path = vec![to];
        let mut current = to;
        while let Some(prev) = self.predecessor(from, current) {
            path.push(prev);
            if prev == from || path.len() > self.size {
                break;
            }
            current = prev;
        }
        if path.last() != Some(&from) {
            return Vec::new();
        }
        path.reverse();
        path
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    ///
    /// Two infinite entries are considered equal.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a == b {
                    continue;
                }
                if (a - b).abs() > tol || a.is_infinite() || b.is_infinite() {
                    return false;
                }
            }
        }
        true
    }
}
