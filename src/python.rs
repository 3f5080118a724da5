//! Python bindings for `f64` k-d trees, enabled by the `python` feature.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::KdTreeError;
use crate::kd_tree::KdTree;
use crate::metric;

fn to_py_err(err: KdTreeError) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

fn to_tuples(results: Vec<crate::NearestResult<f64>>) -> Vec<(Vec<f64>, f64)> {
    results.into_iter().map(|r| (r.point, r.squared_distance)).collect()
}

#[pyclass(name = "KdTree")]
struct PyKdTree {
    tree: KdTree<f64>,
}

#[pymethods]
impl PyKdTree {
    #[new]
    fn new(points: Vec<Vec<f64>>) -> PyResult<Self> {
        let tree = KdTree::build(points).map_err(to_py_err)?;
        Ok(PyKdTree { tree })
    }

    /// Returns `(point, squared_distance)` of the closest stored point.
    fn nearest(&self, goal: Vec<f64>) -> PyResult<(Vec<f64>, f64)> {
        let result = self.tree.nearest(&goal).map_err(to_py_err)?;
        Ok((result.point, result.squared_distance))
    }

    fn k_nearest(&self, goal: Vec<f64>, n_neighbors: usize) -> PyResult<Vec<(Vec<f64>, f64)>> {
        self.tree.k_nearest(&goal, n_neighbors).map(to_tuples).map_err(to_py_err)
    }

    fn within_radius(&self, goal: Vec<f64>, radius_squared: f64) -> PyResult<Vec<(Vec<f64>, f64)>> {
        self.tree.within_radius(&goal, radius_squared).map(to_tuples).map_err(to_py_err)
    }

    #[getter]
    fn dimensions(&self) -> Option<usize> {
        self.tree.dimensions()
    }

    fn __len__(&self) -> usize {
        self.tree.len()
    }

    fn __str__(&self) -> String {
        self.tree.to_string()
    }
}

/// Squared Euclidean distance between two vectors of f64.
#[pyfunction]
fn squared_euclidean(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    if a.len() != b.len() {
        return Err(to_py_err(KdTreeError::DimensionMismatch { expected: a.len(), found: b.len() }));
    }
    metric::squared_euclidean(&a, &b).ok_or_else(|| to_py_err(KdTreeError::DistanceOverflow))
}

/// The Python module. Its name must match `lib.name` in `Cargo.toml`.
#[pymodule]
fn kd_nearest(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(squared_euclidean, m)?)?;
    m.add_class::<PyKdTree>()?;
    Ok(())
}
