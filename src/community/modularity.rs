use std::collections::HashMap;

use log::debug;
use nalgebra::{Complex, DMatrix, DVector, SymmetricEigen};
use serde::Deserialize;

use crate::community::subgraph::Subgraph;

const SCHUR_MAX_ITERATIONS: usize = 10_000;
/// Relative tolerance for the second Schur attempt.
const RELAXED_SCHUR_EPSILON: f64 = 1e-12;
const SYMMETRIC_MAX_ITERATIONS: usize = 10_000;
/// A matrix whose entries are all below this is treated as zero.
const ZERO_MATRIX_TOLERANCE: f64 = 1e-12;
const INVERSE_ITERATION_STEPS: usize = 100;
const INVERSE_ITERATION_TOLERANCE: f64 = 1e-12;
/// Relative offset keeping `B − λI` invertible during inverse iteration.
const SHIFT_OFFSET: f64 = 1e-10;

/// How the modularity matrix treats edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModularityMode {
    /// `B[i][j] = A[i][j] − out[i]·in[j] / m`.
    #[default]
    Directed,
    /// `(B + Bᵀ) / 2`, the symmetric form of the directed matrix.
    Symmetrized,
}

/// Modularity matrix of `sub`, rows and columns in `sub.nodes()` order.
///
/// Degrees and the edge total are counted inside the subgraph only.
/// Returns `None` when the subgraph has no internal edges.
pub fn modularity_matrix(sub: &Subgraph<'_>, mode: ModularityMode) -> Option<DMatrix<f64>> {
    let edges = sub.edges();
    if edges.is_empty() {
        return None;
    }

    let n = sub.len();
    let position: HashMap<_, _> = sub.nodes().iter().enumerate().map(|(i, idx)| (*idx, i)).collect();

    let mut adjacency = DMatrix::<f64>::zeros(n, n);
    let mut out_degree = vec![0.0; n];
    let mut in_degree = vec![0.0; n];
    for (u, v) in &edges {
        let (i, j) = (position[u], position[v]);
        adjacency[(i, j)] = 1.0;
        out_degree[i] += 1.0;
        in_degree[j] += 1.0;
    }

    let total = edges.len() as f64;
    let b = DMatrix::from_fn(n, n, |i, j| {
        adjacency[(i, j)] - out_degree[i] * in_degree[j] / total
    });

    Some(match mode {
        ModularityMode::Directed => b,
        ModularityMode::Symmetrized => (&b + b.transpose()) * 0.5,
    })
}

fn is_decomposable(b: &DMatrix<f64>) -> bool {
    !b.is_empty() && b.iter().all(|x| x.is_finite())
}

/// Eigenvalue of `b` with the largest real part, `None` when the Schur
/// decomposition does not converge even with a relaxed tolerance.
pub fn leading_eigenvalue(b: &DMatrix<f64>) -> Option<Complex<f64>> {
    if !is_decomposable(b) {
        return None;
    }
    if b.amax() < ZERO_MATRIX_TOLERANCE {
        return Some(Complex::new(0.0, 0.0));
    }

    let schur = b
        .clone()
        .try_schur(f64::EPSILON, SCHUR_MAX_ITERATIONS)
        .or_else(|| {
            debug!("schur did not converge, retrying with tolerance {}", RELAXED_SCHUR_EPSILON);
            b.clone().try_schur(RELAXED_SCHUR_EPSILON, SCHUR_MAX_ITERATIONS)
        })?;
    schur
        .complex_eigenvalues()
        .iter()
        .copied()
        .filter(|l| l.re.is_finite() && l.im.is_finite())
        .max_by(|a, b| a.re.total_cmp(&b.re))
}

/// Eigenvector of `b` for the eigenvalue `lambda`, by shifted inverse iteration.
///
/// The vector is unit-length with its largest-magnitude entry real and
/// positive, so its sign pattern is reproducible.
pub fn eigenvector(b: &DMatrix<f64>, lambda: Complex<f64>) -> Option<DVector<Complex<f64>>> {
    let n = b.nrows();
    let shift = lambda + Complex::new(b.amax().max(1.0) * SHIFT_OFFSET, 0.0);
    let shifted = DMatrix::from_fn(n, n, |i, j| {
        let entry = Complex::new(b[(i, j)], 0.0);
        if i == j {
            entry - shift
        } else {
            entry
        }
    });
    let lu = shifted.lu();

    // the uniform vector is always in B's null space, so start off it
    let mut v = DVector::from_fn(n, |i, _| Complex::new(1.0 + ((i + 1) as f64).sin() * 0.5, 0.0));
    v = normalize(v)?;

    for _ in 0..INVERSE_ITERATION_STEPS {
        let next = normalize(lu.solve(&v)?)?;
        let delta = (&next - &v).norm();
        v = next;
        if delta < INVERSE_ITERATION_TOLERANCE {
            break;
        }
    }

    Some(v)
}

/// Largest eigenvalue of a symmetric `b` and its eigenvector, normalized as
/// in [`eigenvector`].
pub fn symmetric_leading_eigenpair(b: &DMatrix<f64>) -> Option<(f64, DVector<Complex<f64>>)> {
    if !is_decomposable(b) {
        return None;
    }

    let eigen = SymmetricEigen::try_new(b.clone(), f64::EPSILON, SYMMETRIC_MAX_ITERATIONS)?;
    let (k, value) = eigen
        .eigenvalues
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    let vector = eigen.eigenvectors.column(k).map(|x| Complex::new(x, 0.0));

    Some((value, normalize(vector)?))
}

/// Scale to unit norm and rotate so the largest-magnitude entry is real positive.
fn normalize(v: DVector<Complex<f64>>) -> Option<DVector<Complex<f64>>> {
    let norm = v.norm();
    if !norm.is_finite() || norm == 0.0 {
        return None;
    }

    let pivot = v
        .iter()
        .copied()
        .max_by(|a, b| a.norm().total_cmp(&b.norm()))?;
    let phase = pivot / pivot.norm();

    Some(v.map(|c| c / phase / norm))
}
