//! Dense and sparse solves for the assembled global system.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Systems with at least this many unknowns use the sparse LU path.
pub const SPARSE_THRESHOLD: usize = 256;

/// Solve `A·x = b` where `A` is given as accumulating `(row, col, value)`
/// triplets.
///
/// Small systems go through a dense LU; larger ones assemble a compressed
/// sparse matrix first. Duplicate triplets sum in both paths.
pub fn solve(
    num_vars: usize,
    triplets: &[(usize, usize, f64)],
    rhs: &[f64],
) -> SolverResult<Vec<f64>> {
    if num_vars == 0 {
        return Ok(Vec::new());
    }
    if num_vars < SPARSE_THRESHOLD {
        solve_dense(num_vars, triplets, rhs)
    } else {
        solve_sparse(num_vars, triplets, rhs)
    }
}

pub(crate) fn solve_dense(
    num_vars: usize,
    triplets: &[(usize, usize, f64)],
    rhs: &[f64],
) -> SolverResult<Vec<f64>> {
    let mut a = DMatrix::<f64>::zeros(num_vars, num_vars);
    for &(row, col, val) in triplets {
        a[(row, col)] += val;
    }
    let b = DVector::from_column_slice(rhs);

    let x = a.lu().solve(&b).ok_or_else(|| SolverError::Diverged {
        what: "dense LU failed; the assembled matrix is singular".to_string(),
    })?;
    Ok(x.iter().copied().collect())
}

pub(crate) fn solve_sparse(
    num_vars: usize,
    triplets: &[(usize, usize, f64)],
    rhs: &[f64],
) -> SolverResult<Vec<f64>> {
    use faer::prelude::SpSolver;
    use faer::sparse::SparseColMat;
    use faer::Mat;

    let a = SparseColMat::<usize, f64>::try_new_from_triplets(num_vars, num_vars, triplets)
        .map_err(|e| SolverError::Diverged {
            what: format!("sparse matrix assembly failed: {:?}", e),
        })?;
    let lu = a.as_ref().sp_lu().map_err(|e| SolverError::Diverged {
        what: format!("sparse LU failed: {:?}", e),
    })?;

    let mut b = Mat::<f64>::zeros(num_vars, 1);
    for (i, v) in rhs.iter().enumerate() {
        b.write(i, 0, *v);
    }
    let x = lu.solve(&b);
    Ok((0..num_vars).map(|i| x.read(i, 0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_system_solves_trivially() {
        assert!(solve(0, &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn dense_solves_small_system() {
        // [2 1; 1 3] x = [5; 10] has solution (1, 3)
        let triplets = [(0, 0, 2.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)];
        let x = solve_dense(2, &triplets, &[5.0, 10.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_triplets_accumulate() {
        let triplets = [(0, 0, 1.0), (0, 0, 1.0)];
        let x = solve_dense(1, &triplets, &[4.0]).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn singular_dense_system_is_reported() {
        // Two identical rows
        let triplets = [(0, 0, 1.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 1.0)];
        let err = solve_dense(2, &triplets, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SolverError::Diverged { .. }));
    }

    #[test]
    fn zero_rhs_gives_zero_solution() {
        let triplets = [(0, 0, 3.0), (0, 1, -1.0), (1, 0, -1.0), (1, 1, 2.0)];
        let x = solve_dense(2, &triplets, &[0.0, 0.0]).unwrap();
        assert_eq!(x, vec![0.0, 0.0]);
    }

    #[test]
    fn solve_routes_large_systems_through_the_sparse_path() {
        // Diagonal system at exactly the threshold size
        let n = SPARSE_THRESHOLD;
        let triplets: Vec<_> = (0..n).map(|i| (i, i, 2.0)).collect();
        let rhs: Vec<f64> = (0..n).map(|i| i as f64).collect();

        let x = solve(n, &triplets, &rhs).unwrap();
        for (i, v) in x.iter().enumerate() {
            assert!((v - i as f64 / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn dense_and_sparse_agree_on_banded_system() {
        // Diagonally dominant tridiagonal system with a non-trivial rhs
        let n = 40;
        let mut triplets = Vec::new();
        let mut rhs = Vec::new();
        for i in 0..n {
            triplets.push((i, i, 4.0));
            if i > 0 {
                triplets.push((i, i - 1, -1.0));
            }
            if i + 1 < n {
                triplets.push((i, i + 1, -1.0));
            }
            rhs.push(1.0 + i as f64 * 0.25);
        }

        let dense = solve_dense(n, &triplets, &rhs).unwrap();
        let sparse = solve_sparse(n, &triplets, &rhs).unwrap();
        for (d, s) in dense.iter().zip(&sparse) {
            assert!((d - s).abs() < 1e-9, "dense {} vs sparse {}", d, s);
        }
    }
}
