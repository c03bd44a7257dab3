//! Square matrices over a prime field
//!
//! Secret recovery is a linear-algebra problem: the shards are rows of a
//! Vandermonde system V·c = y whose solution c holds the polynomial
//! coefficients. This module factors V with an LU decomposition (row
//! pivoting) and inverts it by forward/backward substitution, all mod the
//! field order.

use crate::{PrimeField, SharingError};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// A square matrix with entries in `[0, p)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<BigUint>>,
}

/// LU factorization with a row permutation.
///
/// `lu` stores L below the diagonal (unit diagonal implied) and U on and
/// above it; `perm[i]` is the source row of row i; `diag_inv` caches the
/// inverses of U's pivots.
struct Lup {
    lu: Vec<Vec<BigUint>>,
    perm: Vec<usize>,
    diag_inv: Vec<BigUint>,
}

impl Matrix {
    /// Build a matrix from rows, reducing every entry mod the field order.
    ///
    /// Fails unless the shape is square and non-empty.
    pub fn from_rows(rows: Vec<Vec<BigUint>>, field: &PrimeField) -> Result<Self, SharingError> {
        let n = rows.len();
        if n == 0 || rows.iter().any(|r| r.len() != n) {
            return Err(SharingError::InvalidParameters(
                "Matrix must be square and non-empty".into(),
            ));
        }
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(|v| field.reduce(&v)).collect())
            .collect();
        Ok(Self { rows })
    }

    /// The T×T Vandermonde matrix of the given x-coordinates:
    /// row i = `[1, x_i, x_i^2, ..., x_i^(T-1)]` mod p.
    pub fn vandermonde(xs: &[BigUint], field: &PrimeField) -> Self {
        let n = xs.len();
        let rows = xs
            .iter()
            .map(|x| {
                let x = field.reduce(x);
                let mut row = Vec::with_capacity(n);
                let mut power = BigUint::one();
                for _ in 0..n {
                    row.push(power.clone());
                    power = field.mul(&power, &x);
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<BigUint>] {
        &self.rows
    }

    /// LU-decompose with row pivoting.
    ///
    /// The pivot is the first row with a nonzero entry in the column — in
    /// an exact field any nonzero pivot works, there is no rounding to
    /// control. A column with no nonzero candidate means the matrix is
    /// singular mod p (duplicate x-coordinates in the Vandermonde case).
    fn lup_decompose(&self, field: &PrimeField) -> Result<Lup, SharingError> {
        let n = self.size();
        let mut lu = self.rows.clone();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut diag_inv = Vec::with_capacity(n);

        for k in 0..n {
            let pivot = (k..n)
                .find(|&r| !lu[r][k].is_zero())
                .ok_or(SharingError::SingularMatrix)?;
            lu.swap(k, pivot);
            perm.swap(k, pivot);

            let inv = field.inverse(&lu[k][k])?;
            for i in (k + 1)..n {
                if lu[i][k].is_zero() {
                    continue;
                }
                let factor = field.mul(&lu[i][k], &inv);
                for j in (k + 1)..n {
                    let t = field.mul(&factor, &lu[k][j]);
                    lu[i][j] = field.sub(&lu[i][j], &t);
                }
                lu[i][k] = factor;
            }
            diag_inv.push(inv);
        }

        Ok(Lup { lu, perm, diag_inv })
    }

    /// Invert mod p via the LU factors, one identity column at a time.
    ///
    /// Fails with `SingularMatrix` when no factorization exists.
    pub fn invert(&self, field: &PrimeField) -> Result<Matrix, SharingError> {
        let n = self.size();
        let lup = self.lup_decompose(field)?;

        let mut inv_rows = vec![vec![BigUint::zero(); n]; n];
        for col in 0..n {
            let mut e = vec![BigUint::zero(); n];
            e[col] = BigUint::one();
            let x = lup.solve(&e, field);
            for (row, value) in x.into_iter().enumerate() {
                inv_rows[row][col] = value;
            }
        }
        Ok(Matrix { rows: inv_rows })
    }

    /// Matrix-vector product mod p.
    ///
    /// Panics if the vector length does not match the matrix size; callers
    /// inside this crate always pass matching shapes.
    pub fn mul_vector(&self, v: &[BigUint], field: &PrimeField) -> Vec<BigUint> {
        assert_eq!(v.len(), self.size(), "Vector length must match matrix size");
        self.rows
            .iter()
            .map(|row| {
                let mut acc = BigUint::zero();
                for (a, b) in row.iter().zip(v) {
                    acc = field.add(&acc, &field.mul(a, b));
                }
                acc
            })
            .collect()
    }
}

impl Lup {
    /// Solve A·x = b using the stored factors: permute b, forward-solve
    /// L·y = Pb, back-solve U·x = y.
    fn solve(&self, b: &[BigUint], field: &PrimeField) -> Vec<BigUint> {
        let n = self.lu.len();

        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let mut acc = b[self.perm[i]].clone();
            for k in 0..i {
                let t = field.mul(&self.lu[i][k], &y[k]);
                acc = field.sub(&acc, &t);
            }
            y.push(acc);
        }

        let mut x = vec![BigUint::zero(); n];
        for i in (0..n).rev() {
            let mut acc = y[i].clone();
            for k in (i + 1)..n {
                let t = field.mul(&self.lu[i][k], &x[k]);
                acc = field.sub(&acc, &t);
            }
            x[i] = field.mul(&acc, &self.diag_inv[i]);
        }
        x
    }
}
