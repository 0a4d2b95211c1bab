//! Dense matrix container
//!
//! Row-major flat storage with explicit dimensions. Element `(r, c)` lives
//! at `r * cols + c`; the storage length always equals `rows * cols`.

use crate::core::{Result, SVMError};
use num_traits::Zero;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Generic dense 2D array
#[derive(Clone, Debug)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Zero + Clone> Matrix<T> {
    /// Allocate a zero-filled `rows x cols` matrix
    ///
    /// Zero-sized dimensions give an empty matrix. Fails with
    /// `InvalidArgument` if `rows * cols` overflows.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            SVMError::InvalidArgument(format!("cannot allocate {rows}x{cols} matrix: {e}"))
        })?;
        data.resize(len, T::zero());
        Ok(Self { data, rows, cols })
    }

    /// Set every element to the additive identity
    pub fn zero(&mut self) {
        self.set_const(T::zero());
    }
}

impl<T> Matrix<T> {
    /// Wrap row-major `data` as a `rows x cols` matrix
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        if data.len() != len {
            return Err(SVMError::InvalidArgument(format!(
                "{} elements cannot form a {rows}x{cols} matrix",
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(SVMError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Borrow element `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        let idx = self.offset(row, col)?;
        Ok(&self.data[idx])
    }

    /// Mutably borrow element `(row, col)`
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let idx = self.offset(row, col)?;
        Ok(&mut self.data[idx])
    }

    /// Overwrite element `(row, col)`
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    /// Borrow one row as a slice
    pub fn row(&self, row: usize) -> Result<&[T]> {
        if row >= self.rows {
            return Err(SVMError::OutOfBounds {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let start = row * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// Iterate over rows in order
    pub fn row_iter(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact(0) panics; a zero-column matrix has no data anyway
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Iterate mutably over rows in order
    pub fn row_iter_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.data.chunks_exact_mut(self.cols.max(1))
    }

    /// Set every element to `value`
    pub fn set_const(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }

    /// Structural equality: same shape and pairwise equal elements
    ///
    /// Shapes are compared first, so no element is read when they differ.
    pub fn equals(&self, other: &Matrix<T>) -> bool
    where
        T: PartialEq,
    {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        self.data.iter().zip(other.data.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Copy> Matrix<T> {
    /// Copy out element `(row, col)`
    pub fn at(&self, row: usize, col: usize) -> Result<T> {
        self.get(row, col).copied()
    }
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        SVMError::InvalidArgument(format!("matrix dimensions {rows}x{cols} overflow"))
    })
}

impl<T: PartialEq> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    /// # Panics
    /// Panics if the index is outside the matrix
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.row_iter() {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctor_zero_const() {
        let mut a: Matrix<f64> = Matrix::new(10, 5).expect("valid shape");
        assert_eq!(a.rows(), 10);
        assert_eq!(a.cols(), 5);
        assert_eq!(a.len(), 50);

        a.set_const(1.5);
        a.zero();
        for i in 0..10 {
            for j in 0..5 {
                assert_eq!(a.at(i, j).unwrap(), 0.0);
            }
        }

        a.set_const(3.3);
        for i in 0..10 {
            for j in 0..5 {
                assert_eq!(a.at(i, j).unwrap(), 3.3);
            }
        }
    }

    #[test]
    fn test_set_get() {
        let mut v: Matrix<i32> = Matrix::new(3, 2).unwrap();
        let mut next = 1;
        for r in 0..3 {
            for c in 0..2 {
                v.set(r, c, next).unwrap();
                next += 1;
            }
        }

        assert_eq!(v.at(0, 0).unwrap(), 1);
        assert_eq!(v.at(0, 1).unwrap(), 2);
        assert_eq!(v.at(1, 0).unwrap(), 3);
        assert_eq!(v.at(1, 1).unwrap(), 4);
        assert_eq!(v.at(2, 0).unwrap(), 5);
        assert_eq!(v.at(2, 1).unwrap(), 6);
        // row-major layout
        assert_eq!(v.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(v[(2, 1)], 6);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut m: Matrix<f64> = Matrix::new(3, 2).unwrap();

        assert!(matches!(
            m.at(3, 0),
            Err(SVMError::OutOfBounds { row: 3, col: 0, .. })
        ));
        assert!(matches!(m.at(0, 2), Err(SVMError::OutOfBounds { .. })));
        assert!(matches!(
            m.set(5, 5, 1.0),
            Err(SVMError::OutOfBounds { .. })
        ));
        assert!(matches!(m.row(3), Err(SVMError::OutOfBounds { .. })));
        // no implicit resize
        assert_eq!(m.shape(), (3, 2));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_panics_out_of_bounds() {
        let m: Matrix<f64> = Matrix::new(2, 2).unwrap();
        let _ = m[(2, 0)];
    }

    #[test]
    fn test_equals_equal() {
        let a = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        assert!(a.equals(&b));
        assert!(b.equals(&a));
        assert!(a.equals(&a));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equals_different() {
        let a = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 7.0]).unwrap();

        assert!(!a.equals(&b));
        assert!(!b.equals(&a));
    }

    #[test]
    fn test_equals_different_size() {
        let mut a: Matrix<f64> = Matrix::new(3, 2).unwrap();
        let mut b: Matrix<f64> = Matrix::new(2, 2).unwrap();
        a.zero();
        b.zero();

        assert!(!a.equals(&b));
        assert!(!b.equals(&a));

        // same element count, transposed shape
        let c: Matrix<f64> = Matrix::new(2, 3).unwrap();
        assert!(!a.equals(&c));
    }

    #[test]
    fn test_empty_matrix() {
        let m: Matrix<f64> = Matrix::new(0, 4).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.row_iter().count(), 0);

        let n: Matrix<f64> = Matrix::new(3, 0).unwrap();
        assert!(n.is_empty());
        assert_eq!(n.row_iter().count(), 0);
        assert!(!m.equals(&n));
    }

    #[test]
    fn test_overflowing_shape() {
        let result: Result<Matrix<u8>> = Matrix::new(usize::MAX, 2);
        assert!(matches!(result, Err(SVMError::InvalidArgument(_))));
    }

    #[test]
    fn test_unallocatable_shape() {
        // element count fits in usize, the byte size does not
        let result: Result<Matrix<f64>> = Matrix::new(2, usize::MAX / 4);
        match result {
            Err(SVMError::InvalidArgument(msg)) => assert!(msg.contains("cannot allocate"), "{msg}"),
            other => panic!("expected invalid argument, got {other:?}"),
        }
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let result = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(SVMError::InvalidArgument(_))));
    }

    #[test]
    fn test_rows() {
        let mut m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.row(1).unwrap(), &[4, 5, 6]);

        for row in m.row_iter_mut() {
            row[0] = 0;
        }
        assert_eq!(m.as_slice(), &[0, 2, 3, 0, 5, 6]);
        assert_eq!(m.to_string(), "0\t2\t3\n0\t5\t6\n");
    }
}
