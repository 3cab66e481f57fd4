use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::scalar::Scalar},
};

/// A dense two-dimensional matrix of scalars, stored row-major.
///
/// Matrices are value types: assignment copies the cells, so two bound names
/// never alias the same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    /// Number of rows.
    pub rows:  usize,
    /// Number of columns.
    pub cols:  usize,
    /// Cell data, row-major: `cells[r * cols + c]`.
    pub cells: Vec<Scalar>,
}

impl Matrix {
    /// Constructs a matrix after checking that the cell count matches.
    ///
    /// # Errors
    /// Returns a description of the mismatch when `cells.len()` is not
    /// `rows * cols`.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::{matrix::Matrix, scalar::Scalar};
    ///
    /// let m = Matrix::new(2, 2, vec![Scalar::real(1.0); 4]).unwrap();
    /// assert_eq!(m.rows, 2);
    /// assert!(Matrix::new(2, 2, vec![Scalar::real(1.0); 3]).is_err());
    /// ```
    pub fn new(rows: usize, cols: usize, cells: Vec<Scalar>) -> Result<Self, String> {
        if rows * cols != cells.len() {
            return Err(format!("{} cell(s) do not fill a {rows}x{cols} matrix",
                               cells.len()));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Constructs a matrix filled with zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows,
               cols,
               cells: vec![Scalar::real(0.0); rows * cols], }
    }

    /// Constructs a single-row matrix from the given cells.
    #[must_use]
    pub fn row(cells: Vec<Scalar>) -> Self {
        Self { rows: 1,
               cols: cells.len(),
               cells }
    }

    /// The number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` for the 0x0 matrix.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` when the matrix is a single row or a single column.
    #[must_use]
    pub const fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    /// Reads the cell at `(row, col)`.
    ///
    /// # Errors
    /// `RuntimeError::IndexOutOfBounds` when either coordinate is outside
    /// the matrix.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::{matrix::Matrix, scalar::Scalar};
    ///
    /// let m = Matrix::new(2,
    ///                     2,
    ///                     vec![Scalar::real(1.0),
    ///                          Scalar::real(2.0),
    ///                          Scalar::real(3.0),
    ///                          Scalar::real(4.0),]).unwrap();
    ///
    /// assert_eq!(m.get(1, 0, 1).unwrap(), Scalar::real(3.0));
    /// assert!(m.get(2, 0, 1).is_err());
    /// ```
    pub fn get(&self, row: usize, col: usize, line: usize) -> EvalResult<Scalar> {
        if row >= self.rows {
            return Err(RuntimeError::IndexOutOfBounds { max: self.rows.saturating_sub(1),
                                                        found: row,
                                                        line });
        }
        if col >= self.cols {
            return Err(RuntimeError::IndexOutOfBounds { max: self.cols.saturating_sub(1),
                                                        found: col,
                                                        line });
        }
        Ok(self.cells[row * self.cols + col])
    }

    /// Writes the cell at `(row, col)`.
    ///
    /// # Errors
    /// `RuntimeError::IndexOutOfBounds` when either coordinate is outside
    /// the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: Scalar, line: usize) -> EvalResult<()> {
        if row >= self.rows {
            return Err(RuntimeError::IndexOutOfBounds { max: self.rows.saturating_sub(1),
                                                        found: row,
                                                        line });
        }
        if col >= self.cols {
            return Err(RuntimeError::IndexOutOfBounds { max: self.cols.saturating_sub(1),
                                                        found: col,
                                                        line });
        }
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    /// Reads a cell by linear index. Only vectors support linear indexing.
    ///
    /// # Errors
    /// - `RuntimeError::KindMismatch` when the matrix is not a vector.
    /// - `RuntimeError::IndexOutOfBounds` when the index is too large.
    pub fn get_linear(&self, index: usize, line: usize) -> EvalResult<Scalar> {
        if !self.is_vector() {
            return Err(RuntimeError::KindMismatch { expected:
                                                        "a vector for linear indexing".to_string(),
                                                    found:    format!("a {}x{} matrix",
                                                                      self.rows, self.cols),
                                                    line, });
        }
        if index >= self.cells.len() {
            return Err(RuntimeError::IndexOutOfBounds { max: self.cells.len().saturating_sub(1),
                                                        found: index,
                                                        line });
        }
        Ok(self.cells[index])
    }

    /// Writes a cell by linear index. Only vectors support linear indexing.
    ///
    /// # Errors
    /// Same conditions as [`Matrix::get_linear`].
    pub fn set_linear(&mut self, index: usize, value: Scalar, line: usize) -> EvalResult<()> {
        if !self.is_vector() {
            return Err(RuntimeError::KindMismatch { expected:
                                                        "a vector for linear indexing".to_string(),
                                                    found:    format!("a {}x{} matrix",
                                                                      self.rows, self.cols),
                                                    line, });
        }
        if index >= self.cells.len() {
            return Err(RuntimeError::IndexOutOfBounds { max: self.cells.len().saturating_sub(1),
                                                        found: index,
                                                        line });
        }
        self.cells[index] = value;
        Ok(())
    }

    /// Extracts one row as a `1 x cols` matrix.
    ///
    /// # Errors
    /// `RuntimeError::IndexOutOfBounds` when the row does not exist.
    pub fn row_at(&self, row: usize, line: usize) -> EvalResult<Self> {
        if row >= self.rows {
            return Err(RuntimeError::IndexOutOfBounds { max: self.rows.saturating_sub(1),
                                                        found: row,
                                                        line });
        }
        let cells = self.cells[row * self.cols..(row + 1) * self.cols].to_vec();
        Ok(Self::row(cells))
    }

    /// Extracts one column as a `rows x 1` matrix.
    ///
    /// # Errors
    /// `RuntimeError::IndexOutOfBounds` when the column does not exist.
    pub fn col_at(&self, col: usize, line: usize) -> EvalResult<Self> {
        if col >= self.cols {
            return Err(RuntimeError::IndexOutOfBounds { max: self.cols.saturating_sub(1),
                                                        found: col,
                                                        line });
        }
        let cells = (0..self.rows).map(|r| self.cells[r * self.cols + col])
                                  .collect();
        Ok(Self { rows: self.rows,
                  cols: 1,
                  cells })
    }

    /// Applies a function to every cell, producing a new matrix.
    #[must_use]
    pub fn map(&self, f: impl Fn(Scalar) -> Scalar) -> Self {
        Self { rows:  self.rows,
               cols:  self.cols,
               cells: self.cells.iter().map(|&c| f(c)).collect(), }
    }

    /// Combines two equally shaped matrices cell by cell.
    ///
    /// Returns `None` when the shapes differ; the caller turns that into a
    /// `DimensionMismatch` with the proper line.
    #[must_use]
    pub fn zip_map(&self, other: &Self, f: impl Fn(Scalar, Scalar) -> Scalar) -> Option<Self> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        let cells = self.cells
                        .iter()
                        .zip(other.cells.iter())
                        .map(|(&a, &b)| f(a, b))
                        .collect();
        Some(Self { rows: self.rows,
                    cols: self.cols,
                    cells })
    }

    /// Computes the matrix product `self * other`.
    ///
    /// Returns `None` when the inner dimensions disagree.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::{matrix::Matrix, scalar::Scalar};
    ///
    /// let a = Matrix::new(2,
    ///                     2,
    ///                     vec![Scalar::real(1.0),
    ///                          Scalar::real(2.0),
    ///                          Scalar::real(3.0),
    ///                          Scalar::real(4.0),]).unwrap();
    ///
    /// let product = a.matmul(&a).unwrap();
    /// assert_eq!(product.get(0, 0, 1).unwrap(), Scalar::real(7.0));
    /// assert_eq!(product.get(1, 1, 1).unwrap(), Scalar::real(22.0));
    /// ```
    #[must_use]
    pub fn matmul(&self, other: &Self) -> Option<Self> {
        if self.cols != other.rows {
            return None;
        }

        let mut out = Self::zeros(self.rows, other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                let mut acc = Scalar::real(0.0);
                for k in 0..self.cols {
                    acc += self.cells[r * self.cols + k] * other.cells[k * other.cols + c];
                }
                out.cells[r * other.cols + c] = acc;
            }
        }
        Some(out)
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                cells.push(self.cells[r * self.cols + c]);
            }
        }
        Self { rows: self.cols,
               cols: self.rows,
               cells }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows {
            if r > 0 {
                write!(f, "; ")?;
            }
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.cells[r * self.cols + c])?;
            }
        }
        write!(f, "]")
    }
}
