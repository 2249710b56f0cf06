//! Fixed-column, growable-row matrix.
//!
//! Backed by one contiguous row-major `Vec<T>`; rows are appended whole and
//! never removed. Used for the light-exposure (chunks × wavelengths) and
//! soil-temperature (chunks × depths) grids of a [`Series`](crate::Series).

use crate::error::MatrixError;

/// A row-major 2D container with a fixed column count.
///
/// # Examples
///
/// ```
/// use adf_core::Matrix;
///
/// let mut m = Matrix::<f32>::new(3);
/// m.append_row(&[0.1, 0.2, 0.3]).unwrap();
/// assert_eq!(m.shape(), (1, 3));
/// assert_eq!(m.at(0, 2), Ok(0.3));
/// assert!(m.append_row(&[1.0]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "RawMatrix<T>",
        bound(
            serialize = "T: serde::Serialize",
            deserialize = "T: serde::Deserialize<'de> + Copy"
        )
    )
)]
pub struct Matrix<T> {
    rows: u32,
    columns: u32,
    data: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    /// An empty matrix (zero rows) with `columns` columns.
    pub fn new(columns: u32) -> Self {
        Self {
            rows: 0,
            columns,
            data: Vec::new(),
        }
    }

    /// An empty matrix with room for `rows` rows before reallocating.
    pub fn with_capacity(rows: u32, columns: u32) -> Self {
        Self {
            rows: 0,
            columns,
            data: Vec::with_capacity(rows as usize * columns as usize),
        }
    }

    /// Build a matrix from a row-major flat buffer.
    ///
    /// Fails with [`MatrixError::ShapeMismatch`] unless
    /// `data.len() == rows * columns`.
    pub fn from_flat(rows: u32, columns: u32, data: Vec<T>) -> Result<Self, MatrixError> {
        let expected = rows as usize * columns as usize;
        if data.len() != expected {
            return Err(MatrixError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    /// Build a matrix from a slice of rows, each of length `columns`.
    pub fn from_rows<R: AsRef<[T]>>(columns: u32, rows: &[R]) -> Result<Self, MatrixError> {
        let mut m = Self::with_capacity(rows.len() as u32, columns);
        for row in rows {
            m.append_row(row.as_ref())?;
        }
        Ok(m)
    }

    /// Append one row. `values.len()` must equal the column count.
    pub fn append_row(&mut self, values: &[T]) -> Result<(), MatrixError> {
        if values.len() != self.columns as usize {
            return Err(MatrixError::ShapeMismatch {
                expected: self.columns as usize,
                found: values.len(),
            });
        }
        self.data.extend_from_slice(values);
        self.rows += 1;
        Ok(())
    }

    /// The element at (`row`, `column`).
    pub fn at(&self, row: u32, column: u32) -> Result<T, MatrixError> {
        if row >= self.rows || column >= self.columns {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(self.data[row as usize * self.columns as usize + column as usize])
    }

    /// One row as a slice, or `None` if `row >= rows`.
    pub fn row(&self, row: u32) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let width = self.columns as usize;
        let start = row as usize * width;
        Some(&self.data[start..start + width])
    }

    /// Iterate over rows in order.
    ///
    /// A zero-column matrix yields `rows` empty slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).filter_map(move |r| self.row(r))
    }
}

impl<T> Matrix<T> {
    /// Number of rows appended so far.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Fixed column count.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Total number of elements (`rows * columns`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no rows have been appended.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The row-major backing buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix, returning its row-major backing buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// Unchecked wire shape used to deserialize a [`Matrix`] before validation.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMatrix<T> {
    rows: u32,
    columns: u32,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: Copy> TryFrom<RawMatrix<T>> for Matrix<T> {
    type Error = MatrixError;

    fn try_from(raw: RawMatrix<T>) -> Result<Self, Self::Error> {
        Matrix::from_flat(raw.rows, raw.columns, raw.data)
    }
}
