use ndarray::{Array2, Array3};

/// A decoded volume in caller order.
///
/// `data` has shape `(rows, columns, slices)` and is stored column-major
/// (rows varying fastest), so the flat sample order matches what a
/// column-major host expects. `origin` and `spacing` follow the same axis
/// order as the shape.
#[derive(Debug, Default, Clone)]
pub struct Volume {
    pub data: Array3<f64>,
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
}

impl Volume {
    pub fn new(data: Array3<f64>, origin: [f64; 3], spacing: [f64; 3]) -> Self {
        Self {
            data,
            origin,
            spacing,
        }
    }

    /// Get the dimensions of the volume (rows, columns, slices)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of planes along the third axis
    pub fn slice_count(&self) -> usize {
        self.data.dim().2
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Get a mutable reference to the underlying data
    pub fn data_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }
}

/// A single plane extracted from a volume, `(rows, columns)` column-major.
///
/// `origin` keeps all three components; the third one is advanced to the
/// physical position of the extracted plane.
#[derive(Debug, Default, Clone)]
pub struct Slice {
    pub data: Array2<f64>,
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
}

impl Slice {
    pub fn new(data: Array2<f64>, origin: [f64; 3], spacing: [f64; 3]) -> Self {
        Self {
            data,
            origin,
            spacing,
        }
    }

    /// Get the dimensions of the plane (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}
