use crate::enums::PixelType;
use crate::transpose;
use crate::volume_reader::{ImageFormat, image_format};

use ndarray::{Array3, ArrayView3, ShapeBuilder};
use nifti::NiftiHeader;
use nifti::writer::WriterOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeWriterError {
    #[error("unsupported output format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("pixel buffer shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// One-shot writing pipeline for a volumetric image file.
///
/// Takes a volume in column-major caller order `(rows, columns, slices)`,
/// reverses the leading-axis transposition applied on the read side, and
/// encodes it as NIfTI with a caller-selected sample type. Unsupported
/// output extensions are rejected at construction, before any file is
/// created.
#[derive(Debug)]
pub struct VolumeWriter {
    path: PathBuf,
}

impl VolumeWriter {
    /// Create a writer targeting `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the extension does not name a writable format.
    /// No DICOM encoder is available, so only `.nii` and `.nii.gz` targets
    /// are accepted.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, VolumeWriterError> {
        let path = path.as_ref().to_path_buf();
        match image_format(&path) {
            Some(ImageFormat::Nifti) => Ok(Self { path }),
            _ => Err(VolumeWriterError::UnsupportedFormat(path)),
        }
    }

    /// Encode a volume to disk
    ///
    /// `image` has shape (rows, columns, slices); `origin` and `spacing`
    /// follow the same axis order. Samples are converted from `f64` to the
    /// storage type selected by `pixel_type` before encoding.
    ///
    /// # Errors
    ///
    /// Returns error if the external encoder fails
    pub fn write(
        &self,
        image: ArrayView3<'_, f64>,
        origin: [f64; 3],
        spacing: [f64; 3],
        pixel_type: PixelType,
    ) -> Result<(), VolumeWriterError> {
        let (rows, cols, slices) = image.dim();

        // Enumerate rows-fastest, then swap back to the native axis-0-fastest
        // order the encoder expects.
        let caller_order: Vec<f64> = image.reversed_axes().iter().copied().collect();
        let native = transpose::swap_leading_axes(&caller_order, [rows, cols, slices]);
        let native = Array3::from_shape_vec((cols, rows, slices).f(), native)?;

        let header = self.native_header(
            transpose::swap_axis_pair(origin),
            transpose::swap_axis_pair(spacing),
        );
        let options = WriterOptions::new(&self.path).reference_header(&header);
        match pixel_type {
            PixelType::Uint8 => options.write_nifti(&native.mapv(|v| v as u8))?,
            PixelType::Uint16 => options.write_nifti(&native.mapv(|v| v as u16))?,
            PixelType::Float => options.write_nifti(&native.mapv(|v| v as f32))?,
            PixelType::Double => options.write_nifti(&native)?,
        }
        Ok(())
    }

    /// Header carrying the native-order origin and spacing; dimensions and
    /// datatype are filled in by the encoder from the array itself.
    fn native_header(&self, origin: [f64; 3], spacing: [f64; 3]) -> NiftiHeader {
        let mut header = NiftiHeader::default();
        header.pixdim[0] = 1.0;
        header.pixdim[1] = spacing[0] as f32;
        header.pixdim[2] = spacing[1] as f32;
        header.pixdim[3] = spacing[2] as f32;
        header.sform_code = 1;
        header.srow_x = [spacing[0] as f32, 0.0, 0.0, origin[0] as f32];
        header.srow_y = [0.0, spacing[1] as f32, 0.0, origin[1] as f32];
        header.srow_z = [0.0, 0.0, spacing[2] as f32, origin[2] as f32];
        header
    }
}
