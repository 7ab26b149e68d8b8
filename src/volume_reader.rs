use crate::transpose::{self, Extent};
use crate::volume::{Slice, Volume};

use dicom::object::{FileDicomObject, InMemDicomObject, open_file};
use dicom::pixeldata::PixelDecoder;
use dicom_dictionary_std::tags;
use ndarray::{Array2, Array3, ShapeBuilder, s};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeReaderError {
    #[error("unsupported image format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("slice index {slice} is out of range for a volume with {count} slices")]
    SliceOutOfRange { slice: usize, count: usize },

    #[error("expected an image with at most 3 populated axes, found {0}")]
    UnsupportedDimensionality(usize),

    #[error("missing DICOM attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("DICOM pixel data error: {0}")]
    PixelData(#[from] dicom::pixeldata::Error),

    #[error("pixel buffer shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// File formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageFormat {
    Nifti,
    Dicom,
}

pub(crate) fn image_format(path: &Path) -> Option<ImageFormat> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    if name.ends_with(".nii") || name.ends_with(".nii.gz") {
        Some(ImageFormat::Nifti)
    } else if name.ends_with(".dcm") || name.ends_with(".dicom") {
        Some(ImageFormat::Dicom)
    } else {
        None
    }
}

#[derive(Debug)]
enum Source {
    Nifti(Box<NiftiHeader>),
    Dicom(Box<FileDicomObject<InMemDicomObject>>),
}

/// One-shot reading pipeline for a volumetric image file.
///
/// Opening a file only parses its metadata; pixel data is decoded when
/// [`read_full`] or [`read_slice`] consumes the reader. All samples are
/// converted to `f64` and handed out in column-major caller order, with
/// axes 0 and 1 of the extent, origin, and spacing swapped relative to the
/// decoder's native order.
///
/// [`read_full`]: VolumeReader::read_full
/// [`read_slice`]: VolumeReader::read_slice
#[derive(Debug)]
pub struct VolumeReader {
    path: PathBuf,
    source: Source,
}

impl VolumeReader {
    /// Open an image file and read its metadata
    ///
    /// # Errors
    ///
    /// Returns an error if the file extension is not recognized or the
    /// header cannot be parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VolumeReaderError> {
        let path = path.as_ref().to_path_buf();
        let source = match image_format(&path) {
            Some(ImageFormat::Nifti) => Source::Nifti(Box::new(NiftiHeader::from_file(&path)?)),
            Some(ImageFormat::Dicom) => Source::Dicom(Box::new(open_file(&path)?)),
            None => return Err(VolumeReaderError::UnsupportedFormat(path)),
        };
        Ok(Self { path, source })
    }

    /// Extent of the image as (rows, columns, slices), without decoding
    /// pixel data
    pub fn size(&self) -> Result<(usize, usize, usize), VolumeReaderError> {
        let [s0, s1, s2] = self.native_extent()?;
        Ok((s1, s0, s2))
    }

    /// Number of planes along the third axis of the named file
    pub fn slice_count(path: impl AsRef<Path>) -> Result<usize, VolumeReaderError> {
        Ok(Self::open(path)?.native_extent()?[2])
    }

    /// Decode the whole volume and convert it to caller order
    ///
    /// # Errors
    ///
    /// Returns error if the pixel data cannot be decoded
    pub fn read_full(self) -> Result<Volume, VolumeReaderError> {
        let extent = self.native_extent()?;
        let (origin, spacing) = self.native_metadata();
        let native = self.decode()?;

        let [s0, s1, s2] = extent;
        let data = transpose::swap_leading_axes(&native, extent);
        let data = Array3::from_shape_vec((s1, s0, s2).f(), data)?;

        Ok(Volume::new(
            data,
            transpose::swap_axis_pair(origin),
            transpose::swap_axis_pair(spacing),
        ))
    }

    /// Decode a single plane along the third axis and convert it to caller
    /// order
    ///
    /// `slice` is 1-based. The returned origin is advanced to the physical
    /// position of the extracted plane.
    ///
    /// # Errors
    ///
    /// Returns error if `slice` is outside `1..=slice_count` or the pixel
    /// data cannot be decoded
    pub fn read_slice(self, slice: usize) -> Result<Slice, VolumeReaderError> {
        let [s0, s1, s2] = self.native_extent()?;
        if slice < 1 || slice > s2 {
            return Err(VolumeReaderError::SliceOutOfRange { slice, count: s2 });
        }

        let (mut origin, spacing) = self.native_metadata();
        let native = self.decode()?;

        let plane = s0 * s1;
        let offset = (slice - 1) * plane;
        let data = transpose::swap_leading_axes(&native[offset..offset + plane], [s0, s1, 1]);
        let data = Array2::from_shape_vec((s1, s0).f(), data)?;
        origin[2] += (slice - 1) as f64 * spacing[2];

        Ok(Slice::new(
            data,
            transpose::swap_axis_pair(origin),
            transpose::swap_axis_pair(spacing),
        ))
    }

    /// Extent in the decoder's native axis order, axis 0 fastest.
    fn native_extent(&self) -> Result<Extent, VolumeReaderError> {
        match &self.source {
            Source::Nifti(header) => {
                let dim = &header.dim;
                let ndim = (dim[0] as usize).min(7);
                if ndim > 3 && dim[4..=ndim].iter().any(|&d| d > 1) {
                    return Err(VolumeReaderError::UnsupportedDimensionality(ndim));
                }
                let axis = |i: usize| {
                    if i <= ndim {
                        (dim[i] as usize).max(1)
                    } else {
                        1
                    }
                };
                Ok([axis(1), axis(2), axis(3)])
            }
            Source::Dicom(obj) => {
                let cols = tag_u32(obj, tags::COLUMNS)
                    .ok_or(VolumeReaderError::MissingAttribute("Columns"))?;
                let rows = tag_u32(obj, tags::ROWS)
                    .ok_or(VolumeReaderError::MissingAttribute("Rows"))?;
                let frames = tag_u32(obj, tags::NUMBER_OF_FRAMES).unwrap_or(1).max(1);
                Ok([cols as usize, rows as usize, frames as usize])
            }
        }
    }

    /// Origin and spacing in the decoder's native axis order. Missing
    /// metadata falls back to a zero origin and unit spacing.
    fn native_metadata(&self) -> ([f64; 3], [f64; 3]) {
        match &self.source {
            Source::Nifti(header) => {
                let pixdim = |i: usize| {
                    let p = header.pixdim[i] as f64;
                    if p > 0.0 { p } else { 1.0 }
                };
                let spacing = [pixdim(1), pixdim(2), pixdim(3)];
                let origin = if header.sform_code > 0 {
                    [
                        header.srow_x[3] as f64,
                        header.srow_y[3] as f64,
                        header.srow_z[3] as f64,
                    ]
                } else if header.qform_code > 0 {
                    [
                        header.quatern_x as f64,
                        header.quatern_y as f64,
                        header.quatern_z as f64,
                    ]
                } else {
                    [0.0; 3]
                };
                (origin, spacing)
            }
            Source::Dicom(obj) => {
                // PixelSpacing is (row spacing, column spacing); native axis 0
                // runs along columns.
                let ps = tag_f64_vec(obj, tags::PIXEL_SPACING).unwrap_or_default();
                let between = tag_f64(obj, tags::SPACING_BETWEEN_SLICES)
                    .or_else(|| tag_f64(obj, tags::SLICE_THICKNESS))
                    .unwrap_or(1.0);
                let spacing = [
                    ps.get(1).copied().unwrap_or(1.0),
                    ps.first().copied().unwrap_or(1.0),
                    between,
                ];
                let origin = tag_f64_vec(obj, tags::IMAGE_POSITION_PATIENT)
                    .filter(|v| v.len() == 3)
                    .map(|v| [v[0], v[1], v[2]])
                    .unwrap_or([0.0; 3]);
                (origin, spacing)
            }
        }
    }

    /// Decode all samples to `f64` in native axis-0-fastest order.
    fn decode(&self) -> Result<Vec<f64>, VolumeReaderError> {
        match &self.source {
            Source::Nifti(_) => {
                let object = ReaderOptions::new().read_file(&self.path)?;
                let samples = object.into_volume().into_ndarray::<f64>()?;
                // iter() runs last-axis-fastest; reversing the axes yields the
                // native axis-0-fastest enumeration.
                Ok(samples.reversed_axes().iter().copied().collect())
            }
            Source::Dicom(obj) => {
                let decoded = obj.decode_pixel_data()?;
                // (frames, rows, columns, samples); only the first channel is
                // used.
                let frames = decoded.to_ndarray::<f64>()?;
                let volume = frames.slice_move(s![.., .., .., 0]);
                Ok(volume.iter().copied().collect())
            }
        }
    }
}

fn tag_u32(obj: &FileDicomObject<InMemDicomObject>, tag: dicom::core::Tag) -> Option<u32> {
    obj.element(tag).ok()?.to_int::<u32>().ok()
}

fn tag_f64(obj: &FileDicomObject<InMemDicomObject>, tag: dicom::core::Tag) -> Option<f64> {
    obj.element(tag).ok()?.to_float64().ok()
}

fn tag_f64_vec(obj: &FileDicomObject<InMemDicomObject>, tag: dicom::core::Tag) -> Option<Vec<f64>> {
    obj.element(tag).ok()?.to_multi_float64().ok()
}
