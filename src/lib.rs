//! # medvol
//!
//! Read, slice, and write volumetric medical images with column-major
//! layout conversion.
//!
//! This crate wraps the nifti-rs and dicom-rs decoders behind a small
//! pipeline API. Decoders hand back samples with the first image axis
//! varying fastest; callers expecting column-major (rows, columns, slices)
//! arrays get every volume with the first two axes swapped, and the origin
//! and spacing vectors swapped the same way. The conversion is its own
//! inverse, so writing applies the identical mapping in reverse before
//! delegating to the encoder.
//!
//! Reads can be restricted to a single plane along the third axis (1-based
//! index) to keep memory use down for large volumes. Each reader or writer
//! is a one-shot object scoped to a single call; nothing is cached between
//! calls.
//!
//! # Examples
//!
//! ## Reading one slice of a volume
//!
//! ```no_run
//! # use medvol::volume_reader::VolumeReader;
//! let count = VolumeReader::slice_count("scan.nii.gz")
//!     .expect("should have read the header");
//! let slice = VolumeReader::open("scan.nii.gz")
//!     .expect("should have opened the file")
//!     .read_slice(count / 2 + 1)
//!     .expect("should have decoded the middle slice");
//! println!("{:?} at {:?}", slice.dim(), slice.origin);
//! ```
//!
//! ## Writing a volume
//!
//! ```no_run
//! # use medvol::{enums::PixelType, volume_writer::VolumeWriter};
//! # use ndarray::Array3;
//! let image = Array3::<f64>::zeros((64, 64, 16));
//! let writer = VolumeWriter::new("out.nii").expect("should be a writable format");
//! writer
//!     .write(image.view(), [0.0; 3], [1.0, 1.0, 2.5], PixelType::Uint16)
//!     .expect("should have encoded the volume");
//! ```

pub mod enums;
mod transpose;
pub mod volume;
pub mod volume_reader;
pub mod volume_writer;
