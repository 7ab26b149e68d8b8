use medvol::enums::PixelType;
use medvol::volume_reader::{VolumeReader, VolumeReaderError};
use medvol::volume_writer::{VolumeWriter, VolumeWriterError};

use ndarray::Array3;
use std::path::PathBuf;
use tempfile::tempdir;

fn test_volume(rows: usize, cols: usize, slices: usize) -> Array3<f64> {
    Array3::from_shape_fn((rows, cols, slices), |(r, c, s)| {
        (r + 10 * c + 100 * s) as f64
    })
}

fn write_volume(
    path: &PathBuf,
    image: &Array3<f64>,
    origin: [f64; 3],
    spacing: [f64; 3],
    pixel_type: PixelType,
) {
    VolumeWriter::new(path)
        .expect("should accept a NIfTI target")
        .write(image.view(), origin, spacing, pixel_type)
        .expect("should have encoded the volume");
}

#[test]
fn write_then_read_back_preserves_geometry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vol.nii");
    let image = test_volume(4, 3, 2);
    let origin = [10.0, 20.0, 30.0];
    let spacing = [1.5, 0.5, 2.0];
    write_volume(&path, &image, origin, spacing, PixelType::Double);

    let reader = VolumeReader::open(&path).unwrap();
    assert_eq!(reader.size().unwrap(), (4, 3, 2));

    let volume = reader.read_full().unwrap();
    assert_eq!(volume.dim(), (4, 3, 2));
    assert_eq!(volume.origin, origin);
    assert_eq!(volume.spacing, spacing);
    assert_eq!(volume.data, image);
}

#[test]
fn gzipped_output_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vol.nii.gz");
    let image = test_volume(3, 5, 4);
    write_volume(&path, &image, [0.0; 3], [1.0; 3], PixelType::Double);

    let volume = VolumeReader::open(&path).unwrap().read_full().unwrap();
    assert_eq!(volume.data, image);
}

#[test]
fn integer_samples_round_trip_exactly() {
    let dir = tempdir().unwrap();

    for (pixel_type, modulus) in [(PixelType::Uint8, 256usize), (PixelType::Uint16, 65536)] {
        let path = dir.path().join(format!("{pixel_type}.nii"));
        let image = Array3::from_shape_fn((7, 5, 3), |(r, c, s)| {
            ((r * 31 + c * 7 + s * 3) % modulus) as f64
        });
        write_volume(&path, &image, [0.0; 3], [1.0; 3], pixel_type);

        let volume = VolumeReader::open(&path).unwrap().read_full().unwrap();
        assert_eq!(volume.data, image, "samples changed for {pixel_type}");
    }
}

#[test]
fn float_samples_round_trip_when_representable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vol.nii");
    // Halves are exactly representable in f32.
    let image = Array3::from_shape_fn((4, 4, 2), |(r, c, s)| (r + c + s) as f64 * 0.5);
    write_volume(&path, &image, [0.0; 3], [1.0; 3], PixelType::Float);

    let volume = VolumeReader::open(&path).unwrap().read_full().unwrap();
    assert_eq!(volume.data, image);
}

#[test]
fn slice_count_matches_written_depth() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vol.nii");
    write_volume(&path, &test_volume(2, 3, 5), [0.0; 3], [1.0; 3], PixelType::Double);

    assert_eq!(VolumeReader::slice_count(&path).unwrap(), 5);
}

#[test]
fn slice_index_is_one_based_and_bounded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vol.nii");
    write_volume(&path, &test_volume(2, 3, 5), [0.0; 3], [1.0; 3], PixelType::Double);

    let err = VolumeReader::open(&path).unwrap().read_slice(0).unwrap_err();
    assert!(matches!(
        err,
        VolumeReaderError::SliceOutOfRange { slice: 0, count: 5 }
    ));

    let err = VolumeReader::open(&path).unwrap().read_slice(6).unwrap_err();
    assert!(matches!(
        err,
        VolumeReaderError::SliceOutOfRange { slice: 6, count: 5 }
    ));

    let slice = VolumeReader::open(&path).unwrap().read_slice(5).unwrap();
    assert_eq!(slice.dim(), (2, 3));
}

#[test]
fn extracted_slice_matches_full_volume() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vol.nii");
    let image = test_volume(4, 3, 5);
    let origin = [1.0, 2.0, 3.0];
    let spacing = [1.0, 1.0, 2.5];
    write_volume(&path, &image, origin, spacing, PixelType::Double);

    let slice = VolumeReader::open(&path).unwrap().read_slice(3).unwrap();
    assert_eq!(slice.data, image.index_axis(ndarray::Axis(2), 2).to_owned());
    // Origin is advanced to the physical position of the plane.
    assert_eq!(slice.origin, [1.0, 2.0, 3.0 + 2.0 * 2.5]);
    assert_eq!(slice.spacing, spacing);
}

#[test]
fn writer_rejects_unknown_extension_before_creating_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.png");

    let err = VolumeWriter::new(&path).unwrap_err();
    assert!(matches!(err, VolumeWriterError::UnsupportedFormat(_)));
    assert!(!path.exists());
}

#[test]
fn reader_rejects_unknown_extension() {
    let err = VolumeReader::open("scan.raw").unwrap_err();
    assert!(matches!(err, VolumeReaderError::UnsupportedFormat(_)));
}

#[test]
fn four_dimensional_input_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("timeseries.nii");
    nifti::writer::WriterOptions::new(&path)
        .write_nifti(&ndarray::Array4::<f64>::zeros((2, 2, 2, 2)))
        .unwrap();

    let err = VolumeReader::open(&path).unwrap().size().unwrap_err();
    assert!(matches!(
        err,
        VolumeReaderError::UnsupportedDimensionality(4)
    ));
}

#[test]
fn singleton_trailing_axes_are_tolerated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("thin.nii");
    nifti::writer::WriterOptions::new(&path)
        .write_nifti(&ndarray::Array4::<f64>::zeros((2, 3, 4, 1)))
        .unwrap();

    let reader = VolumeReader::open(&path).unwrap();
    assert_eq!(reader.size().unwrap(), (3, 2, 4));
    assert_eq!(reader.read_full().unwrap().dim(), (3, 2, 4));
}

#[test]
fn reader_surfaces_decoder_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.nii");
    std::fs::write(&path, b"definitely not a nifti header").unwrap();

    let err = VolumeReader::open(&path).unwrap_err();
    assert!(matches!(err, VolumeReaderError::Nifti(_)));
}
