use std::env;

use medvol::volume_reader::VolumeReader;

fn main() {
    let path = env::args().nth(1).expect("usage: medvol <image-file>");
    let reader = VolumeReader::open(&path).expect("should have opened the image file");
    let (rows, cols, slices) = reader.size().expect("should have read the image extent");
    println!("{path}: {rows} x {cols} x {slices}");

    let middle = slices / 2 + 1;
    let slice = reader
        .read_slice(middle)
        .expect("should have decoded the middle slice");
    println!("slice {middle}: origin {:?} spacing {:?}", slice.origin, slice.spacing);
}
