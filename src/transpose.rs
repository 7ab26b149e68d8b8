use rayon::prelude::*;

/// Extent of a native image, `[s0, s1, s2]` with axis 0 the fastest-varying
/// axis in the linear sample order.
pub(crate) type Extent = [usize; 3];

/// Remap `src`, enumerated axis-0-fastest over `size`, into a buffer
/// enumerated axis-0-fastest over `[size[1], size[0], size[2]]`.
///
/// Axes 0 and 1 are swapped, axis 2 stays the slowest-varying dimension.
/// Applying the mapping twice (with the swapped extent the second time)
/// returns the original buffer, so the same function converts in both
/// directions between the decoder's x-fastest order and the column-major
/// order handed to callers.
pub(crate) fn swap_leading_axes(src: &[f64], size: Extent) -> Vec<f64> {
    let [s0, s1, s2] = size;
    let plane = s0 * s1;
    debug_assert_eq!(src.len(), plane * s2);
    if plane == 0 {
        return Vec::new();
    }

    let mut dst = vec![0.0; src.len()];
    // Destination planes along axis 2 are disjoint.
    dst.par_chunks_mut(plane)
        .zip(src.par_chunks(plane))
        .for_each(|(dst_plane, src_plane)| {
            for (count, &sample) in src_plane.iter().enumerate() {
                let row = count / s0;
                let col = count % s0;
                dst_plane[row + col * s1] = sample;
            }
        });
    dst
}

/// Swap the first two components of an origin or spacing vector.
#[inline]
pub(crate) fn swap_axis_pair(v: [f64; 3]) -> [f64; 3] {
    [v[1], v[0], v[2]]
}
