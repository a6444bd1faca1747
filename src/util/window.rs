//! Module containing the analysis window functions.
use std::f64::consts::TAU;

/// Multiplies each element of both buffers together.
///
/// Requires `target.len() <= other.len()`
pub fn multiply_buffers(target: &mut [f64], other: &[f64]) {
    debug_assert!(target.len() <= other.len());
    target.iter_mut().zip(other).for_each(|(a, b)| *a *= *b);
}

/// This function is used for all the below window functions, which are
/// known as "cosine sum" functions:
///
/// `w[n] = a0 - a1·cos(2πn/(N-1)) + a2·cos(4πn/(N-1)) - ...`
///
/// The windows are symmetric, so the first and last samples are equal.
fn cosine_sum(slice: &mut [f64], coeffs: &[f64]) {
    let len = slice.len();
    if len == 1 {
        slice[0] = 1.0;
        return;
    }

    let denom = (len - 1) as f64;

    for (n, x) in slice.iter_mut().enumerate() {
        let mut sum = coeffs[0];

        // we skip 1 so that we don't multiply τ by 0
        for (i, coeff) in coeffs.iter().enumerate().skip(1) {
            let term = coeff * ((i as f64 * TAU) * (n as f64) / denom).cos();

            if i % 2 == 0 {
                sum += term;
            }
            else {
                sum -= term;
            }
        }

        *x = sum;
    }
}

/// A four-term Blackman-Harris window.
///
/// Side-lobes sit around -92 dB, which keeps the analyzer's noise floor
/// clean at the cost of a wider main lobe.
pub fn blackman_harris(size: usize) -> Vec<f64> {
    let mut vec = vec![0.0; size];
    blackman_harris_in_place(&mut vec);
    vec
}

/// In-place variant of `blackman_harris()`.
pub fn blackman_harris_in_place(slice: &mut [f64]) {
    cosine_sum(slice, &[0.35875, 0.48829, 0.14128, 0.01168]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::within_tolerance;

    #[test]
    fn blackman_harris_shape() {
        let w = blackman_harris(2049);

        // a0 - a1 + a2 - a3 at the edges
        assert!(within_tolerance(w[0], 6.0e-5, 1e-9));
        assert!(within_tolerance(w[2048], 6.0e-5, 1e-9));
        assert!(within_tolerance(w[1024], 1.0, 1e-9));

        for n in 0..1024 {
            assert!(within_tolerance(w[n], w[2048 - n], 1e-12));
            assert!(w[n] <= w[n + 1] + 1e-12);
        }
    }

    #[test]
    fn multiply() {
        let mut a = [1.0, 2.0, 3.0];
        multiply_buffers(&mut a, &[0.5, 0.5, 2.0, 10.0]);
        assert_eq!(a, [0.5, 1.0, 6.0]);
    }
}
