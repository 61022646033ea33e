// SIMD helpers for the dense feature spaces.
// Feature rows are f64, so the wide path is AVX2/FMA over four lanes and
// everything else falls back to a scalar loop with split accumulators.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

// Below this width the feature detection and lane setup cost more than they save
#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 16;

/// Dot product of two equally sized rows.
/// Returns 0.0 when the lengths differ.
#[inline]
pub fn dot_product_simd(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
            && a.len() >= MIN_DIM_SIZE_AVX
        {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

/// Euclidean norm of a row.
#[inline]
pub fn norm_simd(a: &[f64]) -> f64 {
    dot_product_simd(a, a).sqrt()
}

/// AVX2 dot product, eight f64 per iteration across two registers
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn dot_product_avx2(a: &[f64], b: &[f64]) -> f64 {
    let dim = a.len();
    let mut i = 0;

    let mut sum1 = _mm256_setzero_pd();
    let mut sum2 = _mm256_setzero_pd();

    while i + 7 < dim {
        let vx1 = _mm256_loadu_pd(a.as_ptr().add(i));
        let vy1 = _mm256_loadu_pd(b.as_ptr().add(i));
        let vx2 = _mm256_loadu_pd(a.as_ptr().add(i + 4));
        let vy2 = _mm256_loadu_pd(b.as_ptr().add(i + 4));

        sum1 = _mm256_fmadd_pd(vx1, vy1, sum1);
        sum2 = _mm256_fmadd_pd(vx2, vy2, sum2);

        i += 8;
    }

    let combined = _mm256_add_pd(sum1, sum2);
    let high = _mm256_extractf128_pd(combined, 1);
    let low = _mm256_castpd256_pd128(combined);
    let pair = _mm_add_pd(high, low);
    let swapped = _mm_unpackhi_pd(pair, pair);
    let mut dot = _mm_cvtsd_f64(_mm_add_sd(pair, swapped));

    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }

    dot
}

#[inline]
fn dot_product_scalar(a: &[f64], b: &[f64]) -> f64 {
    let mut dot0 = 0.0f64;
    let mut dot1 = 0.0f64;

    let chunks = a.chunks_exact(4);
    let remainder = chunks.remainder();
    let b_chunks = b.chunks_exact(4);
    let b_remainder = b_chunks.remainder();

    for (ca, cb) in chunks.zip(b_chunks) {
        dot0 += ca[0] * cb[0] + ca[1] * cb[1];
        dot1 += ca[2] * cb[2] + ca[3] * cb[3];
    }

    for (x, y) in remainder.iter().zip(b_remainder) {
        dot0 += x * y;
    }

    dot0 + dot1
}
