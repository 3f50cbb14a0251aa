//! Orthogonal reduction to upper Hessenberg form.

use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Householder reduction of `h` to upper Hessenberg form, accumulating
/// the orthogonal similarity into `v` so that `V Hess Vᵀ` equals the
/// original matrix (Algol orthes/ortran lineage).
///
/// `ort` is an `n`-length scratch buffer for the reflector vectors.
/// Columns are scaled by their 1-norm before each reflection, and the
/// accumulation step divides twice to avoid underflow in the product
/// `ort[m] * h[m][m-1]`.
pub(crate) fn hessenberg<T: FloatScalar>(v: &mut Matrix<T>, h: &mut Matrix<T>, ort: &mut [T]) {
    let n = h.nrows();
    if n == 0 {
        return;
    }
    let low = 0;
    let high = n - 1;

    for m in (low + 1)..high {
        // Scale column.
        let mut scale = T::zero();
        for i in m..=high {
            scale = scale + h[(i, m - 1)].abs();
        }
        if !scale.is_zero() {
            // Compute Householder transformation.
            let mut hh = T::zero();
            for i in (m..=high).rev() {
                ort[i] = h[(i, m - 1)] / scale;
                hh = hh + ort[i] * ort[i];
            }
            let mut g = hh.sqrt();
            if ort[m] > T::zero() {
                g = -g;
            }
            hh = hh - ort[m] * g;
            ort[m] = ort[m] - g;

            // Apply Householder similarity transformation
            // H = (I - u uᵀ/h) H (I - u uᵀ/h)
            for j in m..n {
                let mut f = T::zero();
                for i in (m..=high).rev() {
                    f = f + ort[i] * h[(i, j)];
                }
                f = f / hh;
                for i in m..=high {
                    let sub = f * ort[i];
                    h[(i, j)] = h[(i, j)] - sub;
                }
            }

            for i in 0..=high {
                let mut f = T::zero();
                for j in (m..=high).rev() {
                    f = f + ort[j] * h[(i, j)];
                }
                f = f / hh;
                for j in m..=high {
                    let sub = f * ort[j];
                    h[(i, j)] = h[(i, j)] - sub;
                }
            }
            ort[m] = scale * ort[m];
            h[(m, m - 1)] = scale * g;
        }
    }

    // Accumulate transformations.
    for i in 0..n {
        for j in 0..n {
            v[(i, j)] = if i == j { T::one() } else { T::zero() };
        }
    }

    for m in ((low + 1)..high).rev() {
        if !h[(m, m - 1)].is_zero() {
            for i in (m + 1)..=high {
                ort[i] = h[(i, m - 1)];
            }
            for j in m..=high {
                let mut g = T::zero();
                for i in m..=high {
                    g = g + ort[i] * v[(i, j)];
                }
                // Double division avoids possible underflow.
                g = (g / ort[m]) / h[(m, m - 1)];
                for i in m..=high {
                    v[(i, j)] = v[(i, j)] + g * ort[i];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn reduces_to_hessenberg_with_orthogonal_similarity() {
        let a = Matrix::<f64>::from_rows(
            4,
            4,
            &[
                4.0, 1.0, -2.0, 2.0, 1.0, 2.0, 0.0, 1.0, -2.0, 0.0, 3.0, -2.0, 2.0, 1.0, -2.0,
                -1.0,
            ],
        );
        let mut h = a.clone();
        let mut v = Matrix::zeros(4, 4);
        let mut ort = vec![0.0; 4];
        hessenberg(&mut v, &mut h, &mut ort);

        // zero below the first subdiagonal
        for i in 2..4 {
            for j in 0..(i - 1) {
                assert!(h[(i, j)].abs() < TOL, "H[({}, {})] = {}", i, j, h[(i, j)]);
            }
        }
        // V orthogonal and V H Vᵀ == A
        assert!((v.transpose() * &v).approx_eq(&Matrix::eye(4), TOL));
        let rebuilt = &v * &(&h * &v.transpose());
        assert!(rebuilt.approx_eq(&a, TOL));
    }

    #[test]
    fn two_by_two_is_untouched() {
        // nothing below the first subdiagonal to annihilate
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut h = a.clone();
        let mut v = Matrix::zeros(2, 2);
        let mut ort = vec![0.0; 2];
        hessenberg(&mut v, &mut h, &mut ort);
        assert!(h.approx_eq(&a, TOL));
        assert!(v.approx_eq(&Matrix::eye(2), TOL));
    }

    #[test]
    fn similarity_preserves_trace() {
        let a = Matrix::from_fn(5, 5, |i, j| ((3 * i + 7 * j) % 10) as f64 - 4.5);
        let mut h = a.clone();
        let mut v = Matrix::zeros(5, 5);
        let mut ort = vec![0.0; 5];
        hessenberg(&mut v, &mut h, &mut ort);
        assert!((h.trace() - a.trace()).abs() < TOL);
    }
}
