//! Closed-form eigensolver for 3x3 symmetric matrices.
//!
//! Eigenvalues come from the trigonometric solution of the
//! characteristic cubic; eigenvectors from the robust cross-product
//! scheme (best-conditioned cross product for the extreme eigenvector,
//! an orthogonal-complement 2x2 reduction for the middle one).

use crate::matrix::vector::Vector;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

#[inline]
fn lit<T: FloatScalar>(x: f64) -> T {
    T::from_f64(x).unwrap_or_else(T::nan)
}

fn det3<T: FloatScalar>(m: &Matrix<T>) -> T {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Eigenvalues of a 3x3 symmetric matrix in ascending order, by the
/// trigonometric solution of the characteristic cubic. Diagonal input
/// short-circuits. Panics unless `a` is 3x3.
pub fn symmetric_eigenvalues3<T: FloatScalar>(a: &Matrix<T>) -> [T; 3] {
    assert_eq!(a.dims(), (3, 3), "analytic eigensolver requires a 3x3 matrix");
    let two = T::one() + T::one();
    let three = two + T::one();
    let six = three * two;

    // off-diagonal magnitude, upper triangle
    let p1 = a[(0, 1)] * a[(0, 1)] + a[(0, 2)] * a[(0, 2)] + a[(1, 2)] * a[(1, 2)];
    if p1.is_zero() {
        let mut eigs = [a[(0, 0)], a[(1, 1)], a[(2, 2)]];
        eigs.sort_by(|x, y| x.partial_cmp(y).unwrap_or(core::cmp::Ordering::Equal));
        return eigs;
    }

    let q = a.trace() / three;
    let p2 = (a[(0, 0)] - q) * (a[(0, 0)] - q)
        + (a[(1, 1)] - q) * (a[(1, 1)] - q)
        + (a[(2, 2)] - q) * (a[(2, 2)] - q)
        + two * p1;
    let p = (p2 / six).sqrt();
    let b = Matrix::from_fn(3, 3, |i, j| {
        let shift = if i == j { q } else { T::zero() };
        (a[(i, j)] - shift) / p
    });
    // exact arithmetic keeps r in [-1, 1]; rounding can step outside
    let r = det3(&b) / two;
    let phi = if r <= -T::one() {
        lit::<T>(core::f64::consts::FRAC_PI_3)
    } else if r >= T::one() {
        T::zero()
    } else {
        r.acos() / three
    };

    let two_thirds_pi = lit::<T>(2.0 * core::f64::consts::FRAC_PI_3);
    let eig2 = q + two * p * phi.cos();
    let eig0 = q + two * p * (phi + two_thirds_pi).cos();
    let eig1 = three * q - eig0 - eig2;
    [eig0, eig1, eig2]
}

/// Eigenvector for the eigenvalue of multiplicity one: the
/// best-conditioned cross product of two rows of `A - val * I`.
fn eigenvector_simple<T: FloatScalar>(a: &Matrix<T>, val: T) -> Vector<T> {
    let shifted =
        Matrix::from_fn(3, 3, |i, j| a[(i, j)] - if i == j { val } else { T::zero() });
    let r0 = shifted.row(0);
    let r1 = shifted.row(1);
    let r2 = shifted.row(2);

    let r0r1 = r0.cross(&r1);
    let r0r2 = r0.cross(&r2);
    let r1r2 = r1.cross(&r2);

    let d0 = r0r1.dot(&r0r1);
    let d1 = r0r2.dot(&r0r2);
    let d2 = r1r2.dot(&r1r2);

    let mut dmax = d0;
    let mut imax = 0;
    if d1 > dmax {
        dmax = d1;
        imax = 1;
    }
    if d2 > dmax {
        imax = 2;
    }
    match imax {
        0 => &r0r1 * (T::one() / d0.sqrt()),
        1 => &r0r2 * (T::one() / d1.sqrt()),
        _ => &r1r2 * (T::one() / d2.sqrt()),
    }
}

/// Split the plane orthogonal to unit vector `w` into an orthonormal
/// pair `(u, v)` with `{u, v, w}` right-handed.
fn orthogonal_complement<T: FloatScalar>(w: &Vector<T>) -> (Vector<T>, Vector<T>) {
    let u = if w[0].abs() > w[1].abs() {
        let inv = T::one() / (w[0] * w[0] + w[2] * w[2]).sqrt();
        Vector::from_vec(vec![-w[2] * inv, T::zero(), w[0] * inv])
    } else {
        let inv = T::one() / (w[1] * w[1] + w[2] * w[2]).sqrt();
        Vector::from_vec(vec![T::zero(), w[2] * inv, -w[1] * inv])
    };
    let v = w.cross(&u);
    (u, v)
}

/// Eigenvector for the (possibly repeated) middle eigenvalue, solving
/// the 2x2 problem restricted to the complement of `vec2`.
fn eigenvector_in_complement<T: FloatScalar>(a: &Matrix<T>, vec2: &Vector<T>, val: T) -> Vector<T> {
    let (u, v) = orthogonal_complement(vec2);
    let au = Vector::from_vec(vec![a.row(0).dot(&u), a.row(1).dot(&u), a.row(2).dot(&u)]);
    let av = Vector::from_vec(vec![a.row(0).dot(&v), a.row(1).dot(&v), a.row(2).dot(&v)]);

    let mut m00 = u.dot(&au) - val;
    let mut m01 = u.dot(&av);
    let mut m11 = v.dot(&av) - val;

    let abs_m00 = m00.abs();
    let abs_m01 = m01.abs();
    let abs_m11 = m11.abs();

    if abs_m00 >= abs_m11 {
        if abs_m00.max(abs_m01) > T::zero() {
            if abs_m00 >= abs_m01 {
                m01 = m01 / m00;
                m00 = T::one() / (T::one() + m01 * m01).sqrt();
                m01 = m01 * m00;
            } else {
                m00 = m00 / m01;
                m01 = T::one() / (T::one() + m00 * m00).sqrt();
                m00 = m00 * m01;
            }
            &(&u * m01) - &(&v * m00)
        } else {
            u
        }
    } else if abs_m11.max(abs_m01) > T::zero() {
        if abs_m11 >= abs_m01 {
            m01 = m01 / m11;
            m11 = T::one() / (T::one() + m01 * m01).sqrt();
            m01 = m01 * m11;
        } else {
            m11 = m11 / m01;
            m01 = T::one() / (T::one() + m11 * m11).sqrt();
            m11 = m11 * m01;
        }
        &(&u * m11) - &(&v * m01)
    } else {
        u
    }
}

/// Eigenvalues (ascending) and unit eigenvectors of a 3x3 symmetric
/// matrix, eigenvectors as the columns of the returned matrix.
///
/// Eigenvector signs are arbitrary. Diagonal input yields the identity
/// basis, permuted to the ascending eigenvalue order.
///
/// ```
/// use faktor::linalg::symmetric_eigen3;
/// use faktor::Matrix;
///
/// let a = Matrix::<f64>::from_rows(3, 3, &[2.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 3.0]);
/// let (vals, vecs) = symmetric_eigen3(&a);
/// assert_eq!(vals, [2.0, 3.0, 5.0]);
/// assert_eq!(vecs.col(1)[2].abs(), 1.0);
/// ```
pub fn symmetric_eigen3<T: FloatScalar>(a: &Matrix<T>) -> ([T; 3], Matrix<T>) {
    let vals = symmetric_eigenvalues3(a);

    let p1 = a[(0, 1)] * a[(0, 1)] + a[(0, 2)] * a[(0, 2)] + a[(1, 2)] * a[(1, 2)];
    if p1.is_zero() {
        // diagonal: basis vectors, permuted to ascending order
        let diag = [a[(0, 0)], a[(1, 1)], a[(2, 2)]];
        let mut vecs = Matrix::zeros(3, 3);
        let mut used = [false; 3];
        for (j, &val) in vals.iter().enumerate() {
            for (axis, &dv) in diag.iter().enumerate() {
                if !used[axis] && dv == val {
                    vecs[(axis, j)] = T::one();
                    used[axis] = true;
                    break;
                }
            }
        }
        return (vals, vecs);
    }

    let v2 = eigenvector_simple(a, vals[2]);
    let v1 = eigenvector_in_complement(a, &v2, vals[1]);
    let v0 = v2.cross(&v1);

    let mut vecs = Matrix::zeros(3, 3);
    for i in 0..3 {
        vecs[(i, 0)] = v0[i];
        vecs[(i, 1)] = v1[i];
        vecs[(i, 2)] = v2[i];
    }
    (vals, vecs)
}
