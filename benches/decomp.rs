use criterion::{criterion_group, criterion_main, Criterion};
use faktor::{convolve, Matrix, SymmetricEigen, Vector};

// ---------------------------------------------------------------------------
// Helpers: symmetric positive-definite inputs for Cholesky and eigen
// ---------------------------------------------------------------------------

fn spd(n: usize) -> Matrix<f64> {
    let a = Matrix::from_fn(n, n, |i, j| {
        ((i + 1) * (j + 1)) as f64 + if i == j { 10.0 * n as f64 } else { 0.0 }
    });
    &a * &a.transpose()
}

fn dense(n: usize) -> Matrix<f64> {
    Matrix::from_fn(n, n, |i, j| ((i * n + j + 1) % 13) as f64 - 6.0)
}

// ---------------------------------------------------------------------------
// Matrix multiply (serial path vs the row-parallel path)
// ---------------------------------------------------------------------------

fn matmul(c: &mut Criterion) {
    let mut g = c.benchmark_group("matmul");

    for n in [16, 50, 200] {
        g.bench_function(format!("{}x{}", n, n), |b| {
            let a = dense(n);
            let m = Matrix::from_fn(n, n, |i, j| (i + j + 1) as f64);
            b.iter(|| std::hint::black_box(&a).matmul(std::hint::black_box(&m)))
        });
    }

    g.finish();
}

fn convolution(c: &mut Criterion) {
    let mut g = c.benchmark_group("convolve");

    for n in [256, 4096] {
        g.bench_function(format!("len_{}", n), |b| {
            let u = Vector::from_vec((0..n).map(|i| (i % 17) as f64).collect());
            let v = Vector::from_vec((0..n).map(|i| (i % 5) as f64 - 2.0).collect());
            b.iter(|| convolve(std::hint::black_box(&u), std::hint::black_box(&v)))
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Decompositions
// ---------------------------------------------------------------------------

fn lu(c: &mut Criterion) {
    let mut g = c.benchmark_group("lu");

    for n in [6, 50] {
        g.bench_function(format!("{}x{}", n, n), |b| {
            let a = Matrix::from_fn(n, n, |i, j| {
                ((i + 1) * 10 + j + 1) as f64 + if i == j { 10.0 * n as f64 } else { 0.0 }
            });
            b.iter(|| std::hint::black_box(&a).lu(1e-12))
        });
    }

    g.finish();
}

fn cholesky(c: &mut Criterion) {
    let mut g = c.benchmark_group("cholesky");

    for n in [6, 50] {
        g.bench_function(format!("{}x{}", n, n), |b| {
            let a = spd(n);
            b.iter(|| std::hint::black_box(&a).cholesky())
        });
    }

    g.finish();
}

fn qr(c: &mut Criterion) {
    let mut g = c.benchmark_group("qr");

    for n in [6, 50] {
        g.bench_function(format!("{}x{}", n, n), |b| {
            let a = dense(n);
            b.iter(|| std::hint::black_box(&a).qr())
        });
    }

    g.finish();
}

fn svd(c: &mut Criterion) {
    let mut g = c.benchmark_group("svd");

    for n in [6, 30] {
        g.bench_function(format!("{}x{}", n, n), |b| {
            let a = dense(n);
            b.iter(|| std::hint::black_box(&a).svd())
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Eigendecomposition: iterative symmetric, analytic 3x3, general
// ---------------------------------------------------------------------------

fn eigen_symmetric(c: &mut Criterion) {
    let mut g = c.benchmark_group("eigen_symmetric");

    for n in [6, 30] {
        g.bench_function(format!("{}x{}", n, n), |b| {
            let a = spd(n);
            b.iter(|| SymmetricEigen::new(std::hint::black_box(&a)))
        });
    }

    g.bench_function("3x3_analytic", |b| {
        let a = Matrix::from_rows(3, 3, &[1.0, 3.0, 4.0, 3.0, 2.0, 7.0, 4.0, 7.0, 5.0]);
        b.iter(|| faktor::linalg::symmetric_eigen3(std::hint::black_box(&a)))
    });

    g.finish();
}

fn eigen_general(c: &mut Criterion) {
    let mut g = c.benchmark_group("eigen_general");

    for n in [6, 30] {
        g.bench_function(format!("{}x{}", n, n), |b| {
            let a = dense(n);
            b.iter(|| std::hint::black_box(&a).eigen())
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    matmul,
    convolution,
    lu,
    cholesky,
    qr,
    svd,
    eigen_symmetric,
    eigen_general,
);
criterion_main!(benches);
