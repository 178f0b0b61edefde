#![allow(dead_code)]

use dualtape::Scalar;

// ─── Tridiagonal ───────────────────────────────────────────────────────────
// f(x) = Σ x_i·x_{i+1}

pub fn tridiagonal<S: Scalar>(x: &[S]) -> S {
    let mut sum = x[0].lift(num_traits::Zero::zero());
    for i in 0..x.len() - 1 {
        sum = sum + x[i] * x[i + 1];
    }
    sum
}

pub fn tridiagonal_f64(x: &[f64]) -> f64 {
    x.windows(2).map(|w| w[0] * w[1]).sum()
}

// ─── ReLU chain ────────────────────────────────────────────────────────────
// h_0 = x_0, h_{i} = relu(0.5·h_{i-1} + x_i·x_i + (-1)), output Σ h_i.
// Every hidden value feeds two parents, so adjoints fan in.

pub fn relu_chain<S: Scalar<Value = f64>>(x: &[S]) -> S {
    let mut h = x[0];
    let mut out = x[0];
    for &xi in &x[1..] {
        h = (h * h.lift(0.5) + xi * xi + xi.lift(-1.0)).relu();
        out = out + h;
    }
    out
}

// ─── Inputs ────────────────────────────────────────────────────────────────

pub fn make_input(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}
