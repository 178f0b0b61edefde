use approx::assert_relative_eq;
use dualtape::{add, finite_diff_grad, forward_grad, grad, jvp, mul, relu, value_and_grad, Scalar};

/// Single relu unit plus a square: relu(0.5·x0 - 2·x1 + 1)·3 + x2².
fn neuron<S: Scalar<Value = f64>>(x: &[S]) -> S {
    let hidden = relu(add(add(mul(x[0], x[0].lift(0.5)), mul(x[1], x[1].lift(-2.0))), x[0].lift(1.0)));
    mul(hidden, x[0].lift(3.0)) + x[2] * x[2]
}

fn neuron_f64(x: &[f64]) -> f64 {
    (0.5 * x[0] - 2.0 * x[1] + 1.0).max(0.0) * 3.0 + x[2] * x[2]
}

// ── grad ──

#[test]
fn grad_sum_of_squares() {
    let g = grad(|x| x[0] * x[0] + x[1] * x[1], &[3.0, 4.0]).unwrap();
    assert_relative_eq!(g[0], 6.0, max_relative = 1e-12);
    assert_relative_eq!(g[1], 8.0, max_relative = 1e-12);
}

#[test]
fn value_and_grad_neuron() {
    let x = [2.0, -0.25, 1.5];
    let (value, g) = value_and_grad(|v| neuron(v), &x).unwrap();
    assert_relative_eq!(value, neuron_f64(&x), max_relative = 1e-12);
    // hidden = 1 + 0.5 + 1 = 2.5 > 0
    assert_relative_eq!(g[0], 1.5, max_relative = 1e-12);
    assert_relative_eq!(g[1], -6.0, max_relative = 1e-12);
    assert_relative_eq!(g[2], 3.0, max_relative = 1e-12);
}

#[test]
fn grad_neuron_dead_unit() {
    let x = [-4.0, 1.0, 0.5];
    let g = grad(|v| neuron(v), &x).unwrap();
    assert_eq!(g, vec![0.0, 0.0, 1.0]);
}

#[test]
fn grad_with_unused_input() {
    let g = grad(|x| x[0] * 2.0, &[1.0, 7.0]).unwrap();
    assert_eq!(g, vec![2.0, 0.0]);
}

#[test]
fn grad_integer() {
    let g = grad(|x| x[0] * x[1] * x[1] + 5 * x[0], &[2_i32, 3]).unwrap();
    assert_eq!(g, vec![14, 12]);
}

// ── forward ──

#[test]
fn jvp_directional_derivative() {
    // f = x0·x1, direction (1, 2): x1 + 2·x0
    let (value, dir) = jvp(|x| x[0] * x[1], &[3.0, 5.0], &[1.0, 2.0]);
    assert_relative_eq!(value, 15.0);
    assert_relative_eq!(dir, 11.0);
}

#[test]
#[should_panic(expected = "same length")]
fn jvp_length_mismatch_panics() {
    jvp(|x| x[0], &[1.0, 2.0], &[1.0]);
}

#[test]
fn forward_grad_matches_reverse() {
    let x = [0.3, -1.2, 2.0];
    let fwd = forward_grad(|v| neuron(v), &x);
    let rev = grad(|v| neuron(v), &x).unwrap();
    for (f, r) in fwd.iter().zip(&rev) {
        assert_relative_eq!(*f, *r, max_relative = 1e-12);
    }
}

#[test]
fn forward_grad_is_one_pass_per_input() {
    use std::cell::Cell;
    let passes = Cell::new(0);
    forward_grad(
        |x| {
            passes.set(passes.get() + 1);
            x[0] + x[1] + x[2] + x[3]
        },
        &[1.0, 2.0, 3.0, 4.0],
    );
    assert_eq!(passes.get(), 4);
}

// ── finite differences ──

#[test]
fn finite_diff_against_reverse() {
    let x = [2.0, -0.25, 1.5];
    let fd = finite_diff_grad(neuron_f64, &x, 1e-6);
    let rev = grad(|v| neuron(v), &x).unwrap();
    for (f, r) in fd.iter().zip(&rev) {
        assert_relative_eq!(*f, *r, epsilon = 1e-6);
    }
}

#[test]
fn finite_diff_single_precision() {
    let fd = finite_diff_grad(|x: &[f32]| x[0] * x[0], &[3.0_f32], 1e-2);
    assert_relative_eq!(fd[0], 6.0_f32, max_relative = 1e-3);
}
