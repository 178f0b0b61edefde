use num_traits::Float;

use crate::dual::Dual;
use crate::error::Result;
use crate::numeric::Numeric;
use crate::tape::Tape;
use crate::var::Var;

/// Compute the gradient of a scalar function `f : Tⁿ → T` using reverse mode.
///
/// Records `f` on a fresh tape, seeds the output with one, and runs a single
/// sweep. Fails only if `f` returns a handle from some other tape.
///
/// ```
/// let g = dualtape::grad(|x| x[0] * x[1] + x[1], &[3.0, 4.0]).unwrap();
/// assert_eq!(g, vec![4.0, 4.0]);
/// ```
pub fn grad<T: Numeric>(
    f: impl for<'t> FnOnce(&[Var<'t, T>]) -> Var<'t, T>,
    x: &[T],
) -> Result<Vec<T>> {
    value_and_grad(f, x).map(|(_, g)| g)
}

/// Like [`grad`], also returning `f(x)`.
pub fn value_and_grad<T: Numeric>(
    f: impl for<'t> FnOnce(&[Var<'t, T>]) -> Var<'t, T>,
    x: &[T],
) -> Result<(T, Vec<T>)> {
    let tape = Tape::with_capacity(x.len() * 10);
    let inputs: Vec<Var<'_, T>> = x.iter().map(|&v| tape.var(v)).collect();

    let output = f(&inputs);
    tape.seed(output.id(), T::one())?;
    tape.evaluate(output.id())?;

    let value = output.value();
    let grad = inputs
        .iter()
        .map(|v| tape.gradient(v.id()))
        .collect::<Result<Vec<T>>>()?;
    Ok((value, grad))
}

/// Directional derivative (forward mode): `(f(x), ∇f(x)·v)`.
///
/// One pass with input `i` carrying tangent `v[i]`.
pub fn jvp<T: Numeric>(f: impl FnOnce(&[Dual<T>]) -> Dual<T>, x: &[T], v: &[T]) -> (T, T) {
    assert_eq!(x.len(), v.len(), "x and v must have the same length");
    let inputs: Vec<Dual<T>> = x
        .iter()
        .zip(v.iter())
        .map(|(&xi, &vi)| Dual::new(xi, vi))
        .collect();
    let output = f(&inputs);
    (output.value, output.tangent)
}

/// Full gradient using forward mode: one pass per input, each seeding that
/// input's tangent with one and every other tangent with zero.
pub fn forward_grad<T: Numeric>(f: impl Fn(&[Dual<T>]) -> Dual<T>, x: &[T]) -> Vec<T> {
    let n = x.len();
    let mut grad = vec![T::zero(); n];
    for (i, g) in grad.iter_mut().enumerate() {
        let inputs: Vec<Dual<T>> = x
            .iter()
            .enumerate()
            .map(|(k, &xk)| {
                if k == i {
                    Dual::variable(xk)
                } else {
                    Dual::constant(xk)
                }
            })
            .collect();
        *g = f(&inputs).tangent;
    }
    grad
}

/// Centered finite-difference gradient estimate with step `h`.
pub fn finite_diff_grad<F: Float>(f: impl Fn(&[F]) -> F, x: &[F], h: F) -> Vec<F> {
    let two = F::one() + F::one();
    let mut xp = x.to_vec();
    let mut xm = x.to_vec();
    (0..x.len())
        .map(|i| {
            xp[i] = x[i] + h;
            xm[i] = x[i] - h;
            let d = (f(&xp) - f(&xm)) / (two * h);
            xp[i] = x[i];
            xm[i] = x[i];
            d
        })
        .collect()
}
