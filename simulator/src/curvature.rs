use candle_core::{Result, Tensor};

/// First-order finite difference of `t` along `dim`, unit spacing.
///
/// Interior points use central differences `(x[i+1] - x[i-1]) / 2`; the
/// first and last points use one-sided differences, so the output has the
/// same shape as the input. Unlike `numpy.gradient`, which raises on an
/// axis with fewer than two samples, an axis of length 1 yields zeros.
pub fn gradient(t: &Tensor, dim: usize) -> Result<Tensor> {
    let n = t.dim(dim)?;
    if n < 2 {
        return t.zeros_like();
    }

    let first = t.narrow(dim, 1, 1)?.sub(&t.narrow(dim, 0, 1)?)?;
    let last = t.narrow(dim, n - 1, 1)?.sub(&t.narrow(dim, n - 2, 1)?)?;
    if n == 2 {
        return Tensor::cat(&[&first, &last], dim);
    }

    // x[2..n] - x[0..n-2], halved
    let interior = t
        .narrow(dim, 2, n - 2)?
        .sub(&t.narrow(dim, 0, n - 2)?)?
        .affine(0.5, 0.0)?;
    Tensor::cat(&[&first, &interior, &last], dim)
}

/// Two-pass curvature: difference along rows, then along columns of that
/// intermediate result.
pub fn curvature(grid: &Tensor) -> Result<Tensor> {
    let along_rows = gradient(grid, 0)?;
    gradient(&along_rows, 1)
}
