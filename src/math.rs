use num::Float;

/// Similar to `numpy.interp` for a single point: linear interpolation of
/// `fp` over the increasing sample points `xp`, holding the edge values
/// outside of `[xp[0], xp[n - 1]]`.
pub(crate) fn interp<F: Float>(x: F, xp: &[F], fp: &[F]) -> F {
    debug_assert_eq!(xp.len(), fp.len());

    let (Some(&first_x), Some(&last_x)) = (xp.first(), xp.last()) else {
        return F::zero();
    };

    if x <= first_x {
        return fp[0];
    }
    if x >= last_x {
        return fp[fp.len() - 1];
    }

    // xp is strictly increasing so the partition point is the right neighbour
    let i = xp.partition_point(|p| *p <= x);
    let (x1, x2) = (xp[i - 1], xp[i]);
    let (y1, y2) = (fp[i - 1], fp[i]);

    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

#[test]
fn test_interp() {
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let got: Vec<f64> = [0., 1., 1.5, 2.72, 3.24].iter().map(|x| interp(*x, &xs, &ys)).collect();

    assert_eq!(got, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let got: Vec<f64> = [2.5, -1., 7.5].iter().map(|x| interp(*x, &xs, &ys)).collect();

    assert_eq!(got, vec![4., 0., 2.]);
}

#[test]
fn test_interp_exact_sample() {
    let xs = [0., 0.5, 1.];
    let ys = [0.2, 0.9, 0.4];

    assert_eq!(interp(0.5, &xs, &ys), 0.9);
    assert_eq!(interp(0.25, &[0.], &[0.7]), 0.7);
}
