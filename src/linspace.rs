use std::ops::RangeInclusive;

/// Evenly spaced samples over a closed interval, computed the way
/// `numpy.linspace` does (`start + step * i`) so no error accumulates.
pub struct Linspace {
    start: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 { (max - min) / (n - 1) as f64 } else { 0. };

        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            let i = self.index;
            self.index += 1;
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

/// Builds an inclusive domain over `range` with samples roughly `step` apart.
///
/// The sample count is `floor((max - min) / step) + 1`, so a step that does not
/// divide the range evenly is stretched slightly to land on `max`.
/// A non-positive or non-finite step yields the single point `min`.
pub fn universe(range: RangeInclusive<f64>, step: f64) -> Vec<f64> {
    let min_u = *range.start();
    let max_u = *range.end();

    if !(step > 0.) || !step.is_finite() || max_u <= min_u {
        return vec![min_u];
    }

    // Nudge so that 10 / 0.1 does not floor to 99
    let num = ((max_u - min_u) / step + 1e-9).floor() as usize + 1;

    Linspace::new(min_u, max_u, num).collect()
}

#[test]
fn test_linspace() {
    let values: Vec<f64> = Linspace::new(0., 1., 5).collect();

    assert_eq!(values, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(3., 3., 1).collect::<Vec<_>>(), vec![3.]);
    assert_eq!(Linspace::new(0., 1., 0).count(), 0);
}

#[test]
fn test_universe() {
    let u = universe(0. ..=10., 0.5);

    assert_eq!(u.len(), 21);
    assert_eq!(u[0], 0.);
    assert_eq!(u[20], 10.);
    assert_eq!(universe(0. ..=10., 0.1).len(), 101);
    assert_eq!(universe(2. ..=2., 0.1), vec![2.]);
    assert_eq!(universe(0. ..=1., 0.), vec![0.]);
}
