use num::Float;
use serde::{Deserialize, Serialize};

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => ProductionLink::Min.apply(u, v),
            Self::Prod => ProductionLink::Prod.apply(u, v),
            Self::BoundedProd => ProductionLink::BoundedProd.apply(u, v),
            Self::DrasticProd => ProductionLink::DrasticProd.apply(u, v),
        }
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => ProductionLink::Max.apply(u, v),
            Self::ProbOr => ProductionLink::ProbOr.apply(u, v),
            Self::BoundedSum => ProductionLink::BoundedSum.apply(u, v),
            Self::DrasticSum => ProductionLink::DrasticSum.apply(u, v),
        }
    }
}

/// Implication operator shaping a consequent term by the strength of
/// the rules that conclude it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Truncate the term at the activation strength (Mamdani)
    #[default]
    Min,
    /// Scale the term by the activation strength (Larsen)
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, membership: &[F]) -> Vec<F> {
        membership
            .iter()
            .map(|&m| match self {
                Self::Min => F::min(strength, m),
                Self::Prod => strength * m,
            })
            .collect()
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionLink {
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl ProductionLink {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }

    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| self.apply(u, v))
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Membership-weighted mean of the samples
    #[default]
    Centroid,
    /// Center of Gravity of the piecewise-linear area
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Callers must pass a non-empty universe and a membership with a
    /// non-zero sum.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> F {
        debug_assert_eq!(universe.len(), membership.len());

        if universe.len() == 1 {
            return universe[0];
        }

        let two = F::one() + F::one();

        match self {
            Self::Centroid => {
                let (num, den) = universe
                    .iter()
                    .zip(membership)
                    .fold((F::zero(), F::zero()), |(num, den), (&u, &m)| (num + u * m, den + m));

                num / den
            },
            Self::Cog => {
                let three = two + F::one();
                let mut num = F::zero();
                let mut den = F::zero();

                for i in 0..universe.len() - 1 {
                    let base = universe[i + 1] - universe[i];
                    let area_rect = F::min(membership[i], membership[i + 1]) * base;
                    let center_rect = universe[i] + base / two;
                    let area_tria = base * F::abs(membership[i + 1] - membership[i]) / two;
                    let center_tria = if membership[i + 1] > membership[i] {
                        universe[i] + two / three * base
                    } else {
                        universe[i] + F::one() / three * base
                    };

                    num = num + area_rect * center_rect + area_tria * center_tria;
                    den = den + area_rect + area_tria;
                }

                num / den
            },
            Self::Boa => {
                let n_areas = universe.len() - 1;
                let areas: Vec<F> = (0..n_areas)
                    .map(|i| (membership[i] + membership[i + 1]) * (universe[i + 1] - universe[i]) / two)
                    .collect();
                let target = areas.iter().fold(F::zero(), |acc, a| acc + *a) / two;
                let mut cum_area = F::zero();

                for (i, area) in areas.iter().enumerate() {
                    if cum_area + *area >= target && *area > F::zero() {
                        let remaining = target - cum_area;

                        if remaining <= F::zero() {
                            return universe[i];
                        }

                        // Area from the segment start grows as m0 * t + k * t^2; solve for t
                        let base = universe[i + 1] - universe[i];
                        let m0 = membership[i];
                        let k = (membership[i + 1] - m0) / (two * base);
                        let disc = F::max(F::zero(), m0 * m0 + two * two * k * remaining);
                        let t = two * remaining / (m0 + disc.sqrt());

                        return universe[i] + t.max(F::zero()).min(base);
                    }
                    cum_area = cum_area + *area;
                }

                universe[n_areas]
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(F::neg_infinity(), F::max);
                let mut maxima = universe
                    .iter()
                    .zip(membership)
                    .filter_map(|(&u, &m)| (m == maximum).then_some(u));

                match self {
                    Self::Som => maxima.next().unwrap_or(universe[0]),
                    Self::Lom => maxima.last().unwrap_or(universe[0]),
                    _ => {
                        let (len, sum) = maxima.fold((0usize, F::zero()), |(len, sum), u| (len + 1, sum + u));

                        F::from(len).map_or(universe[0], |len| sum / len)
                    },
                }
            },
        }
    }
}
