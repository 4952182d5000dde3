//! Fuzzy inference models and a describable model lifecycle.
//!
//! A fuzzy model is declared in two setup steps: register linguistic
//! variables with [`Variables::add_variable`], then compose rules over their
//! terms with [`Rules::add_rule`]. Both are compiled into an immutable
//! [`ControlSystem`] whose [`ControlSystem::predict`] turns crisp inputs into
//! crisp outputs (Mamdani inference, centroid defuzzification by default).
//!
//! ```
//! use fuzzy_model::{universe, ControlSystem, InferenceConfig, Inputs, MembershipFunc, Role, Rules, Shape, Variables};
//!
//! let mut vars = Variables::new();
//! vars.add_variable(
//!     universe(0. ..=10., 0.5),
//!     "temperature",
//!     [
//!         MembershipFunc::new("cold", Shape::Trapezoid, [0., 0., 3., 6.]),
//!         MembershipFunc::new("hot", Shape::Trapezoid, [4., 7., 10., 10.]),
//!     ],
//!     Role::Antecedent,
//! )?;
//! vars.add_variable(
//!     universe(0. ..=100., 1.),
//!     "fan",
//!     [
//!         MembershipFunc::new("slow", Shape::Triangle, [0., 0., 50.]),
//!         MembershipFunc::new("fast", Shape::Triangle, [50., 100., 100.]),
//!     ],
//!     Role::Consequent,
//! )?;
//!
//! let mut rules = Rules::new();
//! rules.add_rule("cool down", vars.term("temperature", "hot")?, vars.term("fan", "fast")?)?;
//! rules.add_rule("idle", vars.term("temperature", "cold")?, vars.term("fan", "slow")?)?;
//!
//! let system = ControlSystem::new(vars, rules, InferenceConfig::default())?;
//! let outputs = system.predict(&Inputs::new().with("temperature", 9.))?;
//!
//! assert!(outputs.get("fan").unwrap() > 50.);
//! # Ok::<(), fuzzy_model::Error>(())
//! ```

mod describe;
mod dsl;
mod error;
mod fuzzy_model;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod model;
mod ops;
mod outputs;
mod rules;
mod variable;

pub use describe::{Describable, Description, Explainer};
pub use dsl::Expr;
pub use error::{Error, Result};
pub use fuzzy_model::{FuzzyLogicModel, FuzzyRuleset, Sample};
pub use inference::{ControlSystem, EmptyOutputPolicy, InferenceConfig};
pub use inputs::Inputs;
pub use linspace::{universe, Linspace};
pub use membership::{build as build_membership, MembershipFunc, Shape};
pub use model::{Metrics, Model};
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use variable::{Role, TermHandle, Variable, VariableKey, Variables};
