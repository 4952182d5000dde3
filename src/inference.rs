use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::math::interp;
use crate::ops::*;
use crate::outputs::Outputs;
use crate::rules::{Rule, Rules};
use crate::variable::{Role, TermHandle, VariableKey, Variables};

/// What to report for a consequent whose aggregated set is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOutputPolicy {
    /// Fail with [`Error::NoRuleFired`]
    #[default]
    Fail,
    /// Report the midpoint of the consequent's domain
    Midpoint,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub and_op: AndOp,
    pub or_op: OrOp,
    pub implication: ImplicationOp,
    pub aggregation: ProductionLink,
    pub defuzzification: DefuzzificationOp,
    pub empty_output: EmptyOutputPolicy,
}

impl InferenceConfig {
    /// Min / max / clip / max / centroid, failing when nothing fires.
    pub fn mamdani() -> Self {
        Self::default()
    }

    pub fn with_defuzzification(mut self, defuzzification: DefuzzificationOp) -> Self {
        self.defuzzification = defuzzification;
        self
    }

    pub fn with_empty_output(mut self, empty_output: EmptyOutputPolicy) -> Self {
        self.empty_output = empty_output;
        self
    }
}

/// The compiled, read-only rule base.
///
/// Owns its variables and rules; nothing can be added once built, so a
/// shared reference may be used for concurrent predictions.
#[derive(Debug)]
pub struct ControlSystem {
    vars: Variables,
    rules: Vec<Rule>,
    // Antecedents some rule reads, in first-use order
    required: Vec<VariableKey>,
    // Consequents some rule concludes, in first-use order
    consequents: Vec<VariableKey>,
    config: InferenceConfig,
}

impl ControlSystem {
    pub fn new(vars: Variables, rules: Rules, config: InferenceConfig) -> Result<Self> {
        let rules = rules.0;
        let mut required = Vec::new();
        let mut consequents = Vec::new();

        for rule in &rules {
            let premise_terms = rule.premise.terms();

            for handle in premise_terms.iter().chain(Some(&rule.consequence)) {
                if !vars.contains(*handle) {
                    return Err(Error::InvalidRule {
                        rule: rule.name.clone(),
                        reason: "references a term outside this registry".into(),
                    });
                }
            }

            for handle in premise_terms {
                if !required.contains(&handle.var) {
                    required.push(handle.var);
                }
            }
            if !consequents.contains(&rule.consequence.var) {
                consequents.push(rule.consequence.var);
            }
        }

        debug!(
            n_vars = vars.len(),
            n_rules = rules.len(),
            n_consequents = consequents.len(),
            "built control system"
        );

        Ok(Self {
            vars,
            rules,
            required,
            consequents,
            config,
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Mamdani inference: fuzzificate the crisp inputs, fire every rule,
    /// shape and aggregate the concluded terms, then defuzzificate each
    /// consequent variable.
    pub fn predict(&self, inputs: &Inputs) -> Result<Outputs> {
        let fact_values = self.facts(inputs)?;

        // Fire rules
        let mut rule_activations = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let activation = rule.premise.eval(self.config.and_op, self.config.or_op, &mut |handle| {
                Ok::<_, Error>(self.fuzzificate(handle, fact_values[&handle.var]))
            })?;

            trace!(rule = %rule.name, activation, "fired rule");
            rule_activations.push(activation);
        }

        // Strength per concluded term, shared across same-term rules
        let mut term_strengths: HashMap<TermHandle, f64> = HashMap::new();

        for (rule, activation) in self.rules.iter().zip(&rule_activations) {
            let link = self.config.aggregation;

            term_strengths
                .entry(rule.consequence)
                .and_modify(|s| *s = link.apply(*s, *activation))
                .or_insert(*activation);
        }

        let mut defuzzificated_inferred_memberships = HashMap::with_capacity(self.consequents.len());

        for var_key in &self.consequents {
            let var = &self.vars.vars[*var_key];
            let mut aggregated_membership: Option<Vec<f64>> = None;

            // Terms in declaration order keep the aggregation deterministic
            for (handle, strength) in (0..var.terms.len()).filter_map(|term| {
                let handle = TermHandle {
                    registry: self.vars.id,
                    var: *var_key,
                    term,
                    role: Role::Consequent,
                };
                term_strengths.get(&handle).map(|s| (handle, *s))
            }) {
                let implied = self
                    .config
                    .implication
                    .call(strength, &var.term(handle).membership);

                aggregated_membership = Some(match aggregated_membership {
                    None => implied,
                    Some(agg) => self.config.aggregation.call(agg, implied).collect(),
                });
            }

            let aggregated_membership = aggregated_membership.unwrap_or_else(|| vec![0.; var.universe.len()]);
            let crisp = if aggregated_membership.iter().sum::<f64>() > 0. {
                self.config.defuzzification.call(&var.universe, &aggregated_membership)
            } else {
                match self.config.empty_output {
                    EmptyOutputPolicy::Fail => {
                        return Err(Error::NoRuleFired {
                            variable: var.name().to_owned(),
                        })
                    },
                    EmptyOutputPolicy::Midpoint => {
                        let (min_u, max_u) = (var.universe[0], var.universe[var.universe.len() - 1]);

                        (min_u + max_u) / 2.
                    },
                }
            };

            debug!(variable = %var.name(), crisp, "defuzzificated output");
            defuzzificated_inferred_memberships.insert(var.name().to_owned(), crisp);
        }

        Ok(Outputs::new(defuzzificated_inferred_memberships, rule_activations))
    }

    /// Checks the inputs and keys them by variable.
    fn facts(&self, inputs: &Inputs) -> Result<HashMap<VariableKey, f64>> {
        let mut fact_values = HashMap::with_capacity(self.required.len());

        for var_key in &self.required {
            let var = &self.vars.vars[*var_key];
            let value = inputs.get(var.name()).ok_or_else(|| Error::MissingInput {
                variable: var.name().to_owned(),
            })?;

            if !value.is_finite() {
                return Err(Error::InvalidInput {
                    variable: var.name().to_owned(),
                    value,
                });
            }

            fact_values.insert(*var_key, value);
        }

        let known: HashSet<&str> = self.required.iter().map(|k| self.vars.vars[*k].name()).collect();

        for name in inputs.0.keys().filter(|n| !known.contains(n.as_str())) {
            warn!(variable = %name, "ignoring input for a variable no rule reads");
        }

        Ok(fact_values)
    }

    /// Degree of `handle` at the crisp `value`, holding the edge degree
    /// outside of the domain.
    fn fuzzificate(&self, handle: TermHandle, value: f64) -> f64 {
        let var = &self.vars.vars[handle.var];
        let degree = interp(value, &var.universe, &var.term(handle).membership);

        trace!(variable = %var.name(), term = %var.term(handle).name, value, degree, "fuzzificated input");

        degree
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::linspace::universe;
    use crate::membership::{MembershipFunc, Shape};

    fn sensor_vars() -> Variables {
        let mut vars = Variables::new();
        let sensor_terms = || {
            vec![
                MembershipFunc::new("normal", Shape::Gaussian, [3., 3.3]),
                MembershipFunc::new("abnormal", Shape::Triangle, [8., 15., 15.]),
            ]
        };

        vars.add_variable(universe(0. ..=10., 0.5), "sensor1", sensor_terms(), Role::Antecedent)
            .unwrap();
        vars.add_variable(universe(0. ..=10., 0.5), "sensor2", sensor_terms(), Role::Antecedent)
            .unwrap();
        vars.add_variable(
            universe(0. ..=10., 0.5),
            "problem1",
            vec![
                MembershipFunc::new("no", Shape::Trapezoid, [0., 0., 4., 6.]),
                MembershipFunc::new("yes", Shape::Trapezoid, [4., 6., 10., 10.]),
            ],
            Role::Consequent,
        )
        .unwrap();
        vars
    }

    fn sensor_system(config: InferenceConfig) -> ControlSystem {
        let vars = sensor_vars();
        let term = |v: &str, t: &str| vars.term(v, t).unwrap();
        let mut rules = Rules::new();

        rules
            .add_rule(
                "rule1",
                term("sensor1", "abnormal").and(term("sensor2", "abnormal")),
                term("problem1", "yes"),
            )
            .unwrap();
        rules
            .add_rule("rule2", term("sensor1", "normal"), term("problem1", "no"))
            .unwrap();
        rules
            .add_rule("rule2", term("sensor2", "normal"), term("problem1", "no"))
            .unwrap();

        ControlSystem::new(vars, rules, config).unwrap()
    }

    #[test]
    fn test_sensor_problem() {
        let system = sensor_system(InferenceConfig::default());

        let outputs = system.predict(&Inputs::new().with("sensor1", 7.).with("sensor2", 10.)).unwrap();
        assert!(outputs.get("problem1").unwrap() < 5.);
        assert_eq!(outputs.rule_activations()[0], 0.);

        let outputs = system.predict(&Inputs::new().with("sensor1", 10.).with("sensor2", 15.)).unwrap();
        assert!(outputs.get("problem1").unwrap() > 5.);
        assert_abs_diff_eq!(outputs.rule_activations()[0], 2. / 7., epsilon = 1e-12);
        assert_abs_diff_eq!(outputs.max_activation(), 2. / 7., epsilon = 1e-12);
    }

    #[test]
    fn test_bank_loan() {
        let mut vars = Variables::new();
        let trap = |t: &str, p: [f64; 4]| MembershipFunc::new(t, Shape::Trapezoid, p);

        vars.add_variable(
            universe(150. ..=200., 0.5),
            "score",
            vec![trap("high", [175., 190., 200., 200.]), trap("low", [150., 150., 155., 175.])],
            Role::Antecedent,
        )
        .unwrap();
        vars.add_variable(
            universe(0.1..=1., 0.01),
            "ratio",
            vec![trap("good", [0.1, 0.1, 0.3, 0.42]), trap("bad", [0.44, 0.7, 1., 1.])],
            Role::Antecedent,
        )
        .unwrap();
        vars.add_variable(
            universe(0. ..=10., 0.1),
            "credit",
            vec![trap("good", [0., 0., 2., 5.]), trap("bad", [5., 8., 10., 10.])],
            Role::Antecedent,
        )
        .unwrap();
        vars.add_variable(
            universe(0. ..=10., 0.1),
            "decision",
            vec![trap("approve", [5., 8., 10., 10.]), trap("reject", [0., 0., 2., 5.])],
            Role::Consequent,
        )
        .unwrap();

        let term = |v: &str, t: &str| vars.term(v, t).unwrap();
        let mut rules = Rules::with_capacity(2);

        rules
            .add_rule(
                "approve",
                term("score", "high").and(term("ratio", "good")).and(term("credit", "good")),
                term("decision", "approve"),
            )
            .unwrap();
        rules
            .add_rule(
                "reject",
                term("score", "low").and(term("ratio", "bad").or(term("credit", "bad"))),
                term("decision", "reject"),
            )
            .unwrap();

        let system = ControlSystem::new(vars, rules, InferenceConfig::mamdani()).unwrap();
        let inputs: Inputs = [("score", 190.), ("ratio", 0.39), ("credit", 1.5)].into_iter().collect();
        let outputs = system.predict(&inputs).unwrap();

        assert_abs_diff_eq!(outputs.rule_activations()[0], 0.25, epsilon = 1e-9);
        assert_eq!(outputs.rule_activations()[1], 0.);
        assert!(outputs.get("decision").unwrap() > 7.);
    }

    #[test]
    fn test_missing_input() {
        let system = sensor_system(InferenceConfig::default());
        let err = system.predict(&Inputs::new().with("sensor1", 7.)).unwrap_err();

        assert_eq!(
            err,
            Error::MissingInput {
                variable: "sensor2".into()
            }
        );
    }

    #[test]
    fn test_non_finite_input() {
        let system = sensor_system(InferenceConfig::default());
        let inputs = Inputs::new().with("sensor1", f64::NAN).with("sensor2", 1.);

        assert!(matches!(system.predict(&inputs), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_unknown_input_is_ignored() {
        let system = sensor_system(InferenceConfig::default());
        let inputs = Inputs::new().with("sensor1", 7.).with("sensor2", 10.);
        let with_extra = inputs.clone().with("humidity", 99.);

        assert_eq!(system.predict(&inputs).unwrap(), system.predict(&with_extra).unwrap());
    }

    fn single_rule_system(config: InferenceConfig) -> ControlSystem {
        let vars = sensor_vars();
        let mut rules = Rules::new();

        rules
            .add_rule(
                "rule1",
                vars.term("sensor1", "abnormal").unwrap(),
                vars.term("problem1", "yes").unwrap(),
            )
            .unwrap();

        ControlSystem::new(vars, rules, config).unwrap()
    }

    #[test]
    fn test_no_rule_fired() {
        let inputs = Inputs::new().with("sensor1", 2.);

        assert_eq!(
            single_rule_system(InferenceConfig::default()).predict(&inputs),
            Err(Error::NoRuleFired {
                variable: "problem1".into()
            })
        );

        let midpoint = InferenceConfig::default().with_empty_output(EmptyOutputPolicy::Midpoint);
        let outputs = single_rule_system(midpoint).predict(&inputs).unwrap();

        assert_eq!(outputs.get("problem1"), Some(5.));
    }

    #[test]
    fn test_same_conclusion_aggregates_by_max() {
        let both = sensor_system(InferenceConfig::default());
        let vars = sensor_vars();
        let mut rules = Rules::new();

        rules
            .add_rule(
                "rule1",
                vars.term("sensor1", "abnormal")
                    .unwrap()
                    .and(vars.term("sensor2", "abnormal").unwrap()),
                vars.term("problem1", "yes").unwrap(),
            )
            .unwrap();
        rules
            .add_rule(
                "rule2",
                vars.term("sensor1", "normal").unwrap(),
                vars.term("problem1", "no").unwrap(),
            )
            .unwrap();

        let one = ControlSystem::new(vars, rules, InferenceConfig::default()).unwrap();
        let inputs = Inputs::new().with("sensor1", 4.).with("sensor2", 4.);

        assert_eq!(
            both.predict(&inputs).unwrap().get("problem1"),
            one.predict(&inputs).unwrap().get("problem1")
        );
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let other = sensor_vars();
        let mut rules = Rules::new();
        let mut vars = Variables::new();

        vars.add_variable(vec![0., 1.], "unrelated", Vec::<MembershipFunc>::new(), Role::Antecedent)
            .unwrap();
        rules
            .add_rule(
                "foreign",
                other.term("sensor1", "normal").unwrap(),
                other.term("problem1", "no").unwrap(),
            )
            .unwrap();

        assert!(matches!(
            ControlSystem::new(vars, rules, InferenceConfig::default()),
            Err(Error::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_same_shape_registry_rejected() {
        let layout = |input: &str, output: &str| {
            let mut vars = Variables::new();
            let terms = || vec![MembershipFunc::new("t", Shape::Triangle, [0., 5., 10.])];

            vars.add_variable(universe(0. ..=10., 1.), input, terms(), Role::Antecedent)
                .unwrap();
            vars.add_variable(universe(0. ..=10., 1.), output, terms(), Role::Consequent)
                .unwrap();
            vars
        };
        let temperature = layout("temperature", "fan");
        let pressure = layout("pressure", "valve");
        let mut rules = Rules::new();

        rules
            .add_rule(
                "foreign",
                temperature.term("temperature", "t").unwrap(),
                temperature.term("fan", "t").unwrap(),
            )
            .unwrap();

        assert!(matches!(
            ControlSystem::new(pressure, rules, InferenceConfig::default()),
            Err(Error::InvalidRule { rule, .. }) if rule == "foreign"
        ));
    }

    #[test]
    fn test_larsen_and_alternative_defuzzification() {
        let inputs = Inputs::new().with("sensor1", 10.).with("sensor2", 15.);
        let config = InferenceConfig {
            implication: ImplicationOp::Prod,
            ..InferenceConfig::default()
        };

        for defuzzification in [
            DefuzzificationOp::Centroid,
            DefuzzificationOp::Cog,
            DefuzzificationOp::Boa,
            DefuzzificationOp::Mom,
        ] {
            let system = sensor_system(config.with_defuzzification(defuzzification));
            let crisp = system.predict(&inputs).unwrap().get("problem1").unwrap();

            assert!(crisp > 5., "{defuzzification:?} gave {crisp}");
            assert!(crisp <= 10.);
        }
    }

    #[test]
    fn test_config_from_json() {
        let config: InferenceConfig =
            serde_json::from_str(r#"{"defuzzification": "mom", "empty_output": "midpoint"}"#).unwrap();

        assert_eq!(config.defuzzification, DefuzzificationOp::Mom);
        assert_eq!(config.empty_output, EmptyOutputPolicy::Midpoint);
        assert_eq!(config.and_op, AndOp::Min);

        let json = serde_json::to_string(&InferenceConfig::default()).unwrap();
        assert!(json.contains(r#""aggregation":"max""#));
    }
}
