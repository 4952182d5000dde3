use std::collections::HashMap;

/// Crisp results of one inference pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs {
    defuzzificated_inferred_memberships: HashMap<String, f64>,
    rule_activations: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(defuzzificated_inferred_memberships: HashMap<String, f64>, rule_activations: Vec<f64>) -> Self {
        Self {
            defuzzificated_inferred_memberships,
            rule_activations,
        }
    }

    pub fn get(&self, var: &str) -> Option<f64> {
        self.defuzzificated_inferred_memberships.get(var).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.defuzzificated_inferred_memberships
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Activation strength of every rule, in the order the rules were added.
    pub fn rule_activations(&self) -> &[f64] {
        &self.rule_activations
    }

    pub fn max_activation(&self) -> f64 {
        self.rule_activations.iter().copied().fold(0., f64::max)
    }

    pub fn into_map(self) -> HashMap<String, f64> {
        self.defuzzificated_inferred_memberships
    }
}
