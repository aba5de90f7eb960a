//! Mamdani fuzzy inference
//!
//! Crisp inputs are fuzzified against low/medium/high membership functions,
//! each rule fires with the minimum of its antecedent degrees, rules implying
//! the same output term are aggregated by maximum, and the clipped output
//! surface is defuzzified by its centroid over a sampled universe.
//!
//! Systems are validated when built and never mutated afterwards, so one
//! instance can be shared across threads for the life of the process.

use serde::{Deserialize, Serialize};
use types::errors::InferenceError;

/// Default sampling step of the output universe
pub const DEFAULT_RESOLUTION: f64 = 0.01;

// ── Membership functions ────────────────────────────────────────────

/// Membership function over a variable's universe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Zero outside [a, c], one at b
    Triangular { a: f64, b: f64, c: f64 },
    /// Zero outside [a, d], one on [b, c]
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        MembershipFunction::Triangular { a, b, c }
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        MembershipFunction::Trapezoidal { a, b, c, d }
    }

    /// Membership degree of `x`, in [0, 1]
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    fn is_well_formed(&self) -> bool {
        match *self {
            MembershipFunction::Triangular { a, b, c } => {
                a.is_finite() && b.is_finite() && c.is_finite() && a <= b && b <= c && a < c
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                a.is_finite()
                    && b.is_finite()
                    && c.is_finite()
                    && d.is_finite()
                    && a <= b
                    && b <= c
                    && c <= d
                    && a < d
            }
        }
    }
}

// ── Variables ───────────────────────────────────────────────────────

/// Linguistic term of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Low,
    Medium,
    High,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::Low, Term::Medium, Term::High];
}

/// Named axis with low/medium/high membership functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyVariable {
    pub name: String,
    pub universe: (f64, f64),
    pub low: MembershipFunction,
    pub medium: MembershipFunction,
    pub high: MembershipFunction,
}

impl FuzzyVariable {
    pub fn new(
        name: impl Into<String>,
        low: MembershipFunction,
        medium: MembershipFunction,
        high: MembershipFunction,
    ) -> Self {
        Self {
            name: name.into(),
            universe: (0.0, 1.0),
            low,
            medium,
            high,
        }
    }

    /// Variable over [0, 1] with the conventional overlapping triangles
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(
            name,
            MembershipFunction::triangular(0.0, 0.0, 0.3),
            MembershipFunction::triangular(0.2, 0.5, 0.8),
            MembershipFunction::triangular(0.7, 1.0, 1.0),
        )
    }

    pub fn membership(&self, term: Term) -> &MembershipFunction {
        match term {
            Term::Low => &self.low,
            Term::Medium => &self.medium,
            Term::High => &self.high,
        }
    }

    pub fn degree(&self, term: Term, x: f64) -> f64 {
        self.membership(term).degree(x)
    }

    fn validate(&self) -> Result<(), InferenceError> {
        let (lo, hi) = self.universe;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(InferenceError::InvalidUniverse {
                name: self.name.clone(),
                reason: format!("bounds [{}, {}] are not an increasing range", lo, hi),
            });
        }
        for term in Term::ALL {
            if !self.membership(term).is_well_formed() {
                return Err(InferenceError::InvalidUniverse {
                    name: self.name.clone(),
                    reason: format!("{:?} membership function is malformed", term),
                });
            }
        }
        Ok(())
    }
}

// ── Rules ───────────────────────────────────────────────────────────

/// Conjunction of (variable, term) antecedents implying an output term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyRule {
    pub antecedents: Vec<(String, Term)>,
    pub consequent: Term,
}

impl FuzzyRule {
    pub fn new(antecedents: &[(&str, Term)], consequent: Term) -> Self {
        Self {
            antecedents: antecedents
                .iter()
                .map(|(name, term)| (name.to_string(), *term))
                .collect(),
            consequent,
        }
    }
}

/// Rule with antecedents resolved to input positions
#[derive(Debug, Clone)]
struct CompiledRule {
    antecedents: Vec<(usize, Term)>,
    consequent: Term,
}

// ── System ──────────────────────────────────────────────────────────

/// Per-term activation of the output variable after aggregation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Activations {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Activations {
    pub fn get(&self, term: Term) -> f64 {
        match term {
            Term::Low => self.low,
            Term::Medium => self.medium,
            Term::High => self.high,
        }
    }

    fn raise(&mut self, term: Term, strength: f64) {
        let slot = match term {
            Term::Low => &mut self.low,
            Term::Medium => &mut self.medium,
            Term::High => &mut self.high,
        };
        *slot = slot.max(strength);
    }
}

/// Crisp result of one inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    pub value: f64,
    pub activations: Activations,
}

/// Validated Mamdani system with a single output
#[derive(Debug, Clone)]
pub struct FuzzySystem {
    inputs: Vec<FuzzyVariable>,
    output: FuzzyVariable,
    rules: Vec<CompiledRule>,
    resolution: f64,
}

impl FuzzySystem {
    /// Build a system, resolving every rule antecedent to a declared input
    pub fn new(
        inputs: Vec<FuzzyVariable>,
        output: FuzzyVariable,
        rules: &[FuzzyRule],
        resolution: f64,
    ) -> Result<Self, InferenceError> {
        if rules.is_empty() {
            return Err(InferenceError::EmptyRuleSet);
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(InferenceError::InvalidUniverse {
                name: output.name.clone(),
                reason: format!("resolution {} must be positive", resolution),
            });
        }
        for variable in inputs.iter().chain(std::iter::once(&output)) {
            variable.validate()?;
        }

        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let mut antecedents = Vec::with_capacity(rule.antecedents.len());
            for (name, term) in &rule.antecedents {
                let position = inputs
                    .iter()
                    .position(|v| &v.name == name)
                    .ok_or_else(|| InferenceError::UnknownVariable { name: name.clone() })?;
                antecedents.push((position, *term));
            }
            compiled.push(CompiledRule {
                antecedents,
                consequent: rule.consequent,
            });
        }

        Ok(Self {
            inputs,
            output,
            rules: compiled,
            resolution,
        })
    }

    pub fn inputs(&self) -> &[FuzzyVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &FuzzyVariable {
        &self.output
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Evaluate named crisp inputs
    ///
    /// Every declared input must be present and finite. Fails with
    /// [`InferenceError::NoRuleFired`] when the aggregated surface is empty.
    pub fn evaluate(&self, inputs: &[(&str, f64)]) -> Result<Inference, InferenceError> {
        let mut values = Vec::with_capacity(self.inputs.len());
        for variable in &self.inputs {
            let value = inputs
                .iter()
                .find(|(name, _)| *name == variable.name)
                .map(|(_, value)| *value)
                .ok_or_else(|| InferenceError::MissingInput {
                    name: variable.name.clone(),
                })?;
            values.push(value);
        }
        self.evaluate_ordered(&values)
    }

    /// Evaluate crisp inputs given in declaration order
    pub fn evaluate_ordered(&self, values: &[f64]) -> Result<Inference, InferenceError> {
        if values.len() != self.inputs.len() {
            let missing = self
                .inputs
                .get(values.len())
                .map(|v| v.name.clone())
                .unwrap_or_else(|| "<extra input>".to_string());
            return Err(InferenceError::MissingInput { name: missing });
        }
        if let Some((variable, _)) = self
            .inputs
            .iter()
            .zip(values)
            .find(|(_, value)| !value.is_finite())
        {
            return Err(InferenceError::NonFiniteInput {
                name: variable.name.clone(),
            });
        }

        let activations = self.activate(values);
        let value = self.defuzzify(&activations)?;
        Ok(Inference { value, activations })
    }

    fn activate(&self, values: &[f64]) -> Activations {
        let mut activations = Activations::default();
        for rule in &self.rules {
            let strength = rule
                .antecedents
                .iter()
                .map(|(position, term)| self.inputs[*position].degree(*term, values[*position]))
                .fold(f64::INFINITY, f64::min);
            activations.raise(rule.consequent, strength);
        }
        activations
    }

    fn defuzzify(&self, activations: &Activations) -> Result<f64, InferenceError> {
        let (lo, hi) = self.output.universe;
        let steps = ((hi - lo) / self.resolution).round() as usize;

        let mut weighted = 0.0;
        let mut total = 0.0;
        for k in 0..=steps {
            let y = lo + k as f64 * self.resolution;
            let mu = Term::ALL
                .iter()
                .map(|term| activations.get(*term).min(self.output.degree(*term, y)))
                .fold(0.0, f64::max);
            weighted += y * mu;
            total += mu;
        }

        if total == 0.0 {
            return Err(InferenceError::NoRuleFired);
        }
        Ok(weighted / total)
    }
}
