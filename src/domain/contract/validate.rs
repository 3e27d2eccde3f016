//! Field-by-field validation of provider replies.
//!
//! Replies are parsed into `serde_json::Value` first and walked by hand so
//! that every violation is reported with its path, not just the first one
//! serde would stop at. Nothing is built until the whole reply passes.

use serde_json::{Map, Value};

use super::errors::ContractError;
use crate::domain::decision::{
    BiasFinding, DecisionAnalysis, OutcomeAnalysis, RiskLevel, SimulatedOutcome,
    MAX_RELATED_TAGS,
};
use crate::domain::foundation::{ClarityScore, Percentage};
use crate::domain::patterns::PatternSummary;

/// Validates a decision analysis reply.
///
/// # Errors
///
/// Any missing field, wrong type, score outside 0-100, unknown risk level,
/// empty simulation list or tag count outside 1-8.
pub fn parse_decision_analysis(raw: &str) -> Result<DecisionAnalysis, ContractError> {
    let root = parse_object(raw)?;
    let mut r = FieldReader::default();

    let summary = r.text(&root, "", "summary");
    let biases = r.array(&root, "", "biases", 0, usize::MAX).map(|items| {
        let mut found = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("biases[{}]", i);
            if let Some(bias) = r.bias(item, &path) {
                found.push(bias);
            }
        }
        found
    });
    let blind_spots = r.texts(&root, "", "blindSpots", 0, usize::MAX);
    let alternatives = r.texts(&root, "", "alternativePerspectives", 0, usize::MAX);
    let simulations = r.array(&root, "", "simulations", 1, usize::MAX).map(|items| {
        let mut found = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("simulations[{}]", i);
            if let Some(sim) = r.simulation(item, &path) {
                found.push(sim);
            }
        }
        found
    });
    let clarity = r.score(&root, "", "clarityScore");
    let tags = r.texts(&root, "", "relatedTags", 1, MAX_RELATED_TAGS);

    let parts = match (summary, biases, blind_spots, alternatives, simulations, clarity, tags) {
        (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f), Some(g)) => {
            Some((a, b, c, d, e, f, g))
        }
        _ => None,
    };
    let (summary, biases, blind_spots, alternatives, simulations, clarity, tags) =
        r.finish(parts)?;

    Ok(DecisionAnalysis::new(
        summary,
        biases,
        blind_spots,
        alternatives,
        simulations,
        clarity,
        tags,
    )?)
}

/// Validates an outcome analysis reply.
pub fn parse_outcome_analysis(raw: &str) -> Result<OutcomeAnalysis, ContractError> {
    let root = parse_object(raw)?;
    let mut r = FieldReader::default();

    let reflection = r.text(&root, "", "causalReflection");
    let validation = r.text(&root, "", "biasValidation");
    let learning = r.text(&root, "", "learningPoint");
    let updated = r.score(&root, "", "updatedClarityScore");

    let parts = match (reflection, validation, learning, updated) {
        (Some(a), Some(b), Some(c), Some(d)) => Some((a, b, c, d)),
        _ => None,
    };
    let (reflection, validation, learning, updated) = r.finish(parts)?;

    Ok(OutcomeAnalysis::new(reflection, validation, learning, updated)?)
}

/// Validates a pattern summary reply.
pub fn parse_pattern_summary(raw: &str) -> Result<PatternSummary, ContractError> {
    let root = parse_object(raw)?;
    let mut r = FieldReader::default();

    let insight = r.text(&root, "", "insight");
    let dominant_bias = r.text(&root, "", "dominantBias");
    let recommendation = r.text(&root, "", "recommendation");

    let parts = match (insight, dominant_bias, recommendation) {
        (Some(a), Some(b), Some(c)) => Some((a, b, c)),
        _ => None,
    };
    let (insight, dominant_bias, recommendation) = r.finish(parts)?;

    Ok(PatternSummary::new(insight, dominant_bias, recommendation))
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, ContractError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ContractError::EmptyResponse);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| ContractError::MalformedJson {
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ContractError::invalid_type("$", "object", kind(&other))),
    }
}

/// Removes a surrounding Markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        if let Some(body) = rest.trim_end().strip_suffix("```") {
            return body.trim();
        }
    }
    trimmed
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Collects violations while reading fields.
#[derive(Default)]
struct FieldReader {
    errors: Vec<ContractError>,
}

impl FieldReader {
    fn finish<T>(self, parts: Option<T>) -> Result<T, ContractError> {
        if let Some(err) = ContractError::from_violations(self.errors) {
            return Err(err);
        }
        parts.ok_or_else(|| ContractError::invalid_value("$", "incomplete response"))
    }

    fn field<'v>(&mut self, obj: &'v Map<String, Value>, path: &str, key: &str) -> Option<&'v Value> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.errors.push(ContractError::missing(join(path, key)));
                None
            }
            Some(value) => Some(value),
        }
    }

    fn text(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<String> {
        let value = self.field(obj, path, key)?;
        self.text_value(value, &join(path, key))
    }

    fn text_value(&mut self, value: &Value, field: &str) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::String(_) => {
                self.errors
                    .push(ContractError::invalid_value(field, "must not be empty"));
                None
            }
            other => {
                self.errors
                    .push(ContractError::invalid_type(field, "string", kind(other)));
                None
            }
        }
    }

    /// Reads an integer in `[min, max]`; fractional values are rounded.
    fn integer(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
        min: i64,
        max: i64,
    ) -> Option<i64> {
        let field = join(path, key);
        let value = self.field(obj, path, key)?;
        let Some(n) = value.as_f64() else {
            self.errors
                .push(ContractError::invalid_type(field, "number", kind(value)));
            return None;
        };
        if !(min as f64..=max as f64).contains(&n) {
            self.errors.push(ContractError::OutOfRange {
                field,
                value: value.to_string(),
                min,
                max,
            });
            return None;
        }
        Some(n.round() as i64)
    }

    fn score(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<ClarityScore> {
        let n = self.integer(obj, path, key, 0, 100)?;
        match ClarityScore::try_new(n) {
            Ok(score) => Some(score),
            Err(err) => {
                self.errors.push(err.into());
                None
            }
        }
    }

    fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
        min: usize,
        max: usize,
    ) -> Option<&'v Vec<Value>> {
        let field = join(path, key);
        let value = self.field(obj, path, key)?;
        let Value::Array(items) = value else {
            self.errors
                .push(ContractError::invalid_type(field, "array", kind(value)));
            return None;
        };
        if items.len() < min || items.len() > max {
            self.errors.push(ContractError::ArrayLength {
                field,
                min,
                max,
                actual: items.len(),
            });
        }
        Some(items)
    }

    fn texts(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
        min: usize,
        max: usize,
    ) -> Option<Vec<String>> {
        let items = self.array(obj, path, key, min, max)?;
        let field = join(path, key);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if let Some(text) = self.text_value(item, &format!("{}[{}]", field, i)) {
                out.push(text);
            }
        }
        Some(out)
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.errors
                    .push(ContractError::invalid_type(path, "object", kind(other)));
                None
            }
        }
    }

    fn bias(&mut self, item: &Value, path: &str) -> Option<BiasFinding> {
        let obj = self.object(item, path)?;
        let name = self.text(obj, path, "name");
        let description = self.text(obj, path, "description");
        let probability = self.integer(obj, path, "probability", 0, 100);
        let mitigation = self.text(obj, path, "mitigation");

        let (name, description, probability, mitigation) =
            match (name, description, probability, mitigation) {
                (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
                _ => return None,
            };
        let probability = Percentage::new(probability.clamp(0, 100) as u8);
        match BiasFinding::new(name, description, probability, mitigation) {
            Ok(bias) => Some(bias),
            Err(err) => {
                self.errors.push(err.into());
                None
            }
        }
    }

    fn simulation(&mut self, item: &Value, path: &str) -> Option<SimulatedOutcome> {
        let obj = self.object(item, path)?;
        let scenario = self.text(obj, path, "scenario");
        let outcome = self.text(obj, path, "outcome");
        let risk = self.text(obj, path, "riskLevel").and_then(|raw| {
            match raw.parse::<RiskLevel>() {
                Ok(level) => Some(level),
                Err(_) => {
                    self.errors.push(ContractError::invalid_value(
                        join(path, "riskLevel"),
                        format!("'{}' is not one of Low, Medium, High", raw),
                    ));
                    None
                }
            }
        });

        let (scenario, outcome, risk) = match (scenario, outcome, risk) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => return None,
        };
        match SimulatedOutcome::new(scenario, outcome, risk) {
            Ok(sim) => Some(sim),
            Err(err) => {
                self.errors.push(err.into());
                None
            }
        }
    }
}
