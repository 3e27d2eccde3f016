//! Structured analysis results embedded in a decision.
//!
//! These types are the typed side of the analysis contract. Constructors
//! enforce the semantic invariants; raw provider JSON is checked for
//! presence and types by `domain::contract` before reaching them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ClarityScore, Percentage, ValidationError};

/// Maximum number of classification labels an analysis may carry.
pub const MAX_RELATED_TAGS: usize = 8;

/// A named cognitive-bias finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasFinding {
    pub name: String,
    pub description: String,
    pub probability: Percentage,
    pub mitigation: String,
}

impl BiasFinding {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        probability: Percentage,
        mitigation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("biases.name"));
        }
        Ok(Self {
            name,
            description: description.into().trim().to_string(),
            probability,
            mitigation: mitigation.into().trim().to_string(),
        })
    }
}

/// Risk attached to a simulated path. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(ValidationError::invalid_format(
                "riskLevel",
                format!("'{}' is not one of Low, Medium, High", s),
            )),
        }
    }
}

/// A what-if path with its predicted result.
///
/// `scenario` doubles as the handle for opening a simulation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedOutcome {
    pub scenario: String,
    pub outcome: String,
    pub risk_level: RiskLevel,
}

impl SimulatedOutcome {
    pub fn new(
        scenario: impl Into<String>,
        outcome: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Result<Self, ValidationError> {
        let scenario = scenario.into().trim().to_string();
        if scenario.is_empty() {
            return Err(ValidationError::empty_field("simulations.scenario"));
        }
        Ok(Self {
            scenario,
            outcome: outcome.into().trim().to_string(),
            risk_level,
        })
    }
}

/// Provider-produced analysis of a decision.
///
/// Immutable once attached to a decision, except for the clarity score
/// which the outcome step overwrites exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAnalysis {
    summary: String,
    /// Ordered by provider-assigned relevance; index 0 is the dominant bias.
    biases: Vec<BiasFinding>,
    blind_spots: Vec<String>,
    alternative_perspectives: Vec<String>,
    simulations: Vec<SimulatedOutcome>,
    clarity_score: ClarityScore,
    related_tags: Vec<String>,
}

impl DecisionAnalysis {
    /// Builds an analysis, enforcing every structural invariant.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for a blank summary or blank list items
    /// - `OutOfRange` when simulations are missing or tags are not 1-8
    pub fn new(
        summary: impl Into<String>,
        biases: Vec<BiasFinding>,
        blind_spots: Vec<String>,
        alternative_perspectives: Vec<String>,
        simulations: Vec<SimulatedOutcome>,
        clarity_score: ClarityScore,
        related_tags: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let summary = summary.into().trim().to_string();
        if summary.is_empty() {
            return Err(ValidationError::empty_field("summary"));
        }

        let blind_spots = non_empty_items("blindSpots", blind_spots)?;
        let alternative_perspectives =
            non_empty_items("alternativePerspectives", alternative_perspectives)?;
        let related_tags = non_empty_items("relatedTags", related_tags)?;

        if simulations.is_empty() {
            return Err(ValidationError::out_of_range("simulations", 1, i32::MAX, 0));
        }
        if related_tags.is_empty() || related_tags.len() > MAX_RELATED_TAGS {
            return Err(ValidationError::out_of_range(
                "relatedTags",
                1,
                MAX_RELATED_TAGS as i32,
                related_tags.len() as i32,
            ));
        }

        Ok(Self {
            summary,
            biases,
            blind_spots,
            alternative_perspectives,
            simulations,
            clarity_score,
            related_tags,
        })
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn biases(&self) -> &[BiasFinding] {
        &self.biases
    }

    /// The first bias in provider order, if any.
    pub fn top_bias(&self) -> Option<&BiasFinding> {
        self.biases.first()
    }

    pub fn blind_spots(&self) -> &[String] {
        &self.blind_spots
    }

    pub fn alternative_perspectives(&self) -> &[String] {
        &self.alternative_perspectives
    }

    pub fn simulations(&self) -> &[SimulatedOutcome] {
        &self.simulations
    }

    /// Looks up a simulated path by its exact scenario handle.
    pub fn find_scenario(&self, scenario: &str) -> Option<&SimulatedOutcome> {
        self.simulations.iter().find(|s| s.scenario == scenario)
    }

    pub fn clarity_score(&self) -> ClarityScore {
        self.clarity_score
    }

    pub fn related_tags(&self) -> &[String] {
        &self.related_tags
    }

    /// Replaces the clarity score with a hindsight value.
    ///
    /// Only the decision aggregate calls this, once, during outcome recording.
    pub(crate) fn revise_clarity_score(&mut self, score: ClarityScore) -> ClarityScore {
        std::mem::replace(&mut self.clarity_score, score)
    }
}

/// Hindsight reflection produced once a real outcome is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeAnalysis {
    pub causal_reflection: String,
    pub bias_validation: String,
    pub learning_point: String,
    pub updated_clarity_score: ClarityScore,
}

impl OutcomeAnalysis {
    pub fn new(
        causal_reflection: impl Into<String>,
        bias_validation: impl Into<String>,
        learning_point: impl Into<String>,
        updated_clarity_score: ClarityScore,
    ) -> Result<Self, ValidationError> {
        let causal_reflection = required("causalReflection", causal_reflection.into())?;
        let bias_validation = required("biasValidation", bias_validation.into())?;
        let learning_point = required("learningPoint", learning_point.into())?;
        Ok(Self {
            causal_reflection,
            bias_validation,
            learning_point,
            updated_clarity_score,
        })
    }
}

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

fn non_empty_items(field: &str, items: Vec<String>) -> Result<Vec<String>, ValidationError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| required(&format!("{}[{}]", field, i), item))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn sim() -> SimulatedOutcome {
        SimulatedOutcome::new("Path", "Result", RiskLevel::High).unwrap()
    }

    fn score() -> ClarityScore {
        ClarityScore::try_new(50).unwrap()
    }

    #[test]
    fn top_bias_is_first_in_provider_order() {
        let analysis = sample_analysis(60);
        assert_eq!(analysis.top_bias().unwrap().name, "Status Quo Bias");
    }

    #[test]
    fn rejects_blank_summary() {
        let result = DecisionAnalysis::new(
            "  ",
            vec![],
            vec![],
            vec![],
            vec![sim()],
            score(),
            vec!["Tag".into()],
        );
        assert_eq!(result.unwrap_err(), ValidationError::empty_field("summary"));
    }

    #[test]
    fn requires_at_least_one_simulation() {
        let result =
            DecisionAnalysis::new("ok", vec![], vec![], vec![], vec![], score(), vec!["Tag".into()]);
        assert!(matches!(result, Err(ValidationError::OutOfRange { ref field, .. }) if field == "simulations"));
    }

    #[test]
    fn requires_one_to_eight_tags() {
        let none = DecisionAnalysis::new("ok", vec![], vec![], vec![], vec![sim()], score(), vec![]);
        assert!(none.is_err());

        let nine: Vec<String> = (0..9).map(|i| format!("t{}", i)).collect();
        let too_many = DecisionAnalysis::new("ok", vec![], vec![], vec![], vec![sim()], score(), nine);
        assert!(too_many.is_err());
    }

    #[test]
    fn rejects_blank_list_items() {
        let result = DecisionAnalysis::new(
            "ok",
            vec![],
            vec!["".into()],
            vec![],
            vec![sim()],
            score(),
            vec!["Tag".into()],
        );
        assert_eq!(result.unwrap_err(), ValidationError::empty_field("blindSpots[0]"));
    }

    #[test]
    fn find_scenario_matches_exact_handle() {
        let analysis = sample_analysis(60);
        assert!(analysis.find_scenario("Accept the offer").is_some());
        assert!(analysis.find_scenario("accept the offer").is_none());
    }

    #[test]
    fn risk_level_parses_closed_set_only() {
        assert_eq!("medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert_eq!("High".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("Extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample_analysis(60)).unwrap();
        assert!(json.get("clarityScore").is_some());
        assert!(json.get("relatedTags").is_some());
        assert_eq!(json["simulations"][0]["riskLevel"], "Medium");
    }

    #[test]
    fn outcome_analysis_requires_all_text_fields() {
        let result = OutcomeAnalysis::new("a", "", "c", score());
        assert_eq!(result.unwrap_err(), ValidationError::empty_field("biasValidation"));
    }
}
