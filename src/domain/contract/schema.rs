//! Response schemas handed to the provider.
//!
//! Expressed in the OpenAPI subset structured-output providers accept.
//! The validators in `validate` enforce the same shape plus the ranges
//! the schema language cannot express.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

pub static DECISION_ANALYSIS_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A brief executive summary of the decision landscape."
            },
            "biases": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "probability": {
                            "type": "NUMBER",
                            "description": "0 to 100 estimated likelihood"
                        },
                        "mitigation": {
                            "type": "STRING",
                            "description": "Advice on how to counter this bias"
                        }
                    },
                    "required": ["name", "description", "probability", "mitigation"]
                }
            },
            "blindSpots": { "type": "ARRAY", "items": { "type": "STRING" } },
            "alternativePerspectives": { "type": "ARRAY", "items": { "type": "STRING" } },
            "simulations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "scenario": { "type": "STRING", "description": "The what-if path" },
                        "outcome": { "type": "STRING", "description": "The predicted result" },
                        "riskLevel": { "type": "STRING", "enum": ["Low", "Medium", "High"] }
                    },
                    "required": ["scenario", "outcome", "riskLevel"]
                }
            },
            "clarityScore": { "type": "NUMBER" },
            "relatedTags": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": [
            "summary",
            "biases",
            "blindSpots",
            "alternativePerspectives",
            "simulations",
            "clarityScore",
            "relatedTags"
        ]
    })
});

pub static OUTCOME_ANALYSIS_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "causalReflection": { "type": "STRING" },
            "biasValidation": { "type": "STRING" },
            "learningPoint": { "type": "STRING" },
            "updatedClarityScore": { "type": "NUMBER" }
        },
        "required": ["causalReflection", "biasValidation", "learningPoint", "updatedClarityScore"]
    })
});

pub static PATTERN_SUMMARY_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "insight": { "type": "STRING" },
            "dominantBias": { "type": "STRING" },
            "recommendation": { "type": "STRING" }
        },
        "required": ["insight", "dominantBias", "recommendation"]
    })
});
