//! Turning a prediction into a pass/fail styled result.

use serde::Serialize;

use crate::pipeline::PredictionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Positive,
    Negative,
}

/// Visual treatment of a result region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Danger,
    Success,
}

impl Tone {
    pub fn background(self) -> &'static str {
        match self {
            Self::Danger => "red",
            Self::Success => "green",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub verdict: Verdict,
    pub tone: Tone,
    pub headline: String,
    /// Probability of the predicted class.
    pub confidence: f64,
}

impl Presentation {
    /// Single line for terminals.
    pub fn summary(&self) -> String {
        format!(
            "{} (confidence {:.1}%)",
            self.headline,
            self.confidence * 100.0
        )
    }
}

pub fn present(result: &PredictionResult) -> Presentation {
    let (verdict, tone) = if result.label {
        (Verdict::Positive, Tone::Danger)
    } else {
        (Verdict::Negative, Tone::Success)
    };
    let word = match verdict {
        Verdict::Positive => "Positive",
        Verdict::Negative => "Negative",
    };
    Presentation {
        verdict,
        tone,
        headline: format!("Prediction: {word}"),
        confidence: result.confidence(),
    }
}
