//! Server-rendered prediction form.

use askama::Template;

use crate::{
    clinical::{
        form::{Control, FIELDS},
        RawInput,
    },
    pipeline::{Runtime, Submission},
};

const TITLE: &str = "Heart Disease Prediction";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub title: &'static str,
    /// Startup load failures; prediction stays disabled while any are shown.
    pub banners: Vec<String>,
    pub fields: Vec<FieldView>,
    pub outcome: Option<OutcomeView>,
}

pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub is_select: bool,
    pub min: String,
    pub max: String,
    pub step: String,
    pub value: String,
    pub options: Vec<OptionView>,
}

pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct OutcomeView {
    pub is_error: bool,
    pub background: &'static str,
    pub headline: String,
    pub detail: String,
}

impl OutcomeView {
    fn from_submission(submission: &Submission) -> Self {
        match &submission.outcome {
            Ok(report) => Self {
                is_error: false,
                background: report.presentation.tone.background(),
                headline: report.presentation.headline.clone(),
                detail: format!("Confidence: {:.1}%", report.presentation.confidence * 100.0),
            },
            Err(err) => Self {
                is_error: true,
                background: "darkred",
                headline: "Prediction unavailable".to_string(),
                detail: err.to_string(),
            },
        }
    }
}

impl IndexPage {
    /// The form filled with `input`, plus the result of `submission` if any.
    pub fn new(runtime: &Runtime, input: &RawInput, submission: Option<&Submission>) -> Self {
        let fields = FIELDS
            .iter()
            .map(|spec| {
                let value = spec.id.value_in(input);
                match &spec.control {
                    Control::Slider(bounds) => FieldView {
                        name: spec.id.name(),
                        label: spec.label,
                        is_select: false,
                        min: bounds.min.to_string(),
                        max: bounds.max.to_string(),
                        step: bounds.step.to_string(),
                        value,
                        options: Vec::new(),
                    },
                    Control::Select { options, .. } => FieldView {
                        name: spec.id.name(),
                        label: spec.label,
                        is_select: true,
                        min: String::new(),
                        max: String::new(),
                        step: String::new(),
                        options: options
                            .iter()
                            .map(|option| OptionView {
                                value: option.value,
                                label: option.label,
                                selected: option.value == value,
                            })
                            .collect(),
                        value,
                    },
                }
            })
            .collect();

        Self {
            title: TITLE,
            banners: runtime
                .load_failures()
                .into_iter()
                .map(|err| err.to_string())
                .collect(),
            fields,
            outcome: submission.map(OutcomeView::from_submission),
        }
    }
}
