//! Field descriptors for the input collector.
//!
//! `FIELDS` lists the 13 controls in feature-vector order. Every surface that
//! presents the form (HTML, schema endpoint, CLI) reads from this table.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::clinical::{
    features::FEATURE_NAMES,
    input::{
        Bounds, ChestPainType, Choice, RawInput, RestingEcg, Sex, StSlope, Thalassemia, AGE,
        CHOLESTEROL, MAJOR_VESSELS, MAX_HEART_RATE, RESTING_BLOOD_PRESSURE, ST_DEPRESSION,
    },
};

/// One entry of a fixed-choice selector.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// The constrained control a field is collected with.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Slider(Bounds),
    Select {
        options: Vec<ChoiceOption>,
        default: &'static str,
    },
}

/// Identity of one of the 13 collected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Age,
    Sex,
    ChestPainType,
    RestingBloodPressure,
    Cholesterol,
    FastingBloodSugarHigh,
    RestingEcg,
    MaxHeartRate,
    ExerciseInducedAngina,
    StDepression,
    StSlope,
    MajorVesselsCount,
    Thalassemia,
}

impl FieldId {
    /// Form / JSON field name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPainType => "chest_pain_type",
            Self::RestingBloodPressure => "resting_blood_pressure",
            Self::Cholesterol => "cholesterol",
            Self::FastingBloodSugarHigh => "fasting_blood_sugar_high",
            Self::RestingEcg => "resting_ecg",
            Self::MaxHeartRate => "max_heart_rate",
            Self::ExerciseInducedAngina => "exercise_induced_angina",
            Self::StDepression => "st_depression",
            Self::StSlope => "st_slope",
            Self::MajorVesselsCount => "major_vessels_count",
            Self::Thalassemia => "thalassemia",
        }
    }

    /// The value of this field in `input`, formatted as the form posts it.
    pub fn value_in(self, input: &RawInput) -> String {
        match self {
            Self::Age => input.age.to_string(),
            Self::Sex => input.sex.slug().to_string(),
            Self::ChestPainType => input.chest_pain_type.slug().to_string(),
            Self::RestingBloodPressure => input.resting_blood_pressure.to_string(),
            Self::Cholesterol => input.cholesterol.to_string(),
            Self::FastingBloodSugarHigh => input.fasting_blood_sugar_high.to_string(),
            Self::RestingEcg => input.resting_ecg.slug().to_string(),
            Self::MaxHeartRate => input.max_heart_rate.to_string(),
            Self::ExerciseInducedAngina => input.exercise_induced_angina.to_string(),
            Self::StDepression => format!("{:.1}", input.st_depression),
            Self::StSlope => input.st_slope.slug().to_string(),
            Self::MajorVesselsCount => input.major_vessels_count.to_string(),
            Self::Thalassemia => input.thalassemia.slug().to_string(),
        }
    }
}

/// Descriptor for one form field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    #[serde(rename = "name")]
    pub id: FieldId,
    /// Model feature this field encodes into.
    pub feature: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub control: Control,
}

fn select<T: Choice>(default: T) -> Control {
    Control::Select {
        options: T::OPTIONS
            .iter()
            .map(|choice| ChoiceOption {
                value: choice.slug(),
                label: choice.label(),
            })
            .collect(),
        default: default.slug(),
    }
}

fn toggle(off: &'static str, on: &'static str) -> Control {
    Control::Select {
        options: vec![
            ChoiceOption {
                value: "false",
                label: off,
            },
            ChoiceOption {
                value: "true",
                label: on,
            },
        ],
        default: "false",
    }
}

fn field(index: usize, id: FieldId, label: &'static str, control: Control) -> FieldSpec {
    FieldSpec {
        id,
        feature: FEATURE_NAMES[index],
        label,
        control,
    }
}

pub static FIELDS: Lazy<Vec<FieldSpec>> = Lazy::new(|| {
    vec![
        field(0, FieldId::Age, "Age", Control::Slider(AGE)),
        field(1, FieldId::Sex, "Sex", select(Sex::Male)),
        field(
            2,
            FieldId::ChestPainType,
            "Chest Pain Type",
            select(ChestPainType::TypicalAngina),
        ),
        field(
            3,
            FieldId::RestingBloodPressure,
            "Resting Blood Pressure",
            Control::Slider(RESTING_BLOOD_PRESSURE),
        ),
        field(
            4,
            FieldId::Cholesterol,
            "Cholesterol",
            Control::Slider(CHOLESTEROL),
        ),
        field(
            5,
            FieldId::FastingBloodSugarHigh,
            "Fasting Blood Sugar > 120 mg/dl",
            toggle("False", "True"),
        ),
        field(
            6,
            FieldId::RestingEcg,
            "Resting Electrocardiographic Results",
            select(RestingEcg::Normal),
        ),
        field(
            7,
            FieldId::MaxHeartRate,
            "Maximum Heart Rate Achieved",
            Control::Slider(MAX_HEART_RATE),
        ),
        field(
            8,
            FieldId::ExerciseInducedAngina,
            "Exercise Induced Angina",
            toggle("No", "Yes"),
        ),
        field(
            9,
            FieldId::StDepression,
            "ST Depression Induced by Exercise Relative to Rest",
            Control::Slider(ST_DEPRESSION),
        ),
        field(
            10,
            FieldId::StSlope,
            "Slope of the Peak Exercise ST Segment",
            select(StSlope::Upsloping),
        ),
        field(
            11,
            FieldId::MajorVesselsCount,
            "Number of Major Vessels Colored by Fluoroscopy",
            Control::Slider(MAJOR_VESSELS),
        ),
        field(
            12,
            FieldId::Thalassemia,
            "Thalassemia",
            select(Thalassemia::Normal),
        ),
    ]
});
