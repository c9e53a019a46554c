//! Raw clinical risk-factor inputs and their declared domains.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A fixed-choice selector value.
///
/// `OPTIONS` is both the order the form presents the choices in and the list
/// the encoder indexes into, so the two can never drift apart.
pub trait Choice: Copy + Eq + std::fmt::Debug + 'static {
    /// Choices in declared presentation order.
    const OPTIONS: &'static [Self];

    /// Stable identifier used in form posts, JSON bodies and CLI flags.
    fn slug(self) -> &'static str;

    /// Human-readable label shown on the form.
    fn label(self) -> &'static str;

    /// Zero-based position of this value within `OPTIONS`.
    fn position(self) -> usize;
}

/// Declares a choice enum whose variant order is its `OPTIONS` order.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($slug:literal, $label:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $slug)]
                #[value(name = $slug)]
                $variant,
            )+
        }

        impl Choice for $name {
            const OPTIONS: &'static [Self] = &[$(Self::$variant),+];

            fn slug(self) -> &'static str {
                match self {
                    $(Self::$variant => $slug),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn position(self) -> usize {
                // Discriminants follow declaration order, which is OPTIONS order.
                self as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// Biological sex as recorded on the form.
    Sex {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
    }
}

impl Sex {
    /// Binary indicator the model was trained on: 1 for male, 0 for female.
    pub fn indicator(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }
}

choice_enum! {
    /// Chest pain type (`cp`).
    ChestPainType {
        TypicalAngina => ("typical-angina", "Typical Angina"),
        AtypicalAngina => ("atypical-angina", "Atypical Angina"),
        NonAnginalPain => ("non-anginal-pain", "Non-anginal Pain"),
        Asymptomatic => ("asymptomatic", "Asymptomatic"),
    }
}

choice_enum! {
    /// Resting electrocardiographic results (`restecg`).
    RestingEcg {
        Normal => ("normal", "Normal"),
        StTAbnormality => ("st-t-abnormality", "ST-T Abnormality"),
        LeftVentricularHypertrophy => ("left-ventricular-hypertrophy", "Left Ventricular Hypertrophy"),
    }
}

choice_enum! {
    /// Slope of the peak exercise ST segment (`slope`).
    StSlope {
        Upsloping => ("upsloping", "Upsloping"),
        Flat => ("flat", "Flat"),
        Downsloping => ("downsloping", "Downsloping"),
    }
}

choice_enum! {
    /// Thalassemia result (`thal`).
    Thalassemia {
        Normal => ("normal", "Normal"),
        FixedDefect => ("fixed-defect", "Fixed Defect"),
        ReversibleDefect => ("reversible-defect", "Reversible Defect"),
    }
}

/// Inclusive numeric domain of a slider control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

pub const AGE: Bounds = slider(18.0, 100.0, 50.0);
pub const RESTING_BLOOD_PRESSURE: Bounds = slider(90.0, 200.0, 120.0);
pub const CHOLESTEROL: Bounds = slider(100.0, 600.0, 250.0);
pub const MAX_HEART_RATE: Bounds = slider(70.0, 220.0, 150.0);
pub const ST_DEPRESSION: Bounds = Bounds {
    min: 0.0,
    max: 6.2,
    step: 0.1,
    default: 1.0,
};
pub const MAJOR_VESSELS: Bounds = slider(0.0, 4.0, 1.0);

const fn slider(min: f64, max: f64, default: f64) -> Bounds {
    Bounds {
        min,
        max,
        step: 1.0,
        default,
    }
}

/// One complete form submission, prior to encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub age: u32,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    pub resting_blood_pressure: u32,
    pub cholesterol: u32,
    pub fasting_blood_sugar_high: bool,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: u32,
    pub exercise_induced_angina: bool,
    pub st_depression: f64,
    pub st_slope: StSlope,
    pub major_vessels_count: u32,
    pub thalassemia: Thalassemia,
}

impl Default for RawInput {
    /// The values the form starts out with.
    fn default() -> Self {
        Self {
            age: AGE.default as u32,
            sex: Sex::Male,
            chest_pain_type: ChestPainType::TypicalAngina,
            resting_blood_pressure: RESTING_BLOOD_PRESSURE.default as u32,
            cholesterol: CHOLESTEROL.default as u32,
            fasting_blood_sugar_high: false,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: MAX_HEART_RATE.default as u32,
            exercise_induced_angina: false,
            st_depression: ST_DEPRESSION.default,
            st_slope: StSlope::Upsloping,
            major_vessels_count: MAJOR_VESSELS.default as u32,
            thalassemia: Thalassemia::Normal,
        }
    }
}

impl RawInput {
    /// Check every numeric field against its declared domain.
    ///
    /// Sliders enforce this structurally; JSON and CLI callers do not, so the
    /// pipeline refuses any record that fails here.
    pub fn validate(&self) -> Result<(), PipelineError> {
        check("age", self.age as f64, &AGE)?;
        check(
            "resting_blood_pressure",
            self.resting_blood_pressure as f64,
            &RESTING_BLOOD_PRESSURE,
        )?;
        check("cholesterol", self.cholesterol as f64, &CHOLESTEROL)?;
        check("max_heart_rate", self.max_heart_rate as f64, &MAX_HEART_RATE)?;
        check("st_depression", self.st_depression, &ST_DEPRESSION)?;
        check(
            "major_vessels_count",
            self.major_vessels_count as f64,
            &MAJOR_VESSELS,
        )?;
        Ok(())
    }
}

fn check(field: &str, value: f64, bounds: &Bounds) -> Result<(), PipelineError> {
    if bounds.contains(value) {
        Ok(())
    } else {
        Err(PipelineError::invalid(
            field,
            format!("{value} is outside [{}, {}]", bounds.min, bounds.max),
        ))
    }
}
