//! CLI entry-point for a one-shot prediction.

use anyhow::{Context, Result};
use clap::{ArgAction, Args as ClapArgs};
use tracing::instrument;

use crate::{
    api::types::PredictResponse,
    clinical::{ChestPainType, RawInput, RestingEcg, Sex, StSlope, Thalassemia},
    config::Settings,
    pipeline::Runtime,
};

/// Clinical inputs; every flag defaults to the form's starting value.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[arg(long, default_value_t = 50)]
    pub age: u32,
    #[arg(long, value_enum, default_value = "male")]
    pub sex: Sex,
    #[arg(long, value_enum, default_value = "typical-angina")]
    pub chest_pain_type: ChestPainType,
    /// Resting blood pressure (mm Hg).
    #[arg(long, default_value_t = 120)]
    pub resting_blood_pressure: u32,
    /// Serum cholesterol (mg/dl).
    #[arg(long, default_value_t = 250)]
    pub cholesterol: u32,
    /// Fasting blood sugar above 120 mg/dl.
    #[arg(long, action = ArgAction::Set, default_value_t = false)]
    pub fasting_blood_sugar_high: bool,
    #[arg(long, value_enum, default_value = "normal")]
    pub resting_ecg: RestingEcg,
    #[arg(long, default_value_t = 150)]
    pub max_heart_rate: u32,
    #[arg(long, action = ArgAction::Set, default_value_t = false)]
    pub exercise_induced_angina: bool,
    /// ST depression induced by exercise relative to rest.
    #[arg(long, default_value_t = 1.0)]
    pub st_depression: f64,
    #[arg(long, value_enum, default_value = "upsloping")]
    pub st_slope: StSlope,
    /// Major vessels colored by fluoroscopy.
    #[arg(long, default_value_t = 1)]
    pub major_vessels_count: u32,
    #[arg(long, value_enum, default_value = "normal")]
    pub thalassemia: Thalassemia,
    /// Print the full result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl From<&Args> for RawInput {
    fn from(args: &Args) -> Self {
        RawInput {
            age: args.age,
            sex: args.sex,
            chest_pain_type: args.chest_pain_type,
            resting_blood_pressure: args.resting_blood_pressure,
            cholesterol: args.cholesterol,
            fasting_blood_sugar_high: args.fasting_blood_sugar_high,
            resting_ecg: args.resting_ecg,
            max_heart_rate: args.max_heart_rate,
            exercise_induced_angina: args.exercise_induced_angina,
            st_depression: args.st_depression,
            st_slope: args.st_slope,
            major_vessels_count: args.major_vessels_count,
            thalassemia: args.thalassemia,
        }
    }
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let runtime = Runtime::load(&settings);
    let input = RawInput::from(&args);
    let submission = runtime.submit(&input);

    if args.json {
        let body = PredictResponse::from_submission(&submission);
        println!(
            "{}",
            serde_json::to_string_pretty(&body).context("serializing prediction")?
        );
    }
    let report = submission.outcome?;
    if !args.json {
        println!("{}", report.presentation.summary());
    }
    Ok(())
}
