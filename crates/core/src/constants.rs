//! Constants used throughout the triage core crate.
//!
//! Classification thresholds and wait bounds are fixed and have no
//! configuration surface.

// Red
pub const RED_GLASGOW_MAX: u8 = 8;
pub const RED_RESPIRATORY_RATE_BELOW: u16 = 8;
pub const RED_RESPIRATORY_RATE_ABOVE: u16 = 35;
pub const RED_OXYGEN_SATURATION_BELOW: u8 = 85;
pub const RED_SYSTOLIC_BELOW: u16 = 80;

// Orange
pub const ORANGE_GLASGOW_MAX: u8 = 12;
pub const ORANGE_HEART_RATE_ABOVE: u16 = 140;
pub const ORANGE_HEART_RATE_BELOW: u16 = 40;
pub const ORANGE_SYSTOLIC_ABOVE: u16 = 220;
pub const ORANGE_TEMPERATURE_ABOVE: f64 = 39.5;
pub const ORANGE_PAIN_MIN: u8 = 7;

// Yellow
pub const YELLOW_HEART_RATE_ABOVE: u16 = 120;
pub const YELLOW_RESPIRATORY_RATE_ABOVE: u16 = 25;
pub const YELLOW_SYSTOLIC_ABOVE: u16 = 180;
pub const YELLOW_DIASTOLIC_ABOVE: u16 = 110;
pub const YELLOW_TEMPERATURE_MIN: f64 = 38.0;
pub const YELLOW_PAIN_MIN: u8 = 4;

// Green
pub const GREEN_PAIN_MIN: u8 = 1;
pub const GREEN_TEMPERATURE_ABOVE: f64 = 37.5;
pub const GREEN_HEART_RATE_ABOVE: u16 = 100;
pub const GREEN_SYMPTOM_COUNT_ABOVE: usize = 1;

/// Maximum wait, in minutes, per tier.
pub const RED_MAX_WAIT_MINUTES: u32 = 0;
pub const ORANGE_MAX_WAIT_MINUTES: u32 = 10;
pub const YELLOW_MAX_WAIT_MINUTES: u32 = 60;
pub const GREEN_MAX_WAIT_MINUTES: u32 = 120;
pub const BLUE_MAX_WAIT_MINUTES: u32 = 240;

/// Plausibility bounds applied to intake readings (inclusive).
pub const SYSTOLIC_BP_RANGE: (u16, u16) = (0, 300);
pub const DIASTOLIC_BP_RANGE: (u16, u16) = (0, 250);
pub const HEART_RATE_RANGE: (u16, u16) = (0, 300);
pub const RESPIRATORY_RATE_RANGE: (u16, u16) = (0, 90);
pub const TEMPERATURE_RANGE: (f64, f64) = (25.0, 45.0);
pub const OXYGEN_SATURATION_RANGE: (u8, u8) = (0, 100);
pub const GLUCOSE_RANGE: (u16, u16) = (0, 2000);
pub const GLASGOW_RANGE: (u8, u8) = (3, 15);
pub const PAIN_SCORE_RANGE: (u8, u8) = (0, 10);

/// Baseline values for a freshly opened encounter.
pub const BASELINE_GLASGOW: u8 = 15;
pub const BASELINE_PAIN_SCORE: u8 = 0;

/// Upper bound on free-text lengths accepted at intake.
pub const MAX_CHIEF_COMPLAINT_LEN: usize = 500;
pub const MAX_OPERATOR_ID_LEN: usize = 128;

/// Environment variable selecting the missing-vitals policy.
pub const MISSING_VITALS_ENV: &str = "TRIAGE_MISSING_VITALS";
