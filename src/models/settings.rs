//! Site settings singleton matching the admin frontend Settings interface.
//!
//! Unlike the other entities this is a single object, replaced atomically on
//! every save. The PUT request body is the full `Settings` value itself.

use serde::{Deserialize, Serialize};

/// Pricing and availability configuration for the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub pricing: Pricing,
    pub availability: Availability,
}

/// Fee table, all values display strings (may include currency and notes).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub enrollment_fee: String,
    pub insurance_fee: String,
    pub monthly_fee: String,
    pub single_parent_fee: String,
    pub meal_fee: String,
    pub extended_care: String,
    pub long_vacation_fee: String,
}

/// Per-class enrollment availability, ordered by display importance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub as_of_date: String,
    pub classes: Vec<ClassStatus>,
}

/// One class row in the availability table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassStatus {
    pub name: String,
    #[serde(default)]
    pub status: String,
}
