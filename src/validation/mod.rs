//! Field-level validation, one rule set per entity type.
//!
//! Pure checks run before any repository call. First failing field wins; the
//! admin frontend re-validates interactively so there is no need to aggregate
//! errors. All length bounds count characters, not bytes, because content is
//! largely Japanese text.

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::Settings;

/// Maximum rows in the availability class table.
const MAX_CLASSES: usize = 20;

/// Validate news post fields (shared by create and update).
pub fn validate_news(date: &str, title: &str, body: &str) -> Result<(), AppError> {
    if !is_iso_date(date) {
        return Err(AppError::Validation(
            "Date must be a valid date in YYYY-MM-DD format".to_string(),
        ));
    }
    check_len("Title", title, 1, 50)?;
    check_len("Body", body, 0, 1000)
}

/// Validate staff member fields (shared by create and update).
pub fn validate_staff(name: &str, years: i64, message: &str) -> Result<(), AppError> {
    check_len("Name", name, 1, 50)?;
    if !(0..=60).contains(&years) {
        return Err(AppError::Validation(
            "Years must be between 0 and 60".to_string(),
        ));
    }
    check_len("Message", message, 0, 300)
}

/// Validate document link fields (shared by create and update).
pub fn validate_document(
    category: &str,
    name: &str,
    description: &str,
    url: &str,
) -> Result<(), AppError> {
    check_len("Category", category, 1, 50)?;
    check_len("Name", name, 1, 100)?;
    check_len("Description", description, 0, 200)?;
    check_len("URL", url, 0, 500)
}

/// Validate the settings singleton, including the class table structure.
pub fn validate_settings(settings: &Settings) -> Result<(), AppError> {
    let pricing = &settings.pricing;
    let fees = [
        ("enrollmentFee", &pricing.enrollment_fee),
        ("insuranceFee", &pricing.insurance_fee),
        ("monthlyFee", &pricing.monthly_fee),
        ("singleParentFee", &pricing.single_parent_fee),
        ("mealFee", &pricing.meal_fee),
        ("extendedCare", &pricing.extended_care),
        ("longVacationFee", &pricing.long_vacation_fee),
    ];
    for (label, value) in fees {
        check_len(&format!("Pricing {}", label), value, 0, 50)?;
    }

    check_len("asOfDate", &settings.availability.as_of_date, 1, 50)?;
    if settings.availability.classes.len() > MAX_CLASSES {
        return Err(AppError::Validation(format!(
            "At most {} classes are allowed",
            MAX_CLASSES
        )));
    }
    for (i, class) in settings.availability.classes.iter().enumerate() {
        check_len(&format!("Class {} name", i + 1), &class.name, 1, 50)?;
        check_len(&format!("Class {} status", i + 1), &class.status, 0, 20)?;
    }
    Ok(())
}

/// Character-count bound check.
fn check_len(label: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        return Ok(());
    }
    let message = if min == 0 {
        format!("{} must be {} characters or fewer", label, max)
    } else {
        format!("{} must be {}-{} characters", label, min, max)
    };
    Err(AppError::Validation(message))
}

/// Strict YYYY-MM-DD: zero-padded shape plus a real calendar date. Padding
/// matters because news sorts lexicographically on this field.
fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    shaped && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
