use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::companies::synonyms::STATES;
use crate::error::{AtomError, AtomResult};

pub const MAX_DISPLAY_NAME_LEN: usize = 80;

/// A driver's own profile, keyed by their Cognito `sub`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Two-letter state code.
    pub home_state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfilePayload {
    pub display_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub home_state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub home_state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStep {
    ProfileCreated,
    PhoneAdded,
    VehicleAdded,
    LicenseUploaded,
    VehicleDocumentUploaded,
    CompanyTracked,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 6] = [
        OnboardingStep::ProfileCreated,
        OnboardingStep::PhoneAdded,
        OnboardingStep::VehicleAdded,
        OnboardingStep::LicenseUploaded,
        OnboardingStep::VehicleDocumentUploaded,
        OnboardingStep::CompanyTracked,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OnboardingStep::ProfileCreated => "Create your profile",
            OnboardingStep::PhoneAdded => "Add a contact phone",
            OnboardingStep::VehicleAdded => "Add a vehicle",
            OnboardingStep::LicenseUploaded => "Upload your driver license",
            OnboardingStep::VehicleDocumentUploaded => "Upload a vehicle document",
            OnboardingStep::CompanyTracked => "Track a company",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepProgress {
    pub step: OnboardingStep,
    pub label: &'static str,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    pub steps: Vec<StepProgress>,
    pub completed_count: usize,
    pub total_steps: usize,
    pub percent: u8,
    pub complete: bool,
}

impl OnboardingProgress {
    pub fn from_flags(done: impl Fn(OnboardingStep) -> bool) -> Self {
        let steps: Vec<StepProgress> = OnboardingStep::ALL
            .into_iter()
            .map(|step| StepProgress {
                step,
                label: step.label(),
                completed: done(step),
            })
            .collect();
        let completed_count = steps.iter().filter(|s| s.completed).count();
        let total_steps = steps.len();
        let percent = u8::try_from(completed_count * 100 / total_steps).unwrap_or(100);

        Self {
            steps,
            completed_count,
            total_steps,
            percent,
            complete: completed_count == total_steps,
        }
    }
}

pub(crate) fn validate_email(raw: &str) -> AtomResult<String> {
    let email = raw.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(AtomError::validation("email is not valid"));
    }
    Ok(email)
}

/// Keeps a leading `+` and the digits. Blank clears the phone.
pub(crate) fn normalize_phone(raw: Option<String>) -> AtomResult<Option<String>> {
    let Some(raw) = raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if !(10..=15).contains(&digits.len()) {
        return Err(AtomError::validation("phone must have 10 to 15 digits"));
    }
    Ok(Some(if raw.starts_with('+') { format!("+{digits}") } else { digits }))
}

/// Accepts a state code or name and stores the code.
pub(crate) fn normalize_state(raw: Option<String>) -> AtomResult<Option<String>> {
    let Some(raw) = raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    STATES
        .canonical_label(&raw)
        .map(|code| Some(code.to_string()))
        .ok_or_else(|| AtomError::validation(format!("unknown state {}", raw)))
}

/// Falls back to the local part of the email, like the sign-up form does.
pub(crate) fn display_name_or_default(name: Option<String>, email: &str) -> AtomResult<String> {
    let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let name = name.unwrap_or_else(|| email.split('@').next().unwrap_or("Driver").to_string());
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(AtomError::validation(format!(
            "displayName must be at most {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(name)
}
