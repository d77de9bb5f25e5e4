use chrono::Utc;

use super::model::{
    display_name_or_default, normalize_phone, normalize_state, validate_email, CreateProfilePayload, DriverProfile,
    OnboardingProgress, OnboardingStep, UpdateProfilePayload,
};
use crate::documents::model::{DocumentCategory, DocumentStatus};
use crate::error::{AtomError, AtomResult};
use crate::store::Repositories;

/// Creates the profile once, right after Cognito sign-up.
pub async fn create_profile(
    repos: &Repositories,
    user_id: &str,
    payload: CreateProfilePayload,
) -> AtomResult<DriverProfile> {
    if repos.profiles.get_profile(user_id).await?.is_some() {
        return Err(AtomError::Conflict("profile already exists".to_string()));
    }

    let email = validate_email(&payload.email)?;
    let now = Utc::now();
    let profile = DriverProfile {
        user_id: user_id.to_string(),
        display_name: display_name_or_default(payload.display_name, &email)?,
        email,
        phone: normalize_phone(payload.phone)?,
        home_state: normalize_state(payload.home_state)?,
        created_at: now,
        updated_at: now,
        last_login_at: Some(now),
    };

    repos.profiles.put_profile(&profile).await?;
    tracing::info!(user_id, "👤 driver profile created");
    Ok(profile)
}

/// Loads the caller's profile and records the login.
pub async fn get_profile(repos: &Repositories, user_id: &str) -> AtomResult<DriverProfile> {
    let mut profile = repos
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AtomError::not_found("User"))?;

    let now = Utc::now();
    // A failed login stamp must not fail the read
    if let Err(e) = repos.profiles.touch_last_login(user_id, now).await {
        tracing::warn!(user_id, "could not record login: {}", e);
    } else {
        profile.last_login_at = Some(now);
    }
    Ok(profile)
}

pub async fn update_profile(
    repos: &Repositories,
    user_id: &str,
    payload: UpdateProfilePayload,
) -> AtomResult<DriverProfile> {
    let mut profile = repos
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AtomError::not_found("User"))?;

    if let Some(name) = payload.display_name {
        profile.display_name = display_name_or_default(Some(name), &profile.email)?;
    }
    if let Some(phone) = payload.phone {
        profile.phone = normalize_phone(Some(phone))?;
    }
    if let Some(state) = payload.home_state {
        profile.home_state = normalize_state(Some(state))?;
    }
    profile.updated_at = Utc::now();

    repos.profiles.put_profile(&profile).await?;
    Ok(profile)
}

/// Derives onboarding progress from what the driver has stored so far.
pub async fn onboarding_progress(repos: &Repositories, user_id: &str) -> AtomResult<OnboardingProgress> {
    let profile = repos.profiles.get_profile(user_id).await?;
    let vehicles = repos.vehicles.list_vehicles(user_id).await?;
    let documents = repos.documents.list_documents(user_id).await?;
    let statuses = repos.company_statuses.list_statuses(user_id).await?;

    let uploaded = |category: DocumentCategory| {
        documents
            .iter()
            .any(|d| d.category == category && d.status == DocumentStatus::Uploaded)
    };

    Ok(OnboardingProgress::from_flags(|step| match step {
        OnboardingStep::ProfileCreated => profile.is_some(),
        OnboardingStep::PhoneAdded => profile.as_ref().is_some_and(|p| p.phone.is_some()),
        OnboardingStep::VehicleAdded => !vehicles.is_empty(),
        OnboardingStep::LicenseUploaded => uploaded(DocumentCategory::License),
        OnboardingStep::VehicleDocumentUploaded => uploaded(DocumentCategory::VehicleDocument),
        OnboardingStep::CompanyTracked => !statuses.is_empty(),
    }))
}
