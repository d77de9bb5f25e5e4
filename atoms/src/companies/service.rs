use std::collections::BTreeMap;

use chrono::Utc;

use super::filter::{CompanyPage, CompanyQuery};
use super::model::{Company, CompanyListing, CreateCompanyPayload, SetCompanyStatusPayload};
use super::synonyms::ALL_TABLES;
use crate::error::{AtomError, AtomResult};
use crate::store::Repositories;
use crate::tasks::model::non_blank;

pub const MAX_COMPANY_NAME_LEN: usize = 120;

/// Selectable labels per filter dimension, keyed by query parameter name.
pub fn filter_options() -> BTreeMap<&'static str, Vec<&'static str>> {
    ALL_TABLES.iter().map(|t| (t.dimension, t.labels())).collect()
}

/// Searches the catalogue. `user_id` is `None` for anonymous callers, who
/// see no personal status and cannot filter on it.
pub async fn list_companies(
    repos: &Repositories,
    user_id: Option<&str>,
    query: &CompanyQuery,
) -> AtomResult<CompanyPage> {
    if query.needs_user() && user_id.is_none() {
        return Err(AtomError::Unauthorized);
    }

    let companies = repos.companies.list_companies().await?;
    let statuses = match user_id {
        Some(user_id) => repos.company_statuses.list_statuses(user_id).await?,
        None => Default::default(),
    };

    let listings = companies
        .into_iter()
        .map(|company| CompanyListing {
            user_status: statuses.get(&company.company_id).copied(),
            company,
        })
        .collect();

    let page = query.apply(listings);
    tracing::debug!(
        total = page.pagination.total_count,
        page = page.pagination.page,
        "company search"
    );
    Ok(page)
}

pub async fn get_company(repos: &Repositories, user_id: Option<&str>, company_id: &str) -> AtomResult<CompanyListing> {
    let company = repos
        .companies
        .get_company(company_id)
        .await?
        .ok_or_else(|| AtomError::not_found("Company"))?;
    let user_status = match user_id {
        Some(user_id) => repos.company_statuses.get_status(user_id, company_id).await?,
        None => None,
    };
    Ok(CompanyListing { company, user_status })
}

fn validate_website(website: Option<String>) -> AtomResult<Option<String>> {
    let Some(website) = non_blank(website) else {
        return Ok(None);
    };
    if website.starts_with("https://") || website.starts_with("http://") {
        Ok(Some(website))
    } else {
        Err(AtomError::validation("website must be an http(s) URL"))
    }
}

/// Adds a company to the shared catalogue.
pub async fn create_company(repos: &Repositories, user_id: &str, payload: CreateCompanyPayload) -> AtomResult<Company> {
    let name = non_blank(payload.name);
    let service_verticals = payload.service_vertical.map(|v| v.into_values()).unwrap_or_default();
    let contract_types = payload.contract_type.map(|v| v.into_values()).unwrap_or_default();

    let mut missing = Vec::new();
    if name.is_none() {
        missing.push("name");
    }
    if service_verticals.is_empty() {
        missing.push("serviceVertical");
    }
    if contract_types.is_empty() {
        missing.push("contractType");
    }
    let Some(name) = name.filter(|_| missing.is_empty()) else {
        return Err(AtomError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };
    if name.chars().count() > MAX_COMPANY_NAME_LEN {
        return Err(AtomError::validation(format!(
            "name must be at most {MAX_COMPANY_NAME_LEN} characters"
        )));
    }

    let now = Utc::now();
    let company = Company {
        company_id: uuid::Uuid::new_v4().to_string(),
        name,
        description: non_blank(payload.description),
        website: validate_website(payload.website)?,
        service_verticals,
        vehicle_types: payload.vehicle_types.map(|v| v.into_values()).unwrap_or_default(),
        contract_types,
        areas_served: payload.areas_served.map(|v| v.into_values()).unwrap_or_default(),
        states: payload.states.map(|v| v.into_values()).unwrap_or_default(),
        pay_range: non_blank(payload.pay_range),
        requirements: payload
            .requirements
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| non_blank(Some(r)))
            .collect(),
        created_by: user_id.to_string(),
        created_at: now,
        updated_at: now,
    };

    repos.companies.put_company(&company).await?;
    tracing::info!(company_id = %company.company_id, user_id, "company created");
    Ok(company)
}

pub async fn set_company_status(
    repos: &Repositories,
    user_id: &str,
    company_id: &str,
    payload: SetCompanyStatusPayload,
) -> AtomResult<CompanyListing> {
    let company = repos
        .companies
        .get_company(company_id)
        .await?
        .ok_or_else(|| AtomError::not_found("Company"))?;

    repos
        .company_statuses
        .put_status(user_id, company_id, payload.status)
        .await?;
    tracing::info!(company_id, user_id, status = %payload.status, "company status set");

    Ok(CompanyListing {
        company,
        user_status: Some(payload.status),
    })
}

pub async fn clear_company_status(repos: &Repositories, user_id: &str, company_id: &str) -> AtomResult<()> {
    repos.company_statuses.delete_status(user_id, company_id).await
}
