//! Company search, filtering, sorting and pagination.

use std::cmp::Ordering;

use serde::Serialize;

use super::model::{CompanyListing, UserCompanyStatus};
use super::synonyms::{SynonymTable, AREAS_SERVED, CONTRACT_TYPES, SERVICE_VERTICALS, STATES, VEHICLE_TYPES};
use crate::error::{AtomError, AtomResult};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// One value of the `userStatus` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatusFilter {
    Is(UserCompanyStatus),
    /// The caller has not tracked the company at all.
    Untracked,
}

/// Parsed `GET /api/companies` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub vehicle_types: Vec<String>,
    pub contract_types: Vec<String>,
    pub service_verticals: Vec<String>,
    pub areas_served: Vec<String>,
    pub states: Vec<String>,
    pub user_statuses: Vec<UserStatusFilter>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for CompanyQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            vehicle_types: Vec::new(),
            contract_types: Vec::new(),
            service_verticals: Vec::new(),
            areas_served: Vec::new(),
            states: Vec::new(),
            user_statuses: Vec::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_count: usize,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyPage {
    pub companies: Vec<CompanyListing>,
    pub pagination: Pagination,
}

/// Splits a comma separated multi-select value.
fn multi(raw: Option<&str>) -> Vec<String> {
    raw.map(|r| {
        r.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn positive(name: &str, raw: Option<&str>, default: u32) -> AtomResult<u32> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(AtomError::validation(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
        Ok(value) => Ok(value),
    }
}

impl CompanyQuery {
    /// Builds a query from raw query-string lookups.
    pub fn from_params<'a, F>(get: F) -> AtomResult<Self>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let sort_by = match get("sortBy").map(str::trim) {
            None | Some("") | Some("name") => SortField::Name,
            Some("createdAt") => SortField::CreatedAt,
            Some("updatedAt") => SortField::UpdatedAt,
            Some(other) => return Err(AtomError::validation(format!("cannot sort by '{other}'"))),
        };
        let sort_order = match get("sortOrder").map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(other) => return Err(AtomError::validation(format!("invalid sortOrder '{other}'"))),
        };

        let mut user_statuses = Vec::new();
        for raw in multi(get("userStatus")) {
            let filter = if raw.eq_ignore_ascii_case("none") {
                UserStatusFilter::Untracked
            } else {
                UserStatusFilter::Is(raw.parse()?)
            };
            user_statuses.push(filter);
        }

        Ok(Self {
            page: positive("page", get("page"), 1)?,
            limit: positive("limit", get("limit"), DEFAULT_PAGE_SIZE)?.min(MAX_PAGE_SIZE),
            search: get("search").map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            vehicle_types: multi(get("vehicleType")),
            contract_types: multi(get("contractType")),
            service_verticals: multi(get("serviceVertical")),
            areas_served: multi(get("areaServed")),
            states: multi(get("state")),
            user_statuses,
            sort_by,
            sort_order,
        })
    }

    /// The `userStatus` filter only means something for a signed-in caller.
    pub fn needs_user(&self) -> bool {
        !self.user_statuses.is_empty()
    }

    /// AND across dimensions; an empty dimension does not filter.
    pub fn matches(&self, listing: &CompanyListing) -> bool {
        let company = &listing.company;
        let dimension = |table: &SynonymTable, selections: &[String], values: &[String]| {
            selections.is_empty() || table.matches_any(selections, values)
        };

        self.matches_search(listing)
            && dimension(&VEHICLE_TYPES, &self.vehicle_types, &company.vehicle_types)
            && dimension(&CONTRACT_TYPES, &self.contract_types, &company.contract_types)
            && dimension(&SERVICE_VERTICALS, &self.service_verticals, &company.service_verticals)
            && dimension(&AREAS_SERVED, &self.areas_served, &company.areas_served)
            && dimension(&STATES, &self.states, &company.states)
            && self.matches_user_status(listing.user_status)
    }

    fn matches_search(&self, listing: &CompanyListing) -> bool {
        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();
        let company = &listing.company;
        let hit = |text: &str| text.to_lowercase().contains(&needle);

        hit(&company.name)
            || company.description.as_deref().is_some_and(hit)
            || company.service_verticals.iter().any(|v| hit(v))
            || company.areas_served.iter().any(|v| hit(v))
    }

    fn matches_user_status(&self, status: Option<UserCompanyStatus>) -> bool {
        if self.user_statuses.is_empty() {
            return true;
        }
        self.user_statuses.iter().any(|filter| match (filter, status) {
            (UserStatusFilter::Untracked, None) => true,
            (UserStatusFilter::Is(wanted), Some(actual)) => *wanted == actual,
            _ => false,
        })
    }

    fn compare(&self, a: &CompanyListing, b: &CompanyListing) -> Ordering {
        let (a, b) = (&a.company, &b.company);
        let primary = match self.sort_by {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        let primary = match self.sort_order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.company_id.cmp(&b.company_id))
    }

    /// Filters, sorts and cuts out the requested page.
    ///
    /// Ordering always ends on the company id, so walking pages 1..totalPages
    /// visits every match exactly once.
    pub fn apply(&self, listings: Vec<CompanyListing>) -> CompanyPage {
        let mut matching: Vec<CompanyListing> = listings.into_iter().filter(|l| self.matches(l)).collect();
        matching.sort_by(|a, b| self.compare(a, b));

        let total_count = matching.len();
        let limit = self.limit.max(1);
        let total_pages = u32::try_from(total_count.div_ceil(limit as usize)).unwrap_or(u32::MAX);
        let offset = (self.page.saturating_sub(1) as usize).saturating_mul(limit as usize);

        let companies = matching.into_iter().skip(offset).take(limit as usize).collect();

        CompanyPage {
            companies,
            pagination: Pagination {
                page: self.page,
                limit,
                total_count,
                total_pages,
                has_next_page: self.page < total_pages,
                has_prev_page: self.page > 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::model::Company;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use std::collections::{HashMap, HashSet};

    fn listing(id: &str, name: &str) -> CompanyListing {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        CompanyListing {
            company: Company {
                company_id: id.to_string(),
                name: name.to_string(),
                description: None,
                website: None,
                service_verticals: vec![],
                vehicle_types: vec![],
                contract_types: vec![],
                areas_served: vec![],
                states: vec![],
                pay_range: None,
                requirements: vec![],
                created_by: "seed".to_string(),
                created_at: at,
                updated_at: at,
            },
            user_status: None,
        }
    }

    fn query(params: &[(&'static str, &'static str)]) -> AtomResult<CompanyQuery> {
        let map: HashMap<&str, &str> = params.iter().copied().collect();
        CompanyQuery::from_params(|key| map.get(key).copied())
    }

    fn ids(page: &CompanyPage) -> Vec<&str> {
        page.companies.iter().map(|l| l.company.company_id.as_str()).collect()
    }

    #[test]
    fn defaults() {
        let q = query(&[]).unwrap();
        assert_eq!(q, CompanyQuery::default());
    }

    #[rstest]
    #[case("page", "0")]
    #[case("page", "-2")]
    #[case("limit", "ten")]
    #[case("sortBy", "rating")]
    #[case("sortOrder", "sideways")]
    #[case("userStatus", "maybe")]
    fn rejects_malformed_params(#[case] key: &'static str, #[case] value: &'static str) {
        assert!(matches!(query(&[(key, value)]), Err(AtomError::Validation(_))));
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(query(&[("limit", "5000")]).unwrap().limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn multi_select_splits_on_commas() {
        let q = query(&[("vehicleType", "Car, Truck,,all")]).unwrap();
        assert_eq!(q.vehicle_types, vec!["Car", "Truck"]);
    }

    #[test]
    fn car_filter_uses_synonyms() {
        let mut sedan = listing("1", "Sedan Co");
        sedan.company.vehicle_types = vec!["Sedan".into()];
        let mut hybrid = listing("2", "Hybrid Co");
        hybrid.company.vehicle_types = vec!["Truck".into(), "Hybrid".into()];
        let mut truck = listing("3", "Truck Co");
        truck.company.vehicle_types = vec!["Truck".into()];

        let page = query(&[("vehicleType", "Car")]).unwrap().apply(vec![sedan, hybrid, truck]);
        assert_eq!(ids(&page), vec!["2", "1"]);
    }

    #[test]
    fn drone_delivery_only_under_other() {
        let mut drone = listing("d", "SkyDrop");
        drone.company.service_verticals = vec!["Drone Delivery".into()];
        let mut food = listing("f", "Dashy");
        food.company.service_verticals = vec!["Restaurant Delivery".into()];

        let other = query(&[("serviceVertical", "Other")]).unwrap().apply(vec![drone.clone(), food.clone()]);
        assert_eq!(ids(&other), vec!["d"]);

        for label in SERVICE_VERTICALS.groups.iter().map(|g| g.label) {
            let q = CompanyQuery {
                service_verticals: vec![label.to_string()],
                ..CompanyQuery::default()
            };
            assert!(!q.matches(&drone), "{label}");
        }
    }

    #[test]
    fn dimensions_are_anded() {
        let mut both = listing("1", "Both");
        both.company.vehicle_types = vec!["EV".into()];
        both.company.states = vec!["California".into()];
        let mut car_only = listing("2", "Car only");
        car_only.company.vehicle_types = vec!["Car".into()];
        car_only.company.states = vec!["TX".into()];

        let page = query(&[("vehicleType", "Car"), ("state", "CA")]).unwrap().apply(vec![both, car_only]);
        assert_eq!(ids(&page), vec!["1"]);
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let mut a = listing("a", "RoadRunner Logistics");
        a.company.description = Some("Same-day parcels".into());
        let b = listing("b", "Meals Now");

        let page = query(&[("search", "PARCEL")]).unwrap().apply(vec![a.clone(), b.clone()]);
        assert_eq!(ids(&page), vec!["a"]);
        let page = query(&[("search", "meals")]).unwrap().apply(vec![a, b]);
        assert_eq!(ids(&page), vec!["b"]);
    }

    #[test]
    fn user_status_filter_including_untracked() {
        let mut applied = listing("1", "A");
        applied.user_status = Some(UserCompanyStatus::Applied);
        let mut active = listing("2", "B");
        active.user_status = Some(UserCompanyStatus::Active);
        let untracked = listing("3", "C");

        let page = query(&[("userStatus", "applied,none")])
            .unwrap()
            .apply(vec![applied, active, untracked]);
        assert_eq!(ids(&page), vec!["1", "3"]);
    }

    #[test]
    fn sorts_by_name_descending_with_id_tiebreak() {
        let page = query(&[("sortOrder", "desc")])
            .unwrap()
            .apply(vec![listing("2", "beta"), listing("1", "Alpha"), listing("3", "Beta")]);
        assert_eq!(ids(&page), vec!["3", "2", "1"]);
    }

    #[test]
    fn pages_concatenate_to_total_without_duplicates() {
        let listings: Vec<CompanyListing> = (0..23)
            .map(|i| listing(&format!("c{i:02}"), if i % 3 == 0 { "Same" } else { "Other Name" }))
            .collect();

        let first = CompanyQuery { limit: 5, ..CompanyQuery::default() }.apply(listings.clone());
        assert_eq!(first.pagination.total_count, 23);
        assert_eq!(first.pagination.total_pages, 5);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_prev_page);

        let mut seen = Vec::new();
        for page in 1..=first.pagination.total_pages {
            let result = CompanyQuery { page, limit: 5, ..CompanyQuery::default() }.apply(listings.clone());
            seen.extend(result.companies.into_iter().map(|l| l.company.company_id));
        }
        assert_eq!(seen.len(), 23);
        assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 23);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = CompanyQuery { page: 4, limit: 10, ..CompanyQuery::default() }.apply(vec![listing("1", "A")]);
        assert!(page.companies.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);
    }
}
