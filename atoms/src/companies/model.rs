use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// A gig company / opportunity drivers can work for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub service_verticals: Vec<String>,
    #[serde(default)]
    pub vehicle_types: Vec<String>,
    #[serde(default)]
    pub contract_types: Vec<String>,
    #[serde(default)]
    pub areas_served: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    pub pay_range: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A driver's personal pipeline status on a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserCompanyStatus {
    Interested,
    Applied,
    Onboarding,
    Active,
    Inactive,
    NotInterested,
}

impl UserCompanyStatus {
    pub const ALL: [UserCompanyStatus; 6] = [
        UserCompanyStatus::Interested,
        UserCompanyStatus::Applied,
        UserCompanyStatus::Onboarding,
        UserCompanyStatus::Active,
        UserCompanyStatus::Inactive,
        UserCompanyStatus::NotInterested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserCompanyStatus::Interested => "INTERESTED",
            UserCompanyStatus::Applied => "APPLIED",
            UserCompanyStatus::Onboarding => "ONBOARDING",
            UserCompanyStatus::Active => "ACTIVE",
            UserCompanyStatus::Inactive => "INACTIVE",
            UserCompanyStatus::NotInterested => "NOT_INTERESTED",
        }
    }
}

impl fmt::Display for UserCompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserCompanyStatus {
    type Err = ParseEnumError;

    /// Accepts `NOT_INTERESTED`, `not-interested` and `Not Interested` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        UserCompanyStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                kind: "company status",
                value: s.to_string(),
            })
    }
}

/// A company joined with the caller's status on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListing {
    #[serde(flatten)]
    pub company: Company,
    pub user_status: Option<UserCompanyStatus>,
}

/// A single string or a list, so forms can post either shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Trimmed, non-blank values.
    pub fn into_values(self) -> Vec<String> {
        let values = match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        };
        values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    pub name: Option<String>,
    #[serde(alias = "serviceVerticals")]
    pub service_vertical: Option<OneOrMany>,
    #[serde(alias = "contractTypes")]
    pub contract_type: Option<OneOrMany>,
    #[serde(alias = "vehicleType")]
    pub vehicle_types: Option<OneOrMany>,
    #[serde(alias = "areaServed")]
    pub areas_served: Option<OneOrMany>,
    #[serde(alias = "state")]
    pub states: Option<OneOrMany>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub pay_range: Option<String>,
    pub requirements: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCompanyStatusPayload {
    pub status: UserCompanyStatus,
}
