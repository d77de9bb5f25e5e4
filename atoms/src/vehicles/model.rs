use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AtomError, AtomResult, ParseEnumError};

pub const MIN_YEAR: i32 = 1980;
pub const VIN_LEN: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [VehicleStatus::Active, VehicleStatus::Maintenance, VehicleStatus::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "ACTIVE",
            VehicleStatus::Maintenance => "MAINTENANCE",
            VehicleStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "vehicle status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Specifications {
    pub fuel_type: Option<FuelType>,
    pub seats: Option<u8>,
    /// Cubic feet.
    pub cargo_volume: Option<f64>,
    pub mpg: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Insurance {
    pub provider: Option<String>,
    pub policy_number: Option<String>,
    pub coverage: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub monthly_premium: Option<f64>,
}

/// How the driver holds the vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub enum Financing {
    #[serde(rename_all = "camelCase")]
    Owned { purchase_price: Option<f64>, purchase_date: Option<NaiveDate> },
    #[serde(rename_all = "camelCase")]
    Financed {
        lender: Option<String>,
        monthly_payment: Option<f64>,
        remaining_balance: Option<f64>,
        payoff_date: Option<NaiveDate>,
    },
    #[serde(rename_all = "camelCase")]
    Leased {
        lessor: Option<String>,
        monthly_payment: Option<f64>,
        lease_end: Option<NaiveDate>,
        mileage_limit: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Rented {
        provider: Option<String>,
        weekly_rate: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_id: String,
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub status: VehicleStatus,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub specifications: Option<Specifications>,
    pub insurance: Option<Insurance>,
    pub financing: Option<Financing>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    pub status: Option<VehicleStatus>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub specifications: Option<Specifications>,
    pub insurance: Option<Insurance>,
    pub financing: Option<Financing>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehiclePayload {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: Option<String>,
    pub status: Option<VehicleStatus>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub specifications: Option<Specifications>,
    pub insurance: Option<Insurance>,
    pub financing: Option<Financing>,
}

pub(crate) fn required_text(field: &str, value: &str) -> AtomResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AtomError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub(crate) fn validate_year(year: i32, today: NaiveDate) -> AtomResult<i32> {
    let latest = today.year() + 1;
    if !(MIN_YEAR..=latest).contains(&year) {
        return Err(AtomError::validation(format!("year must be between {MIN_YEAR} and {latest}")));
    }
    Ok(year)
}

/// Uppercases and checks a VIN. Blank means no VIN.
pub(crate) fn validate_vin(vin: Option<String>) -> AtomResult<Option<String>> {
    let Some(vin) = vin.map(|v| v.trim().to_ascii_uppercase()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let valid = vin.len() == VIN_LEN
        && vin
            .chars()
            .all(|c| c.is_ascii_alphanumeric() && !matches!(c, 'I' | 'O' | 'Q'));
    if !valid {
        return Err(AtomError::validation(
            "vin must be 17 letters or digits and cannot contain I, O or Q",
        ));
    }
    Ok(Some(vin))
}

fn non_negative(field: &str, amount: Option<f64>) -> AtomResult<()> {
    match amount {
        Some(a) if !a.is_finite() || a < 0.0 => Err(AtomError::validation(format!("{field} cannot be negative"))),
        _ => Ok(()),
    }
}

impl Specifications {
    pub fn validate(&self) -> AtomResult<()> {
        non_negative("specifications.cargoVolume", self.cargo_volume)?;
        non_negative("specifications.mpg", self.mpg)
    }
}

impl Insurance {
    pub fn validate(&self) -> AtomResult<()> {
        non_negative("insurance.monthlyPremium", self.monthly_premium)
    }
}

impl Financing {
    pub fn validate(&self) -> AtomResult<()> {
        match self {
            Financing::Owned { purchase_price, .. } => non_negative("financing.purchasePrice", *purchase_price),
            Financing::Financed {
                monthly_payment,
                remaining_balance,
                ..
            } => {
                non_negative("financing.monthlyPayment", *monthly_payment)?;
                non_negative("financing.remainingBalance", *remaining_balance)
            }
            Financing::Leased { monthly_payment, .. } => non_negative("financing.monthlyPayment", *monthly_payment),
            Financing::Rented { weekly_rate, .. } => non_negative("financing.weeklyRate", *weekly_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[rstest]
    #[case(1979, false)]
    #[case(1980, true)]
    #[case(2027, true)]
    #[case(2028, false)]
    fn year_bounds(#[case] year: i32, #[case] ok: bool) {
        assert_eq!(validate_year(year, today()).is_ok(), ok);
    }

    #[rstest]
    #[case(Some("1hgcm82633a004352"), Ok(Some("1HGCM82633A004352")))]
    #[case(Some("  "), Ok(None))]
    #[case(None, Ok(None))]
    fn accepts_vins(#[case] raw: Option<&str>, #[case] expected: Result<Option<&str>, ()>) {
        let got = validate_vin(raw.map(str::to_string)).map_err(|_| ());
        assert_eq!(got, expected.map(|v| v.map(str::to_string)));
    }

    #[rstest]
    #[case("1HGCM82633A00435")]
    #[case("1HGCM82633A0043521")]
    #[case("1HGCM82633A00435O")]
    #[case("1HGCM8263-A004352")]
    fn rejects_bad_vins(#[case] raw: &str) {
        assert!(validate_vin(Some(raw.to_string())).is_err());
    }

    #[test]
    fn financing_is_tagged_by_kind() {
        let f: Financing =
            serde_json::from_str(r#"{"kind":"LEASED","lessor":"Hertz","monthlyPayment":410.5}"#).unwrap();
        assert_eq!(
            f,
            Financing::Leased {
                lessor: Some("Hertz".into()),
                monthly_payment: Some(410.5),
                lease_end: None,
                mileage_limit: None,
            }
        );
    }

    #[test]
    fn unknown_sub_document_fields_are_rejected() {
        assert!(serde_json::from_str::<Insurance>(r#"{"provider":"Acme","deductible":500}"#).is_err());
        assert!(serde_json::from_str::<Specifications>(r#"{"wheels":4}"#).is_err());
        assert!(serde_json::from_str::<Financing>(r#"{"kind":"OWNED","apr":3.9}"#).is_err());
    }

    #[test]
    fn negative_money_is_rejected() {
        let f = Financing::Rented {
            provider: None,
            weekly_rate: Some(-1.0),
        };
        assert!(f.validate().is_err());
        let i = Insurance {
            monthly_premium: Some(120.0),
            ..Default::default()
        };
        assert!(i.validate().is_ok());
    }
}
