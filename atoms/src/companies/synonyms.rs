//! Filter label to stored value synonym tables.
//!
//! Each table is the single source of truth for one filter dimension: a named
//! label matches any of its synonyms, and the `Other` label matches every
//! stored value that no named group claims. A raw value ingested without a
//! group here silently lands in `Other` until it is added to a group.

/// Catch-all label present in every dimension.
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynonymGroup {
    pub label: &'static str,
    pub values: &'static [&'static str],
}

impl SynonymGroup {
    pub fn contains(&self, value: &str) -> bool {
        let value = value.trim();
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynonymTable {
    pub dimension: &'static str,
    pub groups: &'static [SynonymGroup],
}

impl SynonymTable {
    pub fn group(&self, label: &str) -> Option<&SynonymGroup> {
        let label = label.trim();
        self.groups.iter().find(|g| g.label.eq_ignore_ascii_case(label))
    }

    /// Label of the group claiming `value`, if any.
    pub fn canonical_label(&self, value: &str) -> Option<&'static str> {
        self.groups.iter().find(|g| g.contains(value)).map(|g| g.label)
    }

    pub fn is_mapped(&self, value: &str) -> bool {
        self.canonical_label(value).is_some()
    }

    /// Labels offered to the UI, `Other` last.
    pub fn labels(&self) -> Vec<&'static str> {
        self.groups
            .iter()
            .map(|g| g.label)
            .chain(std::iter::once(OTHER_LABEL))
            .collect()
    }

    /// Whether one stored value satisfies one selected label.
    ///
    /// A selection that is neither a group label nor `Other` is compared
    /// literally, so ad hoc values still filter.
    pub fn selection_matches(&self, selection: &str, value: &str) -> bool {
        let selection = selection.trim();
        if selection.eq_ignore_ascii_case(OTHER_LABEL) {
            return !value.trim().is_empty() && !self.is_mapped(value);
        }
        match self.group(selection) {
            Some(group) => group.contains(value),
            None => selection.eq_ignore_ascii_case(value.trim()),
        }
    }

    /// OR over the selections, OR over the stored values.
    pub fn matches_any(&self, selections: &[String], values: &[String]) -> bool {
        selections
            .iter()
            .any(|selection| values.iter().any(|value| self.selection_matches(selection, value)))
    }
}

const fn group(label: &'static str, values: &'static [&'static str]) -> SynonymGroup {
    SynonymGroup { label, values }
}

pub static VEHICLE_TYPES: SynonymTable = SynonymTable {
    dimension: "vehicleType",
    groups: &[
        group("Car", &["Car", "Sedan", "Prius", "EV", "Hybrid", "Compact", "Coupe", "Hatchback"]),
        group("SUV", &["SUV", "Crossover", "Minivan"]),
        group("Truck", &["Truck", "Pickup", "Pickup Truck", "Box Truck", "Semi", "Semi Truck", "Tractor Trailer"]),
        group("Van", &["Van", "Cargo Van", "Sprinter", "Sprinter Van"]),
        group("Bike", &["Bike", "Bicycle", "E-Bike", "Ebike", "Scooter", "Moped"]),
        group("Motorcycle", &["Motorcycle", "Motorbike"]),
        group("On Foot", &["On Foot", "Walking", "Walker"]),
    ],
};

pub static CONTRACT_TYPES: SynonymTable = SynonymTable {
    dimension: "contractType",
    groups: &[
        group(
            "Independent Contractor",
            &["Independent Contractor", "Contractor", "1099", "Freelance", "Gig"],
        ),
        group("Employee", &["Employee", "W-2", "W2", "Full-Time", "Part-Time", "Full Time", "Part Time"]),
        group("Lease-to-Own", &["Lease-to-Own", "Lease to Own", "Owner Operator", "Owner-Operator"]),
    ],
};

pub static SERVICE_VERTICALS: SynonymTable = SynonymTable {
    dimension: "serviceVertical",
    groups: &[
        group("Food Delivery", &["Food Delivery", "Restaurant Delivery", "Meal Delivery", "Food"]),
        group("Grocery", &["Grocery", "Grocery Delivery", "Groceries", "Shopping"]),
        group("Rideshare", &["Rideshare", "Ride Share", "Ride-Hailing", "Ridehailing", "Passenger Transport"]),
        group(
            "Package Delivery",
            &["Package Delivery", "Parcel", "Parcel Delivery", "Courier", "Last Mile", "Last-Mile"],
        ),
        group("Medical", &["Medical", "Medical Courier", "Pharmacy", "Lab Specimens"]),
        group("Freight", &["Freight", "Trucking", "Logistics", "LTL"]),
        group("Alcohol", &["Alcohol", "Alcohol Delivery", "Liquor"]),
    ],
};

pub static AREAS_SERVED: SynonymTable = SynonymTable {
    dimension: "areaServed",
    groups: &[
        group("Nationwide", &["Nationwide", "National", "All States", "USA"]),
        group("Urban", &["Urban", "Metro", "City", "Metropolitan"]),
        group("Suburban", &["Suburban", "Suburbs"]),
        group("Rural", &["Rural", "Countryside"]),
        group("Regional", &["Regional", "Multi-State", "Multi State"]),
    ],
};

/// US states: the two-letter code is the label, the full name a synonym.
pub static STATES: SynonymTable = SynonymTable {
    dimension: "state",
    groups: &[
        group("AL", &["AL", "Alabama"]),
        group("AK", &["AK", "Alaska"]),
        group("AZ", &["AZ", "Arizona"]),
        group("AR", &["AR", "Arkansas"]),
        group("CA", &["CA", "California"]),
        group("CO", &["CO", "Colorado"]),
        group("CT", &["CT", "Connecticut"]),
        group("DE", &["DE", "Delaware"]),
        group("DC", &["DC", "District of Columbia", "Washington DC"]),
        group("FL", &["FL", "Florida"]),
        group("GA", &["GA", "Georgia"]),
        group("HI", &["HI", "Hawaii"]),
        group("ID", &["ID", "Idaho"]),
        group("IL", &["IL", "Illinois"]),
        group("IN", &["IN", "Indiana"]),
        group("IA", &["IA", "Iowa"]),
        group("KS", &["KS", "Kansas"]),
        group("KY", &["KY", "Kentucky"]),
        group("LA", &["LA", "Louisiana"]),
        group("ME", &["ME", "Maine"]),
        group("MD", &["MD", "Maryland"]),
        group("MA", &["MA", "Massachusetts"]),
        group("MI", &["MI", "Michigan"]),
        group("MN", &["MN", "Minnesota"]),
        group("MS", &["MS", "Mississippi"]),
        group("MO", &["MO", "Missouri"]),
        group("MT", &["MT", "Montana"]),
        group("NE", &["NE", "Nebraska"]),
        group("NV", &["NV", "Nevada"]),
        group("NH", &["NH", "New Hampshire"]),
        group("NJ", &["NJ", "New Jersey"]),
        group("NM", &["NM", "New Mexico"]),
        group("NY", &["NY", "New York"]),
        group("NC", &["NC", "North Carolina"]),
        group("ND", &["ND", "North Dakota"]),
        group("OH", &["OH", "Ohio"]),
        group("OK", &["OK", "Oklahoma"]),
        group("OR", &["OR", "Oregon"]),
        group("PA", &["PA", "Pennsylvania"]),
        group("RI", &["RI", "Rhode Island"]),
        group("SC", &["SC", "South Carolina"]),
        group("SD", &["SD", "South Dakota"]),
        group("TN", &["TN", "Tennessee"]),
        group("TX", &["TX", "Texas"]),
        group("UT", &["UT", "Utah"]),
        group("VT", &["VT", "Vermont"]),
        group("VA", &["VA", "Virginia"]),
        group("WA", &["WA", "Washington"]),
        group("WV", &["WV", "West Virginia"]),
        group("WI", &["WI", "Wisconsin"]),
        group("WY", &["WY", "Wyoming"]),
    ],
};

pub static ALL_TABLES: [&SynonymTable; 5] = [&VEHICLE_TYPES, &CONTRACT_TYPES, &SERVICE_VERTICALS, &AREAS_SERVED, &STATES];
