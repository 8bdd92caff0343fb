// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_COUNTRY: &str = "Ecuador";

/// One row of the country table. Table order is dropdown order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub name: String,
    pub code: String,
}

impl CountryEntry {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Province name to city names, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionEntry {
    #[serde(default)]
    pub provinces: IndexMap<String, Vec<String>>,
}

/// Country code to its provinces, in document order.
pub type RegionTree = IndexMap<String, RegionEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceData {
    pub countries: Vec<CountryEntry>,
    pub regions: RegionTree,
}

impl ReferenceData {
    pub fn new(countries: Vec<CountryEntry>, regions: RegionTree) -> Self {
        Self { countries, regions }
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.regions.is_empty()
    }

    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|country| country.name == name)
            .map(|country| country.code.as_str())
    }

    /// Codes are matched case-insensitively; phone widgets report them lower-cased.
    pub fn name_for_code(&self, code: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|country| country.code.eq_ignore_ascii_case(code))
            .map(|country| country.name.as_str())
    }

    pub fn provinces_of(&self, country_name: &str) -> Vec<&str> {
        self.region_of(country_name)
            .map(|region| region.provinces.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn cities_of(&self, country_name: &str, province: &str) -> &[String] {
        self.region_of(country_name)
            .and_then(|region| region.provinces.get(province))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn region_of(&self, country_name: &str) -> Option<&RegionEntry> {
        let code = self.code_for_name(country_name)?;
        self.regions.get(code)
    }
}

/// Declarative defaults the host rendered into the form. Read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialState {
    pub country: String,
    pub province: String,
    pub city: String,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            country: DEFAULT_INITIAL_COUNTRY.to_owned(),
            province: String::new(),
            city: String::new(),
        }
    }
}

impl InitialState {
    pub fn from_defaults(country: Option<&str>, province: Option<&str>, city: Option<&str>) -> Self {
        let country = country.map(str::trim).unwrap_or_default();
        Self {
            country: if country.is_empty() {
                DEFAULT_INITIAL_COUNTRY.to_owned()
            } else {
                country.to_owned()
            },
            province: province.map(str::trim).unwrap_or_default().to_owned(),
            city: city.map(str::trim).unwrap_or_default().to_owned(),
        }
    }

    pub fn has_province(&self) -> bool {
        !self.province.is_empty()
    }

    pub fn has_city(&self) -> bool {
        !self.city.is_empty()
    }
}
