// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use regform_app::{CountryEntry, PhoneWidget, ReferenceData, RegionData, RegionTree};
use std::fs;
use std::path::{Path, PathBuf};

pub const COUNTRIES_JSON: &str = r#"[
  {"name": "Ecuador", "code": "EC"},
  {"name": "Estados Unidos", "code": "US"},
  {"name": "México", "code": "MX"},
  {"name": "Colombia", "code": "CO"},
  {"name": "España", "code": "ES"},
  {"name": "Perú", "code": "PE"}
]"#;

// Perú deliberately has no region entry.
pub const REGIONS_JSON: &str = r#"{
  "EC": {"provinces": {
    "Pichincha": ["Quito", "Cayambe", "Rumiñahui"],
    "Guayas": ["Guayaquil", "Durán", "Samborondón"],
    "Azuay": ["Cuenca", "Gualaceo"],
    "Galápagos": []
  }},
  "US": {"provinces": {
    "California": ["Los Angeles", "San Francisco", "San Diego"],
    "Texas": ["Austin", "Houston"]
  }},
  "MX": {"provinces": {
    "Jalisco": ["Guadalajara", "Zapopan"],
    "Ciudad de México": ["Coyoacán", "Tlalpan"]
  }},
  "CO": {"provinces": {
    "Antioquia": ["Medellín", "Envigado"],
    "Cundinamarca": ["Bogotá", "Soacha"]
  }},
  "ES": {}
}"#;

pub fn countries() -> Vec<CountryEntry> {
    serde_json::from_str(COUNTRIES_JSON).expect("fixture country table is valid JSON")
}

pub fn regions() -> RegionTree {
    serde_json::from_str(REGIONS_JSON).expect("fixture region tree is valid JSON")
}

pub fn reference_data() -> ReferenceData {
    ReferenceData::new(countries(), regions())
}

pub struct ReferenceFiles {
    pub dir: tempfile::TempDir,
    pub countries: PathBuf,
    pub regions: PathBuf,
}

/// Writes the fixture tables into a fresh temp dir.
pub fn write_reference_files() -> Result<ReferenceFiles> {
    let dir = tempfile::tempdir().context("create fixture dir")?;
    let countries = write_file(dir.path(), "countries.json", COUNTRIES_JSON)?;
    let regions = write_file(dir.path(), "provinces.json", REGIONS_JSON)?;
    Ok(ReferenceFiles {
        dir,
        countries,
        regions,
    })
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("write fixture {}", path.display()))?;
    Ok(path)
}

/// Phone widget fake with scripted detection and validity.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPhoneWidget {
    pub region: String,
    pub number: String,
    pub ready_signal: bool,
    /// `(number prefix, region)` pairs consulted on every `set_number`.
    pub detections: Vec<(String, String)>,
    pub valid_numbers: Vec<String>,
    pub set_country_calls: Vec<String>,
    /// Regions offered by the picker.
    pub picker: Vec<String>,
    pub separate_dial_code: bool,
}

impl ScriptedPhoneWidget {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_owned(),
            ready_signal: true,
            ..Self::default()
        }
    }

    pub fn without_ready_signal(mut self) -> Self {
        self.ready_signal = false;
        self
    }

    pub fn detect(mut self, prefix: &str, region: &str) -> Self {
        self.detections.push((prefix.to_owned(), region.to_owned()));
        self
    }

    pub fn accept(mut self, number: &str) -> Self {
        self.valid_numbers.push(number.to_owned());
        self
    }

    pub fn with_picker(mut self, regions: &[&str]) -> Self {
        self.picker = regions.iter().map(|region| (*region).to_owned()).collect();
        self
    }

    pub fn with_separate_dial_code(mut self) -> Self {
        self.separate_dial_code = true;
        self
    }
}

impl PhoneWidget for ScriptedPhoneWidget {
    fn set_country(&mut self, iso2: &str) {
        self.region = iso2.to_owned();
        self.set_country_calls.push(iso2.to_owned());
    }

    fn selected_country(&self) -> Option<RegionData> {
        if self.region.is_empty() {
            return None;
        }
        Some(RegionData {
            iso2: self.region.clone(),
            dial_code: match self.region.as_str() {
                "ec" => "593".to_owned(),
                "us" => "1".to_owned(),
                "mx" => "52".to_owned(),
                _ => String::new(),
            },
            name: String::new(),
        })
    }

    fn set_number(&mut self, number: &str) -> bool {
        self.number = number.to_owned();
        let detected = self
            .detections
            .iter()
            .find(|(prefix, _)| number.starts_with(prefix.as_str()))
            .map(|(_, region)| region.clone());
        match detected {
            Some(region) if region != self.region => {
                self.region = region;
                true
            }
            _ => false,
        }
    }

    fn is_valid_number(&self) -> bool {
        self.valid_numbers.contains(&self.number)
    }

    fn has_ready_signal(&self) -> bool {
        self.ready_signal
    }

    fn region_codes(&self) -> Vec<String> {
        self.picker.clone()
    }

    fn separate_dial_code(&self) -> bool {
        self.separate_dial_code
    }
}
