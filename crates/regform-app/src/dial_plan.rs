// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::ops::RangeInclusive;

use crate::{DEFAULT_PHONE_REGION, PhoneWidget, PhoneWidgetConfig, RegionData};

#[derive(Debug, Clone, PartialEq, Eq)]
struct DialPlanEntry {
    iso2: &'static str,
    name: &'static str,
    dial_code: &'static str,
    national_digits: RangeInclusive<usize>,
}

const fn entry(
    iso2: &'static str,
    name: &'static str,
    dial_code: &'static str,
    national_digits: RangeInclusive<usize>,
) -> DialPlanEntry {
    DialPlanEntry {
        iso2,
        name,
        dial_code,
        national_digits,
    }
}

// Regions sharing a calling code are listed with the primary one first.
static DIAL_PLAN: [DialPlanEntry; 14] = [
    entry("ec", "Ecuador", "593", 8..=9),
    entry("us", "United States", "1", 10..=10),
    entry("ca", "Canada", "1", 10..=10),
    entry("mx", "Mexico", "52", 10..=10),
    entry("co", "Colombia", "57", 10..=10),
    entry("es", "Spain", "34", 9..=9),
    entry("pe", "Peru", "51", 8..=9),
    entry("ar", "Argentina", "54", 10..=11),
    entry("cl", "Chile", "56", 9..=9),
    entry("ve", "Venezuela", "58", 10..=10),
    entry("br", "Brazil", "55", 10..=11),
    entry("bo", "Bolivia", "591", 8..=8),
    entry("gb", "United Kingdom", "44", 10..=10),
    entry("fr", "France", "33", 9..=9),
];

fn lookup(iso2: &str) -> Option<usize> {
    DIAL_PLAN
        .iter()
        .position(|entry| entry.iso2.eq_ignore_ascii_case(iso2))
}

/// A phone widget backed by a small built-in dial plan. Detects the region from a
/// leading `+<calling code>` and validates the national number length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialPlanWidget {
    region: usize,
    number: String,
    preferred: Vec<String>,
    separate_dial_code: bool,
}

impl DialPlanWidget {
    pub fn new(config: &PhoneWidgetConfig) -> Self {
        let region = lookup(&config.initial_country)
            .or_else(|| lookup(DEFAULT_PHONE_REGION))
            .unwrap_or(0);
        Self {
            region,
            number: String::new(),
            preferred: config.preferred_countries.clone(),
            separate_dial_code: config.separate_dial_code,
        }
    }

    fn detect_region(&self, digits: &str) -> Option<usize> {
        let longest = DIAL_PLAN
            .iter()
            .filter(|entry| digits.starts_with(entry.dial_code))
            .map(|entry| entry.dial_code.len())
            .max()?;
        let current = &DIAL_PLAN[self.region];
        if current.dial_code.len() == longest && digits.starts_with(current.dial_code) {
            return Some(self.region);
        }
        DIAL_PLAN.iter().position(|entry| {
            entry.dial_code.len() == longest && digits.starts_with(entry.dial_code)
        })
    }
}

/// Strips the separators people type. `None` when anything else remains.
fn normalized_digits(number: &str) -> Option<(bool, String)> {
    let trimmed = number.trim();
    let (international, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let mut digits = String::with_capacity(rest.len());
    for ch in rest.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            ' ' | '-' | '(' | ')' | '.' => {}
            _ => return None,
        }
    }
    Some((international, digits))
}

impl PhoneWidget for DialPlanWidget {
    fn set_country(&mut self, iso2: &str) {
        if let Some(index) = lookup(iso2) {
            self.region = index;
        }
    }

    fn selected_country(&self) -> Option<RegionData> {
        let entry = &DIAL_PLAN[self.region];
        Some(RegionData {
            iso2: entry.iso2.to_owned(),
            dial_code: entry.dial_code.to_owned(),
            name: entry.name.to_owned(),
        })
    }

    fn set_number(&mut self, number: &str) -> bool {
        self.number = number.to_owned();
        let Some((true, digits)) = normalized_digits(number) else {
            return false;
        };
        match self.detect_region(&digits) {
            Some(index) if index != self.region => {
                self.region = index;
                true
            }
            _ => false,
        }
    }

    /// Preferred regions first, then the rest of the plan in table order.
    fn region_codes(&self) -> Vec<String> {
        let mut codes = self
            .preferred
            .iter()
            .filter_map(|code| lookup(code).map(|index| DIAL_PLAN[index].iso2))
            .collect::<Vec<_>>();
        for entry in &DIAL_PLAN {
            if !codes.contains(&entry.iso2) {
                codes.push(entry.iso2);
            }
        }
        codes.into_iter().map(str::to_owned).collect()
    }

    fn separate_dial_code(&self) -> bool {
        self.separate_dial_code
    }

    fn is_valid_number(&self) -> bool {
        let Some((international, digits)) = normalized_digits(&self.number) else {
            return false;
        };
        let entry = &DIAL_PLAN[self.region];
        let national = if international {
            match digits.strip_prefix(entry.dial_code) {
                Some(national) => national,
                None => return false,
            }
        } else {
            digits.strip_prefix('0').unwrap_or(digits.as_str())
        };
        !national.is_empty() && entry.national_digits.contains(&national.len())
    }
}
