// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ReferenceData;

pub const DEFAULT_PHONE_REGION: &str = "EC";
pub const PREFERRED_REGIONS: [&str; 5] = ["ec", "us", "mx", "co", "es"];
pub const DEFAULT_UTILS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/intl-tel-input@23.8.0/build/js/utils.min.js";

pub const PHONE_HINT: &str = "Formato internacional detectado automáticamente.";
pub const PHONE_VALID: &str = "Número válido ✓";
pub const PHONE_INVALID: &str = "Formato de teléfono inválido";

/// Construction options handed to a phone widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneWidgetConfig {
    pub initial_country: String,
    pub preferred_countries: Vec<String>,
    pub separate_dial_code: bool,
    pub utils_script: String,
}

impl Default for PhoneWidgetConfig {
    fn default() -> Self {
        Self {
            initial_country: DEFAULT_PHONE_REGION.to_ascii_lowercase(),
            preferred_countries: PREFERRED_REGIONS
                .iter()
                .map(|region| (*region).to_owned())
                .collect(),
            separate_dial_code: false,
            utils_script: DEFAULT_UTILS_SCRIPT.to_owned(),
        }
    }
}

impl PhoneWidgetConfig {
    /// Initial region is the initial country's code, or the default region when
    /// the name is not in the country table.
    pub fn for_initial_country(data: &ReferenceData, initial_country: &str) -> Self {
        let code = data
            .code_for_name(initial_country)
            .unwrap_or(DEFAULT_PHONE_REGION);
        Self {
            initial_country: code.to_ascii_lowercase(),
            ..Self::default()
        }
    }
}

/// What a widget reports for its active region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionData {
    pub iso2: String,
    pub dial_code: String,
    pub name: String,
}

/// The phone-number input collaborator.
pub trait PhoneWidget {
    fn set_country(&mut self, iso2: &str);
    fn selected_country(&self) -> Option<RegionData>;
    /// Replaces the typed number. Returns true when the detected region changed,
    /// which stands for the widget's `countrychange` notification.
    fn set_number(&mut self, number: &str) -> bool;
    fn is_valid_number(&self) -> bool;
    /// Widgets without a ready signal rely on the configured fallback delay.
    fn has_ready_signal(&self) -> bool {
        true
    }
    /// Regions offered by the widget's own region picker, in display order.
    fn region_codes(&self) -> Vec<String> {
        Vec::new()
    }
    /// Whether the dial code is shown beside the number rather than typed into it.
    fn separate_dial_code(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTone {
    Neutral,
    Success,
    Error,
}

impl HelpTone {
    pub const fn css_color(self) -> &'static str {
        match self {
            Self::Neutral => "#9CA3AF",
            Self::Success => "rgb(34,197,94)",
            Self::Error => "rgb(220,38,38)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneFeedback {
    pub tone: HelpTone,
    pub message: &'static str,
}

impl Default for PhoneFeedback {
    fn default() -> Self {
        Self {
            tone: HelpTone::Neutral,
            message: PHONE_HINT,
        }
    }
}

pub fn phone_feedback(input: &str, valid: bool) -> PhoneFeedback {
    match (input.is_empty(), valid) {
        (true, _) => PhoneFeedback::default(),
        (false, true) => PhoneFeedback {
            tone: HelpTone::Success,
            message: PHONE_VALID,
        },
        (false, false) => PhoneFeedback {
            tone: HelpTone::Error,
            message: PHONE_INVALID,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        HelpTone, PHONE_HINT, PHONE_INVALID, PHONE_VALID, PhoneWidgetConfig, phone_feedback,
    };
    use crate::{CountryEntry, ReferenceData, RegionTree};

    #[test]
    fn feedback_covers_the_three_states() {
        let empty = phone_feedback("", true);
        assert_eq!(empty.tone, HelpTone::Neutral);
        assert_eq!(empty.message, PHONE_HINT);

        let valid = phone_feedback("+593 99 999 9999", true);
        assert_eq!(valid.tone, HelpTone::Success);
        assert_eq!(valid.message, PHONE_VALID);

        let invalid = phone_feedback("123", false);
        assert_eq!(invalid.tone, HelpTone::Error);
        assert_eq!(invalid.message, PHONE_INVALID);
        assert_eq!(invalid.tone.css_color(), "rgb(220,38,38)");
    }

    #[test]
    fn whitespace_input_is_not_empty() {
        assert_eq!(phone_feedback(" ", false).message, PHONE_INVALID);
    }

    #[test]
    fn config_uses_initial_country_code_or_default() {
        let data = ReferenceData::new(
            vec![CountryEntry::new("Mexico", "MX")],
            RegionTree::new(),
        );

        let known = PhoneWidgetConfig::for_initial_country(&data, "Mexico");
        assert_eq!(known.initial_country, "mx");
        assert_eq!(known.preferred_countries, vec!["ec", "us", "mx", "co", "es"]);
        assert!(!known.separate_dial_code);

        let unknown = PhoneWidgetConfig::for_initial_country(&data, "Atlantis");
        assert_eq!(unknown.initial_country, "ec");
    }
}
