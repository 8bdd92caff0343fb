// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

const MET_COLOR: &str = "green";
const UNMET_COLOR: &str = "#9CA3AF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Length,
    Upper,
    Lower,
    Digit,
    Symbol,
}

impl Criterion {
    pub const ALL: [Self; 5] = [
        Self::Length,
        Self::Upper,
        Self::Lower,
        Self::Digit,
        Self::Symbol,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Length => "Mínimo 8 caracteres",
            Self::Upper => "Una letra mayúscula",
            Self::Lower => "Una letra minúscula",
            Self::Digit => "Un número",
            Self::Symbol => "Un símbolo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Met,
    Unmet,
}

impl Indicator {
    pub const fn from_met(met: bool) -> Self {
        if met { Self::Met } else { Self::Unmet }
    }

    pub const fn css_color(self) -> &'static str {
        match self {
            Self::Met => MET_COLOR,
            Self::Unmet => UNMET_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordCriteria {
    pub length: bool,
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl PasswordCriteria {
    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            upper: password.chars().any(|ch| ch.is_ascii_uppercase()),
            lower: password.chars().any(|ch| ch.is_ascii_lowercase()),
            digit: password.chars().any(|ch| ch.is_ascii_digit()),
            symbol: password.chars().any(|ch| PASSWORD_SYMBOLS.contains(ch)),
        }
    }

    pub const fn is_met(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Length => self.length,
            Criterion::Upper => self.upper,
            Criterion::Lower => self.lower,
            Criterion::Digit => self.digit,
            Criterion::Symbol => self.symbol,
        }
    }

    pub fn indicator(&self, criterion: Criterion) -> Indicator {
        Indicator::from_met(self.is_met(criterion))
    }

    pub fn all_met(&self) -> bool {
        Criterion::ALL
            .iter()
            .all(|criterion| self.is_met(*criterion))
    }
}

/// The mismatch hint shows only once something was typed into the confirmation.
pub fn confirmation_mismatch(password: &str, confirm: &str) -> bool {
    !confirm.is_empty() && password != confirm
}
