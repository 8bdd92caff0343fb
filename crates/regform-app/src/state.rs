// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use crate::{
    Cascade, InitialState, PasswordCriteria, PhoneFeedback, PhoneWidget, ReferenceData,
    SelectField, SelectOption, confirmation_mismatch, phone_feedback,
};

/// Which form elements the host renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormElements {
    pub phone: bool,
    pub country: bool,
    pub province: bool,
    pub city: bool,
}

impl Default for FormElements {
    fn default() -> Self {
        Self {
            phone: true,
            country: true,
            province: true,
            city: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormOptions {
    pub elements: FormElements,
    /// Delay after which the initial region is re-applied for widgets that never
    /// signal readiness. `None` disables the fallback.
    pub ready_fallback: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    SelectCountry(String),
    SelectProvince(String),
    SelectCity(String),
    PhoneInput(String),
    PhoneBlur,
    PhoneRegionChanged,
    /// Region chosen in the phone field's own picker.
    PickPhoneRegion(String),
    PhoneWidgetReady,
    ReadyFallbackElapsed,
    PasswordInput(String),
    ConfirmInput(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    CountriesReplaced(Vec<SelectOption>),
    ProvincesReplaced(Vec<SelectOption>),
    CitiesReplaced(Vec<SelectOption>),
    CountrySelected(String),
    CitySelected(String),
    PhoneRegionApplied(String),
    PasswordChecked(PasswordCriteria),
    MismatchChanged(bool),
    PhoneHelpUpdated(PhoneFeedback),
    ReadyFallbackScheduled(Duration),
}

/// Controller for one registration form instance.
#[derive(Debug)]
pub struct FormState<W> {
    data: ReferenceData,
    widget: Option<W>,
    cascade: Cascade,
    has_phone: bool,
    pending_region: Option<String>,
    phone_text: String,
    phone_help: PhoneFeedback,
    password: String,
    confirm: String,
    criteria: PasswordCriteria,
    mismatch_visible: bool,
}

impl<W: PhoneWidget> FormState<W> {
    /// Renders the initial option lists. `widget` is ignored when the form has no
    /// phone element.
    pub fn start(
        data: ReferenceData,
        initial: &InitialState,
        widget: Option<W>,
        options: FormOptions,
    ) -> (Self, Vec<FormEvent>) {
        let elements = options.elements;
        let widget = if elements.phone { widget } else { None };
        let pending_region = widget.as_ref().and_then(|_| {
            data.code_for_name(&initial.country)
                .map(str::to_ascii_lowercase)
        });

        let mut state = Self {
            data,
            widget,
            cascade: Cascade::with_fields(elements.country, elements.province, elements.city),
            has_phone: elements.phone,
            pending_region,
            phone_text: String::new(),
            phone_help: PhoneFeedback::default(),
            password: String::new(),
            confirm: String::new(),
            criteria: PasswordCriteria::default(),
            mismatch_visible: false,
        };

        let mut events = state.cascade.initial_load(&state.data, initial);
        if state.pending_region.is_some()
            && let Some(widget) = state.widget.as_ref()
            && !widget.has_ready_signal()
        {
            match options.ready_fallback {
                Some(delay) => events.push(FormEvent::ReadyFallbackScheduled(delay)),
                None => log::warn!(
                    "phone widget has no ready signal and no fallback delay is configured"
                ),
            }
        }
        log::info!(
            "form started with {} countries and {} region entries",
            state.data.countries.len(),
            state.data.regions.len()
        );
        (state, events)
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Vec<FormEvent> {
        match command {
            FormCommand::SelectCountry(name) => self.select_country(&name),
            FormCommand::SelectProvince(name) => {
                self.cascade.change_province(&self.data, &name)
            }
            FormCommand::SelectCity(name) => self.cascade.change_city(&name),
            FormCommand::PhoneInput(text) => self.phone_input(text),
            FormCommand::PhoneBlur => self.phone_blur(),
            FormCommand::PhoneRegionChanged => self.sync_country_from_widget(),
            FormCommand::PickPhoneRegion(code) => self.pick_phone_region(&code),
            FormCommand::PhoneWidgetReady | FormCommand::ReadyFallbackElapsed => {
                self.reapply_initial_region()
            }
            FormCommand::PasswordInput(text) => {
                self.password = text;
                self.criteria = PasswordCriteria::evaluate(&self.password);
                vec![
                    FormEvent::PasswordChecked(self.criteria),
                    self.check_match(),
                ]
            }
            FormCommand::ConfirmInput(text) => {
                self.confirm = text;
                vec![self.check_match()]
            }
        }
    }

    fn select_country(&mut self, name: &str) -> Vec<FormEvent> {
        if self.cascade.country.is_none() {
            return Vec::new();
        }
        let mut events = self.cascade.change_country(&self.data, name);
        if events.is_empty() {
            return events;
        }
        self.pending_region = None;
        if let Some(code) = self.data.code_for_name(name)
            && let Some(widget) = self.widget.as_mut()
        {
            let region = code.to_ascii_lowercase();
            widget.set_country(&region);
            events.push(FormEvent::PhoneRegionApplied(region));
        }
        events
    }

    fn phone_input(&mut self, text: String) -> Vec<FormEvent> {
        if !self.has_phone {
            return Vec::new();
        }
        let region_changed = self
            .widget
            .as_mut()
            .is_some_and(|widget| widget.set_number(&text));
        self.phone_text = text;
        if region_changed {
            self.sync_country_from_widget()
        } else {
            Vec::new()
        }
    }

    fn pick_phone_region(&mut self, code: &str) -> Vec<FormEvent> {
        let Some(widget) = self.widget.as_mut() else {
            return Vec::new();
        };
        widget.set_country(&code.to_ascii_lowercase());
        self.pending_region = None;
        self.sync_country_from_widget()
    }

    fn sync_country_from_widget(&mut self) -> Vec<FormEvent> {
        let Some(region) = self
            .widget
            .as_ref()
            .and_then(|widget| widget.selected_country())
        else {
            return Vec::new();
        };
        let Some(name) = self
            .data
            .name_for_code(&region.iso2.to_ascii_uppercase())
            .map(str::to_owned)
        else {
            log::debug!("phone region {:?} has no country entry", region.iso2);
            return Vec::new();
        };
        let events = self.cascade.change_country(&self.data, &name);
        if !events.is_empty() {
            self.pending_region = None;
        }
        events
    }

    fn phone_blur(&mut self) -> Vec<FormEvent> {
        if !self.has_phone {
            return Vec::new();
        }
        let valid = self
            .widget
            .as_ref()
            .is_some_and(|widget| widget.is_valid_number());
        self.phone_help = phone_feedback(&self.phone_text, valid);
        vec![FormEvent::PhoneHelpUpdated(self.phone_help)]
    }

    fn reapply_initial_region(&mut self) -> Vec<FormEvent> {
        let Some(widget) = self.widget.as_mut() else {
            return Vec::new();
        };
        let Some(region) = self.pending_region.take() else {
            return Vec::new();
        };
        widget.set_country(&region);
        vec![FormEvent::PhoneRegionApplied(region)]
    }

    fn check_match(&mut self) -> FormEvent {
        self.mismatch_visible = confirmation_mismatch(&self.password, &self.confirm);
        FormEvent::MismatchChanged(self.mismatch_visible)
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.data
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    pub fn country(&self) -> Option<&SelectField> {
        self.cascade.country.as_ref()
    }

    pub fn province(&self) -> Option<&SelectField> {
        self.cascade.province.as_ref()
    }

    pub fn city(&self) -> Option<&SelectField> {
        self.cascade.city.as_ref()
    }

    pub fn has_phone(&self) -> bool {
        self.has_phone
    }

    pub fn phone_text(&self) -> &str {
        &self.phone_text
    }

    pub fn phone_help(&self) -> PhoneFeedback {
        self.phone_help
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn confirm(&self) -> &str {
        &self.confirm
    }

    pub fn criteria(&self) -> PasswordCriteria {
        self.criteria
    }

    pub fn mismatch_visible(&self) -> bool {
        self.mismatch_visible
    }
}
