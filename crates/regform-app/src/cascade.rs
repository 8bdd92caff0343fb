// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    CITY_PLACEHOLDER, FormEvent, InitialState, PROVINCE_PLACEHOLDER, ReferenceData, SelectField,
    SelectOption, render_options,
};

pub fn country_options(data: &ReferenceData, selected: Option<&str>) -> Vec<SelectOption> {
    render_options(
        None,
        data.countries.iter().map(|country| country.name.as_str()),
        selected,
    )
}

pub fn province_options(
    data: &ReferenceData,
    country: &str,
    selected: Option<&str>,
) -> Vec<SelectOption> {
    render_options(
        Some(PROVINCE_PLACEHOLDER),
        data.provinces_of(country),
        selected,
    )
}

pub fn city_options(
    data: &ReferenceData,
    country: &str,
    province: &str,
    selected: Option<&str>,
) -> Vec<SelectOption> {
    render_options(
        Some(CITY_PLACEHOLDER),
        data.cities_of(country, province).iter().map(String::as_str),
        selected,
    )
}

/// Country, province and city selects. A field the host does not render is `None`
/// and every transition skips it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cascade {
    pub country: Option<SelectField>,
    pub province: Option<SelectField>,
    pub city: Option<SelectField>,
}

impl Cascade {
    pub fn with_fields(country: bool, province: bool, city: bool) -> Self {
        Self {
            country: country.then(SelectField::default),
            province: province.then(SelectField::default),
            city: city.then(SelectField::default),
        }
    }

    pub fn country_value(&self) -> &str {
        self.country.as_ref().map_or("", SelectField::value)
    }

    pub fn province_value(&self) -> &str {
        self.province.as_ref().map_or("", SelectField::value)
    }

    pub fn city_value(&self) -> &str {
        self.city.as_ref().map_or("", SelectField::value)
    }

    /// First render: countries, then provinces for the initial country, then
    /// cities when an initial province was supplied, restoring each default.
    pub fn initial_load(&mut self, data: &ReferenceData, initial: &InitialState) -> Vec<FormEvent> {
        let mut events = Vec::new();
        if let Some(field) = self.country.as_mut() {
            field.replace(country_options(data, Some(initial.country.as_str())));
            events.push(FormEvent::CountriesReplaced(field.options().to_vec()));
        }

        let province = initial.has_province().then_some(initial.province.as_str());
        events.extend(self.fill_provinces(data, &initial.country, province));

        if initial.has_province() {
            let city = initial.has_city().then_some(initial.city.as_str());
            events.extend(self.fill_cities(data, &initial.country, &initial.province, city));
        } else {
            events.extend(self.reset_cities());
        }
        events
    }

    /// Regenerates provinces for `country` and resets the city list. When the
    /// country select exists, `country` must be one of its options.
    pub fn change_country(&mut self, data: &ReferenceData, country: &str) -> Vec<FormEvent> {
        let mut events = Vec::new();
        if let Some(field) = self.country.as_mut() {
            if !field.select(country) {
                log::debug!("ignoring unknown country {country:?}");
                return events;
            }
            events.push(FormEvent::CountrySelected(country.to_owned()));
        }
        events.extend(self.fill_provinces(data, country, None));
        events.extend(self.reset_cities());
        events
    }

    pub fn change_province(&mut self, data: &ReferenceData, province: &str) -> Vec<FormEvent> {
        if let Some(field) = self.province.as_mut()
            && !field.select(province)
        {
            log::debug!("ignoring unknown province {province:?}");
            return Vec::new();
        }
        let country = self.country_value().to_owned();
        self.fill_cities(data, &country, province, None)
            .into_iter()
            .collect()
    }

    pub fn change_city(&mut self, city: &str) -> Vec<FormEvent> {
        let Some(field) = self.city.as_mut() else {
            return Vec::new();
        };
        if field.select(city) {
            vec![FormEvent::CitySelected(city.to_owned())]
        } else {
            Vec::new()
        }
    }

    fn fill_provinces(
        &mut self,
        data: &ReferenceData,
        country: &str,
        selected: Option<&str>,
    ) -> Option<FormEvent> {
        let field = self.province.as_mut()?;
        field.replace(province_options(data, country, selected));
        log::debug!(
            "provinces for {country:?}: {} options",
            field.options().len()
        );
        Some(FormEvent::ProvincesReplaced(field.options().to_vec()))
    }

    fn fill_cities(
        &mut self,
        data: &ReferenceData,
        country: &str,
        province: &str,
        selected: Option<&str>,
    ) -> Option<FormEvent> {
        let field = self.city.as_mut()?;
        field.replace(city_options(data, country, province, selected));
        Some(FormEvent::CitiesReplaced(field.options().to_vec()))
    }

    fn reset_cities(&mut self) -> Option<FormEvent> {
        let field = self.city.as_mut()?;
        field.replace(vec![SelectOption::placeholder(CITY_PLACEHOLDER)]);
        Some(FormEvent::CitiesReplaced(field.options().to_vec()))
    }
}
