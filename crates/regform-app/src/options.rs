// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const PROVINCE_PLACEHOLDER: &str = "Seleccione una provincia";
pub const CITY_PLACEHOLDER: &str = "Seleccione una ciudad";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
    pub placeholder: bool,
}

impl SelectOption {
    pub fn item(value: &str, selected: bool) -> Self {
        Self {
            value: value.to_owned(),
            label: value.to_owned(),
            selected,
            placeholder: false,
        }
    }

    pub fn placeholder(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_owned(),
            selected: false,
            placeholder: true,
        }
    }
}

/// Builds a full option list: optional placeholder first, then one option per
/// item with the first item equal to `selected` marked.
pub fn render_options<'a, I>(
    placeholder: Option<&str>,
    items: I,
    selected: Option<&str>,
) -> Vec<SelectOption>
where
    I: IntoIterator<Item = &'a str>,
{
    let selected = selected.filter(|value| !value.is_empty());
    let mut marked = false;
    let mut options = Vec::new();
    if let Some(label) = placeholder {
        options.push(SelectOption::placeholder(label));
    }
    for item in items {
        let is_selected = !marked && selected == Some(item);
        marked |= is_selected;
        options.push(SelectOption::item(item, is_selected));
    }
    options
}

/// Option list of a select element. With no option marked, the first option is
/// the effective value, as a browser select behaves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectField {
    options: Vec<SelectOption>,
}

impl SelectField {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn replace(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.options.is_empty() {
            return None;
        }
        Some(
            self.options
                .iter()
                .position(|option| option.selected)
                .unwrap_or(0),
        )
    }

    pub fn value(&self) -> &str {
        self.selected_index()
            .map(|index| self.options[index].value.as_str())
            .unwrap_or("")
    }

    /// Marks the option whose value equals `value`. Returns false and leaves the
    /// field untouched when no option carries that value.
    pub fn select(&mut self, value: &str) -> bool {
        let Some(index) = self.options.iter().position(|option| option.value == value) else {
            return false;
        };
        for (position, option) in self.options.iter_mut().enumerate() {
            option.selected = position == index;
        }
        true
    }

    pub fn values(&self) -> Vec<&str> {
        self.options
            .iter()
            .map(|option| option.value.as_str())
            .collect()
    }

    pub fn is_placeholder_only(&self) -> bool {
        self.options.len() == 1 && self.options[0].placeholder
    }
}
