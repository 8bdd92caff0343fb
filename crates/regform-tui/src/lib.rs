// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use regform_app::{
    Criterion, FormCommand, FormEvent, FormState, HelpTone, Indicator, PhoneWidget, SelectField,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const MISMATCH_TEXT: &str = "Las contraseñas no coinciden";
const MASK: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Phone,
    Country,
    Province,
    City,
    Password,
    Confirm,
}

impl Field {
    const ALL: [Self; 6] = [
        Self::Phone,
        Self::Country,
        Self::Province,
        Self::City,
        Self::Password,
        Self::Confirm,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Phone => "Teléfono",
            Self::Country => "País",
            Self::Province => "Provincia / Estado",
            Self::City => "Ciudad",
            Self::Password => "Contraseña",
            Self::Confirm => "Confirmar contraseña",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ReadyFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    focus: Field,
    status_line: Option<String>,
}

pub fn run_form<W: PhoneWidget>(state: &mut FormState<W>, startup: Vec<FormEvent>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (internal_tx, internal_rx) = mpsc::channel();
    let mut view_data = ViewData {
        focus: focusable_fields(state).first().copied().unwrap_or(Field::Password),
        status_line: None,
    };
    apply_events(&mut view_data, &internal_tx, startup);
    if state.widget().is_some_and(|widget| widget.has_ready_signal()) {
        let events = state.dispatch(FormCommand::PhoneWidgetReady);
        apply_events(&mut view_data, &internal_tx, events);
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event
            && let Event::Key(key) = event::read().context("read event")?
            && handle_key_event(state, &mut view_data, &internal_tx, key)
        {
            break;
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<W: PhoneWidget>(
    state: &mut FormState<W>,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ReadyFallback => {
                let events = state.dispatch(FormCommand::ReadyFallbackElapsed);
                apply_events(view_data, tx, events);
            }
        }
    }
}

fn schedule_ready_fallback(internal_tx: &Sender<InternalEvent>, delay: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        if sender.send(InternalEvent::ReadyFallback).is_err() {
            log::debug!("form closed before the ready fallback fired");
        }
    });
}

fn apply_events(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: Vec<FormEvent>,
) {
    for event in events {
        match event {
            FormEvent::ReadyFallbackScheduled(delay) => {
                log::debug!("phone widget ready fallback in {delay:?}");
                schedule_ready_fallback(internal_tx, delay);
            }
            FormEvent::PhoneRegionApplied(region) => {
                view_data.status_line = Some(format!("región telefónica: {region}"));
            }
            FormEvent::CountrySelected(country) => {
                view_data.status_line = Some(format!("país: {country}"));
            }
            _ => {}
        }
    }
}

fn focusable_fields<W: PhoneWidget>(state: &FormState<W>) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| match field {
            Field::Phone => state.has_phone(),
            Field::Country => state.country().is_some(),
            Field::Province => state.province().is_some(),
            Field::City => state.city().is_some(),
            Field::Password | Field::Confirm => true,
        })
        .collect()
}

fn move_focus<W: PhoneWidget>(
    state: &mut FormState<W>,
    view_data: &mut ViewData,
    delta: isize,
) -> Vec<FormEvent> {
    let fields = focusable_fields(state);
    let current = fields
        .iter()
        .position(|field| *field == view_data.focus)
        .unwrap_or(0) as isize;
    let len = fields.len() as isize;
    let next = fields[(current + delta).rem_euclid(len) as usize];
    let leaving = view_data.focus;
    view_data.focus = next;
    if leaving == Field::Phone && next != Field::Phone {
        state.dispatch(FormCommand::PhoneBlur)
    } else {
        Vec::new()
    }
}

/// Value of the option `delta` steps away from the current one, wrapping.
fn cycled_value(field: &SelectField, delta: isize) -> Option<String> {
    let options = field.options();
    if options.is_empty() {
        return None;
    }
    let current = field.selected_index().unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(options.len() as isize) as usize;
    Some(options[next].value.clone())
}

/// Moves the phone field's region picker `delta` steps, wrapping.
fn cycle_phone_region<W: PhoneWidget>(state: &mut FormState<W>, delta: isize) -> Vec<FormEvent> {
    let Some(widget) = state.widget() else {
        return Vec::new();
    };
    let codes = widget.region_codes();
    if codes.is_empty() {
        return Vec::new();
    }
    let current = widget
        .selected_country()
        .and_then(|data| {
            codes
                .iter()
                .position(|code| code.eq_ignore_ascii_case(&data.iso2))
        })
        .map_or(if delta > 0 { -1 } else { 0 }, |index| index as isize);
    let next = (current + delta).rem_euclid(codes.len() as isize) as usize;
    let code = codes[next].clone();
    state.dispatch(FormCommand::PickPhoneRegion(code))
}

fn cycle_select<W: PhoneWidget>(
    state: &mut FormState<W>,
    focus: Field,
    delta: isize,
) -> Vec<FormEvent> {
    let (field, command): (Option<&SelectField>, fn(String) -> FormCommand) = match focus {
        Field::Country => (state.country(), FormCommand::SelectCountry),
        Field::Province => (state.province(), FormCommand::SelectProvince),
        Field::City => (state.city(), FormCommand::SelectCity),
        Field::Phone => return cycle_phone_region(state, delta),
        _ => return Vec::new(),
    };
    let value = field.and_then(|field| cycled_value(field, delta));
    match value {
        Some(value) => state.dispatch(command(value)),
        None => Vec::new(),
    }
}

fn edit_text<W: PhoneWidget>(
    state: &mut FormState<W>,
    focus: Field,
    key: KeyCode,
) -> Vec<FormEvent> {
    let (current, command): (&str, fn(String) -> FormCommand) = match focus {
        Field::Phone => (state.phone_text(), FormCommand::PhoneInput),
        Field::Password => (state.password(), FormCommand::PasswordInput),
        Field::Confirm => (state.confirm(), FormCommand::ConfirmInput),
        _ => return Vec::new(),
    };
    let mut text = current.to_owned();
    match key {
        KeyCode::Char(ch) => text.push(ch),
        KeyCode::Backspace => {
            if text.pop().is_none() {
                return Vec::new();
            }
        }
        _ => return Vec::new(),
    }
    state.dispatch(command(text))
}

/// Returns true when the user asked to quit.
fn handle_key_event<W: PhoneWidget>(
    state: &mut FormState<W>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let events = match key.code {
        KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => move_focus(state, view_data, 1),
        KeyCode::BackTab | KeyCode::Up => move_focus(state, view_data, -1),
        KeyCode::Left => cycle_select(state, view_data.focus, -1),
        KeyCode::Right => cycle_select(state, view_data.focus, 1),
        code @ (KeyCode::Char(_) | KeyCode::Backspace) => edit_text(state, view_data.focus, code),
        _ => Vec::new(),
    };
    apply_events(view_data, internal_tx, events);
    false
}

fn indicator_color(indicator: Indicator) -> Color {
    match indicator {
        Indicator::Met => Color::Green,
        Indicator::Unmet => Color::Rgb(156, 163, 175),
    }
}

fn tone_color(tone: HelpTone) -> Color {
    match tone {
        HelpTone::Neutral => Color::Rgb(156, 163, 175),
        HelpTone::Success => Color::Rgb(34, 197, 94),
        HelpTone::Error => Color::Rgb(220, 38, 38),
    }
}

fn select_text(field: &SelectField) -> String {
    let Some(index) = field.selected_index() else {
        return "‹ sin datos ›".to_owned();
    };
    format!(
        "‹ {} › ({}/{})",
        field.options()[index].label,
        index + 1,
        field.options().len()
    )
}

fn field_text<W: PhoneWidget>(state: &FormState<W>, field: Field) -> String {
    match field {
        Field::Phone => {
            let region = state
                .widget()
                .and_then(|widget| {
                    let data = widget.selected_country()?;
                    Some(if widget.separate_dial_code() {
                        format!("[{} +{}] ", data.iso2, data.dial_code)
                    } else {
                        format!("[{}] ", data.iso2)
                    })
                })
                .unwrap_or_default();
            format!("{region}{}", state.phone_text())
        }
        Field::Country => state.country().map(select_text).unwrap_or_default(),
        Field::Province => state.province().map(select_text).unwrap_or_default(),
        Field::City => state.city().map(select_text).unwrap_or_default(),
        Field::Password => MASK.to_string().repeat(state.password().chars().count()),
        Field::Confirm => MASK.to_string().repeat(state.confirm().chars().count()),
    }
}

fn form_lines<W: PhoneWidget>(state: &FormState<W>, view_data: &ViewData) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for field in focusable_fields(state) {
        let focused = field == view_data.focus;
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<22}", field.label()), style),
            Span::raw(field_text(state, field)),
        ]));
        if field == Field::Phone {
            let help = state.phone_help();
            lines.push(Line::from(Span::styled(
                format!("  {:<22}{}", "", help.message),
                Style::default().fg(tone_color(help.tone)),
            )));
        }
        if field == Field::Password {
            let criteria = state.criteria();
            let spans = Criterion::ALL
                .iter()
                .map(|criterion| {
                    Span::styled(
                        format!("{}  ", criterion.label()),
                        Style::default().fg(indicator_color(criteria.indicator(*criterion))),
                    )
                })
                .collect::<Vec<_>>();
            let mut indicator_line = vec![Span::raw(format!("  {:<22}", ""))];
            indicator_line.extend(spans);
            lines.push(Line::from(indicator_line));
        }
        if field == Field::Confirm && state.mismatch_visible() {
            lines.push(Line::from(Span::styled(
                format!("  {:<22}{MISMATCH_TEXT}", ""),
                Style::default().fg(Color::Rgb(220, 38, 38)),
            )));
        }
    }
    lines
}

fn status_text(view_data: &ViewData) -> String {
    let hint = "tab/shift-tab: campo  ←/→: opción o región  esc: salir";
    match &view_data.status_line {
        Some(status) => format!("{status}  |  {hint}"),
        None => hint.to_owned(),
    }
}

fn render<W: PhoneWidget>(
    frame: &mut ratatui::Frame<'_>,
    state: &FormState<W>,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    let form = Paragraph::new(form_lines(state, view_data))
        .block(Block::default().title("registro").borders(Borders::ALL));
    frame.render_widget(form, layout[0]);

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[1]);
}
