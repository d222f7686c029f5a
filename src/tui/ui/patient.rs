//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{ranges, Biomarkers, Demographics, PatientInput, Sex, SmokingStatus};
use crate::tui::styles::MedicalTheme;

/// Which input a form field feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Age,
    Sex,
    Bmi,
    Smoking,
    Il6r,
    Hspb1,
    Tnfr1,
    Crp,
    Ldl,
    Hdl,
}

/// Input widget behaviour.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Free text parsed as a number within `[min, max]`
    Number { min: f64, max: f64 },
    /// Cycles through a fixed list of options, in the domain enum's order
    Choice { options: Vec<&'static str> },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub key: FieldKey,
    pub label: &'static str,
    pub hint: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    /// Text buffer for number fields
    pub value: String,
    /// Selected option for choice fields
    pub choice: Option<usize>,
    /// Result of the last blur check; `None` until the field is left once
    pub valid: Option<bool>,
}


impl FormField {
    fn number(
        key: FieldKey,
        label: &'static str,
        hint: &'static str,
        required: bool,
        (min, max): (f64, f64),
    ) -> Self {
        Self {
            key,
            label,
            hint,
            required,
            kind: FieldKind::Number { min, max },
            value: String::new(),
            choice: None,
            valid: None,
        }
    }

    fn choice(
        key: FieldKey,
        label: &'static str,
        hint: &'static str,
        required: bool,
        options: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            key,
            label,
            hint,
            required,
            kind: FieldKind::Choice {
                options: options.into_iter().collect(),
            },
            value: String::new(),
            choice: None,
            valid: None,
        }
    }

    fn is_empty(&self) -> bool {
        match self.kind {
            FieldKind::Number { .. } => self.value.trim().is_empty(),
            FieldKind::Choice { .. } => self.choice.is_none(),
        }
    }

    /// Parse a number field. Empty text is absent, never zero.
    pub fn parse_number(&self) -> Result<Option<f64>, String> {
        let FieldKind::Number { min, max } = self.kind else {
            return Ok(None);
        };

        let text = self.value.trim();
        if text.is_empty() {
            if self.required {
                return Err(format!("{}: Required", self.label));
            }
            return Ok(None);
        }

        let value: f64 = text
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| format!("{}: Invalid number", self.label))?;

        if value < min || value > max {
            return Err(format!(
                "{}: Value must be between {} and {}",
                self.label, min, max
            ));
        }

        Ok(Some(value))
    }

    /// Check a single field the way a blur event would.
    pub fn check(&self) -> Result<(), String> {
        match self.kind {
            FieldKind::Number { .. } => self.parse_number().map(|_| ()),
            FieldKind::Choice { .. } => {
                if self.required && self.choice.is_none() {
                    Err(format!("{}: Required", self.label))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn display_value(&self) -> Option<String> {
        match self.kind {
            FieldKind::Number { .. } => (!self.value.is_empty()).then(|| self.value.clone()),
            FieldKind::Choice { ref options } => self
                .choice
                .and_then(|i| options.get(i))
                .map(|label| format!("◀ {label} ▶")),
        }
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::number(FieldKey::Age, "Age", "years (18-120)", true, ranges::AGE_RANGE),
                FormField::choice(
                    FieldKey::Sex,
                    "Sex",
                    "←/→ to select",
                    true,
                    Sex::ALL.iter().map(Sex::label),
                ),
                FormField::number(
                    FieldKey::Bmi,
                    "BMI",
                    "kg/m² (optional)",
                    false,
                    ranges::BMI_RANGE,
                ),
                FormField::choice(
                    FieldKey::Smoking,
                    "Smoking",
                    "←/→ to select (optional)",
                    false,
                    SmokingStatus::ALL.iter().map(SmokingStatus::label),
                ),
                FormField::number(FieldKey::Il6r, "IL6R", "pg/mL", true, ranges::PG_ML_RANGE),
                FormField::number(FieldKey::Hspb1, "HSPB1", "pg/mL", true, ranges::PG_ML_RANGE),
                FormField::number(
                    FieldKey::Tnfr1,
                    "TNFR1",
                    "pg/mL (optional)",
                    false,
                    ranges::PG_ML_RANGE,
                ),
                FormField::number(
                    FieldKey::Crp,
                    "hs-CRP",
                    "mg/L (optional)",
                    false,
                    ranges::CRP_RANGE,
                ),
                FormField::number(
                    FieldKey::Ldl,
                    "LDL",
                    "mg/dL (optional)",
                    false,
                    ranges::LDL_RANGE,
                ),
                FormField::number(
                    FieldKey::Hdl,
                    "HDL",
                    "mg/dL (optional)",
                    false,
                    ranges::HDL_RANGE,
                ),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl PatientFormState {
    /// Move to the next field, checking the one being left
    pub fn next_field(&mut self) {
        self.blur_current();
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field, checking the one being left
    pub fn prev_field(&mut self) {
        self.blur_current();
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    fn blur_current(&mut self) {
        let field = &mut self.fields[self.selected_field];
        field.valid = if field.required || !field.is_empty() {
            Some(field.check().is_ok())
        } else {
            None
        };
    }

    /// Add a character to the current field
    ///
    /// Space cycles a choice field; number fields accept digits, `.` and `-`.
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        match field.kind {
            FieldKind::Number { .. } => {
                if c.is_ascii_digit() || c == '.' || c == '-' {
                    field.value.push(c);
                    field.valid = None;
                    self.error_message = None;
                }
            }
            FieldKind::Choice { .. } => {
                if c == ' ' {
                    self.cycle_choice(true);
                }
            }
        }
    }

    /// Step the current choice field forwards or backwards.
    ///
    /// Optional choices include an empty "not recorded" position.
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = &mut self.fields[self.selected_field];
        let FieldKind::Choice { options } = &field.kind else {
            return;
        };
        let n = options.len();

        field.choice = match (field.choice, forward, field.required) {
            (None, true, _) => Some(0),
            (None, false, _) => Some(n - 1),
            (Some(i), true, _) if i + 1 < n => Some(i + 1),
            (Some(_), true, true) => Some(0),
            (Some(_), true, false) => None,
            (Some(i), false, _) if i > 0 => Some(i - 1),
            (Some(_), false, true) => Some(n - 1),
            (Some(_), false, false) => None,
        };
        field.valid = None;
        self.error_message = None;
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if field.value.pop().is_some() {
            field.valid = None;
            self.error_message = None;
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        let field = &mut self.fields[self.selected_field];
        field.value.zeroize();
        field.choice = None;
        field.valid = None;
    }

    /// Wipe all field buffers and return to a blank form.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
            field.choice = None;
            field.valid = None;
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    fn field(&self, key: FieldKey) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn number(&self, key: FieldKey) -> Result<Option<f64>, String> {
        self.field(key).map_or(Ok(None), FormField::parse_number)
    }

    fn required_number(&self, key: FieldKey) -> Result<f64, String> {
        self.number(key)?.ok_or_else(|| format!("{key:?}: Required"))
    }

    fn selected(&self, key: FieldKey) -> Option<usize> {
        self.field(key).and_then(|f| f.choice)
    }

    /// Validate and convert to a PatientInput
    pub fn to_patient_input(&self) -> Result<PatientInput, String> {
        for field in &self.fields {
            field.check()?;
        }

        let sex = self
            .selected(FieldKey::Sex)
            .and_then(|i| Sex::ALL.get(i).copied())
            .ok_or_else(|| "Sex: Required".to_string())?;
        let smoking = self
            .selected(FieldKey::Smoking)
            .and_then(|i| SmokingStatus::ALL.get(i).copied());

        Ok(PatientInput {
            demographics: Demographics {
                age: self.required_number(FieldKey::Age)?,
                sex,
                bmi: self.number(FieldKey::Bmi)?,
                smoking,
            },
            biomarkers: Biomarkers {
                il6r: self.required_number(FieldKey::Il6r)?,
                hspb1: self.required_number(FieldKey::Hspb1)?,
                tnfr1: self.number(FieldKey::Tnfr1)?,
                crp: self.number(FieldKey::Crp)?,
                ldl: self.number(FieldKey::Ldl)?,
                hdl: self.number(FieldKey::Hdl)?,
            },
        })
    }

    /// Load sample data (a mid-risk profile landing in endotype 3)
    pub fn load_sample_data(&mut self) {
        for field in self.fields.iter_mut() {
            field.valid = None;
            match field.key {
                FieldKey::Sex => field.choice = Some(1),
                FieldKey::Smoking => field.choice = Some(1),
                key => {
                    let sample = match key {
                        FieldKey::Age => "62",
                        FieldKey::Bmi => "27.5",
                        FieldKey::Il6r => "1850",
                        FieldKey::Hspb1 => "2600",
                        FieldKey::Tnfr1 => "1100",
                        FieldKey::Crp => "3.4",
                        FieldKey::Ldl => "142",
                        FieldKey::Hdl => "48",
                        FieldKey::Sex | FieldKey::Smoking => "",
                    };
                    field.value = sample.to_string();
                }
            }
        }
        self.error_message = None;
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Patient Data Entry", MedicalTheme::title()),
        Span::styled(
            " │ Demographics & Biomarkers (* required)",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    // Demographics on the left, biomarkers on the right
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let split = state
        .fields
        .iter()
        .position(|field| field.key == FieldKey::Il6r)
        .unwrap_or(state.fields.len() / 2);

    render_field_column(f, columns[0], &state.fields[..split], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[split..],
        split,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = match (is_selected, field.valid) {
            (true, _) => MedicalTheme::border_focused(),
            (false, Some(false)) => MedicalTheme::danger(),
            (false, Some(true)) => MedicalTheme::success(),
            (false, None) => MedicalTheme::border(),
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };
        let marker = if field.required { "*" } else { "" };

        let block = Block::default()
            .title(Span::styled(format!(" {}{} ", field.label, marker), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = match field.display_value() {
            Some(value) => Span::styled(value, MedicalTheme::text()),
            None => Span::styled(field.hint, MedicalTheme::text_muted()),
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected && matches!(field.kind, FieldKind::Number { .. }) {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Select ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Ctrl+R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
