//! Prediction progress and results view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::domain::{scoring::MAX_SCORE, PredictionResult, NOT_VALIDATED_NOTICE};
use crate::tui::styles::MedicalTheme;

/// Prediction state
#[derive(Debug, Clone, Default)]
pub enum PredictionState {
    /// Not started
    #[default]
    Idle,
    /// Waiting on the worker
    Processing { progress: f64 },
    /// Completed with result
    Complete {
        result: Box<PredictionResult>,
        /// Outcome of the last export, shown in the footer
        export_status: Option<ExportStatus>,
    },
    /// Error occurred
    Error { message: String },
}

/// Feedback line after an export attempt.
#[derive(Debug, Clone)]
pub enum ExportStatus {
    Saved(String),
    Failed(String),
}

/// Render the prediction view
pub fn render_prediction(f: &mut Frame, area: Rect, state: &PredictionState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_prediction_header(f, chunks[0]);
    render_prediction_content(f, chunks[1], state);
    render_prediction_footer(f, chunks[2], state);
}

fn render_prediction_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Endotype Prediction", MedicalTheme::title()),
        Span::styled(" │ Rule-based mock rubric", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_prediction_content(f: &mut Frame, area: Rect, state: &PredictionState) {
    match state {
        PredictionState::Idle => render_idle(f, area),
        PredictionState::Processing { progress } => render_progress(f, area, *progress),
        PredictionState::Complete { result, .. } => render_result(f, area, result),
        PredictionState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No prediction yet",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter patient data to begin",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, progress: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let label = Paragraph::new(Line::from(vec![
        Span::styled("Status: ", MedicalTheme::text_secondary()),
        Span::styled("Processing...", MedicalTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[0]);

    let ratio = progress.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::gauge())
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        "Scoring biomarkers against the endotype rubric",
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_result(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let record = result.record;
    let alert = MedicalTheme::endotype(result.endotype);
    let risk = MedicalTheme::risk_tag(record.risk_style_tag);

    let block = Block::default()
        .title(Span::styled(" Prediction Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(alert);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Endotype + description
            Constraint::Length(2), // Risk metrics
            Constraint::Length(2), // Score breakdown
            Constraint::Min(0),    // Pathways | recommendations
        ])
        .margin(1)
        .split(inner);

    let headline = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Predicted Endotype: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!(" {} ", result.endotype),
                MedicalTheme::badge(alert),
            ),
        ]),
        Line::from(Span::styled(record.description, MedicalTheme::text())),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(headline, rows[0]);

    let metrics = Paragraph::new(Line::from(vec![
        Span::styled("Hazard Ratio: ", MedicalTheme::text_secondary()),
        Span::styled(format!("{:.1}", record.hazard_ratio), risk),
        Span::styled("   95% CI: ", MedicalTheme::text_secondary()),
        Span::styled(record.confidence_interval, MedicalTheme::text()),
        Span::styled("   Risk Category: ", MedicalTheme::text_secondary()),
        Span::styled(record.risk_category, MedicalTheme::badge(risk)),
    ]));
    f.render_widget(metrics, rows[1]);

    let rules = if result.score.rules.is_empty() {
        "no rubric rules fired".to_string()
    } else {
        result
            .score
            .rules
            .iter()
            .map(|r| format!("+{} {}", r.points(), r.description()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let breakdown = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("Score {}/{}: ", result.score.total(), MAX_SCORE),
            MedicalTheme::text_secondary(),
        ),
        Span::styled(rules, MedicalTheme::text_muted()),
    ]))
    .wrap(Wrap { trim: true });
    f.render_widget(breakdown, rows[2]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[3]);

    let pathways: Vec<ListItem> = record
        .pathways
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled("→ ", MedicalTheme::focused()),
                Span::styled(*p, MedicalTheme::text()),
            ]))
        })
        .collect();
    let pathway_list = List::new(pathways).block(
        Block::default()
            .title(Span::styled(" Biological Pathways ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(pathway_list, columns[0]);

    render_recommendations(f, columns[1], record.recommendations);
}

fn render_recommendations(f: &mut Frame, area: Rect, recommendations: &[&str]) {
    let block = Block::default()
        .title(Span::styled(" Recommended Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    // Always drawn ahead of the list; there is no key to hide it.
    let notice = Paragraph::new(Line::from(vec![
        Span::styled("! ", MedicalTheme::danger()),
        Span::styled(NOT_VALIDATED_NOTICE, MedicalTheme::danger()),
    ]))
    .wrap(Wrap { trim: true });
    f.render_widget(notice, chunks[0]);

    let items: Vec<ListItem> = recommendations
        .iter()
        .map(|r| {
            ListItem::new(Line::from(vec![
                Span::styled("✓ ", MedicalTheme::success()),
                Span::styled(*r, MedicalTheme::text()),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), chunks[1]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_prediction_footer(f: &mut Frame, area: Rect, state: &PredictionState) {
    let content = match state {
        PredictionState::Complete {
            export_status: Some(ExportStatus::Saved(path)),
            ..
        } => Line::from(vec![
            Span::styled("Saved ", MedicalTheme::success()),
            Span::styled(path.clone(), MedicalTheme::text()),
            Span::styled("  [N] ", MedicalTheme::key_hint()),
            Span::styled("New Prediction ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Home", MedicalTheme::key_desc()),
        ]),
        PredictionState::Complete {
            export_status: Some(ExportStatus::Failed(message)),
            ..
        } => Line::from(vec![
            Span::styled("! Export failed: ", MedicalTheme::danger()),
            Span::styled(message.clone(), MedicalTheme::danger()),
        ]),
        PredictionState::Complete { .. } => Line::from(vec![
            Span::styled("[E] ", MedicalTheme::key_hint()),
            Span::styled("Export JSON ", MedicalTheme::key_desc()),
            Span::styled("[T] ", MedicalTheme::key_hint()),
            Span::styled("Export Text ", MedicalTheme::key_desc()),
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Prediction ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Home", MedicalTheme::key_desc()),
        ]),
        PredictionState::Error { .. } => Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Prediction ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Home", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![Span::styled(
            "Processing...",
            MedicalTheme::text_muted(),
        )]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
