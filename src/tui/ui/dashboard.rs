//! Dashboard view: Landing screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::domain::reference_table;
use crate::tui::styles::MedicalTheme;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub predictor_name: &'static str,
    pub prediction_count: usize,
    pub latency_ms: u128,
    pub export_dir: String,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Endotype", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(
            "Subclinical Atherosclerosis Endotype Prediction",
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

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Status panels
            Constraint::Percentage(60), // Reference table
        ])
        .split(area);

    render_status_panels(f, chunks[0], state);
    render_reference_table(f, chunks[1]);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // System status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let status_items = vec![
        Line::from(vec![
            Span::styled("  Predictor: ", MedicalTheme::text_secondary()),
            Span::styled(state.predictor_name, MedicalTheme::warning()),
        ]),
        Line::from(vec![
            Span::styled("  Predictions: ", MedicalTheme::text_secondary()),
            Span::styled(state.prediction_count.to_string(), MedicalTheme::text()),
            Span::styled(" this session", MedicalTheme::text_muted()),
        ]),
        Line::from(vec![
            Span::styled("  Simulated latency: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{} ms", state.latency_ms), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Reports: ", MedicalTheme::text_secondary()),
            Span::styled(state.export_dir.clone(), MedicalTheme::text_muted()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" System Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Prediction", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn render_reference_table(f: &mut Frame, area: Rect) {
    let header = Row::new(vec!["Endotype", "Hazard Ratio", "95% CI", "Risk Category"])
        .style(MedicalTheme::subtitle())
        .bottom_margin(1);

    let rows: Vec<Row> = reference_table()
        .map(|(id, record)| {
            let risk = MedicalTheme::risk_tag(record.risk_style_tag);
            Row::new(vec![
                Cell::from(Span::styled(record.name, MedicalTheme::endotype(id))),
                Cell::from(Span::styled(
                    format!("{:.1}", record.hazard_ratio),
                    MedicalTheme::text(),
                )),
                Cell::from(Span::styled(
                    record.confidence_interval,
                    MedicalTheme::text_secondary(),
                )),
                Cell::from(Span::styled(record.risk_category, risk)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Min(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(Span::styled(" Endotype Reference ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(table, area);
}
