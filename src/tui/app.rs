//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Background prediction via the worker thread

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::{FileReportWriter, RubricPredictor};
use crate::application::PredictionService;
use crate::config::AppConfig;
use crate::ports::ReportFormat;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    patient::{render_patient_form, PatientFormState},
    prediction::{render_prediction, ExportStatus, PredictionState},
    render_disclaimer,
};
use super::worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

type Service = PredictionService<RubricPredictor, FileReportWriter>;

/// Upper bound for the progress bar until the worker reports back.
const MAX_PENDING_PROGRESS: f64 = 0.95;

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PatientForm,
    Prediction,
}

/// Main application state
pub struct App {
    screen: Screen,

    should_quit: bool,

    service: Arc<Service>,

    /// Cosmetic delay applied by the worker
    latency: Duration,

    dashboard_state: DashboardState,

    patient_form_state: PatientFormState,

    prediction_state: PredictionState,

    /// Pending prediction worker (if running)
    pending_worker: Option<PredictionWorkerHandle>,

    /// When the pending prediction was submitted
    submitted_at: Option<Instant>,
}

impl App {
    /// Create a new application instance from configuration.
    ///
    /// # Errors
    /// Returns error if services cannot be initialized.
    pub fn new(config: AppConfig) -> Result<Self> {
        let service = Arc::new(PredictionService::new(
            Arc::new(RubricPredictor::new()),
            Arc::new(FileReportWriter::new(config.export_dir)),
        ));

        Self::with_dependencies(service, config.simulated_latency)
    }

    /// Create application with an injected service (Composition Root pattern).
    ///
    /// # Errors
    /// Returns error if initialization fails.
    pub fn with_dependencies(service: Arc<Service>, latency: Duration) -> Result<Self> {
        let mut app = Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            latency,
            dashboard_state: DashboardState::default(),
            patient_form_state: PatientFormState::default(),
            prediction_state: PredictionState::default(),
            pending_worker: None,
            submitted_at: None,
        };
        app.update_dashboard_state();
        Ok(app)
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_progress();

            terminal.draw(|f| self.render(f))?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        match self.screen {
            Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
            Screen::PatientForm => render_patient_form(f, chunks[0], &self.patient_form_state),
            Screen::Prediction => render_prediction(f, chunks[0], &self.prediction_state),
        }

        render_disclaimer(f, chunks[1]);
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        // We must not hold a borrow of `pending_worker` while mutating `self`.
        while let Some(progress) = self
            .pending_worker
            .as_ref()
            .and_then(PredictionWorkerHandle::try_recv)
        {
            match progress {
                PredictionProgress::Waiting | PredictionProgress::Predicting => {}
                PredictionProgress::Complete(result) => {
                    self.prediction_state = PredictionState::Complete {
                        result: Box::new(result),
                        export_status: None,
                    };
                    self.finish_worker();
                    break;
                }
                PredictionProgress::Error(message) => {
                    self.prediction_state = PredictionState::Error { message };
                    self.finish_worker();
                    break;
                }
            }
        }
    }

    fn finish_worker(&mut self) {
        self.pending_worker = None;
        self.submitted_at = None;
        self.update_dashboard_state();
    }

    /// Linear progress over the simulated latency, held short of completion.
    fn tick_progress(&mut self) {
        let (Some(_), Some(started_at)) = (&self.pending_worker, self.submitted_at) else {
            return;
        };
        let PredictionState::Processing { progress } = &mut self.prediction_state else {
            return;
        };

        let elapsed = started_at.elapsed().as_secs_f64();
        let total = self.latency.as_secs_f64();
        let target = if total <= 0.0 {
            MAX_PENDING_PROGRESS
        } else {
            (elapsed / total).min(MAX_PENDING_PROGRESS)
        };
        *progress = progress.max(target);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PatientForm => self.handle_patient_form_key(key, modifiers),
            Screen::Prediction => self.handle_prediction_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if matches!(key, KeyCode::Char('r') | KeyCode::Char('R')) {
                self.patient_form_state.clear_sensitive();
            }
            return;
        }

        match key {
            KeyCode::Esc => {
                self.patient_form_state.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.patient_form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.patient_form_state.next_field();
            }
            KeyCode::Left => {
                self.patient_form_state.cycle_choice(false);
            }
            KeyCode::Right => {
                self.patient_form_state.cycle_choice(true);
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.patient_form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.patient_form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.patient_form_state.delete_char();
            }
            KeyCode::Delete => {
                self.patient_form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_patient_form();
            }
            _ => {}
        }
    }

    fn handle_prediction_key(&mut self, key: KeyCode) {
        match &self.prediction_state {
            PredictionState::Complete { .. } => match key {
                KeyCode::Char('e') | KeyCode::Char('E') => self.export(ReportFormat::Json),
                KeyCode::Char('t') | KeyCode::Char('T') => self.export(ReportFormat::Text),
                KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
                KeyCode::Enter | KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                _ => {}
            },
            // The form was wiped at submission, so retrying starts from a fresh one.
            PredictionState::Error { .. } => match key {
                KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
                KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn open_form(&mut self) {
        self.patient_form_state = PatientFormState::default();
        self.screen = Screen::PatientForm;
    }

    fn submit_patient_form(&mut self) {
        let input = match self.patient_form_state.to_patient_input() {
            Ok(input) => input,
            Err(e) => {
                self.patient_form_state.error_message = Some(e);
                return;
            }
        };

        if let Err(errors) = input.validate() {
            self.patient_form_state.error_message = Some(errors.join(", "));
            return;
        }

        self.screen = Screen::Prediction;
        self.prediction_state = PredictionState::Processing { progress: 0.0 };
        self.submitted_at = Some(Instant::now());
        self.pending_worker = Some(PredictionWorker::spawn(
            self.service.clone(),
            input,
            self.latency,
        ));

        // Clear plaintext buffers from the UI immediately.
        self.patient_form_state.clear_sensitive();
    }

    fn export(&mut self, format: ReportFormat) {
        let PredictionState::Complete {
            result,
            export_status,
        } = &mut self.prediction_state
        else {
            return;
        };

        *export_status = Some(match self.service.export(result, format) {
            Ok(path) => ExportStatus::Saved(path.display().to_string()),
            Err(e) => ExportStatus::Failed(e.to_string()),
        });
    }

    fn update_dashboard_state(&mut self) {
        self.dashboard_state = DashboardState {
            predictor_name: self.service.predictor_name(),
            prediction_count: self.service.predictions_this_session(),
            latency_ms: self.latency.as_millis(),
            export_dir: self.service.reports().dir().display().to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EndotypeId;
    use ratatui::backend::TestBackend;

    fn app_in(dir: &std::path::Path) -> App {
        let service = Arc::new(PredictionService::new(
            Arc::new(RubricPredictor::new()),
            Arc::new(FileReportWriter::new(dir)),
        ));
        App::with_dependencies(service, Duration::from_millis(5)).expect("app")
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn wait_for_result(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.pending_worker.is_some() {
            assert!(Instant::now() < deadline, "worker did not finish");
            app.tick_progress();
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).expect("terminal");
        terminal.draw(|f| app.render(f)).expect("draw");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_sample_submission_flow() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::PatientForm);
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Prediction);
        assert!(matches!(
            app.prediction_state,
            PredictionState::Processing { .. }
        ));

        wait_for_result(&mut app);

        let PredictionState::Complete { result, .. } = &app.prediction_state else {
            panic!("expected a result, got {:?}", app.prediction_state);
        };
        assert_eq!(result.endotype, EndotypeId::Three);
        assert_eq!(app.dashboard_state.prediction_count, 1);

        // Form buffers were wiped at submission.
        assert!(app
            .patient_form_state
            .fields
            .iter()
            .all(|f| f.value.is_empty() && f.choice.is_none()));
    }

    #[test]
    fn test_export_from_results() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        wait_for_result(&mut app);

        press(&mut app, KeyCode::Char('e'));
        let PredictionState::Complete {
            export_status: Some(ExportStatus::Saved(path)),
            ..
        } = &app.prediction_state
        else {
            panic!("expected saved export, got {:?}", app.prediction_state);
        };
        assert!(path.ends_with(".json"));
        assert!(std::path::Path::new(path).exists());

        press(&mut app, KeyCode::Char('t'));
        let entries = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn test_incomplete_form_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::PatientForm);
        assert!(app.pending_worker.is_none());
        assert!(app.patient_form_state.error_message.is_some());
    }

    #[test]
    fn test_ctrl_r_resets_form() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('r'), KeyModifiers::CONTROL);

        assert!(app
            .patient_form_state
            .fields
            .iter()
            .all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_quit_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        press(&mut app, KeyCode::Char('n'));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let mut app = app_in(dir.path());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_error_screen_starts_a_new_form() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        wait_for_result(&mut app);
        app.prediction_state = PredictionState::Error {
            message: "backend unreachable".to_string(),
        };
        assert!(screen_text(&app).contains("[N] New Prediction"));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::PatientForm);
        assert_eq!(app.patient_form_state.selected_field, 0);
        assert!(app.patient_form_state.error_message.is_none());
        assert!(app
            .patient_form_state
            .fields
            .iter()
            .all(|f| f.value.is_empty() && f.choice.is_none() && f.valid.is_none()));
    }

    #[test]
    fn test_dashboard_renders_reference_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = app_in(dir.path());
        let text = screen_text(&app);

        assert!(text.contains("Endotype Reference"));
        for name in ["Endotype 1", "Endotype 2", "Endotype 3", "Endotype 4"] {
            assert!(text.contains(name), "missing {name}");
        }
        assert!(text.contains("Moderate-High"));
        assert!(text.contains("rubric-v1"));
        assert!(text.contains("DISCLAIMER"));
    }
}
