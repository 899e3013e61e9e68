// Interactive predictor
//
// PredictorApp holds the form state: one text field per feature in schema
// order, a focus index, the last successful result, and the last
// validation error. The event loop is single-threaded and synchronous;
// a predict request runs to completion before the next event is read.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::{Modifier, Style};
use tui_textarea::TextArea;

use crate::predictor::on_predict_requested;
use crate::training::TrainedBundle;

pub mod tui;

use tui::TuiRenderer;

/// What the event loop should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Quit,
}

/// Form state for the interactive predictor.
pub struct PredictorApp {
    bundle: TrainedBundle,
    fields: Vec<TextArea<'static>>,
    focus: usize,
    result: Option<String>,
    error: Option<String>,
    label_width: usize,
}

impl PredictorApp {
    /// Build the form from the trained bundle: one empty text field per
    /// feature, in schema order.
    pub fn new(bundle: TrainedBundle) -> Self {
        let mut fields: Vec<TextArea<'static>> = bundle
            .schema
            .iter()
            .map(|_| {
                let mut field = TextArea::default();
                field.set_cursor_line_style(Style::default());
                field.set_cursor_style(Style::default());
                field
            })
            .collect();

        // Show the cursor only in the focused field
        if let Some(first) = fields.first_mut() {
            first.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        }

        let label_width = bundle
            .schema
            .iter()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .min(20);

        Self {
            bundle,
            fields,
            focus: 0,
            result: None,
            error: None,
            label_width,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_name(&self, idx: usize) -> &str {
        &self.bundle.schema[idx]
    }

    pub fn field(&self, idx: usize) -> &TextArea<'static> {
        &self.fields[idx]
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn label_width(&self) -> usize {
        self.label_width
    }

    /// First visible field index for a form window of `visible_rows` rows.
    pub fn form_scroll(&self, visible_rows: usize) -> usize {
        if visible_rows == 0 || self.focus < visible_rows {
            0
        } else {
            self.focus + 1 - visible_rows
        }
    }

    /// Current text of every field, in schema order.
    pub fn field_values(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.lines().first().cloned().unwrap_or_default())
            .collect()
    }

    fn set_focus(&mut self, idx: usize) {
        self.fields[self.focus].set_cursor_style(Style::default());
        self.focus = idx;
        self.fields[self.focus]
            .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    fn focus_next(&mut self) {
        let next = (self.focus + 1) % self.fields.len();
        self.set_focus(next);
    }

    fn focus_prev(&mut self) {
        let prev = (self.focus + self.fields.len() - 1) % self.fields.len();
        self.set_focus(prev);
    }

    /// Run one predict request on the current field values.
    ///
    /// On success the result area is replaced and any stale error cleared;
    /// on a parse failure the error is surfaced and the previous result is
    /// left untouched.
    pub fn submit(&mut self) {
        match on_predict_requested(&self.bundle, &self.field_values()) {
            Ok(result) => {
                tracing::debug!(%result, "Predict request succeeded");
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                tracing::debug!(error = %err, "Predict request rejected");
                self.error = Some(err.to_string());
            }
        }
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Signal {
        match key.code {
            KeyCode::Esc => return Signal::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Signal::Quit;
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            _ => {
                self.fields[self.focus].input(key);
            }
        }
        Signal::Continue
    }
}

/// Run the interactive predictor until the user quits.
pub fn run_app(bundle: TrainedBundle) -> Result<()> {
    let mut renderer = TuiRenderer::new()?;
    let mut app = PredictorApp::new(bundle);

    loop {
        renderer.render(&app)?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) == Signal::Quit {
                    break;
                }
            }
            // Resize is handled by redrawing on the next iteration
            _ => {}
        }
    }

    renderer.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::training::fit_startup_model;
    use std::io::Write;

    fn trained_bundle() -> TrainedBundle {
        let mut csv = String::from("amt,time,loc,Class\n");
        for i in 0..20 {
            let label = usize::from(i >= 10);
            csv.push_str(&format!("{}.0,{}.0,{}.0,{}\n", i * 100, i, i * 2, label));
        }
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(csv.as_bytes()).expect("write csv");

        let settings = Settings {
            dataset_path: file.path().to_path_buf(),
            n_trees: 10,
            ..Settings::default()
        };
        fit_startup_model(&settings).expect("train").bundle
    }

    fn type_into_focused(app: &mut PredictorApp, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_form_has_one_field_per_feature_in_schema_order() {
        let app = PredictorApp::new(trained_bundle());
        assert_eq!(app.field_count(), 3);
        assert_eq!(app.field_name(0), "amt");
        assert_eq!(app.field_name(1), "time");
        assert_eq!(app.field_name(2), "loc");
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut app = PredictorApp::new(trained_bundle());
        assert_eq!(app.focus(), 0);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.focus(), 1);
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(app.focus(), 0);
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(app.focus(), 2);
    }

    #[test]
    fn test_typing_fills_the_focused_field() {
        let mut app = PredictorApp::new(trained_bundle());
        type_into_focused(&mut app, "100.0");
        assert_eq!(app.field_values(), vec!["100.0", "", ""]);
    }

    #[test]
    fn test_submit_with_valid_input_sets_result() {
        let mut app = PredictorApp::new(trained_bundle());
        for value in ["100.0", "5.0", "2.0"] {
            type_into_focused(&mut app, value);
            app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        let result = app.result().expect("result set");
        assert!(
            result == "The predicted class is: Fraud"
                || result == "The predicted class is: Not Fraud"
        );
        assert!(app.error().is_none());
    }

    #[test]
    fn test_invalid_input_keeps_previous_result() {
        let mut app = PredictorApp::new(trained_bundle());
        for value in ["100.0", "5.0", "2.0"] {
            type_into_focused(&mut app, value);
            app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        }
        app.submit();
        let before = app.result().expect("result set").to_string();

        // Corrupt the first field and predict again
        app.set_focus(0);
        type_into_focused(&mut app, "abc");
        app.submit();

        assert_eq!(app.result(), Some(before.as_str()));
        let error = app.error().expect("error surfaced");
        assert!(error.contains("amt"));
    }

    #[test]
    fn test_esc_and_ctrl_c_quit() {
        let mut app = PredictorApp::new(trained_bundle());
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Signal::Quit
        );
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Signal::Quit
        );
    }

    #[test]
    fn test_form_scroll_keeps_focus_visible() {
        let mut app = PredictorApp::new(trained_bundle());
        assert_eq!(app.form_scroll(2), 0);
        app.set_focus(2);
        assert_eq!(app.form_scroll(2), 1);
        assert_eq!(app.form_scroll(10), 0);
    }
}
