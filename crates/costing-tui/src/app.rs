//! Application state and logic

use costing_core::{ChartData, Field, InputRecord, Presence, Resolution, Session, FIELDS};
use rust_decimal::Decimal;
use std::time::Instant;
use tracing::debug;

/// Longest text accepted in a single field
const MAX_INPUT_LEN: usize = 20;

pub struct App {
    pub session: Session,
    /// Raw text of each field, in registry order
    pub buffers: Vec<String>,
    pub focus: usize,
    pub error: Option<String>,
    pub status_message: Option<String>,
    pub status_start: Option<Instant>,
    pub show_help: bool,
}

impl App {
    pub fn new(presence: Presence) -> Self {
        Self {
            session: Session::new(presence),
            buffers: vec![String::new(); FIELDS.len()],
            focus: 0,
            error: None,
            status_message: None,
            status_start: None,
            show_help: false,
        }
    }

    pub fn focused_field(&self) -> Field {
        FIELDS[self.focus].field
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FIELDS.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len();
    }

    /// Type a character into the focused field. Only digits and a single
    /// decimal point are accepted.
    pub fn insert_char(&mut self, c: char) {
        let buffer = &mut self.buffers[self.focus];
        if buffer.len() >= MAX_INPUT_LEN {
            return;
        }
        if c.is_ascii_digit() || (c == '.' && !buffer.contains('.')) {
            buffer.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.buffers[self.focus].pop();
    }

    /// Clear the focused field
    pub fn clear_field(&mut self) {
        self.buffers[self.focus].clear();
    }

    /// Clear every field and any result
    pub fn reset(&mut self) {
        self.buffers.iter_mut().for_each(String::clear);
        self.session.clear();
        self.error = None;
        self.focus = 0;
        self.set_status("Cleared");
    }

    /// Push the typed figures into the session and resolve them
    pub fn calculate(&mut self) {
        let mut input = InputRecord::new();
        for (def, text) in FIELDS.iter().zip(&self.buffers) {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            match text.parse::<Decimal>() {
                Ok(v) => input.set(def.field, Some(v)),
                Err(_) => {
                    self.error = Some(format!("{} is not a valid number: '{text}'", def.name));
                    return;
                }
            }
        }
        self.session.set_input(input);

        match self.session.calculate() {
            Ok(resolution) => {
                let message = format!("Scenario {}", resolution.scenario.number());
                debug!(scenario = resolution.scenario.number(), "calculated");
                self.error = None;
                self.set_status(&message);
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }

    /// Result to display. Nothing is shown while an error is pending.
    pub fn resolution(&self) -> Option<&Resolution> {
        if self.error.is_some() {
            return None;
        }
        self.session.last()
    }

    pub fn chart(&self) -> Option<ChartData> {
        self.resolution()
            .and_then(|r| ChartData::from_record(&r.record))
    }

    /// Set a temporary status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
        self.status_start = Some(Instant::now());
    }

    /// Clear status message after 3s
    pub fn clear_status_if_expired(&mut self) {
        if let Some(start) = self.status_start {
            if start.elapsed().as_millis() >= 3000 {
                self.status_message = None;
                self.status_start = None;
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Presence::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costing_core::Scenario;
    use pretty_assertions::assert_eq;

    fn type_str(app: &mut App, s: &str) {
        s.chars().for_each(|c| app.insert_char(c));
    }

    #[test]
    fn test_focus_wraps() {
        let mut app = App::default();
        app.focus_prev();
        assert_eq!(app.focused_field(), Field::LossPct);
        app.focus_next();
        assert_eq!(app.focused_field(), Field::Cost);
    }

    #[test]
    fn test_insert_filters_characters() {
        let mut app = App::default();
        type_str(&mut app, "1a2.5.0-");
        assert_eq!(app.buffers[0], "12.50");

        app.delete_char();
        assert_eq!(app.buffers[0], "12.5");

        app.clear_field();
        assert_eq!(app.buffers[0], "");
    }

    #[test]
    fn test_calculate_from_buffers() {
        let mut app = App::default();
        type_str(&mut app, "100");
        app.focus = Field::DiscountedPrice.index();
        type_str(&mut app, "150");
        app.calculate();

        assert_eq!(app.error, None);
        let resolution = app.resolution().unwrap();
        assert_eq!(resolution.scenario, Scenario::CostDiscountedPrice);
        assert_eq!(resolution.record.profit(), Some(Decimal::from(50)));
        assert!(app.chart().is_some());
    }

    #[test]
    fn test_failure_hides_previous_result() {
        let mut app = App::default();
        type_str(&mut app, "100");
        app.focus = Field::DiscountedPrice.index();
        type_str(&mut app, "150");
        app.calculate();
        assert!(app.resolution().is_some());

        app.clear_field();
        app.calculate();
        assert!(app
            .error
            .as_deref()
            .unwrap()
            .starts_with("Please provide sufficient input values"));
        assert!(app.resolution().is_none());
        assert!(app.chart().is_none());
    }

    #[test]
    fn test_invalid_number() {
        let mut app = App::default();
        app.buffers[1] = "12abc".to_string();
        app.calculate();
        assert_eq!(
            app.error.as_deref(),
            Some("Selling Price is not a valid number: '12abc'")
        );
    }

    #[test]
    fn test_invalid_number_leaves_session_untouched() {
        let mut app = App::default();
        type_str(&mut app, "100");
        app.focus = Field::DiscountedPrice.index();
        type_str(&mut app, "150");
        app.calculate();
        let before = *app.session.input();

        // A valid edit ahead of a broken field must not reach the session
        app.buffers[Field::Cost.index()] = "200".to_string();
        app.buffers[Field::Loss.index()] = "1x".to_string();
        app.calculate();

        assert_eq!(app.error.as_deref(), Some("Loss is not a valid number: '1x'"));
        assert_eq!(*app.session.input(), before);
        assert!(app.resolution().is_none());
    }

    #[test]
    fn test_reset() {
        let mut app = App::default();
        type_str(&mut app, "100");
        app.focus_next();
        app.reset();
        assert!(app.buffers.iter().all(String::is_empty));
        assert_eq!(app.focus, 0);
        assert_eq!(app.status_message.as_deref(), Some("Cleared"));
        assert!(app.session.input().is_empty());
    }
}
