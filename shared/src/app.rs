//! Application state shared by every handler of the page.

use serde::{Deserialize, Serialize};

use crate::assistant::respond;
use crate::error::{FormError, StorageError};
use crate::estimator::{RouteForm, SimulationResult, estimate};
use crate::presentation::{DisplayPort, DisplayRegion, MapPort, render_simulation};
use crate::session::{Credentials, SessionStorage, SessionStore, badge_text};
use crate::status::{StatusAnimator, StatusTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub speaker: Speaker,
    pub text: String,
}

/// A reply computed at question time and appended once its delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub question_id: u64,
    pub text: String,
}

pub struct AppState<S> {
    pub last_simulation: Option<SimulationResult>,
    pub status: StatusAnimator,
    pub session: SessionStore<S>,
    pub transcript: Vec<ChatMessage>,
    next_message_id: u64,
}

impl<S: SessionStorage> AppState<S> {
    pub fn new(storage: S) -> Self {
        Self {
            last_simulation: None,
            status: StatusAnimator::default(),
            session: SessionStore::new(storage),
            transcript: Vec::new(),
            next_message_id: 0,
        }
    }

    /// Estimate, render and restart the status animation. On a form error only
    /// the feedback region changes.
    pub fn submit_route(
        &mut self,
        form: &RouteForm,
        display: &mut impl DisplayPort,
        map: &mut impl MapPort,
    ) -> Result<StatusTicket, FormError> {
        let request = match form.to_request() {
            Ok(request) => request,
            Err(err) => {
                display.set_text(DisplayRegion::FormFeedback, err.to_string());
                return Err(err);
            }
        };

        let result = estimate(&request);
        render_simulation(&result, display, map);
        display.set_text(DisplayRegion::FormFeedback, String::new());
        self.last_simulation = Some(result);

        let ticket = self.status.start();
        self.render_status(display);
        Ok(ticket)
    }

    /// Apply a timer tick. Returns true when another tick should be scheduled.
    pub fn advance_status(&mut self, ticket: StatusTicket, display: &mut impl DisplayPort) -> bool {
        if self.status.tick(ticket).is_none() {
            return false;
        }
        self.render_status(display);
        self.status.is_running()
    }

    pub fn ask(&mut self, question: &str) -> Option<PendingReply> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        let question_id = self.push_message(Speaker::User, question.to_string());
        Some(PendingReply {
            question_id,
            text: respond(question, self.last_simulation.as_ref()),
        })
    }

    pub fn deliver(&mut self, reply: PendingReply) {
        self.push_message(Speaker::Assistant, reply.text);
    }

    pub fn login(
        &mut self,
        credentials: Credentials,
        display: &mut impl DisplayPort,
    ) -> Result<(), StorageError> {
        self.session.login(credentials)?;
        self.render_badge(display);
        Ok(())
    }

    pub fn logout(&mut self, display: &mut impl DisplayPort) -> Result<(), StorageError> {
        let outcome = self.session.logout();
        self.render_badge(display);
        outcome
    }

    pub fn render_badge(&self, display: &mut impl DisplayPort) {
        display.set_text(DisplayRegion::SessionBadge, badge_text(self.session.current()));
    }

    fn render_status(&self, display: &mut impl DisplayPort) {
        if let Some(stage) = self.status.stage() {
            display.set_text(DisplayRegion::Status, stage.label().to_string());
        }
    }

    fn push_message(&mut self, speaker: Speaker, text: String) -> u64 {
        self.next_message_id += 1;
        let id = self.next_message_id;
        self.transcript.push(ChatMessage { id, speaker, text });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{DisplayBuffer, RecordingMap};
    use crate::session::MemoryStorage;
    use crate::status::DeliveryStage;

    fn route_form() -> RouteForm {
        RouteForm {
            pickup: "São Paulo".into(),
            dropoff: "Rio de Janeiro".into(),
            base_fare: "10".into(),
            per_km_rate: "2".into(),
            ..RouteForm::default()
        }
    }

    #[test]
    fn submit_renders_and_starts_status() {
        let mut app = AppState::new(MemoryStorage::default());
        let mut display = DisplayBuffer::default();
        let mut map = RecordingMap::default();

        let ticket = app.submit_route(&route_form(), &mut display, &mut map).unwrap();
        assert!(app.last_simulation.is_some());
        assert_eq!(map.points.len(), 2);
        assert_eq!(
            display.get(DisplayRegion::Status),
            Some(DeliveryStage::Prep.label())
        );

        assert!(app.advance_status(ticket, &mut display));
        assert_eq!(display.get(DisplayRegion::Status), Some(DeliveryStage::Way.label()));
        assert!(!app.advance_status(ticket, &mut display));
        assert_eq!(display.get(DisplayRegion::Status), Some(DeliveryStage::Near.label()));
        assert!(!app.advance_status(ticket, &mut display));
    }

    #[test]
    fn form_error_keeps_previous_simulation() {
        let mut app = AppState::new(MemoryStorage::default());
        let mut display = DisplayBuffer::default();
        let mut map = RecordingMap::default();
        app.submit_route(&route_form(), &mut display, &mut map).unwrap();
        let before = app.last_simulation.clone();

        let broken = RouteForm {
            dropoff: String::new(),
            ..route_form()
        };
        assert!(app.submit_route(&broken, &mut display, &mut map).is_err());
        assert_eq!(app.last_simulation, before);
        assert_eq!(map.updates, 1);
        assert_eq!(
            display.get(DisplayRegion::FormFeedback),
            Some("Informe o endereço de entrega.")
        );
    }

    #[test]
    fn resubmit_invalidates_running_animation() {
        let mut app = AppState::new(MemoryStorage::default());
        let mut display = DisplayBuffer::default();
        let mut map = RecordingMap::default();
        let first = app.submit_route(&route_form(), &mut display, &mut map).unwrap();
        let second = app.submit_route(&route_form(), &mut display, &mut map).unwrap();

        assert!(!app.advance_status(first, &mut display));
        assert_eq!(display.get(DisplayRegion::Status), Some(DeliveryStage::Prep.label()));
        assert!(app.advance_status(second, &mut display));
    }

    #[test]
    fn chat_replies_are_appended_in_order() {
        let mut app = AppState::new(MemoryStorage::default());
        assert!(app.ask("   ").is_none());

        let first = app.ask("qual o valor?").unwrap();
        let second = app.ask("oi").unwrap();
        app.deliver(first);
        app.deliver(second);

        let speakers: Vec<_> = app.transcript.iter().map(|m| m.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::User, Speaker::User, Speaker::Assistant, Speaker::Assistant]
        );
        assert!(app.transcript[2].text.starts_with("Faça uma simulação"));
        assert!(app.transcript.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn login_and_logout_update_badge() {
        let mut app = AppState::new(MemoryStorage::default());
        let mut display = DisplayBuffer::default();
        app.render_badge(&mut display);
        assert_eq!(display.get(DisplayRegion::SessionBadge), Some("Visitante"));

        let creds = Credentials {
            email: Some("ana@example.com".into()),
            ..Credentials::default()
        };
        app.login(creds, &mut display).unwrap();
        assert_eq!(
            display.get(DisplayRegion::SessionBadge),
            Some("Conectado: ana@example.com")
        );

        app.logout(&mut display).unwrap();
        assert_eq!(display.get(DisplayRegion::SessionBadge), Some("Visitante"));
        assert!(!app.session.validate());
    }
}
