use serde::{Deserialize, Serialize};

pub const STATUS_TICK_MS: u32 = 2_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStage {
    Prep,
    Way,
    Near,
}

impl DeliveryStage {
    pub const SEQUENCE: [DeliveryStage; 3] =
        [DeliveryStage::Prep, DeliveryStage::Way, DeliveryStage::Near];

    /// `None` once the terminal stage is reached.
    pub fn next(self) -> Option<Self> {
        match self {
            DeliveryStage::Prep => Some(DeliveryStage::Way),
            DeliveryStage::Way => Some(DeliveryStage::Near),
            DeliveryStage::Near => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeliveryStage::Prep => "Pedido em preparo",
            DeliveryStage::Way => "Entregador a caminho",
            DeliveryStage::Near => "Chegando ao destino",
        }
    }
}

/// Handed to the timer; only the ticket from the latest `start` can advance the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTicket {
    pub generation: u64,
}

/// Timer-driven status label. Each `start` supersedes any earlier animation.
#[derive(Debug, Clone, Default)]
pub struct StatusAnimator {
    generation: u64,
    stage: Option<DeliveryStage>,
    running: bool,
}

impl StatusAnimator {
    pub fn start(&mut self) -> StatusTicket {
        self.generation += 1;
        self.stage = Some(DeliveryStage::Prep);
        self.running = true;
        StatusTicket {
            generation: self.generation,
        }
    }

    /// Advance one stage. `None` means the caller must stop rescheduling.
    pub fn tick(&mut self, ticket: StatusTicket) -> Option<DeliveryStage> {
        if !self.running || ticket.generation != self.generation {
            return None;
        }
        let next = self.stage.and_then(DeliveryStage::next);
        match next {
            Some(stage) => {
                self.stage = Some(stage);
                if stage.next().is_none() {
                    self.running = false;
                }
            }
            None => self.running = false,
        }
        next
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.running = false;
    }

    pub fn stage(&self) -> Option<DeliveryStage> {
        self.stage
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_sets_first_stage_immediately() {
        let mut animator = StatusAnimator::default();
        assert_eq!(animator.stage(), None);
        animator.start();
        assert_eq!(animator.stage(), Some(DeliveryStage::Prep));
        assert!(animator.is_running());
    }

    #[test]
    fn ticks_walk_the_sequence_then_stop() {
        let mut animator = StatusAnimator::default();
        let ticket = animator.start();
        assert_eq!(animator.tick(ticket), Some(DeliveryStage::Way));
        assert_eq!(animator.tick(ticket), Some(DeliveryStage::Near));
        assert!(!animator.is_running());
        assert_eq!(animator.tick(ticket), None);
        assert_eq!(animator.stage(), Some(DeliveryStage::Near));
    }

    #[test]
    fn restart_invalidates_previous_ticket() {
        let mut animator = StatusAnimator::default();
        let first = animator.start();
        assert_eq!(animator.tick(first), Some(DeliveryStage::Way));

        let second = animator.start();
        assert_eq!(animator.stage(), Some(DeliveryStage::Prep));
        assert_eq!(animator.tick(first), None);
        assert_eq!(animator.stage(), Some(DeliveryStage::Prep));
        assert_eq!(animator.tick(second), Some(DeliveryStage::Way));
    }

    #[test]
    fn cancel_stops_outstanding_ticks() {
        let mut animator = StatusAnimator::default();
        let ticket = animator.start();
        animator.cancel();
        assert_eq!(animator.tick(ticket), None);
        assert_eq!(animator.stage(), Some(DeliveryStage::Prep));
    }

    #[test]
    fn stage_sequence_is_forward_only() {
        for pair in DeliveryStage::SEQUENCE.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(DeliveryStage::Near.next(), None);
    }
}
