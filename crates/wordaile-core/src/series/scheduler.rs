//! Round scheduler: timers and guess cycles.

use super::state::{GuessRejected, SeriesState};
use super::timers::{RoundEpoch, SchedulerEvent, TimerHandle};
use crate::config::GameConfig;
use crate::crypto::{MessageSigner, SignedEnvelope};
use crate::directory::ParticipantDirectory;
use crate::game::RecordOutcome;
use crate::protocol::{BoardBroadcast, Participant, ParticipantId};
use crate::transport::{ParticipantClient, ParticipantError};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// What a single guess cycle did
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Roster size, or `None` when the directory could not be read
    pub roster_size: Option<usize>,
    /// Participants actually asked for a guess
    pub polled: usize,
    /// Guesses recorded on a board
    pub accepted: usize,
    /// Replies that were invalid or arrived for a finished board
    pub rejected: usize,
    /// Participants that errored or timed out
    pub failed: usize,
    /// Participants who won the round this cycle
    pub winners: Vec<ParticipantId>,
}

/// Drives the guess-cycle and round timers and runs guess cycles
pub struct RoundScheduler {
    guess_interval: Duration,
    round_duration: Duration,
    response_timeout: Duration,
    directory: Arc<dyn ParticipantDirectory>,
    participants: Arc<dyn ParticipantClient>,
    signer: Arc<MessageSigner>,
    events_tx: UnboundedSender<SchedulerEvent>,
    events_rx: UnboundedReceiver<SchedulerEvent>,
    last_epoch: Option<RoundEpoch>,
    active_epoch: Option<RoundEpoch>,
    guess_timer: Option<TimerHandle>,
    round_timer: Option<TimerHandle>,
}

impl RoundScheduler {
    pub fn new(
        config: &GameConfig,
        directory: Arc<dyn ParticipantDirectory>,
        participants: Arc<dyn ParticipantClient>,
        signer: Arc<MessageSigner>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            guess_interval: config.guess_interval,
            round_duration: config.round_duration,
            response_timeout: config.response_timeout,
            directory,
            participants,
            signer,
            events_tx,
            events_rx,
            last_epoch: None,
            active_epoch: None,
            guess_timer: None,
            round_timer: None,
        }
    }

    /// Epoch of the armed round, if any
    pub fn active_epoch(&self) -> Option<RoundEpoch> {
        self.active_epoch
    }

    pub fn is_armed(&self) -> bool {
        self.active_epoch.is_some()
    }

    /// Arm a new round: an immediate guess cycle plus the round timer.
    /// Any previous round's timers are cancelled first.
    pub async fn arm_round(&mut self) -> RoundEpoch {
        if self.is_armed() {
            self.cancel().await;
        }

        let epoch = self.last_epoch.map_or_else(RoundEpoch::first, RoundEpoch::next);
        self.last_epoch = Some(epoch);
        self.active_epoch = Some(epoch);

        self.guess_timer = Some(TimerHandle::spawn(
            Duration::ZERO,
            SchedulerEvent::GuessCycle(epoch),
            self.events_tx.clone(),
        ));
        self.round_timer = Some(TimerHandle::spawn(
            self.round_duration,
            SchedulerEvent::RoundExpired(epoch),
            self.events_tx.clone(),
        ));

        debug!(epoch = ?epoch, "round timers armed");
        epoch
    }

    /// Schedule the next guess cycle of the armed round
    pub fn rearm_guess_cycle(&mut self) {
        if let Some(epoch) = self.active_epoch {
            self.guess_timer = Some(TimerHandle::spawn(
                self.guess_interval,
                SchedulerEvent::GuessCycle(epoch),
                self.events_tx.clone(),
            ));
        }
    }

    /// Cancel both timers and wait for them to stop
    pub async fn cancel(&mut self) {
        self.active_epoch = None;
        if let Some(timer) = self.guess_timer.take() {
            timer.cancel().await;
        }
        if let Some(timer) = self.round_timer.take() {
            timer.cancel().await;
        }
    }

    /// Next event belonging to the armed round. Stale events are dropped.
    pub async fn next_event(&mut self) -> SchedulerEvent {
        while let Some(event) = self.events_rx.recv().await {
            if Some(event.epoch()) == self.active_epoch {
                return event;
            }
            debug!(event = ?event, "dropping stale timer event");
        }
        // The scheduler holds a sender, so the channel never closes
        std::future::pending().await
    }

    /// Poll every reachable participant once and record their guesses
    pub async fn run_cycle(&self, state: &mut SeriesState) -> CycleReport {
        let roster = match self.directory.list_active().await {
            Ok(roster) => roster,
            Err(e) => {
                warn!(round = state.round_number(), error = %e, "participant directory unavailable, skipping cycle");
                return CycleReport::default();
            }
        };

        let mut report = CycleReport {
            roster_size: Some(roster.len()),
            ..CycleReport::default()
        };

        let outbound: Vec<(&Participant, SignedEnvelope<BoardBroadcast>)> = roster
            .iter()
            .filter(|p| p.is_reachable())
            .filter_map(|p| {
                let broadcast = BoardBroadcast {
                    board_state: state.boards().snapshot_of(&p.id),
                    round_number: state.round_number(),
                };
                match self.signer.sign(broadcast) {
                    Ok(envelope) => Some((p, envelope)),
                    Err(e) => {
                        warn!(participant = %p.id.abbreviated(), error = %e, "failed to sign broadcast");
                        None
                    }
                }
            })
            .collect();
        report.polled = outbound.len();

        let replies = join_all(
            outbound
                .iter()
                .map(|(participant, envelope)| self.request(participant, envelope)),
        )
        .await;

        // All replies are in; apply them in roster order
        for ((participant, _), reply) in outbound.iter().zip(replies) {
            let id = &participant.id;
            let raw = match reply {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(participant = %id.abbreviated(), error = %e, "no guess this cycle");
                    report.failed += 1;
                    continue;
                }
            };

            match state.apply_guess(id, &raw) {
                Ok(RecordOutcome::Won) => {
                    info!(participant = %id.abbreviated(), round = state.round_number(), "round won");
                    report.accepted += 1;
                    report.winners.push(id.clone());
                }
                Ok(_) => report.accepted += 1,
                Err(GuessRejected::Invalid(e)) => {
                    debug!(participant = %id.abbreviated(), guess = %raw, error = %e, "invalid guess discarded");
                    report.rejected += 1;
                }
                Err(GuessRejected::Board(e)) => {
                    debug!(participant = %id.abbreviated(), error = %e, "guess for finished board ignored");
                    report.rejected += 1;
                }
            }
        }

        report
    }

    async fn request(
        &self,
        participant: &Participant,
        envelope: &SignedEnvelope<BoardBroadcast>,
    ) -> Result<String, ParticipantError> {
        tokio::time::timeout(
            self.response_timeout,
            self.participants.request_guess(participant, envelope),
        )
        .await
        .map_err(|_| ParticipantError::Timeout(self.response_timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryError, StaticDirectory};
    use crate::game::Word;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers with a fixed guess per participant id; unknown ids fail
    struct FixedGuesses {
        guesses: HashMap<String, String>,
        delay: Duration,
        seen: Mutex<Vec<BoardBroadcast>>,
    }

    impl FixedGuesses {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                guesses: entries
                    .iter()
                    .map(|(id, g)| (id.to_string(), g.to_string()))
                    .collect(),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ParticipantClient for FixedGuesses {
        async fn request_guess(
            &self,
            participant: &Participant,
            envelope: &SignedEnvelope<BoardBroadcast>,
        ) -> Result<String, ParticipantError> {
            self.seen.lock().unwrap().push(envelope.payload.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.guesses
                .get(participant.id.as_str())
                .cloned()
                .ok_or_else(|| ParticipantError::Unreachable("connection refused".into()))
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl ParticipantDirectory for BrokenDirectory {
        async fn list_active(&self) -> Result<Vec<Participant>, DirectoryError> {
            Err(DirectoryError::Network("down".into()))
        }
    }

    fn scheduler(
        directory: Arc<dyn ParticipantDirectory>,
        client: Arc<dyn ParticipantClient>,
    ) -> RoundScheduler {
        RoundScheduler::new(
            &GameConfig::default(),
            directory,
            client,
            Arc::new(MessageSigner::random()),
        )
    }

    fn state() -> SeriesState {
        SeriesState::new(Word::parse("CRANE").unwrap(), 5)
    }

    #[tokio::test]
    async fn test_cycle_isolates_failures() {
        let directory = StaticDirectory::new(vec![
            Participant::active("alice", "http://alice"),
            Participant::active("bob", "http://bob"),
            Participant::active("carol", "http://carol"),
            Participant::active("dave", "http://dave"),
        ]);
        let client = FixedGuesses::new(&[("alice", "CRANE"), ("bob", "SLATE"), ("carol", "TOOLONG")]);
        let scheduler = scheduler(Arc::new(directory), Arc::new(client));
        let mut state = state();

        let report = scheduler.run_cycle(&mut state).await;

        assert_eq!(report.roster_size, Some(4));
        assert_eq!(report.polled, 4);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.winners, vec![ParticipantId::from("alice")]);

        assert!(state.round_winners().contains(&ParticipantId::from("alice")));
        assert_eq!(state.boards().len(), 2, "no board for invalid or failed replies");
    }

    #[tokio::test]
    async fn test_unreachable_participants_are_not_polled() {
        let mut paused = Participant::active("paused", "http://paused");
        paused.status = crate::protocol::SubscriptionStatus::Paused;
        let mut no_endpoint = Participant::active("silent", "");
        no_endpoint.endpoint = None;

        let directory = StaticDirectory::new(vec![paused, no_endpoint]);
        let client = Arc::new(FixedGuesses::new(&[("paused", "CRANE"), ("silent", "CRANE")]));
        let scheduler = scheduler(Arc::new(directory), client.clone());
        let mut state = state();

        let report = scheduler.run_cycle(&mut state).await;

        assert_eq!(report.roster_size, Some(2));
        assert_eq!(report.polled, 0);
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_directory_failure_skips_cycle() {
        let client = Arc::new(FixedGuesses::new(&[]));
        let scheduler = scheduler(Arc::new(BrokenDirectory), client);
        let mut state = state();

        let report = scheduler.run_cycle(&mut state).await;

        assert_eq!(report, CycleReport::default());
        assert!(state.boards().is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_carries_board_and_round() {
        let directory = StaticDirectory::new(vec![Participant::active("bob", "http://bob")]);
        let client = Arc::new(FixedGuesses::new(&[("bob", "SLATE")]));
        let scheduler = scheduler(Arc::new(directory), client.clone());
        let mut state = state();

        scheduler.run_cycle(&mut state).await;
        scheduler.run_cycle(&mut state).await;

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].round_number, 1);
        assert_eq!(seen[0].board_state.guess_count(), 0);
        assert_eq!(seen[1].board_state.guess_count(), 1);
        assert_eq!(seen[1].board_state.guesses()[0].as_str(), "SLATE");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_participant_times_out() {
        let directory = StaticDirectory::new(vec![Participant::active("slow", "http://slow")]);
        let mut client = FixedGuesses::new(&[("slow", "CRANE")]);
        client.delay = Duration::from_secs(60);
        let scheduler = scheduler(Arc::new(directory), Arc::new(client));
        let mut state = state();

        let start = tokio::time::Instant::now();
        let report = scheduler.run_cycle(&mut state).await;

        assert_eq!(report.failed, 1);
        assert!(start.elapsed() < Duration::from_secs(60));
        assert!(state.boards().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_events_are_dropped() {
        let directory = StaticDirectory::default();
        let mut scheduler = scheduler(Arc::new(directory), Arc::new(FixedGuesses::new(&[])));

        let first = scheduler.arm_round().await;
        // Queue a stale event by hand, then move on to a new round
        scheduler
            .events_tx
            .send(SchedulerEvent::RoundExpired(first))
            .unwrap();
        let second = scheduler.arm_round().await;
        assert_ne!(first, second);

        let event = scheduler.next_event().await;
        assert_eq!(event, SchedulerEvent::GuessCycle(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_timer_fires_after_round_duration() {
        let directory = StaticDirectory::default();
        let mut scheduler = scheduler(Arc::new(directory), Arc::new(FixedGuesses::new(&[])));

        let start = tokio::time::Instant::now();
        let epoch = scheduler.arm_round().await;
        assert_eq!(scheduler.next_event().await, SchedulerEvent::GuessCycle(epoch));

        // Without re-arming, only the round timer remains
        assert_eq!(scheduler.next_event().await, SchedulerEvent::RoundExpired(epoch));
        assert!(start.elapsed() >= GameConfig::default().round_duration);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_disarms() {
        let directory = StaticDirectory::default();
        let mut scheduler = scheduler(Arc::new(directory), Arc::new(FixedGuesses::new(&[])));

        scheduler.arm_round().await;
        scheduler.cancel().await;
        assert!(!scheduler.is_armed());

        // Re-arming after cancel does nothing without an armed round
        scheduler.rearm_guess_cycle();
        assert!(scheduler.guess_timer.is_none());
    }
}
