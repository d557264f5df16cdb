//! Series controller: owns the series state and every transition on it.

use super::decision::{decide_series, SeriesDecision};
use super::scheduler::{CycleReport, RoundScheduler};
use super::state::{SeriesSnapshot, SeriesState};
use super::timers::SchedulerEvent;
use crate::config::GameConfig;
use crate::crypto::MessageSigner;
use crate::directory::ParticipantDirectory;
use crate::ledger::WinnerLedger;
use crate::protocol::{ParticipantId, WinnerRecord};
use crate::reward::{RewardDistributor, TransferReceipt};
use crate::transport::ParticipantClient;
use crate::words::{WordList, WordListError};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// External collaborators the controller drives
#[derive(Clone)]
pub struct SeriesDeps {
    pub directory: Arc<dyn ParticipantDirectory>,
    pub participants: Arc<dyn ParticipantClient>,
    pub distributor: Arc<dyn RewardDistributor>,
    pub ledger: Arc<dyn WinnerLedger>,
    pub signer: Arc<MessageSigner>,
    pub words: WordList,
}

/// Why a round ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEndReason {
    /// Every board was won or ran out of guesses
    AllComplete,
    /// The round timer fired
    TimedOut,
}

/// Summary of a finished round
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_number: u32,
    pub reason: RoundEndReason,
    pub winners: Vec<ParticipantId>,
    pub decision: SeriesDecision,
}

/// Result of handling one scheduler event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A guess cycle ran and the round goes on
    Cycle(CycleReport),
    /// The round ended; the next one is already armed
    RoundEnded(RoundSummary),
}

/// Runs rounds back to back, ending series and paying winners.
///
/// All state transitions happen inside [`SeriesController::step`], one
/// event at a time, so nothing else ever observes a half-applied change.
pub struct SeriesController {
    config: GameConfig,
    state: SeriesState,
    scheduler: RoundScheduler,
    distributor: Arc<dyn RewardDistributor>,
    ledger: Arc<dyn WinnerLedger>,
    words: WordList,
    last_winner: Option<ParticipantId>,
    player_count: usize,
    snapshots: watch::Sender<SeriesSnapshot>,
}

impl SeriesController {
    /// Fails when a secret word does not match `config.word_length`
    pub fn new(config: GameConfig, deps: SeriesDeps) -> Result<Self, WordListError> {
        deps.words.check_length(config.word_length)?;

        let state = SeriesState::new(deps.words.choose(), config.max_guesses);
        let scheduler =
            RoundScheduler::new(&config, deps.directory, deps.participants, deps.signer);
        let (snapshots, _) =
            watch::channel(state.snapshot(config.round_duration.as_secs(), None, 0));

        Ok(Self {
            config,
            state,
            scheduler,
            distributor: deps.distributor,
            ledger: deps.ledger,
            words: deps.words,
            last_winner: None,
            player_count: 0,
            snapshots,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &SeriesState {
        &self.state
    }

    pub fn last_winner(&self) -> Option<&ParticipantId> {
        self.last_winner.as_ref()
    }

    /// Snapshots published after every transition
    pub fn subscribe(&self) -> watch::Receiver<SeriesSnapshot> {
        self.snapshots.subscribe()
    }

    /// Arm the first round's timers
    pub async fn start(&mut self) {
        info!(series = %self.state.series_id(), "series started");
        self.scheduler.arm_round().await;
        info!(series = %self.state.series_id(), round = self.state.round_number(), "round started");
        self.publish();
    }

    /// Wait for the next timer event and handle it
    pub async fn step(&mut self) -> StepOutcome {
        let event = self.scheduler.next_event().await;
        self.handle(event).await
    }

    async fn handle(&mut self, event: SchedulerEvent) -> StepOutcome {
        match event {
            SchedulerEvent::GuessCycle(_) => self.guess_cycle().await,
            SchedulerEvent::RoundExpired(_) => {
                StepOutcome::RoundEnded(self.end_round(RoundEndReason::TimedOut).await)
            }
        }
    }

    /// Handle events until `shutdown` resolves, then cancel the timers.
    ///
    /// Shutdown is only observed between events: an event that has started
    /// (including a payout and its ledger write) always runs to completion.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        if !self.scheduler.is_armed() {
            self.start().await;
        }

        tokio::pin!(shutdown);
        loop {
            let event = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                event = self.scheduler.next_event() => event,
            };
            self.handle(event).await;
        }

        self.scheduler.cancel().await;
        info!("series controller stopped");
    }

    async fn guess_cycle(&mut self) -> StepOutcome {
        let report = self.scheduler.run_cycle(&mut self.state).await;
        if let Some(size) = report.roster_size {
            self.player_count = size;
        }

        if self.state.boards().all_complete() {
            return StepOutcome::RoundEnded(self.end_round(RoundEndReason::AllComplete).await);
        }

        self.scheduler.rearm_guess_cycle();
        self.publish();
        StepOutcome::Cycle(report)
    }

    async fn end_round(&mut self, reason: RoundEndReason) -> RoundSummary {
        // Timers must be gone before anything is re-armed
        self.scheduler.cancel().await;

        let round_number = self.state.round_number();
        let winners = self.state.close_round();
        info!(
            series = %self.state.series_id(),
            round = round_number,
            reason = ?reason,
            winners = winners.len(),
            "round ended"
        );

        let decision = decide_series(self.state.win_counts(), self.config.wins_needed);
        match &decision {
            SeriesDecision::Winner { participant, wins } => {
                self.end_series(participant.clone(), *wins).await;
            }
            SeriesDecision::Tied { leaders, wins } => {
                info!(leaders = leaders.len(), wins = *wins, "leaders tied, series continues");
                self.state.begin_round(self.words.choose());
            }
            SeriesDecision::Continue => {
                self.state.begin_round(self.words.choose());
            }
        }

        self.scheduler.arm_round().await;
        info!(series = %self.state.series_id(), round = self.state.round_number(), "round started");
        self.publish();

        RoundSummary {
            round_number,
            reason,
            winners,
            decision,
        }
    }

    async fn end_series(&mut self, winner: ParticipantId, wins: u32) {
        info!(
            series = %self.state.series_id(),
            participant = %winner.abbreviated(),
            wins,
            "series won"
        );

        let receipt = self.pay(&winner).await;
        let record = WinnerRecord {
            participant_id: winner.clone(),
            series_win_count: wins,
            timestamp: Utc::now(),
            transfer_receipt: receipt,
        };
        if let Err(e) = self.ledger.append(record).await {
            error!(participant = %winner.abbreviated(), error = %e, "failed to record series winner");
        }

        self.last_winner = Some(winner);
        self.state = self.state.next_series(self.words.choose());
        info!(series = %self.state.series_id(), "series started");
    }

    /// One transfer attempt, bounded by the transfer timeout
    async fn pay(&self, winner: &ParticipantId) -> Option<TransferReceipt> {
        let amount = self.config.reward_amount;
        let transfer = self.distributor.transfer(winner.as_str(), amount);

        match tokio::time::timeout(self.config.transfer_timeout, transfer).await {
            Ok(Ok(receipt)) => {
                info!(
                    participant = %winner.abbreviated(),
                    amount,
                    signature = %receipt.signature,
                    "reward transferred"
                );
                Some(receipt)
            }
            Ok(Err(e)) => {
                warn!(participant = %winner.abbreviated(), amount, error = %e, "reward transfer failed");
                None
            }
            Err(_) => {
                warn!(
                    participant = %winner.abbreviated(),
                    timeout = ?self.config.transfer_timeout,
                    "reward transfer timed out"
                );
                None
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot(
            self.config.round_duration.as_secs(),
            self.last_winner.clone(),
            self.player_count,
        ));
    }
}
