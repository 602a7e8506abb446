use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use tracing::debug;

use super::{
    EmbedApi, EmbedPlayer, MountId, PlayerEvent, PlayerEventSender, PlayerEvents, PlayerOptions,
    PlayerState, VideoError,
};

/// How a simulated player's position advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Position only changes through seeks and [`SimulatedPlayer::set_position`]
    #[default]
    Manual,

    /// Position advances with the runtime clock while playing, and the
    /// player ends natively at its clip end
    Realtime,
}

/// Behaviour of a [`SimulatedEmbed`].
#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    /// Number of initial load attempts that fail
    pub failed_loads: u32,

    /// Loading never completes
    pub never_ready: bool,

    /// Time a load attempt takes
    pub load_latency: Duration,

    /// Time between construction and the ready notification
    pub ready_latency: Duration,

    /// `play` leaves players paused until [`SimulatedPlayer::allow_playback`]
    pub autoplay_blocked: bool,

    /// Position model
    pub clock: ClockMode,

    /// Position reads that still report the old position after a seek
    pub seek_latency_reads: u32,

    /// `destroy` fails and leaves the player alive
    pub fail_destroy: bool,
}

/// Command received by a simulated player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// `play`
    Play,
    /// `pause`
    Pause,
    /// `stop`
    Stop,
    /// `seek_to`
    Seek(f64),
    /// `mute`
    Mute,
    /// `unmute`
    Unmute,
}

/// Entry in the simulation journal.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    /// A load attempt succeeded
    Loaded,
    /// A load attempt failed
    LoadFailed,
    /// A player was constructed
    Constructed {
        /// Player number
        player: u64,
        /// Mount the player occupies
        mount: MountId,
        /// Source it plays
        source_id: String,
    },
    /// A player was destroyed
    Destroyed {
        /// Player number
        player: u64,
    },
    /// A player received a command
    Command {
        /// Player number
        player: u64,
        /// The command
        command: PlayerCommand,
    },
}

#[derive(Debug, Default)]
struct Shared {
    loaded: AtomicBool,
    load_attempts: AtomicU32,
    next_player: AtomicU64,
    journal: Mutex<Vec<JournalEntry>>,
    players: Mutex<Vec<Arc<SimulatedPlayer>>>,
}

impl Shared {
    fn record(&self, entry: JournalEntry) {
        lock(&self.journal).push(entry);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Headless stand-in for the embedding capability.
///
/// Used by the `simulate` command and by the controller tests. Everything
/// it does is recorded in a journal.
#[derive(Debug, Clone)]
pub struct SimulatedEmbed {
    options: SimulationOptions,
    shared: Arc<Shared>,
}

impl SimulatedEmbed {
    /// Create a simulated embed.
    pub fn new(options: SimulationOptions) -> Self {
        Self {
            options,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Mark the capability as loaded without going through [`EmbedApi::load`].
    pub fn mark_loaded(&self) {
        self.shared.loaded.store(true, Ordering::SeqCst);
    }

    /// Load attempts made so far.
    pub fn load_attempts(&self) -> u32 {
        self.shared.load_attempts.load(Ordering::SeqCst)
    }

    /// Every player ever constructed, oldest first.
    pub fn players(&self) -> Vec<Arc<SimulatedPlayer>> {
        lock(&self.shared.players).clone()
    }

    /// Players that have not been destroyed.
    pub fn live_players(&self) -> Vec<Arc<SimulatedPlayer>> {
        self.players()
            .into_iter()
            .filter(|player| !player.is_destroyed())
            .collect()
    }

    /// Live players on `mount`.
    pub fn live_on(&self, mount: &MountId) -> Vec<Arc<SimulatedPlayer>> {
        self.live_players()
            .into_iter()
            .filter(|player| player.mount() == mount)
            .collect()
    }

    /// Most recently constructed player.
    pub fn latest_player(&self) -> Option<Arc<SimulatedPlayer>> {
        lock(&self.shared.players).last().cloned()
    }

    /// Copy of the journal.
    pub fn journal(&self) -> Vec<JournalEntry> {
        lock(&self.shared.journal).clone()
    }
}

#[async_trait]
impl EmbedApi for SimulatedEmbed {
    async fn load(&self) -> Result<(), VideoError> {
        let attempt = self.shared.load_attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if self.options.never_ready {
            debug!(attempt, "Simulated load hangs");
            std::future::pending::<()>().await;
        }

        if !self.options.load_latency.is_zero() {
            tokio::time::sleep(self.options.load_latency).await;
        }

        if attempt <= self.options.failed_loads {
            self.shared.record(JournalEntry::LoadFailed);
            return Err(VideoError::LoadFailed(format!(
                "simulated script error on attempt {attempt}"
            )));
        }

        self.shared.loaded.store(true, Ordering::SeqCst);
        self.shared.record(JournalEntry::Loaded);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.shared.loaded.load(Ordering::SeqCst)
    }

    fn construct(
        &self,
        mount: &MountId,
        options: PlayerOptions,
    ) -> Result<(Arc<dyn EmbedPlayer>, PlayerEvents), VideoError> {
        if !self.is_loaded() {
            return Err(VideoError::CapabilityUnavailable);
        }

        let id = self.shared.next_player.fetch_add(1, Ordering::SeqCst) + 1;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        self.shared.record(JournalEntry::Constructed {
            player: id,
            mount: mount.clone(),
            source_id: options.source_id.clone(),
        });

        let player = Arc::new_cyclic(|me| SimulatedPlayer {
            id,
            me: me.clone(),
            mount: mount.clone(),
            initially_muted: options.mute,
            clock: Mutex::new(PlayerClock {
                state: PlayerState::Unstarted,
                base: options.start,
                since: None,
                pending_seek: None,
                playback_allowed: !self.options.autoplay_blocked,
                end_watch: None,
            }),
            options,
            sim: self.options.clone(),
            events: events_tx,
            shared: Arc::clone(&self.shared),
        });

        lock(&self.shared.players).push(Arc::clone(&player));

        if self.options.ready_latency.is_zero() {
            player.emit(PlayerEvent::Ready);
        } else {
            let delayed = Arc::clone(&player);
            let latency = self.options.ready_latency;
            tokio::spawn(async move {
                tokio::time::sleep(latency).await;
                if !delayed.is_destroyed() {
                    delayed.emit(PlayerEvent::Ready);
                }
            });
        }

        let player: Arc<dyn EmbedPlayer> = player;
        Ok((player, events_rx))
    }
}

#[derive(Debug)]
struct PlayerClock {
    state: PlayerState,
    base: f64,
    since: Option<Instant>,
    pending_seek: Option<(f64, u32)>,
    playback_allowed: bool,
    end_watch: Option<JoinHandle<()>>,
}

/// A player created by [`SimulatedEmbed`].
#[derive(Debug)]
pub struct SimulatedPlayer {
    id: u64,
    me: Weak<SimulatedPlayer>,
    mount: MountId,
    initially_muted: bool,
    options: PlayerOptions,
    sim: SimulationOptions,
    events: PlayerEventSender,
    shared: Arc<Shared>,
    clock: Mutex<PlayerClock>,
}

impl SimulatedPlayer {
    /// Player number, starting at 1.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Mount the player occupies.
    pub fn mount(&self) -> &MountId {
        &self.mount
    }

    /// Options the player was constructed with.
    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    /// Whether the player was destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.shared.journal_contains(&JournalEntry::Destroyed { player: self.id })
    }

    /// Whether audio is muted, following mute/unmute commands.
    pub fn is_muted(&self) -> bool {
        self.commands()
            .iter()
            .rev()
            .find_map(|command| match command {
                PlayerCommand::Mute => Some(true),
                PlayerCommand::Unmute => Some(false),
                _ => None,
            })
            .unwrap_or(self.initially_muted)
    }

    /// Commands this player received, in order.
    pub fn commands(&self) -> Vec<PlayerCommand> {
        lock(&self.shared.journal)
            .iter()
            .filter_map(|entry| match entry {
                JournalEntry::Command { player, command } if *player == self.id => {
                    Some(command.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Number of seeks this player received.
    pub fn seek_count(&self) -> usize {
        self.commands()
            .iter()
            .filter(|command| matches!(command, PlayerCommand::Seek(_)))
            .count()
    }

    /// Current state without recording a command.
    pub fn state(&self) -> PlayerState {
        lock(&self.clock).state
    }

    /// Deliver a notification as if the embed raised it.
    pub fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    /// Move the playhead, as if playback had advanced to `seconds`.
    pub fn set_position(&self, seconds: f64) {
        let mut clock = lock(&self.clock);
        clock.base = seconds;
        if clock.since.is_some() {
            clock.since = Some(Instant::now());
        }
    }

    /// Let `play` start playback from now on, as after a user gesture.
    pub fn allow_playback(&self) {
        lock(&self.clock).playback_allowed = true;
    }

    fn record(&self, command: PlayerCommand) {
        self.shared.record(JournalEntry::Command {
            player: self.id,
            command,
        });
    }

    fn ensure_alive(&self, command: &'static str) -> Result<(), VideoError> {
        if self.is_destroyed() {
            debug!(player = self.id, command, "Command on destroyed simulated player");
            return Err(VideoError::PlayerDestroyed);
        }
        Ok(())
    }

    fn position_at(clock: &PlayerClock, now: Instant) -> f64 {
        match clock.since {
            Some(since) => clock.base + now.duration_since(since).as_secs_f64(),
            None => clock.base,
        }
    }

    fn settle(clock: &mut PlayerClock) {
        let now = Instant::now();
        clock.base = Self::position_at(clock, now);
        clock.since = None;
    }

    fn transition(&self, clock: &mut PlayerClock, state: PlayerState) {
        if clock.state != state {
            clock.state = state;
            self.emit(PlayerEvent::StateChange(state));
        }
    }

    fn watch_clip_end(&self, clock: &mut PlayerClock) {
        if self.sim.clock != ClockMode::Realtime {
            return;
        }
        let (Some(end), Some(player)) = (self.options.end, self.me.upgrade()) else {
            return;
        };

        let remaining = (end - Self::position_at(clock, Instant::now())).max(0.0);
        if let Some(previous) = clock.end_watch.take() {
            previous.abort();
        }

        clock.end_watch = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs_f64(remaining)).await;
            let mut clock = lock(&player.clock);
            if clock.state == PlayerState::Playing {
                clock.base = end;
                clock.since = None;
                player.transition(&mut clock, PlayerState::Ended);
            }
        }));
    }
}

impl Shared {
    fn journal_contains(&self, entry: &JournalEntry) -> bool {
        lock(&self.journal).contains(entry)
    }
}

impl EmbedPlayer for SimulatedPlayer {
    fn play(&self) -> Result<(), VideoError> {
        self.ensure_alive("play")?;
        self.record(PlayerCommand::Play);

        let mut clock = lock(&self.clock);
        if !clock.playback_allowed {
            Self::settle(&mut clock);
            self.transition(&mut clock, PlayerState::Paused);
            return Ok(());
        }

        if clock.state != PlayerState::Playing && self.sim.clock == ClockMode::Realtime {
            clock.since = Some(Instant::now());
        }
        self.transition(&mut clock, PlayerState::Playing);

        self.watch_clip_end(&mut clock);
        Ok(())
    }

    fn pause(&self) -> Result<(), VideoError> {
        self.ensure_alive("pause")?;
        self.record(PlayerCommand::Pause);

        let mut clock = lock(&self.clock);
        Self::settle(&mut clock);
        if let Some(watch) = clock.end_watch.take() {
            watch.abort();
        }
        self.transition(&mut clock, PlayerState::Paused);
        Ok(())
    }

    fn stop(&self) -> Result<(), VideoError> {
        self.ensure_alive("stop")?;
        self.record(PlayerCommand::Stop);

        let mut clock = lock(&self.clock);
        Self::settle(&mut clock);
        if let Some(watch) = clock.end_watch.take() {
            watch.abort();
        }
        clock.state = PlayerState::Cued;
        Ok(())
    }

    fn seek_to(&self, seconds: f64, _allow_seek_ahead: bool) -> Result<(), VideoError> {
        self.ensure_alive("seek_to")?;
        self.record(PlayerCommand::Seek(seconds));

        let mut clock = lock(&self.clock);
        if self.sim.seek_latency_reads > 0 {
            clock.pending_seek = Some((seconds, self.sim.seek_latency_reads));
        } else {
            clock.base = seconds;
            if clock.since.is_some() {
                clock.since = Some(Instant::now());
            }
            if clock.state == PlayerState::Playing {
                self.watch_clip_end(&mut clock);
            }
        }
        Ok(())
    }

    fn mute(&self) -> Result<(), VideoError> {
        self.ensure_alive("mute")?;
        self.record(PlayerCommand::Mute);
        Ok(())
    }

    fn unmute(&self) -> Result<(), VideoError> {
        self.ensure_alive("unmute")?;
        self.record(PlayerCommand::Unmute);
        Ok(())
    }

    fn current_time(&self) -> Result<f64, VideoError> {
        self.ensure_alive("current_time")?;

        let mut clock = lock(&self.clock);
        let position = Self::position_at(&clock, Instant::now());

        if let Some((target, reads)) = clock.pending_seek {
            if reads <= 1 {
                clock.pending_seek = None;
                clock.base = target;
                if clock.since.is_some() {
                    clock.since = Some(Instant::now());
                }
            } else {
                clock.pending_seek = Some((target, reads - 1));
            }
        }

        Ok(match self.options.end {
            Some(end) if self.sim.clock == ClockMode::Realtime => position.min(end),
            _ => position,
        })
    }

    fn player_state(&self) -> Result<PlayerState, VideoError> {
        self.ensure_alive("player_state")?;
        Ok(lock(&self.clock).state)
    }

    fn destroy(&self) -> Result<(), VideoError> {
        if self.sim.fail_destroy {
            return Err(VideoError::CommandFailed {
                command: "destroy",
                details: String::from("simulated destroy failure"),
            });
        }
        self.ensure_alive("destroy")?;

        if let Some(watch) = lock(&self.clock).end_watch.take() {
            watch.abort();
        }
        self.shared
            .record(JournalEntry::Destroyed { player: self.id });
        Ok(())
    }
}
