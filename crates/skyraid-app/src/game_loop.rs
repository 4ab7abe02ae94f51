//! Game loop thread: ticks the current level every 50 ms and publishes snapshots.
//!
//! The level is built inside this thread from the campaign. Commands arrive via
//! an `mpsc` channel. Snapshots are stored in shared state for synchronous
//! polling. When a level's exit window closes, the campaign picks the next one.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use skyraid_campaign::{Campaign, Navigation};
use skyraid_core::config::LevelId;
use skyraid_core::constants::{LEVEL_TRANSITION_MILLIS, TICK_MILLIS};
use skyraid_core::enums::RunState;
use skyraid_core::state::GameStateSnapshot;
use skyraid_sim::clock::ManualClock;
use skyraid_sim::Level;

use crate::autopilot::Autopilot;
use crate::state::{GameLoopCommand, LoopHandle};

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_millis(TICK_MILLIS);

/// Ticks spent in `Transitioning` before the exit window closes.
pub const TRANSITION_TICKS: u64 = LEVEL_TRANSITION_MILLIS / TICK_MILLIS;

/// How the loop paces itself.
#[derive(Debug, Clone)]
pub enum Pacing {
    /// Sleep to each 50 ms boundary. Levels should read a monotonic clock.
    Realtime,
    /// Tick back to back, advancing this clock by one tick after each.
    Simulated(ManualClock),
}

#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub pacing: Pacing,
    /// Stop after this many loop iterations.
    pub max_ticks: Option<u64>,
    /// Feed autopilot commands into the level every tick.
    pub autopilot: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            pacing: Pacing::Simulated(ManualClock::new()),
            max_ticks: None,
            autopilot: false,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The final level was cleared.
    CampaignComplete,
    /// The user plane was shot down.
    Defeated,
    TickLimit,
    Shutdown,
    /// Every command sender was dropped.
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub outcome: LoopOutcome,
    pub ticks: u64,
    /// Level that was current when the loop stopped.
    pub level: LevelId,
    pub levels_cleared: u32,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle, which yields the run
/// summary once the loop stops.
pub fn spawn_game_loop(
    campaign: Campaign,
    options: LoopOptions,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, LoopHandle)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("skyraid-game-loop".into())
        .spawn(move || run_game_loop(campaign, options, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the campaign ends, the tick limit is reached,
/// a Shutdown command arrives or the channel disconnects.
pub fn run_game_loop(
    mut campaign: Campaign,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> anyhow::Result<LoopSummary> {
    let mut level = start_level(&campaign)?;
    let autopilot = options.autopilot.then(Autopilot::default);
    let mut last: Option<GameStateSnapshot> = None;
    let mut ticks = 0u64;
    let mut levels_cleared = 0u32;
    let mut transition_ticks = 0u64;
    let mut next_tick_time = Instant::now();

    let outcome = loop {
        // 1. Drain all pending commands
        if let Some(outcome) = drain_commands(&cmd_rx, &mut level) {
            break outcome;
        }

        // 2. Autopilot reacts to the previous snapshot
        if let (Some(pilot), Some(snapshot)) = (&autopilot, &last) {
            level.queue_commands(pilot.decide(snapshot));
        }

        // 3. Advance one tick (the level handles pause semantics internally)
        let snapshot = level.tick()?;
        ticks += 1;
        if let Pacing::Simulated(clock) = &options.pacing {
            clock.advance(TICK_MILLIS);
        }

        // 4. Close the exit window once the transition has played out
        let mut lifecycle = snapshot.lifecycle.clone();
        if snapshot.state == RunState::Transitioning {
            transition_ticks += 1;
            if transition_ticks >= TRANSITION_TICKS {
                lifecycle = Some(level.finish_transition()?);
            }
        }

        // 5. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        last = Some(snapshot);

        // 6. Route lifecycle events through the campaign
        if let Some(event) = lifecycle {
            match campaign.route(&event)? {
                Navigation::Next(_) => {
                    levels_cleared += 1;
                    level = start_level(&campaign)?;
                    transition_ticks = 0;
                    last = None;
                }
                Navigation::Finished => {
                    levels_cleared += 1;
                    break LoopOutcome::CampaignComplete;
                }
                Navigation::Defeated => break LoopOutcome::Defeated,
            }
        }

        if options.max_ticks.is_some_and(|max| ticks >= max) {
            break LoopOutcome::TickLimit;
        }

        // 7. Sleep until next tick
        if let Pacing::Realtime = options.pacing {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind: reset instead of spiralling into catch-up
                next_tick_time = now;
            }
        }
    };

    let summary = LoopSummary {
        outcome,
        ticks,
        level: campaign.current().clone(),
        levels_cleared,
    };
    tracing::info!(
        outcome = ?summary.outcome,
        ticks = summary.ticks,
        level = %summary.level,
        levels_cleared = summary.levels_cleared,
        "game loop stopped"
    );
    Ok(summary)
}

/// Forward queued commands to the level. Returns an outcome when the loop
/// must stop.
fn drain_commands(
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    level: &mut Level,
) -> Option<LoopOutcome> {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::PlayerCommand(cmd)) => level.queue_command(cmd),
            Ok(GameLoopCommand::Shutdown) => return Some(LoopOutcome::Shutdown),
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => return Some(LoopOutcome::Disconnected),
        }
    }
}

fn start_level(campaign: &Campaign) -> anyhow::Result<Level> {
    let mut level = campaign.build_current()?;
    level.start();
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyraid_campaign::LevelRegistry;
    use skyraid_core::commands::PlayerCommand;
    use skyraid_sim::clock::Clock;
    use skyraid_sim::SimConfig;

    fn standard_campaign(clock: &ManualClock) -> Campaign {
        Campaign::from_first(
            LevelRegistry::standard(),
            SimConfig::default(),
            Arc::new(clock.clone()),
        )
        .unwrap()
    }

    fn simulated(clock: &ManualClock, max_ticks: u64) -> LoopOptions {
        LoopOptions {
            pacing: Pacing::Simulated(clock.clone()),
            max_ticks: Some(max_ticks),
            autopilot: false,
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Start))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::Start)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_snapshot_serialization() {
        let clock = ManualClock::new();
        let campaign = standard_campaign(&clock);
        let mut level = start_level(&campaign).unwrap();

        for _ in 0..50 {
            level.tick().unwrap();
            clock.advance(TICK_MILLIS);
        }

        let snapshot = level.tick().unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"level\":\"level-one\""));
        assert!(json.contains("\"state\":\"Running\""));
    }

    #[test]
    fn test_pause_resume_via_commands() {
        let clock = ManualClock::new();
        let campaign = standard_campaign(&clock);
        let mut level = start_level(&campaign).unwrap();

        let snap = level.tick().unwrap();
        assert_eq!(snap.state, RunState::Running);

        // Pause
        level.queue_command(PlayerCommand::Pause);
        let snap = level.tick().unwrap();
        assert_eq!(snap.state, RunState::Paused);
        let paused_tick = snap.time.tick;

        // Tick while paused: time should not advance
        let snap = level.tick().unwrap();
        assert_eq!(snap.time.tick, paused_tick);

        // Resume
        level.queue_command(PlayerCommand::Resume);
        let snap = level.tick().unwrap();
        assert_eq!(snap.state, RunState::Running);
        assert!(snap.time.tick > paused_tick);
    }

    #[test]
    fn test_tick_duration_constant() {
        // 20Hz = 50ms per tick
        assert_eq!(TICK_DURATION.as_millis(), 50);
        assert_eq!(TRANSITION_TICKS, 20);
    }

    #[test]
    fn test_loop_stops_at_tick_limit() {
        let clock = ManualClock::new();
        let (_tx, rx) = mpsc::channel::<GameLoopCommand>();
        let latest = Mutex::new(None);

        let summary =
            run_game_loop(standard_campaign(&clock), simulated(&clock, 30), rx, &latest).unwrap();

        assert_eq!(summary.outcome, LoopOutcome::TickLimit);
        assert_eq!(summary.ticks, 30);
        assert_eq!(summary.level.as_str(), "level-one");
        assert_eq!(summary.levels_cleared, 0);

        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.time.tick, 30);
        // The simulated clock moved one tick per iteration
        assert_eq!(clock.now(), Duration::from_millis(30 * TICK_MILLIS));
    }

    #[test]
    fn test_shutdown_before_first_tick() {
        let clock = ManualClock::new();
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Shutdown).unwrap();
        let latest = Mutex::new(None);

        let summary =
            run_game_loop(standard_campaign(&clock), simulated(&clock, 30), rx, &latest).unwrap();

        assert_eq!(summary.outcome, LoopOutcome::Shutdown);
        assert_eq!(summary.ticks, 0);
        assert!(latest.lock().unwrap().is_none());
    }

    #[test]
    fn test_disconnected_channel_stops_loop() {
        let clock = ManualClock::new();
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        drop(tx);
        let latest = Mutex::new(None);

        let summary =
            run_game_loop(standard_campaign(&clock), simulated(&clock, 30), rx, &latest).unwrap();
        assert_eq!(summary.outcome, LoopOutcome::Disconnected);
    }

    #[test]
    fn test_forwarded_pause_freezes_level() {
        let clock = ManualClock::new();
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        let latest = Mutex::new(None);

        let summary =
            run_game_loop(standard_campaign(&clock), simulated(&clock, 10), rx, &latest).unwrap();

        assert_eq!(summary.ticks, 10);
        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.state, RunState::Paused);
        assert_eq!(snapshot.time.tick, 0);
    }

    #[test]
    fn test_spawned_thread_reports_summary() {
        let clock = ManualClock::new();
        let latest = Arc::new(Mutex::new(None));

        let (tx, handle) = spawn_game_loop(
            standard_campaign(&clock),
            simulated(&clock, 5),
            Arc::clone(&latest),
        )
        .unwrap();

        let summary = handle.join().unwrap().unwrap();
        drop(tx);
        assert_eq!(summary.outcome, LoopOutcome::TickLimit);
        assert_eq!(summary.ticks, 5);
        assert!(latest.lock().unwrap().is_some());
    }
}
