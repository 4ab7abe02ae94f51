//! Application state shared between the controlling thread and the game loop.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Context};

use skyraid_campaign::Campaign;
use skyraid_core::commands::PlayerCommand;
use skyraid_core::state::GameStateSnapshot;

use crate::game_loop::{self, LoopOptions, LoopSummary};

/// Commands sent from the controlling thread to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the current level.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to the game loop thread, returned by [`AppState::start`].
pub type LoopHandle = JoinHandle<anyhow::Result<LoopSummary>>;

/// Shared application state.
///
/// - `mpsc::Sender` sits behind a `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` for the sender, which only exists once started
/// - `Arc<Mutex<...>>` for the latest snapshot (shared with the loop thread)
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    /// `None` before [`AppState::start`] is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling.
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    /// Whether the game loop has been started.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop thread for `campaign`. Fails if already started.
    pub fn start(&self, campaign: Campaign, options: LoopOptions) -> anyhow::Result<LoopHandle> {
        let mut running = self
            .running
            .lock()
            .map_err(|e| anyhow!("running flag poisoned: {e}"))?;

        if *running {
            bail!("simulation already running");
        }

        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(campaign, options, Arc::clone(&self.latest_snapshot))
                .context("failed to spawn game loop thread")?;

        let mut tx_lock = self
            .command_tx
            .lock()
            .map_err(|e| anyhow!("command sender poisoned: {e}"))?;
        *tx_lock = Some(cmd_tx);
        *running = true;

        Ok(handle)
    }

    /// Forward a player command to the game loop.
    pub fn send_command(&self, command: PlayerCommand) -> anyhow::Result<()> {
        self.send(GameLoopCommand::PlayerCommand(command))
    }

    /// Ask the game loop to stop after its current tick.
    pub fn shutdown(&self) -> anyhow::Result<()> {
        self.send(GameLoopCommand::Shutdown)
    }

    /// The most recent snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> anyhow::Result<Option<GameStateSnapshot>> {
        let lock = self
            .latest_snapshot
            .lock()
            .map_err(|e| anyhow!("snapshot poisoned: {e}"))?;
        Ok(lock.clone())
    }

    fn send(&self, command: GameLoopCommand) -> anyhow::Result<()> {
        let tx_lock = self
            .command_tx
            .lock()
            .map_err(|e| anyhow!("command sender poisoned: {e}"))?;

        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(command)
                .map_err(|e| anyhow!("failed to send command: {e}")),
            None => bail!("simulation not started"),
        }
    }
}
