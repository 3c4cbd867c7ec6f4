//! Game loop
//!
//! The game state lives on exactly one thread. Other threads (window events,
//! touch handlers, tests) talk to it only through a bounded command channel,
//! which the loop drains at the start of every tick. Ticks run at a fixed
//! interval; a late tick is not made up for, the next one is simply
//! scheduled one interval later.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use glam::Vec2;

use crate::input::{DragTracker, PointerId};
use crate::render::{Frame, Renderer};
use crate::settings::Settings;
use crate::sim::{GameState, Playfield, tick};

/// Input for the loop thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    DragBegin { pointer: PointerId, x: f32, y: f32 },
    DragMove { pointer: PointerId, x: f32, y: f32 },
    DragEnd { pointer: PointerId },
    /// Host geometry changed
    Resize { width: f32, height: f32 },
    Shutdown,
}

/// Cloneable handle for submitting commands to a running loop
#[derive(Debug, Clone)]
pub struct InputSender {
    sender: Sender<Command>,
}

impl InputSender {
    /// Try to submit a command (non-blocking)
    ///
    /// Returns false if the buffer is full or the loop has exited
    pub fn try_submit(&self, command: Command) -> bool {
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                log::warn!("Input buffer full, dropping {:?}", command);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn drag_begin(&self, pointer: PointerId, x: f32, y: f32) -> bool {
        self.try_submit(Command::DragBegin { pointer, x, y })
    }

    pub fn drag_move(&self, pointer: PointerId, x: f32, y: f32) -> bool {
        self.try_submit(Command::DragMove { pointer, x, y })
    }

    pub fn drag_end(&self, pointer: PointerId) -> bool {
        self.try_submit(Command::DragEnd { pointer })
    }

    pub fn resize(&self, width: f32, height: f32) -> bool {
        self.try_submit(Command::Resize { width, height })
    }
}

/// Owns the game state and advances it one tick at a time
pub struct GameLoop {
    state: GameState,
    drags: DragTracker,
    interval: Duration,
    sender: Sender<Command>,
    receiver: Receiver<Command>,
}

impl GameLoop {
    /// Wrap an existing state; the state should already be initialized
    pub fn new(state: GameState, settings: &Settings) -> Self {
        let (sender, receiver) = bounded(settings.input_capacity.max(1));
        Self {
            state,
            drags: DragTracker::new(),
            interval: settings.tick_interval(),
            sender,
            receiver,
        }
    }

    /// Build a fresh game laid out on the configured screen
    pub fn from_settings(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("New game with seed {}", seed);
        let state = GameState::with_playfield(seed, settings.rules(), settings.playfield());
        Self::new(state, settings)
    }

    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply all pending commands; false once a shutdown was seen
    fn drain_input(&mut self) -> bool {
        let mut running = true;
        while let Ok(command) = self.receiver.try_recv() {
            match command {
                Command::DragBegin { pointer, x, y } => {
                    self.drags.begin(pointer, Vec2::new(x, y), &mut self.state);
                }
                Command::DragMove { pointer, x, y } => {
                    self.drags.moved(pointer, Vec2::new(x, y), &mut self.state);
                }
                Command::DragEnd { pointer } => {
                    self.drags.end(pointer, &mut self.state);
                }
                Command::Resize { width, height } => {
                    self.state.initialize(Playfield::new(width, height));
                }
                Command::Shutdown => running = false,
            }
        }
        running
    }

    /// Drain input, run one tick and render it
    ///
    /// Returns false (without ticking) once a shutdown has been received.
    pub fn step<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> bool {
        if !self.drain_input() {
            return false;
        }
        let events = tick(&mut self.state);
        renderer.render(&Frame::capture(&self.state, events));
        true
    }

    /// Run `ticks` ticks back to back, without pacing
    pub fn run_ticks<R: Renderer + ?Sized>(&mut self, ticks: u32, renderer: &mut R) -> u32 {
        let mut ran = 0;
        while ran < ticks && self.step(renderer) {
            ran += 1;
        }
        ran
    }

    /// Tick at the configured interval until a shutdown arrives
    pub fn run<R: Renderer + ?Sized>(mut self, renderer: &mut R) -> GameState {
        log::info!(
            "Game loop running at {} ms per tick",
            self.interval.as_millis()
        );

        let mut next = Instant::now() + self.interval;
        while self.step(renderer) {
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
                next += self.interval;
            } else {
                next = now + self.interval;
            }
        }

        self.drags.release_all(&mut self.state);
        log::info!(
            "Game loop stopped after {} ticks ({} - {})",
            self.state.time_ticks,
            self.state.score.left,
            self.state.score.right
        );
        self.state
    }

    /// Run the loop on its own thread
    pub fn spawn<R: Renderer + Send + 'static>(self, mut renderer: R) -> LoopHandle {
        let sender = self.sender();
        let thread = thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || self.run(&mut renderer));

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Failed to spawn game loop thread: {}", e);
                None
            }
        };
        LoopHandle { sender, thread }
    }
}

/// Running loop thread; stops the loop when dropped
pub struct LoopHandle {
    sender: InputSender,
    thread: Option<JoinHandle<GameState>>,
}

impl LoopHandle {
    pub fn sender(&self) -> InputSender {
        self.sender.clone()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and return its final state
    pub fn stop(mut self) -> Option<GameState> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<GameState> {
        let thread = self.thread.take()?;
        // Blocking send: the loop drains the channel every tick
        let _ = self.sender.sender.send(Command::Shutdown);
        match thread.join() {
            Ok(state) => Some(state),
            Err(_) => {
                log::error!("Game loop thread panicked");
                None
            }
        }
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
