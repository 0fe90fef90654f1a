//! Reaction grid core.
//!
//! A 6x12 board briefly lights up cells; the player scores by clicking them
//! before they time out. This crate holds the host-independent round logic;
//! the Yew front end in `main.rs` renders it and feeds it input.

pub mod config;
pub mod layout;
pub mod model;
pub mod screen;
pub mod session;
pub mod timers;
pub mod util;

pub use config::{GameConfig, Settings};
pub use layout::{Viewport, cell_size};
pub use model::{Board, Cell, GameAction, GameState, Phase, RoundSummary};
pub use screen::{BrowserScreen, RejectHandler, Screen, ScreenError};
pub use session::SessionController;
pub use timers::{BrowserTimers, TimerHandle, TimerHost, TimerRegistry, VirtualTimers};
