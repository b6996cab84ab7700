//! Two-player, same-terminal chess.
//!
//! [`game`] holds the rule engine; [`ui`] is the terminal front end that
//! drives it. [`config`] and [`cli`] feed both.

pub mod cli;
pub mod config;
pub mod game;
pub mod ui;
