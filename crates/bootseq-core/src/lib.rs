//! Core of the bootseq boot screen: scripts, the reveal engine, config and
//! process plumbing shared by the TUI and the CLI.

pub mod config;
pub mod core;
pub mod logging;
pub mod script;

pub use crate::core::reveal::{
    EngineError, Phase, RevealEngine, RevealState, RevealStream, RevealedLine,
};
pub use crate::script::{DEFAULT_DELAY, Line, MAX_TOTAL_DURATION, Script, ScriptError, StyleTag};
