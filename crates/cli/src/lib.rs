//! Settle CLI library
//!
//! Script loading, virtual-clock replay and option resolution shared by the
//! `settle` binary and its integration tests.

pub mod live;
pub mod replay;
pub mod script;
pub mod settings;

pub use replay::{replay, Delivery, ReplayReport};
pub use script::{Action, Script, ScriptError, ScriptEvent, ScriptOptions};
pub use settings::OptionOverrides;
