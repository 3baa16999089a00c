//! Interactive session module
//!
//! This module contains the question/answer engine: terminal access, yes/no
//! parsing, the collected-option store, the session itself and the
//! interactive modes built on top of it.

pub mod answer;
pub mod interaction;
pub mod mode;
pub mod options;
pub mod terminal;

pub use answer::YesNoAnswer;
pub use interaction::{InteractionSession, MAX_YES_NO_ATTEMPTS};
pub use mode::{DefaultInteractiveMode, InteractiveMode};
pub use options::{InteractiveOption, OptionStore};
pub use terminal::{ConsoleTerminal, StreamTerminal, Terminal};
