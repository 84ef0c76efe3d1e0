pub mod app;
pub mod explorer;
pub mod input;
pub mod render;
pub mod runtime;
pub mod terminal_guard;

pub use app::{EditorApp, KeyOutcome, View};
pub use explorer::ExplorerState;
pub use input::handle_key;
pub use render::{Screen, TerminalRenderer};
pub use runtime::run;
