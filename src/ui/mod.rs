//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI replays a recorded execution trace and is organized into three layers:
//!
//! - **[`app`]**: trace position, keyboard event loop, pane focus, auto-play
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   scopes, output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it from a
//! [`SnapshotManager`] and the captured output, then call [`App::run`].
//!
//! [`SnapshotManager`]: crate::snapshot::SnapshotManager
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
