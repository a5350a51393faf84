mod panel;
mod session;
mod state;

pub use panel::AiPanel;
pub use session::Session;
pub use state::Snapshot;
