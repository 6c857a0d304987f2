pub mod confirm;
pub mod controller;
pub mod error;
pub mod options;
pub mod refresh;
pub mod state;

pub use confirm::{AutoConfirm, Confirm};
pub use controller::PanelController;
pub use error::PanelError;
pub use options::{ApiMode, CodecPreference, ContentMode, TaskOptions};
pub use state::{AppState, Connection, ConnectionState, DashboardView, FormState};
