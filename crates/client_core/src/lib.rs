//! Triage pipeline: fetch classified items, apply persisted priority
//! corrections, and order/group the result for display.

pub mod error;
pub mod present;
pub mod reconcile;
pub mod session;
pub mod source;

pub use error::LoadError;
pub use present::{present, Card, CategoryGroup, ViewModel};
pub use reconcile::{reconcile, ReconciledItem};
pub use session::TriageSession;
pub use source::{HttpItemSource, ItemSource, StaticItemSource, DEFAULT_TIMEOUT};
