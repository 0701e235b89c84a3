//! Locker pickup selection workflow for checkout.
//!
//! [`ShippingOptionWorkflow`] ties the shipping option list, the locker
//! lookup, address geocoding and the locker map into one resumable flow.
//! Collaborators are injected as traits so hosts can plug in their own map
//! widget, selection storage and notice display.

pub mod error;
pub mod host;
pub mod map;
pub mod persistence;
pub mod resolution;
pub mod state;
pub mod workflow;

pub use error::{PersistenceError, WorkflowError};
pub use host::{CheckoutHost, Notice, NoticeKind};
pub use map::{LockerMap, MapRenderer, Marker};
pub use persistence::{
    FileSelectionStore, InMemorySelectionStore, SelectionStore, SELECTION_KEY,
};
pub use resolution::{PendingResolution, ResolutionResult, ResolvedLockers};
pub use state::{ResolutionToken, WorkflowState};
pub use workflow::{
    CheckoutContext, Collaborators, Completion, MapSettings, ShippingOptionWorkflow,
};
