use lockerpick_core::ShippingAddress;

use crate::map::LockerMap;

/// Monotonic id of a resolution cycle. Later cycles have larger tokens.
pub type ResolutionToken = u64;

/// Where the workflow is in the locker selection cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    /// A lookup for `option_id` is in flight.
    Resolving {
        token: ResolutionToken,
        option_id: String,
    },
    /// The locker map is shown.
    MapOpen {
        token: ResolutionToken,
        option_id: String,
        map: LockerMap,
        address: ShippingAddress,
    },
}

impl WorkflowState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, WorkflowState::Idle)
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        matches!(self, WorkflowState::Resolving { .. })
    }

    /// The open map, if any.
    #[must_use]
    pub fn map(&self) -> Option<&LockerMap> {
        match self {
            WorkflowState::MapOpen { map, .. } => Some(map),
            _ => None,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Resolving { .. } => "resolving",
            WorkflowState::MapOpen { .. } => "map_open",
        }
    }
}
