//! The checkout page hosting the workflow.

use lockerpick_locator::{GeocodeError, LookupError};

use crate::error::PersistenceError;

/// Non-fatal problems surfaced to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Network, timeout or non-2xx status from the lockers endpoint.
    LookupFailure,
    /// The lockers endpoint answered with an undecodable body.
    LookupParseFailure,
    /// The shipping address could not be placed on the map.
    GeocodeFailure,
    /// The selection store could not be read, written or cleared.
    PersistenceFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub(crate) fn lookup(err: &LookupError) -> Self {
        let kind = if err.is_parse_failure() {
            NoticeKind::LookupParseFailure
        } else {
            NoticeKind::LookupFailure
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }

    pub(crate) fn geocode(err: &GeocodeError) -> Self {
        Self {
            kind: NoticeKind::GeocodeFailure,
            message: err.to_string(),
        }
    }

    pub(crate) fn persistence(err: &PersistenceError) -> Self {
        Self {
            kind: NoticeKind::PersistenceFailure,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.kind {
            NoticeKind::LookupFailure => "could not load pickup lockers",
            NoticeKind::LookupParseFailure => "pickup locker list was unreadable",
            NoticeKind::GeocodeFailure => "could not locate the shipping address",
            NoticeKind::PersistenceFailure => "could not save the locker selection",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

/// Callbacks into the surrounding checkout page.
pub trait CheckoutHost: Send + Sync {
    /// Forwarded once per accepted shipping-method selection.
    fn on_selected_option(&self, consignment_id: &str, shipping_option_id: &str);

    /// Shows a non-blocking notice.
    fn notify(&self, notice: &Notice);

    /// Toggles the loading overlay while a lookup is in flight.
    fn set_loading(&self, _loading: bool) {}
}
