//! Presentation model for the locker map.
//!
//! [`LockerMap`] holds what a map widget needs to draw: the provider
//! credential, a center, a zoom level and one [`Marker`] per locker. Drawing
//! itself is delegated to a [`MapRenderer`]. Activating a marker only yields
//! the locker behind it; persisting the pick and closing the map belong to
//! the workflow.

use lockerpick_core::{Coordinate, Locker};

/// A locker pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub label: String,
    pub locker: Locker,
}

#[derive(Clone, PartialEq)]
pub struct LockerMap {
    api_key: String,
    center: Coordinate,
    zoom: u8,
    markers: Vec<Marker>,
}

impl LockerMap {
    /// One marker per locker, in response order, labeled with its address.
    #[must_use]
    pub fn new(api_key: String, center: Coordinate, zoom: u8, lockers: Vec<Locker>) -> Self {
        let markers = lockers
            .into_iter()
            .map(|locker| Marker {
                position: locker.position(),
                label: locker.address_text.clone(),
                locker,
            })
            .collect();
        Self {
            api_key,
            center,
            zoom,
            markers,
        }
    }

    /// Map-provider credential from the lookup response.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns the locker behind the marker with `locker_id`, if present.
    #[must_use]
    pub fn activate(&self, locker_id: &str) -> Option<&Locker> {
        self.markers
            .iter()
            .map(|m| &m.locker)
            .find(|locker| locker.id == locker_id)
    }
}

impl std::fmt::Debug for LockerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockerMap")
            .field("api_key", &"[redacted]")
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("markers", &self.markers)
            .finish()
    }
}

/// Draws the locker map inside the host's modal.
pub trait MapRenderer: Send + Sync {
    /// Shows `map`, replacing anything already shown.
    fn open(&self, map: &LockerMap);

    /// Hides the map and its modal.
    fn close(&self);
}
