//! Shipping-option selection and locker resolution state machine.
//!
//! ```text
//! Idle ──select non-locker──▶ Idle          (parent notified)
//! Idle ──select/activate locker──▶ Resolving
//! Resolving ──lookup ok──▶ MapOpen
//! Resolving ──lookup failed──▶ Idle        (notice)
//! MapOpen ──marker picked──▶ Idle          (persisted, map closed)
//! MapOpen ──dismissed──▶ Idle
//! ```
//!
//! Every resolution cycle gets a fresh token. Only the result carrying the
//! latest token is applied; anything older is dropped on arrival.

use std::sync::Arc;

use lockerpick_core::{
    AppConfig, Coordinate, Locker, LockerLookupRequest, ShippingAddress, ShippingOption,
    StoreConfig,
};
use lockerpick_locator::{AddressResolver, LockerLocator};

use crate::error::WorkflowError;
use crate::host::{CheckoutHost, Notice};
use crate::map::{LockerMap, MapRenderer};
use crate::persistence::SelectionStore;
use crate::resolution::{PendingResolution, ResolutionResult};
use crate::state::{ResolutionToken, WorkflowState};

/// Fallback center when the shipping address cannot be geocoded (Nairobi CBD).
const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: -1.2884,
    lng: 36.8233,
};
const DEFAULT_ZOOM: u8 = 14;

/// Services the workflow composes.
#[derive(Clone)]
pub struct Collaborators {
    pub locator: Arc<dyn LockerLocator>,
    pub resolver: Arc<dyn AddressResolver>,
    pub selection: Arc<dyn SelectionStore>,
    pub renderer: Arc<dyn MapRenderer>,
    pub host: Arc<dyn CheckoutHost>,
}

/// Checkout data the workflow reads but does not own.
#[derive(Debug, Clone)]
pub struct CheckoutContext {
    pub consignment_id: String,
    pub options: Vec<ShippingOption>,
    pub selected_option_id: Option<String>,
    pub address: ShippingAddress,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    pub default_center: Coordinate,
    pub zoom: u8,
}

impl MapSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_center: config.default_center,
            zoom: config.map_zoom,
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// What applying a [`ResolutionResult`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The map is open. `notice` is set when the center fell back to the default.
    MapOpened {
        markers: usize,
        notice: Option<Notice>,
    },
    /// The lookup failed; the workflow is idle again.
    LookupFailed(Notice),
    /// A newer cycle was started after this one; the result was dropped.
    Superseded,
}

pub struct ShippingOptionWorkflow {
    consignment_id: String,
    options: Vec<ShippingOption>,
    selected_option_id: Option<String>,
    address: ShippingAddress,
    store: StoreConfig,
    settings: MapSettings,
    deps: Collaborators,
    state: WorkflowState,
    latest_token: ResolutionToken,
    selected_locker: Option<Locker>,
}

impl ShippingOptionWorkflow {
    #[must_use]
    pub fn new(context: CheckoutContext, settings: MapSettings, deps: Collaborators) -> Self {
        Self {
            consignment_id: context.consignment_id,
            options: context.options,
            selected_option_id: context.selected_option_id,
            address: context.address,
            store: context.store,
            settings,
            deps,
            state: WorkflowState::Idle,
            latest_token: 0,
            selected_locker: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    #[must_use]
    pub fn options(&self) -> &[ShippingOption] {
        &self.options
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&ShippingOption> {
        let id = self.selected_option_id.as_deref()?;
        self.options.iter().find(|o| o.id == id)
    }

    /// Locker picked in this session or restored on mount.
    #[must_use]
    pub fn selected_locker(&self) -> Option<&Locker> {
        self.selected_locker.as_ref()
    }

    /// Token of the most recently started resolution cycle (`0` before any).
    #[must_use]
    pub fn latest_token(&self) -> ResolutionToken {
        self.latest_token
    }

    /// Resume-on-entry.
    ///
    /// A persisted locker is restored as the current selection. When none is
    /// persisted but a locker option is already selected, a resolution cycle
    /// starts so the shopper is asked to pick one.
    pub fn mount(&mut self) -> Option<PendingResolution> {
        let persisted = match self.deps.selection.read() {
            Ok(persisted) => persisted,
            Err(err) => {
                self.surface(&Notice::persistence(&err));
                None
            }
        };

        let option = self
            .selected_option()
            .filter(|o| o.is_locker_service())
            .cloned()?;

        if let Some(locker) = persisted {
            tracing::info!(
                consignment_id = %self.consignment_id,
                option_id = %option.id,
                locker_id = %locker.id,
                "restored persisted locker selection"
            );
            self.selected_locker = Some(locker);
            return None;
        }

        tracing::info!(
            consignment_id = %self.consignment_id,
            option_id = %option.id,
            "locker option selected without a locker, resuming resolution"
        );
        self.begin_resolution(&option)
    }

    /// Handles a value-change selection of a shipping option.
    ///
    /// The parent is always notified for a known id. A locker option also
    /// starts a resolution cycle, returned for the caller to drive.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidOptionId`] for an id not in the option
    /// list; nothing changes and the parent is not notified.
    pub fn select_option(
        &mut self,
        option_id: &str,
    ) -> Result<Option<PendingResolution>, WorkflowError> {
        let option = self.find_option(option_id)?.clone();
        self.selected_option_id = Some(option.id.clone());
        self.deps
            .host
            .on_selected_option(&self.consignment_id, &option.id);

        if option.is_locker_service() {
            return Ok(self.begin_resolution(&option));
        }

        self.abandon_cycle();
        tracing::debug!(option_id = %option.id, "non-locker option selected");
        Ok(None)
    }

    /// Handles an explicit click on an option, even one already selected.
    ///
    /// Clicking the selected option does not notify the parent: a locker
    /// option starts a fresh cycle, any other option does nothing. Clicking a
    /// different option is a selection and goes through [`Self::select_option`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidOptionId`] for an id not in the option list.
    pub fn activate_option(
        &mut self,
        option_id: &str,
    ) -> Result<Option<PendingResolution>, WorkflowError> {
        let option = self.find_option(option_id)?.clone();
        if self.selected_option_id.as_deref() != Some(option.id.as_str()) {
            return self.select_option(&option.id);
        }
        if !option.is_locker_service() {
            return Ok(None);
        }
        Ok(self.begin_resolution(&option))
    }

    /// Applies the result of a resolution cycle.
    ///
    /// Results from any cycle other than the latest are discarded.
    pub fn complete(&mut self, result: ResolutionResult) -> Completion {
        let current = matches!(
            &self.state,
            WorkflowState::Resolving { token, .. } if *token == result.token
        );
        if result.token != self.latest_token || !current {
            tracing::debug!(
                token = result.token,
                latest = self.latest_token,
                state = self.state.name(),
                "discarding superseded resolution result"
            );
            return Completion::Superseded;
        }

        let WorkflowState::Resolving { option_id, .. } =
            std::mem::replace(&mut self.state, WorkflowState::Idle)
        else {
            return Completion::Superseded;
        };
        self.deps.host.set_loading(false);

        let resolved = match result.outcome {
            Ok(resolved) => resolved,
            Err(err) => {
                let notice = Notice::lookup(&err);
                self.surface(&notice);
                return Completion::LookupFailed(notice);
            }
        };

        let (center, notice) = match resolved.center {
            Ok(center) => (center, None),
            Err(err) => {
                let notice = Notice::geocode(&err);
                self.surface(&notice);
                (self.settings.default_center, Some(notice))
            }
        };

        let map = LockerMap::new(
            resolved.response.map_api_key,
            center,
            self.settings.zoom,
            resolved.response.lockers,
        );
        let markers = map.markers().len();
        self.deps.renderer.open(&map);
        tracing::info!(
            consignment_id = %self.consignment_id,
            option_id = %option_id,
            token = result.token,
            markers,
            "locker map opened"
        );
        self.state = WorkflowState::MapOpen {
            token: result.token,
            option_id,
            map,
            address: self.address.clone(),
        };
        Completion::MapOpened { markers, notice }
    }

    /// Runs `pending` to completion and applies its result.
    pub async fn drive(&mut self, pending: PendingResolution) -> Completion {
        let result = pending.run().await;
        self.complete(result)
    }

    /// Handles activation of a marker on the open map.
    ///
    /// Persists the locker, closes the map and returns to idle. The parent was
    /// already told about the shipping option and is not notified again.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::MapNotOpen`] when no map is shown.
    /// - [`WorkflowError::UnknownMarker`] when `locker_id` is not on the map.
    /// - [`WorkflowError::Persistence`] when the pick cannot be stored; the
    ///   map stays open so the shopper can retry.
    pub fn pick_marker(&mut self, locker_id: &str) -> Result<Locker, WorkflowError> {
        let map = self.state.map().ok_or(WorkflowError::MapNotOpen)?;
        let locker = map
            .activate(locker_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownMarker(locker_id.to_string()))?;

        if let Err(err) = self.deps.selection.write(&locker) {
            self.surface(&Notice::persistence(&err));
            return Err(err.into());
        }

        self.deps.renderer.close();
        self.state = WorkflowState::Idle;
        tracing::info!(
            consignment_id = %self.consignment_id,
            locker_id = %locker.id,
            "locker picked"
        );
        self.selected_locker = Some(locker.clone());
        Ok(locker)
    }

    /// Closes the map without picking. Returns `false` if no map was open.
    pub fn dismiss_map(&mut self) -> bool {
        if self.state.map().is_none() {
            return false;
        }
        self.deps.renderer.close();
        self.state = WorkflowState::Idle;
        tracing::info!(consignment_id = %self.consignment_id, "locker map dismissed");
        true
    }

    /// Replaces the option list, e.g. after the catalog re-quotes shipping.
    ///
    /// A selected id that is no longer offered is dropped.
    pub fn set_options(&mut self, options: Vec<ShippingOption>) {
        self.options = options;
        if self.selected_option().is_none() {
            self.selected_option_id = None;
        }
    }

    fn find_option(&self, option_id: &str) -> Result<&ShippingOption, WorkflowError> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .ok_or_else(|| {
                tracing::warn!(option_id, "rejected unknown shipping option");
                WorkflowError::InvalidOptionId(option_id.to_string())
            })
    }

    /// Starts a new cycle for a locker option and supersedes any running one.
    fn begin_resolution(&mut self, option: &ShippingOption) -> Option<PendingResolution> {
        let request = LockerLookupRequest::for_option(option, &self.address, &self.store)?;

        if let Err(err) = self.deps.selection.clear() {
            self.surface(&Notice::persistence(&err));
        }
        self.selected_locker = None;
        if self.state.map().is_some() {
            self.deps.renderer.close();
        }

        self.latest_token += 1;
        let token = self.latest_token;
        self.state = WorkflowState::Resolving {
            token,
            option_id: option.id.clone(),
        };
        self.deps.host.set_loading(true);
        tracing::info!(
            consignment_id = %self.consignment_id,
            option_id = %option.id,
            courier = %request.courier,
            token,
            "resolving lockers"
        );

        Some(PendingResolution {
            token,
            request,
            address_text: self.address.to_address_text(),
            locator: Arc::clone(&self.deps.locator),
            resolver: Arc::clone(&self.deps.resolver),
        })
    }

    /// Leaves any running cycle behind: in-flight results become stale and an
    /// open map is closed.
    fn abandon_cycle(&mut self) {
        match self.state {
            WorkflowState::Idle => return,
            WorkflowState::Resolving { .. } => {
                self.latest_token += 1;
                self.deps.host.set_loading(false);
            }
            WorkflowState::MapOpen { .. } => self.deps.renderer.close(),
        }
        self.state = WorkflowState::Idle;
    }

    fn surface(&self, notice: &Notice) {
        tracing::warn!(
            consignment_id = %self.consignment_id,
            kind = ?notice.kind,
            message = %notice.message,
            "workflow notice"
        );
        self.deps.host.notify(notice);
    }
}
