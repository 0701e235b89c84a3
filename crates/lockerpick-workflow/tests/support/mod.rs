//! In-memory fakes for the workflow's collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lockerpick_core::{
    Coordinate, Locker, LockerLookupRequest, LockerLookupResponse, ShippingAddress,
    ShippingOption, StoreConfig,
};
use lockerpick_locator::{AddressResolver, GeocodeError, LockerLocator, LookupError};
use lockerpick_workflow::{
    CheckoutContext, CheckoutHost, Collaborators, InMemorySelectionStore, LockerMap,
    MapRenderer, MapSettings, Notice, PersistenceError, SelectionStore, ShippingOptionWorkflow,
};

pub const EXPRESS: &str = "opt-express";
pub const DHL_LOCKERS: &str = "opt-dhl-lockers";
pub const FAN_LOCKERS: &str = "opt-fan-lockers";

pub fn locker(id: &str, address: &str, lat: f64, long: f64) -> Locker {
    Locker {
        id: id.to_string(),
        address_text: address.to_string(),
        lat,
        long,
    }
}

pub fn response(key: &str, lockers: Vec<Locker>) -> LockerLookupResponse {
    LockerLookupResponse {
        map_api_key: key.to_string(),
        lockers,
    }
}

pub fn shop_a() -> Locker {
    locker("L1", "Shop A", -1.28, 36.82)
}

pub fn options() -> Vec<ShippingOption> {
    vec![
        ShippingOption::new(EXPRESS, "DHL Express"),
        ShippingOption::new(DHL_LOCKERS, "DHL Lockers"),
        ShippingOption::new(FAN_LOCKERS, "FanCourier lockers"),
    ]
}

pub fn nairobi() -> ShippingAddress {
    ShippingAddress {
        country_code: "KE".to_string(),
        city: "Nairobi".to_string(),
        state_or_province: "Nairobi".to_string(),
        address1: "Moi Avenue 12".to_string(),
        address2: String::new(),
        postal_code: "00100".to_string(),
    }
}

pub enum Outcome {
    Lockers(LockerLookupResponse),
    Status(u16),
    Malformed,
}

pub struct Script {
    pub delay: Duration,
    pub outcome: Outcome,
}

impl Script {
    pub fn lockers(lockers: Vec<Locker>) -> Self {
        Self::delayed(0, Outcome::Lockers(response("K", lockers)))
    }

    pub fn delayed(delay_ms: u64, outcome: Outcome) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            outcome,
        }
    }
}

/// Replays scripted outcomes in call order; answers `[shop_a]` once drained.
#[derive(Default)]
pub struct ScriptedLocator {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<LockerLookupRequest>>,
}

impl ScriptedLocator {
    pub fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<LockerLookupRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LockerLocator for ScriptedLocator {
    async fn lookup(
        &self,
        request: &LockerLookupRequest,
    ) -> Result<LockerLookupResponse, LookupError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::lockers(vec![shop_a()]));
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        match script.outcome {
            Outcome::Lockers(response) => Ok(response),
            Outcome::Status(status) => Err(LookupError::UnexpectedStatus {
                status,
                url: "http://lockers.test/api/shipping/lockers".to_string(),
            }),
            Outcome::Malformed => Err(LookupError::Deserialize {
                context: "scripted".to_string(),
                source: serde_json::from_str::<LockerLookupResponse>("<html>")
                    .expect_err("fixture must be malformed"),
            }),
        }
    }
}

/// Resolves every address to a fixed coordinate, or fails when unset.
pub struct StaticResolver {
    center: Mutex<Option<Coordinate>>,
    calls: AtomicUsize,
    credentials: Mutex<Vec<String>>,
}

impl StaticResolver {
    pub fn new(center: Option<Coordinate>) -> Self {
        Self {
            center: Mutex::new(center),
            calls: AtomicUsize::new(0),
            credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn set_center(&self, center: Option<Coordinate>) {
        *self.center.lock().unwrap() = center;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressResolver for StaticResolver {
    async fn resolve(&self, address: &str, credential: &str) -> Result<Coordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .unwrap()
            .push(credential.to_string());
        let center = *self.center.lock().unwrap();
        center.ok_or_else(|| GeocodeError::NoResults {
            address: address.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Open(LockerMap),
    Close,
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.events().last(), Some(RenderEvent::Open(_)))
    }

    pub fn opened(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, RenderEvent::Open(_)))
            .count()
    }
}

impl MapRenderer for RecordingRenderer {
    fn open(&self, map: &LockerMap) {
        self.events
            .lock()
            .unwrap()
            .push(RenderEvent::Open(map.clone()));
    }

    fn close(&self) {
        self.events.lock().unwrap().push(RenderEvent::Close);
    }
}

#[derive(Default)]
pub struct RecordingHost {
    selections: Mutex<Vec<(String, String)>>,
    notices: Mutex<Vec<Notice>>,
    loading: Mutex<Vec<bool>>,
}

impl RecordingHost {
    pub fn selections(&self) -> Vec<(String, String)> {
        self.selections.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.lock().unwrap().last().copied().unwrap_or(false)
    }
}

impl CheckoutHost for RecordingHost {
    fn on_selected_option(&self, consignment_id: &str, shipping_option_id: &str) {
        self.selections
            .lock()
            .unwrap()
            .push((consignment_id.to_string(), shipping_option_id.to_string()));
    }

    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn set_loading(&self, loading: bool) {
        self.loading.lock().unwrap().push(loading);
    }
}

/// Store whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyStore;

impl SelectionStore for ReadOnlyStore {
    fn read(&self) -> Result<Option<Locker>, PersistenceError> {
        Ok(None)
    }

    fn write(&self, _locker: &Locker) -> Result<(), PersistenceError> {
        Err(PersistenceError::Io {
            path: "read-only".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

pub struct Harness {
    pub locator: Arc<ScriptedLocator>,
    pub resolver: Arc<StaticResolver>,
    pub selection: Arc<InMemorySelectionStore>,
    pub renderer: Arc<RecordingRenderer>,
    pub host: Arc<RecordingHost>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            locator: Arc::new(ScriptedLocator::default()),
            resolver: Arc::new(StaticResolver::new(Some(Coordinate {
                lat: -1.2841,
                lng: 36.8233,
            }))),
            selection: Arc::new(InMemorySelectionStore::new()),
            renderer: Arc::new(RecordingRenderer::default()),
            host: Arc::new(RecordingHost::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            locator: self.locator.clone(),
            resolver: self.resolver.clone(),
            selection: self.selection.clone(),
            renderer: self.renderer.clone(),
            host: self.host.clone(),
        }
    }

    pub fn workflow(&self, selected: Option<&str>) -> ShippingOptionWorkflow {
        self.workflow_with(selected, self.collaborators())
    }

    pub fn workflow_with(
        &self,
        selected: Option<&str>,
        deps: Collaborators,
    ) -> ShippingOptionWorkflow {
        ShippingOptionWorkflow::new(
            CheckoutContext {
                consignment_id: "c-1".to_string(),
                options: options(),
                selected_option_id: selected.map(str::to_string),
                address: nairobi(),
                store: StoreConfig {
                    store_hash: "S1".to_string(),
                },
            },
            MapSettings::default(),
            deps,
        )
    }
}
