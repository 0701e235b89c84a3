//! Stdout stand-ins for the map modal and checkout page.

use lockerpick_workflow::{CheckoutHost, LockerMap, MapRenderer, Notice};

pub(crate) struct TerminalRenderer;

impl MapRenderer for TerminalRenderer {
    fn open(&self, map: &LockerMap) {
        let center = map.center();
        println!(
            "map centered on {center} (zoom {}), {} markers:",
            map.zoom(),
            map.markers().len()
        );
        for marker in map.markers() {
            println!("  [{}] {} @ {}", marker.locker.id, marker.label, marker.position);
        }
    }

    fn close(&self) {
        println!("map closed");
    }
}

pub(crate) struct TerminalHost;

impl CheckoutHost for TerminalHost {
    fn on_selected_option(&self, consignment_id: &str, shipping_option_id: &str) {
        tracing::info!(consignment_id, shipping_option_id, "shipping option selected");
    }

    fn notify(&self, notice: &Notice) {
        eprintln!("notice: {notice}");
    }

    fn set_loading(&self, loading: bool) {
        if loading {
            println!("looking up lockers...");
        }
    }
}
