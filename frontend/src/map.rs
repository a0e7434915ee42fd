//! Bindings to the Leaflet glue script and the [`MapPort`] backed by it.

use seed::prelude::*;
use serde_wasm_bindgen::to_value;
use shared::{Coordinate, MapPort, MapViewport};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    pub fn init_map();
    #[wasm_bindgen(js_name = showPoints)]
    fn show_points_js(points: JsValue);
    #[wasm_bindgen(js_name = fitBounds)]
    fn fit_bounds_js(bounds: JsValue);
    #[wasm_bindgen(js_name = centerOn)]
    fn center_on_js(point: JsValue);
    #[wasm_bindgen(js_name = showAddress)]
    pub fn show_address(address: &str);
    #[wasm_bindgen(js_name = locateUser)]
    pub fn locate_user(timeout_ms: u32);
}

/// The route map widget. Stateless on the Rust side; Leaflet owns the layers.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeafletMap;

impl MapPort for LeafletMap {
    fn show_points(&mut self, points: &[Coordinate]) {
        match to_value(points) {
            Ok(value) => show_points_js(value),
            Err(err) => {
                web_sys::console::error_1(&format!("[frontend] map points: {err}").into());
                return;
            }
        }

        match MapViewport::for_points(points) {
            MapViewport::Fit(bounds) => {
                if let Ok(value) = to_value(&bounds) {
                    fit_bounds_js(value);
                }
            }
            MapViewport::Center(point) => {
                if let Ok(value) = to_value(&point) {
                    center_on_js(value);
                }
            }
            MapViewport::Unchanged => {}
        }
    }
}
