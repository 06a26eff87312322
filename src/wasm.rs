//! WASM bindings for the sphere-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::error::SphereError;
use crate::model::{parse_edges, parse_services, SphereModel};
use crate::output::{ErrorOutput, FrameOutput};
use crate::render::dom::{DomBinding, DomSelectors, DomSurface, RafScheduler};
use crate::render::RenderLoop;
use crate::sphere::{SphereConfig, SphereScene};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

type DomLoop = RenderLoop<DomSurface, RafScheduler>;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    crate::logging::init(log::LevelFilter::Info);
}

/// A running sphere bound to one container. Dropping it stops the loop.
#[wasm_bindgen]
pub struct SphereHandle {
    engine: Rc<RefCell<DomLoop>>,
}

#[wasm_bindgen]
impl SphereHandle {
    /// Bind to `container` and start animating.
    ///
    /// `services_json` is the ordered service list (may be `[]`),
    /// `edges_json` a list of `{fromIndex, toIndex}`. Returns undefined when
    /// the data is invalid or the container is missing parts; nothing is
    /// scheduled in that case.
    pub fn start(container: &Element, services_json: &str, edges_json: &str) -> Option<SphereHandle> {
        match start_sphere(container, services_json, edges_json) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("sphere not started: {}", e);
                None
            }
        }
    }

    /// Cancel the pending frame. Call before removing the container.
    pub fn stop(&self) {
        self.engine.borrow_mut().stop();
    }

    pub fn is_running(&self) -> bool {
        self.engine.borrow().is_running()
    }

    /// The service category for a clicked node, as JSON.
    pub fn service_json(&self, index: usize) -> Option<String> {
        let engine = self.engine.borrow();
        let service = engine.scene().model().service(index)?;
        serde_json::to_string(service).ok()
    }
}

impl Drop for SphereHandle {
    fn drop(&mut self) {
        self.engine.borrow_mut().stop();
    }
}

fn start_sphere(container: &Element, services_json: &str, edges_json: &str) -> Result<SphereHandle, SphereError> {
    let cfg = SphereConfig::default();
    let model = SphereModel::new(&cfg, parse_edges(edges_json)?, parse_services(services_json)?)?;

    let binding = DomBinding::resolve(container, &DomSelectors::default(), cfg.node_count, model.edges().len())?;
    let window = web_sys::window().ok_or_else(|| SphereError::Schedule("no window".to_string()))?;

    let scene = SphereScene::new(&cfg, model);
    let engine = Rc::new(RefCell::new(RenderLoop::new(
        scene,
        DomSurface::new(binding),
        RafScheduler::new(window),
    )));

    // The callback only holds a weak reference; the handle owns the loop.
    let weak = Rc::downgrade(&engine);
    let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        if let Some(engine) = weak.upgrade() {
            engine.borrow_mut().on_frame(timestamp);
        }
    });
    engine.borrow_mut().scheduler_mut().set_callback(callback);
    engine.borrow_mut().start()?;

    Ok(SphereHandle { engine })
}

/// Compose the frame at `timestamp_ms` for the default configuration and
/// return it as JSON, for pages that draw the sphere themselves.
#[wasm_bindgen]
pub fn compose_frame(timestamp_ms: f64, edges_json: &str) -> String {
    let frame = parse_edges(edges_json).and_then(|edges| {
        let cfg = SphereConfig::default();
        let model = SphereModel::new(&cfg, edges, vec![])?;
        Ok(SphereScene::new(&cfg, model).frame(timestamp_ms))
    });

    let json = match frame {
        Ok(frame) => serde_json::to_string(&FrameOutput::from(&frame)),
        Err(e) => {
            console_error(&format!("Error composing frame: {}", e));
            serde_json::to_string(&ErrorOutput { error: e.to_string() })
        }
    };
    json.unwrap_or_else(|_| "{\"error\": \"Serialization error\"}".to_string())
}
