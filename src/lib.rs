//! Blob Collide - WASM Module
//!
//! A particle simulation engine with circle and polygon ("blob") collision,
//! compiled to WebAssembly and exposed to JavaScript via wasm-bindgen.
//!
//! # Architecture
//!
//! - `geometry`: Vector helpers, jiggle, blob ring construction
//! - `spatial`: Quadtree with max-radius pruning, R-tree bounds index
//! - `force`: Force trait, ordered registry, positional and collision forces
//! - `simulation`: Nodes, configuration, the engine and its snapshots
//! - `command`: Runtime commands (start/tick/restart/stop/resize)

use js_sys::Float64Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod command;
pub mod force;
pub mod geometry;
#[cfg(target_arch = "wasm32")]
mod logging;
pub mod simulation;
pub mod spatial;

use command::Command;
use simulation::{SimulationConfig, SimulationEngine};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        logging::init(log::LevelFilter::Info);
    }
}

/// Set the maximum log level ("off", "error", "warn", "info", "debug", "trace").
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsError> {
    let level: log::LevelFilter = level
        .parse()
        .map_err(|e: log::ParseLevelError| JsError::new(&e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// Main entry point for the simulation.
///
/// This struct wraps the internal SimulationEngine and provides the public
/// API exposed to JavaScript. Snapshots are returned as plain JS objects.
#[wasm_bindgen]
pub struct BlobSimulationWasm {
    engine: SimulationEngine,
}

#[wasm_bindgen]
impl BlobSimulationWasm {
    /// Create a simulation from a (partial) camelCase config object.
    ///
    /// `undefined` or `null` selects the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<BlobSimulationWasm, JsError> {
        let config: SimulationConfig = if config.is_undefined() || config.is_null() {
            SimulationConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            engine: SimulationEngine::new(config)?,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Leave the idle state and return the initial snapshot.
    pub fn start(&mut self) -> Result<JsValue, JsError> {
        self.engine.start();
        to_js(&self.engine.snapshot())
    }

    /// Advance one step.
    ///
    /// Returns the snapshot, or `undefined` when stopped.
    pub fn tick(&mut self) -> Result<JsValue, JsError> {
        if self.engine.tick() {
            to_js(&self.engine.snapshot())
        } else {
            Ok(JsValue::UNDEFINED)
        }
    }

    /// Advance up to `count` steps and return the final snapshot, or
    /// `undefined` when nothing advanced.
    #[wasm_bindgen(js_name = tickMany)]
    pub fn tick_many(&mut self, count: usize) -> Result<JsValue, JsError> {
        to_js(&command::tick_many(&mut self.engine, count))
    }

    /// Reset alpha to 1 and resume.
    pub fn restart(&mut self) {
        self.engine.restart();
    }

    /// Halt; ticks do nothing until restart.
    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Update the viewport. Does not step.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsError> {
        self.engine.resize(width, height)?;
        Ok(())
    }

    /// Rebuild every node from the configuration and return to idle.
    pub fn reinitialize(&mut self) -> Result<(), JsError> {
        self.engine.reinitialize()?;
        Ok(())
    }

    /// Apply an action object such as `{type: "TICK"}` or
    /// `{type: "SIZE", payload: {width, height}}`.
    ///
    /// Returns the snapshot for START and an advancing TICK, else `undefined`.
    pub fn dispatch(&mut self, action: JsValue) -> Result<JsValue, JsError> {
        let command: Command = serde_wasm_bindgen::from_value(action)?;
        to_js(&command::dispatch(&mut self.engine, command)?)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current snapshot: alpha, state, ticks and every node.
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.engine.snapshot())
    }

    /// Positions as a Float64Array `[x0, y0, x1, y1, ...]`.
    pub fn positions(&self) -> Float64Array {
        Float64Array::from(self.engine.positions().as_slice())
    }

    pub fn alpha(&self) -> f64 {
        self.engine.alpha()
    }

    /// "idle", "running", "cooled" or "stopped".
    pub fn state(&self) -> String {
        self.engine.state().as_str().to_string()
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.engine.node_count()
    }

    /// Ticks until alpha reaches its target, if it ever will.
    #[wasm_bindgen(js_name = stepsToCool)]
    pub fn steps_to_cool(&self) -> Option<usize> {
        self.engine.steps_to_cool()
    }

    /// Overlapping node pairs as `[a0, b0, a1, b1, ...]`.
    #[wasm_bindgen(js_name = overlappingPairs)]
    pub fn overlapping_pairs(&self) -> Vec<u32> {
        self.engine
            .overlapping_pairs()
            .into_iter()
            .flat_map(|(a, b)| [a.raw(), b.raw()])
            .collect()
    }

    /// Bounding box of every node shape as `[min_x, min_y, max_x, max_y]`.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f64>> {
        self.engine
            .get_bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }
}

/// Serialize as plain JS objects. Flattened fields go through serde's map
/// path, which would otherwise produce a JS `Map`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    Ok(value.serialize(&serializer)?)
}
