//! Runtime commands and their dispatch onto a [`SimulationEngine`].
//!
//! Commands deserialize from action objects of the form
//! `{"type": "TICK"}` or `{"type": "SIZE", "payload": {"width": .., "height": ..}}`.

use serde::{Deserialize, Serialize};

use crate::simulation::{Result, SimulationEngine, Snapshot};

/// A lifecycle command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Start,
    Tick,
    Restart,
    Stop,
    #[serde(rename = "SIZE")]
    Resize { width: f64, height: f64 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Tick => "tick",
            Command::Restart => "restart",
            Command::Stop => "stop",
            Command::Resize { .. } => "resize",
        }
    }
}

/// Apply `command` to `engine`.
///
/// Returns the resulting snapshot for `Start` and for a tick that advanced
/// the simulation; `None` for `Restart`, `Stop`, `Resize` and a tick ignored
/// while stopped.
pub fn dispatch(engine: &mut SimulationEngine, command: Command) -> Result<Option<Snapshot>> {
    log::trace!("dispatch {}", command.name());
    match command {
        Command::Start => {
            engine.start();
            Ok(Some(engine.snapshot()))
        }
        Command::Tick => {
            if engine.tick() {
                Ok(Some(engine.snapshot()))
            } else {
                log::warn!("tick ignored: simulation is {}", engine.state().as_str());
                Ok(None)
            }
        }
        Command::Restart => {
            engine.restart();
            Ok(None)
        }
        Command::Stop => {
            engine.stop();
            Ok(None)
        }
        Command::Resize { width, height } => {
            engine.resize(width, height)?;
            Ok(None)
        }
    }
}

/// Run up to `count` ticks and return the final snapshot, or `None` when no
/// tick advanced.
pub fn tick_many(engine: &mut SimulationEngine, count: usize) -> Option<Snapshot> {
    let mut advanced = false;
    for _ in 0..count {
        if !engine.tick() {
            break;
        }
        advanced = true;
    }
    advanced.then(|| engine.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{SimulationConfig, SimulationError, SimulationState};

    fn engine(node_count: usize) -> SimulationEngine {
        SimulationEngine::new(SimulationConfig {
            node_count,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_deserialize_actions() {
        let tick: Command = serde_json::from_str(r#"{"type":"TICK"}"#).unwrap();
        assert_eq!(tick, Command::Tick);

        let start: Command = serde_json::from_str(r#"{"type":"START"}"#).unwrap();
        assert_eq!(start, Command::Start);

        let resize: Command =
            serde_json::from_str(r#"{"type":"SIZE","payload":{"width":640,"height":480}}"#).unwrap();
        assert_eq!(
            resize,
            Command::Resize {
                width: 640.0,
                height: 480.0
            }
        );

        assert!(serde_json::from_str::<Command>(r#"{"type":"JUMP"}"#).is_err());
    }

    #[test]
    fn test_start_then_tick_on_empty_engine() {
        let mut engine = engine(0);
        let started = dispatch(&mut engine, Command::Start).unwrap().unwrap();
        assert!(started.is_empty());
        assert_eq!(started.state, SimulationState::Running);

        let ticked = dispatch(&mut engine, Command::Tick).unwrap().unwrap();
        assert!(ticked.is_empty());
        assert_eq!(ticked.ticks, 1);
    }

    #[test]
    fn test_stop_then_tick_emits_nothing() {
        let mut engine = engine(5);
        dispatch(&mut engine, Command::Start).unwrap();
        assert!(dispatch(&mut engine, Command::Stop).unwrap().is_none());
        assert!(dispatch(&mut engine, Command::Tick).unwrap().is_none());
        assert_eq!(engine.ticks(), 0);

        assert!(dispatch(&mut engine, Command::Restart).unwrap().is_none());
        assert!(dispatch(&mut engine, Command::Tick).unwrap().is_some());
    }

    #[test]
    fn test_resize_does_not_step() {
        let mut engine = engine(3);
        let before = engine.snapshot();
        let result = dispatch(
            &mut engine,
            Command::Resize {
                width: 300.0,
                height: 150.0,
            },
        );
        assert_eq!(result, Ok(None));
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.viewport().height, 150.0);
    }

    #[test]
    fn test_resize_rejects_bad_viewport() {
        let mut engine = engine(1);
        let result = dispatch(
            &mut engine,
            Command::Resize {
                width: f64::NAN,
                height: 1.0,
            },
        );
        assert!(matches!(result, Err(SimulationError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_tick_many() {
        let mut engine = engine(4);
        let snapshot = tick_many(&mut engine, 12).unwrap();
        assert_eq!(snapshot.ticks, 12);

        engine.stop();
        assert!(tick_many(&mut engine, 3).is_none());
        assert!(tick_many(&mut SimulationEngine::new(SimulationConfig::default()).unwrap(), 0).is_none());
    }
}
