use crate::config::WrapConfig;
use crate::engine::{WrapEngine, WrapError, WrapReport};
use crate::input::{Action, InputManager, Key, KeyState};
use crate::sheet::WrapSheet;
use crate::solid::TargetSolid;

/// Something that displays the scene.
///
/// A sink is handed the scene every time the sheet geometry or pose changes,
/// never on idle input.
#[cfg_attr(test, mockall::automock)]
pub trait FrameSink {
    fn present(&mut self, solid: &TargetSolid, sheet: &WrapSheet);
}

/// Result of feeding a key event to the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    PoseAdjusted,
    Wrapped(WrapReport),
}

/// Interactive driver of one scene variant.
///
/// Routes key events through the input manager into the engine and presents
/// the scene to the sink after every change.
pub struct Viewer<S: FrameSink> {
    engine: WrapEngine,
    input_manager: InputManager,
    sink: S,
}

impl<S: FrameSink> Viewer<S> {
    pub fn new(engine: WrapEngine, input_manager: InputManager, sink: S) -> Self {
        Viewer {
            engine,
            input_manager,
            sink,
        }
    }

    pub fn from_config(config: &WrapConfig, sink: S) -> Self {
        Viewer::new(
            WrapEngine::from_config(config),
            InputManager::new(config.key_bindings.clone(), config.pose),
            sink,
        )
    }

    pub fn engine(&self) -> &WrapEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WrapEngine {
        &mut self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Presents the initial, unwrapped scene.
    pub fn start(&mut self) -> Result<(), WrapError> {
        self.present()
    }

    pub fn handle_key(&mut self, key: Key, state: KeyState) -> Result<KeyOutcome, WrapError> {
        let action = self.input_manager.process_key(key, state);
        log::trace!("Key {} {:?} mapped to {:?}", key, state, action);

        let outcome = match action {
            Action::Ignore => return Ok(KeyOutcome::Ignored),
            Action::AdjustPose { .. } => {
                self.engine.handle_action(action)?;
                KeyOutcome::PoseAdjusted
            }
            Action::Wrap => KeyOutcome::Wrapped(self.engine.wrap()?),
        };

        self.present()?;

        Ok(outcome)
    }

    fn present(&mut self) -> Result<(), WrapError> {
        let solid = self.engine.solid().ok_or(WrapError::SolidMissing)?;
        let sheet = self.engine.sheet().ok_or(WrapError::SheetMissing)?;

        self.sink.present(solid, sheet);

        if let Some(sheet) = self.engine.sheet_mut() {
            sheet.take_dirty();
        }

        Ok(())
    }
}
