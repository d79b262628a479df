use anyhow::{Result, bail};
use gridscene_input::{Action, HeldActions};
use gridscene_render::WindowHost;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

/// Physical keys bound to viewer actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_pairs([
            (KeyCode::KeyA, Action::MoveLeft),
            (KeyCode::KeyD, Action::MoveRight),
            (KeyCode::KeyW, Action::MoveForward),
            (KeyCode::KeyS, Action::MoveBackward),
            (KeyCode::KeyE, Action::MoveUp),
            (KeyCode::KeyQ, Action::MoveDown),
            (KeyCode::ArrowLeft, Action::LookLeft),
            (KeyCode::ArrowRight, Action::LookRight),
            (KeyCode::ArrowUp, Action::LookUp),
            (KeyCode::ArrowDown, Action::LookDown),
        ])
    }
}

impl KeyBindings {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (KeyCode, Action)>) -> Self {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }

    pub fn action(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }
}

/// Event-side state fed by winit while events are pumped.
struct WindowState {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    creation_error: Option<String>,
    close_requested: bool,
    bindings: KeyBindings,
    held: HeldActions,
}

impl WindowState {
    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        let Some(action) = self.bindings.action(key) else {
            return;
        };
        match state {
            ElementState::Pressed => self.held.press(action),
            ElementState::Released => self.held.release(action),
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                tracing::info!("window created ({:?})", window.inner_size());
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                self.creation_error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                self.close_requested = true;
            }
            WindowEvent::Focused(false) => {
                self.held.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape && state == ElementState::Pressed {
                    self.close_requested = true;
                }
                self.handle_key(key, state);
            }
            _ => {}
        }
    }
}

/// winit window driven by pumping its event loop once per frame.
pub struct DesktopWindow {
    event_loop: EventLoop<()>,
    state: WindowState,
}

impl DesktopWindow {
    /// Create the event loop and block until the window exists.
    pub fn open(title: &str, width: u32, height: u32, bindings: KeyBindings) -> Result<Self> {
        let mut event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = WindowState {
            attributes: Window::default_attributes()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height)),
            window: None,
            creation_error: None,
            close_requested: false,
            bindings,
            held: HeldActions::new(),
        };

        while state.window.is_none() {
            let status = event_loop.pump_app_events(Some(Duration::from_millis(16)), &mut state);
            if let Some(error) = state.creation_error.take() {
                bail!("failed to create window: {error}");
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with code {code} before the window opened");
            }
        }

        Ok(Self { event_loop, state })
    }

    /// Shared handle to the native window, for surface creation.
    pub fn window(&self) -> Option<Arc<Window>> {
        self.state.window.clone()
    }
}

impl WindowHost for DesktopWindow {
    fn should_close(&self) -> bool {
        self.state.close_requested
    }

    fn poll_events(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            tracing::debug!("event loop exited with code {code}");
            self.state.close_requested = true;
        }
    }

    fn held_actions(&self) -> &HeldActions {
        &self.state.held
    }
}
