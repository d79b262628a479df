use crate::camera::{CameraRig, FAR_PLANE, FOV_Y_DEGREES, NEAR_PLANE};
use crate::clock::FrameClock;
use crate::error::RenderError;
use glam::Vec3;
use gridscene_common::ViewerPose;
use gridscene_input::{HeldActions, KeyboardMovementController};
use gridscene_scene::SceneCollection;

/// Window-side collaborator: close signal, event pumping, held input.
pub trait WindowHost {
    fn should_close(&self) -> bool;

    /// Process pending window and input events.
    fn poll_events(&mut self);

    fn held_actions(&self) -> &HeldActions;
}

/// Swapchain-side collaborator: acquires, records and presents frames.
pub trait FrameRenderer {
    /// Per-frame recording state handed to the render system.
    type Frame;

    /// Output width divided by height. Queried every frame.
    fn aspect_ratio(&self) -> f32;

    /// Acquire the next frame, or `Ok(None)` when none is available right now
    /// (surface resized, minimized or timed out).
    fn begin_frame(&mut self) -> Result<Option<Self::Frame>, RenderError>;

    fn begin_render_pass(&mut self, frame: &mut Self::Frame);

    fn end_render_pass(&mut self, frame: &mut Self::Frame);

    /// Submit the recorded work and present.
    fn end_frame(&mut self, frame: Self::Frame) -> Result<(), RenderError>;

    /// Block until all submitted device work has finished.
    fn wait_idle(&self) -> Result<(), RenderError>;
}

/// Draws the scene into an open render pass.
pub trait RenderSystem<F> {
    fn render_game_objects(
        &mut self,
        frame: &mut F,
        scene: &SceneCollection,
        camera: &CameraRig,
    ) -> Result<(), RenderError>;
}

/// Lifecycle of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    CloseRequested,
    Terminated,
}

/// Frame counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_presented: u64,
    pub frames_skipped: u64,
}

/// Initial eye position of the viewer camera.
const INITIAL_EYE: Vec3 = Vec3::new(-1.0, -2.0, 2.0);
/// Point the camera looks at before the first pose update.
const INITIAL_TARGET: Vec3 = Vec3::new(0.0, 0.0, 2.5);

/// Per-frame orchestration: input, camera, frame acquisition, drawing.
///
/// Frames that cannot be acquired are skipped silently. Any collaborator
/// error ends the loop and is returned to the caller.
#[derive(Debug)]
pub struct ApplicationLoop {
    clock: FrameClock,
    camera: CameraRig,
    viewer: ViewerPose,
    controller: KeyboardMovementController,
    state: LoopState,
    stats: LoopStats,
}

impl ApplicationLoop {
    pub fn new(controller: KeyboardMovementController) -> Self {
        let mut camera = CameraRig::new();
        camera.set_view_target(INITIAL_EYE, INITIAL_TARGET);
        Self {
            clock: FrameClock::new(),
            camera,
            viewer: ViewerPose::default(),
            controller,
            state: LoopState::Running,
            stats: LoopStats::default(),
        }
    }

    /// Run until the window asks to close, then wait for the device to go idle.
    pub fn run<W, R, S>(
        &mut self,
        window: &mut W,
        renderer: &mut R,
        system: &mut S,
        scene: &SceneCollection,
    ) -> Result<LoopStats, RenderError>
    where
        W: WindowHost,
        R: FrameRenderer,
        S: RenderSystem<R::Frame>,
    {
        tracing::info!("entering frame loop with {} game objects", scene.len());
        self.clock.reset();
        while self.state == LoopState::Running {
            if window.should_close() {
                self.state = LoopState::CloseRequested;
                break;
            }
            self.step(window, renderer, system, scene)?;
        }

        renderer.wait_idle()?;
        self.state = LoopState::Terminated;
        tracing::info!(
            "frame loop finished: {} presented, {} skipped",
            self.stats.frames_presented,
            self.stats.frames_skipped
        );
        Ok(self.stats)
    }

    /// One iteration. Returns whether a frame was presented.
    pub fn step<W, R, S>(
        &mut self,
        window: &mut W,
        renderer: &mut R,
        system: &mut S,
        scene: &SceneCollection,
    ) -> Result<bool, RenderError>
    where
        W: WindowHost,
        R: FrameRenderer,
        S: RenderSystem<R::Frame>,
    {
        window.poll_events();

        let dt = self.clock.tick();
        tracing::trace!("frame time {dt:.6}s");

        self.viewer = self
            .controller
            .move_in_plane_xz(self.viewer, dt, window.held_actions());
        self.camera
            .set_view_yxz(self.viewer.translation, self.viewer.rotation);
        self.camera.set_perspective(
            FOV_Y_DEGREES.to_radians(),
            renderer.aspect_ratio(),
            NEAR_PLANE,
            FAR_PLANE,
        );

        let Some(mut frame) = renderer.begin_frame()? else {
            self.stats.frames_skipped += 1;
            return Ok(false);
        };
        renderer.begin_render_pass(&mut frame);
        system.render_game_objects(&mut frame, scene, &self.camera)?;
        renderer.end_render_pass(&mut frame);
        renderer.end_frame(frame)?;
        self.stats.frames_presented += 1;
        Ok(true)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn viewer(&self) -> ViewerPose {
        self.viewer
    }
}

impl Default for ApplicationLoop {
    fn default() -> Self {
        Self::new(KeyboardMovementController::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscene_assets::{MeshData, MeshTable};
    use gridscene_input::Action;
    use std::time::{Duration, Instant};

    /// Closes after `frames_before_close` polls.
    struct ScriptedWindow {
        frames_before_close: usize,
        polls: usize,
        poll_delay: Duration,
        held: HeldActions,
    }

    impl ScriptedWindow {
        fn closing_after(frames: usize) -> Self {
            Self {
                frames_before_close: frames,
                polls: 0,
                poll_delay: Duration::ZERO,
                held: HeldActions::new(),
            }
        }
    }

    impl WindowHost for ScriptedWindow {
        fn should_close(&self) -> bool {
            self.polls >= self.frames_before_close
        }

        fn poll_events(&mut self) {
            self.polls += 1;
            std::thread::sleep(self.poll_delay);
        }

        fn held_actions(&self) -> &HeldActions {
            &self.held
        }
    }

    #[derive(Debug, PartialEq)]
    enum Call {
        BeginFrame,
        BeginPass,
        EndPass,
        EndFrame,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        unavailable_frames: usize,
        fail_end_frame: bool,
        calls: Vec<Call>,
        wait_idle_calls: std::cell::Cell<usize>,
    }

    struct TestFrame {
        index: usize,
    }

    impl FrameRenderer for RecordingRenderer {
        type Frame = TestFrame;

        fn aspect_ratio(&self) -> f32 {
            16.0 / 9.0
        }

        fn begin_frame(&mut self) -> Result<Option<TestFrame>, RenderError> {
            self.calls.push(Call::BeginFrame);
            if self.unavailable_frames > 0 {
                self.unavailable_frames -= 1;
                return Ok(None);
            }
            Ok(Some(TestFrame {
                index: self.calls.len(),
            }))
        }

        fn begin_render_pass(&mut self, _frame: &mut TestFrame) {
            self.calls.push(Call::BeginPass);
        }

        fn end_render_pass(&mut self, _frame: &mut TestFrame) {
            self.calls.push(Call::EndPass);
        }

        fn end_frame(&mut self, _frame: TestFrame) -> Result<(), RenderError> {
            self.calls.push(Call::EndFrame);
            if self.fail_end_frame {
                return Err(RenderError::DeviceFatal("device lost".into()));
            }
            Ok(())
        }

        fn wait_idle(&self) -> Result<(), RenderError> {
            self.wait_idle_calls.set(self.wait_idle_calls.get() + 1);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingSystem {
        draws: Vec<usize>,
        last_projection: Option<glam::Mat4>,
    }

    impl RenderSystem<TestFrame> for CountingSystem {
        fn render_game_objects(
            &mut self,
            frame: &mut TestFrame,
            scene: &SceneCollection,
            camera: &CameraRig,
        ) -> Result<(), RenderError> {
            assert!(!scene.is_empty());
            self.draws.push(frame.index);
            self.last_projection = Some(camera.projection());
            Ok(())
        }
    }

    fn scene() -> SceneCollection {
        let mut table = MeshTable::new();
        let mesh = table.insert(MeshData {
            name: "test".into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        });
        SceneCollection::from_layout(mesh, 2)
    }

    #[test]
    fn immediate_close_renders_nothing_but_waits_idle() {
        let mut window = ScriptedWindow::closing_after(0);
        let mut renderer = RecordingRenderer::default();
        let mut system = CountingSystem::default();
        let mut app = ApplicationLoop::default();

        let stats = app
            .run(&mut window, &mut renderer, &mut system, &scene())
            .unwrap();

        assert!(system.draws.is_empty());
        assert!(renderer.calls.is_empty());
        assert_eq!(renderer.wait_idle_calls.get(), 1);
        assert_eq!(stats, LoopStats::default());
        assert_eq!(app.state(), LoopState::Terminated);
    }

    #[test]
    fn unavailable_frames_are_skipped_silently() {
        let mut window = ScriptedWindow::closing_after(6);
        let mut renderer = RecordingRenderer {
            unavailable_frames: 5,
            ..Default::default()
        };
        let mut system = CountingSystem::default();
        let mut app = ApplicationLoop::default();

        let stats = app
            .run(&mut window, &mut renderer, &mut system, &scene())
            .unwrap();

        assert_eq!(system.draws.len(), 1);
        assert_eq!(
            stats,
            LoopStats {
                frames_presented: 1,
                frames_skipped: 5
            }
        );
        assert_eq!(renderer.wait_idle_calls.get(), 1);
    }

    #[test]
    fn frame_calls_are_ordered() {
        let mut window = ScriptedWindow::closing_after(1);
        let mut renderer = RecordingRenderer::default();
        let mut system = CountingSystem::default();
        let mut app = ApplicationLoop::default();

        app.run(&mut window, &mut renderer, &mut system, &scene())
            .unwrap();

        assert_eq!(
            renderer.calls,
            [Call::BeginFrame, Call::BeginPass, Call::EndPass, Call::EndFrame]
        );
        assert_eq!(renderer.wait_idle_calls.get(), 1);
        assert_eq!(window.polls, 1);
    }

    #[test]
    fn projection_uses_renderer_aspect() {
        let mut window = ScriptedWindow::closing_after(1);
        let mut renderer = RecordingRenderer::default();
        let mut system = CountingSystem::default();
        let mut app = ApplicationLoop::default();

        app.run(&mut window, &mut renderer, &mut system, &scene())
            .unwrap();

        let mut expected = CameraRig::new();
        expected.set_perspective(FOV_Y_DEGREES.to_radians(), 16.0 / 9.0, NEAR_PLANE, FAR_PLANE);
        assert_eq!(system.last_projection, Some(expected.projection()));
    }

    #[test]
    fn fatal_errors_propagate() {
        let mut window = ScriptedWindow::closing_after(10);
        let mut renderer = RecordingRenderer {
            fail_end_frame: true,
            ..Default::default()
        };
        let mut system = CountingSystem::default();
        let mut app = ApplicationLoop::default();

        let err = app
            .run(&mut window, &mut renderer, &mut system, &scene())
            .unwrap_err();

        assert!(matches!(err, RenderError::DeviceFatal(_)));
        assert_eq!(window.polls, 1);
        assert_eq!(app.state(), LoopState::Running);
    }

    #[test]
    fn held_actions_move_the_viewer() {
        let mut window = ScriptedWindow::closing_after(3);
        window.poll_delay = Duration::from_millis(2);
        window.held.press(Action::MoveForward);
        let mut renderer = RecordingRenderer::default();
        let mut system = CountingSystem::default();
        let mut app = ApplicationLoop::default();

        let started = Instant::now();
        app.run(&mut window, &mut renderer, &mut system, &scene())
            .unwrap();
        let wall = started.elapsed().as_secs_f32();

        let moved = app.viewer().translation;
        let speed = KeyboardMovementController::default().move_speed;
        // Every frame sleeps in poll_events, so the viewer must have advanced.
        assert!(moved.z >= speed * 0.006 * 0.9, "z = {}", moved.z);
        assert!(moved.z <= speed * wall + 1e-4);
        assert_eq!(moved.x, 0.0);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn released_actions_leave_the_viewer_still() {
        let mut window = ScriptedWindow::closing_after(3);
        window.poll_delay = Duration::from_millis(2);
        let mut renderer = RecordingRenderer::default();
        let mut system = CountingSystem::default();
        let mut app = ApplicationLoop::default();

        app.run(&mut window, &mut renderer, &mut system, &scene())
            .unwrap();

        assert_eq!(app.viewer(), ViewerPose::default());
    }
}
