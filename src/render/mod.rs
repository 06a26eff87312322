//! Presentation side of the sphere: where frames meet the screen.
//!
//! `RenderLoop` owns the only mutable state in the engine, the pending frame
//! token. The host decides when frames fire (`FrameScheduler`) and how they
//! are drawn (`SceneSurface`); `dom` provides both for the browser.

pub mod dom;

use std::fmt::Debug;

use crate::error::SphereError;
use crate::sphere::compositor::Frame;
use crate::sphere::SphereScene;

/// Receives one composed frame at a time and applies it in a single batch.
pub trait SceneSurface {
    fn apply(&mut self, frame: &Frame);
}

/// Requests "call me before the next paint" from the host.
///
/// The scheduler only hands out tokens; wiring the callback back to
/// `RenderLoop::on_frame` is the host's job.
pub trait FrameScheduler {
    type Token: Copy + PartialEq + Debug;

    fn request_frame(&mut self) -> Result<Self::Token, SphereError>;
    fn cancel_frame(&mut self, token: Self::Token);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LoopState<T> {
    Idle,
    Running(T),
}

pub struct RenderLoop<S: SceneSurface, F: FrameScheduler> {
    scene: SphereScene,
    surface: S,
    scheduler: F,
    state: LoopState<F::Token>,
}

impl<S: SceneSurface, F: FrameScheduler> RenderLoop<S, F> {
    pub fn new(scene: SphereScene, surface: S, scheduler: F) -> Self {
        Self { scene, surface, scheduler, state: LoopState::Idle }
    }

    pub fn state(&self) -> LoopState<F::Token> {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running(_))
    }

    pub fn scene(&self) -> &SphereScene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Schedule the first frame. Does nothing if already running.
    pub fn start(&mut self) -> Result<(), SphereError> {
        if self.is_running() {
            return Ok(());
        }
        let token = self.scheduler.request_frame()?;
        log::debug!("render loop started ({:?})", token);
        self.state = LoopState::Running(token);
        Ok(())
    }

    /// Draw the frame for `timestamp_ms` and schedule the next one.
    /// Returns false without drawing when the loop has been stopped.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> bool {
        if !self.is_running() {
            return false;
        }

        let frame = self.scene.frame(timestamp_ms);
        self.surface.apply(&frame);

        match self.scheduler.request_frame() {
            Ok(token) => self.state = LoopState::Running(token),
            Err(e) => {
                log::warn!("render loop halted: {}", e);
                self.state = LoopState::Idle;
            }
        }
        true
    }

    /// Cancel the pending frame. Safe to call any number of times.
    pub fn stop(&mut self) {
        if let LoopState::Running(token) = std::mem::replace(&mut self.state, LoopState::Idle) {
            self.scheduler.cancel_frame(token);
            log::debug!("render loop stopped ({:?})", token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, SphereModel};
    use crate::sphere::SphereConfig;

    #[derive(Default)]
    struct MockScheduler {
        next: u32,
        pending: Vec<u32>,
        cancelled: Vec<u32>,
        fail: bool,
    }

    impl FrameScheduler for MockScheduler {
        type Token = u32;

        fn request_frame(&mut self) -> Result<u32, SphereError> {
            if self.fail {
                return Err(SphereError::Schedule("no window".to_string()));
            }
            self.next += 1;
            self.pending.push(self.next);
            Ok(self.next)
        }

        fn cancel_frame(&mut self, token: u32) {
            self.pending.retain(|&t| t != token);
            self.cancelled.push(token);
        }
    }

    impl MockScheduler {
        /// Pretend the host fired the callback for `token`.
        fn fire(&mut self, token: u32) {
            self.pending.retain(|&t| t != token);
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        frames: Vec<Frame>,
    }

    impl SceneSurface for RecordingSurface {
        fn apply(&mut self, frame: &Frame) {
            self.frames.push(frame.clone());
        }
    }

    fn make_loop() -> RenderLoop<RecordingSurface, MockScheduler> {
        let cfg = SphereConfig::default();
        let model = SphereModel::new(&cfg, vec![Edge { from_index: 0, to_index: 1 }], vec![]).unwrap();
        RenderLoop::new(SphereScene::new(&cfg, model), RecordingSurface::default(), MockScheduler::default())
    }

    /// Fire the pending frame like the host would.
    fn step(lp: &mut RenderLoop<RecordingSurface, MockScheduler>, ts: f64) -> bool {
        if let LoopState::Running(token) = lp.state() {
            lp.scheduler_mut().fire(token);
        }
        lp.on_frame(ts)
    }

    #[test]
    fn test_start_schedules_once() {
        let mut lp = make_loop();
        assert_eq!(lp.state(), LoopState::Idle);

        lp.start().unwrap();
        lp.start().unwrap();
        assert_eq!(lp.state(), LoopState::Running(1));
        assert_eq!(lp.scheduler_mut().pending, vec![1]);
    }

    #[test]
    fn test_each_frame_draws_and_reschedules() {
        let mut lp = make_loop();
        lp.start().unwrap();

        assert!(step(&mut lp, 16.0));
        assert!(step(&mut lp, 32.0));

        assert_eq!(lp.surface().frames.len(), 2);
        assert_eq!(lp.state(), LoopState::Running(3));
        assert_eq!(lp.scheduler_mut().pending, vec![3]);
        assert_eq!(lp.surface().frames[0].nodes.len(), 7);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut lp = make_loop();
        lp.start().unwrap();
        step(&mut lp, 16.0);

        lp.stop();
        lp.stop();

        assert_eq!(lp.state(), LoopState::Idle);
        assert!(lp.scheduler_mut().pending.is_empty());
        assert_eq!(lp.scheduler_mut().cancelled, vec![2]);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let mut lp = make_loop();
        lp.stop();
        assert!(!lp.is_running());
        assert!(lp.scheduler_mut().cancelled.is_empty());
    }

    #[test]
    fn test_no_drawing_after_stop() {
        let mut lp = make_loop();
        lp.start().unwrap();
        lp.stop();

        assert!(!lp.on_frame(100.0));
        assert!(lp.surface().frames.is_empty());
        assert!(lp.scheduler_mut().pending.is_empty());
    }

    #[test]
    fn test_restart_after_stop() {
        let mut lp = make_loop();
        lp.start().unwrap();
        lp.stop();
        lp.start().unwrap();
        assert_eq!(lp.state(), LoopState::Running(2));
    }

    #[test]
    fn test_scheduler_failure() {
        let mut lp = make_loop();
        lp.scheduler_mut().fail = true;
        assert!(lp.start().is_err());
        assert!(!lp.is_running());

        lp.scheduler_mut().fail = false;
        lp.start().unwrap();
        lp.scheduler_mut().fail = true;
        // The frame in hand still draws; the loop then goes idle.
        assert!(step(&mut lp, 16.0));
        assert_eq!(lp.surface().frames.len(), 1);
        assert!(!lp.is_running());
    }
}
