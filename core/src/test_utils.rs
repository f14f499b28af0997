//! Shared fakes for exercising the loop without a window or a GPU.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use glam::Mat4;

use crate::render::{Canvas, Graphics, MAX_TEXTURE_SLOTS, TextureHandle, Vertex};
use crate::runtime::{Clock, Game};
use crate::surface::{Surface, SurfaceEvent};

/// Clock whose elapsed time is scripted instead of measured.
///
/// Every `now()` call consumes the next scripted delta (default zero once
/// the script runs out); `sleep()` records instead of blocking. The sleep
/// log is shared so tests keep a handle after the clock moves into the
/// runtime.
pub struct ScriptedClock {
    origin: Instant,
    offset: Duration,
    deltas: VecDeque<Duration>,
    slept: Rc<Cell<Vec<Duration>>>,
}

impl ScriptedClock {
    pub fn new<I: IntoIterator<Item = Duration>>(deltas: I) -> Self {
        Self {
            origin: Instant::now(),
            offset: Duration::ZERO,
            deltas: deltas.into_iter().collect(),
            slept: Rc::new(Cell::new(Vec::new())),
        }
    }

    /// Script deltas for the loop body only: the two setup samples (clock
    /// construction and loop-entry reset) are padded with zero. Each loop
    /// iteration consumes two deltas — the top-of-iteration sample and the
    /// post-render sample.
    pub fn for_iterations<I: IntoIterator<Item = Duration>>(deltas: I) -> Self {
        let padded = [Duration::ZERO, Duration::ZERO]
            .into_iter()
            .chain(deltas);
        Self::new(padded)
    }

    /// Shared handle to the recorded sleeps.
    pub fn sleep_log(&self) -> Rc<Cell<Vec<Duration>>> {
        Rc::clone(&self.slept)
    }
}

impl Clock for ScriptedClock {
    fn now(&mut self) -> Instant {
        self.offset += self.deltas.pop_front().unwrap_or(Duration::ZERO);
        self.origin + self.offset
    }

    fn sleep(&mut self, duration: Duration) {
        let mut log = self.slept.take();
        log.push(duration);
        self.slept.set(log);
    }
}

/// Take the recorded sleeps out of a [`ScriptedClock::sleep_log`] handle.
pub fn recorded_sleeps(log: &Rc<Cell<Vec<Duration>>>) -> Vec<Duration> {
    let sleeps = log.take();
    log.set(sleeps.clone());
    sleeps
}

/// Surface with scripted events and fixed visibility/size/refresh.
pub struct FakeSurface {
    pub visible: bool,
    pub size: (u32, u32),
    pub refresh_hz: u32,
    /// One entry per `poll()` call; empty once the script runs out.
    pub event_script: VecDeque<Vec<SurfaceEvent>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            visible: true,
            size: (640, 480),
            refresh_hz: 60,
            event_script: VecDeque::new(),
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::new()
        }
    }

    /// Emit `events` from the n-th (zero-based) `poll()` call.
    pub fn script_events(mut self, poll_index: usize, events: Vec<SurfaceEvent>) -> Self {
        while self.event_script.len() <= poll_index {
            self.event_script.push_back(Vec::new());
        }
        self.event_script[poll_index] = events;
        self
    }
}

impl Surface for FakeSurface {
    fn poll(&mut self, events: &mut Vec<SurfaceEvent>) {
        if let Some(mut batch) = self.event_script.pop_front() {
            events.append(&mut batch);
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn refresh_rate(&self) -> u32 {
        self.refresh_hz
    }
}

/// One recorded GPU submission.
pub struct DrawCall {
    pub vertices: Vec<Vertex>,
    pub texture: TextureHandle,
    pub projection: Mat4,
}

/// Graphics backend that records submissions and keeps uploaded pixels
/// for readback.
#[derive(Default)]
pub struct RecordingGraphics {
    pub draws: Vec<DrawCall>,
    pub clears: Vec<[f32; 4]>,
    pub resizes: Vec<(u32, u32)>,
    pub begin_frames: usize,
    pub end_frames: usize,
    textures: HashMap<u32, (u32, u32, Vec<u8>)>,
    next_texture_id: u32,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self {
            next_texture_id: 1,
            ..Default::default()
        }
    }

    /// Readback of an uploaded texture's pixel data.
    pub fn texture_pixels(&self, handle: TextureHandle) -> Option<&[u8]> {
        self.textures.get(&handle.0).map(|(_, _, pixels)| pixels.as_slice())
    }
}

impl Graphics for RecordingGraphics {
    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn begin_frame(&mut self) -> Result<()> {
        self.begin_frames += 1;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.end_frames += 1;
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) -> Result<()> {
        self.clears.push(color);
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle> {
        let expected = (width * height * 4) as usize;
        if pixels.len() != expected {
            bail!(
                "pixel data size mismatch: expected {} bytes, got {}",
                expected,
                pixels.len()
            );
        }
        if self.textures.len() >= MAX_TEXTURE_SLOTS {
            bail!(
                "texture slots exhausted: {}/{}",
                self.textures.len(),
                MAX_TEXTURE_SLOTS
            );
        }
        let handle = TextureHandle(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(handle.0, (width, height, pixels.to_vec()));
        Ok(handle)
    }

    fn draw(
        &mut self,
        vertices: &[Vertex],
        texture: TextureHandle,
        projection: &Mat4,
    ) -> Result<()> {
        self.draws.push(DrawCall {
            vertices: vertices.to_vec(),
            texture,
            projection: *projection,
        });
        Ok(())
    }
}

/// Instrumented game: counts callbacks and exits after a fixed number of
/// loop iterations.
pub struct TestGame {
    pub updates: usize,
    pub renders: usize,
    pub resizes: Vec<(u32, u32)>,
    pub close_requests: usize,
    /// When set, `on_close` defers (returns false) until the given number
    /// of requests have been seen.
    pub close_after_requests: Option<usize>,
    pub fail_update: bool,
    pub fail_render: bool,
    max_iterations: usize,
    exit_checks: Cell<usize>,
}

impl TestGame {
    /// Game that runs exactly `max_iterations` full loop iterations.
    pub fn run_for(max_iterations: usize) -> Self {
        Self {
            updates: 0,
            renders: 0,
            resizes: Vec::new(),
            close_requests: 0,
            close_after_requests: None,
            fail_update: false,
            fail_render: false,
            max_iterations,
            exit_checks: Cell::new(0),
        }
    }
}

impl Game<RecordingGraphics> for TestGame {
    fn update(&mut self) -> Result<()> {
        if self.fail_update {
            bail!("update failed");
        }
        self.updates += 1;
        Ok(())
    }

    fn render(&mut self, _canvas: &mut Canvas<'_, RecordingGraphics>) -> Result<()> {
        if self.fail_render {
            bail!("render failed");
        }
        self.renders += 1;
        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn on_close(&mut self) -> bool {
        self.close_requests += 1;
        match self.close_after_requests {
            Some(threshold) => self.close_requests >= threshold,
            None => true,
        }
    }

    fn should_exit(&self) -> bool {
        let checks = self.exit_checks.get() + 1;
        self.exit_checks.set(checks);
        checks > self.max_iterations
    }
}
