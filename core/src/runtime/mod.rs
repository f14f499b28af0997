//! Loop orchestration
//!
//! Drives the application with fixed timestep updates and variable render
//! rate: update logic advances in constant increments regardless of
//! rendering/OS jitter, catch-up work is bounded, and the loop sleeps off
//! whatever is left of the frame budget instead of spinning.

use std::time::Duration;

use anyhow::Result;

use crate::render::{Canvas, Graphics, QuadBatch};
use crate::surface::{Surface, SurfaceEvent};

mod clock;
mod pacing;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FrameClock, MonotonicClock};
pub use pacing::PacingPolicy;

/// Callbacks of the hosted application.
///
/// A typed replacement for the C-style function-pointer-plus-user-data
/// registration surface: the implementor is its own context. Everything
/// except [`update`](Self::update) and [`render`](Self::render) has a
/// default, so a minimal game implements just those two.
pub trait Game<G: Graphics> {
    /// One-time setup before the loop starts; upload textures here.
    fn init(&mut self, _canvas: &mut Canvas<'_, G>) -> Result<()> {
        Ok(())
    }

    /// Advance the simulation by exactly one fixed step.
    fn update(&mut self) -> Result<()>;

    /// Draw one frame. The scheduler flushes the batch after this returns
    /// and presents exactly once.
    fn render(&mut self, canvas: &mut Canvas<'_, G>) -> Result<()>;

    /// The drawable area changed size. The projection and viewport are
    /// already updated when this runs.
    fn on_resize(&mut self, _width: u32, _height: u32) {}

    /// The user asked to close the window. Return `true` to terminate the
    /// loop now (the default), or `false` to keep running and decide later
    /// through [`should_exit`](Self::should_exit).
    fn on_close(&mut self) -> bool {
        true
    }

    /// Polled once per iteration; `true` terminates the loop normally.
    fn should_exit(&self) -> bool {
        false
    }
}

/// The frame scheduler.
///
/// Owns the presentation surface, the frame clock, and the quad batch, and
/// runs the loop until the game asks to stop. Single-threaded and
/// cooperative: poll, update, and render run sequentially on the calling
/// thread, and the end-of-iteration sleep is the only blocking point.
pub struct Runtime<S: Surface, C: Clock = MonotonicClock> {
    surface: S,
    clock: FrameClock<C>,
    policy: PacingPolicy,
    frame_budget: Duration,
    accumulator: Duration,
    batch: QuadBatch,
    finish: bool,
}

impl<S: Surface> Runtime<S> {
    /// Create a runtime over the real clock with default pacing.
    pub fn new(surface: S) -> Self {
        Self::with_policy(surface, PacingPolicy::default())
    }

    pub fn with_policy(surface: S, policy: PacingPolicy) -> Self {
        Self::with_clock(surface, policy, MonotonicClock)
    }
}

impl<S: Surface, C: Clock> Runtime<S, C> {
    /// Create a runtime with an explicit time source.
    pub fn with_clock(surface: S, policy: PacingPolicy, clock: C) -> Self {
        let frame_budget = policy.frame_budget(surface.refresh_rate());
        let (width, height) = surface.size();
        tracing::debug!(
            refresh_hz = surface.refresh_rate(),
            budget_ms = frame_budget.as_secs_f64() * 1000.0,
            "frame budget derived"
        );
        Self {
            surface,
            clock: FrameClock::new(clock),
            policy,
            frame_budget,
            accumulator: Duration::ZERO,
            batch: QuadBatch::new(width, height),
            finish: false,
        }
    }

    /// Fixed update-step duration this runtime paces at.
    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run the loop until the game exits or a callback/collaborator fails.
    ///
    /// Each iteration: sample elapsed time, pump OS events, run at most
    /// `max_steps_per_frame` fixed updates, render once if the surface is
    /// visible (ending in exactly one present), then sleep off the unused
    /// part of the frame budget. Errors from the game or the graphics
    /// backend propagate out unretried; resources are released by drop.
    pub fn run<G: Graphics, A: Game<G>>(&mut self, gfx: &mut G, game: &mut A) -> Result<()> {
        let (width, height) = self.surface.size();
        self.batch.set_screen(gfx, width, height);
        game.init(&mut Canvas::new(&mut self.batch, gfx))?;

        self.finish = false;
        self.accumulator = Duration::ZERO;
        self.clock.reset();
        let mut events = Vec::new();

        while !self.finish {
            if game.should_exit() {
                break;
            }

            self.accumulator += self.clock.delta();

            self.surface.poll(&mut events);
            for event in events.drain(..) {
                match event {
                    SurfaceEvent::CloseRequested => {
                        if game.on_close() {
                            self.finish = true;
                        }
                    }
                    SurfaceEvent::Resized { width, height } => {
                        // Projection and viewport must be current before the
                        // next flush, so the batch hears about it first.
                        self.batch.set_screen(gfx, width, height);
                        game.on_resize(width, height);
                    }
                }
            }
            if self.finish {
                break;
            }

            // Bounded catch-up: a machine that cannot keep up lets
            // simulation time fall behind instead of update-starving.
            let mut steps = 0;
            while self.accumulator > self.frame_budget && steps < self.policy.max_steps_per_frame {
                game.update()?;
                self.accumulator -= self.frame_budget;
                steps += 1;
            }
            if self.accumulator > self.frame_budget {
                tracing::trace!(
                    dropped = ?(self.accumulator - self.frame_budget),
                    "update cap reached, dropping simulation time"
                );
            }
            self.accumulator = self.accumulator.min(self.frame_budget);

            if self.surface.is_visible() {
                gfx.begin_frame()?;
                let mut canvas = Canvas::new(&mut self.batch, gfx);
                game.render(&mut canvas)?;
                canvas.finish()?;
                gfx.end_frame()?;
            }

            // Time spent this iteration counts toward the next update
            // cycle; whatever is left of the budget is slept off.
            let frame_cost = self.clock.delta();
            self.accumulator += frame_cost;
            let sleep_time = self.frame_budget.saturating_sub(frame_cost);
            if sleep_time > Duration::ZERO {
                self.clock.sleep(sleep_time);
            }
        }

        Ok(())
    }
}
