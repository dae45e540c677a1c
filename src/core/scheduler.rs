use crate::core::decoder::decode;
use crate::core::framer::LineReceiver;
use crate::core::state::DisplayState;
use crate::domain::model::Frame;
use crate::domain::ports::{ConfigProvider, Renderer};
use std::time::{Duration, Instant};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub lines: u64,
    pub applied: u64,
    pub rotations: u64,
}

/// Owns the display state and drives the render callback at a fixed cadence.
///
/// Each tick drains the line queue without blocking, reduces every line in
/// arrival order, advances the results rotation when its interval has passed,
/// and finally renders a snapshot. [`RenderScheduler::run`] blocks its thread,
/// so the renderer never holds up a runtime worker the listeners need.
pub struct RenderScheduler<R: Renderer> {
    state: DisplayState,
    lines: LineReceiver,
    renderer: R,
    frame_interval: Duration,
    rotate_interval: Duration,
    next_rotate: Instant,
    stats: SchedulerStats,
}

impl<R: Renderer> RenderScheduler<R> {
    pub fn new(
        lines: LineReceiver,
        renderer: R,
        frame_interval: Duration,
        rotate_interval: Duration,
    ) -> Self {
        Self {
            state: DisplayState::new(),
            lines,
            renderer,
            frame_interval,
            rotate_interval,
            next_rotate: Instant::now() + rotate_interval,
            stats: SchedulerStats::default(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, lines: LineReceiver, renderer: R) -> Self {
        Self::new(
            lines,
            renderer,
            config.frame_interval(),
            config.rotate_interval(),
        )
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn snapshot(&self) -> Frame {
        self.state.frame()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Applies everything currently queued. Returns the number of lines taken.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(line) = self.lines.try_recv() {
            drained += 1;
            let message = decode(&line);
            if self.state.apply(&message) {
                self.stats.applied += 1;
                tracing::debug!(
                    "{} applied: mode={:?} event={:?} results={}",
                    message.tag(),
                    self.state.mode(),
                    self.state.event(),
                    self.state.results_len()
                );
            } else {
                tracing::trace!("No state change from line {:?}", line);
            }
        }
        self.stats.lines += drained as u64;
        drained
    }

    /// One scheduler step at time `now`.
    pub fn tick_at(&mut self, now: Instant) {
        self.stats.ticks += 1;
        self.drain();

        if self.state.is_rotating() {
            if now >= self.next_rotate {
                self.state.rotate();
                self.stats.rotations += 1;
                self.next_rotate = now + self.rotate_interval;
            }
        } else {
            // 沒有輪播時持續重設計時器，避免成績一出現就立刻跳下一筆
            self.next_rotate = now + self.rotate_interval;
        }

        let frame = self.state.frame();
        self.renderer.render(&frame);
    }

    /// Ticks until `shutdown` turns `true` (or its sender is dropped).
    ///
    /// Blocking: run it on a dedicated thread, e.g. via
    /// `tokio::task::spawn_blocking`. The thread sleeps out the rest of each
    /// frame; a render that overruns the frame simply delays the next tick.
    pub fn run(mut self, shutdown: watch::Receiver<bool>) -> SchedulerStats {
        tracing::info!(
            "🖥️ Render loop started ({:.1} fps, rotate every {:?})",
            1.0 / self.frame_interval.as_secs_f64(),
            self.rotate_interval
        );

        loop {
            if shutdown.has_changed().is_err() || *shutdown.borrow() {
                break;
            }
            let started = Instant::now();
            self.tick_at(started);
            std::thread::sleep(self.frame_interval.saturating_sub(started.elapsed()));
        }

        tracing::info!(
            "📊 Render loop stopped - ticks: {}, lines: {}, applied: {}, rotations: {}",
            self.stats.ticks,
            self.stats.lines,
            self.stats.applied,
            self.stats.rotations
        );
        self.stats
    }
}
