//! Session controller: owns the round's state, its timers and its listeners.
//!
//! All board mutation goes through [`GameState::reduce`]; timer callbacks only
//! hold a `Weak` back-reference, so dropping the controller (which also tears
//! the timers down) ends every scheduled callback.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rand::Rng;
use rand::rngs::SmallRng;
use yew::Reducible;

use crate::config::GameConfig;
use crate::layout::cell_size;
use crate::model::{GameAction, GameState, Phase, RoundSummary, spawn_interval_ms};
use crate::screen::{RejectHandler, Screen, ScreenError};
use crate::timers::{TimerHandle, TimerHost, TimerRegistry};

pub type StateListener = Rc<dyn Fn(&Rc<GameState>)>;
pub type RoundEndListener = Rc<dyn Fn(RoundSummary)>;

const CLOCK_TICK_MS: u32 = 1000;

struct Inner<H, S> {
    config: GameConfig,
    host: H,
    screen: S,
    state: RefCell<Rc<GameState>>,
    rng: RefCell<SmallRng>,
    timers: RefCell<TimerRegistry>,
    /// Pending post-transition relayout; not tied to a round.
    layout_timer: Cell<Option<TimerHandle>>,
    listeners: RefCell<Vec<StateListener>>,
    round_end: RefCell<Vec<RoundEndListener>>,
}

pub struct SessionController<H: TimerHost + 'static, S: Screen + 'static> {
    inner: Rc<Inner<H, S>>,
}

impl<H: TimerHost + 'static, S: Screen + 'static> SessionController<H, S> {
    pub fn new(config: GameConfig, level: u8, host: H, screen: S, rng: SmallRng) -> Self {
        let inner = Inner {
            config,
            host,
            screen,
            state: RefCell::new(Rc::new(GameState::new(config, level))),
            rng: RefCell::new(rng),
            timers: RefCell::new(TimerRegistry::default()),
            layout_timer: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            round_end: RefCell::new(Vec::new()),
        };
        Self { inner: Rc::new(inner) }
    }

    /// Current snapshot; cheap to clone and never mutated in place.
    pub fn state(&self) -> Rc<GameState> {
        self.inner.state.borrow().clone()
    }

    /// Called with a fresh snapshot after every state change.
    pub fn subscribe(&self, listener: impl Fn(&Rc<GameState>) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Called once per round that runs out its clock, shortly after the end.
    pub fn on_round_end(&self, listener: impl Fn(RoundSummary) + 'static) {
        self.inner.round_end.borrow_mut().push(Rc::new(listener));
    }

    pub fn start(&self) {
        self.inner.start();
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn reset(&self) {
        self.inner.reset();
    }

    /// Mid-round changes restart the round at the new difficulty.
    pub fn change_level(&self, level: u8) {
        self.inner.change_level(level);
    }

    /// Returns whether the click scored.
    pub fn on_click(&self, cell: usize) -> bool {
        self.inner.click(cell)
    }

    pub fn relayout(&self) {
        self.inner.relayout();
    }

    /// Fullscreen entered or left; measure once the transition has settled.
    pub fn on_fullscreen_change(&self) {
        self.inner.schedule_relayout();
    }

    pub fn toggle_fullscreen(&self) {
        self.inner.toggle_fullscreen();
    }

    /// Whether round timers (spawn, decay, clock) are scheduled.
    pub fn timers_armed(&self) -> bool {
        self.inner.timers.borrow().is_armed()
    }
}

impl<H: TimerHost + 'static, S: Screen + 'static> Drop for SessionController<H, S> {
    fn drop(&mut self) {
        self.inner.teardown();
        if let Some(handle) = self.inner.layout_timer.take() {
            self.inner.host.clear(handle);
        }
    }
}

impl<H: TimerHost + 'static, S: Screen + 'static> Inner<H, S> {
    /// Returns whether the state changed; listeners only hear about changes.
    fn dispatch(&self, action: GameAction) -> bool {
        let changed = {
            let mut state = self.state.borrow_mut();
            let next = state.clone().reduce(action);
            let changed = !Rc::ptr_eq(&state, &next);
            *state = next;
            changed
        };
        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        let snapshot = self.state.borrow().clone();
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn teardown(&self) {
        self.timers.borrow_mut().teardown(&self.host);
    }

    fn tick(self: &Rc<Self>, f: impl Fn(&Rc<Self>) + 'static) -> Box<dyn FnMut()> {
        let weak: Weak<Self> = Rc::downgrade(self);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                f(&inner);
            }
        })
    }

    fn start(self: &Rc<Self>) {
        self.teardown();
        self.dispatch(GameAction::Start);
        let level = self.state.borrow().level;
        let spawn = self
            .host
            .set_interval(spawn_interval_ms(level), self.tick(|inner| inner.spawn_tick()));
        let decay = self.host.set_interval(
            self.config.decay_tick_ms,
            self.tick(|inner| {
                inner.dispatch(GameAction::Decay);
            }),
        );
        let clock = self
            .host
            .set_interval(CLOCK_TICK_MS, self.tick(|inner| inner.clock_tick()));
        self.timers.borrow_mut().arm(&self.host, spawn, decay, clock);
        log::info!(
            "round started: level {} spawning every {}ms",
            level,
            spawn_interval_ms(level)
        );

        if self.screen.viewport().fullscreen {
            self.relayout();
        } else if let Err(e) = self.screen.request_fullscreen(self.on_fullscreen_rejected()) {
            self.fullscreen_failed(e);
        }
    }

    /// Late rejection path for a fullscreen request issued by this controller.
    fn on_fullscreen_rejected(self: &Rc<Self>) -> RejectHandler {
        let weak = Rc::downgrade(self);
        Box::new(move |e| {
            if let Some(inner) = weak.upgrade() {
                inner.fullscreen_failed(e);
            }
        })
    }

    fn fullscreen_failed(&self, e: ScreenError) {
        log::warn!("staying windowed: {}", e);
        self.relayout();
    }

    /// One-shot callback owned by the round; leaves the registry once it runs.
    fn defer(self: &Rc<Self>, delay_ms: u32, f: impl FnOnce(&Rc<Self>) + 'static) {
        let slot: Rc<Cell<Option<TimerHandle>>> = Rc::default();
        let weak = Rc::downgrade(self);
        let handle = self.host.set_timeout(delay_ms, {
            let slot = slot.clone();
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if let Some(handle) = slot.get() {
                        inner.timers.borrow_mut().forget(handle);
                    }
                    f(&inner);
                }
            })
        });
        slot.set(Some(handle));
        self.timers.borrow_mut().defer(handle);
    }

    fn stop(&self) {
        if !self.state.borrow().is_running() {
            return;
        }
        self.teardown();
        self.dispatch(GameAction::Stop);
        log::debug!("round stopped");
    }

    fn reset(&self) {
        self.teardown();
        self.dispatch(GameAction::Reset);
    }

    fn change_level(self: &Rc<Self>, level: u8) {
        let was_running = self.state.borrow().is_running();
        if self.dispatch(GameAction::SetLevel(level)) {
            log::debug!("level -> {}", self.state.borrow().level);
            if was_running {
                self.start();
            }
        }
    }

    fn spawn_tick(&self) {
        let free = self.state.borrow().board.inactive_count();
        if free == 0 {
            return;
        }
        let nth = self.rng.borrow_mut().gen_range(0..free);
        self.dispatch(GameAction::Spawn { nth });
    }

    fn clock_tick(self: &Rc<Self>) {
        self.dispatch(GameAction::ClockTick);
        let ended = self.state.borrow().phase == Phase::Ended;
        if ended {
            self.end();
        }
    }

    fn end(self: &Rc<Self>) {
        self.teardown();
        let summary = self.state.borrow().summary();
        log::info!(
            "round over: score {} of {} ({}%)",
            summary.score,
            summary.total_spawned,
            summary.hit_rate
        );
        self.defer(self.config.end_delay_ms, move |inner| inner.announce(summary));
    }

    fn announce(&self, summary: RoundSummary) {
        let listeners = self.round_end.borrow().clone();
        for listener in listeners {
            listener(summary);
        }
    }

    fn click(self: &Rc<Self>, cell: usize) -> bool {
        if !self.state.borrow().accepts_click(cell) {
            return false;
        }
        let round = self.state.borrow().round;
        self.dispatch(GameAction::Click { cell });
        self.defer(self.config.click_settle_ms, move |inner| {
            inner.dispatch(GameAction::Settle { cell, round });
        });
        true
    }

    fn relayout(&self) {
        let px = cell_size(self.screen.viewport(), &self.config);
        self.dispatch(GameAction::Relayout { cell_px: px });
    }

    fn schedule_relayout(self: &Rc<Self>) {
        if let Some(handle) = self.layout_timer.take() {
            self.host.clear(handle);
        }
        let weak = Rc::downgrade(self);
        let handle = self.host.set_timeout(
            self.config.layout_settle_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.layout_timer.set(None);
                    inner.relayout();
                }
            }),
        );
        self.layout_timer.set(Some(handle));
    }

    fn toggle_fullscreen(self: &Rc<Self>) {
        let res = if self.screen.viewport().fullscreen {
            self.screen.exit_fullscreen(self.on_fullscreen_rejected())
        } else {
            self.screen.request_fullscreen(self.on_fullscreen_rejected())
        };
        if let Err(e) = res {
            log::warn!("fullscreen toggle failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::layout::Viewport;
    use crate::timers::VirtualTimers;

    struct FixedScreen;

    impl Screen for FixedScreen {
        fn viewport(&self) -> Viewport {
            Viewport {
                width: 1280.0,
                height: 800.0,
                fullscreen: true,
            }
        }

        fn request_fullscreen(&self, _: RejectHandler) -> Result<(), ScreenError> {
            Ok(())
        }

        fn exit_fullscreen(&self, _: RejectHandler) -> Result<(), ScreenError> {
            Ok(())
        }
    }

    fn running() -> (VirtualTimers, SessionController<VirtualTimers, FixedScreen>) {
        let timers = VirtualTimers::new();
        let c = SessionController::new(
            GameConfig::default(),
            1,
            timers.clone(),
            FixedScreen,
            SmallRng::seed_from_u64(3),
        );
        c.start();
        (timers, c)
    }

    fn deferred(c: &SessionController<VirtualTimers, FixedScreen>) -> usize {
        c.inner.timers.borrow().deferred_len()
    }

    #[test]
    fn settled_clicks_leave_the_registry() {
        let (timers, c) = running();
        let mut clicked = 0;
        while clicked < 3 {
            timers.advance(100);
            let active = c.state().board.cells.iter().position(|cell| cell.is_clickable());
            if let Some(cell) = active {
                assert!(c.on_click(cell));
                clicked += 1;
            }
        }
        assert!(deferred(&c) >= 1);
        timers.advance(200);
        assert_eq!(deferred(&c), 0);
        assert!(c.timers_armed());
    }

    #[test]
    fn delivered_round_end_leaves_the_registry() {
        let (timers, c) = running();
        timers.advance(60_000);
        assert_eq!(deferred(&c), 1);
        timers.advance(100);
        assert_eq!(deferred(&c), 0);
        assert_eq!(timers.pending(), 0);
    }
}
