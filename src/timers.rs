//! Cancellable periodic and one-shot callbacks.
//!
//! The session controller never talks to `window.setInterval` directly; it goes
//! through [`TimerHost`] so rounds can be driven by [`BrowserTimers`] in the page
//! and by [`VirtualTimers`] in tests. Every handle a round creates is parked in a
//! [`TimerRegistry`] and released only by [`TimerRegistry::teardown`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(i32);

pub trait TimerHost {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle;
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle;
    /// Cancels `handle`. Unknown or already fired handles are ignored.
    fn clear(&self, handle: TimerHandle);
}

// ---------------- Browser -----------------

struct LiveTimer {
    _closure: Closure<dyn FnMut()>,
    repeating: bool,
}

/// `window.setInterval` / `setTimeout`. Closures stay alive in `live` until
/// cleared (intervals) or until the next scheduling call after they fired
/// (timeouts).
#[derive(Clone, Default)]
pub struct BrowserTimers {
    live: Rc<RefCell<HashMap<i32, LiveTimer>>>,
    fired: Rc<RefCell<Vec<i32>>>,
}

impl BrowserTimers {
    pub fn new() -> Self {
        Self::default()
    }

    fn reap(&self) {
        let fired: Vec<i32> = self.fired.borrow_mut().drain(..).collect();
        let mut live = self.live.borrow_mut();
        for id in fired {
            live.remove(&id);
        }
    }

    fn register(&self, closure: Closure<dyn FnMut()>, ms: u32, repeating: bool) -> TimerHandle {
        let Some(window) = web_sys::window() else {
            log::warn!("no window; timer dropped");
            return TimerHandle(0);
        };
        let f = closure.as_ref().unchecked_ref();
        let res = if repeating {
            window.set_interval_with_callback_and_timeout_and_arguments_0(f, ms as i32)
        } else {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(f, ms as i32)
        };
        match res {
            Ok(id) => {
                self.live.borrow_mut().insert(id, LiveTimer { _closure: closure, repeating });
                TimerHandle(id)
            }
            Err(e) => {
                log::warn!("timer registration failed: {:?}", e);
                TimerHandle(0)
            }
        }
    }
}

impl TimerHost for BrowserTimers {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        self.reap();
        self.register(Closure::wrap(callback), period_ms, true)
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        self.reap();
        let id = Rc::new(Cell::new(0));
        let mut callback = Some(callback);
        let closure = {
            let id = id.clone();
            let fired = self.fired.clone();
            Closure::wrap(Box::new(move || {
                if let Some(f) = callback.take() {
                    f();
                }
                fired.borrow_mut().push(id.get());
            }) as Box<dyn FnMut()>)
        };
        let handle = self.register(closure, delay_ms, false);
        id.set(handle.0);
        handle
    }

    fn clear(&self, handle: TimerHandle) {
        let Some(timer) = self.live.borrow_mut().remove(&handle.0) else { return; };
        if let Some(window) = web_sys::window() {
            if timer.repeating {
                window.clear_interval_with_handle(handle.0);
            } else {
                window.clear_timeout_with_handle(handle.0);
            }
        }
    }
}

// ---------------- Virtual clock -----------------

enum Pending {
    Repeat(Box<dyn FnMut()>),
    Once(Box<dyn FnOnce()>),
}

struct Entry {
    due: u64,
    period: u64,
    /// `None` while the callback is executing.
    callback: Option<Pending>,
}

#[derive(Default)]
struct VirtualInner {
    now: u64,
    next_id: i32,
    entries: BTreeMap<i32, Entry>,
}

/// Deterministic clock advanced by hand. Due callbacks fire in (due time,
/// creation order); they may schedule or clear timers while running.
#[derive(Clone, Default)]
pub struct VirtualTimers {
    inner: Rc<RefCell<VirtualInner>>,
}

impl VirtualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.inner.borrow().now
    }

    /// Timers registered and not yet cleared or fired.
    pub fn pending(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn advance(&self, ms: u64) {
        let target = self.inner.borrow().now + ms;
        loop {
            let next = {
                let inner = self.inner.borrow();
                inner
                    .entries
                    .iter()
                    .filter(|(_, e)| e.callback.is_some() && e.due <= target)
                    .min_by_key(|(id, e)| (e.due, **id))
                    .map(|(id, e)| (*id, e.due))
            };
            let Some((id, due)) = next else { break; };
            let pending = {
                let mut inner = self.inner.borrow_mut();
                inner.now = due;
                let taken = inner.entries.get_mut(&id).and_then(|e| e.callback.take());
                match taken {
                    Some(Pending::Once(f)) => {
                        inner.entries.remove(&id);
                        Some(Pending::Once(f))
                    }
                    other => other,
                }
            };
            match pending {
                Some(Pending::Once(f)) => f(),
                Some(Pending::Repeat(mut f)) => {
                    f();
                    // re-arm unless cleared from inside the callback
                    if let Some(e) = self.inner.borrow_mut().entries.get_mut(&id) {
                        e.due += e.period;
                        e.callback = Some(Pending::Repeat(f));
                    }
                }
                None => {}
            }
        }
        self.inner.borrow_mut().now = target;
    }

    fn insert(&self, ms: u32, callback: Pending) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        let entry = Entry {
            due: inner.now + ms as u64,
            period: (ms as u64).max(1),
            callback: Some(callback),
        };
        inner.entries.insert(id, entry);
        TimerHandle(id)
    }
}

impl TimerHost for VirtualTimers {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        self.insert(period_ms.max(1), Pending::Repeat(callback))
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        self.insert(delay_ms, Pending::Once(callback))
    }

    fn clear(&self, handle: TimerHandle) {
        self.inner.borrow_mut().entries.remove(&handle.0);
    }
}

// ---------------- Registry -----------------

/// Handles owned by the current round.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    spawn: Option<TimerHandle>,
    decay: Option<TimerHandle>,
    clock: Option<TimerHandle>,
    /// Click settles and the end-of-round notification.
    deferred: Vec<TimerHandle>,
}

impl TimerRegistry {
    pub fn arm<H: TimerHost + ?Sized>(
        &mut self,
        host: &H,
        spawn: TimerHandle,
        decay: TimerHandle,
        clock: TimerHandle,
    ) {
        self.teardown(host);
        self.spawn = Some(spawn);
        self.decay = Some(decay);
        self.clock = Some(clock);
    }

    pub fn defer(&mut self, handle: TimerHandle) {
        self.deferred.push(handle);
    }

    /// Drops a deferred handle whose callback has run.
    pub fn forget(&mut self, handle: TimerHandle) {
        self.deferred.retain(|h| *h != handle);
    }

    pub fn is_armed(&self) -> bool {
        self.spawn.is_some() || self.decay.is_some() || self.clock.is_some()
    }

    #[cfg(test)]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn teardown<H: TimerHost + ?Sized>(&mut self, host: &H) {
        let periodic = [self.spawn.take(), self.decay.take(), self.clock.take()];
        for handle in periodic.into_iter().flatten().chain(self.deferred.drain(..)) {
            host.clear(handle);
        }
    }
}
