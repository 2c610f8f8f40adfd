//! Signals and the thread-local runtime that tracks who reads them.
//!
//! Single-threaded and synchronous, modeled after Leptos's client-side
//! reactivity: a signal stores a value, an effect re-runs whenever a signal it
//! read during its last run is written. [`FormStore`](crate::host::FormStore)
//! keeps form values in a signal and implements change subscriptions as
//! effects.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a signal slot inside the runtime.
    pub struct SignalId;
    /// Identifies an effect slot inside the runtime.
    pub struct EffectId;
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

struct SignalState {
    value: Box<dyn Any>,
    subscribers: HashSet<EffectId>,
}

struct EffectState {
    /// Taken out while the effect runs so the runtime is not borrowed across
    /// the user callback.
    callback: Option<Box<dyn FnMut()>>,
    dependencies: HashSet<SignalId>,
}

struct Runtime {
    signals: SlotMap<SignalId, SignalState>,
    effects: SlotMap<EffectId, EffectState>,
    /// The effect currently executing (for auto-tracking).
    tracking: Option<EffectId>,
    /// When > 0 we are inside a `batch()` call and effects are deferred.
    batch_depth: usize,
    /// Effects to run once the outermost batch or notification loop ends.
    pending_effects: Vec<EffectId>,
    /// Set while the notification loop drains; nested writes queue instead.
    notifying: bool,
}

impl Runtime {
    fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            tracking: None,
            batch_depth: 0,
            pending_effects: Vec::new(),
            notifying: false,
        }
    }

    fn subscribers(&self, id: SignalId) -> Vec<EffectId> {
        self.signals
            .get(id)
            .map(|signal| signal.subscribers.iter().copied().collect())
            .unwrap_or_default()
    }

    fn unlink(&mut self, eid: EffectId) {
        let deps: Vec<SignalId> = match self.effects.get_mut(eid) {
            Some(effect) => effect.dependencies.drain().collect(),
            None => return,
        };
        for sid in deps {
            if let Some(signal) = self.signals.get_mut(sid) {
                signal.subscribers.remove(&eid);
            }
        }
    }
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

// ---------------------------------------------------------------------------
// Signal creation and disposal
// ---------------------------------------------------------------------------

/// Create a signal holding `initial`.
///
/// Returns a `(ReadSignal<T>, WriteSignal<T>)` pair. Reading inside an effect
/// subscribes that effect to later writes.
pub fn create_signal<T: 'static>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    let id = RUNTIME.with(|rt| {
        rt.borrow_mut().signals.insert(SignalState {
            value: Box::new(initial),
            subscribers: HashSet::new(),
        })
    });

    (
        ReadSignal {
            id,
            _marker: PhantomData,
        },
        WriteSignal {
            id,
            _marker: PhantomData,
        },
    )
}

/// Free a signal's slot. Later reads through either half panic.
///
/// Safe to call while the thread-local runtime is being torn down.
pub fn dispose_signal(id: SignalId) {
    let _ = RUNTIME.try_with(|rt| {
        if let Ok(mut rt) = rt.try_borrow_mut() {
            if let Some(signal) = rt.signals.remove(id) {
                for eid in signal.subscribers {
                    if let Some(effect) = rt.effects.get_mut(eid) {
                        effect.dependencies.remove(&id);
                    }
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// ReadSignal
// ---------------------------------------------------------------------------

/// Read-half of a signal. `Copy`: only stores an id.
pub struct ReadSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for ReadSignal<T> {}
impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn id(&self) -> SignalId {
        self.id
    }

    /// Read the current value, subscribing the running effect (if any).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(|v| v.clone())
    }

    /// Read by reference without cloning. Still subscribes the running effect.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        RUNTIME.with(|rt| {
            {
                let mut rt_ref = rt.borrow_mut();
                if let Some(eid) = rt_ref.tracking {
                    if let Some(signal) = rt_ref.signals.get_mut(self.id) {
                        signal.subscribers.insert(eid);
                    }
                    if let Some(effect) = rt_ref.effects.get_mut(eid) {
                        effect.dependencies.insert(self.id);
                    }
                }
            }
            let rt_ref = rt.borrow();
            f(downcast(&rt_ref, self.id))
        })
    }

    /// Read without subscribing any running effect.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.with_untracked(|v| v.clone())
    }

    /// Read by reference without subscribing any running effect.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        RUNTIME.with(|rt| f(downcast(&rt.borrow(), self.id)))
    }
}

fn downcast<T: 'static>(rt: &Runtime, id: SignalId) -> &T {
    rt.signals
        .get(id)
        .expect("signal disposed")
        .value
        .downcast_ref::<T>()
        .expect("signal type mismatch")
}

// ---------------------------------------------------------------------------
// WriteSignal
// ---------------------------------------------------------------------------

/// Write-half of a signal. `Copy`: only stores an id.
pub struct WriteSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for WriteSignal<T> {}
impl<T: 'static> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> WriteSignal<T> {
    /// Overwrite the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.update(|slot| *slot = value);
    }

    /// Mutate the value in place and notify subscribers.
    ///
    /// `f` runs while the runtime is borrowed and must not touch signals.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let subs = RUNTIME.with(|rt| {
            let mut rt_ref = rt.borrow_mut();
            let slot = rt_ref
                .signals
                .get_mut(self.id)
                .expect("signal disposed")
                .value
                .downcast_mut::<T>()
                .expect("signal type mismatch");
            f(slot);
            rt_ref.subscribers(self.id)
        });
        notify_subscribers(subs);
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Create an effect that auto-tracks signal reads.
///
/// The closure runs once immediately (establishing its subscriptions), then
/// again after every write to a signal it read on its previous run.
pub fn create_effect(f: impl FnMut() + 'static) -> EffectId {
    let eid = RUNTIME.with(|rt| {
        rt.borrow_mut().effects.insert(EffectState {
            callback: Some(Box::new(f)),
            dependencies: HashSet::new(),
        })
    });
    run_effect(eid);
    eid
}

/// Remove an effect. It never runs again, even if a notification for it is
/// already queued.
pub fn dispose_effect(eid: EffectId) {
    let removed = RUNTIME.try_with(|rt| {
        rt.try_borrow_mut().ok().and_then(|mut rt| {
            rt.unlink(eid);
            rt.effects.remove(eid)
        })
    });
    // The callback may own signals; drop it with the runtime released.
    drop(removed);
}

/// Whether `eid` still exists.
pub fn effect_alive(eid: EffectId) -> bool {
    RUNTIME.with(|rt| rt.borrow().effects.contains_key(eid))
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Run `f`, deferring effects until it returns so each runs at most once.
pub fn batch(f: impl FnOnce()) {
    RUNTIME.with(|rt| {
        rt.borrow_mut().batch_depth += 1;
    });

    f();

    let pending = RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        rt_ref.batch_depth -= 1;
        if rt_ref.batch_depth == 0 {
            std::mem::take(&mut rt_ref.pending_effects)
        } else {
            Vec::new()
        }
    });

    notify_subscribers(pending);
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Run a single effect: clear old deps, set tracking, execute callback.
fn run_effect(eid: EffectId) {
    let maybe_cb = RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        rt_ref.unlink(eid);
        rt_ref
            .effects
            .get_mut(eid)
            .and_then(|effect| effect.callback.take())
    });

    let Some(mut cb) = maybe_cb else {
        return;
    };

    let prev_tracking = RUNTIME.with(|rt| rt.borrow_mut().tracking.replace(eid));

    cb();

    RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        rt_ref.tracking = prev_tracking;
        // Disposed while running: drop the callback with it.
        if let Some(effect) = rt_ref.effects.get_mut(eid) {
            effect.callback = Some(cb);
        }
    });
}

/// Run subscriber effects, deduplicated, draining anything they queue.
fn notify_subscribers(subs: Vec<EffectId>) {
    if subs.is_empty() {
        return;
    }

    let deferred = RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        if rt_ref.batch_depth > 0 || rt_ref.notifying {
            rt_ref.pending_effects.extend(subs.iter().copied());
            true
        } else {
            rt_ref.notifying = true;
            false
        }
    });
    if deferred {
        return;
    }

    let mut queue = subs;
    while !queue.is_empty() {
        let mut seen = HashSet::new();
        let round: Vec<EffectId> = queue.drain(..).filter(|eid| seen.insert(*eid)).collect();
        for eid in round {
            run_effect(eid);
        }
        RUNTIME.with(|rt| {
            queue.append(&mut rt.borrow_mut().pending_effects);
        });
    }

    RUNTIME.with(|rt| {
        rt.borrow_mut().notifying = false;
    });
}

// ---------------------------------------------------------------------------
// Test helper: reset the thread-local runtime between tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn reset_runtime() {
    RUNTIME.with(|rt| {
        *rt.borrow_mut() = Runtime::new();
    });
}

#[cfg(test)]
pub(crate) fn live_counts() -> (usize, usize) {
    RUNTIME.with(|rt| {
        let rt = rt.borrow();
        (rt.signals.len(), rt.effects.len())
    })
}
