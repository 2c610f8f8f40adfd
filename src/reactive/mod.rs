//! Reactive state: signals and effects.
//!
//! Leptos-style fine-grained reactivity backing the reference form store.
//!
//! - [`create_signal`]: create a read/write signal pair.
//! - [`create_effect`]: auto-tracking side effect.
//! - [`watch`]: change callback that skips the initial run.
//! - [`batch`]: coalesce multiple writes into one notification pass.

pub mod signal;
pub mod effect;

pub use signal::{create_signal, dispose_signal, ReadSignal, SignalId, WriteSignal};
pub use effect::{batch, create_effect, dispose_effect, effect_alive, watch, EffectId};
