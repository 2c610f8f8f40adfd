//! Effect-facing API and the change-watch helper used by form stores.
//!
//! An effect is a closure that re-runs whenever any signal it read changes:
//!
//! ```ignore
//! let (count, set_count) = create_signal(0);
//! create_effect(move || {
//!     println!("count = {}", count.get());
//! });
//! set_count.set(1); // prints "count = 1"
//! ```
//!
//! [`watch`] is the variant subscriptions want: it skips the initial run, so
//! the callback only fires on changes made after it was installed.

pub use super::signal::{batch, create_effect, dispose_effect, effect_alive, EffectId};

use super::signal::ReadSignal;

/// Call `on_change` after every write to `source`, but not immediately.
pub fn watch<T: 'static>(source: ReadSignal<T>, mut on_change: impl FnMut() + 'static) -> EffectId {
    let mut primed = false;
    create_effect(move || {
        source.with(|_| ());
        if primed {
            on_change();
        } else {
            primed = true;
        }
    })
}
