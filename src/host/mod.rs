//! The contract between the engine and the form-state host.
//!
//! The engine never owns form values. It reads them, registers the fields it
//! renders, and asks to be told when anything changes, all through
//! [`FormHost`]. [`FormStore`] is an in-memory host for applications that do
//! not bring their own.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::descriptor::ItemProps;
use crate::error::ComposeError;
use crate::path::NamePath;

pub mod store;

pub use store::FormStore;

/// One entry of a repeatable list.
///
/// `key` identifies the entry for as long as it exists, independent of where
/// it currently sits. `index` is its position right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListEntry {
    pub key: u64,
    pub index: usize,
}

/// Mutations a list renderer exposes to its item and list transforms.
pub trait ListOperations {
    /// Insert `value` (or `null`) at `index`, appending when `index` is `None`.
    fn add(&self, value: Option<Value>, index: Option<usize>) -> Result<(), ComposeError>;
    fn remove(&self, index: usize) -> Result<(), ComposeError>;
    fn move_entry(&self, from: usize, to: usize) -> Result<(), ComposeError>;
}

/// Shared handle to one list's operations.
pub type ListHandle = Rc<dyn ListOperations>;

/// Form-state host.
///
/// Methods take `&self`; hosts use interior mutability. Implementations must
/// tolerate being called from inside a subscription callback.
pub trait FormHost {
    /// Every current value.
    fn values(&self) -> Value;

    /// Declare a field under its full identifier, with its wrapper config.
    /// Registering an already-registered name replaces its config.
    fn register_field(&self, name: &NamePath, props: &ItemProps);

    fn unregister_field(&self, name: &NamePath);

    /// Call `callback` after every subsequent value change.
    fn subscribe(&self, callback: Box<dyn FnMut()>) -> Subscription;

    /// Current entries of the list at `name`, in order.
    fn list_entries(&self, name: &NamePath) -> Vec<ListEntry>;

    /// Operations bound to the list at `name`.
    fn list_operations(&self, name: &NamePath) -> ListHandle;
}

/// A live change subscription. Dropping it cancels.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// A subscription that runs `cancel` when cancelled or dropped.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
