//! The shutter keys: open, close, stop, favourite.
//!
//! Each key's settings name the controller and the shade.  The handler
//! turns them into a [`ShadeCommandRequest`] and sends it through a
//! [`ShadeLink`].
//!
//! The link client does not serialise requests.  A quick double press
//! would otherwise put two overlapping connections on the same controller,
//! so all shade handlers share an [`AddressLocks`] and hold the lock for
//! their controller while a command is in flight.

use super::ActionError;
use crate::event::{KeyEvent, ShadeSettings};
use crate::shade::command::{CommandKind, ShadeCommandRequest};
use crate::traits::{ActionHandler, ShadeLink};
use log::{error, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One mutex per controller address.
#[derive(Debug, Default)]
pub struct AddressLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `address`, created on first use.
    pub fn lock_for(&self, address: &str) -> Arc<Mutex<()>> {
        // Poisoning leaves nothing inconsistent here.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(address.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sends one fixed [`CommandKind`] to the shade named in the key settings.
pub struct ShadeHandler {
    kind: CommandKind,
    link: Arc<dyn ShadeLink>,
    locks: Arc<AddressLocks>,
}

impl ShadeHandler {
    pub fn new(kind: CommandKind, link: Arc<dyn ShadeLink>, locks: Arc<AddressLocks>) -> Self {
        Self { kind, link, locks }
    }

    /// Build the request for `settings`.
    pub fn request(&self, settings: ShadeSettings) -> ShadeCommandRequest {
        ShadeCommandRequest {
            address: settings.address,
            shade_id: settings.shade_id,
            motor_type: settings.motor_type,
            kind: self.kind,
        }
    }
}

impl ActionHandler for ShadeHandler {
    fn handle(&self, event: &KeyEvent) -> Result<(), ActionError> {
        let settings: ShadeSettings = event.settings()?;
        let request = self.request(settings);
        info!("address: {}", request.address);
        info!("command: {}", request.encode());

        let lock = self.locks.lock_for(&request.address);
        let _guard = acquire(&lock);

        match self.link.execute(&request) {
            Ok(reply) => {
                info!("{} replied: {}", request.address, reply);
                Ok(())
            }
            Err(e) => {
                error!("shade {} {}: {}", request.shade_id, self.kind, e);
                Err(e.into())
            }
        }
    }
}
