//! **deckctl**: key-press actions for a Stream Deck.
//!
//! A key press arrives as a [`KeyEvent`](event::KeyEvent) and is routed by
//! the [`Dispatcher`](dispatcher::Dispatcher) to the handler registered for
//! its action key.  Handlers arrange windows, switch audio devices, focus a
//! browser tab, pause, or drive motorized shades.
//!
//! # Architecture
//!
//! The crate is organised around three traits:
//!
//! * [`traits::ActionHandler`]: one action; the dispatcher only knows this.
//! * [`traits::Launcher`]: runs helper programs, so handlers are not
//!   coupled to process spawning.
//! * [`traits::ShadeLink`]: delivers a shade command, so the shutter keys
//!   are not coupled to the network.
//!
//! The shade protocol itself lives in [`shade`]: [`shade::command`] builds
//! the controller's plain-text commands and [`shade::client`] sends them
//! over short-lived TCP connections with bounded timeouts.  The concrete
//! process launcher lives in [`system`].

pub mod actions;
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod logging;
pub mod shade;
pub mod system;
pub mod traits;
