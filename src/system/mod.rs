//! Operating-system backends.
//!
//! This module provides the concrete [`Launcher`](crate::traits::Launcher)
//! used outside of tests.  Nothing else in the crate spawns processes
//! directly.

pub mod launcher;
