//! Motorized shade control.
//!
//! [`command`] turns a shade id, motor type and [`CommandKind`](command::CommandKind)
//! into the controller's plain-text command, and [`client`] delivers it
//! over TCP and reads back the reply.
//!
//! Nothing outside this module should know the wire format.

pub mod client;
pub mod command;
