//! Background tasks spawned from the server entrypoint.

pub mod hold_reaper;
