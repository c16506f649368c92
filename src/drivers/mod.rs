//! Output line initialisation helpers.

pub mod hw_init;
