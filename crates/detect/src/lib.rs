//! # Detect
//!
//! Event locators for noisy, biased probe channels.
//!
//! Every locator is built on [`signal_event`]: a threshold band combined with a
//! minimum run length. "No event" is a normal outcome reported through a
//! sentinel index (or `None` from the `Option` forms), never an error.
//! Detectors that want the first sample over a threshold use [`first_crossing`],
//! the same locator applied to the channel's running maximum.
//!
//! | locator              | channel              | search   |
//! |----------------------|----------------------|----------|
//! | acceleration start   | gravity-free accel   | forward  |
//! | acceleration stop    | gravity-free accel   | backward |
//! | optical surface      | active vs ambient    | forward  |
//! | optical stop         | NIR                  | backward |
//! | sensor start         | force                | forward  |
//! | ground strike        | force around stop    | forward  |

mod acceleration;
mod force;
mod optical;
mod signal_event;

pub use acceleration::{acceleration_start, acceleration_stop};
pub use force::{ground_strike, sensor_start};
pub use optical::{optical_stop, optical_surface};
pub use signal_event::{find_signal_event, first_crossing, nearest_value_index, signal_event};
