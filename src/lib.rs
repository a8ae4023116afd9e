//! Driver for the MAX31865 RTD-to-digital converter on a bit-banged SPI bus.
//!
//! The chip is driven through four plain GPIO pins ([`SoftSpi`]). Each
//! acquisition triggers a one-shot conversion, waits for it to settle and
//! reads the whole register bank back. The RTD resistance is then converted
//! to a temperature with one of the [`Conversion`] strategies.
//!
//! Chip faults are reported as data in [`FaultStatus`], never as an `Err`.
//!
//! [`Max31865::new`] guards the bus with a `CriticalSectionRawMutex`, which
//! keeps interrupts masked for the whole settle delay on bare metal. Use
//! [`Max31865::with_raw_mutex`] with `NoopRawMutex` or `ThreadModeRawMutex`
//! from `embassy_sync::blocking_mutex::raw` when the driver is only used from
//! one execution context.

#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod bitbang;
mod conversion;
mod diagnostics;
mod driver;
mod error;
mod register;
mod utils;

pub use bitbang::SoftSpi;
pub use conversion::{Conversion, callendar_van_dusen, celsius_to_fahrenheit, polynomial};
pub use diagnostics::{Fault, FaultStatus, ReadStats};
pub use driver::{
    Config, DEFAULT_REFERENCE_OHMS, DEFAULT_SETTLE_TIME_US, Max31865, RtdReading, Temperature,
};
pub use error::Error;
pub use register::{ConfigRegister, Filter, REGISTER_COUNT, Register, RegisterBank, Wiring};
