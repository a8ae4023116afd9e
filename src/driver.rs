//! One-shot acquisition driver for the MAX31865

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::{
    Mutex,
    raw::{CriticalSectionRawMutex, RawMutex},
};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::{
    bitbang::SoftSpi,
    conversion::{Conversion, celsius_to_fahrenheit},
    diagnostics::{FaultStatus, ReadStats},
    error::Error,
    register::{ConfigRegister, Filter, REGISTER_COUNT, Register, RegisterBank, Wiring},
};

/// Settling time after a one-shot trigger, in microseconds
pub const DEFAULT_SETTLE_TIME_US: u32 = 5_000;
/// Reference resistor on PT100 breakout boards
pub const DEFAULT_REFERENCE_OHMS: f64 = 430.0;

/// Acquisition settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Wait between triggering a conversion and reading it back.
    ///
    /// This dominates the cost of an acquisition. Values from 0.5 ms to
    /// 500 ms have been used; too short reads the previous conversion.
    pub settle_time_us: u32,
    /// Value of the reference resistor in ohms
    pub reference_ohms: f64,
    pub wiring: Wiring,
    pub filter: Filter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_time_us: DEFAULT_SETTLE_TIME_US,
            reference_ohms: DEFAULT_REFERENCE_OHMS,
            wiring: Wiring::default(),
            filter: Filter::default(),
        }
    }
}

/// RTD resistance together with the fault status it was read with
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtdReading {
    /// Resistance in ohms; meaningless when `status` is not ok
    pub resistance: f64,
    pub status: FaultStatus,
}

/// Temperature together with the fault status it was read with
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Temperature {
    /// Temperature in °C; meaningless when `status` is not ok
    pub celsius: f64,
    pub status: FaultStatus,
}

impl Temperature {
    #[must_use]
    pub fn fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(self.celsius)
    }
}

struct Bus<CS, SCK, MOSI, MISO, D> {
    spi: SoftSpi<CS, SCK, MOSI, MISO>,
    delay: D,
}

/// MAX31865 driver instance
///
/// All reads take `&self`. The trigger, settle and read-back steps run under
/// a blocking mutex of type `M`, so the instance can be shared between
/// threads or interrupt priorities and at most one chip transaction is in
/// flight. The mutex is held for the whole settle delay.
///
/// With the default [`CriticalSectionRawMutex`] that means interrupts stay
/// masked for the settle time on bare metal targets; pick another
/// [`RawMutex`] through [`Max31865::with_raw_mutex`] if that matters.
///
/// Good/bad counters sit behind a second mutex of the same type, so no
/// atomic instructions are needed and `thumbv6m` targets are supported.
pub struct Max31865<CS, SCK, MOSI, MISO, D, M = CriticalSectionRawMutex> {
    bus: Mutex<M, RefCell<Bus<CS, SCK, MOSI, MISO, D>>>,
    stats: Mutex<M, Cell<ReadStats>>,
    config: Config,
}

impl<CS, SCK, MOSI, MISO, D> Max31865<CS, SCK, MOSI, MISO, D, CriticalSectionRawMutex> {
    /// Create a new MAX31865 driver instance
    pub fn new(spi: SoftSpi<CS, SCK, MOSI, MISO>, delay: D, config: Config) -> Self {
        Self::with_raw_mutex(spi, delay, config)
    }
}

impl<CS, SCK, MOSI, MISO, D, M: RawMutex> Max31865<CS, SCK, MOSI, MISO, D, M> {
    /// Create a new driver instance guarded by a mutex of type `M`
    pub fn with_raw_mutex(spi: SoftSpi<CS, SCK, MOSI, MISO>, delay: D, config: Config) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(Bus { spi, delay })),
            stats: Mutex::new(Cell::new(ReadStats::default())),
            config,
        }
    }

    /// Active settings
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Good and bad read counts since creation
    pub fn read_stats(&self) -> ReadStats {
        self.stats.lock(Cell::get)
    }

    /// Report the final read counts and release the bus, consuming the driver
    pub fn release(self) -> (SoftSpi<CS, SCK, MOSI, MISO>, D, ReadStats) {
        let stats = self.stats.into_inner().into_inner();

        #[cfg(feature = "defmt")]
        defmt::info!("MAX31865 released: goodreads = {}, badreads = {}", stats.good, stats.bad);

        let Bus { spi, delay } = self.bus.into_inner().into_inner();
        (spi, delay, stats)
    }
}

impl<CS, SCK, MOSI, MISO, D, M, E> Max31865<CS, SCK, MOSI, MISO, D, M>
where
    CS: OutputPin<Error = E>,
    SCK: OutputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    D: DelayNs,
    M: RawMutex,
{
    /// Trigger a one-shot conversion and read the full register bank
    ///
    /// Counts towards [`Self::read_stats`] like every other read.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails
    pub fn read_registers(&self) -> Result<RegisterBank, Error<E>> {
        let bank = self.acquire()?;
        self.stats.lock(|stats| {
            let mut updated = stats.get();
            updated.record(bank.fault_status());
            stats.set(updated);
        });
        Ok(bank)
    }

    /// Read the RTD resistance in ohms
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails. Chip faults are reported
    /// in [`RtdReading::status`].
    pub fn read_rtd(&self) -> Result<RtdReading, Error<E>> {
        let bank = self.read_registers()?;
        let reading = RtdReading {
            resistance: bank.resistance(self.config.reference_ohms),
            status: bank.fault_status(),
        };

        #[cfg(feature = "defmt")]
        {
            defmt::debug!(
                "RTD code {}, {} ohms, config 0x{:02X}",
                bank.rtd_code(),
                reading.resistance,
                bank.config().bits()
            );
            if !reading.status.is_ok() {
                defmt::warn!("Fault status 0x{:02X}", reading.status.raw());
            }
        }

        Ok(reading)
    }

    /// Read the temperature with the default 5th order conversion
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails
    pub fn temperature(&self) -> Result<Temperature, Error<E>> {
        self.temperature_with(Conversion::default())
    }

    /// Read the temperature with the given conversion
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails
    pub fn temperature_with(&self, conversion: Conversion) -> Result<Temperature, Error<E>> {
        let RtdReading { resistance, status } = self.read_rtd()?;
        let celsius = conversion.to_celsius(resistance);

        #[cfg(feature = "defmt")]
        defmt::trace!("{} temperature: {} degC", conversion, celsius);

        Ok(Temperature { celsius, status })
    }

    fn acquire(&self) -> Result<RegisterBank, Error<E>> {
        let trigger = ConfigRegister::one_shot_trigger(self.config.wiring, self.config.filter);
        let settle_time_us = self.config.settle_time_us;

        self.bus.lock(|bus| -> Result<RegisterBank, Error<E>> {
            let mut bus = bus.borrow_mut();
            let Bus { spi, delay } = &mut *bus;

            spi.write_register(Register::Config, trigger.bits())?;
            delay.delay_us(settle_time_us);

            let mut raw = [0u8; REGISTER_COUNT];
            spi.read_registers(Register::Config, &mut raw)?;
            Ok(RegisterBank::new(raw))
        })
    }
}
