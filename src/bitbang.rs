//! Bit-banged SPI link to the MAX31865
//!
//! Bytes are shifted most significant bit first. For every bit the clock is
//! driven high, the data line is driven (or sampled), and the clock is driven
//! low again. There is no setup/hold delay beyond the time the GPIO calls
//! take; the MAX31865 tolerates this at GPIO speeds.
//!
//! Chip select is always released after a transaction, even when a transfer
//! fails. If both fail, the transfer error is the one returned.
//!
//! Nothing here serializes access. Callers must not interleave two
//! transactions on the same pins.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::{error::Error, register::Register};

const WRITE_BIT: u8 = 0x80;

/// Software SPI over four GPIO pins
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoftSpi<CS, SCK, MOSI, MISO> {
    cs: CS,
    sck: SCK,
    mosi: MOSI,
    miso: MISO,
}

impl<CS, SCK, MOSI, MISO, E> SoftSpi<CS, SCK, MOSI, MISO>
where
    CS: OutputPin<Error = E>,
    SCK: OutputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
{
    /// Take the pins and put the bus into its idle state: chip select high,
    /// clock low, data out low
    ///
    /// # Errors
    ///
    /// Returns an error if any pin cannot be driven
    pub fn new(mut cs: CS, mut sck: SCK, mut mosi: MOSI, miso: MISO) -> Result<Self, Error<E>> {
        cs.set_high().map_err(Error::Pin)?;
        sck.set_low().map_err(Error::Pin)?;
        mosi.set_low().map_err(Error::Pin)?;

        Ok(Self { cs, sck, mosi, miso })
    }

    /// Release the pins, consuming the link
    pub fn release(self) -> (CS, SCK, MOSI, MISO) {
        (self.cs, self.sck, self.mosi, self.miso)
    }

    /// Shift one byte out on MOSI
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails
    pub fn send_byte(&mut self, byte: u8) -> Result<(), Error<E>> {
        for bit in (0..8).rev() {
            self.sck.set_high().map_err(Error::Pin)?;
            self.mosi
                .set_state(PinState::from(byte & (1 << bit) != 0))
                .map_err(Error::Pin)?;
            self.sck.set_low().map_err(Error::Pin)?;
        }
        Ok(())
    }

    /// Shift one byte in from MISO
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails
    pub fn recv_byte(&mut self) -> Result<u8, Error<E>> {
        let mut byte = 0u8;
        for _ in 0..8 {
            self.sck.set_high().map_err(Error::Pin)?;
            byte <<= 1;
            if self.miso.is_high().map_err(Error::Pin)? {
                byte |= 0x01;
            }
            self.sck.set_low().map_err(Error::Pin)?;
        }
        Ok(byte)
    }

    /// Write one register: address with the write bit set, then the data byte
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        let address = WRITE_BIT | u8::from(register);

        #[cfg(feature = "defmt")]
        defmt::trace!("Writing 0x{:02X} to register 0x{:02X}", value, address);

        self.select()?;
        let result = self
            .send_byte(address)
            .and_then(|()| self.send_byte(value));
        let deselected = self.deselect();
        result.and(deselected)
    }

    /// Burst read `buf.len()` registers starting at `start`
    ///
    /// The chip auto-increments the address, so the bytes land in `buf` in
    /// register order.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin operation fails
    pub fn read_registers(&mut self, start: Register, buf: &mut [u8]) -> Result<(), Error<E>> {
        let address = u8::from(start);

        self.select()?;
        let result = self.send_byte(address).and_then(|()| {
            for byte in buf.iter_mut() {
                *byte = self.recv_byte()?;
            }
            Ok(())
        });
        let deselected = self.deselect();

        #[cfg(feature = "defmt")]
        defmt::trace!("Read from register 0x{:02X}: {}", address, buf);

        result.and(deselected)
    }

    fn select(&mut self) -> Result<(), Error<E>> {
        self.cs.set_low().map_err(Error::Pin)
    }

    fn deselect(&mut self) -> Result<(), Error<E>> {
        self.cs.set_high().map_err(Error::Pin)
    }
}
