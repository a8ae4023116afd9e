//! Register map of the MAX31865.

use crate::{diagnostics::FaultStatus, utils};

/// Number of registers read back by one acquisition
pub const REGISTER_COUNT: usize = 8;

/// Register addresses for MAX31865 (read addresses; writes set bit 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Register {
    /// Configuration
    Config = 0x00,
    /// RTD ratio MSB
    RtdMsb = 0x01,
    /// RTD ratio LSB, bit 0 mirrors the fault flag
    RtdLsb = 0x02,
    /// High fault threshold MSB
    HighFaultMsb = 0x03,
    /// High fault threshold LSB
    HighFaultLsb = 0x04,
    /// Low fault threshold MSB
    LowFaultMsb = 0x05,
    /// Low fault threshold LSB
    LowFaultLsb = 0x06,
    /// Fault status
    FaultStatus = 0x07,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

/// RTD lead configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wiring {
    /// 2-wire or 4-wire RTD
    TwoOrFourWire,
    /// 3-wire RTD
    #[default]
    ThreeWire,
}

/// Mains noise rejection filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Filter {
    /// Reject 50 Hz
    Hz50,
    /// Reject 60 Hz
    #[default]
    Hz60,
}

bitfield::bitfield! {
    /// CONFIG
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ConfigRegister(u8);
    impl Debug;
    u8;
    /// Bias voltage on
    pub vbias, set_vbias: 7;
    /// Automatic conversion mode
    pub auto_conversion, set_auto_conversion: 6;
    /// Start a single conversion; self-clearing
    pub one_shot, set_one_shot: 5;
    /// 3-wire RTD when set, 2/4-wire otherwise
    pub three_wire, set_three_wire: 4;
    /// Fault detection cycle control
    ///
    /// - `00` = no action
    /// - `01` = automatic delay
    /// - `10` = run cycle with manual delay
    /// - `11` = finish cycle with manual delay
    pub fault_cycle, set_fault_cycle: 3, 2;
    /// Clear the fault status register; self-clearing
    pub fault_clear, set_fault_clear: 1;
    /// 50 Hz filter when set, 60 Hz otherwise
    pub filter_50hz, set_filter_50hz: 0;
}

impl ConfigRegister {
    /// Configuration that starts one conversion with the bias voltage on,
    /// the fault detection cycle off and the fault status cleared
    #[must_use]
    pub fn one_shot_trigger(wiring: Wiring, filter: Filter) -> Self {
        let mut reg = Self(0);
        reg.set_vbias(true);
        reg.set_one_shot(true);
        reg.set_three_wire(wiring == Wiring::ThreeWire);
        reg.set_fault_clear(true);
        reg.set_filter_50hz(filter == Filter::Hz50);
        reg
    }

    /// Raw register byte
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl From<u8> for ConfigRegister {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl From<ConfigRegister> for u8 {
    fn from(reg: ConfigRegister) -> u8 {
        reg.0
    }
}

/// The full register bank as returned by one burst read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterBank([u8; REGISTER_COUNT]);

impl RegisterBank {
    #[must_use]
    pub const fn new(raw: [u8; REGISTER_COUNT]) -> Self {
        Self(raw)
    }

    /// Raw register bytes, indexed by address
    #[must_use]
    pub const fn raw(&self) -> &[u8; REGISTER_COUNT] {
        &self.0
    }

    fn get(&self, reg: Register) -> u8 {
        self.0[usize::from(u8::from(reg))]
    }

    /// Configuration register as echoed by the chip
    #[must_use]
    pub fn config(&self) -> ConfigRegister {
        ConfigRegister(self.get(Register::Config))
    }

    /// 15-bit RTD ratio code
    #[must_use]
    pub fn rtd_code(&self) -> u16 {
        utils::code_from_pair(self.get(Register::RtdMsb), self.get(Register::RtdLsb))
    }

    /// 15-bit high fault threshold code
    #[must_use]
    pub fn high_fault_threshold(&self) -> u16 {
        utils::code_from_pair(
            self.get(Register::HighFaultMsb),
            self.get(Register::HighFaultLsb),
        )
    }

    /// 15-bit low fault threshold code
    #[must_use]
    pub fn low_fault_threshold(&self) -> u16 {
        utils::code_from_pair(
            self.get(Register::LowFaultMsb),
            self.get(Register::LowFaultLsb),
        )
    }

    /// Fault status register
    #[must_use]
    pub fn fault_status(&self) -> FaultStatus {
        FaultStatus::new(self.get(Register::FaultStatus))
    }

    /// RTD resistance in ohms for the given reference resistor
    #[must_use]
    pub fn resistance(&self, reference_ohms: f64) -> f64 {
        utils::code_to_ohms(self.rtd_code(), reference_ohms)
    }
}

impl From<[u8; REGISTER_COUNT]> for RegisterBank {
    fn from(raw: [u8; REGISTER_COUNT]) -> Self {
        Self::new(raw)
    }
}
