//! Pin-level MAX31865 simulator shared by the integration tests.
//!
//! All four pins are handles onto one chip model. Address and write data are
//! latched from MOSI on the falling clock edge; read data is presented on MISO
//! at the rising edge, which is where the driver samples it.

#![allow(dead_code)]

use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
    thread::{self, ThreadId},
    time::Duration,
};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use max31865_bitbang::{Config, Max31865, SoftSpi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Select,
    Deselect,
    Write { address: u8, value: u8 },
    Read { address: u8, value: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Address,
    Write(u8),
    Read(u8),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Cs,
    Sck,
    Mosi,
    Miso,
}

#[derive(Debug)]
struct Chip {
    registers: [u8; 8],
    cs_low: bool,
    sck_high: bool,
    mosi_high: bool,
    miso_high: bool,
    phase: Phase,
    shift: u8,
    bits: u8,
    log: Vec<(ThreadId, Event)>,
}

impl Chip {
    fn new(registers: [u8; 8]) -> Self {
        Self {
            registers,
            cs_low: false,
            sck_high: false,
            mosi_high: false,
            miso_high: false,
            phase: Phase::Idle,
            shift: 0,
            bits: 0,
            log: Vec::new(),
        }
    }

    fn record(&mut self, event: Event) {
        self.log.push((thread::current().id(), event));
    }

    fn set_cs(&mut self, high: bool) {
        match (self.cs_low, high) {
            (false, false) => {
                self.cs_low = true;
                self.phase = Phase::Address;
                self.shift = 0;
                self.bits = 0;
                self.record(Event::Select);
            }
            (true, true) => {
                self.cs_low = false;
                self.phase = Phase::Idle;
                self.record(Event::Deselect);
            }
            _ => {}
        }
    }

    fn set_sck(&mut self, high: bool) {
        let rising = high && !self.sck_high;
        let falling = !high && self.sck_high;
        self.sck_high = high;
        if !self.cs_low {
            return;
        }

        if rising {
            if let Phase::Read(address) = self.phase {
                let byte = self.registers[usize::from(address & 0x07)];
                self.miso_high = byte & (0x80 >> self.bits) != 0;
            }
        }

        if falling {
            self.shift = (self.shift << 1) | u8::from(self.mosi_high);
            self.bits += 1;
            if self.bits < 8 {
                return;
            }
            let byte = self.shift;
            self.shift = 0;
            self.bits = 0;

            match self.phase {
                Phase::Address if byte & 0x80 != 0 => self.phase = Phase::Write(byte & 0x7F),
                Phase::Address => self.phase = Phase::Read(byte),
                Phase::Write(address) => {
                    self.record(Event::Write { address, value: byte });
                    self.phase = Phase::Done;
                }
                Phase::Read(address) => {
                    let value = self.registers[usize::from(address & 0x07)];
                    self.record(Event::Read { address, value });
                    self.phase = Phase::Read(address.wrapping_add(1));
                }
                Phase::Idle | Phase::Done => {}
            }
        }
    }
}

/// Handle onto the simulated chip
#[derive(Debug, Clone)]
pub struct SimChip(Arc<Mutex<Chip>>);

impl SimChip {
    pub fn new(registers: [u8; 8]) -> Self {
        Self(Arc::new(Mutex::new(Chip::new(registers))))
    }

    pub fn set_registers(&self, registers: [u8; 8]) {
        self.0.lock().unwrap().registers = registers;
    }

    pub fn set_fault_status(&self, status: u8) {
        self.0.lock().unwrap().registers[7] = status;
    }

    pub fn log(&self) -> Vec<(ThreadId, Event)> {
        self.0.lock().unwrap().log.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log().into_iter().map(|(_, event)| event).collect()
    }

    pub fn cs_high(&self) -> bool {
        !self.0.lock().unwrap().cs_low
    }

    fn pin(&self, role: Role) -> SimPin {
        SimPin {
            chip: self.clone(),
            role,
        }
    }

    pub fn soft_spi(&self) -> SoftSpi<SimPin, SimPin, SimPin, SimPin> {
        SoftSpi::new(
            self.pin(Role::Cs),
            self.pin(Role::Sck),
            self.pin(Role::Mosi),
            self.pin(Role::Miso),
        )
        .unwrap()
    }

    pub fn sensor<D: DelayNs>(&self, delay: D) -> Max31865<SimPin, SimPin, SimPin, SimPin, D> {
        Max31865::new(self.soft_spi(), delay, Config::default())
    }
}

#[derive(Debug)]
pub struct SimPin {
    chip: SimChip,
    role: Role,
}

impl SimPin {
    fn drive(&mut self, high: bool) {
        let mut chip = self.chip.0.lock().unwrap();
        match self.role {
            Role::Cs => chip.set_cs(high),
            Role::Sck => chip.set_sck(high),
            Role::Mosi => chip.mosi_high = high,
            Role::Miso => panic!("MISO is an input"),
        }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        assert_eq!(self.role, Role::Miso, "only MISO is read");
        Ok(self.chip.0.lock().unwrap().miso_high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that only records how long it was asked to wait
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}

/// Delay backed by `thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// Register bank with the given RTD code and fault status
pub fn registers_with_code(code: u16, status: u8) -> [u8; 8] {
    let [msb, lsb] = (code << 1).to_be_bytes();
    [0xB2, msb, lsb, 0xFF, 0xFF, 0x00, 0x00, status]
}
