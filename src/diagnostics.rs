//! Fault status and read health counters

/// Single fault condition reported in the fault status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Bit 7: RTD above the high threshold, or open cable
    HighThreshold,
    /// Bit 6: RTD below the low threshold, or shorted cable
    LowThreshold,
    /// Bit 5: REFIN- > 0.85 x VBIAS
    RefInHigh,
    /// Bit 4: REFIN- < 0.85 x VBIAS, FORCE- open
    RefInLow,
    /// Bit 3: RTDIN- < 0.85 x VBIAS, FORCE- open
    RtdInLow,
    /// Bit 2: over/under voltage on an input
    OverUnderVoltage,
}

impl Fault {
    /// Every fault, from bit 7 down
    pub const ALL: [Fault; 6] = [
        Fault::HighThreshold,
        Fault::LowThreshold,
        Fault::RefInHigh,
        Fault::RefInLow,
        Fault::RtdInLow,
        Fault::OverUnderVoltage,
    ];

    /// Bit mask of this fault in the status register
    #[must_use]
    pub const fn mask(self) -> u8 {
        match self {
            Fault::HighThreshold => 0x80,
            Fault::LowThreshold => 0x40,
            Fault::RefInHigh => 0x20,
            Fault::RefInLow => 0x10,
            Fault::RtdInLow => 0x08,
            Fault::OverUnderVoltage => 0x04,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Fault::HighThreshold => "RTD high threshold / cable open",
            Fault::LowThreshold => "RTD low threshold / cable short",
            Fault::RefInHigh => "REFIN- > 0.85 x VBIAS",
            Fault::RefInLow => "REFIN- < 0.85 x VBIAS (FORCE- open)",
            Fault::RtdInLow => "RTDIN- < 0.85 x VBIAS (FORCE- open)",
            Fault::OverUnderVoltage => "Overvoltage / undervoltage",
        }
    }
}

/// Flags from the `FAULT_STATUS` register (0x07)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatus {
    raw: u8,
}

impl FaultStatus {
    /// Create fault status from raw register value
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Get the raw register value
    #[must_use]
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// `true` for a good read: no bit set at all
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.raw == 0
    }

    /// Check a single fault bit
    #[must_use]
    pub const fn has(&self, fault: Fault) -> bool {
        self.raw & fault.mask() != 0
    }

    /// RTD high threshold exceeded; with the 10 MΩ pull-up this also means
    /// an open cable
    #[must_use]
    pub const fn high_threshold(&self) -> bool {
        self.has(Fault::HighThreshold)
    }

    /// RTD below low threshold, or a shorted cable
    #[must_use]
    pub const fn low_threshold(&self) -> bool {
        self.has(Fault::LowThreshold)
    }

    /// Only reported after a fault detection cycle
    #[must_use]
    pub const fn refin_high(&self) -> bool {
        self.has(Fault::RefInHigh)
    }

    /// Only reported after a fault detection cycle
    #[must_use]
    pub const fn refin_low(&self) -> bool {
        self.has(Fault::RefInLow)
    }

    /// Only reported after a fault detection cycle
    #[must_use]
    pub const fn rtdin_low(&self) -> bool {
        self.has(Fault::RtdInLow)
    }

    #[must_use]
    pub const fn over_under_voltage(&self) -> bool {
        self.has(Fault::OverUnderVoltage)
    }

    /// Iterate over the faults that are set, most significant bit first.
    /// Bits 1 and 0 are ignored.
    pub fn faults(&self) -> impl Iterator<Item = Fault> + use<> {
        let status = *self;
        Fault::ALL.into_iter().filter(move |fault| status.has(*fault))
    }
}

impl From<u8> for FaultStatus {
    fn from(raw: u8) -> Self {
        Self::new(raw)
    }
}

/// Good/bad read counters
///
/// Counts saturate at `u32::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadStats {
    /// Acquisitions with a zero fault status
    pub good: u32,
    /// Acquisitions with any fault bit set
    pub bad: u32,
}

impl ReadStats {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.good.saturating_add(self.bad)
    }

    /// Count one completed acquisition by its fault status
    pub fn record(&mut self, status: FaultStatus) {
        if status.is_ok() {
            self.good = self.good.saturating_add(1);
        } else {
            self.bad = self.bad.saturating_add(1);
        }
    }
}
