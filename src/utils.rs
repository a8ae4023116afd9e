/// Full scale of the 15-bit ratio codes
pub const ADC_FULL_SCALE: f64 = 32768.0;

/// Join an MSB/LSB register pair and drop the flag bit packed into bit 0
pub fn code_from_pair(msb: u8, lsb: u8) -> u16 {
    u16::from_be_bytes([msb, lsb]) >> 1
}

/// Convert a 15-bit ratio code into ohms against the reference resistor
pub fn code_to_ohms(code: u16, reference_ohms: f64) -> f64 {
    f64::from(code) * reference_ohms / ADC_FULL_SCALE
}
