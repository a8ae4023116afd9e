/// Error type for MAX31865 operations
///
/// Faults reported by the chip itself are not errors; they come back in
/// [`FaultStatus`](crate::FaultStatus) alongside the reading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A GPIO operation on one of the bus pins failed
    Pin(E),
}
