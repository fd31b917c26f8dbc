//! Error types for the BME680 driver.

use core::fmt;

/// Errors that can occur during communication, configuration or compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bme680Error<E> {
    /// The underlying I2C or SPI transfer failed.
    Bus(E),
    /// The chip-ID register did not read back as a BME680.
    UnsupportedDevice(u8),
    /// The new-data bit did not set within the poll budget.
    NotReady,
    /// A gas range index outside `0..=15` reached the gas compensation.
    InvalidGasRange(i32),
    /// Provided heater wait time exceeds what the `gas_wait_x` encoding can hold.
    InvalidWaitTime,
    /// Gas measurement data is not valid.
    GasNotValid,
    /// Gas heating plate has not reached a stable temperature.
    HeaterNotStable,
}

impl<E: fmt::Debug> fmt::Display for Bme680Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bme680Error::Bus(e) => write!(f, "bus error: {e:?}"),
            Bme680Error::UnsupportedDevice(id) => {
                write!(f, "unsupported device, chip id {id:#04x}")
            }
            Bme680Error::NotReady => f.write_str("measurement did not complete in time"),
            Bme680Error::InvalidGasRange(r) => write!(f, "gas range index {r} out of 0..=15"),
            Bme680Error::InvalidWaitTime => f.write_str("heater wait time too long"),
            Bme680Error::GasNotValid => f.write_str("gas measurement not valid"),
            Bme680Error::HeaterNotStable => f.write_str("gas heater not stable"),
        }
    }
}

/// A gas range index outside the 16 entries of the lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidGasRange(pub i32);

impl<E> From<InvalidGasRange> for Bme680Error<E> {
    fn from(err: InvalidGasRange) -> Self {
        Bme680Error::InvalidGasRange(err.0)
    }
}

/// Result type alias for BME680 operations.
pub type Result<T, E> = core::result::Result<T, Bme680Error<E>>;
