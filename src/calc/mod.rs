//! Compensation of raw ADC codes into physical units.
//!
//! The vendor publishes every formula twice: once in single-precision floating
//! point and once in integer fixed point. Both are the same algorithm and are
//! exposed here as two strategies behind [`Compensation`]:
//! [`FloatCompensation`] and [`FixedPointCompensation`].
//!
//! Temperature has to be compensated first. It yields a [`CalcTempData`]
//! carrying `t_fine`, which pressure and humidity compensation take by
//! reference, so a reading can never be mixed with the temperature of another
//! batch.

mod fixed;
mod float;

pub use fixed::FixedPointCompensation;
pub use float::FloatCompensation;

use crate::calib::CalibrationCoefficients;
use crate::error::InvalidGasRange;
use crate::regs;
use crate::settings::{Celsius, Milliseconds};

/// Constants and lookup tables provided by Bosch for the gas resistance calculation.
mod gas_constants {
    /// Lookup table for the base compensation, indexed by gas range.
    pub static ARRAY1_INT: [u32; 16] = [
        2147483647, 2147483647, 2147483647, 2147483647, 2147483647, 2126008810, 2147483647,
        2130303777, 2147483647, 2147483647, 2143188679, 2136746228, 2147483647, 2126008810,
        2147483647, 2147483647,
    ];
    /// Range scaling table converting ADC values into Ohm, indexed by gas range.
    pub static ARRAY2_INT: [u32; 16] = [
        4096000000, 2048000000, 1024000000, 512000000, 255744255, 127110228, 64000000, 32258064,
        16016016, 8000000, 4000000, 2000000, 1000000, 500000, 250000, 125000,
    ];
}

/// `t_fine` units per degree Celsius.
const T_FINE_PER_DEGREE: f32 = 5120.0;

/// Pascal per hectopascal.
const PA_PER_HPA: f32 = 100.0;

/// Hottest heater target the membrane tolerates.
const MAX_HEATER_TEMP: i32 = 400;

/// Longest heater duration the `gas_wait_x` encoding holds: 63 * 64 ms.
const MAX_HEATER_DURATION_MS: u32 = 4032;

/// Raw ADC output and status bits read from one burst of the data registers.
///
/// Holds uncompensated data. It is consumed by [`Compensation::compensate`]
/// right after the burst read.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    /// 20-bit pressure ADC code.
    pub press_adc: u32,
    /// 20-bit temperature ADC code.
    pub temp_adc: u32,
    /// 16-bit humidity ADC code.
    pub hum_adc: u16,
    /// 10-bit gas ADC code.
    pub gas_adc: u16,
    /// Range selected by the gas ADC (0-15).
    pub gas_range: u8,
    /// Indicates if the gas measurement is valid.
    pub gas_valid: bool,
    /// Indicates if the target heater temperature was reached.
    pub heat_stable: bool,
}

impl RawReading {
    /// Decodes the burst read starting at `press_msb` (0x1F).
    pub fn from_field_data(buffer: &[u8; regs::LEN_FIELD_DATA]) -> Self {
        // Reconstruct 20-bit and 16-bit ADC values from register bytes
        let press_adc =
            ((buffer[2] as u32) >> 4) | ((buffer[1] as u32) << 4) | ((buffer[0] as u32) << 12);
        let temp_adc =
            ((buffer[5] as u32) >> 4) | ((buffer[4] as u32) << 4) | ((buffer[3] as u32) << 12);
        let hum_adc = u16::from_be_bytes([buffer[6], buffer[7]]);
        let gas_adc = ((buffer[12] as u16) >> 6) | ((buffer[11] as u16) << 2);

        Self {
            press_adc,
            temp_adc,
            hum_adc,
            gas_adc,
            gas_range: buffer[12] & regs::GAS_RANGE_MASK,
            gas_valid: buffer[12] & regs::GAS_VALID_MASK != 0,
            heat_stable: buffer[12] & regs::HEAT_STAB_MASK != 0,
        }
    }
}

/// Compensated temperature together with the `t_fine` it was derived from.
///
/// Only temperature compensation creates this value; pressure and humidity
/// compensation require it.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalcTempData {
    pub(crate) celsius: f32,
    pub(crate) t_fine: i32,
}

impl CalcTempData {
    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        self.celsius
    }

    /// Fine resolution temperature, 5120 units per degree Celsius.
    pub fn t_fine(&self) -> i32 {
        self.t_fine
    }
}

/// Compensated measurement result in physical units.
///
/// Channels that were disabled read `0.0`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompensatedReading {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Hectopascal.
    pub pressure: f32,
    /// Relative humidity in percent, within `[0, 100]`.
    pub humidity: f32,
    /// Ohm. Higher values typically indicate cleaner air (fewer VOCs).
    pub gas_resistance: f32,
}

mod sealed {
    pub trait Sealed {}
}

/// Vendor compensation formulas.
///
/// Implemented by [`FloatCompensation`] and [`FixedPointCompensation`]; the
/// driver picks one at construction time.
pub trait Compensation: sealed::Sealed {
    /// Compensates the temperature and yields the `t_fine` for this batch.
    fn compensate_temperature(
        &self,
        temp_adc: u32,
        calib: &CalibrationCoefficients,
    ) -> CalcTempData;

    /// Pressure in hPa. Returns exactly `0.0` when the formula's denominator is zero.
    fn compensate_pressure(
        &self,
        press_adc: u32,
        temp: &CalcTempData,
        calib: &CalibrationCoefficients,
    ) -> f32;

    /// Relative humidity in percent, clamped to `[0, 100]`.
    fn compensate_humidity(
        &self,
        hum_adc: u16,
        temp: &CalcTempData,
        calib: &CalibrationCoefficients,
    ) -> f32;

    /// Gas resistance in Ohm.
    ///
    /// # Errors
    /// [`InvalidGasRange`] if `gas_range` is outside `0..=15`.
    fn compensate_gas(
        &self,
        gas_adc: u16,
        gas_range: i32,
        calib: &CalibrationCoefficients,
    ) -> Result<f32, InvalidGasRange>;

    /// Compensates all four channels of one raw reading, temperature first.
    fn compensate(
        &self,
        raw: &RawReading,
        calib: &CalibrationCoefficients,
    ) -> Result<CompensatedReading, InvalidGasRange> {
        let temp = self.compensate_temperature(raw.temp_adc, calib);

        Ok(CompensatedReading {
            temperature: temp.celsius,
            pressure: self.compensate_pressure(raw.press_adc, &temp, calib),
            humidity: self.compensate_humidity(raw.hum_adc, &temp, calib),
            gas_resistance: self.compensate_gas(raw.gas_adc, raw.gas_range as i32, calib)?,
        })
    }
}

/// Validates a gas range and turns it into a lookup-table index.
fn gas_range_index(gas_range: i32) -> Result<usize, InvalidGasRange> {
    match usize::try_from(gas_range) {
        Ok(index) if index < gas_constants::ARRAY1_INT.len() => Ok(index),
        _ => Err(InvalidGasRange(gas_range)),
    }
}

/// Calculates the `res_heat_x` register value for a heater target temperature.
///
/// The target is capped at 400 °C to protect the membrane.
pub(crate) fn heater_resistance(
    target: Celsius,
    ambient: Celsius,
    calib: &CalibrationCoefficients,
) -> u8 {
    let target_temp = target.0.min(MAX_HEATER_TEMP);

    let var1 = ((ambient.0 * calib.par_g3 as i32) / 1000) * 256;
    let var2 = (calib.par_g1 as i32 + 784)
        * (((((calib.par_g2 as i32 + 154009) * target_temp * 5) / 100) + 3276800) / 10);
    let var3 = var1 + (var2 / 2);
    let var4 = var3 / (calib.res_heat_range as i32 + 4);
    let var5 = 131 * (calib.res_heat_val as i32) + 65536;

    let res_heat_x100 = ((var4 / var5) - 250) * 34;
    ((res_heat_x100 + 50) / 100) as u8
}

/// Encodes a heater duration for the `gas_wait_x` register.
///
/// The hardware stores a 6-bit mantissa and a 2-bit multiplier:
/// 00 counts in 1 ms steps, 01 in 4 ms, 10 in 16 ms and 11 in 64 ms.
/// Returns `None` above 4032 ms.
pub(crate) fn heater_duration(wait_time: Milliseconds) -> Option<u8> {
    let mut duration = wait_time.0;
    if duration > MAX_HEATER_DURATION_MS {
        return None;
    }

    let mut factor = 0u8;
    while duration > 0x3F {
        duration /= 4;
        factor += 1;
    }

    Some(duration as u8 | (factor << 6))
}

/// Altitude in meters for a pressure reading, relative to the given sea-level
/// pressure (both in hPa).
#[cfg(feature = "altitude")]
pub fn altitude(pressure_hpa: f32, sea_level_hpa: f32) -> f32 {
    44330.77 * (1.0 - libm::powf(pressure_hpa / sea_level_hpa, 0.1902632))
}
