//! Integer compensation, for targets without efficient floating point.
//!
//! Follows the vendor's fixed-point formulas. Intermediates are kept in `i64`.
//! The pressure terms after the division are widened to `i128`: a denominator
//! close to zero pushes the quotient to about 2^33 and its cube past `i64`.

use super::{gas_constants, gas_range_index, sealed, CalcTempData, Compensation, PA_PER_HPA};
use crate::calib::CalibrationCoefficients;
use crate::error::InvalidGasRange;

/// Compensated humidity is computed in milli-percent.
const HUM_MILLI_PERCENT_MAX: i64 = 100_000;

/// Fixed-point variant of the vendor formulas.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedPointCompensation;

impl sealed::Sealed for FixedPointCompensation {}

/// Centi-degrees Celsius from `t_fine`.
fn temp_comp(t_fine: i32) -> i64 {
    ((t_fine as i64 * 5) + 128) >> 8
}

impl Compensation for FixedPointCompensation {
    fn compensate_temperature(
        &self,
        temp_adc: u32,
        calib: &CalibrationCoefficients,
    ) -> CalcTempData {
        let var1 = ((temp_adc as i64) >> 3) - ((calib.par_t1 as i64) << 1);
        let var2 = (var1 * calib.par_t2 as i64) >> 11;
        let var3 = ((((var1 >> 1) * (var1 >> 1)) >> 12) * ((calib.par_t3 as i64) << 4)) >> 14;
        let t_fine = (var2 + var3) as i32;

        CalcTempData {
            celsius: temp_comp(t_fine) as f32 / 100.0,
            t_fine,
        }
    }

    fn compensate_pressure(
        &self,
        press_adc: u32,
        temp: &CalcTempData,
        calib: &CalibrationCoefficients,
    ) -> f32 {
        let mut var1 = ((temp.t_fine as i64) >> 1) - 64_000;
        let mut var2 = ((((var1 >> 2) * (var1 >> 2)) >> 11) * calib.par_p6 as i64) >> 2;
        var2 += (var1 * calib.par_p5 as i64) << 1;
        var2 = (var2 >> 2) + ((calib.par_p4 as i64) << 16);
        var1 = (((((var1 >> 2) * (var1 >> 2)) >> 13) * ((calib.par_p3 as i64) << 5)) >> 3)
            + ((calib.par_p2 as i64 * var1) >> 1);
        var1 >>= 18;
        var1 = ((32768 + var1) * calib.par_p1 as i64) >> 15;

        if var1 == 0 {
            warn!("pressure denominator is zero");
            return 0.0;
        }

        let mut press_comp = 1_048_576 - press_adc as i64;
        press_comp = (press_comp - (var2 >> 12)) * 3125;

        // Same rounding as the 32-bit reference, which divides first for large values.
        if press_comp >= (1 << 30) {
            press_comp = (press_comp / var1) << 1;
        } else {
            press_comp = (press_comp << 1) / var1;
        }

        let mut press_comp = press_comp as i128;
        let var1 = (calib.par_p9 as i128 * (((press_comp >> 3) * (press_comp >> 3)) >> 13)) >> 12;
        let var2 = ((press_comp >> 2) * calib.par_p8 as i128) >> 13;
        let var3 = ((press_comp >> 8)
            * (press_comp >> 8)
            * (press_comp >> 8)
            * calib.par_p10 as i128)
            >> 17;

        press_comp += (var1 + var2 + var3 + ((calib.par_p7 as i128) << 7)) >> 4;
        press_comp as f32 / PA_PER_HPA
    }

    fn compensate_humidity(
        &self,
        hum_adc: u16,
        temp: &CalcTempData,
        calib: &CalibrationCoefficients,
    ) -> f32 {
        let temp_scaled = temp_comp(temp.t_fine);

        let var1 = hum_adc as i64
            - ((calib.par_h1 as i64) << 4)
            - (((temp_scaled * calib.par_h3 as i64) / 100) >> 1);
        let var2 = (calib.par_h2 as i64
            * (((temp_scaled * calib.par_h4 as i64) / 100)
                + (((temp_scaled * ((temp_scaled * calib.par_h5 as i64) / 100)) >> 6) / 100)
                + (1 << 14)))
            >> 10;
        let var3 = var1 * var2;
        let var4 = (((calib.par_h6 as i64) << 7) + ((temp_scaled * calib.par_h7 as i64) / 100)) >> 4;
        let var5 = ((var3 >> 14) * (var3 >> 14)) >> 10;
        let var6 = (var4 * var5) >> 1;

        let hum = ((((var3 + var6) >> 10) * 1000) >> 12).clamp(0, HUM_MILLI_PERCENT_MAX);
        hum as f32 / 1000.0
    }

    fn compensate_gas(
        &self,
        gas_adc: u16,
        gas_range: i32,
        calib: &CalibrationCoefficients,
    ) -> Result<f32, InvalidGasRange> {
        let index = gas_range_index(gas_range)?;

        let var1 = ((1340 + (5 * calib.range_sw_err as i64))
            * gas_constants::ARRAY1_INT[index] as i64)
            >> 16;
        // var1 stays above 2^24 for every range_sw_err, so var2 is never zero.
        let var2 = ((gas_adc as i64) << 15) - (1 << 24) + var1;
        let var3 = (gas_constants::ARRAY2_INT[index] as i64 * var1) >> 9;

        Ok(((var3 + (var2 >> 1)) / var2) as f32)
    }
}
