//! Single-precision compensation, for targets with an FPU.

use super::{
    gas_constants, gas_range_index, sealed, CalcTempData, Compensation, PA_PER_HPA,
    T_FINE_PER_DEGREE,
};
use crate::calib::CalibrationCoefficients;
use crate::error::InvalidGasRange;

// Power-of-two divisors of the datasheet formulas.
const P2_1: f32 = 2.0;
const P2_2: f32 = 4.0;
const P2_4: f32 = 16.0;
const P2_7: f32 = 128.0;
const P2_8: f32 = 256.0;
const P2_9: f32 = 512.0;
const P2_10: f32 = 1024.0;
const P2_12: f32 = 4096.0;
const P2_13: f32 = 8192.0;
const P2_14: f32 = 16384.0;
const P2_15: f32 = 32768.0;
const P2_16: f32 = 65536.0;
const P2_17: f32 = 131072.0;
const P2_18: f32 = 262144.0;
const P2_19: f32 = 524288.0;
const P2_20: f32 = 1048576.0;
const P2_21: f32 = 2097152.0;
const P2_24: f32 = 16777216.0;
const P2_31: f32 = 2147483648.0;

/// Floating-point variant of the vendor formulas.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FloatCompensation;

impl sealed::Sealed for FloatCompensation {}

impl Compensation for FloatCompensation {
    fn compensate_temperature(
        &self,
        temp_adc: u32,
        calib: &CalibrationCoefficients,
    ) -> CalcTempData {
        let adc = temp_adc as f32;
        let par_t1 = calib.par_t1 as f32;

        let var1 = (adc / P2_14 - par_t1 / P2_10) * calib.par_t2 as f32;
        let delta = adc / P2_17 - par_t1 / P2_13;
        let var2 = delta * delta * (calib.par_t3 as f32 * P2_4);
        let t_fine = var1 + var2;

        CalcTempData {
            celsius: t_fine / T_FINE_PER_DEGREE,
            t_fine: t_fine as i32,
        }
    }

    fn compensate_pressure(
        &self,
        press_adc: u32,
        temp: &CalcTempData,
        calib: &CalibrationCoefficients,
    ) -> f32 {
        // Unrounded t_fine; the integer field is truncated.
        let t_fine = temp.celsius * T_FINE_PER_DEGREE;
        let mut var1 = t_fine / P2_1 - 64000.0;
        let mut var2 = var1 * var1 * (calib.par_p6 as f32 / P2_17);
        var2 += var1 * calib.par_p5 as f32 * P2_1;
        var2 = var2 / P2_2 + calib.par_p4 as f32 * P2_16;
        var1 = (calib.par_p3 as f32 * var1 * var1 / P2_14 + calib.par_p2 as f32 * var1) / P2_19;
        var1 = (1.0 + var1 / P2_15) * calib.par_p1 as f32;

        if var1 as i32 == 0 {
            warn!("pressure denominator is zero");
            return 0.0;
        }

        let mut press = P2_20 - press_adc as f32;
        press = ((press - var2 / P2_12) * 6250.0) / var1;

        let var1 = calib.par_p9 as f32 * press * press / P2_31;
        let var2 = press * (calib.par_p8 as f32 / P2_15);
        let scaled = press / P2_8;
        let var3 = scaled * scaled * scaled * (calib.par_p10 as f32 / P2_17);

        press += (var1 + var2 + var3 + calib.par_p7 as f32 * P2_7) / P2_4;
        press / PA_PER_HPA
    }

    fn compensate_humidity(
        &self,
        hum_adc: u16,
        temp: &CalcTempData,
        calib: &CalibrationCoefficients,
    ) -> f32 {
        let temp_comp = temp.celsius;

        let var1 = hum_adc as f32
            - (calib.par_h1 as f32 * P2_4 + (calib.par_h3 as f32 / P2_1) * temp_comp);
        let var2 = var1
            * (calib.par_h2 as f32 / P2_18
                * (1.0
                    + calib.par_h4 as f32 / P2_14 * temp_comp
                    + calib.par_h5 as f32 / P2_20 * temp_comp * temp_comp));
        let var3 = calib.par_h6 as f32 / P2_14;
        let var4 = calib.par_h7 as f32 / P2_21;

        let hum = var2 + (var3 + var4 * temp_comp) * var2 * var2;

        if hum > 100.0 {
            100.0
        } else if hum < 0.0 {
            0.0
        } else {
            hum
        }
    }

    fn compensate_gas(
        &self,
        gas_adc: u16,
        gas_range: i32,
        calib: &CalibrationCoefficients,
    ) -> Result<f32, InvalidGasRange> {
        let index = gas_range_index(gas_range)?;

        let var1 = (1340.0 + 5.0 * calib.range_sw_err as f32)
            * gas_constants::ARRAY1_INT[index] as f32
            / P2_16;
        let var2 = gas_adc as f32 * P2_15 - P2_24 + var1;
        let var3 = gas_constants::ARRAY2_INT[index] as f32 * var1 / P2_9;

        Ok((var3 + var2 / P2_1) / var2)
    }
}
