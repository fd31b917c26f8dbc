//! Shared test data: a realistic coefficient set, the register bytes that
//! encode it and one raw measurement burst.
//!
//! Expected physical values were computed with the vendor's double-precision
//! reference formulas.

use crate::calib::CalibrationCoefficients;
use crate::regs;
use embedded_hal_mock::eh1::i2c::Transaction as I2cTransaction;

pub const COEFF_BLOCK_1: [u8; regs::LEN_COEFF_1] = [
    0xEB, 0x65, 0x03, 0x00, 0xB3, 0x8E, 0x49, 0xD7, 0x58, 0x00, 0x8E, 0x1C, 0x5A, 0xFF, 0x2E,
    0x1E, 0x00, 0x00, 0x97, 0xF3, 0xB5, 0xF6, 0x1E,
];
pub const COEFF_BLOCK_2: [u8; regs::LEN_COEFF_2] = [
    0x40, 0x54, 0x2A, 0x00, 0x2D, 0x14, 0x78, 0x9C, 0x5B, 0x66, 0xAF, 0xE8, 0xE2, 0x12,
];
pub const COEFF_BLOCK_3: [u8; regs::LEN_COEFF_3] = [0x30, 0x00, 0x1A, 0x00, 0x03];

pub fn coefficients() -> CalibrationCoefficients {
    CalibrationCoefficients {
        par_t1: 26203,
        par_t2: 26091,
        par_t3: 3,
        par_p1: 36531,
        par_p2: -10423,
        par_p3: 88,
        par_p4: 7310,
        par_p5: -166,
        par_p6: 30,
        par_p7: 46,
        par_p8: -3177,
        par_p9: -2379,
        par_p10: 30,
        par_h1: 676,
        par_h2: 1029,
        par_h3: 0,
        par_h4: 45,
        par_h5: 20,
        par_h6: 120,
        par_h7: -100,
        par_g1: -30,
        par_g2: -5969,
        par_g3: 18,
        res_heat_range: 1,
        res_heat_val: 48,
        range_sw_err: 0,
    }
}

pub const TEMP_ADC: u32 = 500_000;
pub const PRESS_ADC: u32 = 350_000;
pub const HUM_ADC: u16 = 20_000;
pub const GAS_ADC: u16 = 600;
pub const GAS_RANGE: u8 = 5;

pub const TEMPERATURE: f32 = 25.1198;
pub const T_FINE: i32 = 128_613;
pub const PRESSURE: f32 = 994.465;
pub const HUMIDITY: f32 = 48.2758;
pub const GAS_RESISTANCE: f32 = 232_818.67;

/// Burst read from 0x1F with new gas data and a stable heater.
pub const FIELD_DATA: [u8; regs::LEN_FIELD_DATA] = [
    0x55, 0x73, 0x00, 0x7A, 0x12, 0x00, 0x4E, 0x20, 0x00, 0x00, 0x00, 0x96, 0x35,
];

/// The transactions `CalibrationCoefficients::load` issues against a healthy sensor.
pub fn load_transactions(addr: u8) -> Vec<I2cTransaction> {
    vec![
        I2cTransaction::write_read(addr, vec![regs::ADDR_CHIP_ID], vec![regs::CHIP_ID]),
        I2cTransaction::write_read(addr, vec![regs::ADDR_COEFF_1], COEFF_BLOCK_1.to_vec()),
        I2cTransaction::write_read(addr, vec![regs::ADDR_COEFF_2], COEFF_BLOCK_2.to_vec()),
        I2cTransaction::write_read(addr, vec![regs::ADDR_COEFF_3], COEFF_BLOCK_3.to_vec()),
    ]
}
