use crate::interface::Interface;
use crate::{error, regs};

/// Factory-fused calibration coefficients read from the sensor.
/// These are unique to every individual chip and required for compensation formulas.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationCoefficients {
    pub par_t1: u16,
    pub par_t2: i16,
    pub par_t3: i8,
    pub par_p1: u16,
    pub par_p2: i16,
    pub par_p3: i8,
    pub par_p4: i16,
    pub par_p5: i16,
    pub par_p6: i8,
    pub par_p7: i8,
    pub par_p8: i16,
    pub par_p9: i16,
    pub par_p10: u8,
    pub par_h1: u16,
    pub par_h2: u16,
    pub par_h3: i8,
    pub par_h4: i8,
    pub par_h5: i8,
    pub par_h6: u8,
    pub par_h7: i8,
    pub par_g1: i8,
    pub par_g2: i16,
    pub par_g3: i8,
    pub res_heat_range: u8,
    pub res_heat_val: i8,
    pub range_sw_err: i8,
}

impl CalibrationCoefficients {
    /// Verifies the chip ID and reads the three calibration blocks.
    ///
    /// A chip-ID mismatch aborts before any calibration register is touched.
    ///
    /// # Errors
    /// [`Bme680Error::UnsupportedDevice`](crate::Bme680Error::UnsupportedDevice)
    /// for anything that is not a BME680, [`Bme680Error::Bus`](crate::Bme680Error::Bus)
    /// if a transfer fails.
    pub fn load<I: Interface>(iface: &mut I) -> error::Result<Self, I::Error> {
        let mut chip_id = [0u8];
        iface
            .read_register(regs::ADDR_CHIP_ID, &mut chip_id)
            .map_err(error::Bme680Error::Bus)?;

        if chip_id[0] != regs::CHIP_ID {
            warn!("unexpected chip id {:#x}", chip_id[0]);
            return Err(error::Bme680Error::UnsupportedDevice(chip_id[0]));
        }

        let mut block1 = [0u8; regs::LEN_COEFF_1];
        let mut block2 = [0u8; regs::LEN_COEFF_2];
        let mut block3 = [0u8; regs::LEN_COEFF_3];

        iface
            .read_register(regs::ADDR_COEFF_1, &mut block1)
            .map_err(error::Bme680Error::Bus)?;
        iface
            .read_register(regs::ADDR_COEFF_2, &mut block2)
            .map_err(error::Bme680Error::Bus)?;
        iface
            .read_register(regs::ADDR_COEFF_3, &mut block3)
            .map_err(error::Bme680Error::Bus)?;

        let calib = Self::from_registers(&block1, &block2, &block3);
        debug!("calibration loaded, par_t1 {}", calib.par_t1);
        Ok(calib)
    }

    /// Maps the raw calibration register blocks to coefficients.
    ///
    /// `block1` starts at `0x8A`, `block2` at `0xE1` and `block3` at `0x00`.
    /// See BME680 datasheet, section 3.11.1.
    pub fn from_registers(
        block1: &[u8; regs::LEN_COEFF_1],
        block2: &[u8; regs::LEN_COEFF_2],
        block3: &[u8; regs::LEN_COEFF_3],
    ) -> Self {
        Self {
            par_t1: u16::from_le_bytes([block2[8], block2[9]]),
            par_t2: i16::from_le_bytes([block1[0], block1[1]]),
            par_t3: block1[2] as i8,
            par_p1: u16::from_le_bytes([block1[4], block1[5]]),
            par_p2: i16::from_le_bytes([block1[6], block1[7]]),
            par_p3: block1[8] as i8,
            par_p4: i16::from_le_bytes([block1[10], block1[11]]),
            par_p5: i16::from_le_bytes([block1[12], block1[13]]),
            par_p6: block1[15] as i8,
            par_p7: block1[14] as i8,
            par_p8: i16::from_le_bytes([block1[18], block1[19]]),
            par_p9: i16::from_le_bytes([block1[20], block1[21]]),
            par_p10: block1[22],
            // H1 and H2 share the nibbles of 0xE2.
            par_h1: ((block2[2] as u16) << 4) | (block2[1] & 0x0F) as u16,
            par_h2: ((block2[0] as u16) << 4) | (block2[1] >> 4) as u16,
            par_h3: block2[3] as i8,
            par_h4: block2[4] as i8,
            par_h5: block2[5] as i8,
            par_h6: block2[6],
            par_h7: block2[7] as i8,
            par_g1: block2[12] as i8,
            par_g2: i16::from_le_bytes([block2[10], block2[11]]),
            par_g3: block2[13] as i8,
            res_heat_val: block3[0] as i8,
            res_heat_range: (block3[2] >> 4) & 0x03,
            range_sw_err: (block3[4] as i8) >> 4,
        }
    }
}
