//! Register map of the BME680 (datasheet section 5.2).

/// Value of the chip-ID register for a BME680.
pub const CHIP_ID: u8 = 0x61;

pub const ADDR_CHIP_ID: u8 = 0xD0;
pub const ADDR_SOFT_RESET: u8 = 0xE0;
pub const CMD_SOFT_RESET: u8 = 0xB6;

/// SPI memory page selection. Reachable from both pages.
pub const ADDR_MEM_PAGE: u8 = 0x73;
pub const MEM_PAGE_MASK: u8 = 0x10;

pub const ADDR_CTRL_GAS_1: u8 = 0x71;
pub const ADDR_CTRL_HUM: u8 = 0x72;
pub const ADDR_CTRL_MEAS: u8 = 0x74;
pub const ADDR_CONFIG: u8 = 0x75;

pub const ADDR_RES_HEAT_0: u8 = 0x5A;
pub const ADDR_GAS_WAIT_0: u8 = 0x64;

pub const ADDR_MEAS_STATUS_0: u8 = 0x1D;
pub const NEW_DATA_MASK: u8 = 0x80;

/// First register of the raw-data burst (press_msb). The burst ends at gas_r_lsb (0x2B).
pub const ADDR_FIELD_DATA: u8 = 0x1F;
pub const LEN_FIELD_DATA: usize = 13;

/// Calibration blocks: 0x8A..=0xA0, 0xE1..=0xEE and 0x00..=0x04.
pub const ADDR_COEFF_1: u8 = 0x8A;
pub const LEN_COEFF_1: usize = 23;
pub const ADDR_COEFF_2: u8 = 0xE1;
pub const LEN_COEFF_2: usize = 14;
pub const ADDR_COEFF_3: u8 = 0x00;
pub const LEN_COEFF_3: usize = 5;

pub const RUN_GAS: u8 = 0x10;
pub const NB_CONV_MASK: u8 = 0x0F;
pub const MODE_FORCED: u8 = 0b01;

pub const GAS_VALID_MASK: u8 = 0x20;
pub const HEAT_STAB_MASK: u8 = 0x10;
pub const GAS_RANGE_MASK: u8 = 0x0F;
