//! Register access over I2C or SPI.
//!
//! The driver only needs two primitives from the bus: reading a run of
//! consecutive registers and writing a single register. Both transports
//! implement [`Interface`] so everything above this module is bus-agnostic.

use embedded_hal::i2c::{I2c, SevenBitAddress};
use embedded_hal::spi::{Operation, SpiDevice};

use crate::regs;

/// I2C address of the sensor, selected by the level of the SDO pin.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceAddress {
    /// SDO connected to GND: `0x76`.
    Primary,
    /// SDO connected to VDDIO: `0x77`.
    #[default]
    Secondary,
}

impl From<DeviceAddress> for u8 {
    fn from(address: DeviceAddress) -> Self {
        match address {
            DeviceAddress::Primary => 0x76,
            DeviceAddress::Secondary => 0x77,
        }
    }
}

/// Byte-level register access used by the driver.
pub trait Interface {
    /// Error type of the underlying bus.
    type Error;

    /// Reads `buf.len()` consecutive registers starting at `reg`.
    fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `value` into register `reg`.
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;
}

/// BME680 connected through I2C.
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C: I2c> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: DeviceAddress) -> Self {
        Self {
            i2c,
            address: address.into(),
        }
    }

    /// Returns the wrapped bus.
    pub fn into_inner(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Interface for I2cInterface<I2C> {
    type Error = I2C::Error;

    fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[reg], buf)
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[reg, value])
    }
}

/// One of the two 128-byte halves of the register map as seen over SPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemPage {
    /// Registers `0x80..=0xFF`.
    Upper,
    /// Registers `0x00..=0x7F`.
    Lower,
}

impl MemPage {
    fn of(reg: u8) -> Self {
        if reg < 0x80 {
            MemPage::Lower
        } else {
            MemPage::Upper
        }
    }

    fn bits(self) -> u8 {
        match self {
            MemPage::Upper => 0x00,
            MemPage::Lower => regs::MEM_PAGE_MASK,
        }
    }
}

/// BME680 connected through 4-wire SPI (mode 0).
///
/// Chip select is handled by the [`SpiDevice`] implementation. SPI only
/// exposes 7 address bits, so the interface switches the memory page through
/// `spi_mem_page` whenever a register outside the current page is accessed.
#[derive(Debug)]
pub struct SpiInterface<SPI> {
    spi: SPI,
    page: Option<MemPage>,
}

impl<SPI: SpiDevice> SpiInterface<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi, page: None }
    }

    /// Returns the wrapped bus.
    pub fn into_inner(self) -> SPI {
        self.spi
    }

    fn select_page(&mut self, reg: u8) -> Result<(), SPI::Error> {
        if reg == regs::ADDR_MEM_PAGE {
            return Ok(());
        }

        let page = MemPage::of(reg);
        if self.page == Some(page) {
            return Ok(());
        }

        self.spi.write(&[regs::ADDR_MEM_PAGE & 0x7F, page.bits()])?;
        self.page = Some(page);
        Ok(())
    }
}

impl<SPI: SpiDevice> Interface for SpiInterface<SPI> {
    type Error = SPI::Error;

    fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.select_page(reg)?;
        self.spi
            .transaction(&mut [Operation::Write(&[reg | 0x80]), Operation::Read(buf)])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.select_page(reg)?;
        self.spi.write(&[reg & 0x7F, value])
    }
}
