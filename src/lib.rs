#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

//! # BME680 Environmental Sensor Driver
//!
//! A type-safe, `no_std` driver for the Bosch BME680 over I2C or SPI.
//! This driver uses the typestate pattern to ensure the sensor is correctly
//! initialized before measurements are taken.
//!
//! ## Features
//! - **Flexible Configuration**: Individually enable/disable Temperature, Humidity,
//!   Pressure, or Gas measurements to save power.
//! - **Two compensation strategies**: [`FloatCompensation`] for targets with an FPU,
//!   [`FixedPointCompensation`] for targets without one. Chosen at construction.
//! - **Typestate Pattern**: Prevents measuring before initialization.
//! - **Logging**: optional `defmt` or `log` output.
//!
//! ## Units
//! - **Temperature**: °C
//! - **Pressure**: hPa
//! - **Humidity**: %RH, within `[0, 100]`
//! - **Gas Resistance**: Ohms (Ω)
//!
//! ## Example
//! ```ignore
//! use bme680_compensation::{Bme680, ConfigBuilder, DeviceAddress, Oversampling};
//!
//! let mut bme = Bme680::new_i2c(i2c, DeviceAddress::Primary).init(&mut delay)?;
//! let config = ConfigBuilder::new()
//!     .temp_oversampling(Oversampling::X2)
//!     .pres_oversampling(Oversampling::X4)
//!     .build();
//! bme.configure(&config)?;
//! let reading = bme.read_all(&mut delay)?;
//! ```

#[macro_use]
mod fmt;

mod calc;
mod calib;
pub mod error;
mod interface;
mod regs;
pub mod settings;

#[cfg(test)]
mod fixture;

use core::marker::PhantomData;
use embedded_hal::{delay::DelayNs, i2c::I2c, spi::SpiDevice};

#[cfg(feature = "altitude")]
pub use calc::altitude;
pub use calc::{
    CalcTempData, CompensatedReading, Compensation, FixedPointCompensation, FloatCompensation,
    RawReading,
};
pub use calib::CalibrationCoefficients;
pub use error::{Bme680Error, InvalidGasRange};
pub use interface::{DeviceAddress, I2cInterface, Interface, SpiInterface};
pub use settings::{
    Celsius, Config, ConfigBuilder, GasProfile, GasProfileIndex, IIRFilter, Milliseconds,
    Oversampling, OversamplingConfig,
};

/// How often `meas_status_0` is polled before a measurement is given up.
const MAX_POLLS: u32 = 10;

/// Pause between two polls of `meas_status_0`.
const POLL_INTERVAL_MS: u32 = 5;

// --- Typestates ---

/// Sensor has been created but not yet initialized with calibration data.
pub struct Uninitialized;
/// Sensor is initialized and ready for measurements.
pub struct Ready;

/// The main BME680 driver structure.
///
/// Use [`Bme680::new_i2c`] or [`Bme680::new_spi`] to start. The `STATE`
/// generic uses the Typestate pattern to track initialization status at compile
/// time, `C` selects the compensation strategy.
#[derive(Debug)]
pub struct Bme680<IFACE, STATE, C = FloatCompensation> {
    iface: IFACE,
    calib: CalibrationCoefficients,
    /// Configuration last written to the sensor.
    config: Config,
    compensation: C,
    _state: PhantomData<STATE>,
}

impl<I2C: I2c> Bme680<I2cInterface<I2C>, Uninitialized> {
    /// Creates a new driver instance for a sensor on the I2C bus.
    ///
    /// This does not communicate with the sensor yet.
    pub fn new_i2c(i2c: I2C, address: DeviceAddress) -> Self {
        Self::with_interface(I2cInterface::new(i2c, address))
    }
}

impl<SPI: SpiDevice> Bme680<SpiInterface<SPI>, Uninitialized> {
    /// Creates a new driver instance for a sensor on an SPI device.
    ///
    /// This does not communicate with the sensor yet.
    pub fn new_spi(spi: SPI) -> Self {
        Self::with_interface(SpiInterface::new(spi))
    }
}

impl<IFACE: Interface> Bme680<IFACE, Uninitialized> {
    /// Creates a new driver instance on top of any register [`Interface`].
    pub fn with_interface(iface: IFACE) -> Self {
        Bme680 {
            iface,
            calib: CalibrationCoefficients::default(),
            config: Config::after_reset(),
            compensation: FloatCompensation,
            _state: PhantomData,
        }
    }
}

impl<IFACE: Interface, C: Compensation> Bme680<IFACE, Uninitialized, C> {
    /// Replaces the compensation strategy, e.g. with [`FixedPointCompensation`].
    pub fn with_compensation<C2: Compensation>(
        self,
        compensation: C2,
    ) -> Bme680<IFACE, Uninitialized, C2> {
        Bme680 {
            iface: self.iface,
            calib: self.calib,
            config: self.config,
            compensation,
            _state: PhantomData,
        }
    }

    /// Initializes the sensor: performs a soft-reset, verifies the chip ID and
    /// loads factory calibration data.
    ///
    /// This transitions the driver state from `Uninitialized` to `Ready`.
    ///
    /// # Errors
    /// Returns [`Bme680Error::UnsupportedDevice`] if the chip is not a BME680
    /// and [`Bme680Error::Bus`] if communication fails.
    pub fn init(
        mut self,
        delay: &mut impl DelayNs,
    ) -> error::Result<Bme680<IFACE, Ready, C>, IFACE::Error> {
        // Sensor requires time to start up before reset
        delay.delay_ms(2);

        self.reset(delay)?;

        let calib = CalibrationCoefficients::load(&mut self.iface)?;

        Ok(Bme680 {
            iface: self.iface,
            calib,
            config: Config::after_reset(),
            compensation: self.compensation,
            _state: PhantomData,
        })
    }

    /// Performs a soft-reset of the sensor.
    ///
    /// This resets all internal registers to their default values.
    /// A delay of at least 2ms is required after the reset command.
    fn reset(&mut self, delay: &mut impl DelayNs) -> error::Result<(), IFACE::Error> {
        self.write_reg(regs::ADDR_SOFT_RESET, regs::CMD_SOFT_RESET)?;
        delay.delay_ms(2);
        Ok(())
    }
}

impl<IFACE: Interface, STATE, C> Bme680<IFACE, STATE, C> {
    /// Releases the underlying register interface.
    pub fn into_interface(self) -> IFACE {
        self.iface
    }

    /// Reads data from a starting register address into a provided buffer.
    fn read_into(&mut self, reg_address: u8, buffer: &mut [u8]) -> error::Result<(), IFACE::Error> {
        self.iface
            .read_register(reg_address, buffer)
            .map_err(Bme680Error::Bus)
    }

    /// Reads a single byte from a specific register address.
    fn read_reg_byte(&mut self, reg_address: u8) -> error::Result<u8, IFACE::Error> {
        let mut buffer = [0];
        self.read_into(reg_address, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Writes a single register.
    fn write_reg(&mut self, reg_address: u8, value: u8) -> error::Result<(), IFACE::Error> {
        self.iface
            .write_register(reg_address, value)
            .map_err(Bme680Error::Bus)
    }
}

impl<IFACE: Interface, C: Compensation> Bme680<IFACE, Ready, C> {
    /// Applies a full sensor configuration.
    ///
    /// This method sets oversampling, filters, and the gas profile, leaving
    /// the sensor in sleep mode. If `config.gas_profile` is `None`, the gas
    /// sensor is disabled to save power.
    ///
    /// # Errors
    /// Returns [`Bme680Error::InvalidWaitTime`] before touching any register
    /// if the heater wait time exceeds 4032 ms.
    pub fn configure(&mut self, config: &Config) -> error::Result<(), IFACE::Error> {
        if let Some(profile) = config.gas_profile {
            calc::heater_duration(profile.wait_time).ok_or(Bme680Error::InvalidWaitTime)?;
        }

        let osrs = &config.osrs_config;
        self.write_reg(regs::ADDR_CTRL_HUM, osrs.hum_osrs as u8)?;
        self.write_reg(regs::ADDR_CTRL_MEAS, ctrl_meas(osrs))?;
        self.write_reg(regs::ADDR_CONFIG, (config.iir_filter as u8) << 2)?;

        match config.gas_profile {
            Some(profile) => self.set_gas_heater_profile(profile, config.ambient_temp)?,
            None => self.write_reg(regs::ADDR_CTRL_GAS_1, 0)?,
        }

        self.config = *config;
        debug!("sensor configured, gas enabled: {}", self.config.gas_enabled());
        Ok(())
    }

    /// Configures heating duration and target temperature for a gas profile
    /// and selects it for the next measurement.
    ///
    /// The heater resistance depends on the ambient temperature, so call this
    /// again with a fresh reading when the environment changes noticeably.
    pub fn set_gas_heater_profile(
        &mut self,
        profile: GasProfile,
        ambient: Celsius,
    ) -> error::Result<(), IFACE::Error> {
        let gas_wait =
            calc::heater_duration(profile.wait_time).ok_or(Bme680Error::InvalidWaitTime)?;
        let res_heat = calc::heater_resistance(profile.target_temp, ambient, &self.calib);
        let index = profile.index as u8;

        self.write_reg(regs::ADDR_GAS_WAIT_0 + index, gas_wait)?;
        self.write_reg(regs::ADDR_RES_HEAT_0 + index, res_heat)?;
        self.write_reg(
            regs::ADDR_CTRL_GAS_1,
            regs::RUN_GAS | (index & regs::NB_CONV_MASK),
        )?;

        self.config.gas_profile = Some(profile);
        self.config.ambient_temp = ambient;
        Ok(())
    }

    /// Triggers a measurement in 'Forced Mode', waits for completion, and
    /// returns compensated data.
    ///
    /// Channels whose oversampling is `Skipped` read `0.0`. Without a
    /// temperature the other environmental channels cannot be compensated
    /// and read `0.0` as well.
    ///
    /// # Power Saving
    /// If all measurements are set to `Skipped` and gas is disabled, this function
    /// returns immediately with default values, without any bus traffic.
    ///
    /// # Errors
    /// - [`Bme680Error::Bus`] if a transfer fails.
    /// - [`Bme680Error::NotReady`] if no new data shows up in time.
    /// - [`Bme680Error::GasNotValid`] or [`Bme680Error::HeaterNotStable`] if
    ///   gas is enabled and the gas status bits say so.
    pub fn read_all(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> error::Result<CompensatedReading, IFACE::Error> {
        if self.config.is_idle() {
            return Ok(CompensatedReading::default());
        }

        // 1. Wake up sensor and start measurement cycle
        let ctrl_meas = ctrl_meas(&self.config.osrs_config) | regs::MODE_FORCED;
        self.write_reg(regs::ADDR_CTRL_MEAS, ctrl_meas)?;

        // 2. Wait for TPH conversion and the heating phase
        let duration = self.config.measurement_duration();
        trace!("forced mode triggered, waiting {} ms", duration.0);
        delay.delay_ms(duration.0);

        // 3. Poll for "New Data" bit and read ADC values
        let raw = self.read_raw_data(delay)?;

        // 4. Check gas validity bits
        let gas_enabled = self.config.gas_enabled();
        if gas_enabled && !raw.gas_valid {
            return Err(Bme680Error::GasNotValid);
        } else if gas_enabled && !raw.heat_stable {
            return Err(Bme680Error::HeaterNotStable);
        }

        // 5. Apply compensation to raw values (if not skipped)
        let osrs = self.config.osrs_config;
        let mut reading = CompensatedReading::default();

        if osrs.temp_osrs != Oversampling::Skipped {
            let temp = self
                .compensation
                .compensate_temperature(raw.temp_adc, &self.calib);
            reading.temperature = temp.celsius();

            // Humidity and Pressure compensation depends on "fine temperature"
            if osrs.pres_osrs != Oversampling::Skipped {
                reading.pressure =
                    self.compensation
                        .compensate_pressure(raw.press_adc, &temp, &self.calib);
            }
            if osrs.hum_osrs != Oversampling::Skipped {
                reading.humidity =
                    self.compensation
                        .compensate_humidity(raw.hum_adc, &temp, &self.calib);
            }
        }

        if gas_enabled {
            reading.gas_resistance = self.compensation.compensate_gas(
                raw.gas_adc,
                raw.gas_range as i32,
                &self.calib,
            )?;
        }

        debug!(
            "reading: {} C, {} hPa, {} %, {} Ohm",
            reading.temperature,
            reading.pressure,
            reading.humidity,
            reading.gas_resistance
        );
        Ok(reading)
    }

    /// Reads the Chip ID from the sensor (expected value: 0x61).
    pub fn chip_id(&mut self) -> error::Result<u8, IFACE::Error> {
        self.read_reg_byte(regs::ADDR_CHIP_ID)
    }

    /// Calibration coefficients loaded during [`init`](Bme680::init).
    pub fn calibration(&self) -> &CalibrationCoefficients {
        &self.calib
    }

    /// Configuration last written to the sensor. Until [`configure`](Bme680::configure)
    /// runs, this is the reset state with every channel skipped.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Polls the sensor until new data is available and reads all ADC values.
    fn read_raw_data(&mut self, delay: &mut impl DelayNs) -> error::Result<RawReading, IFACE::Error> {
        for _ in 0..MAX_POLLS {
            // Check bit 7 in register 0x1D (new_data_0)
            let status = self.read_reg_byte(regs::ADDR_MEAS_STATUS_0)?;
            if status & regs::NEW_DATA_MASK != 0 {
                let mut buffer = [0u8; regs::LEN_FIELD_DATA];
                // Burst read starting from 0x1F (pressure MSB)
                self.read_into(regs::ADDR_FIELD_DATA, &mut buffer)?;
                return Ok(RawReading::from_field_data(&buffer));
            }

            delay.delay_ms(POLL_INTERVAL_MS);
        }

        warn!("no new data after {} polls", MAX_POLLS);
        Err(Bme680Error::NotReady)
    }
}

/// `ctrl_meas` value for the given oversampling, in sleep mode.
fn ctrl_meas(osrs: &OversamplingConfig) -> u8 {
    ((osrs.temp_osrs as u8) << 5) | ((osrs.pres_osrs as u8) << 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x76;

    fn init_transactions() -> Vec<I2cTransaction> {
        let mut transactions = vec![I2cTransaction::write(
            ADDR,
            vec![regs::ADDR_SOFT_RESET, regs::CMD_SOFT_RESET],
        )];
        transactions.extend(fixture::load_transactions(ADDR));
        transactions
    }

    fn gas_profile() -> GasProfile {
        GasProfile {
            index: GasProfileIndex::Profile2,
            target_temp: Celsius(320),
            wait_time: Milliseconds(150),
        }
    }

    fn configure_transactions(config: &Config) -> Vec<I2cTransaction> {
        let mut transactions = vec![
            I2cTransaction::write(ADDR, vec![regs::ADDR_CTRL_HUM, config.osrs_config.hum_osrs as u8]),
            I2cTransaction::write(ADDR, vec![regs::ADDR_CTRL_MEAS, ctrl_meas(&config.osrs_config)]),
            I2cTransaction::write(ADDR, vec![regs::ADDR_CONFIG, (config.iir_filter as u8) << 2]),
        ];
        match config.gas_profile {
            // 150 ms and 320 °C at 25 °C ambient for the fixture coefficients.
            Some(_) => transactions.extend([
                I2cTransaction::write(ADDR, vec![0x66, 0x65]),
                I2cTransaction::write(ADDR, vec![0x5C, 116]),
                I2cTransaction::write(ADDR, vec![regs::ADDR_CTRL_GAS_1, 0x12]),
            ]),
            None => transactions.push(I2cTransaction::write(ADDR, vec![regs::ADDR_CTRL_GAS_1, 0])),
        }
        transactions
    }

    fn measurement_transactions(config: &Config, field_data: [u8; 13]) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(
                ADDR,
                vec![regs::ADDR_CTRL_MEAS, ctrl_meas(&config.osrs_config) | regs::MODE_FORCED],
            ),
            I2cTransaction::write_read(ADDR, vec![regs::ADDR_MEAS_STATUS_0], vec![0x80]),
            I2cTransaction::write_read(ADDR, vec![regs::ADDR_FIELD_DATA], field_data.to_vec()),
        ]
    }

    fn gas_config() -> Config {
        ConfigBuilder::new()
            .gas_profile(Some(gas_profile()))
            .ambient_temp(Celsius(25))
            .build()
    }

    fn assert_close(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} differs from {expected} by more than {tolerance}"
        );
    }

    #[test]
    fn init_loads_calibration() {
        let mut i2c = I2cMock::new(&init_transactions());

        let bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut NoopDelay::new())
            .unwrap();
        assert_eq!(bme.calibration(), &fixture::coefficients());

        i2c.done();
    }

    #[test]
    fn init_rejects_foreign_chip_before_calibration_read() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![regs::ADDR_SOFT_RESET, regs::CMD_SOFT_RESET]),
            I2cTransaction::write_read(ADDR, vec![regs::ADDR_CHIP_ID], vec![0x60]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let result = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary).init(&mut NoopDelay::new());
        assert!(matches!(result, Err(Bme680Error::UnsupportedDevice(0x60))));

        i2c.done();
    }

    #[test]
    fn init_propagates_reset_failure() {
        let expectations = [I2cTransaction::write(
            ADDR,
            vec![regs::ADDR_SOFT_RESET, regs::CMD_SOFT_RESET],
        )
        .with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);

        let result = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary).init(&mut NoopDelay::new());
        assert!(matches!(result, Err(Bme680Error::Bus(ErrorKind::Other))));

        i2c.done();
    }

    #[test]
    fn configure_writes_heater_profile() {
        let config = ConfigBuilder::new()
            .temp_oversampling(Oversampling::X2)
            .iir_filter(IIRFilter::IIR3)
            .gas_profile(Some(gas_profile()))
            .ambient_temp(Celsius(25))
            .build();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        let mut i2c = I2cMock::new(&expectations);

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut NoopDelay::new())
            .unwrap();
        bme.configure(&config).unwrap();
        assert_eq!(bme.config(), &config);

        i2c.done();
    }

    #[test]
    fn configure_rejects_long_heater_wait_without_bus_traffic() {
        let config = ConfigBuilder::new()
            .gas_profile(Some(GasProfile {
                wait_time: Milliseconds(4033),
                ..gas_profile()
            }))
            .build();
        let mut i2c = I2cMock::new(&init_transactions());

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut NoopDelay::new())
            .unwrap();
        assert_eq!(bme.configure(&config), Err(Bme680Error::InvalidWaitTime));

        i2c.done();
    }

    #[test]
    fn read_all_reference_measurement() {
        let config = gas_config();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        expectations.extend(measurement_transactions(&config, fixture::FIELD_DATA));
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut delay)
            .unwrap();
        bme.configure(&config).unwrap();
        let reading = bme.read_all(&mut delay).unwrap();

        assert_close(reading.temperature, fixture::TEMPERATURE, 0.005);
        assert_close(reading.pressure, fixture::PRESSURE, 0.05);
        assert_close(reading.humidity, fixture::HUMIDITY, 0.01);
        assert_close(reading.gas_resistance, fixture::GAS_RESISTANCE, 1.0);

        i2c.done();
    }

    #[test]
    fn read_all_with_fixed_point_compensation() {
        let config = gas_config();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        expectations.extend(measurement_transactions(&config, fixture::FIELD_DATA));
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .with_compensation(FixedPointCompensation)
            .init(&mut delay)
            .unwrap();
        bme.configure(&config).unwrap();
        let reading = bme.read_all(&mut delay).unwrap();

        assert_close(reading.temperature, fixture::TEMPERATURE, 0.01);
        assert_close(reading.pressure, fixture::PRESSURE, 0.1);
        assert_close(reading.humidity, fixture::HUMIDITY, 0.05);
        assert_close(reading.gas_resistance, fixture::GAS_RESISTANCE, 1.0);

        i2c.done();
    }

    #[test]
    fn read_all_leaves_skipped_channels_at_zero() {
        let config = ConfigBuilder::new()
            .hum_oversampling(Oversampling::Skipped)
            .build();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        expectations.extend(measurement_transactions(&config, fixture::FIELD_DATA));
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut delay)
            .unwrap();
        bme.configure(&config).unwrap();
        let reading = bme.read_all(&mut delay).unwrap();

        assert_close(reading.temperature, fixture::TEMPERATURE, 0.005);
        assert_close(reading.pressure, fixture::PRESSURE, 0.05);
        assert_eq!(reading.humidity, 0.0);
        assert_eq!(reading.gas_resistance, 0.0);

        i2c.done();
    }

    #[test]
    fn read_all_idle_without_bus_traffic() {
        let config = ConfigBuilder::new()
            .temp_oversampling(Oversampling::Skipped)
            .hum_oversampling(Oversampling::Skipped)
            .pres_oversampling(Oversampling::Skipped)
            .build();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut delay)
            .unwrap();
        bme.configure(&config).unwrap();
        assert_eq!(bme.read_all(&mut delay), Ok(CompensatedReading::default()));

        i2c.done();
    }

    #[test]
    fn read_all_before_configure_is_idle() {
        let mut i2c = I2cMock::new(&init_transactions());
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut delay)
            .unwrap();
        assert!(bme.config().osrs_config.is_all_skipped());
        assert_eq!(bme.config().gas_profile, None);
        assert_eq!(bme.read_all(&mut delay), Ok(CompensatedReading::default()));

        i2c.done();
    }

    #[test]
    fn read_all_times_out_when_data_never_ready() {
        let config = Config::default();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        expectations.push(I2cTransaction::write(
            ADDR,
            vec![regs::ADDR_CTRL_MEAS, ctrl_meas(&config.osrs_config) | regs::MODE_FORCED],
        ));
        for _ in 0..MAX_POLLS {
            expectations.push(I2cTransaction::write_read(
                ADDR,
                vec![regs::ADDR_MEAS_STATUS_0],
                vec![0x00],
            ));
        }
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut delay)
            .unwrap();
        bme.configure(&config).unwrap();
        assert_eq!(bme.read_all(&mut delay), Err(Bme680Error::NotReady));

        i2c.done();
    }

    #[test]
    fn read_all_reports_gas_status() {
        let config = gas_config();
        // Range 5 without gas_valid, then with gas_valid but no heat_stab.
        for (status, expected) in [
            (0x15, Bme680Error::GasNotValid),
            (0x25, Bme680Error::HeaterNotStable),
        ] {
            let mut field_data = fixture::FIELD_DATA;
            field_data[12] = status;
            let mut expectations = init_transactions();
            expectations.extend(configure_transactions(&config));
            expectations.extend(measurement_transactions(&config, field_data));
            let mut i2c = I2cMock::new(&expectations);
            let mut delay = NoopDelay::new();

            let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
                .init(&mut delay)
                .unwrap();
            bme.configure(&config).unwrap();
            assert_eq!(bme.read_all(&mut delay), Err(expected));

            i2c.done();
        }
    }

    #[test]
    fn read_all_propagates_write_failure() {
        let config = Config::default();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        expectations.push(
            I2cTransaction::write(
                ADDR,
                vec![regs::ADDR_CTRL_MEAS, ctrl_meas(&config.osrs_config) | regs::MODE_FORCED],
            )
            .with_error(ErrorKind::Other),
        );
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut delay)
            .unwrap();
        bme.configure(&config).unwrap();
        assert_eq!(bme.read_all(&mut delay), Err(Bme680Error::Bus(ErrorKind::Other)));

        i2c.done();
    }

    #[test]
    fn read_all_propagates_read_failure() {
        let config = Config::default();
        let mut expectations = init_transactions();
        expectations.extend(configure_transactions(&config));
        let mut measurement = measurement_transactions(&config, fixture::FIELD_DATA);
        let burst = measurement.pop().unwrap();
        measurement.push(burst.with_error(ErrorKind::Other));
        expectations.extend(measurement);
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = NoopDelay::new();

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut delay)
            .unwrap();
        bme.configure(&config).unwrap();
        assert_eq!(bme.read_all(&mut delay), Err(Bme680Error::Bus(ErrorKind::Other)));

        i2c.done();
    }

    #[test]
    fn chip_id_reads_register() {
        let mut expectations = init_transactions();
        expectations.push(I2cTransaction::write_read(
            ADDR,
            vec![regs::ADDR_CHIP_ID],
            vec![regs::CHIP_ID],
        ));
        let mut i2c = I2cMock::new(&expectations);

        let mut bme = Bme680::new_i2c(&mut i2c, DeviceAddress::Primary)
            .init(&mut NoopDelay::new())
            .unwrap();
        assert_eq!(bme.chip_id(), Ok(regs::CHIP_ID));

        i2c.done();
    }
}
