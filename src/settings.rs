/// Temperature in whole degrees Celsius, used for the gas heater settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Celsius(pub i32);

/// Duration wrapper for type-safety. Stored in milliseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Milliseconds(pub u32);

/// Oversampling settings for temperature, pressure and humidity.
///
/// Higher oversampling rates reduce noise by averaging in hardware, but
/// lengthen each measurement cycle and raise its power consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Oversampling {
    /// No measurement. Disables the channel entirely.
    Skipped = 0,
    /// 1x oversampling (default).
    #[default]
    X1 = 1,
    /// 2x oversampling.
    X2 = 2,
    /// 4x oversampling.
    X4 = 3,
    /// 8x oversampling.
    X8 = 4,
    /// 16x oversampling. Highest precision, longest duration.
    X16 = 5,
}

impl Oversampling {
    /// Number of ADC conversions this setting costs per measurement.
    pub(crate) fn cycles(self) -> u32 {
        match self {
            Oversampling::Skipped => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

/// Grouped oversampling configuration for the three environmental channels.
///
/// Use `Oversampling::Skipped` for channels the application does not need
/// (saves time and energy).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OversamplingConfig {
    /// Temperature oversampling.
    pub temp_osrs: Oversampling,
    /// Humidity oversampling.
    pub hum_osrs: Oversampling,
    /// Pressure oversampling.
    pub pres_osrs: Oversampling,
}

impl OversamplingConfig {
    /// Returns `true` if all TPH channels are `Skipped`.
    pub fn is_all_skipped(&self) -> bool {
        self.temp_osrs == Oversampling::Skipped
            && self.hum_osrs == Oversampling::Skipped
            && self.pres_osrs == Oversampling::Skipped
    }
}

/// Infinite Impulse Response (IIR) filter coefficient.
///
/// Smooths short-term disturbances in pressure and temperature (slamming
/// doors, drafts). Does not affect humidity or gas.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IIRFilter {
    /// Filter disabled.
    #[default]
    IIR0 = 0,
    IIR1 = 1,
    IIR3 = 2,
    IIR7 = 3,
    IIR15 = 4,
    IIR31 = 5,
    IIR63 = 6,
    IIR127 = 7,
}

/// Heater profile slots available in the sensor (0 to 9).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GasProfileIndex {
    #[default]
    Profile0 = 0,
    Profile1 = 1,
    Profile2 = 2,
    Profile3 = 3,
    Profile4 = 4,
    Profile5 = 5,
    Profile6 = 6,
    Profile7 = 7,
    Profile8 = 8,
    Profile9 = 9,
}

/// Configuration of the gas sensor heating plate.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GasProfile {
    /// Slot index in the sensor memory where this profile is stored.
    pub index: GasProfileIndex,
    /// Target temperature of the plate (typically 300 °C to 400 °C).
    pub target_temp: Celsius,
    /// Duration the temperature is held before the gas measurement.
    pub wait_time: Milliseconds,
}

/// Complete sensor configuration.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Oversampling settings for T, P and H.
    pub osrs_config: OversamplingConfig,
    /// IIR filter setting.
    pub iir_filter: IIRFilter,
    /// Gas heater profile. `None` disables the heater and the gas measurement.
    pub gas_profile: Option<GasProfile>,
    /// Current estimate of the ambient temperature, needed to compute the
    /// heater resistance.
    pub ambient_temp: Celsius,
}

impl Config {
    /// Register state after a soft reset: every channel skipped, heater off.
    pub(crate) fn after_reset() -> Self {
        Config {
            osrs_config: OversamplingConfig {
                temp_osrs: Oversampling::Skipped,
                hum_osrs: Oversampling::Skipped,
                pres_osrs: Oversampling::Skipped,
            },
            ..Default::default()
        }
    }

    /// Returns `true` if the gas measurement is enabled.
    pub(crate) fn gas_enabled(&self) -> bool {
        self.gas_profile.is_some()
    }

    /// Returns `true` if neither a TPH channel nor the gas channel is enabled.
    pub(crate) fn is_idle(&self) -> bool {
        !self.gas_enabled() && self.osrs_config.is_all_skipped()
    }

    /// Time from triggering forced mode until the data registers are
    /// expected to hold a new sample, heater wait included.
    pub(crate) fn measurement_duration(&self) -> Milliseconds {
        let osrs = &self.osrs_config;
        let meas_cycles = osrs.temp_osrs.cycles() + osrs.pres_osrs.cycles() + osrs.hum_osrs.cycles();

        // Durations from the vendor API, in microseconds.
        let mut duration_us = meas_cycles * 1963;
        duration_us += 477 * 4; // TPH switching
        duration_us += 477 * 5; // gas measurement
        duration_us += 500; // round up

        // Wake-up takes another millisecond.
        let mut duration_ms = duration_us / 1000 + 1;
        if let Some(profile) = self.gas_profile {
            duration_ms += profile.wait_time.0;
        }

        Milliseconds(duration_ms)
    }
}

/// Convenience builder for a [`Config`].
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the temperature oversampling.
    pub fn temp_oversampling(mut self, os: Oversampling) -> Self {
        self.config.osrs_config.temp_osrs = os;
        self
    }

    /// Sets the humidity oversampling.
    pub fn hum_oversampling(mut self, os: Oversampling) -> Self {
        self.config.osrs_config.hum_osrs = os;
        self
    }

    /// Sets the pressure oversampling.
    pub fn pres_oversampling(mut self, os: Oversampling) -> Self {
        self.config.osrs_config.pres_osrs = os;
        self
    }

    /// Sets the IIR filter coefficient.
    pub fn iir_filter(mut self, filter: IIRFilter) -> Self {
        self.config.iir_filter = filter;
        self
    }

    /// Enables or disables the gas heater profile.
    pub fn gas_profile(mut self, profile: Option<GasProfile>) -> Self {
        self.config.gas_profile = profile;
        self
    }

    /// Sets the initial ambient temperature estimate for the heater calculation.
    pub fn ambient_temp(mut self, temp: Celsius) -> Self {
        self.config.ambient_temp = temp;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
