//! Conversions between physical values and the integer ticks the STC3x exchanges on the wire.
//!
//! Condition types (`RelativeHumidity`, `TemperatureCondition`, `ReferenceConcentration`) are
//! built from a physical value and carry the ticks to send. Measurement types (`Temperature`,
//! `GasConcentration`) are built from received ticks and carry the decoded values.
//!
//! Inputs are not range-checked. Values outside a field's range saturate at the tick type's
//! bounds when cast, and NaN becomes 0 ticks.

use std::fmt;

/// Binary gas mixture the sensor is configured to measure.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryGas {
    /// CO2 in N2, 0 to 100 vol%
    Co2InN2Range100 = 0x0000,
    /// CO2 in air, 0 to 100 vol%
    Co2InAirRange100 = 0x0001,
    /// CO2 in N2, 0 to 25 vol%
    Co2InN2Range25 = 0x0002,
    /// CO2 in air, 0 to 25 vol%
    Co2InAirRange25 = 0x0003,
}

impl From<BinaryGas> for u16 {
    fn from(value: BinaryGas) -> Self {
        value as u16
    }
}

/// Relative humidity of the measured gas, used for compensation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeHumidity {
    pub percent_rh: f64,
    pub ticks: u16,
}

impl RelativeHumidity {
    pub fn from_percent(percent_rh: f64) -> Self {
        Self {
            percent_rh,
            ticks: (percent_rh * 65535.0 / 100.0).round_ties_even() as u16,
        }
    }
}

impl fmt::Display for RelativeHumidity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2} %RH", self.percent_rh)
    }
}

/// Temperature of the measured gas, used for compensation.
///
/// `degrees_fahrenheit` is informational; only `ticks` goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureCondition {
    pub degrees_celsius: f64,
    pub degrees_fahrenheit: f64,
    pub ticks: i16,
}

impl TemperatureCondition {
    pub fn from_celsius(degrees_celsius: f64) -> Self {
        Self {
            degrees_celsius,
            degrees_fahrenheit: 32.0 + (degrees_celsius * 9.0 / 5.0),
            ticks: (degrees_celsius * 200.0).round_ties_even() as i16,
        }
    }
}

impl fmt::Display for TemperatureCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1} °C", self.degrees_celsius)
    }
}

/// Known gas concentration used as the target of a forced recalibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceConcentration {
    pub vol_percent: f64,
    pub ticks: u16,
}

impl ReferenceConcentration {
    pub fn from_vol_percent(vol_percent: f64) -> Self {
        Self {
            vol_percent,
            ticks: ((vol_percent * 32768.0) / 100.0 + 16384.0).round_ties_even() as u16,
        }
    }
}

impl fmt::Display for ReferenceConcentration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2} vol%", self.vol_percent)
    }
}

/// Temperature reported alongside a gas concentration measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub ticks: i16,
    pub degrees_celsius: f64,
    pub degrees_fahrenheit: f64,
}

impl Temperature {
    pub fn from_ticks(ticks: i16) -> Self {
        let raw = f64::from(ticks);
        Self {
            ticks,
            degrees_celsius: raw / 200.0,
            // computed from ticks directly, not from degrees_celsius
            degrees_fahrenheit: (raw * 9.0 / 1000.0) + 32.0,
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1} °C", self.degrees_celsius)
    }
}

/// Measured concentration of the configured binary gas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasConcentration {
    pub ticks: u16,
    pub vol_percent: f64,
}

impl GasConcentration {
    pub fn from_ticks(ticks: u16) -> Self {
        Self {
            ticks,
            vol_percent: 100.0 * (f64::from(ticks) - 16384.0) / 32768.0,
        }
    }
}

impl fmt::Display for GasConcentration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2} vol%", self.vol_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_humidity_ticks() {
        for (percent, ticks) in [(0.0, 0), (100.0, 65535), (55.0, 36044)] {
            let rh = RelativeHumidity::from_percent(percent);
            assert_eq!(rh.ticks, ticks, "{} %RH", percent);
            assert_eq!(rh.percent_rh, percent);
        }
    }

    #[test]
    fn test_temperature_condition_ticks() {
        let cases = [(0.0, 32.0, 0), (100.0, 212.0, 20000), (-25.0, -13.0, -5000)];
        for (celsius, fahrenheit, ticks) in cases {
            let t = TemperatureCondition::from_celsius(celsius);
            assert_eq!(t.ticks, ticks);
            assert_eq!(t.degrees_celsius, celsius);
            assert_eq!(t.degrees_fahrenheit, fahrenheit);
        }
    }

    #[test]
    fn test_temperature_condition_inverts_exactly() {
        for step in -400i32..=1200 {
            let celsius = f64::from(step) * 0.125;
            let t = TemperatureCondition::from_celsius(celsius);
            assert_eq!(f64::from(t.ticks) / 200.0, celsius);
        }
    }

    #[test]
    fn test_reference_concentration_ticks() {
        for (vol, ticks) in [(0.0, 16384), (-50.0, 0), (-1.5, 15892)] {
            let c = ReferenceConcentration::from_vol_percent(vol);
            assert_eq!(c.ticks, ticks, "{} vol%", vol);
            assert_eq!(c.vol_percent, vol);
        }
    }

    #[test]
    fn test_ticks_round_half_to_even() {
        // 0.0025 * 200 = 0.5, 0.0075 * 200 = 1.5
        assert_eq!(TemperatureCondition::from_celsius(0.0025).ticks, 0);
        assert_eq!(TemperatureCondition::from_celsius(0.0075).ticks, 2);
    }

    #[test]
    fn test_temperature_from_ticks() {
        let cases = [(0, 0.0, 32.0), (20000, 100.0, 212.0), (-5000, -25.0, -13.0)];
        for (ticks, celsius, fahrenheit) in cases {
            let t = Temperature::from_ticks(ticks);
            assert_eq!(t.ticks, ticks);
            assert_eq!(t.degrees_celsius, celsius);
            assert_eq!(t.degrees_fahrenheit, fahrenheit);
        }
    }

    #[test]
    fn test_fahrenheit_uses_ticks_not_celsius() {
        let t = Temperature::from_ticks(-7995);
        assert_eq!(t.degrees_fahrenheit, -39.955);
        // going through Celsius rounds differently at this tick
        assert_ne!(t.degrees_fahrenheit, 32.0 + t.degrees_celsius * 9.0 / 5.0);
    }

    #[test]
    fn test_gas_concentration_from_ticks() {
        for (ticks, vol) in [(16384, 0.0), (0, -50.0), (15892, -1.5)] {
            let c = GasConcentration::from_ticks(ticks);
            assert_eq!(c.ticks, ticks);
            assert!((c.vol_percent - vol).abs() < 0.01, "{} ticks -> {}", ticks, c.vol_percent);
        }
    }

    #[test]
    fn test_conditions_round_trip_through_measurements() {
        for celsius in [-40.0, -12.345, 0.0, 23.12, 12.5, 85.0] {
            let sent = TemperatureCondition::from_celsius(celsius);
            let received = Temperature::from_ticks(sent.ticks);
            assert!((received.degrees_celsius - celsius).abs() <= 1.0 / 200.0);
        }
        for vol in [-50.0, -1.5, 0.0, 12.34, 25.0, 100.0] {
            let sent = ReferenceConcentration::from_vol_percent(vol);
            let received = GasConcentration::from_ticks(sent.ticks);
            assert!((received.vol_percent - vol).abs() <= 100.0 / 32768.0);
        }
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(RelativeHumidity::from_percent(150.0).ticks, u16::MAX);
        assert_eq!(RelativeHumidity::from_percent(-10.0).ticks, 0);
        assert_eq!(TemperatureCondition::from_celsius(200.0).ticks, i16::MAX);
        assert_eq!(TemperatureCondition::from_celsius(f64::NAN).ticks, 0);
        assert_eq!(ReferenceConcentration::from_vol_percent(f64::NAN).ticks, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(RelativeHumidity::from_percent(55.0).to_string(), "55.00 %RH");
        assert_eq!(TemperatureCondition::from_celsius(25.0).to_string(), "25.0 °C");
        assert_eq!(ReferenceConcentration::from_vol_percent(-1.5).to_string(), "-1.50 vol%");
        assert_eq!(Temperature::from_ticks(-5000).to_string(), "-25.0 °C");
        assert_eq!(GasConcentration::from_ticks(16384).to_string(), "0.00 vol%");
    }

    #[test]
    fn test_binary_gas_values() {
        assert_eq!(u16::from(BinaryGas::Co2InN2Range100), 0x0000);
        assert_eq!(u16::from(BinaryGas::Co2InAirRange100), 0x0001);
        assert_eq!(u16::from(BinaryGas::Co2InN2Range25), 0x0002);
        assert_eq!(u16::from(BinaryGas::Co2InAirRange25), 0x0003);
    }
}
