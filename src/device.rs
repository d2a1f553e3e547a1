use crate::bus::Bus;
use crate::command::{self, Command, ProductIdentifier, SensorState};
use crate::transport::Transport;
use crate::units::{
    BinaryGas, GasConcentration, ReferenceConcentration, RelativeHumidity, Temperature,
    TemperatureCondition,
};
use crate::Result;

/// I2C address of the STC3x.
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// Driver for an STC3x binary gas concentration sensor.
///
/// Each method runs one command (two for the identifier and state operations) and blocks until
/// the sensor is ready for the next one. Compensation values written with the `set_*` methods
/// are kept by the sensor until changed, reset, power loss or sleep.
pub struct Stc3x<B> {
    transport: Transport<B>,
}

impl<B: Bus> Stc3x<B> {
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DEFAULT_ADDRESS)
    }

    pub fn with_address(bus: B, address: u8) -> Self {
        Self {
            transport: Transport::new(bus, address),
        }
    }

    pub fn release(self) -> B {
        self.transport.release()
    }

    /// Reads the 32-bit product number and 64-bit serial number.
    pub fn read_product_identifier(&mut self) -> Result<ProductIdentifier> {
        self.transport
            .execute(&Command::prepare_product_identifier())?;
        let data = self.transport.execute(&Command::read_product_identifier())?;
        command::decode_product_identifier(&data)
    }

    /// Selects the gas mixture to measure. The sensor forgets it on reset, power loss or sleep
    /// and then reports undefined concentrations until it is set again.
    pub fn set_binary_gas(&mut self, gas: BinaryGas) -> Result<()> {
        self.transport.execute(&Command::set_binary_gas(gas))?;
        Ok(())
    }

    /// Sets the relative humidity used for compensation. Defaults to 0 %RH.
    pub fn set_relative_humidity(&mut self, percent_rh: f64) -> Result<()> {
        let condition = RelativeHumidity::from_percent(percent_rh);
        self.transport
            .execute(&Command::set_relative_humidity(condition))?;
        Ok(())
    }

    /// Overrides the internal temperature sensor used for compensation. The value is also what
    /// subsequent measurements report as temperature.
    pub fn set_temperature(&mut self, degrees_celsius: f64) -> Result<()> {
        let condition = TemperatureCondition::from_celsius(degrees_celsius);
        self.transport.execute(&Command::set_temperature(condition))?;
        Ok(())
    }

    /// Sets the absolute ambient pressure in mbar used for compensation. Defaults to 1013 mbar.
    pub fn set_pressure(&mut self, absolute_pressure: u16) -> Result<()> {
        self.transport
            .execute(&Command::set_pressure(absolute_pressure))?;
        Ok(())
    }

    /// Triggers a single measurement and reads the result.
    ///
    /// Should not be called more than once per second.
    pub fn measure_gas_concentration(&mut self) -> Result<(GasConcentration, Temperature)> {
        let data = self
            .transport
            .execute(&Command::measure_gas_concentration())?;
        command::decode_gas_concentration(&data)
    }

    /// Recalibrates the sensor against a known reference concentration in vol%.
    pub fn forced_recalibration(&mut self, reference_vol_percent: f64) -> Result<()> {
        let reference = ReferenceConcentration::from_vol_percent(reference_vol_percent);
        self.transport
            .execute(&Command::forced_recalibration(reference))?;
        Ok(())
    }

    pub fn enable_automatic_self_calibration(&mut self) -> Result<()> {
        self.transport
            .execute(&Command::enable_automatic_self_calibration())?;
        Ok(())
    }

    pub fn disable_automatic_self_calibration(&mut self) -> Result<()> {
        self.transport
            .execute(&Command::disable_automatic_self_calibration())?;
        Ok(())
    }

    /// Reads the sensor state so it can be restored with [`Stc3x::apply_state`], e.g. after
    /// sleep with automatic self-calibration enabled.
    pub fn read_state(&mut self) -> Result<SensorState> {
        self.transport.execute(&Command::prepare_read_state())?;
        let data = self.transport.execute(&Command::get_sensor_state())?;
        command::decode_sensor_state(&data)
    }

    /// Writes back a state read earlier and makes the sensor use it.
    pub fn apply_state(&mut self, state: impl AsRef<[u8]>) -> Result<()> {
        self.transport
            .execute(&Command::set_sensor_state(state.as_ref()))?;
        self.transport.execute(&Command::apply_state())?;
        Ok(())
    }

    /// Runs the built-in self test. Zero means pass; otherwise each set bit is an error flag.
    pub fn self_test(&mut self) -> Result<u16> {
        let data = self.transport.execute(&Command::self_test())?;
        command::decode_self_test(&data)
    }

    /// Puts the idle sensor to sleep. It wakes on the next addressed write, which it does not
    /// acknowledge, so that write fails with [`crate::Error::Nack`].
    pub fn enter_sleep_mode(&mut self) -> Result<()> {
        self.transport.execute(&Command::enter_sleep_mode())?;
        Ok(())
    }
}
