//! STC3x command set: opcode table, command framing and response decoding.
//!
//! Every operation the sensor supports is described by one row of the table behind
//! [`Operation::descriptor`]. A [`Command`] is an immutable, single-use transaction built from a
//! row plus its argument payload. Decoders take the checksum-stripped response of a transaction.

use std::time::Duration;

use crate::checksum;
use crate::units::{
    BinaryGas, GasConcentration, ReferenceConcentration, RelativeHumidity, Temperature,
    TemperatureCondition,
};
use crate::{Error, Result};

/// Number of data bytes in a sensor state blob.
pub const SENSOR_STATE_LEN: usize = 30;

/// Product number reported by an STC31.
pub const STC31_PRODUCT_NUMBER: u32 = 0x0801_0301;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SetBinaryGas,
    SetRelativeHumidity,
    SetTemperature,
    SetPressure,
    MeasureGasConcentration,
    ForcedRecalibration,
    EnableAutomaticSelfCalibration,
    DisableAutomaticSelfCalibration,
    PrepareReadState,
    GetSensorState,
    SetSensorState,
    ApplyState,
    SelfTest,
    EnterSleepMode,
    PrepareProductIdentifier,
    ReadProductIdentifier,
}

/// Fixed wire parameters of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub name: &'static str,
    pub code: u16,
    /// Bytes to read back including checksum bytes, `None` when the operation has no read phase.
    pub rx_length: Option<usize>,
    /// Wait between the end of the write and the start of the read.
    pub read_delay: Duration,
    /// Longest clock stretch the device may apply.
    pub timeout: Duration,
    /// Time the device needs after the transaction before it accepts the next command.
    pub post_processing_time: Duration,
}

const fn row(
    name: &'static str,
    code: u16,
    rx_length: Option<usize>,
    read_delay_ms: u64,
    post_processing_ms: u64,
) -> Descriptor {
    Descriptor {
        name,
        code,
        rx_length,
        read_delay: Duration::from_millis(read_delay_ms),
        timeout: Duration::ZERO,
        post_processing_time: Duration::from_millis(post_processing_ms),
    }
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::SetBinaryGas,
        Operation::SetRelativeHumidity,
        Operation::SetTemperature,
        Operation::SetPressure,
        Operation::MeasureGasConcentration,
        Operation::ForcedRecalibration,
        Operation::EnableAutomaticSelfCalibration,
        Operation::DisableAutomaticSelfCalibration,
        Operation::PrepareReadState,
        Operation::GetSensorState,
        Operation::SetSensorState,
        Operation::ApplyState,
        Operation::SelfTest,
        Operation::EnterSleepMode,
        Operation::PrepareProductIdentifier,
        Operation::ReadProductIdentifier,
    ];

    #[rustfmt::skip]
    pub const fn descriptor(self) -> Descriptor {
        use Operation::*;
        match self {
            SetBinaryGas => row("set binary gas", 0x3615, None, 0, 1),
            SetRelativeHumidity => row("set relative humidity", 0x3624, None, 0, 1),
            SetTemperature => row("set temperature", 0x361E, None, 0, 1),
            SetPressure => row("set pressure", 0x362F, None, 0, 1),
            MeasureGasConcentration => row("measure gas concentration", 0x3639, Some(6), 70, 0),
            ForcedRecalibration => row("forced recalibration", 0x3661, None, 0, 66),
            EnableAutomaticSelfCalibration => row("enable automatic self calibration", 0x3FEF, None, 0, 1),
            DisableAutomaticSelfCalibration => row("disable automatic self calibration", 0x3F6E, None, 0, 1),
            PrepareReadState => row("prepare read state", 0x3752, None, 0, 1),
            GetSensorState => row("get sensor state", 0xE133, Some(45), 0, 0),
            SetSensorState => row("set sensor state", 0xE133, None, 0, 0),
            ApplyState => row("apply state", 0x3650, None, 0, 1),
            SelfTest => row("self test", 0x365B, Some(3), 22, 0),
            EnterSleepMode => row("enter sleep mode", 0x3677, None, 0, 1),
            PrepareProductIdentifier => row("prepare product identifier", 0x367C, None, 0, 0),
            ReadProductIdentifier => row("read product identifier", 0xE102, Some(18), 10, 0),
        }
    }
}

/// One write/read transaction with the sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: &'static str,
    code: Option<u16>,
    tx_data: Option<Vec<u8>>,
    rx_length: Option<usize>,
    read_delay: Duration,
    timeout: Duration,
    post_processing_time: Duration,
}

fn word(value: u16) -> Option<Vec<u8>> {
    Some(value.to_be_bytes().to_vec())
}

impl Command {
    fn new(operation: Operation, tx_data: Option<Vec<u8>>) -> Self {
        let d = operation.descriptor();
        Self {
            name: d.name,
            code: Some(d.code),
            tx_data,
            rx_length: d.rx_length,
            read_delay: d.read_delay,
            timeout: d.timeout,
            post_processing_time: d.post_processing_time,
        }
    }

    /// A transaction without opcode, e.g. a bare read following an earlier command.
    ///
    /// `tx_data` of `Some(vec![])` still sends a write header, `None` skips the write entirely.
    /// `rx_length` of `Some(0)` sends a read header without reading data.
    pub fn raw(tx_data: Option<Vec<u8>>, rx_length: Option<usize>) -> Self {
        Self {
            name: "raw",
            code: None,
            tx_data,
            rx_length,
            read_delay: Duration::ZERO,
            timeout: Duration::ZERO,
            post_processing_time: Duration::ZERO,
        }
    }

    pub fn set_binary_gas(gas: BinaryGas) -> Self {
        Self::new(Operation::SetBinaryGas, word(gas.into()))
    }

    pub fn set_relative_humidity(relative_humidity: RelativeHumidity) -> Self {
        Self::new(Operation::SetRelativeHumidity, word(relative_humidity.ticks))
    }

    pub fn set_temperature(temperature: TemperatureCondition) -> Self {
        Self::new(
            Operation::SetTemperature,
            Some(temperature.ticks.to_be_bytes().to_vec()),
        )
    }

    /// Ambient pressure in mbar.
    pub fn set_pressure(absolute_pressure: u16) -> Self {
        Self::new(Operation::SetPressure, word(absolute_pressure))
    }

    pub fn measure_gas_concentration() -> Self {
        Self::new(Operation::MeasureGasConcentration, None)
    }

    pub fn forced_recalibration(reference: ReferenceConcentration) -> Self {
        Self::new(Operation::ForcedRecalibration, word(reference.ticks))
    }

    pub fn enable_automatic_self_calibration() -> Self {
        Self::new(Operation::EnableAutomaticSelfCalibration, None)
    }

    pub fn disable_automatic_self_calibration() -> Self {
        Self::new(Operation::DisableAutomaticSelfCalibration, None)
    }

    pub fn prepare_read_state() -> Self {
        Self::new(Operation::PrepareReadState, None)
    }

    pub fn get_sensor_state() -> Self {
        Self::new(Operation::GetSensorState, None)
    }

    /// Writes back a state blob previously read with [`Command::get_sensor_state`]. The bytes are
    /// sent verbatim, whatever their length.
    pub fn set_sensor_state(state: &[u8]) -> Self {
        Self::new(Operation::SetSensorState, Some(state.to_vec()))
    }

    pub fn apply_state() -> Self {
        Self::new(Operation::ApplyState, None)
    }

    pub fn self_test() -> Self {
        Self::new(Operation::SelfTest, None)
    }

    pub fn enter_sleep_mode() -> Self {
        Self::new(Operation::EnterSleepMode, None)
    }

    pub fn prepare_product_identifier() -> Self {
        Self::new(Operation::PrepareProductIdentifier, None)
    }

    pub fn read_product_identifier() -> Self {
        Self::new(Operation::ReadProductIdentifier, None)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// Payload before checksum insertion.
    pub fn tx_data(&self) -> Option<&[u8]> {
        self.tx_data.as_deref()
    }

    pub fn rx_length(&self) -> Option<usize> {
        self.rx_length
    }

    pub fn read_delay(&self) -> Duration {
        self.read_delay
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn post_processing_time(&self) -> Duration {
        self.post_processing_time
    }

    /// Bytes of the write phase: the big-endian opcode followed by the payload with a checksum
    /// after every word. `None` if the command has no write phase.
    pub fn encode(&self) -> Option<Vec<u8>> {
        if self.code.is_none() && self.tx_data.is_none() {
            return None;
        }
        let mut frame = Vec::new();
        if let Some(code) = self.code {
            frame.extend_from_slice(&code.to_be_bytes());
        }
        if let Some(data) = &self.tx_data {
            frame.extend(checksum::insert_checksums(data));
        }
        Some(frame)
    }
}

/// Opaque calibration state of the sensor, read and written back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorState([u8; SENSOR_STATE_LEN]);

impl SensorState {
    pub fn as_bytes(&self) -> &[u8; SENSOR_STATE_LEN] {
        &self.0
    }
}

impl From<[u8; SENSOR_STATE_LEN]> for SensorState {
    fn from(value: [u8; SENSOR_STATE_LEN]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for SensorState {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        let bytes = value.try_into().map_err(|_| Error::UnexpectedLength {
            expected: SENSOR_STATE_LEN,
            actual: value.len(),
        })?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for SensorState {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductIdentifier {
    pub product_number: u32,
    pub serial_number: u64,
}

impl ProductIdentifier {
    pub fn is_stc31(&self) -> bool {
        self.product_number == STC31_PRODUCT_NUMBER
    }
}

fn field<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    data.get(offset..offset + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(Error::UnexpectedLength {
            expected: offset + N,
            actual: data.len(),
        })
}

/// Gas concentration and temperature from a measurement. Trailing words are ignored.
pub fn decode_gas_concentration(data: &[u8]) -> Result<(GasConcentration, Temperature)> {
    let gas = u16::from_be_bytes(field(data, 0)?);
    let temperature = i16::from_be_bytes(field(data, 2)?);
    Ok((
        GasConcentration::from_ticks(gas),
        Temperature::from_ticks(temperature),
    ))
}

/// Self test result word; zero means no error bits are set.
pub fn decode_self_test(data: &[u8]) -> Result<u16> {
    Ok(u16::from_be_bytes(field(data, 0)?))
}

pub fn decode_sensor_state(data: &[u8]) -> Result<SensorState> {
    Ok(SensorState(field(data, 0)?))
}

pub fn decode_product_identifier(data: &[u8]) -> Result<ProductIdentifier> {
    Ok(ProductIdentifier {
        product_number: u32::from_be_bytes(field(data, 0)?),
        serial_number: u64::from_be_bytes(field(data, 4)?),
    })
}
