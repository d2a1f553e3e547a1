//! Driver for Sensirion STC3x binary gas concentration sensors (e.g. STC31) on I2C.
//!
#![cfg_attr(
    feature = "linux",
    doc = r##"
```no_run
use i2cdev::linux::LinuxI2CDevice;
use stc3x_i2c::{BinaryGas, Stc3x, DEFAULT_ADDRESS};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let dev = LinuxI2CDevice::new("/dev/i2c-1", DEFAULT_ADDRESS.into())?;
let mut stc = Stc3x::new(dev);
stc.set_binary_gas(BinaryGas::Co2InAirRange100)?;
stc.set_relative_humidity(45.0)?;
let (co2, temperature) = stc.measure_gas_concentration()?;
println!("{} at {}", co2, temperature);
# Ok(())
# }
```
"##
)]

mod bus;
mod checksum;
mod command;
mod device;
mod error;
mod transport;
mod units;


pub use bus::*;
pub use checksum::{crc8, insert_checksums, strip_checksums, CRC_8_SENSIRION};
pub use command::*;
pub use device::*;
pub use error::*;
pub use transport::*;
pub use units::*;
