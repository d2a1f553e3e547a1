use std::io::{Read, Write};
use std::time::Duration;

use crate::Result;

/// Byte-level access to the I2C bus used by `crate::transport`. Implemented for masters of the
/// `i2c` crate through [`I2cMaster`] and, with the `linux` feature, for Linux i2c-dev devices. Can
/// be replaced with `MockBus` for testing.
pub trait Bus {
    /// Writes `data` to the device at `address` in a single transfer.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<()>;

    /// Reads exactly `buf.len()` bytes from the device at `address` in a single transfer.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<()>;

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Adapts any `i2c` crate master that exposes plain reads and writes through `std::io`, e.g. a
/// USB-to-I2C adapter.
pub struct I2cMaster<T> {
    inner: T,
    address: Option<u8>,
}

impl<T> I2cMaster<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            address: None,
        }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> I2cMaster<T>
where
    T: i2c::Address,
    <T as i2c::Master>::Error: Into<std::io::Error>,
{
    fn select(&mut self, address: u8) -> Result<()> {
        if self.address != Some(address) {
            self.inner
                .set_slave_address(address.into(), false)
                .map_err(Into::<std::io::Error>::into)?;
            self.address = Some(address);
        }
        Ok(())
    }
}

impl<T> Bus for I2cMaster<T>
where
    T: i2c::Address + Read + Write,
    <T as i2c::Master>::Error: Into<std::io::Error>,
{
    fn write(&mut self, address: u8, data: &[u8]) -> Result<()> {
        self.select(address)?;
        self.inner.write_all(data)?;
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<()> {
        self.select(address)?;
        self.inner.read_exact(buf)?;
        Ok(())
    }
}

#[cfg(feature = "linux")]
mod linux {
    use super::Bus;
    use crate::Result;
    use i2cdev::core::I2CDevice;
    use i2cdev::linux::LinuxI2CDevice;

    /// The device is opened for a fixed slave address, so `address` is ignored.
    impl Bus for LinuxI2CDevice {
        fn write(&mut self, _address: u8, data: &[u8]) -> Result<()> {
            I2CDevice::write(self, data).map_err(std::io::Error::from)?;
            Ok(())
        }

        fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<()> {
            I2CDevice::read(self, buf).map_err(std::io::Error::from)?;
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::collections::VecDeque;
    use std::io::ErrorKind;

    /// Minimal `i2c` crate master backed by in-memory buffers.
    #[derive(Default)]
    struct FakeMaster {
        addresses: Vec<u16>,
        written: Vec<u8>,
        readable: VecDeque<u8>,
        nack: bool,
    }

    impl i2c::Master for FakeMaster {
        type Error = std::io::Error;
    }

    impl i2c::Address for FakeMaster {
        fn set_slave_address(&mut self, addr: u16, tenbit: bool) -> std::io::Result<()> {
            assert!(!tenbit);
            self.addresses.push(addr);
            Ok(())
        }
    }

    impl Read for FakeMaster {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.nack {
                return Err(ErrorKind::NotConnected.into());
            }
            let n = buf.len().min(self.readable.len());
            for b in buf.iter_mut().take(n) {
                *b = self.readable.pop_front().unwrap_or_default();
            }
            Ok(n)
        }
    }

    impl Write for FakeMaster {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.nack {
                return Err(ErrorKind::NotConnected.into());
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_i2c_master_addresses_once() {
        let mut bus = I2cMaster::new(FakeMaster::default());
        bus.write(0x29, &[0x36, 0x39]).unwrap();
        bus.write(0x29, &[0x36, 0x77]).unwrap();
        let fake = bus.into_inner();
        assert_eq!(fake.addresses, [0x29]);
        assert_eq!(fake.written, [0x36, 0x39, 0x36, 0x77]);
    }

    #[test]
    fn test_i2c_master_readdresses_on_change() {
        let mut bus = I2cMaster::new(FakeMaster::default());
        bus.write(0x29, &[0x00]).unwrap();
        bus.write(0x2A, &[0x00]).unwrap();
        assert_eq!(bus.into_inner().addresses, [0x29, 0x2A]);
    }

    #[test]
    fn test_i2c_master_read() {
        let mut fake = FakeMaster::default();
        fake.readable.extend([0xBE, 0xEF, 0x92]);
        let mut bus = I2cMaster::new(fake);
        let mut buf = [0u8; 3];
        bus.read(0x29, &mut buf).unwrap();
        assert_eq!(buf, [0xBE, 0xEF, 0x92]);
    }

    #[test]
    fn test_i2c_master_short_read() {
        let mut fake = FakeMaster::default();
        fake.readable.extend([0xBE]);
        let mut bus = I2cMaster::new(fake);
        let mut buf = [0u8; 3];
        assert_eq!(
            bus.read(0x29, &mut buf),
            Err(Error::Bus(ErrorKind::UnexpectedEof))
        );
    }

    #[test]
    fn test_i2c_master_nack() {
        let fake = FakeMaster {
            nack: true,
            ..Default::default()
        };
        let mut bus = I2cMaster::new(fake);
        assert_eq!(bus.write(0x29, &[0x36, 0x77]), Err(Error::Nack));
    }
}
