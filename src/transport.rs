use log::{debug, trace};

use crate::bus::Bus;
use crate::command::Command;
use crate::{checksum, Result};

/// Executes [`Command`]s against one device on a [`Bus`].
pub struct Transport<B> {
    bus: B,
    address: u8,
}

impl<B: Bus> Transport<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> B {
        self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Runs one transaction and returns the response with checksums verified and removed, or an
    /// empty buffer if the command has no read phase.
    ///
    /// Returns after the command's post-processing time has elapsed, so the next command can be
    /// issued right away. Errors are returned as-is; nothing is retried.
    pub fn execute(&mut self, command: &Command) -> Result<Vec<u8>> {
        debug!(
            "{} (code {:04X?}, tx {:?} bytes, rx {:?} bytes)",
            command.name(),
            command.code(),
            command.tx_data().map(<[u8]>::len),
            command.rx_length()
        );

        if let Some(frame) = command.encode() {
            trace!("write {:#04x}: {:02X?}", self.address, frame);
            self.bus.write(self.address, &frame)?;
        }

        let data = match command.rx_length() {
            Some(rx_length) => {
                if !command.read_delay().is_zero() {
                    self.bus.delay(command.read_delay());
                }
                let mut buf = vec![0u8; rx_length];
                self.bus.read(self.address, &mut buf)?;
                trace!("read {:#04x}: {:02X?}", self.address, buf);
                checksum::strip_checksums(&buf)?
            }
            None => Vec::new(),
        };

        if !command.post_processing_time().is_zero() {
            self.bus.delay(command.post_processing_time());
        }
        Ok(data)
    }
}
