//! Diagnostic events
//!
//! The controller reports what it computes and writes through a
//! [`DiagnosticSink`]. Sinks only observe; nothing they do can change what
//! goes on the bus.

/// Something the controller did or computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Prescaler derived from a frequency request
    PrescalerComputed {
        requested_hz: u16,
        clamped_hz: u16,
        prescaler: u8,
    },
    /// Single register written
    RegisterWrite { register: u8, value: u8 },
    /// Single register read
    RegisterRead { register: u8, value: u8 },
    /// Auto-increment write of `len` data bytes starting at `register`
    BlockWrite { register: u8, len: usize },
    /// Bus transaction addressed at `register` failed
    TransportFault { register: u8 },
}

/// Receiver for diagnostic events
pub trait DiagnosticSink {
    /// Record one event
    fn record(&mut self, event: &Event);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&mut self, _event: &Event) {}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, event: &Event) {
        (**self).record(event)
    }
}

/// Forwards events to the defmt logger
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtSink {
    fn record(&mut self, event: &Event) {
        match event {
            Event::TransportFault { register } => {
                defmt::warn!("PCA9685 transaction failed at register {=u8:#x}", *register)
            }
            Event::PrescalerComputed {
                requested_hz,
                clamped_hz,
                prescaler,
            } => defmt::debug!(
                "PCA9685 prescaler {} for {} Hz (requested {} Hz)",
                prescaler,
                clamped_hz,
                requested_hz
            ),
            other => defmt::trace!("PCA9685 {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(usize);

    impl DiagnosticSink for Counter {
        fn record(&mut self, _event: &Event) {
            self.0 += 1;
        }
    }

    fn report<S: DiagnosticSink>(mut sink: S) {
        sink.record(&Event::RegisterWrite {
            register: 0x00,
            value: 0xA0,
        });
        sink.record(&Event::TransportFault { register: 0x01 });
    }

    #[test]
    fn test_borrowed_sink_forwards() {
        let mut counter = Counter(0);
        report(&mut counter);
        report(&mut counter);
        assert_eq!(counter.0, 4);
    }

    #[test]
    fn test_noop_sink() {
        let mut sink = NoopSink;
        sink.record(&Event::BlockWrite {
            register: 0x06,
            len: 64,
        });
    }
}
