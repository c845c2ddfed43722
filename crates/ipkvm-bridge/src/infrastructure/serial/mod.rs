//! Serial transports.

pub mod mock;
pub mod port;

pub use mock::MockTransport;
pub use port::SerialPortTransport;
