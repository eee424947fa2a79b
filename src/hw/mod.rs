pub mod clock;
pub mod encoder;
pub mod pins;
pub mod uart;

pub use clock::{Clock, TickClock};
pub use encoder::{EncoderBank, SharedEncoder, Wheel};
pub use pins::{EncoderInputs, PhasePair};
pub use uart::SerialLink;
