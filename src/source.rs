//! Sample sources: where the raw line levels come from.
//!
//! The decoders only ever see a small unsigned reading, one bit per line.
//! [`SampleSource`] is the seam between that reading and the wiring:
//!
//! - [`PinGroup`] samples an arbitrary set of `embedded-hal` input pins.
//! - [`PortBank`] masks a contiguous run of lines out of one port register,
//!   which gives a single atomic read of all lines.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::error::EncoderError;

/// Electrical configuration requested for the tracked lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// High impedance input.
    Floating,
    /// Input with internal pull-up (open-collector sensors).
    #[default]
    PullUp,
    /// Input with internal pull-down.
    PullDown,
}

/// Mapping from line index to bit position in a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Line 0 lands in bit 0.
    #[default]
    LsbFirst,
    /// Line 0 lands in the highest bit of the group (mirrored wiring).
    MsbFirst,
}

impl BitOrder {
    /// Re-order a `lines`-wide reading that was assembled LSB-first.
    pub const fn apply(self, reading: u8, lines: u8) -> u8 {
        match self {
            BitOrder::LsbFirst => reading,
            BitOrder::MsbFirst => {
                if lines == 0 || lines > 8 {
                    0
                } else {
                    reading.reverse_bits() >> (8 - lines)
                }
            }
        }
    }
}

/// Capability to sample a fixed set of input lines at once.
pub trait SampleSource {
    /// Failure reported by the underlying pins.
    type Error;

    /// Number of tracked lines (width of every reading).
    fn line_count(&self) -> u8;

    /// Current line levels, one bit per line, high = `1`.
    fn read(&mut self) -> Result<u8, Self::Error>;

    /// Configure the lines. Called once at setup, never from the edge path.
    fn set_pin_mode(&mut self, mode: PinMode) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// Arbitrary pin group
// ---------------------------------------------------------------------------

/// A group of up to 8 independent `embedded-hal` input pins.
///
/// Pins are sampled one after another, so the reading is only as atomic as
/// the caller's critical section makes it. Prefer [`PortBank`] when the
/// lines share a port register.
pub struct PinGroup<P, const N: usize> {
    pins: [P; N],
    order: BitOrder,
}

impl<P, const N: usize> PinGroup<P, N> {
    const FITS_IN_READING: () = assert!(N > 0 && N <= 8, "a pin group holds 1 to 8 lines");

    /// Group `pins`; `pins[0]` is line 0.
    pub fn new(pins: [P; N], order: BitOrder) -> Self {
        let () = Self::FITS_IN_READING;
        Self { pins, order }
    }

    /// Hand the pins back.
    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<P, const N: usize> SampleSource for PinGroup<P, N>
where
    P: InputPin,
{
    type Error = P::Error;

    fn line_count(&self) -> u8 {
        N as u8
    }

    fn read(&mut self) -> Result<u8, Self::Error> {
        let mut reading = 0u8;
        for (line, pin) in self.pins.iter_mut().enumerate() {
            if pin.is_high()? {
                reading |= 1 << line;
            }
        }
        Ok(self.order.apply(reading, N as u8))
    }

    /// `embedded-hal` inputs carry their pull configuration from the HAL
    /// constructor (e.g. `Input::new(pin, Pull::Up)`), so there is nothing
    /// left to apply here.
    fn set_pin_mode(&mut self, _mode: PinMode) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Pin group ignores {}; pulls are set when the HAL input is built",
            _mode
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Port register bank
// ---------------------------------------------------------------------------

/// Raw access to an 8-bit GPIO input port.
pub trait PortRegister {
    /// Read the whole input register.
    fn read(&mut self) -> u8;

    /// Apply `mode` to every pin selected by `mask`.
    fn configure(&mut self, mask: u8, mode: PinMode);
}

/// Contiguous lines inside one [`PortRegister`], selected by a mask.
///
/// The reading is `(port & mask) >> mask.trailing_zeros()`, so a mask of
/// `0b0011_0000` yields a 2-bit reading from port bits 4 and 5. A mask of
/// `0xFF` tracks the whole register.
pub struct PortBank<R> {
    register: R,
    mask: u8,
    shift: u8,
    order: BitOrder,
}

impl<R: PortRegister> PortBank<R> {
    /// Track the lines selected by `mask`.
    ///
    /// # Errors
    /// [`EncoderError::InvalidMask`] if `mask` is zero or has gaps.
    pub fn new(register: R, mask: u8, order: BitOrder) -> Result<Self, EncoderError<Infallible>> {
        if mask == 0 {
            return Err(EncoderError::InvalidMask);
        }
        let shift = mask.trailing_zeros() as u8;
        let run = mask >> shift;
        if run & run.wrapping_add(1) != 0 {
            return Err(EncoderError::InvalidMask);
        }
        Ok(Self {
            register,
            mask,
            shift,
            order,
        })
    }

    /// The line mask inside the port register.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Hand the register back.
    pub fn release(self) -> R {
        self.register
    }
}

impl<R: PortRegister> SampleSource for PortBank<R> {
    type Error = Infallible;

    fn line_count(&self) -> u8 {
        self.mask.count_ones() as u8
    }

    fn read(&mut self) -> Result<u8, Self::Error> {
        let reading = (self.register.read() & self.mask) >> self.shift;
        Ok(self.order.apply(reading, self.line_count()))
    }

    fn set_pin_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        self.register.configure(self.mask, mode);
        Ok(())
    }
}
