//! TMP275 digital temperature sensor (I2C, 12-bit, ±0.0625 °C LSB).
//!
//! The shield's TMP275 sits at address `0x48`. A read triggers a
//! one-shot 12-bit conversion, waits out the conversion time, then
//! fetches the two-byte temperature register. The low nibble of the low
//! byte is padding.
//!
//! The driver is generic over the `embedded-hal` 1.0 `I2c` and `DelayNs`
//! traits, so it runs against any bus implementation, including mocks.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Stock bus address of the shield's TMP275.
pub const TMP275_ADDRESS: u8 = 0x48;

const REG_TEMPERATURE: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;
/// One-shot, 12-bit resolution, shutdown between conversions.
const CONFIG_ONE_SHOT_12BIT: u8 = 0b1110_0001;
/// Worst-case 12-bit conversion time.
const CONVERSION_DELAY_MS: u32 = 250;

const LSB_CELSIUS: f32 = 0.0625;

/// Output scale for a temperature read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnits {
    Celsius,
    Fahrenheit,
    Kelvin,
}

/// TMP275 driver over a shared I2C bus.
pub struct Tmp275<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Tmp275<I2C> {
    /// Driver at the stock shield address.
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, TMP275_ADDRESS)
    }

    /// Driver at an alternate strap address.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Trigger a one-shot conversion and read the temperature.
    pub fn read(&mut self, delay: &mut impl DelayNs, units: TempUnits) -> Result<f32, I2C::Error> {
        self.i2c
            .write(self.address, &[REG_CONFIG, CONFIG_ONE_SHOT_12BIT])?;
        self.i2c.write(self.address, &[REG_TEMPERATURE])?;
        delay.delay_ms(CONVERSION_DELAY_MS);

        let mut raw = [0u8; 2];
        self.i2c.read(self.address, &mut raw)?;
        Ok(convert(raw[0], raw[1], units))
    }

    /// Release the bus for other peripherals.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Convert the raw register pair to a temperature.
///
/// The register is a left-justified 12-bit two's-complement value; the
/// arithmetic shift sign-extends negative temperatures.
pub fn convert(high: u8, low: u8, units: TempUnits) -> f32 {
    let raw = (((u16::from(high) << 8) | u16::from(low)) as i16) >> 4;
    let celsius = f32::from(raw) * LSB_CELSIUS;
    match units {
        TempUnits::Celsius => celsius,
        TempUnits::Fahrenheit => celsius * 1.8 + 32.0,
        TempUnits::Kelvin => celsius + 273.15,
    }
}
