//! ESP32 oneshot ADC source for the analog helpers.

use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::gpio::ADCPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

use crate::traits::AnalogSource;

/// Oneshot ADC channel implementing [`AnalogSource`].
///
/// Uses 11 dB attenuation for the full 0-3.3V range, which is what the
/// resistor-ladder button bank needs.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::adc::oneshot::AdcDriver;
/// use rs_periph::hal::esp32::Esp32Adc;
/// use rs_periph::traits::AnalogSource;
///
/// let peripherals = Peripherals::take()?;
/// let adc1 = AdcDriver::new(peripherals.adc1)?;
/// let mut buttons = Esp32Adc::new(&adc1, peripherals.pins.gpio4)?;
///
/// let raw = buttons.read_raw()?;
/// ```
pub struct Esp32Adc<'d, T: ADCPin> {
    channel: AdcChannelDriver<'d, T, &'d AdcDriver<'d, T::Adc>>,
}

impl<'d, T: ADCPin> Esp32Adc<'d, T> {
    /// Creates an ADC source on the given pin.
    ///
    /// # Errors
    ///
    /// Returns an error if ADC channel initialization fails.
    pub fn new(
        adc: &'d AdcDriver<'d, T::Adc>,
        pin: impl Peripheral<P = T> + 'd,
    ) -> Result<Self, EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        Ok(Self {
            channel: AdcChannelDriver::new(adc, pin, &config)?,
        })
    }
}

impl<T: ADCPin> AnalogSource for Esp32Adc<'_, T> {
    type Error = EspError;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        self.channel.read()
    }
}
