//! ESP32 quadrature encoder wiring: ISR-safe pin sampling and edge
//! interrupt management.
//!
//! The split between [`Esp32QuadPins`] and [`Esp32EdgeSource`] exists
//! because the encoder core owns the sampling handle while the interrupt
//! subscription needs mutable access to the pin drivers. The edge source
//! keeps the drivers; the quad pins it hands out only carry the GPIO
//! numbers and read levels straight from the register, which is the only
//! kind of read safe to do inside the interrupt handler.
//!
//! # Wiring
//!
//! Industrial A/B/Z encoders with NPN open-collector outputs idle high
//! through the internal pull-ups and pull low when active. Configure the
//! pins with [`PinSetup::open_collector`](crate::pins::PinSetup) so the
//! core translates polarity.

use esp_idf_hal::gpio::{Input, InputPin, InterruptType, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

use crate::encoder::Encoder;
use crate::pins::{PinSetup, Pull};
use crate::traits::{InterruptControl, QuadratureInput};

fn idf_pull(pull: Pull) -> esp_idf_hal::gpio::Pull {
    match pull {
        Pull::None => esp_idf_hal::gpio::Pull::Floating,
        Pull::Up => esp_idf_hal::gpio::Pull::Up,
        Pull::Down => esp_idf_hal::gpio::Pull::Down,
    }
}

/// Register-level sampling handle for the A/B/Z pins.
///
/// Copyable and free of driver state; reads go through `gpio_get_level`,
/// which is safe from interrupt context.
#[derive(Clone, Copy)]
pub struct Esp32QuadPins {
    a: i32,
    b: i32,
    z: Option<i32>,
}

impl QuadratureInput for Esp32QuadPins {
    #[inline]
    fn read_a(&self) -> bool {
        unsafe { esp_idf_hal::sys::gpio_get_level(self.a) != 0 }
    }

    #[inline]
    fn read_b(&self) -> bool {
        unsafe { esp_idf_hal::sys::gpio_get_level(self.b) != 0 }
    }

    #[inline]
    fn read_z(&self) -> Option<bool> {
        self.z
            .map(|num| unsafe { esp_idf_hal::sys::gpio_get_level(num) != 0 })
    }
}

/// Owns the A/B pin drivers and their edge interrupt subscriptions.
///
/// # Example
///
/// ```ignore
/// use rs_periph::config::EncoderConfig;
/// use rs_periph::encoder::Encoder;
/// use rs_periph::hal::esp32::Esp32EdgeSource;
/// use rs_periph::traits::InterruptControl;
///
/// let peripherals = Peripherals::take()?;
/// let config = EncoderConfig::default();
/// let mut edges = Esp32EdgeSource::new(
///     peripherals.pins.gpio6,
///     peripherals.pins.gpio7,
///     &config,
/// )?;
///
/// let encoder: &'static _ =
///     Box::leak(Box::new(Encoder::new(edges.quad_pins(Some(10)), &config)));
/// edges.attach(encoder)?;
/// edges.enable_interrupt()?;
/// ```
pub struct Esp32EdgeSource<'d, A, B>
where
    A: InputPin + OutputPin,
    B: InputPin + OutputPin,
{
    a: PinDriver<'d, A, Input>,
    b: PinDriver<'d, B, Input>,
}

impl<'d, A, B> Esp32EdgeSource<'d, A, B>
where
    A: InputPin + OutputPin,
    B: InputPin + OutputPin,
{
    /// Configures the A and B pins per the encoder config (pulls from the
    /// pin setups, any-edge interrupts).
    pub fn new(
        a_pin: impl Peripheral<P = A> + 'd,
        b_pin: impl Peripheral<P = B> + 'd,
        config: &crate::config::EncoderConfig,
    ) -> Result<Self, EspError> {
        let mut a = PinDriver::input(a_pin)?;
        let mut b = PinDriver::input(b_pin)?;

        a.set_pull(idf_pull(config.pin_a.pull))?;
        b.set_pull(idf_pull(config.pin_b.pull))?;

        // Both edges of both channels feed the decoder table.
        a.set_interrupt_type(InterruptType::AnyEdge)?;
        b.set_interrupt_type(InterruptType::AnyEdge)?;

        Ok(Self { a, b })
    }

    /// Sampling handle for the encoder core. `z_gpio` is the raw GPIO
    /// number of the Z pin, if one is wired (configure its pull separately
    /// with [`configure_z_pin`]).
    pub fn quad_pins(&self, z_gpio: Option<i32>) -> Esp32QuadPins {
        Esp32QuadPins {
            a: self.a.pin(),
            b: self.b.pin(),
            z: z_gpio,
        }
    }

    /// Subscribes both channels' interrupts to the encoder's edge handler.
    ///
    /// The callbacks run in interrupt context; the encoder's edge handler
    /// is built for that (bounded work under a critical section). The
    /// encoder must be `'static` because the ISR can outlive any stack
    /// frame; leak it with `Box::leak` at startup.
    ///
    /// esp-idf disarms a pin interrupt each time its handler fires, so the
    /// callback re-arms its own pin before returning. Missing even one
    /// edge would surface as a both-bits-changed code the decoder drops,
    /// silently corrupting the count.
    pub fn attach(&mut self, encoder: &'static Encoder<Esp32QuadPins>) -> Result<(), EspError> {
        let a_num = self.a.pin();
        let b_num = self.b.pin();
        let on_a = move || {
            encoder.on_edge();
            let _ = unsafe { esp_idf_hal::sys::gpio_intr_enable(a_num) };
        };
        let on_b = move || {
            encoder.on_edge();
            let _ = unsafe { esp_idf_hal::sys::gpio_intr_enable(b_num) };
        };
        unsafe {
            self.a.subscribe(on_a)?;
            self.b.subscribe(on_b)?;
        }
        Ok(())
    }
}

/// Configures the Z pin's pull per its setup and releases the driver,
/// leaving the pin readable by GPIO number (pass it to
/// [`Esp32EdgeSource::quad_pins`]).
pub fn configure_z_pin<'d, Z: InputPin + OutputPin>(
    z_pin: impl Peripheral<P = Z> + 'd,
    setup: PinSetup,
) -> Result<i32, EspError> {
    let mut z = PinDriver::input(z_pin)?;
    z.set_pull(idf_pull(setup.pull))?;
    let num = z.pin();
    core::mem::forget(z); // keep the configuration, drop the handle
    Ok(num)
}

impl<A, B> InterruptControl for Esp32EdgeSource<'_, A, B>
where
    A: InputPin + OutputPin,
    B: InputPin + OutputPin,
{
    type Error = EspError;

    fn enable_interrupt(&mut self) -> Result<(), Self::Error> {
        self.a.enable_interrupt()?;
        self.b.enable_interrupt()?;
        Ok(())
    }

    fn disable_interrupt(&mut self) -> Result<(), Self::Error> {
        self.a.disable_interrupt()?;
        self.b.disable_interrupt()?;
        Ok(())
    }
}
