use crate::common::{Rotation, TouchSample};
use crate::display::Display;
use crate::display_driver::Epd2in13v4;
pub use crate::error::{EpdResult, Error};
use crate::touch::Touch;
use crate::touch_driver::TouchDriver;
use crossbeam_channel::Receiver;
use linux_embedded_hal::{
    CdevPin, Delay, I2cdev, SpidevBus,
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
};
use log::info;

const DEFAULT_SPI_BUS_PATH: &str = "/dev/spidev0.0";
const DEFAULT_SPI_MAX_SPEED_HZ: u32 = 20_000_000;
const DEFAULT_GPIO_CHIP_PATH: &str = "/dev/gpiochip0";
const DEFAULT_I2C_BUS_PATH: &str = "/dev/i2c-1";

/// Wiring of the Waveshare HAT. Every field falls back to the HAT's
/// documented default when left `None`.
#[derive(Default)]
pub struct DeviceConfig {
    pub spi_bus_path: Option<String>,
    pub spi_options: Option<SpidevOptions>,
    pub gpio_chip_path: Option<String>,
    pub busy_pin: Option<u32>,
    pub dc_pin: Option<u32>,
    pub rst_pin: Option<u32>,
    pub i2c_bus_path: Option<String>,
    pub touch_rst_pin: Option<u32>,
    pub touch_int_pin: Option<u32>,
    pub rotation: Option<Rotation>,
}

fn output_pin(chip: &mut Chip, offset: u32, consumer: &str) -> EpdResult<CdevPin> {
    let handle = chip
        .get_line(offset)?
        .request(LineRequestFlags::OUTPUT, 0, consumer)?;
    Ok(CdevPin::new(handle)?)
}

fn input_pin(chip: &mut Chip, offset: u32, consumer: &str) -> EpdResult<CdevPin> {
    let handle = chip
        .get_line(offset)?
        .request(LineRequestFlags::INPUT, 0, consumer)?;
    Ok(CdevPin::new(handle)?)
}

/// Panel plus touch controller.
pub struct Device {
    pub display: Display,
    pub touch: Touch,
}

impl Device {
    /// Bring up the panel and the touch controller. Touch samples are
    /// delivered on the returned channel.
    pub fn new(config: DeviceConfig) -> EpdResult<(Self, Receiver<TouchSample>)> {
        let rotation = config.rotation.unwrap_or(Rotation::Deg90);
        let spi_options = config.spi_options.unwrap_or_else(|| {
            SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(DEFAULT_SPI_MAX_SPEED_HZ)
                .mode(SpiModeFlags::SPI_MODE_0)
                .build()
        });

        info!("Initializing EPD device...");

        let mut spi = SpidevBus::open(
            config
                .spi_bus_path
                .as_deref()
                .unwrap_or(DEFAULT_SPI_BUS_PATH),
        )?;
        spi.configure(&spi_options)?;

        let mut chip = Chip::new(
            config
                .gpio_chip_path
                .as_deref()
                .unwrap_or(DEFAULT_GPIO_CHIP_PATH),
        )?;
        let busy = input_pin(&mut chip, config.busy_pin.unwrap_or(24), "epd-busy")?;
        let dc = output_pin(&mut chip, config.dc_pin.unwrap_or(25), "epd-dc")?;
        let rst = output_pin(&mut chip, config.rst_pin.unwrap_or(17), "epd-rst")?;

        let driver = Epd2in13v4::new(spi, busy, dc, rst, Delay {})?;
        let display = Display::new(driver, rotation);

        let i2c = I2cdev::new(
            config
                .i2c_bus_path
                .as_deref()
                .unwrap_or(DEFAULT_I2C_BUS_PATH),
        )?;
        let touch_rst = output_pin(&mut chip, config.touch_rst_pin.unwrap_or(22), "touch-rst")?;
        let touch_int = chip.get_line(config.touch_int_pin.unwrap_or(27))?;
        let (touch, samples) = Touch::new(TouchDriver::new(i2c, touch_rst)?, touch_int, rotation)?;

        Ok((Self { display, touch }, samples))
    }

    /// Put both controllers into their lowest power state.
    pub fn sleep(&mut self) -> EpdResult<()> {
        self.touch.sleep()?;
        self.display.sleep()
    }
}
