//! GPS + IMU acquisition firmware for the Raspberry Pi Pico 2 W
//!
//! Wiring:
//! - GPS receiver on UART0 (GP0 = TX, GP1 = RX), 9600 baud
//! - Telemetry relay on UART1 (GP4 = TX, GP5 = RX), 38400 baud
//! - MPU6050 on I2C0 (GP16 = SDA, GP17 = SCL), 400 kHz
//!
//! Both samplers share the relay link and pace themselves; the main loop
//! only polls.

#![no_std]
#![no_main]

use core::cell::RefCell;

use rp235x_hal as hal;
use {defmt_rtt as _, panic_probe as _};

use hal::clocks::init_clocks_and_plls;
use hal::fugit::RateExtU32;
use hal::gpio::{FunctionI2C, Pin, PullUp};
use hal::uart::{DataBits, StopBits, UartConfig as HalUartConfig, UartPeripheral};
use hal::Clock;

use pico_track::devices::gps::GpsDriver;
use pico_track::devices::imu::{CalibrationOffsets, Mpu6050Driver};
use pico_track::platform::rp2350::{Rp2350I2c, Rp2350Timer, Rp2350Uart};
use pico_track::platform::traits::{I2cConfig, UartConfig};
use pico_track::sampling::{GpsSampler, ImuSampler, PollingRate};
use pico_track::telemetry::{SerialTelemetry, SharedSink};

/// Tell the boot ROM this is a secure Arm executable
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

/// External crystal frequency of the Pico 2 W board
const XTAL_FREQ_HZ: u32 = 12_000_000;

/// Bench calibration of the deployed sensor board
const IMU_OFFSETS: CalibrationOffsets = CalibrationOffsets {
    ax: 175,
    ay: 0,
    az: -670,
    temp: 0,
    rx: -400,
    ry: -370,
    rz: 20,
};

#[hal::entry]
fn main() -> ! {
    let mut pac = hal::pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    let clocks = init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(pac.IO_BANK0, pac.PADS_BANK0, sio.gpio_bank0, &mut pac.RESETS);
    let timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);

    let gps_uart_pins = (pins.gpio0.into_function(), pins.gpio1.into_function());
    let gps_uart = UartPeripheral::new(pac.UART0, gps_uart_pins, &mut pac.RESETS)
        .enable(
            HalUartConfig::new(9600.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap();

    let telemetry_uart_pins = (pins.gpio4.into_function(), pins.gpio5.into_function());
    let telemetry_uart = UartPeripheral::new(pac.UART1, telemetry_uart_pins, &mut pac.RESETS)
        .enable(
            HalUartConfig::new(38_400.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap();

    let sda_pin: Pin<_, FunctionI2C, PullUp> = pins.gpio16.reconfigure();
    let scl_pin: Pin<_, FunctionI2C, PullUp> = pins.gpio17.reconfigure();
    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda_pin,
        scl_pin,
        400.kHz(),
        &mut pac.RESETS,
        &clocks.system_clock,
    );

    let telemetry = RefCell::new(SerialTelemetry::new(Rp2350Uart::new(
        telemetry_uart,
        UartConfig::telemetry(),
    )));

    let mut gps = GpsSampler::new(
        GpsDriver::new(Rp2350Uart::new(gps_uart, UartConfig::gps())),
        SharedSink::new(&telemetry),
        Rp2350Timer::new(timer),
        PollingRate::Rate5Hz,
    );

    let mut imu = ImuSampler::new(
        Mpu6050Driver::new(Rp2350I2c::new(i2c, I2cConfig::default()), IMU_OFFSETS),
        SharedSink::new(&telemetry),
        Rp2350Timer::new(timer),
        PollingRate::Rate5Hz,
    );

    pico_track::log_info!("pico_track up, polling GPS and IMU");

    gps.start();
    if imu.start().is_err() {
        // GPS keeps running; the IMU stays silent until a power cycle
        pico_track::log_error!("IMU bring-up failed");
    }

    loop {
        gps.poll();
        let _ = imu.poll();
    }
}
