//! Full example code for setting up an ST7565 display. This runs on an STM32F303RE, using a
//! 128x64 ST7565 module connected to SPI1, PA8 for A0, and PA9 for /RES.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate st7565;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use st7565 as lcd;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    let config = lcd::DisplayConfig::new(128, 64).bus_frequency(4_000_000).contrast(0x18);

    // SPI1 is Alternate Function 5 for GPIOs PA5,6,7. The ST7565 only listens, but the HAL wants
    // a MISO pin anyway.
    let lcd_sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let lcd_miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let lcd_mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let lcd_spi = spi::Spi::spi1(
        dp.SPI1,
        (lcd_sck, lcd_miso, lcd_mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleHigh,
            phase: hal_api::spi::Phase::CaptureOnSecondTransition,
        },
        config.bus_frequency_hz().hz(),
        clocks,
        &mut rcc.apb2,
    );

    // PA8 is A0, selecting command or data bytes.
    let lcd_a0 = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // PA9 is /RES. The driver pulses it during bring-up.
    let lcd_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    let mut disp: lcd::Display128x64<_, _> = lcd::Builder::new(config)
        .connect_interface(lcd::SpiInterface::new(lcd_spi, lcd_a0))
        .connect_reset(lcd_rst)
        .init(&mut delay)
        .unwrap();

    // Draw a checkerboard of 8x8 squares into the top page, then show it.
    let mut page = [0u8; 128];
    for (col, byte) in page.iter_mut().enumerate() {
        *byte = if (col / 8) % 2 == 0 { 0xFF } else { 0x00 };
    }
    disp.write(0, 0, &lcd::BufferDescriptor::packed(128, 8), &page)
        .unwrap();
    disp.blanking_off().unwrap();

    loop {
        asm::wfi();
    }
}
