// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Hardware exerciser: round-trips mode, level and pull settings on one
//! GPIO, then measures raw register-write throughput with a toggle loop.
//! Run as root on the target board, on a pin with nothing wired to it.

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use mmap_gpio::{DeviceMode, Error, MmapGpio, PullMode, Soc};

const TOGGLE_ITERATIONS: u32 = 4_000_000;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let (Some(soc_name), Some(gpio_arg)) = (args.next(), args.next()) else {
        eprintln!("usage: gpio-bench <soc> <gpio>");
        eprintln!("socs: bcm283x bcm2711 h6 r8 rk3588 rk3288");
        return ExitCode::FAILURE;
    };
    let Some(soc) = parse_soc(&soc_name) else {
        eprintln!("unknown SoC {soc_name:?}");
        return ExitCode::FAILURE;
    };
    let Ok(gpio) = gpio_arg.parse::<u16>() else {
        eprintln!("not a GPIO number: {gpio_arg:?}");
        return ExitCode::FAILURE;
    };

    match run(soc, gpio) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gpio-bench: {err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_soc(name: &str) -> Option<Soc> {
    match name {
        "bcm283x" => Some(Soc::Bcm283x),
        "bcm2711" => Some(Soc::Bcm2711),
        "h6" => Some(Soc::AllwinnerH6),
        "r8" => Some(Soc::AllwinnerR8),
        "rk3588" => Some(Soc::Rk3588),
        "rk3288" => Some(Soc::Rk3288),
        _ => None,
    }
}

fn run(soc: Soc, gpio: u16) -> Result<(), Error> {
    let mut controller = soc.controller();
    controller.initialise()?;

    let start_mode = controller.mode(gpio)?;
    let start_level = controller.read(gpio)?;
    println!("gpio {gpio}: mode {start_mode}, level {start_level}");

    controller.set_mode(gpio, DeviceMode::DigitalOutput)?;
    report_mode(&controller, gpio, DeviceMode::DigitalOutput)?;
    for level in [true, false] {
        controller.write(gpio, level)?;
        let read_back = controller.read(gpio)?;
        println!("wrote {level}, read {read_back}");
    }

    controller.set_mode(gpio, DeviceMode::DigitalInput)?;
    report_mode(&controller, gpio, DeviceMode::DigitalInput)?;
    for pull in [PullMode::PullDown, PullMode::PullUp, PullMode::None] {
        controller.set_pull_up_down(gpio, pull)?;
        match controller.pull_up_down(gpio)? {
            Some(read_back) => println!("pull {pull}: reads back {read_back}"),
            None => println!("pull {pull}: level now {}", controller.read(gpio)?),
        }
    }

    controller.set_mode(gpio, DeviceMode::DigitalOutput)?;
    let start = Instant::now();
    for _ in 0..TOGGLE_ITERATIONS {
        controller.write(gpio, true)?;
        controller.write(gpio, false)?;
    }
    let elapsed = start.elapsed();
    let frequency = f64::from(TOGGLE_ITERATIONS) / elapsed.as_secs_f64();
    println!(
        "{TOGGLE_ITERATIONS} toggles in {:.3} s: {frequency:.0} Hz",
        elapsed.as_secs_f64()
    );

    // Hand the pin back the way we found it.
    if start_mode != DeviceMode::Unknown {
        controller.set_mode(gpio, start_mode)?;
        if start_mode == DeviceMode::DigitalOutput {
            controller.write(gpio, start_level)?;
        }
    }
    controller.close();
    Ok(())
}

fn report_mode(controller: &MmapGpio, gpio: u16, wanted: DeviceMode) -> Result<(), Error> {
    let got = controller.mode(gpio)?;
    if got == wanted {
        println!("gpio {gpio} now {got}");
    } else {
        println!("gpio {gpio}: asked for {wanted}, hardware reports {got}");
    }
    Ok(())
}
