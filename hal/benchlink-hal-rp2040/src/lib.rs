//! RP2040-specific HAL for the benchlink rig
//!
//! Implements the shared `benchlink-hal` traits on the RP2040 (Pico W):
//!
//! - UART register access (implements `benchlink_hal::UartHardware`)
//! - UART pin-function table
//! - Monotonic clock over `embassy-time` (implements `benchlink_hal::Clock`)
//!
//! The CYW43 radio driver lives in the firmware, which adapts it to
//! `benchlink_hal::Radio`.
//!
//! # Interrupt wiring
//!
//! [`Rp2040Uart`] only sets the peripheral's own interrupt mask (UARTIMSC).
//! The firmware must unmask `UART0_IRQ`/`UART1_IRQ` in the NVIC and route
//! each handler to `SerialBus::on_interrupt` (or
//! `SerialTransport::on_rx_interrupt`) for the matching port. Until then
//! received bytes stay in the 32-byte hardware FIFO and are only picked up
//! by blocking reads.

#![no_std]

pub mod time;
pub mod uart;

pub use time::EmbassyClock;
pub use uart::{gpio_to_uart, Rp2040Uart, UartId};
