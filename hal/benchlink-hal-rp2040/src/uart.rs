//! UART peripheral access
//!
//! RP2040 has two PL011 UARTs (UART0 and UART1). [`Rp2040Uart`] drives one
//! of them directly through the PAC registers; the interrupt handler and
//! the main loop share it through `&self`.

use benchlink_hal::{DataBits, FrameFormat, Parity, PinError, StopBits, UartHardware};
use embassy_rp::pac;
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::Peri;

/// Highest GPIO number on the RP2040
const MAX_GPIO: u8 = 29;

/// IO_BANK0 function select for UART
const FUNCSEL_UART: u8 = 2;

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Determine which UART can use a given GPIO pin
///
/// RP2040 has specific pin mappings for each UART.
pub fn gpio_to_uart(gpio: u8) -> Option<UartId> {
    // UART0: GPIO 0/1, 12/13, 16/17
    // UART1: GPIO 4/5, 8/9, 20/21, 24/25
    match gpio {
        0 | 1 | 12 | 13 | 16 | 17 => Some(UartId::Uart0),
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Check that `tx`/`rx` are a TX and an RX pin of `id`
fn check_pins(id: UartId, tx: u8, rx: u8) -> Result<(), PinError> {
    if tx > MAX_GPIO || rx > MAX_GPIO {
        return Err(PinError::InvalidPin);
    }
    // TX sits on GPIO 4n, RX on GPIO 4n+1
    if gpio_to_uart(tx) != Some(id) || gpio_to_uart(rx) != Some(id) || tx % 4 != 0 || rx % 4 != 1
    {
        return Err(PinError::WrongFunction);
    }
    Ok(())
}

/// Integer and fractional baud divisors plus the rate they produce
///
/// Returns `None` when the rate is outside what the divider can reach
/// from `clk_hz`.
fn baud_divisors(clk_hz: u32, baudrate: u32) -> Option<(u16, u8, u32)> {
    if clk_hz == 0 || baudrate == 0 {
        return None;
    }

    // Divisor in 1/128 steps
    let div = (8 * u64::from(clk_hz)) / u64::from(baudrate);
    let ibrd = div >> 7;
    if ibrd == 0 || ibrd >= 0xFFFF {
        return None;
    }
    let fbrd = ((div & 0x7F) + 1) / 2;

    let actual = (4 * u64::from(clk_hz)) / (64 * ibrd + fbrd);
    Some((ibrd as u16, fbrd as u8, actual as u32))
}

/// One UART driven through its registers
pub struct Rp2040Uart {
    id: UartId,
    regs: pac::uart::Uart,
}

impl Rp2040Uart {
    pub fn uart0(_uart: Peri<'static, UART0>) -> Self {
        Self {
            id: UartId::Uart0,
            regs: pac::UART0,
        }
    }

    pub fn uart1(_uart: Peri<'static, UART1>) -> Self {
        Self {
            id: UartId::Uart1,
            regs: pac::UART1,
        }
    }

    pub fn id(&self) -> UartId {
        self.id
    }

    fn release_reset(&self) {
        let id = self.id;
        pac::RESETS.reset().modify(|w| match id {
            UartId::Uart0 => w.set_uart0(false),
            UartId::Uart1 => w.set_uart1(false),
        });
        loop {
            let done = pac::RESETS.reset_done().read();
            let ready = match id {
                UartId::Uart0 => done.uart0(),
                UartId::Uart1 => done.uart1(),
            };
            if ready {
                break;
            }
        }
    }
}

impl UartHardware for Rp2040Uart {
    fn enable(&self, baudrate: u32) -> Option<u32> {
        let (ibrd, fbrd, actual) = baud_divisors(embassy_rp::clocks::clk_peri_freq(), baudrate)?;

        self.release_reset();
        self.regs.uartibrd().write(|w| w.set_baud_divint(ibrd));
        self.regs.uartfbrd().write(|w| w.set_baud_divfrac(fbrd));
        // Divisors latch on the next LCR_H write
        self.regs.uartlcr_h().modify(|_| {});

        self.regs.uartcr().write(|w| {
            w.set_uarten(true);
            w.set_txe(true);
            w.set_rxe(true);
        });
        Some(actual)
    }

    fn set_format(&self, format: FrameFormat) {
        let wlen = match format.data_bits {
            DataBits::Five => 0,
            DataBits::Six => 1,
            DataBits::Seven => 2,
            DataBits::Eight => 3,
        };
        self.regs.uartlcr_h().write(|w| {
            w.set_wlen(wlen);
            w.set_fen(true);
            w.set_stp2(format.stop_bits == StopBits::Two);
            w.set_pen(format.parity != Parity::None);
            w.set_eps(format.parity == Parity::Even);
        });
    }

    fn bind_pins(&self, tx_pin: u8, rx_pin: u8) -> Result<(), PinError> {
        check_pins(self.id, tx_pin, rx_pin)?;

        for pin in [tx_pin, rx_pin] {
            pac::PADS_BANK0.gpio(pin as usize).modify(|w| {
                w.set_ie(pin == rx_pin);
                w.set_od(false);
            });
            pac::IO_BANK0
                .gpio(pin as usize)
                .ctrl()
                .write(|w| w.set_funcsel(FUNCSEL_UART));
        }
        Ok(())
    }

    /// Masks RX and RX-timeout at the peripheral only; the NVIC line is
    /// left to the firmware.
    fn set_rx_interrupt(&self, enabled: bool) {
        self.regs.uartimsc().modify(|w| {
            w.set_rxim(enabled);
            w.set_rtim(enabled);
        });
    }

    fn disable(&self) {
        self.regs.uartimsc().write(|_| {});
        self.regs.uartcr().write(|w| w.set_uarten(false));
    }

    fn is_writable(&self) -> bool {
        !self.regs.uartfr().read().txff()
    }

    fn write_byte(&self, byte: u8) {
        self.regs.uartdr().write(|w| w.set_data(byte));
    }

    fn is_readable(&self) -> bool {
        !self.regs.uartfr().read().rxfe()
    }

    fn read_byte(&self) -> u8 {
        self.regs.uartdr().read().data()
    }

    fn is_tx_idle(&self) -> bool {
        !self.regs.uartfr().read().busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_to_uart() {
        assert_eq!(gpio_to_uart(0), Some(UartId::Uart0));
        assert_eq!(gpio_to_uart(5), Some(UartId::Uart1));
        assert_eq!(gpio_to_uart(2), None);
    }

    #[test]
    fn test_check_pins() {
        assert_eq!(check_pins(UartId::Uart0, 0, 1), Ok(()));
        assert_eq!(check_pins(UartId::Uart1, 4, 5), Ok(()));
        assert_eq!(check_pins(UartId::Uart0, 4, 5), Err(PinError::WrongFunction));
        assert_eq!(check_pins(UartId::Uart0, 1, 0), Err(PinError::WrongFunction));
        assert_eq!(check_pins(UartId::Uart0, 30, 1), Err(PinError::InvalidPin));
    }

    #[test]
    fn test_baud_divisors() {
        // 125 MHz peripheral clock
        let (ibrd, fbrd, actual) = baud_divisors(125_000_000, 115_200).unwrap();
        assert_eq!((ibrd, fbrd), (67, 52));
        assert_eq!(actual, 115_207);

        assert!(baud_divisors(125_000_000, 0).is_none());
        assert!(baud_divisors(125_000_000, 100_000_000).is_none());
    }
}
