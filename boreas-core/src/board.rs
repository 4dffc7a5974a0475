//! Peripheral bundle a target board provides
//!
//! One associated type per peripheral the firmware touches. A chip HAL
//! implements this over its register blocks; the host test harness
//! implements it over scripted mocks.

use boreas_hal::irq::IrqMask;
use boreas_hal::nvm::Eeprom;
use boreas_hal::pwm::{FanPwm, TachCapture};
use boreas_hal::twi::{TwiMasterRegs, TwiSlaveRegs};
use boreas_hal::uart::UartRegs;

pub trait Board {
    type Twi: TwiMasterRegs + TwiSlaveRegs;
    type Irq: IrqMask + Clone;
    type Nvm: Eeprom;
    type Uart: UartRegs;
    type Pwm: FanPwm;
    type Tach: TachCapture;
}
