//! Firmware top level
//!
//! [`System`] owns every subsystem and wires them together: the boot
//! sequence, the foreground loop ticks, and the thin interrupt entry
//! points the target's vector shims forward into. The firmware binary
//! for a real board reduces to constructing a `System` over its
//! [`Board`] impl and calling the ticks forever.

use core::fmt::Write;

use boreas_hal::twi::TwiConfig;
use boreas_protocol::{CommandId, CommandPacket, PacketError, HEADER_SIZE};

use crate::board::Board;
use crate::bus::{TwiBus, SLAVE_BUFFER_CAPACITY};
use crate::console::{Console, RX_CAPACITY};
use crate::error::Error;
use crate::fan::{FanBank, Speed};
use crate::shell::{self, Command, Event, LineEditor, LINE_CAPACITY};
use crate::store::Store;

/// Console baud rate
pub const CONSOLE_BAUD: u32 = 9600;

/// Foreground ticks between polls of the slave receive buffer
const REMOTE_POLL_TICKS: u32 = 10_000;

/// The assembled firmware
pub struct System<B: Board> {
    pub(crate) bus: TwiBus<B::Twi, B::Irq>,
    pub(crate) console: Console<B::Uart, B::Irq>,
    pub(crate) store: Store<B::Nvm>,
    pub(crate) fans: FanBank<B::Pwm, B::Tach>,
    shell: LineEditor,
    discarding: bool,
    remote_ticks: u32,
    clock_hz: u32,
}

impl<B: Board + 'static> System<B> {
    pub fn new(
        twi: B::Twi,
        uart: B::Uart,
        nvm: B::Nvm,
        pwm: B::Pwm,
        tach: B::Tach,
        irq: B::Irq,
        clock_hz: u32,
    ) -> Self {
        Self {
            bus: TwiBus::new(twi, irq.clone(), clock_hz),
            console: Console::new(uart, irq),
            store: Store::new(nvm),
            fans: FanBank::new(pwm, tach),
            shell: LineEditor::new(),
            discarding: false,
            remote_ticks: 0,
            clock_hz,
        }
    }

    /// One-time bring-up, in dependency order: configuration first so
    /// the bus comes up on the persisted slave address
    pub fn boot(&mut self) {
        self.store.load();
        self.console.init(self.clock_hz, CONSOLE_BAUD);
        self.fans.init();
        self.bus
            .init_master(TwiConfig::STANDARD.frequency, TwiConfig::STANDARD.mode);
        self.bus.init_slave(self.store.twi_slave_addr());
    }

    // Interrupt entry points, forwarded from the target's vector shims.

    pub fn on_twi_slave_interrupt(&mut self) {
        self.bus.on_slave_interrupt();
    }

    pub fn on_console_rx(&mut self, byte: u8) {
        self.console.on_rx_interrupt(byte);
    }

    pub fn on_tach_capture(&mut self, pulse: u16) {
        self.fans.on_capture(pulse);
    }

    // Foreground loop ticks.

    /// Feed pending console input through the line editor and run any
    /// completed command line
    pub fn shell_tick(&mut self) {
        let mut buf = [0u8; RX_CAPACITY];
        let count = self.console.read(&mut buf);

        for &byte in &buf[..count] {
            if self.discarding {
                if byte == shell::TERMINATOR {
                    self.discarding = false;
                }
                continue;
            }

            match self.shell.feed(byte) {
                Event::Echo(0) => {}
                Event::Echo(echo) => self.console.write(&[echo]),
                Event::Overflow => {
                    // Swallow the rest of the runaway line
                    self.discarding = true;
                    let _ = write!(self.console, "\r\nLine too long\r\n");
                }
                Event::Line => {
                    self.console.write(b"\r\n");
                    self.run_line();
                }
            }
        }
    }

    fn run_line(&mut self) {
        let mut line = [0u8; LINE_CAPACITY];
        let len = self.shell.line().len();
        line[..len].copy_from_slice(self.shell.line());
        self.shell.clear();

        let Ok(text) = core::str::from_utf8(&line[..len]) else {
            return;
        };
        let args = shell::split_args(text);

        if let Err(err) = shell::dispatch(Self::COMMANDS, self, &args) {
            let name = args.first().copied().unwrap_or("");
            let _ = write!(self.console, "{}: {}\r\n", name, err.as_str());
        }
    }

    /// Poll the slave receive buffer for a command packet from a peer
    pub fn remote_tick(&mut self) {
        self.remote_ticks += 1;
        if self.remote_ticks < REMOTE_POLL_TICKS {
            return;
        }
        self.remote_ticks = 0;

        let mut buf = [0u8; SLAVE_BUFFER_CAPACITY];
        let count = self.bus.slave_drain(&mut buf);
        if count < HEADER_SIZE {
            return;
        }

        match CommandPacket::parse(&buf[..count]) {
            Ok(packet) => self.run_remote(&packet),
            Err(PacketError::UnknownCommand(id)) => {
                let _ = write!(self.console, "Dropped unknown bus command {}\r\n", id);
            }
            Err(_) => {}
        }
    }

    fn run_remote(&mut self, packet: &CommandPacket) {
        match packet.command {
            CommandId::Hello => {
                let _ = self.bus.slave_enqueue(b"hey");
            }
            CommandId::Report => {
                // Fan RPMs, one u16 per channel
                for fan in 0..boreas_hal::pwm::FAN_CHANNELS {
                    let rpm = self.fans.rpm(fan).min(u16::MAX as u32) as u16;
                    let _ = self.bus.slave_enqueue(&rpm.to_le_bytes());
                }
            }
        }
    }

    /// Advance the tach input rotation
    pub fn fan_tick(&mut self) {
        self.fans.tick();
    }

    // Shell command table and handlers.

    const COMMANDS: &'static [Command<Self>] = &[
        Command {
            name: "hello",
            usage: "[name]",
            help: "print a greeting",
            run: Self::cmd_hello,
        },
        Command {
            name: "addr",
            usage: "[addr]",
            help: "get or set our bus slave address",
            run: Self::cmd_addr,
        },
        Command {
            name: "taddr",
            usage: "[addr]",
            help: "get or set the temperature peer address",
            run: Self::cmd_taddr,
        },
        Command {
            name: "temp",
            usage: "",
            help: "read the temperature peer",
            run: Self::cmd_temp,
        },
        Command {
            name: "fan",
            usage: "<fan> [off|low|medium|max]",
            help: "get or set a fan speed",
            run: Self::cmd_fan,
        },
        Command {
            name: "help",
            usage: "",
            help: "list commands",
            run: Self::cmd_help,
        },
    ];

    fn cmd_hello(&mut self, args: &[&str]) -> Result<(), Error> {
        let name = args.get(1).copied().unwrap_or("world");
        let _ = write!(self.console, "Hello {}\r\n", name);
        Ok(())
    }

    fn cmd_addr(&mut self, args: &[&str]) -> Result<(), Error> {
        match args.get(1) {
            None => {
                let _ = write!(self.console, "{}\r\n", self.store.twi_slave_addr());
            }
            Some(arg) => {
                let addr = parse_addr(arg)?;
                self.store.set_twi_slave_addr(addr);
                self.bus.set_slave_address(addr);
            }
        }
        Ok(())
    }

    fn cmd_taddr(&mut self, args: &[&str]) -> Result<(), Error> {
        match args.get(1) {
            None => {
                let _ = write!(self.console, "{}\r\n", self.store.twi_temp_addr());
            }
            Some(arg) => {
                self.store.set_twi_temp_addr(parse_addr(arg)?);
            }
        }
        Ok(())
    }

    fn cmd_temp(&mut self, _args: &[&str]) -> Result<(), Error> {
        let mut reading = [0u8; 4];
        let count = self
            .bus
            .master_recv(self.store.twi_temp_addr(), &mut reading)?;
        if count != reading.len() {
            return Err(Error::Io);
        }

        let millicelsius = i32::from_le_bytes(reading);
        let _ = write!(self.console, "Temperature: {}mC\r\n", millicelsius);
        Ok(())
    }

    fn cmd_fan(&mut self, args: &[&str]) -> Result<(), Error> {
        let fan: usize = args
            .get(1)
            .and_then(|arg| arg.parse().ok())
            .ok_or(Error::InvalidArgument)?;

        match args.get(2) {
            None => {
                let speed = self.fans.speed(fan).ok_or(Error::InvalidArgument)?;
                let _ = write!(
                    self.console,
                    "{}: {} rpm\r\n",
                    speed.name(),
                    self.fans.rpm(fan)
                );
                if let Some(alert) = self.fans.check_speed(fan) {
                    let _ = write!(
                        self.console,
                        "warning: {} rpm, expected {}\r\n",
                        alert.rpm, alert.expected
                    );
                }
            }
            Some(name) => {
                let speed = Speed::from_name(name).ok_or(Error::InvalidArgument)?;
                self.fans.set_speed(fan, speed)?;
            }
        }
        Ok(())
    }

    fn cmd_help(&mut self, _args: &[&str]) -> Result<(), Error> {
        for cmd in Self::COMMANDS {
            let _ = write!(self.console, "\t{} {} - {}\r\n", cmd.name, cmd.usage, cmd.help);
        }
        Ok(())
    }
}

fn parse_addr(arg: &str) -> Result<u8, Error> {
    arg.parse().map_err(|_| Error::InvalidArgument)
}
