//! # Linux sysfs GPIO backend.
//!
//! ```text
//! <root>/export              ← write pin number to expose it
//! <root>/gpio<N>/direction   ← "in" | "out"
//! <root>/gpio<N>/value       ← "0" | "1"
//! ```
//!
//! Buttons are wired active-low: a pin reading `0` is pressed. They are polled
//! at a fixed interval and a press is published once, on the released → pressed
//! edge. The panel backlight is a plain output pin.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::{ButtonSource, Display};
use crate::error::AdapterError;
use crate::events::{Button, Event, MailboxSender};
use crate::ui::Frame;

/// Pins and sysfs location of the hardware backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpioConfig {
    /// Sysfs GPIO class directory.
    pub root: PathBuf,
    /// Select button (button 0).
    pub select_pin: u32,
    /// Next button (button 1).
    pub next_pin: u32,
    /// Display backlight.
    pub backlight_pin: u32,
    /// Button sampling period.
    pub poll_interval: Duration,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/sys/class/gpio"),
            select_pin: 23,
            next_pin: 24,
            backlight_pin: 22,
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Minimal sysfs GPIO accessor.
#[derive(Clone, Debug)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pin_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    fn value_path(&self, pin: u32) -> PathBuf {
        self.pin_dir(pin).join("value")
    }

    /// Exposes `pin` unless it is already exported.
    pub fn export(&self, pin: u32) -> io::Result<()> {
        if self.pin_dir(pin).exists() {
            return Ok(());
        }
        std::fs::write(self.root.join("export"), pin.to_string())
    }

    /// Sets the pin direction (`"in"` or `"out"`).
    pub fn set_direction(&self, pin: u32, direction: &str) -> io::Result<()> {
        std::fs::write(self.pin_dir(pin).join("direction"), direction)
    }

    /// Drives an output pin.
    pub fn write(&self, pin: u32, high: bool) -> io::Result<()> {
        std::fs::write(self.value_path(pin), if high { "1" } else { "0" })
    }

    /// Samples an input pin. Returns `true` when the line is high.
    pub async fn read(&self, pin: u32) -> io::Result<bool> {
        let raw = tokio::fs::read_to_string(self.value_path(pin)).await?;
        Ok(raw.trim() != "0")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Backlight-controlled panel.
///
/// Frames are not rasterized here; they are accepted and traced.
pub struct GpioDisplay {
    gpio: SysfsGpio,
    backlight_pin: u32,
}

impl GpioDisplay {
    pub fn new(cfg: &GpioConfig) -> Self {
        Self {
            gpio: SysfsGpio::new(&cfg.root),
            backlight_pin: cfg.backlight_pin,
        }
    }
}

impl Display for GpioDisplay {
    fn power_on(&mut self) -> Result<(), AdapterError> {
        let pin = self.backlight_pin;
        self.gpio.export(pin).map_err(AdapterError::PowerOn)?;
        self.gpio.set_direction(pin, "out").map_err(AdapterError::PowerOn)?;
        self.gpio.write(pin, true).map_err(AdapterError::PowerOn)?;
        info!(pin, "backlight on");
        Ok(())
    }

    fn render(&mut self, frame: &Frame) -> Result<(), AdapterError> {
        trace!(commands = frame.commands().len(), "frame");
        Ok(())
    }

    fn power_off(&mut self) {
        match self.gpio.write(self.backlight_pin, false) {
            Ok(()) => info!(pin = self.backlight_pin, "backlight off"),
            Err(e) => warn!(pin = self.backlight_pin, error = %e, "cannot switch backlight off"),
        }
    }
}

/// Active-low push buttons sampled over sysfs.
pub struct GpioButtons {
    gpio: SysfsGpio,
    pins: [(Button, u32); 2],
    poll_interval: Duration,
}

impl GpioButtons {
    pub fn new(cfg: &GpioConfig) -> Self {
        Self {
            gpio: SysfsGpio::new(&cfg.root),
            pins: [(Button::Select, cfg.select_pin), (Button::Next, cfg.next_pin)],
            poll_interval: cfg.poll_interval,
        }
    }

    fn setup(&self) -> io::Result<()> {
        for (_, pin) in self.pins {
            self.gpio.export(pin)?;
            self.gpio.set_direction(pin, "in")?;
        }
        Ok(())
    }
}

#[async_trait]
impl ButtonSource for GpioButtons {
    async fn run(self: Box<Self>, mailbox: MailboxSender, token: CancellationToken) -> Result<(), AdapterError> {
        self.setup().map_err(AdapterError::Input)?;
        debug!(root = %self.gpio.root().display(), "polling buttons");

        let mut pressed = [false; 2];
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                _ = ticker.tick() => {}
            }

            for (slot, (button, pin)) in self.pins.iter().enumerate() {
                let high = self.gpio.read(*pin).await.map_err(AdapterError::Input)?;
                let now = !high;
                if now && !pressed[slot] {
                    debug!(%button, id = button.id(), pin, "pressed");
                    if !mailbox.put(Event::ButtonPressed(*button)) {
                        return Ok(());
                    }
                }
                pressed[slot] = now;
            }
        }
    }

    fn name(&self) -> &'static str {
        "gpio"
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::events::mailbox;

    fn fake_sysfs(pins: &[u32]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for pin in pins {
            let pin_dir = dir.path().join(format!("gpio{pin}"));
            fs::create_dir(&pin_dir).unwrap();
            fs::write(pin_dir.join("direction"), "in").unwrap();
            fs::write(pin_dir.join("value"), "1").unwrap();
        }
        dir
    }

    fn config(root: &Path) -> GpioConfig {
        GpioConfig {
            root: root.to_path_buf(),
            poll_interval: Duration::from_millis(5),
            ..GpioConfig::default()
        }
    }

    #[test]
    fn export_skips_already_exported_pins() {
        let dir = fake_sysfs(&[23]);
        let gpio = SysfsGpio::new(dir.path());

        gpio.export(23).unwrap();
        assert!(!dir.path().join("export").exists());

        gpio.export(17).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("export")).unwrap(), "17");
    }

    #[test]
    fn backlight_follows_power() {
        let dir = fake_sysfs(&[22]);
        let mut display = GpioDisplay::new(&config(dir.path()));
        let value = dir.path().join("gpio22/value");

        display.power_on().unwrap();
        assert_eq!(fs::read_to_string(&value).unwrap(), "1");
        assert_eq!(fs::read_to_string(dir.path().join("gpio22/direction")).unwrap(), "out");
        display.render(&Frame::default()).unwrap();

        display.power_off();
        assert_eq!(fs::read_to_string(&value).unwrap(), "0");
    }

    #[test]
    fn missing_sysfs_fails_power_on() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = GpioDisplay::new(&config(&dir.path().join("absent")));
        let err = display.power_on().unwrap_err();
        assert_eq!(err.as_label(), "display_power_on");
    }

    #[tokio::test]
    async fn one_event_per_press() {
        let dir = fake_sysfs(&[23, 24]);
        let buttons = Box::new(GpioButtons::new(&config(dir.path())));
        let (tx, mut rx) = mailbox();
        let token = CancellationToken::new();
        let task = tokio::spawn(buttons.run(tx, token.clone()));

        let next = dir.path().join("gpio24/value");
        let wait = Duration::from_secs(5);

        // held for several polls: still a single press
        fs::write(&next, "0").unwrap();
        let ev = time::timeout(wait, rx.get()).await.unwrap();
        assert_eq!(ev, Some(Event::ButtonPressed(Button::Next)));
        time::sleep(Duration::from_millis(50)).await;
        assert!(rx.is_empty());

        fs::write(&next, "1").unwrap();
        time::sleep(Duration::from_millis(30)).await;
        fs::write(dir.path().join("gpio23/value"), "0").unwrap();
        let ev = time::timeout(wait, rx.get()).await.unwrap();
        assert_eq!(ev, Some(Event::ButtonPressed(Button::Select)));

        token.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn unreadable_pin_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let buttons = Box::new(GpioButtons::new(&config(dir.path())));
        let (tx, _rx) = mailbox();

        let err = buttons.run(tx, CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.as_label(), "input_backend");
    }
}
