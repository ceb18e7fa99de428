//! The power-up and bring-up sequence, modeled as an explicit chain of states.
//!
//! Each state has an entry action: commands to send, a reset line change, and a hold time the
//! controller needs before the next step. The chain is fixed and always walked in order from
//! `PowerOff` to `Ready`; the first failure ends it.

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;

use crate::command::{Command, PowerControl};
use crate::config::DisplayConfig;
use crate::error::Error;
use crate::interface::DisplayInterface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    /// Reset released while supply voltages settle.
    PowerOff,
    ResetAsserted,
    ResetReleased,
    ControllerReset,
    BiasConfigured,
    AdcConfigured,
    ScanDirectionConfigured,
    StartLineConfigured,
    /// Booster on.
    PowerStage1,
    /// Booster and regulator on.
    PowerStage2,
    /// Booster, regulator and follower on.
    PowerStage3,
    VoltageRatioConfigured,
    DisplayOn,
    AllPointsNormal,
    ContrastSet,
    /// The display is left off until the host unblanks it.
    Blanked,
    Ready,
}

impl InitState {
    pub fn next(self) -> Option<InitState> {
        use self::InitState::*;
        Some(match self {
            PowerOff => ResetAsserted,
            ResetAsserted => ResetReleased,
            ResetReleased => ControllerReset,
            ControllerReset => BiasConfigured,
            BiasConfigured => AdcConfigured,
            AdcConfigured => ScanDirectionConfigured,
            ScanDirectionConfigured => StartLineConfigured,
            StartLineConfigured => PowerStage1,
            PowerStage1 => PowerStage2,
            PowerStage2 => PowerStage3,
            PowerStage3 => VoltageRatioConfigured,
            VoltageRatioConfigured => DisplayOn,
            DisplayOn => AllPointsNormal,
            AllPointsNormal => ContrastSet,
            ContrastSet => Blanked,
            Blanked => Ready,
            Ready => return None,
        })
    }

    /// Perform the action that puts the controller in this state.
    fn enter<DI, RST, D>(
        self,
        iface: &mut DI,
        reset: &mut RST,
        delay: &mut D,
        config: &DisplayConfig,
    ) -> Result<(), Error>
    where
        DI: DisplayInterface,
        RST: OutputPin,
        D: DelayMs<u16>,
    {
        let power = |converter, regulator, follower| {
            Command::SetPowerControl(PowerControl {
                converter,
                regulator,
                follower,
            })
        };
        match self {
            InitState::PowerOff => {
                reset.set_high().map_err(|_| Error::ControlLine)?;
                delay.delay_ms(10);
            }
            InitState::ResetAsserted => {
                reset.set_low().map_err(|_| Error::ControlLine)?;
                delay.delay_ms(60);
            }
            InitState::ResetReleased => {
                reset.set_high().map_err(|_| Error::ControlLine)?;
                delay.delay_ms(50);
            }
            InitState::ControllerReset => Command::InternalReset.send(iface)?,
            InitState::BiasConfigured => Command::SetBias(config.bias).send(iface)?,
            InitState::AdcConfigured => {
                Command::SetSegmentDirection(config.segment_direction).send(iface)?
            }
            InitState::ScanDirectionConfigured => {
                Command::SetComScanDirection(config.com_scan_direction).send(iface)?
            }
            InitState::StartLineConfigured => Command::SetStartLine(0).send(iface)?,
            InitState::PowerStage1 => {
                power(true, false, false).send(iface)?;
                delay.delay_ms(50);
            }
            InitState::PowerStage2 => {
                power(true, true, false).send(iface)?;
                delay.delay_ms(50);
            }
            InitState::PowerStage3 => {
                power(true, true, true).send(iface)?;
                delay.delay_ms(10);
            }
            InitState::VoltageRatioConfigured => {
                Command::SetResistorRatio(config.resistor_ratio).send(iface)?
            }
            InitState::DisplayOn => Command::DisplayOn.send(iface)?,
            InitState::AllPointsNormal => Command::SetAllPoints(false).send(iface)?,
            InitState::ContrastSet => {
                Command::SelectVolume.send(iface)?;
                Command::SetVolume(config.contrast).send(iface)?;
            }
            InitState::Blanked => Command::DisplayOff.send(iface)?,
            InitState::Ready => {}
        }
        Ok(())
    }
}

/// Walk the whole bring-up chain. Returns at the first failed step without attempting the rest.
pub(crate) fn run<DI, RST, D>(
    iface: &mut DI,
    reset: &mut RST,
    delay: &mut D,
    config: &DisplayConfig,
) -> Result<(), Error>
where
    DI: DisplayInterface,
    RST: OutputPin,
    D: DelayMs<u16>,
{
    log::debug!("Resetting display");
    let mut state = Some(InitState::PowerOff);
    while let Some(s) = state {
        if let Err(e) = s.enter(iface, reset, delay, config) {
            log::error!("Display bring-up failed entering {:?}: {}", s, e);
            return Err(e);
        }
        log::debug!("Display init: {:?}", s);
        state = s.next();
    }
    Ok(())
}
