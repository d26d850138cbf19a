//! Audible alert playback
//!
//! Playback is best effort: failures are reported to the caller for logging
//! and never feed back into the clock state.

use std::{
    fmt,
    io::Write,
    path::{Path, PathBuf},
    process::Stdio,
    sync::Mutex,
};
use tokio::process::{Child, Command};
use tracing::{debug, info};

/// Something that can play the end-of-interval sound
pub trait AlertPlayer: Send + Sync + fmt::Debug {
    /// Start the sound from the beginning
    fn play(&self) -> Result<(), String>;

    /// Stop the sound if it is playing. Safe to call when nothing plays.
    fn stop(&self) -> Result<(), String>;
}

/// Plays a sound file through an external audio player
#[derive(Debug)]
pub struct CommandAlert {
    player: String,
    sound: PathBuf,
    child: Mutex<Option<Child>>,
}

impl CommandAlert {
    pub fn new(player: impl Into<String>, sound: impl Into<PathBuf>) -> Self {
        Self {
            player: player.into(),
            sound: sound.into(),
            child: Mutex::new(None),
        }
    }

    /// Platform default audio player
    pub fn default_player() -> &'static str {
        if cfg!(target_os = "macos") {
            "afplay"
        } else {
            "paplay"
        }
    }
}

impl AlertPlayer for CommandAlert {
    fn play(&self) -> Result<(), String> {
        let mut child = self.child.lock()
            .map_err(|e| format!("Failed to lock alert process: {}", e))?;

        // A new alert restarts the sound rather than overlapping it
        if let Some(mut previous) = child.take() {
            if let Err(e) = previous.start_kill() {
                debug!("Previous alert process already gone: {}", e);
            }
        }

        debug!("Playing {} with {}", self.sound.display(), self.player);
        let spawned = Command::new(&self.player)
            .arg(&self.sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self.player, e))?;

        *child = Some(spawned);
        Ok(())
    }

    fn stop(&self) -> Result<(), String> {
        let mut child = self.child.lock()
            .map_err(|e| format!("Failed to lock alert process: {}", e))?;

        if let Some(mut playing) = child.take() {
            // An already finished player is fine
            if let Ok(None) = playing.try_wait() {
                playing.start_kill()
                    .map_err(|e| format!("Failed to stop {}: {}", self.player, e))?;
                info!("Alert sound stopped");
            }
        }
        Ok(())
    }
}

/// Rings the terminal bell
#[derive(Debug, Default)]
pub struct BellAlert;

impl AlertPlayer for BellAlert {
    fn play(&self) -> Result<(), String> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07")
            .and_then(|_| stdout.flush())
            .map_err(|e| format!("Failed to ring terminal bell: {}", e))
    }

    fn stop(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Muted alert, only leaves a trace in the log
#[derive(Debug, Default)]
pub struct SilentAlert;

impl AlertPlayer for SilentAlert {
    fn play(&self) -> Result<(), String> {
        debug!("Alert muted");
        Ok(())
    }

    fn stop(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Check that the configured sound file can be read
pub async fn check_alert_sound(sound: &Path) -> Result<(), String> {
    let metadata = tokio::fs::metadata(sound)
        .await
        .map_err(|e| format!("Alert sound {} is not readable: {}", sound.display(), e))?;

    if !metadata.is_file() {
        return Err(format!("Alert sound {} is not a file", sound.display()));
    }

    info!("Alert sound {} is available", sound.display());
    Ok(())
}
