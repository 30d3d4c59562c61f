//! Command handlers.
//!
//! Each run opens the emulated terminal, loads its state into a fresh
//! coordinator and applies one intent. Output goes to the supplied writer.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use tracing::debug;
use vidgate_allowlist::{AllowListCoordinator, ReconcileError};
use vidgate_core::canonical_key;
use vidgate_emulator::EmulatedGateway;
use vidgate_hardware::DisallowedVidMonitor;

use crate::cli::Command;
use crate::config::Settings;

type Coordinator = AllowListCoordinator<EmulatedGateway>;

pub async fn dispatch<W: Write>(command: Command, settings: &Settings, out: &mut W) -> Result<()> {
    debug!(?command, state = %settings.state_path.display(), "Dispatching command");

    match command {
        Command::Show => show(settings, out).await,
        Command::Add { vids } => add(settings, &vids, out).await,
        Command::Remove { vid } => remove(settings, &vid, out).await,
        Command::Set { vids } => set(settings, &vids, out).await,
        Command::Clear => clear(settings, out).await,
        Command::Enable => toggle(settings, true, out).await,
        Command::Disable => toggle(settings, false, out).await,
        Command::Probe { vid } => probe(settings, &vid, out).await,
    }
}

fn coordinator(settings: &Settings) -> Coordinator {
    let (gateway, _events) = EmulatedGateway::open(&settings.state_path);
    AllowListCoordinator::new(gateway, settings.coordinator.clone())
}

async fn loaded(settings: &Settings) -> Result<Coordinator> {
    let coordinator = coordinator(settings);
    coordinator
        .load()
        .await
        .context("failed to load the terminal allow list")?;
    Ok(coordinator)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "ON" } else { "OFF" }
}

async fn show<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    let coordinator = loaded(settings).await?;
    let state = coordinator.snapshot()?;

    writeln!(out, "Allow List: {}", on_off(state.enabled()))?;
    if state.store().is_empty() {
        writeln!(out, "(empty)")?;
    }
    for (index, entry) in state.entries().enumerate() {
        writeln!(out, "{index:>3}  {}", entry.raw())?;
    }

    let device = coordinator.into_gateway().state().await?;
    if device.reboot_pending() {
        writeln!(
            out,
            "Reboot pending: enforcing {} item(s), {}",
            device.enforced.allow_list.len(),
            on_off(device.enforced.enabled)
        )?;
    }
    Ok(())
}

/// Stage every VID, reporting duplicates. Any other error aborts the run
/// before the device is touched.
fn stage<W: Write>(coordinator: &Coordinator, vids: &[String], out: &mut W) -> Result<usize> {
    let mut staged = 0;
    for vid in vids {
        match coordinator.add_vid(vid) {
            Ok(_) => staged += 1,
            Err(ReconcileError::AlreadyExists { key }) => {
                writeln!(out, "Already exists: {key}")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(staged)
}

async fn apply<W: Write>(coordinator: &Coordinator, out: &mut W) -> Result<()> {
    let applied = coordinator
        .apply()
        .await
        .context("failed to apply the allow list")?;
    writeln!(out, "{applied}")?;
    Ok(())
}

async fn add<W: Write>(settings: &Settings, vids: &[String], out: &mut W) -> Result<()> {
    let coordinator = loaded(settings).await?;

    if stage(&coordinator, vids, out)? == 0 {
        writeln!(out, "Nothing to apply")?;
        return Ok(());
    }
    apply(&coordinator, out).await
}

async fn remove<W: Write>(settings: &Settings, vid: &str, out: &mut W) -> Result<()> {
    let coordinator = loaded(settings).await?;

    let index = coordinator
        .snapshot()?
        .store()
        .position_of(&canonical_key(vid))
        .ok_or_else(|| anyhow!("{vid} is not in the allow list"))?;

    let entry = coordinator.remove_vid(index)?;
    writeln!(out, "Removed {}", entry.raw())?;
    apply(&coordinator, out).await
}

async fn set<W: Write>(settings: &Settings, vids: &[String], out: &mut W) -> Result<()> {
    // The stored list is replaced, so only the flag is loaded.
    let coordinator = coordinator(settings);
    coordinator
        .load_enabled_flag()
        .await
        .context("failed to read the allow-list flag")?;

    stage(&coordinator, vids, out)?;
    apply(&coordinator, out).await
}

async fn clear<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    let coordinator = loaded(settings).await?;
    let cleared = coordinator
        .clear()
        .await
        .context("failed to clear the allow list")?;
    writeln!(out, "{cleared}")?;
    Ok(())
}

async fn toggle<W: Write>(settings: &Settings, enabled: bool, out: &mut W) -> Result<()> {
    let coordinator = loaded(settings).await?;
    let toggled = coordinator.set_enabled(enabled).await?;
    writeln!(out, "{toggled}")?;
    Ok(())
}

async fn probe<W: Write>(settings: &Settings, vid: &str, out: &mut W) -> Result<()> {
    let (gateway, events) = EmulatedGateway::open(&settings.state_path);

    let blocked = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&blocked);
    let mut monitor = DisallowedVidMonitor::new(events);
    monitor.subscribe(move |event| {
        if let Ok(mut seen) = sink.lock() {
            seen.push(event.vid_or_unknown().to_string());
        }
    });
    let handle = monitor.start();

    let outcome = gateway.probe(vid).await;
    // Closing the gateway ends the listener once queued events are delivered.
    drop(gateway);
    handle.join().await?;
    let outcome = outcome?;

    let blocked = blocked
        .lock()
        .map_err(|_| anyhow!("notification log poisoned"))?;
    for vid in blocked.iter() {
        writeln!(out, "[Blocked VID detected] {vid}")?;
    }
    writeln!(out, "{vid}: {outcome}")?;
    Ok(())
}
