use anyhow::Result;
use clap::Args;
use crossterm::{
    cursor::Show,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::dashboard::Role;
use crate::store::Stores;
use crate::tui::PortalRuntime;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Args, Debug, Default)]
pub struct LaunchCommands {
    /// Sign straight in as this role instead of showing the picker
    #[arg(long, value_enum)]
    pub role: Option<Role>,
}

/// Puts the terminal back the way it was when dropped, including while a
/// panic unwinds out of the frame loop
pub struct TerminalGuard {
    restore: Option<Box<dyn FnOnce()>>,
}

impl TerminalGuard {
    /// Enable raw mode and switch to the alternate screen
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = Self::with_restore(restore_terminal);
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }

    pub fn with_restore(restore: impl FnOnce() + 'static) -> Self {
        Self {
            restore: Some(Box::new(restore)),
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
        if std::thread::panicking() {
            eprintln!("school-portal crashed; the log file has the details");
        }
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        log::warn!("Failed to disable raw mode: {}", e);
    }
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture, Show) {
        log::warn!("Failed to leave the alternate screen: {}", e);
    }
}

pub async fn launch_command(args: LaunchCommands, config: &Config) -> Result<()> {
    let mut runtime = PortalRuntime::new(Stores::seeded(), config.dashboard_options());
    if let Some(role) = args.role.or(config.default_role) {
        runtime.login(role)?;
    }

    // Panics inside screens are caught and shown in the content area; keep
    // the default hook from printing over the alternate screen
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| {
        log::error!("panic: {}", info);
    }));

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run_portal(&mut terminal, &mut runtime).await;

    drop(guard);
    std::panic::set_hook(previous_hook);

    result
}

async fn run_portal<B: Backend>(terminal: &mut Terminal<B>, runtime: &mut PortalRuntime) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        // Process all pending events first for minimal input latency
        let mut should_quit = false;
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases as well
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !runtime.handle_key(key)? {
                    should_quit = true;
                    break;
                }
            }
        }
        if should_quit {
            log::info!("Quit confirmed");
            break;
        }

        runtime.poll_async();

        terminal.draw(|frame| runtime.render(frame))?;

        // Sleep for the remainder of the 16ms frame
        if let Some(remaining) = FRAME.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_guard(restored: &Arc<AtomicUsize>) -> TerminalGuard {
        let restored = restored.clone();
        TerminalGuard::with_restore(move || {
            restored.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_guard_restores_on_normal_exit() {
        let restored = Arc::new(AtomicUsize::new(0));
        drop(counting_guard(&restored));
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_restores_while_unwinding() {
        let restored = Arc::new(AtomicUsize::new(0));
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = counting_guard(&restored);
            panic!("frame loop blew up");
        }));
        assert!(result.is_err());
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }
}
