//! Replays file paths read from stdin through the interception handler and
//! drives the toast in real time, logging what would be drawn.
//!
//! Usage: `bgmtoast [MODULE_DIR] < paths.txt`

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use bgmtoast::Session;
use bgmtoast::replay::LogRenderer;
use bgmtoast_overlay::FrameInput;
use bgmtoast_overlay::animation::Phase;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const SURFACE_WIDTH: f32 = 1920.0;
const SURFACE_HEIGHT: f32 = 1080.0;
/// How long to keep drawing after input ends with nothing on screen.
const IDLE_GRACE: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    bgmtoast::init_logging().context("failed to build logger instance")?;

    let module_dir = std::env::args_os().nth(1).map(PathBuf::from);
    let session = Session::start(module_dir.as_deref()).context("failed to start session")?;

    let input_closed = Arc::new(AtomicBool::new(false));
    let reader = {
        let interceptor = session.interceptor();
        let input_closed = input_closed.clone();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(err) => {
                            log::error!("Failed to read input: {err}");
                            break;
                        }
                    };
                    let path = line.trim();
                    if path.is_empty() {
                        continue;
                    }
                    // Stand-in for the host's own file-open call.
                    let opened = interceptor.intercept_narrow(Some(path.as_bytes()), || path.len());
                    log::debug!("Opened {path:?} ({opened} bytes of path).");
                }
                input_closed.store(true, Ordering::Release);
            })
            .context("failed to spawn input reader")?
    };

    let mut overlay = session.overlay();
    let mut renderer =
        LogRenderer::with_icon_file(session.config().overlay.font_size, &session.icon_path());
    let mut last_frame = Instant::now();
    let mut last_phase = overlay.phase();
    let mut idle_since: Option<Instant> = None;

    loop {
        thread::sleep(FRAME_INTERVAL);
        let now = Instant::now();
        let frame = FrameInput {
            delta_secs: now.duration_since(last_frame).as_secs_f32(),
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
        };
        last_frame = now;

        overlay.on_frame(frame, &mut renderer);
        let drawn = renderer.take_command_count();

        let phase = overlay.phase();
        if phase != last_phase {
            log::info!(
                "Toast {phase:?} for {:?} ({drawn} draw commands).",
                overlay.now_playing().track.display_name
            );
            last_phase = phase;
        }

        let settled = input_closed.load(Ordering::Acquire)
            && phase == Phase::Idle
            && !session.context().mailbox.has_unread();
        if !settled {
            idle_since = None;
            continue;
        }
        let since = *idle_since.get_or_insert(now);
        if now.duration_since(since) >= IDLE_GRACE {
            break;
        }
    }

    if reader.join().is_err() {
        log::error!("Input reader panicked.");
    }
    session.shutdown();
    Ok(())
}
