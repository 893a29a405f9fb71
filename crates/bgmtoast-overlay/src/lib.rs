//! The now-playing toast drawn into the host's frames.
//!
//! [`Overlay::on_frame`] runs on the host's render thread once per presented
//! frame. It reads the latest [`NowPlaying`] snapshot without blocking,
//! advances the slide-in / hold / slide-out animation by the wall-clock
//! delta, and issues the resulting [`renderer::DrawCommand`]s to an
//! [`renderer::ImmediateRenderer`].

use std::sync::Arc;

use bgmtoast_bridge::notification::{NotificationBoard, NowPlaying};

use crate::animation::Phase;
use crate::renderer::ImmediateRenderer;

pub mod animation;
pub mod layout;
pub mod renderer;
pub mod toast;

pub use crate::toast::{FrameInput, Toast, ToastSettings};

/// Render-thread side of the notification board.
#[derive(Debug)]
pub struct Overlay {
    board: Arc<NotificationBoard>,
    current: Arc<NowPlaying>,
    toast: Toast,
    warned_missing_icon: bool,
}

impl Overlay {
    pub fn new(board: Arc<NotificationBoard>, settings: ToastSettings) -> Self {
        let current = board.snapshot();
        Self {
            board,
            current,
            toast: Toast::new(settings),
            warned_missing_icon: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.toast.phase()
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.current
    }

    /// Draws one frame of the toast.
    ///
    /// If the worker holds the board lock right now, the previous snapshot is
    /// reused for this frame.
    pub fn on_frame<R>(&mut self, frame: FrameInput, renderer: &mut R)
    where
        R: ImmediateRenderer + ?Sized,
    {
        if let Some(snapshot) = self.board.try_snapshot() {
            self.current = snapshot;
        }

        let icon = renderer.icon();
        let commands = self.toast.step(frame, &self.current, &*renderer, icon);
        if commands.is_empty() {
            return;
        }

        if icon.is_none() && !self.warned_missing_icon {
            log::warn!("Toast icon is unavailable, drawing without it.");
            self.warned_missing_icon = true;
        }
        for command in &commands {
            renderer.draw(command);
        }
    }
}
