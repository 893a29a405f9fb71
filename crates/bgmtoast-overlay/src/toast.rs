use bgmtoast_bridge::config::Config;
use bgmtoast_bridge::notification::NowPlaying;

use crate::animation::{AnimationState, Phase, Side};
use crate::layout::{ToastLayout, ToastStyle};
use crate::renderer::{DrawCommand, ImageId, TextMeasure};

/// What the host reports for the frame being drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Wall-clock seconds since the previous frame.
    pub delta_secs: f32,
    pub surface_width: f32,
    pub surface_height: f32,
}

/// Timing and placement parameters of the toast.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastSettings {
    pub display_duration_secs: f32,
    pub animation_speed: f32,
    pub alternate_side_marker: String,
    pub style: ToastStyle,
}

impl ToastSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            display_duration_secs: config.notification.display_duration_secs,
            animation_speed: config.overlay.animation_speed,
            alternate_side_marker: config.notification.alternate_side_marker.clone(),
            style: ToastStyle::from_config(&config.overlay),
        }
    }
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The per-frame toast state machine.
///
/// [`Toast::step`] is called once per host frame with the latest notification
/// snapshot. A snapshot whose generation differs from the last one seen
/// restarts the show cycle; metadata changes within a generation only change
/// the text.
#[derive(Debug, Clone)]
pub struct Toast {
    settings: ToastSettings,
    animation: AnimationState,
    seen_generation: u64,
}

impl Toast {
    pub fn new(settings: ToastSettings) -> Self {
        Self {
            settings,
            animation: AnimationState::default(),
            seen_generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.animation.phase()
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Advances the animation by one frame and returns what to draw.
    pub fn step<M>(
        &mut self,
        frame: FrameInput,
        now_playing: &NowPlaying,
        measure: &M,
        icon: Option<ImageId>,
    ) -> Vec<DrawCommand>
    where
        M: TextMeasure + ?Sized,
    {
        if now_playing.generation != self.seen_generation {
            self.seen_generation = now_playing.generation;
            self.animation.restart(self.settings.display_duration_secs);
        }
        if self.animation.phase() == Phase::Idle {
            return Vec::new();
        }

        let layout = ToastLayout::measure(self.settings.style, &now_playing.track, measure);
        let side = Side::for_source(
            &now_playing.source_key,
            &self.settings.alternate_side_marker,
        );
        let targets = layout.targets(side, frame.surface_width);

        match self
            .animation
            .advance(frame.delta_secs, targets, self.settings.animation_speed)
        {
            Some(x) => layout.draw_commands(x, &now_playing.track, icon),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bgmtoast_bridge::notification::TrackInfo;

    use super::*;
    use crate::renderer::TextSize;

    struct FixedWidth;

    impl TextMeasure for FixedWidth {
        fn measure_text(&self, text: &str) -> TextSize {
            TextSize {
                width: text.chars().count() as f32 * 10.0,
                height: 20.0,
            }
        }
    }

    // 30 px per frame at the default speed.
    const FRAME: FrameInput = FrameInput {
        delta_secs: 0.02,
        surface_width: 1280.0,
        surface_height: 720.0,
    };

    fn now_playing(name: &str, key: &str, generation: u64) -> NowPlaying {
        NowPlaying {
            track: TrackInfo {
                display_name: name.to_string(),
                ..TrackInfo::default()
            },
            source_key: key.to_string(),
            generation,
        }
    }

    fn box_left(commands: &[DrawCommand]) -> f32 {
        commands
            .iter()
            .find_map(|command| match command {
                DrawCommand::RoundedRect { min, .. } => Some(min.x),
                _ => None,
            })
            .expect("no box drawn")
    }

    #[test]
    fn nothing_is_drawn_before_the_first_show() {
        let mut toast = Toast::new(ToastSettings::default());
        let commands = toast.step(FRAME, &NowPlaying::default(), &FixedWidth, None);
        assert!(commands.is_empty());
        assert_eq!(toast.phase(), Phase::Idle);
    }

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut toast = Toast::new(ToastSettings::default());
        let current = now_playing("Town", "bgm/town.ogg", 1);

        let first = box_left(&toast.step(FRAME, &current, &FixedWidth, None));
        let second = box_left(&toast.step(FRAME, &current, &FixedWidth, None));
        assert!(second < first, "right-side toast moves left while sliding in");

        let mut frames = 0;
        while toast.phase() != Phase::Idle {
            toast.step(FRAME, &current, &FixedWidth, None);
            frames += 1;
            assert!(frames < 1000, "toast never went idle");
        }
        // 5 s at 0.02 s per frame, plus the slide out.
        assert!(frames >= 245);
        assert!(toast.step(FRAME, &current, &FixedWidth, None).is_empty());
    }

    #[test]
    fn marker_moves_the_toast_to_the_left_edge() {
        let mut toast = Toast::new(ToastSettings::default());
        let current = now_playing("Title", "y8_title/title.ogg", 1);

        let first = box_left(&toast.step(FRAME, &current, &FixedWidth, None));
        let second = box_left(&toast.step(FRAME, &current, &FixedWidth, None));
        assert!(first < 0.0);
        assert!(second > first);
    }

    #[test]
    fn new_generation_restarts_and_metadata_update_does_not() {
        let mut toast = Toast::new(ToastSettings::default());
        toast.step(FRAME, &now_playing("Town", "bgm/town.ogg", 1), &FixedWidth, None);
        for _ in 0..200 {
            toast.step(FRAME, &now_playing("Town", "bgm/town.ogg", 1), &FixedWidth, None);
        }
        let remaining = toast.animation().remaining_secs();
        assert!(remaining < 3.0);

        let renamed = now_playing("Town (night)", "bgm/town_n.ogg", 1);
        let commands = toast.step(FRAME, &renamed, &FixedWidth, None);
        assert!(toast.animation().remaining_secs() < remaining);
        assert!(commands.iter().any(|command| matches!(
            command,
            DrawCommand::Text { text, .. } if text == "Town (night)"
        )));

        toast.step(FRAME, &now_playing("Field", "bgm/field.ogg", 2), &FixedWidth, None);
        assert!((toast.animation().remaining_secs() - 4.98).abs() < 1e-4);
        assert_eq!(toast.phase(), Phase::SlidingIn);
    }
}
