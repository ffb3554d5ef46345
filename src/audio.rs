//! Audio cues
//!
//! The simulation never touches audio. It emits `GameEvent`s, which map to
//! a small set of cues; on the web those cues drive two media elements (a
//! looping background track and a gun one-shot). Every playback failure,
//! blocked autoplay included, is swallowed.

use crate::sim::GameEvent;

/// Something the audio layer should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Rewind and play the background loop
    StartMusic,
    /// Pause and rewind the background loop
    StopMusic,
    /// Rewind and play the gun effect
    Gunshot,
}

impl AudioCue {
    /// Cue triggered by a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(AudioCue::StartMusic),
            GameEvent::GameOver { .. } => Some(AudioCue::StopMusic),
            GameEvent::Fired => Some(AudioCue::Gunshot),
            GameEvent::EnemyDestroyed { .. }
            | GameEvent::WaveCleared { .. }
            | GameEvent::LifeLost { .. } => None,
        }
    }

    /// Cues for a tick's events, in order
    pub fn for_events(events: &[GameEvent]) -> Vec<Self> {
        events.iter().filter_map(Self::for_event).collect()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::HtmlAudioElement;

    use super::AudioCue;
    use crate::settings::Settings;

    /// Owns the page's audio elements
    pub struct AudioManager {
        music: Option<HtmlAudioElement>,
        gun: Option<HtmlAudioElement>,
        /// A user gesture has been seen (browsers gate playback on one)
        unlocked: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            let music = HtmlAudioElement::new_with_src(&settings.assets.music).ok();
            if let Some(music) = &music {
                music.set_loop(true);
                music.set_volume(settings.effective_music_volume() as f64);
            } else {
                log::warn!("Could not create music element - background loop disabled");
            }

            let gun = HtmlAudioElement::new_with_src(&settings.assets.gun_sound).ok();
            if let Some(gun) = &gun {
                gun.set_volume(settings.effective_sfx_volume() as f64);
            } else {
                log::warn!("Could not create gun sound element");
            }

            Self {
                music,
                gun,
                unlocked: false,
            }
        }

        /// First user gesture: retry the background loop that autoplay may
        /// have blocked. Later calls do nothing.
        pub fn unlock(&mut self, playing: bool) {
            if self.unlocked {
                return;
            }
            self.unlocked = true;
            if playing {
                self.handle(AudioCue::StartMusic);
            }
        }

        pub fn handle(&self, cue: AudioCue) {
            match cue {
                AudioCue::StartMusic => {
                    if let Some(music) = &self.music {
                        play_from_start(music);
                    }
                }
                AudioCue::StopMusic => {
                    if let Some(music) = &self.music {
                        let _ = music.pause();
                        music.set_current_time(0.0);
                    }
                }
                AudioCue::Gunshot => {
                    if let Some(gun) = &self.gun {
                        play_from_start(gun);
                    }
                }
            }
        }
    }

    /// Rewind and play; a rejected play promise is awaited and dropped
    fn play_from_start(el: &HtmlAudioElement) {
        el.set_current_time(0.0);
        if let Ok(promise) = el.play() {
            spawn_local(async move {
                if JsFuture::from(promise).await.is_err() {
                    log::debug!("Audio playback rejected");
                }
            });
        }
    }
}
