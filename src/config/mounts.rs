use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::video::MountId;

/// Element identifiers of the page mount points the players occupy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct MountConfig {
    /// Element the home background player replaces.
    pub home_player: String,
    /// Container around the home player; receives the fallback fill.
    pub home_container: String,
    /// Hero area of the work-detail modal.
    pub modal_hero: String,
    /// Element the detail background player replaces.
    pub detail_player: String,
    /// Container around the detail player inside the modal hero.
    pub detail_container: String,
    /// Static hero still shown before the preview plays.
    pub hero_still: String,
    /// Surface hosting the preview player.
    pub hero_video: String,
    /// Element the preview player replaces, created inside `hero_video`.
    pub preview_player: String,
    /// Mute toggle affordance.
    pub mute_toggle: String,
    /// Click-to-play overlay, only used when autoplay overlays are enabled.
    pub play_overlay: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            home_player: String::from("video-background"),
            home_container: String::from("video-background-container"),
            modal_hero: String::from("modal-hero"),
            detail_player: String::from("modal-video-background"),
            detail_container: String::from("modal-yt-background"),
            hero_still: String::from("modal-hero-still"),
            hero_video: String::from("modal-hero-video"),
            preview_player: String::from("youtube-preview-player"),
            mute_toggle: String::from("modal-mute-toggle"),
            play_overlay: String::from("modal-play-overlay"),
        }
    }
}

impl MountConfig {
    /// Mount id of the home player.
    pub fn home_player(&self) -> MountId {
        MountId::new(&self.home_player)
    }

    /// Mount id of the home container.
    pub fn home_container(&self) -> MountId {
        MountId::new(&self.home_container)
    }

    /// Mount id of the modal hero.
    pub fn modal_hero(&self) -> MountId {
        MountId::new(&self.modal_hero)
    }

    /// Mount id of the detail player.
    pub fn detail_player(&self) -> MountId {
        MountId::new(&self.detail_player)
    }

    /// Mount id of the detail container.
    pub fn detail_container(&self) -> MountId {
        MountId::new(&self.detail_container)
    }

    /// Mount id of the hero still.
    pub fn hero_still(&self) -> MountId {
        MountId::new(&self.hero_still)
    }

    /// Mount id of the hero video surface.
    pub fn hero_video(&self) -> MountId {
        MountId::new(&self.hero_video)
    }

    /// Mount id of the preview player.
    pub fn preview_player(&self) -> MountId {
        MountId::new(&self.preview_player)
    }

    /// Mount id of the mute toggle.
    pub fn mute_toggle(&self) -> MountId {
        MountId::new(&self.mute_toggle)
    }

    /// Mount id of the click-to-play overlay.
    pub fn play_overlay(&self) -> MountId {
        MountId::new(&self.play_overlay)
    }
}
