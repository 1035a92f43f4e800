//! Sound events handed to the sound collaborator.

use serde::{Deserialize, Serialize};
use tickshot_common::{ItemId, PlayerId, Point};

/// Sound category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    /// Running footstep
    Step,
    /// Primary attack
    ItemAttack,
    /// Secondary attack
    ItemAttack2,
    /// Reload started
    ItemReload,
    /// Trigger pulled on an empty magazine
    AttackNoAmmo,
}

/// A positioned sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundEvent {
    /// Where the sound originates
    pub position: Point,
    /// Category
    pub kind: SoundKind,
    /// Player making the sound
    pub player: Option<PlayerId>,
    /// Item making the sound
    pub item: Option<ItemId>,
}

impl SoundEvent {
    /// Creates a sound with no player or item reference.
    #[must_use]
    pub const fn new(position: Point, kind: SoundKind) -> Self {
        Self {
            position,
            kind,
            player: None,
            item: None,
        }
    }

    /// Attaches the player making the sound.
    #[must_use]
    pub const fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    /// Attaches the item making the sound.
    #[must_use]
    pub const fn with_item(mut self, item: ItemId) -> Self {
        self.item = Some(item);
        self
    }
}
