//! Jumpstart modes and their fixed prompt lists
//!
//! Each mode carries a hard-coded, ordered prompt list. The session's
//! `items_target` is always the length of that list; the two numbers are
//! never set independently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JumpstartError;

/// One entry in a mode's capture sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptSpec {
    /// Stable key persisted on the prompt row
    pub key: &'static str,
    /// Short display label
    pub label: &'static str,
    /// One-line capture tip shown under the label
    pub hint: &'static str,
}

const QUICK_WIN_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "television",
        label: "Your biggest TV",
        hint: "Snap the screen and the model sticker on the back",
    },
    PromptSpec {
        key: "laptop",
        label: "Your laptop",
        hint: "Include the serial number from the bottom panel",
    },
    PromptSpec {
        key: "smartphone",
        label: "Your phone",
        hint: "Settings > About shows the model and serial",
    },
];

const HIGH_VALUE_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "jewelry",
        label: "Jewelry",
        hint: "Lay pieces on a plain background, one photo each",
    },
    PromptSpec {
        key: "watches",
        label: "Watches",
        hint: "Photograph the face and the case back",
    },
    PromptSpec {
        key: "artwork",
        label: "Art and collectibles",
        hint: "Capture the whole piece plus any signature or markings",
    },
    PromptSpec {
        key: "camera_gear",
        label: "Camera equipment",
        hint: "Bodies and lenses separately, serial numbers visible",
    },
    PromptSpec {
        key: "instruments",
        label: "Musical instruments",
        hint: "Include the maker's label inside the body if visible",
    },
];

const ROOM_BLITZ_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "sofa",
        label: "Sofa or sectional",
        hint: "One wide shot showing condition",
    },
    PromptSpec {
        key: "television",
        label: "TV",
        hint: "Screen on, model sticker on the back",
    },
    PromptSpec {
        key: "audio",
        label: "Speakers and audio gear",
        hint: "Group shot is fine, serials for receivers",
    },
    PromptSpec {
        key: "rug",
        label: "Area rug",
        hint: "Full rug plus a close-up of the weave",
    },
    PromptSpec {
        key: "coffee_table",
        label: "Coffee table",
        hint: "Any maker's mark underneath helps",
    },
    PromptSpec {
        key: "lamps",
        label: "Lamps and lighting",
        hint: "One photo per fixture",
    },
    PromptSpec {
        key: "console",
        label: "Game consoles",
        hint: "Serial number is behind or underneath",
    },
    PromptSpec {
        key: "wall_art",
        label: "Wall art and decor",
        hint: "Shoot straight-on to avoid glare",
    },
];

/// The three fixed capture flows a user can choose from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpstartMode {
    /// Three quick items most homes have
    QuickWin,
    /// Five categories that drive claim value
    HighValue,
    /// One room, top to bottom
    RoomBlitz,
}

impl JumpstartMode {
    pub const ALL: [JumpstartMode; 3] = [
        JumpstartMode::QuickWin,
        JumpstartMode::HighValue,
        JumpstartMode::RoomBlitz,
    ];

    /// The mode's ordered prompt list
    pub fn prompts(&self) -> &'static [PromptSpec] {
        match self {
            JumpstartMode::QuickWin => QUICK_WIN_PROMPTS,
            JumpstartMode::HighValue => HIGH_VALUE_PROMPTS,
            JumpstartMode::RoomBlitz => ROOM_BLITZ_PROMPTS,
        }
    }

    /// Target item count, always equal to the prompt list length
    pub fn items_target(&self) -> i32 {
        self.prompts().len() as i32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JumpstartMode::QuickWin => "quick_win",
            JumpstartMode::HighValue => "high_value",
            JumpstartMode::RoomBlitz => "room_blitz",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JumpstartMode::QuickWin => "Quick Win",
            JumpstartMode::HighValue => "High Value",
            JumpstartMode::RoomBlitz => "Room Blitz",
        }
    }
}

impl fmt::Display for JumpstartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JumpstartMode {
    type Err = JumpstartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick_win" => Ok(JumpstartMode::QuickWin),
            "high_value" => Ok(JumpstartMode::HighValue),
            "room_blitz" => Ok(JumpstartMode::RoomBlitz),
            other => Err(JumpstartError::UnknownMode(other.to_string())),
        }
    }
}
