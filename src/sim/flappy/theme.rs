//! Cosmetic themes
//!
//! Every theme is the same game. What changes is the artwork and, through
//! [`ObstacleShape`], which collision predicate matches that artwork.

use serde::{Deserialize, Serialize};

use super::collision::aabb_hits_pipe;
use super::obstacles::{
    AlienStructure, Asteroid, ElectricBarrier, FirePillar, HauntedTower, PaperShredder, Pin, Tree,
};
use super::state::Pipe;
use crate::Rect;
use crate::renderer::surface::{Color, Surface, rgb};

/// Collision and artwork for one theme's obstacles
pub trait ObstacleShape {
    /// Whether the character's hitbox touches this pipe's obstacles
    fn collides(&self, character: &Rect, pipe: &Pipe, canvas_height: f32) -> bool {
        aabb_hits_pipe(character, pipe, canvas_height)
    }

    /// Paint both obstacles of `pipe`; `time` is seconds of play, for animation
    fn render(&self, pipe: &Pipe, canvas_height: f32, time: f32, surface: &mut dyn Surface);
}

/// Colors used for a theme's background and character
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub sky_top: Color,
    pub sky_bottom: Color,
    pub character: Color,
    pub accent: Color,
    /// Small background details (stars, confetti, leaves)
    pub detail: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Ufo,
    Rocket,
    Butterfly,
    Dragon,
    Ghost,
    PaperPlane,
    Balloon,
    Robot,
}

impl Theme {
    pub const ALL: [Theme; 8] = [
        Theme::Ufo,
        Theme::Rocket,
        Theme::Butterfly,
        Theme::Dragon,
        Theme::Ghost,
        Theme::PaperPlane,
        Theme::Balloon,
        Theme::Robot,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Theme::Ufo => "ufo",
            Theme::Rocket => "rocket",
            Theme::Butterfly => "butterfly",
            Theme::Dragon => "dragon",
            Theme::Ghost => "ghost",
            Theme::PaperPlane => "paperplane",
            Theme::Balloon => "balloon",
            Theme::Robot => "robot",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id.to_lowercase())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Ufo => "UFO",
            Theme::Rocket => "Rocket",
            Theme::Butterfly => "Butterfly",
            Theme::Dragon => "Dragon",
            Theme::Ghost => "Ghost",
            Theme::PaperPlane => "Paper Plane",
            Theme::Balloon => "Balloon",
            Theme::Robot => "Robot",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Theme::Ufo => "Classic UFO with pulsing lights",
            Theme::Rocket => "Sleek rocket with flame trails",
            Theme::Butterfly => "Graceful butterfly with fluttering wings",
            Theme::Dragon => "Fierce dragon with fire breath",
            Theme::Ghost => "Spooky ghost with transparency effects",
            Theme::PaperPlane => "Origami plane with folded wings",
            Theme::Balloon => "Colorful balloon that expands and contracts",
            Theme::Robot => "Mechanical robot with blinking lights",
        }
    }

    /// Selector swatch color, as a CSS hex string
    pub fn swatch(&self) -> &'static str {
        match self {
            Theme::Ufo => "#C0C0C0",
            Theme::Rocket => "#FF4500",
            Theme::Butterfly => "#9370DB",
            Theme::Dragon => "#8B0000",
            Theme::Ghost => "#E6E6FA",
            Theme::PaperPlane => "#F0F8FF",
            Theme::Balloon => "#FF69B4",
            Theme::Robot => "#4682B4",
        }
    }

    pub fn obstacle(&self) -> &'static dyn ObstacleShape {
        match self {
            Theme::Ufo => &AlienStructure,
            Theme::Rocket => &Asteroid,
            Theme::Butterfly => &Tree,
            Theme::Dragon => &FirePillar,
            Theme::Ghost => &HauntedTower,
            Theme::PaperPlane => &PaperShredder,
            Theme::Balloon => &Pin,
            Theme::Robot => &ElectricBarrier,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Ufo => Palette {
                sky_top: rgb(0x0b0b2b),
                sky_bottom: rgb(0x1b1b4b),
                character: rgb(0xc0c0c0),
                accent: rgb(0x40c4ff),
                detail: rgb(0xffffff),
            },
            Theme::Rocket => Palette {
                sky_top: rgb(0x000033),
                sky_bottom: rgb(0x0a0a2a),
                character: rgb(0xe0e0e0),
                accent: rgb(0xff4500),
                detail: rgb(0xffffff),
            },
            Theme::Butterfly => Palette {
                sky_top: rgb(0x87ceeb),
                sky_bottom: rgb(0x98fb98),
                character: rgb(0x9370db),
                accent: rgb(0xffb6c1),
                detail: rgb(0xffffff),
            },
            Theme::Dragon => Palette {
                sky_top: rgb(0x2b0000),
                sky_bottom: rgb(0x8b0000),
                character: rgb(0x8b0000),
                accent: rgb(0xffa500),
                detail: rgb(0x3b1f1f),
            },
            Theme::Ghost => Palette {
                sky_top: rgb(0x1a1a2e),
                sky_bottom: rgb(0x16213e),
                character: rgb(0xe6e6fa),
                accent: rgb(0x000000),
                detail: rgb(0x4a4e69),
            },
            Theme::PaperPlane => Palette {
                sky_top: rgb(0xf5f5dc),
                sky_bottom: rgb(0xe8e4c9),
                character: rgb(0xf0f8ff),
                accent: rgb(0x4169e1),
                detail: rgb(0xadd8e6),
            },
            Theme::Balloon => Palette {
                sky_top: rgb(0xffe4e1),
                sky_bottom: rgb(0xe0ffff),
                character: rgb(0xff69b4),
                accent: rgb(0x696969),
                detail: rgb(0xffd700),
            },
            Theme::Robot => Palette {
                sky_top: rgb(0x0f2027),
                sky_bottom: rgb(0x2c5364),
                character: rgb(0x4682b4),
                accent: rgb(0xff0000),
                detail: rgb(0x00ffff),
            },
        }
    }
}
