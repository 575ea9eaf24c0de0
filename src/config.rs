/// Gameplay tuning, loadable from a TOML file.
///
/// Every section and every field is optional; anything left out falls back
/// to the classic layout: 4×8 formation, three barriers, ten lives.

use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::entities::Canvas;
use crate::error::ConfigError;

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal distance covered per frame while a direction is held.
    pub speed: f32,
    pub lives: u32,
    /// Frames between two shots while fire is held.
    pub fire_cooldown: u32,
    /// Distance from the bottom of the canvas to the ship's top edge.
    pub offset_from_bottom: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 20.0,
            speed: 7.0,
            lives: 10,
            fire_cooldown: 15,
            offset_from_bottom: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub width: f32,
    pub height: f32,
    /// Unsigned; the owner decides the direction.
    pub speed: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            width: 5.0,
            height: 10.0,
            speed: 7.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// How far the whole formation drops after touching a side.
    pub descent: f32,
    /// Upper bound (exclusive) of the countdown before an enemy's first shot.
    pub first_shot_max: u32,
    /// Reload countdown range after each shot, `[reload_min, reload_max)`.
    pub reload_min: u32,
    pub reload_max: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 30.0,
            speed: 2.0,
            descent: 10.0,
            first_shot_max: 200,
            reload_min: 100,
            reload_max: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormationTuning {
    pub rows: u32,
    pub cols: u32,
    /// Gap between neighbouring enemies, both axes.
    pub padding: f32,
    /// Shift of the centred formation to the right.
    pub offset_x: f32,
    /// Top edge of the first row.
    pub offset_y: f32,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 8,
            padding: 10.0,
            offset_x: 100.0,
            offset_y: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BarrierTuning {
    pub count: u32,
    pub width: u32,
    pub height: u32,
    /// Distance from the bottom of the canvas to the barriers' top edge.
    pub offset_from_bottom: f32,
    /// Cells cleared in each direction around an impact.
    pub damage_radius: i32,
}

impl Default for BarrierTuning {
    fn default() -> Self {
        Self {
            count: 3,
            width: 100,
            height: 20,
            offset_from_bottom: 150.0,
            damage_radius: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayTuning {
    pub fps: u32,
    /// World units covered by one terminal column.
    pub cell_width: f32,
    /// World units covered by one terminal row.
    pub cell_height: f32,
}

impl Default for DisplayTuning {
    fn default() -> Self {
        Self {
            fps: 60,
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

// ── Root ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub enemy: EnemyTuning,
    pub formation: FormationTuning,
    pub barrier: BarrierTuning,
    pub display: DisplayTuning,
}

impl Config {
    /// Read the file at `path` (if any), falling back to defaults, and
    /// validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                info!("Loaded tuning from {}", path.display());
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("projectile.width", self.projectile.width),
            ("projectile.height", self.projectile.height),
            ("projectile.speed", self.projectile.speed),
            ("enemy.width", self.enemy.width),
            ("enemy.height", self.enemy.height),
            ("display.cell_width", self.display.cell_width),
            ("display.cell_height", self.display.cell_height),
        ];
        for (name, value) in sizes {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }

        let counts = [
            ("player.lives", self.player.lives),
            ("formation.rows", self.formation.rows),
            ("formation.cols", self.formation.cols),
            ("barrier.count", self.barrier.count),
            ("barrier.width", self.barrier.width),
            ("barrier.height", self.barrier.height),
            ("enemy.first_shot_max", self.enemy.first_shot_max),
            ("display.fps", self.display.fps),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }

        if self.enemy.reload_min >= self.enemy.reload_max {
            return Err(ConfigError::Invalid(
                "enemy.reload_min must be below enemy.reload_max".to_string(),
            ));
        }
        if self.barrier.damage_radius < 0 {
            return Err(ConfigError::Invalid(
                "barrier.damage_radius must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Left edge of the first formation column on a canvas `width` wide.
    pub fn formation_left(&self, width: f32) -> f32 {
        (width - self.formation_width()) / 2.0 + self.formation.offset_x
    }

    /// Total width of one formation row, padding included.
    pub fn formation_width(&self) -> f32 {
        let cols = self.formation.cols as f32;
        cols * (self.enemy.width + self.formation.padding) - self.formation.padding
    }

    /// Horizontal space between neighbouring barriers (and the walls).
    pub fn barrier_gap(&self, width: f32) -> f32 {
        let count = self.barrier.count as f32;
        (width - count * self.barrier.width as f32) / (count + 1.0)
    }

    /// Whether the opening layout fits on `canvas`.
    pub fn check_fits(&self, canvas: Canvas) -> Result<(), ConfigError> {
        let too_small = || ConfigError::DoesNotFit {
            width: canvas.width,
            height: canvas.height,
        };

        let left = self.formation_left(canvas.width);
        if left <= 0.0 || left + self.formation_width() >= canvas.width {
            return Err(too_small());
        }
        if self.barrier_gap(canvas.width) <= 0.0 || canvas.width < self.player.width {
            return Err(too_small());
        }

        let rows = self.formation.rows as f32;
        let formation_bottom = self.formation.offset_y
            + rows * (self.enemy.height + self.formation.padding)
            - self.formation.padding;
        let barrier_top = canvas.height - self.barrier.offset_from_bottom;
        let player_top = canvas.height - self.player.offset_from_bottom;
        if formation_bottom >= barrier_top
            || barrier_top + self.barrier.height as f32 > player_top
            || player_top + self.player.height > canvas.height
        {
            return Err(too_small());
        }
        Ok(())
    }
}
