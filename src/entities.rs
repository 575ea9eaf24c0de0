/// All game entity types. Pure data, no logic beyond geometry.

use crate::barrier::Barrier;
use crate::config::Config;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Size of the play area in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    /// Play area matching a terminal of `cols` × `rows` cells.
    pub fn from_cells(cols: u16, rows: u16, config: &Config) -> Self {
        Self {
            width: cols as f32 * config.display.cell_width,
            height: rows as f32 * config.display.cell_height,
        }
    }
}

/// Axis-aligned box, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: boxes that merely share an edge do not collide.
    /// Symmetric in its arguments.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub lives: u32,
    /// Frames left before the next shot may be fired.
    pub fire_cooldown: u32,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Text of the lives readout.
    pub fn readout(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Negative travels up (fired by the player), positive travels down.
    pub vy: f32,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Outside `[0, height]` vertically; both ends of the range are kept.
    pub fn out_of_bounds(&self, height: f32) -> bool {
        self.y < 0.0 || self.y > height
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Frames until this enemy fires again.
    pub fire_cooldown: u32,
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Touching or beyond either side wall.
    pub fn at_edge(&self, width: f32) -> bool {
        self.x <= 0.0 || self.x + self.width >= width
    }
}

/// Shared horizontal direction of the whole formation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heading {
    Left,
    #[default]
    Right,
}

impl Heading {
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ending {
    Defeat,
    Victory,
}

impl Ending {
    pub fn message(self) -> &'static str {
        match self {
            Ending::Defeat => "Game Over! You Lose.",
            Ending::Victory => "Congratulations! You Win!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Waiting at the menu; `last` is how the previous run ended, if any.
    Menu { last: Option<Ending> },
    Running,
}

/// What a single call to `step` produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The world was not running; nothing changed.
    Idle,
    /// Frame advanced; schedule the next one.
    Continue,
    /// Lives ran out. The world has already been reset to the menu.
    Defeat,
    /// Formation wiped out. The world has already been reset to the menu.
    Victory,
}

impl FrameOutcome {
    /// How the run ended, for the two outcomes that end one.
    pub fn ending(self) -> Option<Ending> {
        match self {
            FrameOutcome::Defeat => Some(Ending::Defeat),
            FrameOutcome::Victory => Some(Ending::Victory),
            FrameOutcome::Idle | FrameOutcome::Continue => None,
        }
    }
}

// ── Master world state ────────────────────────────────────────────────────────

/// Everything the stepper mutates. Reset means replacing it with a fresh
/// value from `compute::init_world`.
#[derive(Clone, Debug)]
pub struct World {
    pub config: Config,
    pub canvas: Canvas,
    pub player: Player,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub heading: Heading,
    pub barriers: Vec<Barrier>,
    pub status: GameStatus,
    pub frame: u64,
}

impl World {
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }
}
