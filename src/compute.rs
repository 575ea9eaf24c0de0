/// Game-logic functions.
///
/// `step` advances a `World` by exactly one frame. All randomness comes
/// through the injected RNG so a seeded generator makes a run reproducible;
/// no function here touches the terminal.

use log::{debug, info, warn};
use rand::Rng;

use crate::barrier::Barrier;
use crate::config::{Config, ProjectileTuning};
use crate::entities::{
    Canvas, Enemy, Ending, FrameOutcome, GameStatus, Heading, Player, Projectile, World,
};
use crate::input::InputLatch;

// ── Constructors ─────────────────────────────────────────────────────────────

/// A world sitting at the menu: full lives, nothing on the field.
pub fn init_world(config: Config, canvas: Canvas) -> World {
    let player = Player {
        x: canvas.width / 2.0 - config.player.width / 2.0,
        y: canvas.height - config.player.offset_from_bottom,
        width: config.player.width,
        height: config.player.height,
        speed: config.player.speed,
        lives: config.player.lives,
        fire_cooldown: 0,
    };
    World {
        config,
        canvas,
        player,
        player_projectiles: Vec::new(),
        enemy_projectiles: Vec::new(),
        enemies: Vec::new(),
        heading: Heading::default(),
        barriers: Vec::new(),
        status: GameStatus::Menu { last: None },
        frame: 0,
    }
}

/// Rows × cols of enemies, centred and shifted by the formation offset.
pub fn spawn_formation(config: &Config, width: f32, rng: &mut impl Rng) -> Vec<Enemy> {
    let left = config.formation_left(width);
    let step_x = config.enemy.width + config.formation.padding;
    let step_y = config.enemy.height + config.formation.padding;

    let mut enemies = Vec::with_capacity((config.formation.rows * config.formation.cols) as usize);
    for row in 0..config.formation.rows {
        for col in 0..config.formation.cols {
            enemies.push(Enemy {
                x: left + col as f32 * step_x,
                y: config.formation.offset_y + row as f32 * step_y,
                width: config.enemy.width,
                height: config.enemy.height,
                speed: config.enemy.speed,
                fire_cooldown: rng.gen_range(0..config.enemy.first_shot_max),
            });
        }
    }
    enemies
}

/// Evenly spaced barriers with equal gaps between them and the walls.
pub fn spawn_barriers(config: &Config, canvas: Canvas) -> Vec<Barrier> {
    let gap = config.barrier_gap(canvas.width);
    let width = config.barrier.width as f32;
    let y = canvas.height - config.barrier.offset_from_bottom;

    (0..config.barrier.count)
        .map(|i| {
            let i = i as f32;
            Barrier::new(
                gap * (i + 1.0) + width * i,
                y,
                config.barrier.width as usize,
                config.barrier.height as usize,
            )
        })
        .collect()
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Menu → Running with a freshly populated field.
pub fn start_game(world: &mut World, rng: &mut impl Rng) {
    if world.is_running() {
        warn!("start_game called on a running world; ignoring");
        return;
    }

    *world = init_world(world.config.clone(), world.canvas);
    world.enemies = spawn_formation(&world.config, world.canvas.width, rng);
    world.barriers = spawn_barriers(&world.config, world.canvas);
    world.status = GameStatus::Running;

    info!(
        "Game started: {} enemies, {} barriers, canvas {}x{}",
        world.enemies.len(),
        world.barriers.len(),
        world.canvas.width,
        world.canvas.height
    );
}

/// Replace the world with its initial value, parked at the menu.
pub fn reset(world: &mut World, ending: Ending) {
    *world = init_world(world.config.clone(), world.canvas);
    world.status = GameStatus::Menu { last: Some(ending) };
}

// ── Player actions ───────────────────────────────────────────────────────────

/// Apply both movement flags, keeping the ship fully on the canvas.
pub fn move_player(player: &mut Player, input: &InputLatch, width: f32) {
    if input.left {
        player.x -= player.speed;
    }
    if input.right {
        player.x += player.speed;
    }
    player.x = player.x.clamp(0.0, (width - player.width).max(0.0));
}

/// A shot leaving the top-centre of the ship.
pub fn player_shot(player: &Player, tuning: &ProjectileTuning) -> Projectile {
    Projectile {
        x: player.x + player.width / 2.0,
        y: player.y,
        width: tuning.width,
        height: tuning.height,
        vy: -tuning.speed,
    }
}

/// A shot leaving the bottom-centre of an enemy.
pub fn enemy_shot(enemy: &Enemy, tuning: &ProjectileTuning) -> Projectile {
    Projectile {
        x: enemy.x + enemy.width / 2.0,
        y: enemy.y + enemy.height,
        width: tuning.width,
        height: tuning.height,
        vy: tuning.speed,
    }
}

// ── Collision helpers ────────────────────────────────────────────────────────

/// Move every projectile and drop the ones that left the canvas.
fn advance(projectiles: &mut Vec<Projectile>, height: f32) {
    for projectile in projectiles.iter_mut() {
        projectile.y += projectile.vy;
    }
    projectiles.retain(|p| !p.out_of_bounds(height));
}

/// Drop every item whose flag is set. `retain` visits items in order, once.
fn compact<T>(items: &mut Vec<T>, removed: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !removed.get(index).copied().unwrap_or(false);
        index += 1;
        keep
    });
}

/// Pair player projectiles with the enemies they overlap. Each enemy takes
/// at most one projectile and each projectile kills at most one enemy; both
/// are removed only after the whole scan. Returns the number of kills.
pub fn resolve_enemy_hits(enemies: &mut Vec<Enemy>, projectiles: &mut Vec<Projectile>) -> usize {
    let mut killed = vec![false; enemies.len()];
    let mut spent = vec![false; projectiles.len()];

    for (ei, enemy) in enemies.iter().enumerate() {
        let bounds = enemy.bounds();
        let hit = (0..projectiles.len())
            .find(|&pi| !spent[pi] && projectiles[pi].bounds().overlaps(&bounds));
        if let Some(pi) = hit {
            killed[ei] = true;
            spent[pi] = true;
        }
    }

    compact(enemies, &killed);
    compact(projectiles, &spent);
    killed.iter().filter(|&&k| k).count()
}

/// Remove every projectile that strikes `barrier`, eroding it at the
/// impact point.
fn absorb(barrier: &mut Barrier, projectiles: &mut Vec<Projectile>, radius: i32) {
    projectiles.retain(|p| {
        if barrier.struck_by(p) {
            barrier.take_damage(p.x, p.y, radius);
            false
        } else {
            true
        }
    });
}

// ── Per-frame step ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// Later phases see the earlier phases' mutations from the same frame. On a
/// terminal outcome the world has already been reset to the menu when this
/// returns.
pub fn step(world: &mut World, input: &InputLatch, rng: &mut impl Rng) -> FrameOutcome {
    if !world.is_running() {
        return FrameOutcome::Idle;
    }

    if world.player.lives == 0 {
        info!("Defeat after {} frames", world.frame);
        reset(world, Ending::Defeat);
        return FrameOutcome::Defeat;
    }

    world.frame += 1;
    let canvas = world.canvas;

    // ── 1. Player movement & firing ──────────────────────────────────────────
    move_player(&mut world.player, input, canvas.width);

    if input.fire && world.player.fire_cooldown == 0 {
        let shot = player_shot(&world.player, &world.config.projectile);
        world.player_projectiles.push(shot);
        world.player.fire_cooldown = world.config.player.fire_cooldown;
    }

    // ── 2. Player projectiles ────────────────────────────────────────────────
    advance(&mut world.player_projectiles, canvas.height);

    // ── 3. Formation movement & enemy fire ───────────────────────────────────
    let sign = world.heading.sign();
    let reload = world.config.enemy.reload_min..world.config.enemy.reload_max;
    for enemy in world.enemies.iter_mut() {
        enemy.x += enemy.speed * sign;
        if enemy.fire_cooldown == 0 {
            world
                .enemy_projectiles
                .push(enemy_shot(enemy, &world.config.projectile));
            enemy.fire_cooldown = rng.gen_range(reload.clone());
        } else {
            enemy.fire_cooldown -= 1;
        }
    }

    let reached_edge = world.enemies.iter().any(|e| e.at_edge(canvas.width));

    // ── 4. Player projectiles ↔ enemies ──────────────────────────────────────
    let kills = resolve_enemy_hits(&mut world.enemies, &mut world.player_projectiles);
    if kills > 0 {
        debug!("{} enemies destroyed, {} left", kills, world.enemies.len());
    }

    // ── 5. Edge contact: flip and descend ────────────────────────────────────
    if reached_edge {
        world.heading = world.heading.flip();
        let descent = world.config.enemy.descent;
        for enemy in world.enemies.iter_mut() {
            enemy.y += descent;
        }
        debug!("Formation hit a wall, now heading {:?}", world.heading);
    }

    if world.enemies.is_empty() {
        info!("Victory after {} frames", world.frame);
        reset(world, Ending::Victory);
        return FrameOutcome::Victory;
    }

    // ── 6. Barriers absorb projectiles (first barrier hit wins) ──────────────
    let radius = world.config.barrier.damage_radius;
    for barrier in world.barriers.iter_mut() {
        absorb(barrier, &mut world.player_projectiles, radius);
        absorb(barrier, &mut world.enemy_projectiles, radius);
    }

    // ── 7. Enemy projectiles ↔ player ────────────────────────────────────────
    advance(&mut world.enemy_projectiles, canvas.height);

    let target = world.player.bounds();
    let before = world.enemy_projectiles.len();
    world
        .enemy_projectiles
        .retain(|p| !p.bounds().overlaps(&target));
    let hits = before - world.enemy_projectiles.len();
    if hits > 0 {
        world.player.lives = world.player.lives.saturating_sub(hits as u32);
        info!("Player hit, {}", world.player.readout());
    }

    // ── 8. Cooldown ──────────────────────────────────────────────────────────
    world.player.fire_cooldown = world.player.fire_cooldown.saturating_sub(1);

    FrameOutcome::Continue
}
