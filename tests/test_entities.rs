use space_invaders::compute::init_world;
use space_invaders::config::Config;
use space_invaders::entities::*;

#[test]
fn rect_overlap_is_strict_and_symmetric() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
    let crossing = Rect::new(9.0, 9.0, 5.0, 5.0);
    let inside = Rect::new(2.0, 2.0, 1.0, 1.0);

    assert!(!a.overlaps(&touching));
    assert!(!touching.overlaps(&a));
    assert!(a.overlaps(&crossing));
    assert!(crossing.overlaps(&a));
    assert!(a.overlaps(&inside));
    assert!(inside.overlaps(&a));
}

#[test]
fn heading_flips_between_two_signs() {
    assert_eq!(Heading::default(), Heading::Right);
    assert_eq!(Heading::Right.sign(), 1.0);
    assert_eq!(Heading::Left.sign(), -1.0);
    assert_eq!(Heading::Right.flip(), Heading::Left);
    assert_eq!(Heading::Left.flip(), Heading::Right);
    assert_eq!(Heading::Left.flip().flip(), Heading::Left);
}

#[test]
fn ending_messages() {
    assert_eq!(Ending::Defeat.message(), "Game Over! You Lose.");
    assert_eq!(Ending::Victory.message(), "Congratulations! You Win!");
}

#[test]
fn only_defeat_and_victory_end_a_run() {
    assert_eq!(FrameOutcome::Defeat.ending(), Some(Ending::Defeat));
    assert_eq!(FrameOutcome::Victory.ending(), Some(Ending::Victory));
    assert_eq!(FrameOutcome::Continue.ending(), None);
    assert_eq!(FrameOutcome::Idle.ending(), None);
}

#[test]
fn projectile_bounds_are_inclusive() {
    let at = |y: f32| Projectile { x: 0.0, y, width: 5.0, height: 10.0, vy: 0.0 };
    assert!(at(-1.0).out_of_bounds(100.0));
    assert!(!at(0.0).out_of_bounds(100.0));
    assert!(!at(100.0).out_of_bounds(100.0));
    assert!(at(101.0).out_of_bounds(100.0));
}

#[test]
fn enemy_edge_contact_includes_touching() {
    let e = |x: f32| Enemy { x, y: 0.0, width: 40.0, height: 30.0, speed: 2.0, fire_cooldown: 0 };
    assert!(e(0.0).at_edge(200.0));
    assert!(e(160.0).at_edge(200.0));
    assert!(!e(1.0).at_edge(200.0));
    assert!(!e(159.0).at_edge(200.0));
}

#[test]
fn canvas_scales_terminal_cells() {
    let c = Canvas::from_cells(80, 23, &Config::default());
    assert_eq!(c, Canvas { width: 640.0, height: 368.0 });
}

#[test]
fn world_clone_is_independent() {
    let original = init_world(Config::default(), Canvas { width: 640.0, height: 384.0 });
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.player.lives = 1;
    cloned.enemies.push(Enemy {
        x: 5.0,
        y: 5.0,
        width: 40.0,
        height: 30.0,
        speed: 2.0,
        fire_cooldown: 0,
    });

    assert_eq!(original.player.x, 295.0);
    assert_eq!(original.player.lives, 10);
    assert!(original.enemies.is_empty());
}
