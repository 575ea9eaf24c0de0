use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use space_invaders::input::*;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

fn repeat(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
}

#[test]
fn bindings() {
    assert_eq!(action_for(KeyCode::Left), Some(Action::Left));
    assert_eq!(action_for(KeyCode::Char('a')), Some(Action::Left));
    assert_eq!(action_for(KeyCode::Right), Some(Action::Right));
    assert_eq!(action_for(KeyCode::Char('D')), Some(Action::Right));
    assert_eq!(action_for(KeyCode::Char('z')), Some(Action::Fire));
    assert_eq!(action_for(KeyCode::Char(' ')), Some(Action::Fire));
    assert_eq!(action_for(KeyCode::Char('x')), None);
    assert_eq!(action_for(KeyCode::Up), None);
}

#[test]
fn set_writes_one_flag() {
    let mut latch = InputLatch::default();
    latch.set(Action::Fire, true);
    assert_eq!(latch, InputLatch { left: false, right: false, fire: true });
    latch.set(Action::Fire, false);
    assert_eq!(latch, InputLatch::default());
}

// ── HeldKeys: press / release ─────────────────────────────────────────────────

#[test]
fn press_then_release() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Left), 1, &mut latch);
    assert!(latch.left);
    assert!(!latch.right);

    held.handle_key(&release(KeyCode::Left), 2, &mut latch);
    assert!(!latch.left);
    assert!(!held.any_held(Action::Left));
}

#[test]
fn repeated_presses_are_idempotent() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Char('z')), 1, &mut latch);
    let after_one = latch;
    held.handle_key(&press(KeyCode::Char('z')), 2, &mut latch);
    held.handle_key(&repeat(KeyCode::Char('z')), 3, &mut latch);
    assert_eq!(latch, after_one);
    assert!(latch.fire);

    held.handle_key(&release(KeyCode::Char('z')), 4, &mut latch);
    assert!(!latch.fire);
}

#[test]
fn flags_are_independent() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Left), 1, &mut latch);
    held.handle_key(&press(KeyCode::Right), 1, &mut latch);
    held.handle_key(&press(KeyCode::Char(' ')), 1, &mut latch);
    held.handle_key(&release(KeyCode::Right), 1, &mut latch);

    assert_eq!(latch, InputLatch { left: true, right: false, fire: true });
}

#[test]
fn unbound_key_leaves_latch_alone() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    assert_eq!(held.handle_key(&press(KeyCode::Char('x')), 1, &mut latch), None);
    assert_eq!(latch, InputLatch::default());
}

#[test]
fn releasing_one_of_two_bound_keys_keeps_action_held() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Left), 1, &mut latch);
    held.handle_key(&press(KeyCode::Char('a')), 2, &mut latch);
    held.handle_key(&release(KeyCode::Char('a')), 3, &mut latch);
    assert!(latch.left, "Left arrow is still down");

    held.handle_key(&release(KeyCode::Left), 4, &mut latch);
    assert!(!latch.left);
}

#[test]
fn tapping_z_while_space_held_keeps_firing() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Char(' ')), 1, &mut latch);
    held.handle_key(&press(KeyCode::Char('z')), 2, &mut latch);
    held.handle_key(&release(KeyCode::Char('z')), 3, &mut latch);
    assert!(latch.fire);
}

#[test]
fn shift_change_between_press_and_release_is_one_key() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Char('d')), 1, &mut latch);
    held.handle_key(&release(KeyCode::Char('D')), 2, &mut latch);
    assert!(!latch.right);
}

// ── HeldKeys: expiry ──────────────────────────────────────────────────────────

#[test]
fn expire_releases_stale_keys() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Char('z')), 10, &mut latch);

    held.expire(&mut latch, 10 + HOLD_WINDOW);
    assert!(latch.fire);

    held.expire(&mut latch, 11 + HOLD_WINDOW);
    assert!(!latch.fire);
}

#[test]
fn repeat_refresh_keeps_key_held() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Left), 1, &mut latch);
    held.handle_key(&repeat(KeyCode::Left), 1 + HOLD_WINDOW, &mut latch);
    held.expire(&mut latch, 1 + 2 * HOLD_WINDOW);
    assert!(latch.left);
}

#[test]
fn expiry_is_tracked_per_key() {
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    held.handle_key(&press(KeyCode::Char('a')), 1, &mut latch);
    held.handle_key(&press(KeyCode::Left), 1 + HOLD_WINDOW, &mut latch);

    // 'a' goes stale, the arrow is still fresh
    held.expire(&mut latch, 2 + HOLD_WINDOW);
    assert!(latch.left);

    held.expire(&mut latch, 2 + 2 * HOLD_WINDOW);
    assert!(!latch.left);
}

#[test]
fn expire_ignores_untracked_flags() {
    let mut latch = InputLatch { left: false, right: true, fire: false };
    let mut held = HeldKeys::default();
    held.expire(&mut latch, 1_000);
    assert!(latch.right);
}
