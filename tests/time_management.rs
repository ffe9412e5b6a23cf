use leone::board::Color;
use leone::time::{Limits, TimeManager};
use std::time::Duration;

#[test]
fn sudden_death_splits_remaining_time() {
    let tm = TimeManager::new(5000);
    let limits = Limits {
        wtime: Some(60_000),
        btime: Some(30_000),
        ..Limits::default()
    };
    assert_eq!(tm.allocate_time(&limits, Color::White), Duration::from_millis(1500));
    assert_eq!(tm.allocate_time(&limits, Color::Black), Duration::from_millis(750));
}

#[test]
fn increment_adds_eighty_percent() {
    let tm = TimeManager::new(5000);
    let limits = Limits {
        wtime: Some(40_000),
        btime: Some(40_000),
        winc: Some(1000),
        binc: Some(2000),
        ..Limits::default()
    };
    assert_eq!(tm.allocate_time(&limits, Color::White), Duration::from_millis(1800));
    assert_eq!(tm.allocate_time(&limits, Color::Black), Duration::from_millis(2600));
}

#[test]
fn moves_to_go_is_at_least_two() {
    let tm = TimeManager::new(5000);
    let limits = Limits {
        wtime: Some(10_000),
        movestogo: Some(1),
        ..Limits::default()
    };
    assert_eq!(tm.allocate_time(&limits, Color::White), Duration::from_millis(5000));
}

#[test]
fn low_clock_keeps_a_floor() {
    let tm = TimeManager::new(5000);
    let limits = Limits {
        btime: Some(100),
        ..Limits::default()
    };
    assert_eq!(tm.allocate_time(&limits, Color::Black), Duration::from_millis(10));
}

#[test]
fn missing_clock_uses_default() {
    let tm = TimeManager::new(750);
    // Only the opponent's clock is known
    let limits = Limits {
        wtime: Some(60_000),
        ..Limits::default()
    };
    assert_eq!(tm.allocate_time(&limits, Color::Black), Duration::from_millis(750));
    assert_eq!(tm.allocate_time(&Limits::default(), Color::White), Duration::from_millis(750));
}

#[test]
fn movetime_overrides_clock() {
    let tm = TimeManager::new(5000);
    let limits = Limits {
        wtime: Some(1_000),
        movetime: Some(3_000),
        ..Limits::default()
    };
    assert_eq!(tm.allocate_time(&limits, Color::White), Duration::from_millis(3000));
}
