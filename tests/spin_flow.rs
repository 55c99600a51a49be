//! End-to-end spin flow against the public API: pick, plan, animate, record.

use std::f64::consts::TAU;

use lucky_wheel::persistence::AppStore;
use lucky_wheel::platform::MemoryStore;
use lucky_wheel::wheel::{PlanDraws, landing_angle, select_with_draw};
use lucky_wheel::{History, PrizeSet, SpinDriver, SpinEvent, SpinPhase};
use rand::SeedableRng;
use rand_pcg::Pcg32;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn run_to_end(driver: &mut SpinDriver, mut now: f64) -> (Vec<SpinEvent>, f64) {
    let mut events = Vec::new();
    let mut frames = 0;
    while driver.is_spinning() {
        now += FRAME_MS;
        events.extend(driver.update(now));
        frames += 1;
        assert!(frames < 10_000, "spin never finished");
    }
    (events, now)
}

fn finished(events: &[SpinEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            SpinEvent::Finished { winner, .. } => Some(*winner),
            _ => None,
        })
        .collect()
}

#[test]
fn test_forced_draw_lands_on_heavy_prize() {
    let prizes = PrizeSet::from_weights(&[1, 1, 2]);

    // Cumulative weights 1, 2, 4: a draw of 3.5 falls in the last prize
    let winner = select_with_draw(&prizes, 3.5).unwrap();
    assert_eq!(winner, 2);

    let mut driver = SpinDriver::new();
    assert!(driver.request_spin_with(&prizes, winner, PlanDraws::exact(), 0.0));
    assert_eq!(driver.phase(), SpinPhase::Spinning);

    let landing = landing_angle(&prizes, winner, 0.0).unwrap();
    let target = driver.target().unwrap();
    assert!((target - (landing + 5.0 * TAU)).abs() < 1e-9);

    let (events, _) = run_to_end(&mut driver, 0.0);
    assert_eq!(finished(&events), vec![2]);
    assert_eq!(driver.phase(), SpinPhase::Idle);
    assert_eq!(driver.rotation(), target);
    assert_eq!(prizes.sector_under_pointer(driver.rotation()), Some(2));
}

#[test]
fn test_empty_wheel_refuses_to_spin() {
    let mut driver = SpinDriver::new();
    let mut rng = Pcg32::seed_from_u64(1);
    assert!(!driver.request_spin(&PrizeSet::default(), 0.0, &mut rng));
    assert_eq!(driver.phase(), SpinPhase::Idle);
    assert!(driver.update(100.0).is_empty());
}

#[test]
fn test_consecutive_spins_match_pointer() {
    let prizes = PrizeSet::from_weights(&[5, 1, 3, 2, 8, 1, 1]);
    let mut driver = SpinDriver::new();
    let mut rng = Pcg32::seed_from_u64(2024);
    let mut now = 0.0;

    for _ in 0..25 {
        let before = driver.rotation();
        assert!(driver.request_spin(&prizes, now, &mut rng));
        let winner = driver.winner().unwrap();
        let (events, end) = run_to_end(&mut driver, now);
        now = end + 500.0;

        assert_eq!(finished(&events), vec![winner]);
        assert!(driver.rotation() > before + 5.0 * TAU);
        assert_eq!(prizes.sector_under_pointer(driver.rotation()), Some(winner));
    }
}

#[test]
fn test_winners_recorded_and_persisted() {
    let mut store = AppStore::new(MemoryStore::new());
    let book = store.load_book();
    let prizes = book.current().prize_set();
    let mut history = store.load_history();
    assert!(history.is_empty());

    let mut driver = SpinDriver::new();
    let mut rng = Pcg32::seed_from_u64(7);
    let mut now = 0.0;
    let mut winners = Vec::new();

    for spin in 0..3 {
        assert!(driver.request_spin(&prizes, now, &mut rng));
        let (events, end) = run_to_end(&mut driver, now);
        now = end;
        for event in events {
            if let SpinEvent::Finished { prize, .. } = event {
                history.record(&prize, 1_700_000_000_000 + spin);
                winners.push(prize.label);
            }
        }
    }
    store.save_history(&history).unwrap();
    store.save_book(&book).unwrap();

    let reloaded: History = store.load_history();
    assert_eq!(reloaded.len(), 3);
    // Newest first
    let labels: Vec<_> = reloaded.entries.iter().map(|e| e.label.clone()).collect();
    winners.reverse();
    assert_eq!(labels, winners);
    assert_eq!(store.load_book().current_id(), book.current_id());
}
