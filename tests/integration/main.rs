//! End-to-end repricing cycles against an in-memory marketplace.

mod mock_platform;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

use autoprice::display::MemoryReporter;
use autoprice::engine::outcome::{CycleAction, PriceReason};
use autoprice::engine::scheduler::Scheduler;
use autoprice::strategy::PricingPolicy;
use autoprice::types::PricingDecision;

use mock_platform::{FailOn, MockPlatform};

const OWN: u32 = 1234;
const FLOOR: Decimal = dec!(0.0010);

fn make_scheduler(platform: &MockPlatform, offset: Decimal) -> Scheduler<MockPlatform, MemoryReporter> {
    Scheduler::new(
        platform.clone(),
        MemoryReporter::default(),
        OWN,
        PricingPolicy::new(FLOOR, offset),
    )
    .with_interval(Duration::from_secs(30))
}

#[tokio::test(start_paused = true)]
async fn test_follows_market_then_settles() {
    let platform = MockPlatform::new(OWN, dec!(0.0050), &[(7, dec!(0.0060)), (8, dec!(0.0070))]);
    let mut scheduler = make_scheduler(&platform, dec!(0));

    scheduler.tick().await;
    assert_eq!(platform.current_price(), dec!(0.0060));

    // Now tied with the cheapest competitor: nothing more to do.
    scheduler.tick().await;
    scheduler.tick().await;
    assert_eq!(platform.submitted(), vec![dec!(0.0060)]);
}

#[tokio::test(start_paused = true)]
async fn test_own_rig_at_top_does_not_anchor_price() {
    // We are cheapest; the reference must be the next rig, so we move up.
    let platform = MockPlatform::new(OWN, dec!(0.0020), &[(9, dec!(0.0035))]);
    let mut scheduler = make_scheduler(&platform, dec!(0));

    let outcome = scheduler.run_cycle().await;
    assert_eq!(outcome.decision, Some(PricingDecision::SetPrice(dec!(0.0035))));
    assert_eq!(platform.current_price(), dec!(0.0035));
}

#[tokio::test(start_paused = true)]
async fn test_undercut_with_negative_offset() {
    let platform = MockPlatform::new(OWN, dec!(0.0050), &[(7, dec!(0.0040))]);
    let mut scheduler = make_scheduler(&platform, dec!(-5));

    scheduler.tick().await;
    assert_eq!(platform.current_price(), dec!(0.0038));

    // We are now the cheapest; the competitor at 0.0040 stays the reference.
    scheduler.tick().await;
    assert_eq!(platform.submitted(), vec![dec!(0.0038)]);
}

#[tokio::test(start_paused = true)]
async fn test_market_collapse_clamps_then_holds_at_floor() {
    let platform = MockPlatform::new(OWN, dec!(0.0020), &[(7, dec!(0.0005))]);
    let mut scheduler = make_scheduler(&platform, dec!(0));

    let outcome = scheduler.run_cycle().await;
    assert_eq!(
        outcome.action,
        CycleAction::PriceChanged {
            price: FLOOR,
            reason: PriceReason::Floor
        }
    );
    assert!(outcome
        .lines()
        .iter()
        .any(|l| l.ends_with("Rig price changed to minPrice: 0.001000 BTC/Mh/day")));

    let outcome = scheduler.run_cycle().await;
    assert_eq!(outcome.action, CycleAction::Held);
    assert_eq!(platform.submitted(), vec![FLOOR]);
}

#[tokio::test(start_paused = true)]
async fn test_no_competitors_holds() {
    let platform = MockPlatform::new(OWN, dec!(0.0020), &[]);
    let mut scheduler = make_scheduler(&platform, dec!(10));

    let outcome = scheduler.run_cycle().await;
    assert_eq!(outcome.action, CycleAction::Held);
    assert!(platform.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_reported_and_loop_keeps_waiting() {
    let platform = MockPlatform::new(OWN, dec!(0.0050), &[(7, dec!(0.0060))]);
    let mut scheduler = make_scheduler(&platform, dec!(0));
    let start = tokio::time::Instant::now();

    for call in [FailOn::GetRig, FailOn::GetAlgorithm, FailOn::ListRigs, FailOn::Update] {
        platform.fail_on(call);
        scheduler.tick().await;
    }
    assert_eq!(platform.current_price(), dec!(0.0050));
    assert!(start.elapsed() >= Duration::from_secs(120));

    platform.clear_error();
    scheduler.tick().await;
    assert_eq!(platform.current_price(), dec!(0.0060));

    let reports = &scheduler.reporter().outcomes;
    assert_eq!(reports.len(), 5);
    for lines in &reports[..4] {
        assert!(lines.iter().any(|l| l.contains(" - ERR: ")), "{lines:?}");
    }
    assert!(reports[4].iter().all(|l| !l.contains(" - ERR: ")));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_update_retried_next_cycle() {
    let platform = MockPlatform::new(OWN, dec!(0.0050), &[(7, dec!(0.0060))]);
    let mut scheduler = make_scheduler(&platform, dec!(0));

    platform.fail_on(FailOn::RejectUpdate);
    let outcome = scheduler.run_cycle().await;
    assert!(!outcome.is_ok());
    assert_eq!(platform.current_price(), dec!(0.0050));

    platform.clear_error();
    scheduler.run_cycle().await;
    assert_eq!(platform.submitted(), vec![dec!(0.0060), dec!(0.0060)]);
    assert_eq!(platform.current_price(), dec!(0.0060));
}

#[tokio::test(start_paused = true)]
async fn test_market_move_is_followed() {
    let platform = MockPlatform::new(OWN, dec!(0.0050), &[(7, dec!(0.0060))]);
    let mut scheduler = make_scheduler(&platform, dec!(0));

    scheduler.tick().await;
    platform.set_competitors(&[(7, dec!(0.0045))]);
    scheduler.tick().await;

    assert_eq!(platform.submitted(), vec![dec!(0.0060), dec!(0.0045)]);
}
