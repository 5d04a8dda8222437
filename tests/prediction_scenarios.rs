use roundcast::application::prediction::{Assessment, PredictionEngine, Vote};
use roundcast::application::session::PredictionSession;
use roundcast::domain::config::{EngineConfig, ThresholdProfile};
use roundcast::domain::prediction::Tier;
use roundcast::domain::round::{OutcomeClass, Round};
use roundcast::domain::streak::{Outcome, StreakState};

fn rounds_from(first_id: u64, numbers: &[u8]) -> Vec<Round> {
    numbers
        .iter()
        .enumerate()
        .map(|(i, &n)| Round::new(first_id + i as u64, n).unwrap())
        .collect()
}

/// LOW/HIGH alternation starting LOW, with the last two numbers replaced.
fn alternation(last_two: [u8; 2]) -> Vec<u8> {
    let mut numbers: Vec<u8> = (0..20).map(|i| if i % 2 == 0 { 2 } else { 7 }).collect();
    numbers[18] = last_two[0];
    numbers[19] = last_two[1];
    numbers
}

fn session() -> PredictionSession {
    PredictionSession::new(EngineConfig::default(), 1000, 20)
}

#[test]
fn test_short_history_keeps_syncing() {
    let mut session = session();
    let numbers: Vec<u8> = (0..14).map(|i| (i * 3 % 10) as u8).collect();
    let report = session.ingest(rounds_from(1000, &numbers));

    let issued = report.issued.unwrap();
    assert_eq!(issued.target_id, 1014);
    assert_eq!(issued.prediction.tier, Tier::Syncing);
    assert_eq!(issued.prediction.label, None);
    assert_eq!(session.snapshot().tier, Tier::Syncing);
}

#[test]
fn test_unstable_round_with_symmetry_is_sureshot_safe() {
    let mut session = session();
    let report = session.ingest(rounds_from(1000, &alternation([4, 5])));

    let issued = report.issued.unwrap();
    assert_eq!(issued.target_id, 1020);
    assert_eq!(issued.prediction.tier, Tier::SureshotSafe);
    assert_eq!(issued.prediction.label, Some(OutcomeClass::Low));
}

#[test]
fn test_resolved_prediction_is_scored_once() {
    let mut session = session();
    session.ingest(rounds_from(1000, &alternation([3, 6])));
    assert_eq!(
        session.pending().unwrap().prediction.label,
        Some(OutcomeClass::Low)
    );

    let report = session.ingest(rounds_from(1020, &[2]));
    let resolution = report.resolution.unwrap();
    assert_eq!(resolution.round.id(), 1020);
    assert_eq!(resolution.outcome, Some(Outcome::Win));
    assert_eq!(session.pending().unwrap().target_id, 1021);

    // Re-delivering the same page changes nothing
    let report = session.ingest(rounds_from(1020, &[2]));
    assert!(report.resolution.is_none());
    assert!(report.issued.is_none());

    let status = session.snapshot();
    assert_eq!(status.wins, 1);
    assert_eq!(status.losses, 0);
    assert_eq!(status.win_rate, Some(1.0));
    assert_eq!(status.recent_outcomes.len(), 1);
}

#[test]
fn test_missed_target_round_is_dropped_unscored() {
    let mut session = session();
    session.ingest(rounds_from(1000, &alternation([3, 6])));

    // 1020 never arrives
    let report = session.ingest(rounds_from(1021, &[2, 7]));
    assert!(report.resolution.is_none());
    assert_eq!(report.issued.unwrap().target_id, 1023);

    let status = session.snapshot();
    assert_eq!(status.wins + status.losses, 0);
}

#[test]
fn test_loss_streak_switches_to_recovery() {
    let mut engine = PredictionEngine::new(EngineConfig::default());
    let history = rounds_from(1, &alternation([3, 6]));
    assert_eq!(engine.analyze(&history).tier, Tier::Sureshot);

    engine.record_outcome(21, Some(OutcomeClass::Low), true, OutcomeClass::High);
    engine.record_outcome(22, Some(OutcomeClass::High), true, OutcomeClass::Low);
    assert_eq!(engine.streak().consecutive_losses(), 2);

    let prediction = engine.analyze(&history);
    assert_eq!(prediction.tier, Tier::Recovery);
    assert_eq!(prediction.label, Some(OutcomeClass::Low));
}

#[test]
fn test_strict_profile_demotes_moderate_confidence() {
    let standard = PredictionEngine::new(EngineConfig::for_profile(ThresholdProfile::Standard));
    let strict = PredictionEngine::new(EngineConfig::for_profile(ThresholdProfile::Strict));
    let assessment = Assessment {
        vote: Vote {
            label: OutcomeClass::High,
            strength: 0.70,
            fallback: false,
        },
        signals: Vec::new(),
        unstable_trigger: false,
        volatile_window: false,
        symmetric: false,
    };
    let streak = StreakState::new();

    assert_eq!(standard.decide(&assessment, &streak).tier, Tier::High);
    let prediction = strict.decide(&assessment, &streak);
    assert_eq!(prediction.tier, Tier::Low);
    assert_eq!(prediction.label, Some(OutcomeClass::High));
}
