use std::time::Duration;

use recall_core::model::{
    AdvancePolicy, ItemOutcome, Pool, SessionConfig, TrainerConfig, TrainerMode,
};
use recall_core::time::fixed_clock;
use recall_services::session::{RecordingPlayer, StartError};
use recall_services::{
    Answer, SessionError, Trainer, TrainerDriver, TrainerHandle, TrainerPhase, TrainerSnapshot,
};
use tokio::sync::watch;

fn pool() -> Pool {
    Pool::from_manifest_json(
        r#"[
            {"id": "w1", "pt": "obrigado", "fr": "merci", "files": {"normal": "w1.mp3"}},
            {"id": "w2", "pt": "bom dia", "fr": "bonjour", "files": {"normal": "w2.mp3"}},
            {"id": "w3", "pt": "tchau", "fr": "salut", "files": {"normal": "w3.mp3"}}
        ]"#,
    )
    .unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

type DriverTask = tokio::task::JoinHandle<Trainer<RecordingPlayer>>;

fn spawn_driver(player: RecordingPlayer) -> (TrainerHandle, DriverTask) {
    init_tracing();
    let trainer = Trainer::new(pool(), player).with_seed(8).with_clock(fixed_clock());
    let (driver, handle) = TrainerDriver::new(trainer);
    (handle, tokio::spawn(driver.run()))
}

async fn wait_for(
    rx: &mut watch::Receiver<TrainerSnapshot>,
    pred: impl Fn(&TrainerSnapshot) -> bool,
) -> TrainerSnapshot {
    rx.wait_for(|s| pred(s)).await.unwrap().clone()
}

#[tokio::test(start_paused = true)]
async fn dictation_times_out_and_waits_for_next() {
    let (handle, task) = spawn_driver(RecordingPlayer::new());
    let mut rx = handle.subscribe();
    assert!(handle.snapshot().can_start);

    let config = TrainerConfig::new(SessionConfig::dictation(1).unwrap(), 2, AdvancePolicy::Manual)
        .unwrap();
    assert!(handle.start(config).await.unwrap());

    let started = tokio::time::Instant::now();
    let feedback = wait_for(&mut rx, |s| s.phase == TrainerPhase::Feedback).await;
    assert_eq!(started.elapsed(), Duration::from_secs(2));
    assert_eq!(feedback.last_result.unwrap().outcome, ItemOutcome::Timeout);
    assert_eq!(feedback.score, 0);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(handle.snapshot().phase, TrainerPhase::Feedback);

    handle.next().unwrap();
    let done = wait_for(&mut rx, TrainerSnapshot::is_complete).await;
    assert_eq!(done.summary.unwrap().timeouts(), 1);

    drop(rx);
    drop(handle);
    let trainer = task.await.unwrap();
    assert_eq!(trainer.phase(), TrainerPhase::Completed);
}

#[tokio::test(start_paused = true)]
async fn quiz_auto_advances_after_delay() {
    let (handle, task) = spawn_driver(RecordingPlayer::new());
    let mut rx = handle.subscribe();
    handle
        .start(TrainerConfig::defaults_for(TrainerMode::Quiz, 2).unwrap())
        .await
        .unwrap();

    let first = wait_for(&mut rx, |s| s.phase == TrainerPhase::Presenting).await;
    let pick = first.choices()[0].id.clone();
    handle.submit(Answer::Choice(pick)).unwrap();

    let feedback = wait_for(&mut rx, |s| s.phase == TrainerPhase::Feedback).await;
    assert_eq!(feedback.index, 0);

    let answered_at = tokio::time::Instant::now();
    let second = wait_for(&mut rx, |s| s.index == 1 && s.phase == TrainerPhase::Presenting).await;
    assert_eq!(answered_at.elapsed(), Duration::from_millis(900));
    assert_eq!(second.clock_remaining(), Some(8));

    drop(rx);
    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pause_holds_remaining_time() {
    let player = RecordingPlayer::new();
    let (handle, task) = spawn_driver(player.clone());
    let mut rx = handle.subscribe();
    handle
        .start(TrainerConfig::defaults_for(TrainerMode::Dictation, 1).unwrap())
        .await
        .unwrap();

    let awaiting = wait_for(&mut rx, |s| s.clock_remaining() == Some(9)).await;
    assert_eq!(awaiting.phase, TrainerPhase::AwaitingInput);

    handle.pause().unwrap();
    wait_for(&mut rx, |s| matches!(s.phase, TrainerPhase::Paused(_))).await;
    assert_eq!(player.active(), None);

    tokio::time::sleep(Duration::from_secs(60)).await;
    let paused = handle.snapshot();
    assert_eq!(paused.clock_remaining(), Some(9));
    assert!(paused.clock.unwrap().paused);

    handle.resume().unwrap();
    let resumed = wait_for(&mut rx, |s| s.clock_remaining() == Some(8)).await;
    assert_eq!(resumed.phase, TrainerPhase::AwaitingInput);
    assert_eq!(player.played().len(), 1);

    drop(rx);
    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn start_on_empty_pool_reports_error_and_keeps_configuring() {
    init_tracing();
    let trainer = Trainer::new(Pool::default(), RecordingPlayer::new());
    let (driver, handle) = TrainerDriver::new(trainer);
    let task = tokio::spawn(driver.run());
    let mut rx = handle.subscribe();
    assert!(!handle.snapshot().can_start);

    let err = handle
        .start(TrainerConfig::defaults_for(TrainerMode::Quiz, 3).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StartError::Session(SessionError::EmptyPool)));

    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.phase, TrainerPhase::Configuring);
    assert_eq!(snapshot.total, 0);

    drop(rx);
    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn second_start_reports_already_running() {
    let (handle, task) = spawn_driver(RecordingPlayer::new());
    let config = TrainerConfig::defaults_for(TrainerMode::Quiz, 2).unwrap();

    assert!(handle.start(config).await.unwrap());
    assert!(!handle.start(config).await.unwrap());
    assert_eq!(handle.snapshot().total, 2);

    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn start_after_driver_stops_reports_closed() {
    let (handle, task) = spawn_driver(RecordingPlayer::new());
    task.abort();
    let _ = task.await;

    let err = handle
        .start(TrainerConfig::defaults_for(TrainerMode::Quiz, 2).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StartError::Closed(_)));
}
