//! Per-task context lookup and priority pausing.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use runtime::{Context, ContextRegistry, PauseConfig, Priority, RuntimeError, TaskId};
use tokio::time::{sleep, timeout};

fn quick_context(name: &str) -> Arc<Context> {
    Arc::new(Context::new(name).with_pause_config(PauseConfig {
        poll_interval: Duration::from_millis(2),
        loading_screen_delay: Duration::from_millis(1),
    }))
}

#[tokio::test]
async fn each_task_sees_its_own_markers() {
    let registry = Arc::new(ContextRegistry::new());

    let spawn = |name: &'static str, action: &'static str| {
        let registry = registry.clone();
        tokio::spawn(TaskId::next().scope(async move {
            registry.create_context(name)?;
            registry.current()?.set_last_action(action);
            // let the other task write its marker
            sleep(Duration::from_millis(20)).await;
            let seen = registry.current()?.debug().last_action;
            registry.detach()?;
            Ok::<_, RuntimeError>(seen)
        }))
    };

    let first = spawn("first", "Pindleskin");
    let second = spawn("second", "Mephisto");

    assert_eq!(first.await.unwrap().unwrap(), "Pindleskin");
    assert_eq!(second.await.unwrap().unwrap(), "Mephisto");
    assert!(registry.is_empty());
}

#[tokio::test]
async fn global_functions_resolve_the_scoped_task() {
    let seen = TaskId::next()
        .scope(async {
            let status = runtime::create_context("global")?;
            status.set_last_step("MoveTo");
            let found = runtime::current_context()?.debug().last_step;
            runtime::detach()?;
            Ok::<_, RuntimeError>(found)
        })
        .await
        .unwrap();
    assert_eq!(seen, "MoveTo");

    assert!(matches!(
        runtime::current_context().err().unwrap(),
        RuntimeError::NoTaskIdentity
    ));
}

#[tokio::test]
async fn waits_until_priority_matches() {
    let context = quick_context("paused");
    context.switch_priority(Priority::Pause);

    let registry = Arc::new(ContextRegistry::new());
    let passed = Arc::new(AtomicBool::new(false));
    let task = TaskId::next();
    let status = registry.register(task, context.clone(), Priority::Normal).unwrap();

    let flag = passed.clone();
    let waiter = tokio::spawn(async move {
        status.pause_if_not_priority().await?;
        flag.store(true, Ordering::SeqCst);
        Ok::<_, RuntimeError>(())
    });

    sleep(Duration::from_millis(40)).await;
    assert!(!passed.load(Ordering::SeqCst));

    context.switch_priority(Priority::Normal);
    timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter resumes")
        .unwrap()
        .unwrap();
    assert!(passed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn stop_cancels_a_waiting_task() {
    let context = quick_context("stopped");
    context.switch_priority(Priority::Pause);
    let registry = ContextRegistry::new();
    let status = registry
        .register(TaskId::next(), context.clone(), Priority::Normal)
        .unwrap();

    let waiter = tokio::spawn(async move { status.pause_if_not_priority().await });
    sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    context.switch_priority(Priority::Stop);
    let result = timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter unwinds")
        .unwrap();
    assert!(matches!(result, Err(RuntimeError::Cancelled)));
}

#[tokio::test]
async fn high_priority_parks_normal_routine() {
    let context = quick_context("hooked");
    let registry = ContextRegistry::new();
    let normal = registry
        .register(TaskId::next(), context.clone(), Priority::Normal)
        .unwrap();
    let high = registry
        .register(TaskId::next(), context.clone(), Priority::High)
        .unwrap();

    context.switch_priority(Priority::High);
    timeout(Duration::from_millis(200), high.pause_if_not_priority())
        .await
        .expect("high routine runs")
        .unwrap();
    assert!(
        timeout(Duration::from_millis(30), normal.pause_if_not_priority())
            .await
            .is_err()
    );

    context.switch_priority(Priority::Normal);
    timeout(Duration::from_millis(200), normal.pause_if_not_priority())
        .await
        .expect("normal routine resumes")
        .unwrap();
}
