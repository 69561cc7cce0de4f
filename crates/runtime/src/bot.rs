//! Execution driver.
//!
//! A [`Bot`] runs three routines sharing one [`Context`]:
//!
//! - refresher (`Background`): replaces the world snapshot periodically
//! - hooks (`High`): asks each [`PriorityHook`] for urgent work and, when
//!   one answers, raises the context to `High` until that action finishes
//! - main loop (`Normal`): polls the actions of each [`Run`] in order
//!
//! Raising the context to `High` parks the main loop inside
//! [`Status::pause_if_not_priority`] without cancelling it. Setting `Stop`
//! unwinds every routine at its next priority check.

use std::{sync::Arc, time::Duration};

use action::{Action, ActionError, BoxedAction, Progress};
use game_data::Data;
use tokio::{task::JoinSet, time::Instant};
use tracing::{Instrument, debug, error, info, warn};

use crate::{
    config::BotConfig,
    context::{Context, ContextRegistry, DebugMarkers, Status, TaskId},
    error::{Result, RuntimeError},
    events::{BotEvent, EventBus},
    input::{GameReader, InputDispatch},
    priority::Priority,
};

/// Named list of top-level actions polled in order.
pub struct Run {
    name: String,
    actions: Vec<BoxedAction<Data>>,
}

impl Run {
    pub fn new(name: impl Into<String>, actions: Vec<BoxedAction<Data>>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Source of urgent actions (drink a potion, leave a dangerous area).
pub trait PriorityHook: Send {
    fn name(&self) -> &str;

    /// Action to run at `High` priority, if the snapshot calls for one.
    fn check(&mut self, data: &Data) -> Option<BoxedAction<Data>>;
}

pub struct Bot {
    config: BotConfig,
    reader: Arc<dyn GameReader>,
    input: Option<Arc<dyn InputDispatch>>,
    hooks: Vec<Box<dyn PriorityHook>>,
    registry: Arc<ContextRegistry>,
    events: EventBus,
}

impl Bot {
    pub fn new(config: BotConfig, reader: Arc<dyn GameReader>) -> Self {
        let events = EventBus::with_capacity(config.event_buffer);
        Self {
            config,
            reader,
            input: None,
            hooks: Vec::new(),
            registry: ContextRegistry::global(),
            events,
        }
    }

    pub fn with_input(mut self, input: Arc<dyn InputDispatch>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_hook(mut self, hook: impl PriorityHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Registers routine contexts in `registry` instead of the global one.
    pub fn with_registry(mut self, registry: Arc<ContextRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Spawns the routines and returns immediately.
    pub fn start(self, runs: Vec<Run>) -> RunningBot {
        let Bot {
            config,
            reader,
            input,
            hooks,
            registry,
            events,
        } = self;

        let mut context = Context::new(config.name.clone()).with_pause_config(config.pause);
        if let Some(input) = input {
            context = context.with_input(input);
        }
        context.refresh_data(&*reader);
        let context = Arc::new(context);
        let span = context.span().clone();

        info!(parent: &span, runs = runs.len(), hooks = hooks.len(), "bot starting");

        let mut tasks = JoinSet::new();

        let refresh_interval = config.refresh_interval;
        tasks.spawn(
            routine(
                registry.clone(),
                context.clone(),
                Priority::Background,
                move |status| refresh_loop(status, reader, refresh_interval),
            )
            .instrument(span.clone()),
        );

        let (hook_interval, tick) = (config.hook_interval, config.tick_interval);
        tasks.spawn(
            routine(registry.clone(), context.clone(), Priority::High, move |status| {
                hook_loop(status, hooks, hook_interval, tick)
            })
            .instrument(span.clone()),
        );

        let main_events = events.clone();
        tasks.spawn(
            routine(registry, context.clone(), Priority::Normal, move |status| {
                main_loop(status, runs, config, main_events)
            })
            .instrument(span),
        );

        RunningBot {
            handle: BotHandle { context, events },
            tasks,
        }
    }

    /// Starts the bot and waits for it to finish.
    pub async fn run(self, runs: Vec<Run>) -> Result<()> {
        self.start(runs).join().await
    }
}

/// Spawned routines of a started bot.
pub struct RunningBot {
    handle: BotHandle,
    tasks: JoinSet<Result<()>>,
}

impl RunningBot {
    pub fn handle(&self) -> BotHandle {
        self.handle.clone()
    }

    /// Waits for every routine. A requested stop is not an error.
    pub async fn join(mut self) -> Result<()> {
        let mut outcome = Ok(());
        while let Some(joined) = self.tasks.join_next().await {
            let result = joined.map_err(RuntimeError::WorkerJoin).and_then(|result| result);
            match result {
                Ok(()) | Err(RuntimeError::Cancelled) => {}
                Err(err) => {
                    // one failing routine stops the others
                    self.handle.stop();
                    if outcome.is_ok() {
                        outcome = Err(err);
                    }
                }
            }
        }
        info!(parent: self.handle.context.span(), "bot finished");
        outcome
    }
}

/// Cloneable control surface for a running bot.
#[derive(Clone)]
pub struct BotHandle {
    context: Arc<Context>,
    events: EventBus,
}

impl BotHandle {
    pub fn name(&self) -> &str {
        self.context.name()
    }

    pub fn pause(&self) {
        self.context.pause();
    }

    pub fn resume(&self) -> bool {
        self.context.resume()
    }

    /// Requests every routine to unwind at its next priority check.
    pub fn stop(&self) {
        self.context.switch_priority(Priority::Stop);
    }

    pub fn priority(&self) -> Priority {
        self.context.execution_priority()
    }

    pub fn debug(&self) -> DebugMarkers {
        self.context.debug()
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BotEvent> {
        self.events.subscribe()
    }
}

/// Runs `body` under a fresh task id with `context` attached at `priority`.
async fn routine<F, Fut>(
    registry: Arc<ContextRegistry>,
    context: Arc<Context>,
    priority: Priority,
    body: F,
) -> Result<()>
where
    F: FnOnce(Status) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let task = TaskId::next();
    task.scope(async move {
        let status = registry.attach(context, priority)?;
        let result = body(status).await;
        registry.detach_task(task);
        if let Err(err) = &result
            && !err.is_cancelled()
        {
            error!(%task, %priority, error = %err, "routine failed");
        }
        result
    })
    .await
}

async fn refresh_loop(status: Status, reader: Arc<dyn GameReader>, interval: Duration) -> Result<()> {
    loop {
        match status.execution_priority() {
            Priority::Stop => return Err(RuntimeError::Cancelled),
            Priority::Pause => {}
            _ => status.refresh_data(&*reader),
        }
        tokio::time::sleep(interval).await;
    }
}

async fn hook_loop(
    status: Status,
    mut hooks: Vec<Box<dyn PriorityHook>>,
    interval: Duration,
    tick: Duration,
) -> Result<()> {
    loop {
        match status.execution_priority() {
            Priority::Stop => return Err(RuntimeError::Cancelled),
            // left over from a hook interrupted by pause and resume
            Priority::High => {
                status.switch_priority_if(Priority::High, Priority::Normal);
            }
            Priority::Normal => {
                let data = status.data();
                for hook in &mut hooks {
                    let Some(action) = hook.check(&data) else {
                        continue;
                    };
                    if !status.switch_priority_if(Priority::Normal, Priority::High) {
                        break;
                    }
                    debug!(hook = hook.name(), action = action.name(), "running priority action");
                    let result = drive(&status, action, tick).await;
                    status.switch_priority_if(Priority::High, Priority::Normal);
                    result?;
                }
            }
            _ => {}
        }
        tokio::time::sleep(interval).await;
    }
}

/// Polls one action until it finishes. Action failures are logged and end
/// the action; only cancellation is returned.
async fn drive(status: &Status, mut action: BoxedAction<Data>, tick: Duration) -> Result<()> {
    status.set_last_action(action.name());
    loop {
        status.pause_if_not_priority().await?;
        match action.next_step(&status.data()) {
            Ok(Progress::Running) => tokio::time::sleep(tick).await,
            Ok(Progress::Completed) => return Ok(()),
            Ok(Progress::Continue(failure)) => {
                warn!(action = action.name(), %failure, "priority action failed, continuing");
                return Ok(());
            }
            Err(err) => {
                warn!(action = action.name(), error = %err, "priority action failed");
                return Ok(());
            }
        }
    }
}

async fn main_loop(status: Status, runs: Vec<Run>, config: BotConfig, events: EventBus) -> Result<()> {
    // one clock for the whole game, across runs
    let game_started = Instant::now();
    let mut result = Ok(());
    for run in runs {
        result = play(&status, run, &config, &events, game_started).await;
        if result.is_err() {
            break;
        }
    }
    // unwind the sibling routines
    status.switch_priority(Priority::Stop);
    result
}

/// Outcome of one tick over a run's actions.
enum Tick {
    Pending,
    Finished,
}

async fn play(
    status: &Status,
    run: Run,
    config: &BotConfig,
    events: &EventBus,
    game_started: Instant,
) -> Result<()> {
    let Run { name, mut actions } = run;
    actions.sort_by_key(|action| action.priority());

    let bot = status.name().to_string();
    info!(run = %name, actions = actions.len(), "run started");
    events.publish(BotEvent::RunStarted {
        bot: bot.clone(),
        run: name.clone(),
    });

    let started = Instant::now();
    let mut cursor = 0;
    loop {
        // a parked loop still times out
        let remaining = config.max_game_length.saturating_sub(game_started.elapsed());
        let resumed = tokio::select! {
            result = status.pause_if_not_priority() => result,
            () = tokio::time::sleep(remaining) => Ok(()),
        };
        if let Err(err) = resumed {
            info!(run = %name, "run stopped");
            return Err(err);
        }

        let elapsed = game_started.elapsed();
        if elapsed >= config.max_game_length {
            let err = RuntimeError::MaxGameLength {
                elapsed_secs: elapsed.as_secs(),
            };
            error!(run = %name, error = %err, "run failed");
            events.publish(BotEvent::RunFailed {
                bot,
                run: name,
                reason: err.to_string(),
            });
            return Err(err);
        }

        let data = status.data();
        if data.is_loading() {
            tokio::time::sleep(config.tick_interval).await;
            continue;
        }

        match poll_actions(status, &mut actions, &mut cursor, &data, &name, events) {
            Ok(Tick::Pending) => tokio::time::sleep(config.tick_interval).await,
            Ok(Tick::Finished) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                info!(run = %name, elapsed_ms, "run finished");
                events.publish(BotEvent::RunFinished {
                    bot,
                    run: name,
                    elapsed_ms,
                });
                return Ok(());
            }
            Err(err) => {
                let markers = status.debug();
                error!(
                    run = %name,
                    action = %markers.last_action,
                    step = err.step().map_or(markers.last_step.as_str(), |step| step),
                    error = %err,
                    "run failed"
                );
                events.publish(BotEvent::RunFailed {
                    bot,
                    run: name,
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        }
    }
}

/// Polls actions from `cursor` on until one is still running.
fn poll_actions(
    status: &Status,
    actions: &mut [BoxedAction<Data>],
    cursor: &mut usize,
    data: &Data,
    run: &str,
    events: &EventBus,
) -> std::result::Result<Tick, ActionError> {
    while let Some(action) = actions.get_mut(*cursor) {
        status.set_last_action(action.name());
        match action.next_step(data) {
            Ok(Progress::Running) => return Ok(Tick::Pending),
            Ok(Progress::Completed) => {}
            Ok(Progress::Continue(failure)) => {
                warn!(action = action.name(), %failure, "action failed, continuing");
            }
            Err(err) if err.is_skippable() => {
                warn!(action = action.name(), error = %err, "skipping action");
                events.publish(BotEvent::ActionSkipped {
                    bot: status.name().to_string(),
                    run: run.to_string(),
                    action: action.name().to_string(),
                    reason: err.to_string(),
                });
                action.skip();
            }
            Err(err) => return Err(err),
        }
        *cursor += 1;
    }
    Ok(Tick::Finished)
}
