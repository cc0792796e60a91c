#[macro_use]
extern crate tracing;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vswitch::animation::Clock;
use vswitch::input::{GestureEvent, GestureHandler, PointerEvent};
use vswitch::notifications::Notification;
use vswitch::switch::{
    Options, PointerInput, SwitchLayout, SwitchSnapshot, SwitchState, VerticalSwitch,
};
use vswitch_config::Config;

const FRAME: Duration = Duration::from_micros(16_667);

/// Frames to hold the pointer still before releasing, long enough for the velocity to decay.
const HOLD_FRAMES: u32 = 12;

#[derive(Parser)]
#[command(name = "vswitch", version)]
#[command(about = "Runs a vertical switch headlessly and logs its notifications")]
struct Cli {
    /// Path to a KDL config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the control height from the config.
    #[arg(long)]
    height: Option<f64>,
    /// Prints notifications and the final state as JSON lines.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Replays a scripted session of drags and taps
    Demo,
    /// Taps the control at a vertical position
    Tap { y: f64 },
    /// Drags the handle by DY and releases it with velocity VY
    Drag {
        #[arg(allow_hyphen_values = true)]
        dy: f64,
        #[arg(allow_hyphen_values = true)]
        vy: f64,
    },
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Down(f64),
    Motion(f64),
    Up(f64),
    Gesture(GestureEvent),
    /// Waits for this many frames.
    Idle(u32),
    /// Waits until the switch stops animating.
    Settle,
}

struct State {
    switch: VerticalSwitch,
    clock: Clock,
    script: VecDeque<Step>,
    is_finished: bool,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum Record {
    Changed { state: SwitchState, time_ms: u128 },
    Closed { time_ms: u128 },
    Finished(SwitchSnapshot),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vswitch=debug"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(|err| anyhow!("{err:?}"))?,
        None => Config::default(),
    };

    let mut layout = SwitchLayout::from_config(&config.layout);
    if let Some(height) = cli.height {
        layout.height = height;
    }

    let clock = Clock::default();
    let mut switch = VerticalSwitch::new(clock.clone(), layout, Options::from_config(&config));

    let command = cli.command.unwrap_or(Command::Demo);
    let script = script(command, &switch);
    info!(
        "running {} steps from {:?} in {layout:?}",
        script.len(),
        switch.state()
    );

    let mut event_loop = EventLoop::<State>::try_new().context("error creating event loop")?;

    let (executor, scheduler) =
        calloop::futures::executor().context("error creating executor")?;
    event_loop
        .handle()
        .insert_source(executor, |(), _, _| ())
        .map_err(|err| err.error)
        .context("error inserting executor")?;

    let mut subscription = switch.subscribe();
    let json = cli.json;
    let report_clock = clock.clone();
    scheduler
        .schedule(async move {
            while let Some(notification) = subscription.next().await {
                report(notification, report_clock.now_unadjusted(), json);
            }
        })
        .map_err(|_| anyhow!("executor was destroyed"))?;

    event_loop
        .handle()
        .insert_source(Timer::immediate(), |_, _, state| {
            if state.tick() {
                state.is_finished = true;
                TimeoutAction::Drop
            } else {
                TimeoutAction::ToDuration(FRAME)
            }
        })
        .map_err(|err| err.error)
        .context("error inserting frame timer")?;

    let mut state = State {
        switch,
        clock,
        script,
        is_finished: false,
    };

    while !state.is_finished {
        event_loop
            .dispatch(None, &mut state)
            .context("error dispatching event loop")?;
    }

    let snapshot = state.switch.snapshot();
    state.switch.dispose();
    // Let the subscription observe the close.
    event_loop
        .dispatch(Some(Duration::ZERO), &mut state)
        .context("error dispatching event loop")?;

    if json {
        println!("{}", serde_json::to_string(&Record::Finished(snapshot))?);
    } else {
        info!("finished in {:?}", snapshot.state);
    }

    Ok(())
}

impl State {
    /// Runs one frame. Returns `true` once the script is done and the switch is at rest.
    fn tick(&mut self) -> bool {
        self.clock.clear();
        self.switch.advance_animations();

        let Some(step) = self.script.front_mut() else {
            return !self.switch.are_animations_ongoing();
        };

        match step {
            Step::Settle => {
                if self.switch.are_animations_ongoing() {
                    return false;
                }
            }
            Step::Idle(frames) if *frames > 0 => {
                *frames -= 1;
                return false;
            }
            _ => (),
        }

        if let Some(step) = self.script.pop_front() {
            self.apply(step);
        }
        false
    }

    fn apply(&mut self, step: Step) {
        trace!("step {step:?}");

        let x = self.switch.layout().width / 2.;
        let time = self.clock.now_unadjusted();
        let pointer = |y| PointerEvent { x, y, time };

        match step {
            Step::Down(y) => self.switch.on_pointer_down(pointer(y)),
            Step::Motion(y) => self.switch.on_pointer_motion(pointer(y)),
            Step::Up(y) => self.switch.on_pointer_up(pointer(y)),
            Step::Gesture(event) => self.switch.handle_gesture(event),
            Step::Idle(_) | Step::Settle => (),
        }
    }
}

fn script(command: Command, switch: &VerticalSwitch) -> VecDeque<Step> {
    let layout = *switch.layout();
    let mut script = VecDeque::new();

    match command {
        Command::Demo => {
            let top = layout.resting_offset(SwitchState::Top);
            let bottom = layout.resting_offset(SwitchState::Bottom);

            // Drag all the way down.
            pointer_drag(&mut script, top, bottom, 8);
            // Tap the upper half.
            pointer_tap(&mut script, layout.height / 4.);
            // Drag a little and let go.
            pointer_drag(&mut script, top, top + layout.height / 8., 3);
            // Tap the lower half.
            pointer_tap(&mut script, layout.height * 3. / 4.);
        }
        Command::Tap { y } => pointer_tap(&mut script, y),
        Command::Drag { dy, vy } => {
            script.push_back(Step::Gesture(GestureEvent::DragBegin));
            for i in 1..=8 {
                script.push_back(Step::Gesture(GestureEvent::DragUpdate {
                    delta_y: dy * f64::from(i) / 8.,
                    velocity_y: vy,
                }));
            }
            script.push_back(Step::Gesture(GestureEvent::DragEnd {
                delta_y: dy,
                velocity_y: vy,
            }));
            script.push_back(Step::Settle);
        }
    }

    script
}

fn pointer_drag(script: &mut VecDeque<Step>, from: f64, to: f64, steps: u32) {
    script.push_back(Step::Down(from));
    for i in 1..=steps {
        script.push_back(Step::Motion(from + (to - from) * f64::from(i) / f64::from(steps)));
    }
    script.push_back(Step::Idle(HOLD_FRAMES));
    script.push_back(Step::Up(to));
    script.push_back(Step::Settle);
}

fn pointer_tap(script: &mut VecDeque<Step>, y: f64) {
    script.push_back(Step::Down(y));
    script.push_back(Step::Idle(2));
    script.push_back(Step::Up(y));
    script.push_back(Step::Settle);
}

fn report(notification: Notification<SwitchState>, time: Duration, json: bool) {
    let time_ms = time.as_millis();

    if json {
        let record = match notification {
            Notification::Changed(state) => Record::Changed { state, time_ms },
            Notification::Closed => Record::Closed { time_ms },
        };
        match serde_json::to_string(&record) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!("error serializing notification: {err:?}"),
        }
        return;
    }

    match notification {
        Notification::Changed(state) => info!("switched to {state:?} at {time_ms} ms"),
        Notification::Closed => info!("notifications closed at {time_ms} ms"),
    }
}
