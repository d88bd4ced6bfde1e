//! The widget: three engines behind one view router.
//!
//! `Widget` owns the stopwatch, the countdown and the pomodoro, the callback
//! registry that drives them, and the collaborators they talk to (clock,
//! alarm, settings store). Every input arrives as a [`Command`], either
//! directly through [`Widget::dispatch`] or via the key and voice routers, and
//! every state change comes back out as [`Event`]s.
//!
//! The owner runs the loop: call [`Widget::poll`] whenever
//! [`Widget::next_due`] has passed.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::audio::{play_alarm, AudioPlayer};
use crate::clock::Clock;
use crate::error::{ExportError, Result};
use crate::events::Event;
use crate::laps::{export_csv, LapAnalytics};
use crate::router::{command_for_key, Command, Key, View, VoiceRouter};
use crate::scheduler::{Task, TaskHandle, TickScheduler};
use crate::snapshot::Snapshot;
use crate::storage::{EngineTiming, KeyValueStore, Settings, SettingsStore, Theme};
use crate::timer::{Countdown, EngineKind, Pomodoro, Stopwatch};

/// Live registrations, one slot per engine plus the pending loop restart.
#[derive(Debug, Default)]
struct Handles {
    stopwatch: Option<TaskHandle>,
    timer: Option<TaskHandle>,
    pomodoro: Option<TaskHandle>,
    loop_restart: Option<TaskHandle>,
}

impl Handles {
    fn slot(&mut self, engine: EngineKind) -> &mut Option<TaskHandle> {
        match engine {
            EngineKind::Stopwatch => &mut self.stopwatch,
            EngineKind::Timer => &mut self.timer,
            EngineKind::Pomodoro => &mut self.pomodoro,
        }
    }

    fn owns(&self, engine: EngineKind, handle: TaskHandle) -> bool {
        let slot = match engine {
            EngineKind::Stopwatch => self.stopwatch,
            EngineKind::Timer => self.timer,
            EngineKind::Pomodoro => self.pomodoro,
        };
        slot == Some(handle)
    }
}

pub struct Widget<S: KeyValueStore> {
    view: View,
    stopwatch: Stopwatch,
    countdown: Countdown,
    pomodoro: Pomodoro,
    scheduler: TickScheduler,
    handles: Handles,
    settings: Settings,
    store: SettingsStore<S>,
    timing: EngineTiming,
    clock: Box<dyn Clock>,
    audio: Box<dyn AudioPlayer>,
    /// `None` when no speech provider is available.
    voice: Option<VoiceRouter>,
    celebrations: bool,
}

impl<S: KeyValueStore> Widget<S> {
    /// Build a widget from persisted state.
    ///
    /// Settings load with per-key defaults. A stopwatch saved by an earlier
    /// session is restored, and resumes redrawing if it was running.
    pub fn new(
        store: SettingsStore<S>,
        timing: EngineTiming,
        clock: Box<dyn Clock>,
        audio: Box<dyn AudioPlayer>,
    ) -> Self {
        let settings = store.load();
        let mut countdown = Countdown::new(timing.timer_step_ms);
        countdown.set_loop(settings.timer_loop);
        let pomodoro = Pomodoro::new(settings.durations, settings.counters)
            .with_step_ms(timing.pomodoro_step_ms);
        let stopwatch = store.load_stopwatch().unwrap_or_default();

        let mut widget = Self {
            view: View::default(),
            stopwatch,
            countdown,
            pomodoro,
            scheduler: TickScheduler::new(),
            handles: Handles::default(),
            settings,
            store,
            timing,
            clock,
            audio,
            voice: Some(VoiceRouter::default()),
            celebrations: true,
        };
        if widget.stopwatch.is_running() {
            let now = widget.clock.now_ms();
            widget.stopwatch.tick(now);
            widget.arm(EngineKind::Stopwatch, now);
        }
        widget
    }

    /// Replace the phrase table, or disable voice with `None`.
    pub fn with_voice(mut self, voice: Option<VoiceRouter>) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_celebrations(mut self, enabled: bool) -> Self {
        self.celebrations = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn view(&self) -> View {
        self.view
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn pomodoro(&self) -> &Pomodoro {
        &self.pomodoro
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timing(&self) -> EngineTiming {
        self.timing
    }

    pub fn voice_available(&self) -> bool {
        self.voice.is_some()
    }

    /// Clock reading at which the next registration fires.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn analytics(&self) -> LapAnalytics {
        LapAnalytics::from_ledger(self.stopwatch.ledger())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.view,
            &self.stopwatch,
            &self.countdown,
            &self.pomodoro,
            &self.settings,
            self.voice.is_some(),
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        self.apply(command, now, &mut events);
        events
    }

    /// Route one keypress against the active view.
    pub fn press_key(&mut self, key: Key) -> Vec<Event> {
        match command_for_key(key, self.view) {
            Some(command) => self.dispatch(command),
            None => Vec::new(),
        }
    }

    /// Route a final speech transcript. Ignored when voice is unavailable.
    pub fn hear(&mut self, transcript: &str) -> Vec<Event> {
        let commands = match &self.voice {
            Some(router) => router.route(transcript, self.view),
            None => return Vec::new(),
        };
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        for command in commands {
            self.apply(command, now, &mut events);
        }
        events
    }

    /// Run every registration that is due at the current clock reading.
    pub fn poll(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        for (handle, task) in self.scheduler.poll(now) {
            match task {
                Task::StopwatchRedraw => {
                    if self.handles.owns(EngineKind::Stopwatch, handle) {
                        self.stopwatch.tick(now);
                    }
                }
                Task::TimerTick => {
                    if !self.handles.owns(EngineKind::Timer, handle) {
                        continue;
                    }
                    if let Some(event) = self.countdown.tick() {
                        self.on_timer_expired(event, now, &mut events);
                    }
                }
                Task::PomodoroTick => {
                    if !self.handles.owns(EngineKind::Pomodoro, handle) {
                        continue;
                    }
                    if let Some(event) = self.pomodoro.tick() {
                        self.on_phase_completed(event, &mut events);
                    }
                }
                Task::TimerLoopRestart => {
                    if self.handles.loop_restart != Some(handle) {
                        continue;
                    }
                    self.handles.loop_restart = None;
                    if self.view == View::Timer {
                        events.extend(self.start(EngineKind::Timer, now));
                    } else {
                        tracing::debug!(view = %self.view, "loop restart skipped off the timer view");
                    }
                }
                Task::DeferredStart(engine) => {
                    events.extend(self.start(engine, now));
                }
            }
        }
        events
    }

    /// Write the lap ledger to `<dir>/timemaster_laps.csv`. `Ok(None)` when
    /// there is nothing to export.
    pub fn export_laps(&self, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
        export_csv(self.stopwatch.ledger(), dir)
    }

    /// Persist the stopwatch so the next session can restore it.
    pub fn save_session(&self) -> Result<()> {
        self.store.save_stopwatch(&self.stopwatch)
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.settings.dark_mode = enabled;
        self.store.save(&self.settings)
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let enabled = !self.settings.dark_mode;
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.settings.theme = theme;
        self.store.save(&self.settings)
    }

    /// Clamped to 0..=100.
    pub fn set_alarm_volume(&mut self, volume: i64) -> Result<()> {
        self.settings.set_alarm_volume(volume);
        self.store.save(&self.settings)
    }

    pub fn set_timer_loop(&mut self, enabled: bool) -> Result<()> {
        self.settings.timer_loop = enabled;
        self.countdown.set_loop(enabled);
        if !enabled {
            self.cancel_loop_restart();
        }
        self.store.save(&self.settings)
    }

    /// Each length is clamped to 1..=180 minutes. An idle pomodoro that has
    /// not started its phase picks the new length up immediately.
    pub fn set_pomodoro_minutes(&mut self, work: i64, short_break: i64, long_break: i64) -> Result<()> {
        self.settings.set_durations(work, short_break, long_break);
        self.pomodoro.set_durations(self.settings.durations);
        self.store.save(&self.settings)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn apply(&mut self, command: Command, now: u64, events: &mut Vec<Event>) {
        tracing::debug!(?command, view = %self.view, "dispatch");
        match command {
            Command::Start(engine) => events.extend(self.start(engine, now)),
            Command::Pause(engine) => events.extend(self.pause(engine, now)),
            Command::Toggle(engine) => {
                let event = if self.is_running(engine) {
                    self.pause(engine, now)
                } else {
                    self.start(engine, now)
                };
                events.extend(event);
            }
            Command::Reset(engine) => events.extend(self.reset(engine)),
            Command::RecordLap => events.extend(self.stopwatch.record_lap(now)),
            Command::RecordSplit => events.extend(self.stopwatch.record_split(now)),
            Command::ClearLaps => events.extend(self.stopwatch.clear_laps()),
            Command::Skip => {
                self.disarm(EngineKind::Pomodoro);
                if let Some(event) = self.pomodoro.skip() {
                    self.persist_counters();
                    events.push(event);
                }
            }
            Command::SwitchView(to) => {
                if to != self.view {
                    let from = self.view;
                    self.view = to;
                    tracing::debug!(%from, %to, "view switched");
                    events.push(Event::ViewSwitched {
                        from,
                        to,
                        at: Utc::now(),
                    });
                }
            }
            Command::DeferredStart(engine) => {
                self.scheduler.schedule_once(
                    Task::DeferredStart(engine),
                    self.timing.voice_start_delay_ms,
                    now,
                );
            }
            Command::SetTimerPreset(seconds) => {
                if !self.countdown.set_preset(seconds) {
                    tracing::debug!(seconds, "preset ignored while the timer runs");
                }
            }
            Command::SetTimerInputs(inputs) => {
                if !self.countdown.set_inputs(inputs) {
                    tracing::debug!("timer inputs are locked");
                }
            }
            Command::SetTimerField(field, text) => {
                if !self.countdown.set_field_text(field, &text) {
                    tracing::debug!(?field, "timer inputs are locked");
                }
            }
        }
    }

    fn is_running(&self, engine: EngineKind) -> bool {
        match engine {
            EngineKind::Stopwatch => self.stopwatch.is_running(),
            EngineKind::Timer => self.countdown.is_running(),
            EngineKind::Pomodoro => self.pomodoro.is_running(),
        }
    }

    fn start(&mut self, engine: EngineKind, now: u64) -> Option<Event> {
        let event = match engine {
            EngineKind::Stopwatch => self.stopwatch.start(now),
            EngineKind::Timer => {
                self.cancel_loop_restart();
                if !self.countdown.is_running() && self.countdown.remaining_ms() == 0 {
                    // A fresh run clears the previous expiry message.
                    self.countdown.reset();
                }
                self.countdown.start()
            }
            EngineKind::Pomodoro => self.pomodoro.start(),
        }?;
        self.arm(engine, now);
        Some(event)
    }

    fn pause(&mut self, engine: EngineKind, now: u64) -> Option<Event> {
        let event = match engine {
            EngineKind::Stopwatch => self.stopwatch.pause(now),
            EngineKind::Timer => {
                let event = self.countdown.pause();
                if event.is_some() {
                    self.cancel_loop_restart();
                }
                event
            }
            EngineKind::Pomodoro => self.pomodoro.pause(),
        };
        self.disarm(engine);
        event
    }

    fn reset(&mut self, engine: EngineKind) -> Option<Event> {
        self.disarm(engine);
        match engine {
            EngineKind::Stopwatch => self.stopwatch.reset(),
            EngineKind::Timer => {
                self.cancel_loop_restart();
                self.countdown.reset()
            }
            EngineKind::Pomodoro => self.pomodoro.reset(),
        }
    }

    /// Register the engine's repeating callback, replacing any previous one.
    fn arm(&mut self, engine: EngineKind, now: u64) {
        self.disarm(engine);
        let (task, period) = match engine {
            EngineKind::Stopwatch => (Task::StopwatchRedraw, self.timing.stopwatch_redraw_ms),
            EngineKind::Timer => (Task::TimerTick, self.timing.timer_step_ms),
            EngineKind::Pomodoro => (Task::PomodoroTick, self.timing.pomodoro_step_ms),
        };
        let handle = self.scheduler.schedule_repeating(task, period, now);
        *self.handles.slot(engine) = Some(handle);
    }

    fn disarm(&mut self, engine: EngineKind) {
        if let Some(handle) = self.handles.slot(engine).take() {
            self.scheduler.cancel(handle);
        }
    }

    fn cancel_loop_restart(&mut self) {
        if let Some(handle) = self.handles.loop_restart.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn on_timer_expired(&mut self, expired: Event, now: u64, events: &mut Vec<Event>) {
        self.disarm(EngineKind::Timer);
        events.push(expired);
        self.ring(events);
        self.celebrate(EngineKind::Timer, events);
        if self.countdown.loop_enabled() {
            let handle = self.scheduler.schedule_once(
                Task::TimerLoopRestart,
                self.timing.loop_restart_delay_ms,
                now,
            );
            self.handles.loop_restart = Some(handle);
        }
    }

    fn on_phase_completed(&mut self, advanced: Event, events: &mut Vec<Event>) {
        self.disarm(EngineKind::Pomodoro);
        self.persist_counters();
        events.push(advanced);
        self.ring(events);
        self.celebrate(EngineKind::Pomodoro, events);
    }

    fn ring(&mut self, events: &mut Vec<Event>) {
        play_alarm(self.audio.as_mut(), self.settings.volume_fraction());
        events.push(Event::AlarmRequested {
            volume: self.settings.alarm_volume,
            at: Utc::now(),
        });
    }

    fn celebrate(&self, engine: EngineKind, events: &mut Vec<Event>) {
        if self.celebrations {
            events.push(Event::Celebrate {
                engine,
                at: Utc::now(),
            });
        }
    }

    fn persist_counters(&mut self) {
        self.settings.counters = self.pomodoro.counters();
        if let Err(e) = self.store.save_counters(self.settings.counters) {
            tracing::warn!(error = %e, "failed to persist pomodoro counters");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silent;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use crate::timer::{CountdownState, DurationInputs, Phase, PomodoroState};

    fn widget() -> (Widget<MemoryStore>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let w = Widget::new(
            SettingsStore::new(MemoryStore::new()),
            EngineTiming::default(),
            Box::new(clock.clone()),
            Box::new(Silent),
        );
        (w, clock)
    }

    /// Advance the clock in `step` increments, polling after each.
    fn run_for(w: &mut Widget<MemoryStore>, clock: &ManualClock, total: u64, step: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let mut spent = 0;
        while spent < total {
            clock.advance(step);
            spent += step;
            events.extend(w.poll());
        }
        events
    }

    #[test]
    fn space_toggles_the_stopwatch_and_redraws() {
        let (mut w, clock) = widget();
        let events = w.press_key(Key::new(' '));
        assert!(matches!(events[0], Event::EngineStarted { engine: EngineKind::Stopwatch, .. }));
        run_for(&mut w, &clock, 1_000, 16);
        assert!(w.stopwatch().elapsed_ms() >= 990);

        w.press_key(Key::new(' '));
        assert!(!w.stopwatch().is_running());
        assert!(w.next_due().is_none());
    }

    #[test]
    fn double_start_registers_one_callback() {
        let (mut w, _clock) = widget();
        w.dispatch(Command::Start(EngineKind::Stopwatch));
        assert!(w.dispatch(Command::Start(EngineKind::Stopwatch)).is_empty());
        assert!(w.handles.stopwatch.is_some());
        w.dispatch(Command::Pause(EngineKind::Stopwatch));
        assert!(w.scheduler.is_empty());
    }

    #[test]
    fn timer_expiry_rings_once_and_stops() {
        let (mut w, clock) = widget();
        w.dispatch(Command::SetTimerPreset(1));
        w.dispatch(Command::SwitchView(View::Timer));
        w.press_key(Key::new(' '));
        let events = run_for(&mut w, &clock, 1_500, 10);
        let expired = events
            .iter()
            .filter(|e| matches!(e, Event::TimerExpired { .. }))
            .count();
        let alarms = events
            .iter()
            .filter(|e| matches!(e, Event::AlarmRequested { volume: 50, .. }))
            .count();
        assert_eq!((expired, alarms), (1, 1));
        assert_eq!(w.countdown().state(), CountdownState::Expired);
        assert!(w.countdown().expired_notice());
        assert!(w.next_due().is_none());
    }

    #[test]
    fn zero_inputs_do_not_start_the_timer() {
        let (mut w, _clock) = widget();
        w.dispatch(Command::SwitchView(View::Timer));
        assert!(w.press_key(Key::new(' ')).is_empty());
        assert!(w.next_due().is_none());
    }

    #[test]
    fn loop_mode_restarts_after_the_delay() {
        let (mut w, clock) = widget();
        w.set_timer_loop(true).unwrap();
        w.dispatch(Command::SwitchView(View::Timer));
        w.dispatch(Command::SetTimerInputs(DurationInputs::new(0, 0, 1)));
        w.dispatch(Command::Start(EngineKind::Timer));
        run_for(&mut w, &clock, 1_000, 10);
        assert_eq!(w.countdown().state(), CountdownState::Expired);

        let events = run_for(&mut w, &clock, 1_000, 10);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::EngineStarted { engine: EngineKind::Timer, value_ms: 1_000, .. })));
        assert!(w.countdown().is_running());
        assert!(!w.countdown().expired_notice());
    }

    #[test]
    fn loop_restart_is_skipped_off_the_timer_view() {
        let (mut w, clock) = widget();
        w.set_timer_loop(true).unwrap();
        w.dispatch(Command::SwitchView(View::Timer));
        w.dispatch(Command::SetTimerPreset(1));
        w.dispatch(Command::Start(EngineKind::Timer));
        run_for(&mut w, &clock, 1_000, 10);
        w.dispatch(Command::SwitchView(View::Stopwatch));
        run_for(&mut w, &clock, 1_500, 10);
        assert_eq!(w.countdown().state(), CountdownState::Expired);
    }

    #[test]
    fn reset_cancels_a_pending_loop_restart() {
        let (mut w, clock) = widget();
        w.set_timer_loop(true).unwrap();
        w.dispatch(Command::SwitchView(View::Timer));
        w.dispatch(Command::SetTimerPreset(1));
        w.dispatch(Command::Start(EngineKind::Timer));
        run_for(&mut w, &clock, 1_000, 10);
        w.press_key(Key::new('r'));
        run_for(&mut w, &clock, 1_500, 10);
        assert_eq!(w.countdown().state(), CountdownState::Idle);
        assert!(w.next_due().is_none());
    }

    #[test]
    fn disabling_loop_mode_cancels_a_pending_restart() {
        let (mut w, clock) = widget();
        w.set_timer_loop(true).unwrap();
        w.dispatch(Command::SwitchView(View::Timer));
        w.dispatch(Command::SetTimerPreset(1));
        w.dispatch(Command::Start(EngineKind::Timer));
        run_for(&mut w, &clock, 1_000, 10);
        assert!(w.next_due().is_some());

        w.set_timer_loop(false).unwrap();
        assert!(w.next_due().is_none());
        run_for(&mut w, &clock, 1_500, 10);
        assert_eq!(w.countdown().state(), CountdownState::Expired);
    }

    #[test]
    fn pausing_an_expired_timer_keeps_the_loop_restart() {
        let (mut w, clock) = widget();
        w.set_timer_loop(true).unwrap();
        w.dispatch(Command::SwitchView(View::Timer));
        w.dispatch(Command::SetTimerPreset(1));
        w.dispatch(Command::Start(EngineKind::Timer));
        run_for(&mut w, &clock, 1_000, 10);

        assert!(w.hear("stop timer").is_empty());
        run_for(&mut w, &clock, 1_000, 10);
        assert!(w.countdown().is_running());
    }

    #[test]
    fn pomodoro_counts_real_seconds_at_a_faster_step() {
        let clock = ManualClock::new(0);
        let timing = EngineTiming {
            pomodoro_step_ms: 100,
            ..EngineTiming::default()
        };
        let mut w = Widget::new(
            SettingsStore::new(MemoryStore::new()),
            timing,
            Box::new(clock.clone()),
            Box::new(Silent),
        );
        w.set_pomodoro_minutes(1, 1, 1).unwrap();
        w.dispatch(Command::Start(EngineKind::Pomodoro));

        let events = run_for(&mut w, &clock, 6_000, 100);
        assert!(events.is_empty());
        assert_eq!(w.pomodoro().remaining_secs(), 54);

        let events = run_for(&mut w, &clock, 54_000, 100);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PhaseAdvanced { from: Phase::Work, skipped: false, .. })));
        assert_eq!(w.pomodoro().phase(), Phase::ShortBreak);
    }

    #[test]
    fn pomodoro_completion_advances_and_persists_counters() {
        let (mut w, clock) = widget();
        w.set_pomodoro_minutes(1, 1, 1).unwrap();
        w.dispatch(Command::SwitchView(View::Pomodoro));
        w.press_key(Key::new(' '));
        let events = run_for(&mut w, &clock, 60_000, 1_000);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PhaseAdvanced { from: Phase::Work, to: Phase::ShortBreak, skipped: false, .. }
        )));
        assert!(events.iter().any(|e| matches!(e, Event::AlarmRequested { .. })));
        assert_eq!(w.pomodoro().state(), PomodoroState::Idle);
        assert_eq!(w.store.load().counters.sessions_completed, 1);
        assert_eq!(w.store.load().counters.breaks_taken, 1);
    }

    #[test]
    fn skip_advances_without_the_alarm() {
        let (mut w, _clock) = widget();
        w.dispatch(Command::SwitchView(View::Pomodoro));
        w.press_key(Key::new(' '));
        let events = w.press_key(Key::new('n'));
        assert!(matches!(events[..], [Event::PhaseAdvanced { skipped: true, .. }]));
        assert!(w.next_due().is_none());
        assert_eq!(w.store.load().counters.sessions_completed, 1);
    }

    #[test]
    fn voice_start_switches_view_then_starts_after_the_delay() {
        let (mut w, clock) = widget();
        w.dispatch(Command::SetTimerPreset(60));
        let events = w.hear("start timer");
        assert!(matches!(events[..], [Event::ViewSwitched { to: View::Timer, .. }]));
        assert!(!w.countdown().is_running());

        clock.advance(299);
        assert!(w.poll().is_empty());
        clock.advance(1);
        let events = w.poll();
        assert!(matches!(events[..], [Event::EngineStarted { engine: EngineKind::Timer, .. }]));
    }

    #[test]
    fn voice_is_ignored_without_a_provider() {
        let (w, _clock) = widget();
        let mut w = w.with_voice(None);
        assert!(w.hear("start").is_empty());
        assert!(!w.snapshot().voice_available);
    }

    #[test]
    fn laps_come_from_keys_on_the_stopwatch_view_only() {
        let (mut w, clock) = widget();
        w.press_key(Key::new(' '));
        run_for(&mut w, &clock, 2_000, 16);
        w.press_key(Key::new('l'));
        w.dispatch(Command::SwitchView(View::Timer));
        assert!(w.press_key(Key::new('l')).is_empty());
        assert_eq!(w.stopwatch().ledger().len(), 1);
        assert_eq!(w.analytics().lap_count, 1);
    }

    #[test]
    fn stopwatch_survives_a_restart_through_the_store() {
        let kv = std::rc::Rc::new(MemoryStore::new());
        let clock = ManualClock::new(10_000);
        let mut w = Widget::new(
            SettingsStore::new(kv.clone()),
            EngineTiming::default(),
            Box::new(clock.clone()),
            Box::new(Silent),
        );
        w.dispatch(Command::Start(EngineKind::Stopwatch));
        clock.advance(5_000);
        w.dispatch(Command::RecordLap);
        w.save_session().unwrap();
        drop(w);

        clock.advance(1_000);
        let restored = Widget::new(
            SettingsStore::new(kv),
            EngineTiming::default(),
            Box::new(clock.clone()),
            Box::new(Silent),
        );
        assert!(restored.stopwatch().is_running());
        assert_eq!(restored.stopwatch().elapsed_ms(), 6_000);
        assert_eq!(restored.stopwatch().ledger().len(), 1);
        assert!(restored.next_due().is_some());
    }

    #[test]
    fn preferences_persist() {
        let (mut w, _clock) = widget();
        assert!(w.toggle_dark_mode().unwrap());
        w.set_theme(Theme::Sunset).unwrap();
        w.set_alarm_volume(140).unwrap();
        let loaded = w.store.load();
        assert!(loaded.dark_mode);
        assert_eq!(loaded.theme, Theme::Sunset);
        assert_eq!(loaded.alarm_volume, 100);
    }
}
