//! Timing scenarios for `DebounceTimer`, run on virtual time.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use input_timeout::{
    DebounceTimer, EventQueue, InputSignal, ManualClock, TimeoutBuilder, TimeoutSettings,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// A 500 ms timer that records the virtual time of every callback.
fn recording_timer(
    clock: &ManualClock,
) -> (DebounceTimer<ManualClock>, Rc<RefCell<Vec<Duration>>>) {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let (log, now) = (fired.clone(), clock.clone());
    let timer = DebounceTimer::new(clock.clone(), ms(500), move || {
        log.borrow_mut().push(now.now())
    });
    (timer, fired)
}

#[test]
fn burst_of_activity_fires_once_after_last_call() {
    let clock = ManualClock::new();
    let (timer, fired) = recording_timer(&clock);

    timer.notify_activity();
    clock.advance_to(ms(100));
    timer.notify_activity();
    clock.advance_to(ms(200));
    timer.notify_activity();

    clock.advance_to(ms(500));
    assert!(fired.borrow().is_empty(), "must not fire at 500");
    clock.advance_to(ms(600));
    assert!(fired.borrow().is_empty(), "must not fire at 600");
    clock.advance_to(ms(2_000));
    assert_eq!(*fired.borrow(), vec![ms(700)]);
}

#[test]
fn cancel_before_deadline_never_fires() {
    let clock = ManualClock::new();
    let (timer, fired) = recording_timer(&clock);

    timer.notify_activity();
    clock.advance_to(ms(100));
    timer.cancel();

    clock.advance_to(ms(10_000));
    assert!(fired.borrow().is_empty());
    assert!(!timer.is_armed());
}

#[test]
fn immediate_trigger_fires_now_and_not_again() {
    let clock = ManualClock::new();
    let (timer, fired) = recording_timer(&clock);

    timer.notify_activity();
    clock.advance_to(ms(50));
    timer.notify_immediate();
    assert_eq!(*fired.borrow(), vec![ms(50)], "fires synchronously");

    clock.advance_to(ms(10_000));
    assert_eq!(*fired.borrow(), vec![ms(50)]);
}

#[test]
fn spaced_out_activity_fires_each_cycle() {
    let clock = ManualClock::new();
    let (timer, fired) = recording_timer(&clock);

    timer.notify_activity();
    clock.advance_to(ms(1_000));
    timer.notify_activity();
    clock.advance_to(ms(1_200));
    timer.notify_activity();
    clock.advance_to(ms(3_000));

    assert_eq!(*fired.borrow(), vec![ms(500), ms(1_700)]);
}

#[test]
fn double_cancel_equals_single_cancel() {
    let clock = ManualClock::new();
    let (once, fired_once) = recording_timer(&clock);
    let (twice, fired_twice) = recording_timer(&clock);

    once.notify_activity();
    twice.notify_activity();
    once.cancel();
    twice.cancel();
    twice.cancel();
    clock.advance(ms(1_000));

    assert_eq!(once.is_armed(), twice.is_armed());
    assert_eq!(*fired_once.borrow(), *fired_twice.borrow());
    assert!(fired_twice.borrow().is_empty());
}

#[test]
fn independent_bindings_emit_to_one_queue() {
    let clock = ManualClock::new();
    let queue = EventQueue::new();
    let search = TimeoutBuilder::new(TimeoutSettings::default())
        .emit_to(queue.clone(), "search")
        .build(clock.clone())
        .unwrap();
    let settings = TimeoutSettings::from_json(r#"{"delay_ms": 200}"#).unwrap();
    let comment = TimeoutBuilder::new(settings)
        .emit_to(queue.clone(), "comment")
        .build(clock.clone())
        .unwrap();

    search.handle(InputSignal::Edited, "rust");
    comment.handle(InputSignal::Edited, "hello");
    clock.advance(ms(1_000));

    let names: Vec<String> = std::iter::from_fn(|| queue.try_recv())
        .map(|event| event.name)
        .collect();
    assert_eq!(names, vec!["comment", "search"]);
}
