use std::fmt::Write as _;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use insta::assert_snapshot;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use serde_json::Value;

use super::bounds::constrain_to_container;
use super::snap::{apply_guides, compute_guides};
use super::*;
use crate::clock::Clock;
use crate::utils::geometry::{Point, Rectangle, Size};

const CONTAINER: Size = Size::new(1280., 720.);

fn arbitrary_id() -> impl Strategy<Value = usize> {
    0..5usize
}

fn arbitrary_point() -> impl Strategy<Value = (f64, f64)> {
    (-3000f64..4000., -3000f64..4000.)
}

fn arbitrary_size() -> impl Strategy<Value = (f64, f64)> {
    (1f64..2000., 1f64..2000.)
}

fn arbitrary_velocity() -> impl Strategy<Value = (f64, f64)> {
    (-80f64..80., -80f64..80.)
}

fn arbitrary_container() -> impl Strategy<Value = (f64, f64)> {
    (100f64..3000., 100f64..3000.)
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum InitialState {
    Normal,
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Op {
    Open {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
        #[proptest(strategy = "proptest::option::of(arbitrary_point())")]
        position: Option<(f64, f64)>,
        #[proptest(strategy = "arbitrary_size()")]
        size: (f64, f64),
        state: InitialState,
    },
    Close {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    Minimize {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    Maximize {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    Restore {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    BringToFront {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    MoveWindow {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
        #[proptest(strategy = "arbitrary_point()")]
        position: (f64, f64),
    },
    ResizeWindow {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
        #[proptest(strategy = "arbitrary_size()")]
        size: (f64, f64),
    },
    StartDrag {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    UpdatePosition {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
        #[proptest(strategy = "arbitrary_point()")]
        position: (f64, f64),
        #[proptest(strategy = "proptest::option::of(arbitrary_velocity())")]
        velocity: Option<(f64, f64)>,
    },
    StopDrag {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    PhysicsTick {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    AdvanceMomentum,
    ConstrainToBounds {
        #[proptest(strategy = "arbitrary_id()")]
        id: usize,
    },
    SetContainer {
        #[proptest(strategy = "arbitrary_container()")]
        size: (f64, f64),
    },
    AdvanceClock {
        #[proptest(strategy = "1..1000u64")]
        msec: u64,
    },
    PersistAndHydrate,
    SetFeatures {
        snapping: bool,
        momentum: bool,
    },
}

fn window_id(id: usize) -> WindowId {
    WindowId::new(format!("w{id}"))
}

/// Engine plus the container a host would track next to it.
struct Harness {
    wm: WindowManager,
    container: Size,
}

impl Harness {
    fn new(options: Options) -> Self {
        let clock = Clock::with_time(Duration::ZERO);
        Self {
            wm: WindowManager::with_repository(InMemoryRepository::new(), clock, options),
            container: CONTAINER,
        }
    }
}

impl Op {
    fn apply(self, harness: &mut Harness) {
        let container = harness.container;
        let wm = &mut harness.wm;

        match self {
            Op::Open {
                id,
                position,
                size,
                state,
            } => {
                let state = match state {
                    InitialState::Normal => LifecycleState::Normal,
                    InitialState::Minimized => LifecycleState::Minimized,
                    InitialState::Maximized => LifecycleState::Maximized,
                };
                let mut descriptor = WindowDescriptor::new(window_id(id), size.into(), Value::Null)
                    .with_initial_state(state);
                descriptor.position = position.map(Point::from);
                wm.open(descriptor);
            }
            Op::Close { id } => {
                wm.close(&window_id(id));
            }
            Op::Minimize { id } => {
                wm.minimize(&window_id(id));
            }
            Op::Maximize { id } => {
                wm.maximize(&window_id(id));
            }
            Op::Restore { id } => {
                wm.restore(&window_id(id));
            }
            Op::BringToFront { id } => {
                wm.bring_to_front(&window_id(id));
            }
            Op::MoveWindow { id, position } => {
                let update = WindowUpdate {
                    position: Some(position.into()),
                    ..WindowUpdate::default()
                };
                wm.update_window(&window_id(id), update);
            }
            Op::ResizeWindow { id, size } => {
                let update = WindowUpdate {
                    size: Some(size.into()),
                    ..WindowUpdate::default()
                };
                wm.update_window(&window_id(id), update);
            }
            Op::StartDrag { id } => {
                wm.start_drag(&window_id(id));
            }
            Op::UpdatePosition {
                id,
                position,
                velocity,
            } => {
                let velocity = velocity.map(Point::from);
                wm.update_position(&window_id(id), position.into(), velocity, container);
            }
            Op::StopDrag { id } => {
                wm.stop_drag(&window_id(id), container);
            }
            Op::PhysicsTick { id } => {
                wm.apply_physics_tick(&window_id(id), container);
            }
            Op::AdvanceMomentum => {
                wm.advance_momentum(container);
            }
            Op::ConstrainToBounds { id } => {
                wm.constrain_to_bounds(&window_id(id), container);
            }
            Op::SetContainer { size } => {
                harness.container = size.into();
                wm.constrain_all(harness.container);
            }
            Op::AdvanceClock { msec } => {
                wm.clock().advance(Duration::from_millis(msec));
            }
            Op::PersistAndHydrate => {
                let session = wm.persist();
                wm.hydrate(session);
            }
            Op::SetFeatures { snapping, momentum } => {
                let options = Options {
                    snapping,
                    momentum,
                    ..*wm.options()
                };
                wm.update_options(options);
            }
        }
    }
}

#[track_caller]
fn check_ops_with_options(options: Options, ops: impl IntoIterator<Item = Op>) -> WindowManager {
    let mut harness = Harness::new(options);
    for op in ops {
        op.apply(&mut harness);
        harness.wm.verify_invariants();
    }
    harness.wm
}

#[track_caller]
fn check_ops(ops: impl IntoIterator<Item = Op>) -> WindowManager {
    check_ops_with_options(Options::default(), ops)
}

fn manager() -> WindowManager {
    Harness::new(Options::default()).wm
}

fn open(id: usize) -> Op {
    Op::Open {
        id,
        position: None,
        size: (300., 200.),
        state: InitialState::Normal,
    }
}

fn format_windows(wm: &WindowManager) -> String {
    let mut buf = String::new();
    for win in wm.windows_by_z() {
        let pos = win.position();
        let size = win.size();
        write!(
            buf,
            "{} {:?} z={} at ({}, {}) {}x{}",
            win.id(),
            win.state(),
            win.z_index(),
            pos.x,
            pos.y,
            size.w,
            size.h
        )
        .unwrap();
        if let Some(v) = win.velocity() {
            write!(buf, " moving ({}, {})", v.x, v.y).unwrap();
        }
        if win.is_dragging() {
            buf.push_str(" dragging");
        }
        if wm.is_focused(win.id()) {
            buf.push_str(" focused");
        }
        buf.push('\n');
    }
    buf
}

#[test]
fn cascade_and_focus() {
    let wm = check_ops([
        open(1),
        open(2),
        open(3),
        Op::Minimize { id: 2 },
        Op::BringToFront { id: 1 },
    ]);

    assert_snapshot!(format_windows(&wm), @r"
    w2 Minimized z=2 at (50, 50) 300x200
    w3 Normal z=3 at (80, 80) 300x200
    w1 Normal z=4 at (20, 20) 300x200 focused
    ");
}

#[test]
fn drag_release_and_settle() {
    let wm = check_ops([
        open(1),
        Op::StartDrag { id: 1 },
        Op::UpdatePosition {
            id: 1,
            position: (400., 300.),
            velocity: Some((4., 0.)),
        },
        Op::StopDrag { id: 1 },
        Op::AdvanceMomentum,
    ]);

    assert_snapshot!(
        format_windows(&wm),
        @"w1 Normal z=2 at (403.8, 300) 300x200 moving (3.8, 0) focused"
    );
}

#[test]
fn scenario_a_first_window_at_spacing() {
    let mut wm = manager();
    wm.open(WindowDescriptor::new("w1", Size::new(800., 600.), Value::Null));

    let spacing = wm.options().window_spacing();
    assert_eq!(
        wm.window(&WindowId::new("w1")).unwrap().position(),
        Point::new(spacing.min(800.), spacing.min(600.))
    );
}

#[test]
fn scenario_a_clamped_to_window_size() {
    let mut wm = manager();
    wm.open(WindowDescriptor::new("tiny", Size::new(8., 600.), Value::Null));

    assert_eq!(
        wm.window(&WindowId::new("tiny")).unwrap().position(),
        Point::new(8., 20.)
    );
}

#[test]
fn scenario_b_open_twice() {
    let wm = check_ops([open(1), open(2), open(1)]);

    let count = wm.windows().filter(|win| win.id() == &window_id(1)).count();
    assert_eq!(count, 1);
    assert_eq!(wm.focused_id(), Some(&window_id(1)));
}

#[test]
fn scenario_c_lost_window_recenters() {
    let mut wm = manager();
    let container = Size::new(400., 300.);

    wm.open(WindowDescriptor::new("small", Size::new(100., 100.), Value::Null).at(Point::new(1000., 500.)));
    wm.open(WindowDescriptor::new("big", Size::new(800., 600.), Value::Null).at(Point::new(1000., 500.)));
    wm.constrain_to_bounds(&WindowId::new("small"), container);
    wm.constrain_to_bounds(&WindowId::new("big"), container);

    // x = (400 - 100) / 2, y = (300 - 100) / 2.
    assert_eq!(
        wm.window(&WindowId::new("small")).unwrap().position(),
        Point::new(150., 100.)
    );
    // The centered (-200, -150) doesn't fit, and ends up at the top-left.
    assert_eq!(
        wm.window(&WindowId::new("big")).unwrap().position(),
        Point::new(0., 0.)
    );
}

#[test]
fn scenario_d_release_decays() {
    let options = Options {
        friction: 0.9,
        ..Options::default()
    };
    let mut wm = check_ops_with_options(
        options,
        [
            open(1),
            Op::StartDrag { id: 1 },
            Op::UpdatePosition {
                id: 1,
                position: (100., 100.),
                velocity: Some((10., 0.)),
            },
            Op::StopDrag { id: 1 },
        ],
    );
    let id = window_id(1);
    let container = Size::new(10000., 10000.);

    assert!(wm.apply_physics_tick(&id, container));
    assert_abs_diff_eq!(wm.window(&id).unwrap().velocity().unwrap().x, 9.);

    let mut ticks = 1;
    while wm.apply_physics_tick(&id, container) {
        ticks += 1;
    }
    // Tick 44 is the one that clears the velocity.
    assert_eq!(ticks + 1, 44);
    assert_eq!(wm.window(&id).unwrap().velocity(), None);
}

#[test]
fn scenario_e_minimize_focused() {
    let wm = check_ops([open(1), open(2), Op::Minimize { id: 2 }]);
    assert_eq!(wm.focused_id(), None);
    assert!(wm.focused_window().is_none());
}

#[test]
fn closing_mid_momentum() {
    let wm = check_ops([
        open(1),
        Op::StartDrag { id: 1 },
        Op::UpdatePosition {
            id: 1,
            position: (400., 300.),
            velocity: Some((30., 30.)),
        },
        Op::StopDrag { id: 1 },
        Op::AdvanceMomentum,
        Op::Close { id: 1 },
        Op::AdvanceMomentum,
        Op::PhysicsTick { id: 1 },
    ]);
    assert!(wm.is_empty());
}

#[test]
fn container_shrink_brings_windows_back() {
    let wm = check_ops([
        Op::Open {
            id: 1,
            position: Some((700., 500.)),
            size: (300., 200.),
            state: InitialState::Normal,
        },
        Op::SetContainer { size: (800., 600.) },
    ]);

    // Clamped to (800 - 300, 600 - 200).
    assert_eq!(
        wm.window(&window_id(1)).unwrap().position(),
        Point::new(500., 400.)
    );
}

#[test]
fn hydrate_after_reload() {
    let wm = check_ops([
        open(1),
        open(2),
        Op::Maximize { id: 1 },
        Op::StartDrag { id: 2 },
        Op::PersistAndHydrate,
    ]);

    assert_snapshot!(format_windows(&wm), @r"
    w1 Maximized z=1 at (20, 20) 300x200
    w2 Normal z=2 at (50, 50) 300x200
    ");
}

#[test]
fn disabling_features_mid_session() {
    let mut wm = check_ops([
        open(1),
        open(2),
        Op::UpdatePosition {
            id: 2,
            position: (403., 297.),
            velocity: None,
        },
        Op::StartDrag { id: 1 },
        Op::UpdatePosition {
            id: 1,
            position: (100., 100.),
            velocity: Some((20., 0.)),
        },
        Op::StopDrag { id: 1 },
        Op::AdvanceMomentum,
    ]);
    assert!(wm.are_momentum_animations_ongoing());
    assert!(!wm.window(&window_id(2)).unwrap().snap_guides().is_empty());

    wm.update_options(Options {
        snapping: false,
        momentum: false,
        ..Options::default()
    });
    wm.verify_invariants();

    assert!(!wm.are_momentum_animations_ongoing());
    assert!(wm.windows().all(|win| win.snap_guides().is_empty()));
    // Windows stay where they were.
    let w1 = wm.window(&window_id(1)).unwrap().position();
    assert_eq!(w1.y, 100.);
    assert!(w1.x > 100.);
    assert_eq!(
        wm.window(&window_id(2)).unwrap().position(),
        Point::new(400., 300.)
    );
}

#[test]
fn disabled_snapping_and_momentum() {
    let options = Options {
        snapping: false,
        momentum: false,
        ..Options::default()
    };
    let wm = check_ops_with_options(
        options,
        [
            open(1),
            Op::StartDrag { id: 1 },
            Op::UpdatePosition {
                id: 1,
                position: (403., 297.),
                velocity: Some((30., 0.)),
            },
            Op::StopDrag { id: 1 },
        ],
    );

    assert_snapshot!(
        format_windows(&wm),
        @"w1 Normal z=2 at (403, 297) 300x200 focused"
    );
}

proptest! {
    #[test]
    fn random_operations_dont_panic(ops: Vec<Op>, snapping: bool, momentum: bool) {
        let options = Options {
            snapping,
            momentum,
            ..Options::default()
        };
        check_ops_with_options(options, ops);
    }
}

proptest! {
    #[test]
    fn open_is_idempotent(ops in any::<Vec<Op>>(), id in arbitrary_id()) {
        let mut wm = check_ops(ops.iter().copied().chain([open(id)]));
        let len = wm.len();

        wm.open(WindowDescriptor::new(window_id(id), Size::new(10., 10.), Value::Null));
        prop_assert_eq!(wm.len(), len);
        prop_assert_eq!(wm.focused_id(), Some(&window_id(id)));
        prop_assert!(!wm.window(&window_id(id)).unwrap().is_minimized());
        wm.verify_invariants();
    }

    #[test]
    fn focus_always_on_top(
        ops in proptest::collection::vec(
            prop_oneof![
                (arbitrary_id(), arbitrary_size()).prop_map(|(id, size)| Op::Open {
                    id,
                    position: None,
                    size,
                    state: InitialState::Normal,
                }),
                arbitrary_id().prop_map(|id| Op::BringToFront { id }),
                arbitrary_id().prop_map(|id| Op::Maximize { id }),
            ],
            1..50,
        )
    ) {
        let wm = check_ops([open(0)].into_iter().chain(ops));
        let focused = wm.focused_window().unwrap();
        for win in wm.windows() {
            if win.id() != focused.id() {
                prop_assert!(win.z_index() < focused.z_index());
            }
        }
    }

    #[test]
    fn constraining_is_idempotent(
        pos in arbitrary_point(),
        size in arbitrary_size(),
        container in arbitrary_container(),
    ) {
        let (pos, size, container) = (Point::from(pos), Size::from(size), Size::from(container));
        let once = constrain_to_container(pos, size, container);
        let twice = constrain_to_container(once, size, container);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn snap_threshold_is_symmetric(
        line in -50i32..50,
        eps in 0.001f64..1.,
        below in any::<bool>(),
    ) {
        // Spacing 0 puts the left edge guide on a grid line, out of the way.
        let options = Options {
            grid_size: 100.,
            window_spacing: 0.,
            ..Options::default()
        };
        let grid = options.grid_size;
        let threshold = options.snap_threshold;
        let offset = if below { -1. } else { 1. };

        let value = f64::from(line) * grid;
        let alone: Vec<(&WindowId, Rectangle)> = Vec::new();
        let y = 2.5 * grid;
        let size = Size::new(1., 1.);
        let container = Size::new(1e6, 1e6);

        let inside = Point::new(value + offset * (threshold - eps), y);
        let guides = compute_guides(inside, size, container, alone.clone(), &options);
        prop_assert_eq!(apply_guides(inside, &guides, threshold).x, value);

        let outside = Point::new(value + offset * (threshold + eps), y);
        let guides = compute_guides(outside, size, container, alone, &options);
        prop_assert_eq!(apply_guides(outside, &guides, threshold).x, outside.x);
    }

    #[test]
    fn momentum_converges(
        v in arbitrary_velocity(),
        friction in 0.05f64..0.99,
    ) {
        let options = Options {
            friction,
            snapping: false,
            ..Options::default()
        };
        let start = Point::new(1e4, 1e4);
        let container = Size::new(2e4, 2e4);

        let mut wm = Harness::new(options).wm;
        let id = WindowId::new("w");
        wm.open(WindowDescriptor::new(id.clone(), Size::new(10., 10.), Value::Null).at(start));
        wm.start_drag(&id);
        wm.update_position(&id, start, Some(v.into()), container);
        wm.stop_drag(&id, container);

        let mut ticks = 0;
        while wm.apply_physics_tick(&id, container) {
            ticks += 1;
            prop_assert!(ticks < 100_000);
        }

        let end = wm.window(&id).unwrap().position();
        let bound = friction / (1. - friction);
        prop_assert!((end.x - start.x).abs() <= v.0.abs() * bound + 1e-6);
        prop_assert!((end.y - start.y).abs() <= v.1.abs() * bound + 1e-6);
    }
}
