//! Tests for status aggregation over unit trees

use std::cell::RefCell;
use std::rc::Rc;

use rstest::rstest;

use launchkit::domain::{LocalStatus, RunResult, StatusWidth, Unit, UnitRef};
use launchkit::local_status;
use launchkit::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

struct Probe {
    local: Option<u32>,
    width: StatusWidth,
    dependencies: Vec<UnitRef>,
}

impl Probe {
    fn weighted(width: u32, local: Option<u32>) -> Self {
        Self {
            local,
            width: StatusWidth::Weighted(width),
            dependencies: Vec::new(),
        }
    }

    fn opaque(local: Option<u32>) -> Self {
        Self {
            local,
            width: StatusWidth::Opaque,
            dependencies: Vec::new(),
        }
    }

    fn with(mut self, dependency: Probe) -> Self {
        self.dependencies.push(Rc::new(RefCell::new(dependency)));
        self
    }
}

impl Unit for Probe {
    fn run(&mut self) -> RunResult {
        Ok(())
    }

    fn local_status(&self) -> Option<u32> {
        self.local
    }

    fn status_width(&self) -> StatusWidth {
        self.width
    }

    fn dependencies(&self) -> &[UnitRef] {
        &self.dependencies
    }
}

#[rstest]
#[case(None)]
#[case(Some(0))]
fn given_leaf_without_failure_when_aggregating_then_zero(#[case] local: Option<u32>) {
    assert_eq!(Probe::weighted(3, local).status_code(), 0);
}

#[rstest]
#[case(1)]
#[case(2)]
fn given_local_failure_when_aggregating_then_ordinal_returned(#[case] ordinal: u32) {
    let unit = Probe::weighted(3, Some(ordinal)).with(Probe::weighted(4, Some(3)));
    assert_eq!(unit.status_code(), ordinal);
}

#[test]
fn given_all_dependencies_succeed_when_aggregating_then_zero() {
    let unit = Probe::weighted(2, Some(0))
        .with(Probe::weighted(3, None))
        .with(Probe::opaque(Some(0)));
    assert_eq!(unit.status_code(), 0);
}

#[test]
fn given_failing_dependency_when_aggregating_then_offset_by_preceding_slots() {
    // Arrange: own width 2, then [width 3 ok], [width 4 failing with 3]
    let unit = Probe::weighted(2, None)
        .with(Probe::weighted(3, None))
        .with(Probe::weighted(4, Some(3)));

    // Act / Assert
    assert_eq!(unit.status_code(), 2 + 3 + 3);
}

#[test]
fn given_opaque_failing_dependency_when_aggregating_then_collapses_to_one() {
    let unit = Probe::weighted(2, None)
        .with(Probe::opaque(None))
        .with(Probe::opaque(Some(7)));
    assert_eq!(unit.status_code(), 2 + 1 + 1);
}

#[test]
fn given_two_failing_dependencies_when_aggregating_then_first_wins() {
    let unit = Probe::weighted(1, None)
        .with(Probe::weighted(2, Some(1)))
        .with(Probe::weighted(5, Some(4)));
    assert_eq!(unit.status_code(), 1 + 1);
}

#[test]
fn given_nested_failure_when_aggregating_then_inner_code_shifted_at_each_level() {
    // grandchild fails with 2 inside child (width 2): child code 2 + 2 = 4
    let child = Probe::weighted(2, None).with(Probe::weighted(3, Some(2)));
    let root = Probe::weighted(3, None).with(Probe::weighted(1, None)).with(child);
    assert_eq!(root.status_code(), 3 + 1 + 4);
}

#[test]
fn given_tree_when_measuring_then_max_code_sums_slots() {
    let unit = Probe::weighted(2, None)
        .with(Probe::weighted(3, None))
        .with(Probe::opaque(None))
        .with(Probe::weighted(4, None));
    assert_eq!(unit.max_status_code(), 2 + 3 + 1 + 4);
}

#[test]
fn given_any_failure_when_aggregating_then_code_within_code_space() {
    let units = [
        Probe::weighted(2, Some(1)).with(Probe::weighted(3, None)),
        Probe::weighted(2, None).with(Probe::weighted(3, Some(2))),
        Probe::weighted(2, None).with(Probe::weighted(3, None)).with(Probe::opaque(Some(9))),
    ];
    for unit in units {
        let code = unit.status_code();
        assert!(code > 0 && code <= unit.max_status_code(), "code {code} out of range");
    }
}

#[test]
fn given_dependency_state_change_when_aggregating_again_then_reflects_new_state() {
    // Arrange
    let dependency = Rc::new(RefCell::new(Probe::weighted(3, None)));
    let shared: UnitRef = dependency.clone();
    let unit = Probe {
        local: None,
        width: StatusWidth::Weighted(2),
        dependencies: vec![shared],
    };
    assert_eq!(unit.status_code(), 0);

    // Act
    dependency.borrow_mut().local = Some(1);

    // Assert
    assert_eq!(unit.status_code(), 2 + 1);
}

local_status! {
    enum Transfer {
        Ok,
        Timeout,
        Refused,
    }
}

#[test]
fn given_declared_vocabulary_when_used_as_width_then_weighted_by_variant_count() {
    assert_eq!(Transfer::width(), StatusWidth::Weighted(3));
    assert_eq!(Transfer::ALL, &[Transfer::Ok, Transfer::Timeout, Transfer::Refused]);
    assert!(Transfer::Ok.is_success());
    assert!(!Transfer::Refused.is_success());

    let unit = Probe::weighted(1, None).with(Probe::weighted(
        Transfer::width().slots(),
        Some(Transfer::Refused.ordinal()),
    ));
    assert_eq!(unit.status_code(), 1 + 2);
}

#[test]
fn given_busy_dependency_when_aggregating_then_reported_as_opaque_failure() {
    // Arrange: second dependency is mutably borrowed, as during its own run
    let busy = Rc::new(RefCell::new(Probe::weighted(5, None)));
    let idle: UnitRef = Rc::new(RefCell::new(Probe::weighted(3, None)));
    let shared: UnitRef = busy.clone();
    let unit = Probe {
        local: None,
        width: StatusWidth::Weighted(2),
        dependencies: vec![idle, shared],
    };
    let _guard = busy.borrow_mut();

    // Act / Assert
    assert_eq!(unit.status_code(), 2 + 3 + 1);
    assert_eq!(unit.max_status_code(), 2 + 3 + 1);
}
