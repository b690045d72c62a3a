use super::*;

// ===================================================================
// RecursionProfile tests
// ===================================================================

#[test]
fn profile_compilation_limits() {
    let p = RecursionProfile::Compilation;
    assert_eq!(p.max_depth(), tygen_common::limits::MAX_COMPILE_DEPTH);
    assert_eq!(p.max_iterations(), 100_000);
}

#[test]
fn profile_name_inference_limits() {
    let p = RecursionProfile::NameInference;
    assert_eq!(p.max_depth(), tygen_common::limits::MAX_NAME_INFERENCE_DEPTH);
}

#[test]
fn profile_custom_limits() {
    let p = RecursionProfile::Custom {
        max_depth: 7,
        max_iterations: 42,
    };
    assert_eq!(p.max_depth(), 7);
    assert_eq!(p.max_iterations(), 42);
}

#[test]
fn with_profile_constructor() {
    let guard = RecursionGuard::<u32>::with_profile(RecursionProfile::Compilation);
    assert_eq!(guard.max_depth(), RecursionProfile::Compilation.max_depth());
    assert_eq!(guard.depth(), 0);
    assert_eq!(guard.iterations(), 0);
    assert!(!guard.is_exceeded());
    assert!(!guard.is_active());
}

// ===================================================================
// Core enter/leave tests
// ===================================================================

#[test]
fn basic_enter_leave() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.depth(), 1);
    assert_eq!(guard.visiting_count(), 1);
    assert!(guard.is_visiting(&1));
    assert!(guard.is_active());

    guard.leave(&1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
    assert!(!guard.is_active());
}

#[test]
fn reentering_an_active_key_is_a_cycle() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(1u32), RecursionResult::CycleDetected);

    // Cycle detection does not consume depth.
    assert_eq!(guard.depth(), 1);
}

#[test]
fn depth_budget_is_enforced() {
    let mut guard = RecursionGuard::new(2, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(2u32), RecursionResult::Entered);
    assert_eq!(guard.enter(3u32), RecursionResult::DepthExceeded);
    assert!(guard.is_exceeded());
}

#[test]
fn iteration_budget_is_enforced() {
    let mut guard = RecursionGuard::new(100, 3);
    for key in 0u32..3 {
        assert_eq!(guard.enter(key), RecursionResult::Entered);
        guard.leave(&key);
    }
    assert_eq!(guard.enter(99u32), RecursionResult::IterationsExceeded);
}

#[test]
fn leave_tolerates_unknown_keys() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    guard.leave(&42);
    assert_eq!(guard.depth(), 1);
}
