/*!
 * Banker's Algorithm Tests
 * Grants, rejections and rollback on the classical textbook state
 */

use os_sim_kernel::{
    Algorithm, KernelError, Pid, ProcessError, RejectReason, ResourceError, ResourceVector,
    Scheduler,
};
use pretty_assertions::assert_eq;

/// Processes with their maximum claim and current allocation
type Setup<'a> = &'a [(&'a str, [u32; 3], [u32; 3])];

fn scheduler_with(setup: Setup<'_>) -> Scheduler {
    let mut scheduler = Scheduler::builder()
        .with_algorithm(Algorithm::Fcfs)
        .with_system_resources([10, 5, 7])
        .build()
        .unwrap();

    for (pid, max, _) in setup {
        scheduler.create_process(*pid, 0, 100, 0).unwrap();
        scheduler.declare_max(pid, *max).unwrap();
    }
    // Admit everyone so requests are allowed
    scheduler.tick();
    for (pid, _, allocated) in setup {
        scheduler.try_request(pid, *allocated).unwrap();
    }
    scheduler
}

fn three_processes() -> Scheduler {
    scheduler_with(&[
        ("P0", [7, 5, 3], [0, 1, 0]),
        ("P1", [3, 2, 2], [2, 0, 0]),
        ("P2", [9, 0, 2], [3, 0, 2]),
    ])
}

fn textbook() -> Scheduler {
    scheduler_with(&[
        ("P0", [7, 5, 3], [0, 1, 0]),
        ("P1", [3, 2, 2], [2, 0, 0]),
        ("P2", [9, 0, 2], [3, 0, 2]),
        ("P3", [2, 2, 2], [2, 1, 1]),
        ("P4", [4, 3, 3], [0, 0, 2]),
    ])
}

fn vectors(scheduler: &Scheduler) -> Vec<(ResourceVector, ResourceVector, ResourceVector)> {
    scheduler
        .all_processes()
        .map(|r| {
            let claim = r.claim();
            (claim.max().clone(), claim.allocated().clone(), claim.needed().clone())
        })
        .collect()
}

fn rejection(result: Result<(), KernelError>) -> Option<RejectReason> {
    match result {
        Err(KernelError::Resource(err)) => err.reason(),
        _ => None,
    }
}

#[test]
fn test_safe_request_is_granted() {
    let mut scheduler = three_processes();
    assert_eq!(scheduler.available_resources(), &ResourceVector::from([5, 4, 5]));

    scheduler.try_request("P1", [1, 0, 2]).unwrap();

    assert_eq!(scheduler.available_resources(), &ResourceVector::from([4, 4, 3]));
    let p1 = scheduler.process("P1").unwrap().claim();
    assert_eq!(p1.allocated(), &ResourceVector::from([3, 0, 2]));
    assert_eq!(p1.needed(), &ResourceVector::from([0, 2, 0]));
}

#[test]
fn test_request_beyond_available_is_rejected() {
    let mut scheduler = three_processes();
    scheduler.try_request("P1", [1, 0, 2]).unwrap();
    let before = vectors(&scheduler);

    let result = scheduler.try_request("P2", [6, 0, 0]);
    assert_eq!(rejection(result), Some(RejectReason::Unavailable));
    assert_eq!(vectors(&scheduler), before);
    assert_eq!(scheduler.available_resources(), &ResourceVector::from([4, 4, 3]));
}

#[test]
fn test_unsafe_request_is_rolled_back() {
    let mut scheduler = three_processes();
    scheduler.try_request("P1", [1, 0, 2]).unwrap();
    let before = vectors(&scheduler);

    // Fits in available, but would leave nobody able to finish
    let result = scheduler.try_request("P0", [4, 4, 3]);
    assert_eq!(rejection(result), Some(RejectReason::Unsafe));
    assert_eq!(vectors(&scheduler), before);
    assert_eq!(scheduler.available_resources(), &ResourceVector::from([4, 4, 3]));
}

#[test]
fn test_textbook_state_and_safe_sequence() {
    let scheduler = textbook();
    assert_eq!(scheduler.available_resources(), &ResourceVector::from([3, 3, 2]));

    let expected: Vec<Pid> = ["P1", "P3", "P0", "P2", "P4"].iter().map(|p| Pid::from(*p)).collect();
    assert_eq!(scheduler.safe_sequence(), Some(expected));
}

#[test]
fn test_textbook_requests() {
    let mut scheduler = textbook();

    scheduler.try_request("P1", [1, 0, 2]).unwrap();
    assert_eq!(scheduler.available_resources(), &ResourceVector::from([2, 3, 0]));
    assert!(scheduler.safe_sequence().is_some());

    let before = vectors(&scheduler);
    assert_eq!(
        rejection(scheduler.try_request("P4", [3, 3, 0])),
        Some(RejectReason::Unavailable)
    );
    assert_eq!(
        rejection(scheduler.try_request("P0", [0, 2, 0])),
        Some(RejectReason::Unsafe)
    );
    assert_eq!(vectors(&scheduler), before);
    assert_eq!(scheduler.available_resources(), &ResourceVector::from([2, 3, 0]));
}

#[test]
fn test_request_beyond_claim() {
    let mut scheduler = three_processes();
    let result = scheduler.try_request("P2", [0, 1, 0]);
    assert_eq!(rejection(result), Some(RejectReason::ExceedsClaim));
    assert!(!RejectReason::ExceedsClaim.is_retryable());
}

#[test]
fn test_zero_request_always_succeeds() {
    let mut scheduler = textbook();
    let before = vectors(&scheduler);
    scheduler.try_request("P0", [0, 0, 0]).unwrap();
    assert_eq!(vectors(&scheduler), before);
}

#[test]
fn test_request_then_release_restores() {
    let mut scheduler = three_processes();
    let before = vectors(&scheduler);
    let available = scheduler.available_resources().clone();

    scheduler.try_request("P1", [1, 0, 2]).unwrap();
    let released = scheduler.release("P1", [1, 0, 2]).unwrap();

    assert_eq!(released, ResourceVector::from([1, 0, 2]));
    assert_eq!(vectors(&scheduler), before);
    assert_eq!(scheduler.available_resources(), &available);
}

#[test]
fn test_claim_cannot_drop_below_allocation() {
    let mut scheduler = three_processes();
    let err = scheduler.declare_max("P2", [1, 0, 0]).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Resource(ResourceError::ClaimBelowAllocation { .. })
    ));

    scheduler.declare_max("P2", [3, 0, 2]).unwrap();
    let p2 = scheduler.process("P2").unwrap().claim();
    assert!(p2.needed().is_zero());
}

#[test]
fn test_dimension_mismatch() {
    let mut scheduler = three_processes();
    let err = scheduler.try_request("P0", [1, 0]).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Resource(ResourceError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_suspended_process_keeps_resources() {
    let mut scheduler = three_processes();
    let held = scheduler.process("P1").unwrap().claim().allocated().clone();

    scheduler.suspend("P1").unwrap();
    assert_eq!(scheduler.process("P1").unwrap().claim().allocated(), &held);
    assert_eq!(scheduler.available_resources(), &ResourceVector::from([5, 4, 5]));
}

#[test]
fn test_new_process_cannot_request() {
    let mut scheduler = three_processes();
    scheduler.create_process("late", 50, 1, 0).unwrap();
    scheduler.declare_max("late", [1, 1, 1]).unwrap();
    assert!(scheduler.try_request("late", [1, 0, 0]).is_err());
}

#[test]
fn test_suspended_process_cannot_request() {
    let mut scheduler = three_processes();
    scheduler.suspend("P1").unwrap();
    let before = vectors(&scheduler);
    let available = scheduler.available_resources().clone();

    let err = scheduler.try_request("P1", [1, 0, 2]).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Process(ProcessError::InvalidState { .. })
    ));
    assert_eq!(vectors(&scheduler), before);
    assert_eq!(scheduler.available_resources(), &available);

    scheduler.activate("P1").unwrap();
    scheduler.try_request("P1", [1, 0, 2]).unwrap();
}
