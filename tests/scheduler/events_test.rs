/*!
 * Kernel Event Tests
 * Notifications delivered to collaborators over the event bus
 */

use os_sim_kernel::monitoring::Category;
use os_sim_kernel::{Algorithm, KernelEvent, Pid, Runner, Scheduler};
use pretty_assertions::assert_eq;

fn names(events: &[KernelEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match event {
            KernelEvent::Created { .. } => "created",
            KernelEvent::Admitted { .. } => "admitted",
            KernelEvent::Dispatched { .. } => "dispatched",
            KernelEvent::Preempted { .. } => "preempted",
            KernelEvent::QuantumExpired { .. } => "quantum_expired",
            KernelEvent::Blocked { .. } => "blocked",
            KernelEvent::Woken { .. } => "woken",
            KernelEvent::Suspended { .. } => "suspended",
            KernelEvent::Activated { .. } => "activated",
            KernelEvent::Finished { .. } => "finished",
            KernelEvent::Reaped { .. } => "reaped",
            KernelEvent::ThreadCreated { .. } => "thread_created",
            KernelEvent::ResourcesGranted { .. } => "granted",
            KernelEvent::ResourcesReleased { .. } => "released",
            KernelEvent::ResourcesReclaimed { .. } => "reclaimed",
            KernelEvent::RequestRejected { .. } => "rejected",
            KernelEvent::AlgorithmChanged { .. } => "algorithm_changed",
        })
        .collect()
}

#[test]
fn test_process_lifecycle_events() {
    let mut scheduler = Scheduler::new(Algorithm::RoundRobin);
    let events = scheduler.subscribe();

    scheduler.create_process("P1", 0, 3, 32).unwrap();
    Runner::default().run_to_completion(&mut scheduler).unwrap();

    let received: Vec<KernelEvent> = events.try_iter().collect();
    assert_eq!(
        names(&received),
        vec!["created", "admitted", "dispatched", "quantum_expired", "dispatched", "finished"]
    );
    assert_eq!(
        received.last(),
        Some(&KernelEvent::Finished {
            pid: Pid::from("P1"),
            time: 3,
            memory_size: 32,
        })
    );
}

#[test]
fn test_finish_with_resources_reports_reclaim_first() {
    let mut scheduler = Scheduler::builder()
        .with_system_resources([4, 4, 4])
        .build()
        .unwrap();
    scheduler.create_process("P1", 0, 2, 0).unwrap();
    scheduler.declare_max("P1", [2, 2, 2]).unwrap();
    scheduler.tick();
    scheduler.try_request("P1", [1, 1, 1]).unwrap();

    let events = scheduler.subscribe();
    scheduler.tick();
    let received: Vec<KernelEvent> = events.try_iter().collect();
    assert_eq!(names(&received), vec!["reclaimed", "finished"]);
    assert!(received.iter().all(|e| e.category() != Category::Scheduler));
}

#[test]
fn test_dropped_subscriber_is_pruned() {
    let mut scheduler = Scheduler::new(Algorithm::Fcfs);
    let kept = scheduler.subscribe();
    drop(scheduler.subscribe());

    scheduler.create_process("P1", 0, 1, 0).unwrap();
    assert_eq!(kept.try_iter().count(), 1);
}
