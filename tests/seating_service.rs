use std::collections::HashSet;

use futures::future::join_all;
use tokio_test::assert_ok;

use seatwise::engine::{EngineError, SeatingManager};
use seatwise::model::*;
use seatwise::service::{SeatingHandle, SeatingService};

const FLOOR: [u32; 12] = [2, 6, 4, 6, 2, 5, 4, 2, 3, 3, 5, 2];

fn start(sizes: &[u32]) -> SeatingHandle {
    SeatingService::spawn(SeatingManager::with_sizes(sizes).unwrap(), 128)
}

#[tokio::test]
async fn mixed_floor_through_service() {
    let handle = start(&FLOOR);

    let mut groups = Vec::new();
    for size in [2, 4, 4, 6, 6, 5, 5] {
        let g = CustomerGroup::new(size);
        let table = assert_ok!(handle.arrive(g).await);
        assert_eq!(table.map(|t| t.seats), Some(size));
        groups.push(g);
    }
    let stats = assert_ok!(handle.stats().await);
    assert_eq!(stats.free, 5);
    assert_eq!(stats.waiting, 0);

    let five = CustomerGroup::new(5);
    let four = CustomerGroup::new(4);
    assert_eq!(assert_ok!(handle.arrive(five).await), None);
    assert_eq!(assert_ok!(handle.arrive(four).await), None);
    assert_eq!(assert_ok!(handle.stats().await).waiting, 2);

    let mut seated_rx = handle.subscribe(four.id);
    assert_ok!(handle.leave(groups[1].id).await);

    match assert_ok!(seated_rx.recv().await) {
        Event::GroupSeated { id, table } => {
            assert_eq!(id, four.id);
            assert_eq!(table.seats, 4);
        }
        other => panic!("expected seating, got {other:?}"),
    }
    assert_eq!(assert_ok!(handle.locate(five.id).await), None);
    let stats = assert_ok!(handle.stats().await);
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.free + stats.seated, stats.tables);
}

#[tokio::test]
async fn concurrent_callers_never_share_a_table() {
    let handle = start(&[2; 12]);

    let tasks: Vec<_> = (0..100)
        .map(|_| {
            let h = handle.clone();
            tokio::spawn(async move {
                let g = CustomerGroup::new(2);
                h.arrive(g).await.map(|_| g)
            })
        })
        .collect();
    let groups: Vec<CustomerGroup> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let stats = assert_ok!(handle.stats().await);
    assert_eq!(stats.seated, 12);
    assert_eq!(stats.waiting, 88);

    let mut tables = HashSet::new();
    for g in &groups {
        if let Some(t) = assert_ok!(handle.locate(g.id).await) {
            assert!(tables.insert(t.id));
        }
    }
    assert_eq!(tables.len(), 12);
}

#[tokio::test]
async fn waiters_wake_in_arrival_order() {
    let handle = start(&[2; 12]);
    let mut groups = Vec::new();
    for _ in 0..30 {
        let g = CustomerGroup::new(2);
        assert_ok!(handle.arrive(g).await);
        groups.push(g);
    }
    let order = assert_ok!(handle.waiting_order().await);
    assert_eq!(order, groups[12..].iter().map(|g| g.id).collect::<Vec<_>>());

    for i in 12..groups.len() {
        let waiter = handle.clone();
        let id = groups[i].id;
        let seated = tokio::spawn(async move { waiter.wait_until_seated(id).await });
        assert_ok!(handle.leave(groups[i - 12].id).await);
        let table = assert_ok!(seated.await.unwrap());
        assert!(table.is_some());
        if let Some(next) = groups.get(i + 1) {
            assert_eq!(assert_ok!(handle.locate(next.id).await), None);
        }
        assert_eq!(assert_ok!(handle.stats().await).seated, 12);
    }
}

#[tokio::test]
async fn repeated_departure_is_harmless() {
    let handle = start(&[4]);
    let g = CustomerGroup::new(3);
    assert_ok!(handle.arrive(g).await);
    let first = assert_ok!(handle.leave(g.id).await);
    let after_first = assert_ok!(handle.stats().await);
    let second = assert_ok!(handle.leave(g.id).await);

    assert!(first.released.is_some());
    assert_eq!(second.released, None);
    assert_eq!(second.previous, Some(GroupState::Departed));
    assert_eq!(assert_ok!(handle.stats().await), after_first);
}

#[tokio::test]
async fn invalid_arrival_is_reported() {
    let handle = start(&[4]);
    let result = handle.arrive(CustomerGroup::new(0)).await;
    assert_eq!(result, Err(EngineError::InvalidSize(0)));
    assert_eq!(assert_ok!(handle.stats().await).waiting, 0);
}
