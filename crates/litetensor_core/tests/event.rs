use litetensor_core::{
    error::Result,
    event::{Event, EventTree, HostEvent},
    target::{auto_set_target, get_default_target, Target},
};
use std::{thread, time::Duration};

#[test]
fn empty_tree_syncs_immediately() -> Result<()> {
    let tree = EventTree::new();

    assert!(tree.is_empty());
    tree.sync()?;

    Ok(())
}

#[test]
fn completed_events() -> Result<()> {
    let mut tree = EventTree::new();
    tree.add_child(Event::completed());
    tree.add_child(Event::completed());

    assert_eq!(tree.len(), 2);
    assert!(tree.iter().all(|e| e.target() == Target::Host));
    tree.sync()?;

    Ok(())
}

#[test]
fn sync_waits_for_host_signal() -> Result<()> {
    let pending = HostEvent::new();
    let mut tree = EventTree::new();
    tree.add_child(Event::completed());
    tree.add_child(Event::host(&pending));

    assert!(!Event::host(&pending).is_complete()?);

    let signaler = pending.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        signaler.signal();
    });

    tree.sync()?;
    assert!(pending.is_signaled());
    for event in &tree {
        assert!(event.is_complete()?);
    }

    handle.join().ok();

    Ok(())
}

#[test]
fn duplicate_children_are_kept() -> Result<()> {
    let event = Event::completed();
    let mut tree: EventTree = vec![event.clone(), event.clone()].into_iter().collect();
    tree.extend([event]);

    assert_eq!(tree.len(), 3);
    tree.sync()?;

    tree.clear();
    assert!(tree.is_empty());

    Ok(())
}

#[test]
fn host_event_state() -> Result<()> {
    let event = HostEvent::new();
    assert!(!event.is_signaled());

    let clone = event.clone();
    clone.signal();
    assert!(event.is_signaled());
    event.wait();

    assert!(HostEvent::signaled().is_signaled());

    Ok(())
}

#[test]
fn record_on_default_target() -> Result<()> {
    auto_set_target();
    let target = get_default_target();

    let event = Event::record(target)?;
    assert_eq!(event.target(), target);

    let mut tree = EventTree::new();
    tree.add_child(event);
    tree.add_child(Event::record(Target::Host)?);
    tree.sync()?;

    for event in &tree {
        assert!(event.is_complete()?);
    }

    Ok(())
}
