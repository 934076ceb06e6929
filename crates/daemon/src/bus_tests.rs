use super::*;
use herdctl_core::event::StartedEvent;

fn started() -> Event {
    Event::Started(StartedEvent { at: chrono::Utc::now() })
}

#[tokio::test]
async fn subscriber_receives_published_events() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe();
    bus.publish(started());
    let event = sub.recv().await.unwrap();
    assert_eq!(event.topic(), "started");
}

#[tokio::test]
async fn multiple_subscribers_each_see_every_event() {
    let bus = EventBus::new();
    let mut a = bus.subscribe();
    let mut b = bus.subscribe();
    bus.publish(started());
    assert_eq!(a.recv().await.unwrap().topic(), "started");
    assert_eq!(b.recv().await.unwrap().topic(), "started");
}

#[tokio::test]
async fn publish_with_no_subscribers_does_not_panic() {
    let bus = EventBus::new();
    bus.publish(started());
}

#[tokio::test]
async fn slow_subscriber_observes_a_dropped_event_instead_of_an_error() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe();
    for _ in 0..(SUBSCRIBER_QUEUE_CAPACITY + 10) {
        bus.publish(started());
    }
    let event = sub.recv().await.unwrap();
    assert_eq!(event.topic(), "subscriber:dropped");
}
