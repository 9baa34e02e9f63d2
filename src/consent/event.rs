use crate::consent::PreferenceRecord;
use time::OffsetDateTime;
use tokio::sync::broadcast;

/// A handle for receiving consent change notifications.
pub type Subscription = broadcast::Receiver<ConsentEvent>;

/// What changed the effective preferences.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// A stored decision was read back at startup (or when opening the settings).
    Restored,
    AcceptAll,
    RejectAll,
    Custom,
}

impl Decision {
    /// Whether this decision runs the activation callbacks.
    pub fn activates(self) -> bool {
        matches!(self, Decision::AcceptAll | Decision::Custom)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConsentEvent {
    pub decision: Decision,
    pub record: PreferenceRecord,
    pub at: OffsetDateTime,
    /// `true` if the decision reached storage. Always `false` for `Restored`.
    pub written: bool,
}

#[derive(Debug)]
pub(crate) struct ConsentBus {
    tx: broadcast::Sender<ConsentEvent>,
}

impl ConsentBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> Subscription {
        self.tx.subscribe()
    }

    pub fn publish(&self, ev: ConsentEvent) {
        // send() only fails when nobody is subscribed.
        let _ = self.tx.send(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(decision: Decision) -> ConsentEvent {
        ConsentEvent {
            decision,
            record: PreferenceRecord::default(),
            at: OffsetDateTime::now_utc(),
            written: false,
        }
    }

    #[test]
    fn only_enabling_decisions_activate() {
        assert!(Decision::AcceptAll.activates());
        assert!(Decision::Custom.activates());
        assert!(!Decision::RejectAll.activates());
        assert!(!Decision::Restored.activates());
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = ConsentBus::new(4);
        bus.publish(event(Decision::RejectAll));
    }

    #[test]
    fn subscribers_receive_in_order() {
        let bus = ConsentBus::new(4);
        let mut rx = bus.subscribe();
        bus.publish(event(Decision::Restored));
        bus.publish(event(Decision::AcceptAll));

        assert_eq!(rx.try_recv().unwrap().decision, Decision::Restored);
        assert_eq!(rx.try_recv().unwrap().decision, Decision::AcceptAll);
        assert!(rx.try_recv().is_err());
    }
}
