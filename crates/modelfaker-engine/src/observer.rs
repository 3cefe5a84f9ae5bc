use std::cell::RefCell;

use crate::declaration::DeclarationId;

/// Synchronous notifications around faker runs.
///
/// Every method defaults to a no-op; implementors override what they need.
pub trait FakeObserver {
    fn before_fake(&self, _id: &DeclarationId) {}

    fn after_fake(&self, _id: &DeclarationId) {}

    fn before_fake_all(&self, _ids: &[DeclarationId]) {}

    fn after_fake_all(&self, _ids: &[DeclarationId]) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FakeObserver for NoopObserver {}

/// One notification received by a `RecordingObserver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeEvent {
    BeforeFake(DeclarationId),
    AfterFake(DeclarationId),
    BeforeFakeAll(Vec<DeclarationId>),
    AfterFakeAll(Vec<DeclarationId>),
}

/// Keeps every notification in order of arrival.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<FakeEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FakeEvent> {
        self.events.borrow().clone()
    }

    fn push(&self, event: FakeEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl FakeObserver for RecordingObserver {
    fn before_fake(&self, id: &DeclarationId) {
        self.push(FakeEvent::BeforeFake(id.clone()));
    }

    fn after_fake(&self, id: &DeclarationId) {
        self.push(FakeEvent::AfterFake(id.clone()));
    }

    fn before_fake_all(&self, ids: &[DeclarationId]) {
        self.push(FakeEvent::BeforeFakeAll(ids.to_vec()));
    }

    fn after_fake_all(&self, ids: &[DeclarationId]) {
        self.push(FakeEvent::AfterFakeAll(ids.to_vec()));
    }
}
