//! Test doubles shared by the unit tests of this crate.

use std::cell::RefCell;
use std::rc::Rc;

use store::MemoryStore;

use crate::auth::{AuthController, AuthState};
use crate::navigation::{Destination, Navigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Push(Destination),
    Replace(Destination),
    Refresh,
}

/// Navigator that records every request in order.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    log: Rc<RefCell<Vec<Recorded>>>,
}

impl RecordingNavigator {
    pub fn log(&self) -> Vec<Recorded> {
        self.log.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, to: Destination) {
        self.log.borrow_mut().push(Recorded::Push(to));
    }

    fn replace(&self, to: Destination) {
        self.log.borrow_mut().push(Recorded::Replace(to));
    }

    fn refresh(&self) {
        self.log.borrow_mut().push(Recorded::Refresh);
    }
}

pub type TestController = AuthController<MemoryStore, Rc<RefCell<AuthState>>, RecordingNavigator>;

pub fn controller(store: MemoryStore) -> (TestController, RecordingNavigator) {
    let navigator = RecordingNavigator::default();
    let state = Rc::new(RefCell::new(AuthState::default()));
    (
        AuthController::new(store, state, navigator.clone()),
        navigator,
    )
}
