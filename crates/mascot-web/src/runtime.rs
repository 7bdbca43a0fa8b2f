//! Event queue between browser callbacks and the stage engine
//!
//! Browser callbacks never touch the engine directly. They post a
//! [`StageEvent`] to the mailbox, which drains the queue into the engine
//! unless the engine is already dispatching. Events posted while a dispatch
//! is in progress (a callback fired from inside a HAL call) are picked up by
//! the outer drain loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use mascot_stage::{StageConfig, StageEngine, StageEvent};

use crate::hal::WebHal;

/// Cloneable handle callbacks use to deliver events
#[derive(Clone, Default)]
pub(crate) struct Mailbox {
    queue: Rc<RefCell<VecDeque<StageEvent>>>,
    runtime: Rc<RefCell<Weak<Runtime>>>,
}

impl Mailbox {
    pub fn post(&self, event: StageEvent) {
        self.queue.borrow_mut().push_back(event);
        let runtime = self.runtime.borrow().upgrade();
        if let Some(runtime) = runtime {
            runtime.drain();
        }
    }

    fn attach(&self, runtime: &Rc<Runtime>) {
        *self.runtime.borrow_mut() = Rc::downgrade(runtime);
    }

    fn next(&self) -> Option<StageEvent> {
        self.queue.borrow_mut().pop_front()
    }
}

/// One mascot instance living in the page
pub(crate) struct Runtime {
    engine: RefCell<StageEngine<WebHal>>,
    mailbox: Mailbox,
}

impl Runtime {
    pub fn new(config: StageConfig) -> Result<Rc<Self>, String> {
        let mailbox = Mailbox::default();
        let hal = WebHal::new(&config, mailbox.clone())?;
        let runtime = Rc::new(Self {
            engine: RefCell::new(StageEngine::new(hal, config)),
            mailbox,
        });
        runtime.mailbox.attach(&runtime);
        Ok(runtime)
    }

    pub fn post(&self, event: StageEvent) {
        self.mailbox.post(event);
    }

    /// Read engine state; `None` while a dispatch is in progress
    pub fn with_engine<R>(&self, f: impl FnOnce(&StageEngine<WebHal>) -> R) -> Option<R> {
        self.engine.try_borrow().ok().map(|engine| f(&engine))
    }

    fn drain(&self) {
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            return;
        };
        while let Some(event) = self.mailbox.next() {
            engine.dispatch(event);
        }
    }
}
