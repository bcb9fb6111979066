// Slot reel: owns the name pool and picks the winner for each spin.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::util::{cwarn, pick_index};

/// Lifecycle hooks a reel raises. Handed to the reel when it is built.
pub trait SpinLifecycle {
    fn on_spin_start(&self);
    fn on_spin_end(&self);
    fn on_name_list_changed(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReelEvent {
    SpinStarted,
    SpinEnded,
    NameListChanged,
}

/// Queues lifecycle hooks so the owner handles them after the reel call returns.
#[derive(Clone, Default)]
pub struct ReelSignals {
    queue: Rc<RefCell<VecDeque<ReelEvent>>>,
}

impl ReelSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<ReelEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    fn push(&self, event: ReelEvent) {
        self.queue.borrow_mut().push_back(event);
    }
}

impl SpinLifecycle for ReelSignals {
    fn on_spin_start(&self) {
        self.push(ReelEvent::SpinStarted);
    }

    fn on_spin_end(&self) {
        self.push(ReelEvent::SpinEnded);
    }

    fn on_name_list_changed(&self) {
        self.push(ReelEvent::NameListChanged);
    }
}

pub trait ReelEngine {
    fn names(&self) -> &[String];
    fn set_names(&mut self, names: Vec<String>);
    fn should_remove_winner(&self) -> bool;
    fn set_should_remove_winner(&mut self, remove: bool);
    /// Winner of the last settled spin.
    fn current_winner_name(&self) -> Option<&str>;
    /// Names shown on the reel strip for the current spin; the last one wins.
    fn reel_items(&self) -> &[String];
    fn is_spinning(&self) -> bool;
    fn spin(&mut self);
    /// Ends the in-flight spin. The host calls this when the reel animation finishes.
    fn settle(&mut self);
}

pub struct SlotReel {
    names: Vec<String>,
    should_remove_winner: bool,
    current_winner: Option<String>,
    reel_items: Vec<String>,
    max_reel_items: usize,
    spinning: bool,
    lifecycle: Rc<dyn SpinLifecycle>,
    random: Box<dyn Fn() -> f64>,
}

impl SlotReel {
    pub fn new(
        max_reel_items: usize,
        lifecycle: Rc<dyn SpinLifecycle>,
        random: Box<dyn Fn() -> f64>,
    ) -> Self {
        Self {
            names: Vec::new(),
            should_remove_winner: true,
            current_winner: None,
            reel_items: Vec::new(),
            max_reel_items: max_reel_items.max(1),
            spinning: false,
            lifecycle,
            random,
        }
    }
}

impl ReelEngine for SlotReel {
    fn names(&self) -> &[String] {
        &self.names
    }

    fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
        self.lifecycle.on_name_list_changed();
    }

    fn should_remove_winner(&self) -> bool {
        self.should_remove_winner
    }

    fn set_should_remove_winner(&mut self, remove: bool) {
        self.should_remove_winner = remove;
    }

    fn current_winner_name(&self) -> Option<&str> {
        self.current_winner.as_deref()
    }

    fn reel_items(&self) -> &[String] {
        &self.reel_items
    }

    fn is_spinning(&self) -> bool {
        self.spinning
    }

    fn spin(&mut self) {
        if self.names.is_empty() {
            cwarn("spin requested with an empty name list");
            return;
        }
        if self.spinning {
            return;
        }
        self.reel_items = (0..self.max_reel_items)
            .map(|_| self.names[pick_index((self.random)(), self.names.len())].clone())
            .collect();
        self.current_winner = None;
        self.spinning = true;
        self.lifecycle.on_spin_start();
    }

    fn settle(&mut self) {
        if !self.spinning {
            return;
        }
        self.spinning = false;
        let winner = self.reel_items.last().cloned();
        if self.should_remove_winner {
            if let Some(name) = &winner {
                if let Some(pos) = self.names.iter().position(|n| n == name) {
                    self.names.remove(pos);
                    self.lifecycle.on_name_list_changed();
                }
            }
        }
        self.current_winner = winner;
        self.lifecycle.on_spin_end();
    }
}
