// Prize cursor over the fixed catalog.
use std::rc::Rc;

use yew::Callback;

use crate::error::DrawError;
use crate::model::{DONE_LABEL, PRIZE_INDEX_KEY, PrizeCatalog};
use crate::state::storage::KeyValueStore;
use crate::util::{clog, cwarn};

pub struct PrizeSequencer {
    catalog: PrizeCatalog,
    store: Rc<dyn KeyValueStore>,
    index: u32,
    /// Receives the label after init, every advance and every reload.
    on_label: Callback<String>,
}

impl PrizeSequencer {
    pub fn new(
        catalog: PrizeCatalog,
        store: Rc<dyn KeyValueStore>,
        on_label: Callback<String>,
    ) -> Self {
        let index = restore_index(store.as_ref(), catalog.total());
        let seq = Self {
            catalog,
            store,
            index,
            on_label,
        };
        seq.render();
        seq
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn total(&self) -> u32 {
        self.catalog.total()
    }

    /// Name of the prize about to be drawn, `None` once exhausted.
    pub fn current_prize(&self) -> Option<&str> {
        self.catalog.get(self.index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.index == self.catalog.total()
    }

    pub fn current_label(&self) -> String {
        match self.current_prize() {
            Some(name) => format!("{}. {}", self.total() - self.index, name),
            None => DONE_LABEL.to_string(),
        }
    }

    pub fn advance(&mut self) -> Result<(), DrawError> {
        if self.is_exhausted() {
            return Err(DrawError::OutOfRange {
                index: self.index,
                total: self.total(),
            });
        }
        self.index += 1;
        if let Err(e) = self.store.set(PRIZE_INDEX_KEY, &self.index.to_string()) {
            cwarn(&format!("prize index not saved: {e}"));
        }
        clog(&format!("PrizeIndex: {}", self.index));
        self.render();
        Ok(())
    }

    /// Re-reads the persisted cursor, e.g. after storage was cleared.
    pub fn reload(&mut self) {
        self.index = restore_index(self.store.as_ref(), self.total());
        self.render();
    }

    fn render(&self) {
        self.on_label.emit(self.current_label());
    }
}

fn restore_index(store: &dyn KeyValueStore, total: u32) -> u32 {
    let Some(raw) = store.get(PRIZE_INDEX_KEY) else {
        return 0;
    };
    match raw.trim().parse::<u32>() {
        Ok(v) if v <= total => v,
        _ => {
            cwarn(&format!("ignoring stored prize index {raw:?}"));
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::storage::MemoryStore;
    use std::cell::RefCell;

    fn catalog() -> PrizeCatalog {
        PrizeCatalog::new(vec!["Gold".into(), "Silver".into(), "Bronze".into()]).unwrap()
    }

    fn sequencer(store: Rc<MemoryStore>) -> (PrizeSequencer, Rc<RefCell<Vec<String>>>) {
        let labels = Rc::new(RefCell::new(Vec::new()));
        let sink = labels.clone();
        let seq = PrizeSequencer::new(
            catalog(),
            store,
            Callback::from(move |l: String| sink.borrow_mut().push(l)),
        );
        (seq, labels)
    }

    #[test]
    fn labels_count_down_to_done() {
        let store = Rc::new(MemoryStore::new());
        let (mut seq, labels) = sequencer(store);
        assert_eq!(seq.current_label(), "3. Gold");
        seq.advance().unwrap();
        assert_eq!(seq.current_label(), "2. Silver");
        seq.advance().unwrap();
        assert_eq!(seq.current_label(), "1. Bronze");
        seq.advance().unwrap();
        assert_eq!(seq.current_label(), "Done");
        assert_eq!(
            *labels.borrow(),
            vec!["3. Gold", "2. Silver", "1. Bronze", "Done"]
        );
    }

    #[test]
    fn advance_past_exhaustion_fails() {
        let store = Rc::new(MemoryStore::new());
        let (mut seq, _) = sequencer(store);
        for _ in 0..3 {
            seq.advance().unwrap();
        }
        assert!(seq.is_exhausted());
        assert_eq!(
            seq.advance(),
            Err(DrawError::OutOfRange { index: 3, total: 3 })
        );
        assert_eq!(seq.index(), 3);
    }

    #[test]
    fn advance_persists_and_restores() {
        let store = Rc::new(MemoryStore::new());
        let (mut seq, _) = sequencer(store.clone());
        seq.advance().unwrap();
        assert_eq!(store.get(PRIZE_INDEX_KEY).as_deref(), Some("1"));

        let (seq2, labels) = sequencer(store);
        assert_eq!(seq2.index(), 1);
        assert_eq!(*labels.borrow(), vec!["2. Silver"]);
    }

    #[test]
    fn invalid_stored_index_defaults_to_zero() {
        for raw in ["abc", "-1", "", "7"] {
            let store = Rc::new(MemoryStore::new());
            store.set(PRIZE_INDEX_KEY, raw).unwrap();
            let (seq, _) = sequencer(store);
            assert_eq!(seq.index(), 0, "raw value {raw:?}");
        }
    }

    #[test]
    fn reload_picks_up_cleared_storage() {
        let store = Rc::new(MemoryStore::new());
        let (mut seq, labels) = sequencer(store.clone());
        seq.advance().unwrap();
        seq.advance().unwrap();
        store.remove(PRIZE_INDEX_KEY).unwrap();
        seq.reload();
        assert_eq!(seq.index(), 0);
        assert_eq!(labels.borrow().last().map(String::as_str), Some("3. Gold"));
    }

    #[test]
    fn failed_write_still_advances_in_memory() {
        use crate::state::storage::testing::FlakyStore;
        let store = Rc::new(FlakyStore::default());
        store.reject_writes.set(true);
        let mut seq = PrizeSequencer::new(catalog(), store.clone(), Callback::noop());
        seq.advance().unwrap();
        assert_eq!(seq.index(), 1);
        assert_eq!(store.get(PRIZE_INDEX_KEY), None);
    }
}
