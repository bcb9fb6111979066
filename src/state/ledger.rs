// Append-only winner history, persisted as one JSON array.
use std::borrow::Cow;
use std::rc::Rc;

use serde_json::Value;

use crate::error::DrawError;
use crate::model::{CSV_HEADER, PRIZE_INDEX_KEY, WINNER_KEY, WinnerRecord};
use crate::state::storage::KeyValueStore;
use crate::util::{clog, cwarn};

pub struct WinnerLedger {
    store: Rc<dyn KeyValueStore>,
}

impl WinnerLedger {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted records in confirmation order. Missing or malformed state reads as empty;
    /// a single unreadable entry is skipped.
    pub fn records(&self) -> Vec<WinnerRecord> {
        self.stored_entries()
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry) {
                Ok(rec) => Some(rec),
                Err(e) => {
                    cwarn(&format!("winner entry {i} skipped: {e}"));
                    None
                }
            })
            .collect()
    }

    /// Read-modify-write of the whole list in one `set`. Stored entries are carried over
    /// untouched, including ones `records` cannot read.
    pub fn append(&self, record: WinnerRecord) -> Result<(), DrawError> {
        let mut list = self.stored_entries();
        clog(&format!(
            "winner #{}: {} -> {}",
            record.prize_index, record.prize_name, record.person_name
        ));
        list.push(serde_json::to_value(&record).map_err(|e| DrawError::Storage(e.to_string()))?);
        let raw = serde_json::to_string(&list).map_err(|e| DrawError::Storage(e.to_string()))?;
        self.store.set(WINNER_KEY, &raw)
    }

    fn stored_entries(&self) -> Vec<Value> {
        let Some(raw) = self.store.get(WINNER_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                cwarn(&format!("stored winner list unreadable, starting empty: {e}"));
                Vec::new()
            }
        }
    }

    pub fn to_csv(&self, total_prize: u32) -> String {
        render_csv(&self.records(), total_prize)
    }

    /// Drops the winner list and the prize cursor. Callers reload any cached cursor afterwards.
    pub fn clear(&self) -> Result<(), DrawError> {
        self.store.remove(WINNER_KEY)?;
        self.store.remove(PRIZE_INDEX_KEY)
    }
}

pub fn render_csv(records: &[WinnerRecord], total_prize: u32) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for rec in records {
        let prize_no = i64::from(total_prize) - i64::from(rec.prize_index);
        out.push_str(&format!(
            "{},{},{}\n",
            prize_no,
            csv_field(&rec.prize_name),
            csv_field(&rec.person_name)
        ));
    }
    out
}

/// Quotes a field holding a delimiter, quote or line break; inner quotes are doubled.
fn csv_field(raw: &str) -> Cow<'_, str> {
    if raw.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", raw.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::storage::MemoryStore;
    use crate::state::storage::testing::FlakyStore;

    fn rec(index: u32, prize: &str, person: &str) -> WinnerRecord {
        WinnerRecord {
            prize_index: index,
            prize_name: prize.into(),
            person_name: person.into(),
        }
    }

    #[test]
    fn csv_numbers_rows_from_total_in_append_order() {
        let ledger = WinnerLedger::new(Rc::new(MemoryStore::new()));
        ledger.append(rec(0, "Gold", "Alice")).unwrap();
        ledger.append(rec(1, "Silver", "Bob")).unwrap();
        ledger.append(rec(2, "Bronze", "Carol")).unwrap();
        assert_eq!(
            ledger.to_csv(3),
            "PrizeNo,PrizeName,PersonName\n3,Gold,Alice\n2,Silver,Bob\n1,Bronze,Carol\n"
        );
    }

    #[test]
    fn empty_ledger_is_header_only() {
        let ledger = WinnerLedger::new(Rc::new(MemoryStore::new()));
        assert_eq!(ledger.to_csv(121), "PrizeNo,PrizeName,PersonName\n");
    }

    #[test]
    fn malformed_state_reads_as_empty_and_is_replaced_on_append() {
        let store = Rc::new(MemoryStore::new());
        store.set(WINNER_KEY, "not json").unwrap();
        let ledger = WinnerLedger::new(store.clone());
        assert!(ledger.records().is_empty());
        ledger.append(rec(0, "Gold", "Alice")).unwrap();
        assert_eq!(ledger.records(), vec![rec(0, "Gold", "Alice")]);
    }

    #[test]
    fn reads_legacy_stored_shape() {
        let store = Rc::new(MemoryStore::new());
        store
            .set(
                WINNER_KEY,
                r#"[{"PrizeName":"Gold","PersonName":"Alice","PrizeNo":0}]"#,
            )
            .unwrap();
        let ledger = WinnerLedger::new(store);
        assert_eq!(ledger.records(), vec![rec(0, "Gold", "Alice")]);
        assert_eq!(ledger.to_csv(3), "PrizeNo,PrizeName,PersonName\n3,Gold,Alice\n");
    }

    #[test]
    fn null_person_keeps_history_across_append() {
        let store = Rc::new(MemoryStore::new());
        store
            .set(
                WINNER_KEY,
                r#"[{"PrizeName":"Gold","PersonName":"Alice","PrizeNo":0},{"PrizeName":"Silver","PersonName":null,"PrizeNo":1}]"#,
            )
            .unwrap();
        let ledger = WinnerLedger::new(store.clone());
        assert_eq!(ledger.records(), vec![rec(0, "Gold", "Alice"), rec(1, "Silver", "")]);
        ledger.append(rec(2, "Bronze", "Carol")).unwrap();
        assert_eq!(
            ledger.records(),
            vec![rec(0, "Gold", "Alice"), rec(1, "Silver", ""), rec(2, "Bronze", "Carol")]
        );
        assert_eq!(
            ledger.to_csv(3),
            "PrizeNo,PrizeName,PersonName\n3,Gold,Alice\n2,Silver,\n1,Bronze,Carol\n"
        );
    }

    #[test]
    fn unreadable_entry_is_skipped_but_kept_in_storage() {
        let store = Rc::new(MemoryStore::new());
        store
            .set(
                WINNER_KEY,
                r#"[{"PrizeName":"Gold","PersonName":"Alice","PrizeNo":"first"}]"#,
            )
            .unwrap();
        let ledger = WinnerLedger::new(store.clone());
        assert!(ledger.records().is_empty());
        ledger.append(rec(1, "Silver", "Bob")).unwrap();
        assert_eq!(ledger.records(), vec![rec(1, "Silver", "Bob")]);
        let stored: Vec<Value> =
            serde_json::from_str(&store.get(WINNER_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["PrizeNo"], "first");
    }

    #[test]
    fn csv_quotes_fields_with_delimiters() {
        let records = [
            rec(0, "TV, 65\"", "Doe, Jane"),
            rec(1, "Mug", "Bob"),
        ];
        assert_eq!(
            render_csv(&records, 2),
            "PrizeNo,PrizeName,PersonName\n2,\"TV, 65\"\"\",\"Doe, Jane\"\n1,Mug,Bob\n"
        );
    }

    #[test]
    fn failed_write_keeps_prior_state() {
        let store = Rc::new(FlakyStore::default());
        let ledger = WinnerLedger::new(store.clone());
        ledger.append(rec(0, "Gold", "Alice")).unwrap();
        store.reject_writes.set(true);
        assert!(matches!(
            ledger.append(rec(1, "Silver", "Bob")),
            Err(DrawError::Storage(_))
        ));
        assert_eq!(ledger.records(), vec![rec(0, "Gold", "Alice")]);
    }

    #[test]
    fn clear_removes_winners_and_cursor() {
        let store = Rc::new(MemoryStore::new());
        store.set(PRIZE_INDEX_KEY, "2").unwrap();
        let ledger = WinnerLedger::new(store.clone());
        ledger.append(rec(0, "Gold", "Alice")).unwrap();
        ledger.clear().unwrap();
        assert_eq!(store.get(WINNER_KEY), None);
        assert_eq!(store.get(PRIZE_INDEX_KEY), None);
        assert_eq!(ledger.to_csv(3), "PrizeNo,PrizeName,PersonName\n");
    }
}
