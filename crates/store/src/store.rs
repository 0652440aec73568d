//! SQLite storage for wallet state

use crate::error::StoreError;
use cosign_core::{Address, Amount};
use cosign_governance::{
    CandidatePayload, EventRecord, Payload, Proposal, RemovalPayload, RequiredVotesPayload,
    TransactionPayload, WalletSnapshot,
};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::de::DeserializeOwned;
use std::path::Path;

/// SQLite storage for one wallet
pub struct WalletStore {
    conn: Connection,
}

impl WalletStore {
    /// Open (or create) a store at the given database path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wallet (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                account TEXT NOT NULL,
                required_votes INTEGER NOT NULL,
                default_window_secs INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS owners (
                position INTEGER PRIMARY KEY,
                address TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS proposals (
                kind TEXT NOT NULL,
                id INTEGER NOT NULL,
                proposer TEXT NOT NULL,
                ends_at INTEGER NOT NULL,
                approvals INTEGER NOT NULL,
                applied_at INTEGER,
                proposal_json TEXT NOT NULL,
                PRIMARY KEY (kind, id)
            );

            CREATE TABLE IF NOT EXISTS balances (
                address TEXT PRIMARY KEY,
                amount TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS events (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                at INTEGER NOT NULL,
                name TEXT NOT NULL,
                record_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_name ON events(name);",
        )?;
        Ok(())
    }

    /// Whether a wallet has been saved
    pub fn is_initialized(&self) -> Result<bool, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM wallet", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Replace the stored wallet state with `snapshot`
    pub fn save_snapshot(&mut self, snapshot: &WalletSnapshot) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        write_snapshot(&tx, snapshot)?;
        tx.commit()?;
        Ok(())
    }

    /// Write wallet state, host balances and new events in one transaction.
    ///
    /// Either all three land or the store keeps its previous contents.
    pub fn commit(
        &mut self,
        snapshot: &WalletSnapshot,
        balances: &[(Address, Amount)],
        events: &[EventRecord],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        write_snapshot(&tx, snapshot)?;
        write_balances(&tx, balances)?;
        write_events(&tx, events)?;
        tx.commit()?;

        tracing::debug!(
            owners = snapshot.owners.len(),
            balances = balances.len(),
            events = events.len(),
            "Wallet state committed"
        );
        Ok(())
    }

    /// Load the stored wallet state, if any
    pub fn load_snapshot(&self) -> Result<Option<WalletSnapshot>, StoreError> {
        let header = self
            .conn
            .query_row(
                "SELECT account, required_votes, default_window_secs FROM wallet WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u64>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((account, required_votes, default_window_secs)) = header else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare("SELECT address FROM owners ORDER BY position")?;
        let owners = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .map(|text| parse_address(text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(WalletSnapshot {
            account: parse_address(&account)?,
            owners,
            required_votes,
            default_window_secs,
            transactions: self.load_proposals::<TransactionPayload>()?,
            candidates: self.load_proposals::<CandidatePayload>()?,
            removals: self.load_proposals::<RemovalPayload>()?,
            required_changes: self.load_proposals::<RequiredVotesPayload>()?,
        }))
    }

    fn load_proposals<P: Payload>(&self) -> Result<Vec<Proposal<P>>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT proposal_json FROM proposals WHERE kind = ?1 ORDER BY id")?;

        let rows = stmt
            .query_map(params![P::KIND.to_string()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    /// Stored host balances, sorted by address
    pub fn load_balances(&self) -> Result<Vec<(Address, Amount)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT address, amount FROM balances ORDER BY address")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(address, amount)| {
                let amount = amount
                    .parse::<Amount>()
                    .map_err(|e| StoreError::Corrupt(format!("balance of {address}: {e}")))?;
                Ok((parse_address(address)?, amount))
            })
            .collect()
    }

    /// All events, oldest first
    pub fn list_events(&self) -> Result<Vec<EventRecord>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT record_json FROM events ORDER BY seq")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        decode_events(&rows)
    }

    /// The newest `limit` events, oldest first
    pub fn recent_events(&self, limit: usize) -> Result<Vec<EventRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT record_json FROM (
                SELECT seq, record_json FROM events ORDER BY seq DESC LIMIT ?1
             ) ORDER BY seq",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        decode_events(&rows)
    }
}

fn write_snapshot(tx: &Transaction<'_>, snapshot: &WalletSnapshot) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR REPLACE INTO wallet (id, account, required_votes, default_window_secs)
         VALUES (1, ?1, ?2, ?3)",
        params![
            snapshot.account.to_string(),
            snapshot.required_votes,
            snapshot.default_window_secs,
        ],
    )?;

    tx.execute("DELETE FROM owners", [])?;
    for (position, owner) in snapshot.owners.iter().enumerate() {
        tx.execute(
            "INSERT INTO owners (position, address) VALUES (?1, ?2)",
            params![position, owner.to_string()],
        )?;
    }

    tx.execute("DELETE FROM proposals", [])?;
    insert_proposals(tx, &snapshot.transactions)?;
    insert_proposals(tx, &snapshot.candidates)?;
    insert_proposals(tx, &snapshot.removals)?;
    insert_proposals(tx, &snapshot.required_changes)?;

    tracing::debug!(
        owners = snapshot.owners.len(),
        transactions = snapshot.transactions.len(),
        "Snapshot written"
    );
    Ok(())
}

fn write_balances(tx: &Transaction<'_>, balances: &[(Address, Amount)]) -> Result<(), StoreError> {
    tx.execute("DELETE FROM balances", [])?;
    for (address, amount) in balances {
        tx.execute(
            "INSERT INTO balances (address, amount) VALUES (?1, ?2)",
            params![address.to_string(), amount.to_string()],
        )?;
    }
    Ok(())
}

fn write_events(tx: &Transaction<'_>, records: &[EventRecord]) -> Result<(), StoreError> {
    for record in records {
        tx.execute(
            "INSERT INTO events (at, name, record_json) VALUES (?1, ?2, ?3)",
            params![
                record.at.as_secs(),
                record.event.name(),
                serde_json::to_string(record)?,
            ],
        )?;
    }
    Ok(())
}

fn insert_proposals<P: Payload>(
    tx: &Transaction<'_>,
    proposals: &[Proposal<P>],
) -> Result<(), StoreError> {
    for proposal in proposals {
        tx.execute(
            "INSERT INTO proposals
             (kind, id, proposer, ends_at, approvals, applied_at, proposal_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                P::KIND.to_string(),
                proposal.id,
                proposal.proposer.to_string(),
                proposal.window.end.as_secs(),
                proposal.approval_count(),
                proposal.applied_at().map(|at| at.as_secs()),
                serde_json::to_string(proposal)?,
            ],
        )?;
    }
    Ok(())
}

fn decode_events<T: DeserializeOwned>(rows: &[String]) -> Result<Vec<T>, StoreError> {
    rows.iter()
        .map(|json| serde_json::from_str(json).map_err(StoreError::from))
        .collect()
}

fn parse_address(text: &str) -> Result<Address, StoreError> {
    text.parse()
        .map_err(|e| StoreError::Corrupt(format!("address {text}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosign_core::{CallData, Timestamp};
    use cosign_governance::{GovernanceEvent, Wallet};
    use cosign_host::{InMemoryLedger, ManualClock};

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn wallet() -> Wallet<ManualClock, InMemoryLedger> {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(addr(0xaa), Amount::units(5)).unwrap();

        let mut wallet = Wallet::new(
            addr(0xaa),
            (1..=3).map(addr).collect(),
            2,
            ManualClock::new(Timestamp::from_secs(100)),
            ledger,
        )
        .unwrap();

        let tx = wallet
            .submit_transaction(addr(1), addr(9), Amount::units(1), CallData::empty(), 60)
            .unwrap();
        wallet.confirm_transaction(addr(1), tx).unwrap();
        wallet.confirm_transaction(addr(2), tx).unwrap();
        wallet.add_owner_candidate(addr(3), addr(4), 60).unwrap();
        wallet
    }

    #[test]
    fn test_empty_store() {
        let store = WalletStore::in_memory().unwrap();
        assert!(!store.is_initialized().unwrap());
        assert!(store.load_snapshot().unwrap().is_none());
        assert!(store.load_balances().unwrap().is_empty());
        assert!(store.list_events().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.db");
        let wallet = wallet();
        let snapshot = wallet.snapshot();

        {
            let mut store = WalletStore::open(&path).unwrap();
            store
                .commit(&snapshot, &wallet.executor().balances(), &[])
                .unwrap();
        }

        let store = WalletStore::open(&path).unwrap();
        assert!(store.is_initialized().unwrap());
        assert_eq!(store.load_snapshot().unwrap(), Some(snapshot));
        assert_eq!(
            store.load_balances().unwrap(),
            vec![(addr(9), Amount::units(1)), (addr(0xaa), Amount::units(4))]
        );
    }

    #[test]
    fn test_save_replaces_previous_state() {
        let mut store = WalletStore::in_memory().unwrap();
        let mut wallet = wallet();
        store.save_snapshot(&wallet.snapshot()).unwrap();

        wallet.vote_candidate(addr(1), 0).unwrap();
        wallet.vote_candidate(addr(2), 0).unwrap();
        store.save_snapshot(&wallet.snapshot()).unwrap();

        let loaded = store.load_snapshot().unwrap().unwrap();
        assert_eq!(loaded.owners.len(), 4);
        assert_eq!(loaded.required_votes, 3);
        assert!(loaded.candidates[0].is_terminal());
        assert_eq!(loaded, wallet.snapshot());
    }

    #[test]
    fn test_events_keep_order() {
        let mut store = WalletStore::in_memory().unwrap();
        let mut wallet = wallet();
        let records = wallet.drain_events();
        store.commit(&wallet.snapshot(), &[], &records).unwrap();
        store.commit(&wallet.snapshot(), &[], &[]).unwrap();

        let listed = store.list_events().unwrap();
        assert_eq!(listed, records);

        let recent = store.recent_events(2).unwrap();
        assert_eq!(recent, records[records.len() - 2..].to_vec());
        assert!(matches!(
            recent[1].event,
            GovernanceEvent::ProposalCreated { .. }
        ));
    }

    #[test]
    fn test_commit_writes_everything() {
        let mut store = WalletStore::in_memory().unwrap();
        let mut wallet = wallet();
        let events = wallet.drain_events();
        let balances = wallet.executor().balances();

        store.commit(&wallet.snapshot(), &balances, &events).unwrap();

        assert_eq!(store.load_snapshot().unwrap(), Some(wallet.snapshot()));
        assert_eq!(store.load_balances().unwrap(), balances);
        assert_eq!(store.list_events().unwrap(), events);
    }

    #[test]
    fn test_failed_commit_keeps_previous_rows() {
        let mut store = WalletStore::in_memory().unwrap();
        let mut ledger = InMemoryLedger::new();
        ledger.fund(addr(0xaa), Amount::units(5)).unwrap();
        let mut wallet = Wallet::new(
            addr(0xaa),
            (1..=3).map(addr).collect(),
            2,
            ManualClock::new(Timestamp::from_secs(100)),
            ledger,
        )
        .unwrap();
        let before = wallet.snapshot();
        let before_balances = wallet.executor().balances();
        store.commit(&before, &before_balances, &[]).unwrap();

        let tx = wallet
            .submit_transaction(addr(1), addr(9), Amount::units(1), CallData::empty(), 60)
            .unwrap();
        wallet.confirm_transaction(addr(1), tx).unwrap();
        wallet.confirm_transaction(addr(2), tx).unwrap();
        assert!(wallet.transaction(tx).unwrap().is_terminal());

        // The last write of the batch fails
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_events BEFORE INSERT ON events
                 BEGIN SELECT RAISE(ABORT, 'events rejected'); END;",
            )
            .unwrap();

        let result = store.commit(
            &wallet.snapshot(),
            &wallet.executor().balances(),
            &wallet.drain_events(),
        );
        assert!(matches!(result, Err(StoreError::Database(_))));

        let stored = store.load_snapshot().unwrap().unwrap();
        assert_eq!(stored, before);
        assert!(stored.transactions.is_empty());
        assert_eq!(store.load_balances().unwrap(), before_balances);
        assert!(store.list_events().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_address_reported() {
        let store = WalletStore::in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO balances (address, amount) VALUES ('nowhere', '1')",
                [],
            )
            .unwrap();
        assert!(matches!(store.load_balances(), Err(StoreError::Corrupt(_))));
    }
}
