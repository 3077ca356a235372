use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::config::TableDefaults;
use crate::domain::PlayerId;
use crate::error::AppError;
use crate::table::protocol::{ClientMsg, Outbound, ServerMsg};
use crate::table::session::TableSession;

/// Every open table, each behind its own lock so tables never wait on
/// each other while messages to one table apply strictly in order.
pub struct TableHub {
    tables: DashMap<Uuid, Arc<Mutex<TableSession>>>,
    defaults: TableDefaults,
}

impl TableHub {
    pub fn new(defaults: TableDefaults) -> Self {
        Self {
            tables: DashMap::new(),
            defaults,
        }
    }

    /// Open a table; `seed` fixes every shuffle for replays and tests.
    pub fn create_table(&self, name: &str, seed: Option<u64>) -> Uuid {
        let id = Uuid::new_v4();
        let seed = seed.unwrap_or_else(rand::random);
        let session = TableSession::new(id, name, self.defaults.settings.clone(), seed);
        self.tables.insert(id, Arc::new(Mutex::new(session)));
        info!(table_id = %id, name, "Table created");
        id
    }

    pub fn get(&self, id: Uuid) -> Result<Arc<Mutex<TableSession>>, AppError> {
        self.tables
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::table_not_found(format!("No table {id}")))
    }

    pub fn remove_table(&self, id: Uuid) -> Result<(), AppError> {
        self.tables
            .remove(&id)
            .map(|_| info!(table_id = %id, "Table closed"))
            .ok_or_else(|| AppError::table_not_found(format!("No table {id}")))
    }

    pub fn table_ids(&self) -> Vec<Uuid> {
        self.tables.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Route one message to its table; rejections come back as an error
    /// addressed to the sender.
    pub fn dispatch(&self, table: Uuid, who: &PlayerId, msg: ClientMsg) -> Vec<Outbound> {
        match self.get(table) {
            Ok(session) => session.lock().handle_or_reject(who, msg),
            Err(err) => vec![reject(who, &err)],
        }
    }

    /// [`TableHub::dispatch`] for a raw JSON frame.
    pub fn dispatch_json(&self, table: Uuid, who: &PlayerId, frame: &str) -> Vec<Outbound> {
        match serde_json::from_str::<ClientMsg>(frame) {
            Ok(msg) => self.dispatch(table, who, msg),
            Err(err) => vec![reject(who, &AppError::from(err))],
        }
    }
}

fn reject(who: &PlayerId, err: &AppError) -> Outbound {
    Outbound::to(
        who,
        ServerMsg::Error {
            code: err.code(),
            message: err.detail().to_string(),
        },
    )
}
