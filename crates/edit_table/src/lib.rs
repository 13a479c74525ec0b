//! Editable table with validated commits, synchronized over named channels.
//!
//! An [`EditableTable`] renders rows of [`Record`]s under a list of
//! [`Column`]s. It is driven entirely by [`TableMessage`]s arriving on a
//! [`sync_channel`] channel: `add` and `edit` open an edit session, `readOnly`
//! cancels it and `save` validates and commits it, posting the accepted rows
//! back on the channel as `change`.
//!
//! # Modules
//!
//! - `table`: the edit-session state machine
//! - `row`, `cell`: reactive row state and the cells that show it
//! - `focus`: the flattened focus index
//! - `validate`: row validators and configurable column rules
//! - `message`: the channel protocol
//! - `lifecycle`: attribute and connect/disconnect callbacks
//! - `view`: read-only display projection
//!
//! # Example
//!
//! ```
//! use edit_table::{ChannelHub, EditableTable, TableConfig, TableMessage};
//!
//! let hub = ChannelHub::with_defaults();
//! let config = TableConfig { channel: Some("t1".into()), ..Default::default() };
//! let mut table = EditableTable::new(hub.clone(), config).unwrap();
//! let mut owner = hub.open("t1").unwrap();
//!
//! owner.post(TableMessage::Add).unwrap();
//! table.pump();
//! assert!(table.is_editing());
//! ```

pub mod cell;
pub mod column;
pub mod config;
pub mod error;
pub mod focus;
pub mod lifecycle;
pub mod message;
pub mod record;
pub mod row;
pub mod table;
pub mod validate;
pub mod view;

pub use cell::{Cell, CellMode, CellView, DeleteTrigger};
pub use column::{Align, Column};
pub use config::TableConfig;
pub use error::{Result, TableError};
pub use focus::{CellPosition, FocusTracker};
pub use lifecycle::{AttributeChange, Attributes, Component};
pub use message::{TableData, TableMessage};
pub use record::Record;
pub use row::{Row, RowSignal};
pub use table::{CellEvent, EditableTable, Key, TableState, TableStats, TriggerEvent};
pub use validate::{validate_rows, AcceptAll, RowValidator, RuleConfig, RuleKind, RuleSet};
pub use view::{RowView, TableView};

pub use sync_channel::{ChannelHub, Envelope, HubConfig, Loopback, Subscription};
