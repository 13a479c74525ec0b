//! The editable table: edit-session state machine and channel endpoint.
//!
//! A table is either `Committed` (no edit session) or `Editing`. Channel
//! messages drive the transitions:
//!
//! - `add`: open a session if none is open, append a blank row, make every
//!   cell editable and focus the first cell of the new row
//! - `edit`: open a session if none is open and make every cell editable
//! - `readOnly`: make every cell read-only and restore the rows saved when
//!   the session opened
//! - `save`: validate the rows, publish the accepted ones as `change` and
//!   render them
//! - `data`: replace columns and rows; the session, if any, is left alone
//!   unless `data_abandons_session` is set
//!
//! The rows saved when a session opens are taken once per session; opening
//! edit mode again while a session is open keeps them.

use crate::cell::{Cell, CellMode};
use crate::column::Column;
use crate::config::TableConfig;
use crate::error::Result;
use crate::focus::{self, CellPosition, FocusTracker};
use crate::lifecycle::{AttributeChange, Attributes, Component};
use crate::message::{TableData, TableMessage};
use crate::record::Record;
use crate::row::{Row, RowSignal};
use crate::validate::{validate_rows, RowValidator};
use crate::view::{RowView, TableView};
use sync_channel::{ChannelHub, Envelope, SubscriberId, Subscription};

/// Whether an edit session is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableState {
    Committed,
    Editing,
}

/// Keys the table reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Select,
    Other,
}

/// Interaction on a data cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellEvent {
    /// The input surface was clicked or entered.
    Focus,
    /// The input text changed to the given value.
    Input(String),
    Key(Key),
}

/// Interaction on a row's delete trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerEvent {
    Activate,
    Key(Key),
}

/// Counters for one table instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Messages dispatched.
    pub received: u64,
    /// Messages that had no effect.
    pub ignored: u64,
    /// Successful saves.
    pub commits: u64,
    /// Sessions cancelled by `readOnly`.
    pub cancels: u64,
    /// `change` messages posted.
    pub published: u64,
}

#[derive(Clone, Debug)]
struct EditSession {
    saved: Vec<Record>,
}

/// One table instance.
pub struct EditableTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
    session: Option<EditSession>,
    focus: FocusTracker,
    config: TableConfig,
    validator: Box<dyn RowValidator>,
    hub: ChannelHub<TableMessage>,
    subscription: Option<Subscription<TableMessage>>,
    attributes: Attributes,
    stats: TableStats,
}

impl EditableTable {
    /// Create a table.
    ///
    /// # Arguments
    ///
    /// * `hub` - Hub the table opens its channel on.
    /// * `config` - Table configuration. If it names a channel, the channel
    ///   is opened right away.
    ///
    /// # Errors
    ///
    /// Fails if a configured rule does not compile or the channel cannot be
    /// opened.
    pub fn new(hub: ChannelHub<TableMessage>, config: TableConfig) -> Result<Self> {
        let validator = config.rule_set()?;
        let channel = config.channel.clone();

        let mut table = Self {
            columns: Vec::new(),
            rows: Vec::new(),
            session: None,
            focus: FocusTracker::new(),
            config,
            validator: Box::new(validator),
            hub,
            subscription: None,
            attributes: Attributes::new(),
            stats: TableStats::default(),
        };
        if let Some(name) = channel {
            table.open_channel(&name)?;
        }
        Ok(table)
    }

    /// Replace the validator used on `save`.
    pub fn with_validator(mut self, validator: impl RowValidator + 'static) -> Self {
        self.set_validator(validator);
        self
    }

    pub fn set_validator(&mut self, validator: impl RowValidator + 'static) {
        self.validator = Box::new(validator);
    }

    /// Set the record `add` appends.
    pub fn set_blank_record(&mut self, record: Record) {
        self.config.blank_record = Some(record);
    }

    // ========== Channel ==========

    /// Open the named channel, replacing any channel already open.
    ///
    /// On failure the previous channel stays open.
    pub fn open_channel(&mut self, name: &str) -> Result<()> {
        self.subscribe(name)?;
        self.attributes.set("channel", name);
        Ok(())
    }

    /// Leave the current channel, if any.
    pub fn close_channel(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            tracing::debug!("Table {} leaving channel {}", subscription.id(), subscription.name());
            subscription.close();
        }
    }

    fn subscribe(&mut self, name: &str) -> Result<()> {
        let subscription = self.hub.open(name)?;
        tracing::debug!("Table {} joined channel {}", subscription.id(), name);
        if let Some(mut previous) = self.subscription.replace(subscription) {
            previous.close();
        }
        Ok(())
    }

    pub fn channel_name(&self) -> Option<&str> {
        self.subscription.as_ref().map(|s| s.name().as_str())
    }

    pub fn subscriber_id(&self) -> Option<&SubscriberId> {
        self.subscription.as_ref().map(Subscription::id)
    }

    fn publish(&mut self, message: TableMessage) {
        let kind = message.kind();
        let Some(subscription) = self.subscription.as_mut() else {
            tracing::warn!("No channel open, {} not published", kind);
            return;
        };
        match subscription.post(message) {
            Ok(delivered) => {
                self.stats.published += 1;
                tracing::debug!("Published {} to {} subscriber(s)", kind, delivered);
            }
            Err(e) => tracing::warn!("Failed to publish {}: {}", kind, e),
        }
    }

    // ========== Inbound Messages ==========

    /// Handle an envelope from the channel. Envelopes this table posted
    /// itself are dropped.
    pub fn handle_envelope(&mut self, envelope: Envelope<TableMessage>) {
        if self.subscriber_id() == Some(&envelope.sender) {
            tracing::trace!("Ignoring own {} (seq {})", envelope.payload.kind(), envelope.seq);
            self.stats.ignored += 1;
            return;
        }
        self.dispatch(envelope.payload);
    }

    /// Process every envelope already queued on the channel.
    ///
    /// Returns the number of envelopes taken from the queue.
    pub fn pump(&mut self) -> usize {
        let envelopes = match self.subscription.as_mut() {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        let count = envelopes.len();
        for envelope in envelopes {
            self.handle_envelope(envelope);
        }
        count
    }

    /// Process envelopes as they arrive until the channel closes.
    ///
    /// Returns the number of envelopes processed.
    pub async fn run(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                break;
            };
            let Some(envelope) = subscription.recv().await else {
                break;
            };
            self.handle_envelope(envelope);
            processed += 1;
        }
        processed
    }

    /// Apply one message.
    pub fn dispatch(&mut self, message: TableMessage) {
        self.stats.received += 1;
        tracing::debug!("Table received {}", message.kind());
        match message {
            TableMessage::Add => self.on_add(),
            TableMessage::Data(data) => self.on_table_data(data),
            TableMessage::Edit => self.on_edit(),
            TableMessage::ReadOnly => self.on_read_only(),
            TableMessage::Save => self.on_save(),
            TableMessage::Change(rows) => self.on_peer_change(rows),
            TableMessage::Unknown => {
                tracing::trace!("Ignoring unknown message");
                self.stats.ignored += 1;
            }
        }
    }

    // ========== Transitions ==========

    fn open_session(&mut self) {
        if self.session.is_none() {
            let saved = self.records();
            tracing::debug!("Edit session opened, {} row(s) saved", saved.len());
            self.session = Some(EditSession { saved });
        }
    }

    fn install_handlers(&mut self) {
        for row in &mut self.rows {
            row.install_handlers();
        }
    }

    fn on_add(&mut self) {
        self.open_session();

        let blank = self.blank_record();
        self.rows
            .push(Row::render(&self.columns, &blank, CellMode::Editable));
        let new_row = self.rows.len() - 1;
        self.rows[new_row].handle(RowSignal::Data(blank));

        self.install_handlers();
        self.focus
            .set(focus::first_cell_of_row(&self.rows, new_row));
        self.focus.restore(&self.rows);
    }

    fn on_edit(&mut self) {
        self.open_session();
        self.install_handlers();
        self.focus.restore(&self.rows);
    }

    fn on_read_only(&mut self) {
        for row in &mut self.rows {
            row.set_mode(CellMode::ReadOnly);
        }
        if let Some(session) = self.session.take() {
            tracing::debug!("Edit session cancelled, restoring {} row(s)", session.saved.len());
            self.render_rows(session.saved);
            self.stats.cancels += 1;
        }
        self.focus.reset();
    }

    fn on_save(&mut self) {
        if self.session.is_none() {
            tracing::debug!("Save ignored, no edit session");
            self.stats.ignored += 1;
            return;
        }

        if let Some(position) = focus::locate(&self.rows, self.focus.index()) {
            if let Some(cell) = self.rows[position.row].cell_mut(position.column) {
                cell.set_mode(CellMode::ReadOnly);
            }
        }
        self.session = None;
        self.focus.reset();

        let records = self.records();
        let valid = validate_rows(&records, self.validator.as_ref());
        if valid.len() < records.len() {
            tracing::debug!("Dropped {} invalid row(s) on save", records.len() - valid.len());
        }

        self.publish(TableMessage::Change(valid.clone()));
        self.render_rows(valid);
        self.stats.commits += 1;
    }

    fn on_table_data(&mut self, data: TableData) {
        if self.config.data_abandons_session && self.session.take().is_some() {
            tracing::debug!("Edit session abandoned by data");
            self.focus.reset();
        }
        self.render_header(data.column_data);
        self.render_rows(data.row_data);
    }

    fn on_peer_change(&mut self, rows: Vec<Record>) {
        if !self.config.adopt_peer_changes {
            self.stats.ignored += 1;
            return;
        }
        if self.session.is_some() {
            tracing::debug!("Peer change ignored during edit session");
            self.stats.ignored += 1;
            return;
        }
        self.render_rows(rows);
    }

    fn render_header(&mut self, columns: Vec<Column>) {
        self.columns = columns;
    }

    fn render_rows(&mut self, records: Vec<Record>) {
        self.rows = records
            .into_iter()
            .map(|r| Row::new(&self.columns, r, CellMode::ReadOnly))
            .collect();
        self.focus.restore(&self.rows);
    }

    fn blank_record(&self) -> Record {
        self.config
            .blank_record
            .clone()
            .unwrap_or_else(|| Record::blank_for(&self.columns))
    }

    // ========== Cell Interaction ==========

    /// Handle interaction on the data cell at a flattened position.
    ///
    /// Only cells made editable by an edit session react. Returns `false` if
    /// the event was ignored.
    pub fn cell_event(&mut self, index: usize, event: CellEvent) -> bool {
        let Some(position) = focus::locate(&self.rows, index) else {
            tracing::trace!("Cell event for stale index {}", index);
            return false;
        };
        let interactive = self.rows[position.row]
            .cell(position.column)
            .is_some_and(|c| c.is_listening() && c.mode().is_editable());
        if !interactive {
            return false;
        }

        match event {
            CellEvent::Focus | CellEvent::Key(Key::Tab) => {
                self.focus.set(index);
                self.focus.restore(&self.rows);
            }
            CellEvent::Input(text) => {
                let row = &mut self.rows[position.row];
                let Some(cell) = row.cell_mut(position.column) else {
                    return false;
                };
                cell.type_input(&text);
                cell.set_value(&text);
                let property = cell.property().to_string();
                tracing::trace!("Patching {} on row {}", property, position.row);
                row.handle(RowSignal::Patch {
                    property,
                    changes: text,
                });
            }
            CellEvent::Key(_) => return false,
        }
        true
    }

    /// Handle interaction on a row's delete trigger.
    ///
    /// Activation, Enter and Select move the focus index to the row's first
    /// cell and delete the row; Tab only moves the focus index. Returns
    /// `false` if the event was ignored.
    pub fn delete_event(&mut self, row: usize, event: TriggerEvent) -> bool {
        let Some(target) = self.rows.get(row) else {
            return false;
        };
        let trigger = target.delete_trigger();
        if !(trigger.is_listening() && trigger.is_visible()) {
            return false;
        }

        let first = focus::first_cell_of_row(&self.rows, row);
        match event {
            TriggerEvent::Activate
            | TriggerEvent::Key(Key::Enter)
            | TriggerEvent::Key(Key::Select) => {
                self.focus.set(first);
                self.focus.restore(&self.rows);
                self.delete_row(row)
            }
            TriggerEvent::Key(Key::Tab) => {
                self.focus.set(first);
                self.focus.restore(&self.rows);
                true
            }
            TriggerEvent::Key(Key::Other) => false,
        }
    }

    fn delete_row(&mut self, row: usize) -> bool {
        let deleted = self.rows[row].handle(RowSignal::Delete);
        self.rows.retain(|r| !r.is_detached());
        if deleted {
            tracing::debug!("Row {} deleted, {} row(s) left", row, self.rows.len());
            self.focus.restore(&self.rows);
        }
        deleted
    }

    // ========== Inspection ==========

    pub fn state(&self) -> TableState {
        if self.session.is_some() {
            TableState::Editing
        } else {
            TableState::Committed
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state() == TableState::Editing
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_count(&self) -> usize {
        focus::cell_count(&self.rows)
    }

    /// Cell at a flattened position.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        let position = focus::locate(&self.rows, index)?;
        self.rows[position.row].cell(position.column)
    }

    /// Current row records, in row order.
    pub fn records(&self) -> Vec<Record> {
        self.rows.iter().map(|r| r.record().clone()).collect()
    }

    /// Rows saved when the current session opened.
    pub fn snapshot(&self) -> Option<&[Record]> {
        self.session.as_ref().map(|s| s.saved.as_slice())
    }

    pub fn focus_index(&self) -> usize {
        self.focus.index()
    }

    pub fn focused_cell(&self) -> Option<CellPosition> {
        self.focus.focused()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }

    pub fn view(&self) -> TableView<'_> {
        TableView {
            state: self.state(),
            header: &self.columns,
            rows: self
                .rows
                .iter()
                .map(|row| RowView {
                    cells: row.cells().iter().map(Cell::view).collect(),
                    delete_visible: row.delete_trigger().is_visible(),
                })
                .collect(),
            focused: self.focus.focused(),
        }
    }

    pub fn render_text(&self) -> String {
        self.view().to_text()
    }
}

impl Component for EditableTable {
    fn observed_attributes(&self) -> &'static [&'static str] {
        &["channel"]
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    fn attribute_changed(&mut self, change: &AttributeChange) {
        if change.name == "channel" {
            if let Err(e) = self.subscribe(&change.next) {
                tracing::warn!("Failed to open channel {}: {}", change.next, e);
                // The attribute keeps naming the channel that is still open.
                match change.previous.as_deref() {
                    Some(previous) => {
                        self.attributes.set("channel", previous);
                    }
                    None => {
                        self.attributes.remove("channel");
                    }
                }
            }
        }
    }

    fn connected(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        if let Some(name) = self.attributes.get("channel").map(str::to_string) {
            if let Err(e) = self.subscribe(&name) {
                tracing::warn!("Failed to reopen channel {}: {}", name, e);
            }
        }
    }

    fn disconnected(&mut self) {
        self.close_channel();
    }
}

impl std::fmt::Debug for EditableTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditableTable")
            .field("state", &self.state())
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .field("focus", &self.focus)
            .field("channel", &self.channel_name())
            .finish_non_exhaustive()
    }
}
