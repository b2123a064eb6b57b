//! Grid change notifications and the listener registry

use crate::csv::CellPosition;

use super::Selection;

/// A change reported by the grid view
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    CellChanged { pos: CellPosition },
    RowsInserted { at: usize, count: usize },
    RowsDeleted { at: usize, count: usize },
    RowMoved { from: usize, to: usize },
    ColumnsInserted { at: usize, count: usize },
    ColumnsDeleted { at: usize, count: usize },
    ColumnMoved { from: usize, to: usize },
    ColumnResized { col: usize, width: f32 },
    SelectionChanged(Option<Selection>),
    /// All data was replaced (external reload)
    DataReplaced,
}

/// Discriminant of a [`GridEvent`], used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEventKind {
    CellChanged,
    RowsInserted,
    RowsDeleted,
    RowMoved,
    ColumnsInserted,
    ColumnsDeleted,
    ColumnMoved,
    ColumnResized,
    SelectionChanged,
    DataReplaced,
}

impl GridEventKind {
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl GridEvent {
    pub fn kind(&self) -> GridEventKind {
        match self {
            GridEvent::CellChanged { .. } => GridEventKind::CellChanged,
            GridEvent::RowsInserted { .. } => GridEventKind::RowsInserted,
            GridEvent::RowsDeleted { .. } => GridEventKind::RowsDeleted,
            GridEvent::RowMoved { .. } => GridEventKind::RowMoved,
            GridEvent::ColumnsInserted { .. } => GridEventKind::ColumnsInserted,
            GridEvent::ColumnsDeleted { .. } => GridEventKind::ColumnsDeleted,
            GridEvent::ColumnMoved { .. } => GridEventKind::ColumnMoved,
            GridEvent::ColumnResized { .. } => GridEventKind::ColumnResized,
            GridEvent::SelectionChanged(_) => GridEventKind::SelectionChanged,
            GridEvent::DataReplaced => GridEventKind::DataReplaced,
        }
    }

    /// Whether the event changes the text the grid serializes to
    pub fn changes_content(&self) -> bool {
        EventMask::CONTENT.contains(self.kind())
    }
}

/// Set of event kinds a listener receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u16);

impl EventMask {
    /// Edits and structural changes that alter cell contents or coordinates
    pub const CONTENT: EventMask = EventMask(
        (1 << GridEventKind::CellChanged as u16)
            | (1 << GridEventKind::RowsInserted as u16)
            | (1 << GridEventKind::RowsDeleted as u16)
            | (1 << GridEventKind::RowMoved as u16)
            | (1 << GridEventKind::ColumnsInserted as u16)
            | (1 << GridEventKind::ColumnsDeleted as u16)
            | (1 << GridEventKind::ColumnMoved as u16),
    );

    pub const ALL: EventMask = EventMask(u16::MAX);

    pub fn of(kinds: &[GridEventKind]) -> Self {
        EventMask(kinds.iter().fold(0, |acc, k| acc | k.bit()))
    }

    pub fn with(self, kind: GridEventKind) -> Self {
        EventMask(self.0 | kind.bit())
    }

    pub fn contains(self, kind: GridEventKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

/// Handle returned by [`Listeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of detachable grid listeners.
///
/// Lives with the editor rather than the view, so subscriptions survive the
/// view being destroyed and recreated.
#[derive(Debug, Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, EventMask)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, mask: EventMask) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, mask));
        tracing::debug!(?id, "grid listener attached");
        id
    }

    /// Detach a listener. Returns false if it was not attached.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        let removed = self.entries.len() != before;
        if removed {
            tracing::debug!(?id, "grid listener detached");
        }
        removed
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    /// Listeners interested in `event`, in subscription order
    pub fn recipients(&self, event: &GridEvent) -> Vec<ListenerId> {
        let kind = event.kind();
        self.entries
            .iter()
            .filter(|(_, mask)| mask.contains(kind))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
