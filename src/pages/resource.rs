//! Resource listings: fetch, tabulate, and track per-page load state.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use super::kind::PageKind;
use crate::api::ApiClient;
use crate::error::ShellResult;

/// Rows and columns built from an API reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResourceTable {
    /// Tabulate a JSON array of objects, or an object with an `Items` array.
    ///
    /// Columns appear in first-seen order. A bare object becomes one row;
    /// scalars become a single `value` column.
    pub fn from_json(value: &Value) -> Self {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => match map.get("Items") {
                Some(Value::Array(items)) => items.iter().collect(),
                _ => vec![value],
            },
            Value::Null => Vec::new(),
            scalar => vec![scalar],
        };

        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for item in &items {
            match item {
                Value::Object(map) => {
                    for key in map.keys() {
                        if seen.insert(key.as_str()) {
                            columns.push(key.clone());
                        }
                    }
                }
                _ => {
                    if seen.insert("value") {
                        columns.push("value".to_string());
                    }
                }
            }
        }

        let rows = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|column| match item {
                        Value::Object(map) => map.get(column).map(cell_text).unwrap_or_default(),
                        other if column == "value" => cell_text(other),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Display text for one cell.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// What a page shows once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    Table(ResourceTable),
    Notice(String),
}

/// Load state of one page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Idle,
    Loading,
    Loaded(ResourceTable),
    Notice(String),
    Failed(String),
}

impl From<PageContent> for PageState {
    fn from(content: PageContent) -> Self {
        match content {
            PageContent::Table(table) => PageState::Loaded(table),
            PageContent::Notice(text) => PageState::Notice(text),
        }
    }
}

/// Fetch what `page` displays from the API named `api_name`.
pub async fn fetch_page(api: &ApiClient, api_name: &str, page: PageKind) -> ShellResult<PageContent> {
    let Some(entry_type) = page.entry_type() else {
        return Ok(PageContent::Notice(String::new()));
    };
    debug!(page = page.title(), entry_type, "Fetching page");
    let reply = api.get(api_name, "/", &[("function", entry_type)]).await?;

    Ok(match page {
        PageKind::Refresh => PageContent::Notice(refresh_message(&reply)),
        _ => PageContent::Table(ResourceTable::from_json(&reply)),
    })
}

fn refresh_message(reply: &Value) -> String {
    match reply {
        Value::String(text) => text.clone(),
        Value::Object(map) => ["message", "body", "status"]
            .iter()
            .find_map(|key| map.get(*key).map(cell_text))
            .unwrap_or_else(|| reply.to_string()),
        Value::Null => "Refresh requested.".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
struct PageEntry {
    generation: u64,
    state: PageState,
}

/// Per-path page states. Each load gets a generation; a result for an older
/// generation is dropped.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    entries: HashMap<String, PageEntry>,
    next_generation: u64,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` loading and return the generation its result must carry.
    pub fn begin(&mut self, path: &str) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.entries.insert(
            path.to_string(),
            PageEntry {
                generation,
                state: PageState::Loading,
            },
        );
        generation
    }

    /// Store a result. Returns false (and changes nothing) if it is stale.
    pub fn finish(&mut self, path: &str, generation: u64, state: PageState) -> bool {
        match self.entries.get_mut(path) {
            Some(entry) if entry.generation == generation => {
                entry.state = state;
                true
            }
            _ => {
                debug!(path, generation, "Dropping stale page result");
                false
            }
        }
    }

    /// Whether `generation` is the latest load of `path`.
    pub fn is_current(&self, path: &str, generation: u64) -> bool {
        self.entries
            .get(path)
            .is_some_and(|entry| entry.generation == generation)
    }

    pub fn state(&self, path: &str) -> &PageState {
        static IDLE: PageState = PageState::Idle;
        self.entries.get(path).map(|e| &e.state).unwrap_or(&IDLE)
    }

    /// Forget every page (after sign-out or session loss).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
