use std::rc::Rc;

use crate::model::ApplicationEntry;
use crate::usage::UsageHistory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchAction {
    LaunchApp {
        identity: String,
        display_name: String,
        command: String,
    },
    CopyText(String),
    OpenUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchResult {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: String,
    pub score: u32,
    pub action: LaunchAction,
}

/// Inline text shown after the typed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub text: String,
    pub icon: Option<String>,
}

/// Read-only view handed to providers for one query.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub catalog: &'a [ApplicationEntry],
    pub usage: &'a UsageHistory,
    pub max_results: usize,
}

pub trait LauncherProvider {
    fn name(&self) -> &'static str;
    fn priority(&self) -> i32;
    fn can_handle(&self, query: &str) -> bool;
    fn search(&self, query: &str, ctx: &SearchContext<'_>) -> Vec<LaunchResult>;
}

pub trait PreviewProvider {
    fn preview(&self, query: &str, ctx: &SearchContext<'_>) -> Option<Preview>;
}

pub struct RegisteredProvider {
    provider: Rc<dyn LauncherProvider>,
    preview: Option<Rc<dyn PreviewProvider>>,
}

impl RegisteredProvider {
    pub fn provider(&self) -> &dyn LauncherProvider {
        self.provider.as_ref()
    }

    pub fn preview(&self) -> Option<&dyn PreviewProvider> {
        self.preview.as_deref()
    }
}

/// Providers ordered by descending priority; equal priorities keep
/// registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<RegisteredProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P>(&mut self, provider: P)
    where
        P: LauncherProvider + 'static,
    {
        self.insert(RegisteredProvider {
            provider: Rc::new(provider),
            preview: None,
        });
    }

    pub fn register_with_preview<P>(&mut self, provider: P)
    where
        P: LauncherProvider + PreviewProvider + 'static,
    {
        let shared = Rc::new(provider);
        let preview: Rc<dyn PreviewProvider> = shared.clone();
        self.insert(RegisteredProvider {
            provider: shared,
            preview: Some(preview),
        });
    }

    fn insert(&mut self, entry: RegisteredProvider) {
        let priority = entry.provider.priority();
        let position = self
            .entries
            .iter()
            .position(|existing| existing.provider.priority() < priority)
            .unwrap_or(self.entries.len());
        log::debug!(
            "registered provider name={} priority={priority} preview={}",
            entry.provider.name(),
            entry.preview.is_some()
        );
        self.entries.insert(position, entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProvider> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.provider.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Results of every provider that handles `query`, in priority order.
    pub fn search(&self, query: &str, ctx: &SearchContext<'_>) -> Vec<LaunchResult> {
        self.entries
            .iter()
            .filter(|entry| entry.provider.can_handle(query))
            .flat_map(|entry| entry.provider.search(query, ctx))
            .collect()
    }

    /// Preview from the highest-priority provider that handles `query` and
    /// produces one.
    pub fn preview(&self, query: &str, ctx: &SearchContext<'_>) -> Option<Preview> {
        self.entries
            .iter()
            .filter(|entry| entry.provider.can_handle(query))
            .filter_map(|entry| entry.preview.as_ref())
            .find_map(|preview| preview.preview(query, ctx))
    }
}
