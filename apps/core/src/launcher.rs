use std::time::{Duration, Instant};

use crate::action_executor::{ActionExecutor, LaunchError};
use crate::catalog::{self, CatalogSource};
use crate::config::{validate, Config, ConfigError};
use crate::debounce::Debouncer;
use crate::icon::{default_icon_dirs, IconIndex, IconResolver};
use crate::model::ApplicationEntry;
use crate::provider::{LaunchAction, LaunchResult, Preview, ProviderRegistry, SearchContext};
use crate::providers::{AppProvider, CalculatorProvider, WebSearchProvider};
use crate::search::best_completion;
use crate::usage::{UsageStore, UsageTracker};

const FALLBACK_RECENT_KEYWORDS: [&str; 7] = [
    "firefox", "chrome", "terminal", "kitty", "code", "file", "nautilus",
];

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("launch error: {0}")]
    Launch(#[from] LaunchError),
    #[error("no application with identity '{0}'")]
    UnknownApplication(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherEvent {
    QueryChanged(String),
    ResultsChanged(usize),
    PreviewChanged(Option<Preview>),
    SelectionChanged(usize),
    VisibilityChanged(bool),
    Launched { id: String, title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LauncherEvent)>;

/// Callbacks run synchronously, in registration order, on the thread that
/// emitted the event.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&LauncherEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &LauncherEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherState {
    pub query: String,
    pub visible: bool,
    pub preview: Option<Preview>,
    pub results: Vec<LaunchResult>,
    pub selected_index: usize,
}

pub struct LauncherService {
    config: Config,
    registry: ProviderRegistry,
    catalog: Vec<ApplicationEntry>,
    usage: UsageTracker,
    executor: Box<dyn ActionExecutor>,
    state: LauncherState,
    events: EventBus,
    debouncer: Option<Debouncer<String>>,
}

impl LauncherService {
    /// Builds the launcher: loads the catalog (empty on failure), the usage
    /// history (empty on failure) and the providers enabled by `config`.
    pub fn init(
        config: Config,
        source: &dyn CatalogSource,
        store: Box<dyn UsageStore>,
        executor: Box<dyn ActionExecutor>,
    ) -> Result<Self, ServiceError> {
        validate(&config)?;
        let catalog = catalog::load_or_empty(source);
        let usage = UsageTracker::open(store);
        let registry = default_registry(&config);
        let debouncer = (config.debounce_ms > 0)
            .then(|| Debouncer::new(Duration::from_millis(config.debounce_ms)));

        log::info!(
            "launcher initialized apps={} usage_entries={} providers={:?}",
            catalog.len(),
            usage.history().len(),
            registry.names()
        );

        Ok(Self {
            config,
            registry,
            catalog,
            usage,
            executor,
            state: LauncherState::default(),
            events: EventBus::default(),
            debouncer,
        })
    }

    pub fn with_providers(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Flushes usage history and drops every subscriber.
    pub fn dispose(mut self) {
        if let Err(error) = self.usage.persist() {
            log::warn!("usage history not persisted on dispose: {error}");
        }
        self.events.clear();
        log::info!("launcher disposed");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &[ApplicationEntry] {
        &self.catalog
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    pub fn state(&self) -> &LauncherState {
        &self.state
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&LauncherEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn context(&self) -> SearchContext<'_> {
        SearchContext {
            catalog: &self.catalog,
            usage: self.usage.history(),
            max_results: self.config.max_results as usize,
        }
    }

    /// Stateless search across all providers.
    pub fn search(&self, query: &str) -> Vec<LaunchResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.registry.search(query, &self.context())
    }

    pub fn preview_for(&self, query: &str) -> Option<Preview> {
        if query.trim().is_empty() {
            return None;
        }
        self.registry.preview(query, &self.context())
    }

    /// Inline completion from the application catalog alone.
    pub fn complete(&self, query: &str) -> Option<String> {
        best_completion(&self.catalog, query, self.usage.history())
    }

    pub fn set_text(&mut self, text: &str) {
        if let Some(debouncer) = self.debouncer.as_mut() {
            debouncer.cancel();
        }
        if self.state.query != text {
            self.state.query = text.to_string();
            self.events
                .emit(&LauncherEvent::QueryChanged(self.state.query.clone()));
        }
        self.refresh();
    }

    pub fn clear_text(&mut self) {
        self.set_text("");
    }

    /// Keystroke entry point. With a debounce delay configured the query is
    /// applied by a later `tick`; otherwise immediately.
    pub fn input(&mut self, text: &str, now: Instant) {
        match self.debouncer.as_mut() {
            Some(debouncer) => debouncer.push(text.to_string(), now),
            None => self.set_text(text),
        }
    }

    /// Applies a debounced query whose delay has elapsed. Returns whether a
    /// query was applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ready = self
            .debouncer
            .as_mut()
            .and_then(|debouncer| debouncer.poll(now));
        match ready {
            Some(text) => {
                self.set_text(&text);
                true
            }
            None => false,
        }
    }

    fn refresh(&mut self) {
        let query = self.state.query.clone();
        let (results, preview) = if query.trim().is_empty() {
            (Vec::new(), None)
        } else {
            let ctx = self.context();
            (
                self.registry.search(&query, &ctx),
                self.registry.preview(&query, &ctx),
            )
        };

        self.state.results = results;
        self.state.selected_index = 0;
        self.events
            .emit(&LauncherEvent::ResultsChanged(self.state.results.len()));

        if self.state.preview != preview {
            self.state.preview = preview;
            self.events
                .emit(&LauncherEvent::PreviewChanged(self.state.preview.clone()));
        }
    }

    pub fn show(&mut self) {
        self.set_visible(true);
    }

    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    pub fn toggle(&mut self) {
        self.set_visible(!self.state.visible);
    }

    fn set_visible(&mut self, visible: bool) {
        self.clear_text();
        if self.state.visible != visible {
            self.state.visible = visible;
            self.events.emit(&LauncherEvent::VisibilityChanged(visible));
        }
    }

    pub fn move_selection(&mut self, direction: i32) -> usize {
        let next = next_selection_index(self.state.selected_index, self.state.results.len(), direction);
        if next != self.state.selected_index {
            self.state.selected_index = next;
            self.events.emit(&LauncherEvent::SelectionChanged(next));
        }
        next
    }

    /// Runs the selected result, records application launches and hides the
    /// launcher. `Ok(None)` when there is nothing to run.
    pub fn activate_selected(&mut self) -> Result<Option<LaunchResult>, ServiceError> {
        let Some(selected) = self.state.results.get(self.state.selected_index).cloned() else {
            log::debug!("activate with no results for '{}'", self.state.query);
            return Ok(None);
        };

        self.run(&selected)?;
        self.hide();
        Ok(Some(selected))
    }

    /// Launches a catalog application directly, as the recent-apps row does.
    pub fn launch_app(&mut self, identity: &str) -> Result<LaunchResult, ServiceError> {
        let entry = self
            .catalog
            .iter()
            .find(|entry| entry.identity() == identity)
            .ok_or_else(|| ServiceError::UnknownApplication(identity.to_string()))?;
        let icon = entry
            .icon_name()
            .unwrap_or(crate::icon::FALLBACK_ICON)
            .to_string();
        let result = crate::providers::app_launch_result(entry, icon, 0);
        self.run(&result)?;
        Ok(result)
    }

    fn run(&mut self, result: &LaunchResult) -> Result<(), ServiceError> {
        if let Err(error) = self.executor.execute(&result.action) {
            log::warn!("launch of '{}' failed: {error}", result.id);
            return Err(error.into());
        }

        if let LaunchAction::LaunchApp {
            identity,
            display_name,
            ..
        } = &result.action
        {
            let count = self.usage.record_launch(identity, display_name);
            log::info!("launched '{identity}' count={count}");
        }

        self.events.emit(&LauncherEvent::Launched {
            id: result.id.clone(),
            title: result.title.clone(),
        });
        Ok(())
    }

    /// Most recently launched applications still present in the catalog;
    /// well-known applications when there is no history yet.
    pub fn recent_apps(&self) -> Vec<&ApplicationEntry> {
        let limit = self.config.recent_apps;
        if self.usage.history().is_empty() {
            return self
                .catalog
                .iter()
                .filter(|entry| {
                    FALLBACK_RECENT_KEYWORDS
                        .iter()
                        .any(|keyword| entry.name_lower().contains(keyword))
                })
                .take(limit)
                .collect();
        }

        self.resolve_identities(&self.usage.recent(limit))
    }

    pub fn frequent_apps(&self, n: usize) -> Vec<&ApplicationEntry> {
        self.resolve_identities(&self.usage.top_n(n))
    }

    fn resolve_identities(&self, identities: &[String]) -> Vec<&ApplicationEntry> {
        identities
            .iter()
            .filter_map(|identity| {
                self.catalog.iter().find(|entry| {
                    entry.executable() == Some(identity.as_str())
                        || entry.display_name() == identity
                })
            })
            .collect()
    }
}

/// Icon lookup over the configured theme dirs, or the XDG icon dirs when none
/// are configured. Without any installed icons each class resolves to its
/// first candidate name.
fn icon_resolver(config: &Config) -> IconResolver {
    let roots = if config.icon_dirs.is_empty() {
        default_icon_dirs()
    } else {
        config.icon_dirs.clone()
    };
    let index = IconIndex::scan(&roots);
    if index.is_empty() {
        log::debug!("no icons found under {roots:?}, resolving by name");
        IconResolver::default()
    } else {
        IconResolver::new(Box::new(index))
    }
}

pub fn default_registry(config: &Config) -> ProviderRegistry {
    let icons = icon_resolver(config);

    let mut registry = ProviderRegistry::new();
    if config.calculator_enabled {
        registry.register_with_preview(CalculatorProvider);
    }
    registry.register_with_preview(AppProvider::new(icons));
    if config.web_search_enabled {
        registry.register_with_preview(WebSearchProvider::new(config.web_search_url.clone()));
    }
    registry
}

pub fn next_selection_index(current: usize, len: usize, direction: i32) -> usize {
    if len == 0 {
        return 0;
    }

    let max = len - 1;
    if direction < 0 {
        current.saturating_sub(1)
    } else if direction > 0 {
        (current + 1).min(max)
    } else {
        current.min(max)
    }
}
