use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use walkdir::WalkDir;

pub const FALLBACK_ICON: &str = "application-x-executable";

const STRIPPED_SUFFIXES: [&str; 4] = ["-bin", "-app", "-desktop", "-electron"];
const NOISE_PARTS: [&str; 4] = ["electron", "app", "bin", "desktop"];
const ICON_EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

/// Decides whether an icon name exists in the active theme.
pub trait IconLookup {
    fn has_icon(&self, name: &str) -> bool;
}

/// Accepts every candidate; the first generated name wins.
pub struct AnyIcon;

impl IconLookup for AnyIcon {
    fn has_icon(&self, _name: &str) -> bool {
        true
    }
}

/// Set of icon names found under theme directories.
#[derive(Debug, Clone, Default)]
pub struct IconIndex {
    names: HashSet<String>,
}

impl IconIndex {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn scan(roots: &[PathBuf]) -> Self {
        let mut names = HashSet::new();
        for root in roots.iter().filter(|root| root.is_dir()) {
            for entry in WalkDir::new(root)
                .follow_links(true)
                .max_depth(6)
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                let is_icon = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ICON_EXTENSIONS.contains(&ext));
                if !is_icon {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.insert(stem.to_string());
                }
            }
        }
        log::debug!("icon index scanned roots={} names={}", roots.len(), names.len());
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IconLookup for IconIndex {
    fn has_icon(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

pub fn default_icon_dirs() -> Vec<PathBuf> {
    let mut dirs_out = Vec::new();
    if let Some(data) = dirs::data_dir() {
        dirs_out.push(data.join("icons"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_out.push(home.join(".icons"));
    }
    dirs_out.extend(xdg_data_dirs().into_iter().map(|dir| dir.join("icons")));
    dirs_out.push(PathBuf::from("/usr/share/pixmaps"));
    dirs_out
}

pub(crate) fn xdg_data_dirs() -> Vec<PathBuf> {
    let raw = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    raw.split(':')
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Maps application classes (window classes, app ids, executables) to icon
/// names, caching each answer for the lifetime of the resolver.
pub struct IconResolver {
    lookup: Box<dyn IconLookup>,
    cache: RefCell<HashMap<String, String>>,
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(Box::new(AnyIcon))
    }
}

impl IconResolver {
    pub fn new(lookup: Box<dyn IconLookup>) -> Self {
        Self {
            lookup,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, app_class: &str) -> String {
        if app_class.trim().is_empty() {
            return FALLBACK_ICON.to_string();
        }
        if let Some(hit) = self.cache.borrow().get(app_class) {
            return hit.clone();
        }

        let resolved = candidates(app_class)
            .into_iter()
            .find(|candidate| self.lookup.has_icon(candidate))
            .unwrap_or_else(|| FALLBACK_ICON.to_string());
        self.cache
            .borrow_mut()
            .insert(app_class.to_string(), resolved.clone());
        resolved
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

/// Icon names to try for `app_class`, most specific first.
pub fn candidates(app_class: &str) -> Vec<String> {
    let trimmed = app_class.trim();
    let lower = trimmed.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !candidate.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    };

    push(trimmed.to_string());
    push(lower.clone());

    if let Some(stripped) = STRIPPED_SUFFIXES
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
    {
        push(stripped.to_string());
    }

    if lower.contains("electron") || lower.contains("app") {
        for part in trimmed.split(|c: char| c == '-' || c == '_' || c.is_whitespace()) {
            let part_lower = part.to_lowercase();
            if part.chars().count() > 2 && !NOISE_PARTS.contains(&part_lower.as_str()) {
                push(part_lower);
            }
        }
    }

    if trimmed.contains('.') {
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() >= 2 {
            push(parts[parts.len() - 1].to_lowercase());
            if parts.len() >= 3 {
                push(parts[1].to_lowercase());
            }
        }
    }

    push(lower.split_whitespace().collect::<Vec<_>>().join("-"));
    push(lower.split_whitespace().collect::<Vec<_>>().join("_"));
    push(lower.replace('_', "-"));
    push(lower.replace('-', "_"));
    push(sanitize_icon_name(&lower));

    out
}

fn sanitize_icon_name(lower: &str) -> String {
    let mut cleaned = String::with_capacity(lower.len());
    for c in lower.chars() {
        let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.') {
            c
        } else {
            '-'
        };
        if mapped == '-' && cleaned.ends_with('-') {
            continue;
        }
        cleaned.push(mapped);
    }
    cleaned.trim_matches('-').to_string()
}
