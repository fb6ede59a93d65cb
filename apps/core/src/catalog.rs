use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::model::ApplicationEntry;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("application catalog unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Supplies the applications the launcher can rank.
pub trait CatalogSource {
    fn source_name(&self) -> &'static str;
    fn load(&self) -> Result<Vec<ApplicationEntry>, CatalogError>;
}

/// Loads a catalog, treating any failure as an empty catalog.
pub fn load_or_empty(source: &dyn CatalogSource) -> Vec<ApplicationEntry> {
    match source.load() {
        Ok(entries) => {
            log::info!(
                "catalog loaded source={} entries={}",
                source.source_name(),
                entries.len()
            );
            entries
        }
        Err(error) => {
            log::warn!(
                "catalog source={} failed, using empty catalog: {error}",
                source.source_name()
            );
            Vec::new()
        }
    }
}

pub struct StaticCatalog {
    entries: Vec<ApplicationEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<ApplicationEntry>) -> Self {
        Self { entries }
    }
}

impl CatalogSource for StaticCatalog {
    fn source_name(&self) -> &'static str {
        "static"
    }

    fn load(&self) -> Result<Vec<ApplicationEntry>, CatalogError> {
        Ok(self.entries.clone())
    }
}

/// Freedesktop `.desktop` files under `applications/` data directories.
pub struct DesktopEntryCatalog {
    roots: Vec<PathBuf>,
    max_depth: usize,
}

impl Default for DesktopEntryCatalog {
    fn default() -> Self {
        Self::new(default_application_dirs())
    }
}

impl DesktopEntryCatalog {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            max_depth: 4,
        }
    }

    pub fn from_config_dirs(dirs: &[PathBuf]) -> Self {
        if dirs.is_empty() {
            Self::default()
        } else {
            Self::new(dirs.to_vec())
        }
    }
}

impl CatalogSource for DesktopEntryCatalog {
    fn source_name(&self) -> &'static str {
        "desktop-entries"
    }

    fn load(&self) -> Result<Vec<ApplicationEntry>, CatalogError> {
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }

            let mut files: Vec<PathBuf> = WalkDir::new(root)
                .follow_links(true)
                .max_depth(self.max_depth)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "desktop"))
                .collect();
            files.sort();

            for path in files {
                let id = desktop_file_id(root, &path);
                if !seen_ids.insert(id) {
                    continue;
                }

                match std::fs::read_to_string(&path) {
                    Ok(raw) => {
                        if let Some(entry) = parse_desktop_entry(&raw) {
                            entries.push(entry);
                        }
                    }
                    Err(error) => {
                        log::warn!("skipping unreadable desktop entry {}: {error}", path.display());
                    }
                }
            }
        }

        entries.sort_by(|a, b| a.name_lower().cmp(b.name_lower()));
        Ok(entries)
    }
}

pub fn default_application_dirs() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(data) = dirs::data_dir() {
        roots.push(data.join("applications"));
    }
    roots.extend(
        crate::icon::xdg_data_dirs()
            .into_iter()
            .map(|dir| dir.join("applications")),
    );
    roots
}

/// Desktop file id: path relative to the root with `/` replaced by `-`.
fn desktop_file_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("-")
}

/// Parses the `[Desktop Entry]` group of a desktop file. Returns `None` for
/// hidden entries, non-applications and entries without a name.
pub fn parse_desktop_entry(raw: &str) -> Option<ApplicationEntry> {
    let mut in_main_group = false;
    let mut name = None;
    let mut exec = None;
    let mut icon = None;
    let mut comment = None;
    let mut kind = None;
    let mut hidden = false;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_main_group = line == "[Desktop Entry]";
            continue;
        }
        if !in_main_group {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" => name = Some(value.to_string()),
            "Exec" => exec = Some(value.to_string()),
            "Icon" => icon = Some(value.to_string()),
            "Comment" => comment = Some(value.to_string()),
            "Type" => kind = Some(value.to_string()),
            "NoDisplay" | "Hidden" => hidden |= value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    if hidden || kind.as_deref().is_some_and(|kind| kind != "Application") {
        return None;
    }

    let name = name.filter(|name| !name.is_empty())?;
    let command = exec.as_deref().map(strip_field_codes).unwrap_or_default();
    let executable = executable_name(&command);

    let mut entry = ApplicationEntry::from_owned(name, executable);
    if !command.is_empty() {
        entry = entry.with_command(&command);
    }
    if let Some(icon) = icon {
        entry = entry.with_icon(&icon);
    }
    if let Some(comment) = comment {
        entry = entry.with_description(&comment);
    }
    Some(entry)
}

/// Removes `%f`-style field codes from an Exec value; `%%` becomes `%`.
pub fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(_) | None => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Basename of the program an Exec line runs, skipping an `env` prefix and
/// its assignments.
pub fn executable_name(command: &str) -> Option<String> {
    let mut tokens = command.split_whitespace().map(|token| token.trim_matches('"'));
    let mut program = tokens.next()?;
    if file_name(program) == "env" {
        program = tokens.find(|token| !token.contains('=') && !token.starts_with('-'))?;
    }
    let name = file_name(program);
    (!name.is_empty()).then(|| name.to_string())
}

fn file_name(program: &str) -> &str {
    program.rsplit('/').next().unwrap_or(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_file_id_joins_subdirectories() {
        let root = Path::new("/usr/share/applications");
        let path = Path::new("/usr/share/applications/kde/org.kde.dolphin.desktop");
        assert_eq!(desktop_file_id(root, path), "kde-org.kde.dolphin.desktop");
    }
}
