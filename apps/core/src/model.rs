#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEntry {
    display_name: String,
    executable: Option<String>,
    description: Option<String>,
    icon_name: Option<String>,
    command: Option<String>,
    name_lower: String,
    executable_lower: String,
}

impl ApplicationEntry {
    pub fn new(display_name: &str) -> Self {
        Self::from_owned(display_name.to_string(), None)
    }

    pub fn from_owned(display_name: String, executable: Option<String>) -> Self {
        let executable = executable.filter(|value| !value.trim().is_empty());
        let name_lower = display_name.to_lowercase();
        let executable_lower = executable
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        Self {
            display_name,
            executable,
            description: None,
            icon_name: None,
            command: None,
            name_lower,
            executable_lower,
        }
    }

    pub fn with_executable(self, executable: &str) -> Self {
        let Self {
            display_name,
            description,
            icon_name,
            command,
            ..
        } = self;
        let mut entry = Self::from_owned(display_name, Some(executable.to_string()));
        entry.description = description;
        entry.icon_name = icon_name;
        entry.command = command;
        entry
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn with_icon(mut self, icon_name: &str) -> Self {
        self.icon_name = non_empty(icon_name);
        self
    }

    pub fn with_command(mut self, command: &str) -> Self {
        self.command = non_empty(command);
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn executable(&self) -> Option<&str> {
        self.executable.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon_name(&self) -> Option<&str> {
        self.icon_name.as_deref()
    }

    /// Command line used to start the application. Falls back to the
    /// executable, then to the display name.
    pub fn launch_command(&self) -> &str {
        self.command
            .as_deref()
            .or(self.executable.as_deref())
            .unwrap_or(&self.display_name)
    }

    /// Key under which usage history is recorded.
    pub fn identity(&self) -> &str {
        self.executable.as_deref().unwrap_or(&self.display_name)
    }

    pub fn name_lower(&self) -> &str {
        &self.name_lower
    }

    pub fn executable_lower(&self) -> &str {
        &self.executable_lower
    }
}

pub fn normalize_query(input: &str) -> String {
    input.trim().to_lowercase()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
