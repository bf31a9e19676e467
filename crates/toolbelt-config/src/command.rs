//! Turning a [`ToolConfig`] into a concrete argument vector

use std::collections::BTreeMap;

use crate::model::{FileHandlingMode, ToolConfig};
use crate::template::{expand_list, expand_string};

/// A tool's command line, ready to hand to a process runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Expanded command and arguments, no targets
    pub base_command: Vec<String>,
    /// `base_command` followed by the targets the mode calls for
    pub full_command: Vec<String>,
    /// Command and arguments exactly as configured
    pub unexpanded_base_command: Vec<String>,
}

impl ToolCommand {
    /// The full command as one shell-quoted line, for display.
    pub fn display(&self) -> String {
        shell_words::join(&self.full_command)
    }
}

impl ToolConfig {
    /// Materialize the command line for this tool.
    ///
    /// `files` are used in `per_file` mode, `targets` in `batch` mode
    /// (falling back to `default_target`), and `no_target` appends nothing.
    /// `variables` is normally [`crate::ToolbeltConfig::resolved_variables`].
    pub fn command_line(
        &self,
        files: &[String],
        targets: &[String],
        variables: &BTreeMap<String, String>,
    ) -> ToolCommand {
        let mut base_command = vec![expand_string(&self.command, variables)];
        base_command.extend(expand_list(&self.args, variables));

        let mut full_command = base_command.clone();
        match self.file_handling_mode {
            FileHandlingMode::PerFile => full_command.extend(files.iter().cloned()),
            FileHandlingMode::Batch => {
                if !targets.is_empty() {
                    full_command.extend(targets.iter().cloned());
                } else if let Some(target) = &self.default_target {
                    full_command.push(target.clone());
                }
            }
            FileHandlingMode::NoTarget => {}
        }

        let mut unexpanded_base_command = vec![self.command.clone()];
        unexpanded_base_command.extend(self.args.iter().cloned());

        ToolCommand {
            base_command,
            full_command,
            unexpanded_base_command,
        }
    }
}
