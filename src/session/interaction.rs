//! Question/answer session that collects configuration values
//!
//! A session asks questions through a [`Terminal`], records each answer under
//! a field identifier, resolves that identifier to an external configuration
//! key through a [`ConfigKeyResolver`] and can save everything to a
//! properties file.

use crate::config::registry::ConfigKeyResolver;
use crate::config::settings::Settings;
use crate::error::{PropwizardError, Result};
use crate::session::answer::YesNoAnswer;
use crate::session::options::{InteractiveOption, OptionStore};
use crate::session::terminal::Terminal;
use crate::utils::properties::{header_timestamp, render_properties};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};
use zeroize::Zeroize;

/// Responses read for a yes/no question before giving up
pub const MAX_YES_NO_ATTEMPTS: usize = 3;

const YES_NO_HINT: &str = " (Y|n)";
const YES_NO_CLARIFICATION: &str = "Please answer yes or no.";

/// Interactive session owning the collected answers
pub struct InteractionSession<T: Terminal, R: ConfigKeyResolver> {
    terminal: T,
    resolver: R,
    settings: Settings,
    options: OptionStore,
    profile_name: Option<String>,
}

impl<T: Terminal, R: ConfigKeyResolver> InteractionSession<T, R> {
    /// Create a session with default settings
    pub fn new(terminal: T, resolver: R) -> Self {
        Self::with_settings(terminal, resolver, Settings::default())
    }

    pub fn with_settings(terminal: T, resolver: R, settings: Settings) -> Self {
        Self {
            terminal,
            resolver,
            settings,
            options: OptionStore::new(),
            profile_name: None,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Profile chosen during the save workflow, if any
    pub fn profile_name(&self) -> Option<&str> {
        self.profile_name.as_deref()
    }

    /// Recorded options in the order they were first set
    pub fn options(&self) -> impl Iterator<Item = &InteractiveOption> {
        self.options.iter()
    }

    /// Write the question and return the next line verbatim
    pub fn ask_question(&mut self, question: &str) -> Result<String> {
        self.terminal.write_line(question)?;
        self.terminal.read_line()
    }

    /// Write the question and read the answer without echoing it
    pub fn ask_secret_question(&mut self, question: &str) -> Result<String> {
        self.terminal.write_line(question)?;
        self.terminal.read_secret()
    }

    pub fn set_property_from_question(&mut self, field_name: &str, question: &str) -> Result<()> {
        let value = self.ask_question(question)?;
        self.set_property(field_name, value)
    }

    pub fn set_property_from_secret_question(
        &mut self,
        field_name: &str,
        question: &str,
    ) -> Result<()> {
        let value = self.ask_secret_question(question)?;
        self.set_property(field_name, value)
    }

    /// Record `value` under `field_name`
    ///
    /// The external key is resolved the first time a field is set and kept
    /// from then on. An unregistered field is reported to the terminal and
    /// returned as [`PropwizardError::UnresolvableField`]; the store is left
    /// untouched in that case.
    pub fn set_property<V: Into<String>>(&mut self, field_name: &str, value: V) -> Result<()> {
        let value = value.into();
        if self.options.contains(field_name) {
            self.options.update(field_name, value);
            debug!("Updated value for field '{}'", field_name);
            return Ok(());
        }

        match self.resolver.resolve_key(field_name) {
            Some(external_key) => {
                debug!("Resolved field '{}' to '{}'", field_name, external_key);
                self.options.insert(field_name, external_key, value);
                Ok(())
            }
            None => Err(self.report(PropwizardError::unresolvable_field(field_name))),
        }
    }

    pub fn has_value_for_field(&self, field_name: &str) -> bool {
        self.options.contains(field_name)
    }

    /// Ask a yes/no question, re-prompting on unrecognized responses
    ///
    /// Gives up with [`YesNoAnswer::Undetermined`] after
    /// [`MAX_YES_NO_ATTEMPTS`] unrecognized responses.
    pub fn ask_yes_or_no(&mut self, question: &str) -> Result<YesNoAnswer> {
        self.terminal.write_line(&format!("{question}{YES_NO_HINT}"))?;

        for attempt in 1..=MAX_YES_NO_ATTEMPTS {
            let response = self.terminal.read_line()?;
            if let Some(answer) = YesNoAnswer::parse(&response) {
                debug!("Yes/no answer '{}' on attempt {}", answer, attempt);
                return Ok(answer);
            }
            self.terminal.write_line(YES_NO_CLARIFICATION)?;
        }

        warn!(
            "No recognizable yes/no answer after {} attempts",
            MAX_YES_NO_ATTEMPTS
        );
        Ok(YesNoAnswer::Undetermined)
    }

    /// External key to value for every recorded option
    pub fn options_as_external_map(&self) -> BTreeMap<String, String> {
        self.options.to_external_map()
    }

    /// One `--<key>=<value>` line per option, password-like fields masked
    pub fn print_options(&mut self) -> Result<()> {
        let lines: Vec<String> = self.options.iter().map(|o| o.display_line()).collect();
        for line in lines {
            self.terminal.write_line(&line)?;
        }
        Ok(())
    }

    /// Report success, offer to save, then wait for the user to continue
    pub fn perform_standard_outflow(&mut self, directory: &Path) -> Result<()> {
        self.print_success()?;
        self.ask_to_save(directory)?;
        self.ready_to_proceed()
    }

    /// Offer to save the answers to a properties file in `directory`
    ///
    /// Returns the canonical path of the written file, or `None` when the
    /// user declined or never answered.
    pub fn ask_to_save(&mut self, directory: &Path) -> Result<Option<PathBuf>> {
        let question = format!(
            "Would you like to save these settings to {}?",
            self.settings.file_name(None)
        );
        if !self.ask_yes_or_no(&question)?.is_yes() {
            info!("Settings not saved");
            return Ok(None);
        }

        if self.profile_name.is_none()
            && self
                .ask_yes_or_no("Would you like to save these settings to a profile?")?
                .is_yes()
        {
            let profile = self.ask_question("What is the profile name?")?;
            debug!("Using profile '{}'", profile);
            self.profile_name = Some(profile);
        }

        let path = self.save_options(directory)?;
        self.print_profile()?;
        Ok(Some(path))
    }

    /// Write the current answers to the properties file in `directory`
    ///
    /// The file is written to a temporary sibling and moved into place, so a
    /// failed save never leaves a truncated file behind.
    pub fn save_options(&mut self, directory: &Path) -> Result<PathBuf> {
        let file_name = self.settings.file_name(self.profile_name.as_deref());
        let target = directory.join(&file_name);

        let header = [self.settings.header_comment.clone(), header_timestamp()];
        let mut entries = self.options.to_external_map();
        let mut content = render_properties(&entries, &header);
        let written = write_atomically(directory, &target, &content);
        content.zeroize();
        zeroize_values(&mut entries);

        match written {
            Ok(path) => {
                info!("Saved {} options to {}", self.options.len(), path.display());
                self.terminal.write_line("")?;
                self.terminal
                    .write_line(&format!("Successfully saved to '{}'!", path.display()))?;
                Ok(path)
            }
            Err(e) => {
                error!("Failed to save {}: {}", target.display(), e);
                self.show(&e.to_string());
                self.show(&format!("Failed to write to {file_name}."));
                Err(PropwizardError::persistence(target, e.to_string()))
            }
        }
    }

    pub fn print_welcome(&mut self) -> Result<()> {
        self.terminal
            .write_line("***** Welcome to Interactive Mode *****")?;
        self.terminal.write_line("")
    }

    pub fn print_success(&mut self) -> Result<()> {
        self.terminal.write_line("Interactive mode successful!")?;
        self.terminal.write_line("")
    }

    /// Tell the user how to activate the saved profile on a later run
    pub fn print_profile(&mut self) -> Result<()> {
        let Some(profile) = self.profile_name.as_deref() else {
            return Ok(());
        };
        let activation = self.settings.profile_activation(profile);

        self.terminal.write_line("")?;
        self.terminal
            .write_line("In the future, to use this profile add the following option:")?;
        self.terminal.write_line("")?;
        self.terminal.write_line(&activation)
    }

    /// Block until the user hits enter; closed input also counts as ready
    pub fn ready_to_proceed(&mut self) -> Result<()> {
        self.terminal.write_line("")?;
        self.terminal
            .write_line("Ready to start. Hit enter to proceed.")?;
        match self.terminal.read_line() {
            Ok(_) | Err(PropwizardError::InputClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn print(&mut self, text: &str) -> Result<()> {
        self.terminal.write(text)
    }

    pub fn println(&mut self, text: &str) -> Result<()> {
        self.terminal.write_line(text)
    }

    /// Log and show a fatal error before handing it back to the caller
    fn report(&mut self, error: PropwizardError) -> PropwizardError {
        error!("{}", error);
        self.show(&error.to_string());
        error
    }

    /// Best-effort write used while a fatal error is already being returned
    fn show(&mut self, line: &str) {
        if let Err(e) = self.terminal.write_line(line) {
            warn!("Could not report error to terminal: {}", e);
        }
    }
}

fn write_atomically(directory: &Path, target: &Path, content: &str) -> std::io::Result<PathBuf> {
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(target).map_err(|e| e.error)?;
    Ok(canonical_or_given(target))
}

/// Canonical form of a path that already exists, or the path as given
fn canonical_or_given(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|e| {
        warn!("Could not canonicalize {}: {}", path.display(), e);
        path.to_path_buf()
    })
}

fn zeroize_values(entries: &mut BTreeMap<String, String>) {
    for value in entries.values_mut() {
        value.zeroize();
    }
}
