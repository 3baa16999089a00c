//! Interactive modes: scripted sequences of questions run against a session

use crate::config::registry::ConfigKeyResolver;
use crate::error::Result;
use crate::session::interaction::InteractionSession;
use crate::session::terminal::Terminal;
use std::path::PathBuf;
use tracing::info;

/// A sequence of questions driven against an [`InteractionSession`]
pub trait InteractiveMode {
    fn interact<T: Terminal, R: ConfigKeyResolver>(
        &self,
        session: &mut InteractionSession<T, R>,
    ) -> Result<()>;
}

/// Server connection and project questions, followed by the standard outflow
#[derive(Debug, Clone)]
pub struct DefaultInteractiveMode {
    output_dir: PathBuf,
    presets: Vec<(String, String)>,
}

impl DefaultInteractiveMode {
    /// Mode saving its answers into `output_dir`
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            presets: Vec::new(),
        }
    }

    /// Pre-answer a field; its question is then skipped
    pub fn with_preset<F: Into<String>, V: Into<String>>(mut self, field: F, value: V) -> Self {
        self.presets.push((field.into(), value.into()));
        self
    }

    fn ask<T: Terminal, R: ConfigKeyResolver>(
        session: &mut InteractionSession<T, R>,
        field: &str,
        question: &str,
    ) -> Result<()> {
        if session.has_value_for_field(field) {
            return Ok(());
        }
        session.set_property_from_question(field, question)
    }

    fn ask_secret<T: Terminal, R: ConfigKeyResolver>(
        session: &mut InteractionSession<T, R>,
        field: &str,
        question: &str,
    ) -> Result<()> {
        if session.has_value_for_field(field) {
            return Ok(());
        }
        session.set_property_from_secret_question(field, question)
    }

    fn ask_server<T: Terminal, R: ConfigKeyResolver>(
        session: &mut InteractionSession<T, R>,
    ) -> Result<()> {
        Self::ask(session, "hubUrl", "What is the server URL?")?;
        Self::ask(session, "hubUsername", "What is the server username?")?;
        Self::ask_secret(session, "hubPassword", "What is the server password?")?;

        if !session.has_value_for_field("hubTrustCertificate") {
            let trust = session.ask_yes_or_no("Would you like to automatically trust certificates?")?;
            if trust.is_determined() {
                session.set_property("hubTrustCertificate", trust.is_yes().to_string())?;
            }
        }

        if session
            .ask_yes_or_no("Is a proxy required to reach the server?")?
            .is_yes()
        {
            Self::ask(session, "hubProxyHost", "What is the proxy host?")?;
            Self::ask(session, "hubProxyPort", "What is the proxy port?")?;
            Self::ask(session, "hubProxyUsername", "What is the proxy username?")?;
            Self::ask_secret(session, "hubProxyPassword", "What is the proxy password?")?;
        }

        Ok(())
    }
}

impl InteractiveMode for DefaultInteractiveMode {
    fn interact<T: Terminal, R: ConfigKeyResolver>(
        &self,
        session: &mut InteractionSession<T, R>,
    ) -> Result<()> {
        for (field, value) in &self.presets {
            session.set_property(field, value.as_str())?;
        }

        session.print_welcome()?;

        if session
            .ask_yes_or_no("Would you like to connect to a server?")?
            .is_yes()
        {
            Self::ask_server(session)?;
        } else if !session.has_value_for_field("hubOfflineMode") {
            info!("Running without a server connection");
            session.set_property("hubOfflineMode", "true")?;
        }

        if session
            .ask_yes_or_no("Would you like to set the project name and version?")?
            .is_yes()
        {
            Self::ask(session, "projectName", "What is the project name?")?;
            Self::ask(session, "projectVersionName", "What is the project version?")?;
        }

        session.println("")?;
        session.print_options()?;
        session.println("")?;

        session.perform_standard_outflow(&self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::registry::FieldRegistry;
    use crate::session::terminal::StreamTerminal;
    use crate::utils::properties::read_properties;
    use tempfile::TempDir;

    #[test]
    fn test_offline_run_without_saving() {
        let temp_dir = TempDir::new().unwrap();
        let terminal = StreamTerminal::scripted("n\nn\nn\n\n");
        let mut session = InteractionSession::new(terminal, FieldRegistry::builtin());

        DefaultInteractiveMode::new(temp_dir.path())
            .interact(&mut session)
            .unwrap();

        let map = session.options_as_external_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["blackduck.hub.offline.mode"], "true");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        assert!(session
            .terminal()
            .transcript()
            .contains("--blackduck.hub.offline.mode=true"));
    }

    #[test]
    fn test_full_run_saves_profile() {
        let temp_dir = TempDir::new().unwrap();
        let script = [
            "yes",               // connect to a server
            "https://hub.local", // url
            "sysadmin",          // username
            "hunter2",           // password
            "no",                // trust certificates
            "y",                 // proxy
            "proxy.local",
            "3128",
            "proxyuser",
            "proxypass",
            "y", // project
            "demo",
            "1.0",
            "y",  // save
            "y",  // profile
            "ci", // profile name
            "",   // proceed
        ]
        .join("\n");
        let terminal = StreamTerminal::scripted(&format!("{script}\n"));
        let mut session = InteractionSession::new(terminal, FieldRegistry::builtin());

        DefaultInteractiveMode::new(temp_dir.path())
            .interact(&mut session)
            .unwrap();

        let saved = read_properties(&temp_dir.path().join("application-ci.properties")).unwrap();
        assert_eq!(saved, session.options_as_external_map());
        assert_eq!(saved["blackduck.hub.password"], "hunter2");
        assert_eq!(saved["blackduck.hub.trust.cert"], "false");
        assert_eq!(saved["blackduck.hub.proxy.port"], "3128");
        assert_eq!(saved["detect.project.version.name"], "1.0");
        assert!(!saved.contains_key("blackduck.hub.offline.mode"));

        let transcript = session.terminal().transcript();
        assert!(transcript.contains("--blackduck.hub.password=*******"));
        assert!(transcript.contains("--blackduck.hub.proxy.password=*********"));
        assert!(!transcript.contains("hunter2"));
        assert!(transcript.contains("--spring.profiles.active=ci"));
    }

    #[test]
    fn test_presets_skip_questions() {
        let temp_dir = TempDir::new().unwrap();
        // connect, trust, proxy, project, save
        let terminal = StreamTerminal::scripted("y\ny\nn\nn\nn\n");
        let mut session = InteractionSession::new(terminal, FieldRegistry::builtin());

        DefaultInteractiveMode::new(temp_dir.path())
            .with_preset("hubUrl", "https://preset")
            .with_preset("hubUsername", "preset-user")
            .with_preset("hubPassword", "preset-pass")
            .interact(&mut session)
            .unwrap();

        let transcript = session.terminal().transcript();
        assert!(!transcript.contains("What is the server URL?"));
        assert!(!transcript.contains("What is the server password?"));
        assert_eq!(
            session.options_as_external_map()["blackduck.hub.trust.cert"],
            "true"
        );
    }

    #[test]
    fn test_unknown_preset_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let terminal = StreamTerminal::scripted("");
        let mut session = InteractionSession::new(terminal, FieldRegistry::builtin());

        let result = DefaultInteractiveMode::new(temp_dir.path())
            .with_preset("notAField", "x")
            .interact(&mut session);

        assert!(result.is_err());
        assert_eq!(session.options().count(), 0);
    }
}
