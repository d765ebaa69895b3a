use std::path::{Path, PathBuf};

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{PipelineError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.wowhead.com/tbc/quest=";

/// Runtime settings, resolved once at startup and passed down to each stage.
/// Built-in defaults, then the process environment (`main` loads `.env` into
/// it), then command-line overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub path_to_sessions: PathBuf,
    pub realm: String,
    pub character_name: String,
    pub session: String,
    pub base_url: String,
    pub concurrency: usize,
}

/// Per-invocation overrides; `None` keeps the loaded value.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct Overrides {
    /// Root directory holding <realm>/<character>/session-<n>/ folders
    #[arg(long)]
    pub sessions_dir: Option<PathBuf>,
    #[arg(long)]
    pub realm: Option<String>,
    #[arg(long)]
    pub character: Option<String>,
    /// Session number, e.g. "01"
    #[arg(short, long)]
    pub session: Option<String>,
    /// Quest page URL prefix; the quest id is appended
    #[arg(long)]
    pub base_url: Option<String>,
    /// Pages fetched at once (1 = strictly sequential)
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default())
    }

    fn load(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("path_to_sessions", "data/sessions")?
            .set_default("realm", "Thunderstrike")?
            .set_default("character_name", "Maskine")?
            .set_default("session", "01")?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("concurrency", 1_i64)?
            .add_source(env)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn with_overrides(mut self, o: Overrides) -> Self {
        if let Some(v) = o.sessions_dir {
            self.path_to_sessions = v;
        }
        if let Some(v) = o.realm {
            self.realm = v;
        }
        if let Some(v) = o.character {
            self.character_name = v;
        }
        if let Some(v) = o.session {
            self.session = v;
        }
        if let Some(v) = o.base_url {
            self.base_url = v;
        }
        if let Some(v) = o.concurrency {
            self.concurrency = v;
        }
        self
    }

    pub fn validate(self) -> Result<Self> {
        if self.path_to_sessions.as_os_str().is_empty() {
            return Err(PipelineError::MissingConfig("path_to_sessions"));
        }
        for (name, value) in [
            ("realm", &self.realm),
            ("character_name", &self.character_name),
            ("session", &self.session),
            ("base_url", &self.base_url),
        ] {
            if value.trim().is_empty() {
                return Err(PipelineError::MissingConfig(name));
            }
        }
        if self.concurrency == 0 {
            return Err(PipelineError::MissingConfig("concurrency"));
        }
        Ok(self)
    }

    /// `<root>/<realm>/<character>/session-<n>/session-<n>.jsonl`
    pub fn session_file(&self) -> Result<PathBuf> {
        let realm = path_component("realm", &self.realm)?;
        let character = path_component("character_name", &self.character_name)?;
        let session = path_component("session", &self.session)?;
        let dir = format!("session-{}", session);
        Ok(self
            .path_to_sessions
            .join(realm)
            .join(character)
            .join(&dir)
            .join(format!("{}.jsonl", dir)))
    }

    pub fn quest_url(&self, quest_id: &str) -> String {
        format!("{}{}", self.base_url, quest_id)
    }
}

/// A single directory name: no separators, no parent references.
fn path_component<'a>(name: &'static str, value: &'a str) -> Result<&'a str> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || Path::new(value).is_absolute();
    if bad {
        Err(PipelineError::InvalidPath {
            name,
            value: value.to_string(),
        })
    } else {
        Ok(value)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn defaults() {
        let s = Settings::load(env(&[])).unwrap();
        assert_eq!(s.path_to_sessions, PathBuf::from("data/sessions"));
        assert_eq!(s.realm, "Thunderstrike");
        assert_eq!(s.character_name, "Maskine");
        assert_eq!(s.session, "01");
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.concurrency, 1);
    }

    #[test]
    fn environment_overrides_defaults() {
        let s = Settings::load(env(&[
            ("PATH_TO_SESSIONS", "/srv/logs"),
            ("REALM", "Mirage"),
            ("CHARACTER_NAME", "Ada"),
            ("SESSION", "07"),
            ("CONCURRENCY", "4"),
        ]))
        .unwrap();
        assert_eq!(s.path_to_sessions, PathBuf::from("/srv/logs"));
        assert_eq!(s.realm, "Mirage");
        assert_eq!(s.character_name, "Ada");
        assert_eq!(s.session, "07");
        assert_eq!(s.concurrency, 4);
    }

    #[test]
    fn cli_overrides_win() {
        let s = Settings::load(env(&[("REALM", "Mirage")]))
            .unwrap()
            .with_overrides(Overrides {
                realm: Some("Gehennas".into()),
                concurrency: Some(2),
                ..Default::default()
            });
        assert_eq!(s.realm, "Gehennas");
        assert_eq!(s.concurrency, 2);
        assert_eq!(s.session, "01");
    }

    #[test]
    fn session_file_layout() {
        let s = Settings::load(env(&[("PATH_TO_SESSIONS", "logs")])).unwrap();
        assert_eq!(
            s.session_file().unwrap(),
            PathBuf::from("logs/Thunderstrike/Maskine/session-01/session-01.jsonl")
        );
    }

    #[test]
    fn malformed_path_components_rejected() {
        for bad in ["..", "a/b", "x\\y"] {
            let s = Settings::load(env(&[])).unwrap().with_overrides(Overrides {
                session: Some(bad.into()),
                ..Default::default()
            });
            assert!(matches!(
                s.session_file(),
                Err(PipelineError::InvalidPath { name: "session", .. })
            ));
        }
    }

    #[test]
    fn empty_values_fail_validation() {
        let s = Settings::load(env(&[("REALM", " ")])).unwrap();
        assert!(matches!(s.validate(), Err(PipelineError::MissingConfig("realm"))));

        let s = Settings::load(env(&[("CONCURRENCY", "0")])).unwrap();
        assert!(matches!(s.validate(), Err(PipelineError::MissingConfig("concurrency"))));
    }

    #[test]
    fn quest_url_appends_id() {
        let s = Settings::load(env(&[])).unwrap();
        assert_eq!(s.quest_url("60"), "https://www.wowhead.com/tbc/quest=60");
    }
}
