use crate::utils::error::{Result, ShowtimeError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Where a chain's name -> code mapping lives and which columns to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    /// Searched in order; the first file containing the name wins.
    pub files: Vec<String>,
    pub name_column: String,
    /// Joined with `|` when more than one column makes up the code.
    pub code_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSettings {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub headers: BTreeMap<String, String>,
    pub theater: LookupTable,
    pub movie: LookupTable,
}

impl ChainSettings {
    pub fn megabox_defaults() -> Self {
        let headers = BTreeMap::from([
            ("User-Agent".to_string(), CHROME_USER_AGENT.to_string()),
            (
                "Referer".to_string(),
                "https://www.megabox.co.kr/booking".to_string(),
            ),
            ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
        ]);

        Self {
            endpoint: "https://www.megabox.co.kr/on/oh/ohb/SimpleBooking/selectBokdList.do"
                .to_string(),
            timeout_seconds: 30,
            headers,
            theater: LookupTable {
                files: vec!["megabox_theater.csv".to_string()],
                name_column: "brchNm".to_string(),
                code_columns: vec!["brchNo".to_string()],
            },
            movie: LookupTable {
                files: vec!["megabox_movie.csv".to_string()],
                name_column: "movieNm".to_string(),
                code_columns: vec!["movieNo".to_string()],
            },
        }
    }

    pub fn lotte_defaults() -> Self {
        let headers = BTreeMap::from([
            ("User-Agent".to_string(), CHROME_USER_AGENT.to_string()),
            (
                "Referer".to_string(),
                "https://www.lottecinema.co.kr/NLCHS/Ticketing".to_string(),
            ),
            (
                "Origin".to_string(),
                "https://www.lottecinema.co.kr".to_string(),
            ),
        ]);

        Self {
            endpoint: "https://www.lottecinema.co.kr/LCWS/Ticketing/TicketingData.aspx"
                .to_string(),
            timeout_seconds: 30,
            headers,
            theater: LookupTable {
                files: vec!["lottecinema_theater.csv".to_string()],
                name_column: "cinemaNameKR".to_string(),
                code_columns: vec![
                    "divisionCode".to_string(),
                    "detailDivisionCode".to_string(),
                    "cinemaID".to_string(),
                ],
            },
            movie: LookupTable {
                files: vec![
                    "lottecinema_movie_now.csv".to_string(),
                    "lottecinema_movie_upcoming.csv".to_string(),
                ],
                name_column: "movieNameKR".to_string(),
                code_columns: vec!["movieNo".to_string()],
            },
        }
    }

    /// User agent the chain client should impersonate; Lotte echoes it in
    /// the payload as `osVersion`.
    pub fn user_agent(&self) -> &str {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
            .map(|(_, value)| value.as_str())
            .unwrap_or(CHROME_USER_AGENT)
    }

    /// HTTP header names are case-insensitive, so an override replaces any
    /// existing spelling of the same header.
    pub fn set_header(&mut self, name: String, value: String) {
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value);
    }

    fn apply(&mut self, overrides: ChainOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(headers) = overrides.headers {
            for (name, value) in headers {
                self.set_header(name, value);
            }
        }
        if let Some(theater) = overrides.theater {
            theater.apply_to(&mut self.theater);
        }
        if let Some(movie) = overrides.movie {
            movie.apply_to(&mut self.movie);
        }
    }

    fn validate_section(&self, section: &str) -> Result<()> {
        validation::validate_url(&format!("{}.endpoint", section), &self.endpoint)?;
        validation::validate_range(
            &format!("{}.timeout_seconds", section),
            self.timeout_seconds,
            1,
            300,
        )?;

        for (kind, table) in [("theater", &self.theater), ("movie", &self.movie)] {
            let prefix = format!("{}.{}", section, kind);
            validation::validate_file_extensions(
                &format!("{}.files", prefix),
                &table.files,
                &["csv"],
            )?;
            validation::validate_non_empty_string(
                &format!("{}.name_column", prefix),
                &table.name_column,
            )?;
            if table.code_columns.is_empty() {
                return Err(ShowtimeError::MissingConfigError {
                    field: format!("{}.code_columns", prefix),
                });
            }
            for column in &table.code_columns {
                validation::validate_non_empty_string(
                    &format!("{}.code_columns", prefix),
                    column,
                )?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimesConfig {
    pub data_dir: Option<String>,
    pub megabox: ChainSettings,
    pub lotte: ChainSettings,
}

impl Default for ShowtimesConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            megabox: ChainSettings::megabox_defaults(),
            lotte: ChainSettings::lotte_defaults(),
        }
    }
}

/// Shape of the TOML file: every field optional, layered over the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    data_dir: Option<String>,
    megabox: Option<ChainOverrides>,
    lotte: Option<ChainOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChainOverrides {
    endpoint: Option<String>,
    timeout_seconds: Option<u64>,
    headers: Option<BTreeMap<String, String>>,
    theater: Option<LookupOverrides>,
    movie: Option<LookupOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LookupOverrides {
    files: Option<Vec<String>>,
    name_column: Option<String>,
    code_columns: Option<Vec<String>>,
}

impl LookupOverrides {
    fn apply_to(self, table: &mut LookupTable) {
        if let Some(files) = self.files {
            table.files = files;
        }
        if let Some(name_column) = self.name_column {
            table.name_column = name_column;
        }
        if let Some(code_columns) = self.code_columns {
            table.code_columns = code_columns;
        }
    }
}

impl ShowtimesConfig {
    /// Reads a TOML file and layers it over the built-in defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document and layers it over the built-in defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let overrides: ConfigOverrides =
            toml::from_str(&processed_content).map_err(|e| {
                ShowtimeError::ConfigValidationError {
                    field: "toml_parsing".to_string(),
                    message: format!("TOML parsing error: {}", e),
                }
            })?;

        let mut config = Self::default();
        config.data_dir = overrides.data_dir;
        if let Some(megabox) = overrides.megabox {
            config.megabox.apply(megabox);
        }
        if let Some(lotte) = overrides.lotte {
            config.lotte.apply(lotte);
        }
        Ok(config)
    }

    /// Replaces `${VAR}` placeholders with environment values; unknown
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShowtimeError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ShowtimesConfig {
    fn validate(&self) -> Result<()> {
        if let Some(data_dir) = &self.data_dir {
            validation::validate_path("data_dir", data_dir)?;
        }
        self.megabox.validate_section("megabox")?;
        self.lotte.validate_section("lotte")?;
        Ok(())
    }
}
