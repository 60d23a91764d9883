//! Replay script parsing
//!
//! One directive per line, `#` starts a comment:
//!
//! ```text
//! area     <secs> <hash> <town|hideout|map> <name...>
//! noplayer <secs> <hash> <town|hideout|map> <name...>
//! sample   <secs> <level> <xp>
//! reset    <secs>
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use xpbar_core::AreaInstance;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: offset {at_secs}s is earlier than the previous event")]
    OutOfOrder { line: usize, at_secs: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    /// Zone change. Without a player the host had no character data.
    Area {
        at_secs: f64,
        area: AreaInstance,
        with_player: bool,
    },
    Sample { at_secs: f64, level: u32, xp: u64 },
    Reset { at_secs: f64 },
}

impl ScriptEvent {
    pub fn at_secs(&self) -> f64 {
        match self {
            Self::Area { at_secs, .. } | Self::Sample { at_secs, .. } | Self::Reset { at_secs } => {
                *at_secs
            }
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>, ScriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScriptError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&content)
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();
    let mut last_secs = 0.0;

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let event = parse_line(line, text)?;
        if event.at_secs() < last_secs {
            return Err(ScriptError::OutOfOrder {
                line,
                at_secs: event.at_secs(),
            });
        }
        last_secs = event.at_secs();
        events.push(event);
    }

    Ok(events)
}

fn parse_line(line: usize, text: &str) -> Result<ScriptEvent, ScriptError> {
    let mut fields = text.split_whitespace();
    let directive = fields.next().unwrap_or_default();

    match directive {
        "sample" => Ok(ScriptEvent::Sample {
            at_secs: parse_secs(line, fields.next())?,
            level: parse_field(line, "level", fields.next())?,
            xp: parse_field(line, "xp", fields.next())?,
        }),
        "reset" => Ok(ScriptEvent::Reset {
            at_secs: parse_secs(line, fields.next())?,
        }),
        "area" | "noplayer" => {
            let at_secs = parse_secs(line, fields.next())?;
            let hash: u64 = parse_field(line, "hash", fields.next())?;
            let kind = fields.next().ok_or(ScriptError::MissingField {
                line,
                field: "area kind",
            })?;
            let name = fields.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return Err(ScriptError::MissingField {
                    line,
                    field: "area name",
                });
            }

            let area = match kind {
                "map" => AreaInstance::new(name, hash),
                "town" => AreaInstance::town(name, hash),
                "hideout" => AreaInstance::hideout(name, hash),
                other => {
                    return Err(ScriptError::InvalidValue {
                        line,
                        field: "area kind",
                        value: other.to_string(),
                    });
                }
            };

            Ok(ScriptEvent::Area {
                at_secs,
                area,
                with_player: directive == "area",
            })
        }
        other => Err(ScriptError::UnknownDirective {
            line,
            directive: other.to_string(),
        }),
    }
}

fn parse_secs(line: usize, value: Option<&str>) -> Result<f64, ScriptError> {
    let secs: f64 = parse_field(line, "offset", value)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ScriptError::InvalidValue {
            line,
            field: "offset",
            value: secs.to_string(),
        });
    }
    Ok(secs)
}

fn parse_field<T: FromStr>(
    line: usize,
    field: &'static str,
    value: Option<&str>,
) -> Result<T, ScriptError> {
    let value = value.ok_or(ScriptError::MissingField { line, field })?;
    value.parse().map_err(|_| ScriptError::InvalidValue {
        line,
        field,
        value: value.to_string(),
    })
}
