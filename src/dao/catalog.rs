//! Loading of the question catalog from the JSON files shipped with a game.
//!
//! Two files are involved: the questions file (movies and their ratings) and
//! a round configuration file per player count (points, active player and the
//! final round slot). They are merged once into an immutable [`Catalog`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::state::game::{Catalog, Round};

/// Highest point value a single round may award.
pub const MAX_ROUND_POINTS: u32 = 1_000;

/// Errors raised while reading or validating catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog file could not be read.
    #[error("failed to read `{path}`")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A catalog file is not valid JSON for its schema.
    #[error("failed to parse `{path}`")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The questions file lists no questions.
    #[error("questions file contains no questions")]
    NoQuestions,
    /// A question rating is NaN or infinite.
    #[error("question {index} has a non-finite rating")]
    InvalidRating {
        /// Position of the offending question.
        index: usize,
    },
    /// More than one round configuration entry is flagged as the final round.
    #[error("round configuration flags more than one final round")]
    MultipleFinalRounds,
    /// The final round slot does not exist in the questions list.
    #[error("final round slot {slot} is out of range ({questions} questions)")]
    FinalSlotOutOfRange {
        /// Requested slot.
        slot: usize,
        /// Number of questions available.
        questions: usize,
    },
    /// The entry flagged as the final round is not stored at its own slot.
    #[error("final round entry sits at position {position} but names slot {slot}")]
    FinalRoundMisplaced {
        /// Position of the entry in the configuration list.
        position: usize,
        /// Slot the entry names.
        slot: usize,
    },
    /// A round awards more points than [`MAX_ROUND_POINTS`].
    #[error("round {index} awards {points} points (max {max})")]
    PointsOutOfRange {
        /// Position of the round.
        index: usize,
        /// Configured points.
        points: u32,
        /// Accepted maximum.
        max: u32,
    },
    /// A round has no configuration entry.
    #[error("round {index} has no round configuration entry")]
    MissingRoundConfig {
        /// Position of the round without configuration.
        index: usize,
    },
    /// A round names an active player the roster will never have.
    #[error("round {index} makes player {active} active but only {players} players play")]
    ActivePlayerOutOfRange {
        /// Position of the round.
        index: usize,
        /// Configured active player index.
        active: usize,
        /// Expected roster size.
        players: usize,
    },
}

/// Questions file as written by the game authors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionFile {
    /// Display name of the game.
    #[serde(default)]
    pub game_name: String,
    /// Movies in authoring order.
    pub questions: Vec<RawQuestion>,
}

/// One movie entry of the questions file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawQuestion {
    /// Movie title.
    pub title: String,
    /// Release year.
    #[serde(default)]
    pub year: i32,
    /// Main cast members.
    #[serde(default)]
    pub cast: Vec<String>,
    /// Synopsis.
    #[serde(default)]
    pub desc: String,
    /// Number of users who voted.
    #[serde(default)]
    pub user_count: u64,
    /// Target rating.
    pub rating: f64,
}

/// Round configuration file for a given player count.
#[derive(Debug, Deserialize)]
pub struct RoundConfigFile {
    /// Entries indexed by round position.
    #[serde(rename = "Questions")]
    pub rounds: Vec<RawRoundConfig>,
}

/// Per-round configuration entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRoundConfig {
    /// Slot of the round. For the final round this is where the last question lands.
    pub number: usize,
    /// Label shown to players.
    #[serde(default)]
    pub round_number: u32,
    /// Points at stake.
    pub points: u32,
    /// Roster index of the active player.
    #[serde(default)]
    pub active_player: usize,
    /// Whether this entry is the final round.
    #[serde(default)]
    pub final_round: bool,
}

/// Path of the round configuration file for `players` players inside `dir`.
pub fn round_config_path(dir: &Path, players: usize) -> PathBuf {
    dir.join(format!("{players}player.json"))
}

/// Read both catalog files and merge them for a game of `players` players.
pub fn load_catalog(
    questions_path: &Path,
    round_configs_dir: &Path,
    players: usize,
) -> Result<Catalog, CatalogError> {
    let questions: QuestionFile = read_json(questions_path)?;
    let config_path = round_config_path(round_configs_dir, players);
    let configs: RoundConfigFile = read_json(&config_path)?;

    let catalog = build_catalog(questions, configs.rounds, players)?;
    info!(
        questions = %questions_path.display(),
        rounds_config = %config_path.display(),
        rounds = catalog.len(),
        "loaded question catalog"
    );
    Ok(catalog)
}

/// Merge questions with their round configuration.
///
/// When an entry is flagged as the final round, the last question is moved
/// to that entry's slot and the catalog ends there. Every remaining round
/// must have a configuration entry at the same position.
pub fn build_catalog(
    file: QuestionFile,
    configs: Vec<RawRoundConfig>,
    players: usize,
) -> Result<Catalog, CatalogError> {
    let QuestionFile {
        game_name,
        questions,
    } = file;
    if questions.is_empty() {
        return Err(CatalogError::NoQuestions);
    }
    if let Some(index) = questions.iter().position(|q| !q.rating.is_finite()) {
        return Err(CatalogError::InvalidRating { index });
    }

    let questions = relocate_final_round(questions, &configs)?;

    let rounds = questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| {
            let config = configs
                .get(index)
                .ok_or(CatalogError::MissingRoundConfig { index })?;
            if config.points > MAX_ROUND_POINTS {
                return Err(CatalogError::PointsOutOfRange {
                    index,
                    points: config.points,
                    max: MAX_ROUND_POINTS,
                });
            }
            if config.active_player >= players {
                return Err(CatalogError::ActivePlayerOutOfRange {
                    index,
                    active: config.active_player,
                    players,
                });
            }
            Ok(Round {
                index,
                round_number: config.round_number,
                title: question.title,
                year: question.year,
                cast: question.cast,
                description: question.desc,
                user_count: question.user_count,
                rating: question.rating,
                point_value: config.points,
                active_player_index: config.active_player,
                final_round: config.final_round,
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    if configs.len() > rounds.len() {
        debug!(
            unused = configs.len() - rounds.len(),
            "round configuration has entries past the last round"
        );
    }

    Ok(Catalog::new(game_name, rounds))
}

fn relocate_final_round(
    mut questions: Vec<RawQuestion>,
    configs: &[RawRoundConfig],
) -> Result<Vec<RawQuestion>, CatalogError> {
    let mut finals = configs
        .iter()
        .enumerate()
        .filter(|(_, config)| config.final_round);
    let Some((position, final_config)) = finals.next() else {
        return Ok(questions);
    };
    if finals.next().is_some() {
        return Err(CatalogError::MultipleFinalRounds);
    }

    let slot = final_config.number;
    if slot >= questions.len() {
        return Err(CatalogError::FinalSlotOutOfRange {
            slot,
            questions: questions.len(),
        });
    }
    if position != slot {
        return Err(CatalogError::FinalRoundMisplaced { position, slot });
    }

    if let Some(last) = questions.pop() {
        questions.truncate(slot);
        questions.push(last);
    }
    Ok(questions)
}

fn read_json<T>(path: &Path) -> Result<T, CatalogError>
where
    T: for<'de> Deserialize<'de>,
{
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
