//! `KEY=VALUE` configuration file
//!
//! ```text
//! # comments and blank lines are ignored
//! WIDTH=20
//! HEIGHT=15
//! ENTRY=0,1
//! EXIT=19,13
//! OUTPUT_FILE=maze.txt
//! PERFECT=True
//! SEED=42
//! ```
//!
//! Coordinates are written `col,row`. Width and height are forced odd before
//! the coordinates are checked against the grid.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::grid::{make_odd, Point};
use crate::maze_generator::MazeGenerator;
use crate::GenerationRequest;

/// Smallest accepted width or height
pub const MIN_SIZE: usize = 5;
/// Largest accepted width or height
pub const MAX_SIZE: usize = 99;

const REQUIRED_KEYS: [&str; 6] = ["WIDTH", "HEIGHT", "ENTRY", "EXIT", "OUTPUT_FILE", "PERFECT"];

/// Invalid generation parameters
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read '{}': {source}", .path.display())]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("Line {line}: invalid format '{content}' (expected KEY=VALUE)")]
    InvalidLine { line: usize, content: String },
    #[error("Missing required key '{0}' in config file")]
    MissingKey(&'static str),
    #[error("Invalid {key} '{value}': must be an integer")]
    InvalidInteger { key: &'static str, value: String },
    #[error("{key}={value} out of range ({min}-{max})")]
    OutOfRange {
        key: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error("{dimension}={value} is too small (minimum {})", MIN_SIZE)]
    TooSmall { dimension: &'static str, value: usize },
    #[error("Invalid {key} '{value}': expected col,row")]
    InvalidCoordinates { key: &'static str, value: String },
    #[error("{key}={},{} is out of bounds", .point.x, .point.y)]
    OutOfBounds { key: &'static str, point: Point },
    #[error("{key}={},{} must be on the border", .point.x, .point.y)]
    NotOnBorder { key: &'static str, point: Point },
    #[error("ENTRY and EXIT must not be the same cell")]
    SameEntryExit,
    #[error("OUTPUT_FILE must not be empty")]
    EmptyOutputFile,
    #[error("Invalid {key} '{value}': must be True or False")]
    InvalidBool { key: &'static str, value: String },
    #[error("Invalid LOOP_DENSITY '{0}': must be a positive integer")]
    InvalidLoopDensity(String),
}

/// Validated contents of a configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub entry: Point,
    pub exit: Point,
    pub output_file: PathBuf,
    pub perfect: bool,
    pub seed: Option<u64>,
    pub loop_density: usize,
}

impl Config {
    /// Read and validate the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::parse(&text)
    }

    /// Parse and validate configuration text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut raw: HashMap<String, String> = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::InvalidLine {
                line: idx + 1,
                content: line.to_string(),
            })?;
            raw.insert(key.trim().to_uppercase(), value.trim().to_string());
        }

        for key in REQUIRED_KEYS {
            if !raw.contains_key(key) {
                return Err(ConfigError::MissingKey(key));
            }
        }
        let value = |key: &str| raw.get(key).map(String::as_str).unwrap_or_default();

        let cols = make_odd(parse_size("WIDTH", value("WIDTH"))?);
        let rows = make_odd(parse_size("HEIGHT", value("HEIGHT"))?);

        let entry = parse_coordinates("ENTRY", value("ENTRY"))?;
        check_border("ENTRY", entry, rows, cols)?;
        let exit = parse_coordinates("EXIT", value("EXIT"))?;
        check_border("EXIT", exit, rows, cols)?;
        if entry == exit {
            return Err(ConfigError::SameEntryExit);
        }

        let output_file = value("OUTPUT_FILE");
        if output_file.is_empty() {
            return Err(ConfigError::EmptyOutputFile);
        }

        let perfect = match value("PERFECT").to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(ConfigError::InvalidBool {
                    key: "PERFECT",
                    value: value("PERFECT").to_string(),
                })
            }
        };

        let seed = match raw.get("SEED") {
            Some(s) => Some(s.parse::<u64>().map_err(|_| ConfigError::InvalidInteger {
                key: "SEED",
                value: s.clone(),
            })?),
            None => None,
        };

        let loop_density = match raw.get("LOOP_DENSITY") {
            Some(s) => match s.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidLoopDensity(s.clone())),
            },
            None => MazeGenerator::DEFAULT_LOOP_DENSITY,
        };

        Ok(Config {
            rows,
            cols,
            entry,
            exit,
            output_file: PathBuf::from(output_file),
            perfect,
            seed,
            loop_density,
        })
    }

    /// Generation parameters described by this configuration
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest {
            rows: self.rows,
            cols: self.cols,
            entry: self.entry,
            exit: self.exit,
            perfect: self.perfect,
            seed: self.seed,
            loop_density: self.loop_density,
        }
    }
}

fn parse_size(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    let n: usize = value.parse().map_err(|_| ConfigError::InvalidInteger {
        key,
        value: value.to_string(),
    })?;
    if !(MIN_SIZE..=MAX_SIZE).contains(&n) {
        return Err(ConfigError::OutOfRange {
            key,
            value: n,
            min: MIN_SIZE,
            max: MAX_SIZE,
        });
    }
    Ok(n)
}

/// Parse a `col,row` pair into a [Point]
pub fn parse_coordinates(key: &'static str, value: &str) -> Result<Point, ConfigError> {
    let invalid = || ConfigError::InvalidCoordinates {
        key,
        value: value.to_string(),
    };
    let (col, row) = value.split_once(',').ok_or_else(invalid)?;
    let x = col.trim().parse().map_err(|_| invalid())?;
    let y = row.trim().parse().map_err(|_| invalid())?;
    Ok(Point { y, x })
}

/// Check that `point` lies on the border of a `rows` × `cols` grid
pub fn check_border(
    key: &'static str,
    point: Point,
    rows: usize,
    cols: usize,
) -> Result<(), ConfigError> {
    if point.y >= rows || point.x >= cols {
        return Err(ConfigError::OutOfBounds { key, point });
    }
    if point.y != 0 && point.x != 0 && point.y != rows - 1 && point.x != cols - 1 {
        return Err(ConfigError::NotOnBorder { key, point });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::config::{parse_coordinates, Config, ConfigError};
    use crate::grid::Point;

    const VALID: &str = "
# maze settings
WIDTH=20
HEIGHT=15
ENTRY=0,1
EXIT=20,13
OUTPUT_FILE=maze.txt
PERFECT=True
SEED=42
";

    #[test]
    fn parse_valid_config() {
        let config = Config::parse(VALID).unwrap();

        assert_eq!(config.cols, 21);
        assert_eq!(config.rows, 15);
        assert_eq!(config.entry, Point::new(1, 0));
        assert_eq!(config.exit, Point::new(13, 20));
        assert_eq!(config.output_file, PathBuf::from("maze.txt"));
        assert!(config.perfect);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.loop_density, 7);

        let request = config.request();
        assert_eq!(request.rows, 15);
        assert_eq!(request.entry, Point::new(1, 0));
    }

    #[test]
    fn keys_are_case_insensitive_and_seed_is_optional() {
        let text = "width = 9\nheight=9\nentry=0,1\nexit=8,7\noutput_file=out.txt\nperfect=false\nloop_density=3";
        let config = Config::parse(text).unwrap();
        assert!(!config.perfect);
        assert_eq!(config.seed, None);
        assert_eq!(config.loop_density, 3);
    }

    #[test]
    fn reject_missing_key() {
        let text = VALID.replace("PERFECT=True", "");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::MissingKey("PERFECT"))
        ));
    }

    #[test]
    fn reject_malformed_line() {
        let text = format!("{}\nnonsense", VALID);
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::InvalidLine { line: 11, .. })
        ));
    }

    #[test]
    fn reject_out_of_range_dimensions() {
        let text = VALID.replace("WIDTH=20", "WIDTH=4");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::OutOfRange { key: "WIDTH", .. })
        ));
        let text = VALID.replace("HEIGHT=15", "HEIGHT=100");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::OutOfRange { key: "HEIGHT", .. })
        ));
        let text = VALID.replace("HEIGHT=15", "HEIGHT=abc");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::InvalidInteger { key: "HEIGHT", .. })
        ));
    }

    #[test]
    fn reject_entry_off_border() {
        let text = VALID.replace("ENTRY=0,1", "ENTRY=3,3");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::NotOnBorder { key: "ENTRY", .. })
        ));
        let text = VALID.replace("EXIT=20,13", "EXIT=21,13");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::OutOfBounds { key: "EXIT", .. })
        ));
    }

    #[test]
    fn reject_same_entry_and_exit() {
        let text = VALID.replace("EXIT=20,13", "EXIT=0,1");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::SameEntryExit)
        ));
    }

    #[test]
    fn reject_bad_values() {
        let text = VALID.replace("PERFECT=True", "PERFECT=yes");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::InvalidBool { .. })
        ));
        let text = VALID.replace("OUTPUT_FILE=maze.txt", "OUTPUT_FILE=");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::EmptyOutputFile)
        ));
        let text = VALID.replace("SEED=42", "SEED=-1");
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::InvalidInteger { key: "SEED", .. })
        ));
        let text = format!("{}LOOP_DENSITY=0\n", VALID);
        assert!(matches!(
            Config::parse(&text),
            Err(ConfigError::InvalidLoopDensity(_))
        ));
    }

    #[test]
    fn parse_col_row_pairs() {
        assert_eq!(
            parse_coordinates("ENTRY", " 3 , 0 ").unwrap(),
            Point::new(0, 3)
        );
        assert!(parse_coordinates("ENTRY", "3").is_err());
        assert!(parse_coordinates("ENTRY", "3,x").is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let path = Path::new("definitely/not/here/config.txt");
        let err = Config::load(path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }
}
