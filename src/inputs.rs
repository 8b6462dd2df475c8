use std::{collections::HashMap, fs, io, path::Path};

use thiserror::Error;

use crate::aero::CtCurve;
use crate::error::InvalidInputError;
use crate::model::StructuralParameters;
use crate::wind::WindRecord;

/// Failure while reading or parsing an input file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: failed to parse `{token}` as a number")]
    Parse {
        path: String,
        line: usize,
        token: String,
    },

    #[error("{path}:{line}: expected {expected} numeric columns")]
    ColumnCount {
        path: String,
        line: usize,
        expected: usize,
    },

    #[error(transparent)]
    Invalid(#[from] InvalidInputError),
}

fn read_file(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_f64(path: &Path, line: usize, token: &str) -> Result<f64, InputError> {
    token.parse().map_err(|_| InputError::Parse {
        path: path.display().to_string(),
        line,
        token: token.to_string(),
    })
}

/// Reads a two-column (wind speed, Ct) table. The first line is a header
/// and is skipped unconditionally.
pub fn read_thrust_table(path: &Path) -> Result<(Vec<f64>, Vec<f64>), InputError> {
    let text = read_file(path)?;
    let mut wind_speed = vec![];
    let mut ct = vec![];
    for (i, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 2 {
            return Err(InputError::ColumnCount {
                path: path.display().to_string(),
                line: i + 1,
                expected: 2,
            });
        }
        wind_speed.push(parse_f64(path, i + 1, cols[0])?);
        ct.push(parse_f64(path, i + 1, cols[1])?);
    }
    Ok((wind_speed, ct))
}

/// Reads a thrust table and builds the production (extrapolating) Ct curve.
pub fn load_ct_curve(path: &Path) -> Result<CtCurve, InputError> {
    let (wind_speed, ct) = read_thrust_table(path)?;
    Ok(CtCurve::new(wind_speed, ct)?)
}

const PARAMETER_KEYS: [&str; 10] = ["mb", "mn", "mh", "mt", "c1", "c2", "k1", "k2", "Dr", "rho"];

/// Reads the structural parameter file.
///
/// Each parameter line carries the value first and its key behind a `#`:
///
/// ```text
/// 41000    # mb, blade mass [kg]
/// ```
///
/// Lines without a value/`#`-key pair are ignored. All ten keys
/// {mb, mn, mh, mt, c1, c2, k1, k2, Dr, rho} must be present.
pub fn read_parameters(path: &Path) -> Result<StructuralParameters, InputError> {
    let text = read_file(path)?;
    let mut map = HashMap::new();
    for (i, line) in text.lines().enumerate() {
        let Some((value_part, key_part)) = line.split_once('#') else {
            continue;
        };
        let Some(value_token) = value_part.split_whitespace().next() else {
            continue;
        };
        let Some(key) = key_part
            .split_whitespace()
            .next()
            .map(|k| k.trim_matches(|c: char| c == ',' || c == ':'))
        else {
            continue;
        };
        let value = parse_f64(path, i + 1, value_token)?;
        map.insert(key.to_string(), value);
    }

    let get = |key: &'static str| -> Result<f64, InvalidInputError> {
        map.get(key)
            .copied()
            .ok_or(InvalidInputError::MissingParameter { key })
    };

    Ok(StructuralParameters {
        mass_blade: get("mb")?,
        mass_nacelle: get("mn")?,
        mass_hub: get("mh")?,
        mass_tower: get("mt")?,
        damping_blade: get("c1")?,
        damping_tower: get("c2")?,
        stiffness_blade: get("k1")?,
        stiffness_tower: get("k2")?,
        rotor_diameter: get("Dr")?,
        air_density: get("rho")?,
    })
}

/// Reads a two-column (time, wind speed) record.
///
/// `#`-prefixed lines are skipped anywhere; one leading non-numeric line is
/// tolerated as a column header. Samples earlier than `skip_before` are
/// discarded (0 keeps the whole record; 60 is the customary transient trim
/// for production wind files).
pub fn read_wind_record(path: &Path, skip_before: f64) -> Result<WindRecord, InputError> {
    let text = read_file(path)?;
    let mut time = vec![];
    let mut speed = vec![];
    let mut saw_data = false;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        if !saw_data && cols[0].parse::<f64>().is_err() {
            continue; // column header
        }
        if cols.len() < 2 {
            return Err(InputError::ColumnCount {
                path: path.display().to_string(),
                line: i + 1,
                expected: 2,
            });
        }
        let t = parse_f64(path, i + 1, cols[0])?;
        let u = parse_f64(path, i + 1, cols[1])?;
        saw_data = true;
        if t < skip_before {
            continue;
        }
        time.push(t);
        speed.push(u);
    }
    Ok(WindRecord::new(time, speed)?)
}
