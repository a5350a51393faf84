use crate::orbit::OrbitError;

/// Splits 2-line or 3-line TLE text into `(name, line1, line2)`.
pub fn parse_tle_lines(tle: &str) -> Result<(Option<String>, String, String), OrbitError> {
    let lines: Vec<String> = tle
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    match lines.as_slice() {
        [line1, line2] => Ok((None, line1.clone(), line2.clone())),
        [name, line1, line2] => Ok((Some(name.clone()), line1.clone(), line2.clone())),
        _ => Err(OrbitError::InvalidTleFormat),
    }
}
