use fxhash::FxHashMap;
use serde::Serialize;

const AVERAGE_UNIQUE_MARKER: &str = "Average Unique Locations Visited:";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeuristicSeedKey {
    pub vehicles: usize,
    pub shifts: usize,
    pub locations: usize,
}

/// Average unique-location counts of earlier heuristic runs, keyed by problem size.
#[derive(Debug, Clone, Default)]
pub struct HeuristicSeeds {
    entries: FxHashMap<HeuristicSeedKey, f64>,
}

impl HeuristicSeeds {
    /// Reads result lines, skipping anything that does not look like one.
    /// A key seen twice keeps its last value.
    pub fn parse(text: &str) -> Self {
        let mut seeds = HeuristicSeeds::default();
        for (key, hint) in text.lines().filter_map(parse_line) {
            seeds.insert(key, hint);
        }
        seeds
    }

    pub fn insert(&mut self, key: HeuristicSeedKey, hint: f64) {
        self.entries.insert(key, hint);
    }

    pub fn get(&self, key: HeuristicSeedKey) -> Option<f64> {
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses `<V> vehicles, <S> shifts, <L> locations ... Average Unique Locations Visited: <float>`.
pub fn parse_line(line: &str) -> Option<(HeuristicSeedKey, f64)> {
    let (head, tail) = line.split_once(" vehicles, ")?;
    let vehicles = trailing_integer(head)?;

    let (shifts, tail) = leading_integer(tail)?;
    let tail = tail.strip_prefix(" shifts, ")?;
    let (locations, tail) = leading_integer(tail)?;
    tail.strip_prefix(" locations")?;

    let (_, value) = line.split_once(AVERAGE_UNIQUE_MARKER)?;
    let hint = leading_decimal(value.trim_start())?;

    Some((
        HeuristicSeedKey {
            vehicles,
            shifts,
            locations,
        },
        hint,
    ))
}

fn trailing_integer(text: &str) -> Option<usize> {
    let start = text
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |index| index + 1);
    text[start..].parse().ok()
}

fn leading_integer(text: &str) -> Option<(usize, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

fn leading_decimal(text: &str) -> Option<f64> {
    let (integer, rest) = text.split_at(
        text.find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len()),
    );
    if integer.is_empty() {
        return None;
    }

    let fraction = rest
        .strip_prefix('.')
        .map(|rest| {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            &rest[..end]
        })
        .unwrap_or("");

    format!("{integer}.{fraction}0").parse().ok()
}
