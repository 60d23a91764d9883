//! Cumulative experience table.
//!
//! `table[L]` is the total experience a character holds when it reaches
//! level `L + 1`, so level `L` spans `table[L - 1]..table[L]`. The table
//! length is the cap level: at the cap no further progress is possible.

use std::path::Path;

use serde::Deserialize;

use crate::context::CurveError;

/// Cumulative XP thresholds of the default game, index 0 = level 1.
pub const EXP_TABLE: [u64; 100] = [
    0, 525, 1760, 3781, 7184, 12186, 19324, 29377, 43181, 61693, 85990,
    117506, 157384, 207736, 269997, 346462, 439268, 551295, 685171,
    843709, 1030734, 1249629, 1504995, 1800847, 2142652, 2535122,
    2984677, 3496798, 4080655, 4742836, 5490247, 6334393, 7283446,
    8384398, 9541110, 10874351, 12361842, 14018289, 15859432, 17905634,
    20171471, 22679999, 25456123, 28517857, 31897771, 35621447, 39721017,
    44225461, 49176560, 54607467, 60565335, 67094245, 74247659, 82075627,
    90631041, 99984974, 110197515, 121340161, 133497202, 146749362,
    161191120, 176922628, 194049893, 212684946, 232956711, 255001620,
    278952403, 304972236, 333233648, 363906163, 397194041, 433312945,
    472476370, 514937180, 560961898, 610815862, 664824416, 723298169,
    786612664, 855129128, 929261318, 1009443795, 1096169525, 1189918242,
    1291270350, 1400795257, 1519130326, 1646943474, 1784977296,
    1934009687, 2094900291, 2268549086, 2455921256, 2658074992,
    2876116901, 3111280300, 3364828162, 3638186694, 3932818530,
    4250334444,
];

/// On-disk form of a custom curve (`table = [0, 525, ...]`).
#[derive(Debug, Deserialize)]
struct CurveFile {
    table: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCurve {
    table: Vec<u64>,
    max_level: u32,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            table: EXP_TABLE.to_vec(),
            max_level: EXP_TABLE.len() as u32,
        }
    }
}

impl LevelCurve {
    /// Build a curve from a cumulative table.
    ///
    /// The table needs at least two entries, must start at 0 and may never
    /// decrease.
    pub fn new(table: Vec<u64>) -> Result<Self, CurveError> {
        if table.len() < 2 {
            return Err(CurveError::TooShort { len: table.len() });
        }
        if table[0] != 0 {
            return Err(CurveError::NonZeroStart { first: table[0] });
        }
        if let Some(level) = table.windows(2).position(|w| w[1] < w[0]) {
            return Err(CurveError::Decreasing {
                level: level as u32 + 1,
            });
        }
        let max_level = table.len() as u32;
        Ok(Self { table, max_level })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CurveError> {
        let file: CurveFile = toml::from_str(content)?;
        Self::new(file.table)
    }

    pub fn load(path: &Path) -> Result<Self, CurveError> {
        let content = std::fs::read_to_string(path).map_err(|source| CurveError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Lower the cap below the table length (configured max level).
    /// A cap above the table length is ignored.
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level.clamp(1, self.table.len() as u32);
        self
    }

    /// Level at which no more progress is tracked.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Levels `1..max_level` have a defined span.
    pub fn is_valid_level(&self, level: u32) -> bool {
        level >= 1 && level < self.max_level
    }

    /// Total XP held on reaching `level + 1`. Clamped to the table bounds.
    pub fn cumulative_xp_for_level(&self, level: u32) -> u64 {
        let idx = (level as usize).min(self.table.len() - 1);
        self.table[idx]
    }

    /// XP span of `level`; 0 for levels without a defined span.
    pub fn xp_required_in_level(&self, level: u32) -> u64 {
        if !self.is_valid_level(level) {
            return 0;
        }
        self.table[level as usize] - self.table[level as usize - 1]
    }

    /// XP still missing before `level` is complete.
    pub fn remaining_xp(&self, level: u32, xp: u64) -> u64 {
        if !self.is_valid_level(level) {
            return 0;
        }
        self.cumulative_xp_for_level(level).saturating_sub(xp)
    }

    /// Percentage of `level` already completed. Invalid levels report 0.
    ///
    /// Not clamped: XP below the level start yields a negative value.
    pub fn percent_into_level(&self, level: u32, xp: u64) -> f64 {
        let span = self.xp_required_in_level(level);
        if span == 0 {
            return 0.0;
        }
        let level_start = self.cumulative_xp_for_level(level - 1);
        (xp as f64 - level_start as f64) * 100.0 / span as f64
    }
}
