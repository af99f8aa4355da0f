//! Difficulty presets and the editable settings store
//!
//! Presets come from the `settings` document. Any manual edit moves the
//! player onto the `custom` difficulty, keeping the previous preset as the
//! baseline for further edits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Language;
use crate::consts::MAX_ARCADE_DIGITS;

/// Named difficulty levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Custom,
    #[default]
    Learn,
    Easy,
    Medium,
    Hard,
    Insane,
    Extreme,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 8] = [
        Difficulty::Custom,
        Difficulty::Learn,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
        Difficulty::Extreme,
        Difficulty::Impossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Custom => "custom",
            Difficulty::Learn => "learn",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
            Difficulty::Extreme => "extreme",
            Difficulty::Impossible => "impossible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Custom => "Custom",
            Difficulty::Learn => "Learn",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
            Difficulty::Extreme => "Extreme",
            Difficulty::Impossible => "Impossible",
        }
    }
}

/// Game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gamemode {
    #[default]
    Classic,
    Arcade,
}

impl Gamemode {
    pub const ALL: [Gamemode; 2] = [Gamemode::Classic, Gamemode::Arcade];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gamemode::Classic => "classic",
            Gamemode::Arcade => "arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Gamemode::Classic),
            "arcade" => Some(Gamemode::Arcade),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gamemode::Classic => "Classic",
            Gamemode::Arcade => "Arcade",
        }
    }
}

/// Arcade countdown timing, all in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcadeTiming {
    pub penalty_time: u32,
    pub bonus_time: u32,
    pub total_time: u32,
}

/// What each table cell displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TableToggles {
    pub name: bool,
    pub symbol: bool,
    pub protons: bool,
}

/// Which facts about the target appear in the hint panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HintToggles {
    pub name: bool,
    pub family: bool,
    pub symbol: bool,
    pub electron: bool,
    pub mass: bool,
    pub protons: bool,
    pub group: bool,
    pub period: bool,
    pub block: bool,
    #[serde(rename = "type")]
    pub kind: bool,
}

impl HintToggles {
    pub fn any(&self) -> bool {
        HintField::ALL.into_iter().any(|f| self.get(f))
    }

    pub fn get(&self, field: HintField) -> bool {
        match field {
            HintField::Name => self.name,
            HintField::Family => self.family,
            HintField::Symbol => self.symbol,
            HintField::Electron => self.electron,
            HintField::Mass => self.mass,
            HintField::Protons => self.protons,
            HintField::Group => self.group,
            HintField::Period => self.period,
            HintField::Block => self.block,
            HintField::Type => self.kind,
        }
    }

    fn get_mut(&mut self, field: HintField) -> &mut bool {
        match field {
            HintField::Name => &mut self.name,
            HintField::Family => &mut self.family,
            HintField::Symbol => &mut self.symbol,
            HintField::Electron => &mut self.electron,
            HintField::Mass => &mut self.mass,
            HintField::Protons => &mut self.protons,
            HintField::Group => &mut self.group,
            HintField::Period => &mut self.period,
            HintField::Block => &mut self.block,
            HintField::Type => &mut self.kind,
        }
    }
}

/// A difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    pub arcade: ArcadeTiming,
    /// Wrong guesses stay marked (and unclickable) until the next correct one
    pub error_protection: bool,
    /// Correct answers stay marked for the rest of the round
    pub answer_persist: bool,
    pub show_group_colors: bool,
    pub table: TableToggles,
    pub hints: HintToggles,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            arcade: ArcadeTiming {
                penalty_time: 2,
                bonus_time: 10,
                total_time: 300,
            },
            error_protection: true,
            answer_persist: true,
            show_group_colors: true,
            table: TableToggles {
                name: true,
                symbol: true,
                protons: true,
            },
            hints: HintToggles {
                name: true,
                symbol: true,
                protons: true,
                family: true,
                kind: true,
                ..HintToggles::default()
            },
        }
    }
}

impl DifficultyConfig {
    pub fn toggle(&self, field: ToggleField) -> bool {
        match field {
            ToggleField::ErrorProtection => self.error_protection,
            ToggleField::AnswerPersist => self.answer_persist,
            ToggleField::Table(TableField::Name) => self.table.name,
            ToggleField::Table(TableField::Symbol) => self.table.symbol,
            ToggleField::Table(TableField::Protons) => self.table.protons,
            ToggleField::Table(TableField::Colors) => self.show_group_colors,
            ToggleField::Hint(h) => self.hints.get(h),
        }
    }

    pub fn arcade_value(&self, field: ArcadeField) -> u32 {
        match field {
            ArcadeField::TotalTime => self.arcade.total_time,
            ArcadeField::BonusTime => self.arcade.bonus_time,
            ArcadeField::PenaltyTime => self.arcade.penalty_time,
        }
    }

    /// Apply a single edit in place
    pub fn apply(&mut self, edit: SettingEdit) {
        match edit {
            SettingEdit::Toggle(field, on) => {
                let slot = match field {
                    ToggleField::ErrorProtection => &mut self.error_protection,
                    ToggleField::AnswerPersist => &mut self.answer_persist,
                    ToggleField::Table(TableField::Name) => &mut self.table.name,
                    ToggleField::Table(TableField::Symbol) => &mut self.table.symbol,
                    ToggleField::Table(TableField::Protons) => &mut self.table.protons,
                    ToggleField::Table(TableField::Colors) => &mut self.show_group_colors,
                    ToggleField::Hint(h) => self.hints.get_mut(h),
                };
                *slot = on;
            }
            SettingEdit::Arcade(field, value) => match field {
                ArcadeField::TotalTime => self.arcade.total_time = value,
                ArcadeField::BonusTime => self.arcade.bonus_time = value,
                ArcadeField::PenaltyTime => self.arcade.penalty_time = value,
            },
        }
    }
}

/// Table display toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableField {
    Protons,
    Symbol,
    /// Group colours (stored as `showGroupColors`)
    Colors,
    Name,
}

impl TableField {
    pub const ALL: [TableField; 4] = [
        TableField::Protons,
        TableField::Symbol,
        TableField::Colors,
        TableField::Name,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TableField::Protons => "Protons",
            TableField::Symbol => "Symbol",
            TableField::Colors => "Colors",
            TableField::Name => "Name",
        }
    }
}

/// Hint panel toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintField {
    Name,
    Family,
    Symbol,
    Electron,
    Mass,
    Protons,
    Group,
    Period,
    Block,
    Type,
}

impl HintField {
    pub const ALL: [HintField; 10] = [
        HintField::Name,
        HintField::Family,
        HintField::Symbol,
        HintField::Electron,
        HintField::Mass,
        HintField::Protons,
        HintField::Group,
        HintField::Period,
        HintField::Block,
        HintField::Type,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HintField::Name => "Name",
            HintField::Family => "Family",
            HintField::Symbol => "Symbol",
            HintField::Electron => "Electron",
            HintField::Mass => "Mass",
            HintField::Protons => "Protons",
            HintField::Group => "Group",
            HintField::Period => "Period",
            HintField::Block => "Block",
            HintField::Type => "Type",
        }
    }
}

/// Any boolean field of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleField {
    ErrorProtection,
    AnswerPersist,
    Table(TableField),
    Hint(HintField),
}

/// Numeric arcade timing fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcadeField {
    TotalTime,
    BonusTime,
    PenaltyTime,
}

impl ArcadeField {
    pub const ALL: [ArcadeField; 3] = [
        ArcadeField::TotalTime,
        ArcadeField::BonusTime,
        ArcadeField::PenaltyTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ArcadeField::TotalTime => "Total time",
            ArcadeField::BonusTime => "Bonus time",
            ArcadeField::PenaltyTime => "Penalty time",
        }
    }
}

/// A single manual settings change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingEdit {
    Toggle(ToggleField, bool),
    Arcade(ArcadeField, u32),
}

/// Parse a timing text input: non-digits are dropped, more than
/// five digits is rejected, an empty input means zero.
pub fn parse_arcade_input(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > MAX_ARCADE_DIGITS {
        return None;
    }
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}

/// Timing values this large are shown as infinite
pub fn format_arcade_value(value: u32) -> String {
    if value >= 1_000_000 {
        "∞".to_string()
    } else {
        value.to_string()
    }
}

/// The `settings` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub languages: Vec<Language>,
    pub gamemodes: Vec<Gamemode>,
    pub difficulties: BTreeMap<Difficulty, DifficultyConfig>,
}

impl GameSettings {
    pub fn preset(&self, difficulty: Difficulty) -> Option<&DifficultyConfig> {
        self.difficulties.get(&difficulty)
    }
}

/// Selected difficulty plus the active preset
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsStore {
    difficulty: Difficulty,
    config: DifficultyConfig,
}

impl SettingsStore {
    pub fn new(difficulty: Difficulty, config: DifficultyConfig) -> Self {
        Self { difficulty, config }
    }

    /// Start on `difficulty`, using its preset from the document
    pub fn from_document(settings: &GameSettings, difficulty: Difficulty) -> Self {
        let config = settings.preset(difficulty).copied().unwrap_or_else(|| {
            log::warn!("No preset for {}, using defaults", difficulty.as_str());
            DifficultyConfig::default()
        });
        Self { difficulty, config }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Switch difficulty. Named levels replace the preset wholesale,
    /// `custom` keeps whatever is active now.
    pub fn select(&mut self, difficulty: Difficulty, settings: &GameSettings) {
        self.difficulty = difficulty;
        if difficulty == Difficulty::Custom {
            return;
        }
        match settings.preset(difficulty) {
            Some(preset) => self.config = *preset,
            None => log::warn!("No preset for {}, keeping current", difficulty.as_str()),
        }
    }

    /// Apply a manual edit; always lands on `custom`
    pub fn edit(&mut self, edit: SettingEdit) {
        if self.difficulty != Difficulty::Custom {
            log::info!("Editing {} preset as custom", self.difficulty.as_str());
            self.difficulty = Difficulty::Custom;
        }
        self.config.apply(edit);
    }

    /// Replace both fields, e.g. from a shared link
    pub fn restore(&mut self, difficulty: Difficulty, config: DifficultyConfig) {
        self.difficulty = difficulty;
        self.config = config;
    }
}
