//! Game controller
//!
//! Owns the loaded documents, the settings store, the current round and
//! the player's page preferences. Every settings-relevant change is
//! written through the persistence bridge.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::catalog::{self, Catalog, Element, Hint, Language};
use crate::consts::ELEMENT_COUNT;
use crate::layout::TableSize;
use crate::loader::GameData;
use crate::persistence::session::SessionRecord;
use crate::persistence::{DocumentPort, NavigationPort, PersistenceBridge, StoragePort};
use crate::round::{MarkRules, Round, RoundEvent, RoundInput, TimerMode, step};
use crate::settings::{Difficulty, DifficultyConfig, Gamemode, GameSettings, SettingEdit, SettingsStore};

/// Page-level preferences that do not affect the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub language: Language,
    pub dark_mode: bool,
    pub table_size: TableSize,
}

/// HUD counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStatus {
    pub attempts: u32,
    pub found: u32,
    pub total: u32,
    pub errors: u32,
    pub time: String,
}

pub struct Game<S, N, D> {
    data: GameData,
    store: SettingsStore,
    gamemode: Gamemode,
    prefs: Preferences,
    round: Round,
    bridge: PersistenceBridge<S, N>,
    document: D,
    rng: Pcg32,
}

impl<S: StoragePort, N: NavigationPort, D: DocumentPort> Game<S, N, D> {
    /// Restore the last session (URL first, then storage) and start a round.
    /// `seed` drives target selection.
    pub fn with_seed(data: GameData, bridge: PersistenceBridge<S, N>, mut document: D, seed: u64) -> Self {
        let rng = Pcg32::seed_from_u64(seed);
        let loaded = bridge.load();

        let difficulty = loaded.difficulty().unwrap_or_default();
        let mut store = SettingsStore::from_document(&data.settings, difficulty);
        if let Some(config) = loaded.config() {
            store.restore(difficulty, config);
        }
        let gamemode = loaded.gamemode().unwrap_or_default();

        let prefs = Preferences {
            language: loaded.language().unwrap_or_default(),
            dark_mode: loaded.dark_mode().unwrap_or_else(|| document.prefers_dark()),
            table_size: loaded
                .table_size()
                .unwrap_or_else(|| TableSize::from_viewport_width(document.viewport_width())),
        };
        document.apply_dark_mode(prefs.dark_mode);

        let timer = TimerMode::for_selection(gamemode, store.difficulty(), store.config());
        let round = Round::new(timer, MarkRules::from(store.config()));

        let mut game = Self {
            data,
            store,
            gamemode,
            prefs,
            round,
            bridge,
            document,
            rng,
        };
        game.input(RoundInput::Start);
        log::info!(
            "Game ready: {} / {}",
            game.store.difficulty().as_str(),
            game.gamemode.as_str()
        );
        game.persist();
        game
    }

    fn input(&mut self, input: RoundInput) -> Option<RoundEvent> {
        step(&mut self.round, input, &mut self.rng)
    }

    // === Round ===

    /// Player clicked the cell with this atomic number
    pub fn click(&mut self, protons: u32) -> Option<RoundEvent> {
        self.input(RoundInput::Click { protons })
    }

    /// One second of the round clock
    pub fn tick(&mut self) -> Option<RoundEvent> {
        self.input(RoundInput::Tick)
    }

    pub fn start(&mut self) {
        self.input(RoundInput::Start);
    }

    pub fn restart(&mut self) {
        self.input(RoundInput::Restart);
    }

    pub fn toggle_pause(&mut self) {
        self.input(RoundInput::TogglePause);
    }

    /// Clear the transient mark `serial` on `index`, if it is still there
    pub fn release_mark(&mut self, index: usize, serial: u32) {
        self.input(RoundInput::ReleaseMark { index, serial });
    }

    // === Settings ===

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.store.select(difficulty, &self.data.settings);
        self.apply_selection();
    }

    pub fn select_gamemode(&mut self, gamemode: Gamemode) {
        self.gamemode = gamemode;
        self.apply_selection();
    }

    /// Manual change to the active preset; switches to `custom`
    pub fn edit(&mut self, edit: SettingEdit) {
        self.store.edit(edit);
        self.apply_selection();
    }

    fn apply_selection(&mut self) {
        let timer = TimerMode::for_selection(self.gamemode, self.store.difficulty(), self.store.config());
        self.round.configure(timer, MarkRules::from(self.store.config()));
        self.input(RoundInput::Restart);
        self.persist();
    }

    // === Preferences ===

    pub fn select_language(&mut self, language: Language) {
        self.prefs.language = language;
        self.persist();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.prefs.dark_mode = !self.prefs.dark_mode;
        self.document.apply_dark_mode(self.prefs.dark_mode);
        self.persist();
    }

    pub fn set_table_size(&mut self, size: TableSize) {
        self.prefs.table_size = size;
        self.persist();
    }

    fn persist(&mut self) {
        let record = SessionRecord {
            dark_mode: Some(self.prefs.dark_mode),
            table_size: Some(self.prefs.table_size),
            language: Some(self.prefs.language),
            difficulty: Some(self.store.difficulty()),
            gamemode: Some(self.gamemode),
            config: Some(*self.store.config()),
            ..SessionRecord::default()
        };
        self.bridge.save(&record);
    }

    // === Accessors ===

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn difficulty(&self) -> Difficulty {
        self.store.difficulty()
    }

    pub fn gamemode(&self) -> Gamemode {
        self.gamemode
    }

    pub fn config(&self) -> &DifficultyConfig {
        self.store.config()
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn catalog(&self) -> &Catalog {
        &self.data.catalog
    }

    pub fn settings(&self) -> &GameSettings {
        &self.data.settings
    }

    pub fn bridge(&self) -> &PersistenceBridge<S, N> {
        &self.bridge
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn target(&self) -> Option<&Element> {
        self.round.target().and_then(|i| self.data.catalog.get(i))
    }

    /// Hint panel lines for the current target
    pub fn hints(&self) -> Vec<Hint> {
        match self.target() {
            Some(element) => catalog::hints(element, &self.store.config().hints, self.prefs.language),
            None => Vec::new(),
        }
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus {
            attempts: self.round.attempts,
            found: self.round.score(),
            total: ELEMENT_COUNT as u32,
            errors: self.round.errors(),
            time: self.round.time_display(self.gamemode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::platform::memory::{MemoryDocument, MemoryNavigation, MemoryStorage};
    use crate::round::RoundPhase;
    use crate::settings::tests::sample_settings;
    use crate::settings::{ArcadeField, HintField, TableField, ToggleField};

    type TestGame = Game<MemoryStorage, MemoryNavigation, MemoryDocument>;

    fn data() -> GameData {
        GameData {
            catalog: sample_catalog(),
            settings: sample_settings(),
        }
    }

    fn fresh() -> TestGame {
        let bridge = PersistenceBridge::new(MemoryStorage::default(), MemoryNavigation::default());
        Game::with_seed(data(), bridge, MemoryDocument::default(), 7)
    }

    #[test]
    fn test_boot_defaults() {
        let game = fresh();
        assert_eq!(game.difficulty(), Difficulty::Learn);
        assert_eq!(game.gamemode(), Gamemode::Classic);
        assert_eq!(game.config(), sample_settings().preset(Difficulty::Learn).unwrap());
        assert_eq!(game.round().phase, RoundPhase::Running);
        assert!(game.target().is_some());
        assert_eq!(game.preferences().table_size, TableSize::new(4));
        assert!(!game.document().dark_mode);
    }

    #[test]
    fn test_boot_uses_system_dark_preference() {
        let bridge = PersistenceBridge::new(MemoryStorage::default(), MemoryNavigation::default());
        let document = MemoryDocument {
            prefers_dark: true,
            ..MemoryDocument::default()
        };
        let game = Game::with_seed(data(), bridge, document, 1);
        assert!(game.preferences().dark_mode);
        assert!(game.document().dark_mode);
    }

    #[test]
    fn test_oversized_stored_table_size_uses_viewport() {
        let mut storage = MemoryStorage::default();
        storage
            .set_item(crate::consts::STORAGE_KEY, r#"{"tableSize":12}"#)
            .unwrap();
        let bridge = PersistenceBridge::new(storage, MemoryNavigation::default());
        let game = Game::with_seed(data(), bridge, MemoryDocument::default(), 2);

        assert_eq!(game.preferences().table_size, TableSize::new(4));
        assert_eq!(game.preferences().table_size.cell_px(), 48);
        assert_eq!(game.bridge().read_session().table_size, Some(TableSize::new(4)));
    }

    #[test]
    fn test_difficulty_change_restarts() {
        let mut game = fresh();
        let protons = game.target().unwrap().protons;
        game.click(protons);
        assert_eq!(game.round().score(), 1);

        game.select_difficulty(Difficulty::Hard);
        assert_eq!(game.config(), sample_settings().preset(Difficulty::Hard).unwrap());
        assert_eq!(game.round().score(), 0);
        assert_eq!(game.round().attempts, 0);
    }

    #[test]
    fn test_edit_switches_to_custom() {
        let mut game = fresh();
        game.select_difficulty(Difficulty::Medium);
        game.edit(SettingEdit::Toggle(ToggleField::Hint(HintField::Electron), true));
        assert_eq!(game.difficulty(), Difficulty::Custom);
        assert!(game.config().hints.electron);

        game.edit(SettingEdit::Toggle(ToggleField::Table(TableField::Colors), false));
        assert!(!game.config().show_group_colors);
        assert!(game.config().hints.electron);
    }

    #[test]
    fn test_learn_never_counts_down() {
        let mut game = fresh();
        game.select_gamemode(Gamemode::Arcade);
        assert_eq!(game.round().timer(), TimerMode::Stopwatch);
        assert_eq!(game.status().time, "∞");

        game.select_difficulty(Difficulty::Easy);
        assert!(matches!(game.round().timer(), TimerMode::Countdown(_)));
    }

    #[test]
    fn test_arcade_edit_applies_to_countdown() {
        let mut game = fresh();
        game.select_gamemode(Gamemode::Arcade);
        game.select_difficulty(Difficulty::Easy);
        game.edit(SettingEdit::Arcade(ArcadeField::TotalTime, 500));
        assert_eq!(game.round().remaining(), Some(500));
        assert_eq!(game.status().time, "500");
    }

    #[test]
    fn test_tick_only_moves_clock() {
        let mut game = fresh();
        let target = game.target().unwrap().protons;
        let wrong = if target == 1 { 2 } else { 1 };
        game.click(wrong);
        let before = game.round().clone();

        assert_eq!(game.tick(), None);
        let after = game.round();
        assert_eq!(after.elapsed, before.elapsed + 1);
        assert_eq!(after.target(), before.target());
        assert_eq!(after.pool(), before.pool());
        assert_eq!(after.attempts, before.attempts);
        assert_eq!(after.marks().collect::<Vec<_>>(), before.marks().collect::<Vec<_>>());
        assert_eq!(game.status().time, "1");
    }

    #[test]
    fn test_status_counts() {
        let mut game = fresh();
        let target = game.target().unwrap().protons;
        let wrong = if target == 1 { 2 } else { 1 };
        game.click(wrong);
        game.click(target);

        let status = game.status();
        assert_eq!(status.attempts, 2);
        assert_eq!(status.found, 1);
        assert_eq!(status.total, 118);
        assert_eq!(status.errors, 1);
    }

    #[test]
    fn test_hints_follow_language() {
        let mut game = fresh();
        game.select_language(Language::PtBr);
        let target = game.target().unwrap().clone();
        let name = game.hints().into_iter().find(|h| h.label == "Name").unwrap();
        assert_eq!(name.value, target.name(Language::PtBr));
    }

    #[test]
    fn test_dark_mode_toggle_persists() {
        let mut game = fresh();
        game.toggle_dark_mode();
        assert!(game.document().dark_mode);
        assert_eq!(game.bridge().read_session().dark_mode, Some(true));
    }

    #[test]
    fn test_every_change_updates_url() {
        let mut game = fresh();
        let before = game.bridge().navigation().replacements;
        game.select_gamemode(Gamemode::Arcade);
        game.set_table_size(TableSize::new(2));
        assert_eq!(game.bridge().navigation().replacements, before + 2);
        assert_eq!(game.bridge().read_session().table_size, Some(TableSize::new(2)));
    }
}
