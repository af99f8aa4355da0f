//! Controller persistence through the in-memory ports

use periodic_quiz::catalog::Language;
use periodic_quiz::game::Game;
use periodic_quiz::layout::TableSize;
use periodic_quiz::loader::GameData;
use periodic_quiz::persistence::{NavigationPort, PersistenceBridge, StoragePort};
use periodic_quiz::platform::memory::{MemoryDocument, MemoryNavigation, MemoryStorage};
use periodic_quiz::settings::{ArcadeField, Difficulty, Gamemode, HintField, SettingEdit, ToggleField};

fn shipped_data() -> GameData {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/configs");
    let game = std::fs::read_to_string(format!("{}/game.json", dir)).unwrap();
    let settings = std::fs::read_to_string(format!("{}/settings.json", dir)).unwrap();
    GameData::from_json(&game, &settings).unwrap()
}

/// Copy of the storage contents, as a second page load would see them
fn reload_storage(game: &Game<MemoryStorage, MemoryNavigation, MemoryDocument>) -> MemoryStorage {
    let mut storage = MemoryStorage::default();
    let key = periodic_quiz::consts::STORAGE_KEY;
    if let Some(json) = game.bridge().storage().get_item(key) {
        storage.set_item(key, &json).unwrap();
    }
    storage
}

#[test]
fn test_preferences_survive_reload() {
    let bridge = PersistenceBridge::new(MemoryStorage::default(), MemoryNavigation::default());
    let mut game = Game::with_seed(shipped_data(), bridge, MemoryDocument::default(), 3);

    game.select_gamemode(Gamemode::Arcade);
    game.select_difficulty(Difficulty::Hard);
    game.edit(SettingEdit::Arcade(ArcadeField::TotalTime, 77));
    game.edit(SettingEdit::Toggle(ToggleField::Hint(HintField::Mass), true));
    game.select_language(Language::EsEs);
    game.toggle_dark_mode();
    game.set_table_size(TableSize::new(8));

    let expected_config = *game.config();

    // No URL data: everything comes back from storage
    let bridge = PersistenceBridge::new(reload_storage(&game), MemoryNavigation::default());
    let reloaded = Game::with_seed(shipped_data(), bridge, MemoryDocument::default(), 4);

    assert_eq!(reloaded.difficulty(), Difficulty::Custom);
    assert_eq!(reloaded.gamemode(), Gamemode::Arcade);
    assert_eq!(*reloaded.config(), expected_config);
    assert_eq!(reloaded.round().remaining(), Some(77));
    assert_eq!(reloaded.preferences().language, Language::EsEs);
    assert!(reloaded.preferences().dark_mode);
    assert!(reloaded.document().dark_mode);
    assert_eq!(reloaded.preferences().table_size, TableSize::new(8));
}

#[test]
fn test_shared_link_overrides_storage() {
    let bridge = PersistenceBridge::new(MemoryStorage::default(), MemoryNavigation::default());
    let mut sender = Game::with_seed(shipped_data(), bridge, MemoryDocument::default(), 5);
    sender.select_difficulty(Difficulty::Insane);
    sender.select_gamemode(Gamemode::Arcade);
    let link = sender.bridge().navigation().query_data().unwrap();

    // Receiver has their own stored selection and language
    let bridge = PersistenceBridge::new(MemoryStorage::default(), MemoryNavigation::default());
    let mut receiver = Game::with_seed(shipped_data(), bridge, MemoryDocument::default(), 6);
    receiver.select_difficulty(Difficulty::Easy);
    receiver.select_language(Language::PtBr);

    let bridge = PersistenceBridge::new(
        reload_storage(&receiver),
        MemoryNavigation::with_data(&link),
    );
    let opened = Game::with_seed(shipped_data(), bridge, MemoryDocument::default(), 7);

    assert_eq!(opened.difficulty(), Difficulty::Insane);
    assert_eq!(opened.gamemode(), Gamemode::Arcade);
    assert_eq!(opened.config(), sender.config());
    assert_eq!(opened.preferences().language, Language::PtBr);
}

#[test]
fn test_game_data_is_cached_alongside_preferences() {
    let data = shipped_data();
    let mut bridge = PersistenceBridge::new(MemoryStorage::default(), MemoryNavigation::default());
    bridge.write_session(&data.to_record().unwrap()).unwrap();

    let game = Game::with_seed(data.clone(), bridge, MemoryDocument::default(), 8);
    let cached = GameData::from_session(&game.bridge().read_session()).unwrap();
    assert_eq!(cached, data);
    assert_eq!(game.bridge().read_session().difficulty, Some(Difficulty::Learn));
}
