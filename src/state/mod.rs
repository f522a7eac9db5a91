mod manager;
mod persistence;

pub use manager::{TrackerSession, FUZZY_MATCH_THRESHOLD};
pub use persistence::{
    load_foods, load_slot, save_foods, save_slot, FileStore, KeyValueStore, MemoryStore,
    SLOT_CURRENT_SCREEN, SLOT_DAILY, SLOT_GOALS, SLOT_PROFILE, SLOT_SAVED_FOODS,
};
