/// External (serializable) row representations of all tables exchanged with the outside world.
pub mod ext_repr;

/// All logic for converting external rows into validated internal tables
pub mod import;

/// All logic for exporting internal tables and plans into external rows
pub mod export;
