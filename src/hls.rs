pub mod attributes;
pub mod classifier;
pub mod master;
pub mod media;
pub mod range;

pub use attributes::Attributes;
pub use classifier::{LineClassifier, LineType};
pub use master::{Alternative, AlternativeType, MasterPlaylist, Resolution, Variant};
pub use media::{MediaPlaylist, MediaSegment};
pub use range::{select_range, total_duration};
