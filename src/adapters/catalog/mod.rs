pub mod sqlite;
pub mod static_catalog;

pub use sqlite::SqliteBoxCatalog;
pub use static_catalog::StaticBoxCatalog;

use crate::domain::model::PackagingBox;

/// Collapses boxes with identical geometry and capacity, keeping the highest id.
///
/// The highest-id choice only makes the result reproducible; any member of the
/// group would be an equally valid answer.
pub fn dedupe_boxes(boxes: Vec<PackagingBox>) -> Vec<PackagingBox> {
    let mut unique: Vec<PackagingBox> = Vec::with_capacity(boxes.len());
    for candidate in boxes {
        match unique.iter_mut().find(|b| b.same_geometry(&candidate)) {
            Some(existing) if existing.id < candidate.id => *existing = candidate,
            Some(_) => {}
            None => unique.push(candidate),
        }
    }
    unique
}
